use lazy_static::lazy_static;
use serde::Serialize;

use crate::define_enum_with_from_str;

define_enum_with_from_str! {
    /// The 18 elemental types.
    PokemonType {
        NORMAL => "Normal",
        FIRE => "Fire",
        WATER => "Water",
        ELECTRIC => "Electric",
        GRASS => "Grass",
        ICE => "Ice",
        FIGHTING => "Fighting",
        POISON => "Poison",
        GROUND => "Ground",
        FLYING => "Flying",
        PSYCHIC => "Psychic",
        BUG => "Bug",
        ROCK => "Rock",
        GHOST => "Ghost",
        DRAGON => "Dragon",
        DARK => "Dark",
        STEEL => "Steel",
        FAIRY => "Fairy",
    },
    error = UnknownType
}

pub const TYPE_COUNT: usize = 18;

pub const SUPER_EFFECTIVE: f64 = 1.6;
pub const NOT_VERY_EFFECTIVE: f64 = 0.625;
// Immunities from the main series become a double resistance (0.625^2),
// commonly shown as 0.391.
pub const IMMUNE: f64 = 0.390625;
pub const NEUTRAL: f64 = 1.0;

// (attacker, super effective against, not very effective against, immune)
const EFFECTIVENESS: [(PokemonType, &[PokemonType], &[PokemonType], &[PokemonType]); TYPE_COUNT] = {
    use PokemonType::*;
    [
        (NORMAL, &[], &[ROCK, STEEL], &[GHOST]),
        (FIRE, &[GRASS, ICE, BUG, STEEL], &[FIRE, WATER, ROCK, DRAGON], &[]),
        (WATER, &[FIRE, GROUND, ROCK], &[WATER, GRASS, DRAGON], &[]),
        (ELECTRIC, &[WATER, FLYING], &[ELECTRIC, GRASS, DRAGON], &[GROUND]),
        (
            GRASS,
            &[WATER, GROUND, ROCK],
            &[FIRE, GRASS, POISON, FLYING, BUG, DRAGON, STEEL],
            &[],
        ),
        (ICE, &[GRASS, GROUND, FLYING, DRAGON], &[FIRE, WATER, ICE, STEEL], &[]),
        (
            FIGHTING,
            &[NORMAL, ICE, ROCK, DARK, STEEL],
            &[POISON, FLYING, PSYCHIC, BUG, FAIRY],
            &[GHOST],
        ),
        (POISON, &[GRASS, FAIRY], &[POISON, GROUND, ROCK, GHOST], &[STEEL]),
        (
            GROUND,
            &[FIRE, ELECTRIC, POISON, ROCK, STEEL],
            &[GRASS, BUG],
            &[FLYING],
        ),
        (FLYING, &[GRASS, FIGHTING, BUG], &[ELECTRIC, ROCK, STEEL], &[]),
        (PSYCHIC, &[FIGHTING, POISON], &[PSYCHIC, STEEL], &[DARK]),
        (
            BUG,
            &[GRASS, PSYCHIC, DARK],
            &[FIRE, FIGHTING, POISON, FLYING, GHOST, STEEL, FAIRY],
            &[],
        ),
        (ROCK, &[FIRE, ICE, FLYING, BUG], &[FIGHTING, GROUND, STEEL], &[]),
        (GHOST, &[PSYCHIC, GHOST], &[DARK], &[NORMAL]),
        (DRAGON, &[DRAGON], &[STEEL], &[FAIRY]),
        (DARK, &[PSYCHIC, GHOST], &[FIGHTING, DARK, FAIRY], &[]),
        (STEEL, &[ICE, ROCK, FAIRY], &[FIRE, WATER, ELECTRIC, STEEL], &[]),
        (FAIRY, &[FIGHTING, DRAGON, DARK], &[FIRE, POISON, STEEL], &[]),
    ]
};

lazy_static! {
    // TYPE_CHART[attacker][defender]
    static ref TYPE_CHART: [[f64; TYPE_COUNT]; TYPE_COUNT] = {
        let mut chart = [[NEUTRAL; TYPE_COUNT]; TYPE_COUNT];
        for (attacker, strong, weak, immune) in EFFECTIVENESS.iter() {
            let row = &mut chart[*attacker as usize];
            for defender in strong.iter() {
                row[*defender as usize] = SUPER_EFFECTIVE;
            }
            for defender in weak.iter() {
                row[*defender as usize] = NOT_VERY_EFFECTIVE;
            }
            for defender in immune.iter() {
                row[*defender as usize] = IMMUNE;
            }
        }
        chart
    };
}

pub fn type_effectiveness(attacker: PokemonType, defender: PokemonType) -> f64 {
    TYPE_CHART[attacker as usize][defender as usize]
}

/// Multiplier of an attack against a one- or two-typed defender.
pub fn combined_effectiveness(
    attacker: PokemonType,
    primary: PokemonType,
    secondary: Option<PokemonType>,
) -> f64 {
    let mut multiplier = type_effectiveness(attacker, primary);
    if let Some(secondary) = secondary {
        if secondary != primary {
            multiplier *= type_effectiveness(attacker, secondary);
        }
    }
    multiplier
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeMultiplier {
    pub attacking_type: PokemonType,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefensiveProfile {
    pub primary: PokemonType,
    pub secondary: Option<PokemonType>,
    /// Attacking types dealing more than neutral damage, strongest first.
    pub weaknesses: Vec<TypeMultiplier>,
    /// Attacking types dealing less than neutral damage, most resisted first.
    pub resistances: Vec<TypeMultiplier>,
}

pub fn defensive_profile(primary: PokemonType, secondary: Option<PokemonType>) -> DefensiveProfile {
    let mut weaknesses = Vec::new();
    let mut resistances = Vec::new();

    for attacker in PokemonType::ALL.iter() {
        let multiplier = combined_effectiveness(*attacker, primary, secondary);
        let entry = TypeMultiplier {
            attacking_type: *attacker,
            multiplier,
        };
        if multiplier > NEUTRAL {
            weaknesses.push(entry);
        } else if multiplier < NEUTRAL {
            resistances.push(entry);
        }
    }

    // sort_by is stable, so equal multipliers keep chart order
    weaknesses.sort_by(|a, b| b.multiplier.total_cmp(&a.multiplier));
    resistances.sort_by(|a, b| a.multiplier.total_cmp(&b.multiplier));

    DefensiveProfile {
        primary,
        secondary,
        weaknesses,
        resistances,
    }
}
