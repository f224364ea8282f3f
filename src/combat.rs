use serde::Serialize;
use tracing::debug;

use crate::cpm::cp_multiplier;
use crate::error::{EngineError, Result};
use crate::pokemon::{ChargedMove, CreatureTypes, FastMove, Move, Pokemon};
use crate::types::PokemonType;
use crate::weather::{Weather, WEATHER_BOOST};

pub const STAB_MULTIPLIER: f64 = 1.2;
pub const DEFAULT_ATTACKER_LEVEL: f64 = 40.0;
pub const DEFAULT_DEFENDER_DEFENSE: f64 = 150.0;

// Empirical constants of the damage and TDO formulas.
const DAMAGE_FACTOR: f64 = 0.5;
const TDO_DIVISOR: f64 = 14.0;
const SCORE_DIVISOR: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Environment {
    pub attacker_level: f64,
    pub weather: Weather,
    pub defender_defense: f64,
    /// When false, every move gets a neutral weather multiplier regardless of `weather`.
    pub apply_weather_bonus: bool,
}

impl Default for Environment {
    fn default() -> Environment {
        Environment {
            attacker_level: DEFAULT_ATTACKER_LEVEL,
            weather: Weather::CLEAR,
            defender_defense: DEFAULT_DEFENDER_DEFENSE,
            apply_weather_bonus: true,
        }
    }
}

impl Environment {
    pub fn with_level(mut self, attacker_level: f64) -> Environment {
        self.attacker_level = attacker_level;
        self
    }

    pub fn with_weather(mut self, weather: Weather) -> Environment {
        self.weather = weather;
        self
    }

    pub fn without_weather_bonus(mut self) -> Environment {
        self.apply_weather_bonus = false;
        self
    }
}

/// DPS, TDO and score rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombatStats {
    pub dps: f64,
    pub tdo: f64,
    pub score: f64,
}

/// Every intermediate value of one attack-cycle computation at full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleBreakdown {
    pub cpm: f64,
    pub attack_scaled: f64,
    pub fast_stab: f64,
    pub charged_stab: f64,
    pub fast_weather_bonus: f64,
    pub charged_weather_bonus: f64,
    pub fast_damage: f64,
    pub charged_damage: f64,
    pub fast_moves_per_cycle: u32,
    pub cycle_damage: f64,
    pub cycle_time: f64,
    pub dps: f64,
    pub tdo: f64,
    pub score: f64,
}

impl CycleBreakdown {
    pub fn stats(&self) -> CombatStats {
        CombatStats {
            dps: round_hundredths(self.dps),
            tdo: round_hundredths(self.tdo),
            score: round_hundredths(self.score),
        }
    }
}

// Doubles above this are already whole hundredths.
const ROUNDING_LIMIT: f64 = 1e15;

/// Rounds to two decimals on the exact decimal expansion of `value`, with
/// exact ties going away from zero. 1.115 is stored as 1.11499999... and so
/// becomes 1.11, while 1.125 is an exact tie and becomes 1.13.
pub fn round_hundredths(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }

    // Sixty fractional digits are exact for every double the tail can
    // influence (anything below 2^-8 rounds to zero regardless).
    let expansion = format!("{:.60}", value.abs());
    let (whole, fraction) = match expansion.split_once('.') {
        Some(parts) => parts,
        None => return value,
    };
    let whole: u64 = whole.parse().unwrap_or(0);
    let digits = fraction.as_bytes();
    let cents = ((digits[0] - b'0') * 10 + (digits[1] - b'0')) as u64;
    let round_up = digits[2] >= b'5';

    let hundredths = whole * 100 + cents + round_up as u64;
    (hundredths as f64 / 100.0).copysign(value)
}

pub fn stab_multiplier(move_type: PokemonType, types: &CreatureTypes) -> f64 {
    if types.has_type(move_type) {
        STAB_MULTIPLIER
    } else {
        1.0
    }
}

pub fn weather_multiplier(move_type: PokemonType, env: &Environment) -> f64 {
    if env.apply_weather_bonus && env.weather.boosts(move_type) {
        WEATHER_BOOST
    } else {
        1.0
    }
}

pub fn move_damage(
    attack_move: &Move,
    attack_scaled: f64,
    defender_defense: f64,
    stab: f64,
    weather_bonus: f64,
) -> f64 {
    DAMAGE_FACTOR * attack_move.power * (attack_scaled / defender_defense) * stab * weather_bonus
}

/// Fast moves needed to charge `charged` once.
pub fn fast_moves_per_cycle(fast: &FastMove, charged: &ChargedMove) -> Result<u32> {
    if fast.energy_delta <= 0 {
        return Err(EngineError::FastMoveGainsNoEnergy {
            name: fast.name.clone(),
            energy_delta: fast.energy_delta,
        });
    }
    let energy_needed = charged.energy_cost();
    let energy_gain = fast.energy_delta as u32;
    Ok((energy_needed + energy_gain - 1) / energy_gain)
}

fn finite(value: f64, quantity: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NonFinite { quantity })
    }
}

/// Runs one fast-moves-then-charged-move cycle at full precision.
pub fn compute_cycle(
    pokemon: &Pokemon,
    types: &CreatureTypes,
    fast: &FastMove,
    charged: &ChargedMove,
    env: &Environment,
) -> Result<CycleBreakdown> {
    if fast.duration_ms == 0 {
        return Err(EngineError::ZeroDuration(fast.name.clone()));
    }
    if charged.duration_ms == 0 {
        return Err(EngineError::ZeroDuration(charged.name.clone()));
    }
    let n_fast = fast_moves_per_cycle(fast, charged)?;

    let cpm = cp_multiplier(env.attacker_level);
    let attack_scaled = pokemon.base_attack as f64 * cpm;

    let fast_stab = stab_multiplier(fast.move_type, types);
    let charged_stab = stab_multiplier(charged.move_type, types);
    let fast_weather_bonus = weather_multiplier(fast.move_type, env);
    let charged_weather_bonus = weather_multiplier(charged.move_type, env);

    let fast_damage = move_damage(
        fast,
        attack_scaled,
        env.defender_defense,
        fast_stab,
        fast_weather_bonus,
    );
    let charged_damage = move_damage(
        charged,
        attack_scaled,
        env.defender_defense,
        charged_stab,
        charged_weather_bonus,
    );

    let cycle_damage = fast_damage * n_fast as f64 + charged_damage;
    let cycle_time = fast.duration_seconds() * n_fast as f64 + charged.duration_seconds();

    let dps = finite(cycle_damage / cycle_time, "dps")?;
    let tdo = finite(dps * pokemon.base_stamina as f64 * cpm / TDO_DIVISOR, "tdo")?;
    let score = finite(dps * tdo / SCORE_DIVISOR, "score")?;

    debug!(
        pokemon = %pokemon.display_name(),
        fast_move = %fast.name,
        charged_move = %charged.name,
        level = env.attacker_level,
        weather = %env.weather,
        cpm,
        attack_scaled,
        fast_stab,
        charged_stab,
        fast_weather_bonus,
        charged_weather_bonus,
        fast_damage,
        charged_damage,
        n_fast,
        cycle_damage,
        cycle_time,
        dps,
        tdo,
        score,
        "computed attack cycle"
    );

    Ok(CycleBreakdown {
        cpm,
        attack_scaled,
        fast_stab,
        charged_stab,
        fast_weather_bonus,
        charged_weather_bonus,
        fast_damage,
        charged_damage,
        fast_moves_per_cycle: n_fast,
        cycle_damage,
        cycle_time,
        dps,
        tdo,
        score,
    })
}

/// DPS, TDO and score of a moveset, rounded to two decimals.
pub fn compute_combat_stats(
    pokemon: &Pokemon,
    types: &CreatureTypes,
    fast: &FastMove,
    charged: &ChargedMove,
    env: &Environment,
) -> Result<CombatStats> {
    compute_cycle(pokemon, types, fast, charged, env).map(|cycle| cycle.stats())
}
