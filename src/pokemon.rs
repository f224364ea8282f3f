use std::collections::HashMap;
use std::convert::TryFrom;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::combat::round_hundredths;
use crate::error::{EngineError, Result};
use crate::types::PokemonType;

pub const NORMAL_FORM: &str = "Normal";

/// Base stats of one species/form, as published in the game data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    #[serde(rename = "pokemon_id")]
    pub id: u32,
    #[serde(rename = "pokemon_name")]
    pub name: String,
    #[serde(default)]
    pub form: Option<String>,
    pub base_attack: u32,
    pub base_defense: u32,
    pub base_stamina: u32,
}

impl Pokemon {
    pub fn new(id: u32, name: &str, base_attack: u32, base_defense: u32, base_stamina: u32) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            form: None,
            base_attack,
            base_defense,
            base_stamina,
        }
    }

    pub fn with_form(mut self, form: &str) -> Pokemon {
        self.form = Some(form.to_string());
        self
    }

    pub fn form_or_normal(&self) -> &str {
        match self.form.as_deref() {
            Some(form) if !form.is_empty() => form,
            _ => NORMAL_FORM,
        }
    }

    /// "Name" for the normal form, "Name (Form)" otherwise.
    pub fn display_name(&self) -> String {
        match self.form_or_normal() {
            NORMAL_FORM => self.name.clone(),
            form => format!("{} ({})", self.name, form),
        }
    }
}

/// Wire shape of a move record. Validated into a `Move`.
#[derive(Deserialize)]
struct MoveRecord {
    name: String,
    #[serde(rename = "type")]
    move_type: PokemonType,
    power: f64,
    energy_delta: i32,
    duration: u32,
}

impl TryFrom<MoveRecord> for Move {
    type Error = EngineError;

    fn try_from(record: MoveRecord) -> Result<Move> {
        Move::new(
            &record.name,
            record.move_type,
            record.power,
            record.energy_delta,
            record.duration,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MoveRecord")]
pub struct Move {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: PokemonType,
    pub power: f64,
    /// Positive for energy gained by a fast move, negative for the cost of a charged move.
    pub energy_delta: i32,
    #[serde(rename = "duration")]
    pub duration_ms: u32,
}

impl Move {
    pub fn new(
        name: &str,
        move_type: PokemonType,
        power: f64,
        energy_delta: i32,
        duration_ms: u32,
    ) -> Result<Move> {
        if duration_ms == 0 {
            return Err(EngineError::ZeroDuration(name.to_string()));
        }
        check_power(name, power)?;
        Ok(Move {
            name: name.to_string(),
            move_type,
            power,
            energy_delta,
            duration_ms,
        })
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// Power over duration, two decimals. Ignores energy, STAB and weather.
    pub fn damage_per_second(&self) -> f64 {
        round_hundredths(self.power / self.duration_seconds())
    }
}

/// A move used repeatedly to build energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FastMove(pub Move);

/// A move that spends the energy built by fast moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargedMove(pub Move);

impl FastMove {
    pub fn new(
        name: &str,
        move_type: PokemonType,
        power: f64,
        energy_delta: i32,
        duration_ms: u32,
    ) -> Result<FastMove> {
        Move::new(name, move_type, power, energy_delta, duration_ms).map(FastMove)
    }
}

impl ChargedMove {
    pub fn new(
        name: &str,
        move_type: PokemonType,
        power: f64,
        energy_delta: i32,
        duration_ms: u32,
    ) -> Result<ChargedMove> {
        Move::new(name, move_type, power, energy_delta, duration_ms).map(ChargedMove)
    }

    pub fn energy_cost(&self) -> u32 {
        self.0.energy_delta.unsigned_abs()
    }
}

impl Deref for FastMove {
    type Target = Move;

    fn deref(&self) -> &Move {
        &self.0
    }
}

impl Deref for ChargedMove {
    type Target = Move;

    fn deref(&self) -> &Move {
        &self.0
    }
}

fn check_power(name: &str, power: f64) -> Result<()> {
    if !power.is_finite() || power < 0.0 {
        return Err(EngineError::InvalidMove {
            name: name.to_string(),
            reason: format!("power must be a non-negative number, got {}", power),
        });
    }
    Ok(())
}

#[derive(Deserialize)]
struct PvpFastMoveRecord {
    name: String,
    #[serde(rename = "type")]
    move_type: PokemonType,
    power: f64,
    energy_delta: i32,
    turns: u32,
}

impl TryFrom<PvpFastMoveRecord> for PvpFastMove {
    type Error = EngineError;

    fn try_from(record: PvpFastMoveRecord) -> Result<PvpFastMove> {
        PvpFastMove::new(
            &record.name,
            record.move_type,
            record.power,
            record.energy_delta,
            record.turns,
        )
    }
}

/// A fast move as used in trainer battles, where time is counted in turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PvpFastMoveRecord")]
pub struct PvpFastMove {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: PokemonType,
    pub power: f64,
    pub energy_delta: i32,
    pub turns: u32,
}

impl PvpFastMove {
    pub fn new(
        name: &str,
        move_type: PokemonType,
        power: f64,
        energy_delta: i32,
        turns: u32,
    ) -> Result<PvpFastMove> {
        if turns == 0 {
            return Err(EngineError::ZeroTurns(name.to_string()));
        }
        check_power(name, power)?;
        Ok(PvpFastMove {
            name: name.to_string(),
            move_type,
            power,
            energy_delta,
            turns,
        })
    }

    /// Energy per turn, two decimals.
    pub fn ept(&self) -> f64 {
        round_hundredths(self.energy_delta as f64 / self.turns as f64)
    }

    /// Damage per turn, two decimals.
    pub fn dpt(&self) -> f64 {
        round_hundredths(self.power / self.turns as f64)
    }
}

/// One or two elemental types of a species/form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatureTypes {
    pub primary: PokemonType,
    pub secondary: Option<PokemonType>,
}

impl CreatureTypes {
    pub fn single(primary: PokemonType) -> CreatureTypes {
        CreatureTypes {
            primary,
            secondary: None,
        }
    }

    pub fn dual(primary: PokemonType, secondary: PokemonType) -> CreatureTypes {
        CreatureTypes {
            primary,
            secondary: Some(secondary),
        }
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.primary == pokemon_type || self.secondary == Some(pokemon_type)
    }

    pub fn as_vec(&self) -> Vec<PokemonType> {
        let mut types = vec![self.primary];
        if let Some(secondary) = self.secondary {
            types.push(secondary);
        }
        types
    }
}

impl Default for CreatureTypes {
    fn default() -> CreatureTypes {
        CreatureTypes::single(PokemonType::NORMAL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAffinityRecord {
    #[serde(rename = "pokemon_id")]
    pub id: u32,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(rename = "type", default)]
    pub types: Vec<PokemonType>,
}

/// Types keyed by (id, form).
#[derive(Debug, Clone, Default)]
pub struct TypeAffinityTable {
    types: HashMap<(u32, String), CreatureTypes>,
}

impl TypeAffinityTable {
    pub fn new() -> TypeAffinityTable {
        TypeAffinityTable::default()
    }

    pub fn from_records(records: &[TypeAffinityRecord]) -> TypeAffinityTable {
        let mut table = TypeAffinityTable::new();
        for record in records {
            let form = record.form.as_deref().unwrap_or(NORMAL_FORM);
            let types = CreatureTypes {
                primary: record.types.first().copied().unwrap_or(PokemonType::NORMAL),
                secondary: record.types.get(1).copied(),
            };
            table.insert(record.id, form, types);
        }
        table
    }

    /// Later inserts for the same key replace earlier ones.
    pub fn insert(&mut self, id: u32, form: &str, types: CreatureTypes) {
        self.types.insert((id, form.to_string()), types);
    }

    /// Exact (id, form), then (id, "Normal"), then a plain Normal type.
    pub fn lookup(&self, id: u32, form: Option<&str>) -> CreatureTypes {
        let form = form.filter(|f| !f.is_empty()).unwrap_or(NORMAL_FORM);
        self.types
            .get(&(id, form.to_string()))
            .or_else(|| self.types.get(&(id, NORMAL_FORM.to_string())))
            .copied()
            .unwrap_or_default()
    }

    pub fn types_of(&self, pokemon: &Pokemon) -> CreatureTypes {
        self.lookup(pokemon.id, pokemon.form.as_deref())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Move names a species/form can learn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movepool {
    pub pokemon_id: u32,
    #[serde(default)]
    pub pokemon_name: String,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub fast_moves: Vec<String>,
    #[serde(default)]
    pub charged_moves: Vec<String>,
    #[serde(default)]
    pub elite_fast_moves: Vec<String>,
    #[serde(default)]
    pub elite_charged_moves: Vec<String>,
}
