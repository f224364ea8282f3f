use std::collections::HashMap;
use std::fs;
use std::path::Path;

use deunicode::deunicode;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};
use crate::pokemon::{
    ChargedMove, CreatureTypes, FastMove, Movepool, Pokemon, PvpFastMove, TypeAffinityRecord,
    TypeAffinityTable, NORMAL_FORM,
};

pub const POKEMON_STATS_FILE: &str = "pokemon_stats.json";
pub const FAST_MOVES_FILE: &str = "fast_moves.json";
pub const CHARGED_MOVES_FILE: &str = "charged_moves.json";
pub const MOVEPOOLS_FILE: &str = "current_pokemon_moves.json";
pub const POKEMON_TYPES_FILE: &str = "pokemon_types.json";
pub const PVP_FAST_MOVES_FILE: &str = "pvp_fast_moves.json";

/// "Flabébé" and "flabebe" both become "flabebe".
pub fn normalize_name(name: &str) -> String {
    deunicode(name.trim()).to_lowercase()
}

/// A read-only snapshot of game data records.
#[derive(Debug, Clone, Default)]
pub struct Pokedex {
    pokemon: Vec<Pokemon>,
    fast_moves: HashMap<String, FastMove>,
    charged_moves: HashMap<String, ChargedMove>,
    movepools: Vec<Movepool>,
    types: TypeAffinityTable,
    pvp_fast_moves: Vec<PvpFastMove>,
}

fn read_records<T: DeserializeOwned>(dir: &Path, file_name: &str) -> Result<Vec<T>> {
    let content = fs::read_to_string(dir.join(file_name))?;
    Ok(serde_json::from_str(&content)?)
}

impl Pokedex {
    pub fn from_parts(
        pokemon: Vec<Pokemon>,
        fast_moves: Vec<FastMove>,
        charged_moves: Vec<ChargedMove>,
        movepools: Vec<Movepool>,
        types: TypeAffinityTable,
    ) -> Pokedex {
        Pokedex {
            pokemon,
            fast_moves: fast_moves
                .into_iter()
                .map(|m| (normalize_name(&m.name), m))
                .collect(),
            charged_moves: charged_moves
                .into_iter()
                .map(|m| (normalize_name(&m.name), m))
                .collect(),
            movepools,
            types,
            pvp_fast_moves: Vec::new(),
        }
    }

    pub fn with_pvp_fast_moves(mut self, pvp_fast_moves: Vec<PvpFastMove>) -> Pokedex {
        self.pvp_fast_moves = pvp_fast_moves;
        self
    }

    /// Loads the five record files from `dir`, plus `pvp_fast_moves.json`
    /// when it is present.
    pub fn from_dir(dir: &Path) -> Result<Pokedex> {
        let pokemon: Vec<Pokemon> = read_records(dir, POKEMON_STATS_FILE)?;
        let fast_moves: Vec<FastMove> = read_records(dir, FAST_MOVES_FILE)?;
        let charged_moves: Vec<ChargedMove> = read_records(dir, CHARGED_MOVES_FILE)?;
        let movepools: Vec<Movepool> = read_records(dir, MOVEPOOLS_FILE)?;
        let type_records: Vec<TypeAffinityRecord> = read_records(dir, POKEMON_TYPES_FILE)?;

        info!(
            dir = %dir.display(),
            pokemon = pokemon.len(),
            fast_moves = fast_moves.len(),
            charged_moves = charged_moves.len(),
            movepools = movepools.len(),
            type_records = type_records.len(),
            "loaded game data"
        );

        let pvp_fast_moves: Vec<PvpFastMove> = if dir.join(PVP_FAST_MOVES_FILE).exists() {
            read_records(dir, PVP_FAST_MOVES_FILE)?
        } else {
            debug!(dir = %dir.display(), "no trainer-battle fast move data");
            Vec::new()
        };

        Ok(Pokedex::from_parts(
            pokemon,
            fast_moves,
            charged_moves,
            movepools,
            TypeAffinityTable::from_records(&type_records),
        )
        .with_pvp_fast_moves(pvp_fast_moves))
    }

    pub fn pokemon(&self) -> &[Pokemon] {
        &self.pokemon
    }

    /// Every fast move, sorted by name.
    pub fn fast_moves(&self) -> Vec<&FastMove> {
        let mut moves: Vec<&FastMove> = self.fast_moves.values().collect();
        moves.sort_by(|a, b| a.name.cmp(&b.name));
        moves
    }

    /// Every charged move, sorted by name.
    pub fn charged_moves(&self) -> Vec<&ChargedMove> {
        let mut moves: Vec<&ChargedMove> = self.charged_moves.values().collect();
        moves.sort_by(|a, b| a.name.cmp(&b.name));
        moves
    }

    pub fn pvp_fast_moves(&self) -> &[PvpFastMove] {
        &self.pvp_fast_moves
    }

    pub fn types_of(&self, pokemon: &Pokemon) -> CreatureTypes {
        self.types.types_of(pokemon)
    }

    pub fn fast_move(&self, name: &str) -> Result<&FastMove> {
        self.fast_moves
            .get(&normalize_name(name))
            .ok_or_else(|| EngineError::UnknownMove(name.to_string()))
    }

    pub fn charged_move(&self, name: &str) -> Result<&ChargedMove> {
        self.charged_moves
            .get(&normalize_name(name))
            .ok_or_else(|| EngineError::UnknownMove(name.to_string()))
    }

    pub fn pokemon_by_id(&self, id: u32, form: Option<&str>) -> Result<&Pokemon> {
        self.pick_form(self.pokemon.iter().filter(|p| p.id == id), form)
            .ok_or_else(|| EngineError::UnknownPokemon(id.to_string()))
    }

    /// Name matching ignores case and accents. Without a form, the Normal form
    /// is preferred, then the first form listed.
    pub fn find_pokemon(&self, name: &str, form: Option<&str>) -> Result<&Pokemon> {
        let wanted = normalize_name(name);
        self.pick_form(
            self.pokemon
                .iter()
                .filter(|p| normalize_name(&p.name) == wanted),
            form,
        )
        .ok_or_else(|| match form {
            Some(form) => EngineError::UnknownPokemon(format!("{} ({})", name, form)),
            None => EngineError::UnknownPokemon(name.to_string()),
        })
    }

    fn pick_form<'a>(
        &self,
        candidates: impl Iterator<Item = &'a Pokemon>,
        form: Option<&str>,
    ) -> Option<&'a Pokemon> {
        let candidates: Vec<&Pokemon> = candidates.collect();
        match form {
            Some(form) => {
                let wanted = normalize_name(form);
                candidates
                    .into_iter()
                    .find(|p| normalize_name(p.form_or_normal()) == wanted)
            }
            None => candidates
                .iter()
                .find(|p| p.form_or_normal() == NORMAL_FORM)
                .or_else(|| candidates.first())
                .copied(),
        }
    }

    /// Movepool by (id, form), then (id, Normal), then any entry for the id.
    pub fn movepool(&self, pokemon: &Pokemon) -> Option<&Movepool> {
        let form = pokemon.form_or_normal();
        let id = pokemon.id;
        let same_id = move || self.movepools.iter().filter(move |m| m.pokemon_id == id);
        same_id()
            .find(|m| m.form.as_deref().unwrap_or(NORMAL_FORM) == form)
            .or_else(|| same_id().find(|m| m.form.as_deref().unwrap_or(NORMAL_FORM) == NORMAL_FORM))
            .or_else(|| same_id().next())
    }

    /// Resolves the movepool's move names to definitions. Names with no
    /// definition are skipped.
    pub fn movepool_for(&self, pokemon: &Pokemon, include_elite: bool) -> (Vec<FastMove>, Vec<ChargedMove>) {
        let movepool = match self.movepool(pokemon) {
            Some(movepool) => movepool,
            None => return (Vec::new(), Vec::new()),
        };

        let mut fast_names: Vec<&String> = movepool.fast_moves.iter().collect();
        let mut charged_names: Vec<&String> = movepool.charged_moves.iter().collect();
        if include_elite {
            fast_names.extend(movepool.elite_fast_moves.iter());
            charged_names.extend(movepool.elite_charged_moves.iter());
        }

        let fast_moves = fast_names
            .into_iter()
            .filter_map(|name| match self.fast_move(name) {
                Ok(m) => Some(m.clone()),
                Err(_) => {
                    warn!(pokemon = %pokemon.display_name(), fast_move = %name, "no definition for fast move");
                    None
                }
            })
            .collect();
        let charged_moves = charged_names
            .into_iter()
            .filter_map(|name| match self.charged_move(name) {
                Ok(m) => Some(m.clone()),
                Err(_) => {
                    warn!(pokemon = %pokemon.display_name(), charged_move = %name, "no definition for charged move");
                    None
                }
            })
            .collect();

        (fast_moves, charged_moves)
    }
}
