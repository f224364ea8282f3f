use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::combat::{compute_combat_stats, CombatStats, Environment};
use crate::dex::Pokedex;
use crate::pokemon::{ChargedMove, CreatureTypes, FastMove, Pokemon};
use crate::types::PokemonType;

/// A creature with one fast and one charged move and the stats they produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMoveset {
    pub pokemon: Pokemon,
    pub fast_move: FastMove,
    pub charged_move: ChargedMove,
    pub stats: CombatStats,
}

fn matches_filter(fast: &FastMove, charged: &ChargedMove, filter_type: Option<PokemonType>) -> bool {
    match filter_type {
        Some(t) => fast.move_type == t || charged.move_type == t,
        None => true,
    }
}

/// Best moveset under the default environment (level 40, Clear).
pub fn select_best_moveset(
    pokemon: &Pokemon,
    types: &CreatureTypes,
    fast_moves: &[FastMove],
    charged_moves: &[ChargedMove],
    filter_type: Option<PokemonType>,
) -> Option<RankedMoveset> {
    select_best_moveset_with(
        pokemon,
        types,
        fast_moves,
        charged_moves,
        filter_type,
        &Environment::default(),
    )
}

// Every fast x charged pair passing `filter_type`, in (fast, charged) order.
// Pairs the engine rejects (e.g. a fast move gaining no energy) are dropped.
fn score_combinations<'a>(
    pokemon: &Pokemon,
    types: &CreatureTypes,
    fast_moves: &'a [FastMove],
    charged_moves: &'a [ChargedMove],
    filter_type: Option<PokemonType>,
    env: &Environment,
) -> Vec<(&'a FastMove, &'a ChargedMove, CombatStats)> {
    let mut scored = Vec::with_capacity(fast_moves.len() * charged_moves.len());

    for fast in fast_moves {
        for charged in charged_moves {
            if !matches_filter(fast, charged, filter_type) {
                continue;
            }

            match compute_combat_stats(pokemon, types, fast, charged, env) {
                Ok(stats) => scored.push((fast, charged, stats)),
                Err(e) => {
                    debug!(
                        pokemon = %pokemon.display_name(),
                        fast_move = %fast.name,
                        charged_move = %charged.name,
                        "skipping moveset: {}",
                        e
                    );
                }
            }
        }
    }
    scored
}

fn to_ranked(pokemon: &Pokemon, fast: &FastMove, charged: &ChargedMove, stats: CombatStats) -> RankedMoveset {
    RankedMoveset {
        pokemon: pokemon.clone(),
        fast_move: fast.clone(),
        charged_move: charged.clone(),
        stats,
    }
}

/// Scores every fast x charged combination that passes `filter_type` and keeps
/// the one with the strictly greatest rounded score; the first one seen wins ties.
/// Combinations the engine rejects (e.g. a fast move gaining no energy) are skipped.
pub fn select_best_moveset_with(
    pokemon: &Pokemon,
    types: &CreatureTypes,
    fast_moves: &[FastMove],
    charged_moves: &[ChargedMove],
    filter_type: Option<PokemonType>,
    env: &Environment,
) -> Option<RankedMoveset> {
    let mut best: Option<(&FastMove, &ChargedMove, CombatStats)> = None;

    for (fast, charged, stats) in score_combinations(pokemon, types, fast_moves, charged_moves, filter_type, env) {
        let is_better = match &best {
            Some((_, _, best_stats)) => stats.score > best_stats.score,
            None => true,
        };
        if is_better {
            best = Some((fast, charged, stats));
        }
    }

    best.map(|(fast, charged, stats)| to_ranked(pokemon, fast, charged, stats))
}

/// Every fast x charged combination with its stats, sorted by score descending.
/// Equal scores keep (fast, charged) order, so the head matches
/// `select_best_moveset_with`. Rejected combinations are left out.
pub fn all_movesets(
    pokemon: &Pokemon,
    types: &CreatureTypes,
    fast_moves: &[FastMove],
    charged_moves: &[ChargedMove],
    env: &Environment,
) -> Vec<RankedMoveset> {
    let mut movesets: Vec<RankedMoveset> =
        score_combinations(pokemon, types, fast_moves, charged_moves, None, env)
            .into_iter()
            .map(|(fast, charged, stats)| to_ranked(pokemon, fast, charged, stats))
            .collect();

    movesets.sort_by(|a, b| b.stats.score.total_cmp(&a.stats.score));
    movesets
}

/// Best moveset of every creature in the dex, sorted by score descending.
/// Creatures with equal scores keep dex order.
pub fn rank_attackers(
    dex: &Pokedex,
    filter_type: Option<PokemonType>,
    env: &Environment,
    include_elite: bool,
) -> Vec<RankedMoveset> {
    let mut rankings: Vec<RankedMoveset> = dex
        .pokemon()
        .par_iter()
        .filter_map(|pokemon| {
            let (fast_moves, charged_moves) = dex.movepool_for(pokemon, include_elite);
            if fast_moves.is_empty() || charged_moves.is_empty() {
                return None;
            }
            let types = dex.types_of(pokemon);
            select_best_moveset_with(pokemon, &types, &fast_moves, &charged_moves, filter_type, env)
        })
        .collect();

    rankings.sort_by(|a, b| b.stats.score.total_cmp(&a.stats.score));

    info!(
        filter = ?filter_type,
        ranked = rankings.len(),
        "ranked attackers"
    );
    rankings
}
