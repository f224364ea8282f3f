use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::combat::round_hundredths;
use crate::cpm::{all_levels, try_cp_multiplier, CPM_TABLE};
use crate::error::{EngineError, Result};
use crate::pokemon::Pokemon;

pub const MAX_IV: u8 = 15;
pub const MIN_CP: u32 = 10;
pub const MIN_HP: u32 = 10;
pub const MAX_CP_LEVEL: f64 = 50.0;
const IV_TOTAL: f64 = (MAX_IV as f64) * 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndividualValues {
    pub attack: u8,
    pub defense: u8,
    pub stamina: u8,
}

impl IndividualValues {
    pub fn new(attack: u8, defense: u8, stamina: u8) -> Result<IndividualValues> {
        for iv in [attack, defense, stamina] {
            if iv > MAX_IV {
                return Err(EngineError::InvalidIv(iv));
            }
        }
        Ok(IndividualValues {
            attack,
            defense,
            stamina,
        })
    }

    pub fn perfect() -> IndividualValues {
        IndividualValues {
            attack: MAX_IV,
            defense: MAX_IV,
            stamina: MAX_IV,
        }
    }

    pub fn sum(&self) -> u8 {
        self.attack + self.defense + self.stamina
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IvMatch {
    pub attack_iv: u8,
    pub defense_iv: u8,
    pub stamina_iv: u8,
    pub level: f64,
    pub sum_iv: u8,
    /// Share of the maximum IV total, rounded to a whole percent.
    pub percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveStats {
    pub attack: f64,
    pub defense: f64,
    pub hp: u32,
}

/// CP from total stats (base + IV) and a multiplier, never below 10.
pub fn cp_formula(attack: u32, defense: u32, stamina: u32, cpm: f64) -> u32 {
    let cp = (attack as f64 * (defense as f64).sqrt() * (stamina as f64).sqrt() * cpm.powi(2) / 10.0)
        .floor() as u32;
    cp.max(MIN_CP)
}

fn checked_cpm(level: f64) -> Result<f64> {
    try_cp_multiplier(level).ok_or(EngineError::InvalidLevel(level))
}

pub fn compute_cp(pokemon: &Pokemon, ivs: &IndividualValues, level: f64) -> Result<u32> {
    let cpm = checked_cpm(level)?;
    Ok(cp_formula(
        pokemon.base_attack + ivs.attack as u32,
        pokemon.base_defense + ivs.defense as u32,
        pokemon.base_stamina + ivs.stamina as u32,
        cpm,
    ))
}

/// In-battle attack and defense (two decimals) and HP (never below 10).
pub fn effective_stats(pokemon: &Pokemon, ivs: &IndividualValues, level: f64) -> Result<EffectiveStats> {
    let cpm = checked_cpm(level)?;
    let hp = (((pokemon.base_stamina + ivs.stamina as u32) as f64) * cpm).floor() as u32;
    Ok(EffectiveStats {
        attack: round_hundredths((pokemon.base_attack + ivs.attack as u32) as f64 * cpm),
        defense: round_hundredths((pokemon.base_defense + ivs.defense as u32) as f64 * cpm),
        hp: hp.max(MIN_HP),
    })
}

/// CP at level 50 with perfect IVs.
pub fn max_cp(pokemon: &Pokemon) -> u32 {
    let cpm = CPM_TABLE[(MAX_CP_LEVEL * 2.0) as usize - 2];
    cp_formula(
        pokemon.base_attack + MAX_IV as u32,
        pokemon.base_defense + MAX_IV as u32,
        pokemon.base_stamina + MAX_IV as u32,
        cpm,
    )
}

/// "1 in N" odds of a 15/15/15 when every IV is drawn uniformly from `iv_floor..=15`.
pub fn perfect_iv_odds(iv_floor: u8) -> Result<u32> {
    if iv_floor > MAX_IV {
        return Err(EngineError::InvalidIv(iv_floor));
    }
    let outcomes = (MAX_IV - iv_floor + 1) as u32;
    Ok(outcomes.pow(3))
}

fn iv_percent(sum_iv: u8) -> u8 {
    (sum_iv as f64 / IV_TOTAL * 100.0).round() as u8
}

fn matches_at_level(pokemon: &Pokemon, level: f64, target_cp: u32) -> Vec<IvMatch> {
    let cpm = match try_cp_multiplier(level) {
        Some(cpm) => cpm,
        None => return Vec::new(),
    };

    let mut matches = Vec::new();
    for attack_iv in 0..=MAX_IV {
        let attack = pokemon.base_attack + attack_iv as u32;
        for defense_iv in 0..=MAX_IV {
            let defense = pokemon.base_defense + defense_iv as u32;
            for stamina_iv in 0..=MAX_IV {
                let stamina = pokemon.base_stamina + stamina_iv as u32;
                if cp_formula(attack, defense, stamina, cpm) != target_cp {
                    continue;
                }
                let sum_iv = attack_iv + defense_iv + stamina_iv;
                matches.push(IvMatch {
                    attack_iv,
                    defense_iv,
                    stamina_iv,
                    level,
                    sum_iv,
                    percent: iv_percent(sum_iv),
                });
            }
        }
    }
    matches
}

/// Every (IVs, level) producing exactly `target_cp`, best IV total first, then
/// higher level, attack, defense and stamina.
pub fn find_iv_level_combinations(pokemon: &Pokemon, target_cp: u32) -> Vec<IvMatch> {
    let levels: Vec<f64> = all_levels().collect();

    let mut matches: Vec<IvMatch> = levels
        .par_iter()
        .flat_map_iter(|level| matches_at_level(pokemon, *level, target_cp))
        .collect();

    matches.sort_by(|a, b| {
        b.sum_iv
            .cmp(&a.sum_iv)
            .then_with(|| b.level.total_cmp(&a.level))
            .then_with(|| b.attack_iv.cmp(&a.attack_iv))
            .then_with(|| b.defense_iv.cmp(&a.defense_iv))
            .then_with(|| b.stamina_iv.cmp(&a.stamina_iv))
    });

    debug!(
        pokemon = %pokemon.display_name(),
        target_cp,
        matches = matches.len(),
        "searched IV/level combinations"
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tyranitar() -> Pokemon {
        Pokemon::new(248, "Tyranitar", 198, 189, 190)
    }

    fn sunkern() -> Pokemon {
        Pokemon::new(191, "Sunkern", 55, 55, 102)
    }

    #[test]
    fn test_compute_cp_known_values() {
        let ivs = IndividualValues::new(10, 12, 5).unwrap();
        assert_eq!(compute_cp(&tyranitar(), &ivs, 40.0).unwrap(), 2571);
        assert_eq!(max_cp(&tyranitar()), 3075);
    }

    #[test]
    fn test_cp_floor_of_ten() {
        let zero = IndividualValues::new(0, 0, 0).unwrap();
        assert_eq!(compute_cp(&sunkern(), &zero, 1.0).unwrap(), MIN_CP);
        assert_eq!(cp_formula(1, 1, 1, 0.094), MIN_CP);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(IndividualValues::new(16, 0, 0), Err(EngineError::InvalidIv(16))));
        let zero = IndividualValues::new(0, 0, 0).unwrap();
        assert!(matches!(
            compute_cp(&sunkern(), &zero, 40.25),
            Err(EngineError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_effective_stats() {
        let ivs = IndividualValues::perfect();
        let stats = effective_stats(&tyranitar(), &ivs, 40.0).unwrap();
        assert_eq!(stats.attack, 168.33);
        assert_eq!(stats.defense, 161.22);
        assert_eq!(stats.hp, 162);

        let zero = IndividualValues::new(0, 0, 0).unwrap();
        let tiny = Pokemon::new(0, "Tiny", 1, 1, 1);
        assert_eq!(effective_stats(&tiny, &zero, 1.0).unwrap().hp, MIN_HP);
    }

    #[test]
    fn test_perfect_iv_odds() {
        assert_eq!(perfect_iv_odds(0).unwrap(), 4096);
        assert_eq!(perfect_iv_odds(4).unwrap(), 1728);
        assert_eq!(perfect_iv_odds(10).unwrap(), 216);
        assert_eq!(perfect_iv_odds(12).unwrap(), 64);
        assert_eq!(perfect_iv_odds(15).unwrap(), 1);
        assert!(perfect_iv_odds(16).is_err());
    }

    #[test]
    fn test_search_contains_forward_tuple() {
        let ivs = IndividualValues::new(10, 12, 5).unwrap();
        let cp = compute_cp(&tyranitar(), &ivs, 40.0).unwrap();
        let matches = find_iv_level_combinations(&tyranitar(), cp);
        assert!(matches.iter().any(|m| m.attack_iv == 10
            && m.defense_iv == 12
            && m.stamina_iv == 5
            && m.level == 40.0
            && m.sum_iv == 27
            && m.percent == 60));
    }

    #[test]
    fn test_search_results_are_sorted() {
        let matches = find_iv_level_combinations(&tyranitar(), 2571);
        assert!(!matches.is_empty());
        for pair in matches.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let key_a = (a.sum_iv, a.level, a.attack_iv, a.defense_iv, a.stamina_iv);
            let key_b = (b.sum_iv, b.level, b.attack_iv, b.defense_iv, b.stamina_iv);
            assert!(key_a > key_b, "{:?} should sort before {:?}", a, b);
        }
    }

    #[test]
    fn test_search_minimum_cp_matches_many() {
        let matches = find_iv_level_combinations(&sunkern(), MIN_CP);
        assert!(matches
            .iter()
            .any(|m| m.level == 1.0 && m.sum_iv == 0));
    }

    #[test]
    fn test_impossible_cp_is_empty() {
        assert!(find_iv_level_combinations(&sunkern(), 5000).is_empty());
    }
}
