use proptest::prelude::*;

use pogo_engine::cpm::{all_levels, cp_multiplier, try_cp_multiplier, FALLBACK_CPM, CPM_TABLE};
use pogo_engine::iv_search::{
    compute_cp, find_iv_level_combinations, IndividualValues, MAX_IV, MIN_CP,
};
use pogo_engine::pokemon::Pokemon;

fn level_strategy() -> impl Strategy<Value = f64> {
    (0..CPM_TABLE.len()).prop_map(|i| 1.0 + i as f64 * 0.5)
}

fn iv_strategy() -> impl Strategy<Value = IndividualValues> {
    (0..=MAX_IV, 0..=MAX_IV, 0..=MAX_IV)
        .prop_map(|(a, d, s)| IndividualValues::new(a, d, s).unwrap())
}

fn pokemon_strategy() -> impl Strategy<Value = Pokemon> {
    (1u32..=414, 1u32..=396, 1u32..=496)
        .prop_map(|(a, d, s)| Pokemon::new(0, "Subject", a, d, s))
}

#[test]
fn test_cpm_table_is_strictly_increasing() {
    let values: Vec<f64> = all_levels().map(cp_multiplier).collect();
    assert_eq!(values.len(), 101);
    for pair in values.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_unknown_levels_use_fallback() {
    assert_eq!(try_cp_multiplier(0.5), None);
    assert_eq!(try_cp_multiplier(51.5), None);
    assert_eq!(try_cp_multiplier(12.25), None);
    assert_eq!(cp_multiplier(12.25), FALLBACK_CPM);
}

#[test]
fn test_unreachable_cp_is_empty() {
    let sunkern = Pokemon::new(191, "Sunkern", 55, 55, 102);
    assert!(find_iv_level_combinations(&sunkern, 5000).is_empty());
}

#[test]
fn test_minimum_cp_includes_zero_ivs_at_level_one() {
    let sunkern = Pokemon::new(191, "Sunkern", 55, 55, 102);
    let matches = find_iv_level_combinations(&sunkern, MIN_CP);
    assert!(matches
        .iter()
        .any(|m| m.level == 1.0 && m.attack_iv == 0 && m.defense_iv == 0 && m.stamina_iv == 0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_search_recovers_forward_cp(
        pokemon in pokemon_strategy(),
        ivs in iv_strategy(),
        level in level_strategy(),
    ) {
        let cp = compute_cp(&pokemon, &ivs, level).unwrap();
        let matches = find_iv_level_combinations(&pokemon, cp);
        prop_assert!(matches.iter().any(|m| m.attack_iv == ivs.attack
            && m.defense_iv == ivs.defense
            && m.stamina_iv == ivs.stamina
            && m.level == level));
    }

    #[test]
    fn test_search_returns_only_exact_matches(
        pokemon in pokemon_strategy(),
        target_cp in 10u32..4000,
    ) {
        for m in find_iv_level_combinations(&pokemon, target_cp) {
            let ivs = IndividualValues::new(m.attack_iv, m.defense_iv, m.stamina_iv).unwrap();
            prop_assert_eq!(compute_cp(&pokemon, &ivs, m.level).unwrap(), target_cp);
            prop_assert_eq!(m.sum_iv, ivs.sum());
        }
    }
}

proptest! {
    #[test]
    fn test_cp_never_below_floor(
        pokemon in pokemon_strategy(),
        ivs in iv_strategy(),
        level in level_strategy(),
    ) {
        prop_assert!(compute_cp(&pokemon, &ivs, level).unwrap() >= MIN_CP);
    }

    #[test]
    fn test_cp_grows_with_level(
        pokemon in pokemon_strategy(),
        ivs in iv_strategy(),
        index in 0usize..100,
    ) {
        let low = 1.0 + index as f64 * 0.5;
        let high = low + 0.5;
        prop_assert!(compute_cp(&pokemon, &ivs, low).unwrap() <= compute_cp(&pokemon, &ivs, high).unwrap());
    }
}
