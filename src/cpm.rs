// CP multiplier per level, levels 1 through 51 in half-level steps.
// Index is `level * 2 - 2`.
pub const CPM_TABLE: [f64; 101] = [
    0.094,        // 1
    0.1351374318, // 1.5
    0.16639787,   // 2
    0.192650919,  // 2.5
    0.21573247,   // 3
    0.2365726613, // 3.5
    0.25572005,   // 4
    0.2735303812, // 4.5
    0.29024988,   // 5
    0.3060573775, // 5.5
    0.3210876,    // 6
    0.3354450362, // 6.5
    0.34921268,   // 7
    0.3624577511, // 7.5
    0.3752356,    // 8
    0.387592416,  // 8.5
    0.39956728,   // 9
    0.4111935514, // 9.5
    0.4225,       // 10
    0.4329264091, // 10.5
    0.44310755,   // 11
    0.4530599591, // 11.5
    0.4627984,    // 12
    0.472336093,  // 12.5
    0.48168495,   // 13
    0.4908558003, // 13.5
    0.49985844,   // 14
    0.508701765,  // 14.5
    0.51739395,   // 15
    0.5259425113, // 15.5
    0.5343543,    // 16
    0.5426357375, // 16.5
    0.5507927,    // 17
    0.5588305862, // 17.5
    0.5667545,    // 18
    0.5745691333, // 18.5
    0.5822789,    // 19
    0.5898879072, // 19.5
    0.5974,       // 20
    0.6048236651, // 20.5
    0.6121573,    // 21
    0.6194041216, // 21.5
    0.6265671,    // 22
    0.6336491432, // 22.5
    0.64065295,   // 23
    0.6475809666, // 23.5
    0.65443563,   // 24
    0.6612192524, // 24.5
    0.667934,     // 25
    0.6745818959, // 25.5
    0.6811649,    // 26
    0.6876849038, // 26.5
    0.69414365,   // 27
    0.70054287,   // 27.5
    0.7068842,    // 28
    0.7131691091, // 28.5
    0.7193991,    // 29
    0.7255756136, // 29.5
    0.7317,       // 30
    0.7347410093, // 30.5
    0.7377695,    // 31
    0.7407855938, // 31.5
    0.74378943,   // 32
    0.7467812109, // 32.5
    0.74976104,   // 33
    0.7527290867, // 33.5
    0.7556855,    // 34
    0.7586303683, // 34.5
    0.76156384,   // 35
    0.7644860647, // 35.5
    0.76739717,   // 36
    0.7702972656, // 36.5
    0.7731865,    // 37
    0.7760649616, // 37.5
    0.77893275,   // 38
    0.7817900548, // 38.5
    0.784637,     // 39
    0.7874736075, // 39.5
    0.7903,       // 40
    0.7931164,    // 40.5
    0.7953,       // 41
    0.7974,       // 41.5
    0.8003,       // 42
    0.8032,       // 42.5
    0.8053,       // 43
    0.8074,       // 43.5
    0.8103,       // 44
    0.8132,       // 44.5
    0.8153,       // 45
    0.8174,       // 45.5
    0.8203,       // 46
    0.8232,       // 46.5
    0.8253,       // 47
    0.8274,       // 47.5
    0.8303,       // 48
    0.8332,       // 48.5
    0.8353,       // 49
    0.8374,       // 49.5
    0.8403,       // 50
    0.8432,       // 50.5
    0.8453,       // 51
];

pub const MIN_LEVEL: f64 = 1.0;
pub const MAX_LEVEL: f64 = 51.0;

/// Returned by `cp_multiplier` for any level that is not in the table.
/// This is the level 40 multiplier.
pub const FALLBACK_CPM: f64 = 0.7903;

fn level_index(level: f64) -> Option<usize> {
    if !level.is_finite() || level < MIN_LEVEL || level > MAX_LEVEL {
        return None;
    }
    let doubled = level * 2.0;
    if doubled.fract() != 0.0 {
        return None;
    }
    Some(doubled as usize - 2)
}

/// Looks up the multiplier for a tabulated level, `None` for anything else.
pub fn try_cp_multiplier(level: f64) -> Option<f64> {
    level_index(level).map(|idx| CPM_TABLE[idx])
}

/// Looks up the multiplier for `level`. Levels outside the table, including
/// fractional levels that are not half steps, get `FALLBACK_CPM`.
pub fn cp_multiplier(level: f64) -> f64 {
    try_cp_multiplier(level).unwrap_or(FALLBACK_CPM)
}

pub fn is_valid_level(level: f64) -> bool {
    level_index(level).is_some()
}

/// All 101 tabulated levels, ascending.
pub fn all_levels() -> impl Iterator<Item = f64> {
    (0..CPM_TABLE.len()).map(|idx| (idx as f64 + 2.0) / 2.0)
}
