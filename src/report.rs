use colored::Colorize;
use std::fmt::Write;

use crate::combat::{CycleBreakdown, Environment};
use crate::iv_search::{EffectiveStats, IndividualValues, IvMatch};
use crate::moveset::RankedMoveset;
use crate::pokemon::{ChargedMove, CreatureTypes, FastMove, Move, Pokemon, PvpFastMove};
use crate::types::DefensiveProfile;
use crate::weather::{weathers_boosting, Weather};

fn heading(output: &mut String, title: &str) {
    writeln!(output, "{}", format!("=== {} ===", title).bold()).unwrap();
}

fn format_types(types: &CreatureTypes) -> String {
    match types.secondary {
        Some(secondary) => format!("{} / {}", types.primary, secondary),
        None => types.primary.to_string(),
    }
}

pub fn visualize_cp(
    pokemon: &Pokemon,
    ivs: &IndividualValues,
    level: f64,
    cp: u32,
    stats: &EffectiveStats,
    max_cp: u32,
) -> String {
    let mut output = String::new();

    heading(&mut output, &pokemon.display_name());
    writeln!(
        &mut output,
        "Base stats: {} / {} / {}",
        pokemon.base_attack, pokemon.base_defense, pokemon.base_stamina
    )
    .unwrap();
    writeln!(
        &mut output,
        "IVs: {} / {} / {}",
        ivs.attack, ivs.defense, ivs.stamina
    )
    .unwrap();
    writeln!(&mut output, "Level: {}", level).unwrap();
    writeln!(&mut output, "CP: {}", cp.to_string().green().bold()).unwrap();
    writeln!(&mut output, "Attack: {:.2}", stats.attack).unwrap();
    writeln!(&mut output, "Defense: {:.2}", stats.defense).unwrap();
    writeln!(&mut output, "HP: {}", stats.hp).unwrap();
    writeln!(&mut output, "Max CP (level 50, 15/15/15): {}", max_cp).unwrap();

    output
}

pub fn visualize_iv_matches(
    pokemon: &Pokemon,
    target_cp: u32,
    matches: &[IvMatch],
    limit: usize,
) -> String {
    let mut output = String::new();

    heading(
        &mut output,
        &format!("{} at CP {}", pokemon.display_name(), target_cp),
    );
    if matches.is_empty() {
        writeln!(&mut output, "No IV/level combination produces this CP.").unwrap();
        return output;
    }

    writeln!(
        &mut output,
        "{:>5} {:>5} {:>5} {:>6} {:>5} {:>5}",
        "ATK", "DEF", "HP", "Level", "Sum", "%"
    )
    .unwrap();
    for m in matches.iter().take(limit) {
        writeln!(
            &mut output,
            "{:>5} {:>5} {:>5} {:>6} {:>5} {:>5}",
            m.attack_iv, m.defense_iv, m.stamina_iv, m.level, m.sum_iv, m.percent
        )
        .unwrap();
    }
    if matches.len() > limit {
        writeln!(
            &mut output,
            "... {} more (showing {} of {})",
            matches.len() - limit,
            limit,
            matches.len()
        )
        .unwrap();
    }

    output
}

pub fn visualize_cycle(
    pokemon: &Pokemon,
    types: &CreatureTypes,
    fast: &FastMove,
    charged: &ChargedMove,
    env: &Environment,
    cycle: &CycleBreakdown,
) -> String {
    let mut output = String::new();
    let stats = cycle.stats();

    heading(&mut output, &pokemon.display_name());
    writeln!(&mut output, "Types: {}", format_types(types)).unwrap();
    writeln!(
        &mut output,
        "Level: {}  Weather: {}{}",
        env.attacker_level,
        env.weather,
        if env.apply_weather_bonus { "" } else { " (bonus off)" }
    )
    .unwrap();

    writeln!(&mut output, "\nFast: {} ({})", fast.name, fast.move_type).unwrap();
    writeln!(
        &mut output,
        "  Power {}  Energy {}  Duration {}s  STAB x{}  Weather x{}  Damage {:.2}",
        fast.power,
        fast.energy_delta,
        fast.duration_seconds(),
        cycle.fast_stab,
        cycle.fast_weather_bonus,
        cycle.fast_damage
    )
    .unwrap();
    writeln!(&mut output, "Charged: {} ({})", charged.name, charged.move_type).unwrap();
    writeln!(
        &mut output,
        "  Power {}  Energy {}  Duration {}s  STAB x{}  Weather x{}  Damage {:.2}",
        charged.power,
        charged.energy_delta,
        charged.duration_seconds(),
        cycle.charged_stab,
        cycle.charged_weather_bonus,
        cycle.charged_damage
    )
    .unwrap();

    writeln!(
        &mut output,
        "\nCycle: {} fast moves + 1 charged move, {:.2} damage in {:.2}s",
        cycle.fast_moves_per_cycle, cycle.cycle_damage, cycle.cycle_time
    )
    .unwrap();
    writeln!(&mut output, "DPS: {}", format!("{:.2}", stats.dps).bold()).unwrap();
    writeln!(&mut output, "TDO: {}", format!("{:.2}", stats.tdo).bold()).unwrap();
    writeln!(&mut output, "Score: {}", format!("{:.2}", stats.score).bold()).unwrap();

    output
}

pub fn visualize_rankings(title: &str, rankings: &[RankedMoveset], limit: usize) -> String {
    let mut output = String::new();

    heading(&mut output, title);
    if rankings.is_empty() {
        writeln!(&mut output, "No moveset qualifies.").unwrap();
        return output;
    }

    writeln!(
        &mut output,
        "{:>4}  {:<28} {:<20} {:<20} {:>8} {:>8} {:>8}",
        "#", "Pokemon", "Fast", "Charged", "DPS", "TDO", "Score"
    )
    .unwrap();
    for (rank, entry) in rankings.iter().take(limit).enumerate() {
        writeln!(
            &mut output,
            "{:>4}  {:<28} {:<20} {:<20} {:>8.2} {:>8.2} {:>8.2}",
            rank + 1,
            entry.pokemon.display_name(),
            entry.fast_move.name,
            entry.charged_move.name,
            entry.stats.dps,
            entry.stats.tdo,
            entry.stats.score
        )
        .unwrap();
    }

    output
}

fn write_move_rows(output: &mut String, moves: &[&Move]) {
    writeln!(
        output,
        "{:<24} {:<10} {:>6} {:>7} {:>9} {:>8}",
        "Move", "Type", "Power", "Energy", "Duration", "DPS"
    )
    .unwrap();
    for m in moves {
        writeln!(
            output,
            "{:<24} {:<10} {:>6} {:>7} {:>8.1}s {:>8.2}",
            m.name,
            m.move_type,
            m.power,
            m.energy_delta.unsigned_abs(),
            m.duration_seconds(),
            m.damage_per_second()
        )
        .unwrap();
    }
}

pub fn visualize_move_table(fast_moves: &[&FastMove], charged_moves: &[&ChargedMove]) -> String {
    let mut output = String::new();

    heading(&mut output, "Fast moves");
    let fast: Vec<&Move> = fast_moves.iter().map(|m| &m.0).collect();
    write_move_rows(&mut output, &fast);

    writeln!(&mut output).unwrap();
    heading(&mut output, "Charged moves");
    let charged: Vec<&Move> = charged_moves.iter().map(|m| &m.0).collect();
    write_move_rows(&mut output, &charged);

    output
}

pub fn visualize_pvp_fast_moves(moves: &[PvpFastMove]) -> String {
    let mut output = String::new();

    heading(&mut output, "Fast moves in trainer battles");
    if moves.is_empty() {
        writeln!(&mut output, "No trainer-battle move data loaded.").unwrap();
        return output;
    }

    writeln!(
        &mut output,
        "{:<24} {:<10} {:>6} {:>7} {:>6} {:>6} {:>6}",
        "Move", "Type", "Power", "Energy", "Turns", "EPT", "DPT"
    )
    .unwrap();
    for m in moves {
        writeln!(
            &mut output,
            "{:<24} {:<10} {:>6} {:>7} {:>6} {:>6.2} {:>6.2}",
            m.name,
            m.move_type,
            m.power,
            m.energy_delta,
            m.turns,
            m.ept(),
            m.dpt()
        )
        .unwrap();
    }

    output
}

pub fn visualize_defensive_profile(profile: &DefensiveProfile) -> String {
    let mut output = String::new();
    let types = CreatureTypes {
        primary: profile.primary,
        secondary: profile.secondary,
    };

    heading(&mut output, &format!("{} defense", format_types(&types)));

    writeln!(&mut output, "Weak to:").unwrap();
    if profile.weaknesses.is_empty() {
        writeln!(&mut output, "  (none)").unwrap();
    }
    for entry in &profile.weaknesses {
        writeln!(
            &mut output,
            "  {:<10} x{}",
            entry.attacking_type,
            format!("{:.3}", entry.multiplier).red()
        )
        .unwrap();
    }

    writeln!(&mut output, "Resists:").unwrap();
    if profile.resistances.is_empty() {
        writeln!(&mut output, "  (none)").unwrap();
    }
    for entry in &profile.resistances {
        writeln!(
            &mut output,
            "  {:<10} x{}",
            entry.attacking_type,
            format!("{:.3}", entry.multiplier).green()
        )
        .unwrap();
    }

    let boosting = weathers_boosting(&types.as_vec());
    let names: Vec<String> = boosting.iter().map(|w| w.to_string()).collect();
    writeln!(&mut output, "Weather boost: {}", names.join(", ")).unwrap();

    output
}

pub fn visualize_perfect_odds(iv_floor: u8, odds: u32) -> String {
    let mut output = String::new();

    heading(&mut output, &format!("IV floor {}", iv_floor));
    writeln!(&mut output, "Chance of 15/15/15: 1 in {}", odds).unwrap();

    output
}

pub fn visualize_weather(weather: Weather) -> String {
    let mut output = String::new();

    heading(&mut output, &weather.to_string());
    let boosted = weather.boosted_types();
    if boosted.is_empty() {
        writeln!(&mut output, "Boosts no types.").unwrap();
    } else {
        let names: Vec<String> = boosted.iter().map(|t| t.to_string()).collect();
        writeln!(&mut output, "Boosts: {}", names.join(", ")).unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{defensive_profile, PokemonType};

    #[test]
    fn test_iv_report_truncates_to_limit() {
        colored::control::set_override(false);
        let pokemon = Pokemon::new(248, "Tyranitar", 198, 189, 190);
        let m = IvMatch {
            attack_iv: 15,
            defense_iv: 15,
            stamina_iv: 15,
            level: 40.0,
            sum_iv: 45,
            percent: 100,
        };
        let output = visualize_iv_matches(&pokemon, 3000, &[m, m, m], 2);
        assert!(output.contains("Tyranitar at CP 3000"));
        assert!(output.contains("... 1 more (showing 2 of 3)"));

        let output = visualize_iv_matches(&pokemon, 3000, &[], 2);
        assert!(output.contains("No IV/level combination"));
    }

    #[test]
    fn test_defensive_profile_report() {
        colored::control::set_override(false);
        let output = visualize_defensive_profile(&defensive_profile(
            PokemonType::ROCK,
            Some(PokemonType::DARK),
        ));
        assert!(output.contains("Rock / Dark defense"));
        assert!(output.contains("Fighting   x2.560"));
        assert!(output.contains("Psychic    x0.391"));
        assert!(output.contains("Weather boost: Partly Cloudy, Fog"));
    }

    #[test]
    fn test_cycle_and_ranking_reports() {
        use crate::combat::compute_cycle;
        use crate::moveset::select_best_moveset;

        colored::control::set_override(false);
        let pokemon = Pokemon::new(248, "Tyranitar", 198, 189, 190);
        let types = CreatureTypes::dual(PokemonType::ROCK, PokemonType::DARK);
        let fast = FastMove::new("Bite", PokemonType::DARK, 12.0, 8, 500).unwrap();
        let charged = ChargedMove::new("Crunch", PokemonType::DARK, 100.0, -50, 2700).unwrap();
        let env = Environment::default();

        let cycle = compute_cycle(&pokemon, &types, &fast, &charged, &env).unwrap();
        let output = visualize_cycle(&pokemon, &types, &fast, &charged, &env, &cycle);
        assert!(output.contains("Types: Rock / Dark"));
        assert!(output.contains("Cycle: 7 fast moves + 1 charged move"));
        assert!(output.contains("DPS: 18.58"));
        assert!(output.contains("Score: 37.01"));

        let best = select_best_moveset(&pokemon, &types, &[fast], &[charged], None).unwrap();
        let output = visualize_rankings("Top attackers", &[best], 10);
        assert!(output.contains("=== Top attackers ==="));
        assert!(output.contains("Tyranitar"));
        assert!(visualize_rankings("Top attackers", &[], 10).contains("No moveset qualifies."));
    }

    #[test]
    fn test_cp_report() {
        colored::control::set_override(false);
        let pokemon = Pokemon::new(248, "Tyranitar", 198, 189, 190);
        let ivs = IndividualValues::new(10, 12, 5).unwrap();
        let stats = EffectiveStats {
            attack: 164.38,
            defense: 158.85,
            hp: 154,
        };
        let output = visualize_cp(&pokemon, &ivs, 40.0, 2571, &stats, 3075);
        assert!(output.contains("IVs: 10 / 12 / 5"));
        assert!(output.contains("CP: 2571"));
        assert!(output.contains("Max CP (level 50, 15/15/15): 3075"));
    }

    #[test]
    fn test_move_tables() {
        colored::control::set_override(false);
        let fast = FastMove::new("Bite", PokemonType::DARK, 6.0, 4, 500).unwrap();
        let charged = ChargedMove::new("Crunch", PokemonType::DARK, 70.0, -33, 3200).unwrap();
        let output = visualize_move_table(&[&fast], &[&charged]);
        assert!(output.contains("=== Charged moves ==="));
        assert!(output.contains("12.00"));
        assert!(output.contains("21.88"));

        let counter = PvpFastMove::new("Counter", PokemonType::FIGHTING, 8.0, 7, 2).unwrap();
        let output = visualize_pvp_fast_moves(&[counter]);
        assert!(output.contains("3.50"));
        assert!(output.contains("4.00"));
        assert!(visualize_pvp_fast_moves(&[]).contains("No trainer-battle move data"));
    }

    #[test]
    fn test_weather_report() {
        colored::control::set_override(false);
        assert!(visualize_weather(Weather::CLEAR).contains("Boosts no types."));
        assert!(visualize_weather(Weather::SNOW).contains("Boosts: Ice, Steel"));
    }
}
