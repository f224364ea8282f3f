use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::combat::{compute_cycle, CombatStats, CycleBreakdown, Environment, DEFAULT_ATTACKER_LEVEL};
use crate::dex::Pokedex;
use crate::error::Result;
use crate::iv_search::{
    compute_cp, effective_stats, find_iv_level_combinations, max_cp, perfect_iv_odds,
    EffectiveStats, IndividualValues,
};
use crate::moveset::{all_movesets, rank_attackers, select_best_moveset_with, RankedMoveset};
use crate::pokemon::{ChargedMove, FastMove, Move, Pokemon, PvpFastMove};
use crate::report;
use crate::types::{defensive_profile, PokemonType};
use crate::weather::Weather;

const DEFAULT_LOG_FILTER: &str = "pogo_engine=warn";

#[derive(Parser)]
#[command(name = "pogo-engine")]
#[command(about = "Combat stats and IV search for Pokemon GO", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the game data JSON snapshots
    #[clap(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Print JSON instead of a text report
    #[clap(long, default_value_t = false, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// CP and in-battle stats for given IVs and level
    Cp {
        pokemon: String,
        #[clap(short, long)]
        form: Option<String>,
        #[clap(short, long, default_value_t = DEFAULT_ATTACKER_LEVEL)]
        level: f64,
        #[clap(short = 'a', long, default_value_t = 15)]
        attack_iv: u8,
        #[clap(short = 'd', long, default_value_t = 15)]
        defense_iv: u8,
        #[clap(short = 's', long, default_value_t = 15)]
        stamina_iv: u8,
    },

    /// Every IV and level combination producing a CP
    Iv {
        pokemon: String,
        cp: u32,
        #[clap(short, long)]
        form: Option<String>,
        #[clap(long, default_value_t = 200)]
        limit: usize,
    },

    /// DPS, TDO and score of one moveset
    Dps {
        pokemon: String,
        fast: String,
        charged: String,
        #[clap(short, long)]
        form: Option<String>,
        #[clap(short, long, default_value_t = DEFAULT_ATTACKER_LEVEL)]
        level: f64,
        #[clap(short, long, default_value_t = Weather::CLEAR)]
        weather: Weather,
        #[clap(long, default_value_t = false)]
        no_weather_bonus: bool,
    },

    /// Best moveset of one Pokemon
    Best {
        pokemon: String,
        #[clap(short, long)]
        form: Option<String>,
        /// Only movesets with at least one move of this type
        #[clap(short = 't', long = "type")]
        filter_type: Option<PokemonType>,
        #[clap(short, long, default_value_t = false)]
        elite: bool,
        #[clap(short, long, default_value_t = DEFAULT_ATTACKER_LEVEL)]
        level: f64,
        #[clap(short, long, default_value_t = Weather::CLEAR)]
        weather: Weather,
    },

    /// Every valid moveset of one Pokemon, by score
    Movesets {
        pokemon: String,
        #[clap(short, long)]
        form: Option<String>,
        #[clap(short, long, default_value_t = false)]
        elite: bool,
        #[clap(short, long, default_value_t = DEFAULT_ATTACKER_LEVEL)]
        level: f64,
        #[clap(short, long, default_value_t = Weather::CLEAR)]
        weather: Weather,
        #[clap(long, default_value_t = false)]
        no_weather_bonus: bool,
    },

    /// Move tables with damage per second
    Moves {
        /// Fast moves as used in trainer battles, per turn
        #[clap(long, default_value_t = false)]
        trainer: bool,
    },

    /// Best attackers in the dex, by score
    Rank {
        #[clap(short = 't', long = "type")]
        filter_type: Option<PokemonType>,
        #[clap(long, default_value_t = 10)]
        limit: usize,
        #[clap(short, long, default_value_t = false)]
        elite: bool,
        #[clap(short, long, default_value_t = DEFAULT_ATTACKER_LEVEL)]
        level: f64,
        #[clap(short, long, default_value_t = Weather::CLEAR)]
        weather: Weather,
    },

    /// Weaknesses and resistances of a type combination
    Types {
        primary: PokemonType,
        secondary: Option<PokemonType>,
    },

    /// Types boosted by a weather
    Weather { weather: Weather },

    /// Odds of a 15/15/15 with a minimum IV per stat
    Odds {
        #[clap(default_value_t = 0)]
        iv_floor: u8,
    },
}

#[derive(Serialize)]
struct CpOutput<'a> {
    pokemon: &'a Pokemon,
    ivs: IndividualValues,
    level: f64,
    cp: u32,
    stats: EffectiveStats,
    max_cp: u32,
}

#[derive(Serialize)]
struct DpsOutput<'a> {
    pokemon: &'a Pokemon,
    fast_move: &'a FastMove,
    charged_move: &'a ChargedMove,
    environment: Environment,
    breakdown: &'a CycleBreakdown,
    stats: CombatStats,
}

#[derive(Serialize)]
struct MoveOutput<'a> {
    #[serde(flatten)]
    attack: &'a Move,
    dps: f64,
}

impl<'a> MoveOutput<'a> {
    fn new(attack: &'a Move) -> Self {
        MoveOutput {
            attack,
            dps: attack.damage_per_second(),
        }
    }
}

#[derive(Serialize)]
struct MoveTableOutput<'a> {
    fast_moves: Vec<MoveOutput<'a>>,
    charged_moves: Vec<MoveOutput<'a>>,
}

#[derive(Serialize)]
struct PvpMoveOutput<'a> {
    #[serde(flatten)]
    attack: &'a PvpFastMove,
    ept: f64,
    dpt: f64,
}

#[derive(Serialize)]
struct WeatherOutput {
    weather: Weather,
    boosted_types: &'static [PokemonType],
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_dex(cli: &Cli) -> Result<Pokedex> {
    Pokedex::from_dir(&cli.data_dir)
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Cp {
            pokemon,
            form,
            level,
            attack_iv,
            defense_iv,
            stamina_iv,
        } => {
            let dex = load_dex(&cli)?;
            let pokemon = dex.find_pokemon(pokemon, form.as_deref())?;
            let ivs = IndividualValues::new(*attack_iv, *defense_iv, *stamina_iv)?;
            let cp = compute_cp(pokemon, &ivs, *level)?;
            let stats = effective_stats(pokemon, &ivs, *level)?;
            let max = max_cp(pokemon);
            if cli.json {
                print_json(&CpOutput {
                    pokemon,
                    ivs,
                    level: *level,
                    cp,
                    stats,
                    max_cp: max,
                })?;
            } else {
                print!("{}", report::visualize_cp(pokemon, &ivs, *level, cp, &stats, max));
            }
        }
        Command::Iv {
            pokemon,
            cp,
            form,
            limit,
        } => {
            let dex = load_dex(&cli)?;
            let pokemon = dex.find_pokemon(pokemon, form.as_deref())?;
            let matches = find_iv_level_combinations(pokemon, *cp);
            if cli.json {
                print_json(&matches)?;
            } else {
                print!("{}", report::visualize_iv_matches(pokemon, *cp, &matches, *limit));
            }
        }
        Command::Dps {
            pokemon,
            fast,
            charged,
            form,
            level,
            weather,
            no_weather_bonus,
        } => {
            let dex = load_dex(&cli)?;
            let pokemon = dex.find_pokemon(pokemon, form.as_deref())?;
            let types = dex.types_of(pokemon);
            let fast = dex.fast_move(fast)?;
            let charged = dex.charged_move(charged)?;
            let mut env = Environment::default().with_level(*level).with_weather(*weather);
            if *no_weather_bonus {
                env = env.without_weather_bonus();
            }
            let cycle = compute_cycle(pokemon, &types, fast, charged, &env)?;
            if cli.json {
                print_json(&DpsOutput {
                    pokemon,
                    fast_move: fast,
                    charged_move: charged,
                    environment: env,
                    breakdown: &cycle,
                    stats: cycle.stats(),
                })?;
            } else {
                print!(
                    "{}",
                    report::visualize_cycle(pokemon, &types, fast, charged, &env, &cycle)
                );
            }
        }
        Command::Best {
            pokemon,
            form,
            filter_type,
            elite,
            level,
            weather,
        } => {
            let dex = load_dex(&cli)?;
            let pokemon = dex.find_pokemon(pokemon, form.as_deref())?;
            let types = dex.types_of(pokemon);
            let (fast_moves, charged_moves) = dex.movepool_for(pokemon, *elite);
            let env = Environment::default().with_level(*level).with_weather(*weather);
            let best = select_best_moveset_with(
                pokemon,
                &types,
                &fast_moves,
                &charged_moves,
                *filter_type,
                &env,
            );
            if cli.json {
                print_json(&best)?;
            } else {
                let rankings: Vec<RankedMoveset> = best.into_iter().collect();
                let title = format!("Best moveset for {}", pokemon.display_name());
                print!("{}", report::visualize_rankings(&title, &rankings, 1));
            }
        }
        Command::Movesets {
            pokemon,
            form,
            elite,
            level,
            weather,
            no_weather_bonus,
        } => {
            let dex = load_dex(&cli)?;
            let pokemon = dex.find_pokemon(pokemon, form.as_deref())?;
            let types = dex.types_of(pokemon);
            let (fast_moves, charged_moves) = dex.movepool_for(pokemon, *elite);
            let mut env = Environment::default().with_level(*level).with_weather(*weather);
            if *no_weather_bonus {
                env = env.without_weather_bonus();
            }
            let movesets = all_movesets(pokemon, &types, &fast_moves, &charged_moves, &env);
            if cli.json {
                print_json(&movesets)?;
            } else {
                let title = format!("Movesets for {}", pokemon.display_name());
                print!(
                    "{}",
                    report::visualize_rankings(&title, &movesets, movesets.len())
                );
            }
        }
        Command::Moves { trainer: true } => {
            let dex = load_dex(&cli)?;
            let moves = dex.pvp_fast_moves();
            if cli.json {
                let output: Vec<PvpMoveOutput> = moves
                    .iter()
                    .map(|m| PvpMoveOutput {
                        attack: m,
                        ept: m.ept(),
                        dpt: m.dpt(),
                    })
                    .collect();
                print_json(&output)?;
            } else {
                print!("{}", report::visualize_pvp_fast_moves(moves));
            }
        }
        Command::Moves { trainer: false } => {
            let dex = load_dex(&cli)?;
            let fast_moves = dex.fast_moves();
            let charged_moves = dex.charged_moves();
            if cli.json {
                print_json(&MoveTableOutput {
                    fast_moves: fast_moves.iter().map(|m| MoveOutput::new(m)).collect(),
                    charged_moves: charged_moves.iter().map(|m| MoveOutput::new(m)).collect(),
                })?;
            } else {
                print!(
                    "{}",
                    report::visualize_move_table(&fast_moves, &charged_moves)
                );
            }
        }
        Command::Rank {
            filter_type,
            limit,
            elite,
            level,
            weather,
        } => {
            let dex = load_dex(&cli)?;
            let env = Environment::default().with_level(*level).with_weather(*weather);
            let mut rankings = rank_attackers(&dex, *filter_type, &env, *elite);
            rankings.truncate(*limit);
            if cli.json {
                print_json(&rankings)?;
            } else {
                let title = match filter_type {
                    Some(t) => format!("Top {} attackers", t),
                    None => "Top attackers".to_string(),
                };
                print!("{}", report::visualize_rankings(&title, &rankings, *limit));
            }
        }
        Command::Types { primary, secondary } => {
            let profile = defensive_profile(*primary, *secondary);
            if cli.json {
                print_json(&profile)?;
            } else {
                print!("{}", report::visualize_defensive_profile(&profile));
            }
        }
        Command::Weather { weather } => {
            if cli.json {
                print_json(&WeatherOutput {
                    weather: *weather,
                    boosted_types: weather.boosted_types(),
                })?;
            } else {
                print!("{}", report::visualize_weather(*weather));
            }
        }
        Command::Odds { iv_floor } => {
            let odds = perfect_iv_odds(*iv_floor)?;
            if cli.json {
                print_json(&odds)?;
            } else {
                print!("{}", report::visualize_perfect_odds(*iv_floor, odds));
            }
        }
    }
    Ok(())
}

pub fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(data_dir = %cli.data_dir.display(), "starting");

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dps_arguments() {
        let cli = Cli::parse_from([
            "pogo-engine",
            "dps",
            "Tyranitar",
            "Bite",
            "Crunch",
            "--weather",
            "partly-cloudy",
            "--no-weather-bonus",
        ]);
        match cli.command {
            Command::Dps {
                weather,
                no_weather_bonus,
                level,
                ..
            } => {
                assert_eq!(weather, Weather::PARTLY_CLOUDY);
                assert!(no_weather_bonus);
                assert_eq!(level, 40.0);
            }
            _ => panic!("expected dps"),
        }
        assert_eq!(cli.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_parse_movesets_arguments() {
        let cli = Cli::parse_from([
            "pogo-engine",
            "--json",
            "movesets",
            "Tyranitar",
            "--elite",
            "--level",
            "35",
            "-w",
            "rainy",
        ]);
        assert!(cli.json);
        match cli.command {
            Command::Movesets {
                pokemon,
                elite,
                level,
                weather,
                no_weather_bonus,
                ..
            } => {
                assert_eq!(pokemon, "Tyranitar");
                assert!(elite);
                assert_eq!(level, 35.0);
                assert_eq!(weather, Weather::RAINY);
                assert!(!no_weather_bonus);
            }
            _ => panic!("expected movesets"),
        }
    }

    #[test]
    fn test_parse_moves_arguments() {
        let cli = Cli::parse_from(["pogo-engine", "moves", "--trainer"]);
        assert!(matches!(cli.command, Command::Moves { trainer: true }));
        let cli = Cli::parse_from(["pogo-engine", "moves"]);
        assert!(matches!(cli.command, Command::Moves { trainer: false }));
    }

    #[test]
    fn test_move_output_carries_dps() {
        let hydro_pump = Move::new("Hydro Pump", PokemonType::WATER, 130.0, -75, 3300).unwrap();
        let value = serde_json::to_value(MoveOutput::new(&hydro_pump)).unwrap();
        assert_eq!(value["name"], "Hydro Pump");
        assert_eq!(value["duration"], 3300);
        assert_eq!(value["dps"], 39.39);
    }

    #[test]
    fn test_parse_types_arguments() {
        let cli = Cli::parse_from(["pogo-engine", "--json", "types", "rock", "DARK"]);
        assert!(cli.json);
        match cli.command {
            Command::Types { primary, secondary } => {
                assert_eq!(primary, PokemonType::ROCK);
                assert_eq!(secondary, Some(PokemonType::DARK));
            }
            _ => panic!("expected types"),
        }
    }
}
