use crate::define_enum_with_from_str;
use crate::types::PokemonType;

define_enum_with_from_str! {
    /// In-game weather conditions. `CLEAR` boosts nothing.
    Weather {
        CLEAR => "Clear",
        SUNNY => "Sunny",
        RAINY => "Rainy",
        PARTLY_CLOUDY => "Partly Cloudy",
        CLOUDY => "Cloudy",
        WINDY => "Windy",
        SNOW => "Snow",
        FOG => "Fog",
    },
    error = UnknownWeather
}

impl Default for Weather {
    fn default() -> Weather {
        Weather::CLEAR
    }
}

pub const WEATHER_BOOST: f64 = 1.2;

impl Weather {
    pub fn boosted_types(&self) -> &'static [PokemonType] {
        use PokemonType::*;
        match self {
            Weather::CLEAR => &[],
            Weather::SUNNY => &[FIRE, GRASS, GROUND],
            Weather::RAINY => &[WATER, ELECTRIC, BUG],
            Weather::PARTLY_CLOUDY => &[NORMAL, ROCK],
            Weather::CLOUDY => &[FAIRY, FIGHTING, POISON],
            Weather::WINDY => &[DRAGON, FLYING, PSYCHIC],
            Weather::SNOW => &[ICE, STEEL],
            Weather::FOG => &[DARK, GHOST],
        }
    }

    pub fn boosts(&self, pokemon_type: PokemonType) -> bool {
        self.boosted_types().contains(&pokemon_type)
    }
}

/// Every weather that boosts at least one of `types`, in declaration order.
pub fn weathers_boosting(types: &[PokemonType]) -> Vec<Weather> {
    Weather::ALL
        .iter()
        .copied()
        .filter(|weather| types.iter().any(|t| weather.boosts(*t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_weather_names() {
        assert_eq!(Weather::from_str("Partly Cloudy").unwrap(), Weather::PARTLY_CLOUDY);
        assert_eq!(Weather::from_str("partly-cloudy").unwrap(), Weather::PARTLY_CLOUDY);
        assert_eq!(Weather::from_str("snow").unwrap(), Weather::SNOW);
        assert!(Weather::from_str("hail").is_err());
        assert_eq!(Weather::PARTLY_CLOUDY.to_string(), "Partly Cloudy");
    }

    #[test]
    fn test_every_type_is_boosted_exactly_once() {
        for pokemon_type in PokemonType::ALL.iter() {
            let boosting = weathers_boosting(&[*pokemon_type]);
            assert_eq!(boosting.len(), 1, "{} boosted by {:?}", pokemon_type, boosting);
        }
    }

    #[test]
    fn test_clear_boosts_nothing() {
        assert!(Weather::CLEAR.boosted_types().is_empty());
        assert!(!Weather::CLEAR.boosts(PokemonType::FIRE));
        assert_eq!(Weather::default(), Weather::CLEAR);
    }

    #[test]
    fn test_weathers_boosting_dual_type() {
        let boosting = weathers_boosting(&[PokemonType::ROCK, PokemonType::DARK]);
        assert_eq!(boosting, vec![Weather::PARTLY_CLOUDY, Weather::FOG]);
    }
}
