use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("fast move does not generate energy: {name} (energy delta {energy_delta})")]
    FastMoveGainsNoEnergy { name: String, energy_delta: i32 },

    #[error("move has zero duration: {0}")]
    ZeroDuration(String),

    #[error("trainer-battle move has zero turns: {0}")]
    ZeroTurns(String),

    #[error("invalid move {name}: {reason}")]
    InvalidMove { name: String, reason: String },

    #[error("calculation produced a non-finite {quantity}")]
    NonFinite { quantity: &'static str },

    #[error("IV out of range (0-15): {0}")]
    InvalidIv(u8),

    #[error("level is not a tabulated half-level between 1 and 51: {0}")]
    InvalidLevel(f64),

    #[error("unknown Pokemon: {0}")]
    UnknownPokemon(String),

    #[error("unknown move: {0}")]
    UnknownMove(String),

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("unknown weather: {0}")]
    UnknownWeather(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
