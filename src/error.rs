use thiserror::Error;

/// Load-time failures. The per-tick path never produces one of these.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("engine has no propellants")]
    NoPropellants,

    #[error("no resource definition for propellant '{0}'")]
    UnknownResource(String),

    #[error("propellant '{name}' has invalid ratio {ratio}")]
    InvalidRatio { name: String, ratio: f64 },

    #[error("resource '{name}' has invalid density {density}")]
    InvalidDensity { name: String, density: f64 },

    #[error("propellant '{0}' listed more than once")]
    DuplicatePropellant(String),

    #[error("unknown central body '{0}'")]
    UnknownBody(String),
}

pub type Result<T> = std::result::Result<T, Error>;
