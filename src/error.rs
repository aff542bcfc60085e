use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("key cannot be empty")]
    EmptyKey,

    #[error("cannot convert value {value:?} of key {key:?} to {target}")]
    Conversion {
        key: String,
        value: String,
        target: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}
