use std::fmt;

#[derive(Debug)]
pub enum DecorationError {
    Config(String),
    Replay(String),
    Io(String),
}

impl fmt::Display for DecorationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecorationError::Config(msg) => write!(f, "config error: {msg}"),
            DecorationError::Replay(msg) => write!(f, "replay error: {msg}"),
            DecorationError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for DecorationError {}

pub type Result<T> = std::result::Result<T, DecorationError>;
