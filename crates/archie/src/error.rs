use thiserror::Error;

use std::io;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[cfg(feature = "json")]
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn message(msg: impl Into<String>) -> Self {
        Error::Message(msg.into())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
