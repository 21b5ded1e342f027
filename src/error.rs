use crate::config::ConfigError;
use crate::dataset::DatasetError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {message}: {cause}")]
    IO { message: String, cause: io::Error },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Rest(#[from] crate::rest::Error),
    #[error("console error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
