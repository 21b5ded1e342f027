use crate::flight::Flight;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {cause}")]
    Open {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("malformed flight data: {0}")]
    Format(#[from] csv::Error),
}

/// Reads every flight from a CSV source, in file order.
pub fn read_flights<R: Read>(reader: R) -> Result<Vec<Flight>, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let flights = rdr
        .deserialize::<Flight>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(flights)
}

pub fn load_flights(path: &Path) -> Result<Vec<Flight>, DatasetError> {
    let file = File::open(path).map_err(|cause| DatasetError::Open {
        path: path.to_path_buf(),
        cause,
    })?;
    let flights = read_flights(file)?;
    debug!("loaded {} flights from {}", flights.len(), path.display());
    Ok(flights)
}
