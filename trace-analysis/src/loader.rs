use ephys_common::recording::{OnsetFile, RecordingFile};
use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot Open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot Parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
        path: path.to_owned(),
        source,
    })
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_recording(path: &Path) -> Result<RecordingFile, LoadError> {
    load_json(path)
}

pub fn load_onsets(path: &Path) -> Result<OnsetFile, LoadError> {
    load_json(path)
}
