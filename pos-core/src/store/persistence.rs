//! JSON snapshots of the store state
//!
//! A snapshot is the whole [`StoreState`] serialized with serde_json. Writes
//! go to a temp file in the target directory which is then renamed over the
//! previous snapshot, so a crash mid-write leaves the old file intact.

use super::StoreState;
use shared::error::{AppError, ErrorCode};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to replace snapshot: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl From<PersistenceError> for AppError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Serialization(e) => {
                AppError::with_message(ErrorCode::StorageCorrupted, e.to_string())
            }
            other => AppError::with_message(ErrorCode::StorageError, other.to_string()),
        }
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Write `state` to `path`, creating the parent directory if needed
pub fn save_snapshot(path: &Path, state: &StoreState) -> PersistenceResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    tracing::debug!(path = %path.display(), sales = state.sales.len(), "Snapshot saved");
    Ok(())
}

/// Read a snapshot and rebuild the derived balances
pub fn load_snapshot(path: &Path) -> PersistenceResult<StoreState> {
    let file = fs::File::open(path)?;
    let mut state: StoreState = serde_json::from_reader(BufReader::new(file))?;
    state.rebuild_balances();

    tracing::debug!(
        path = %path.display(),
        movements = state.cash_movements.len(),
        "Snapshot loaded"
    );
    Ok(state)
}
