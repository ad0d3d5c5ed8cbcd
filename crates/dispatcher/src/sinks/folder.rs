//! FolderSink - writes one file per batch into its own output folder

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use contracts::{ContractError, DataSink, IoOp, ParsedBatch, WriteReport};
use tracing::{debug, instrument};

use super::encoder::BatchEncoder;

/// Sink that writes `<dir>/<base_name>.<ext>` per batch
pub struct FolderSink<E> {
    name: String,
    dir: PathBuf,
    encoder: E,
    dir_ready: bool,
}

impl<E: BatchEncoder> FolderSink<E> {
    /// Create a new FolderSink. The folder is created on first write.
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, encoder: E) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            encoder,
            dir_ready: false,
        }
    }

    /// Output path for a batch
    pub fn target_path(&self, batch: &ParsedBatch) -> PathBuf {
        self.dir
            .join(format!("{}.{}", batch.base_name(), self.encoder.extension()))
    }

    /// Create the output folder if needed. An existing folder is fine.
    fn ensure_dir(&mut self) -> Result<(), ContractError> {
        if self.dir_ready {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)
            .map_err(|e| ContractError::io(IoOp::CreateDir, &self.dir, e))?;
        debug!(sink = %self.name, dir = %self.dir.display(), "Output folder ready");
        self.dir_ready = true;
        Ok(())
    }

    fn persist(&self, path: &Path, bytes: &[u8]) -> Result<(), ContractError> {
        let mut file = File::create(path).map_err(|e| ContractError::io(IoOp::Create, path, e))?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|e| ContractError::io(IoOp::Write, path, e))
    }
}

impl<E: BatchEncoder> DataSink for FolderSink<E> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "folder_sink_write",
        skip(self, batch),
        fields(sink = %self.name, batch = batch.base_name())
    )]
    async fn write(&mut self, batch: &ParsedBatch) -> Result<WriteReport, ContractError> {
        self.ensure_dir()?;

        let path = self.target_path(batch);
        let bytes = self
            .encoder
            .encode(batch.tracks())
            .map_err(|message| ContractError::serialization(&path, message))?;
        self.persist(&path, &bytes)?;

        Ok(WriteReport {
            path,
            records: batch.len(),
            bytes: bytes.len(),
        })
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, "FolderSink closed");
        Ok(())
    }
}
