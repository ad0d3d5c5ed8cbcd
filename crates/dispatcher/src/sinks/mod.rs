//! Sink implementations
//!
//! Every sink is a `FolderSink` paired with the encoder for its type.

mod encoder;
mod folder;

use std::path::Path;

use contracts::{SinkConfig, SinkType};

use crate::error::DispatcherError;
use crate::handle::{SinkHandle, Supervision};

pub use self::encoder::{BatchEncoder, JsonEncoder, LinkListEncoder, DEFAULT_LINK_PREFIX};
pub use self::folder::FolderSink;

/// Build the sink described by `config` and spawn its worker
pub fn spawn_sink(
    config: &SinkConfig,
    output_root: &Path,
    supervision: &Supervision,
) -> Result<SinkHandle, DispatcherError> {
    let dir = output_root.join(config.dir_name());
    match config.sink_type {
        SinkType::Json => {
            let encoder = JsonEncoder::from_params(&config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e))?;
            let sink = FolderSink::new(&config.name, dir, encoder);
            Ok(SinkHandle::spawn(sink, config.queue_capacity, supervision))
        }
        SinkType::Links => {
            let encoder = LinkListEncoder::from_params(&config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e))?;
            let sink = FolderSink::new(&config.name, dir, encoder);
            Ok(SinkHandle::spawn(sink, config.queue_capacity, supervision))
        }
    }
}
