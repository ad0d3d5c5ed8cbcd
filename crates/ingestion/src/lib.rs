//! # Ingestion
//!
//! Producer-side building blocks.
//!
//! Responsibilities:
//! - Validate the root directory argument
//! - List the root directory and flag candidate CSV files
//! - Parse one CSV file into a `ParsedBatch`
//!
//! Everything here is synchronous and free of shared state; the coordinator
//! drives these calls from its production task.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{discover, parse_file, validate_root};
//!
//! let root = validate_root("/home/me/playlists")?;
//! let discovery = discover(&root)?;
//! for entry in discovery.candidates() {
//!     let batch = parse_file(&root, &entry.name)?;
//!     println!("{}: {} tracks", batch.base_name(), batch.len());
//! }
//! ```

mod discovery;
mod parser;
mod path;

// Re-exports
pub use contracts::{ParsedBatch, Track};
pub use discovery::{discover, is_candidate_name, DiscoveredEntry, Discovery, CANDIDATE_PATTERN};
pub use parser::{
    base_name, parse_file, parse_reader, COL_ALBUM, COL_ARTIST, COL_ID, COL_TRACK, MIN_COLUMNS,
};
pub use path::{validate_root, validate_root_with, PathRule};
