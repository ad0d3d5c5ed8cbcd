//! CSV playlist parser
//!
//! Column mapping is positional and fixed:
//!
//! | column | field |
//! |---|---|
//! | 0 | spotify id |
//! | 2 | track name |
//! | 3 | album name |
//! | 4 | artist name |
//!
//! Row 0 is the header and is always skipped. Rows may have different
//! lengths, but every data row needs at least 5 columns.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use contracts::{ContractError, IoOp, ParsedBatch, Track};
use tracing::{debug, instrument, warn};

pub const COL_ID: usize = 0;
pub const COL_TRACK: usize = 2;
pub const COL_ALBUM: usize = 3;
pub const COL_ARTIST: usize = 4;

/// Columns a data row must have
pub const MIN_COLUMNS: usize = COL_ARTIST + 1;

/// Input file name without its final extension
pub fn base_name(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

/// Parse `dir/file_name` into a batch
///
/// # Errors
/// - `Io` if the file cannot be opened or read
/// - `Format` if the CSV cannot be decoded or a row is too short
#[instrument(name = "parse_file", skip(dir, file_name), fields(file = %file_name))]
pub fn parse_file(dir: &Path, file_name: &str) -> Result<ParsedBatch, ContractError> {
    let path = dir.join(file_name);
    let file = File::open(&path).map_err(|e| ContractError::io(IoOp::Open, &path, e))?;
    let batch = parse_reader(base_name(file_name), &path, file)?;
    debug!(records = batch.len(), "Parsed input file");
    Ok(batch)
}

/// Parse CSV content from any reader
pub fn parse_reader<R: Read>(
    base_name: impl Into<String>,
    source: &Path,
    reader: R,
) -> Result<ParsedBatch, ContractError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut tracks = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let row = idx as u64 + 1;
        let record = result.map_err(|e| decode_error(source, row, e))?;
        tracks.push(track_from_record(source, row, &record)?);
    }

    Ok(ParsedBatch::new(base_name, source, tracks))
}

fn track_from_record(
    source: &Path,
    row: u64,
    record: &csv::StringRecord,
) -> Result<Track, ContractError> {
    if record.len() < MIN_COLUMNS {
        return Err(ContractError::format(
            source,
            Some(row),
            format!(
                "row {} has {} columns, column {} (artist name) is missing",
                row,
                record.len(),
                COL_ARTIST
            ),
        ));
    }

    let column = |idx: usize| record.get(idx).unwrap_or_default();

    let spotify_id = column(COL_ID);
    if spotify_id.is_empty() {
        warn!(source = %source.display(), row, "Row has an empty track id");
    }

    Ok(Track::new(
        spotify_id,
        column(COL_TRACK),
        column(COL_ALBUM),
        column(COL_ARTIST),
    ))
}

fn decode_error(source: &Path, row: u64, err: csv::Error) -> ContractError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => ContractError::io(IoOp::Read, source, io),
        _ => ContractError::format(source, Some(row), message),
    }
}
