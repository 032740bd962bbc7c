//! Ratings file loaders for the MovieLens formats.
//!
//! Two formats are supported:
//!
//! - `.dat`: `user::item::rating::timestamp`, no header
//! - `.csv`: `user,item,rating,timestamp` with a header row
//!
//! Raw source IDs are remapped to dense zero-based IDs in order of first
//! appearance, so the resulting [`RatingStore`] always satisfies the
//! dense-ID invariant. Any unparseable line aborts the load; a skipped
//! record would silently shrink the dataset.

use crate::error::{DataError, DataResult};
use crate::rating::{Rating, RatingStore};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Remaps raw source IDs to dense zero-based IDs in first-appearance order.
#[derive(Debug, Default)]
struct IdRemapper {
    mapping: HashMap<u64, usize>,
}

impl IdRemapper {
    fn remap(&mut self, raw: u64) -> usize {
        let next = self.mapping.len();
        *self.mapping.entry(raw).or_insert(next)
    }
}

/// Parsed fields of one ratings line, before ID remapping.
struct RawRecord {
    user: u64,
    item: u64,
    rating: f32,
    timestamp: i64,
}

fn parse_fields(fields: &[&str], line_number: usize) -> DataResult<RawRecord> {
    if fields.len() != 4 {
        return Err(DataError::MalformedRecord {
            message: format!(
                "line {}: expected 4 fields, got {}",
                line_number,
                fields.len()
            ),
        });
    }
    let parse = |name: &str, value: &str| -> DataResult<u64> {
        value.trim().parse().map_err(|_| DataError::MalformedRecord {
            message: format!("line {}: invalid {} '{}'", line_number, name, value),
        })
    };
    let user = parse("user ID", fields[0])?;
    let item = parse("item ID", fields[1])?;
    let rating = fields[2]
        .trim()
        .parse()
        .map_err(|_| DataError::MalformedRecord {
            message: format!("line {}: invalid rating '{}'", line_number, fields[2]),
        })?;
    let timestamp = fields[3]
        .trim()
        .parse()
        .map_err(|_| DataError::MalformedRecord {
            message: format!("line {}: invalid timestamp '{}'", line_number, fields[3]),
        })?;
    Ok(RawRecord {
        user,
        item,
        rating,
        timestamp,
    })
}

fn build_store(records: Vec<RawRecord>, path: &Path) -> DataResult<RatingStore> {
    let mut users = IdRemapper::default();
    let mut items = IdRemapper::default();
    let ratings: Vec<Rating> = records
        .into_iter()
        .map(|r| Rating::new(users.remap(r.user), items.remap(r.item), r.rating, r.timestamp))
        .collect();
    let store = RatingStore::from_ratings(ratings)?;
    info!(
        path = %path.display(),
        ratings = store.len(),
        users = store.num_users(),
        items = store.num_items(),
        "Loaded ratings"
    );
    Ok(store)
}

/// Loads a `::`-delimited MovieLens ratings file.
///
/// Blank lines are ignored.
///
/// # Errors
///
/// Fails with [`DataError::Io`] on read errors and
/// [`DataError::MalformedRecord`] on the first unparseable line.
pub fn load_dat<P: AsRef<Path>>(path: P) -> DataResult<RatingStore> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split("::").collect();
        records.push(parse_fields(&fields, index + 1)?);
    }
    build_store(records, path)
}

/// Loads a comma-separated ratings file with a header row.
///
/// # Errors
///
/// Fails with [`DataError::Csv`] on read errors and
/// [`DataError::MalformedRecord`] on the first unparseable record.
pub fn load_csv<P: AsRef<Path>>(path: P) -> DataResult<RatingStore> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let fields: Vec<&str> = record.iter().collect();
        // Header occupies line 1.
        records.push(parse_fields(&fields, index + 2)?);
    }
    build_store(records, path)
}

/// Loads a ratings file and splits it into train and test partitions in
/// one step.
///
/// The format is chosen by file extension: `.csv` uses [`load_csv`],
/// anything else uses [`load_dat`].
///
/// # Errors
///
/// Propagates loader errors, plus [`DataError::InvalidArgument`] from
/// the splitter for a bad fraction or an empty file.
pub fn load_and_split<P: AsRef<Path>>(
    path: P,
    test_fraction: f64,
    seed: u64,
) -> DataResult<(RatingStore, RatingStore)> {
    let path = path.as_ref();
    let store = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => load_csv(path)?,
        _ => load_dat(path)?,
    };
    crate::split::UserStratifiedSplitter::with_seed(seed).split(&store, test_fraction)
}
