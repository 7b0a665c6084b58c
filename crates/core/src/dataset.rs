//! Pure normalization logic for the denormalized movies/genres dataset.
//!
//! The source file is tab-separated with no header row, one row per
//! movie-genre pair:
//!
//! ```text
//! The Godfather<TAB>1972-03-24<TAB>Crime
//! The Godfather<TAB>1972-03-24<TAB>Drama
//! ```
//!
//! This module has zero I/O: it takes the file contents as a string and
//! produces the normalized structures the database loader consumes. A
//! single bad row fails the whole parse, so nothing malformed ever reaches
//! the load transaction.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

/// Expected number of tab-separated columns per row.
pub const DATASET_COLUMNS: usize = 3;

/// Accepted release-date format (ISO 8601 calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("line {line}: expected {DATASET_COLUMNS} tab-separated columns, got {got}")]
    ColumnCount { line: usize, got: usize },

    #[error("line {line}: empty {field} field")]
    EmptyField { line: usize, field: &'static str },

    #[error("line {line}: unparsable release date '{value}'")]
    BadDate { line: usize, value: String },
}

/// A single movie-genre row from the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    pub title: String,
    pub release_date: NaiveDate,
    pub genre: String,
}

/// One logical movie: a unique (title, release_date) pair carrying every
/// genre name that appeared for it, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieGroup {
    pub title: String,
    pub release_date: NaiveDate,
    pub genres: Vec<String>,
}

/// The fully normalized dataset, ready for loading.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Unique genre names across the whole file, in first-seen order.
    pub genre_names: Vec<String>,
    /// Movies grouped by (title, release_date), in first-seen order.
    pub movies: Vec<MovieGroup>,
}

/// Parse and normalize the raw TSV contents.
///
/// Blank lines are skipped (a trailing newline is not an error). Rows are
/// grouped by (title, release_date); a group keeps every genre occurrence,
/// duplicates included. The loader's association insert is idempotent, so
/// repeated pairs collapse at load time.
pub fn parse_dataset(contents: &str) -> Result<Dataset, DatasetError> {
    let mut dataset = Dataset::default();
    let mut seen_genres: HashSet<String> = HashSet::new();
    let mut group_index: HashMap<(String, NaiveDate), usize> = HashMap::new();

    for (idx, line) in contents.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let row = parse_row(line, idx + 1)?;

        if seen_genres.insert(row.genre.clone()) {
            dataset.genre_names.push(row.genre.clone());
        }

        let key = (row.title.clone(), row.release_date);
        match group_index.get(&key) {
            Some(&at) => dataset.movies[at].genres.push(row.genre),
            None => {
                group_index.insert(key, dataset.movies.len());
                dataset.movies.push(MovieGroup {
                    title: row.title,
                    release_date: row.release_date,
                    genres: vec![row.genre],
                });
            }
        }
    }

    Ok(dataset)
}

/// Parse a single line into a [`DatasetRow`]. `line_no` is 1-based and only
/// used for error reporting.
fn parse_row(line: &str, line_no: usize) -> Result<DatasetRow, DatasetError> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != DATASET_COLUMNS {
        return Err(DatasetError::ColumnCount {
            line: line_no,
            got: columns.len(),
        });
    }

    let (title, date, genre) = (columns[0], columns[1], columns[2]);
    for (value, field) in [(title, "title"), (date, "release_date"), (genre, "genre")] {
        if value.is_empty() {
            return Err(DatasetError::EmptyField {
                line: line_no,
                field,
            });
        }
    }

    let release_date =
        NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| DatasetError::BadDate {
            line: line_no,
            value: date.to_string(),
        })?;

    Ok(DatasetRow {
        title: title.to_string(),
        release_date,
        genre: genre.to_string(),
    })
}
