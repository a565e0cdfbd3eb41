//! Local indicator dataset loading and queries.
//!
//! The dataset is a CSV table with one row per (country, indicator, year).
//! It is loaded once at start-up and never mutated afterwards, so it can be
//! shared between concurrent requests behind an `Arc` without locking.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use serde_json::{Number, Value};
use tracing::{debug, info};

use crate::code::normalize_country_code;
use crate::error::{Error, Result};

/// Declared semantic type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    String,
    Int64,
    Float64,
    Boolean,
    /// Every cell in the column is empty.
    Null,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "String",
            ColumnType::Int64 => "Int64",
            ColumnType::Float64 => "Float64",
            ColumnType::Boolean => "Boolean",
            ColumnType::Null => "Null",
        }
    }

    fn of_cell(cell: &str) -> Self {
        if cell.is_empty() {
            ColumnType::Null
        } else if cell.parse::<i64>().is_ok() {
            ColumnType::Int64
        } else if cell.parse::<f64>().is_ok() {
            ColumnType::Float64
        } else if cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false") {
            ColumnType::Boolean
        } else {
            ColumnType::String
        }
    }

    /// Widen two observed types to one that holds both.
    fn merge(self, other: Self) -> Self {
        use ColumnType::*;
        match (self, other) {
            (Null, t) | (t, Null) => t,
            (a, b) if a == b => a,
            (Int64, Float64) | (Float64, Int64) => Float64,
            _ => String,
        }
    }

    fn to_json(self, cell: &str) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnType::Int64 => cell
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::Null),
            ColumnType::Float64 => cell
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ColumnType::Boolean => Value::Bool(cell.eq_ignore_ascii_case("true")),
            ColumnType::String | ColumnType::Null => Value::String(cell.to_string()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and declared type of one dataset column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub dtype: ColumnType,
}

/// One row of the local indicator table.
///
/// Columns beyond the six known ones are carried opaquely in `extra`,
/// typed by inference over the whole column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRecord {
    /// ISO 3166-1 alpha-3 code, stored in normalized form.
    #[serde(rename = "countryiso3code")]
    pub country_iso3_code: String,
    pub country: String,
    pub indicator_code: String,
    pub indicator_name: String,
    pub year: i64,
    pub value: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A distinct `(code, name)` pair present in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CountryEntry {
    #[serde(rename = "countryiso3code")]
    pub code: String,
    pub country: String,
}

/// Known columns, their canonical names, declared types and accepted header synonyms.
const KNOWN_COLUMNS: &[(&str, ColumnType, &[&str])] = &[
    (
        "countryiso3code",
        ColumnType::String,
        &["countryiso3code", "country_iso3_code", "iso3", "iso3code", "country_code"],
    ),
    ("country", ColumnType::String, &["country", "country_name", "countryname"]),
    (
        "indicator_code",
        ColumnType::String,
        &["indicator_code", "indicatorcode", "indicator_id", "indicator"],
    ),
    (
        "indicator_name",
        ColumnType::String,
        &["indicator_name", "indicatorname"],
    ),
    ("year", ColumnType::Int64, &["year", "date"]),
    ("value", ColumnType::Float64, &["value"]),
];

/// Normalize header strings for robust matching.
fn normalize_header(s: &str) -> String {
    s.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// The immutable local indicator table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<IndicatorRecord>,
    schema: Vec<ColumnSchema>,
    source: Option<PathBuf>,
}

impl Dataset {
    /// Load the dataset from a CSV file.
    ///
    /// A missing or unreadable file is [`Error::DataUnavailable`]; the caller is
    /// expected to treat that as fatal rather than retry.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DataUnavailable {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        // Read up front so directories, I/O failures and non-UTF-8 content all
        // surface as unavailable data rather than as CSV errors.
        let contents = fs::read_to_string(path).map_err(|err| Error::DataUnavailable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let mut dataset = Self::from_reader(contents.as_bytes())?;
        dataset.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            rows = dataset.records.len(),
            columns = dataset.schema.len(),
            "loaded indicator dataset"
        );
        Ok(dataset)
    }

    /// Load the dataset from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let mut known_index: BTreeMap<&str, usize> = BTreeMap::new();
        for (canon, _, synonyms) in KNOWN_COLUMNS {
            let found = synonyms.iter().find_map(|alt| {
                normalized.iter().position(|h| h.as_str() == *alt).filter(|i| {
                    !known_index.values().any(|used| used == i)
                })
            });
            if let Some(i) = found {
                known_index.insert(*canon, i);
            }
        }

        let missing: Vec<&str> = KNOWN_COLUMNS
            .iter()
            .map(|(canon, _, _)| *canon)
            .filter(|canon| !known_index.contains_key(canon))
            .collect();
        if !missing.is_empty() {
            return Err(Error::DatasetSchema {
                message: format!(
                    "missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let rows = csv_reader
            .records()
            .collect::<std::result::Result<Vec<StringRecord>, _>>()?;

        // Everything not claimed by a known column is carried as an extra.
        let extra_columns: Vec<(usize, String, ColumnType)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !known_index.values().any(|k| k == i))
            .map(|(i, name)| {
                let dtype = rows
                    .iter()
                    .map(|row| ColumnType::of_cell(row.get(i).unwrap_or("")))
                    .fold(ColumnType::Null, ColumnType::merge);
                (i, name.to_string(), dtype)
            })
            .collect();

        let code_idx = known_index["countryiso3code"];
        let country_idx = known_index["country"];
        let indicator_code_idx = known_index["indicator_code"];
        let indicator_name_idx = known_index["indicator_name"];
        let year_idx = known_index["year"];
        let value_idx = known_index["value"];

        let mut records = Vec::with_capacity(rows.len());
        for (offset, row) in rows.iter().enumerate() {
            // Header is line 1.
            let line = offset + 2;
            let cell = |i: usize| row.get(i).unwrap_or("");

            let raw_year = cell(year_idx);
            let year = raw_year.parse::<i64>().map_err(|err| Error::DatasetSchema {
                message: format!("invalid year '{}' at line {}: {}", raw_year, line, err),
            })?;

            let raw_value = cell(value_idx);
            let value = if raw_value.is_empty() {
                None
            } else {
                Some(raw_value.parse::<f64>().map_err(|err| Error::DatasetSchema {
                    message: format!("invalid value '{}' at line {}: {}", raw_value, line, err),
                })?)
            };

            let extra = extra_columns
                .iter()
                .map(|(i, name, dtype)| (name.clone(), dtype.to_json(cell(*i))))
                .collect();

            records.push(IndicatorRecord {
                country_iso3_code: normalize_country_code(cell(code_idx)),
                country: cell(country_idx).to_string(),
                indicator_code: cell(indicator_code_idx).to_string(),
                indicator_name: cell(indicator_name_idx).to_string(),
                year,
                value,
                extra,
            });
        }

        let schema = KNOWN_COLUMNS
            .iter()
            .map(|(canon, dtype, _)| ColumnSchema {
                name: canon.to_string(),
                dtype: *dtype,
            })
            .chain(
                extra_columns
                    .into_iter()
                    .map(|(_, name, dtype)| ColumnSchema { name, dtype }),
            )
            .collect();

        debug!(rows = records.len(), "parsed indicator rows");

        Ok(Self {
            records,
            schema,
            source: None,
        })
    }

    /// All rows in file order.
    pub fn records(&self) -> &[IndicatorRecord] {
        &self.records
    }

    /// Column names with their declared types, known columns first.
    pub fn schema(&self) -> &[ColumnSchema] {
        &self.schema
    }

    /// Unique `(code, name)` pairs, sorted by code then name.
    pub fn distinct_countries(&self) -> Vec<CountryEntry> {
        self.records
            .iter()
            .map(|r| CountryEntry {
                code: r.country_iso3_code.clone(),
                country: r.country.clone(),
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows whose country code matches `code` after normalization, in file order.
    ///
    /// No match is an empty vector, not an error; callers decide how to report it.
    pub fn by_country(&self, code: &str) -> Vec<&IndicatorRecord> {
        let wanted = normalize_country_code(code);
        self.records
            .iter()
            .filter(|r| r.country_iso3_code == wanted)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the source path if the dataset was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
