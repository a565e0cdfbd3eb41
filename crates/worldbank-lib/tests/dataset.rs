mod common;

use std::collections::HashSet;
use std::io::Write;

use worldbank_lib::{ColumnType, Dataset, Error, Result};
use tempfile::{NamedTempFile, TempDir};

use common::fixture_path;

#[test]
fn load_fixture() -> Result<()> {
    let dataset = Dataset::load(&fixture_path())?;

    assert_eq!(dataset.len(), 11, "fixture should have 11 rows");
    assert_eq!(dataset.source_path(), Some(fixture_path().as_path()));
    Ok(())
}

#[test]
fn schema_declares_known_and_extra_columns() -> Result<()> {
    let dataset = Dataset::load(&fixture_path())?;
    let schema = dataset.schema();

    let dtype = |name: &str| {
        schema
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.dtype)
            .unwrap_or_else(|| panic!("column {name} missing from schema"))
    };

    assert_eq!(dtype("countryiso3code"), ColumnType::String);
    assert_eq!(dtype("year"), ColumnType::Int64);
    assert_eq!(dtype("value"), ColumnType::Float64);
    assert_eq!(dtype("decimal"), ColumnType::Int64);
    assert_eq!(dtype("unit"), ColumnType::Null);
    assert_eq!(schema.len(), 9);
    Ok(())
}

#[test]
fn by_country_returns_only_matching_rows_for_every_code() -> Result<()> {
    let dataset = Dataset::load(&fixture_path())?;

    for entry in dataset.distinct_countries() {
        let lower = entry.code.to_ascii_lowercase();
        let rows = dataset.by_country(&format!("  {lower} "));
        assert!(!rows.is_empty(), "{} should have rows", entry.code);
        assert!(rows.iter().all(|r| r.country_iso3_code == entry.code));
    }
    Ok(())
}

#[test]
fn by_country_normalizes_stored_codes() -> Result<()> {
    let dataset = Dataset::load(&fixture_path())?;
    // One DEU row is stored as "deu " in the file.
    assert_eq!(dataset.by_country("DEU").len(), 2);
    Ok(())
}

#[test]
fn by_country_unknown_code_is_empty() -> Result<()> {
    let dataset = Dataset::load(&fixture_path())?;
    assert!(dataset.by_country("ZZZ").is_empty());
    assert!(dataset.by_country("").is_empty());
    Ok(())
}

#[test]
fn distinct_countries_has_no_duplicates() -> Result<()> {
    let dataset = Dataset::load(&fixture_path())?;
    let countries = dataset.distinct_countries();

    let unique: HashSet<_> = countries.iter().collect();
    assert_eq!(unique.len(), countries.len());
    assert!(countries.len() <= dataset.len());
    assert_eq!(countries.len(), 5);
    Ok(())
}

#[test]
fn repeated_queries_are_identical() -> Result<()> {
    let dataset = Dataset::load(&fixture_path())?;
    assert_eq!(dataset.by_country("USA"), dataset.by_country("USA"));
    assert_eq!(dataset.distinct_countries(), dataset.distinct_countries());
    Ok(())
}

#[test]
fn missing_file_is_data_unavailable() {
    let err = Dataset::load(std::path::Path::new("/nonexistent/world_bank_indicators.csv"))
        .expect_err("missing dataset must fail");
    assert!(matches!(err, Error::DataUnavailable { .. }));
}

#[test]
fn directory_path_is_data_unavailable() -> Result<()> {
    let dir = TempDir::new()?;
    let err = Dataset::load(dir.path()).expect_err("a directory is not a dataset");
    assert!(
        matches!(err, Error::DataUnavailable { ref path, .. } if path == dir.path()),
        "unexpected error: {err:?}"
    );
    Ok(())
}

#[test]
fn non_utf8_file_is_data_unavailable() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"countryiso3code,country,indicator_code,indicator_name,year,value\n")?;
    file.write_all(b"USA,\xff\xfe,SP.POP.TOTL,Population,2022,1\n")?;

    let err = Dataset::load(file.path()).expect_err("invalid UTF-8 must fail");
    assert!(
        matches!(err, Error::DataUnavailable { .. }),
        "unexpected error: {err:?}"
    );
    Ok(())
}

#[test]
fn empty_table_loads_with_no_rows() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        "countryiso3code,country,indicator_code,indicator_name,year,value"
    )?;

    let dataset = Dataset::load(file.path())?;
    assert!(dataset.is_empty());
    assert!(dataset.distinct_countries().is_empty());
    Ok(())
}
