//! Shared fixture helpers for the library integration tests.

use std::path::PathBuf;

/// Path to the checked-in indicator fixture.
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/world_bank_indicators.csv")
}
