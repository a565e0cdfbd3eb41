/// Canonical form of a country code: surrounding whitespace removed, ASCII upper-cased.
///
/// Every code used as a dataset lookup key or embedded in an outbound request
/// goes through this function, and the dataset stores its codes in the same
/// form, so `"usa"`, `" USA "` and `"USA"` all address the same rows.
pub fn normalize_country_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
