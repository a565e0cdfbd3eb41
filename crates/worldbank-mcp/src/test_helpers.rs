//! Stub upstream sources and state builders shared by unit tests

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use worldbank_lib::{
    CountryProfile, CountrySource, Dataset, IndicatorObservation, IndicatorSource, UpstreamError,
};

use crate::server::McpServerState;

pub(crate) fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures/world_bank_indicators.csv")
}

pub(crate) fn fixture_dataset() -> Dataset {
    Dataset::load(&fixture_path()).expect("fixture dataset should load")
}

/// Country source answering from a fixed table
///
/// `USA` succeeds, `DOWN` is unavailable, `EMPTY` is malformed, anything
/// else is a 404.
#[derive(Default)]
pub(crate) struct StubCountries {
    calls: AtomicUsize,
}

impl StubCountries {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CountrySource for StubCountries {
    async fn fetch_country(&self, code: &str) -> Result<CountryProfile, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match code {
            "USA" | "US" => Ok(CountryProfile {
                name: Some("United States".into()),
                capital: Some("Washington, D.C.".into()),
                region: Some("Americas".into()),
                subregion: Some("North America".into()),
                languages: vec!["English".into()],
                currencies: vec!["USD".into()],
                population: Some(329_484_123),
                flag: Some("\u{1f1fa}\u{1f1f8}".into()),
            }),
            "DOWN" => Err(UpstreamError::Unavailable {
                message: "connection refused".into(),
            }),
            "EMPTY" => Err(UpstreamError::Malformed {
                message: "no country record returned for 'EMPTY'".into(),
            }),
            _ => Err(UpstreamError::NotFound { status: 404 }),
        }
    }
}

/// Indicator source answering from a fixed table
///
/// `USA`, `CHN` and `DEU` have a 2022 observation (USA also has a null 2021
/// one). `BAD` is a 400, `DOWN` is unavailable, `PANIC` panics, anything
/// else is an empty series.
#[derive(Default)]
pub(crate) struct StubIndicators {
    requests: Mutex<Vec<(String, String, Option<i32>)>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl StubIndicators {
    pub(crate) fn requests(&self) -> Vec<(String, String, Option<i32>)> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn delay(&self, code: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(code.to_string(), delay);
    }
}

fn observation(code: &str, name: &str, indicator: &str, year: &str, value: Option<f64>) -> IndicatorObservation {
    IndicatorObservation {
        country_code: code.to_string(),
        country_name: Some(name.to_string()),
        indicator_code: Some(indicator.to_string()),
        indicator_name: None,
        year: year.to_string(),
        value: value.and_then(serde_json::Number::from_f64),
    }
}

#[async_trait]
impl IndicatorSource for StubIndicators {
    async fn fetch_indicator(
        &self,
        code: &str,
        indicator: &str,
        year: Option<i32>,
    ) -> Result<Vec<IndicatorObservation>, UpstreamError> {
        self.requests
            .lock()
            .unwrap()
            .push((code.to_string(), indicator.to_string(), year));

        let delay = self.delays.lock().unwrap().get(code).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match code {
            "USA" => Ok(vec![
                observation("USA", "United States", indicator, "2022", Some(76398.6)),
                observation("USA", "United States", indicator, "2021", None),
            ]),
            "CHN" => Ok(vec![observation("CHN", "China", indicator, "2022", Some(12720.2))]),
            "DEU" => Ok(vec![observation("DEU", "Germany", indicator, "2022", Some(48718.0))]),
            "BAD" => Err(UpstreamError::NotFound { status: 400 }),
            "DOWN" => Err(UpstreamError::Unavailable {
                message: "connection refused".into(),
            }),
            "PANIC" => panic!("stub indicator source exploded"),
            _ => Ok(Vec::new()),
        }
    }
}

/// State over the fixture dataset with handles on both stubs
pub(crate) fn stub_state() -> (McpServerState, Arc<StubCountries>, Arc<StubIndicators>) {
    let countries = Arc::new(StubCountries::default());
    let indicators = Arc::new(StubIndicators::default());
    let state = McpServerState::new(fixture_dataset(), countries.clone(), indicators.clone());
    (state, countries, indicators)
}

pub(crate) fn test_state() -> McpServerState {
    stub_state().0
}
