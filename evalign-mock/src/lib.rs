//! Deterministic observation and forecast fixtures for tests and examples.
//!
//! Fixture data starts at 2023-01-01T00:00:00Z. Feature `DRRC2` carries hourly
//! streamflow observations, single-valued and ensemble forecasts, and a
//! persistence baseline. Feature `DOLC2` carries six-hourly stage observations
//! only. Feature `FAIL` always errors.

use evalign_core::{Ensemble, EvalignError, TimeSeries};

mod fixtures;

pub use fixtures::{EPOCH_SECONDS, hour};

/// Source of fixture series keyed by feature name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSource;

impl MockSource {
    /// A source over the built-in fixtures.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Features with at least one fixture.
    #[must_use]
    pub const fn features(&self) -> &'static [&'static str] {
        &["DRRC2", "DOLC2"]
    }

    /// Observed series for `feature`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unknown feature and `InvalidState` for `FAIL`.
    pub fn observations(&self, feature: &str) -> Result<TimeSeries<f64>, EvalignError> {
        Self::maybe_fail(feature, "observations")?;
        fixtures::observations::by_feature(feature)
            .ok_or_else(|| Self::not_found("observations", feature))
    }

    /// Single-valued forecasts for `feature`, one series per issue time.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a feature without forecasts and `InvalidState` for `FAIL`.
    pub fn forecasts(&self, feature: &str) -> Result<Vec<TimeSeries<f64>>, EvalignError> {
        Self::maybe_fail(feature, "forecasts")?;
        fixtures::forecasts::by_feature(feature).ok_or_else(|| Self::not_found("forecasts", feature))
    }

    /// Persistence baseline forecasts for `feature`, issued with the single-valued forecasts.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a feature without forecasts and `InvalidState` for `FAIL`.
    pub fn baseline(&self, feature: &str) -> Result<Vec<TimeSeries<f64>>, EvalignError> {
        Self::maybe_fail(feature, "baseline")?;
        fixtures::forecasts::persistence_by_feature(feature)
            .ok_or_else(|| Self::not_found("baseline", feature))
    }

    /// Ensemble forecasts for `feature`, one series per issue time.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a feature without ensembles and `InvalidState` for `FAIL`.
    pub fn ensemble_forecasts(
        &self,
        feature: &str,
    ) -> Result<Vec<TimeSeries<Ensemble>>, EvalignError> {
        Self::maybe_fail(feature, "ensemble forecasts")?;
        fixtures::forecasts::ensemble_by_feature(feature)
            .ok_or_else(|| Self::not_found("ensemble forecasts", feature))
    }

    fn not_found(what: &str, feature: &str) -> EvalignError {
        EvalignError::invalid_arg(format!("no {what} fixture for feature '{feature}'"))
    }

    fn maybe_fail(feature: &str, what: &'static str) -> Result<(), EvalignError> {
        if feature == "FAIL" {
            return Err(EvalignError::invalid_state(format!(
                "evalign-mock forced failure: {what}"
            )));
        }
        Ok(())
    }
}
