use evalign_types::EvalignError;

use crate::model::TimeSeries;

/// Join series that share metadata into one series.
///
/// # Errors
/// - Returns `InvalidArg` when `series` is empty or the metadata differs between series.
/// - Returns `InvalidState` when two series hold an event at the same valid time.
pub fn consolidate<V: Clone>(series: &[TimeSeries<V>]) -> Result<TimeSeries<V>, EvalignError> {
    let Some(first) = series.first() else {
        return Err(EvalignError::invalid_arg("no series to consolidate"));
    };
    if let Some(other) = series.iter().find(|s| s.metadata() != first.metadata()) {
        return Err(EvalignError::invalid_arg(format!(
            "cannot consolidate series with different metadata: {:?} and {:?}",
            first.metadata(),
            other.metadata()
        )));
    }

    let mut builder = TimeSeries::builder().metadata(first.metadata().clone());
    for s in series {
        builder = builder.add_events(s.events().cloned());
    }
    builder.build()
}
