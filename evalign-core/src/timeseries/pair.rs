//! Pairing of one left series with one right series at shared valid times.

use std::cmp::Ordering;
use std::fmt;

use evalign_types::{EvalignError, PairingStrategy};

use crate::model::{Event, Pair, TimeSeries};

/// Pairs a left series with a right series.
pub trait TimeSeriesPairer<L, R> {
    /// Align `left` and `right` into a series of pairs.
    ///
    /// # Errors
    /// Implementations return `Pairing` when the inputs cannot be paired.
    fn pair(
        &self,
        left: &TimeSeries<L>,
        right: &TimeSeries<R>,
    ) -> Result<TimeSeries<Pair<L, R>>, EvalignError>;
}

type Admissible<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Pairs events that share an identical valid time.
///
/// The [`PairingStrategy::Exact`] strategy additionally requires identical time
/// scales on both sides; [`PairingStrategy::Crisp`] skips that check.
pub struct ExactTimePairer<L, R> {
    strategy: PairingStrategy,
    left_admissible: Admissible<L>,
    right_admissible: Admissible<R>,
}

impl<L: 'static, R: 'static> ExactTimePairer<L, R> {
    /// Pairer for the given strategy, admitting every value.
    #[must_use]
    pub fn new(strategy: PairingStrategy) -> Self {
        Self {
            strategy,
            left_admissible: Box::new(|_: &L| true),
            right_admissible: Box::new(|_: &R| true),
        }
    }

    /// Pairer that requires identical time scales.
    #[must_use]
    pub fn exact() -> Self {
        Self::new(PairingStrategy::Exact)
    }

    /// Pairer that ignores time scales.
    #[must_use]
    pub fn crisp() -> Self {
        Self::new(PairingStrategy::Crisp)
    }

    /// Only pair left values accepted by `f`.
    #[must_use]
    pub fn with_left_admissibility(
        mut self,
        f: impl Fn(&L) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.left_admissible = Box::new(f);
        self
    }

    /// Only pair right values accepted by `f`.
    #[must_use]
    pub fn with_right_admissibility(
        mut self,
        f: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.right_admissible = Box::new(f);
        self
    }
}

impl<L, R> ExactTimePairer<L, R> {
    /// Configured strategy.
    pub const fn strategy(&self) -> PairingStrategy {
        self.strategy
    }
}

impl<L: 'static, R: 'static> Default for ExactTimePairer<L, R> {
    fn default() -> Self {
        Self::exact()
    }
}

impl<L, R> fmt::Debug for ExactTimePairer<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExactTimePairer")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl<L: Clone, R: Clone> TimeSeriesPairer<L, R> for ExactTimePairer<L, R> {
    fn pair(
        &self,
        left: &TimeSeries<L>,
        right: &TimeSeries<R>,
    ) -> Result<TimeSeries<Pair<L, R>>, EvalignError> {
        if self.strategy == PairingStrategy::Exact && left.time_scale() != right.time_scale() {
            return Err(EvalignError::pairing(format!(
                "cannot pair a left series with time scale {} and a right series with time scale {}",
                scale_label(left),
                scale_label(right)
            )));
        }

        let metadata = if right.reference_times().is_empty() {
            left.metadata().clone()
        } else {
            right.metadata().clone()
        };

        let mut builder = TimeSeries::builder().metadata(metadata);
        let mut lefts = left.events().peekable();
        let mut rights = right.events().peekable();

        while let (Some(&l), Some(&r)) = (lefts.peek(), rights.peek()) {
            match l.valid_time().cmp(&r.valid_time()) {
                Ordering::Less => {
                    lefts.next();
                }
                Ordering::Greater => {
                    rights.next();
                }
                Ordering::Equal => {
                    if (self.left_admissible)(l.value()) && (self.right_admissible)(r.value()) {
                        builder.push(Event::with_reference_time(
                            r.reference_time(),
                            r.valid_time(),
                            Pair::new(l.value().clone(), r.value().clone()),
                        ));
                    }
                    lefts.next();
                    rights.next();
                }
            }
        }

        let paired = builder.build()?;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            left = left.len(),
            right = right.len(),
            pairs = paired.len(),
            "paired series by valid time"
        );
        Ok(paired)
    }
}

fn scale_label<V>(series: &TimeSeries<V>) -> String {
    series
        .time_scale()
        .map_or_else(|| "(none)".to_string(), |s| s.to_string())
}
