use chrono::TimeDelta;
use chrono_tz::Tz;
use evalign_core::{
    EvalignConfig, EvalignError, MatchMode, PairingStrategy, PoolingDeclaration, Season, TimeScale,
};

/// Pool pipeline over observed and forecast series.
#[derive(Debug, Clone)]
pub struct Evalign {
    pub(crate) cfg: EvalignConfig,
    pub(crate) tz: Tz,
}

/// Builder for constructing an [`Evalign`] pipeline with custom configuration.
#[derive(Debug, Clone)]
pub struct EvalignBuilder {
    cfg: EvalignConfig,
    tz: Tz,
}

impl Default for EvalignBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalignBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults: one unbounded pool, no rescaling, exact pairing, no
    /// cross-pairing of the baseline, no season, calendar arithmetic in UTC.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cfg: EvalignConfig::default(),
            tz: chrono_tz::UTC,
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: EvalignConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the pooling declaration from which time windows are generated.
    #[must_use]
    pub fn pooling(mut self, declaration: PoolingDeclaration) -> Self {
        self.cfg.pooling = declaration;
        self
    }

    /// Rescale every source to `scale` before pairing.
    ///
    /// Values are formed at the regular sequence of valid times shared by both
    /// sides; see [`rescale_frequency`](Self::rescale_frequency).
    #[must_use]
    pub const fn desired_time_scale(mut self, scale: TimeScale) -> Self {
        self.cfg.desired_time_scale = Some(scale);
        self
    }

    /// Step between rescaled values. Defaults to the desired period.
    #[must_use]
    pub const fn rescale_frequency(mut self, frequency: TimeDelta) -> Self {
        self.cfg.rescale_frequency = Some(frequency);
        self
    }

    /// Select how left and right series are paired.
    ///
    /// - `Exact`: a left and right series with different time scales fail to pair.
    /// - `Crisp`: pairs on valid time alone.
    #[must_use]
    pub const fn pairing(mut self, strategy: PairingStrategy) -> Self {
        self.cfg.pairing = strategy;
        self
    }

    /// Cross-pair main and baseline pairs with the given matching mode.
    ///
    /// Without cross-pairing the main and baseline pairs of a pool may cover
    /// different reference and valid times.
    #[must_use]
    pub const fn cross_pair(mut self, mode: MatchMode) -> Self {
        self.cfg.cross_pair = Some(mode);
        self
    }

    /// Only keep events within a recurring season.
    #[must_use]
    pub const fn season(mut self, season: Season) -> Self {
        self.cfg.season = Some(season);
        self
    }

    /// Time zone for month-day calendar arithmetic.
    #[must_use]
    pub const fn time_zone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    /// - Returns `InvalidArg` when a rescale frequency is set without a desired
    ///   time scale, or is not positive.
    /// - Returns `InvalidArg` when the desired time scale is bounded by month-days.
    /// - Returns the window generation error when the pooling declaration is
    ///   incomplete or inconsistent.
    pub fn build(self) -> Result<Evalign, EvalignError> {
        if let Some(frequency) = self.cfg.rescale_frequency {
            if self.cfg.desired_time_scale.is_none() {
                return Err(EvalignError::invalid_arg(
                    "a rescale frequency needs a desired time scale; set one via desired_time_scale(...)",
                ));
            }
            if frequency <= TimeDelta::zero() {
                return Err(EvalignError::invalid_arg(format!(
                    "rescale frequency must be positive, got {frequency}"
                )));
            }
        }
        if let Some(scale) = self.cfg.desired_time_scale
            && scale.has_month_days()
        {
            return Err(EvalignError::invalid_arg(format!(
                "cannot rescale pools to the seasonal time scale {scale}"
            )));
        }
        evalign_core::time_windows(&self.cfg.pooling)?;

        Ok(Evalign {
            cfg: self.cfg,
            tz: self.tz,
        })
    }
}

impl Evalign {
    /// Start building a new pipeline.
    ///
    /// ```rust
    /// use chrono::TimeDelta;
    /// use evalign::{Evalign, LeadTimeInterval, PoolingDeclaration, TimePools};
    ///
    /// let evalign = Evalign::builder()
    ///     .pooling(PoolingDeclaration {
    ///         lead_times: Some(LeadTimeInterval::new(TimeDelta::zero(), TimeDelta::hours(24))),
    ///         lead_time_pools: Some(TimePools::new(TimeDelta::hours(6))),
    ///         ..PoolingDeclaration::default()
    ///     })
    ///     .build()?;
    /// assert_eq!(evalign.time_windows()?.len(), 4);
    /// # Ok::<(), evalign::EvalignError>(())
    /// ```
    #[must_use]
    pub fn builder() -> EvalignBuilder {
        EvalignBuilder::new()
    }

    /// The effective configuration.
    #[must_use]
    pub const fn config(&self) -> &EvalignConfig {
        &self.cfg
    }

    /// Time zone used for month-day calendar arithmetic.
    #[must_use]
    pub const fn time_zone(&self) -> Tz {
        self.tz
    }
}
