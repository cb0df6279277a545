use chrono::TimeDelta;
use evalign::{
    Evalign, LeadTimeInterval, MatchMode, PoolingDeclaration, TimePools, TimeScale,
    TimeScaleFunction,
};
use evalign_mock::MockSource;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=evalign=debug shows the pipeline spans when built with `--features tracing`.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Load observations, forecasts and a persistence baseline for one feature.
    let source = MockSource::new();
    let observed = source.observations("DRRC2")?;
    let forecasts = source.forecasts("DRRC2")?;
    let baseline = source.baseline("DRRC2")?;

    // 2. Pool by 6-hour lead windows, rescaling everything to 6-hour means.
    let evalign = Evalign::builder()
        .pooling(PoolingDeclaration {
            lead_times: Some(LeadTimeInterval::new(TimeDelta::zero(), TimeDelta::hours(24))),
            lead_time_pools: Some(TimePools::new(TimeDelta::hours(6))),
            ..PoolingDeclaration::default()
        })
        .desired_time_scale(TimeScale::new(TimeDelta::hours(6), TimeScaleFunction::Mean)?)
        .cross_pair(MatchMode::Exact)
        .build()?;

    // 3. Build the pools and summarise each one.
    for report in evalign.pools(&observed, &forecasts, Some(baseline.as_slice()))? {
        let errors: Vec<f64> = report
            .pool
            .main
            .iter()
            .flat_map(|s| s.events().map(|e| e.value().right - e.value().left))
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let mean_error = errors.iter().sum::<f64>() / errors.len().max(1) as f64;
        println!(
            "{}: {} pairs, mean error {mean_error:.2}",
            report.window,
            errors.len()
        );
    }

    Ok(())
}
