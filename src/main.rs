use euvheat::{ModelRunner, RunConfig, write_outputs};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "./data/config/run_config.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    info!("Starting EUV heating run from {}", config_path);

    let config = RunConfig::from_file(&config_path)?;
    let runner = ModelRunner::from_config(config)?;
    let outputs = runner.run()?;

    for output in &outputs {
        match output.peak_heating() {
            Some((altitude, peak)) => info!(
                "{} zenith {:.1} deg: peak heating {:.3e} W/m3 at {:.1} km",
                output.time, output.zenith_angle_deg, peak, altitude
            ),
            None => warn!("{}: empty heating profile", output.time),
        }
        if let Some((lo, hi)) = output.temperature_rate_range_k_per_day() {
            info!("  dT/dt: min {:.3} K/day, max {:.3} K/day", lo, hi);
        }
    }

    if let Some(path) = runner.config().output_file() {
        write_outputs(path, &outputs)?;
    } else {
        info!("No output_file configured, profiles not written");
    }

    Ok(())
}
