use std::env;
use std::process::ExitCode;

use climate_trends::config::ClimateConfig;
use climate_trends::ingest::csv_records;
use climate_trends::logging::{self, Component};
use climate_trends::model::ClimateError;
use climate_trends::pipeline;

const DEFAULT_CONFIG_PATH: &str = "climate.toml";

fn config_path() -> String {
    // CLI argument wins over CLIMATE_CONFIG, which wins over the default
    env::args()
        .nth(1)
        .or_else(|| env::var("CLIMATE_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

fn run() -> Result<bool, ClimateError> {
    dotenv::dotenv().ok();

    let path = config_path();
    let config = ClimateConfig::load(&path)?;

    logging::init_logger(
        config.logging.level,
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );
    logging::info(Component::System, None, &format!("Loaded configuration from {}", path));

    let store = csv_records::load_store(&config.data.csv_path)?;
    logging::info(
        Component::Ingest,
        None,
        &format!(
            "Loaded {} observations for {} cities from {}",
            store.len(),
            store.cities().len(),
            config.data.csv_path
        ),
    );

    let report = pipeline::run(&store, &config);
    report.write_json(&config.output.report_path)?;
    logging::info(
        Component::System,
        None,
        &format!("Report written to {}", config.output.report_path),
    );

    Ok(report.summary.failed == 0)
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("climate_trends: {}", err);
            ExitCode::from(2)
        }
    }
}
