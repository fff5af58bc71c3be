//! OCPP station fleet simulator — CLI front-end
//!
//! Headless fleet of simulated EV charging stations suitable for load
//! testing and validating a CSMS over OCPP 1.6 / 2.0.1.
//!
//! ```sh
//! # Run with default config (~/.config/ocpp-station-sim/config.toml)
//! ocpp-station-sim --templates-dir ./templates
//!
//! # Custom config path and id-tag files
//! ocpp-station-sim --config /etc/ocpp-station-sim/config.toml \
//!     --templates-dir ./templates --id-tags-dir ./id-tags --state-dir ./state
//!
//! # Validate config without starting any station
//! ocpp-station-sim --templates-dir ./templates --check
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use ocpp_station_sim::application::events::EventBus;
use ocpp_station_sim::application::station::{build_runtime, RuntimeConfig};
use ocpp_station_sim::application::variable_registry::VariableRegistry;
use ocpp_station_sim::application::worker_host::WorkerHost;
use ocpp_station_sim::infrastructure::{
    FileIdTagSource, FilesystemTemplateSource, JsonFileStationPersistence, LoggingPerformanceRecorder,
};
use ocpp_station_sim::support::shutdown::{listen_for_shutdown_signals, ShutdownSignal};
use ocpp_station_sim::{default_config_path, AppConfig};

/// Fleet simulator of EV charging stations speaking OCPP over WebSocket.
#[derive(Parser, Debug)]
#[command(
    name = "ocpp-station-sim",
    version,
    about = "Simulates a fleet of EV charging stations against a CSMS",
    long_about = "Loads one station template per JSON file in --templates-dir and runs \
                  each as an independent OCPP 1.6 / 2.0.1 session, driving automatic \
                  transaction cycles against the configured CSMS.\n\n\
                  Default config: ~/.config/ocpp-station-sim/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "OCPP_SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of station template JSON files; one station per file, station id = file stem.
    #[arg(long, env = "OCPP_SIM_TEMPLATES_DIR")]
    templates_dir: PathBuf,

    /// Directory of id-tag text files (one per station, matched by file stem); missing files yield an empty list.
    #[arg(long, env = "OCPP_SIM_ID_TAGS_DIR")]
    id_tags_dir: Option<PathBuf>,

    /// Directory station snapshots are persisted to/restored from.
    #[arg(long, env = "OCPP_SIM_STATE_DIR", default_value = "./state")]
    state_dir: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and templates, then exit without connecting any station.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            ocpp_station_sim::init_tracing(&cfg);
            info!("configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            if cli.config.is_some() {
                error!("failed to load config from {}: {}", config_path.display(), e);
                return ExitCode::from(2);
            }
            warn!("no config found at {}, using defaults", config_path.display());
            AppConfig::default()
        }
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    let template_source = FilesystemTemplateSource::new(&cli.templates_dir);
    let id_tag_source = FileIdTagSource::new(cli.id_tags_dir.clone().unwrap_or_else(|| cli.templates_dir.clone()));
    let persistence = Arc::new(JsonFileStationPersistence::new(&cli.state_dir));
    let performance = Arc::new(LoggingPerformanceRecorder);
    let registry = Arc::new(VariableRegistry::builtin());
    let events = Arc::new(EventBus::new());

    let template_files = match discover_template_files(&cli.templates_dir) {
        Ok(files) => files,
        Err(e) => {
            error!("failed to read templates directory {}: {}", cli.templates_dir.display(), e);
            return ExitCode::from(2);
        }
    };
    if template_files.is_empty() {
        error!("no station templates (*.json) found in {}", cli.templates_dir.display());
        return ExitCode::from(2);
    }

    if cli.check {
        let mut ok = true;
        for (station_id, file_name) in &template_files {
            match load_template(&template_source, file_name).await {
                Ok(_) => println!("✓ {station_id} ({file_name})"),
                Err(e) => {
                    ok = false;
                    println!("✗ {station_id} ({file_name}): {e}");
                }
            }
        }
        println!("worker host mode: {:?}", config.worker_host.mode);
        println!("state dir       : {}", cli.state_dir.display());
        return if ok { ExitCode::SUCCESS } else { ExitCode::from(2) };
    }

    let runtime_config = RuntimeConfig {
        message_timeout: std::time::Duration::from_secs(config.protocol.message_timeout_secs),
        message_attempts: config.protocol.message_attempts,
        message_attempt_interval: std::time::Duration::from_secs(config.protocol.message_attempt_interval_secs),
        strict_compliance: false,
        stop_transactions_on_stopped: true,
        shutdown_deadline_secs: config.shutdown.timeout_secs,
        reporting_value_size_limit: 2500,
        meter_interval_secs: 60,
        meter_energy_delta_wh: 500,
        sampled_measurands: vec!["Energy.Active.Import.Register".to_string()],
    };

    let worker_host = Arc::new(WorkerHost::new(config.worker_host.to_runtime_config(config.shutdown.timeout_secs)));
    worker_host.start().await;

    for (station_id, file_name) in &template_files {
        let template = match load_template(&template_source, file_name).await {
            Ok(t) => t,
            Err(e) => {
                error!(%station_id, %file_name, %e, "failed to load template");
                continue;
            }
        };
        let id_tags = load_id_tags(&id_tag_source, station_id).await;

        let runtime = match build_runtime(
            station_id,
            &template,
            registry.clone(),
            id_tags,
            events.clone(),
            persistence.clone(),
            performance.clone(),
            runtime_config.clone(),
        ) {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(%station_id, %e, "failed to build station runtime");
                continue;
            }
        };

        worker_host.add_element(runtime).await;
        info!(%station_id, "station dispatched to worker host");
    }

    let shutdown = ShutdownSignal::new();
    info!("press Ctrl+C to shut down gracefully");
    listen_for_shutdown_signals(shutdown.clone()).await;

    worker_host.stop().await;
    info!("shutdown complete");
    ExitCode::SUCCESS
}

/// `(station_id, file_name)` pairs for every `*.json` entry directly under `dir`.
fn discover_template_files(dir: &Path) -> std::io::Result<Vec<(String, String)>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        found.push((stem.to_string(), file_name.to_string()));
    }
    found.sort();
    Ok(found)
}

async fn load_template(
    source: &FilesystemTemplateSource,
    file_name: &str,
) -> Result<ocpp_station_sim::domain::template::StationTemplate, ocpp_station_sim::domain::ports::CollaboratorError> {
    use ocpp_station_sim::domain::ports::TemplateSource;
    source.get_template(file_name).await
}

/// Missing id-tag files are tolerated (spec.md §4.6: authorize gating only
/// applies "when the station has an authorised-id-tag file").
async fn load_id_tags(source: &FileIdTagSource, station_id: &str) -> Vec<String> {
    use ocpp_station_sim::domain::ports::IdTagSource;
    source.get_id_tags(&format!("{station_id}.txt")).await.unwrap_or_default()
}
