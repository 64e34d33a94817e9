//! HDB Resale Price Predictor - Main Entry Point
//!
//! Loads the model artifacts once, then reads form commands from stdin and
//! prints a rendered estimate for every submission.

use anyhow::{Context, Result};
use hdb_price_predictor::{
    config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH},
    feature_extractor::{FeatureExtractor, LeaseReference},
    models::{PricePredictor, ResourceBundle},
    report,
    session::{FormEvent, FormOutcome, FormSession},
    PredictorError,
};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::args().nth(1);
    let config = match &config_path {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => AppConfig::load()
            .with_context(|| format!("Failed to load configuration from {DEFAULT_CONFIG_PATH}"))?,
    };

    init_logging(&config.logging)?;
    info!(
        path = %config_path.as_deref().unwrap_or(DEFAULT_CONFIG_PATH),
        "Configuration loaded successfully"
    );

    ort::init()
        .with_name("hdb-price-predictor")
        .commit()
        .context("Failed to initialize ONNX Runtime")?;
    info!(onnx_threads = config.artifacts.onnx_threads, "ONNX Runtime initialized");

    // Artifacts are loaded exactly once; a failure here is fatal
    let resources = ResourceBundle::load(&config.artifacts).context("Failed to load resources")?;

    let lease_reference = LeaseReference::from_config(config.prediction.lease_reference_year);
    match lease_reference {
        LeaseReference::CurrentYear => info!(
            "Remaining lease computed against the current year; estimates change when the year rolls over"
        ),
        LeaseReference::Fixed(year) => info!(year = year, "Remaining lease pinned to a fixed year"),
    }

    let predictor = PricePredictor::new(
        &resources,
        FeatureExtractor::with_lease_reference(lease_reference),
    );
    let mut session = FormSession::new(predictor);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", report::render_banner(&config.app))?;
    writeln!(
        out,
        "Commands: set <field> <value> | <field>=<value> | reset | submit | {{json record}}"
    )?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let events = match FormEvent::parse(&line) {
            Ok(events) => events,
            Err(e) => {
                write!(out, "{}", report::render_rejection(&PredictorError::Input(e)))?;
                out.flush()?;
                continue;
            }
        };

        for event in events {
            match session.handle(event) {
                FormOutcome::Updated => {}
                FormOutcome::Estimated(estimate) => {
                    writeln!(out)?;
                    write!(out, "{}", report::render_estimate(&estimate, &config.map))?;
                    writeln!(out)?;
                }
                FormOutcome::Rejected(e) => {
                    write!(out, "{}", report::render_rejection(&e))?;
                }
            }
        }
        out.flush()?;
    }

    write!(out, "{}", report::render_footer(&config.app))?;

    if session.rejections() > 0 {
        warn!(
            submissions = session.submissions(),
            rejected = session.rejections(),
            "Session finished with rejected submissions"
        );
    } else {
        info!(submissions = session.submissions(), "Session finished");
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("hdb_price_predictor={}", logging.level)))
        .context("Invalid log level")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match logging.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }

    Ok(())
}
