//! TravelOps back-office — service entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Load config
//!   4. Resolve effective log level (CLI `-v` flags > env > config)
//!   5. Init logger once
//!   6. Load the manual and seed the record stores
//!   7. Build the LLM provider and recommender
//!   8. Spawn Ctrl-C → shutdown signal watcher
//!   9. Start comms (HTTP channel) and wait for shutdown

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use travelops_backoffice::config::{self, Config};
use travelops_backoffice::error::AppError;
use travelops_backoffice::llm::providers;
use travelops_backoffice::logger;
use travelops_backoffice::subsystems::{
    Stores,
    comms::{self, BackofficeState},
    manual::Manual,
    recommend::Recommender,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    let force_cli_level = args.log_level.is_some();
    // Directive strings (`info,axum=debug`) are left to EnvFilter.
    if !effective_log_level.contains(['=', ',']) {
        logger::parse_level(effective_log_level)?;
    }
    logger::init(effective_log_level, force_cli_level)?;

    info!(
        service = %config.service_name,
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        "config loaded"
    );

    let manual = Manual::load(&config.manual_path)?;
    let stores = Stores::seeded();
    info!(
        agents = stores.roster.len(),
        suppliers = stores.vendors.supplier_count(),
        manual_modules = manual.list().len(),
        "stores seeded"
    );

    let provider = providers::build(&config.llm, config.llm_api_key.clone())
        .map_err(|e| AppError::Config(e.to_string()))?;
    if config.llm.provider != "dummy" && config.llm_api_key.is_none() {
        info!(provider = %config.llm.provider, "LLM_API_KEY not set — sending requests without auth");
    }
    let recommender = Recommender::new(provider, &config);

    let state = Arc::new(BackofficeState::new(stores, manual, recommender));

    // Shared shutdown token — Ctrl-C cancels it, all tasks watch it.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    print_startup_summary(&config);

    let handle = comms::start(&config, state, shutdown.clone());
    handle.join().await?;

    // Without channels the handle resolves at once; idle until Ctrl-C.
    shutdown.cancelled().await;
    info!("shutdown complete");
    Ok(())
}

fn print_startup_summary(config: &Config) {
    let fit = |text: String| -> String {
        const WIDTH: usize = 58;
        if text.chars().count() >= WIDTH {
            let mut out = text.chars().take(WIDTH - 1).collect::<String>();
            out.push('…');
            out
        } else {
            format!("{text:<WIDTH$}")
        }
    };

    let http_line = if config.comms_axum_should_load() {
        format!("http: {}", config.comms.axum.bind)
    } else {
        "http: disabled".to_string()
    };
    let llm_line = format!(
        "provider={} model={} timeout={}s",
        config.llm.provider, config.llm.openai.model, config.llm.openai.timeout_seconds
    );

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║   {}║", fit(format!("{} ({})", config.service_name, config.agency)));
    println!("║   {}║", fit(format!("pid: {}", std::process::id())));
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║   {}║", fit(http_line));
    println!("║   {}║", fit(llm_line));
    println!("║   {}║", fit(format!("manual: {}", config.manual_path.display())));
    println!("╚══════════════════════════════════════════════════════════════╝");
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: travelops [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: {})", config::DEFAULT_CONFIG_PATH);
                println!("  -v, -vv, -vvv, -vvvv       Set logging verbosity (warn, info, debug, trace)");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    //   -v → warn, -vv → info, -vvv → debug, -vvvv+ → trace
    let log_level = match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    };

    CliArgs { log_level, config_path }
}
