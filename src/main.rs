//! Disaster Preparedness Planning Service
//!
//! Serves personalized emergency plans over HTTP:
//! 1. Resolves the caller's location (OpenCage)
//! 2. Gathers weather (OpenWeather) and environmental signals (Wolfram|Alpha)
//! 3. Assesses risk per disaster type (threshold rules or an LLM narrative)
//! 4. Returns supplies, an action plan, disaster cards and contacts as JSON
//!
//! Usage:
//!   cargo run --release                                # Port from service.toml (default 8080)
//!   cargo run --release -- --endpoint 9000             # Override the port
//!   cargo run --release -- --config /etc/readyplan.toml
//!
//! Environment:
//!   OPENCAGE_API_KEY (required), OPENWEATHER_API_KEY, WOLFRAM_APP_ID,
//!   OPENAI_API_KEY, RUST_LOG

use readyplan_service::config::{self, ApiKeys, DEFAULT_CONFIG_PATH};
use readyplan_service::endpoint;
use readyplan_service::planner::Planner;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🧭 Disaster Preparedness Planning Service");
    println!("=========================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut endpoint_port: Option<u16> = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                match args.get(i + 1).and_then(|p| p.parse().ok()) {
                    Some(port) => endpoint_port = Some(port),
                    None => {
                        eprintln!("Error: --endpoint requires a port number");
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            "--config" => {
                match args.get(i + 1) {
                    Some(path) => config_path = PathBuf::from(path),
                    None => {
                        eprintln!("Error: --config requires a file path");
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--endpoint PORT] [--config PATH]", args[0]);
                std::process::exit(1);
            }
        }
    }

    println!("📋 Loading configuration from {}...", config_path.display());
    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ {}\n", e);
            std::process::exit(1);
        }
    };

    let keys = match ApiKeys::from_env() {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("\n❌ {}", e);
            eprintln!("Copy .env.example to .env and fill in your API keys\n");
            std::process::exit(1);
        }
    };

    println!("   Weather:          {}", if keys.openweather.is_some() { "enabled" } else { "disabled" });
    println!("   Knowledge engine: {}", if keys.wolfram.is_some() { "enabled" } else { "disabled" });

    let planner = match Planner::from_config(&config, &keys) {
        Ok(planner) => planner,
        Err(e) => {
            eprintln!("\n❌ Initialization failed: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("   Risk source:      {}", planner.risk_source_name());
    println!("   Active disasters: {:?}\n", config.risk.active_disasters);

    let port = endpoint_port.unwrap_or(config.server.port);
    println!("🚀 Starting HTTP endpoint on http://0.0.0.0:{}", port);
    println!("   Press Ctrl+C to stop\n");

    if let Err(e) = endpoint::start_endpoint_server(port, planner) {
        eprintln!("\n❌ Endpoint server error: {}", e);
        std::process::exit(1);
    }
}
