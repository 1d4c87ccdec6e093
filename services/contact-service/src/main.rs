// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Contact Service
//!
//! Hosts the contact routing application on the public listener and the
//! subsystem management API on a separate management listener. The OpenAPI
//! document for the application endpoints is rendered at startup and served
//! at `/openapi` while the `openapi` subsystem is enabled.

use anyhow::{Context, Result, anyhow};
use dropshot::{ConfigDropshot, ConfigLogging, ConfigLoggingLevel, HttpServerStarter};
use tracing::info;

use contact_service::ContactServiceImpl;
use contact_service::config::ServiceConfig;
use contact_service::context::ApiContext;

/// Default maximum request body size (bytes). Every endpoint is a GET or a
/// bodyless PUT, so this stays small.
const DEFAULT_BODY_MAX_BYTES: usize = 1024;

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let buildstamp = option_env!("STAMP").unwrap_or("no-STAMP");
    println!("{} {} ({})", name, version, buildstamp);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --version and --help
    let args: Vec<String> = std::env::args().collect();
    #[allow(clippy::never_loop)] // Intentional: early return on first recognized arg
    for arg in &args[1..] {
        match arg.as_str() {
            "-V" | "--version" => {
                print_version();
                return Ok(());
            }
            "-h" | "--help" => {
                print_version();
                println!("Usage: {} [OPTIONS]", args[0]);
                println!();
                println!("Options:");
                println!("  -h, --help       Display this information");
                println!("  -V, --version    Display the program's version number");
                println!();
                println!("Environment variables:");
                println!("  BIND_ADDRESS                Public listener address (default: 0.0.0.0:8080)");
                println!("  MANAGEMENT_BIND_ADDRESS     Management listener address (default: 127.0.0.1:9090)");
                println!("  OPENAPI_ENABLED             Whether /openapi starts enabled (default: true)");
                println!("  RUST_LOG                    Log filter (default: contact_service=info,dropshot=info)");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown option: {}", arg);
                std::process::exit(1);
            }
        }
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "contact_service=info,dropshot=info".to_string()),
        ))
        .init();

    print_version();

    // Load configuration
    let config = ServiceConfig::from_env();

    // Create API context (renders the OpenAPI document)
    let api_context = ApiContext::new(&config).context("Failed to create API context")?;

    // Get API descriptions from the trait implementations
    let api = contact_api::contact_api_mod::api_description::<ContactServiceImpl>()
        .map_err(|e| anyhow!("Failed to create API description: {}", e))?;
    let management_api =
        management_api::management_api_mod::api_description::<ContactServiceImpl>()
            .map_err(|e| anyhow!("Failed to create management API description: {}", e))?;

    let config_logging = ConfigLogging::StderrTerminal {
        level: ConfigLoggingLevel::Info,
    };

    // Public listener
    let config_dropshot = ConfigDropshot {
        bind_address: config.bind_address,
        default_request_body_max_bytes: DEFAULT_BODY_MAX_BYTES,
        default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
        ..Default::default()
    };
    let log = config_logging
        .to_logger("contact-service")
        .map_err(|error| anyhow!("failed to create logger: {}", error))?;
    let server = HttpServerStarter::new(&config_dropshot, api, api_context.clone(), &log)
        .map_err(|error| anyhow!("failed to create server: {}", error))?
        .start();

    // Management listener
    let config_management = ConfigDropshot {
        bind_address: config.management_bind_address,
        default_request_body_max_bytes: DEFAULT_BODY_MAX_BYTES,
        default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
        ..Default::default()
    };
    let management_log = config_logging
        .to_logger("contact-service-mgmt")
        .map_err(|error| anyhow!("failed to create logger: {}", error))?;
    let management_server = HttpServerStarter::new(
        &config_management,
        management_api,
        api_context,
        &management_log,
    )
    .map_err(|error| anyhow!("failed to create management server: {}", error))?
    .start();

    info!("Contact service running on http://{}", config.bind_address);
    info!(
        "Management API on http://{}",
        config.management_bind_address
    );

    let (server_result, management_result) = tokio::join!(server, management_server);
    server_result.map_err(|error| anyhow!("server failed: {}", error))?;
    management_result.map_err(|error| anyhow!("management server failed: {}", error))
}
