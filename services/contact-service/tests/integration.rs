// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Integration tests for the contact service.
//!
//! Each test starts the public and management listeners in-process, then
//! drives them over HTTP exactly as an external consumer would:
//!
//! 1. The contact endpoint returns the expected plain-text body
//! 2. The OpenAPI document correctly describes the path-parameterized
//!    endpoint (non-empty paths, get operation, 200/text-plain response,
//!    exactly one required path parameter named "id")
//! 3. The `/openapi` endpoint is gated on the `openapi` subsystem
//! 4. The management API reports and toggles subsystem state
//!
//! Setup mirrors a managed-server lifecycle: connect the management client
//! and enable the `openapi` subsystem only if it is not already enabled.
//! Teardown disables the subsystem and closes the client, releasing the
//! client even when the disable call fails.

use std::net::{Ipv4Addr, SocketAddr};

use dropshot::{ConfigDropshot, ConfigLogging, ConfigLoggingLevel, HttpServerStarter};
use management_client::{ManagementClient, ManagementError};
use reqwest::StatusCode;
use serde_yaml::Value;

use contact_service::ContactServiceImpl;
use contact_service::config::ServiceConfig;
use contact_service::context::ApiContext;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// Test context holding both in-process servers and the clients used to
/// drive them.
struct TestContext {
    /// HTTP client for the public listener
    client: reqwest::Client,
    /// Base URL for the public listener
    app_url: String,
    /// Management client connected to the management listener
    mgmt: ManagementClient,
}

impl TestContext {
    /// Start both listeners on ephemeral ports, connect the management
    /// client, and enable the `openapi` subsystem if it is not already
    /// enabled.
    async fn new() -> Self {
        // reqwest is built with `rustls-no-provider`; the provider must be
        // installed before the first client is constructed.
        install_crypto_provider();

        let ephemeral = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));

        // The subsystem starts disabled so setup exercises the same
        // conditional enable a freshly provisioned server would need.
        let config = ServiceConfig {
            bind_address: ephemeral,
            management_bind_address: ephemeral,
            openapi_enabled: false,
        };

        let api_context = ApiContext::new(&config).expect("failed to create API context");

        let api = contact_api::contact_api_mod::api_description::<ContactServiceImpl>()
            .expect("failed to create API description");
        let management_api =
            management_api::management_api_mod::api_description::<ContactServiceImpl>()
                .expect("failed to create management API description");

        let config_dropshot = ConfigDropshot {
            bind_address: ephemeral,
            default_request_body_max_bytes: 1024,
            default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
            ..Default::default()
        };

        let config_logging = ConfigLogging::StderrTerminal {
            level: ConfigLoggingLevel::Error,
        };
        let log = config_logging
            .to_logger("test-contact-service")
            .expect("failed to create logger");

        let server = HttpServerStarter::new(&config_dropshot, api, api_context.clone(), &log)
            .expect("failed to create server")
            .start();
        let management_server =
            HttpServerStarter::new(&config_dropshot, management_api, api_context, &log)
                .expect("failed to create management server")
                .start();

        let app_url = format!("http://{}", server.local_addr());
        let mgmt_url = format!("http://{}", management_server.local_addr());

        // Leak the server handles to keep them running for the duration of
        // the test (cleaned up when the test process exits)
        std::mem::forget(server);
        std::mem::forget(management_server);

        let mgmt = ManagementClient::connect(&mgmt_url)
            .expect("failed to connect the management client");

        if !mgmt
            .openapi_enabled()
            .await
            .expect("failed to query the openapi subsystem")
        {
            mgmt.enable_openapi()
                .await
                .expect("failed to enable the openapi subsystem");
        }

        Self {
            client: reqwest::Client::new(),
            app_url,
            mgmt,
        }
    }

    /// Disable the `openapi` subsystem and close the management client.
    /// The client is released even when the disable call fails.
    async fn teardown(self) {
        let disabled = self.mgmt.disable_openapi().await;
        self.mgmt.close();
        disabled.expect("failed to disable the openapi subsystem during teardown");
    }

    fn openapi_url(&self) -> String {
        format!("{}/openapi", self.app_url)
    }

    /// Fetch `/openapi` expecting success and parse the body as YAML.
    async fn fetch_openapi_document(&self) -> Value {
        let response = self
            .client
            .get(self.openapi_url())
            .send()
            .await
            .expect("openapi request failed");
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "openapi endpoint should return 200"
        );

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .expect("openapi response missing Content-Type header");
        assert_eq!(
            content_type,
            "application/yaml",
            "openapi endpoint should serve YAML"
        );

        let body = response.text().await.expect("failed to read openapi body");
        serde_yaml::from_str(&body).expect("openapi body is not valid YAML")
    }
}

/// Install the process-wide rustls crypto provider (ring). Racing installs
/// across tests lose harmlessly.
fn install_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}

/// Look up `key` in a YAML mapping, panicking with a message naming the
/// missing field and where it was expected.
fn property<'a>(value: &'a Value, key: &str, context: &str) -> &'a Value {
    value
        .get(key)
        .unwrap_or_else(|| panic!("\"{}\" property missing in {}", key, context))
}

/// Assert a YAML value is a non-empty mapping.
fn non_empty_mapping<'a>(value: &'a Value, what: &str) -> &'a serde_yaml::Mapping {
    let mapping = value
        .as_mapping()
        .unwrap_or_else(|| panic!("{} is not a mapping", what));
    assert!(!mapping.is_empty(), "{} is empty", what);
    mapping
}

// ============================================================================
// Tests
// ============================================================================

/// The contact endpoint embeds its path parameter in the response: GET
/// `/contact/1/details` answers 200 with a UTF-8 plain-text body `ID: 1`.
#[tokio::test]
async fn app_endpoint_returns_contact_details() {
    let ctx = TestContext::new().await;

    let id = "1";
    let response = ctx
        .client
        .get(format!("{}/contact/{}/details", ctx.app_url, id))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .expect("missing Content-Type header")
        .to_str()
        .expect("Content-Type header is not valid UTF-8")
        .to_string();
    assert!(
        content_type.eq_ignore_ascii_case("text/plain;charset=UTF-8"),
        "unexpected content type: {}",
        content_type
    );

    let body = response.text().await.expect("failed to read body");
    assert_eq!(body, format!("ID: {}", id));

    ctx.teardown().await;
}

/// The generated document describes the path-parameterized endpoint: the
/// `get` operation documents a 200 plain-text response and the path item
/// declares exactly one required path parameter named `id`.
#[tokio::test]
async fn openapi_document_shape_for_path_parameter() {
    let ctx = TestContext::new().await;

    let document = ctx.fetch_openapi_document().await;

    let paths = property(&document, "paths", "document root");
    non_empty_mapping(paths, "\"paths\" property");

    let path_item = property(paths, "/contact/{id}/details", "\"paths\"");
    non_empty_mapping(path_item, "\"/contact/{id}/details\" property");

    let get_op = property(path_item, "get", "\"/contact/{id}/details\"");
    non_empty_mapping(get_op, "\"/contact/{id}/details\" \"get\" property");

    let responses = property(get_op, "responses", "\"/contact/{id}/details\" GET operation");
    let http_200 = property(responses, "200", "GET \"responses\"");
    let content = property(http_200, "content", "GET response for HTTP status 200");
    assert!(
        content.get("text/plain").is_some(),
        "GET 200 response \"content\" has no \"text/plain\" property"
    );

    let parameters = property(path_item, "parameters", "\"/contact/{id}/details\"")
        .as_sequence()
        .expect("\"parameters\" is not a sequence");
    assert_eq!(
        parameters.len(),
        1,
        "\"/contact/{{id}}/details\" should declare exactly 1 parameter"
    );

    let path_param = &parameters[0];
    assert_eq!(
        path_param.get("name").and_then(Value::as_str),
        Some("id"),
        "\"name\" property of parameter [0] should be \"id\""
    );
    assert_eq!(
        path_param.get("in").and_then(Value::as_str),
        Some("path"),
        "\"in\" property of parameter [0] should be \"path\""
    );
    assert_eq!(
        path_param.get("required").and_then(Value::as_bool),
        Some(true),
        "\"required\" property of parameter [0] should be true"
    );

    ctx.teardown().await;
}

/// `/openapi` is gated on the `openapi` subsystem: 404 while disabled,
/// 200 again after re-enabling.
#[tokio::test]
async fn openapi_endpoint_requires_enabled_subsystem() {
    let ctx = TestContext::new().await;

    ctx.mgmt
        .disable_openapi()
        .await
        .expect("failed to disable the openapi subsystem");

    let response = ctx
        .client
        .get(ctx.openapi_url())
        .send()
        .await
        .expect("request failed");
    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "disabled openapi subsystem should yield 404"
    );

    ctx.mgmt
        .enable_openapi()
        .await
        .expect("failed to re-enable the openapi subsystem");

    let document = ctx.fetch_openapi_document().await;
    assert!(document.get("openapi").is_some(), "document missing version field");

    ctx.teardown().await;
}

/// The management API lists subsystems, reports state transitions, and
/// rejects unknown subsystem names.
#[tokio::test]
async fn management_reports_subsystem_state() {
    let ctx = TestContext::new().await;

    // Setup enabled the subsystem; the list must reflect that.
    let subsystems = ctx.mgmt.subsystems().await.expect("failed to list subsystems");
    assert_eq!(subsystems.len(), 1);
    assert_eq!(subsystems[0].name, "openapi");
    assert!(subsystems[0].enabled);

    ctx.mgmt
        .disable_openapi()
        .await
        .expect("failed to disable the openapi subsystem");
    let status = ctx
        .mgmt
        .subsystem_status("openapi")
        .await
        .expect("failed to query the openapi subsystem");
    assert!(!status.enabled, "subsystem should report disabled");

    // Disable is idempotent.
    ctx.mgmt
        .disable_openapi()
        .await
        .expect("repeated disable should succeed");

    let err = ctx
        .mgmt
        .subsystem_status("metrics")
        .await
        .expect_err("unknown subsystem should be rejected");
    assert!(
        matches!(err, ManagementError::UnknownSubsystem(ref name) if name == "metrics"),
        "unexpected error: {}",
        err
    );

    ctx.teardown().await;
}

/// Liveness check: `/health` reports ok and the crate version.
#[tokio::test]
async fn health_endpoint_reports_ok() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(format!("{}/health", ctx.app_url))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let health: serde_json::Value = response.json().await.expect("health body is not JSON");
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));

    ctx.teardown().await;
}
