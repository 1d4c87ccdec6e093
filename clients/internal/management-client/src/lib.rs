// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Client library for the contact service management API.
//!
//! The management API toggles named server subsystems at runtime. This
//! client wraps it in typed methods so callers (operators, test harnesses)
//! never deal with raw HTTP:
//!
//! ```ignore
//! use management_client::ManagementClient;
//!
//! let mgmt = ManagementClient::connect("http://127.0.0.1:9090")?;
//! if !mgmt.openapi_enabled().await? {
//!     mgmt.enable_openapi().await?;
//! }
//! // ...
//! mgmt.disable_openapi().await?;
//! mgmt.close();
//! ```

use std::time::Duration;

use management_api::{OPENAPI_SUBSYSTEM, SubsystemStatus};
use reqwest::StatusCode;
use thiserror::Error;

/// Request timeout for management calls. Management operations are local
/// state flips; anything slower than this indicates a stuck server.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors returned by the management client.
#[derive(Debug, Error)]
pub enum ManagementError {
    /// The request never produced a usable response.
    #[error("management transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered, but the body could not be decoded as the
    /// expected type.
    #[error("management response decode error: {0}")]
    Decode(#[source] reqwest::Error),

    /// The server does not know the named subsystem.
    #[error("unknown subsystem: {0}")]
    UnknownSubsystem(String),

    /// The server answered with a status the client did not expect.
    #[error("unexpected management response status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status the server returned
        status: StatusCode,
        /// Response body, for the error message
        body: String,
    },
}

/// Typed client for the contact service management API.
///
/// The client owns a connection pool for the lifetime of the value. Call
/// [`ManagementClient::close`] when done so the release point is explicit;
/// dropping the client releases the pool as well.
pub struct ManagementClient {
    client: reqwest::Client,
    base_url: String,
}

impl ManagementClient {
    /// Create a client for the management listener at `base_url`
    /// (e.g. `http://127.0.0.1:9090`).
    pub fn connect(base_url: &str) -> Result<Self, ManagementError> {
        install_crypto_provider();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List every subsystem the server knows about.
    pub async fn subsystems(&self) -> Result<Vec<SubsystemStatus>, ManagementError> {
        let url = format!("{}/mgmt/v1/subsystems", self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(unexpected(response).await);
        }
        response.json().await.map_err(ManagementError::Decode)
    }

    /// Get the state of one subsystem.
    ///
    /// Returns [`ManagementError::UnknownSubsystem`] if the server does not
    /// know the name.
    pub async fn subsystem_status(&self, name: &str) -> Result<SubsystemStatus, ManagementError> {
        let url = format!("{}/mgmt/v1/subsystems/{}", self.base_url, name);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(ManagementError::Decode),
            StatusCode::NOT_FOUND => Err(ManagementError::UnknownSubsystem(name.to_string())),
            _ => Err(unexpected(response).await),
        }
    }

    /// Enable a subsystem. Idempotent.
    pub async fn enable_subsystem(&self, name: &str) -> Result<(), ManagementError> {
        self.toggle(name, "enable").await
    }

    /// Disable a subsystem. Idempotent.
    pub async fn disable_subsystem(&self, name: &str) -> Result<(), ManagementError> {
        self.toggle(name, "disable").await
    }

    /// Whether the `openapi` subsystem is currently enabled.
    pub async fn openapi_enabled(&self) -> Result<bool, ManagementError> {
        Ok(self.subsystem_status(OPENAPI_SUBSYSTEM).await?.enabled)
    }

    /// Enable the `openapi` subsystem.
    pub async fn enable_openapi(&self) -> Result<(), ManagementError> {
        self.enable_subsystem(OPENAPI_SUBSYSTEM).await
    }

    /// Disable the `openapi` subsystem.
    pub async fn disable_openapi(&self) -> Result<(), ManagementError> {
        self.disable_subsystem(OPENAPI_SUBSYSTEM).await
    }

    /// Consume the client, releasing its connection pool.
    pub fn close(self) {}

    async fn toggle(&self, name: &str, action: &str) -> Result<(), ManagementError> {
        let url = format!("{}/mgmt/v1/subsystems/{}/{}", self.base_url, name, action);
        let response = self.client.put(&url).send().await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(ManagementError::UnknownSubsystem(name.to_string())),
            _ => Err(unexpected(response).await),
        }
    }
}

/// Build an `UnexpectedStatus` error from a response, salvaging whatever
/// body text is readable.
async fn unexpected(response: reqwest::Response) -> ManagementError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ManagementError::UnexpectedStatus { status, body }
}

/// Install the process-wide rustls crypto provider.
///
/// The workspace builds reqwest with `rustls-no-provider`, so the provider
/// must be installed before the first client is constructed or the build
/// panics. Concurrent installs race benignly; the loser keeps the winner's
/// provider.
fn install_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}
