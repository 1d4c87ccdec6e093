// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Service configuration

use std::net::{Ipv4Addr, SocketAddr};

/// Default port for the public HTTP listener
const DEFAULT_PORT: u16 = 8080;

/// Default port for the management listener
const DEFAULT_MANAGEMENT_PORT: u16 = 9090;

/// Service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Bind address for the public listener (contact endpoints, /openapi,
    /// /health)
    pub bind_address: SocketAddr,
    /// Bind address for the management listener
    pub management_bind_address: SocketAddr,
    /// Whether the `openapi` subsystem starts enabled
    pub openapi_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            // Management stays loopback-only unless explicitly configured.
            management_bind_address: SocketAddr::from((
                Ipv4Addr::LOCALHOST,
                DEFAULT_MANAGEMENT_PORT,
            )),
            openapi_enabled: true,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_address = std::env::var("BIND_ADDRESS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.bind_address);

        let management_bind_address = std::env::var("MANAGEMENT_BIND_ADDRESS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.management_bind_address);

        let openapi_enabled = std::env::var("OPENAPI_ENABLED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.openapi_enabled);

        Self {
            bind_address,
            management_bind_address,
            openapi_enabled,
        }
    }
}
