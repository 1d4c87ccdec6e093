// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Dropshot API trait for the contact service management surface.
//!
//! The management API is served on a separate listener and lets an operator
//! (or a test harness) toggle named server subsystems at runtime without
//! restarting the service. Today the only known subsystem is `openapi`,
//! which gates the `/openapi` document endpoint on the public listener.
//!
//! ## Endpoints
//!
//! - `GET /mgmt/v1/subsystems` - List all subsystems and their state
//! - `GET /mgmt/v1/subsystems/{name}` - Get one subsystem's state
//! - `PUT /mgmt/v1/subsystems/{name}/enable` - Enable a subsystem
//! - `PUT /mgmt/v1/subsystems/{name}/disable` - Disable a subsystem
//!
//! Enable and disable are idempotent. All operations return 404 for
//! subsystem names the server does not know.

use dropshot::{HttpError, HttpResponseOk, HttpResponseUpdatedNoContent, Path, RequestContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Name of the subsystem gating the `/openapi` document endpoint.
pub const OPENAPI_SUBSYSTEM: &str = "openapi";

/// Path parameters for subsystem-specific endpoints.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SubsystemPath {
    /// The subsystem name (e.g. "openapi")
    pub name: String,
}

/// State of one named server subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubsystemStatus {
    /// Subsystem name
    pub name: String,
    /// Whether the subsystem is currently enabled
    pub enabled: bool,
}

/// Contact Service Management API
#[dropshot::api_description]
pub trait ManagementApi {
    /// Context type for request handlers
    type Context: Send + Sync + 'static;

    /// List subsystems
    ///
    /// Returns the state of every subsystem the server knows about.
    #[endpoint {
        method = GET,
        path = "/mgmt/v1/subsystems",
        tags = ["subsystems"],
    }]
    async fn list_subsystems(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<Vec<SubsystemStatus>>, HttpError>;

    /// Get subsystem state
    ///
    /// Returns 404 if the subsystem name is unknown.
    #[endpoint {
        method = GET,
        path = "/mgmt/v1/subsystems/{name}",
        tags = ["subsystems"],
    }]
    async fn get_subsystem(
        rqctx: RequestContext<Self::Context>,
        path: Path<SubsystemPath>,
    ) -> Result<HttpResponseOk<SubsystemStatus>, HttpError>;

    /// Enable a subsystem
    ///
    /// Idempotent: enabling an already-enabled subsystem succeeds.
    /// Returns 404 if the subsystem name is unknown.
    #[endpoint {
        method = PUT,
        path = "/mgmt/v1/subsystems/{name}/enable",
        tags = ["subsystems"],
    }]
    async fn enable_subsystem(
        rqctx: RequestContext<Self::Context>,
        path: Path<SubsystemPath>,
    ) -> Result<HttpResponseUpdatedNoContent, HttpError>;

    /// Disable a subsystem
    ///
    /// Idempotent: disabling an already-disabled subsystem succeeds.
    /// Returns 404 if the subsystem name is unknown.
    #[endpoint {
        method = PUT,
        path = "/mgmt/v1/subsystems/{name}/disable",
        tags = ["subsystems"],
    }]
    async fn disable_subsystem(
        rqctx: RequestContext<Self::Context>,
        path: Path<SubsystemPath>,
    ) -> Result<HttpResponseUpdatedNoContent, HttpError>;
}
