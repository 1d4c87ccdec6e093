// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Dropshot API trait for the contact service public surface.
//!
//! The contact service exposes a small routing application whose endpoints
//! embed path parameters, plus the server plumbing that describes that
//! application:
//!
//! - `GET /contact/{id}/details` - Plain-text contact details
//! - `GET /openapi` - Generated OpenAPI document (YAML), gated on the
//!   `openapi` subsystem being enabled
//! - `GET /health` - Liveness check
//!
//! Endpoints tagged `system` are server plumbing and are excluded from the
//! generated OpenAPI document; only `contacts` endpoints are documented.

use dropshot::{Body, HttpError, HttpResponseOk, Path, RequestContext};
use http::Response;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Path parameters for contact-specific endpoints.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ContactPath {
    /// The contact identifier
    pub id: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    /// Overall service status ("ok" when healthy)
    pub status: String,
    /// Service version
    pub version: String,
}

/// Contact Service API
///
/// Public surface of the contact service. The `contacts` endpoints form the
/// application; the `system` endpoints are served alongside it but belong to
/// the server itself.
#[dropshot::api_description]
pub trait ContactApi {
    /// Context type for request handlers
    type Context: Send + Sync + 'static;

    /// Get contact details
    ///
    /// Returns the details line for one contact as plain text
    /// (`text/plain;charset=UTF-8`). The body is `ID: {id}` for the
    /// requested identifier.
    #[endpoint {
        method = GET,
        path = "/contact/{id}/details",
        tags = ["contacts"],
    }]
    async fn get_contact_details(
        rqctx: RequestContext<Self::Context>,
        path: Path<ContactPath>,
    ) -> Result<Response<Body>, HttpError>;

    /// Get the OpenAPI document
    ///
    /// Returns the generated OpenAPI document for the application endpoints
    /// as YAML. Returns 404 while the `openapi` subsystem is disabled.
    #[endpoint {
        method = GET,
        path = "/openapi",
        tags = ["system"],
    }]
    async fn get_openapi_document(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<Response<Body>, HttpError>;

    /// Health check endpoint
    #[endpoint {
        method = GET,
        path = "/health",
        tags = ["system"],
    }]
    async fn health(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<HealthResponse>, HttpError>;
}
