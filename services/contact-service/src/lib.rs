// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Contact Service Library
//!
//! The contact service hosts a small routing application together with the
//! server plumbing that introspects it:
//!
//! - Public listener: `/contact/{id}/details`, `/openapi`, `/health`
//! - Management listener: runtime subsystem toggles (`/mgmt/v1/...`)
//!
//! # Modules
//!
//! - [`config`] - Service configuration (listener addresses, initial state)
//! - [`context`] - API context and subsystem registry
//! - [`openapi`] - OpenAPI document pipeline

pub mod config;
pub mod context;
pub mod openapi;

use contact_api::{ContactApi, ContactPath, HealthResponse};
use dropshot::{
    Body, HttpError, HttpResponseOk, HttpResponseUpdatedNoContent, Path, RequestContext,
};
use http::Response;
use management_api::{ManagementApi, SubsystemPath, SubsystemStatus};

use crate::context::ApiContext;

/// Contact service API implementation
///
/// This enum serves as the implementation type for both the `ContactApi`
/// and `ManagementApi` traits. It contains no data - all state is stored in
/// the `ApiContext`.
pub enum ContactServiceImpl {}

impl ContactApi for ContactServiceImpl {
    type Context = ApiContext;

    async fn get_contact_details(
        _rqctx: RequestContext<Self::Context>,
        path: Path<ContactPath>,
    ) -> Result<Response<Body>, HttpError> {
        let id = path.into_inner().id;

        tracing::debug!(contact_id = %id, "Serving contact details");

        Response::builder()
            .status(200)
            .header("Content-Type", "text/plain;charset=UTF-8")
            .body(format!("ID: {}", id).into())
            .map_err(|e| HttpError::for_internal_error(format!("Failed to build response: {}", e)))
    }

    async fn get_openapi_document(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<Response<Body>, HttpError> {
        let ctx = rqctx.context();

        if !ctx.subsystems.openapi_enabled() {
            return Err(HttpError::for_not_found(
                None,
                "OpenAPI subsystem is disabled".to_string(),
            ));
        }

        Response::builder()
            .status(200)
            .header("Content-Type", "application/yaml")
            .body(ctx.openapi_document.as_str().to_owned().into())
            .map_err(|e| HttpError::for_internal_error(format!("Failed to build response: {}", e)))
    }

    async fn health(
        _rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<HealthResponse>, HttpError> {
        Ok(HttpResponseOk(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }))
    }
}

impl ManagementApi for ContactServiceImpl {
    type Context = ApiContext;

    async fn list_subsystems(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<Vec<SubsystemStatus>>, HttpError> {
        Ok(HttpResponseOk(rqctx.context().subsystems.statuses()))
    }

    async fn get_subsystem(
        rqctx: RequestContext<Self::Context>,
        path: Path<SubsystemPath>,
    ) -> Result<HttpResponseOk<SubsystemStatus>, HttpError> {
        let name = path.into_inner().name;

        let status = rqctx
            .context()
            .subsystems
            .status(&name)
            .ok_or_else(|| unknown_subsystem(&name))?;

        Ok(HttpResponseOk(status))
    }

    async fn enable_subsystem(
        rqctx: RequestContext<Self::Context>,
        path: Path<SubsystemPath>,
    ) -> Result<HttpResponseUpdatedNoContent, HttpError> {
        set_subsystem(rqctx.context(), &path.into_inner().name, true)
    }

    async fn disable_subsystem(
        rqctx: RequestContext<Self::Context>,
        path: Path<SubsystemPath>,
    ) -> Result<HttpResponseUpdatedNoContent, HttpError> {
        set_subsystem(rqctx.context(), &path.into_inner().name, false)
    }
}

fn set_subsystem(
    ctx: &ApiContext,
    name: &str,
    enabled: bool,
) -> Result<HttpResponseUpdatedNoContent, HttpError> {
    if !ctx.subsystems.set_enabled(name, enabled) {
        return Err(unknown_subsystem(name));
    }

    tracing::info!(subsystem = %name, enabled, "Subsystem state changed");
    Ok(HttpResponseUpdatedNoContent())
}

fn unknown_subsystem(name: &str) -> HttpError {
    HttpError::for_not_found(None, format!("Unknown subsystem: {}", name))
}
