// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! API context shared by the public and management listeners

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use management_api::{OPENAPI_SUBSYSTEM, SubsystemStatus};

use crate::config::ServiceConfig;
use crate::openapi;

/// Runtime state of the named server subsystems.
///
/// Today the registry holds a single subsystem, `openapi`. Lookups go
/// through [`SubsystemRegistry::find`] so adding a subsystem later is a
/// one-line change.
#[derive(Debug)]
pub struct SubsystemRegistry {
    openapi_enabled: AtomicBool,
}

impl SubsystemRegistry {
    fn new(openapi_enabled: bool) -> Self {
        Self {
            openapi_enabled: AtomicBool::new(openapi_enabled),
        }
    }

    fn find(&self, name: &str) -> Option<&AtomicBool> {
        match name {
            OPENAPI_SUBSYSTEM => Some(&self.openapi_enabled),
            _ => None,
        }
    }

    /// State of every known subsystem.
    pub fn statuses(&self) -> Vec<SubsystemStatus> {
        vec![SubsystemStatus {
            name: OPENAPI_SUBSYSTEM.to_string(),
            enabled: self.openapi_enabled.load(Ordering::Relaxed),
        }]
    }

    /// State of one subsystem; `None` for unknown names.
    pub fn status(&self, name: &str) -> Option<SubsystemStatus> {
        self.find(name).map(|flag| SubsystemStatus {
            name: name.to_string(),
            enabled: flag.load(Ordering::Relaxed),
        })
    }

    /// Set one subsystem's state. Returns false for unknown names.
    pub fn set_enabled(&self, name: &str, enabled: bool) -> bool {
        match self.find(name) {
            Some(flag) => {
                flag.store(enabled, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Whether the `openapi` subsystem is enabled.
    pub fn openapi_enabled(&self) -> bool {
        self.openapi_enabled.load(Ordering::Relaxed)
    }
}

/// API context shared across all request handlers on both listeners.
///
/// Clones share the same registry and document; both Dropshot servers hold
/// a clone.
#[derive(Clone)]
pub struct ApiContext {
    /// Subsystem on/off switches
    pub subsystems: Arc<SubsystemRegistry>,
    /// OpenAPI document for the application endpoints, rendered to YAML
    /// once at startup. The document only depends on the API trait, so it
    /// never changes at runtime.
    pub openapi_document: Arc<String>,
}

impl ApiContext {
    /// Create a new API context, rendering the OpenAPI document.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let document = openapi::render_document_yaml()
            .context("Failed to render the OpenAPI document")?;

        Ok(Self {
            subsystems: Arc::new(SubsystemRegistry::new(config.openapi_enabled)),
            openapi_document: Arc::new(document),
        })
    }
}
