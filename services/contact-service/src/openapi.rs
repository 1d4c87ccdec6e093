// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenAPI document pipeline.
//!
//! The served document is derived from the `ContactApi` trait description,
//! then reshaped so it describes the application the way consumers expect:
//!
//! 1. Operations tagged `system` (`/openapi` itself, `/health`) are server
//!    plumbing and are stripped; path items left without operations are
//!    dropped.
//! 2. Raw `Response<Body>` handlers carry no response schema in Dropshot's
//!    output, so their documented shape comes from a fixup table keyed by
//!    operation id. `get_contact_details` documents a 200 response with
//!    `text/plain` content.
//! 3. Path parameters shared by every operation on a path item are hoisted
//!    to the path-item `parameters` list, where parameters bound once per
//!    resource belong.
//! 4. Component schemas left unreferenced by the stripping are pruned.
//!
//! The document depends only on the trait, so it is rendered once at
//! startup and cached in the [`ApiContext`](crate::context::ApiContext).

use anyhow::{Context, Result, anyhow};
use indexmap::IndexMap;
use openapiv3::{
    MediaType, OpenAPI, Operation, Parameter, PathItem, ReferenceOr, Response, Responses, Schema,
    SchemaKind, StatusCode, Type,
};

use crate::ContactServiceImpl;

/// Title of the generated document.
pub const DOCUMENT_TITLE: &str = "Contact Service API";

/// Tag marking endpoints that are server plumbing rather than application
/// surface.
const SYSTEM_TAG: &str = "system";

/// Build the document served at `/openapi`.
pub fn build_document() -> Result<OpenAPI> {
    let mut document = base_document()?;

    strip_system_operations(&mut document);
    apply_response_fixups(&mut document);
    hoist_path_parameters(&mut document);
    prune_unreferenced_schemas(&mut document)?;

    Ok(document)
}

/// Build the document and render it as YAML.
pub fn render_document_yaml() -> Result<String> {
    let document = build_document()?;
    serde_yaml::to_string(&document).context("Failed to serialize the OpenAPI document as YAML")
}

/// Generate the unprocessed document from the API trait.
fn base_document() -> Result<OpenAPI> {
    let api = contact_api::contact_api_mod::api_description::<ContactServiceImpl>()
        .map_err(|e| anyhow!("Failed to create API description: {}", e))?;

    let version: semver::Version = env!("CARGO_PKG_VERSION")
        .parse()
        .context("Package version is not valid semver")?;

    let json = api
        .openapi(DOCUMENT_TITLE, version)
        .json()
        .context("Failed to generate the OpenAPI document")?;

    serde_json::from_value(json).context("Generated OpenAPI document does not match the 3.0 model")
}

/// Remove operations tagged `system`, then drop path items with no
/// operations left.
fn strip_system_operations(document: &mut OpenAPI) {
    document.paths.paths.retain(|_, item| {
        let ReferenceOr::Item(item) = item else {
            return true;
        };
        for slot in operation_slots(item) {
            if matches!(slot, Some(op) if op.tags.iter().any(|t| t == SYSTEM_TAG)) {
                *slot = None;
            }
        }
        operation_slots(item).into_iter().any(|slot| slot.is_some())
    });
}

/// Documented responses for raw-body handlers, keyed by operation id.
///
/// Dropshot cannot describe the response of a handler returning
/// `Response<Body>`, so the table is the source of truth for their shape.
fn apply_response_fixups(document: &mut OpenAPI) {
    for item in path_items(document) {
        for op in operation_slots(item).into_iter().flatten() {
            match op.operation_id.as_deref() {
                Some("get_contact_details") => {
                    op.responses =
                        plain_text_responses("Details line for the requested contact");
                }
                _ => {}
            }
        }
    }
}

/// A `200` response whose content is a plain-text string.
fn plain_text_responses(description: &str) -> Responses {
    let media = MediaType {
        schema: Some(ReferenceOr::Item(Schema {
            schema_data: Default::default(),
            schema_kind: SchemaKind::Type(Type::String(Default::default())),
        })),
        ..Default::default()
    };

    let mut content = IndexMap::new();
    content.insert("text/plain".to_string(), media);

    let mut responses = IndexMap::new();
    responses.insert(
        StatusCode::Code(200),
        ReferenceOr::Item(Response {
            description: description.to_string(),
            content,
            ..Default::default()
        }),
    );

    Responses {
        default: None,
        responses,
        ..Default::default()
    }
}

/// Hoist path parameters shared by every operation on a path item up to the
/// path-item parameter list.
fn hoist_path_parameters(document: &mut OpenAPI) {
    for item in path_items(document) {
        let mut ops: Vec<&mut Operation> =
            operation_slots(item).into_iter().flatten().collect();
        let Some(first) = ops.first() else {
            continue;
        };

        // Path parameters of the first operation that every other operation
        // also declares.
        let shared: Vec<ReferenceOr<Parameter>> = first
            .parameters
            .iter()
            .filter(|p| is_path_parameter(p))
            .filter(|p| ops.iter().all(|op| op.parameters.contains(p)))
            .cloned()
            .collect();

        if shared.is_empty() {
            continue;
        }

        for op in &mut ops {
            op.parameters.retain(|p| !shared.contains(p));
        }
        for param in shared {
            if !item.parameters.contains(&param) {
                item.parameters.push(param);
            }
        }
    }
}

/// Drop component schemas nothing references. Stripping operations can
/// orphan schemas (e.g. the health response); removal itself can orphan
/// more, so iterate to a fixed point.
fn prune_unreferenced_schemas(document: &mut OpenAPI) -> Result<()> {
    loop {
        let Some(components) = &document.components else {
            return Ok(());
        };
        if components.schemas.is_empty() {
            break;
        }

        let mut referenced = Vec::new();
        collect_refs(&serde_json::to_value(&*document)?, &mut referenced);

        let orphaned: Vec<String> = components
            .schemas
            .keys()
            .filter(|name| !referenced.contains(&format!("#/components/schemas/{}", name)))
            .cloned()
            .collect();
        if orphaned.is_empty() {
            break;
        }

        if let Some(components) = &mut document.components {
            components
                .schemas
                .retain(|name, _| !orphaned.contains(name));
        }
    }

    if document
        .components
        .as_ref()
        .is_some_and(|c| *c == openapiv3::Components::default())
    {
        document.components = None;
    }
    Ok(())
}

/// Collect every `$ref` string in a JSON tree.
fn collect_refs(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                if key == "$ref" {
                    if let Some(target) = child.as_str() {
                        out.push(target.to_string());
                    }
                }
                collect_refs(child, out);
            }
        }
        serde_json::Value::Array(items) => {
            for child in items {
                collect_refs(child, out);
            }
        }
        _ => {}
    }
}

fn is_path_parameter(param: &ReferenceOr<Parameter>) -> bool {
    matches!(param, ReferenceOr::Item(Parameter::Path { .. }))
}

/// Mutable references to every inline path item.
fn path_items(document: &mut OpenAPI) -> impl Iterator<Item = &mut PathItem> {
    document.paths.paths.values_mut().filter_map(|item| match item {
        ReferenceOr::Item(item) => Some(item),
        ReferenceOr::Reference { .. } => None,
    })
}

/// Mutable references to every method slot of a path item.
fn operation_slots(item: &mut PathItem) -> [&mut Option<Operation>; 8] {
    [
        &mut item.get,
        &mut item.put,
        &mut item.post,
        &mut item.delete,
        &mut item.options,
        &mut item.head,
        &mut item.patch,
        &mut item.trace,
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use openapiv3::ParameterSchemaOrContent;

    const DETAILS_PATH: &str = "/contact/{id}/details";

    fn details_item(document: &OpenAPI) -> &PathItem {
        match document.paths.paths.get(DETAILS_PATH) {
            Some(ReferenceOr::Item(item)) => item,
            other => panic!("missing path item for {}: {:?}", DETAILS_PATH, other),
        }
    }

    #[test]
    fn document_only_describes_application_paths() {
        let document = build_document().unwrap();
        let paths: Vec<&String> = document.paths.paths.keys().collect();
        assert_eq!(paths, vec![DETAILS_PATH], "system endpoints must be stripped");
    }

    #[test]
    fn details_operation_documents_plain_text_200() {
        let document = build_document().unwrap();
        let op = details_item(&document)
            .get
            .as_ref()
            .expect("GET operation missing");

        let response = match op.responses.responses.get(&StatusCode::Code(200)) {
            Some(ReferenceOr::Item(response)) => response,
            other => panic!("200 response missing: {:?}", other),
        };
        assert!(
            response.content.contains_key("text/plain"),
            "200 response must document text/plain content"
        );
        assert!(op.responses.default.is_none());
    }

    #[test]
    fn id_parameter_is_hoisted_to_the_path_item() {
        let document = build_document().unwrap();
        let item = details_item(&document);

        assert_eq!(item.parameters.len(), 1);
        let ReferenceOr::Item(Parameter::Path { parameter_data, .. }) = &item.parameters[0]
        else {
            panic!("path-item parameter is not a path parameter");
        };
        assert_eq!(parameter_data.name, "id");
        assert!(parameter_data.required);
        assert!(matches!(
            parameter_data.format,
            ParameterSchemaOrContent::Schema(_)
        ));

        // The operation no longer carries the hoisted parameter.
        let op = item.get.as_ref().expect("GET operation missing");
        assert!(op.parameters.iter().all(|p| !is_path_parameter(p)));
    }

    #[test]
    fn stripped_schemas_are_pruned() {
        let document = build_document().unwrap();
        if let Some(components) = &document.components {
            assert!(
                !components.schemas.contains_key("HealthResponse"),
                "health schema should be pruned with its endpoint"
            );
        }
    }

    #[test]
    fn document_renders_as_yaml() {
        let yaml = render_document_yaml().unwrap();
        assert!(yaml.contains("openapi:"));
        assert!(yaml.contains(DETAILS_PATH));
        assert!(yaml.contains("text/plain"));
    }
}
