//! Schema synchronization.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

use super::{DynSchemaAdmin, FieldSchema, FieldsDescription, IndexSchema, RemoteField, SchemaAdmin};
use crate::error::{BackendError, SchemaError};

/// Wraps a backend error with the failing operation and index.
pub(super) fn failed(operation: &'static str, index: &str) -> impl FnOnce(BackendError) -> SchemaError {
    let index = index.to_string();
    move |source| SchemaError::Backend {
        operation,
        index,
        source,
    }
}

/// Destroys every index in `names` on every client.
///
/// Calls run one at a time, clients in order, and stop at the first
/// failure.
#[instrument(skip_all, fields(clients = clients.len(), indexes = names.len()))]
pub async fn drop_indexes(clients: &[DynSchemaAdmin], names: &[String]) -> Result<(), SchemaError> {
    for client in clients {
        for name in names {
            client
                .destroy_index(name)
                .await
                .map_err(failed("destroy_index", name))?;
            info!(backend = %client.backend_id(), index = %name, "Dropped index");
        }
    }
    Ok(())
}

/// Brings every client in line with `schemas`.
///
/// Clients are synchronized concurrently. On each client, missing indexes
/// are created first; then, per schema, templates are reconciled and, when
/// the remote field layout differs from the declared one, fields are
/// reconciled too.
#[instrument(skip_all, fields(clients = clients.len(), schemas = schemas.len()))]
pub async fn sync_schemas(
    clients: &[DynSchemaAdmin],
    schemas: &[IndexSchema],
) -> Result<(), SchemaError> {
    let schemas: Arc<Vec<IndexSchema>> = Arc::new(schemas.to_vec());
    let mut tasks: JoinSet<Result<(), SchemaError>> = JoinSet::new();

    for client in clients {
        let client = Arc::clone(client);
        let schemas = Arc::clone(&schemas);
        tasks.spawn(async move { sync_client(client.as_ref(), &schemas).await });
    }

    while let Some(joined) = tasks.join_next().await {
        joined.map_err(|e| SchemaError::Task(e.to_string()))??;
    }
    Ok(())
}

async fn sync_client(client: &dyn SchemaAdmin, schemas: &[IndexSchema]) -> Result<(), SchemaError> {
    for schema in schemas {
        let exists = client
            .index_exists(&schema.name)
            .await
            .map_err(failed("index_exists", &schema.name))?;
        if !exists {
            client
                .create_index(&schema.name)
                .await
                .map_err(failed("create_index", &schema.name))?;
            info!(backend = %client.backend_id(), index = %schema.name, "Created index");
        }
    }

    for schema in schemas {
        let remote = client
            .describe_fields(&schema.name)
            .await
            .map_err(failed("describe_fields", &schema.name))?;

        sync_templates(client, schema).await?;

        if schema_differs(&remote, schema) {
            sync_fields(client, schema).await?;
        } else {
            debug!(backend = %client.backend_id(), index = %schema.name, "Fields up to date");
        }
    }
    Ok(())
}

async fn sync_templates(client: &dyn SchemaAdmin, schema: &IndexSchema) -> Result<(), SchemaError> {
    for template in &schema.templates {
        client
            .create_or_update_template(&schema.name, &template.name, &template.body)
            .await
            .map_err(failed("create_or_update_template", &schema.name))?;
    }

    let declared: HashSet<&str> = schema.templates.iter().map(|t| t.name.as_str()).collect();
    let remote = client
        .list_templates(&schema.name)
        .await
        .map_err(failed("list_templates", &schema.name))?;
    for name in remote.iter().filter(|name| !declared.contains(name.as_str())) {
        client
            .destroy_template(&schema.name, name)
            .await
            .map_err(failed("destroy_template", &schema.name))?;
        debug!(index = %schema.name, template = %name, "Destroyed undeclared template");
    }
    Ok(())
}

async fn sync_fields(client: &dyn SchemaAdmin, schema: &IndexSchema) -> Result<(), SchemaError> {
    for field in &schema.fields {
        client
            .create_or_update_field(&schema.name, field)
            .await
            .map_err(failed("create_or_update_field", &schema.name))?;
    }

    if let (Some(unique), Some(default)) = (&schema.unique_field, &schema.default_field) {
        client
            .set_unique_default(&schema.name, unique, default)
            .await
            .map_err(failed("set_unique_default", &schema.name))?;
    }

    let declared: HashSet<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
    let remote = client
        .describe_fields(&schema.name)
        .await
        .map_err(failed("describe_fields", &schema.name))?;
    for field in remote
        .fields
        .iter()
        .filter(|field| !declared.contains(field.name.as_str()))
    {
        client
            .destroy_field(&schema.name, &field.name)
            .await
            .map_err(failed("destroy_field", &schema.name))?;
        debug!(index = %schema.name, field = %field.name, "Destroyed undeclared field");
    }
    info!(backend = %client.backend_id(), index = %schema.name, "Synchronized fields");
    Ok(())
}

/// Renders a declared schema the way the backend describes fields.
pub fn expected_fields(schema: &IndexSchema) -> FieldsDescription {
    FieldsDescription {
        unique: schema.unique_field.clone(),
        default: schema.default_field.clone(),
        fields: schema.fields.iter().map(remote_field).collect(),
    }
}

/// Whether the remote field layout differs from the declared one.
///
/// Field order is significant.
pub fn schema_differs(remote: &FieldsDescription, schema: &IndexSchema) -> bool {
    *remote != expected_fields(schema)
}

fn remote_field(field: &FieldSchema) -> RemoteField {
    RemoteField {
        name: field.name.clone(),
        indexed: flag(field.indexed),
        stored: flag(field.stored),
        term_vector: flag(field.term_vector),
        copy_of: field.copy_of.clone(),
        analyzer: field.analyzer.clone(),
    }
}

fn flag(value: bool) -> String {
    let flag = if value { "YES" } else { "NO" };
    flag.to_string()
}
