//! Indexer to searcher replication.

use tracing::{info, instrument};

use super::sync::failed;
use super::{DynReplicationAdmin, IndexSchema, ReplicaTarget, SchemaAdmin};
use crate::error::SchemaError;

/// Replicates every schema index from the indexers to the searcher.
///
/// 1. creates on the searcher every index it lacks
/// 2. declares, on every indexer, a replication of every index towards
///    `target`
/// 3. runs the replication of every index from the first indexer
///
/// Stops at the first failure.
#[instrument(skip_all, fields(indexers = indexers.len(), schemas = schemas.len()))]
pub async fn replicate_all_indexes(
    indexers: &[DynReplicationAdmin],
    searcher: &dyn SchemaAdmin,
    target: &ReplicaTarget,
    schemas: &[IndexSchema],
) -> Result<(), SchemaError> {
    let main = indexers.first().ok_or(SchemaError::NoIndexer)?;

    for schema in schemas {
        let exists = searcher
            .index_exists(&schema.name)
            .await
            .map_err(failed("index_exists", &schema.name))?;
        if !exists {
            searcher
                .create_index(&schema.name)
                .await
                .map_err(failed("create_index", &schema.name))?;
            info!(backend = %searcher.backend_id(), index = %schema.name, "Created replica index");
        }
    }

    for indexer in indexers {
        for schema in schemas {
            indexer
                .create_replication_index(&schema.name, target)
                .await
                .map_err(failed("create_replication_index", &schema.name))?;
        }
    }

    for schema in schemas {
        main.replicate(&schema.name, target)
            .await
            .map_err(failed("replicate", &schema.name))?;
        info!(backend = %main.backend_id(), index = %schema.name, "Replicated index");
    }
    Ok(())
}
