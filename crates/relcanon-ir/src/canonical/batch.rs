//! Batch translation: one shared table registry, one root scope per statement

use super::document::CanonicalDocument;
use super::schema::{Catalog, TableSchema};
use super::tables::TableRegistry;
use super::translator::{CanonicalTranslator, TranslateError};
use crate::RelNode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Statements sharing one logical schema, as produced by the planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanBatch {
    #[serde(default)]
    pub tables: Vec<TableSchema>,
    pub statements: Vec<RelNode>,
}

impl PlanBatch {
    pub fn from_json(json: &str) -> Result<Self, TranslateError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TranslateError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// Translate every statement of `batch`.
///
/// Table ids are shared across the batch so the same table gets the same
/// id in every query. The first structural violation aborts the batch.
pub fn translate_batch(batch: &PlanBatch) -> Result<CanonicalDocument, TranslateError> {
    let catalog: Catalog = batch.tables.iter().cloned().collect();
    let mut tables = TableRegistry::new();
    let mut queries = Vec::with_capacity(batch.statements.len());

    {
        let mut translator = CanonicalTranslator::new(&catalog, &mut tables);
        for (index, statement) in batch.statements.iter().enumerate() {
            let query = translator
                .translate(statement)
                .map_err(|source| TranslateError::Statement {
                    index,
                    source: Box::new(source),
                })?;
            debug!(index, fingerprint = %query.fingerprint(), "statement translated");
            queries.push(query);
        }
    }

    info!(
        statements = queries.len(),
        tables = tables.len(),
        "plan batch translated"
    );

    Ok(CanonicalDocument {
        schemas: tables.snapshot(),
        queries,
    })
}
