//! Schema provider trait and types for table metadata lookup

use crate::SqlType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: SqlType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

/// Table schema information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableSchema {
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }
}

/// Trait for resolving table schemas at translation time
pub trait SchemaProvider {
    /// Get schema for a table by name
    fn get_table_schema(&self, table_name: &str) -> Result<&TableSchema, String>;
}

/// In-memory schema provider built from a plan batch's table list
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, TableSchema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    pub fn add_table(&mut self, schema: TableSchema) {
        self.tables.insert(schema.name.clone(), schema);
    }
}

impl FromIterator<TableSchema> for Catalog {
    fn from_iter<I: IntoIterator<Item = TableSchema>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for schema in iter {
            catalog.add_table(schema);
        }
        catalog
    }
}

impl SchemaProvider for Catalog {
    fn get_table_schema(&self, table_name: &str) -> Result<&TableSchema, String> {
        self.tables
            .get(table_name)
            .ok_or_else(|| format!("Table '{}' not found", table_name))
    }
}
