//! Table identities shared by every statement of a batch

use super::document::TableDoc;
use super::schema::TableSchema;
use std::collections::HashMap;

/// Assigns each scanned table a small integer id in first-seen order
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: Vec<TableSchema>,
    ids: HashMap<String, usize>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable id for `table`, registering it on first sight
    pub fn identify(&mut self, table: &TableSchema) -> usize {
        if let Some(&id) = self.ids.get(&table.name) {
            return id;
        }

        let id = self.tables.len();
        tracing::debug!(table = %table.name, id, columns = table.field_count(), "registered table");
        self.ids.insert(table.name.clone(), id);
        self.tables.push(table.clone());
        id
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Column type lists of every registered table, in id order
    pub fn snapshot(&self) -> Vec<TableDoc> {
        self.tables
            .iter()
            .map(|table| TableDoc {
                types: table.columns.iter().map(|c| c.data_type.clone()).collect(),
            })
            .collect()
    }
}
