//! Canonical translation module
//!
//! Translates relational plans into canonical JSON documents for
//! equivalence checking.

mod batch;
mod document;
mod rex;
mod schema;
mod scope;
mod tables;
mod translator;

pub use batch::{translate_batch, PlanBatch};
pub use document::{AggregateDoc, CanonicalDocument, ExprDoc, JoinKind, PlanDoc, TableDoc};
pub use schema::{Catalog, ColumnInfo, SchemaProvider, TableSchema};
pub use scope::Scope;
pub use tables::TableRegistry;
pub use translator::{CanonicalTranslator, TranslateError};
