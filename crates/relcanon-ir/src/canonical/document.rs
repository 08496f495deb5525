//! Canonical document model
//!
//! Serde types whose JSON form is the canonical plan format. Field order
//! of every struct is the emitted key order, so the serialized output is
//! deterministic.

use crate::SqlType;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Canonical form of one relational operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanDoc {
    /// `{"scan": table}`
    Scan(usize),
    /// `{"filter": [{condition}, {input}]}`
    Filter(ExprDoc, Box<PlanDoc>),
    /// `{"project": [[projects], {input}]}`
    Project(Vec<ExprDoc>, Box<PlanDoc>),
    /// `{"join": [[{type}, {condition}], {left}, {right}]}`
    Join((JoinKind, ExprDoc), Box<PlanDoc>, Box<PlanDoc>),
    /// `{"correlate": [{left}, {right}]}`
    Correlate(Box<PlanDoc>, Box<PlanDoc>),
    /// `{"union": [inputs]}`
    Union(Vec<PlanDoc>),
    /// `{"except": [inputs]}`
    Except(Vec<PlanDoc>),
    /// `{"aggregate": [[[groups], [calls]], {input}]}`
    Aggregate((Vec<usize>, Vec<AggregateDoc>), Box<PlanDoc>),
    /// `{"distinct": {input}}`
    Distinct(Box<PlanDoc>),
    /// `{"error": "Not implemented: ..."}`
    Error(String),
}

impl PlanDoc {
    pub fn not_implemented(kind: &str) -> Self {
        PlanDoc::Error(format!("Not implemented: {}", kind))
    }

    /// Wrap the whole node for duplicate elimination
    pub fn distinct(self) -> Self {
        PlanDoc::Distinct(Box::new(self))
    }

    /// Calculate fingerprint (SHA-256) of the compact JSON form
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("canonical plans should always serialize");
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinKind {
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateDoc {
    #[serde(rename = "type")]
    pub ty: String,
    pub on: Vec<usize>,
}

/// Canonical form of one scalar expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExprDoc {
    Column {
        column: usize,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    SubQuery {
        operator: String,
        operand: Vec<ExprDoc>,
        query: Box<PlanDoc>,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    /// Operator calls, and literals with an empty operand list
    Call {
        operator: String,
        operand: Vec<ExprDoc>,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    Error {
        error: String,
    },
}

impl ExprDoc {
    pub fn not_implemented(kind: &str) -> Self {
        ExprDoc::Error {
            error: format!("Not implemented: {}", kind),
        }
    }
}

/// Schema entry for one registered table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDoc {
    pub types: Vec<SqlType>,
}

/// `{"schemas": [...], "queries": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDocument {
    pub schemas: Vec<TableDoc>,
    pub queries: Vec<PlanDoc>,
}

impl CanonicalDocument {
    /// Batch-comparison documents: the first query paired with each later one
    pub fn pairs(&self) -> Vec<CanonicalDocument> {
        let Some((first, rest)) = self.queries.split_first() else {
            return Vec::new();
        };

        rest.iter()
            .map(|other| CanonicalDocument {
                schemas: self.schemas.clone(),
                queries: vec![first.clone(), other.clone()],
            })
            .collect()
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
