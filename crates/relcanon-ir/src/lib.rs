//! relcanon Intermediate Representation (IR)
//!
//! Logical relational-algebra plans as handed over by a query planner,
//! and the `canonical` module that turns them into the self-describing
//! JSON documents consumed by plan equivalence checkers.

use serde::{Deserialize, Serialize};
use std::fmt;

mod types;
pub use types::*;

pub mod canonical;

/// Identifier linking a correlated expression to the operator that provides its row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relational operators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RelNode {
    Scan {
        table: String,
    },
    Filter {
        input: Box<RelNode>,
        condition: RexNode,
        /// Correlation variables set by this filter for subqueries in its condition
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        variables: Vec<CorrelationId>,
    },
    Project {
        input: Box<RelNode>,
        projects: Vec<RexNode>,
    },
    Join {
        join_type: JoinType,
        condition: RexNode,
        left: Box<RelNode>,
        right: Box<RelNode>,
    },
    Correlate {
        correlation: CorrelationId,
        left: Box<RelNode>,
        right: Box<RelNode>,
    },
    Union {
        #[serde(default)]
        all: bool,
        inputs: Vec<RelNode>,
    },
    Minus {
        #[serde(default)]
        all: bool,
        inputs: Vec<RelNode>,
    },
    Aggregate {
        input: Box<RelNode>,
        group_set: Vec<usize>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        calls: Vec<AggregateCall>,
    },

    // Operators without a canonical form yet
    Sort {
        input: Box<RelNode>,
    },
    Intersect {
        #[serde(default)]
        all: bool,
        inputs: Vec<RelNode>,
    },
    Values {
        #[serde(default)]
        tuples: Vec<Vec<Value>>,
    },
    Calc {
        input: Box<RelNode>,
    },
    Exchange {
        input: Box<RelNode>,
    },
    TableFunctionScan {
        #[serde(default)]
        inputs: Vec<RelNode>,
    },
    Match {
        input: Box<RelNode>,
    },
    TableModify {
        table: String,
        input: Box<RelNode>,
    },
    Other {
        kind: String,
        #[serde(default)]
        inputs: Vec<RelNode>,
    },
}

impl RelNode {
    /// Logical operator name, e.g. `LogicalFilter`
    pub fn type_name(&self) -> &str {
        match self {
            RelNode::Scan { .. } => "LogicalTableScan",
            RelNode::Filter { .. } => "LogicalFilter",
            RelNode::Project { .. } => "LogicalProject",
            RelNode::Join { .. } => "LogicalJoin",
            RelNode::Correlate { .. } => "LogicalCorrelate",
            RelNode::Union { .. } => "LogicalUnion",
            RelNode::Minus { .. } => "LogicalMinus",
            RelNode::Aggregate { .. } => "LogicalAggregate",
            RelNode::Sort { .. } => "LogicalSort",
            RelNode::Intersect { .. } => "LogicalIntersect",
            RelNode::Values { .. } => "LogicalValues",
            RelNode::Calc { .. } => "LogicalCalc",
            RelNode::Exchange { .. } => "LogicalExchange",
            RelNode::TableFunctionScan { .. } => "LogicalTableFunctionScan",
            RelNode::Match { .. } => "LogicalMatch",
            RelNode::TableModify { .. } => "LogicalTableModify",
            RelNode::Other { kind, .. } => kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Semi,
    Anti,
}

impl JoinType {
    pub fn name(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
            JoinType::Semi => "SEMI",
            JoinType::Anti => "ANTI",
        }
    }
}

/// Aggregate function applied to input columns, e.g. `SUM($2)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateCall {
    pub aggregation: String,
    #[serde(default)]
    pub args: Vec<usize>,
}

/// Scalar expressions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RexNode {
    InputRef {
        index: usize,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    Literal {
        #[serde(default)]
        value: Value,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    Call {
        operator: String,
        #[serde(default)]
        operands: Vec<RexNode>,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    /// Field of a correlated row; `reference` must be a correlation variable
    FieldAccess {
        reference: Box<RexNode>,
        field: usize,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    SubQuery {
        operator: String,
        #[serde(default)]
        operands: Vec<RexNode>,
        rel: Box<RelNode>,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    CorrelVariable {
        id: CorrelationId,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    LocalRef {
        index: usize,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    DynamicParam {
        index: usize,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    RangeRef {
        offset: usize,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    Over {
        operator: String,
        #[serde(default)]
        operands: Vec<RexNode>,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    PatternFieldRef {
        alpha: String,
        index: usize,
        #[serde(rename = "type")]
        ty: SqlType,
    },
    TableInputRef {
        table: String,
        index: usize,
        #[serde(rename = "type")]
        ty: SqlType,
    },
}

impl RexNode {
    /// SQL kind name, e.g. `INPUT_REF`
    pub fn kind_name(&self) -> &'static str {
        match self {
            RexNode::InputRef { .. } => "INPUT_REF",
            RexNode::Literal { .. } => "LITERAL",
            RexNode::Call { .. } => "CALL",
            RexNode::FieldAccess { .. } => "FIELD_ACCESS",
            RexNode::SubQuery { .. } => "SUBQUERY",
            RexNode::CorrelVariable { .. } => "CORREL_VARIABLE",
            RexNode::LocalRef { .. } => "LOCAL_REF",
            RexNode::DynamicParam { .. } => "DYNAMIC_PARAM",
            RexNode::RangeRef { .. } => "RANGE_REF",
            RexNode::Over { .. } => "OVER",
            RexNode::PatternFieldRef { .. } => "PATTERN_INPUT_REF",
            RexNode::TableInputRef { .. } => "TABLE_INPUT_REF",
        }
    }

    pub fn ty(&self) -> &SqlType {
        match self {
            RexNode::InputRef { ty, .. }
            | RexNode::Literal { ty, .. }
            | RexNode::Call { ty, .. }
            | RexNode::FieldAccess { ty, .. }
            | RexNode::SubQuery { ty, .. }
            | RexNode::CorrelVariable { ty, .. }
            | RexNode::LocalRef { ty, .. }
            | RexNode::DynamicParam { ty, .. }
            | RexNode::RangeRef { ty, .. }
            | RexNode::Over { ty, .. }
            | RexNode::PatternFieldRef { ty, .. }
            | RexNode::TableInputRef { ty, .. } => ty,
        }
    }
}

/// Literal values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_finite() => write!(f, "{:?}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
        }
    }
}
