//! Core canonical translator: relational operators

use super::document::{AggregateDoc, JoinKind, PlanDoc};
use super::schema::SchemaProvider;
use super::scope::Scope;
use super::tables::TableRegistry;
use crate::{AggregateCall, CorrelationId, JoinType, RelNode, RexNode};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Unbound correlation variable: {0}")]
    UnboundCorrelation(CorrelationId),

    #[error("Malformed correlation reference: expected CORREL_VARIABLE, got {0}")]
    MalformedCorrelationReference(String),

    #[error("{operator} requires at least {expected} inputs, got {actual}")]
    MissingInput {
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error("Statement {index}: {source}")]
    Statement {
        index: usize,
        source: Box<TranslateError>,
    },

    #[error("Invalid plan batch: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read plan batch: {0}")]
    Io(#[from] std::io::Error),
}

/// Translator for relational plans → canonical documents.
///
/// Every call returns the built node together with the number of columns
/// it produces; parents use that count to offset their own expressions.
pub struct CanonicalTranslator<'a> {
    schema_provider: &'a dyn SchemaProvider,
    tables: &'a mut TableRegistry,
}

impl<'a> CanonicalTranslator<'a> {
    pub fn new(schema_provider: &'a dyn SchemaProvider, tables: &'a mut TableRegistry) -> Self {
        Self {
            schema_provider,
            tables,
        }
    }

    /// Translate one statement from an empty scope
    pub fn translate(&mut self, rel: &RelNode) -> Result<PlanDoc, TranslateError> {
        let (doc, columns) = self.translate_rel(rel, &Scope::root())?;
        debug!(operator = rel.type_name(), columns, "translated statement");
        Ok(doc)
    }

    pub fn translate_rel(&mut self, rel: &RelNode, scope: &Scope) -> Result<(PlanDoc, usize), TranslateError> {
        match rel {
            RelNode::Scan { table } => self.translate_scan(table),
            RelNode::Filter { input, condition, variables } => {
                self.translate_filter(input, condition, variables, scope)
            }
            RelNode::Project { input, projects } => self.translate_project(input, projects, scope),
            RelNode::Join { join_type, condition, left, right } => {
                self.translate_join(*join_type, condition, left, right, scope)
            }
            RelNode::Correlate { correlation, left, right } => {
                self.translate_correlate(correlation, left, right, scope)
            }
            RelNode::Union { all, inputs } => self.translate_set_op(rel, *all, inputs, scope, PlanDoc::Union),
            RelNode::Minus { all, inputs } => self.translate_set_op(rel, *all, inputs, scope, PlanDoc::Except),
            RelNode::Aggregate { input, group_set, calls } => {
                self.translate_aggregate(input, group_set, calls, scope)
            }
            RelNode::Sort { .. }
            | RelNode::Intersect { .. }
            | RelNode::Values { .. }
            | RelNode::Calc { .. }
            | RelNode::Exchange { .. }
            | RelNode::TableFunctionScan { .. }
            | RelNode::Match { .. }
            | RelNode::TableModify { .. }
            | RelNode::Other { .. } => Ok(Self::not_implemented(rel)),
        }
    }

    /// Unsupported operators contribute no known columns
    fn not_implemented(rel: &RelNode) -> (PlanDoc, usize) {
        warn!(operator = rel.type_name(), "operator has no canonical form");
        (PlanDoc::not_implemented(rel.type_name()), 0)
    }

    fn translate_scan(&mut self, table: &str) -> Result<(PlanDoc, usize), TranslateError> {
        let provider = self.schema_provider;
        let schema = provider.get_table_schema(table).map_err(TranslateError::Schema)?;
        let id = self.tables.identify(schema);
        Ok((PlanDoc::Scan(id), schema.field_count()))
    }

    fn translate_filter(
        &mut self,
        input: &RelNode,
        condition: &RexNode,
        variables: &[CorrelationId],
        scope: &Scope,
    ) -> Result<(PlanDoc, usize), TranslateError> {
        let (input_doc, columns) = self.translate_rel(input, scope)?;

        // Subqueries in the condition see the filter's input row through its variables
        let condition_scope = scope
            .delta(variables)
            .into_iter()
            .fold(scope.clone(), |acc, id| acc.amend(Some(id), 0));
        let condition_doc = self.translate_rex(condition, &condition_scope, columns)?;

        Ok((PlanDoc::Filter(condition_doc, Box::new(input_doc)), columns))
    }

    fn translate_project(
        &mut self,
        input: &RelNode,
        projects: &[RexNode],
        scope: &Scope,
    ) -> Result<(PlanDoc, usize), TranslateError> {
        let (input_doc, columns) = self.translate_rel(input, scope)?;

        let exprs = projects
            .iter()
            .map(|target| self.translate_rex(target, scope, columns))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((PlanDoc::Project(exprs, Box::new(input_doc)), projects.len()))
    }

    fn translate_join(
        &mut self,
        join_type: JoinType,
        condition: &RexNode,
        left: &RelNode,
        right: &RelNode,
        scope: &Scope,
    ) -> Result<(PlanDoc, usize), TranslateError> {
        let kind = JoinKind {
            ty: join_type.name().to_string(),
        };
        // Join conditions address both sides by absolute position
        let condition_doc = self.translate_rex(condition, scope, 0)?;
        let (left_doc, left_columns) = self.translate_rel(left, scope)?;
        let (right_doc, right_columns) = self.translate_rel(right, scope)?;

        Ok((
            PlanDoc::Join((kind, condition_doc), Box::new(left_doc), Box::new(right_doc)),
            left_columns + right_columns,
        ))
    }

    fn translate_correlate(
        &mut self,
        correlation: &CorrelationId,
        left: &RelNode,
        right: &RelNode,
        scope: &Scope,
    ) -> Result<(PlanDoc, usize), TranslateError> {
        let (left_doc, left_columns) = self.translate_rel(left, scope)?;
        let right_scope = scope.amend(Some(correlation), left_columns);
        let (right_doc, right_columns) = self.translate_rel(right, &right_scope)?;

        Ok((
            PlanDoc::Correlate(Box::new(left_doc), Box::new(right_doc)),
            left_columns + right_columns,
        ))
    }

    fn translate_set_op(
        &mut self,
        rel: &RelNode,
        all: bool,
        inputs: &[RelNode],
        scope: &Scope,
        wrap: fn(Vec<PlanDoc>) -> PlanDoc,
    ) -> Result<(PlanDoc, usize), TranslateError> {
        if inputs.len() < 2 {
            return Err(TranslateError::MissingInput {
                operator: rel.type_name().to_string(),
                expected: 2,
                actual: inputs.len(),
            });
        }

        let mut docs = Vec::with_capacity(inputs.len());
        let mut columns = 0;
        for (position, input) in inputs.iter().enumerate() {
            let (doc, child_columns) = self.translate_rel(input, scope)?;
            if position > 0 && child_columns != columns {
                warn!(
                    operator = rel.type_name(),
                    position,
                    expected = columns,
                    actual = child_columns,
                    "set operation inputs disagree on column count"
                );
            }
            columns = columns.max(child_columns);
            docs.push(doc);
        }

        let doc = wrap(docs);
        let doc = if all { doc } else { doc.distinct() };
        Ok((doc, columns))
    }

    fn translate_aggregate(
        &mut self,
        input: &RelNode,
        group_set: &[usize],
        calls: &[AggregateCall],
        scope: &Scope,
    ) -> Result<(PlanDoc, usize), TranslateError> {
        let (input_doc, _) = self.translate_rel(input, scope)?;

        let call_docs = calls
            .iter()
            .map(|call| AggregateDoc {
                ty: call.aggregation.clone(),
                on: call.args.clone(),
            })
            .collect();

        Ok((
            PlanDoc::Aggregate((group_set.to_vec(), call_docs), Box::new(input_doc)),
            group_set.len() + calls.len(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::schema::{Catalog, ColumnInfo, TableSchema};
    use crate::{SqlType, Value};
    use serde_json::json;

    fn setup_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_table(TableSchema {
            name: "EMP".to_string(),
            columns: vec![
                ColumnInfo { name: "EMP_ID".to_string(), data_type: SqlType::Integer, nullable: false },
                ColumnInfo { name: "EMP_NAME".to_string(), data_type: SqlType::Varchar, nullable: true },
                ColumnInfo { name: "DEPT_ID".to_string(), data_type: SqlType::Integer, nullable: true },
            ],
        });
        catalog.add_table(TableSchema {
            name: "DEPT".to_string(),
            columns: vec![
                ColumnInfo { name: "DEPT_ID".to_string(), data_type: SqlType::Integer, nullable: true },
                ColumnInfo { name: "DEPT_NAME".to_string(), data_type: SqlType::Varchar, nullable: false },
            ],
        });
        catalog
    }

    fn scan(table: &str) -> Box<RelNode> {
        Box::new(RelNode::Scan { table: table.to_string() })
    }

    fn input_ref(index: usize) -> RexNode {
        RexNode::InputRef { index, ty: SqlType::Integer }
    }

    fn literal_true() -> RexNode {
        RexNode::Literal { value: Value::Bool(true), ty: SqlType::Boolean }
    }

    fn translate(catalog: &Catalog, rel: &RelNode) -> (PlanDoc, usize) {
        let mut tables = TableRegistry::new();
        let mut translator = CanonicalTranslator::new(catalog, &mut tables);
        translator.translate_rel(rel, &Scope::root()).expect("translation should succeed")
    }

    #[test]
    fn test_scan_reports_field_count() {
        let catalog = setup_catalog();
        let (doc, columns) = translate(&catalog, &RelNode::Scan { table: "EMP".to_string() });
        assert_eq!(doc, PlanDoc::Scan(0));
        assert_eq!(columns, 3);
    }

    #[test]
    fn test_unknown_table_fails() {
        let catalog = setup_catalog();
        let mut tables = TableRegistry::new();
        let mut translator = CanonicalTranslator::new(&catalog, &mut tables);
        let err = translator.translate(&RelNode::Scan { table: "SALGRADE".to_string() }).unwrap_err();
        assert!(matches!(err, TranslateError::Schema(_)));
    }

    #[test]
    fn test_project_reports_list_length() {
        let catalog = setup_catalog();
        let rel = RelNode::Project {
            input: scan("EMP"),
            projects: vec![input_ref(2)],
        };
        let (doc, columns) = translate(&catalog, &rel);
        assert_eq!(columns, 1);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"project": [[{"column": 2, "type": "INTEGER"}], {"scan": 0}]})
        );
    }

    #[test]
    fn test_join_sums_columns() {
        let catalog = setup_catalog();
        let rel = RelNode::Join {
            join_type: JoinType::Inner,
            condition: RexNode::Call {
                operator: "=".to_string(),
                operands: vec![input_ref(2), input_ref(3)],
                ty: SqlType::Boolean,
            },
            left: scan("EMP"),
            right: scan("DEPT"),
        };
        let (doc, columns) = translate(&catalog, &rel);
        assert_eq!(columns, 5);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"join": [
                [{"type": "INNER"}, {"operator": "=", "operand": [
                    {"column": 2, "type": "INTEGER"},
                    {"column": 3, "type": "INTEGER"}
                ], "type": "BOOLEAN"}],
                {"scan": 0},
                {"scan": 1}
            ]})
        );
    }

    #[test]
    fn test_set_op_needs_two_inputs() {
        let catalog = setup_catalog();
        let mut tables = TableRegistry::new();
        let mut translator = CanonicalTranslator::new(&catalog, &mut tables);
        let rel = RelNode::Union { all: true, inputs: vec![RelNode::Scan { table: "EMP".to_string() }] };
        let err = translator.translate(&rel).unwrap_err();
        assert!(matches!(err, TranslateError::MissingInput { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_minus_all_is_not_wrapped() {
        let catalog = setup_catalog();
        let rel = RelNode::Minus {
            all: true,
            inputs: vec![*scan("DEPT"), *scan("DEPT")],
        };
        let (doc, columns) = translate(&catalog, &rel);
        assert_eq!(columns, 2);
        assert_eq!(doc, PlanDoc::Except(vec![PlanDoc::Scan(0), PlanDoc::Scan(0)]));
    }

    #[test]
    fn test_set_op_tolerates_unsupported_child() {
        let catalog = setup_catalog();
        let rel = RelNode::Union {
            all: true,
            inputs: vec![*scan("DEPT"), RelNode::Sort { input: scan("DEPT") }],
        };
        let (doc, columns) = translate(&catalog, &rel);
        assert_eq!(columns, 2);
        assert_eq!(
            doc,
            PlanDoc::Union(vec![PlanDoc::Scan(0), PlanDoc::not_implemented("LogicalSort")])
        );
    }

    #[test]
    fn test_aggregate_shape_and_columns() {
        let catalog = setup_catalog();
        let rel = RelNode::Aggregate {
            input: scan("EMP"),
            group_set: vec![2],
            calls: vec![
                AggregateCall { aggregation: "COUNT".to_string(), args: vec![] },
                AggregateCall { aggregation: "SUM".to_string(), args: vec![0] },
            ],
        };
        let (doc, columns) = translate(&catalog, &rel);
        assert_eq!(columns, 3);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"aggregate": [
                [[2], [{"type": "COUNT", "on": []}, {"type": "SUM", "on": [0]}]],
                {"scan": 0}
            ]})
        );
    }

    #[test]
    fn test_unsupported_operators_yield_markers() {
        let catalog = setup_catalog();
        let cases = vec![
            (RelNode::Sort { input: scan("EMP") }, "LogicalSort"),
            (RelNode::Intersect { all: false, inputs: vec![*scan("EMP"), *scan("EMP")] }, "LogicalIntersect"),
            (RelNode::Values { tuples: vec![vec![Value::Int(1)]] }, "LogicalValues"),
            (RelNode::Exchange { input: scan("EMP") }, "LogicalExchange"),
            (RelNode::TableFunctionScan { inputs: vec![] }, "LogicalTableFunctionScan"),
            (RelNode::Match { input: scan("EMP") }, "LogicalMatch"),
            (RelNode::TableModify { table: "EMP".to_string(), input: scan("EMP") }, "LogicalTableModify"),
            (RelNode::Calc { input: scan("EMP") }, "LogicalCalc"),
        ];

        for (rel, name) in cases {
            let (doc, columns) = translate(&catalog, &rel);
            assert_eq!(columns, 0);
            assert_eq!(
                serde_json::to_value(&doc).unwrap(),
                json!({"error": format!("Not implemented: {}", name)})
            );
        }
    }

    #[test]
    fn test_unsupported_operator_registers_no_tables() {
        let catalog = setup_catalog();
        let mut tables = TableRegistry::new();
        let mut translator = CanonicalTranslator::new(&catalog, &mut tables);
        translator.translate(&RelNode::Sort { input: scan("EMP") }).unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_join_condition_ignores_children() {
        let catalog = setup_catalog();
        let rel = RelNode::Join {
            join_type: JoinType::Left,
            condition: literal_true(),
            left: scan("DEPT"),
            right: scan("EMP"),
        };
        let (doc, _) = translate(&catalog, &rel);
        let PlanDoc::Join((kind, _), left, right) = doc else {
            panic!("expected join");
        };
        assert_eq!(kind.ty, "LEFT");
        assert_eq!(*left, PlanDoc::Scan(0));
        assert_eq!(*right, PlanDoc::Scan(1));
    }
}
