//! Canonical translator: scalar expressions

use super::document::ExprDoc;
use super::scope::Scope;
use super::translator::{CanonicalTranslator, TranslateError};
use crate::RexNode;
use tracing::warn;

impl<'a> CanonicalTranslator<'a> {
    /// Translate one scalar expression of an operator whose input has
    /// `input` columns. The scope stays fixed across the whole expression
    /// tree; only subquery bodies see a shifted one.
    pub fn translate_rex(&mut self, rex: &RexNode, scope: &Scope, input: usize) -> Result<ExprDoc, TranslateError> {
        match rex {
            RexNode::InputRef { index, ty } => Ok(ExprDoc::Column {
                column: index + scope.current_offset(),
                ty: ty.clone(),
            }),
            RexNode::Literal { value, ty } => Ok(ExprDoc::Call {
                operator: value.to_string(),
                operand: Vec::new(),
                ty: ty.clone(),
            }),
            RexNode::Call { operator, operands, ty } => Ok(ExprDoc::Call {
                operator: operator.clone(),
                operand: self.translate_operands(operands, scope, input)?,
                ty: ty.clone(),
            }),
            RexNode::FieldAccess { reference, field, ty } => {
                let RexNode::CorrelVariable { id, .. } = reference.as_ref() else {
                    return Err(TranslateError::MalformedCorrelationReference(
                        reference.kind_name().to_string(),
                    ));
                };
                Ok(ExprDoc::Column {
                    column: field + scope.lookup(id)?,
                    ty: ty.clone(),
                })
            }
            RexNode::SubQuery { operator, operands, rel, ty } => {
                let operand = self.translate_operands(operands, scope, input)?;
                // Outer columns come first, so the body starts after the enclosing input
                let (query, _) = self.translate_rel(rel, &scope.amend(None, input))?;
                Ok(ExprDoc::SubQuery {
                    operator: operator.clone(),
                    operand,
                    query: Box::new(query),
                    ty: ty.clone(),
                })
            }
            RexNode::CorrelVariable { .. }
            | RexNode::LocalRef { .. }
            | RexNode::DynamicParam { .. }
            | RexNode::RangeRef { .. }
            | RexNode::Over { .. }
            | RexNode::PatternFieldRef { .. }
            | RexNode::TableInputRef { .. } => {
                warn!(kind = rex.kind_name(), "expression has no canonical form");
                Ok(ExprDoc::not_implemented(rex.kind_name()))
            }
        }
    }

    fn translate_operands(
        &mut self,
        operands: &[RexNode],
        scope: &Scope,
        input: usize,
    ) -> Result<Vec<ExprDoc>, TranslateError> {
        operands
            .iter()
            .map(|operand| self.translate_rex(operand, scope, input))
            .collect()
    }
}
