//! Column-numbering scope threaded through the translators
//!
//! A `Scope` is an immutable chain of frames. Extending it with
//! [`Scope::amend`] returns a new scope layered on the old one, so the two
//! sides of a join can each extend the same parent without seeing each
//! other's correlation bindings.

use super::TranslateError;
use crate::CorrelationId;
use std::rc::Rc;

#[derive(Debug)]
struct Frame {
    /// Ambient column offset in effect at this frame
    offset: usize,
    binding: Option<(CorrelationId, usize)>,
    parent: Option<Rc<Frame>>,
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    head: Option<Rc<Frame>>,
}

impl Scope {
    /// Empty scope: offset 0, no correlation bindings
    pub fn root() -> Self {
        Self::default()
    }

    /// Number of columns already consumed by enclosing scopes
    pub fn current_offset(&self) -> usize {
        self.head.as_ref().map_or(0, |frame| frame.offset)
    }

    /// Extend the scope.
    ///
    /// With a correlation id, binds it to the absolute column where the
    /// correlated input begins (`current_offset() + offset`) and keeps the
    /// ambient offset. Without one, raises the ambient offset by `offset`.
    pub fn amend(&self, correlation: Option<&CorrelationId>, offset: usize) -> Scope {
        let current = self.current_offset();
        let frame = match correlation {
            Some(id) => Frame {
                offset: current,
                binding: Some((id.clone(), current + offset)),
                parent: self.head.clone(),
            },
            None => Frame {
                offset: current + offset,
                binding: None,
                parent: self.head.clone(),
            },
        };

        Scope {
            head: Some(Rc::new(frame)),
        }
    }

    /// Resolve a correlation id, innermost binding first
    pub fn lookup(&self, correlation: &CorrelationId) -> Result<usize, TranslateError> {
        let mut cursor = self.head.as_deref();
        while let Some(frame) = cursor {
            if let Some((id, offset)) = &frame.binding {
                if id == correlation {
                    return Ok(*offset);
                }
            }
            cursor = frame.parent.as_deref();
        }
        Err(TranslateError::UnboundCorrelation(correlation.clone()))
    }

    pub fn is_bound(&self, correlation: &CorrelationId) -> bool {
        self.lookup(correlation).is_ok()
    }

    /// Correlation ids from `variables` this scope does not bind yet
    pub fn delta<'v>(&self, variables: &'v [CorrelationId]) -> Vec<&'v CorrelationId> {
        variables.iter().filter(|id| !self.is_bound(id)).collect()
    }
}
