//! condition evaluator
//!
//! evaluates one parsed condition against one attribute value

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::compare::{compare, literal_is_truthy};
use super::error::{ExprError, Result};
use super::types::{Condition, Operand, Operator, Value};

/// outcome of evaluating a single condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Pass,
    Fail,
    /// condition could not be evaluated and counts as satisfied
    Skipped(SkipReason),
}

impl Evaluation {
    /// whether the record still passes after this condition
    pub fn is_satisfied(&self) -> bool {
        !matches!(self, Evaluation::Fail)
    }

    fn from_bool(b: bool) -> Self {
        if b {
            Evaluation::Pass
        } else {
            Evaluation::Fail
        }
    }
}

/// why a condition was skipped for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// the attribute holds a list of values
    MultiValued,
    /// the operator cannot take a set of literals
    SetOperand(Operator),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MultiValued => write!(f, "attribute has multiple values"),
            SkipReason::SetOperand(op) => {
                write!(f, "operator '{}' cannot be used with a list of values", op)
            }
        }
    }
}

/// evaluate a condition against the value of its attribute
pub fn evaluate(condition: &Condition, actual: &Value) -> Result<Evaluation> {
    if actual.is_list() {
        return Ok(Evaluation::Skipped(SkipReason::MultiValued));
    }

    let ordering = |literal: &str| {
        compare(actual, literal).map_err(|e| ExprError::UnsupportedValue {
            key: condition.key.clone(),
            kind: e.kind,
        })
    };

    match &condition.operand {
        Operand::Set(literals) => match condition.op {
            Operator::Eq => {
                for literal in literals {
                    if ordering(literal)? == Some(Ordering::Equal) {
                        return Ok(Evaluation::Pass);
                    }
                }
                Ok(Evaluation::Fail)
            }
            Operator::Ne => {
                for literal in literals {
                    if ordering(literal)? == Some(Ordering::Equal) {
                        return Ok(Evaluation::Fail);
                    }
                }
                Ok(Evaluation::Pass)
            }
            op => Ok(Evaluation::Skipped(SkipReason::SetOperand(op))),
        },
        Operand::Literal(literal) => {
            let passed = match condition.op {
                Operator::Xor => actual.is_truthy() != literal_is_truthy(literal),
                Operator::Eq => ordering(literal)? == Some(Ordering::Equal),
                Operator::Ne => ordering(literal)? != Some(Ordering::Equal),
                Operator::Lt => ordering(literal)? == Some(Ordering::Less),
                Operator::Le => matches!(
                    ordering(literal)?,
                    Some(Ordering::Less | Ordering::Equal)
                ),
                Operator::Gt => ordering(literal)? == Some(Ordering::Greater),
                Operator::Ge => matches!(
                    ordering(literal)?,
                    Some(Ordering::Greater | Ordering::Equal)
                ),
            };
            Ok(Evaluation::from_bool(passed))
        }
    }
}
