// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The fixed CQL2 operator vocabulary accepted by the catalog.
///
/// Serialized forms are the exact CQL2-JSON `op` tokens; anything
/// outside this vocabulary fails to deserialize instead of reaching
/// the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "and")]
    And,
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "not")]
    Not,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "a_contains")]
    AContains,
    #[serde(rename = "a_overlaps")]
    AOverlaps,
    #[serde(rename = "t_intersects")]
    TIntersects,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "in",
            Self::AContains => "a_contains",
            Self::AOverlaps => "a_overlaps",
            Self::TIntersects => "t_intersects",
        }
    }

    /// Boolean combinators taking nested expressions.
    pub fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Not)
    }
}

/// Reference to a named item property, `{"property": name}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRef {
    pub property: String,
}

impl PropertyRef {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

/// Closed temporal interval literal,
/// `{"interval": [startRFC3339, endRFC3339]}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalInterval {
    pub interval: [String; 2],
}

impl TemporalInterval {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            interval: [start.into(), end.into()],
        }
    }

    pub fn start(&self) -> &str {
        &self.interval[0]
    }

    pub fn end(&self) -> &str {
        &self.interval[1]
    }
}

/// One argument position of an expression node.
///
/// Ordered; operand order is part of the operator contract (`in` flips
/// meaning when its operands are swapped). Deserialization tries the
/// structured variants before falling back to a raw JSON literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Expr(Box<Expr>),
    Property(PropertyRef),
    Interval(TemporalInterval),
    Literal(Value),
}

impl Operand {
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(PropertyRef::new(name))
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    fn is_expr(&self) -> bool {
        matches!(self, Self::Expr(_))
    }

    /// Whether the operand is array-shaped without looking at item data:
    /// a literal array, or a property reference (array-ness of the
    /// property is only known server-side).
    fn can_be_array(&self) -> bool {
        matches!(self, Self::Property(_)) || matches!(self, Self::Literal(Value::Array(_)))
    }
}

/// A node of the immutable CQL2 filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub op: Operator,
    pub args: Vec<Operand>,
}

/// 过滤表达式结构错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("operator `{op}` expects {expected} arguments, got {actual}")]
    Arity {
        op: &'static str,
        expected: &'static str,
        actual: usize,
    },
    #[error("operator `{op}` takes only nested expressions as arguments")]
    ExpectedExpression { op: &'static str },
    #[error("operator `{op}` does not take nested expressions as arguments")]
    UnexpectedExpression { op: &'static str },
    #[error("operator `{op}` requires a property reference as its first argument")]
    ExpectedProperty { op: &'static str },
    #[error("`in` requires an array-valued second argument")]
    InRequiresArray,
    #[error("`a_overlaps` requires an array-valued second argument")]
    OverlapsRequiresArray,
    #[error("`t_intersects` requires a temporal interval as its second argument")]
    ExpectedInterval,
    #[error("invalid RFC 3339 instant `{0}` in temporal interval")]
    BadInstant(String),
    #[error("temporal interval start `{start}` is after end `{end}`")]
    ReversedInterval { start: String, end: String },
}

impl Expr {
    /// Structural validation of the whole tree.
    ///
    /// Checks the arity and operand-shape invariants the server would
    /// otherwise reject with an opaque 400, so malformed trees fail
    /// before a network call is made.
    pub fn validate(&self) -> Result<(), FilterError> {
        let op = self.op.as_str();
        match self.op {
            Operator::And | Operator::Or => {
                if self.args.len() < 2 {
                    return Err(FilterError::Arity {
                        op,
                        expected: "at least 2",
                        actual: self.args.len(),
                    });
                }
                for arg in &self.args {
                    match arg {
                        Operand::Expr(inner) => inner.validate()?,
                        _ => return Err(FilterError::ExpectedExpression { op }),
                    }
                }
                Ok(())
            }
            Operator::Not => {
                if self.args.len() != 1 {
                    return Err(FilterError::Arity {
                        op,
                        expected: "exactly 1",
                        actual: self.args.len(),
                    });
                }
                match &self.args[0] {
                    Operand::Expr(inner) => inner.validate(),
                    _ => Err(FilterError::ExpectedExpression { op }),
                }
            }
            _ => self.validate_leaf(op),
        }
    }

    fn validate_leaf(&self, op: &'static str) -> Result<(), FilterError> {
        if self.args.len() != 2 {
            return Err(FilterError::Arity {
                op,
                expected: "exactly 2",
                actual: self.args.len(),
            });
        }
        if self.args.iter().any(Operand::is_expr) {
            return Err(FilterError::UnexpectedExpression { op });
        }

        match self.op {
            Operator::AContains | Operator::AOverlaps | Operator::TIntersects => {
                if !matches!(self.args[0], Operand::Property(_)) {
                    return Err(FilterError::ExpectedProperty { op });
                }
            }
            _ => {}
        }

        match self.op {
            Operator::AOverlaps => {
                if !self.args[1].can_be_array() {
                    return Err(FilterError::OverlapsRequiresArray);
                }
            }
            // Operand order is significant: the SECOND argument is the
            // containing array. Swapped operands ask a different question.
            Operator::In => {
                if !self.args[1].can_be_array() {
                    return Err(FilterError::InRequiresArray);
                }
            }
            Operator::TIntersects => match &self.args[1] {
                Operand::Interval(interval) => validate_interval(interval)?,
                _ => return Err(FilterError::ExpectedInterval),
            },
            _ => {}
        }

        // Interval literals outside t_intersects still must be well formed.
        for arg in &self.args {
            if let Operand::Interval(interval) = arg {
                validate_interval(interval)?;
            }
        }
        Ok(())
    }

    /// Serialize the tree to its CQL2-JSON wire form.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Parse a CQL2-JSON value back into a tree.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

pub(crate) fn validate_interval(interval: &TemporalInterval) -> Result<(), FilterError> {
    let start = DateTime::parse_from_rfc3339(interval.start())
        .map_err(|_| FilterError::BadInstant(interval.start().to_string()))?;
    let end = DateTime::parse_from_rfc3339(interval.end())
        .map_err(|_| FilterError::BadInstant(interval.end().to_string()))?;
    if start > end {
        return Err(FilterError::ReversedInterval {
            start: interval.start().to_string(),
            end: interval.end().to_string(),
        });
    }
    Ok(())
}
