// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Constructors for filter trees.
//!
//! `in` is deliberately split into [`Expr::property_within`] and
//! [`Expr::value_within`]: the two operand orders ask different
//! questions, so there is no positional two-value constructor to get
//! backwards.

use serde_json::Value;

use crate::domain::filter::expr::{Expr, Operand, Operator, TemporalInterval};

impl Expr {
    /// All predicates must hold.
    pub fn and(exprs: Vec<Expr>) -> Expr {
        Self::combine(Operator::And, exprs)
    }

    /// At least one predicate must hold.
    pub fn or(exprs: Vec<Expr>) -> Expr {
        Self::combine(Operator::Or, exprs)
    }

    pub fn not(expr: Expr) -> Expr {
        Expr {
            op: Operator::Not,
            args: vec![Operand::Expr(Box::new(expr))],
        }
    }

    /// `property = value`
    pub fn eq(property: &str, value: impl Into<Value>) -> Expr {
        Self::leaf(Operator::Eq, property, value)
    }

    /// `property <> value`
    pub fn neq(property: &str, value: impl Into<Value>) -> Expr {
        Self::leaf(Operator::NotEq, property, value)
    }

    pub fn lt(property: &str, value: impl Into<Value>) -> Expr {
        Self::leaf(Operator::Lt, property, value)
    }

    pub fn lte(property: &str, value: impl Into<Value>) -> Expr {
        Self::leaf(Operator::Lte, property, value)
    }

    pub fn gt(property: &str, value: impl Into<Value>) -> Expr {
        Self::leaf(Operator::Gt, property, value)
    }

    pub fn gte(property: &str, value: impl Into<Value>) -> Expr {
        Self::leaf(Operator::Gte, property, value)
    }

    /// The array-valued property contains `value` as an element.
    pub fn a_contains(property: &str, value: impl Into<Value>) -> Expr {
        Self::leaf(Operator::AContains, property, value)
    }

    /// The array-valued property shares at least one element with
    /// `values`.
    pub fn a_overlaps<I, V>(property: &str, values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Expr {
            op: Operator::AOverlaps,
            args: vec![
                Operand::property(property),
                Operand::Literal(Value::Array(values.into_iter().map(Into::into).collect())),
            ],
        }
    }

    /// The property's instant or interval value intersects the given
    /// closed interval.
    pub fn t_intersects(property: &str, interval: TemporalInterval) -> Expr {
        Expr {
            op: Operator::TIntersects,
            args: vec![Operand::property(property), Operand::Interval(interval)],
        }
    }

    /// `in({property}, values)`: the property's scalar value is an
    /// element of the literal array.
    pub fn property_within<I, V>(property: &str, values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Expr {
            op: Operator::In,
            args: vec![
                Operand::property(property),
                Operand::Literal(Value::Array(values.into_iter().map(Into::into).collect())),
            ],
        }
    }

    /// `in(value, {property})`: the literal value is an element of the
    /// property's array value.
    pub fn value_within(value: impl Into<Value>, property: &str) -> Expr {
        Expr {
            op: Operator::In,
            args: vec![Operand::literal(value), Operand::property(property)],
        }
    }

    fn combine(op: Operator, exprs: Vec<Expr>) -> Expr {
        Expr {
            op,
            args: exprs
                .into_iter()
                .map(|expr| Operand::Expr(Box::new(expr)))
                .collect(),
        }
    }

    fn leaf(op: Operator, property: &str, value: impl Into<Value>) -> Expr {
        Expr {
            op,
            args: vec![Operand::property(property), Operand::literal(value)],
        }
    }
}
