// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Local evaluation of filter trees against items.
//!
//! Real evaluation happens server-side; this mirror of the predicate
//! semantics exists so filters and result sets can be cross-checked in
//! tests without a live catalog. A property missing from an item makes
//! the enclosing predicate false, matching the remote catalog's
//! permissive zero-match behavior.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::domain::filter::expr::{Expr, FilterError, Operand, Operator, TemporalInterval};
use crate::domain::models::item::Item;

impl Expr {
    /// Evaluate the tree against a single item.
    ///
    /// The tree is validated first; malformed trees fail the same way
    /// they would fail ahead of a network call.
    pub fn matches(&self, item: &Item) -> Result<bool, FilterError> {
        self.validate()?;
        eval(self, item)
    }
}

fn eval(expr: &Expr, item: &Item) -> Result<bool, FilterError> {
    match expr.op {
        Operator::And => {
            for arg in &expr.args {
                if let Operand::Expr(inner) = arg {
                    if !eval(inner, item)? {
                        return Ok(false);
                    }
                }
            }
            Ok(true)
        }
        Operator::Or => {
            for arg in &expr.args {
                if let Operand::Expr(inner) = arg {
                    if eval(inner, item)? {
                        return Ok(true);
                    }
                }
            }
            Ok(false)
        }
        Operator::Not => match &expr.args[0] {
            Operand::Expr(inner) => Ok(!eval(inner, item)?),
            _ => Ok(false),
        },
        Operator::Eq => Ok(binary_values(expr, item)
            .map(|(left, right)| left == right)
            .unwrap_or(false)),
        Operator::NotEq => Ok(binary_values(expr, item)
            .map(|(left, right)| left != right)
            .unwrap_or(false)),
        Operator::Lt => Ok(compare(expr, item) == Some(Ordering::Less)),
        Operator::Lte => Ok(matches!(
            compare(expr, item),
            Some(Ordering::Less) | Some(Ordering::Equal)
        )),
        Operator::Gt => Ok(compare(expr, item) == Some(Ordering::Greater)),
        Operator::Gte => Ok(matches!(
            compare(expr, item),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        )),
        Operator::In => Ok(binary_values(expr, item)
            .and_then(|(needle, haystack)| {
                haystack
                    .as_array()
                    .map(|elements| elements.contains(&needle.into_owned()))
            })
            .unwrap_or(false)),
        Operator::AContains => Ok(binary_values(expr, item)
            .and_then(|(array, element)| {
                array
                    .as_array()
                    .map(|elements| elements.contains(&element.into_owned()))
            })
            .unwrap_or(false)),
        Operator::AOverlaps => Ok(binary_values(expr, item)
            .and_then(|(left, right)| match (left.as_array(), right.as_array()) {
                (Some(a), Some(b)) => Some(a.iter().any(|element| b.contains(element))),
                _ => None,
            })
            .unwrap_or(false)),
        Operator::TIntersects => eval_t_intersects(expr, item),
    }
}

/// Resolve both operands of a leaf node to concrete values.
fn binary_values<'a>(expr: &'a Expr, item: &'a Item) -> Option<(Cow<'a, Value>, Cow<'a, Value>)> {
    let left = resolve(&expr.args[0], item)?;
    let right = resolve(&expr.args[1], item)?;
    Some((left, right))
}

fn resolve<'a>(operand: &'a Operand, item: &'a Item) -> Option<Cow<'a, Value>> {
    match operand {
        Operand::Property(property) => item
            .property(&property.property)
            .filter(|value| !value.is_null())
            .map(Cow::Borrowed),
        Operand::Literal(value) => Some(Cow::Borrowed(value)),
        Operand::Interval(_) | Operand::Expr(_) => None,
    }
}

fn compare(expr: &Expr, item: &Item) -> Option<Ordering> {
    let (left, right) = binary_values(expr, item)?;
    match (left.as_ref(), right.as_ref()) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn eval_t_intersects(expr: &Expr, item: &Item) -> Result<bool, FilterError> {
    let property = match &expr.args[0] {
        Operand::Property(property) => property.property.as_str(),
        _ => return Ok(false),
    };
    let interval = match &expr.args[1] {
        Operand::Interval(interval) => interval,
        _ => return Ok(false),
    };
    let (start, end) = parse_interval(interval)?;

    let Some((item_start, item_end)) = item_bounds(item, property)? else {
        return Ok(false);
    };
    // 闭区间相交
    Ok(item_start <= end && start <= item_end)
}

fn parse_interval(
    interval: &TemporalInterval,
) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), FilterError> {
    Ok((
        parse_instant(interval.start())?,
        parse_instant(interval.end())?,
    ))
}

fn parse_instant(raw: &str) -> Result<DateTime<FixedOffset>, FilterError> {
    DateTime::parse_from_rfc3339(raw).map_err(|_| FilterError::BadInstant(raw.to_string()))
}

/// Temporal bounds of an item property: an instant, a two-element
/// interval value, or the `start_datetime`/`end_datetime` pair when a
/// queried `datetime` is itself null.
fn item_bounds(
    item: &Item,
    property: &str,
) -> Result<Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)>, FilterError> {
    match item.property(property) {
        Some(Value::String(raw)) => {
            let instant = parse_instant(raw)?;
            Ok(Some((instant, instant)))
        }
        Some(Value::Array(bounds)) if bounds.len() == 2 => {
            match (bounds[0].as_str(), bounds[1].as_str()) {
                (Some(start), Some(end)) => {
                    Ok(Some((parse_instant(start)?, parse_instant(end)?)))
                }
                _ => Ok(None),
            }
        }
        Some(_) | None if property == Item::DATETIME => {
            let start = item.property("start_datetime").and_then(Value::as_str);
            let end = item.property("end_datetime").and_then(Value::as_str);
            match (start, end) {
                (Some(start), Some(end)) => {
                    Ok(Some((parse_instant(start)?, parse_instant(end)?)))
                }
                _ => Ok(None),
            }
        }
        _ => Ok(None),
    }
}
