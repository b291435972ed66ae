//! Document queries
//!
//! Filters apply to top-level fields only.

use std::cmp::Ordering;

use serde_json::Value;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Field filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field == value`
    Eq(String, Value),
    /// `field < value`, numbers with numbers and strings with strings
    Lt(String, Value),
}

/// Filtered, ordered, limited read
///
/// ```
/// use platform::docstore::{Order, Query};
///
/// let query = Query::new()
///     .eq("email", "demo@lpfacil.com")
///     .order_by("createdAt", Order::Desc)
///     .limit(1);
/// assert_eq!(query.limit_value(), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<Filter>,
    order_by: Option<(String, Order)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field.into(), value.into()));
        self
    }

    pub fn lt(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lt(field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, order: Order) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn ordering(&self) -> Option<(&str, Order)> {
        self.order_by
            .as_ref()
            .map(|(field, order)| (field.as_str(), *order))
    }

    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// Whether a document payload satisfies every filter
    pub fn matches(&self, data: &Value) -> bool {
        self.filters.iter().all(|filter| match filter {
            Filter::Eq(field, expected) => data.get(field) == Some(expected),
            Filter::Lt(field, bound) => data
                .get(field)
                .and_then(|actual| compare_values(actual, bound))
                .is_some_and(|ord| ord == Ordering::Less),
        })
    }

    /// Compare two payloads by the order-by field
    ///
    /// Documents missing the field sort last in either direction.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let Some((field, order)) = self.ordering() else {
            return Ordering::Equal;
        };

        match (a.get(field), b.get(field)) {
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y).unwrap_or(Ordering::Equal);
                match order {
                    Order::Asc => ord,
                    Order::Desc => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Ordering between two scalar JSON values of the same type
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
