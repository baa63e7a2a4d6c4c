//! Filter and ordering translation.
//!
//! This module turns structured filter/ordering/pagination arguments into the
//! OData-style query parameters the Insightly API expects:
//!
//! - [`Filter`] builds the `$filter` expression from `field op literal`
//!   clauses joined with `and`;
//! - [`OrderBy`] builds the `$orderby` expression from field names with an
//!   optional `-` prefix for descending order;
//! - [`QueryOptions`] bundles both with the `$top`/`$skip` pagination
//!   parameters.
//!
//! # Example
//!
//! ```rust
//! use insightly_api::{Filter, QueryOptions};
//!
//! let options = QueryOptions::new()
//!     .filter(
//!         Filter::new()
//!             .parse("ORGANISATION_NAME", "Acme")?
//!             .parse("DATE_CREATED_UTC__gt", "2023-01-01")?,
//!     )
//!     .order_by("-DATE_CREATED_UTC")
//!     .top(5);
//!
//! let params = options.to_query_params();
//! assert_eq!(params[0].0, "$filter");
//! # Ok::<(), insightly_api::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::value::FilterValue;

/// Comparison operators supported by the filter grammar.
///
/// This is a closed set; any other operator suffix fails validation with
/// [`ErrorKind::InvalidOperator`] before a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Greater than.
    Gt,
    /// Equal to. The default when no suffix is given.
    Eq,
    /// Less than.
    Lt,
    /// Greater than or equal to.
    Gte,
    /// Less than or equal to.
    Lte,
}

impl FilterOperator {
    /// The operator token as it appears in the wire grammar.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Gt => "gt",
            FilterOperator::Eq => "eq",
            FilterOperator::Lt => "lt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lte => "lte",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gt" => Ok(FilterOperator::Gt),
            "eq" => Ok(FilterOperator::Eq),
            "lt" => Ok(FilterOperator::Lt),
            "gte" => Ok(FilterOperator::Gte),
            "lte" => Ok(FilterOperator::Lte),
            other => Err(Error::new(ErrorKind::InvalidOperator(other.to_string()))),
        }
    }
}

/// One `field operator literal` unit of a filter expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// Field name as it appears on the wire.
    pub field: String,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Right-hand value, encoded to a wire literal on rendering.
    pub value: FilterValue,
}

impl FilterClause {
    /// Parse a `field` or `field__operator` key into a clause.
    ///
    /// The key is split on the *last* `__` occurrence, so a field name may
    /// itself contain `__` as long as the trailing segment is not mistaken
    /// for an operator. Callers with field names ending in `__<non-operator>`
    /// must use [`Filter::clause`] instead; that constraint is not validated
    /// here.
    pub fn parse(key: &str, value: impl Into<FilterValue>) -> Result<Self> {
        let (field, operator) = match key.rsplit_once("__") {
            Some((field, suffix)) => (field, suffix.parse()?),
            None => (key, FilterOperator::Eq),
        };
        Ok(Self {
            field: field.to_string(),
            operator,
            value: value.into(),
        })
    }

    fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.field,
            self.operator,
            self.value.to_wire_literal()
        )
    }
}

/// An ordered set of filter clauses, joined with `and` on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<FilterClause>,
}

impl Filter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause with an explicit operator.
    pub fn clause(
        mut self,
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.clauses.push(FilterClause {
            field: field.into(),
            operator,
            value: value.into(),
        });
        self
    }

    /// Add a clause from a `field` or `field__operator` key.
    ///
    /// A bare field name implies equality. An unsupported operator suffix
    /// fails with [`ErrorKind::InvalidOperator`] naming the offender.
    pub fn parse(mut self, key: &str, value: impl Into<FilterValue>) -> Result<Self> {
        self.clauses.push(FilterClause::parse(key, value)?);
        Ok(self)
    }

    /// Returns true if no clauses have been added.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render the `$filter` expression, or `None` when there are no clauses.
    pub fn to_expression(&self) -> Option<String> {
        if self.clauses.is_empty() {
            return None;
        }
        let rendered: Vec<String> = self.clauses.iter().map(FilterClause::render).collect();
        Some(rendered.join(" and "))
    }
}

/// An ordered list of sort terms, comma-joined on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBy {
    terms: Vec<OrderTerm>,
}

/// One sort term: a field name and a direction.
#[derive(Debug, Clone, PartialEq)]
struct OrderTerm {
    field: String,
    descending: bool,
}

/// Direction marker in the wire grammar. Fixed by the protocol, not
/// caller-configurable.
const DESC_MARKER: &str = "desc";

impl OrderBy {
    /// Create an empty ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a term. A leading `-` marks the field descending.
    pub fn term(mut self, field: &str) -> Self {
        let (field, descending) = match field.strip_prefix('-') {
            Some(stripped) => (stripped, true),
            None => (field, false),
        };
        self.terms.push(OrderTerm {
            field: field.to_string(),
            descending,
        });
        self
    }

    /// Returns true if no terms have been added.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Render the `$orderby` expression, or `None` when there are no terms.
    pub fn to_expression(&self) -> Option<String> {
        if self.terms.is_empty() {
            return None;
        }
        let rendered: Vec<String> = self
            .terms
            .iter()
            .map(|t| {
                if t.descending {
                    format!("{} {}", t.field, DESC_MARKER)
                } else {
                    t.field.clone()
                }
            })
            .collect();
        Some(rendered.join(","))
    }
}

impl From<&str> for OrderBy {
    /// A single bare field name is accepted as a one-term ordering.
    fn from(field: &str) -> Self {
        OrderBy::new().term(field)
    }
}

impl From<String> for OrderBy {
    fn from(field: String) -> Self {
        OrderBy::new().term(&field)
    }
}

impl<'a> FromIterator<&'a str> for OrderBy {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().fold(OrderBy::new(), |ob, f| ob.term(f))
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for OrderBy {
    fn from(fields: [&'a str; N]) -> Self {
        fields.into_iter().collect()
    }
}

impl From<&[&str]> for OrderBy {
    fn from(fields: &[&str]) -> Self {
        fields.iter().copied().collect()
    }
}

/// Filtering, ordering, and pagination arguments for a list request.
///
/// Produces up to four query parameters: `$filter`, `$orderby`, `$top`,
/// `$skip` — each present only when the corresponding argument was supplied.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    filter: Filter,
    order_by: OrderBy,
    top: Option<u32>,
    skip: Option<u32>,
}

impl QueryOptions {
    /// Create empty options (no query parameters at all).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter expression.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the ordering. Accepts an [`OrderBy`], a bare field name, or an
    /// array/slice of field names.
    pub fn order_by(mut self, order_by: impl Into<OrderBy>) -> Self {
        self.order_by = order_by.into();
        self
    }

    /// Set the page size (`$top`).
    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Set the page offset (`$skip`).
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Returns true if no parameter would be emitted.
    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
            && self.order_by.is_empty()
            && self.top.is_none()
            && self.skip.is_none()
    }

    /// Produce the ordered query parameter pairs.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(filter) = self.filter.to_expression() {
            params.push(("$filter", filter));
        }
        if let Some(order) = self.order_by.to_expression() {
            params.push(("$orderby", order));
        }
        if let Some(top) = self.top {
            params.push(("$top", top.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("$skip", skip.to_string()));
        }
        params
    }

    /// Render the query string with values percent-encoded, or `None` when
    /// no parameter is present.
    pub fn to_query_string(&self) -> Option<String> {
        let params = self.to_query_params();
        if params.is_empty() {
            return None;
        }
        let rendered: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        Some(rendered.join("&"))
    }
}
