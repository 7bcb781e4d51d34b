//! Dynamic `WHERE` clause assembly for filtered listings.
//!
//! Listing endpoints accept a variable set of optional filters, so their
//! queries are built at runtime with positional parameters collected here
//! and bound in order afterwards.

use masthead_core::types::{DbId, Timestamp};
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// A value bound to a dynamically built query.
#[derive(Debug, Clone)]
pub enum BindValue {
    BigInt(i64),
    Text(String),
    Timestamp(Timestamp),
}

/// Accumulates `AND`-joined conditions and their bind values.
#[derive(Debug, Default)]
pub struct Filter {
    conditions: Vec<String>,
    values: Vec<BindValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next positional parameter.
    pub fn next_index(&self) -> usize {
        self.values.len() + 1
    }

    /// Add a condition. `{}` in `template` is replaced with the parameter
    /// placeholder (every occurrence refers to the same parameter).
    pub fn push(&mut self, template: &str, value: BindValue) {
        let placeholder = format!("${}", self.next_index());
        self.conditions.push(template.replace("{}", &placeholder));
        self.values.push(value);
    }

    /// Add a condition that binds nothing.
    pub fn push_raw(&mut self, condition: &str) {
        self.conditions.push(condition.to_string());
    }

    pub fn eq_bigint(&mut self, column: &str, value: Option<DbId>) {
        if let Some(v) = value {
            self.push(&format!("{column} = {{}}"), BindValue::BigInt(v));
        }
    }

    pub fn eq_text(&mut self, column: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.push(&format!("{column} = {{}}"), BindValue::Text(v.to_string()));
        }
    }

    pub fn since(&mut self, column: &str, value: Option<Timestamp>) {
        if let Some(v) = value {
            self.push(&format!("{column} >= {{}}"), BindValue::Timestamp(v));
        }
    }

    pub fn until(&mut self, column: &str, value: Option<Timestamp>) {
        if let Some(v) = value {
            self.push(&format!("{column} <= {{}}"), BindValue::Timestamp(v));
        }
    }

    /// The `WHERE ...` clause, or an empty string when unfiltered.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn values(&self) -> &[BindValue] {
        &self.values
    }
}

/// `%term%` pattern for a substring `LIKE`, with the term's own wildcards
/// escaped. Pair with `ESCAPE '\'` in SQL.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Bind filter values to a `QueryAs` in positional order.
pub fn bind_values<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind filter values to a scalar `COUNT` query in positional order.
pub fn bind_values_scalar<'q>(
    mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    values: &'q [BindValue],
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("launch"), "%launch%");
        assert_eq!(contains_pattern("100%_off"), "%100\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        assert_eq!(Filter::new().where_clause(), "");
    }

    #[test]
    fn conditions_are_numbered_in_order() {
        let mut f = Filter::new();
        f.eq_text("action", Some("APPROVED"));
        f.eq_bigint("user_id", None);
        f.eq_bigint("article_id", Some(7));
        assert_eq!(f.where_clause(), "WHERE action = $1 AND article_id = $2");
        assert_eq!(f.values().len(), 2);
        assert_eq!(f.next_index(), 3);
    }

    #[test]
    fn repeated_placeholder_shares_one_parameter() {
        let mut f = Filter::new();
        f.push("(title ILIKE {} OR name ILIKE {})", BindValue::Text("%x%".into()));
        assert_eq!(f.where_clause(), "WHERE (title ILIKE $1 OR name ILIKE $1)");
    }
}
