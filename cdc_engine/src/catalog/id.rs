use std::fmt;
use std::hash::{Hash, Hasher};

use common::err::cdc_error::CdcError;

/// A stable key into the Catalog: (catalog, schema, table). Catalog and
/// schema may be absent — equality and hashing only treat an absent
/// component as equal to another absent component, never to an empty
/// string.
#[derive(Debug, Clone, Eq)]
pub struct QualifiedTableId {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: String,
}

impl QualifiedTableId {
    pub fn new(catalog: Option<String>, schema: Option<String>, table: String) -> Self {
        QualifiedTableId { catalog, schema, table }
    }

    /// Parses `schema.table` or `catalog.schema.table`, stripping a single
    /// layer of backtick-quoting per component. A 2-part name has no
    /// catalog component at all (not a defaulted one) — distinguishing
    /// "no catalog" from "catalog happens to equal schema" keeps the id
    /// stable whether or not a later event starts naming the catalog.
    pub fn parse(value: &str) -> Result<QualifiedTableId, CdcError> {
        let parts: Vec<&str> = value.split('.').collect();
        match parts.as_slice() {
            [schema, table] => Ok(QualifiedTableId::new(
                None,
                Some(unquote(schema)?),
                unquote(table)?,
            )),
            [catalog, schema, table] => Ok(QualifiedTableId::new(
                Some(unquote(catalog)?),
                Some(unquote(schema)?),
                unquote(table)?,
            )),
            _ => Err(CdcError::Other(format!(
                "expected `schema.table` or `catalog.schema.table`, got `{value}`"
            ))),
        }
    }

    pub fn with_table(schema: Option<String>, table: impl Into<String>) -> Self {
        QualifiedTableId::new(None, schema, table.into())
    }
}

fn unquote(part: &str) -> Result<String, CdcError> {
    let trimmed = part.trim();
    let stripped = trimmed.strip_prefix('`').unwrap_or(trimmed);
    let stripped = stripped.strip_suffix('`').unwrap_or(stripped);
    if stripped.contains('`') {
        return Err(CdcError::Other(format!("stray backtick in `{part}`")));
    }
    Ok(stripped.to_string())
}

impl PartialEq for QualifiedTableId {
    fn eq(&self, other: &Self) -> bool {
        self.catalog == other.catalog && self.schema == other.schema && self.table == other.table
    }
}

impl Hash for QualifiedTableId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.catalog.hash(state);
        self.schema.hash(state);
        self.table.hash(state);
    }
}

impl fmt::Display for QualifiedTableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.catalog, &self.schema) {
            (Some(catalog), Some(schema)) => write!(f, "{catalog}.{schema}.{}", self.table),
            (None, Some(schema)) => write!(f, "{schema}.{}", self.table),
            _ => write!(f, "{}", self.table),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_two_part_name() {
        let id = QualifiedTableId::parse("shop.orders").unwrap();
        assert_eq!(id.catalog, None);
        assert_eq!(id.schema, Some("shop".to_string()));
        assert_eq!(id.table, "orders");
    }

    #[test]
    fn parses_three_part_name() {
        let id = QualifiedTableId::parse("db1.shop.orders").unwrap();
        assert_eq!(id.catalog, Some("db1".to_string()));
        assert_eq!(id.schema, Some("shop".to_string()));
        assert_eq!(id.table, "orders");
    }

    #[test]
    fn strips_backticks() {
        let id = QualifiedTableId::parse("`shop`.`orders`").unwrap();
        assert_eq!(id.schema, Some("shop".to_string()));
        assert_eq!(id.table, "orders");
    }

    #[test]
    fn rejects_stray_backtick() {
        assert!(QualifiedTableId::parse("sh`op.orders").is_err());
    }

    #[test]
    fn rejects_malformed_name() {
        assert!(QualifiedTableId::parse("orders").is_err());
        assert!(QualifiedTableId::parse("a.b.c.d").is_err());
    }

    #[test]
    fn equality_ignores_absent_catalog_symmetrically() {
        let a = QualifiedTableId::new(None, Some("shop".into()), "orders".into());
        let b = QualifiedTableId::new(None, Some("shop".into()), "orders".into());
        assert_eq!(a, b);

        let c = QualifiedTableId::new(Some("db1".into()), Some("shop".into()), "orders".into());
        assert_ne!(a, c);
    }
}
