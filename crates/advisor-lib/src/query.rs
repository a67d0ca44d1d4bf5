//! Resource Graph query construction

use crate::error::{AdvisorError, Result};

/// One output column of a graph query projection.
///
/// Column order determines output column order where the consuming format
/// cares; column names are expected to be unique within one projection.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionColumn {
    pub column: &'static str,
    pub expression: &'static str,
}

impl ProjectionColumn {
    pub const fn new(column: &'static str, expression: &'static str) -> Self {
        Self { column, expression }
    }
}

/// Append a `|project` clause to a base filter expression.
///
/// Columns are emitted in input order as `column=expression` pairs, comma
/// separated with no trailing separator. The base expression is taken as a
/// pre-validated query fragment.
pub fn build_query(base: &str, projection: &[ProjectionColumn]) -> Result<String> {
    if projection.is_empty() {
        return Err(AdvisorError::Configuration(
            "graph query projection must not be empty".to_string(),
        ));
    }

    let columns = projection
        .iter()
        .map(|p| format!("{}={}", p.column, p.expression))
        .collect::<Vec<_>>()
        .join(",");

    Ok(format!("{base}|project {columns}"))
}
