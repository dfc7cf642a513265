//! Metadata predicates for filtered search

/// Conjunction of optional metadata constraints.
///
/// Empty fields mean unrestricted. Rendered to a SQL-style predicate for the
/// scanner's prefilter, so ranking only sees matching rows.
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    pub ticker: Option<String>,
    pub doc_types: Vec<String>,
    pub fiscal_year: Option<i32>,
}

impl MetadataFilter {
    pub fn is_empty(&self) -> bool {
        self.ticker.is_none() && self.doc_types.is_empty() && self.fiscal_year.is_none()
    }

    /// Render to a predicate string, or `None` when unrestricted.
    pub fn to_predicate(&self) -> Option<String> {
        let mut clauses = Vec::new();

        if let Some(ticker) = &self.ticker {
            clauses.push(format!("ticker = '{}'", escape(ticker)));
        }

        if !self.doc_types.is_empty() {
            let list = self
                .doc_types
                .iter()
                .map(|t| format!("'{}'", escape(t)))
                .collect::<Vec<_>>()
                .join(",");
            clauses.push(format!("doc_type IN ({list})"));
        }

        if let Some(year) = self.fiscal_year {
            clauses.push(format!("fiscal_year = {year}"));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" AND "))
        }
    }
}

// Escape single quotes by doubling them.
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}
