//! st_read query construction

/// How st_read should type the columns it finds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTypes {
    /// Let the GDAL driver infer integer, real, date and boolean columns
    Auto,
    /// Every column is text
    String,
}

impl FieldTypes {
    fn open_option(self) -> &'static str {
        match self {
            FieldTypes::Auto => "FIELD_TYPES=AUTO",
            FieldTypes::String => "FIELD_TYPES=STRING",
        }
    }
}

/// How the file path reaches the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathBinding {
    /// Spliced into the SQL text as a quoted literal
    Inline,
    /// Bound as the single `?` parameter of a prepared statement
    Parameter,
}

/// A read-only scan of one spreadsheet through `st_read`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanQuery {
    pub field_types: FieldTypes,
    pub binding: PathBinding,
}

impl ScanQuery {
    /// SQL text for scanning `path`
    pub fn sql(&self, path: &str) -> String {
        let target = match self.binding {
            PathBinding::Inline => quote_literal(path),
            PathBinding::Parameter => "?".to_string(),
        };
        format!(
            "SELECT * FROM st_read({target}, open_options=['HEADERS=FORCE', '{}'])",
            self.field_types.open_option()
        )
    }
}

/// Quote a string as a SQL literal, doubling embedded quotes
fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
