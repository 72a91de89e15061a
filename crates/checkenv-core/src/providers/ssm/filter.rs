//! Tag filters for parameter listing calls

/// One `tag:<name> = <value>` equality constraint on a listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTag {
    pub name: String,
    pub value: String,
}

impl FilterTag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Filter key as understood by the listing endpoint
    pub fn filter_key(&self) -> String {
        format!("tag:{}", self.name)
    }
}

/// Parse a comma-separated `name:value` list into filter tags
///
/// Segments without both a non-empty name and a non-empty value are
/// dropped with a warning; they never fail the parse.
pub fn parse_filter_tags(spec: &str) -> Vec<FilterTag> {
    let mut tags = Vec::new();

    for segment in spec.split(',') {
        match segment.split_once(':') {
            Some((name, value)) if !name.is_empty() && !value.is_empty() => {
                tags.push(FilterTag::new(name, value));
            }
            _ => {
                tracing::warn!(segment = segment, "Unable to parse tag name and value");
            }
        }
    }

    tags
}
