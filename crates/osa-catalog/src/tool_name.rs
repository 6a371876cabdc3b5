use std::fmt;

/// A composite tool name split into its category and operation parts.
///
/// Parsing splits on the first underscore only. A name without any
/// underscore yields the whole name as the category and an empty operation,
/// which never matches a registered operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolName<'a> {
    category: &'a str,
    operation: &'a str,
}

impl<'a> ToolName<'a> {
    /// Splits `name` into category and operation.
    #[must_use]
    pub fn parse(name: &'a str) -> Self {
        let (category, operation) = name.split_once('_').unwrap_or((name, ""));
        Self {
            category,
            operation,
        }
    }

    /// Category part.
    #[must_use]
    pub const fn category(&self) -> &'a str {
        self.category
    }

    /// Operation part, possibly containing further underscores.
    #[must_use]
    pub const fn operation(&self) -> &'a str {
        self.operation
    }

    /// Returns `true` when this names `category`/`operation` exactly.
    #[must_use]
    pub fn is(&self, category: &str, operation: &str) -> bool {
        self.category == category && self.operation == operation
    }
}

impl fmt::Display for ToolName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.category, self.operation)
    }
}

/// Joins a category and operation into the wire-level tool name.
pub(crate) fn compose(category: &str, operation: &str) -> String {
    format!("{category}_{operation}")
}
