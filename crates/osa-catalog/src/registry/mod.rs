//! Two-phase registry of operation categories.
//!
//! [`RegistryBuilder`] is the only mutable form and exists during startup.
//! [`RegistryBuilder::build`] consumes it and yields a [`Registry`] that
//! offers enumeration and lookup but no mutation, so the serving phase can
//! share it freely behind an `Arc`.
//!
//! Duplicate names are accepted. Lookup scans in registration order and the
//! first match wins, so later duplicates are unreachable; the builder logs a
//! warning when that happens.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::category::Category;
use crate::error::ResolveError;
use crate::operation::Operation;
use crate::tool_name::{ToolName, compose};

/// Tracing target for registry diagnostics.
const REGISTRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::registry");

/// Accumulates categories before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    categories: Vec<Category>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a category.
    ///
    /// Registration never fails. Categories whose names contain an underscore
    /// and duplicate names are reported through `tracing` because neither can
    /// be reached by lookup.
    pub fn register(&mut self, category: Category) -> &mut Self {
        self.warn_if_unreachable(&category);
        self.categories.push(category);
        self
    }

    /// Number of categories registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories registered so far, in order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Freezes the builder into a read-only registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            categories: self.categories,
        }
    }

    fn warn_if_unreachable(&self, category: &Category) {
        let name = category.name();
        if name.contains('_') {
            warn!(
                target: REGISTRY_TARGET,
                category = name,
                "category name contains an underscore; its tools cannot be resolved"
            );
        }
        if self.categories.iter().any(|existing| existing.name() == name) {
            warn!(
                target: REGISTRY_TARGET,
                category = name,
                "duplicate category name; the earlier registration shadows this one"
            );
        }

        let operations = category.operations();
        for (index, operation) in operations.iter().enumerate() {
            let shadowed = operations
                .iter()
                .take(index)
                .any(|earlier| earlier.name() == operation.name());
            if shadowed {
                warn!(
                    target: REGISTRY_TARGET,
                    category = name,
                    operation = operation.name(),
                    "duplicate operation name; the earlier operation shadows this one"
                );
            }
        }
    }
}

/// Frozen, read-only collection of categories.
#[derive(Debug)]
pub struct Registry {
    categories: Vec<Category>,
}

impl Registry {
    /// Categories in registration order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Total number of operations across all categories.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.operations().len())
            .sum()
    }

    /// Enumerates every operation as a discovery descriptor.
    ///
    /// The iterator is lazy and each call starts a fresh pass, so repeated
    /// enumeration yields identical sequences.
    pub fn list_all(&self) -> impl Iterator<Item = ToolDescriptor<'_>> + '_ {
        self.categories.iter().flat_map(|category| {
            category
                .operations()
                .iter()
                .map(move |operation| ToolDescriptor::new(category, operation))
        })
    }

    /// Resolves a composite tool name to its category and operation.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CategoryNotFound`] when no category matches the
    /// part before the first underscore, or
    /// [`ResolveError::OperationNotFound`] when the category has no operation
    /// matching the remainder.
    pub fn resolve(&self, tool_name: &str) -> Result<Resolved<'_>, ResolveError> {
        let name = ToolName::parse(tool_name);
        let category = self
            .categories
            .iter()
            .find(|category| category.name() == name.category())
            .ok_or_else(|| ResolveError::category_not_found(name.category()))?;
        let operation = category.operation(name.operation()).ok_or_else(|| {
            ResolveError::operation_not_found(name.category(), name.operation())
        })?;
        Ok(Resolved {
            category,
            operation,
        })
    }
}

/// A successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// Owning category.
    pub category: &'a Category,
    /// Resolved operation.
    pub operation: &'a Operation,
}

impl Resolved<'_> {
    /// Returns `true` when the lookup landed on `category`/`operation`.
    #[must_use]
    pub fn is(&self, category: &str, operation: &str) -> bool {
        self.category.name() == category && self.operation.name() == operation
    }
}

/// Discovery record for one operation, serialised for `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor<'a> {
    /// Composite tool name.
    pub name: String,
    /// Category description in brackets followed by the operation description.
    pub description: String,
    /// Declared input schema.
    #[serde(rename = "inputSchema")]
    pub input_schema: &'a Value,
}

impl<'a> ToolDescriptor<'a> {
    fn new(category: &'a Category, operation: &'a Operation) -> Self {
        Self {
            name: compose(category.name(), operation.name()),
            description: format!("[{}] {}", category.description(), operation.description()),
            input_schema: operation.input().as_value(),
        }
    }
}

#[cfg(test)]
mod tests;
