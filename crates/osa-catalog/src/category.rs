use crate::operation::Operation;

/// A named, described group of operations; the unit of registration.
#[derive(Debug)]
pub struct Category {
    name: String,
    description: String,
    operations: Vec<Operation>,
}

impl Category {
    /// Creates an empty category.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            operations: Vec::new(),
        }
    }

    /// Appends an operation. Insertion order is discovery order.
    #[must_use]
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Category name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Operations in registration order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Finds the first operation named `name`.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|operation| operation.name() == name)
    }
}
