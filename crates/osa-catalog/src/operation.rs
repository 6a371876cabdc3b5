//! Operation descriptors and script producers.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::error::ProduceError;

type RenderFn = dyn Fn(&Value) -> Result<String, ProduceError> + Send + Sync;

/// Source of the script text for an operation.
///
/// A producer is either a fixed script or a render function over a typed
/// input. Typed producers deserialise the request arguments into their input
/// struct before rendering, so templates never inspect raw JSON.
pub enum Producer {
    /// Script text that does not depend on the request.
    Fixed(&'static str),
    /// Script rendered from deserialised request arguments.
    Computed(Box<RenderFn>),
}

impl Producer {
    /// Wraps a render function over the input type `T`.
    ///
    /// Missing arguments are treated as an empty object, so `T` should carry
    /// `#[serde(default)]` on every optional field.
    pub fn typed<T, F>(render: F) -> Self
    where
        T: DeserializeOwned + 'static,
        F: Fn(T) -> String + Send + Sync + 'static,
    {
        Self::Computed(Box::new(move |arguments: &Value| {
            let input = T::deserialize(arguments).map_err(ProduceError::invalid_arguments)?;
            Ok(render(input))
        }))
    }

    /// Wraps a render function that may reject well-typed input, for example
    /// a date string in the wrong format.
    pub fn try_typed<T, F>(render: F) -> Self
    where
        T: DeserializeOwned + 'static,
        F: Fn(T) -> Result<String, ProduceError> + Send + Sync + 'static,
    {
        Self::Computed(Box::new(move |arguments: &Value| {
            let input = T::deserialize(arguments).map_err(ProduceError::invalid_arguments)?;
            render(input)
        }))
    }

    /// Produces the script for the given request arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ProduceError::InvalidArguments`] when the arguments cannot be
    /// deserialised into the operation's input type, or
    /// [`ProduceError::Rejected`] when the render function refuses them.
    pub fn produce(&self, arguments: Option<&Value>) -> Result<String, ProduceError> {
        match self {
            Self::Fixed(script) => Ok((*script).to_owned()),
            Self::Computed(render) => match arguments {
                Some(value) if !value.is_null() => render(value),
                _ => render(&Value::Object(Map::new())),
            },
        }
    }

    /// Returns `true` for producers that render from arguments.
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(script) => f.debug_tuple("Fixed").field(&script.len()).finish(),
            Self::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// Declared input of an operation, expressed as a JSON Schema object.
#[derive(Debug, Clone, PartialEq)]
pub struct InputShape(Value);

impl InputShape {
    /// Builds an object schema from its `properties` map and the names of the
    /// required properties.
    #[must_use]
    pub fn object(properties: Value, required: &[&str]) -> Self {
        let mut schema = Map::new();
        schema.insert("type".to_owned(), json!("object"));
        schema.insert("properties".to_owned(), properties);
        if !required.is_empty() {
            schema.insert("required".to_owned(), json!(required));
        }
        Self(Value::Object(schema))
    }

    /// Schema advertised for operations that take no input.
    #[must_use]
    pub fn empty() -> Self {
        Self(json!({ "type": "object", "properties": {} }))
    }

    /// Returns the schema document.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

/// A named unit of work within a category.
#[derive(Debug)]
pub struct Operation {
    name: String,
    description: String,
    input: InputShape,
    producer: Producer,
}

impl Operation {
    /// Creates an operation that expects no input.
    pub fn new(name: impl Into<String>, description: impl Into<String>, producer: Producer) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input: InputShape::empty(),
            producer,
        }
    }

    /// Replaces the declared input shape.
    #[must_use]
    pub fn with_input(mut self, input: InputShape) -> Self {
        self.input = input;
        self
    }

    /// Operation name, unique within its category.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description used for discovery.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared input shape.
    #[must_use]
    pub const fn input(&self) -> &InputShape {
        &self.input
    }

    /// Script producer.
    #[must_use]
    pub const fn producer(&self) -> &Producer {
        &self.producer
    }
}
