//! Operation catalog for the AppleScript MCP server.
//!
//! The catalog is built in two phases. During startup a [`RegistryBuilder`]
//! accumulates [`Category`] values, each holding an ordered list of
//! [`Operation`] descriptors. [`RegistryBuilder::build`] then freezes the
//! collection into a read-only [`Registry`] which the server shares across
//! request handlers.
//!
//! Clients address an operation with a composite tool name of the form
//! `<category>_<operation>`. Only the first underscore separates the two
//! parts, so operation names may contain underscores while category names
//! may not. See [`ToolName`].
//!
//! Operations produce interpreter source text. Producers that interpolate
//! caller input must route every value through [`applescript::quoted`] (or
//! [`applescript::escape`]) so literal escaping lives in one place.

pub mod applescript;
mod category;
mod error;
mod operation;
mod registry;
mod tool_name;

pub use category::Category;
pub use error::{ProduceError, ResolveError};
pub use operation::{InputShape, Operation, Producer};
pub use registry::{Registry, RegistryBuilder, Resolved, ToolDescriptor};
pub use tool_name::ToolName;
