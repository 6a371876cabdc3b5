//! Tool dispatch.
//!
//! A `tools/call` request names a tool and carries optional arguments. The
//! [`Dispatcher`] resolves the name against the registry, produces the
//! script, hands it to the executor and wraps the result in a
//! [`ToolOutcome`]. Output of the outline listing tool is reshaped into a
//! JSON tree on the way out.

mod dispatcher;
mod errors;
mod outcome;

pub use dispatcher::Dispatcher;
pub use errors::DispatchError;
pub use outcome::{ContentBlock, ToolOutcome};
