//! Test suites for the MCP server.

mod dispatch_behaviour;
mod lifecycle;
mod protocol_handling;
pub(crate) mod support;
