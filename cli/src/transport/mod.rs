//! Client-facing handlers: the two serve transports and the connect gateway.
//!
//! The MCP wire protocol itself is served by the tool-server layer; these
//! handlers own the listening socket, the management API, and their lifetime.

pub mod gateway;
pub mod http;
pub mod stdio;

pub use gateway::ConnectGateway;
pub use http::HttpTransport;
pub use stdio::StdioTransport;
