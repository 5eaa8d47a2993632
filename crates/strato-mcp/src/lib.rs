//! # strato-mcp
//!
//! Model Context Protocol tools for the Strato management API.
//!
//! Agents connect over stdio, list the available tools and call them with
//! JSON arguments validated against each tool's schema. Tools that need a
//! project or credentials report a readable error result when the server
//! was started without them.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strato_core::{StratoClient, StratoConfig};
//! use strato_mcp::{default_registry, McpServer, StdioTransport, ToolContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StratoConfig::load()?;
//!     let client = StratoClient::from_config(&config)?;
//!     let authenticated = client.is_authenticated();
//!     let ctx = ToolContext::new(Arc::new(client), Some("demo-app".into()), authenticated);
//!
//!     let server = McpServer::new(default_registry(), ctx);
//!     server.run(&mut StdioTransport::stdio()).await?;
//!     Ok(())
//! }
//! ```

pub mod content;
pub mod error;
pub mod jsonrpc;
pub mod registry;
pub mod server;
pub mod tool;
pub mod tools;
pub mod transport;

pub use content::{ToolContent, ToolResult};
pub use error::{McpError, McpResult};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use registry::{ToolRegistry, NOT_AUTHENTICATED_MESSAGE, NO_PROJECT_MESSAGE};
pub use server::{McpServer, PROTOCOL_VERSION};
pub use tool::{Tool, ToolAnnotations, ToolContext, ToolDefinition, ToolRequirements};
pub use tools::default_registry;
pub use transport::StdioTransport;
