//! `strato mcp` — serve Strato tools to agents over stdio.
//!
//! stdout carries the protocol; all logging goes to stderr and the debug
//! log file.

use std::sync::Arc;

use strato_mcp::{default_registry, McpServer, StdioTransport, ToolContext};
use tracing::{info, warn};

use super::CommandContext;

pub async fn execute(ctx: &CommandContext) -> anyhow::Result<()> {
    ignore_sigpipe();

    let client = ctx.client()?;
    let authenticated = client.is_authenticated();
    if !authenticated {
        warn!("no API token configured; tools that need one will report an error");
    }
    let project = ctx.project()?;
    info!(project = ?project, authenticated, "starting MCP server");

    let tool_ctx = ToolContext::new(Arc::new(client), project, authenticated);
    let server = McpServer::new(default_registry(), tool_ctx);
    server.run(&mut StdioTransport::stdio()).await?;
    Ok(())
}

/// Let writes to a closed stdout fail with EPIPE instead of killing the process.
#[cfg(unix)]
fn ignore_sigpipe() {
    // SAFETY: only changes this process's SIGPIPE disposition.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_IGN);
    }
}

#[cfg(not(unix))]
fn ignore_sigpipe() {}
