//! Line-delimited JSON over a byte stream.
//!
//! Each JSON-RPC message is one line terminated by `\n`. The server uses
//! stdin/stdout; tests use in-memory buffers.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;

use crate::error::McpResult;

/// Reads requests from `R` and writes responses to `W`.
pub struct StdioTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl StdioTransport<tokio::io::Stdin, tokio::io::Stdout> {
    /// Transport bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Next line with surrounding whitespace removed. `None` on EOF.
    ///
    /// A line that is not UTF-8 fails with
    /// [`InvalidUtf8`](crate::error::McpError::InvalidUtf8); the
    /// stream stays positioned at the following line.
    pub async fn read_line(&mut self) -> McpResult<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8(buf)?;
        let trimmed = line.trim();
        trace!(len = trimmed.len(), "read message");
        Ok(Some(trimmed.to_string()))
    }

    /// Write one message followed by a newline and flush.
    pub async fn write_line(&mut self, message: &str) -> McpResult<()> {
        trace!(len = message.len(), "writing message");
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Give back the writer, e.g. to inspect buffered output.
    pub fn into_writer(self) -> W {
        self.writer
    }
}
