//! Line-delimited JSON-RPC transport.
//!
//! One JSON message per line. Production uses stdin/stdout; tests drive the
//! same code over in-memory buffers.

use crate::error::{McpError, ProtocolError, Result};
use crate::protocol::types::{JsonRpcRequest, JsonRpcResponse, Message};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;
use tracing::{debug, error, trace};

/// Transport trait for MCP communication.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Reads the next message. `Ok(None)` means end of input.
    async fn read_message(&self) -> Result<Option<Message>>;
    async fn write_response(&self, response: &JsonRpcResponse) -> Result<()>;
}

/// Transport over any buffered reader and writer.
pub struct LineTransport<R, W> {
    reader: Mutex<R>,
    writer: Mutex<W>,
}

/// Stdio-based transport for MCP.
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the transport, returning the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }

    /// Reads the next non-blank line.
    async fn read_line(&self) -> Result<Option<String>> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    trace!("Received line: {}", trimmed);
                    return Ok(Some(trimmed.to_string()));
                }
                Err(e) => {
                    error!("Error reading input: {}", e);
                    return Err(McpError::Io(e));
                }
            }
        }
    }

    async fn write_line(&self, content: &str) -> Result<()> {
        let mut writer = self.writer.lock().await;
        trace!("Sending line: {}", content);
        writer.write_all(content.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read_message(&self) -> Result<Option<Message>> {
        let Some(line) = self.read_line().await? else {
            return Ok(None);
        };

        match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(request) => {
                debug!("Received request: method={}", request.method);
                Ok(Some(Message::Request(request)))
            }
            Err(_) => match serde_json::from_str::<JsonRpcResponse>(&line) {
                Ok(response) => {
                    debug!("Received response: id={:?}", response.id);
                    Ok(Some(Message::Response(response)))
                }
                Err(e) => {
                    error!("Failed to parse message: {}", e);
                    Err(McpError::Protocol(ProtocolError::ParseError))
                }
            },
        }
    }

    async fn write_response(&self, response: &JsonRpcResponse) -> Result<()> {
        let json = serde_json::to_string(response)?;
        debug!("Sending response: id={:?}", response.id);
        self.write_line(&json).await
    }
}
