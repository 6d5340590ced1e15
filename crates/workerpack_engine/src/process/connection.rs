use anyhow::Context;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::io::Lines;

use super::protocol::Request;
use super::protocol::Response;

/// Writes requests to the engine host
pub struct RequestWriter<W> {
  writer: W,
}

impl<W: AsyncWrite + Unpin> RequestWriter<W> {
  pub fn new(writer: W) -> Self {
    Self { writer }
  }

  pub async fn send(&mut self, request: &Request) -> anyhow::Result<()> {
    let mut line = serde_json::to_vec(request)?;
    line.push(b'\n');

    tracing::debug!(request = %String::from_utf8_lossy(&line).trim_end(), "Sending to engine host");

    self
      .writer
      .write_all(&line)
      .await
      .context("Failed to write to the engine host")?;
    self.writer.flush().await?;

    Ok(())
  }
}

/// Reads responses from the engine host
pub struct ResponseReader<R> {
  lines: Lines<BufReader<R>>,
}

impl<R: tokio::io::AsyncRead + Unpin> ResponseReader<R> {
  pub fn new(reader: R) -> Self {
    Self {
      lines: BufReader::new(reader).lines(),
    }
  }

  /// The next response, or `None` once the host closed its output
  pub async fn next(&mut self) -> anyhow::Result<Option<Response>> {
    loop {
      let Some(line) = self
        .lines
        .next_line()
        .await
        .context("Failed to read from the engine host")?
      else {
        return Ok(None);
      };

      if line.trim().is_empty() {
        continue;
      }

      tracing::debug!(response = %line, "Received from engine host");

      let response = serde_json::from_str(&line)
        .with_context(|| format!("Malformed message from the engine host: {line}"))?;

      return Ok(Some(response));
    }
  }

  /// Like `next`, treating a closed output as a failure
  pub async fn expect(&mut self, waiting_for: &str) -> anyhow::Result<Response> {
    self
      .next()
      .await?
      .ok_or_else(|| anyhow::anyhow!("The engine host exited while waiting for {waiting_for}"))
  }
}
