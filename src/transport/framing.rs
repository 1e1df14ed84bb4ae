// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The stream frame codec: splits a byte stream into discrete JSON-RPC
//! messages, in either delimiter or `Content-Length` framing mode.

use std::collections::HashMap;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::{FramingConfig, FramingMode};
use crate::error::protocol::ProtocolError;
use crate::error::EngineResult;

/// Reads one frame from `reader` according to `config`'s framing mode.
///
/// Returns `Ok(None)` on a clean end-of-stream before any bytes of a new
/// frame were read. Returns `Err` for malformed headers, a missing
/// `Content-Length`, an oversize frame, or EOF in the middle of a frame.
pub async fn read_frame<R>(reader: &mut R, config: &FramingConfig) -> EngineResult<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    match config.mode {
        FramingMode::Delimiter => read_delimited_frame(reader, config).await,
        FramingMode::ContentLength => read_content_length_frame(reader, config).await,
    }
}

/// Writes one frame to `writer` according to `config`'s framing mode.
pub async fn write_frame<W>(writer: &mut W, config: &FramingConfig, body: &[u8]) -> EngineResult<()>
where
    W: AsyncWrite + Unpin,
{
    match config.mode {
        FramingMode::Delimiter => write_delimited_frame(writer, config, body).await,
        FramingMode::ContentLength => write_content_length_frame(writer, body).await,
    }
}

async fn read_delimited_frame<R>(
    reader: &mut R,
    config: &FramingConfig,
) -> EngineResult<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let mut buf = Vec::new();
        let n = reader.read_until(config.delimiter_byte, &mut buf).await?;
        if n == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&config.delimiter_byte) {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }

        if buf.is_empty() {
            // Two consecutive delimiters: skip and keep reading.
            continue;
        }

        if buf.len() > config.max_frame_bytes {
            return Err(ProtocolError::MessageTooLarge {
                size: buf.len(),
                max_size: config.max_frame_bytes,
            }
            .into());
        }

        return Ok(Some(buf));
    }
}

async fn write_delimited_frame<W>(
    writer: &mut W,
    config: &FramingConfig,
    body: &[u8],
) -> EngineResult<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(body).await?;
    writer.write_all(&[config.delimiter_byte]).await?;
    writer.flush().await?;
    Ok(())
}

async fn read_content_length_frame<R>(
    reader: &mut R,
    config: &FramingConfig,
) -> EngineResult<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers: HashMap<String, String> = HashMap::new();
    let mut last_key: Option<String> = None;
    let mut line = String::new();
    let mut any_bytes_read = false;

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            if any_bytes_read {
                return Err(ProtocolError::UnexpectedEof.into());
            }
            return Ok(None);
        }
        any_bytes_read = true;

        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }

        if trimmed.starts_with(' ') || trimmed.starts_with('\t') {
            if let Some(key) = &last_key {
                if let Some(existing) = headers.get_mut(key) {
                    existing.push(' ');
                    existing.push_str(trimmed.trim());
                }
            }
            continue;
        }

        let mut parts = trimmed.splitn(2, ':');
        let key = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(ProtocolError::InvalidHeader(format!("malformed header line: {trimmed}")).into());
        }
        let value = parts.next().unwrap_or_default().trim().to_string();
        headers.insert(key.clone(), value);
        last_key = Some(key);
    }

    let raw_length = headers
        .get("content-length")
        .ok_or(ProtocolError::MissingContentLength)?;
    let content_length: usize = raw_length
        .parse()
        .map_err(|_| ProtocolError::InvalidHeader(format!("invalid Content-Length: {raw_length}")))?;

    if content_length > config.max_frame_bytes {
        return Err(ProtocolError::MessageTooLarge {
            size: content_length,
            max_size: config.max_frame_bytes,
        }
        .into());
    }

    let mut body = vec![0u8; content_length];
    if let Err(e) = reader.read_exact(&mut body).await {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return Err(ProtocolError::UnexpectedEof.into());
        }
        return Err(e.into());
    }

    Ok(Some(body))
}

async fn write_content_length_frame<W>(writer: &mut W, body: &[u8]) -> EngineResult<()>
where
    W: AsyncWrite + Unpin,
{
    let header = format!("Content-Length: {}\r\n\r\n", body.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;
    Ok(())
}
