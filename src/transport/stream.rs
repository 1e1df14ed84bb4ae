// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The stream loop: reads framed requests, runs them through a
//! `RequestPipeline`, and writes framed responses, until the reader is
//! closed or a framing/I/O error occurs.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::config::FramingConfig;
use crate::error::EngineResult;
use crate::logging::Logger;
use crate::protocol::jsonrpc::pipeline::RequestPipeline;

use super::framing::{read_frame, write_frame};

const SOURCE: &str = "transport::stream";

/// Drives `pipeline` over a framed reader/writer pair until the reader
/// reaches a clean EOF.
///
/// Errors raised inside the pipeline never terminate the loop: JSON-RPC
/// already turns them into error responses. Only a framing or I/O error from
/// the reader or writer terminates the loop and propagates to the caller.
pub async fn run_stream<R, W>(
    reader: &mut R,
    writer: &mut W,
    pipeline: &RequestPipeline,
    config: &FramingConfig,
    logger: Option<Arc<dyn Logger>>,
) -> EngineResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if let Some(logger) = &logger {
        logger.start(SOURCE);
    }

    loop {
        let frame = match read_frame(reader, config).await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                if let Some(logger) = &logger {
                    logger.stop(SOURCE);
                }
                return Ok(());
            }
            Err(e) => {
                if let Some(logger) = &logger {
                    logger.stop(SOURCE);
                }
                return Err(e);
            }
        };

        if let Some(logger) = &logger {
            logger.log(SOURCE, "frame-start", &format!("{} bytes", frame.len()));
        }

        let response = pipeline.run_request(&frame).await;

        if !response.is_empty() {
            write_frame(writer, config, &response).await?;
        }

        if let Some(logger) = &logger {
            logger.log(SOURCE, "frame-success", &format!("{} response bytes", response.len()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FramingMode;
    use crate::protocol::jsonrpc::dispatch::{RequestDispatcher, RpcDispatcher};
    use serde_json::json;
    use std::io::Cursor;
    use tokio::io::BufReader;

    async fn echo(message: String) -> String {
        message
    }

    fn pipeline_with_echo() -> RequestPipeline {
        let mut registry = RpcDispatcher::new();
        registry.add("echo", echo).unwrap();
        RequestPipeline::new(RequestDispatcher::Registry(registry))
    }

    fn delimiter_config() -> FramingConfig {
        FramingConfig {
            mode: FramingMode::Delimiter,
            delimiter_byte: b'\n',
            max_frame_bytes: 4096,
        }
    }

    #[tokio::test]
    async fn processes_two_requests_then_stops_cleanly() {
        let pipeline = pipeline_with_echo();
        let config = delimiter_config();

        let request1 = json!({"jsonrpc": "2.0", "method": "echo", "params": ["hi"], "id": 1}).to_string();
        let request2 = json!({"jsonrpc": "2.0", "method": "echo", "params": ["bye"], "id": 2}).to_string();
        let input = format!("{request1}\n{request2}\n");

        let mut reader = BufReader::new(Cursor::new(input.into_bytes()));
        let mut output = Vec::new();

        run_stream(&mut reader, &mut output, &pipeline, &config, None)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["result"], "hi");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["result"], "bye");
    }

    #[tokio::test]
    async fn notification_produces_no_output_frame() {
        let pipeline = pipeline_with_echo();
        let config = delimiter_config();

        let notification = json!({"jsonrpc": "2.0", "method": "echo", "params": ["hi"]}).to_string();
        let input = format!("{notification}\n");

        let mut reader = BufReader::new(Cursor::new(input.into_bytes()));
        let mut output = Vec::new();

        run_stream(&mut reader, &mut output, &pipeline, &config, None)
            .await
            .unwrap();

        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn oversize_frame_terminates_the_loop_with_an_error() {
        let pipeline = pipeline_with_echo();
        let config = FramingConfig {
            mode: FramingMode::Delimiter,
            delimiter_byte: b'\n',
            max_frame_bytes: 4,
        };

        let input = b"{\"jsonrpc\":\"2.0\"}\n".to_vec();
        let mut reader = BufReader::new(Cursor::new(input));
        let mut output = Vec::new();

        let result = run_stream(&mut reader, &mut output, &pipeline, &config, None).await;
        assert!(result.is_err());
    }
}
