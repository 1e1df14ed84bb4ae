// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! End-to-end coverage of the stream loop over `Content-Length` framing:
//! a client writes two LSP-style framed requests, the loop dispatches each
//! through a pipeline, and the client reads back two framed responses.

use std::io::Cursor;

use tokio::io::BufReader;

use mauka_rpc::config::{FramingConfig, FramingMode};
use mauka_rpc::protocol::jsonrpc::dispatch::{RequestDispatcher, RpcDispatcher};
use mauka_rpc::protocol::jsonrpc::pipeline::RequestPipeline;
use mauka_rpc::transport::{read_frame, run_stream};

fn content_length_config() -> FramingConfig {
    FramingConfig {
        mode: FramingMode::ContentLength,
        ..FramingConfig::default()
    }
}

fn frame(body: &str) -> Vec<u8> {
    format!("Content-Length: {}\r\n\r\n{}", body.len(), body).into_bytes()
}

async fn add(a: i64, b: i64) -> i64 {
    a + b
}

#[tokio::test]
async fn two_requests_round_trip_over_content_length_framing() {
    let mut registry = RpcDispatcher::new();
    registry.add("add", add).unwrap();
    let pipeline = RequestPipeline::new(RequestDispatcher::Registry(registry));
    let config = content_length_config();

    let mut input = Vec::new();
    input.extend(frame(r#"{"jsonrpc":"2.0","method":"add","params":[1,2],"id":1}"#));
    input.extend(frame(r#"{"jsonrpc":"2.0","method":"add","params":[10,20],"id":2}"#));

    let mut reader = BufReader::new(Cursor::new(input));
    let mut output = Vec::new();

    run_stream(&mut reader, &mut output, &pipeline, &config, None)
        .await
        .expect("clean eof");

    let mut output_reader = BufReader::new(Cursor::new(output));
    let first = read_frame(&mut output_reader, &config)
        .await
        .unwrap()
        .expect("first response frame");
    let second = read_frame(&mut output_reader, &config)
        .await
        .unwrap()
        .expect("second response frame");
    assert!(read_frame(&mut output_reader, &config).await.unwrap().is_none());

    let first: serde_json::Value = serde_json::from_slice(&first).unwrap();
    let second: serde_json::Value = serde_json::from_slice(&second).unwrap();
    assert_eq!(first["id"], serde_json::json!(1));
    assert_eq!(first["result"], serde_json::json!(3));
    assert_eq!(second["id"], serde_json::json!(2));
    assert_eq!(second["result"], serde_json::json!(30));
}

#[tokio::test]
async fn notification_in_stream_produces_no_output_frame() {
    let mut registry = RpcDispatcher::new();
    registry.add("add", add).unwrap();
    let pipeline = RequestPipeline::new(RequestDispatcher::Registry(registry));
    let config = content_length_config();

    let mut input = Vec::new();
    input.extend(frame(r#"{"jsonrpc":"2.0","method":"add","params":[1,2]}"#));
    input.extend(frame(r#"{"jsonrpc":"2.0","method":"add","params":[4,5],"id":7}"#));

    let mut reader = BufReader::new(Cursor::new(input));
    let mut output = Vec::new();

    run_stream(&mut reader, &mut output, &pipeline, &config, None)
        .await
        .expect("clean eof");

    let mut output_reader = BufReader::new(Cursor::new(output));
    let only = read_frame(&mut output_reader, &config)
        .await
        .unwrap()
        .expect("single response frame for the addressable request");
    assert!(read_frame(&mut output_reader, &config).await.unwrap().is_none());

    let only: serde_json::Value = serde_json::from_slice(&only).unwrap();
    assert_eq!(only["id"], serde_json::json!(7));
    assert_eq!(only["result"], serde_json::json!(9));
}
