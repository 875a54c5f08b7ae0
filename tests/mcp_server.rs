mod common;
use common::{app_with, MockTransport, VERSION_OK};

use amq_jolokia::mcp::server::McpServer;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

fn server_with(transport: Arc<MockTransport>) -> McpServer {
    McpServer::from_app(Arc::new(app_with(transport)))
}

async fn call(server: &McpServer, line: Value) -> Value {
    let response = server
        .handle_line(&line.to_string())
        .await
        .expect("request with id must be answered");
    serde_json::to_value(&response).expect("serialize")
}

fn content_text(response: &Value) -> String {
    response["result"]["content"][0]["text"]
        .as_str()
        .expect("text content")
        .to_string()
}

#[tokio::test]
async fn initialize_reports_server_info() {
    let server = server_with(Arc::new(MockTransport::new()));
    let response = call(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
    )
    .await;
    assert_eq!(response["result"]["serverInfo"]["name"], "amq-jolokia-server");
    assert!(response["result"]["protocolVersion"].is_string());
}

#[tokio::test]
async fn tools_list_exposes_exactly_the_broker_tools() {
    let server = server_with(Arc::new(MockTransport::new()));
    let response = call(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
    )
    .await;
    let names: HashSet<&str> = response["result"]["tools"]
        .as_array()
        .expect("tools")
        .iter()
        .filter_map(|tool| tool["name"].as_str())
        .collect();
    assert_eq!(
        names,
        HashSet::from(["login", "logout", "get_version", "browse_queue"])
    );
}

#[tokio::test]
async fn browse_without_queue_name_is_invalid_params() {
    let transport = Arc::new(MockTransport::new());
    let server = server_with(transport.clone());
    let response = call(
        &server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "browse_queue", "arguments": {"routing_type": "anycast"}}
        }),
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("queue_name"));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn unknown_tool_is_method_not_found() {
    let server = server_with(Arc::new(MockTransport::new()));
    let response = call(
        &server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {"name": "send_message", "arguments": {}}
        }),
    )
    .await;
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn tool_calls_return_text_content() {
    let transport = Arc::new(
        MockTransport::new()
            .route("/read/", 200, VERSION_OK)
            .route("/exec/", 200, r#"{"status":200,"value":[{"id":1}]}"#),
    );
    let server = server_with(transport);

    let login = call(
        &server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": {"name": "login", "arguments": {"username": "admin", "password": "admin"}}
        }),
    )
    .await;
    assert_eq!(content_text(&login), "Successfully authenticated as user: admin");

    let version = call(
        &server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": {"name": "get_version", "arguments": {"trace_id": "t-1"}}
        }),
    )
    .await;
    assert_eq!(content_text(&version), "AMQ Broker Version: 2.31.0");
    let meta = &version["result"]["_meta"];
    assert_eq!(meta["tool"], "get_version");
    assert_eq!(meta["trace_id"], "t-1");
    assert!(meta["span_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(meta["duration_ms"].is_i64());

    let browse = call(
        &server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {"name": "browse_queue", "arguments": {"queue_name": "orders"}}
        }),
    )
    .await;
    let parsed: Value = serde_json::from_str(&content_text(&browse)).expect("json text");
    assert_eq!(parsed["routing_type"], "anycast");
    assert_eq!(parsed["message_count"], 1);

    let logout = call(
        &server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "tools/call",
            "params": {"name": "logout"}
        }),
    )
    .await;
    assert_eq!(content_text(&logout), "Successfully logged out user: admin");
}

#[tokio::test]
async fn serve_answers_requests_and_skips_notifications() {
    let server = server_with(Arc::new(MockTransport::new()));
    let input = concat!(
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "\n",
        "this is not json\n",
        r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"get_version"}}"#,
        "\n",
    );
    let mut output = Vec::new();
    server
        .serve(input.as_bytes(), &mut output)
        .await
        .expect("serve");

    let lines: Vec<Value> = String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["error"]["code"], -32700);
    assert_eq!(lines[1]["id"], 9);
    assert_eq!(
        content_text(&lines[1]),
        "Error: Not authenticated - Please login first using the login tool"
    );
}
