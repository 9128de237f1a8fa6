//! MCP server integration tests.
//!
//! These tests spawn the `image-mcp-gemini` and `image-mcp-canvas` binaries and
//! talk JSON-RPC 2.0 over stdin/stdout: handshake, tool listing, tool calls and
//! error framing.

#![cfg(all(feature = "gemini", feature = "canvas"))]

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use serde_json::{json, Value};

const GEMINI_BIN: &str = env!("CARGO_BIN_EXE_image-mcp-gemini");
const CANVAS_BIN: &str = env!("CARGO_BIN_EXE_image-mcp-canvas");

/// A lightweight MCP client driving one server subprocess.
struct McpClient {
    child: std::process::Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    next_id: u64,
}

impl McpClient {
    fn spawn(binary: &str) -> Self {
        let mut command = Command::new(binary);
        command
            .env("RUST_LOG", "warn")
            // Never reach the real service from tests
            .env("GEMINI_BASE_URL", "http://127.0.0.1:9")
            .env_remove("GEMINI_API_KEY");
        Self::spawn_command(command)
    }

    fn spawn_command(mut command: Command) -> Self {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn server");

        let stdin = child.stdin.take().expect("no stdin");
        let stdout = child.stdout.take().expect("no stdout");
        let reader = BufReader::new(stdout);

        McpClient { child, stdin, reader, next_id: 1 }
    }

    fn send(&mut self, msg: &Value) {
        let line = serde_json::to_string(msg).unwrap();
        writeln!(self.stdin, "{}", line).expect("write to stdin failed");
        self.stdin.flush().expect("flush stdin failed");
    }

    /// Send a JSON-RPC request and return the parsed response.
    fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        self.send(&json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}));

        let mut buf = String::new();
        self.reader.read_line(&mut buf).expect("read from stdout failed");
        serde_json::from_str(&buf)
            .unwrap_or_else(|e| panic!("failed to parse response JSON: {}\nraw: {}", e, buf))
    }

    /// Handshake: initialize, then the initialized notification.
    fn initialize(&mut self) -> Value {
        let resp = self.request(
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "0.1.0"}
            }),
        );
        self.send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));

        // Let the server process the notification
        std::thread::sleep(Duration::from_millis(50));
        resp
    }

    fn list_tools(&mut self) -> Value {
        self.request("tools/list", json!({}))
    }

    fn call_tool(&mut self, name: &str, args: Value) -> Value {
        self.request("tools/call", json!({"name": name, "arguments": args}))
    }

    /// Closing stdin ends the session and the process.
    fn shutdown(mut self) {
        drop(self.stdin);
        let _ = self.child.wait();
    }
}

fn tool_names(resp: &Value) -> Vec<String> {
    resp["result"]["tools"]
        .as_array()
        .expect("tools should be an array")
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

/// The single text block of a tool result, plus its error flag.
fn tool_text(resp: &Value) -> (bool, String) {
    let result = resp.get("result").expect("tool call should return result");
    let content = result["content"].as_array().expect("content should be array");
    assert_eq!(content.len(), 1, "expected exactly one content block: {}", result);
    assert_eq!(content[0]["type"].as_str().unwrap(), "text");
    let is_error = result["isError"].as_bool().unwrap_or(false);
    (is_error, content[0]["text"].as_str().unwrap().to_string())
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ── Handshake ─────────────────────────────────────────────────────────

#[test]
fn test_gemini_initialize_handshake() {
    let mut client = McpClient::spawn(GEMINI_BIN);
    let resp = client.initialize();
    let result = resp.get("result").expect("initialize should return result");

    assert_eq!(result["protocolVersion"].as_str().unwrap(), "2024-11-05");
    assert_eq!(result["serverInfo"]["name"].as_str().unwrap(), "image-mcp-gemini");
    assert!(result["serverInfo"]["version"].as_str().is_some());
    assert!(result["capabilities"].get("tools").is_some());

    client.shutdown();
}

#[test]
fn test_canvas_initialize_handshake() {
    let mut client = McpClient::spawn(CANVAS_BIN);
    let resp = client.initialize();
    let result = resp.get("result").expect("initialize should return result");

    assert_eq!(result["serverInfo"]["name"].as_str().unwrap(), "image-mcp-canvas");
    assert!(result["instructions"].as_str().is_some());

    client.shutdown();
}

// ── Tool Listing ──────────────────────────────────────────────────────

#[test]
fn test_gemini_tools_list() {
    let mut client = McpClient::spawn(GEMINI_BIN);
    client.initialize();

    let resp = client.list_tools();
    assert_eq!(tool_names(&resp), vec!["generate_image", "edit_image", "composite_images"]);

    for tool in resp["result"]["tools"].as_array().unwrap() {
        let name = tool["name"].as_str().unwrap();
        assert!(tool["description"].as_str().is_some(), "tool {} missing description", name);
        assert_eq!(tool["inputSchema"]["type"].as_str().unwrap(), "object", "tool {}", name);
    }

    client.shutdown();
}

#[test]
fn test_canvas_tools_list_is_stable() {
    let mut client = McpClient::spawn(CANVAS_BIN);
    client.initialize();

    let first = client.list_tools();
    let second = client.list_tools();
    assert_eq!(
        tool_names(&first),
        vec![
            "create_image",
            "draw_text",
            "draw_rectangle",
            "resize_image",
            "apply_filter",
            "composite_images"
        ]
    );
    assert_eq!(first["result"], second["result"]);

    let required = &first["result"]["tools"][0]["inputSchema"]["required"];
    let required: Vec<&str> =
        required.as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
    assert!(required.contains(&"width"));
    assert!(required.contains(&"outputPath"));
    assert!(!required.contains(&"backgroundColor"));

    client.shutdown();
}

// ── Tool Calls ────────────────────────────────────────────────────────

#[test]
fn test_unknown_tool_is_error_result() {
    for binary in [GEMINI_BIN, CANVAS_BIN] {
        let mut client = McpClient::spawn(binary);
        client.initialize();

        let resp = client.call_tool("x", json!({}));
        assert!(resp.get("error").is_none(), "should not be a protocol error: {}", resp);
        let (is_error, text) = tool_text(&resp);
        assert!(is_error);
        assert_eq!(text, "Unknown tool: x");

        client.shutdown();
    }
}

#[test]
fn test_generate_without_key() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.png");
    let mut client = McpClient::spawn(GEMINI_BIN);
    client.initialize();

    let resp = client.call_tool(
        "generate_image",
        json!({"prompt": "a red circle", "outputPath": path_arg(&output)}),
    );
    let (is_error, text) = tool_text(&resp);
    assert!(is_error);
    assert!(text.starts_with("Error: "), "{}", text);
    assert!(text.contains("GEMINI_API_KEY"), "{}", text);
    assert!(!output.exists());

    client.shutdown();
}

#[test]
fn test_resize_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = McpClient::spawn(CANVAS_BIN);
    client.initialize();

    let resp = client.call_tool(
        "resize_image",
        json!({
            "inputPath": path_arg(&dir.path().join("missing.png")),
            "outputPath": path_arg(&dir.path().join("out.png")),
            "width": 10
        }),
    );
    let (is_error, text) = tool_text(&resp);
    assert!(is_error);
    assert!(text.contains("missing.png"), "{}", text);

    client.shutdown();
}

#[test]
fn test_create_then_process() {
    let dir = tempfile::tempdir().unwrap();
    let canvas = dir.path().join("canvas.png");
    let boxed = dir.path().join("boxed.png");
    let small = dir.path().join("small/boxed.jpg");
    let mut client = McpClient::spawn(CANVAS_BIN);
    client.initialize();

    let (is_error, text) = tool_text(&client.call_tool(
        "create_image",
        json!({"width": 64, "height": 32, "backgroundColor": "#336699", "outputPath": path_arg(&canvas)}),
    ));
    assert!(!is_error, "{}", text);
    assert_eq!(text, format!("Created 64x32 png image at {}", canvas.display()));

    let (is_error, text) = tool_text(&client.call_tool(
        "draw_rectangle",
        json!({
            "inputPath": path_arg(&canvas),
            "outputPath": path_arg(&boxed),
            "x": 4, "y": 4, "width": 10, "height": 10,
            "strokeColor": "white", "lineWidth": 2
        }),
    ));
    assert!(!is_error, "{}", text);

    let (is_error, text) = tool_text(&client.call_tool(
        "resize_image",
        json!({"inputPath": path_arg(&boxed), "outputPath": path_arg(&small), "width": 16}),
    ));
    assert!(!is_error, "{}", text);
    assert!(text.starts_with("Resized image to 16x8"), "{}", text);
    assert!(small.exists());

    client.shutdown();
}

#[test]
fn test_invalid_arguments_are_tool_errors() {
    let mut client = McpClient::spawn(CANVAS_BIN);
    client.initialize();

    let resp = client.call_tool("create_image", json!({"width": 10}));
    let (is_error, text) = tool_text(&resp);
    assert!(is_error);
    assert!(text.starts_with("Error: Invalid arguments for create_image"), "{}", text);

    client.shutdown();
}

#[test]
fn test_help_and_version_flags() {
    for binary in [GEMINI_BIN, CANVAS_BIN] {
        let output = Command::new(binary).arg("--version").output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "{}", stdout);

        let output = Command::new(binary).arg("--bogus").output().unwrap();
        assert!(!output.status.success());
    }
}
