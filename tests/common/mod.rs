//! Shared test utilities for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use a2a_invoke::builders::AgentCardBuilder;
use a2a_invoke::error::{A2AError, A2AResult};
use a2a_invoke::invoke::{AgentClient, ClientFactory, EventCallback, ManualClock};
use a2a_invoke::types::{AgentCard, ClientEvent, Message, Task, TaskState};
use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

// ============================================================================
// Scripted in-process agent client
// ============================================================================

/// How the scripted client answers `send_message` on the event callback.
pub enum FirstEvent {
    /// Invoke the callback before `send_message` returns.
    Immediately(A2AResult<ClientEvent>),
    /// Invoke the callback from a spawned task after a delay.
    After(Duration, A2AResult<ClientEvent>),
    /// Invoke the callback once per entry, in order, before returning.
    Burst(Vec<A2AResult<ClientEvent>>),
    /// Keep the callback and never call it.
    Never,
    /// Drop the callback without calling it.
    DropCallback,
}

/// Behavior of one scripted client.
pub struct Script {
    pub first: FirstEvent,
    pub send_error: Option<A2AError>,
    /// States returned by successive `get_task` calls; the last one repeats.
    pub polls: Vec<TaskState>,
    pub poll_error: Option<A2AError>,
    /// Virtual time each `get_task` call takes.
    pub poll_latency: Duration,
    /// Advance this clock by the given amount right before a delayed first
    /// event is delivered.
    pub advance_before_event: Option<(Arc<ManualClock>, Duration)>,
    pub close_error: Option<A2AError>,
}

impl Script {
    pub fn new(first: FirstEvent) -> Self {
        Self {
            first,
            send_error: None,
            polls: Vec::new(),
            poll_error: None,
            poll_latency: Duration::ZERO,
            advance_before_event: None,
            close_error: None,
        }
    }

    pub fn polls(mut self, states: &[TaskState]) -> Self {
        self.polls = states.to_vec();
        self
    }
}

/// Counters shared between a factory, its clients and the test.
#[derive(Default)]
pub struct Calls {
    pub opens: AtomicUsize,
    pub sends: AtomicUsize,
    pub polls: AtomicUsize,
    pub closes: AtomicUsize,
    pub sent: Mutex<Vec<Message>>,
}

impl Calls {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn last_sent(&self) -> Message {
        self.sent.lock().unwrap().last().cloned().expect("no message sent")
    }
}

pub struct ScriptedClient {
    on_event: Mutex<Option<EventCallback>>,
    first: Mutex<Option<FirstEvent>>,
    send_error: Option<A2AError>,
    polls: Mutex<VecDeque<TaskState>>,
    last_poll: Mutex<TaskState>,
    poll_error: Option<A2AError>,
    poll_latency: Duration,
    advance_before_event: Option<(Arc<ManualClock>, Duration)>,
    close_error: Option<A2AError>,
    calls: Arc<Calls>,
}

#[async_trait]
impl AgentClient for ScriptedClient {
    async fn send_message(&self, message: Message) -> A2AResult<()> {
        self.calls.sends.fetch_add(1, Ordering::SeqCst);
        self.calls.sent.lock().unwrap().push(message);
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }

        let first = self.first.lock().unwrap().take();
        match first {
            Some(FirstEvent::Immediately(event)) => self.emit(event),
            Some(FirstEvent::Burst(events)) => {
                for event in events {
                    self.emit(event);
                }
            }
            Some(FirstEvent::After(delay, event)) => {
                let callback = self.on_event.lock().unwrap().clone();
                let advance = self.advance_before_event.clone();
                if let Some(callback) = callback {
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        if let Some((clock, by)) = advance {
                            clock.advance(by);
                        }
                        callback(event);
                    });
                }
            }
            Some(FirstEvent::DropCallback) => {
                self.on_event.lock().unwrap().take();
            }
            Some(FirstEvent::Never) | None => {}
        }
        Ok(())
    }

    async fn get_task(&self, task_id: &str) -> A2AResult<Task> {
        self.calls.polls.fetch_add(1, Ordering::SeqCst);
        if !self.poll_latency.is_zero() {
            tokio::time::sleep(self.poll_latency).await;
        }
        if let Some(err) = &self.poll_error {
            return Err(err.clone());
        }
        let mut last = self.last_poll.lock().unwrap();
        if let Some(next) = self.polls.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(Task::new(task_id, "ctx-1", *last))
    }

    async fn close(&self) -> A2AResult<()> {
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
        match &self.close_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl ScriptedClient {
    fn emit(&self, event: A2AResult<ClientEvent>) {
        let callback = self.on_event.lock().unwrap().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }
}

/// Factory handing out one scripted client.
pub struct ScriptedFactory {
    script: Mutex<Option<Script>>,
    open_error: Option<A2AError>,
    pub calls: Arc<Calls>,
}

impl ScriptedFactory {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Some(script)),
            open_error: None,
            calls: Arc::new(Calls::default()),
        })
    }

    pub fn failing_open(err: A2AError) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(None),
            open_error: Some(err),
            calls: Arc::new(Calls::default()),
        })
    }
}

impl ClientFactory for ScriptedFactory {
    fn open(&self, _target: &AgentCard, on_event: EventCallback) -> A2AResult<Box<dyn AgentClient>> {
        self.calls.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.open_error {
            return Err(err.clone());
        }
        let script = self
            .script
            .lock()
            .unwrap()
            .take()
            .expect("scripted factory opened twice");
        Ok(Box::new(ScriptedClient {
            on_event: Mutex::new(Some(on_event)),
            first: Mutex::new(Some(script.first)),
            send_error: script.send_error,
            polls: Mutex::new(script.polls.into_iter().collect()),
            last_poll: Mutex::new(TaskState::Working),
            poll_error: script.poll_error,
            poll_latency: script.poll_latency,
            advance_before_event: script.advance_before_event,
            close_error: script.close_error,
            calls: Arc::clone(&self.calls),
        }))
    }
}

/// A task event in the given state.
pub fn task_event(task_id: &str, state: TaskState) -> A2AResult<ClientEvent> {
    Ok(ClientEvent::Task(Task::new(task_id, "ctx-1", state)))
}

/// An agent message event with one text part.
pub fn message_event(text: &str) -> A2AResult<ClientEvent> {
    Ok(ClientEvent::Message(Message::agent("reply-1", text)))
}

/// Agent card pointing at `url` over JSON-RPC.
pub fn test_agent_card(url: &str) -> AgentCard {
    AgentCardBuilder::new("Test Echo Agent", "An echo agent for testing", "0.1.0")
        .with_jsonrpc_interface(url)
        .with_skill(
            "echo",
            "Echo",
            "Echoes back messages",
            vec!["test".to_string()],
        )
        .build()
}

// ============================================================================
// Local JSON-RPC agent over HTTP
// ============================================================================

/// What the mock agent answers to `message/send`.
#[derive(Clone)]
pub enum SendReply {
    /// A JSON-RPC result (a task or message JSON object).
    Result(Value),
    /// A JSON-RPC error object.
    Error { code: i64, message: String },
    /// A non-2xx HTTP status with a plain body.
    Status(u16),
    /// A 200 response whose body is not JSON.
    Garbage,
}

pub struct MockAgentState {
    pub send_reply: Mutex<SendReply>,
    /// States returned by successive `tasks/get` calls; the last one repeats.
    pub task_states: Mutex<VecDeque<TaskState>>,
    last_state: Mutex<TaskState>,
    /// Every JSON-RPC request body received, in order.
    pub requests: Mutex<Vec<Value>>,
    /// `Authorization` header of every JSON-RPC request, if present.
    pub authorizations: Mutex<Vec<Option<String>>>,
    pub card: Mutex<Value>,
    /// Serve the card only at the legacy `/.well-known/agent.json` path.
    pub legacy_card_only: bool,
}

impl MockAgentState {
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r["method"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

pub struct MockAgent {
    pub base_url: String,
    pub state: Arc<MockAgentState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockAgent {
    pub fn rpc_url(&self) -> String {
        format!("{}/a2a", self.base_url)
    }

    pub fn card(&self) -> AgentCard {
        test_agent_card(&self.rpc_url())
    }
}

impl Drop for MockAgent {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a mock agent on a random port.
pub async fn start_mock_agent(send_reply: SendReply, task_states: &[TaskState]) -> MockAgent {
    start_mock_agent_with(send_reply, task_states, false).await
}

pub async fn start_mock_agent_with(
    send_reply: SendReply,
    task_states: &[TaskState],
    legacy_card_only: bool,
) -> MockAgent {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let card = serde_json::to_value(test_agent_card(&format!("{base_url}/a2a"))).unwrap();
    let state = Arc::new(MockAgentState {
        send_reply: Mutex::new(send_reply),
        task_states: Mutex::new(task_states.iter().copied().collect()),
        last_state: Mutex::new(TaskState::Working),
        requests: Mutex::new(Vec::new()),
        authorizations: Mutex::new(Vec::new()),
        card: Mutex::new(card),
        legacy_card_only,
    });

    let app = Router::new()
        .route("/a2a", post(rpc))
        .route("/.well-known/agent-card.json", get(current_card))
        .route("/.well-known/agent.json", get(legacy_card))
        .route("/cards/custom.json", get(legacy_card))
        .with_state(Arc::clone(&state));

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Brief wait for the server to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    MockAgent {
        base_url,
        state,
        handle,
    }
}

async fn current_card(State(state): State<Arc<MockAgentState>>) -> Response {
    if state.legacy_card_only {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }
    Json(state.card.lock().unwrap().clone()).into_response()
}

async fn legacy_card(State(state): State<Arc<MockAgentState>>) -> Response {
    Json(state.card.lock().unwrap().clone()).into_response()
}

async fn rpc(
    State(state): State<Arc<MockAgentState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().unwrap().push(body.clone());
    state.authorizations.lock().unwrap().push(
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    let id = body["id"].clone();

    match body["method"].as_str().unwrap_or_default() {
        "message/send" => {
            let reply = state.send_reply.lock().unwrap().clone();
            match reply {
                SendReply::Result(result) => {
                    Json(json!({"jsonrpc": "2.0", "id": id, "result": result})).into_response()
                }
                SendReply::Error { code, message } => Json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {"code": code, "message": message}
                }))
                .into_response(),
                SendReply::Status(status) => (
                    StatusCode::from_u16(status).unwrap(),
                    "agent unavailable",
                )
                    .into_response(),
                SendReply::Garbage => (StatusCode::OK, "<html>oops</html>").into_response(),
            }
        }
        "tasks/get" => {
            let task_id = body["params"]["id"].as_str().unwrap_or_default().to_string();
            let state_now = {
                let mut last = state.last_state.lock().unwrap();
                if let Some(next) = state.task_states.lock().unwrap().pop_front() {
                    *last = next;
                }
                *last
            };
            let task = Task::new(task_id, "ctx-1", state_now);
            Json(json!({"jsonrpc": "2.0", "id": id, "result": task})).into_response()
        }
        other => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32601, "message": format!("Method not found: {other}")}
        }))
        .into_response(),
    }
}

/// JSON for a task in the given state.
pub fn task_json(task_id: &str, state: &str) -> Value {
    json!({
        "kind": "task",
        "id": task_id,
        "contextId": "ctx-1",
        "status": {"state": state}
    })
}

/// JSON for an agent message with one text part.
pub fn message_json(text: &str) -> Value {
    json!({
        "kind": "message",
        "messageId": "reply-1",
        "role": "agent",
        "parts": [{"kind": "text", "text": text}]
    })
}
