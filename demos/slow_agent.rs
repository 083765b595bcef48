//! Slow Agent: a JSON-RPC agent that takes a few polls to finish a task.
//!
//! `message/send` always answers with a `submitted` task. `tasks/get`
//! reports `working` for the first three queries of each task and
//! `completed` afterwards.
//!
//! Run with:
//! ```sh
//! cargo run --example slow_agent
//! ```
//!
//! Then invoke it:
//! ```sh
//! cargo run --example invoke_agent -- http://localhost:3000 "Hello, agent!"
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use a2a_invoke::builders::AgentCardBuilder;
use a2a_invoke::types::{AgentCard, Artifact, Part, Task, TaskState};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

const POLLS_UNTIL_DONE: u32 = 3;

struct AgentState {
    card: AgentCard,
    /// Task id to (context id, echoed text, tasks/get count).
    tasks: Mutex<HashMap<String, (String, String, u32)>>,
}

async fn agent_card(State(state): State<Arc<AgentState>>) -> Json<AgentCard> {
    Json(state.card.clone())
}

async fn rpc(State(state): State<Arc<AgentState>>, Json(body): Json<Value>) -> Json<Value> {
    let id = body["id"].clone();
    let params = &body["params"];

    match body["method"].as_str().unwrap_or_default() {
        "message/send" => {
            let text = params["message"]["parts"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let task_id = uuid::Uuid::new_v4().to_string();
            let context_id = params["message"]["contextId"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

            tracing::info!(%task_id, "accepted message");
            state
                .tasks
                .lock()
                .unwrap()
                .insert(task_id.clone(), (context_id.clone(), text, 0));

            let task = Task::new(task_id, context_id, TaskState::Submitted);
            Json(json!({"jsonrpc": "2.0", "id": id, "result": task}))
        }
        "tasks/get" => {
            let task_id = params["id"].as_str().unwrap_or_default().to_string();
            let mut tasks = state.tasks.lock().unwrap();
            let Some((context_id, text, polls)) = tasks.get_mut(&task_id) else {
                return Json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {"code": -32001, "message": "Task not found"}
                }));
            };

            *polls += 1;
            let mut task = if *polls > POLLS_UNTIL_DONE {
                let mut task = Task::new(&task_id, context_id.as_str(), TaskState::Completed);
                task.artifacts = Some(vec![Artifact {
                    artifact_id: uuid::Uuid::new_v4().to_string(),
                    name: Some("echo".to_string()),
                    description: None,
                    parts: vec![Part::text(format!("Echo: {text}"))],
                    metadata: None,
                }]);
                task
            } else {
                Task::new(&task_id, context_id.as_str(), TaskState::Working)
            };
            task.metadata = Some(json!({"polls": *polls}));
            tracing::info!(%task_id, polls = *polls, state = %task.status.state, "task queried");
            Json(json!({"jsonrpc": "2.0", "id": id, "result": task}))
        }
        other => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32601, "message": format!("Method not found: {other}")}
        })),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let card = AgentCardBuilder::new(
        "Slow Agent",
        "Echoes messages back after a few status polls",
        "0.1.0",
    )
    .with_jsonrpc_interface("http://localhost:3000/a2a")
    .with_skill(
        "echo",
        "Echo",
        "Echoes back any text message you send",
        vec!["echo".to_string(), "test".to_string()],
    )
    .build();

    let state = Arc::new(AgentState {
        card,
        tasks: Mutex::new(HashMap::new()),
    });

    let app = Router::new()
        .route("/a2a", post(rpc))
        .route("/.well-known/agent-card.json", get(agent_card))
        .with_state(state);

    let addr = "0.0.0.0:3000";
    println!("Slow Agent listening on http://{}", addr);
    println!("  Agent card: http://{}/.well-known/agent-card.json", addr);
    println!("  A2A endpoint: http://{}/a2a", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
