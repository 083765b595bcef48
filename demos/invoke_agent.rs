//! Invoke Agent: send one message and print the single final result.
//!
//! Run the slow agent first:
//! ```sh
//! cargo run --example slow_agent
//! ```
//!
//! Then in another terminal:
//! ```sh
//! cargo run --example invoke_agent -- http://localhost:3000 "Hello, agent!"
//! ```
//!
//! `A2A_TIMEOUT_MS` and `A2A_POLL_INTERVAL_MS` override the completion
//! settings.

use std::sync::Arc;
use std::time::Duration;

use a2a_invoke::client::{CardResolver, DefaultClientFactory};
use a2a_invoke::invoke::{CompletionSettings, MessageDispatcher, OutboundMessage, SendMessageResult};
use a2a_invoke::utils::constants::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TOTAL_TIMEOUT_MS};

fn env_millis(name: &str, default: u64) -> Result<Duration, Box<dyn std::error::Error>> {
    let ms = match std::env::var(name) {
        Ok(value) => value.parse::<u64>()?,
        Err(_) => default,
    };
    Ok(Duration::from_millis(ms))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let base_url = args.next().unwrap_or_else(|| "http://localhost:3000".to_string());
    let text = args.next().unwrap_or_else(|| "Hello from a2a-invoke!".to_string());

    let settings = CompletionSettings::new(
        env_millis("A2A_TIMEOUT_MS", DEFAULT_TOTAL_TIMEOUT_MS)?,
        env_millis("A2A_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?,
    )?;

    let card = CardResolver::new().resolve(&base_url).await?;
    println!("Connected to: {} (v{})", card.name, card.version);

    let dispatcher = MessageDispatcher::new(Arc::new(DefaultClientFactory::default()));
    match dispatcher
        .send(&card, OutboundMessage::text(text), &settings)
        .await?
    {
        SendMessageResult::Message(message) => {
            println!("Direct message from agent:");
            println!("  {}", message.text());
        }
        SendMessageResult::Task(task) => {
            println!("Task ID: {}", task.task_id);
            println!("Status: {}", task.status.state);
            for artifact in &task.artifacts {
                println!(
                    "Artifact: {}",
                    artifact.name.as_deref().unwrap_or("unnamed")
                );
                println!("  {}", artifact.text());
            }
            if let Some(message) = &task.status.message {
                println!("Agent says: {}", message.text());
            }
        }
    }

    Ok(())
}
