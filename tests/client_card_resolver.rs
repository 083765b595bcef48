//! Tests for `CardResolver` agent card discovery and endpoint selection.

mod common;

use a2a_invoke::builders::AgentCardBuilder;
use a2a_invoke::client::{A2AClient, CardResolver};
use a2a_invoke::error::A2AError;
use a2a_invoke::types::*;
use common::{message_json, start_mock_agent, start_mock_agent_with, SendReply};

fn make_card(interfaces: &[(&str, &str)]) -> AgentCard {
    let mut builder = AgentCardBuilder::new("TestAgent", "test", "1.0")
        .with_url("http://example.com");
    for (transport, url) in interfaces {
        builder = builder.with_interface(*transport, *url);
    }
    builder.build()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_card_resolver_construction() {
    let _ = format!("{:?}", CardResolver::new());
    let _ = format!("{:?}", CardResolver::default().with_card_path("/custom/agent/card"));
    let _ = format!("{:?}", CardResolver::with_client(reqwest::Client::new()));
}

// ============================================================================
// endpoint_for
// ============================================================================

#[test]
fn test_endpoint_for_jsonrpc_interface() {
    let card = make_card(&[("JSONRPC", "http://example.com/a2a")]);
    assert_eq!(
        CardResolver::endpoint_for(&card, "JSONRPC"),
        Some("http://example.com/a2a".to_string())
    );
}

#[test]
fn test_endpoint_for_is_case_insensitive() {
    let card = make_card(&[("jsonrpc", "http://example.com/rpc")]);
    assert_eq!(
        CardResolver::endpoint_for(&card, "JSONRPC"),
        Some("http://example.com/rpc".to_string())
    );
}

#[test]
fn test_endpoint_for_picks_first_matching_interface() {
    let card = make_card(&[
        ("GRPC", "http://example.com/grpc"),
        ("JSONRPC", "http://example.com/rpc"),
        ("JSONRPC", "http://example.com/rpc2"),
    ]);
    assert_eq!(
        CardResolver::endpoint_for(&card, "JSONRPC"),
        Some("http://example.com/rpc".to_string())
    );
}

#[test]
fn test_endpoint_for_falls_back_to_card_url() {
    let card = make_card(&[("GRPC", "http://example.com/grpc")]);
    assert_eq!(
        CardResolver::endpoint_for(&card, "JSONRPC"),
        Some("http://example.com".to_string())
    );
}

#[test]
fn test_endpoint_for_blank_url_is_none() {
    let card = AgentCardBuilder::new("TestAgent", "test", "1.0").build();
    assert!(CardResolver::endpoint_for(&card, "JSONRPC").is_none());
}

// ============================================================================
// Card JSON
// ============================================================================

#[test]
fn test_valid_agent_card_deserialization() {
    let json = serde_json::json!({
        "name": "TestAgent",
        "description": "A test agent",
        "version": "1.0.0",
        "url": "https://example.com/a2a",
        "supportedInterfaces": [{
            "url": "https://example.com/a2a",
            "transport": "JSONRPC"
        }],
        "capabilities": {},
        "defaultInputModes": ["text/plain"],
        "defaultOutputModes": ["text/plain"],
        "skills": [{
            "id": "test-skill",
            "name": "Test Skill",
            "description": "A skill for testing",
            "tags": ["test"]
        }]
    });

    let card: AgentCard = serde_json::from_value(json).unwrap();
    assert_eq!(card.name, "TestAgent");
    assert_eq!(card.preferred_transport.as_deref(), Some("JSONRPC"));
    assert_eq!(card.skills[0].id, "test-skill");
}

#[test]
fn test_additional_interfaces_alias() {
    let json = serde_json::json!({
        "name": "Legacy",
        "description": "v0.3 card",
        "version": "1",
        "url": "http://localhost:9999/",
        "preferredTransport": "GRPC",
        "additionalInterfaces": [{"url": "http://localhost:9999/rpc", "transport": "JSONRPC"}]
    });

    let card: AgentCard = serde_json::from_value(json).unwrap();
    assert_eq!(card.preferred_transport.as_deref(), Some("GRPC"));
    assert_eq!(
        CardResolver::endpoint_for(&card, "JSONRPC"),
        Some("http://localhost:9999/rpc".to_string())
    );
}

#[test]
fn test_invalid_agent_card_deserialization_fails() {
    let json = serde_json::json!({
        "invalid_field": "value",
        "name": "Test Agent"
    });
    let result: Result<AgentCard, _> = serde_json::from_value(json);
    assert!(result.is_err());
}

// ============================================================================
// A2AClient::from_card
// ============================================================================

#[test]
fn test_client_from_card_caches_card() {
    let card = make_card(&[("JSONRPC", "http://example.com/a2a")]);
    let client = A2AClient::from_card(card).unwrap();
    assert_eq!(client.agent_card().unwrap().name, "TestAgent");
}

#[test]
fn test_client_from_card_without_endpoint_fails() {
    let card = AgentCardBuilder::new("Nowhere", "no url", "1").build();
    let err = A2AClient::from_card(card).unwrap_err();
    assert!(matches!(err, A2AError::Configuration(_)));
}

#[test]
fn test_client_from_endpoint_has_no_card() {
    let client = A2AClient::from_endpoint("http://example.com/a2a");
    assert!(client.agent_card().is_none());
}

// ============================================================================
// resolve() over HTTP
// ============================================================================

#[tokio::test]
async fn test_resolve_from_well_known_path() {
    let agent = start_mock_agent(SendReply::Result(message_json("ok")), &[]).await;

    let card = CardResolver::new().resolve(&agent.base_url).await.unwrap();

    assert_eq!(card.name, "Test Echo Agent");
    assert_eq!(
        CardResolver::endpoint_for(&card, "JSONRPC"),
        Some(agent.rpc_url())
    );
}

#[tokio::test]
async fn test_resolve_tolerates_trailing_slash() {
    let agent = start_mock_agent(SendReply::Result(message_json("ok")), &[]).await;

    let card = CardResolver::new()
        .resolve(&format!("{}/", agent.base_url))
        .await
        .unwrap();

    assert_eq!(card.name, "Test Echo Agent");
}

#[tokio::test]
async fn test_resolve_falls_back_to_legacy_path() {
    let agent = start_mock_agent_with(SendReply::Result(message_json("ok")), &[], true).await;

    let card = CardResolver::new().resolve(&agent.base_url).await.unwrap();

    assert_eq!(card.name, "Test Echo Agent");
}

#[tokio::test]
async fn test_resolve_custom_relative_path() {
    let agent = start_mock_agent(SendReply::Result(message_json("ok")), &[]).await;

    let card = CardResolver::new()
        .with_card_path("cards/custom.json")
        .resolve(&agent.base_url)
        .await
        .unwrap();

    assert_eq!(card.name, "Test Echo Agent");
}

#[tokio::test]
async fn test_resolve_custom_absolute_url() {
    let agent = start_mock_agent(SendReply::Result(message_json("ok")), &[]).await;

    let card = CardResolver::new()
        .with_card_path(format!("{}/cards/custom.json", agent.base_url))
        .resolve("http://ignored.invalid")
        .await
        .unwrap();

    assert_eq!(card.name, "Test Echo Agent");
}

#[tokio::test]
async fn test_resolve_missing_custom_path_is_http_404() {
    let agent = start_mock_agent(SendReply::Result(message_json("ok")), &[]).await;

    let err = CardResolver::new()
        .with_card_path("/cards/missing.json")
        .resolve(&agent.base_url)
        .await
        .unwrap_err();

    assert!(matches!(err, A2AError::Http { status: 404, .. }), "got {err:?}");
}

#[tokio::test]
async fn test_resolve_unreachable_host_names_the_url() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = CardResolver::new()
        .resolve(&format!("http://{addr}"))
        .await
        .unwrap_err();

    assert!(matches!(err, A2AError::Transport(_)), "got {err:?}");
    assert!(err
        .to_string()
        .contains("Failed to load agent card from"));
    assert!(err.to_string().contains(".well-known/agent-card.json"));
}
