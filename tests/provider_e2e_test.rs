//! Requests through the real provider clients against mocked upstreams

use agora::adapters::AppState;
use agora::config::Settings;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> Settings {
    std::env::set_var("GROQ_API_KEY", "gsk-test");
    std::env::set_var("GEMINI_API_KEY", "gm-test");
    std::env::set_var("TAVILY_API_KEY", "tvly-test");

    let mut settings = Settings::default();
    settings.providers.groq_base_url = Some(server.uri());
    settings.providers.gemini_base_url = Some(server.uri());
    settings.search.base_url = Some(server.uri());
    settings
}

fn completion(content: Value, tool_calls: Option<Value>) -> Value {
    let mut message = json!({ "role": "assistant", "content": content });
    let finish_reason = match tool_calls {
        Some(calls) => {
            message["tool_calls"] = calls;
            "tool_calls"
        }
        None => "stop",
    };
    json!({
        "choices": [{ "message": message, "finish_reason": finish_reason }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20 }
    })
}

async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri("/chat")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

#[tokio::test]
async fn test_groq_single_agent_with_web_search() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            Value::Null,
            Some(json!([{
                "id": "call_1",
                "type": "function",
                "function": { "name": "web_search", "arguments": "{\"query\":\"rust 2024 edition\"}" }
            }])),
        )))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!("The 2024 edition shipped with Rust 1.85."),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "api_key": "tvly-test",
            "query": "rust 2024 edition",
            "max_results": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "title": "Rust 1.85",
                "url": "https://blog.rust-lang.org/2025/02/20/Rust-1.85.0.html",
                "content": "Rust 1.85 stabilizes the 2024 edition",
                "score": 0.9
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = agora::create_app(AppState::from_settings(&settings_for(&server)));
    let (status, body) = post_chat(
        app,
        json!({
            "model_name": "llama-3.3-70b-versatile",
            "model_provider": "Groq",
            "system_prompt": "Act as an AI chatbot who is smart and friendly",
            "messages": ["When did the 2024 edition ship?"],
            "allow_search": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "final_response": "The 2024 edition shipped with Rust 1.85." })
    );

    let requests = server.received_requests().await.unwrap();
    let completions: Vec<Value> = requests
        .iter()
        .filter(|r| r.url.path() == "/chat/completions")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(completions.len(), 2);
    assert_eq!(completions[0]["model"], "llama-3.3-70b-versatile");
    assert_eq!(completions[0]["tools"][0]["function"]["name"], "web_search");

    let followup = completions[1]["messages"].as_array().unwrap();
    let tool_message = followup.last().unwrap();
    assert_eq!(tool_message["role"], "tool");
    assert_eq!(tool_message["tool_call_id"], "call_1");
    assert!(tool_message["content"]
        .as_str()
        .unwrap()
        .contains("stabilizes the 2024 edition"));
}

#[tokio::test]
async fn test_compound_model_gets_no_tools() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(json!("Quick answer."), None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = agora::create_app(AppState::from_settings(&settings_for(&server)));
    let (status, body) = post_chat(
        app,
        json!({
            "model_name": "groq/compound-mini",
            "model_provider": "Groq",
            "system_prompt": "Be brief",
            "messages": ["Hi"],
            "allow_search": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_response"], "Quick answer.");

    let requests = server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent.get("tools").is_none());
}

#[tokio::test]
async fn test_gemini_debate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "gm-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "A measured view." }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 4, "totalTokenCount": 14 }
        })))
        .expect(4)
        .mount(&server)
        .await;

    let app = agora::create_app(AppState::from_settings(&settings_for(&server)));
    let (status, body) = post_chat(
        app,
        json!({
            "model_name": "gemini-2.0-flash",
            "model_provider": "Gemini",
            "system_prompt": "",
            "messages": ["Is remote work here to stay?"],
            "allow_search": false,
            "use_multi_agent": true,
            "agent_mode": "debate"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_response"], "A measured view.");
    let responses = body["debate_responses"].as_array().unwrap();
    assert_eq!(responses.len(), 3);
    assert!(responses.iter().all(|r| r["response"] == "A measured view."));
    assert_eq!(body["metadata"]["search_enabled"], json!(false));

    for request in server.received_requests().await.unwrap() {
        let sent: Value = serde_json::from_slice(&request.body).unwrap();
        assert!(sent.get("tools").is_none());
        assert!(sent.get("systemInstruction").is_some());
    }
}

#[tokio::test]
async fn test_upstream_error_is_bad_gateway() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("over capacity"))
        .mount(&server)
        .await;

    let app = agora::create_app(AppState::from_settings(&settings_for(&server)));
    let (status, body) = post_chat(
        app,
        json!({
            "model_name": "openai/gpt-oss-120b",
            "model_provider": "Groq",
            "system_prompt": "",
            "messages": ["Hello"],
            "allow_search": false,
            "use_multi_agent": true,
            "agent_mode": "sequential"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("over capacity"));
}

#[tokio::test]
async fn test_missing_provider_key_is_server_error() {
    let server = MockServer::start().await;
    let mut settings = settings_for(&server);
    std::env::remove_var("OPENAI_API_KEY");
    settings.models.allowed.push("gpt-4o-mini".to_string());
    settings.providers.openai_base_url = Some(server.uri());

    let app = agora::create_app(AppState::from_settings(&settings));
    let (status, body) = post_chat(
        app,
        json!({
            "model_name": "gpt-4o-mini",
            "model_provider": "OpenAI",
            "system_prompt": "",
            "messages": ["Hello"],
            "allow_search": false
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ready_once_credentials_are_set() {
    let server = MockServer::start().await;
    let app = agora::create_app(AppState::from_settings(&settings_for(&server)));

    let request = Request::builder()
        .uri("/health/ready")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["status"], "ready");
    assert!(body["providers"]
        .as_array()
        .unwrap()
        .contains(&json!("groq")));
}
