use axum::extract::{ Path, Query, State };
use axum::http::{ HeaderMap, StatusCode };
use axum::response::IntoResponse;
use axum::routing::{ get, post };
use axum::{ Json, Router };
use serde_json::{ json, Value };
use std::collections::HashMap;
use std::sync::{ Arc, Mutex };
use url::Url;

use docmedia_client::api::{ CopyKind, DocsApi, HttpDocsApi };
use docmedia_client::chat::{ ChatController, HtmlView, LoadOutcome, SubmitOutcome };
use docmedia_client::clipboard::MemoryClipboard;
use docmedia_client::copy::{ CopyHelper, CopyOutcome, CopyTrigger, ACK_LABEL };
use docmedia_client::models::chat::{ ChatMessage, Sender, SharedChat };
use docmedia_client::render::SearchUrls;
use docmedia_client::storage::MemoryStore;

#[derive(Clone, Default)]
struct Backend {
    shared: Arc<Mutex<HashMap<String, Value>>>,
    csrf_seen: Arc<Mutex<Vec<String>>>,
}

async fn copy_doc_text(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("name").map(String::as_str) {
        Some("flask") => (StatusCode::OK, Json(json!({ "text": "Flask documentation body" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "Documentation not found" }))),
    }
}

async fn copy_ai_summary(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let name = params.get("name").cloned().unwrap_or_default();
    Json(json!({ "summary": format!("Summary of {}", name) }))
}

async fn chat_api(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>
) -> impl IntoResponse {
    if let Some(token) = headers.get("X-CSRFToken").and_then(|v| v.to_str().ok()) {
        backend.csrf_seen.lock().unwrap().push(token.to_string());
    }
    let question = body["question"].as_str().unwrap_or_default();
    let tool = body["tool_name"].as_str().unwrap_or_default();
    if question == "boom" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "exploded" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "answer": format!(
                "Routing in **{}** maps URLs to views.\n\n```\n@app.route('/')\n```\nCited documentation sections:\nSection: Routing\n",
                tool
            )
        })),
    )
}

async fn create_shared_chat(
    State(backend): State<Backend>,
    Json(mut body): Json<Value>
) -> impl IntoResponse {
    let chat_id = format!("c{:07}", backend.shared.lock().unwrap().len());
    body["chat_id"] = json!(chat_id);
    backend.shared.lock().unwrap().insert(chat_id.clone(), body);
    Json(json!({ "success": true, "chat_id": chat_id }))
}

async fn get_shared_chat(
    State(backend): State<Backend>,
    Path(chat_id): Path<String>
) -> impl IntoResponse {
    let found = backend.shared.lock().unwrap().get(&chat_id).cloned();
    match found {
        Some(chat) => (StatusCode::OK, Json(chat)),
        None => (StatusCode::NOT_FOUND, Json(json!({ "success": false, "error": "Chat not found" }))),
    }
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/copy_doc_text/", get(copy_doc_text))
        .route("/copy_ai_summary/", get(copy_ai_summary))
        .route("/chat-api/", post(chat_api))
        .route("/api/shared-chats/", post(create_shared_chat))
        .route("/api/shared-chats/{chat_id}/", get(get_shared_chat))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn copy_endpoints_reach_the_clipboard() {
    let base = spawn_backend(Backend::default()).await;
    let api = Arc::new(HttpDocsApi::new(&base, None).unwrap());
    let clipboard = Arc::new(MemoryClipboard::new());
    let helper = CopyHelper::new(api, clipboard.clone());

    let trigger = CopyTrigger::for_kind(CopyKind::DocText);
    let outcome = helper.copy(CopyKind::DocText, "flask", &trigger).await;
    assert_eq!(outcome, CopyOutcome::Copied("Flask documentation body".to_string()));
    assert_eq!(trigger.label(), ACK_LABEL);

    let outcome = helper.copy(CopyKind::DocText, "cobol", &trigger).await;
    assert_eq!(outcome, CopyOutcome::Copied("No content available for cobol".to_string()));

    let outcome = helper.copy(CopyKind::AiSummary, "vue js", &CopyTrigger::for_kind(CopyKind::AiSummary)).await;
    assert_eq!(outcome, CopyOutcome::Copied("Summary of vue js".to_string()));
    assert_eq!(clipboard.writes(), 3);
}

#[tokio::test]
async fn ask_sends_csrf_token_and_reports_status_errors() {
    let backend = Backend::default();
    let base = spawn_backend(backend.clone()).await;
    let api = HttpDocsApi::new(&base, Some("token-123".to_string())).unwrap();

    let answer = api.ask("How do routes work?", "flask").await.unwrap();
    assert!(answer.starts_with("Routing in **flask**"));
    assert_eq!(backend.csrf_seen.lock().unwrap().as_slice(), ["token-123".to_string()]);

    let err = api.ask("boom", "flask").await.unwrap_err();
    assert!(err.is_status());
}

#[tokio::test]
async fn unreachable_server_is_not_a_status_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpDocsApi::new(&format!("http://{}", addr), None).unwrap();
    let err = api.ask("hello", "git").await.unwrap_err();
    assert!(!err.is_status());
}

#[tokio::test]
async fn shared_chats_round_trip_through_server() {
    let base = spawn_backend(Backend::default()).await;
    let api = HttpDocsApi::new(&base, None).unwrap();

    let chat = SharedChat::new("git", vec![
        ChatMessage::new(Sender::User, "How do I squash?"),
        ChatMessage::new(Sender::Ai, "Use an interactive rebase."),
    ]);
    let chat_id = api.create_shared_chat(&chat).await.unwrap();
    let fetched = api.get_shared_chat(&chat_id).await.unwrap();
    assert_eq!(fetched.chat_id.as_deref(), Some(chat_id.as_str()));
    assert_eq!(fetched.messages, chat.messages);

    assert!(api.get_shared_chat("missing").await.unwrap_err().is_status());
}

#[tokio::test]
async fn chat_page_end_to_end() {
    let base = spawn_backend(Backend::default()).await;
    let api: Arc<dyn DocsApi> = Arc::new(HttpDocsApi::new(&base, None).unwrap());
    let store = Arc::new(MemoryStore::new());
    let clipboard = Arc::new(MemoryClipboard::new());
    let page = Url::parse(&format!("{}/ai-chat/flask/", base)).unwrap();

    let mut chat = ChatController::new(
        &page,
        api.clone(),
        store.clone(),
        clipboard.clone(),
        SearchUrls::default(),
        HtmlView::new()
    ).unwrap();
    assert_eq!(chat.load(&page).await, LoadOutcome::Fresh);

    assert_eq!(chat.submit("How do routes work?").await, SubmitOutcome::Answered);
    assert_eq!(chat.submit("boom").await, SubmitOutcome::Failed);
    assert_eq!(chat.session().len(), 4);

    let html = chat.view().to_html();
    assert!(html.contains("<strong>flask</strong>"));
    assert!(html.contains("@app.route(&#039;/&#039;)"));
    assert!(html.contains(">Routing</a>"));

    let shared = chat.share().await.unwrap();
    assert!(!shared.local);
    assert_eq!(clipboard.contents().as_deref(), Some(shared.url.as_str()));

    let mut viewer = ChatController::new(
        &shared.url,
        api,
        Arc::new(MemoryStore::new()),
        clipboard,
        SearchUrls::default(),
        HtmlView::new()
    ).unwrap();
    assert_eq!(viewer.load(&shared.url).await, LoadOutcome::SharedFromServer);
    assert_eq!(viewer.session().messages(), chat.session().messages());
}
