//! End-to-end flows against an in-process recipe backend.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use recetario::clients::{RecipeApiClient, RecipeBackend};
use recetario::config::Config;
use recetario::services::chat::{SERVER_ERROR_REPLY, UNREACHABLE_REPLY};
use recetario::services::{
    ChatSession, Dimension, FacetStore, MaxTime, SearchController, SearchOutcome, SearchPhase,
    Speaker, aggregate,
};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct StubBackend {
    searches: Mutex<Vec<Vec<(String, String)>>>,
}

impl StubBackend {
    fn searches(&self) -> Vec<Vec<(String, String)>> {
        self.searches.lock().unwrap().clone()
    }
}

fn recipes() -> Vec<Value> {
    vec![
        json!({ "_id": "r1", "title": "Pasta al pomodoro", "cuisine": "Italian",
                "course": "Main", "difficulty": "easy", "totalTimeMinutes": 25,
                "ingredients": [ { "ingredientId": "i1", "name": "Tomato" } ] }),
        json!({ "_id": "r2", "title": "Tacos", "cuisine": "Mexican",
                "course": "Main", "difficulty": "medium", "totalTimeMinutes": 40,
                "ingredients": [ { "ingredientId": "i2", "name": "Corn" } ] }),
        json!({ "_id": "r3", "title": "Mango sticky rice", "cuisine": "Thai",
                "course": "Dessert", "difficulty": "easy", "totalTimeMinutes": 35 }),
    ]
}

async fn search(
    State(stub): State<Arc<StubBackend>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    stub.searches.lock().unwrap().push(params.clone());

    let param = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    match param("q").as_deref() {
        Some("broken") => return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        Some("weird") => return Json(json!({ "foo": 1 })).into_response(),
        Some("garbled") => return "<html>oops</html>".into_response(),
        _ => {}
    }

    let cuisine = param("cuisine");
    let hits: Vec<Value> = recipes()
        .into_iter()
        .filter(|r| cuisine.as_deref().is_none_or(|c| r["cuisine"] == c))
        .map(|r| {
            let id = r["_id"].clone();
            json!({ "_id": id, "_source": r })
        })
        .collect();

    Json(json!({ "hits": { "hits": hits } })).into_response()
}

async fn ingredients() -> Json<Value> {
    Json(json!([
        { "_id": "i1", "name": "Tomato", "category": "Vegetables" },
        { "_id": "i2", "name": "Corn", "category": "Grains" }
    ]))
}

async fn chat(Json(body): Json<Value>) -> Response {
    match body["message"].as_str() {
        Some("fail") => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
        Some(message) => Json(json!({ "answer": format!("You asked: {message}") })).into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn spawn_backend() -> (Arc<StubBackend>, Arc<dyn RecipeBackend>) {
    let stub = Arc::new(StubBackend::default());
    let router = Router::new()
        .route("/search/recipes", get(search))
        .route("/ingredients", get(ingredients))
        .route("/chat", post(chat))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub backend");
    let addr = listener.local_addr().expect("stub backend address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub backend crashed");
    });

    let mut config = Config::default();
    config.backend.base_url = format!("http://{addr}");
    let client = RecipeApiClient::new(&config.backend).expect("failed to build client");

    (stub, Arc::new(client))
}

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[tokio::test]
async fn test_filters_reach_backend_in_order() {
    let (stub, backend) = spawn_backend().await;
    let mut store = FacetStore::new(16);
    assert_eq!(store.load_catalog(backend.as_ref()).await, 2);

    store.set_query("  dinner ");
    store.toggle(Dimension::Ingredients, "i1");
    store.toggle(Dimension::Ingredients, "missing");
    store.toggle(Dimension::Difficulty, "easy");
    store.toggle(Dimension::Cuisine, "Mexican");
    store.toggle(Dimension::Cuisine, "Italian");
    store.set_max_time(MaxTime::Within30);

    let controller = SearchController::new(backend);
    controller.execute(store.snapshot()).await;

    assert_eq!(
        stub.searches(),
        vec![pairs(&[
            ("q", "dinner"),
            ("ingredients", "Tomato"),
            ("difficulty", "easy"),
            ("cuisine", "Italian"),
            ("maxTime", "30"),
            ("size", "50"),
        ])]
    );
}

#[tokio::test]
async fn test_search_commits_flattened_hits() {
    let (_stub, backend) = spawn_backend().await;
    let controller = SearchController::new(backend);

    let outcome = controller.execute(FacetStore::new(4).snapshot()).await;
    assert!(matches!(outcome, SearchOutcome::Committed { count: 3, .. }));

    let state = controller.state();
    assert_eq!(state.phase, SearchPhase::Settled);
    assert!(!state.failed);
    assert_eq!(state.results[0].id, "r1");
    assert_eq!(state.results[0].title, "Pasta al pomodoro");
    assert!(state.universe.is_captured());
}

#[tokio::test]
async fn test_server_error_sets_failed_flag() {
    let (_stub, backend) = spawn_backend().await;
    let controller = SearchController::new(backend);
    let mut store = FacetStore::new(4);

    controller.execute(store.snapshot()).await;
    assert_eq!(controller.state().results.len(), 3);

    store.set_query("broken");
    let outcome = controller.execute(store.snapshot()).await;

    assert!(matches!(outcome, SearchOutcome::Failed { .. }));
    let state = controller.state();
    assert!(state.failed);
    assert!(state.results.is_empty());
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_unusable_bodies() {
    let (_stub, backend) = spawn_backend().await;
    let controller = SearchController::new(backend);
    let mut store = FacetStore::new(4);

    store.set_query("weird");
    controller.execute(store.snapshot()).await;
    let state = controller.state();
    assert!(!state.failed);
    assert!(state.results.is_empty());

    store.set_query("garbled");
    controller.execute(store.snapshot()).await;
    assert!(controller.state().failed);
}

#[tokio::test]
async fn test_clear_all_returns_to_query_only_search() {
    let (stub, backend) = spawn_backend().await;
    let controller = Arc::new(SearchController::new(backend.clone()));
    let mut store = FacetStore::new(16);
    store.load_catalog(backend.as_ref()).await;

    let _listener = Arc::clone(&controller).start_listener(store.subscribe());

    store.set_query("pasta");
    store.toggle(Dimension::Ingredients, "i1");
    store.toggle(Dimension::Course, "Main");
    store.set_max_time(MaxTime::Within45);
    store.clear_all();

    let mut rx = controller.subscribe();
    rx.wait_for(|state| state.committed.is_some_and(|t| t.value() == 5))
        .await
        .unwrap();

    let searches = stub.searches();
    assert!(searches.contains(&pairs(&[("q", "pasta"), ("size", "50")])));
    assert_eq!(store.selection().query, "pasta");
    assert!(!store.selection().has_facets());
}

#[tokio::test]
async fn test_sidebar_counts_follow_results() {
    let (_stub, backend) = spawn_backend().await;
    let controller = SearchController::new(backend.clone());
    let mut store = FacetStore::new(16);
    store.load_catalog(backend.as_ref()).await;

    controller.execute(store.snapshot()).await;
    store.toggle(Dimension::Cuisine, "Thai");
    controller.execute(store.snapshot()).await;

    let state = controller.state();
    assert_eq!(state.results.len(), 1);

    let sidebar = aggregate(&store.catalog(), &state.universe, &state.results, &BTreeSet::new());
    let cuisines: Vec<(&str, usize)> = sidebar
        .cuisines
        .iter()
        .map(|o| (o.id.as_str(), o.count))
        .collect();
    assert_eq!(cuisines, vec![("Italian", 0), ("Mexican", 0), ("Thai", 1)]);
}

#[tokio::test]
async fn test_chat_round_trip_and_fallbacks() {
    let (_stub, backend) = spawn_backend().await;
    let mut session = ChatSession::new();

    let reply = session.send(backend.as_ref(), "what is quick?").await.unwrap();
    assert_eq!(reply.text, "You asked: what is quick?");

    let reply = session.send(backend.as_ref(), "fail").await.unwrap();
    assert_eq!(reply.text, SERVER_ERROR_REPLY);

    assert!(session.send(backend.as_ref(), "   ").await.is_none());
    assert_eq!(session.messages().len(), 4);
    assert_eq!(session.messages()[0].from, Speaker::User);
    assert!(!session.is_pending());
}

#[tokio::test]
async fn test_unreachable_backend() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = Config::default();
    config.backend.base_url = format!("http://{addr}");
    let backend: Arc<dyn RecipeBackend> = Arc::new(RecipeApiClient::new(&config.backend).unwrap());

    let mut store = FacetStore::new(4);
    assert_eq!(store.load_catalog(backend.as_ref()).await, 0);
    assert!(store.catalog().is_empty());

    let mut session = ChatSession::new();
    let reply = session.send(backend.as_ref(), "hello").await.unwrap();
    assert_eq!(reply.text, UNREACHABLE_REPLY);

    let controller = SearchController::new(backend);
    controller.execute(store.snapshot()).await;
    assert!(controller.state().failed);
}
