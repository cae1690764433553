#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use dog_breeds::{BreedNotFound, BreedProvider, SubBreedList};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Test utilities for integration testing
pub mod test_utils {
    use super::*;

    /// A trimmed down `breeds/list/all` payload
    pub fn create_breed_listing() -> Value {
        json!({
            "status": "success",
            "message": {
                "affenpinscher": [],
                "bulldog": ["boston", "english", "french"],
                "hound": ["afghan", "basset", "blood", "english", "ibizan", "plott", "walker"],
                "husky": [],
                "terrier": ["american", "australian", "bedlington", "border"]
            }
        })
    }

    /// Payload dog.ceo sends for failed requests
    pub fn create_error_payload() -> Value {
        json!({
            "status": "error",
            "message": "No route found for \"GET /api/breeds/list/alll\"",
            "code": 404
        })
    }

    pub fn strings(items: &[&str]) -> SubBreedList {
        items.iter().map(|s| s.to_string()).collect()
    }
}

/// Scripted outcome for one delegate call
#[derive(Debug, Clone)]
pub enum Outcome {
    Found(SubBreedList),
    Missing,
}

/// Mock provider for testing.
///
/// Each normalized breed gets a queue of outcomes consumed one per call; the last
/// outcome repeats once the queue runs dry. Unscripted breeds are always missing.
pub struct MockBreedProvider {
    script: Mutex<HashMap<String, VecDeque<Outcome>>>,
    requests: Mutex<Vec<String>>,
}

impl MockBreedProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn found(self, breed: &str, subs: &[&str]) -> Self {
        self.then(breed, Outcome::Found(test_utils::strings(subs)))
    }

    pub fn missing(self, breed: &str) -> Self {
        self.then(breed, Outcome::Missing)
    }

    pub fn then(self, breed: &str, outcome: Outcome) -> Self {
        self.script
            .lock()
            .unwrap()
            .entry(breed.trim().to_lowercase())
            .or_default()
            .push_back(outcome);
        self
    }

    /// Breed names exactly as the provider received them
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl BreedProvider for MockBreedProvider {
    async fn lookup(&self, breed: &str) -> Result<SubBreedList, BreedNotFound> {
        self.requests.lock().unwrap().push(breed.to_string());

        let mut script = self.script.lock().unwrap();
        let outcome = match script.get_mut(&breed.trim().to_lowercase()) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match outcome {
            Some(Outcome::Found(subs)) => Ok(subs),
            Some(Outcome::Missing) | None => Err(BreedNotFound::new(breed, "scripted miss")),
        }
    }
}

#[derive(Clone)]
struct ApiState {
    status: StatusCode,
    body: String,
    hits: Arc<AtomicUsize>,
}

async fn list_all(State(state): State<ApiState>) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    (state.status, state.body.clone())
}

/// Local stand-in for the dog.ceo API on an ephemeral port
pub struct TestApiServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl TestApiServer {
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Result<Self> {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = ApiState {
            status,
            body: body.into(),
            hits: hits.clone(),
        };

        let app = Router::new()
            .route("/api/breeds/list/all", get(list_all))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}/api"),
            hits,
        })
    }

    pub async fn with_listing() -> Result<Self> {
        Self::start(StatusCode::OK, test_utils::create_breed_listing().to_string()).await
    }

    /// Requests served so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
