//! In-process stand-in for the incident REST backend.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use incident_core::model::{page_count, Timestamp};
use incident_core::{
    ClientConfig, HttpIncidentApi, Incident, IncidentStatus, IncidentType, NewIncident, Page,
};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const EPOCH_MILLIS: i64 = 1_714_557_600_000;

#[derive(Default)]
pub struct Backend {
    incidents: Mutex<Vec<Incident>>,
    next_id: Mutex<i64>,
    failing: AtomicBool,
}

impl Backend {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn total(&self) -> usize {
        self.incidents.lock().expect("lock").len()
    }

    pub fn get(&self, id: i64) -> Option<Incident> {
        self.incidents
            .lock()
            .expect("lock")
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    fn insert(&self, body: NewIncident) -> Incident {
        let mut next_id = self.next_id.lock().expect("lock");
        *next_id += 1;
        let stamp = Timestamp::from_millis(EPOCH_MILLIS + *next_id * 1000).ok();
        let incident = Incident {
            id: *next_id,
            title: body.title,
            kind: body.kind,
            status: body.status,
            reporter: body.reporter,
            handler: body.handler,
            detail: body.detail,
            create_time: stamp,
            update_time: stamp,
        };
        self.incidents.lock().expect("lock").push(incident.clone());
        incident
    }

    fn fail(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }
}

pub struct TestServer {
    pub backend: Arc<Backend>,
    pub config: ClientConfig,
}

impl TestServer {
    pub fn api(&self) -> HttpIncidentApi {
        HttpIncidentApi::new(self.config.clone())
    }
}

pub fn new_incident(n: usize) -> NewIncident {
    NewIncident {
        title: format!("incident {n}"),
        kind: IncidentType::ALL[n % IncidentType::ALL.len()],
        status: IncidentStatus::Open,
        reporter: "oncall".into(),
        handler: None,
        detail: format!("detail {n}"),
    }
}

/// Starts a backend holding `seeded` incidents with ids `1..=seeded`.
pub async fn spawn_backend(seeded: usize) -> TestServer {
    let backend = Arc::new(Backend::default());
    for n in 1..=seeded {
        backend.insert(new_incident(n));
    }

    let app = Router::new()
        .route("/incidents", get(list).post(create))
        .route("/incidents/:id", put(update).delete(remove))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    TestServer {
        backend,
        config: ClientConfig::new(&format!("http://{addr}")).expect("config"),
    }
}

#[derive(Deserialize)]
struct ListParams {
    page: usize,
    size: usize,
}

async fn list(
    State(backend): State<Arc<Backend>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page>, StatusCode> {
    if backend.fail() || params.size == 0 {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let all = backend.incidents.lock().expect("lock").clone();
    let total_elements = all.len() as u64;
    let total_pages = page_count(total_elements, params.size);
    let current_page = params.page.min(total_pages.saturating_sub(1));
    let content = all
        .into_iter()
        .skip(current_page * params.size)
        .take(params.size)
        .collect();
    Ok(Json(Page {
        content,
        total_elements,
        total_pages,
        current_page,
    }))
}

async fn create(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<NewIncident>,
) -> Result<(StatusCode, Json<Incident>), StatusCode> {
    if backend.fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok((StatusCode::CREATED, Json(backend.insert(body))))
}

async fn update(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<i64>,
    Json(body): Json<Incident>,
) -> Result<Json<Incident>, StatusCode> {
    if backend.fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let mut incidents = backend.incidents.lock().expect("lock");
    let stored = incidents
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    stored.status = body.status;
    stored.reporter = body.reporter;
    stored.handler = body.handler;
    stored.detail = body.detail;
    stored.update_time = Timestamp::from_millis(EPOCH_MILLIS + 86_400_000).ok();
    Ok(Json(stored.clone()))
}

async fn remove(State(backend): State<Arc<Backend>>, Path(id): Path<i64>) -> StatusCode {
    if backend.fail() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let mut incidents = backend.incidents.lock().expect("lock");
    let before = incidents.len();
    incidents.retain(|i| i.id != id);
    if incidents.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}
