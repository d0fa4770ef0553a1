use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::warn;

use patrimoine_core::errors::CoreError;
use patrimoine_core::models::dashboard::OwnerFilter;
use patrimoine_core::Dashboard;

use crate::form::HoldingForm;
use crate::render::{self, PageContext, SAVED_NOTICE};

/// Shared between handlers. The mutex serializes interactions: one
/// load → value → render pass at a time.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/holdings", post(add_holding))
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/owners", get(api_owners))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct ViewQuery {
    owner: Option<String>,
    saved: Option<String>,
}

async fn index(State(st): State<AppState>, Query(q): Query<ViewQuery>) -> impl IntoResponse {
    let filter = OwnerFilter::from_selection(q.owner.as_deref());
    let view = st.dashboard.lock().await.render(&filter).await;

    let form = HoldingForm::default();
    Html(render::page(&PageContext {
        view: &view,
        notice: q.saved.is_some().then_some(SAVED_NOTICE),
        form_error: None,
        form: &form,
    }))
}

async fn add_holding(State(st): State<AppState>, Form(form): Form<HoldingForm>) -> Response {
    let filter = OwnerFilter::from_selection(form.view.as_deref());
    let mut dashboard = st.dashboard.lock().await;

    let result = match form.to_holding() {
        Ok(holding) => dashboard.add_holding(holding).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Redirect::to(&saved_location(&filter)).into_response(),
        Err(e) => {
            let status = status_for(&e);
            warn!(error = %e, %status, "holding not saved");
            let view = dashboard.render(&filter).await;
            let message = e.to_string();
            let html = render::page(&PageContext {
                view: &view,
                notice: None,
                form_error: Some(&message),
                form: &form,
            });
            (status, Html(html)).into_response()
        }
    }
}

async fn api_dashboard(State(st): State<AppState>, Query(q): Query<ViewQuery>) -> impl IntoResponse {
    let filter = OwnerFilter::from_selection(q.owner.as_deref());
    let view = st.dashboard.lock().await.render(&filter).await;
    Json(view)
}

async fn api_owners(State(st): State<AppState>) -> Response {
    match st.dashboard.lock().await.owners().await {
        Ok(owners) => Json(owners).into_response(),
        Err(e) => (
            status_for(&e),
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn health() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], Json(json!({ "status": "ok" })))
}

/// Where to send the browser after a successful save.
fn saved_location(filter: &OwnerFilter) -> String {
    match filter {
        OwnerFilter::All => "/?saved=1".to_string(),
        OwnerFilter::Owner(name) => format!("/?owner={}&saved=1", urlencoding::encode(name)),
    }
}

fn status_for(e: &CoreError) -> StatusCode {
    if e.is_validation() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_GATEWAY
    }
}
