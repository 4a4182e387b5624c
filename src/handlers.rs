use crate::commands::{self, AmountInput, CommandStatus, NewCustomer};
use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::models::{CustomerId, CustomerSnapshot, Segments};
use crate::registry::Registry;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state injected into handlers.
pub struct AppState {
    /// The one registry this process serves. Mutating commands take the
    /// write lock, queries the read lock.
    pub registry: RwLock<Registry>,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    pub fn new(registry: Registry, config: Config) -> Self {
        Self {
            registry: RwLock::new(registry),
            config,
        }
    }
}

/// Request body for `POST /api/v1/customers/:id/interactions`.
#[derive(Debug, Deserialize)]
pub struct InteractionRequest {
    pub interaction: String,
}

/// Request body for `POST /api/v1/customers/:id/purchases`.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub amount: AmountInput,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct FollowUpParams {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub n: Option<usize>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and the number of customers held.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let customers = state.registry.read().await.len();
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-crm",
            "version": env!("CARGO_PKG_VERSION"),
            "customers": customers
        })),
    )
}

/// POST /api/v1/customers
///
/// Registers a new customer. Every form field must be filled in.
///
/// # Returns
///
/// * `201 Created` with the status message, `409 Conflict` when the id is taken.
pub async fn add_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCustomer>,
) -> Result<(StatusCode, Json<CommandStatus>), AppError> {
    tracing::info!("POST /customers - id: {}", payload.customer_id);
    payload.require_all_fields()?;

    let mut registry = state.registry.write().await;
    let status =
        commands::add_customer(&mut registry, payload).context("Failed to add customer")?;
    Ok((StatusCode::CREATED, Json(status)))
}

/// GET /api/v1/customers
pub async fn list_customers(State(state): State<Arc<AppState>>) -> Json<Vec<CustomerSnapshot>> {
    Json(state.registry.read().await.list())
}

/// GET /api/v1/customers/:id
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CustomerId>,
) -> Result<Json<CustomerSnapshot>, AppError> {
    tracing::info!("GET /customers/{}", id);
    let snapshot = state.registry.read().await.get_details(id)?;
    Ok(Json(snapshot))
}

/// GET /api/v1/customers/:id/details
///
/// Same data as [`get_customer`], rendered as `Key: value` lines.
pub async fn get_customer_details_text(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CustomerId>,
) -> Result<String, AppError> {
    let snapshot = state.registry.read().await.get_details(id)?;
    Ok(snapshot.to_details_text())
}

/// POST /api/v1/customers/:id/interactions
pub async fn log_interaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CustomerId>,
    Json(payload): Json<InteractionRequest>,
) -> Result<Json<CommandStatus>, AppError> {
    if payload.interaction.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Please enter customer ID and interaction.".to_string(),
        ));
    }

    let mut registry = state.registry.write().await;
    let status = commands::log_interaction(&mut registry, id, payload.interaction)
        .with_context(|| format!("Failed to log interaction for customer {}", id))?;
    Ok(Json(status))
}

/// POST /api/v1/customers/:id/purchases
///
/// The amount may be a JSON number or a numeric string.
pub async fn log_purchase(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CustomerId>,
    Json(payload): Json<PurchaseRequest>,
) -> Result<Json<CommandStatus>, AppError> {
    if payload.amount.is_blank() {
        return Err(AppError::BadRequest(
            "Please enter customer ID and purchase amount.".to_string(),
        ));
    }

    let mut registry = state.registry.write().await;
    let status = commands::log_purchase(&mut registry, id, &payload.amount)
        .with_context(|| format!("Failed to log purchase for customer {}", id))?;
    Ok(Json(status))
}

/// GET /api/v1/customers/search?q=
pub async fn search_customers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<CustomerSnapshot>> {
    Json(state.registry.read().await.search(&params.q))
}

/// GET /api/v1/segments
pub async fn segment_customers(State(state): State<Arc<AppState>>) -> Json<Segments> {
    Json(state.registry.read().await.segment())
}

/// GET /api/v1/follow-ups?days=
///
/// Falls back to the configured staleness threshold when `days` is omitted.
pub async fn follow_up_reminders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FollowUpParams>,
) -> Json<Vec<CustomerSnapshot>> {
    let days = params.days.unwrap_or(state.config.follow_up_days);
    let due = state.registry.read().await.due_for_follow_up(days);
    tracing::info!("{} customers due for follow-up ({} days)", due.len(), days);
    Json(due)
}

/// GET /api/v1/top?n=
pub async fn top_customers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopParams>,
) -> Json<Vec<CustomerSnapshot>> {
    let n = params.n.unwrap_or(state.config.top_n);
    Json(state.registry.read().await.top_n(n))
}
