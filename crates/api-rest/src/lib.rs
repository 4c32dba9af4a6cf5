//! # API REST
//!
//! REST API implementation for Quill.
//!
//! Handles:
//! - Document CRUD endpoints under `/api/documents` with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialisation, CORS, request tracing)
//! - Serving the static entry page for every other path
//!
//! Uses `api-shared` for wire types and `quill-core` for the operations themselves.

#![warn(rust_2018_idioms)]

pub mod config;

use api_shared::{
    DocumentReq, DocumentRes, ErrorRes, HealthRes, HealthService, MessageRes, DELETED_MESSAGE,
    DOCUMENTS_PATH,
};
use axum::{
    extract::{rejection::JsonRejection, Path as AxumPath, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use quill_core::{CoreError, DocumentId, DocumentService};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::RestConfig;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    documents: DocumentService,
}

impl AppState {
    pub fn new(documents: DocumentService) -> Self {
        Self { documents }
    }
}

/// Error half of every handler result: a status and an `{error}` body.
type ApiError = (StatusCode, Json<ErrorRes>);

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_documents,
        create_document,
        update_document,
        delete_document,
    ),
    components(schemas(DocumentReq, DocumentRes, ErrorRes, MessageRes, HealthRes))
)]
struct ApiDoc;

/// Build the full application router.
///
/// API routes take precedence; any other request is answered from the configured public
/// directory, falling back to its entry page. That includes a `GET` on a single document path,
/// which has no API handler of its own.
pub fn build_router(documents: DocumentService, cfg: &RestConfig) -> Router {
    let public_dir = cfg.public_dir();
    let static_files = ServeDir::new(public_dir)
        .fallback(ServeFile::new(public_dir.join(config::ENTRY_PAGE)));

    Router::new()
        .route("/health", get(health))
        .route(
            DOCUMENTS_PATH,
            get(list_documents).post(create_document),
        )
        .route(
            &format!("{DOCUMENTS_PATH}/:id"),
            axum::routing::put(update_document)
                .delete(delete_document)
                .fallback_service(static_files.clone()),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(static_files)
        .layer(cors_layer(cfg))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(documents))
}

fn cors_layer(cfg: &RestConfig) -> CorsLayer {
    match cfg.cors_origin() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.clone())
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    }
}

/// Serve `app` on an already-bound listener until Ctrl-C.
///
/// # Errors
/// Returns an error if the HTTP server fails while running.
pub async fn serve(listener: tokio::net::TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("-- Quill REST API listening on {}", addr);
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Malformed or non-JSON bodies get the same `{error}` shape as store failures.
fn rejection_response(rejection: JsonRejection) -> ApiError {
    tracing::warn!("rejected request body: {}", rejection.body_text());
    (
        rejection.status(),
        Json(ErrorRes {
            error: rejection.body_text(),
        }),
    )
}

fn error_response(err: CoreError) -> ApiError {
    let status = match err {
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorRes {
            error: err.to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/documents",
    responses(
        (status = 200, description = "All documents in store order", body = [DocumentRes]),
        (status = 500, description = "Store failure", body = ErrorRes)
    )
)]
/// List every stored document.
///
/// # Errors
/// Returns `500 Internal Server Error` with the store's message if listing fails.
#[axum::debug_handler]
async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentRes>>, ApiError> {
    let documents = state.documents.list_all().map_err(error_response)?;
    Ok(Json(documents.into_iter().map(DocumentRes::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = DocumentReq,
    responses(
        (status = 201, description = "Document created", body = DocumentRes),
        (status = 400, description = "Body is not valid JSON", body = ErrorRes),
        (status = 415, description = "Body is not `application/json`", body = ErrorRes),
        (status = 422, description = "Body has the wrong shape", body = ErrorRes),
        (status = 500, description = "Store failure", body = ErrorRes)
    )
)]
/// Create a document; the store assigns its id.
///
/// Fields are not validated here.
///
/// # Errors
/// Returns the JSON rejection status for an unreadable body, and `500 Internal Server Error`
/// with the store's message if the store rejects the write.
#[axum::debug_handler]
async fn create_document(
    State(state): State<AppState>,
    payload: Result<Json<DocumentReq>, JsonRejection>,
) -> Result<(StatusCode, Json<DocumentRes>), ApiError> {
    let Json(req) = payload.map_err(rejection_response)?;
    let doc = state
        .documents
        .create(req.into())
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(doc.into())))
}

#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    params(("id" = String, Path, description = "Document id")),
    request_body = DocumentReq,
    responses(
        (status = 200, description = "Document updated", body = DocumentRes),
        (status = 400, description = "Body is not valid JSON", body = ErrorRes),
        (status = 404, description = "No document with that id", body = ErrorRes),
        (status = 415, description = "Body is not `application/json`", body = ErrorRes),
        (status = 422, description = "Body has the wrong shape", body = ErrorRes),
        (status = 500, description = "Store failure", body = ErrorRes)
    )
)]
/// Replace the fields of an existing document.
///
/// # Errors
/// Returns `404 Not Found` for an unknown id and `500 Internal Server Error` on store failure.
#[axum::debug_handler]
async fn update_document(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    payload: Result<Json<DocumentReq>, JsonRejection>,
) -> Result<Json<DocumentRes>, ApiError> {
    let Json(req) = payload.map_err(rejection_response)?;
    let doc = state
        .documents
        .update_by_id(&DocumentId::new(id), req.into())
        .map_err(error_response)?;
    Ok(Json(doc.into()))
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document deleted (or already absent)", body = MessageRes),
        (status = 500, description = "Store failure", body = ErrorRes)
    )
)]
/// Delete a document. Deleting an unknown id succeeds.
///
/// # Errors
/// Returns `500 Internal Server Error` with the store's message on store failure.
#[axum::debug_handler]
async fn delete_document(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state
        .documents
        .delete_by_id(&DocumentId::new(id))
        .map_err(error_response)?;
    Ok(Json(MessageRes {
        message: DELETED_MESSAGE.into(),
    }))
}
