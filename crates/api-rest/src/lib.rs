//! # API REST
//!
//! REST API for MedCodes.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (query-string parsing, status codes, CORS)
//!
//! The catalog is read-only, so every endpoint is a `GET` over a shared [`CodeCatalog`]. Per-user
//! state (favourites, history, sign-in) is not exposed over HTTP.

#![warn(rust_2018_idioms)]

use api_shared::wire::{
    BrowseRes, CategoryGroupRes, CoverageRes, HealthRes, MedicalCodeRes, SearchCodesReq,
    SearchCodesRes, StatsRes,
};
use api_shared::HealthService;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use medcodes_core::{browse, search_codes, CatalogStats, CodeCatalog};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<CodeCatalog>,
}

impl AppState {
    pub fn new(catalog: Arc<CodeCatalog>) -> Self {
        Self { catalog }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, search, browse_codes, get_code, stats),
    components(schemas(
        HealthRes,
        SearchCodesReq,
        SearchCodesRes,
        MedicalCodeRes,
        CoverageRes,
        BrowseRes,
        CategoryGroupRes,
        StatsRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST application: API routes, Swagger UI at `/swagger-ui` and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/codes/search", get(search))
        .route("/codes/browse", get(browse_codes))
        .route("/codes/:id", get(get_code))
        .route("/stats", get(stats))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports the service as alive together with the size of the loaded catalog.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.catalog.len()))
}

#[utoipa::path(
    get,
    path = "/codes/search",
    params(SearchCodesReq),
    responses(
        (status = 200, description = "Matching codes, truncated to `limit`", body = SearchCodesRes),
        (status = 400, description = "Unknown type or limit outside 1..=100")
    )
)]
/// Search the catalog
///
/// Case-insensitive substring match on code and description, optionally restricted to one code
/// type. `total` counts every match before the page is cut to `limit`.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - `type` is not `CPT`, `ICD-10` or `All`,
/// - `limit` is outside `1..=100`.
#[axum::debug_handler]
async fn search(
    State(state): State<AppState>,
    Query(req): Query<SearchCodesReq>,
) -> Result<Json<SearchCodesRes>, (StatusCode, String)> {
    match search_codes(&state.catalog, &req) {
        Ok(res) => Ok(Json(res)),
        Err(e) => {
            tracing::debug!("Rejected search request: {}", e);
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/codes/browse",
    responses(
        (status = 200, description = "Codes grouped by specialty, populated categories only", body = BrowseRes)
    )
)]
#[axum::debug_handler]
async fn browse_codes(State(state): State<AppState>) -> Json<BrowseRes> {
    Json(browse(&state.catalog).to_wire())
}

#[utoipa::path(
    get,
    path = "/codes/{id}",
    params(
        ("id" = String, Path, description = "Catalog id of the code")
    ),
    responses(
        (status = 200, description = "The code", body = MedicalCodeRes),
        (status = 404, description = "No code with this id")
    )
)]
/// Fetch a single code by catalog id
#[axum::debug_handler]
async fn get_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MedicalCodeRes>, (StatusCode, &'static str)> {
    state
        .catalog
        .get(&id)
        .map(|code| Json(code.to_wire()))
        .ok_or((StatusCode::NOT_FOUND, "Code not found"))
}

#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Catalog statistics", body = StatsRes)
    )
)]
#[axum::debug_handler]
async fn stats(State(state): State<AppState>) -> Json<StatsRes> {
    Json(CatalogStats::compute(&state.catalog).to_wire())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let catalog = Arc::new(CodeCatalog::builtin().unwrap());
        router(AppState::new(catalog))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_catalog_size() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["catalog_size"], 15);
    }

    #[tokio::test]
    async fn search_defaults_to_whole_catalog() {
        let (status, body) = get_json("/codes/search").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 15);
        assert_eq!(body["codes"].as_array().unwrap().len(), 15);
        assert_eq!(body["query"], "");
        assert_eq!(body["type"], "All");
    }

    #[tokio::test]
    async fn search_filters_by_type_and_truncates() {
        let (status, body) = get_json("/codes/search?type=CPT&limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 9);
        let codes = body["codes"].as_array().unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0]["code"], "99213");
        assert_eq!(codes[0]["type"], "CPT");
        assert_eq!(codes[0]["category"], "E&M");
    }

    #[tokio::test]
    async fn search_matches_description_case_insensitively() {
        let (status, body) = get_json("/codes/search?query=DIABETES").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["codes"][0]["code"], "E11.9");
        assert_eq!(body["query"], "DIABETES");
    }

    #[tokio::test]
    async fn search_rejects_bad_parameters() {
        let (status, _) = get_json("/codes/search?limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/codes/search?limit=101").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/codes/search?type=HCPCS").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_code_by_id() {
        let (status, body) = get_json("/codes/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "E11.9");
        assert_eq!(body["category"], "Endocrine");

        let (status, _) = get_json("/codes/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn browse_lists_populated_categories() {
        let (status, body) = get_json("/codes/browse").await;
        assert_eq!(status, StatusCode::OK);
        let categories = body["categories"].as_array().unwrap();
        assert_eq!(categories[0]["category"], "E&M");
        assert_eq!(categories[0]["count"], 3);
        let total: u64 = categories.iter().map(|c| c["count"].as_u64().unwrap()).sum();
        assert_eq!(total, 15);
    }

    #[tokio::test]
    async fn stats_match_catalog() {
        let (status, body) = get_json("/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_codes"], 15);
        assert_eq!(body["cpt_codes"], 9);
        assert_eq!(body["coverage_percentage"], 80);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = get_json("/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/codes/search"].is_object());
    }
}
