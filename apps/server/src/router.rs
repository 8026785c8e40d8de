//! Top-level router: system routes, `/api` feature routes and the API documentation.

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use mcq::domain::config::ServerConfig;
use mcq::kernel::prelude::ApiState;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::Config;

pub const DOCS_PATH: &str = "/docs";
pub const REDOC_PATH: &str = "/redoc";
pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "MCQ Platform API", description = "Multiple-choice quizzes: accounts, test papers, questions and scored results"),
    modifiers(&BearerAuth),
    tags(
        (name = "System", description = "Greeting, health and database probes"),
        (name = "Authentication", description = "Accounts and access tokens"),
        (name = "Test Papers", description = "Test papers and their submission"),
        (name = "Questions", description = "Question bank"),
        (name = "Results", description = "Scored submissions"),
    )
)]
struct ApiDoc;

/// Registers the `bearer` scheme referenced by the protected routes.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

/// `*` anywhere in the list allows every origin; otherwise only the listed ones, with credentials.
///
/// # Errors
/// An origin that is not a valid header value.
pub fn cors_layer(server: &ServerConfig) -> Result<CorsLayer> {
    if server.allows_any_origin() {
        return Ok(CorsLayer::permissive());
    }

    let origins = server
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim()).with_context(|| format!("Invalid CORS origin '{origin}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

#[derive(Debug, Clone)]
struct Docs {
    config: Arc<Config<'static>>,
    openapi: Arc<utoipa::openapi::OpenApi>,
}

/// Swagger UI with its page at exactly [`DOCS_PATH`] and the assets below it.
///
/// The bundled page links its assets relatively, so it gets a `<base>` pointing at `/docs/`.
fn swagger_ui(openapi: utoipa::openapi::OpenApi) -> Router {
    let docs = Docs { config: Arc::new(Config::from(OPENAPI_PATH)), openapi: Arc::new(openapi) };

    Router::new()
        .route(OPENAPI_PATH, get(openapi_json))
        .route(DOCS_PATH, get(swagger_index))
        .route(&format!("{DOCS_PATH}/"), get(swagger_index))
        .route(&format!("{DOCS_PATH}/{{*asset}}"), get(swagger_asset))
        .with_state(docs)
}

async fn openapi_json(State(docs): State<Docs>) -> Json<utoipa::openapi::OpenApi> {
    Json(docs.openapi.as_ref().clone())
}

async fn swagger_index(State(docs): State<Docs>) -> Response {
    swagger_file("", docs.config)
}

async fn swagger_asset(Path(asset): Path<String>, State(docs): State<Docs>) -> Response {
    swagger_file(&asset, docs.config)
}

fn swagger_file(path: &str, config: Arc<Config<'static>>) -> Response {
    match utoipa_swagger_ui::serve(path, config) {
        Ok(Some(file)) if path.is_empty() => {
            let base = format!("<head>\n    <base href=\"{DOCS_PATH}/\">");
            let page = String::from_utf8_lossy(&file.bytes).replacen("<head>", &base, 1);
            ([(header::CONTENT_TYPE, file.content_type)], page).into_response()
        },
        Ok(Some(file)) => {
            ([(header::CONTENT_TYPE, file.content_type)], file.bytes.into_owned()).into_response()
        },
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!(error = %err, path, "Failed to render Swagger UI");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        },
    }
}

pub fn init(state: ApiState, cors: CorsLayer) -> Router {
    // Separate the OpenAPI routes and the API documentation object
    let (routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(mcq::server::router::system_router())
        .merge(mcq::api_router())
        .with_state(state)
        .split_for_parts();

    let swagger = swagger_ui(api_doc.clone());
    let redoc = Redoc::with_url(REDOC_PATH, api_doc);

    Router::new()
        .merge(routes)
        .merge(swagger)
        .merge(redoc)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
