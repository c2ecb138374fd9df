use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{
        FromRequest, FromRequestParts, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use products_hr::{
    CountryMetrics, Employee, EmployeeInput, HrError, HrModule, JobMetrics, SalaryBreakdown,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, instrument};

use crate::{config::AppConfig, graphql::SchemaType};

#[derive(Clone)]
pub struct AppState {
    pub hr: HrModule,
    pub schema: SchemaType,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let title = state.config.title.clone();
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, service = %title, "payroll server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/employees", post(create_employee))
        .route("/employees/", post(create_employee))
        .route(
            "/employees/{id}",
            get(read_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        .route("/employees/{id}/salary", get(salary_breakdown))
        .route("/metrics/country", get(country_metrics))
        .route("/metrics/job_title", get(job_title_metrics))
        .route("/graphql", post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

/// `Json` body whose rejections render as `{"detail"}`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(HttpError))]
struct JsonBody<T>(T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(HttpError))]
struct Path<T>(T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(HttpError))]
struct Query<T>(T);

#[instrument(name = "http.employees.create", skip_all)]
async fn create_employee(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<EmployeeInput>,
) -> HttpResult<Json<Employee>> {
    let employee = state.hr.create_employee(input).await?;
    Ok(Json(employee))
}

#[instrument(name = "http.employees.read", skip(state))]
async fn read_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> HttpResult<Json<Employee>> {
    Ok(Json(state.hr.employee(id).await?))
}

#[instrument(name = "http.employees.update", skip(state, input))]
async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(input): JsonBody<EmployeeInput>,
) -> HttpResult<Json<Employee>> {
    Ok(Json(state.hr.update_employee(id, input).await?))
}

#[instrument(name = "http.employees.delete", skip(state))]
async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> HttpResult<Json<Detail>> {
    state.hr.delete_employee(id).await?;
    Ok(Json(Detail::new("Employee deleted")))
}

#[instrument(name = "http.employees.salary", skip(state))]
async fn salary_breakdown(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> HttpResult<Json<SalaryBreakdown>> {
    Ok(Json(state.hr.salary(id).await?))
}

#[derive(Debug, Deserialize)]
struct CountryQuery {
    country: String,
}

#[derive(Debug, Deserialize)]
struct JobTitleQuery {
    job_title: String,
}

#[instrument(name = "http.metrics.country", skip(state))]
async fn country_metrics(
    State(state): State<AppState>,
    Query(query): Query<CountryQuery>,
) -> HttpResult<Json<CountryMetrics>> {
    Ok(Json(state.hr.country_metrics(&query.country).await?))
}

#[instrument(name = "http.metrics.job_title", skip(state))]
async fn job_title_metrics(
    State(state): State<AppState>,
    Query(query): Query<JobTitleQuery>,
) -> HttpResult<Json<JobMetrics>> {
    Ok(Json(state.hr.job_metrics(&query.job_title).await?))
}

async fn graphql_handler(
    State(state): State<AppState>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(request.into_inner()).await.into()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = platform_db::ping(state.hr.pool()).await;
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        service: state.config.title.clone(),
        version: state.config.version.clone(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    service: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct Detail {
    detail: String,
}

impl Detail {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }
}

impl From<HrError> for HttpError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::Validation(msg) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, msg),
            HrError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            HrError::Storage(err) => {
                error!(error = %err, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(Detail::new(self.message))).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}
