use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, uri::PathAndQuery, StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use todo_core::{ItemStore, TodoItem, TodoService};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;

/// Base path of the todo resource.
pub const TODO_ROUTE: &str = "/api/Todo";

pub type SharedService<S> = Arc<Mutex<TodoService<S>>>;

/// Builds the todo router. The resource path matches case-insensitively and
/// tolerates a trailing slash.
pub fn router<S>(service: TodoService<S>) -> Router
where
    S: ItemStore + Send + 'static,
{
    let state: SharedService<S> = Arc::new(Mutex::new(service));
    let routes = Router::new()
        .route(TODO_ROUTE, get(list_items::<S>).post(create_item::<S>))
        .route(
            &format!("{TODO_ROUTE}/{{id}}"),
            get(get_item::<S>).put(update_item::<S>).delete(delete_item::<S>),
        )
        .with_state(state);

    // The rewrite has to run before routing, so the routes sit behind a
    // fallback of an outer router that carries the middleware.
    Router::new()
        .fallback_service(routes)
        .layer(middleware::map_request(canonicalize_request))
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG`
/// (default `info`). Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Path under which the item with `id` is served by `get_item`.
pub fn item_location(id: i64) -> String {
    format!("{TODO_ROUTE}/{id}")
}

/// Rewrites any casing of the resource prefix to `TODO_ROUTE` and drops
/// trailing slashes. Returns `None` when `path` is already canonical.
fn canonical_path(path: &str) -> Option<String> {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    let prefix_len = TODO_ROUTE.len();
    let canonical = match trimmed.get(..prefix_len) {
        Some(head)
            if head.eq_ignore_ascii_case(TODO_ROUTE)
                && matches!(trimmed.as_bytes().get(prefix_len), None | Some(b'/')) =>
        {
            format!("{TODO_ROUTE}{}", &trimmed[prefix_len..])
        }
        _ => trimmed.to_string(),
    };

    (canonical != path).then_some(canonical)
}

async fn canonicalize_request(mut request: Request) -> Request {
    let Some(path) = canonical_path(request.uri().path()) else {
        return request;
    };
    let path_and_query = match request.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = path_and_query.parse::<PathAndQuery>().ok();
    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }
    request
}

/// Path ids that are not an `i64` bind to `0`, which the store never
/// assigns, so they fall through to the regular not-found handling.
fn parse_id(raw: &str) -> i64 {
    raw.parse::<i64>().unwrap_or_else(|err| {
        debug!(raw, %err, "unparsable todo id");
        0
    })
}

/// An empty body or a JSON `null` is an absent item; anything else must be
/// a JSON object holding an item.
fn parse_item(body: &[u8]) -> Result<Option<TodoItem>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|err| {
        debug!(%err, "malformed todo item body");
        ApiError::BadRequest
    })?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(_) => serde_json::from_value(value).map(Some).map_err(|err| {
            debug!(%err, "malformed todo item body");
            ApiError::BadRequest
        }),
        _ => {
            debug!("todo item body is not a JSON object");
            Err(ApiError::BadRequest)
        }
    }
}

async fn list_items<S: ItemStore + Send + 'static>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Vec<TodoItem>>, ApiError> {
    let items = service.lock().await.list_all()?;
    Ok(Json(items))
}

async fn get_item<S: ItemStore + Send + 'static>(
    State(service): State<SharedService<S>>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    let item = service.lock().await.get_by_id(parse_id(&id))?;
    Ok(Json(item))
}

async fn create_item<S: ItemStore + Send + 'static>(
    State(service): State<SharedService<S>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let input = parse_item(&body)?;
    let created = service.lock().await.create(input)?;
    let location = item_location(created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

async fn update_item<S: ItemStore + Send + 'static>(
    State(service): State<SharedService<S>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let input = parse_item(&body)?;
    service.lock().await.update(parse_id(&id), input)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_item<S: ItemStore + Send + 'static>(
    State(service): State<SharedService<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.lock().await.delete(parse_id(&id))?;
    Ok(StatusCode::NO_CONTENT)
}
