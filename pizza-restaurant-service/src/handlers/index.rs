use axum::{response::Html, routing::get, Router};

use super::AppState;

pub const BANNER: &str = "<h1>Code challenge</h1>";

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "HTML banner", body = String, content_type = "text/html"),
    )
)]
pub async fn index() -> Html<&'static str> {
    Html(BANNER)
}
