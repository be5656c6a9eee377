pub mod index;
pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;
use crate::service::{PizzaService, ServiceError};
use crate::DbPool;

/// Handler context, built once at startup from the configured pool and
/// cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Runs `f` against a pooled connection on the blocking thread pool.
    async fn with_service<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut PizzaService<'_>) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let mut service = PizzaService::new(&mut conn);
            f(&mut service)
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("Blocking task failed: {e}")))?
        .map_err(ApiError::from)
    }
}

/// Path ids that are not integers can never match a row.
fn parse_id(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(index::router())
        .merge(restaurant::router())
        .merge(pizza::router())
        .merge(restaurant_pizza::router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        index::index,
        restaurant::list_restaurants,
        restaurant::get_restaurant,
        restaurant::delete_restaurant,
        pizza::list_pizzas,
        restaurant_pizza::create_restaurant_pizza,
    ),
    components(
        schemas(
            crate::serializer::RestaurantSummary,
            crate::serializer::PizzaSummary,
            crate::serializer::RestaurantPizzaEntry,
            crate::serializer::RestaurantDetails,
            crate::serializer::CreatedRestaurantPizza,
            crate::serializer::CreateRestaurantPizzaRequest,
            crate::serializer::ApiErrorResponse,
            crate::serializer::ValidationErrorResponse,
        )
    ),
    tags(
        (name = "restaurants", description = "Restaurant listing, detail and removal"),
        (name = "pizzas", description = "Pizza catalogue"),
        (name = "restaurant_pizzas", description = "Pizzas offered by restaurants")
    ),
    info(
        title = "Pizza Restaurant Service",
        description = "Restaurants, pizzas and the prices restaurants charge for them",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
