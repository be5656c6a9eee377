use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::serializer::*;
use crate::validation::FieldError;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Pizza added to the restaurant", body = CreatedRestaurantPizza),
        (status = 400, description = "Validation errors", body = ValidationErrorResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state, payload))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedRestaurantPizza>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(%rejection, "Malformed restaurant pizza payload");
        ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
    })?;

    let (restaurant_pizza, pizza, restaurant) = state
        .with_service(move |service| service.create_restaurant_pizza(&payload))
        .await?;
    info!(
        id = restaurant_pizza.id,
        restaurant_id = restaurant.id,
        pizza_id = pizza.id,
        "Restaurant pizza created"
    );

    Ok((
        StatusCode::CREATED,
        Json(serialize_created_restaurant_pizza(
            &restaurant_pizza,
            &pizza,
            &restaurant,
        )),
    ))
}
