use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models;

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantSummary {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PizzaSummary {
    pub id: i32,
    pub name: String,
    pub ingredients: Option<String>,
}

/// An association row as nested under its restaurant.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantPizzaEntry {
    pub id: i32,
    pub pizza: PizzaSummary,
    pub pizza_id: i32,
    pub price: f64,
    pub restaurant_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantDetails {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub restaurant_pizzas: Vec<RestaurantPizzaEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedRestaurantPizza {
    pub id: i32,
    pub pizza: PizzaSummary,
    pub pizza_id: i32,
    pub price: f64,
    pub restaurant: RestaurantSummary,
    pub restaurant_id: i32,
}

/// Body of `POST /restaurant_pizzas`. Every field is optional here so that a
/// missing one surfaces as a validation error instead of a decode failure.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    pub price: Option<f64>,
    pub pizza_id: Option<i32>,
    pub restaurant_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub errors: Vec<String>,
}

pub fn serialize_restaurant_summary(restaurant: &models::Restaurant) -> RestaurantSummary {
    RestaurantSummary {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza_summary(pizza: &models::Pizza) -> PizzaSummary {
    PizzaSummary {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

pub fn serialize_restaurant_details(
    restaurant: &models::Restaurant,
    restaurant_pizzas: &[(models::RestaurantPizza, models::Pizza)],
) -> RestaurantDetails {
    RestaurantDetails {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: restaurant_pizzas
            .iter()
            .map(|(rp, pizza)| RestaurantPizzaEntry {
                id: rp.id,
                pizza: serialize_pizza_summary(pizza),
                pizza_id: rp.pizza_id,
                price: rp.price,
                restaurant_id: rp.restaurant_id,
            })
            .collect(),
    }
}

pub fn serialize_created_restaurant_pizza(
    restaurant_pizza: &models::RestaurantPizza,
    pizza: &models::Pizza,
    restaurant: &models::Restaurant,
) -> CreatedRestaurantPizza {
    CreatedRestaurantPizza {
        id: restaurant_pizza.id,
        pizza: serialize_pizza_summary(pizza),
        pizza_id: restaurant_pizza.pizza_id,
        price: restaurant_pizza.price,
        restaurant: serialize_restaurant_summary(restaurant),
        restaurant_id: restaurant_pizza.restaurant_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_restaurant_details_nests_pizzas() {
        let restaurant = models::Restaurant {
            id: 1,
            name: "A".to_string(),
            address: Some("X".to_string()),
        };
        let pizza = models::Pizza {
            id: 2,
            name: "Cheese".to_string(),
            ingredients: Some("Dough,Cheese".to_string()),
        };
        let rp = models::RestaurantPizza {
            id: 3,
            price: 12.5,
            pizza_id: 2,
            restaurant_id: 1,
        };

        let value = serde_json::to_value(serialize_restaurant_details(&restaurant, &[(rp, pizza)]))
            .unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "A",
                "address": "X",
                "restaurant_pizzas": [{
                    "id": 3,
                    "pizza": {"id": 2, "name": "Cheese", "ingredients": "Dough,Cheese"},
                    "pizza_id": 2,
                    "price": 12.5,
                    "restaurant_id": 1
                }]
            })
        );
    }

    #[test]
    fn test_summary_omits_nested_data() {
        let restaurant = models::Restaurant {
            id: 7,
            name: "B".to_string(),
            address: None,
        };
        let value = serde_json::to_value(serialize_restaurant_summary(&restaurant)).unwrap();
        assert_eq!(value, json!({"id": 7, "name": "B", "address": null}));
    }

    #[test]
    fn test_request_fields_are_optional() {
        let request: CreateRestaurantPizzaRequest =
            serde_json::from_str(r#"{"price": 5}"#).unwrap();
        assert_eq!(request.price, Some(5.0));
        assert_eq!(request.pizza_id, None);
        assert_eq!(request.restaurant_id, None);
    }
}
