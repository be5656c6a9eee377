//! Checks run on a new restaurant/pizza association before it is written.
//!
//! Every problem is collected rather than stopping at the first one, so the
//! log line for a rejected request names all offending fields. Callers still
//! only ever see the generic `validation errors` body.

use crate::models::{NewRestaurantPizza, Pizza, Restaurant};
use crate::serializer::CreateRestaurantPizzaRequest;

pub const MIN_PRICE: f64 = 1.0;
pub const MAX_PRICE: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A request that passed validation, together with the rows it references.
#[derive(Debug)]
pub struct ValidRestaurantPizza<'a> {
    pub row: NewRestaurantPizza,
    pub pizza: &'a Pizza,
    pub restaurant: &'a Restaurant,
}

pub fn validate_price(price: Option<f64>) -> Result<f64, FieldError> {
    match price {
        None => Err(FieldError::new("price", "is required")),
        Some(price) if (MIN_PRICE..=MAX_PRICE).contains(&price) => Ok(price),
        Some(_) => Err(FieldError::new(
            "price",
            format!("must be between {MIN_PRICE} and {MAX_PRICE}"),
        )),
    }
}

fn validate_reference<'a, T>(
    field: &'static str,
    id: Option<i32>,
    found: Option<&'a T>,
) -> Result<(i32, &'a T), FieldError> {
    match (id, found) {
        (None, _) => Err(FieldError::new(field, "is required")),
        (Some(id), Some(row)) => Ok((id, row)),
        (Some(id), None) => Err(FieldError::new(field, format!("{id} does not exist"))),
    }
}

/// `pizza` and `restaurant` are the rows looked up for the request's ids, or
/// `None` when the id was absent or matched nothing.
pub fn validate_restaurant_pizza<'a>(
    request: &CreateRestaurantPizzaRequest,
    pizza: Option<&'a Pizza>,
    restaurant: Option<&'a Restaurant>,
) -> Result<ValidRestaurantPizza<'a>, Vec<FieldError>> {
    let price = validate_price(request.price);
    let pizza = validate_reference("pizza_id", request.pizza_id, pizza);
    let restaurant = validate_reference("restaurant_id", request.restaurant_id, restaurant);

    match (price, pizza, restaurant) {
        (Ok(price), Ok((pizza_id, pizza)), Ok((restaurant_id, restaurant))) => {
            Ok(ValidRestaurantPizza {
                row: NewRestaurantPizza {
                    price,
                    pizza_id,
                    restaurant_id,
                },
                pizza,
                restaurant,
            })
        }
        (price, pizza, restaurant) => Err([price.err(), pizza.err(), restaurant.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza() -> Pizza {
        Pizza {
            id: 1,
            name: "Cheese".to_string(),
            ingredients: Some("Dough,Cheese".to_string()),
        }
    }

    fn restaurant() -> Restaurant {
        Restaurant {
            id: 4,
            name: "A".to_string(),
            address: Some("X".to_string()),
        }
    }

    fn request(price: f64) -> CreateRestaurantPizzaRequest {
        CreateRestaurantPizzaRequest {
            price: Some(price),
            pizza_id: Some(1),
            restaurant_id: Some(4),
        }
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        assert_eq!(validate_price(Some(1.0)), Ok(1.0));
        assert_eq!(validate_price(Some(30.0)), Ok(30.0));
        assert!(validate_price(Some(0.99)).is_err());
        assert!(validate_price(Some(30.5)).is_err());
        assert!(validate_price(Some(f64::NAN)).is_err());
        assert_eq!(
            validate_price(None),
            Err(FieldError::new("price", "is required"))
        );
    }

    #[test]
    fn test_valid_request() {
        let (pizza, restaurant) = (pizza(), restaurant());
        let valid =
            validate_restaurant_pizza(&request(10.0), Some(&pizza), Some(&restaurant)).unwrap();

        assert_eq!(
            valid.row,
            NewRestaurantPizza {
                price: 10.0,
                pizza_id: 1,
                restaurant_id: 4,
            }
        );
        assert_eq!(valid.pizza.name, "Cheese");
        assert_eq!(valid.restaurant.name, "A");
    }

    #[test]
    fn test_missing_references_are_all_reported() {
        let errors = validate_restaurant_pizza(&request(40.0), None, None).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["price", "pizza_id", "restaurant_id"]);
        assert_eq!(errors[1].message, "1 does not exist");
    }

    #[test]
    fn test_empty_request() {
        let errors =
            validate_restaurant_pizza(&CreateRestaurantPizzaRequest::default(), None, None)
                .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.message == "is required"));
    }
}
