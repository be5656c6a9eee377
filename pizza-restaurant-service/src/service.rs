use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;
use tracing::{debug, warn};

use crate::models::{self, NewPizza, NewRestaurant};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::serializer::CreateRestaurantPizzaRequest;
use crate::validation::{validate_restaurant_pizza, FieldError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldError>),
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

/// Restaurant, pizza and association operations over a single connection.
/// Each mutating call runs in its own transaction. Calls that read before
/// writing take the write lock up front so concurrent writers wait on the
/// busy timeout instead of failing.
pub struct PizzaService<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> PizzaService<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub fn list_restaurants(&mut self) -> Result<Vec<models::Restaurant>, ServiceError> {
        let results = restaurants::table
            .select(models::Restaurant::as_select())
            .order(restaurants::id.asc())
            .load(self.conn)?;
        Ok(results)
    }

    pub fn get_restaurant(
        &mut self,
        restaurant_id: i32,
    ) -> Result<(models::Restaurant, Vec<(models::RestaurantPizza, models::Pizza)>), ServiceError>
    {
        let restaurant = restaurants::table
            .find(restaurant_id)
            .select(models::Restaurant::as_select())
            .first(self.conn)
            .optional()?
            .ok_or(ServiceError::RestaurantNotFound)?;

        let restaurant_pizzas = models::RestaurantPizza::belonging_to(&restaurant)
            .inner_join(pizzas::table)
            .select((
                models::RestaurantPizza::as_select(),
                models::Pizza::as_select(),
            ))
            .order(restaurant_pizzas::id.asc())
            .load(self.conn)?;

        Ok((restaurant, restaurant_pizzas))
    }

    /// Removes the restaurant and its association rows. Returns how many
    /// association rows went with it.
    pub fn delete_restaurant(&mut self, restaurant_id: i32) -> Result<usize, ServiceError> {
        self.conn.immediate_transaction::<_, ServiceError, _>(|conn| {
            let removed = diesel::delete(
                restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(restaurant_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(restaurants::table.find(restaurant_id)).execute(conn)?;
            if deleted == 0 {
                return Err(ServiceError::RestaurantNotFound);
            }

            debug!(restaurant_id, removed, "Deleted restaurant");
            Ok(removed)
        })
    }

    pub fn list_pizzas(&mut self) -> Result<Vec<models::Pizza>, ServiceError> {
        let results = pizzas::table
            .select(models::Pizza::as_select())
            .order(pizzas::id.asc())
            .load(self.conn)?;
        Ok(results)
    }

    pub fn create_restaurant_pizza(
        &mut self,
        request: &CreateRestaurantPizzaRequest,
    ) -> Result<(models::RestaurantPizza, models::Pizza, models::Restaurant), ServiceError> {
        self.conn.immediate_transaction::<_, ServiceError, _>(|conn| {
            let pizza = match request.pizza_id {
                Some(id) => pizzas::table
                    .find(id)
                    .select(models::Pizza::as_select())
                    .first(conn)
                    .optional()?,
                None => None,
            };
            let restaurant = match request.restaurant_id {
                Some(id) => restaurants::table
                    .find(id)
                    .select(models::Restaurant::as_select())
                    .first(conn)
                    .optional()?,
                None => None,
            };

            let valid = validate_restaurant_pizza(request, pizza.as_ref(), restaurant.as_ref())
                .map_err(|errors| {
                    warn!(?errors, "Rejected restaurant pizza");
                    ServiceError::Validation(errors)
                })?;

            let created = diesel::insert_into(restaurant_pizzas::table)
                .values(&valid.row)
                .returning(models::RestaurantPizza::as_returning())
                .get_result(conn)
                .map_err(constraint_violation_to_validation)?;

            Ok((created, valid.pizza.clone(), valid.restaurant.clone()))
        })
    }

    pub fn create_restaurant(
        &mut self,
        name: &str,
        address: Option<&str>,
    ) -> Result<models::Restaurant, ServiceError> {
        self.conn.transaction::<_, ServiceError, _>(|conn| {
            let restaurant = diesel::insert_into(restaurants::table)
                .values(NewRestaurant { name, address })
                .returning(models::Restaurant::as_returning())
                .get_result(conn)?;
            Ok(restaurant)
        })
    }

    pub fn create_pizza(
        &mut self,
        name: &str,
        ingredients: Option<&str>,
    ) -> Result<models::Pizza, ServiceError> {
        self.conn.transaction::<_, ServiceError, _>(|conn| {
            let pizza = diesel::insert_into(pizzas::table)
                .values(NewPizza { name, ingredients })
                .returning(models::Pizza::as_returning())
                .get_result(conn)?;
            Ok(pizza)
        })
    }

    /// Empties all three tables.
    pub fn clear_all(&mut self) -> Result<(), ServiceError> {
        self.conn.immediate_transaction::<_, ServiceError, _>(|conn| {
            diesel::delete(restaurant_pizzas::table).execute(conn)?;
            diesel::delete(pizzas::table).execute(conn)?;
            diesel::delete(restaurants::table).execute(conn)?;
            Ok(())
        })
    }
}

/// The store's own constraints back up the explicit checks; a violation
/// caught there is still a validation failure for the caller.
fn constraint_violation_to_validation(err: DieselError) -> ServiceError {
    match err {
        DieselError::DatabaseError(
            kind @ (DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::NotNullViolation),
            info,
        ) => {
            warn!(?kind, message = info.message(), "Constraint rejected restaurant pizza");
            ServiceError::Validation(vec![FieldError::new(
                "restaurant_pizza",
                info.message().to_string(),
            )])
        }
        err => ServiceError::Database(err),
    }
}
