use pizza_restaurant_service::serializer::CreateRestaurantPizzaRequest;
use pizza_restaurant_service::service::PizzaService;
use pizza_restaurant_service::{establish_pool, run_migrations, Config};
use tracing::info;

const RESTAURANTS: &[(&str, &str)] = &[
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: &[(&str, &str)] = &[
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price)
const OFFERS: &[(usize, usize, f64)] = &[(0, 0, 1.0), (1, 1, 4.0), (2, 2, 5.0)];

pub fn main(reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = establish_pool(&config)?;
    run_migrations(&pool)?;

    let mut conn = pool.get()?;
    let mut service = PizzaService::new(&mut conn);

    if reset {
        info!("Clearing existing rows");
        service.clear_all()?;
    }

    let restaurants = RESTAURANTS
        .iter()
        .map(|&(name, address)| service.create_restaurant(name, Some(address)))
        .collect::<Result<Vec<_>, _>>()?;
    let pizzas = PIZZAS
        .iter()
        .map(|&(name, ingredients)| service.create_pizza(name, Some(ingredients)))
        .collect::<Result<Vec<_>, _>>()?;

    for &(restaurant, pizza, price) in OFFERS {
        service.create_restaurant_pizza(&CreateRestaurantPizzaRequest {
            price: Some(price),
            pizza_id: Some(pizzas[pizza].id),
            restaurant_id: Some(restaurants[restaurant].id),
        })?;
    }

    info!(
        restaurants = restaurants.len(),
        pizzas = pizzas.len(),
        offers = OFFERS.len(),
        "Seeded {}",
        config.database_url
    );
    Ok(())
}
