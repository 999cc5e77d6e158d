pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::order_service::OrderService;
pub use db::{create_pool, DbPool};
pub use infrastructure::order_repo::DieselOrderRepository;

/// The service type the HTTP layer is wired against.
pub type AppOrderService = OrderService<DieselOrderRepository>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::add_item,
        handlers::orders::update_item_quantity,
        handlers::orders::remove_item,
        handlers::orders::place_order,
        handlers::orders::cancel_order,
        handlers::orders::update_order_status,
        handlers::orders::list_orders_by_status,
        handlers::orders::list_active_orders,
        handlers::orders::list_pending_orders,
        handlers::orders::list_customer_orders,
        handlers::orders::customer_order_statistics,
        handlers::orders::list_restaurant_orders,
    ),
    components(schemas(
        handlers::orders::CreateOrderRequest,
        handlers::orders::AddItemRequest,
        handlers::orders::UpdateQuantityRequest,
        handlers::orders::CancelOrderRequest,
        handlers::orders::UpdateStatusRequest,
        handlers::orders::OrderResponse,
        handlers::orders::OrderLineResponse,
        handlers::orders::OrderSummaryResponse,
        handlers::orders::CustomerStatisticsResponse,
    )),
    tags(
        (name = "orders", description = "Cart editing, placement and lifecycle"),
        (name = "customers", description = "Per-customer order queries"),
        (name = "restaurants", description = "Per-restaurant order queries"),
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = OrderService::new(DieselOrderRepository::new(pool));

    Ok(HttpServer::new(move || {
        use handlers::orders as h;

        App::new()
            .app_data(web::Data::new(service.clone()))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(h::create_order))
                    .route("", web::get().to(h::list_orders_by_status))
                    // Literal segments before the `{id}` routes.
                    .route("/active", web::get().to(h::list_active_orders))
                    .route("/pending", web::get().to(h::list_pending_orders))
                    .route("/{id}", web::get().to(h::get_order))
                    .route("/{id}/items", web::post().to(h::add_item))
                    .route("/{id}/items/{item_id}", web::put().to(h::update_item_quantity))
                    .route("/{id}/items/{item_id}", web::delete().to(h::remove_item))
                    .route("/{id}/place", web::post().to(h::place_order))
                    .route("/{id}/cancel", web::post().to(h::cancel_order))
                    .route("/{id}/status", web::put().to(h::update_order_status)),
            )
            .service(
                web::scope("/customers")
                    .route(
                        "/{id}/orders/statistics",
                        web::get().to(h::customer_order_statistics),
                    )
                    .route("/{id}/orders", web::get().to(h::list_customer_orders)),
            )
            .service(
                web::scope("/restaurants")
                    .route("/{id}/orders", web::get().to(h::list_restaurant_orders)),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
