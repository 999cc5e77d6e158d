use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::CustomerOrderStatistics;
use crate::domain::order::Order;
use crate::domain::status::OrderStatus;
use crate::domain::OrderSummary;
use crate::errors::AppError;
use crate::AppOrderService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub delivery_address: String,
    pub contact_phone: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    /// Zero or negative removes the line.
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelOrderRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target status, e.g. "PREPARING".
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Status filter, e.g. "PENDING".
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: String,
    pub delivery_address: String,
    pub contact_phone: String,
    pub notes: Option<String>,
    pub total_amount: String,
    pub estimated_delivery_at: Option<String>,
    pub delivered_at: Option<String>,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl OrderResponse {
    fn from_domain(order: &Order) -> Self {
        Self {
            id: order.id(),
            customer_id: order.customer_id(),
            restaurant_id: order.restaurant_id(),
            status: order.status().as_str().to_string(),
            delivery_address: order.delivery_address().to_string(),
            contact_phone: order.contact_phone().to_string(),
            notes: order.notes().map(str::to_string),
            total_amount: order.total().to_string(),
            estimated_delivery_at: order.estimated_delivery_at().map(|t| t.to_rfc3339()),
            delivered_at: order.delivered_at().map(|t| t.to_rfc3339()),
            created_at: order.created_at().to_rfc3339(),
            lines: order
                .lines()
                .iter()
                .map(|l| OrderLineResponse {
                    menu_item_id: l.menu_item_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummaryResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: String,
    pub total_amount: String,
    pub estimated_delivery_at: Option<String>,
    pub created_at: String,
}

impl OrderSummaryResponse {
    fn from_summary(summary: OrderSummary) -> Self {
        Self {
            id: summary.id,
            customer_id: summary.customer_id,
            restaurant_id: summary.restaurant_id,
            status: summary.status.as_str().to_string(),
            total_amount: summary.total_amount.to_string(),
            estimated_delivery_at: summary.estimated_delivery_at.map(|t| t.to_rfc3339()),
            created_at: summary.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerStatisticsResponse {
    pub total_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    pub total_spent: String,
}

impl CustomerStatisticsResponse {
    fn from_domain(stats: CustomerOrderStatistics) -> Self {
        Self {
            total_orders: stats.total_orders,
            completed_orders: stats.completed_orders,
            cancelled_orders: stats.cancelled_orders,
            total_spent: stats.total_spent.to_string(),
        }
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, AppError> {
    s.parse::<OrderStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn summaries(list: Vec<OrderSummary>) -> Vec<OrderSummaryResponse> {
    list.into_iter()
        .map(OrderSummaryResponse::from_summary)
        .collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Opens a new cart (a PENDING order with no lines) for a customer at an
/// approved restaurant.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Restaurant not found"),
        (status = 422, description = "Restaurant not approved"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppOrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let service = service.get_ref().clone();

    let order = web::block(move || {
        service.create_order(
            body.customer_id,
            body.restaurant_id,
            &body.delivery_address,
            &body.contact_phone,
            body.notes,
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from_domain(&order)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let service = service.get_ref().clone();

    let order = web::block(move || service.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from_domain(&order))),
        None => Err(AppError::NotFound("Order not found".to_string())),
    }
}

/// POST /orders/{id}/items
///
/// Adds an item to a PENDING cart, merging with an existing line for the
/// same item. Stock is pre-checked but not reserved.
#[utoipa::path(
    post,
    path = "/orders/{id}/items",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Cart updated", body = OrderResponse),
        (status = 404, description = "Order or item not found"),
        (status = 422, description = "Order not modifiable, item unavailable or out of stock"),
    ),
    tag = "orders"
)]
pub async fn add_item(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();
    let service = service.get_ref().clone();

    let order = web::block(move || service.add_item(order_id, body.menu_item_id, body.quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from_domain(&order)))
}

/// PUT /orders/{id}/items/{item_id}
///
/// Sets the exact quantity of an item in the cart; zero or negative removes
/// the line.
#[utoipa::path(
    put,
    path = "/orders/{id}/items/{item_id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("item_id" = Uuid, Path, description = "Menu item UUID"),
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Cart updated", body = OrderResponse),
        (status = 404, description = "Order or item not found"),
        (status = 422, description = "Order not modifiable or item unavailable"),
    ),
    tag = "orders"
)]
pub async fn update_item_quantity(
    service: web::Data<AppOrderService>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let (order_id, item_id) = path.into_inner();
    let quantity = body.into_inner().quantity;
    let service = service.get_ref().clone();

    let order = web::block(move || service.update_quantity(order_id, item_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from_domain(&order)))
}

/// DELETE /orders/{id}/items/{item_id}
///
/// Removes a line from the cart. Removing an absent line succeeds.
#[utoipa::path(
    delete,
    path = "/orders/{id}/items/{item_id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("item_id" = Uuid, Path, description = "Menu item UUID"),
    ),
    responses(
        (status = 200, description = "Cart updated", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Order not modifiable"),
    ),
    tag = "orders"
)]
pub async fn remove_item(
    service: web::Data<AppOrderService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (order_id, item_id) = path.into_inner();
    let service = service.get_ref().clone();

    let order = web::block(move || service.remove_item(order_id, item_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from_domain(&order)))
}

/// POST /orders/{id}/place
///
/// Confirms the cart: re-validates every line against live stock under row
/// locks, decrements the stock and stamps the delivery estimate. Fails
/// all-or-nothing; a 409 means a concurrent order consumed the stock first.
#[utoipa::path(
    post,
    path = "/orders/{id}/place",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order confirmed", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Stock consumed by a concurrent order"),
        (status = 422, description = "Order empty, not pending, or item unavailable"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let service = service.get_ref().clone();

    let order = web::block(move || service.place_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from_domain(&order)))
}

/// POST /orders/{id}/cancel
///
/// Cancels the order, restoring stock consumed by a prior placement.
#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Order cannot be cancelled from its current status"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
    body: Option<web::Json<CancelOrderRequest>>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let reason = body.and_then(|b| b.into_inner().reason);
    let service = service.get_ref().clone();

    let order = web::block(move || service.cancel_order(order_id, reason))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from_domain(&order)))
}

/// PUT /orders/{id}/status
///
/// Generic kitchen/courier progress per the transition table. Placement and
/// cancellation have their own endpoints and are refused here.
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status or reserved transition"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Illegal transition"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = parse_status(&body.into_inner().status)?;
    let service = service.get_ref().clone();

    let order = web::block(move || service.update_status(order_id, status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from_domain(&order)))
}

/// GET /orders?status=…
#[utoipa::path(
    get,
    path = "/orders",
    params(("status" = String, Query, description = "Status filter, e.g. PENDING")),
    responses(
        (status = 200, description = "Orders with the given status", body = [OrderSummaryResponse]),
        (status = 400, description = "Unknown status"),
    ),
    tag = "orders"
)]
pub async fn list_orders_by_status(
    service: web::Data<AppOrderService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let status = parse_status(&query.into_inner().status)?;
    let service = service.get_ref().clone();

    let list = web::block(move || service.get_orders_by_status(status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(summaries(list)))
}

/// GET /orders/active
///
/// Placed orders still in flight (CONFIRMED through OUT_FOR_DELIVERY).
#[utoipa::path(
    get,
    path = "/orders/active",
    responses(
        (status = 200, description = "Active orders", body = [OrderSummaryResponse]),
    ),
    tag = "orders"
)]
pub async fn list_active_orders(
    service: web::Data<AppOrderService>,
) -> Result<HttpResponse, AppError> {
    let service = service.get_ref().clone();

    let list = web::block(move || service.get_active_orders())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(summaries(list)))
}

/// GET /orders/pending
///
/// Open carts that have not been placed yet.
#[utoipa::path(
    get,
    path = "/orders/pending",
    responses(
        (status = 200, description = "Pending carts", body = [OrderSummaryResponse]),
    ),
    tag = "orders"
)]
pub async fn list_pending_orders(
    service: web::Data<AppOrderService>,
) -> Result<HttpResponse, AppError> {
    let service = service.get_ref().clone();

    let list = web::block(move || service.get_pending_orders())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(summaries(list)))
}

/// GET /customers/{id}/orders
#[utoipa::path(
    get,
    path = "/customers/{id}/orders",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "The customer's orders", body = [OrderSummaryResponse]),
    ),
    tag = "customers"
)]
pub async fn list_customer_orders(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let service = service.get_ref().clone();

    let list = web::block(move || service.get_customer_orders(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(summaries(list)))
}

/// GET /customers/{id}/orders/statistics
#[utoipa::path(
    get,
    path = "/customers/{id}/orders/statistics",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "Order statistics", body = CustomerStatisticsResponse),
    ),
    tag = "customers"
)]
pub async fn customer_order_statistics(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let service = service.get_ref().clone();

    let stats = web::block(move || service.get_customer_order_statistics(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CustomerStatisticsResponse::from_domain(stats)))
}

/// GET /restaurants/{id}/orders
#[utoipa::path(
    get,
    path = "/restaurants/{id}/orders",
    params(("id" = Uuid, Path, description = "Restaurant UUID")),
    responses(
        (status = 200, description = "The restaurant's orders", body = [OrderSummaryResponse]),
    ),
    tag = "restaurants"
)]
pub async fn list_restaurant_orders(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let restaurant_id = path.into_inner();
    let service = service.get_ref().clone();

    let list = web::block(move || service.get_restaurant_orders(restaurant_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(summaries(list)))
}
