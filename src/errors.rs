use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Business-rule violation: the request was well-formed but the order or
    /// catalog state does not permit it.
    #[error("{0}")]
    UnprocessableEntity(String),

    /// Lost a race against a concurrent placement; the client may retry.
    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        let msg = e.to_string();
        match e {
            DomainError::OrderNotFound
            | DomainError::MenuItemNotFound
            | DomainError::RestaurantNotFound => AppError::NotFound(msg),
            DomainError::Validation(_) => AppError::BadRequest(msg),
            DomainError::StockConflict { .. } => AppError::Conflict(msg),
            DomainError::RestaurantNotApproved
            | DomainError::ItemNotAvailable(_)
            | DomainError::ItemFromOtherRestaurant
            | DomainError::InsufficientStock { .. }
            | DomainError::OrderNotModifiable(_)
            | DomainError::EmptyOrder
            | DomainError::InvalidTransition { .. }
            | DomainError::NotCancellable(_) => AppError::UnprocessableEntity(msg),
            DomainError::Internal(_) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = |msg: &str| serde_json::json!({ "error": msg });
        match self {
            AppError::NotFound(m) => HttpResponse::NotFound().json(body(m)),
            AppError::BadRequest(m) => HttpResponse::BadRequest().json(body(m)),
            AppError::UnprocessableEntity(m) => HttpResponse::UnprocessableEntity().json(body(m)),
            AppError::Conflict(m) => HttpResponse::Conflict().json(body(m)),
            AppError::Internal(m) => {
                log::error!("internal error: {m}");
                HttpResponse::InternalServerError().json(body("Internal server error"))
            }
        }
    }
}
