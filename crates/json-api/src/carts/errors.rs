//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use trolley_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart or item not found"),
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::Forbidden => {
            StatusError::forbidden().brief("Cart belongs to another user")
        }
        CartsServiceError::Inactive(status) => {
            StatusError::conflict().brief(format!("Cart is {status}"))
        }
        CartsServiceError::InvalidQuantity(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        error if error.is_retryable() => {
            warn!(error = ?error, "cart operation gave up on a busy or unavailable store");

            StatusError::service_unavailable().brief("Cart is busy, try again")
        }
        error => {
            error!(error = ?error, "cart operation failed");

            StatusError::internal_server_error()
        }
    }
}
