//! Request validation helpers

use validator::Validate;

use crate::{AppError, AppResult};

/// Validate `req`, reporting the first failing field in `field_order`.
///
/// Fields not listed are still checked, in unspecified order.
pub fn validate_request<T: Validate>(req: &T, field_order: &[&str]) -> AppResult<()> {
    let Err(errors) = req.validate() else {
        return Ok(());
    };

    let fields = errors.field_errors();
    let message = field_order
        .iter()
        .filter_map(|field| fields.get(*field))
        .chain(fields.values())
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string());

    Err(AppError::ValidationError(message))
}
