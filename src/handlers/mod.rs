// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (bearer JWT required)

pub mod body;
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse an id path segment, answering 400 for anything that is not a UUID.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("'{}' is not a valid {} id", raw, what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_malformed_ids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "movie").unwrap(), id);

        let err = parse_id("5c3bd189515a081b363cb7e4", "movie").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
