// responses/json.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use serde::Serialize;

/// Serialize `value` as the JSON body of a 200 response.
pub fn json_response<T: Serialize + ?Sized>(value: &T) -> ResultResp {
    let body = serde_json::to_string(value).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize json response");
        ServerError::InternalError
    })?;

    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}
