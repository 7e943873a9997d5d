use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// 302 to `location`.
pub fn redirect_to(location: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(302)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

/// 302 to `location` that also sets a cookie.
pub fn redirect_with_cookie(location: &str, set_cookie: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(302)
        .header("Location", location)
        .header("Set-Cookie", set_cookie)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}
