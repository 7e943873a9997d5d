use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    let body = markup.into_string();

    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}

pub fn text_response(body: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Body::from(body.to_string()))
        .map_err(|_| ServerError::InternalError)
}
