pub mod errors;
pub mod html;
pub mod json;
pub mod redirect;

pub use errors::{error_to_response, unavailable_response, ResultResp};

// Normal HTML response
pub use html::{html_response, text_response};
pub use json::json_response;
pub use redirect::{redirect_to, redirect_with_cookie};
