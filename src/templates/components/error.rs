use maud::{html, Markup, DOCTYPE};

/// Basic standalone error page. `retry_href`, when given, links back to the
/// request that failed.
pub fn error_page(status: u16, message: &str, retry_href: Option<&str>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Error " (status) }
                style {
                    "body { font-family: system-ui, sans-serif; max-width: 720px; margin: 4rem auto; padding: 1rem; }"
                    "h1 { font-size: 2rem; margin-bottom: 1rem; }"
                    "p { font-size: 1.1rem; color: #444; }"
                }
            }
            body {
                h1 { "Error " (status) }
                p { (message) }
                @if let Some(href) = retry_href {
                    p { a class="retry" href=(href) { "Try again" } }
                }
                p { a href="/" { "← Back to home" } }
            }
        }
    }
}
