use maud::{html, Markup};

pub fn empty_state(reset_href: &str) -> Markup {
    html! {
        div class="empty-state" {
            h2 { "No listings match these filters" }
            p { "Try widening the price range or removing a few filters." }
            a class="btn" href=(reset_href) { "Reset filters" }
        }
    }
}
