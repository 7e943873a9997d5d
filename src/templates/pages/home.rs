// templates/pages/home.rs

use crate::search::QueryMap;
use crate::templates::{desktop_layout, filter_form};
use crate::view::View;
use maud::{html, Markup};

pub fn home_page() -> Markup {
    desktop_layout(
        "Home",
        html! {
            main class="container" {
                h1 { "Find a place to live" }
                p class="lead" { "Search the current listings, or answer a few questions and we'll rank them for you." }

                (filter_form(&QueryMap::new(), View::default()))

                p { a class="btn" href="/recommendations" { "Take the matching quiz" } }
            }
        },
    )
}
