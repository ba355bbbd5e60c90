//! Catalog admin dashboard — web frontend entry point.

mod api;
mod components;
mod types;

use dioxus::prelude::*;
use dioxus_logger::tracing::{Level, info};

use api::{ApiClient, RequestHooks};
use components::{DashboardPage, GlobalProgressBar, ToastFrame};

static MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus_logger::init(Level::INFO).expect("failed to init logger");
    info!("starting catalog dashboard");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let progress = components::use_progress_provider();
    components::use_toast_provider();

    // The request layer learns about the progress store only through these two
    // callbacks, handed over at construction. Every screen that pulls the
    // client from context is tracked by the same in-flight counter.
    use_context_provider(|| {
        ApiClient::new(
            api::default_base_url(),
            RequestHooks::new(
                move || {
                    let mut progress = progress;
                    progress.set_active(true);
                },
                move || {
                    let mut progress = progress;
                    progress.set_active(false);
                    // The determinate hint is per-burst; a later burst starts
                    // indeterminate unless its caller reports again.
                    progress.set_value(None);
                },
            ),
        )
    });

    rsx! {
        document::Stylesheet { href: MAIN_CSS }
        GlobalProgressBar {}
        div { class: "app-shell",
            aside { class: "sidebar",
                div { class: "sidebar-brand", "Catalog Admin" }
                nav { class: "sidebar-nav",
                    a { class: "nav-item nav-item-active", href: "#", "Products" }
                }
            }
            main { class: "app-main",
                DashboardPage {}
            }
        }
        ToastFrame {}
    }
}
