//! Single product card for the dashboard grid.

use dioxus::prelude::*;

use crate::api::ApiClient;
use crate::types::{Product, ProductStatus};
use catalog_types::format_price;

/// Thumbnail edge length requested from the image proxy.
const THUMB_SIZE: u32 = 300;

#[component]
pub fn ProductCard(
    product: Product,
    on_edit: EventHandler<Product>,
    on_delete: EventHandler<Product>,
) -> Element {
    let api = use_context::<ApiClient>();

    let status_class = match product.status {
        ProductStatus::Active => "status-badge status-active",
        ProductStatus::Draft => "status-badge status-draft",
        ProductStatus::Archived => "status-badge status-archived",
    };

    // Prefer the proxied thumbnail; fall back to the origin URL for records
    // predating the asset ids.
    let image_src = if product.image_id > 0 {
        Some(api.thumbnail_url(product.image_id, THUMB_SIZE, THUMB_SIZE))
    } else {
        product.image_url.clone()
    };

    rsx! {
        div { class: "product-card",
            div { class: "product-card-image",
                if let Some(src) = image_src {
                    img { src: "{src}", alt: "{product.name}", loading: "lazy" }
                } else {
                    div { class: "product-card-placeholder", "No image" }
                }
            }
            div { class: "product-card-body",
                div { class: "product-card-header",
                    h3 { class: "product-card-name", "{product.name}" }
                    span { class: status_class, {product.status.label()} }
                }
                if !product.category.is_empty() {
                    span { class: "product-card-category", "{product.category}" }
                }
                p { class: "product-card-description", "{product.description}" }
                div { class: "product-card-meta",
                    span { class: "product-card-price", {format_price(product.price)} }
                    span { class: "product-card-stock", "{product.stock} in stock" }
                }
            }
            div { class: "product-card-actions",
                button {
                    class: "btn btn-secondary",
                    onclick: {
                        let product = product.clone();
                        move |_| on_edit.call(product.clone())
                    },
                    "Edit"
                }
                button {
                    class: "btn btn-danger",
                    onclick: {
                        let product = product.clone();
                        move |_| on_delete.call(product.clone())
                    },
                    "Delete"
                }
            }
        }
    }
}
