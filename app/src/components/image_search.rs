//! Search-by-image modal: upload a photo, get visually similar products.

use dioxus::prelude::*;

use super::toast::{ToastSeverity, use_toast};
use crate::api::{ApiClient, ImageUpload};
use crate::types::SearchByImageResponse;
use catalog_types::format_price;

#[component]
pub fn ImageSearchModal(on_close: EventHandler<()>) -> Element {
    let mut toast = use_toast();
    let api = use_context::<ApiClient>();

    let mut image = use_signal(|| None::<ImageUpload>);
    let mut results = use_signal(|| None::<SearchByImageResponse>);
    let mut is_searching = use_signal(|| false);

    let chosen = image.read().as_ref().map(|img| img.filename.clone());
    let search = results.read();
    let match_count = search.as_ref().map(|r| r.data.len()).unwrap_or(0);

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| {
                if !is_searching() {
                    on_close.call(());
                }
            },
            div {
                class: "image-search-modal",
                onclick: move |e| e.stop_propagation(),

                div { class: "modal-header",
                    h3 { "Search by Image" }
                    if !is_searching() {
                        button {
                            class: "btn btn-close",
                            onclick: move |_| on_close.call(()),
                            "X"
                        }
                    }
                }

                div { class: "modal-content",
                    p { class: "field-hint",
                        "Upload a photo to find catalog products with similar images."
                    }
                    input {
                        r#type: "file",
                        accept: "image/*",
                        disabled: is_searching(),
                        onchange: move |e| {
                            let Some(file) = e.files().into_iter().next() else {
                                return;
                            };
                            spawn(async move {
                                match file.read_bytes().await {
                                    Ok(bytes) => {
                                        image.set(Some(ImageUpload::new(file.name(), bytes.to_vec())));
                                        // New query invalidates old matches
                                        results.set(None);
                                    }
                                    Err(e) => {
                                        toast.show(
                                            format!("Could not read file: {e}"),
                                            ToastSeverity::Error,
                                        );
                                    }
                                }
                            });
                        }
                    }
                    if let Some(filename) = chosen {
                        p { class: "field-hint", "Selected: {filename}" }
                    }

                    if let Some(resp) = search.as_ref() {
                        if resp.data.is_empty() {
                            p { class: "search-empty", "No similar products found." }
                        } else {
                            p { class: "search-summary", "{match_count} matching products" }
                            div { class: "search-results",
                                for product in resp.data.iter() {
                                    div { key: "{product.id}", class: "search-result-row",
                                        if product.image_id > 0 {
                                            img {
                                                class: "search-result-thumb",
                                                src: api.thumbnail_url(product.image_id, 80, 80),
                                                alt: "{product.name}",
                                            }
                                        }
                                        span { class: "search-result-name", "{product.name}" }
                                        span { class: "search-result-price", {format_price(product.price)} }
                                    }
                                }
                            }
                        }
                    }
                }

                div { class: "modal-footer",
                    button {
                        class: "btn btn-secondary",
                        disabled: is_searching(),
                        onclick: move |_| on_close.call(()),
                        "Close"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: is_searching() || image.read().is_none(),
                        onclick: {
                            let api = api.clone();
                            move |_| {
                                let Some(upload) = image.read().clone() else {
                                    return;
                                };
                                is_searching.set(true);
                                let api = api.clone();
                                spawn(async move {
                                    match api.search_by_image(&upload).await {
                                        Ok(resp) => results.set(Some(resp)),
                                        Err(e) => {
                                            toast.show(
                                                format!("Search failed: {e}"),
                                                ToastSeverity::Error,
                                            );
                                        }
                                    }
                                    is_searching.set(false);
                                });
                            }
                        },
                        if is_searching() { "Searching..." } else { "Search" }
                    }
                }
            }
        }
    }
}
