//! Product catalog dashboard: load, filter, and manage products.

use dioxus::prelude::*;
use dioxus_logger::tracing::{error, info};

use super::image_search::ImageSearchModal;
use super::product_card::ProductCard;
use super::product_form::{ProductFormModal, use_product_form_provider};
use super::toast::{ToastSeverity, use_toast};
use crate::api::ApiClient;
use crate::types::{Product, StatusFilter};

#[component]
pub fn DashboardPage() -> Element {
    let api = use_context::<ApiClient>();
    let mut toast = use_toast();
    // Provided here so the topbar button, cards, and modal share one instance.
    let mut form = use_product_form_provider();

    let mut products = use_signal(Vec::<Product>::new);
    let mut loading = use_signal(|| true);
    let mut query = use_signal(String::new);
    let mut status_filter = use_signal(StatusFilter::default);
    let mut show_image_search = use_signal(|| false);

    // Load the catalog on mount.
    use_future({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move {
                match api.get_products().await {
                    Ok(list) => {
                        info!("loaded {} products", list.len());
                        products.set(list);
                    }
                    Err(e) => {
                        error!("failed to load products: {e}");
                        toast.show(format!("Failed to load products: {e}"), ToastSeverity::Error);
                    }
                }
                loading.set(false);
            }
        }
    });

    let filtered = use_memo(move || {
        let q = query();
        let filter = status_filter();
        products
            .read()
            .iter()
            .filter(|p| filter.accepts(p.status) && p.matches_query(&q))
            .cloned()
            .collect::<Vec<_>>()
    });

    // Re-fetch before editing so the form reflects the stored record, not a
    // possibly stale list entry.
    let on_edit = {
        let api = api.clone();
        move |product: Product| {
            let api = api.clone();
            spawn(async move {
                match api.get_product(&product.id).await {
                    Ok(fresh) => form.open_edit(fresh),
                    Err(e) => {
                        error!("refresh failed for {}: {e}", product.id);
                        form.open_edit(product);
                    }
                }
            });
        }
    };

    let on_delete = {
        let api = api.clone();
        move |product: Product| {
            let api = api.clone();
            spawn(async move {
                let confirmed = web_sys::window()
                    .map(|w| {
                        w.confirm_with_message(&format!("Delete \"{}\"?", product.name))
                            .unwrap_or(false)
                    })
                    .unwrap_or(false);
                if !confirmed {
                    return;
                }
                match api.delete_product(&product.id).await {
                    Ok(()) => {
                        products.write().retain(|p| p.id != product.id);
                        toast.show(format!("Deleted {}", product.name), ToastSeverity::Success);
                    }
                    Err(e) => {
                        error!("delete failed for {}: {e}", product.id);
                        toast.show(format!("Delete failed: {e}"), ToastSeverity::Error);
                    }
                }
            });
        }
    };

    // Merge a created or updated product back into the list.
    let on_saved = move |saved: Product| {
        let mut list = products.write();
        if let Some(existing) = list.iter_mut().find(|p| p.id == saved.id) {
            *existing = saved;
        } else {
            list.push(saved);
        }
    };

    rsx! {
        div { class: "dashboard",
            header { class: "dashboard-topbar",
                h1 { "Products" }
                div { class: "dashboard-controls",
                    input {
                        class: "search-input",
                        r#type: "search",
                        placeholder: "Search products...",
                        value: "{query}",
                        oninput: move |e| query.set(e.value()),
                    }
                    select {
                        class: "status-select",
                        onchange: move |e| status_filter.set(StatusFilter::parse(&e.value())),
                        for option in StatusFilter::options() {
                            option {
                                value: option.as_str(),
                                selected: status_filter() == option,
                                {option.label()}
                            }
                        }
                    }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| show_image_search.set(true),
                        "Search by Image"
                    }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| form.open_create(),
                        "+ Add Product"
                    }
                }
            }

            if loading() {
                div { class: "dashboard-loading", "Loading products..." }
            } else if filtered.read().is_empty() {
                div { class: "dashboard-empty",
                    if products.read().is_empty() {
                        "No products yet. Create the first one."
                    } else {
                        "No products match the current filters."
                    }
                }
            } else {
                div { class: "product-grid",
                    for product in filtered.read().iter() {
                        ProductCard {
                            key: "{product.id}",
                            product: product.clone(),
                            on_edit: on_edit.clone(),
                            on_delete: on_delete.clone(),
                        }
                    }
                }
            }
        }

        ProductFormModal { on_saved }
        if show_image_search() {
            ImageSearchModal { on_close: move |_| show_image_search.set(false) }
        }
    }
}
