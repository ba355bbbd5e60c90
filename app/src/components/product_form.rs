//! Product create/edit modal.

use dioxus::prelude::*;

use super::toast::{ToastSeverity, use_toast};
use crate::api::{ApiClient, ImageUpload};
use crate::types::{Product, ProductDraft, ProductStatus};

/// What the form is doing.
#[derive(Clone, PartialEq)]
enum FormTarget {
    Create,
    Edit(Product),
}

/// Open form state: target, field values, and a newly chosen image (if any).
#[derive(Clone, PartialEq)]
struct FormRequest {
    target: FormTarget,
    draft: ProductDraft,
    image: Option<ImageUpload>,
}

/// Global manager for the product form modal.
#[derive(Clone, Copy)]
pub struct ProductFormManager {
    request: Signal<Option<FormRequest>>,
}

impl ProductFormManager {
    pub fn new() -> Self {
        Self {
            request: Signal::new(None),
        }
    }

    /// Open an empty form for a new product.
    pub fn open_create(&mut self) {
        *self.request.write() = Some(FormRequest {
            target: FormTarget::Create,
            draft: ProductDraft::default(),
            image: None,
        });
    }

    /// Open the form pre-filled from an existing product.
    pub fn open_edit(&mut self, product: Product) {
        *self.request.write() = Some(FormRequest {
            target: FormTarget::Edit(product.clone()),
            draft: ProductDraft::from(&product),
            image: None,
        });
    }

    /// Attach a freshly read image. The file read is async, so the modal may
    /// have been closed in the meantime; the result is dropped in that case.
    pub fn set_image(&mut self, image: ImageUpload) {
        if let Some(req) = self.request.write().as_mut() {
            req.image = Some(image);
        }
    }

    /// Close without saving.
    pub fn close(&mut self) {
        *self.request.write() = None;
    }
}

impl Default for ProductFormManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the product form provider (dashboard scope).
pub fn use_product_form_provider() -> ProductFormManager {
    use_context_provider(ProductFormManager::new)
}

/// Get the product form manager from context.
pub fn use_product_form() -> ProductFormManager {
    use_context::<ProductFormManager>()
}

/// Product create/edit modal. Reports the saved product through `on_saved`.
#[component]
pub fn ProductFormModal(on_saved: EventHandler<Product>) -> Element {
    let mut manager = use_product_form();
    let mut toast = use_toast();
    let api = use_context::<ApiClient>();

    let mut is_saving = use_signal(|| false);

    let request = manager.request.read();
    let Some(req) = request.as_ref() else {
        return rsx! {};
    };

    let is_edit = matches!(req.target, FormTarget::Edit(_));
    let title = if is_edit { "Edit Product" } else { "New Product" };
    let chosen_image = req.image.as_ref().map(|img| img.filename.clone());

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| {
                if !is_saving() {
                    manager.close();
                }
            },
            div {
                class: "product-form-modal",
                onclick: move |e| e.stop_propagation(),

                div { class: "modal-header",
                    h3 { "{title}" }
                    if !is_saving() {
                        button {
                            class: "btn btn-close",
                            onclick: move |_| manager.close(),
                            "X"
                        }
                    }
                }

                div { class: "modal-content",
                    label { r#for: "product-name", class: "field-header", "Name" }
                    input {
                        id: "product-name",
                        r#type: "text",
                        disabled: is_saving(),
                        value: "{req.draft.name}",
                        oninput: move |e| {
                            manager.request.write().as_mut().unwrap().draft.name = e.value();
                        }
                    }

                    label { r#for: "product-description", class: "field-header", "Description" }
                    textarea {
                        id: "product-description",
                        rows: 3,
                        disabled: is_saving(),
                        value: "{req.draft.description}",
                        oninput: move |e| {
                            manager.request.write().as_mut().unwrap().draft.description = e.value();
                        }
                    }

                    div { class: "field-row",
                        div { class: "field-col",
                            label { r#for: "product-price", class: "field-header", "Price" }
                            input {
                                id: "product-price",
                                r#type: "number",
                                min: "0",
                                step: "0.01",
                                disabled: is_saving(),
                                value: "{req.draft.price}",
                                oninput: move |e| {
                                    if let Ok(price) = e.value().parse::<f64>() {
                                        manager.request.write().as_mut().unwrap().draft.price = price;
                                    }
                                }
                            }
                        }
                        div { class: "field-col",
                            label { r#for: "product-stock", class: "field-header", "Stock" }
                            input {
                                id: "product-stock",
                                r#type: "number",
                                min: "0",
                                step: "1",
                                disabled: is_saving(),
                                value: "{req.draft.stock}",
                                oninput: move |e| {
                                    if let Ok(stock) = e.value().parse::<u32>() {
                                        manager.request.write().as_mut().unwrap().draft.stock = stock;
                                    }
                                }
                            }
                        }
                    }

                    div { class: "field-row",
                        div { class: "field-col",
                            label { r#for: "product-status", class: "field-header", "Status" }
                            select {
                                id: "product-status",
                                disabled: is_saving(),
                                value: req.draft.status.as_str(),
                                onchange: move |e| {
                                    if let Some(status) = ProductStatus::parse(&e.value()) {
                                        manager.request.write().as_mut().unwrap().draft.status = status;
                                    }
                                },
                                for status in ProductStatus::all() {
                                    option {
                                        value: status.as_str(),
                                        selected: req.draft.status == status,
                                        {status.label()}
                                    }
                                }
                            }
                        }
                        div { class: "field-col",
                            label { r#for: "product-category", class: "field-header", "Category" }
                            input {
                                id: "product-category",
                                r#type: "text",
                                disabled: is_saving(),
                                value: "{req.draft.category}",
                                oninput: move |e| {
                                    manager.request.write().as_mut().unwrap().draft.category = e.value();
                                }
                            }
                        }
                    }

                    label { r#for: "product-image", class: "field-header",
                        if is_edit { "Replace Image (optional)" } else { "Image" }
                    }
                    input {
                        id: "product-image",
                        r#type: "file",
                        accept: "image/*",
                        disabled: is_saving(),
                        onchange: move |e| {
                            let Some(file) = e.files().into_iter().next() else {
                                return;
                            };
                            spawn(async move {
                                match file.read_bytes().await {
                                    Ok(bytes) => {
                                        let upload = ImageUpload::new(file.name(), bytes.to_vec());
                                        manager.set_image(upload);
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
                    if let Some(filename) = chosen_image {
                        p { class: "field-hint", "Selected: {filename}" }
                    }
                }

                div { class: "modal-footer",
                    button {
                        class: "btn btn-secondary",
                        disabled: is_saving(),
                        onclick: move |_| manager.close(),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: is_saving(),
                        onclick: {
                            let api = api.clone();
                            move |_| {
                                let req = manager.request.read().clone().unwrap();

                                if req.draft.name.trim().is_empty() {
                                    toast.show("Name is required", ToastSeverity::Error);
                                    return;
                                }
                                if matches!(req.target, FormTarget::Create) && req.image.is_none() {
                                    toast.show("An image is required", ToastSeverity::Error);
                                    return;
                                }

                                is_saving.set(true);
                                let api = api.clone();
                                spawn(async move {
                                    let result = match &req.target {
                                        FormTarget::Create => {
                                            let image = req.image.as_ref().unwrap();
                                            api.create_product(&req.draft, image).await
                                        }
                                        FormTarget::Edit(product) => {
                                            api.update_product(
                                                &product.id,
                                                &req.draft,
                                                req.image.as_ref(),
                                            )
                                            .await
                                        }
                                    };

                                    is_saving.set(false);
                                    match result {
                                        Ok(saved) => {
                                            toast.show(
                                                format!("Saved {}", saved.name),
                                                ToastSeverity::Success,
                                            );
                                            on_saved.call(saved);
                                            manager.close();
                                        }
                                        Err(e) => {
                                            toast.show(
                                                format!("Save failed: {e}"),
                                                ToastSeverity::Error,
                                            );
                                        }
                                    }
                                });
                            }
                        },
                        if is_saving() {
                            "Saving..."
                        } else if is_edit {
                            "Save Changes"
                        } else {
                            "Create Product"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_read_landing_after_close_is_dropped() {
        // The file read resolves asynchronously, so it can land after the
        // user cancelled the modal. That late result must be discarded.
        fn app() -> Element {
            let mut manager = use_product_form_provider();
            use_hook(move || {
                manager.open_create();
                manager.set_image(ImageUpload::new("a.png".into(), vec![1, 2, 3]));
                assert!(
                    manager
                        .request
                        .read()
                        .as_ref()
                        .is_some_and(|req| req.image.is_some()),
                    "image attaches while the form is open"
                );

                manager.close();
                manager.set_image(ImageUpload::new("b.png".into(), vec![4]));
                assert!(
                    manager.request.read().is_none(),
                    "a read finishing after close must not reopen the form"
                );
            });
            rsx! {}
        }

        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
    }
}
