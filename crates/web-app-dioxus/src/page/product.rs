use dioxus::prelude::*;

use bkmart_domain::{
    self as domain, AdminService, CartService, CategoryService, ProductService, ShopService,
};
use bkmart_web_app::format_weight;

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE, Route,
    component::{
        element::{
            Block, Color, DeleteConfirmationDialog, Icon, LoadingPage, Message, Price, StatusTag,
            Tags, read_failure,
        },
        form::{
            FieldValue, FieldValueState, InputField, TagSelection, TagSelectionField,
            TextAreaField, validate_price, validate_required, validate_weight,
        },
        product::ProductImage,
    },
    current_user, ensure_session, notify, report, signal_changed_data, use_session,
};

#[component]
pub fn Product(id: String) -> Element {
    let session = use_session!();
    let product = use_resource(use_reactive!(|(id,)| async move {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_product(id.into()).await
    }));
    let shop = use_resource(move || async move {
        let shop_id = match &*product.read() {
            Some(Ok(product)) => product.shop_id.clone(),
            _ => None,
        };
        match shop_id {
            Some(shop_id) => DOMAIN_SERVICE.read().get_shop(shop_id).await.ok(),
            None => None,
        }
    });

    let user = current_user(&session.read());
    let shop = shop.read().clone().flatten();

    match &*product.read() {
        Some(Ok(product)) => {
            let may_manage = shop.as_ref().is_some_and(|s| s.may_manage(user.as_ref()));
            let purchasable = domain::check_purchasable(user.as_ref(), product, shop.as_ref())
                .map_err(|err| err.to_string());
            rsx! {
                ProductDetail {
                    product: product.clone(),
                    shop,
                    user,
                    may_manage,
                    purchasable,
                }
            }
        }
        Some(Err(err)) => read_failure("product", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn ProductDetail(
    product: domain::Product,
    shop: Option<domain::Shop>,
    user: Option<domain::User>,
    may_manage: bool,
    purchasable: Result<(), String>,
) -> Element {
    let mut quantity = use_signal(|| 1u32);
    let mut image = use_signal(|| 0usize);
    let mut delete_dialog = use_signal(|| false);
    let mut is_loading = use_signal(|| false);
    let mut added = use_signal(|| false);
    let navigator = use_navigator();
    let is_admin = domain::is_admin(user.as_ref());

    let add_to_cart = {
        let id = product.id.clone();
        let user = user.clone();
        move |_| {
            let id = id.clone();
            let user = user.clone();
            async move {
                *is_loading.write() = true;
                let result = DOMAIN_SERVICE
                    .read()
                    .add_to_cart(user.as_ref(), id, quantity())
                    .await;
                *is_loading.write() = false;
                match result {
                    Ok(_) => {
                        *added.write() = true;
                        signal_changed_data();
                    }
                    Err(err) => report("Failed to add product to cart", &err),
                }
            }
        }
    };
    let buy_now = {
        let id = product.id.to_string();
        move |_| {
            navigator.push(Route::Checkout {
                product: id.clone(),
                quantity: quantity(),
            });
        }
    };
    let delete = {
        let id = product.id.clone();
        let shop_id = product.shop_id.clone();
        move |_| {
            let id = id.clone();
            let shop_id = shop_id.clone();
            async move {
                *is_loading.write() = true;
                let result = DOMAIN_SERVICE.read().delete_product(id).await;
                *is_loading.write() = false;
                match result {
                    Ok(_) => {
                        *delete_dialog.write() = false;
                        signal_changed_data();
                        match shop_id {
                            Some(shop_id) => navigator.push(Route::Shop {
                                id: shop_id.to_string(),
                            }),
                            None => navigator.push(Route::Landing {}),
                        };
                    }
                    Err(err) => report("Failed to delete product", &err),
                }
            }
        }
    };
    let toggle_ban = {
        let product = product.clone();
        move |_| {
            let product = product.clone();
            async move {
                match DOMAIN_SERVICE.read().toggle_product_ban(&product).await {
                    Ok(_) => signal_changed_data(),
                    Err(err) => report("Failed to change ban of product", &err),
                }
            }
        }
    };

    let main_image = product
        .images
        .get(image())
        .or(product.images.first())
        .cloned();
    let images = product.images.clone();

    rsx! {
        div {
            class: "columns px-3",
            div {
                class: "column is-half",
                ProductImage { url: main_image, alt: product.name.clone() }
                if images.len() > 1 {
                    div {
                        class: "is-flex is-flex-wrap-wrap mt-2",
                        for (i, url) in images.into_iter().enumerate() {
                            figure {
                                class: "image is-64x64 mr-2 is-clickable",
                                class: if i == image() { "has-border-link" },
                                onclick: move |_| *image.write() = i,
                                img { src: "{url}" }
                            }
                        }
                    }
                }
            }
            div {
                class: "column",
                h1 { class: "title is-4", "{product.name}" }
                if !product.brand.is_empty() {
                    p { class: "subtitle is-6", "{product.brand}" }
                }
                Block { span { class: "is-size-4", Price { amount: product.price } } }
                if product.status != domain::ListingStatus::Active {
                    Block { StatusTag { status: product.status.to_string() } }
                }
                Tags { tags: product.categories.clone() }
                if let Some(weight) = product.weight {
                    p { class: "is-size-7 has-text-grey", "Weight: {format_weight(weight)}" }
                }
                if let Some(shop) = &shop {
                    Block {
                        Link {
                            to: Route::Shop { id: shop.id.to_string() },
                            Icon { name: "shop" }
                            "{shop.name}"
                        }
                    }
                }
                if added() {
                    Message { color: Color::Success, "Added to cart" }
                }
                if !may_manage && !is_admin {
                    match &purchasable {
                        Ok(()) => rsx! {
                            div {
                                class: "field has-addons",
                                div {
                                    class: "control",
                                    input {
                                        class: "input",
                                        r#type: "number",
                                        min: "1",
                                        style: "width:5em",
                                        value: "{quantity}",
                                        oninput: move |evt: FormEvent| {
                                            if let Ok(q) = evt.value().parse::<u32>() {
                                                if q >= 1 {
                                                    *quantity.write() = q;
                                                }
                                            }
                                        },
                                    }
                                }
                                div {
                                    class: "control",
                                    button {
                                        class: "button is-link",
                                        class: if is_loading() { "is-loading" },
                                        onclick: add_to_cart,
                                        Icon { name: "cart-plus" }
                                        span { "Add to cart" }
                                    }
                                }
                                div {
                                    class: "control",
                                    button {
                                        class: "button is-primary",
                                        onclick: buy_now,
                                        "Buy now"
                                    }
                                }
                            }
                        },
                        Err(reason) => rsx! {
                            Message { color: Color::Warning, "{reason}" }
                            if user.is_none() {
                                Link { class: "button is-link", to: Route::Login {}, "Log in" }
                            }
                        },
                    }
                }
                if may_manage {
                    div {
                        class: "field is-grouped",
                        div {
                            class: "control",
                            Link {
                                class: "button is-link is-outlined",
                                to: Route::UpdateProduct { id: product.id.to_string() },
                                Icon { name: "edit" }
                                span { "Edit" }
                            }
                        }
                        if product.status != domain::ListingStatus::Deleted {
                            div {
                                class: "control",
                                button {
                                    class: "button is-danger is-outlined",
                                    onclick: move |_| *delete_dialog.write() = true,
                                    Icon { name: "trash" }
                                    span { "Delete" }
                                }
                            }
                        }
                    }
                }
                if is_admin {
                    button {
                        class: "button is-warning",
                        onclick: toggle_ban,
                        if product.status == domain::ListingStatus::Banned { "Unban product" } else { "Ban product" }
                    }
                }
                div {
                    class: "content mt-4",
                    style: "white-space:pre-line",
                    "{product.description}"
                }
            }
        }
        if delete_dialog() {
            DeleteConfirmationDialog {
                element_type: "product",
                element_name: rsx! { span { class: "is-italic", "{product.name}" } },
                delete_event: delete,
                cancel_event: move |_| *delete_dialog.write() = false,
                is_loading: is_loading(),
            }
        }
    }
}

#[component]
pub fn CreateProduct(shop: String) -> Element {
    ensure_session!();
    rsx! {
        ProductForm { shop_id: shop, product: None }
    }
}

#[component]
pub fn UpdateProduct(id: String) -> Element {
    ensure_session!();
    let product = use_resource(use_reactive!(|(id,)| async move {
        DOMAIN_SERVICE.read().get_product(id.into()).await
    }));

    match &*product.read() {
        Some(Ok(product)) => rsx! {
            ProductForm {
                shop_id: product.shop_id.as_ref().map(ToString::to_string).unwrap_or_default(),
                product: Some(product.clone()),
            }
        },
        Some(Err(err)) => read_failure("product", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn ProductForm(shop_id: String, product: Option<domain::Product>) -> Element {
    let mut name = use_signal(|| match &product {
        Some(p) => FieldValue::new(p.name.clone()),
        None => FieldValue::default(),
    });
    let mut price = use_signal(|| match &product {
        Some(p) => FieldValue::new(p.price),
        None => FieldValue::default(),
    });
    let mut weight = use_signal(|| FieldValue::from_option(product.as_ref().and_then(|p| p.weight)));
    let mut brand = use_signal(|| product.as_ref().map(|p| p.brand.clone()).unwrap_or_default());
    let mut description = use_signal(|| {
        product
            .as_ref()
            .map(|p| p.description.clone())
            .unwrap_or_default()
    });
    let mut images = use_signal(Vec::<domain::ProductImage>::new);
    let mut is_loading = use_signal(|| false);
    let navigator = use_navigator();

    let categories = use_resource(|| async { DOMAIN_SERVICE.read().get_categories().await });
    let mut selection = use_signal(|| TagSelection { tags: vec![] });
    let initial_categories = product
        .as_ref()
        .map(|p| p.categories.clone())
        .unwrap_or_default();
    use_effect(move || {
        if let Some(Ok(categories)) = &*categories.read() {
            *selection.write() = TagSelection::new(
                categories.iter().map(|c| c.name.clone()),
                &initial_categories,
            );
        }
    });

    let is_new = product.is_none();
    let product_id = product.as_ref().map(|p| p.id.clone());
    let is_valid = name.read().valid() && price.read().valid() && weight.read().valid();

    let save = move |_| {
        let shop_id = shop_id.clone();
        let product_id = product_id.clone();
        async move {
            let (Ok(price_value), Ok(weight_value)) =
                (price.read().validated.clone(), weight.read().validated.clone())
            else {
                return;
            };
            let draft = match domain::ProductDraft::new(
                domain::ShopID::from(shop_id),
                &name.read().input,
                price_value,
                weight_value,
                &brand.read(),
                &description.read(),
                selection.read().selected(),
            ) {
                Ok(draft) => draft,
                Err(err) => {
                    notify(err.to_string());
                    return;
                }
            };
            *is_loading.write() = true;
            let saved = match product_id {
                Some(id) => DOMAIN_SERVICE
                    .read()
                    .replace_product(id, draft)
                    .await
                    .map_err(|err| report("Failed to update product", &err)),
                None => DOMAIN_SERVICE
                    .read()
                    .create_product(draft)
                    .await
                    .map_err(|err| report("Failed to create product", &err)),
            };
            if let Ok(saved) = saved {
                let files = images.read().clone();
                if !files.is_empty() {
                    if let Err(err) = DOMAIN_SERVICE
                        .read()
                        .upload_product_images(saved.id.clone(), files)
                        .await
                    {
                        report("Failed to upload images", &err);
                    }
                }
                signal_changed_data();
                navigator.replace(Route::Product {
                    id: saved.id.to_string(),
                });
            }
            *is_loading.write() = false;
        }
    };

    rsx! {
        div {
            class: "columns is-centered px-3",
            div {
                class: "column is-two-thirds-tablet is-half-desktop",
                h1 {
                    class: "title is-4",
                    if is_new { "New product" } else { "Edit product" }
                }
                InputField {
                    label: "Name".to_string(),
                    value: name.read().input.clone(),
                    error: if let Err(err) = &name.read().validated { err.clone() },
                    has_changed: name.read().changed(),
                    oninput: move |evt: FormEvent| name.write().update(evt.value(), validate_required),
                }
                InputField {
                    label: "Price (đ)".to_string(),
                    inputmode: "numeric".to_string(),
                    value: price.read().input.clone(),
                    error: if let Err(err) = &price.read().validated { err.clone() },
                    has_changed: price.read().changed(),
                    oninput: move |evt: FormEvent| price.write().update(evt.value(), validate_price),
                }
                InputField {
                    label: "Weight (g)".to_string(),
                    inputmode: "numeric".to_string(),
                    help: "Used to estimate shipping fees".to_string(),
                    value: weight.read().input.clone(),
                    error: if let Err(err) = &weight.read().validated { err.clone() },
                    has_changed: weight.read().changed(),
                    oninput: move |evt: FormEvent| weight.write().update(evt.value(), validate_weight),
                }
                InputField {
                    label: "Brand".to_string(),
                    value: brand(),
                    has_changed: false,
                    oninput: move |evt: FormEvent| *brand.write() = evt.value(),
                }
                TextAreaField {
                    label: "Description",
                    value: description(),
                    has_changed: false,
                    oninput: move |evt: FormEvent| *description.write() = evt.value(),
                }
                TagSelectionField { label: "Categories", selection }
                div {
                    class: "field",
                    label { class: "label", "Images" }
                    div {
                        class: "control",
                        input {
                            r#type: "file",
                            accept: "image/*",
                            multiple: true,
                            onchange: move |evt: FormEvent| async move {
                                let mut files = vec![];
                                for file in evt.files() {
                                    match file.read_bytes().await {
                                        Ok(bytes) => files.push(domain::ProductImage {
                                            file_name: file.name(),
                                            content_type: file
                                                .content_type()
                                                .unwrap_or_else(|| "application/octet-stream".to_string()),
                                            bytes: bytes.to_vec(),
                                        }),
                                        Err(err) => notify(format!("Failed to read {}: {err}", file.name())),
                                    }
                                }
                                *images.write() = files;
                            },
                        }
                    }
                    p { class: "help", "{images.read().len()} new images selected" }
                }
                div {
                    class: "field is-grouped is-grouped-centered",
                    div {
                        class: "control",
                        button {
                            class: "button is-light is-soft",
                            onclick: move |_| navigator.go_back(),
                            "Cancel"
                        }
                    }
                    div {
                        class: "control",
                        button {
                            class: "button is-primary",
                            class: if is_loading() { "is-loading" },
                            disabled: !is_valid,
                            onclick: save,
                            "Save"
                        }
                    }
                }
            }
        }
    }
}
