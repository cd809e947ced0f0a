use dioxus::prelude::*;

use bkmart_domain::{self as domain, CartService, CheckoutService, ProductService, UserService};

use crate::{
    DOMAIN_SERVICE, Route,
    component::{
        address::{AddressFields, AddressForm},
        element::{Block, Color, Loading, LoadingPage, Message, Price, Table, read_failure},
    },
    current_user, ensure_session, notify, report, signal_changed_data, signal_changed_session,
};

/// Checkout of the whole cart, or of a single product if `product` is set.
#[component]
pub fn Checkout(product: String, quantity: u32) -> Element {
    let session = ensure_session!();
    let items = {
        let product = product.clone();
        use_resource(use_reactive!(|(product, quantity)| async move {
            if product.is_empty() {
                let user = current_user(&session.read());
                DOMAIN_SERVICE
                    .read()
                    .get_cart(user.as_ref())
                    .await
                    .map(|cart| {
                        cart.items
                            .iter()
                            .filter(|i| !i.discontinued)
                            .map(domain::CheckoutItem::from)
                            .collect::<Vec<_>>()
                    })
            } else {
                DOMAIN_SERVICE
                    .read()
                    .get_product(product.into())
                    .await
                    .map(|p| vec![domain::CheckoutItem::buy_now(&p, quantity.max(1))])
            }
        }))
    };
    let source = if product.is_empty() {
        domain::CheckoutSource::Cart
    } else {
        domain::CheckoutSource::BuyNow
    };

    let user = current_user(&session.read());

    match (&*items.read(), user) {
        (Some(Ok(items)), Some(user)) => {
            if items.is_empty() {
                return rsx! {
                    Message { color: Color::Info, "There is nothing to check out." }
                };
            }
            rsx! {
                CheckoutSummary { items: items.clone(), user, source }
            }
        }
        (Some(Err(err)), _) => read_failure("items", err),
        _ => rsx! { LoadingPage {} },
    }
}

#[component]
fn CheckoutSummary(
    items: Vec<domain::CheckoutItem>,
    user: domain::User,
    source: domain::CheckoutSource,
) -> Element {
    let mut editing_address = use_signal(|| user.address.is_none());
    let address_fields = use_signal(|| AddressFields::from_address(user.address.as_ref()));
    let mut is_loading = use_signal(|| false);
    let navigator = use_navigator();

    let destination = if editing_address() {
        address_fields.read().destination()
    } else {
        user.address.as_ref().and_then(domain::Address::destination)
    };
    let shipping = {
        let items = items.clone();
        let destination = destination.clone();
        use_resource(use_reactive!(|(items, destination)| async move {
            match destination {
                Some(destination) => Some(
                    DOMAIN_SERVICE
                        .read()
                        .estimate_shipping(&items, &destination)
                        .await,
                ),
                None => None,
            }
        }))
    };

    let subtotal = domain::subtotal(&items);
    let shipping_estimate = shipping.read().clone().flatten();
    let total = subtotal + shipping_estimate.as_ref().map_or(0.0, |s| s.total);

    let save_address = {
        let user = user.clone();
        move |_| {
            let user = user.clone();
            async move {
                let address = match address_fields.read().to_input() {
                    Ok(address) => address,
                    Err(err) => {
                        notify(err);
                        return;
                    }
                };
                let profile = domain::ProfileUpdate {
                    fullname: user.fullname.clone(),
                    email: user.email.clone(),
                    address,
                };
                match DOMAIN_SERVICE
                    .read()
                    .update_profile(user.id.clone(), profile)
                    .await
                {
                    Ok(_) => {
                        *editing_address.write() = false;
                        signal_changed_session();
                    }
                    Err(err) => report("Failed to save address", &err),
                }
            }
        }
    };

    let place_order = {
        let user = user.clone();
        let items = items.clone();
        move |_| {
            let user = user.clone();
            let items = items.clone();
            async move {
                *is_loading.write() = true;
                let result = DOMAIN_SERVICE
                    .read()
                    .place_order(Some(&user), source, &items)
                    .await;
                *is_loading.write() = false;
                match result {
                    Ok(_) => {
                        signal_changed_data();
                        navigator.replace(Route::Account {});
                    }
                    Err(err) => report("Failed to place order", &err),
                }
            }
        }
    };

    let rows = items
        .iter()
        .map(|item| {
            let quantity = item.quantity;
            let line_total = item.price * f64::from(item.quantity);
            vec![
                rsx! { "{item.product_name}" },
                rsx! { Price { amount: item.price } },
                rsx! { "{quantity}" },
                rsx! { Price { amount: line_total } },
            ]
        })
        .collect::<Vec<_>>();

    rsx! {
        div {
            class: "columns px-3",
            div {
                class: "column",
                h2 { class: "title is-5", "Delivery address" }
                if editing_address() {
                    AddressForm { fields: address_fields }
                    div {
                        class: "field is-grouped",
                        div {
                            class: "control",
                            button { class: "button is-link", onclick: save_address, "Save address" }
                        }
                        if user.address.is_some() {
                            div {
                                class: "control",
                                button {
                                    class: "button is-light",
                                    onclick: move |_| *editing_address.write() = false,
                                    "Cancel"
                                }
                            }
                        }
                    }
                } else if let Some(address) = &user.address {
                    div {
                        class: "box",
                        p { class: "has-text-weight-bold", "{address.name} · {address.phone}" }
                        p { "{address}" }
                        a {
                            class: "is-size-7",
                            onclick: move |_| *editing_address.write() = true,
                            "Change"
                        }
                    }
                }
            }
            div {
                class: "column",
                h2 { class: "title is-5", "Order summary" }
                Table {
                    head: vec![rsx! { "Product" }, rsx! { "Price" }, rsx! { "Quantity" }, rsx! { "Total" }],
                    body: rows,
                }
                Block {
                    class: "has-text-right",
                    p { "Subtotal: " Price { amount: subtotal } }
                    match (&destination, &shipping_estimate) {
                        (None, _) => rsx! {
                            p { class: "has-text-grey", "Shipping: select a delivery address" }
                        },
                        (Some(_), Some(estimate)) => rsx! {
                            p {
                                "Shipping: "
                                Price { amount: estimate.total }
                                if estimate.per_shop.iter().any(|s| s.fallback) {
                                    span { class: "is-size-7 has-text-grey", " (estimated)" }
                                }
                            }
                        },
                        (Some(_), None) => rsx! { Loading {} },
                    }
                    p { class: "is-size-5", "Total: " Price { amount: total } }
                }
                div {
                    class: "field is-grouped is-grouped-right",
                    button {
                        class: "button is-primary",
                        class: if is_loading() { "is-loading" },
                        disabled: user.address.is_none() || editing_address(),
                        onclick: place_order,
                        "Place order"
                    }
                }
            }
        }
    }
}
