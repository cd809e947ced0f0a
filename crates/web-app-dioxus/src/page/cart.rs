use std::{collections::HashMap, rc::Rc};

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use bkmart_domain::{self as domain, CartService};

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE, Route,
    component::element::{Block, Icon, LoadingPage, NoData, Price, Table, read_failure},
    current_user, ensure_session, report, signal_changed_data,
};

#[component]
pub fn Cart() -> Element {
    let session = ensure_session!();
    let cart = use_resource(move || async move {
        let _ = DATA_CHANGED.read();
        let user = current_user(&session.read());
        DOMAIN_SERVICE.read().get_cart(user.as_ref()).await
    });
    let debouncer = use_hook(|| Rc::new(domain::QuantityDebouncer::new()));
    // Quantities entered but not yet confirmed by the backend
    let mut pending = use_signal(HashMap::<domain::ProductID, u32>::new);
    let navigator = use_navigator();

    let user = current_user(&session.read());

    let change_quantity = {
        let user = user.clone();
        let debouncer = debouncer.clone();
        move |product_id: domain::ProductID, quantity: u32| {
            let debouncer = debouncer.clone();
            let user = user.clone();
            pending.write().insert(product_id.clone(), quantity);
            spawn(async move {
                let result = DOMAIN_SERVICE
                    .read()
                    .update_quantity_debounced(
                        &debouncer,
                        user.as_ref(),
                        product_id.clone(),
                        quantity,
                        TimeoutFuture::new(domain::QUANTITY_UPDATE_DELAY_MS),
                    )
                    .await;
                match result {
                    Some(Ok(_)) => {
                        pending.write().remove(&product_id);
                        signal_changed_data();
                    }
                    Some(Err(err)) => {
                        pending.write().remove(&product_id);
                        report("Failed to update quantity", &err);
                    }
                    None => {}
                }
            });
        }
    };

    let remove = {
        let user = user.clone();
        let debouncer = debouncer.clone();
        move |product_id: domain::ProductID| {
            let user = user.clone();
            debouncer.cancel(&product_id);
            pending.write().remove(&product_id);
            async move {
                match DOMAIN_SERVICE
                    .read()
                    .remove_from_cart(user.as_ref(), product_id)
                    .await
                {
                    Ok(_) => signal_changed_data(),
                    Err(err) => report("Failed to remove product from cart", &err),
                }
            }
        }
    };

    let clear = {
        let user = user.clone();
        move |_| {
            let user = user.clone();
            async move {
                match DOMAIN_SERVICE.read().clear_cart(user.as_ref()).await {
                    Ok(_) => signal_changed_data(),
                    Err(err) => report("Failed to clear cart", &err),
                }
            }
        }
    };

    match &*cart.read() {
        Some(Ok(cart)) if cart.is_empty() => rsx! {
            NoData { text: "Your cart is empty".to_string() }
            div {
                class: "has-text-centered",
                Link {
                    class: "button is-link",
                    to: Route::Shopping { query: String::new(), category: String::new(), order: String::new() },
                    "Continue shopping"
                }
            }
        },
        Some(Ok(cart)) => {
            let pending_quantities = pending.read().clone();
            let body = cart
                .items
                .iter()
                .map(|item| {
                    let quantity = pending_quantities
                        .get(&item.product_id)
                        .copied()
                        .unwrap_or(item.quantity);
                    let line_total = item.price * f64::from(quantity);
                    let name = item
                        .product_name
                        .clone()
                        .unwrap_or_else(|| "Unknown product".to_string());
                    let id = item.product_id.clone();
                    let id_minus = item.product_id.clone();
                    let id_plus = item.product_id.clone();
                    let id_remove = item.product_id.clone();
                    let mut change_input = change_quantity.clone();
                    let mut change_minus = change_quantity.clone();
                    let mut change_plus = change_quantity.clone();
                    let mut remove = remove.clone();
                    vec![
                        rsx! {
                            span {
                                class: if item.discontinued { "has-text-grey" },
                                Link { to: Route::Product { id: id.to_string() }, "{name}" }
                            }
                            if item.discontinued {
                                span { class: "tag is-dark is-light ml-2", "No longer available" }
                            }
                        },
                        rsx! { Price { amount: item.price } },
                        rsx! {
                            div {
                                class: "field has-addons",
                                div {
                                    class: "control",
                                    button {
                                        class: "button is-small",
                                        disabled: quantity <= 1 || item.discontinued,
                                        onclick: move |_| {
                                            change_minus(
                                                id_minus.clone(),
                                                domain::step_quantity(quantity, false),
                                            );
                                        },
                                        Icon { name: "minus", is_small: true }
                                    }
                                }
                                div {
                                    class: "control",
                                    input {
                                        class: "input is-small has-text-centered",
                                        style: "width:4em",
                                        r#type: "number",
                                        min: "1",
                                        disabled: item.discontinued,
                                        value: "{quantity}",
                                        oninput: move |evt: FormEvent| {
                                            if let Ok(q) = evt.value().parse::<u32>() {
                                                if q >= 1 {
                                                    change_input(id.clone(), q);
                                                }
                                            }
                                        },
                                    }
                                }
                                div {
                                    class: "control",
                                    button {
                                        class: "button is-small",
                                        disabled: item.discontinued,
                                        onclick: move |_| {
                                            change_plus(
                                                id_plus.clone(),
                                                domain::step_quantity(quantity, true),
                                            );
                                        },
                                        Icon { name: "plus", is_small: true }
                                    }
                                }
                            }
                        },
                        rsx! { Price { amount: line_total } },
                        rsx! {
                            a {
                                class: "has-text-danger",
                                title: "Remove",
                                onclick: move |_| remove(id_remove.clone()),
                                Icon { name: "trash" }
                            }
                        },
                    ]
                })
                .collect::<Vec<_>>();
            let has_available_items = cart.items.iter().any(|i| !i.discontinued);
            rsx! {
                Table {
                    head: vec![
                        rsx! { "Product" },
                        rsx! { "Price" },
                        rsx! { "Quantity" },
                        rsx! { "Total" },
                        rsx! {},
                    ],
                    body,
                }
                Block {
                    class: "has-text-right px-3",
                    span { class: "is-size-5", "Total: " }
                    span { class: "is-size-5", Price { amount: cart.total_amount } }
                }
                div {
                    class: "field is-grouped is-grouped-right px-3",
                    div {
                        class: "control",
                        button {
                            class: "button is-danger is-outlined",
                            onclick: clear,
                            "Clear cart"
                        }
                    }
                    div {
                        class: "control",
                        button {
                            class: "button is-primary",
                            disabled: !has_available_items || !pending.read().is_empty(),
                            onclick: move |_| {
                                navigator.push(Route::Checkout { product: String::new(), quantity: 0 });
                            },
                            "Checkout"
                        }
                    }
                }
            }
        }
        Some(Err(err)) => read_failure("cart", err),
        None => rsx! { LoadingPage {} },
    }
}
