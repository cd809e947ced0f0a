use dioxus::prelude::*;

use bkmart_domain::{self as domain, ShopService};

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE, Route,
    component::{
        address::{AddressFields, AddressForm},
        element::{Icon, LoadingPage, NoData, StatusTag, read_failure},
        form::InputField,
    },
    ensure_session, notify, report, signal_changed_data,
};

#[component]
pub fn SellerChannel() -> Element {
    let session = ensure_session!();

    match &*session.read() {
        Some(Ok(user)) => rsx! {
            OwnedShops { username: user.username.clone() }
        },
        Some(Err(err)) => read_failure("session", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn OwnedShops(username: String) -> Element {
    let shops = use_resource(use_reactive!(|(username,)| async move {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_owner_shops(&username).await
    }));
    let navigator = use_navigator();

    rsx! {
        div {
            class: "field is-grouped is-grouped-right px-3",
            button {
                class: "button is-primary",
                onclick: move |_| {
                    navigator.push(Route::CreateShop {});
                },
                Icon { name: "plus" }
                span { "Create shop" }
            }
        }
        match &*shops.read() {
            Some(Ok(shops)) if shops.is_empty() => rsx! {
                NoData { text: "You do not own a shop yet".to_string() }
            },
            Some(Ok(shops)) => rsx! {
                div {
                    class: "columns is-multiline px-3",
                    for shop in shops.iter().cloned() {
                        div {
                            key: "{shop.id}",
                            class: "column is-one-third-desktop is-half-tablet",
                            div {
                                class: "box is-clickable",
                                onclick: {
                                    let id = shop.id.to_string();
                                    move |_| {
                                        navigator.push(Route::Shop { id: id.clone() });
                                    }
                                },
                                p {
                                    class: "title is-6",
                                    "{shop.name} "
                                    StatusTag { status: shop.status.to_string() }
                                }
                                if let Some(address) = &shop.address {
                                    p { class: "is-size-7 has-text-grey", "{address}" }
                                }
                            }
                        }
                    }
                }
            },
            Some(Err(err)) => read_failure("shops", err),
            None => rsx! { LoadingPage {} },
        }
    }
}

#[component]
pub fn CreateShop() -> Element {
    let session = ensure_session!();
    let mut name = use_signal(String::new);
    let mut name_error = use_signal(String::new);
    let address = use_signal(|| {
        let user = match &*session.peek() {
            Some(Ok(user)) => user.address.clone(),
            _ => None,
        };
        AddressFields::from_address(user.as_ref())
    });
    let mut is_loading = use_signal(|| false);
    let navigator = use_navigator();

    let create = move |_| async move {
        let name = match domain::Name::new(name.read().trim()) {
            Ok(name) => name,
            Err(err) => {
                *name_error.write() = err.to_string();
                return;
            }
        };
        let address = match address.read().to_input() {
            Ok(address) => address,
            Err(err) => {
                notify(err);
                return;
            }
        };
        *is_loading.write() = true;
        let result = DOMAIN_SERVICE
            .read()
            .create_shop(domain::ShopDraft { name, address })
            .await;
        *is_loading.write() = false;
        match result {
            Ok(shop) => {
                signal_changed_data();
                navigator.replace(Route::Shop {
                    id: shop.id.to_string(),
                });
            }
            Err(err) => report("Failed to create shop", &err),
        }
    };

    rsx! {
        div {
            class: "columns is-centered px-3",
            div {
                class: "column is-two-thirds-tablet is-half-desktop",
                InputField {
                    label: "Shop name".to_string(),
                    value: name(),
                    error: name_error(),
                    has_changed: !name.read().is_empty(),
                    oninput: move |evt: FormEvent| {
                        *name.write() = evt.value();
                        name_error.write().clear();
                    },
                }
                h2 { class: "title is-6 mt-5", "Pickup address" }
                AddressForm { fields: address }
                div {
                    class: "field is-grouped is-grouped-centered",
                    button {
                        class: "button is-primary",
                        class: if is_loading() { "is-loading" },
                        onclick: create,
                        "Create shop"
                    }
                }
            }
        }
    }
}
