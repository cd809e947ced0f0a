use dioxus::prelude::*;

use bkmart_domain::{self as domain, OrderService, UserService};

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE,
    component::{
        address::{AddressFields, AddressForm},
        element::{LoadingPage, NoData, Tabs, read_failure},
        form::InputField,
        order::OrderCard,
    },
    ensure_session, notify, report, signal_changed_data, signal_changed_session,
};

#[component]
pub fn Account() -> Element {
    let session = ensure_session!();
    let tab = use_signal(|| 0);

    match &*session.read() {
        Some(Ok(user)) => rsx! {
            Tabs { tabs: vec!["Orders", "Profile"], active: tab }
            if tab() == 0 {
                OrderHistory { user_id: user.id.clone() }
            } else {
                Profile { user: user.clone() }
            }
        },
        Some(Err(err)) => read_failure("account", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn Profile(user: domain::User) -> Element {
    let mut fullname = use_signal(|| user.fullname.clone());
    let mut email = use_signal(|| user.email.clone());
    let address = use_signal(|| AddressFields::from_address(user.address.as_ref()));
    let mut is_loading = use_signal(|| false);

    let save = {
        let user_id = user.id.clone();
        move |_| {
            let user_id = user_id.clone();
            async move {
                let address = match address.read().to_input() {
                    Ok(address) => address,
                    Err(err) => {
                        notify(err);
                        return;
                    }
                };
                let profile = domain::ProfileUpdate {
                    fullname: fullname.read().trim().to_string(),
                    email: email.read().trim().to_string(),
                    address,
                };
                *is_loading.write() = true;
                let result = DOMAIN_SERVICE.read().update_profile(user_id, profile).await;
                *is_loading.write() = false;
                match result {
                    Ok(_) => signal_changed_session(),
                    Err(err) => report("Failed to update profile", &err),
                }
            }
        }
    };

    rsx! {
        div {
            class: "columns is-centered px-3",
            div {
                class: "column is-two-thirds-tablet is-half-desktop",
                InputField {
                    label: "Username".to_string(),
                    value: user.username.clone(),
                    has_changed: false,
                    is_disabled: true,
                    oninput: |_| {},
                }
                InputField {
                    label: "Full name".to_string(),
                    value: fullname(),
                    has_changed: *fullname.read() != user.fullname,
                    oninput: move |evt: FormEvent| *fullname.write() = evt.value(),
                }
                InputField {
                    label: "Email".to_string(),
                    r#type: "email".to_string(),
                    value: email(),
                    has_changed: *email.read() != user.email,
                    oninput: move |evt: FormEvent| *email.write() = evt.value(),
                }
                h2 { class: "title is-6 mt-5", "Delivery address" }
                AddressForm { fields: address }
                div {
                    class: "field is-grouped is-grouped-centered",
                    button {
                        class: "button is-primary",
                        class: if is_loading() { "is-loading" },
                        onclick: save,
                        "Save"
                    }
                }
            }
        }
    }
}

#[component]
fn OrderHistory(user_id: domain::UserID) -> Element {
    let orders = use_resource(use_reactive!(|(user_id,)| async move {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_user_orders(user_id).await
    }));

    match &*orders.read() {
        Some(Ok(orders)) if orders.is_empty() => rsx! {
            NoData { text: "No orders yet".to_string() }
        },
        Some(Ok(orders)) => rsx! {
            for order in orders.iter().cloned() {
                OrderCard {
                    key: "{order.id}",
                    order: order.clone(),
                    if order.may_request_cancellation() {
                        button {
                            class: "button is-small is-danger is-outlined",
                            onclick: {
                                let id = order.id.clone();
                                move |_| {
                                    let id = id.clone();
                                    async move {
                                        match DOMAIN_SERVICE.read().request_cancellation(id).await {
                                            Ok(_) => signal_changed_data(),
                                            Err(err) => report("Failed to request cancellation", &err),
                                        }
                                    }
                                }
                            },
                            "Request cancellation"
                        }
                    }
                }
            }
        },
        Some(Err(err)) => read_failure("orders", err),
        None => rsx! { LoadingPage {} },
    }
}
