use dioxus::prelude::*;

use bkmart_domain::{self as domain, AdminService, CategoryService};
use bkmart_storage as storage;
use bkmart_web_app::{self as web_app, log::Service};

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE, Route,
    component::{
        element::{
            Color, Container, Dialog, ErrorMessage, LoadingPage, Message, NoData, Price,
            StatusTag, Table, Tabs, Title, read_failure,
        },
        form::InputField,
        order::OrderCard,
    },
    ensure_session, report, signal_changed_data,
};

#[component]
pub fn Admin() -> Element {
    let session = ensure_session!();
    let navigator = use_navigator();
    let tab = use_signal(|| 0);

    match &*session.read() {
        Some(Ok(user)) if user.is_admin() => rsx! {
            Tabs {
                tabs: vec!["Users", "Shops", "Products", "Categories", "Orders", "Log"],
                active: tab,
            }
            match tab() {
                0 => rsx! { Users {} },
                1 => rsx! { Shops {} },
                2 => rsx! { Products {} },
                3 => rsx! { Categories {} },
                4 => rsx! { OrderLookup {} },
                _ => rsx! { Log {} },
            }
        },
        Some(Ok(_)) => {
            navigator.replace(Route::Landing {});
            rsx! {}
        }
        Some(Err(err)) => read_failure("session", err),
        None => rsx! { LoadingPage {} },
    }
}

fn ban_label(banned: bool) -> &'static str {
    if banned { "Unban" } else { "Ban" }
}

#[component]
fn Users() -> Element {
    let users = use_resource(|| async {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_all_users().await
    });
    let mut detail = use_signal(|| None::<domain::UserID>);

    match &*users.read() {
        Some(Ok(users)) => {
            let body = users
                .iter()
                .map(|user| {
                    let banned = user.status == domain::AccountStatus::Banned;
                    let id = user.id.clone();
                    let toggle = {
                        let user = user.clone();
                        move |_| {
                            let user = user.clone();
                            async move {
                                match DOMAIN_SERVICE.read().toggle_user_ban(&user).await {
                                    Ok(_) => signal_changed_data(),
                                    Err(err) => report("Failed to change ban of user", &err),
                                }
                            }
                        }
                    };
                    vec![
                        rsx! {
                            a {
                                onclick: move |_| *detail.write() = Some(id.clone()),
                                "{user.username}"
                            }
                        },
                        rsx! { "{user.fullname}" },
                        rsx! { "{user.email}" },
                        rsx! { StatusTag { status: user.status.to_string() } },
                        rsx! {
                            if !user.is_admin() {
                                button {
                                    class: "button is-small is-warning is-outlined",
                                    onclick: toggle,
                                    {ban_label(banned)}
                                }
                            }
                        },
                    ]
                })
                .collect::<Vec<_>>();
            rsx! {
                Table {
                    head: vec![
                        rsx! { "Username" },
                        rsx! { "Name" },
                        rsx! { "Email" },
                        rsx! { "Status" },
                        rsx! {},
                    ],
                    body,
                }
                if let Some(id) = detail() {
                    Dialog {
                        title: rsx! { "User details" },
                        close_event: move |_| *detail.write() = None,
                        UserDetail { id }
                    }
                }
            }
        }
        Some(Err(err)) => read_failure("users", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn UserDetail(id: domain::UserID) -> Element {
    let detail = use_resource(use_reactive!(|(id,)| async move {
        DOMAIN_SERVICE.read().get_user_detail(id).await
    }));

    match &*detail.read() {
        Some(Ok(detail)) => rsx! {
            div {
                class: "block",
                p { class: "has-text-weight-bold", "{detail.username} " StatusTag { status: detail.status.to_string() } }
                p { "{detail.fullname}" }
                p { class: "has-text-grey", "{detail.email}" }
            }
            h2 { class: "title is-6", "Recent orders" }
            if detail.recent_orders.is_empty() {
                NoData { text: "No orders".to_string() }
            }
            for order in detail.recent_orders.iter().cloned() {
                OrderCard { key: "{order.id}", order }
            }
            h2 { class: "title is-6", "Recent activities" }
            if detail.recent_activities.is_empty() {
                NoData { text: "No activities".to_string() }
            }
            ul {
                for activity in &detail.recent_activities {
                    li { class: "is-size-7", "{activity}" }
                }
            }
        },
        Some(Err(err)) => read_failure("user", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn Shops() -> Element {
    let shops = use_resource(|| async {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_all_shops().await
    });

    match &*shops.read() {
        Some(Ok(shops)) => {
            let body = shops
                .iter()
                .map(|shop| {
                    let banned = shop.status == domain::ListingStatus::Banned;
                    let toggle = {
                        let shop = shop.clone();
                        move |_| {
                            let shop = shop.clone();
                            async move {
                                match DOMAIN_SERVICE.read().toggle_shop_ban(&shop).await {
                                    Ok(_) => signal_changed_data(),
                                    Err(err) => report("Failed to change ban of shop", &err),
                                }
                            }
                        }
                    };
                    vec![
                        rsx! { Link { to: Route::Shop { id: shop.id.to_string() }, "{shop.name}" } },
                        rsx! { "{shop.owner_username}" },
                        rsx! { StatusTag { status: shop.status.to_string() } },
                        rsx! {
                            button {
                                class: "button is-small is-warning is-outlined",
                                onclick: toggle,
                                {ban_label(banned)}
                            }
                        },
                    ]
                })
                .collect::<Vec<_>>();
            rsx! {
                Table {
                    head: vec![rsx! { "Shop" }, rsx! { "Owner" }, rsx! { "Status" }, rsx! {}],
                    body,
                }
            }
        }
        Some(Err(err)) => read_failure("shops", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn Products() -> Element {
    let products = use_resource(|| async {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_all_products().await
    });

    match &*products.read() {
        Some(Ok(products)) => {
            let body = products
                .iter()
                .map(|product| {
                    let banned = product.status == domain::ListingStatus::Banned;
                    let toggle = {
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
                    vec![
                        rsx! {
                            Link { to: Route::Product { id: product.id.to_string() }, "{product.name}" }
                        },
                        rsx! { Price { amount: product.price } },
                        rsx! { StatusTag { status: product.status.to_string() } },
                        rsx! {
                            if product.status != domain::ListingStatus::Deleted {
                                button {
                                    class: "button is-small is-warning is-outlined",
                                    onclick: toggle,
                                    {ban_label(banned)}
                                }
                            }
                        },
                    ]
                })
                .collect::<Vec<_>>();
            rsx! {
                Table {
                    head: vec![rsx! { "Product" }, rsx! { "Price" }, rsx! { "Status" }, rsx! {}],
                    body,
                }
            }
        }
        Some(Err(err)) => read_failure("products", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn Categories() -> Element {
    let categories = use_resource(|| async {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_categories().await
    });
    let mut name = use_signal(String::new);
    let mut name_error = use_signal(String::new);

    let create = move |_| async move {
        let category = match domain::Name::new(&name.read()) {
            Ok(category) => category,
            Err(err) => {
                *name_error.write() = err.to_string();
                return;
            }
        };
        match DOMAIN_SERVICE.read().create_category(category).await {
            Ok(_) => {
                name.write().clear();
                signal_changed_data();
            }
            Err(err) => report("Failed to create category", &err),
        }
    };

    rsx! {
        Container {
            div {
                class: "field is-grouped",
                div {
                    class: "control is-expanded",
                    InputField {
                        value: name(),
                        error: name_error(),
                        has_changed: !name.read().is_empty(),
                        oninput: move |evt: FormEvent| {
                            *name.write() = evt.value();
                            name_error.write().clear();
                        },
                    }
                }
                div {
                    class: "control",
                    button {
                        class: "button is-primary",
                        onclick: create,
                        "Add category"
                    }
                }
            }
            match &*categories.read() {
                Some(Ok(categories)) if categories.is_empty() => rsx! { NoData {} },
                Some(Ok(categories)) => rsx! {
                    div {
                        class: "tags",
                        for category in categories.iter().cloned() {
                            span {
                                key: "{category.id}",
                                class: "tag is-medium",
                                "{category.name}"
                                button {
                                    class: "delete is-small",
                                    onclick: move |_| {
                                        let name = category.name.clone();
                                        async move {
                                            match DOMAIN_SERVICE.read().delete_category(&name).await {
                                                Ok(()) => signal_changed_data(),
                                                Err(err) => report("Failed to delete category", &err),
                                            }
                                        }
                                    },
                                }
                            }
                        }
                    }
                },
                Some(Err(err)) => read_failure("categories", err),
                None => rsx! { LoadingPage {} },
            }
        }
    }
}

#[component]
fn OrderLookup() -> Element {
    let mut order_id = use_signal(String::new);
    let mut order = use_signal(|| None::<domain::Order>);

    let look_up = move |_| async move {
        let id = order_id.read().trim().to_string();
        if id.is_empty() {
            return;
        }
        match DOMAIN_SERVICE.read().get_any_order(id.into()).await {
            Ok(found) => *order.write() = Some(found),
            Err(err) => {
                *order.write() = None;
                report("Failed to find order", &err);
            }
        }
    };

    rsx! {
        Container {
            div {
                class: "field has-addons",
                div {
                    class: "control is-expanded",
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Order ID",
                        value: order_id(),
                        oninput: move |evt: FormEvent| *order_id.write() = evt.value(),
                    }
                }
                div {
                    class: "control",
                    button { class: "button is-link", onclick: look_up, "Look up" }
                }
            }
            if let Some(order) = order() {
                OrderCard { order }
            }
        }
    }
}

#[component]
fn Log() -> Element {
    let entries = web_app::Service::new(storage::local_storage::Log).get_log_entries();
    rsx! {
        Title { title: "Log" }
        Container {
            match entries {
                Ok(entries) if entries.is_empty() => rsx! { NoData {} },
                Ok(entries) => rsx! {
                    for entry in entries.into_iter().rev() {
                        Message {
                            color: match entry.level {
                                log::Level::Error => Color::Danger,
                                log::Level::Warn => Color::Warning,
                                log::Level::Info => Color::Primary,
                                log::Level::Debug => Color::Info,
                                log::Level::Trace => Color::Dark,
                            },
                            p { class: "is-size-7", {entry.time} }
                            p { "{entry.message}" }
                        }
                    }
                },
                Err(err) => rsx! {
                    ErrorMessage { message: err.to_string() }
                },
            }
        }
    }
}
