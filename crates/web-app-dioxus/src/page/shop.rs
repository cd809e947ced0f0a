use dioxus::prelude::*;

use bkmart_domain::{self as domain, AdminService, OrderService, ProductService, ShopService};

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE, Route,
    component::{
        element::{
            Block, DeleteConfirmationDialog, Icon, LoadingPage, NoData, StatusTag, Tabs,
            read_failure,
        },
        order::OrderCard,
        product::ProductGrid,
    },
    current_user, report, signal_changed_data, use_session,
};

#[component]
pub fn Shop(id: String) -> Element {
    let session = use_session!();
    let shop = use_resource(use_reactive!(|(id,)| async move {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_shop(id.into()).await
    }));

    let user = current_user(&session.read());

    match &*shop.read() {
        Some(Ok(shop)) => rsx! {
            ShopDetail { shop: shop.clone(), user }
        },
        Some(Err(err)) => read_failure("shop", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn ShopDetail(shop: domain::Shop, user: Option<domain::User>) -> Element {
    let tab = use_signal(|| 0);
    let mut delete_dialog = use_signal(|| false);
    let mut is_loading = use_signal(|| false);
    let navigator = use_navigator();

    let may_manage = shop.may_manage(user.as_ref());
    let is_admin = domain::is_admin(user.as_ref());

    let delete = {
        let id = shop.id.clone();
        move |_| {
            let id = id.clone();
            async move {
                *is_loading.write() = true;
                let result = DOMAIN_SERVICE.read().delete_shop(id).await;
                *is_loading.write() = false;
                match result {
                    Ok(_) => {
                        *delete_dialog.write() = false;
                        signal_changed_data();
                        navigator.replace(Route::SellerChannel {});
                    }
                    Err(err) => report("Failed to delete shop", &err),
                }
            }
        }
    };
    let toggle_ban = {
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

    rsx! {
        Block {
            class: "px-3",
            h1 {
                class: "title is-4",
                "{shop.name} "
                StatusTag { status: shop.status.to_string() }
            }
            p { class: "subtitle is-6 has-text-grey", "by {shop.owner_username}" }
            if let Some(address) = &shop.address {
                p { class: "is-size-7", "{address}" }
            }
        }
        if may_manage {
            div {
                class: "buttons is-right px-3",
                Link {
                    class: "button is-primary",
                    to: Route::CreateProduct { shop: shop.id.to_string() },
                    Icon { name: "plus" }
                    span { "Add product" }
                }
                Link {
                    class: "button is-link is-outlined",
                    to: Route::Revenue { id: shop.id.to_string() },
                    Icon { name: "chart-line" }
                    span { "Revenue" }
                }
                if is_admin {
                    button {
                        class: "button is-warning is-outlined",
                        onclick: toggle_ban,
                        if shop.status == domain::ListingStatus::Banned { "Unban" } else { "Ban" }
                    }
                }
                button {
                    class: "button is-danger is-outlined",
                    onclick: move |_| *delete_dialog.write() = true,
                    Icon { name: "trash" }
                    span { "Delete shop" }
                }
            }
            Tabs { tabs: vec!["Products", "Orders"], active: tab }
        }
        if may_manage && tab() == 1 {
            ShopOrders { shop_id: shop.id.clone() }
        } else {
            ShopProducts { shop_id: shop.id.clone(), may_manage }
        }
        if delete_dialog() {
            DeleteConfirmationDialog {
                element_type: "shop",
                element_name: rsx! { span { class: "is-italic", "{shop.name}" } },
                delete_event: delete,
                cancel_event: move |_| *delete_dialog.write() = false,
                is_loading: is_loading(),
            }
        }
    }
}

#[component]
fn ShopProducts(shop_id: domain::ShopID, may_manage: bool) -> Element {
    let products = use_resource(use_reactive!(|(shop_id,)| async move {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_shop_products(shop_id).await
    }));

    match &*products.read() {
        Some(Ok(products)) => {
            let visible = domain::visible_products(products, may_manage)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>();
            rsx! { ProductGrid { products: visible } }
        }
        Some(Err(err)) => read_failure("products", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn ShopOrders(shop_id: domain::ShopID) -> Element {
    let orders = use_resource(use_reactive!(|(shop_id,)| async move {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_shop_orders(shop_id).await
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
                    OrderActions { order }
                }
            }
        },
        Some(Err(err)) => read_failure("orders", err),
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn OrderActions(order: domain::Order) -> Element {
    let respond = {
        let id = order.id.clone();
        move |accept: bool| {
            let id = id.clone();
            async move {
                match DOMAIN_SERVICE
                    .read()
                    .respond_to_cancellation(id, accept)
                    .await
                {
                    Ok(_) => signal_changed_data(),
                    Err(err) => report("Failed to respond to cancellation request", &err),
                }
            }
        }
    };
    let confirm = {
        let id = order.id.clone();
        move |_| {
            let id = id.clone();
            async move {
                match DOMAIN_SERVICE.read().confirm_order(id).await {
                    Ok(_) => signal_changed_data(),
                    Err(err) => report("Failed to confirm order", &err),
                }
            }
        }
    };
    let accept = respond.clone();
    let decline = respond;

    rsx! {
        div {
            class: "buttons",
            if order.awaits_cancellation_response() {
                button {
                    class: "button is-small is-danger",
                    onclick: move |_| accept(true),
                    "Accept cancellation"
                }
                button {
                    class: "button is-small is-light",
                    onclick: move |_| decline(false),
                    "Decline cancellation"
                }
            }
            if order.may_confirm() {
                button {
                    class: "button is-small is-success",
                    onclick: confirm,
                    "Confirm order"
                }
            }
        }
    }
}
