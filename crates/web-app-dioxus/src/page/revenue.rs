use dioxus::prelude::*;

use bkmart_domain::ShopService;

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE, Route,
    component::element::{DataBox, LoadingPage, Price, Title, read_failure},
    ensure_session,
};

#[component]
pub fn Revenue(id: String) -> Element {
    ensure_session!();
    let shop = {
        let id = id.clone();
        use_resource(use_reactive!(|(id,)| async move {
            DOMAIN_SERVICE.read().get_shop(id.into()).await
        }))
    };
    let revenue = {
        let id = id.clone();
        use_resource(use_reactive!(|(id,)| async move {
            let _ = DATA_CHANGED.read();
            DOMAIN_SERVICE.read().get_shop_revenue(id.into()).await
        }))
    };

    let title = match &*shop.read() {
        Some(Ok(shop)) => format!("Revenue of {}", shop.name),
        _ => "Revenue".to_string(),
    };

    match &*revenue.read() {
        Some(Ok(revenue)) => {
            let delivery_rate = revenue
                .delivery_rate()
                .map_or("-".to_string(), |rate| format!("{rate:.1} %"));
            let counts = [
                ("Total orders", revenue.total_orders),
                ("Processing", revenue.pending_orders),
                ("Awaiting pickup", revenue.awaiting_pickup_orders),
                ("Shipping", revenue.shipped_orders),
                ("Delivered", revenue.delivered_orders),
                ("Cancelled", revenue.cancelled_orders),
            ];
            rsx! {
                Title { title }
                div {
                    class: "is-flex is-flex-wrap-wrap is-justify-content-center",
                    DataBox {
                        title: "Total revenue",
                        Price { amount: revenue.total_revenue }
                    }
                    DataBox {
                        title: "Average order value",
                        Price { amount: revenue.average_order_value }
                    }
                    DataBox {
                        title: "Delivery rate",
                        "{delivery_rate}"
                    }
                }
                div {
                    class: "is-flex is-flex-wrap-wrap is-justify-content-center",
                    for (label, count) in counts {
                        DataBox { title: label, "{count}" }
                    }
                }
                div {
                    class: "has-text-centered mt-4",
                    Link {
                        class: "button is-light",
                        to: Route::Shop { id: id.clone() },
                        "Back to shop"
                    }
                }
            }
        }
        Some(Err(err)) => read_failure("revenue", err),
        None => rsx! { LoadingPage {} },
    }
}
