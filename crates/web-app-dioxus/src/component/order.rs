use dioxus::prelude::*;

use bkmart_domain as domain;

use crate::component::element::{Price, StatusTag, Table};

#[component]
pub fn OrderCard(order: domain::Order, children: Element) -> Element {
    let created_at = order
        .created_at
        .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default();
    let shipping = order.shipment.as_ref().map(|s| {
        (
            s.shipping_fee,
            s.estimated_delivery_date
                .map(|d| d.format("%d/%m/%Y").to_string()),
        )
    });
    let rows = order
        .items
        .iter()
        .map(|item| {
            let quantity = item.quantity;
            let price = item.price_at_purchase;
            vec![
                rsx! {
                    span {
                        class: if item.product_deleted { "has-text-grey" },
                        "{item.product_name}"
                        if item.product_deleted {
                            span { class: "tag is-dark is-light ml-2", "Deleted" }
                        }
                    }
                },
                rsx! { "{quantity}" },
                rsx! { Price { amount: price } },
            ]
        })
        .collect::<Vec<_>>();

    rsx! {
        div {
            class: "box",
            div {
                class: "is-flex is-justify-content-space-between is-flex-wrap-wrap",
                span {
                    class: "has-text-weight-bold",
                    "Order #{order.short_id()}"
                }
                span { class: "has-text-grey", "{created_at}" }
                span {
                    StatusTag { status: order.status.to_string() }
                    if order.awaits_cancellation_response() {
                        span { class: "tag is-warning ml-2", "Cancellation requested" }
                    }
                }
            }
            Table {
                head: vec![rsx! { "Product" }, rsx! { "Quantity" }, rsx! { "Price" }],
                body: rows,
            }
            if let Some((fee, delivery)) = shipping {
                p {
                    class: "is-size-7",
                    "Shipping: "
                    Price { amount: fee }
                    if let Some(date) = delivery {
                        " (estimated delivery {date})"
                    }
                }
            }
            p {
                class: "has-text-right",
                "Total: "
                Price { amount: order.total_amount }
            }
            div {
                class: "field is-grouped is-grouped-right mt-2",
                {children}
            }
        }
    }
}
