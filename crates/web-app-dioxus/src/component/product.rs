use dioxus::prelude::*;

use bkmart_domain as domain;

use crate::{
    Route,
    component::element::{NoData, Price, StatusTag},
};

#[component]
pub fn ProductGrid(products: Vec<domain::Product>) -> Element {
    if products.is_empty() {
        return rsx! { NoData { text: "No products found".to_string() } };
    }
    rsx! {
        div {
            class: "columns is-multiline is-mobile",
            for product in products {
                div {
                    key: "{product.id}",
                    class: "column is-half-mobile is-one-third-tablet is-one-quarter-desktop",
                    ProductCard { product }
                }
            }
        }
    }
}

#[component]
pub fn ProductCard(product: domain::Product) -> Element {
    let navigator = use_navigator();
    let id = product.id.to_string();
    rsx! {
        div {
            class: "card is-clickable",
            onclick: move |_| {
                navigator.push(Route::Product { id: id.clone() });
            },
            div {
                class: "card-image",
                ProductImage { url: product.images.first().cloned(), alt: product.name.clone() }
            }
            div {
                class: "card-content p-3",
                p { class: "is-size-6 has-text-weight-semibold", "{product.name}" }
                if !product.brand.is_empty() {
                    p { class: "is-size-7 has-text-grey", "{product.brand}" }
                }
                p { Price { amount: product.price } }
                if product.status != domain::ListingStatus::Active {
                    StatusTag { status: product.status.to_string() }
                }
            }
        }
    }
}

#[component]
pub fn ProductImage(url: Option<String>, alt: String) -> Element {
    rsx! {
        figure {
            class: "image is-4by3",
            if let Some(url) = url {
                img { src: "{url}", alt: "{alt}", style: "object-fit:cover" }
            } else {
                div {
                    class: "has-background-light has-text-grey-light is-flex \
                            is-align-items-center is-justify-content-center",
                    style: "position:absolute;inset:0",
                    i { class: "fas fa-image fa-2x" }
                }
            }
        }
    }
}
