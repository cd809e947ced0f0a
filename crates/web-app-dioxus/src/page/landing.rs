use dioxus::prelude::*;

use bkmart_domain::{self as domain, ProductService};

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE, Route,
    component::{
        element::{LoadingPage, read_failure},
        product::ProductGrid,
    },
};

const FEATURED_PRODUCTS: usize = 8;

#[component]
pub fn Landing() -> Element {
    let products = use_resource(|| async {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_products().await
    });

    rsx! {
        section {
            class: "hero is-primary is-small mb-5",
            div {
                class: "hero-body has-text-centered",
                p { class: "title", "BKMart" }
                p { class: "subtitle", "The marketplace for students, by students" }
                Link {
                    class: "button is-light",
                    to: Route::Shopping { query: String::new(), category: String::new(), order: String::new() },
                    "Start shopping"
                }
            }
        }
        h2 { class: "title is-5 px-3", "New arrivals" }
        match &*products.read() {
            Some(Ok(products)) => {
                let featured = products
                    .iter()
                    .filter(|p| p.status.is_available())
                    .take(FEATURED_PRODUCTS)
                    .cloned()
                    .collect::<Vec<domain::Product>>();
                rsx! { ProductGrid { products: featured } }
            }
            Some(Err(err)) => read_failure("products", err),
            None => rsx! { LoadingPage {} },
        }
    }
}
