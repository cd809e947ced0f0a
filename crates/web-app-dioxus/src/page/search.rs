use dioxus::prelude::*;

use bkmart_domain::{self as domain, ProductService};

use crate::{
    DOMAIN_SERVICE, Route,
    component::{
        element::{LoadingPage, SearchBox, read_failure},
        product::ProductGrid,
    },
};

#[component]
pub fn Search(keyword: String) -> Element {
    let mut input = use_signal(|| keyword.clone());
    let products = use_resource(use_reactive!(|(keyword,)| async move {
        DOMAIN_SERVICE.read().search_products(&keyword).await
    }));
    let navigator = use_navigator();

    rsx! {
        form {
            class: "field has-addons px-3",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                navigator.replace(Route::Search { keyword: input.read().trim().to_string() });
            },
            SearchBox {
                search_term: input(),
                oninput: move |evt: FormEvent| *input.write() = evt.value(),
            }
            div {
                class: "control",
                button { class: "button is-link", r#type: "submit", "Search" }
            }
        }
        match &*products.read() {
            Some(Ok(products)) => {
                let found = domain::visible_products(products, false)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>();
                rsx! {
                    p { class: "px-3 mb-3 is-size-7 has-text-grey", "{found.len()} products found" }
                    ProductGrid { products: found }
                }
            }
            Some(Err(err)) => read_failure("products", err),
            None => rsx! { LoadingPage {} },
        }
    }
}
