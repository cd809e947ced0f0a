use dioxus::prelude::*;

use bkmart_domain::{self as domain, CategoryService, ProductService};
use bkmart_web_app::SettingsService;

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE, Route, SETTINGS_CHANGED, WEB_APP_SERVICE,
    component::{
        element::{LoadingPage, SearchBox, read_failure},
        product::ProductGrid,
    },
};

#[component]
pub fn Shopping(query: String, category: String, order: String) -> Element {
    let products = use_resource(|| async {
        let _ = DATA_CHANGED.read();
        DOMAIN_SERVICE.read().get_products().await
    });
    let categories = use_resource(|| async { DOMAIN_SERVICE.read().get_categories().await });
    let settings = use_resource(|| async {
        let _ = SETTINGS_CHANGED.read();
        WEB_APP_SERVICE.read().get_settings().await
    });
    let navigator = use_navigator();

    let product_order = if order.is_empty() {
        match &*settings.read() {
            Some(Ok(settings)) => settings.product_order(),
            _ => domain::ProductOrder::Default,
        }
    } else {
        domain::ProductOrder::from(order.as_str())
    };
    let filter = domain::ProductFilter {
        query: query.clone(),
        category: if category.is_empty() {
            domain::ALL_CATEGORIES.to_string()
        } else {
            category.clone()
        },
    };

    let category_names: Vec<String> = match &*categories.read() {
        Some(Ok(categories)) => categories.iter().map(|c| c.name.clone()).collect(),
        _ => vec![],
    };

    rsx! {
        div {
            class: "field is-grouped is-grouped-multiline px-3",
            SearchBox {
                search_term: query.clone(),
                oninput: {
                    let category = category.clone();
                    let order = order.clone();
                    move |evt: FormEvent| {
                        navigator.replace(Route::Shopping {
                            query: evt.value(),
                            category: category.clone(),
                            order: order.clone(),
                        });
                    }
                },
            }
            div {
                class: "control",
                div {
                    class: "select",
                    select {
                        onchange: {
                            let query = query.clone();
                            let order = order.clone();
                            move |evt: FormEvent| {
                                navigator.replace(Route::Shopping {
                                    query: query.clone(),
                                    category: evt.value(),
                                    order: order.clone(),
                                });
                            }
                        },
                        option {
                            value: domain::ALL_CATEGORIES,
                            selected: filter.category == domain::ALL_CATEGORIES,
                            "All categories"
                        }
                        for name in category_names {
                            option {
                                value: "{name}",
                                selected: filter.category == name,
                                "{name}"
                            }
                        }
                    }
                }
            }
            div {
                class: "control",
                div {
                    class: "select",
                    select {
                        onchange: {
                            let query = query.clone();
                            let category = category.clone();
                            move |evt: FormEvent| {
                                navigator.replace(Route::Shopping {
                                    query: query.clone(),
                                    category: category.clone(),
                                    order: evt.value(),
                                });
                            }
                        },
                        for o in domain::ProductOrder::ALL {
                            option {
                                value: "{o}",
                                selected: o == product_order,
                                "{o.label()}"
                            }
                        }
                    }
                }
            }
            div {
                class: "control",
                button {
                    class: "button",
                    title: "Search all products on the server",
                    onclick: {
                        let query = query.clone();
                        move |_| {
                            navigator.push(Route::Search { keyword: query.trim().to_string() });
                        }
                    },
                    "Search"
                }
            }
        }
        match &*products.read() {
            Some(Ok(products)) => {
                let visible = domain::visible_products(products, false)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>();
                let shown = domain::filter_products(&visible, &filter, product_order)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>();
                rsx! { ProductGrid { products: shown } }
            }
            Some(Err(err)) => read_failure("products", err),
            None => rsx! { LoadingPage {} },
        }
    }
}
