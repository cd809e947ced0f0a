use dioxus::prelude::*;

use bkmart_domain::{self as domain, CartService, SessionService, StorageFailure};
use bkmart_web_app as web_app;
use bkmart_web_app::SettingsService;

use crate::{
    DATA_CHANGED, DOMAIN_SERVICE, NO_CONNECTION, Route, SETTINGS_CHANGED, WEB_APP_SERVICE,
    component::element::{Color, Dialog, ErrorMessage, Icon, Loading},
    notify, signal_changed_session, use_session,
};

#[component]
pub fn Navbar() -> Element {
    let mut menu_visible = use_signal(|| false);
    let settings_visible = use_signal(|| false);
    let session = use_session!();
    let settings = use_resource(|| async {
        let _ = SETTINGS_CHANGED.read();
        WEB_APP_SERVICE.read().get_settings().await
    });
    let navigator = use_navigator();

    let user = match *session.read() {
        Some(Ok(ref user)) => Some(user.clone()),
        Some(Err(ref err)) => {
            if err.is_no_connection() {
                *NO_CONNECTION.write() = true;
            }
            None
        }
        None => None,
    };
    let cart = use_resource(move || async move {
        let _ = DATA_CHANGED.read();
        let user = match &*session.read() {
            Some(Ok(user)) => Some(user.clone()),
            _ => None,
        };
        DOMAIN_SERVICE.read().get_cart(user.as_ref()).await
    });
    let cart_count = match &*cart.read() {
        Some(Ok(cart)) => cart.item_count(),
        _ => 0,
    };
    let is_admin = domain::is_admin(user.as_ref());

    let page_title = match use_route::<Route>() {
        Route::Landing {} | Route::Shopping { .. } => "BKMart".to_string(),
        Route::Search { ref keyword } => format!("Search: {keyword}"),
        Route::Product { .. } | Route::UpdateProduct { .. } | Route::CreateProduct { .. } => {
            "Product".to_string()
        }
        Route::Shop { .. } | Route::CreateShop {} => "Shop".to_string(),
        Route::Revenue { .. } => "Revenue".to_string(),
        Route::Cart {} => "Cart".to_string(),
        Route::Checkout { .. } => "Checkout".to_string(),
        Route::Account {} => {
            if let Some(ref user) = user {
                user.username.clone()
            } else {
                "Account".to_string()
            }
        }
        Route::Login {} => "Log in".to_string(),
        Route::Signup {} => "Sign up".to_string(),
        Route::ForgotPassword {} | Route::ResetPassword { .. } => "Password".to_string(),
        Route::SellerChannel {} => "Seller channel".to_string(),
        Route::Admin {} => "Administration".to_string(),
        Route::NotFound { .. } => String::new(),
    };

    rsx! {
        nav {
            class: "navbar is-fixed-top is-primary has-shadow has-text-weight-bold",
            div {
                class: "container",
                div {
                    class: "navbar-brand is-flex-grow-1",
                    Link {
                        class: "navbar-item is-size-5",
                        to: Route::Landing {},
                        Icon { name: "store" }
                    }
                    div { class: "navbar-item is-size-5", "{page_title}" }
                    div { class: "mx-auto" }
                    if NO_CONNECTION() {
                        a {
                            class: "navbar-item is-size-5 mx-1",
                            title: "No connection to server",
                            Icon { name: "plug-circle-xmark" }
                        }
                    }
                    if !is_admin {
                        Link {
                            class: "navbar-item is-size-5",
                            to: Route::Cart {},
                            Icon { name: "cart-shopping" }
                            if cart_count > 0 {
                                span { class: "tag is-rounded is-danger is-small", "{cart_count}" }
                            }
                        }
                    }
                    a {
                        aria_expanded: menu_visible(),
                        aria_label: "menu",
                        class: "navbar-burger ml-0",
                        class: if menu_visible() { "is-active" },
                        role: "button",
                        onclick: move |_| { *menu_visible.write() = !menu_visible() },
                        span { aria_hidden: "true" }
                        span { aria_hidden: "true" }
                        span { aria_hidden: "true" }
                        span { aria_hidden: "true" }
                    }
                }
                div {
                    class: "navbar-menu is-flex-grow-0",
                    class: if menu_visible() { "is-active" },
                    div {
                        class: "navbar-end",
                        NavbarLink { icon: "bag-shopping", text: "Shopping", to: Route::Shopping { query: String::new(), category: String::new(), order: String::new() }, menu_visible }
                        if let Some(ref user) = user {
                            NavbarLink { icon: "user", text: "Account", to: Route::Account {}, menu_visible }
                            if user.is_admin() {
                                NavbarLink { icon: "gears", text: "Administration", to: Route::Admin {}, menu_visible }
                            } else {
                                NavbarLink { icon: "shop", text: "Seller channel", to: Route::SellerChannel {}, menu_visible }
                            }
                        }
                        a {
                            class: "navbar-item",
                            onclick: {
                                let mut settings_visible = settings_visible;
                                move |_| {
                                    *settings_visible.write() = true;
                                    *menu_visible.write() = false;
                                }
                            },
                            Icon { name: "gear", px: 5 }
                            "Settings"
                        }
                        if let Some(user) = user {
                            a {
                                class: "navbar-item",
                                onclick: move |_| {
                                    async move {
                                        match DOMAIN_SERVICE.read().log_out().await {
                                            Ok(()) => {
                                                signal_changed_session();
                                                navigator.push(Route::Landing {});
                                            }
                                            Err(err) => notify(format!("Failed to log out: {err}")),
                                        }
                                        *menu_visible.write() = false;
                                    }
                                },
                                Icon { name: "sign-out-alt", px: 5 }
                                "Log out ({user.username})"
                            }
                        } else {
                            NavbarLink { icon: "sign-in-alt", text: "Log in", to: Route::Login {}, menu_visible }
                        }
                    }
                }
            }
        }

        if *settings_visible.read() {
            Settings { settings, settings_visible }
        }

        Outlet::<Route> {}
    }
}

#[component]
fn NavbarLink(icon: String, text: String, to: Route, menu_visible: Signal<bool>) -> Element {
    let navigator = use_navigator();
    rsx! {
        a {
            class: "navbar-item",
            onclick: move |_| {
                *menu_visible.write() = false;
                navigator.push(to.clone());
            },
            Icon { name: icon, px: 5 }
            "{text}"
        }
    }
}

#[component]
fn Settings(
    settings: Resource<Result<web_app::Settings, String>>,
    settings_visible: Signal<bool>,
) -> Element {
    let save = |settings: web_app::Settings| async move {
        if let Err(err) = WEB_APP_SERVICE.write().set_settings(settings).await {
            notify(format!("Failed to save settings: {err}"));
        }
        *SETTINGS_CHANGED.write() += 1;
    };

    match settings.read().clone() {
        Some(Ok(settings)) => rsx! {
            Dialog {
                color: Color::Primary,
                title: rsx! { "Settings" },
                close_event: move |_| {
                    *settings_visible.write() = false;
                },
                p {
                    class: "mb-5",
                    h1 { class: "subtitle", "Theme" }
                    div {
                        class: "field has-addons",
                        for (theme, icon, text) in [
                            (web_app::Theme::Light, "sun", "Light"),
                            (web_app::Theme::Dark, "moon", "Dark"),
                            (web_app::Theme::System, "desktop", "System"),
                        ] {
                            p {
                                class: "control",
                                button {
                                    class: "button",
                                    class: if settings.theme == theme { "is-link" },
                                    onclick: {
                                        let settings = settings.clone();
                                        move |_| {
                                            let mut settings = settings.clone();
                                            settings.theme = theme;
                                            save(settings)
                                        }
                                    },
                                    Icon { name: icon.to_string(), is_small: true }
                                    span { "{text}" }
                                }
                            }
                        }
                    }
                }
                p {
                    class: "mb-5",
                    h1 { class: "subtitle", "Default product order" }
                    div {
                        class: "select",
                        select {
                            onchange: {
                                let settings = settings.clone();
                                move |evt: FormEvent| {
                                    let mut settings = settings.clone();
                                    settings.product_order = evt.value();
                                    save(settings)
                                }
                            },
                            for order in domain::ProductOrder::ALL {
                                option {
                                    value: "{order}",
                                    selected: settings.product_order() == order,
                                    "{order.label()}"
                                }
                            }
                        }
                    }
                }
                p {
                    class: "is-size-7 has-text-grey",
                    "Version {web_app::config::VERSION}"
                }
            }
        },
        Some(Err(err)) => rsx! {
            ErrorMessage { message: "Failed to get settings: {err}" }
        },
        None => rsx! { Loading {} },
    }
}
