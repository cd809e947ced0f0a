#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

use std::sync::{Arc, Mutex};

use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use log::error;

use bkmart_domain::{self as domain, StorageFailure};
use bkmart_storage as storage;
use bkmart_web_app::{self as web_app, SettingsService};

use component::{element::Icon, navbar::Navbar};
use page::{
    account::Account,
    admin::Admin,
    cart::Cart,
    checkout::Checkout,
    landing::Landing,
    login::{ForgotPassword, Login, ResetPassword, Signup},
    not_found::NotFound,
    product::{CreateProduct, Product, UpdateProduct},
    revenue::Revenue,
    search::Search,
    seller::{CreateShop, SellerChannel},
    shop::Shop,
    shopping::Shopping,
};

mod component;
mod page;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Navbar)]
    #[route("/")]
    Landing {},
    #[route("/shopping?:query&:category&:order")]
    Shopping { query: String, category: String, order: String },
    #[route("/search?:keyword")]
    Search { keyword: String },
    #[route("/product/:id")]
    Product { id: String },
    #[route("/shop/:id")]
    Shop { id: String },
    #[route("/shop/:id/revenue")]
    Revenue { id: String },
    #[route("/cart")]
    Cart {},
    #[route("/checkout?:product&:quantity")]
    Checkout { product: String, quantity: u32 },
    #[route("/account")]
    Account {},
    #[route("/login")]
    Login {},
    #[route("/signup")]
    Signup {},
    #[route("/forgot-password")]
    ForgotPassword {},
    #[route("/reset-password?:token")]
    ResetPassword { token: String },
    #[route("/seller-channel")]
    SellerChannel {},
    #[route("/create-shop")]
    CreateShop {},
    #[route("/create-product?:shop")]
    CreateProduct { shop: String },
    #[route("/update-product/:id")]
    UpdateProduct { id: String },
    #[route("/admin")]
    Admin {},
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

const NOTIFICATION_DURATION_MS: u32 = 5000;

type DomainService = domain::Service<
    storage::rest::REST<storage::rest::GlooNetSendRequest, storage::local_storage::Token>,
>;

static DOMAIN_SERVICE: GlobalSignal<DomainService> =
    Signal::global(|| domain::Service::new(storage::rest::REST::new()));
static WEB_APP_SERVICE: GlobalSignal<web_app::Service<storage::local_storage::UI>> =
    Signal::global(|| web_app::Service::new(storage::local_storage::UI));
static NOTIFICATIONS: GlobalSignal<Vec<(u64, String)>> = Signal::global(Vec::new);
static NEXT_NOTIFICATION: GlobalSignal<u64> = Signal::global(|| 0);
static NO_CONNECTION: GlobalSignal<bool> = Signal::global(|| false);
static DATA_CHANGED: GlobalSignal<usize> = Signal::global(|| 0);
static SESSION_CHANGED: GlobalSignal<usize> = Signal::global(|| 0);
static SETTINGS_CHANGED: GlobalSignal<usize> = Signal::global(|| 0);

fn main() {
    init_logging();
    dioxus::launch(App);
}

fn init_logging() {
    let _ = web_app::log::init(Arc::new(Mutex::new(storage::local_storage::Log)));
}

#[component]
fn App() -> Element {
    std::panic::set_hook(Box::new(|info| {
        error!("{info}");
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("main"))
            .map(|el| {
                el.set_inner_html(&format!("
                    <section class=\"section\">
                        <div class=\"container\">
                            <div class=\"message is-danger\">
                                <div class=\"message-header\">
                                    <p>Something went wrong</p>
                                </div>
                                <div class=\"message-body\">
                                    <div class=\"block\">
                                        An unexpected error occurred and the application cannot continue.
                                    </div>
                                    <div class=\"block\">
                                        <pre>{info}</pre>
                                    </div>
                                    <div class=\"block field is-grouped is-grouped-centered\">
                                        <button class=\"button\" onclick=\"location.reload()\">
                                            <span class=\"icon\">
                                                <i class=\"fa fa-arrow-rotate-right\"></i>
                                            </span>
                                            <span>Reload page</span>
                                        </button>
                                    </div>
                                </div>
                            </div>
                        </div>
                    </section>
                "));
                Some(())
            });
    }));

    let settings = use_resource(|| async {
        let _ = SETTINGS_CHANGED.read();
        WEB_APP_SERVICE.read().get_settings().await
    });
    if let Some(Ok(settings)) = &*settings.read() {
        apply_theme(settings.current_theme());
    }

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div {
            class: "container is-max-widescreen py-4",
            Router::<Route> {},
            Notifications {}
        }
    }
}

fn apply_theme(theme: web_app::Theme) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let value = match theme {
        web_app::Theme::Dark => "dark",
        web_app::Theme::Light | web_app::Theme::System => "light",
    };
    if let Err(err) = root.set_attribute("data-theme", value) {
        error!("failed to set theme: {err:?}");
    }
}

#[component]
fn Notifications() -> Element {
    let notifications = NOTIFICATIONS.read().clone();

    rsx! {
        div {
            class: "notifications",
            for (id, message) in notifications {
                div {
                    key: "{id}",
                    class: "notification is-danger is-light",
                    button {
                        class: "delete",
                        onclick: move |_| NOTIFICATIONS.write().retain(|(i, _)| *i != id),
                    }
                    Icon { name: "triangle-exclamation" }
                    span { "{message}" }
                }
            }
        }
    }
}

/// Show a message that disappears after a few seconds.
fn notify(message: impl Into<String>) {
    let id = NEXT_NOTIFICATION();
    *NEXT_NOTIFICATION.write() += 1;
    NOTIFICATIONS.write().push((id, message.into()));
    spawn_forever(async move {
        TimeoutFuture::new(NOTIFICATION_DURATION_MS).await;
        NOTIFICATIONS.write().retain(|(i, _)| *i != id);
    });
}

/// Report a failed action to the user.
///
/// A rejected session token leads back to the login page.
fn report<E: StorageFailure + std::fmt::Display>(action: &str, err: &E) {
    if err.is_unauthorized() {
        web_app::config::redirect_to_login();
    } else if err.is_no_connection() {
        *NO_CONNECTION.write() = true;
        notify(format!("{action}: no connection to server"));
    } else {
        notify(format!("{action}: {err}"));
    }
}

fn signal_changed_data() {
    *DATA_CHANGED.write() += 1;
}

fn signal_changed_session() {
    *SESSION_CHANGED.write() += 1;
    signal_changed_data();
}

/// The current user, reloaded whenever the session changes.
#[macro_export]
macro_rules! use_session {
    () => {{
        use_resource(|| async {
            let _ = $crate::SESSION_CHANGED.read();
            bkmart_domain::SessionService::get_session(&*$crate::DOMAIN_SERVICE.read()).await
        })
    }};
}

/// The current user, or a redirect to the login page if there is none.
#[macro_export]
macro_rules! ensure_session {
    () => {{
        let session = $crate::use_session!();
        if let Some(Err(ref err)) = *session.read() {
            if !bkmart_domain::StorageFailure::is_no_connection(err) {
                navigator().push($crate::Route::Login {});
            }
        }
        session
    }};
}

fn current_user(session: &Option<Result<domain::User, domain::ReadError>>) -> Option<domain::User> {
    match session {
        Some(Ok(user)) => Some(user.clone()),
        _ => None,
    }
}
