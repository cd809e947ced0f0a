use dioxus::prelude::*;

use bkmart_domain::{self as domain, SessionService, StorageFailure};

use crate::{
    DOMAIN_SERVICE, NO_CONNECTION, Route,
    component::{
        address::{AddressFields, AddressForm},
        element::{Block, Color, Message},
        form::InputField,
    },
    signal_changed_session,
};

#[component]
pub fn Login() -> Element {
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_loading = use_signal(|| false);
    let navigator = use_navigator();

    let log_in = move |_| async move {
        *is_loading.write() = true;
        let credentials = domain::Credentials {
            username: username.read().trim().to_string(),
            password: password.read().clone(),
        };
        let result = DOMAIN_SERVICE.read().log_in(credentials).await;
        *is_loading.write() = false;
        match result {
            Ok(user) => {
                *error.write() = None;
                signal_changed_session();
                if user.is_admin() {
                    navigator.push(Route::Admin {});
                } else {
                    navigator.push(Route::Landing {});
                }
            }
            Err(err) => {
                if err.is_no_connection() {
                    *NO_CONNECTION.write() = true;
                }
                *error.write() = Some(err.to_string());
            }
        }
    };

    rsx! {
        AuthBox {
            title: "Log in",
            if let Some(err) = error() {
                Message { color: Color::Danger, "{err}" }
            }
            InputField {
                label: "Username".to_string(),
                value: username(),
                has_changed: false,
                oninput: move |evt: FormEvent| *username.write() = evt.value(),
            }
            InputField {
                label: "Password".to_string(),
                r#type: "password".to_string(),
                value: password(),
                has_changed: false,
                oninput: move |evt: FormEvent| *password.write() = evt.value(),
            }
            div {
                class: "field is-grouped is-grouped-centered",
                button {
                    class: "button is-primary",
                    class: if is_loading() { "is-loading" },
                    disabled: username.read().trim().is_empty() || password.read().is_empty(),
                    onclick: log_in,
                    "Log in"
                }
            }
            Block {
                class: "has-text-centered is-size-7",
                Link { to: Route::ForgotPassword {}, "Forgot password?" }
                " · "
                Link { to: Route::Signup {}, "Create an account" }
            }
        }
    }
}

#[component]
pub fn Signup() -> Element {
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut fullname = use_signal(String::new);
    let mut email = use_signal(String::new);
    let address = use_signal(AddressFields::default);
    let mut error = use_signal(|| None::<String>);
    let mut registered = use_signal(|| false);
    let mut is_loading = use_signal(|| false);

    let register = move |_| async move {
        let address = match address.read().to_input() {
            Ok(address) => address,
            Err(err) => {
                *error.write() = Some(err);
                return;
            }
        };
        let registration = domain::Registration {
            username: username.read().trim().to_string(),
            password: password.read().clone(),
            fullname: fullname.read().trim().to_string(),
            email: email.read().trim().to_string(),
            address,
        };
        let new_password = &registration.password;
        if let Err(err) = domain::validate_new_password(new_password, new_password) {
            *error.write() = Some(err.to_string());
            return;
        }
        *is_loading.write() = true;
        let result = DOMAIN_SERVICE.read().register(registration).await;
        *is_loading.write() = false;
        match result {
            Ok(()) => {
                *error.write() = None;
                *registered.write() = true;
            }
            Err(err) => *error.write() = Some(err.to_string()),
        }
    };

    if registered() {
        return rsx! {
            AuthBox {
                title: "Sign up",
                Message { color: Color::Success, "Your account has been created." }
                Block {
                    class: "has-text-centered",
                    Link { class: "button is-primary", to: Route::Login {}, "Log in" }
                }
            }
        };
    }

    rsx! {
        AuthBox {
            title: "Sign up",
            if let Some(err) = error() {
                Message { color: Color::Danger, "{err}" }
            }
            InputField {
                label: "Username".to_string(),
                value: username(),
                has_changed: false,
                oninput: move |evt: FormEvent| *username.write() = evt.value(),
            }
            InputField {
                label: "Password".to_string(),
                r#type: "password".to_string(),
                help: format!("At least {} characters", domain::MIN_PASSWORD_LENGTH),
                value: password(),
                has_changed: false,
                oninput: move |evt: FormEvent| *password.write() = evt.value(),
            }
            InputField {
                label: "Full name".to_string(),
                value: fullname(),
                has_changed: false,
                oninput: move |evt: FormEvent| *fullname.write() = evt.value(),
            }
            InputField {
                label: "Student email".to_string(),
                r#type: "email".to_string(),
                help: format!("An address ending in {}", domain::STUDENT_EMAIL_DOMAIN),
                value: email(),
                has_changed: false,
                oninput: move |evt: FormEvent| *email.write() = evt.value(),
            }
            AddressForm { fields: address }
            div {
                class: "field is-grouped is-grouped-centered",
                button {
                    class: "button is-primary",
                    class: if is_loading() { "is-loading" },
                    disabled: username.read().trim().is_empty() || email.read().trim().is_empty(),
                    onclick: register,
                    "Sign up"
                }
            }
            Block {
                class: "has-text-centered is-size-7",
                "Already registered? "
                Link { to: Route::Login {}, "Log in" }
            }
        }
    }
}

#[component]
pub fn ForgotPassword() -> Element {
    let mut email = use_signal(String::new);
    let mut result = use_signal(|| None::<Result<(), String>>);
    let mut is_loading = use_signal(|| false);

    let request = move |_| async move {
        *is_loading.write() = true;
        let email = email.read().trim().to_string();
        let response = DOMAIN_SERVICE.read().request_password_reset(&email).await;
        *is_loading.write() = false;
        *result.write() = Some(response.map_err(|err| err.to_string()));
    };

    rsx! {
        AuthBox {
            title: "Forgot password",
            match result() {
                Some(Ok(())) => rsx! {
                    Message { color: Color::Success, "If the address is registered, a reset link has been sent to it." }
                },
                Some(Err(err)) => rsx! {
                    Message { color: Color::Danger, "{err}" }
                },
                None => rsx! {},
            }
            InputField {
                label: "Email".to_string(),
                r#type: "email".to_string(),
                value: email(),
                has_changed: false,
                oninput: move |evt: FormEvent| *email.write() = evt.value(),
            }
            div {
                class: "field is-grouped is-grouped-centered",
                button {
                    class: "button is-primary",
                    class: if is_loading() { "is-loading" },
                    disabled: email.read().trim().is_empty(),
                    onclick: request,
                    "Send reset link"
                }
            }
        }
    }
}

#[component]
pub fn ResetPassword(token: String) -> Element {
    let mut password = use_signal(String::new);
    let mut confirmation = use_signal(String::new);
    let mut result = use_signal(|| None::<Result<(), String>>);
    let mut is_loading = use_signal(|| false);

    let reset = move |_| {
        let token = token.clone();
        async move {
            *is_loading.write() = true;
            let response = DOMAIN_SERVICE
                .read()
                .reset_password(&token, &password.read(), &confirmation.read())
                .await;
            *is_loading.write() = false;
            *result.write() = Some(response.map_err(|err| err.to_string()));
        }
    };

    if let Some(Ok(())) = result() {
        return rsx! {
            AuthBox {
                title: "Reset password",
                Message { color: Color::Success, "Your password has been changed." }
                Block {
                    class: "has-text-centered",
                    Link { class: "button is-primary", to: Route::Login {}, "Log in" }
                }
            }
        };
    }

    rsx! {
        AuthBox {
            title: "Reset password",
            if let Some(Err(err)) = result() {
                Message { color: Color::Danger, "{err}" }
            }
            InputField {
                label: "New password".to_string(),
                r#type: "password".to_string(),
                value: password(),
                has_changed: false,
                oninput: move |evt: FormEvent| *password.write() = evt.value(),
            }
            InputField {
                label: "Confirm password".to_string(),
                r#type: "password".to_string(),
                value: confirmation(),
                has_changed: false,
                oninput: move |evt: FormEvent| *confirmation.write() = evt.value(),
            }
            div {
                class: "field is-grouped is-grouped-centered",
                button {
                    class: "button is-primary",
                    class: if is_loading() { "is-loading" },
                    onclick: reset,
                    "Change password"
                }
            }
        }
    }
}

#[component]
fn AuthBox(title: String, children: Element) -> Element {
    rsx! {
        div {
            class: "columns is-centered mt-5",
            div {
                class: "column is-half-tablet is-one-third-desktop",
                div {
                    class: "box",
                    h1 { class: "title is-4 has-text-centered", "{title}" }
                    {children}
                }
            }
        }
    }
}
