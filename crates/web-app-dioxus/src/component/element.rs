use dioxus::prelude::*;
use strum::Display;

use bkmart_domain as domain;
use bkmart_web_app::{self as web_app, format_vnd};

#[allow(dead_code)]
#[derive(Display, Clone, Copy, PartialEq)]
pub enum Color {
    #[strum(to_string = "text")]
    Text,
    #[strum(to_string = "link")]
    Link,
    #[strum(to_string = "primary")]
    Primary,
    #[strum(to_string = "info")]
    Info,
    #[strum(to_string = "success")]
    Success,
    #[strum(to_string = "warning")]
    Warning,
    #[strum(to_string = "danger")]
    Danger,
    #[strum(to_string = "dark")]
    Dark,
}

#[component]
pub fn Block(children: Element, class: Option<String>) -> Element {
    rsx! {
        div {
            class: "block",
            class: if let Some(class) = &class { "{class}" },
            {children}
        }
    }
}

#[component]
pub fn CenteredBlock(children: Element) -> Element {
    rsx! {
        div { class: "block has-text-centered", {children} }
    }
}

#[component]
pub fn DataBox(children: Element, title: String) -> Element {
    rsx! {
        div {
            class: "box has-text-centered mx-2 p-3",
            p {
                class: "is-size-6",
                {title}
            }
            p {
                class: "is-size-5 has-text-weight-bold",
                {children}
            }
        }
    }
}

#[component]
pub fn Loading() -> Element {
    rsx! {
        div {
            class: "is-size-4 has-text-centered",
            i { class: "fas fa-spinner fa-pulse" }
        }
    }
}

#[component]
pub fn LoadingPage() -> Element {
    rsx! {
        div {
            class: "is-size-2 has-text-centered m-6",
            i { class: "fas fa-spinner fa-pulse" }
        }
    }
}

#[component]
pub fn Message(children: Element, color: Color) -> Element {
    rsx! {
        div {
            class: "message my-1 is-{color}",
            div {
                class: "message-body p-2",
                {children}
            }
        }
    }
}

#[component]
pub fn ErrorMessage(message: String) -> Element {
    rsx! {
        div {
            class: "message is-danger mx-2",
            div {
                class: "message-body has-text-dark",
                div {
                    class: "title has-text-danger is-size-4",
                    "{message}"
                }
            }
        }
    }
}

#[component]
pub fn NotFound(element: String) -> Element {
    rsx! {
        ErrorMessage { message: "{element} not found" }
    }
}

#[component]
pub fn NoData(text: Option<String>) -> Element {
    rsx! {
        div {
            class: "block is-size-7 has-text-centered has-text-grey-light mb-6",
            {text.unwrap_or("No data".to_string())}
        }
    }
}

#[component]
pub fn NoConnection() -> Element {
    rsx! {
        div {
            class: "block has-text-centered has-text-grey-light mb-6",
            IconText { icon: "plug-circle-xmark", text: "No connection to server" }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadFailureKind {
    Unauthorized,
    NoConnection,
    NotFound,
    Other,
}

impl From<&domain::ReadError> for ReadFailureKind {
    fn from(err: &domain::ReadError) -> Self {
        use domain::StorageFailure;

        if err.is_unauthorized() {
            ReadFailureKind::Unauthorized
        } else if err.is_no_connection() {
            ReadFailureKind::NoConnection
        } else if matches!(err, domain::ReadError::NotFound) {
            ReadFailureKind::NotFound
        } else {
            ReadFailureKind::Other
        }
    }
}

/// The usual rendering of a failed resource.
///
/// A rejected session token leads back to the login page.
#[component]
pub fn ReadFailure(element: String, error: String, kind: ReadFailureKind) -> Element {
    use_effect(use_reactive!(|(kind,)| {
        if kind == ReadFailureKind::Unauthorized {
            web_app::config::redirect_to_login();
        }
    }));

    match kind {
        ReadFailureKind::Unauthorized => rsx! { LoadingPage {} },
        ReadFailureKind::NoConnection => rsx! { NoConnection {} },
        ReadFailureKind::NotFound => rsx! { NotFound { element } },
        ReadFailureKind::Other => rsx! {
            ErrorMessage { message: "Failed to get {element}: {error}" }
        },
    }
}

pub fn read_failure(element: &str, err: &domain::ReadError) -> Element {
    rsx! {
        ReadFailure {
            element: element.to_string(),
            error: err.to_string(),
            kind: ReadFailureKind::from(err),
        }
    }
}

#[component]
pub fn Icon(
    name: String,
    is_small: Option<bool>,
    px: Option<u8>,
    onclick: Option<EventHandler<MouseEvent>>,
) -> Element {
    rsx! {
        span {
            class: "icon",
            class: if is_small.unwrap_or_default() { "is-small" },
            class: if let Some(px) = px { "px-{px}" },
            onclick: move |evt| {
                if let Some(event_handler) = onclick {
                    event_handler.call(evt);
                }
            },
            i { class: "fas fa-{name}" }
        }
    }
}

#[component]
pub fn IconText(
    icon: String,
    text: String,
    color: Option<Color>,
    onclick: Option<EventHandler<MouseEvent>>,
) -> Element {
    rsx! {
        span {
            class: "icon-text",
            class: if let Some(color) = color { "has-text-{color}" },
            onclick: move |evt| {
                if let Some(event_handler) = onclick {
                    event_handler.call(evt);
                }
            },
            Icon { name: icon }
            span { {text} }
        }
    }
}

#[component]
pub fn Price(amount: f64) -> Element {
    rsx! {
        span { class: "has-text-weight-bold", style: "white-space:nowrap", {format_vnd(amount)} }
    }
}

#[component]
pub fn StatusTag(status: String) -> Element {
    let color = match status.as_str() {
        "ACTIVE" | "DELIVERED" => Color::Success,
        "BANNED" | "CANCELLED" => Color::Danger,
        "DELETED" => Color::Dark,
        "PENDING" | "AWAITING_PICKUP" => Color::Warning,
        _ => Color::Info,
    };
    rsx! {
        span { class: "tag is-{color} is-light", "{status}" }
    }
}

#[component]
pub fn Tags(tags: Vec<String>) -> Element {
    rsx! {
        div {
            class: "tags",
            for tag in tags {
                span { class: "tag is-link is-light", "{tag}" }
            }
        }
    }
}

#[component]
pub fn Dialog(
    children: Element,
    title: Option<Element>,
    close_event: EventHandler<MouseEvent>,
    color: Option<Color>,
) -> Element {
    let color = color.unwrap_or(Color::Primary);
    rsx! {
        div {
            class: "modal is-active",
            div {
                class: "modal-background",
                onclick: close_event
            }
            div {
                class: "modal-content",
                div {
                    class: "message is-{color} mx-2",
                    div {
                        class: "message-body has-text-text-bold has-background-scheme-main",
                        if let Some(title) = title {
                            div {
                                class: "title has-text-{color}",
                                {title}
                            }
                        }
                        {children}
                    }
                }
            }
            button {
                aria_label: "close",
                class: "modal-close",
                onclick: close_event,
            }
        }
    }
}

#[component]
pub fn DeleteConfirmationDialog(
    element_type: String,
    element_name: Element,
    delete_event: EventHandler<MouseEvent>,
    cancel_event: EventHandler<MouseEvent>,
    is_loading: bool,
) -> Element {
    rsx! {
        Dialog {
            title: rsx! {
                span {
                    "Delete the {element_type} "
                    {element_name}
                    "?"
                }
            },
            close_event: move |evt| cancel_event.call(evt),
            color: Color::Danger,
            div {
                class: "block",
                "The {element_type} will no longer be available to buyers."
            }
            div {
                class: "field is-grouped is-grouped-centered",
                div {
                    class: "control",
                    onclick: move |evt| cancel_event.call(evt),
                    button {
                        class: "button is-light is-soft",
                        "No"
                    }
                }
                div {
                    class: "control",
                    onclick: move |evt| delete_event.call(evt),
                    button {
                        class: "button is-danger",
                        class: if is_loading { "is-loading" },
                        "Yes, delete {element_type}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn Container(children: Element, has_text_centered: Option<bool>) -> Element {
    rsx! {
        div {
            class: "container px-3",
            class: if has_text_centered.unwrap_or_default() { "has-text-centered" },
            {children}
        }
    }
}

#[component]
pub fn Title(title: String, class: Option<String>) -> Element {
    rsx! {
        CenteredBlock {
            div {
                class: "container",
                h1 {
                    class: "title is-5",
                    class: if let Some(c) = &class { "{c}" },
                    "{title}"
                }
            }
        }
    }
}

#[component]
pub fn Table(head: Option<Vec<Element>>, body: Vec<Vec<Element>>) -> Element {
    rsx! {
        div {
            class: "table-container mt-4",
            table {
                class: "table is-fullwidth is-hoverable",
                if let Some(head) = head {
                    thead {
                        tr {
                            for element in head {
                                th {
                                    {element}
                                }
                            }
                        }
                    }
                }
                tbody {
                    for row in body {
                        tr {
                            for element in row {
                                td {
                                    {element}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn Tabs(tabs: Vec<&'static str>, active: Signal<usize>) -> Element {
    rsx! {
        div {
            class: "tabs is-centered",
            ul {
                for (i, tab) in tabs.into_iter().enumerate() {
                    li {
                        class: if active() == i { "is-active" },
                        a { onclick: move |_| *active.write() = i, "{tab}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn SearchBox(search_term: String, oninput: EventHandler<FormEvent>) -> Element {
    rsx! {
        div {
            class: "control has-icons-left is-flex-grow-1",
            span {
                class: "icon is-left",
                i { class: "fas fa-search" }
            }
            input {
                class: "input",
                r#type: "text",
                value: search_term,
                oninput: move |evt| oninput.call(evt),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_read_failure_kind() {
        assert_eq!(
            ReadFailureKind::from(&domain::ReadError::Storage(
                domain::StorageError::Unauthorized
            )),
            ReadFailureKind::Unauthorized
        );
        assert_eq!(
            ReadFailureKind::from(&domain::ReadError::Storage(
                domain::StorageError::NoConnection
            )),
            ReadFailureKind::NoConnection
        );
        assert_eq!(
            ReadFailureKind::from(&domain::ReadError::NotFound),
            ReadFailureKind::NotFound
        );
        assert_eq!(
            ReadFailureKind::from(&domain::ReadError::Storage(domain::StorageError::Rejected {
                code: 1005,
                message: "rejected".to_string(),
            })),
            ReadFailureKind::Other
        );
    }
}
