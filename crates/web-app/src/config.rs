pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Base URL of the backend, set at compile time by `BKMART_API_URL`.
pub const API_BASE_URL: &str = match option_env!("BKMART_API_URL") {
    Some(url) => url,
    None => DEFAULT_API_BASE_URL,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const LOGIN_PATH: &str = "/login";

/// Navigate the browser to the login page, dropping all application state.
pub fn redirect_to_login() {
    let Some(window) = web_sys::window() else {
        log::error!("failed to access window to redirect to login");
        return;
    };
    if let Err(err) = window.location().set_href(LOGIN_PATH) {
        log::error!("failed to redirect to login: {err:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_url() {
        assert!(API_BASE_URL.starts_with("http"));
        assert!(!VERSION.is_empty());
    }
}
