/// Storage of the bearer token of the current session.
pub trait TokenRepository {
    fn read_token(&self) -> Option<String>;
    fn write_token(&self, token: &str) -> Result<(), String>;
    fn delete_token(&self);
}

impl<T: TokenRepository> TokenRepository for std::rc::Rc<T> {
    fn read_token(&self) -> Option<String> {
        (**self).read_token()
    }

    fn write_token(&self, token: &str) -> Result<(), String> {
        (**self).write_token(token)
    }

    fn delete_token(&self) {
        (**self).delete_token();
    }
}

#[must_use]
pub fn authorization_header(token: &str) -> String {
    format!("Bearer {token}")
}
