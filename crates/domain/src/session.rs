use crate::{
    AddressInput, CreateError, DeleteError, ReadError, StorageError, UpdateError, User,
    error::impl_storage_failure,
};

pub const STUDENT_EMAIL_DOMAIN: &str = "@sis.hust.edu.vn";
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[allow(async_fn_in_trait)]
pub trait SessionService {
    async fn log_in(&self, credentials: Credentials) -> Result<User, LoginError>;
    async fn get_session(&self) -> Result<User, ReadError>;
    async fn log_out(&self) -> Result<(), DeleteError>;
    async fn register(&self, registration: Registration) -> Result<(), RegistrationError>;
    async fn request_password_reset(&self, email: &str) -> Result<(), UpdateError>;
    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), PasswordResetError>;
}

/// Token handling is left to the implementation. A successful `request_token` must make
/// subsequent calls authenticated until `delete_session` is called.
#[allow(async_fn_in_trait)]
pub trait SessionRepository {
    async fn request_token(&self, credentials: Credentials) -> Result<(), ReadError>;
    async fn read_session(&self) -> Result<User, ReadError>;
    async fn delete_session(&self) -> Result<(), DeleteError>;
    async fn create_account(&self, registration: Registration) -> Result<(), CreateError>;
    async fn request_password_reset(&self, email: &str) -> Result<(), UpdateError>;
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), UpdateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub fullname: String,
    pub email: String,
    pub address: AddressInput,
}

impl Registration {
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if !self.email.trim().ends_with(STUDENT_EMAIL_DOMAIN) {
            return Err(RegistrationError::NoStudentEmail);
        }
        Ok(())
    }
}

#[must_use]
pub fn is_admin(session: Option<&User>) -> bool {
    session.is_some_and(User::is_admin)
}

pub fn validate_new_password(
    new_password: &str,
    confirmation: &str,
) -> Result<(), PasswordResetError> {
    if new_password.is_empty() || confirmation.is_empty() {
        return Err(PasswordResetError::Empty);
    }
    if new_password != confirmation {
        return Err(PasswordResetError::Mismatch);
    }
    let len = new_password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(PasswordResetError::TooShort(len));
    }
    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    #[error("account is banned")]
    Banned,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for LoginError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => LoginError::Other("user not found".into()),
            ReadError::Storage(storage) => LoginError::Storage(storage),
            ReadError::Other(other) => LoginError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RegistrationError {
    #[error("email must end with @sis.hust.edu.vn")]
    NoStudentEmail,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<CreateError> for RegistrationError {
    fn from(value: CreateError) -> Self {
        match value {
            CreateError::Storage(storage) => RegistrationError::Storage(storage),
            CreateError::Other(other) => RegistrationError::Other(other),
            other => RegistrationError::Other(other.to_string().into()),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PasswordResetError {
    #[error("reset link is invalid")]
    MissingToken,
    #[error("password must not be empty")]
    Empty,
    #[error("passwords do not match")]
    Mismatch,
    #[error("password must be at least 6 characters ({0} < 6)")]
    TooShort(usize),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<UpdateError> for PasswordResetError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::Storage(storage) => PasswordResetError::Storage(storage),
            UpdateError::Other(other) => PasswordResetError::Other(other),
            other => PasswordResetError::Other(other.to_string().into()),
        }
    }
}

impl_storage_failure!(LoginError, RegistrationError, PasswordResetError);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn registration(email: &str) -> Registration {
        Registration {
            username: "alice".to_string(),
            password: "secret123".to_string(),
            fullname: "Alice".to_string(),
            email: email.to_string(),
            address: AddressInput::default(),
        }
    }

    #[rstest]
    #[case("alice@sis.hust.edu.vn", true)]
    #[case(" alice@sis.hust.edu.vn ", true)]
    #[case("alice@gmail.com", false)]
    #[case("", false)]
    fn test_registration_validate(#[case] email: &str, #[case] valid: bool) {
        let result = registration(email).validate();
        assert_eq!(result.is_ok(), valid);
        if !valid {
            assert!(matches!(result, Err(RegistrationError::NoStudentEmail)));
        }
    }

    #[test]
    fn test_is_admin() {
        assert!(!is_admin(None));
    }

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("secret", "secret").is_ok());
        assert!(matches!(
            validate_new_password("", ""),
            Err(PasswordResetError::Empty)
        ));
        assert!(matches!(
            validate_new_password("secret", ""),
            Err(PasswordResetError::Empty)
        ));
        assert!(matches!(
            validate_new_password("secret", "secreT"),
            Err(PasswordResetError::Mismatch)
        ));
        assert!(matches!(
            validate_new_password("12345", "12345"),
            Err(PasswordResetError::TooShort(5))
        ));
    }

    #[test]
    fn test_login_error_from_read_error() {
        assert!(matches!(
            LoginError::from(ReadError::Storage(StorageError::Unauthorized)),
            LoginError::Storage(StorageError::Unauthorized)
        ));
        assert!(matches!(
            LoginError::from(ReadError::NotFound),
            LoginError::Other(_)
        ));
    }

    #[test]
    fn test_session_errors_expose_storage_failure() {
        use crate::StorageFailure;

        assert!(LoginError::Storage(StorageError::Unauthorized).is_unauthorized());
        assert!(RegistrationError::Storage(StorageError::NoConnection).is_no_connection());
        assert!(PasswordResetError::Storage(StorageError::NoSession).is_no_session());
        assert!(PasswordResetError::Mismatch.storage_error().is_none());
    }
}
