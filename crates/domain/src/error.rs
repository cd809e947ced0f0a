#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("conflict")]
    Conflict,
    #[error("nothing to order")]
    NothingToOrder,
    #[error("no delivery address")]
    MissingAddress,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("conflict")]
    Conflict,
    #[error("quantity must be at least 1 ({0} < 1)")]
    InvalidQuantity(u32),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for UpdateError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => UpdateError::Other("not found".into()),
            ReadError::Storage(storage) => UpdateError::Storage(storage),
            ReadError::Other(other) => UpdateError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for DeleteError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => DeleteError::Other("not found".into()),
            ReadError::Storage(storage) => DeleteError::Storage(storage),
            ReadError::Other(other) => DeleteError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error("no session")]
    NoSession,
    #[error("unauthorized")]
    Unauthorized,
    #[error("{message} ({code})")]
    Rejected { code: i32, message: String },
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

/// Access to the storage failure underlying a service error.
pub trait StorageFailure {
    fn storage_error(&self) -> Option<&StorageError>;

    fn is_no_connection(&self) -> bool {
        matches!(self.storage_error(), Some(StorageError::NoConnection))
    }

    fn is_no_session(&self) -> bool {
        matches!(self.storage_error(), Some(StorageError::NoSession))
    }

    fn is_unauthorized(&self) -> bool {
        matches!(self.storage_error(), Some(StorageError::Unauthorized))
    }
}

macro_rules! impl_storage_failure {
    ($($error: ident),+) => {
        $(
            impl $crate::StorageFailure for $error {
                fn storage_error(&self) -> Option<&$crate::StorageError> {
                    match self {
                        $error::Storage(storage) => Some(storage),
                        _ => None,
                    }
                }
            }
        )+
    };
}

pub(crate) use impl_storage_failure;

impl_storage_failure!(ReadError, CreateError, UpdateError, DeleteError);

impl StorageFailure for StorageError {
    fn storage_error(&self) -> Option<&StorageError> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_error_from_read_error() {
        assert!(matches!(
            UpdateError::from(ReadError::Storage(StorageError::NoSession)),
            UpdateError::Storage(StorageError::NoSession)
        ));
        assert!(matches!(
            UpdateError::from(ReadError::NotFound),
            UpdateError::Other(error) if error.to_string() == "not found"
        ));
        assert!(matches!(
            UpdateError::from(ReadError::Other("foo".into())),
            UpdateError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_delete_error_from_read_error() {
        assert!(matches!(
            DeleteError::from(ReadError::Storage(StorageError::Unauthorized)),
            DeleteError::Storage(StorageError::Unauthorized)
        ));
        assert!(matches!(
            DeleteError::from(ReadError::Other("foo".into())),
            DeleteError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_storage_failure() {
        assert!(ReadError::Storage(StorageError::NoConnection).is_no_connection());
        assert!(!ReadError::NotFound.is_no_connection());
        assert!(UpdateError::Storage(StorageError::Unauthorized).is_unauthorized());
        assert!(!UpdateError::InvalidQuantity(0).is_unauthorized());
        assert!(CreateError::MissingAddress.storage_error().is_none());
        assert!(StorageError::Unauthorized.is_unauthorized());
        assert!(DeleteError::Storage(StorageError::NoSession).is_no_session());
    }

    #[test]
    fn test_rejected_display() {
        assert_eq!(
            StorageError::Rejected {
                code: 1017,
                message: "Cart is empty".to_string()
            }
            .to_string(),
            "Cart is empty (1017)"
        );
    }
}
