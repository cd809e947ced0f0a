use std::{collections::BTreeSet, fmt};

use derive_more::{Deref, Display};

use crate::{Address, AddressInput, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait UserService {
    async fn get_user(&self, id: UserID) -> Result<User, ReadError>;
    async fn update_profile(&self, id: UserID, profile: ProfileUpdate)
    -> Result<User, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait UserRepository {
    async fn read_user(&self, id: UserID) -> Result<User, ReadError>;
    async fn replace_profile(&self, id: UserID, profile: ProfileUpdate)
    -> Result<User, UpdateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserID,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
    pub address: Option<Address>,
    pub status: AccountStatus,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    #[must_use]
    pub fn is_banned(&self) -> bool {
        self.status == AccountStatus::Banned
    }
}

#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserID(String);

impl From<&str> for UserID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Admin,
    User,
    Other(String),
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "ADMIN" => Role::Admin,
            "USER" => Role::User,
            _ => Role::Other(value.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::User => write!(f, "USER"),
            Role::Other(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    #[default]
    Active,
    Banned,
}

impl From<&str> for AccountStatus {
    fn from(value: &str) -> Self {
        match value {
            "BANNED" => AccountStatus::Banned,
            _ => AccountStatus::Active,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AccountStatus::Active => "ACTIVE",
                AccountStatus::Banned => "BANNED",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub fullname: String,
    pub email: String,
    pub address: AddressInput,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn user(roles: &[&str], status: AccountStatus) -> User {
        User {
            id: "u1".into(),
            username: "alice".to_string(),
            fullname: "Alice".to_string(),
            email: "alice@sis.hust.edu.vn".to_string(),
            roles: roles.iter().map(|r| Role::from(*r)).collect(),
            address: None,
            status,
        }
    }

    #[rstest]
    #[case(&["ADMIN"], true)]
    #[case(&["USER", "ADMIN"], true)]
    #[case(&["USER"], false)]
    #[case(&["admin"], false)]
    #[case(&[], false)]
    fn test_user_is_admin(#[case] roles: &[&str], #[case] expected: bool) {
        assert_eq!(user(roles, AccountStatus::Active).is_admin(), expected);
    }

    #[rstest]
    #[case(AccountStatus::Active, false)]
    #[case(AccountStatus::Banned, true)]
    fn test_user_is_banned(#[case] status: AccountStatus, #[case] expected: bool) {
        assert_eq!(user(&["USER"], status).is_banned(), expected);
    }

    #[rstest]
    #[case("ADMIN", Role::Admin)]
    #[case("USER", Role::User)]
    #[case("SELLER", Role::Other("SELLER".to_string()))]
    fn test_role_from_str(#[case] value: &str, #[case] expected: Role) {
        assert_eq!(Role::from(value), expected);
        assert_eq!(expected.to_string(), value);
    }

    #[rstest]
    #[case("ACTIVE", AccountStatus::Active)]
    #[case("BANNED", AccountStatus::Banned)]
    #[case("", AccountStatus::Active)]
    fn test_account_status_from_str(#[case] value: &str, #[case] expected: AccountStatus) {
        assert_eq!(AccountStatus::from(value), expected);
    }
}
