use crate::{
    AccountStatus, ListingStatus, Order, OrderID, Product, ProductID, ReadError, Shop, ShopID,
    UpdateError, User, UserID,
};

#[allow(async_fn_in_trait)]
pub trait AdminService {
    async fn get_all_users(&self) -> Result<Vec<User>, ReadError>;
    async fn get_user_detail(&self, id: UserID) -> Result<UserDetail, ReadError>;
    async fn set_user_banned(&self, id: UserID, banned: bool) -> Result<(), UpdateError>;
    async fn get_all_shops(&self) -> Result<Vec<Shop>, ReadError>;
    async fn set_shop_banned(&self, id: ShopID, banned: bool) -> Result<(), UpdateError>;
    async fn get_all_products(&self) -> Result<Vec<Product>, ReadError>;
    async fn set_product_banned(&self, id: ProductID, banned: bool) -> Result<(), UpdateError>;
    async fn get_any_order(&self, id: OrderID) -> Result<Order, ReadError>;

    /// Ban the user if not banned yet, unban otherwise. Returns the new ban state.
    async fn toggle_user_ban(&self, user: &User) -> Result<bool, UpdateError> {
        let banned = toggle_ban(user.status);
        self.set_user_banned(user.id.clone(), banned).await?;
        Ok(banned)
    }

    async fn toggle_shop_ban(&self, shop: &Shop) -> Result<bool, UpdateError> {
        let banned = toggle_ban(shop.status);
        self.set_shop_banned(shop.id.clone(), banned).await?;
        Ok(banned)
    }

    async fn toggle_product_ban(&self, product: &Product) -> Result<bool, UpdateError> {
        let banned = toggle_ban(product.status);
        self.set_product_banned(product.id.clone(), banned).await?;
        Ok(banned)
    }
}

#[allow(async_fn_in_trait)]
pub trait AdminRepository {
    async fn read_all_users(&self) -> Result<Vec<User>, ReadError>;
    async fn read_user_detail(&self, id: UserID) -> Result<UserDetail, ReadError>;
    async fn replace_user_ban(&self, id: UserID, banned: bool) -> Result<(), UpdateError>;
    async fn read_all_shops(&self) -> Result<Vec<Shop>, ReadError>;
    async fn replace_shop_ban(&self, id: ShopID, banned: bool) -> Result<(), UpdateError>;
    async fn read_all_products(&self) -> Result<Vec<Product>, ReadError>;
    async fn replace_product_ban(&self, id: ProductID, banned: bool) -> Result<(), UpdateError>;
    async fn read_any_order(&self, id: OrderID) -> Result<Order, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDetail {
    pub id: UserID,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub status: AccountStatus,
    pub recent_orders: Vec<Order>,
    pub recent_activities: Vec<String>,
}

pub trait Bannable {
    fn is_banned(&self) -> bool;
}

impl Bannable for AccountStatus {
    fn is_banned(&self) -> bool {
        *self == AccountStatus::Banned
    }
}

impl Bannable for ListingStatus {
    fn is_banned(&self) -> bool {
        *self == ListingStatus::Banned
    }
}

/// The requested ban state when toggling: ban unless already banned.
#[must_use]
pub fn toggle_ban(status: impl Bannable) -> bool {
    !status.is_banned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(AccountStatus::Active, true)]
    #[case(AccountStatus::Banned, false)]
    fn test_toggle_ban_account(#[case] status: AccountStatus, #[case] expected: bool) {
        assert_eq!(toggle_ban(status), expected);
    }

    #[rstest]
    #[case(ListingStatus::Active, true)]
    #[case(ListingStatus::Deleted, true)]
    #[case(ListingStatus::Banned, false)]
    fn test_toggle_ban_listing(#[case] status: ListingStatus, #[case] expected: bool) {
        assert_eq!(toggle_ban(status), expected);
    }
}
