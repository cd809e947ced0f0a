use derive_more::{Deref, Display};

use crate::{
    Address, AddressInput, CreateError, DeleteError, ListingStatus, Name, ReadError, User, UserID,
};

#[allow(async_fn_in_trait)]
pub trait ShopService {
    async fn get_shop(&self, id: ShopID) -> Result<Shop, ReadError>;
    async fn get_shops(&self) -> Result<Vec<Shop>, ReadError>;
    async fn get_owner_shops(&self, owner_username: &str) -> Result<Vec<Shop>, ReadError>;
    async fn create_shop(&self, draft: ShopDraft) -> Result<Shop, CreateError>;
    async fn delete_shop(&self, id: ShopID) -> Result<ShopID, DeleteError>;
    async fn get_shop_revenue(&self, id: ShopID) -> Result<ShopRevenue, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait ShopRepository {
    async fn read_shop(&self, id: ShopID) -> Result<Shop, ReadError>;
    async fn read_shops(&self) -> Result<Vec<Shop>, ReadError>;
    async fn read_owner_shops(&self, owner_username: &str) -> Result<Vec<Shop>, ReadError>;
    async fn create_shop(&self, draft: ShopDraft) -> Result<Shop, CreateError>;
    async fn delete_shop(&self, id: ShopID) -> Result<ShopID, DeleteError>;
    async fn read_shop_revenue(&self, id: ShopID) -> Result<ShopRevenue, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    pub id: ShopID,
    pub name: String,
    pub owner_id: UserID,
    pub owner_username: String,
    pub address: Option<Address>,
    pub status: ListingStatus,
}

impl Shop {
    /// The owner and admins may manage a shop.
    #[must_use]
    pub fn may_manage(&self, user: Option<&User>) -> bool {
        user.is_some_and(|u| u.is_admin() || u.id == self.owner_id)
    }
}

#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShopID(String);

impl From<&str> for ShopID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ShopID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopDraft {
    pub name: Name,
    pub address: AddressInput,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ShopRevenue {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub pending_orders: u64,
    pub awaiting_pickup_orders: u64,
    pub shipped_orders: u64,
    pub delivered_orders: u64,
    pub cancelled_orders: u64,
    pub average_order_value: f64,
}

impl ShopRevenue {
    /// Share of orders that were delivered, in percent.
    #[must_use]
    pub fn delivery_rate(&self) -> Option<f64> {
        if self.total_orders == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.delivered_orders as f64 / self.total_orders as f64 * 100.0)
    }
}
