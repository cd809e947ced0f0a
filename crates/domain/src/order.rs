use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use derive_more::{Deref, Display};

use crate::{CreateError, ProductID, ReadError, ShopID, UpdateError, UserID};

#[allow(async_fn_in_trait)]
pub trait OrderService {
    async fn get_user_orders(&self, user_id: UserID) -> Result<Vec<Order>, ReadError>;
    async fn get_shop_orders(&self, shop_id: ShopID) -> Result<Vec<Order>, ReadError>;
    async fn get_order(&self, id: OrderID) -> Result<Order, ReadError>;
    async fn request_cancellation(&self, id: OrderID) -> Result<Order, UpdateError>;
    async fn respond_to_cancellation(&self, id: OrderID, accept: bool)
    -> Result<Order, UpdateError>;
    async fn confirm_order(&self, id: OrderID) -> Result<Order, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait OrderRepository {
    async fn read_user_orders(&self, user_id: UserID) -> Result<Vec<Order>, ReadError>;
    async fn read_shop_orders(&self, shop_id: ShopID) -> Result<Vec<Order>, ReadError>;
    async fn read_order(&self, id: OrderID) -> Result<Order, ReadError>;
    async fn create_cart_orders(&self, product_ids: Vec<ProductID>)
    -> Result<Vec<Order>, CreateError>;
    async fn create_instant_order(
        &self,
        product_id: ProductID,
        quantity: u32,
    ) -> Result<Order, CreateError>;
    async fn request_cancellation(&self, id: OrderID) -> Result<Order, UpdateError>;
    async fn respond_to_cancellation(&self, id: OrderID, accept: bool)
    -> Result<Order, UpdateError>;
    async fn confirm_order(&self, id: OrderID) -> Result<Order, UpdateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderID,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: Option<NaiveDateTime>,
    pub shipment: Option<Shipment>,
    pub cancellation_requested: bool,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// A buyer may ask to cancel an order that has not been confirmed yet.
    #[must_use]
    pub fn may_request_cancellation(&self) -> bool {
        self.status == OrderStatus::Pending && !self.cancellation_requested
    }

    #[must_use]
    pub fn awaits_cancellation_response(&self) -> bool {
        self.cancellation_requested && self.status != OrderStatus::Cancelled
    }

    #[must_use]
    pub fn may_confirm(&self) -> bool {
        self.status == OrderStatus::Pending
            && !self.cancellation_requested
            && !self.items.iter().any(|i| i.product_deleted)
    }

    #[must_use]
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(8)
            .map_or(self.id.len(), |(i, _)| i);
        &self.id[..end]
    }
}

#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderID(String);

impl From<&str> for OrderID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OrderID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: Option<ProductID>,
    pub product_name: String,
    pub quantity: u32,
    pub price_at_purchase: f64,
    pub product_deleted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub id: String,
    pub status: String,
    pub shipping_fee: f64,
    pub estimated_delivery_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    AwaitingPickup,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    Unknown(String),
}

impl OrderStatus {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "Processing",
            OrderStatus::AwaitingPickup => "Awaiting pickup",
            OrderStatus::Paid => "Paid",
            OrderStatus::Shipped => "Shipping",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Unknown(status) => status,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        match value {
            "" | "PENDING" => OrderStatus::Pending,
            "AWAITING_PICKUP" => OrderStatus::AwaitingPickup,
            "PAID" => OrderStatus::Paid,
            "SHIPPED" => OrderStatus::Shipped,
            "DELIVERED" => OrderStatus::Delivered,
            "CANCELLED" => OrderStatus::Cancelled,
            _ => OrderStatus::Unknown(value.to_string()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OrderStatus::Pending => "PENDING",
                OrderStatus::AwaitingPickup => "AWAITING_PICKUP",
                OrderStatus::Paid => "PAID",
                OrderStatus::Shipped => "SHIPPED",
                OrderStatus::Delivered => "DELIVERED",
                OrderStatus::Cancelled => "CANCELLED",
                OrderStatus::Unknown(status) => status,
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn order(status: OrderStatus, cancellation_requested: bool) -> Order {
        Order {
            id: "0123456789abcdef".into(),
            total_amount: 100_000.0,
            status,
            created_at: None,
            shipment: None,
            cancellation_requested,
            items: vec![OrderItem {
                product_id: Some("p1".into()),
                product_name: "Lamp".to_string(),
                quantity: 1,
                price_at_purchase: 100_000.0,
                product_deleted: false,
            }],
        }
    }

    #[rstest]
    #[case("PENDING", OrderStatus::Pending)]
    #[case("AWAITING_PICKUP", OrderStatus::AwaitingPickup)]
    #[case("PAID", OrderStatus::Paid)]
    #[case("SHIPPED", OrderStatus::Shipped)]
    #[case("DELIVERED", OrderStatus::Delivered)]
    #[case("CANCELLED", OrderStatus::Cancelled)]
    #[case("COMPLETED", OrderStatus::Unknown("COMPLETED".to_string()))]
    fn test_order_status_from_str(#[case] value: &str, #[case] expected: OrderStatus) {
        assert_eq!(OrderStatus::from(value), expected);
        assert_eq!(expected.to_string(), value);
    }

    #[test]
    fn test_order_status_from_empty_str() {
        assert_eq!(OrderStatus::from(""), OrderStatus::Pending);
    }

    #[rstest]
    #[case(OrderStatus::Pending, false, true)]
    #[case(OrderStatus::Pending, true, false)]
    #[case(OrderStatus::AwaitingPickup, false, false)]
    #[case(OrderStatus::Cancelled, false, false)]
    fn test_order_may_request_cancellation(
        #[case] status: OrderStatus,
        #[case] cancellation_requested: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(
            order(status, cancellation_requested).may_request_cancellation(),
            expected
        );
    }

    #[rstest]
    #[case(OrderStatus::Pending, true, true)]
    #[case(OrderStatus::Shipped, true, true)]
    #[case(OrderStatus::Cancelled, true, false)]
    #[case(OrderStatus::Pending, false, false)]
    fn test_order_awaits_cancellation_response(
        #[case] status: OrderStatus,
        #[case] cancellation_requested: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(
            order(status, cancellation_requested).awaits_cancellation_response(),
            expected
        );
    }

    #[test]
    fn test_order_may_confirm() {
        assert!(order(OrderStatus::Pending, false).may_confirm());
        assert!(!order(OrderStatus::Pending, true).may_confirm());
        assert!(!order(OrderStatus::Paid, false).may_confirm());

        let mut order = order(OrderStatus::Pending, false);
        order.items[0].product_deleted = true;
        assert!(!order.may_confirm());
    }

    #[test]
    fn test_order_short_id() {
        assert_eq!(order(OrderStatus::Pending, false).short_id(), "01234567");
        let mut order = order(OrderStatus::Pending, false);
        order.id = "abc".into();
        assert_eq!(order.short_id(), "abc");
    }
}
