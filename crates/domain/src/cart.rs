use crate::{
    Debouncer, DeleteError, ProductID, ReadError, ShopID, StorageError, UpdateError, User, UserID,
};

/// Delay after the last quantity change before the cart is updated.
pub const QUANTITY_UPDATE_DELAY_MS: u32 = 500;

pub type QuantityDebouncer = Debouncer<ProductID>;

#[allow(async_fn_in_trait)]
pub trait CartService {
    async fn get_cart(&self, session: Option<&User>) -> Result<Cart, ReadError>;
    async fn add_to_cart(
        &self,
        session: Option<&User>,
        product_id: ProductID,
        quantity: u32,
    ) -> Result<Cart, UpdateError>;
    async fn update_quantity(
        &self,
        session: Option<&User>,
        product_id: ProductID,
        quantity: u32,
    ) -> Result<Cart, UpdateError>;
    async fn remove_from_cart(
        &self,
        session: Option<&User>,
        product_id: ProductID,
    ) -> Result<Cart, DeleteError>;
    async fn clear_cart(&self, session: Option<&User>) -> Result<Cart, DeleteError>;

    /// Update the quantity once no further change for the same product happened within the
    /// delay. Returns `None` if the change was superseded.
    async fn update_quantity_debounced(
        &self,
        debouncer: &QuantityDebouncer,
        session: Option<&User>,
        product_id: ProductID,
        quantity: u32,
        delay: impl Future<Output = ()>,
    ) -> Option<Result<Cart, UpdateError>> {
        let quantity = debouncer
            .debounce(product_id.clone(), quantity, delay)
            .await?;
        Some(self.update_quantity(session, product_id, quantity).await)
    }
}

#[allow(async_fn_in_trait)]
pub trait CartRepository {
    async fn read_cart(&self, user_id: UserID) -> Result<Cart, ReadError>;
    async fn add_cart_item(
        &self,
        user_id: UserID,
        product_id: ProductID,
        quantity: u32,
    ) -> Result<(), UpdateError>;
    async fn replace_cart_item(
        &self,
        user_id: UserID,
        product_id: ProductID,
        quantity: u32,
    ) -> Result<(), UpdateError>;
    async fn delete_cart_item(
        &self,
        user_id: UserID,
        product_id: ProductID,
    ) -> Result<(), DeleteError>;
    async fn delete_cart(&self, user_id: UserID) -> Result<(), DeleteError>;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_amount: f64,
}

impl Cart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: ProductID,
    /// Missing if the product no longer exists.
    pub product_name: Option<String>,
    pub price: f64,
    pub quantity: u32,
    pub shop_id: Option<ShopID>,
    pub weight: Option<u32>,
    pub discontinued: bool,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// The user on whose behalf the cart is modified.
pub fn cart_owner(session: Option<&User>) -> Result<UserID, StorageError> {
    session.map(|u| u.id.clone()).ok_or(StorageError::NoSession)
}

pub fn check_quantity(quantity: u32) -> Result<u32, UpdateError> {
    if quantity < 1 {
        return Err(UpdateError::InvalidQuantity(quantity));
    }
    Ok(quantity)
}

/// Quantity after stepping up or down by one, never below 1.
#[must_use]
pub fn step_quantity(quantity: u32, increase: bool) -> u32 {
    if increase {
        quantity.saturating_add(1)
    } else {
        quantity.saturating_sub(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn item(product_id: &str, price: f64, quantity: u32) -> CartItem {
        CartItem {
            product_id: product_id.into(),
            product_name: Some(product_id.to_string()),
            price,
            quantity,
            shop_id: None,
            weight: None,
            discontinued: false,
        }
    }

    #[test]
    fn test_cart_item_count() {
        let cart = Cart {
            items: vec![item("1", 10.0, 2), item("2", 5.0, 3)],
            total_amount: 35.0,
        };
        assert_eq!(cart.item_count(), 5);
        assert!(!cart.is_empty());
        assert!(Cart::default().is_empty());
    }

    #[test]
    fn test_cart_item_line_total() {
        assert_approx_eq!(item("1", 12_500.0, 3).line_total(), 37_500.0);
    }

    #[test]
    fn test_check_quantity() {
        assert!(matches!(
            check_quantity(0),
            Err(UpdateError::InvalidQuantity(0))
        ));
        assert_eq!(check_quantity(1).ok(), Some(1));
    }

    #[test]
    fn test_cart_owner() {
        assert!(matches!(cart_owner(None), Err(StorageError::NoSession)));
    }

    #[rstest]
    #[case(1, true, 2)]
    #[case(2, false, 1)]
    #[case(1, false, 1)]
    #[case(0, false, 1)]
    #[case(u32::MAX, true, u32::MAX)]
    fn test_step_quantity(#[case] quantity: u32, #[case] increase: bool, #[case] expected: u32) {
        assert_eq!(step_quantity(quantity, increase), expected);
    }
}
