use std::collections::BTreeMap;

use crate::{CartItem, CreateError, Destination, Order, Product, ProductID, ReadError, ShopID, User};

pub const DEFAULT_ORIGIN_DISTRICT_CODE: &str = "1488";
pub const DEFAULT_ORIGIN_WARD_CODE: &str = "1A0607";
pub const FALLBACK_SHIPPING_FEE: f64 = 35_000.0;
/// Assumed weight of an item without positive weight, in grams.
pub const DEFAULT_ITEM_WEIGHT: u32 = 500;
/// Weight used if a parcel would otherwise weigh nothing, in grams.
pub const DEFAULT_PARCEL_WEIGHT: u32 = 1000;
pub const BUY_NOW_DEFAULT_WEIGHT: u32 = 200;

#[allow(async_fn_in_trait)]
pub trait CheckoutService {
    /// Shipping fees per shop. Failed lookups are replaced by [`FALLBACK_SHIPPING_FEE`].
    async fn estimate_shipping(
        &self,
        items: &[CheckoutItem],
        destination: &Destination,
    ) -> ShippingEstimate;
    async fn place_order(
        &self,
        session: Option<&User>,
        source: CheckoutSource,
        items: &[CheckoutItem],
    ) -> Result<Vec<Order>, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait ShippingRepository {
    async fn read_shipping_fee(&self, request: ShippingFeeRequest) -> Result<f64, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutItem {
    pub product_id: ProductID,
    pub product_name: String,
    pub price: f64,
    pub quantity: u32,
    pub shop_id: Option<ShopID>,
    pub weight: Option<u32>,
}

impl CheckoutItem {
    #[must_use]
    pub fn buy_now(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            price: product.price,
            quantity,
            shop_id: product.shop_id.clone(),
            weight: Some(
                product
                    .weight
                    .filter(|w| *w > 0)
                    .unwrap_or(BUY_NOW_DEFAULT_WEIGHT),
            ),
        }
    }
}

impl From<&CartItem> for CheckoutItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone().unwrap_or_default(),
            price: item.price,
            quantity: item.quantity,
            shop_id: item.shop_id.clone(),
            weight: item.weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutSource {
    Cart,
    BuyNow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingFeeRequest {
    pub from_district_code: String,
    pub from_ward_code: String,
    pub to_district_code: String,
    pub to_ward_code: String,
    pub weight_gram: u32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ShippingEstimate {
    pub per_shop: Vec<ShopShippingFee>,
    pub total: f64,
}

impl ShippingEstimate {
    #[must_use]
    pub fn new(per_shop: Vec<ShopShippingFee>) -> Self {
        let total = per_shop.iter().map(|s| s.fee).sum();
        Self { per_shop, total }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopShippingFee {
    /// `None` for items whose shop is unknown.
    pub shop_id: Option<ShopID>,
    pub fee: f64,
    pub fallback: bool,
}

#[must_use]
pub fn subtotal(items: &[CheckoutItem]) -> f64 {
    items
        .iter()
        .map(|i| i.price * f64::from(i.quantity))
        .sum()
}

/// Items grouped by shop. Items without shop share the `None` group.
#[must_use]
pub fn group_by_shop(items: &[CheckoutItem]) -> BTreeMap<Option<ShopID>, Vec<&CheckoutItem>> {
    let mut groups: BTreeMap<Option<ShopID>, Vec<&CheckoutItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.shop_id.clone()).or_default().push(item);
    }
    groups
}

#[must_use]
pub fn parcel_weight(items: &[&CheckoutItem]) -> u32 {
    let weight = items
        .iter()
        .map(|i| {
            i.weight
                .filter(|w| *w > 0)
                .unwrap_or(DEFAULT_ITEM_WEIGHT)
                .saturating_mul(i.quantity)
        })
        .fold(0u32, u32::saturating_add);
    if weight == 0 {
        DEFAULT_PARCEL_WEIGHT
    } else {
        weight
    }
}

#[must_use]
pub fn default_origin() -> Destination {
    Destination {
        district_code: DEFAULT_ORIGIN_DISTRICT_CODE.to_string(),
        ward_code: DEFAULT_ORIGIN_WARD_CODE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::ListingStatus;

    use super::*;

    fn item(shop_id: Option<&str>, price: f64, quantity: u32, weight: Option<u32>) -> CheckoutItem {
        CheckoutItem {
            product_id: "p".into(),
            product_name: "P".to_string(),
            price,
            quantity,
            shop_id: shop_id.map(ShopID::from),
            weight,
        }
    }

    #[rstest]
    #[case(vec![], 0.0)]
    #[case(vec![item(None, 12_000.0, 1, None)], 12_000.0)]
    #[case(vec![item(None, 12_000.0, 3, None), item(Some("s"), 500.0, 5, None)], 38_500.0)]
    #[case(vec![item(None, 12_000.0, 0, None)], 0.0)]
    fn test_subtotal(#[case] items: Vec<CheckoutItem>, #[case] expected: f64) {
        assert_approx_eq!(subtotal(&items), expected);
    }

    #[test]
    fn test_group_by_shop() {
        let items = vec![
            item(Some("s2"), 1.0, 1, None),
            item(None, 2.0, 1, None),
            item(Some("s1"), 3.0, 1, None),
            item(Some("s2"), 4.0, 1, None),
            item(None, 5.0, 1, None),
        ];
        let groups = group_by_shop(&items);
        assert_eq!(
            groups
                .iter()
                .map(|(shop, items)| (
                    shop.as_ref().map(ToString::to_string),
                    items.iter().map(|i| i.price).collect::<Vec<_>>()
                ))
                .collect::<Vec<_>>(),
            vec![
                (None, vec![2.0, 5.0]),
                (Some("s1".to_string()), vec![3.0]),
                (Some("s2".to_string()), vec![1.0, 4.0]),
            ]
        );
    }

    #[rstest]
    #[case(vec![item(None, 1.0, 2, Some(300))], 600)]
    #[case(vec![item(None, 1.0, 2, None)], 1000)]
    #[case(vec![item(None, 1.0, 1, None), item(None, 1.0, 3, Some(100))], 800)]
    #[case(vec![item(None, 1.0, 3, Some(0))], 1500)]
    #[case(vec![item(None, 1.0, 0, None)], 1000)]
    #[case(vec![], 1000)]
    fn test_parcel_weight(#[case] items: Vec<CheckoutItem>, #[case] expected: u32) {
        assert_eq!(parcel_weight(&items.iter().collect::<Vec<_>>()), expected);
    }

    #[test]
    fn test_shipping_estimate_new() {
        let estimate = ShippingEstimate::new(vec![
            ShopShippingFee {
                shop_id: None,
                fee: 22_000.0,
                fallback: false,
            },
            ShopShippingFee {
                shop_id: Some("s1".into()),
                fee: FALLBACK_SHIPPING_FEE,
                fallback: true,
            },
        ]);
        assert_approx_eq!(estimate.total, 57_000.0);
        assert_approx_eq!(ShippingEstimate::default().total, 0.0);
    }

    #[rstest]
    #[case(Some(350), Some(350))]
    #[case(None, Some(BUY_NOW_DEFAULT_WEIGHT))]
    #[case(Some(0), Some(BUY_NOW_DEFAULT_WEIGHT))]
    fn test_checkout_item_buy_now(#[case] weight: Option<u32>, #[case] expected: Option<u32>) {
        let product = Product {
            id: "p1".into(),
            shop_id: Some("s1".into()),
            name: "Lamp".to_string(),
            price: 99_000.0,
            weight,
            brand: String::new(),
            description: String::new(),
            categories: vec![],
            images: vec![],
            status: ListingStatus::Active,
        };
        assert_eq!(
            CheckoutItem::buy_now(&product, 2),
            CheckoutItem {
                product_id: "p1".into(),
                product_name: "Lamp".to_string(),
                price: 99_000.0,
                quantity: 2,
                shop_id: Some("s1".into()),
                weight: expected,
            }
        );
    }

    #[test]
    fn test_checkout_item_from_cart_item() {
        let cart_item = CartItem {
            product_id: "p1".into(),
            product_name: None,
            price: 5.0,
            quantity: 3,
            shop_id: None,
            weight: Some(10),
            discontinued: true,
        };
        assert_eq!(
            CheckoutItem::from(&cart_item),
            CheckoutItem {
                product_id: "p1".into(),
                product_name: String::new(),
                price: 5.0,
                quantity: 3,
                shop_id: None,
                weight: Some(10),
            }
        );
    }
}
