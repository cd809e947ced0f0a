use std::fmt;

use derive_more::{Deref, Display};

use crate::{
    CreateError, DeleteError, Name, NameError, ReadError, Shop, ShopID, UpdateError, User,
};

#[allow(async_fn_in_trait)]
pub trait ProductService {
    async fn get_products(&self) -> Result<Vec<Product>, ReadError>;
    async fn get_product(&self, id: ProductID) -> Result<Product, ReadError>;
    async fn search_products(&self, keyword: &str) -> Result<Vec<Product>, ReadError>;
    async fn get_shop_products(&self, shop_id: ShopID) -> Result<Vec<Product>, ReadError>;
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, CreateError>;
    async fn replace_product(
        &self,
        id: ProductID,
        draft: ProductDraft,
    ) -> Result<Product, UpdateError>;
    async fn delete_product(&self, id: ProductID) -> Result<ProductID, DeleteError>;
    async fn upload_product_images(
        &self,
        id: ProductID,
        images: Vec<ProductImage>,
    ) -> Result<(), UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait ProductRepository {
    async fn read_products(&self) -> Result<Vec<Product>, ReadError>;
    async fn read_product(&self, id: ProductID) -> Result<Product, ReadError>;
    async fn search_products(&self, keyword: &str) -> Result<Vec<Product>, ReadError>;
    async fn read_shop_products(&self, shop_id: ShopID) -> Result<Vec<Product>, ReadError>;
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, CreateError>;
    async fn replace_product(
        &self,
        id: ProductID,
        draft: ProductDraft,
    ) -> Result<Product, UpdateError>;
    async fn delete_product(&self, id: ProductID) -> Result<ProductID, DeleteError>;
    async fn upload_product_images(
        &self,
        id: ProductID,
        images: Vec<ProductImage>,
    ) -> Result<(), UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait CategoryService {
    async fn get_categories(&self) -> Result<Vec<Category>, ReadError>;
    async fn create_category(&self, name: Name) -> Result<Category, CreateError>;
    async fn delete_category(&self, name: &str) -> Result<(), DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait CategoryRepository {
    async fn read_categories(&self) -> Result<Vec<Category>, ReadError>;
    async fn create_category(&self, name: Name) -> Result<Category, CreateError>;
    async fn delete_category(&self, name: &str) -> Result<(), DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductID,
    pub shop_id: Option<ShopID>,
    pub name: String,
    pub price: f64,
    /// Weight in grams.
    pub weight: Option<u32>,
    pub brand: String,
    pub description: String,
    pub categories: Vec<String>,
    pub images: Vec<String>,
    pub status: ListingStatus,
}

#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductID(String);

impl From<&str> for ProductID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProductID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Status of products and shops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    #[default]
    Active,
    Deleted,
    Banned,
}

impl ListingStatus {
    #[must_use]
    pub fn is_available(self) -> bool {
        self == ListingStatus::Active
    }
}

impl From<&str> for ListingStatus {
    fn from(value: &str) -> Self {
        match value {
            "DELETED" => ListingStatus::Deleted,
            "BANNED" => ListingStatus::Banned,
            _ => ListingStatus::Active,
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ListingStatus::Active => "ACTIVE",
                ListingStatus::Deleted => "DELETED",
                ListingStatus::Banned => "BANNED",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub query: String,
    pub category: String,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl ProductFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let query = self.query.to_lowercase();
        let matches_query = product.name.to_lowercase().contains(&query)
            || product.description.to_lowercase().contains(&query)
            || product.brand.to_lowercase().contains(&query);
        let matches_category = self.category.is_empty()
            || self.category == ALL_CATEGORIES
            || product.categories.iter().any(|c| *c == self.category);
        matches_query && matches_category
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrder {
    #[default]
    Default,
    PriceAscending,
    PriceDescending,
    Name,
}

impl ProductOrder {
    pub const ALL: [ProductOrder; 4] = [
        ProductOrder::Default,
        ProductOrder::PriceAscending,
        ProductOrder::PriceDescending,
        ProductOrder::Name,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProductOrder::Default => "Default",
            ProductOrder::PriceAscending => "Price: low to high",
            ProductOrder::PriceDescending => "Price: high to low",
            ProductOrder::Name => "Name",
        }
    }
}

impl From<&str> for ProductOrder {
    fn from(value: &str) -> Self {
        match value {
            "price-low" => ProductOrder::PriceAscending,
            "price-high" => ProductOrder::PriceDescending,
            "name" => ProductOrder::Name,
            _ => ProductOrder::Default,
        }
    }
}

impl fmt::Display for ProductOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ProductOrder::Default => "default",
                ProductOrder::PriceAscending => "price-low",
                ProductOrder::PriceDescending => "price-high",
                ProductOrder::Name => "name",
            }
        )
    }
}

/// Filter and sort products for display. Sorting is stable.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    filter: &ProductFilter,
    order: ProductOrder,
) -> Vec<&'a Product> {
    let mut result = products
        .iter()
        .filter(|p| filter.matches(p))
        .collect::<Vec<_>>();
    sort_products(&mut result, order);
    result
}

pub fn sort_products(products: &mut [&Product], order: ProductOrder) {
    match order {
        ProductOrder::Default => {}
        ProductOrder::PriceAscending => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        ProductOrder::PriceDescending => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        ProductOrder::Name => products.sort_by_key(|p| p.name.to_lowercase()),
    }
}

/// Deleted products are only shown to viewers who may manage the shop.
#[must_use]
pub fn visible_products(products: &[Product], viewer_may_manage: bool) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| viewer_may_manage || p.status != ListingStatus::Deleted)
        .collect()
}

pub fn check_purchasable(
    user: Option<&User>,
    product: &Product,
    shop: Option<&Shop>,
) -> Result<(), PurchaseError> {
    let Some(user) = user else {
        return Err(PurchaseError::NotLoggedIn);
    };
    if user.is_admin() {
        return Err(PurchaseError::AdminCannotBuy);
    }
    if !product.status.is_available() {
        return Err(PurchaseError::ProductUnavailable(product.status));
    }
    if let Some(shop) = shop {
        if !shop.status.is_available() {
            return Err(PurchaseError::ShopClosed(shop.status));
        }
    }
    Ok(())
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PurchaseError {
    #[error("Please log in to buy this product")]
    NotLoggedIn,
    #[error("Admin accounts cannot buy products")]
    AdminCannotBuy,
    #[error("Product is not available ({0})")]
    ProductUnavailable(ListingStatus),
    #[error("Shop is closed ({0})")]
    ShopClosed(ListingStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub shop_id: ShopID,
    pub name: Name,
    pub price: f64,
    pub weight: Option<u32>,
    pub brand: String,
    pub description: String,
    pub category_names: Vec<String>,
}

impl ProductDraft {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shop_id: ShopID,
        name: &str,
        price: f64,
        weight: Option<u32>,
        brand: &str,
        description: &str,
        category_names: Vec<String>,
    ) -> Result<Self, ProductDraftError> {
        let name = Name::new(name)?;
        if !(price.is_finite() && price > 0.0) {
            return Err(ProductDraftError::InvalidPrice);
        }
        Ok(Self {
            shop_id,
            name,
            price,
            weight,
            brand: brand.trim().to_string(),
            description: description.trim().to_string(),
            category_names,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ProductDraftError {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error("Price must be greater than 0")]
    InvalidPrice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{AccountStatus, Role};

    use super::*;

    fn product(id: &str, name: &str, price: f64, categories: &[&str]) -> Product {
        Product {
            id: id.into(),
            shop_id: Some("s1".into()),
            name: name.to_string(),
            price,
            weight: None,
            brand: String::new(),
            description: String::new(),
            categories: categories.iter().map(ToString::to_string).collect(),
            images: vec![],
            status: ListingStatus::Active,
        }
    }

    static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
        vec![
            Product {
                brand: "Casio".to_string(),
                ..product("1", "Calculator fx-580", 550_000.0, &["Electronics"])
            },
            Product {
                description: "Used textbook for Calculus 1".to_string(),
                ..product("2", "Giai tich 1", 45_000.0, &["Books"])
            },
            product("3", "backpack", 200_000.0, &["Bags", "Books"]),
            product("4", "Lamp", 200_000.0, &[]),
        ]
    });

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    fn user(roles: &[&str]) -> User {
        User {
            id: "u1".into(),
            username: "alice".to_string(),
            fullname: String::new(),
            email: String::new(),
            roles: roles.iter().map(|r| Role::from(*r)).collect(),
            address: None,
            status: AccountStatus::Active,
        }
    }

    fn shop(status: ListingStatus) -> Shop {
        Shop {
            id: "s1".into(),
            name: "Shop".to_string(),
            owner_id: "u2".into(),
            owner_username: "bob".to_string(),
            address: None,
            status,
        }
    }

    #[rstest]
    #[case("", "all", vec!["1", "2", "3", "4"])]
    #[case("CASIO", "all", vec!["1"])]
    #[case("calculus", "all", vec!["2"])]
    #[case("a", "", vec!["1", "2", "3", "4"])]
    #[case("", "Books", vec!["2", "3"])]
    #[case("back", "Books", vec!["3"])]
    #[case("lamp", "Books", vec![])]
    fn test_filter_products(
        #[case] query: &str,
        #[case] category: &str,
        #[case] expected: Vec<&str>,
    ) {
        let filter = ProductFilter {
            query: query.to_string(),
            category: category.to_string(),
        };
        assert_eq!(
            ids(&filter_products(&PRODUCTS, &filter, ProductOrder::Default)),
            expected
        );
    }

    #[rstest]
    #[case(ProductOrder::Default, vec!["1", "2", "3", "4"])]
    #[case(ProductOrder::PriceAscending, vec!["2", "3", "4", "1"])]
    #[case(ProductOrder::PriceDescending, vec!["1", "3", "4", "2"])]
    #[case(ProductOrder::Name, vec!["3", "1", "2", "4"])]
    fn test_sort_products(#[case] order: ProductOrder, #[case] expected: Vec<&str>) {
        assert_eq!(
            ids(&filter_products(&PRODUCTS, &ProductFilter::default(), order)),
            expected
        );
    }

    #[rstest]
    #[case("default", ProductOrder::Default)]
    #[case("price-low", ProductOrder::PriceAscending)]
    #[case("price-high", ProductOrder::PriceDescending)]
    #[case("name", ProductOrder::Name)]
    fn test_product_order_from_str(#[case] value: &str, #[case] expected: ProductOrder) {
        assert_eq!(ProductOrder::from(value), expected);
        assert_eq!(expected.to_string(), value);
    }

    #[test]
    fn test_product_order_from_unknown_str() {
        assert_eq!(ProductOrder::from("newest"), ProductOrder::Default);
    }

    #[rstest]
    #[case(false, vec!["1", "3"])]
    #[case(true, vec!["1", "2", "3"])]
    fn test_visible_products(#[case] viewer_may_manage: bool, #[case] expected: Vec<&str>) {
        let products = vec![
            product("1", "A", 1.0, &[]),
            Product {
                status: ListingStatus::Deleted,
                ..product("2", "B", 1.0, &[])
            },
            Product {
                status: ListingStatus::Banned,
                ..product("3", "C", 1.0, &[])
            },
        ];
        assert_eq!(
            ids(&visible_products(&products, viewer_may_manage)),
            expected
        );
    }

    #[rstest]
    #[case::not_logged_in(
        None,
        ListingStatus::Banned,
        ListingStatus::Banned,
        Err(PurchaseError::NotLoggedIn)
    )]
    #[case::admin(
        Some(user(&["ADMIN"])),
        ListingStatus::Banned,
        ListingStatus::Active,
        Err(PurchaseError::AdminCannotBuy)
    )]
    #[case::product_deleted(
        Some(user(&["USER"])),
        ListingStatus::Deleted,
        ListingStatus::Banned,
        Err(PurchaseError::ProductUnavailable(ListingStatus::Deleted))
    )]
    #[case::product_banned(
        Some(user(&["USER"])),
        ListingStatus::Banned,
        ListingStatus::Active,
        Err(PurchaseError::ProductUnavailable(ListingStatus::Banned))
    )]
    #[case::shop_deleted(
        Some(user(&["USER"])),
        ListingStatus::Active,
        ListingStatus::Deleted,
        Err(PurchaseError::ShopClosed(ListingStatus::Deleted))
    )]
    #[case::shop_banned(
        Some(user(&["USER"])),
        ListingStatus::Active,
        ListingStatus::Banned,
        Err(PurchaseError::ShopClosed(ListingStatus::Banned))
    )]
    #[case::purchasable(
        Some(user(&["USER"])),
        ListingStatus::Active,
        ListingStatus::Active,
        Ok(())
    )]
    fn test_check_purchasable(
        #[case] user: Option<User>,
        #[case] product_status: ListingStatus,
        #[case] shop_status: ListingStatus,
        #[case] expected: Result<(), PurchaseError>,
    ) {
        let product = Product {
            status: product_status,
            ..product("1", "A", 1.0, &[])
        };
        assert_eq!(
            check_purchasable(user.as_ref(), &product, Some(&shop(shop_status))),
            expected
        );
    }

    #[test]
    fn test_check_purchasable_unknown_shop() {
        assert_eq!(
            check_purchasable(Some(&user(&["USER"])), &product("1", "A", 1.0, &[]), None),
            Ok(())
        );
    }

    #[rstest]
    #[case(" Lamp ", 10.0, Ok("Lamp"))]
    #[case("", 10.0, Err(ProductDraftError::Name(NameError::Empty)))]
    #[case("Lamp", 0.0, Err(ProductDraftError::InvalidPrice))]
    #[case("Lamp", -1.0, Err(ProductDraftError::InvalidPrice))]
    #[case("Lamp", f64::NAN, Err(ProductDraftError::InvalidPrice))]
    fn test_product_draft_new(
        #[case] name: &str,
        #[case] price: f64,
        #[case] expected: Result<&str, ProductDraftError>,
    ) {
        assert_eq!(
            ProductDraft::new("s1".into(), name, price, Some(300), "", "", vec![])
                .map(|d| d.name.to_string()),
            expected.map(ToString::to_string)
        );
    }
}
