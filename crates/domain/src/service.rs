use futures_util::future::join_all;
use log::{debug, error, warn};

use crate::{
    AdminRepository, AdminService, Cart, CartRepository, CartService, Category, CategoryRepository,
    CategoryService, CheckoutItem, CheckoutService, CheckoutSource, CreateError, Credentials,
    DeleteError, Destination, District, FALLBACK_SHIPPING_FEE, LocationRepository, LocationService,
    LoginError, Name, Order, OrderID, OrderRepository, OrderService, PasswordResetError, Product,
    ProductDraft, ProductID, ProductImage, ProductRepository, ProductService, ProfileUpdate,
    Province, ReadError, Registration, RegistrationError, SessionRepository, SessionService,
    ShippingEstimate, ShippingFeeRequest, ShippingRepository, Shop, ShopDraft, ShopID,
    ShopRepository, ShopRevenue, ShopService, ShopShippingFee, StorageError, StorageFailure,
    UpdateError, User, UserDetail, UserID, UserRepository, UserService, Ward, cart_owner,
    check_quantity, default_origin, group_by_shop, parcel_weight, validate_new_password,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => {
                if err.is_no_connection() || err.is_no_session() {
                    debug!("failed to {} {}: {err}", $action, $entity);
                } else {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            }
        }
        result
    }};
}

impl<R: SessionRepository> Service<R> {
    async fn discard_token(&self) {
        let _ = log_on_error!(self.repository.delete_session(), "delete", "session");
    }
}

impl<R: SessionRepository> SessionService for Service<R> {
    async fn log_in(&self, credentials: Credentials) -> Result<User, LoginError> {
        if let Err(err) = log_on_error!(
            self.repository.request_token(credentials),
            "request",
            "token"
        ) {
            self.discard_token().await;
            return Err(err.into());
        }

        match log_on_error!(self.repository.read_session(), "get", "session") {
            Ok(user) if user.is_banned() => {
                self.discard_token().await;
                Err(LoginError::Banned)
            }
            Ok(user) => Ok(user),
            Err(err) => {
                self.discard_token().await;
                Err(err.into())
            }
        }
    }

    async fn get_session(&self) -> Result<User, ReadError> {
        let result = log_on_error!(self.repository.read_session(), "get", "session");
        if let Err(ref err) = result {
            if !err.is_no_connection() && !err.is_no_session() {
                self.discard_token().await;
            }
        }
        result
    }

    async fn log_out(&self) -> Result<(), DeleteError> {
        log_on_error!(self.repository.delete_session(), "delete", "session")
    }

    async fn register(&self, registration: Registration) -> Result<(), RegistrationError> {
        registration.validate()?;
        Ok(log_on_error!(
            self.repository.create_account(registration),
            "create",
            "account"
        )?)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.request_password_reset(email.trim()),
            "request",
            "password reset"
        )
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), PasswordResetError> {
        if token.is_empty() {
            return Err(PasswordResetError::MissingToken);
        }
        validate_new_password(new_password, confirmation)?;
        Ok(log_on_error!(
            self.repository.reset_password(token, new_password),
            "reset",
            "password"
        )?)
    }
}

impl<R: UserRepository> UserService for Service<R> {
    async fn get_user(&self, id: UserID) -> Result<User, ReadError> {
        log_on_error!(self.repository.read_user(id), "get", "user")
    }

    async fn update_profile(
        &self,
        id: UserID,
        profile: ProfileUpdate,
    ) -> Result<User, UpdateError> {
        log_on_error!(
            self.repository.replace_profile(id, profile),
            "update",
            "profile"
        )
    }
}

impl<R: LocationRepository> LocationService for Service<R> {
    async fn get_provinces(&self) -> Result<Vec<Province>, ReadError> {
        log_on_error!(self.repository.read_provinces(), "get", "provinces")
    }

    async fn get_districts(&self, province_code: &str) -> Result<Vec<District>, ReadError> {
        log_on_error!(
            self.repository.read_districts(province_code),
            "get",
            "districts"
        )
    }

    async fn get_wards(&self, district_code: &str) -> Result<Vec<Ward>, ReadError> {
        log_on_error!(self.repository.read_wards(district_code), "get", "wards")
    }
}

impl<R: ProductRepository> ProductService for Service<R> {
    async fn get_products(&self) -> Result<Vec<Product>, ReadError> {
        log_on_error!(self.repository.read_products(), "get", "products")
    }

    async fn get_product(&self, id: ProductID) -> Result<Product, ReadError> {
        log_on_error!(self.repository.read_product(id), "get", "product")
    }

    async fn search_products(&self, keyword: &str) -> Result<Vec<Product>, ReadError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.get_products().await;
        }
        log_on_error!(
            self.repository.search_products(keyword),
            "search",
            "products"
        )
    }

    async fn get_shop_products(&self, shop_id: ShopID) -> Result<Vec<Product>, ReadError> {
        log_on_error!(
            self.repository.read_shop_products(shop_id),
            "get",
            "shop products"
        )
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, CreateError> {
        log_on_error!(self.repository.create_product(draft), "create", "product")
    }

    async fn replace_product(
        &self,
        id: ProductID,
        draft: ProductDraft,
    ) -> Result<Product, UpdateError> {
        log_on_error!(
            self.repository.replace_product(id, draft),
            "replace",
            "product"
        )
    }

    async fn delete_product(&self, id: ProductID) -> Result<ProductID, DeleteError> {
        log_on_error!(self.repository.delete_product(id), "delete", "product")
    }

    async fn upload_product_images(
        &self,
        id: ProductID,
        images: Vec<ProductImage>,
    ) -> Result<(), UpdateError> {
        if images.is_empty() {
            return Ok(());
        }
        log_on_error!(
            self.repository.upload_product_images(id, images),
            "upload",
            "product images"
        )
    }
}

impl<R: CategoryRepository> CategoryService for Service<R> {
    async fn get_categories(&self) -> Result<Vec<Category>, ReadError> {
        log_on_error!(self.repository.read_categories(), "get", "categories")
    }

    async fn create_category(&self, name: Name) -> Result<Category, CreateError> {
        log_on_error!(self.repository.create_category(name), "create", "category")
    }

    async fn delete_category(&self, name: &str) -> Result<(), DeleteError> {
        log_on_error!(self.repository.delete_category(name), "delete", "category")
    }
}

impl<R: ShopRepository> ShopService for Service<R> {
    async fn get_shop(&self, id: ShopID) -> Result<Shop, ReadError> {
        log_on_error!(self.repository.read_shop(id), "get", "shop")
    }

    async fn get_shops(&self) -> Result<Vec<Shop>, ReadError> {
        log_on_error!(self.repository.read_shops(), "get", "shops")
    }

    async fn get_owner_shops(&self, owner_username: &str) -> Result<Vec<Shop>, ReadError> {
        log_on_error!(
            self.repository.read_owner_shops(owner_username),
            "get",
            "owner shops"
        )
    }

    async fn create_shop(&self, draft: ShopDraft) -> Result<Shop, CreateError> {
        log_on_error!(self.repository.create_shop(draft), "create", "shop")
    }

    async fn delete_shop(&self, id: ShopID) -> Result<ShopID, DeleteError> {
        log_on_error!(self.repository.delete_shop(id), "delete", "shop")
    }

    async fn get_shop_revenue(&self, id: ShopID) -> Result<ShopRevenue, ReadError> {
        log_on_error!(self.repository.read_shop_revenue(id), "get", "shop revenue")
    }
}

impl<R: CartRepository> Service<R> {
    async fn refetch_cart(&self, user_id: UserID) -> Result<Cart, ReadError> {
        log_on_error!(self.repository.read_cart(user_id), "get", "cart")
    }
}

impl<R: CartRepository> CartService for Service<R> {
    async fn get_cart(&self, session: Option<&User>) -> Result<Cart, ReadError> {
        let Some(user) = session else {
            return Ok(Cart::default());
        };
        self.refetch_cart(user.id.clone()).await
    }

    async fn add_to_cart(
        &self,
        session: Option<&User>,
        product_id: ProductID,
        quantity: u32,
    ) -> Result<Cart, UpdateError> {
        let user_id = cart_owner(session)?;
        let quantity = check_quantity(quantity)?;
        log_on_error!(
            self.repository
                .add_cart_item(user_id.clone(), product_id, quantity),
            "add",
            "cart item"
        )?;
        Ok(self.refetch_cart(user_id).await?)
    }

    async fn update_quantity(
        &self,
        session: Option<&User>,
        product_id: ProductID,
        quantity: u32,
    ) -> Result<Cart, UpdateError> {
        let user_id = cart_owner(session)?;
        let quantity = check_quantity(quantity)?;
        log_on_error!(
            self.repository
                .replace_cart_item(user_id.clone(), product_id, quantity),
            "update",
            "cart item"
        )?;
        Ok(self.refetch_cart(user_id).await?)
    }

    async fn remove_from_cart(
        &self,
        session: Option<&User>,
        product_id: ProductID,
    ) -> Result<Cart, DeleteError> {
        let user_id = cart_owner(session)?;
        log_on_error!(
            self.repository.delete_cart_item(user_id.clone(), product_id),
            "remove",
            "cart item"
        )?;
        Ok(self.refetch_cart(user_id).await?)
    }

    async fn clear_cart(&self, session: Option<&User>) -> Result<Cart, DeleteError> {
        let user_id = cart_owner(session)?;
        log_on_error!(
            self.repository.delete_cart(user_id.clone()),
            "clear",
            "cart"
        )?;
        Ok(self.refetch_cart(user_id).await?)
    }
}

impl<R: ShopRepository> Service<R> {
    async fn shipping_origin(&self, shop_id: Option<&ShopID>) -> Destination {
        let Some(shop_id) = shop_id else {
            return default_origin();
        };
        match self.repository.read_shop(shop_id.clone()).await {
            Ok(shop) => shop
                .address
                .and_then(|address| address.destination())
                .unwrap_or_else(default_origin),
            Err(err) => {
                warn!("failed to get origin of shop {shop_id}, using default origin: {err}");
                default_origin()
            }
        }
    }
}

impl<R: ShopRepository + ShippingRepository + OrderRepository> CheckoutService for Service<R> {
    async fn estimate_shipping(
        &self,
        items: &[CheckoutItem],
        destination: &Destination,
    ) -> ShippingEstimate {
        if items.is_empty() {
            return ShippingEstimate::default();
        }

        let fees = join_all(group_by_shop(items).into_iter().map(
            |(shop_id, shop_items)| async move {
                let origin = self.shipping_origin(shop_id.as_ref()).await;
                let request = ShippingFeeRequest {
                    from_district_code: origin.district_code,
                    from_ward_code: origin.ward_code,
                    to_district_code: destination.district_code.clone(),
                    to_ward_code: destination.ward_code.clone(),
                    weight_gram: parcel_weight(&shop_items),
                };
                match self.repository.read_shipping_fee(request).await {
                    Ok(fee) => ShopShippingFee {
                        shop_id,
                        fee,
                        fallback: false,
                    },
                    Err(err) => {
                        warn!("failed to get shipping fee, using fallback fee: {err}");
                        ShopShippingFee {
                            shop_id,
                            fee: FALLBACK_SHIPPING_FEE,
                            fallback: true,
                        }
                    }
                }
            },
        ))
        .await;

        ShippingEstimate::new(fees)
    }

    async fn place_order(
        &self,
        session: Option<&User>,
        source: CheckoutSource,
        items: &[CheckoutItem],
    ) -> Result<Vec<Order>, CreateError> {
        let user = session.ok_or(StorageError::NoSession)?;
        if user.address.is_none() {
            return Err(CreateError::MissingAddress);
        }
        let Some(first) = items.first() else {
            return Err(CreateError::NothingToOrder);
        };
        match source {
            CheckoutSource::BuyNow => Ok(vec![log_on_error!(
                self.repository
                    .create_instant_order(first.product_id.clone(), first.quantity),
                "place",
                "order"
            )?]),
            CheckoutSource::Cart => log_on_error!(
                self.repository
                    .create_cart_orders(items.iter().map(|i| i.product_id.clone()).collect()),
                "place",
                "orders"
            ),
        }
    }
}

impl<R: OrderRepository> OrderService for Service<R> {
    async fn get_user_orders(&self, user_id: UserID) -> Result<Vec<Order>, ReadError> {
        log_on_error!(self.repository.read_user_orders(user_id), "get", "orders")
    }

    async fn get_shop_orders(&self, shop_id: ShopID) -> Result<Vec<Order>, ReadError> {
        log_on_error!(
            self.repository.read_shop_orders(shop_id),
            "get",
            "shop orders"
        )
    }

    async fn get_order(&self, id: OrderID) -> Result<Order, ReadError> {
        log_on_error!(self.repository.read_order(id), "get", "order")
    }

    async fn request_cancellation(&self, id: OrderID) -> Result<Order, UpdateError> {
        log_on_error!(
            self.repository.request_cancellation(id),
            "request",
            "cancellation"
        )
    }

    async fn respond_to_cancellation(
        &self,
        id: OrderID,
        accept: bool,
    ) -> Result<Order, UpdateError> {
        log_on_error!(
            self.repository.respond_to_cancellation(id, accept),
            "respond to",
            "cancellation"
        )
    }

    async fn confirm_order(&self, id: OrderID) -> Result<Order, UpdateError> {
        log_on_error!(self.repository.confirm_order(id), "confirm", "order")
    }
}

impl<R: AdminRepository> AdminService for Service<R> {
    async fn get_all_users(&self) -> Result<Vec<User>, ReadError> {
        log_on_error!(self.repository.read_all_users(), "get", "users")
    }

    async fn get_user_detail(&self, id: UserID) -> Result<UserDetail, ReadError> {
        log_on_error!(self.repository.read_user_detail(id), "get", "user detail")
    }

    async fn set_user_banned(&self, id: UserID, banned: bool) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.replace_user_ban(id, banned),
            "change ban of",
            "user"
        )
    }

    async fn get_all_shops(&self) -> Result<Vec<Shop>, ReadError> {
        log_on_error!(self.repository.read_all_shops(), "get", "shops")
    }

    async fn set_shop_banned(&self, id: ShopID, banned: bool) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.replace_shop_ban(id, banned),
            "change ban of",
            "shop"
        )
    }

    async fn get_all_products(&self) -> Result<Vec<Product>, ReadError> {
        log_on_error!(self.repository.read_all_products(), "get", "products")
    }

    async fn set_product_banned(&self, id: ProductID, banned: bool) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.replace_product_ban(id, banned),
            "change ban of",
            "product"
        )
    }

    async fn get_any_order(&self, id: OrderID) -> Result<Order, ReadError> {
        log_on_error!(self.repository.read_any_order(id), "get", "order")
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    use assert_approx_eq::assert_approx_eq;
    use futures::{
        channel::oneshot,
        executor::{LocalPool, block_on},
        task::LocalSpawnExt,
    };
    use pretty_assertions::assert_eq;

    use crate::{
        AccountStatus, Address, CartItem, Division, ListingStatus, QuantityDebouncer, Role,
    };

    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Failure {
        NoConnection,
        Unauthorized,
        Rejected,
    }

    impl From<Failure> for StorageError {
        fn from(value: Failure) -> Self {
            match value {
                Failure::NoConnection => StorageError::NoConnection,
                Failure::Unauthorized => StorageError::Unauthorized,
                Failure::Rejected => StorageError::Rejected {
                    code: 1005,
                    message: "rejected".to_string(),
                },
            }
        }
    }

    #[derive(Default)]
    struct MockRepository {
        calls: RefCell<Vec<String>>,
        token_failure: Option<Failure>,
        user: Option<User>,
        session_failure: Option<Failure>,
        cart: RefCell<Vec<CartItem>>,
        shops: HashMap<ShopID, Shop>,
        fees: HashMap<(String, u32), f64>,
    }

    impl MockRepository {
        fn call(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl SessionRepository for MockRepository {
        async fn request_token(&self, credentials: Credentials) -> Result<(), ReadError> {
            self.call(format!("request_token {}", credentials.username));
            match self.token_failure {
                Some(failure) => Err(StorageError::from(failure).into()),
                None => Ok(()),
            }
        }

        async fn read_session(&self) -> Result<User, ReadError> {
            self.call("read_session");
            match (self.session_failure, &self.user) {
                (Some(failure), _) => Err(StorageError::from(failure).into()),
                (None, Some(user)) => Ok(user.clone()),
                (None, None) => Err(StorageError::NoSession.into()),
            }
        }

        async fn delete_session(&self) -> Result<(), DeleteError> {
            self.call("delete_session");
            Ok(())
        }

        async fn create_account(&self, registration: Registration) -> Result<(), CreateError> {
            self.call(format!("create_account {}", registration.username));
            Ok(())
        }

        async fn request_password_reset(&self, email: &str) -> Result<(), UpdateError> {
            self.call(format!("request_password_reset {email}"));
            Ok(())
        }

        async fn reset_password(&self, token: &str, _: &str) -> Result<(), UpdateError> {
            self.call(format!("reset_password {token}"));
            Ok(())
        }
    }

    impl CartRepository for MockRepository {
        async fn read_cart(&self, user_id: UserID) -> Result<Cart, ReadError> {
            self.call(format!("read_cart {user_id}"));
            let items = self.cart.borrow().clone();
            let total_amount = items.iter().map(CartItem::line_total).sum();
            Ok(Cart {
                items,
                total_amount,
            })
        }

        async fn add_cart_item(
            &self,
            user_id: UserID,
            product_id: ProductID,
            quantity: u32,
        ) -> Result<(), UpdateError> {
            self.call(format!("add_cart_item {user_id} {product_id} {quantity}"));
            self.cart
                .borrow_mut()
                .push(cart_item(&product_id, 10.0, quantity));
            Ok(())
        }

        async fn replace_cart_item(
            &self,
            user_id: UserID,
            product_id: ProductID,
            quantity: u32,
        ) -> Result<(), UpdateError> {
            self.call(format!(
                "replace_cart_item {user_id} {product_id} {quantity}"
            ));
            for item in self.cart.borrow_mut().iter_mut() {
                if item.product_id == product_id {
                    item.quantity = quantity;
                }
            }
            Ok(())
        }

        async fn delete_cart_item(
            &self,
            user_id: UserID,
            product_id: ProductID,
        ) -> Result<(), DeleteError> {
            self.call(format!("delete_cart_item {user_id} {product_id}"));
            self.cart.borrow_mut().retain(|i| i.product_id != product_id);
            Ok(())
        }

        async fn delete_cart(&self, user_id: UserID) -> Result<(), DeleteError> {
            self.call(format!("delete_cart {user_id}"));
            self.cart.borrow_mut().clear();
            Ok(())
        }
    }

    impl ShopRepository for MockRepository {
        async fn read_shop(&self, id: ShopID) -> Result<Shop, ReadError> {
            self.call(format!("read_shop {id}"));
            self.shops
                .get(&id)
                .cloned()
                .ok_or(StorageError::from(Failure::Rejected).into())
        }

        async fn read_shops(&self) -> Result<Vec<Shop>, ReadError> {
            unimplemented!()
        }

        async fn read_owner_shops(&self, _: &str) -> Result<Vec<Shop>, ReadError> {
            unimplemented!()
        }

        async fn create_shop(&self, _: ShopDraft) -> Result<Shop, CreateError> {
            unimplemented!()
        }

        async fn delete_shop(&self, _: ShopID) -> Result<ShopID, DeleteError> {
            unimplemented!()
        }

        async fn read_shop_revenue(&self, _: ShopID) -> Result<ShopRevenue, ReadError> {
            unimplemented!()
        }
    }

    impl ShippingRepository for MockRepository {
        async fn read_shipping_fee(&self, request: ShippingFeeRequest) -> Result<f64, ReadError> {
            self.call(format!(
                "read_shipping_fee {}/{} -> {}/{} {}g",
                request.from_district_code,
                request.from_ward_code,
                request.to_district_code,
                request.to_ward_code,
                request.weight_gram
            ));
            self.fees
                .get(&(request.from_district_code, request.weight_gram))
                .copied()
                .ok_or(StorageError::NoConnection.into())
        }
    }

    impl OrderRepository for MockRepository {
        async fn read_user_orders(&self, _: UserID) -> Result<Vec<Order>, ReadError> {
            unimplemented!()
        }

        async fn read_shop_orders(&self, _: ShopID) -> Result<Vec<Order>, ReadError> {
            unimplemented!()
        }

        async fn read_order(&self, _: OrderID) -> Result<Order, ReadError> {
            unimplemented!()
        }

        async fn create_cart_orders(
            &self,
            product_ids: Vec<ProductID>,
        ) -> Result<Vec<Order>, CreateError> {
            self.call(format!(
                "create_cart_orders {}",
                product_ids
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            ));
            Ok(vec![])
        }

        async fn create_instant_order(
            &self,
            product_id: ProductID,
            quantity: u32,
        ) -> Result<Order, CreateError> {
            self.call(format!("create_instant_order {product_id} {quantity}"));
            Ok(Order {
                id: "o1".into(),
                total_amount: 0.0,
                status: crate::OrderStatus::Pending,
                created_at: None,
                shipment: None,
                cancellation_requested: false,
                items: vec![],
            })
        }

        async fn request_cancellation(&self, _: OrderID) -> Result<Order, UpdateError> {
            unimplemented!()
        }

        async fn respond_to_cancellation(
            &self,
            _: OrderID,
            _: bool,
        ) -> Result<Order, UpdateError> {
            unimplemented!()
        }

        async fn confirm_order(&self, _: OrderID) -> Result<Order, UpdateError> {
            unimplemented!()
        }
    }

    impl AdminRepository for MockRepository {
        async fn read_all_users(&self) -> Result<Vec<User>, ReadError> {
            unimplemented!()
        }

        async fn read_user_detail(&self, _: UserID) -> Result<UserDetail, ReadError> {
            unimplemented!()
        }

        async fn replace_user_ban(&self, id: UserID, banned: bool) -> Result<(), UpdateError> {
            self.call(format!("replace_user_ban {id} {banned}"));
            Ok(())
        }

        async fn read_all_shops(&self) -> Result<Vec<Shop>, ReadError> {
            unimplemented!()
        }

        async fn replace_shop_ban(&self, id: ShopID, banned: bool) -> Result<(), UpdateError> {
            self.call(format!("replace_shop_ban {id} {banned}"));
            Ok(())
        }

        async fn read_all_products(&self) -> Result<Vec<Product>, ReadError> {
            unimplemented!()
        }

        async fn replace_product_ban(
            &self,
            id: ProductID,
            banned: bool,
        ) -> Result<(), UpdateError> {
            self.call(format!("replace_product_ban {id} {banned}"));
            Ok(())
        }

        async fn read_any_order(&self, _: OrderID) -> Result<Order, ReadError> {
            unimplemented!()
        }
    }

    fn division(code: &str) -> Option<Division> {
        Some(Division {
            code: code.to_string(),
            full_name: code.to_string(),
        })
    }

    fn address(district: &str, ward: &str) -> Address {
        Address {
            name: "A".to_string(),
            phone: "0".to_string(),
            detail: "D".to_string(),
            ward: division(ward),
            district: division(district),
            province: division("201"),
        }
    }

    fn user(status: AccountStatus) -> User {
        User {
            id: "u1".into(),
            username: "alice".to_string(),
            fullname: "Alice".to_string(),
            email: "alice@sis.hust.edu.vn".to_string(),
            roles: [Role::User].into(),
            address: Some(address("1490", "1B0101")),
            status,
        }
    }

    fn shop(id: &str, address: Option<Address>) -> Shop {
        Shop {
            id: id.into(),
            name: id.to_string(),
            owner_id: "u2".into(),
            owner_username: "bob".to_string(),
            address,
            status: ListingStatus::Active,
        }
    }

    fn cart_item(product_id: &str, price: f64, quantity: u32) -> CartItem {
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

    fn checkout_item(product_id: &str, shop_id: Option<&str>, weight: u32) -> CheckoutItem {
        CheckoutItem {
            product_id: product_id.into(),
            product_name: product_id.to_string(),
            price: 10_000.0,
            quantity: 1,
            shop_id: shop_id.map(ShopID::from),
            weight: Some(weight),
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        }
    }

    fn destination() -> Destination {
        Destination {
            district_code: "1490".to_string(),
            ward_code: "1B0101".to_string(),
        }
    }

    #[test]
    fn test_log_in() {
        let service = Service::new(MockRepository {
            user: Some(user(AccountStatus::Active)),
            ..MockRepository::default()
        });
        let result = block_on(service.log_in(credentials()));
        assert_eq!(result.ok(), Some(user(AccountStatus::Active)));
        assert_eq!(
            service.repository.calls(),
            vec!["request_token alice", "read_session"]
        );
    }

    #[test]
    fn test_log_in_banned() {
        let service = Service::new(MockRepository {
            user: Some(user(AccountStatus::Banned)),
            ..MockRepository::default()
        });
        assert!(matches!(
            block_on(service.log_in(credentials())),
            Err(LoginError::Banned)
        ));
        assert_eq!(
            service.repository.calls(),
            vec!["request_token alice", "read_session", "delete_session"]
        );
    }

    #[test]
    fn test_log_in_rejected() {
        let service = Service::new(MockRepository {
            token_failure: Some(Failure::Rejected),
            ..MockRepository::default()
        });
        assert!(matches!(
            block_on(service.log_in(credentials())),
            Err(LoginError::Storage(StorageError::Rejected { code: 1005, .. }))
        ));
        assert_eq!(
            service.repository.calls(),
            vec!["request_token alice", "delete_session"]
        );
    }

    #[test]
    fn test_get_session_failure_deletes_token() {
        let service = Service::new(MockRepository {
            session_failure: Some(Failure::Unauthorized),
            ..MockRepository::default()
        });
        assert!(block_on(service.get_session()).is_err());
        assert_eq!(
            service.repository.calls(),
            vec!["read_session", "delete_session"]
        );
    }

    #[test]
    fn test_get_session_no_connection_keeps_token() {
        let service = Service::new(MockRepository {
            session_failure: Some(Failure::NoConnection),
            ..MockRepository::default()
        });
        assert!(block_on(service.get_session()).is_err_and(|err| err.is_no_connection()));
        assert_eq!(service.repository.calls(), vec!["read_session"]);
    }

    #[test]
    fn test_register_requires_student_email() {
        let service = Service::new(MockRepository::default());
        let registration = Registration {
            username: "alice".to_string(),
            password: "secret123".to_string(),
            fullname: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            address: crate::AddressInput::default(),
        };
        assert!(matches!(
            block_on(service.register(registration.clone())),
            Err(RegistrationError::NoStudentEmail)
        ));
        assert!(service.repository.calls().is_empty());

        let registration = Registration {
            email: "alice@sis.hust.edu.vn".to_string(),
            ..registration
        };
        assert!(block_on(service.register(registration)).is_ok());
        assert_eq!(service.repository.calls(), vec!["create_account alice"]);
    }

    #[test]
    fn test_reset_password_validates_before_request() {
        let service = Service::new(MockRepository::default());
        assert!(matches!(
            block_on(service.reset_password("t", "secret", "secrets")),
            Err(PasswordResetError::Mismatch)
        ));
        assert!(matches!(
            block_on(service.reset_password("", "secret", "secret")),
            Err(PasswordResetError::MissingToken)
        ));
        assert!(service.repository.calls().is_empty());
        assert!(block_on(service.reset_password("t", "secret", "secret")).is_ok());
        assert_eq!(service.repository.calls(), vec!["reset_password t"]);
    }

    #[test]
    fn test_get_cart_without_session() {
        let service = Service::new(MockRepository::default());
        assert_eq!(block_on(service.get_cart(None)).ok(), Some(Cart::default()));
        assert!(service.repository.calls().is_empty());
    }

    #[test]
    fn test_cart_mutations_without_session() {
        let service = Service::new(MockRepository::default());
        assert!(matches!(
            block_on(service.add_to_cart(None, "p1".into(), 1)),
            Err(UpdateError::Storage(StorageError::NoSession))
        ));
        assert!(matches!(
            block_on(service.update_quantity(None, "p1".into(), 2)),
            Err(UpdateError::Storage(StorageError::NoSession))
        ));
        assert!(matches!(
            block_on(service.remove_from_cart(None, "p1".into())),
            Err(DeleteError::Storage(StorageError::NoSession))
        ));
        assert!(matches!(
            block_on(service.clear_cart(None)),
            Err(DeleteError::Storage(StorageError::NoSession))
        ));
        assert!(service.repository.calls().is_empty());
    }

    #[test]
    fn test_cart_invalid_quantity() {
        let service = Service::new(MockRepository::default());
        let user = user(AccountStatus::Active);
        assert!(matches!(
            block_on(service.add_to_cart(Some(&user), "p1".into(), 0)),
            Err(UpdateError::InvalidQuantity(0))
        ));
        assert!(matches!(
            block_on(service.update_quantity(Some(&user), "p1".into(), 0)),
            Err(UpdateError::InvalidQuantity(0))
        ));
        assert!(service.repository.calls().is_empty());
    }

    #[test]
    fn test_cart_mutations_refetch_cart() {
        let service = Service::new(MockRepository::default());
        let user = user(AccountStatus::Active);

        let cart = block_on(service.add_to_cart(Some(&user), "p1".into(), 2)).unwrap();
        assert_eq!(cart.items, vec![cart_item("p1", 10.0, 2)]);
        assert_approx_eq!(cart.total_amount, 20.0);

        let cart = block_on(service.update_quantity(Some(&user), "p1".into(), 5)).unwrap();
        assert_eq!(cart.items, vec![cart_item("p1", 10.0, 5)]);

        let cart = block_on(service.remove_from_cart(Some(&user), "p1".into())).unwrap();
        assert!(cart.is_empty());

        let cart = block_on(service.clear_cart(Some(&user))).unwrap();
        assert!(cart.is_empty());

        assert_eq!(
            service.repository.calls(),
            vec![
                "add_cart_item u1 p1 2",
                "read_cart u1",
                "replace_cart_item u1 p1 5",
                "read_cart u1",
                "delete_cart_item u1 p1",
                "read_cart u1",
                "delete_cart u1",
                "read_cart u1",
            ]
        );
    }

    #[test]
    fn test_update_quantity_debounced() {
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let service = Rc::new(Service::new(MockRepository {
            cart: RefCell::new(vec![cart_item("p1", 10.0, 1), cart_item("p2", 10.0, 1)]),
            ..MockRepository::default()
        }));
        let debouncer = Rc::new(QuantityDebouncer::new());
        let user = Rc::new(user(AccountStatus::Active));
        let mut senders = vec![];

        for (product_id, quantity) in [("p1", 2), ("p1", 3), ("p2", 7), ("p1", 4), ("p1", 5)] {
            let (sender, receiver) = oneshot::channel::<()>();
            senders.push(sender);
            let service = service.clone();
            let debouncer = debouncer.clone();
            let user = user.clone();
            spawner
                .spawn_local(async move {
                    let _ = service
                        .update_quantity_debounced(
                            &debouncer,
                            Some(&user),
                            product_id.into(),
                            quantity,
                            async move {
                                let _ = receiver.await;
                            },
                        )
                        .await;
                })
                .unwrap();
            pool.run_until_stalled();
        }

        assert!(service.repository.calls().is_empty());

        for sender in senders {
            sender.send(()).unwrap();
        }
        pool.run_until_stalled();

        let mut updates = service
            .repository
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("replace_cart_item"))
            .collect::<Vec<_>>();
        updates.sort();
        assert_eq!(
            updates,
            vec!["replace_cart_item u1 p1 5", "replace_cart_item u1 p2 7"]
        );
    }

    #[test]
    fn test_estimate_shipping() {
        let service = Service::new(MockRepository {
            shops: HashMap::from([
                ("s1".into(), shop("s1", Some(address("1111", "W1")))),
                ("s2".into(), shop("s2", None)),
            ]),
            fees: HashMap::from([
                (("1111".to_string(), 300), 20_000.0),
                (("1488".to_string(), 100), 15_000.0),
            ]),
            ..MockRepository::default()
        });
        let items = vec![
            checkout_item("p1", Some("s1"), 100),
            checkout_item("p2", Some("s1"), 200),
            checkout_item("p3", None, 100),
            checkout_item("p4", Some("s2"), 400),
            checkout_item("p5", Some("s3"), 100),
        ];

        let estimate = block_on(service.estimate_shipping(&items, &destination()));

        assert_eq!(
            estimate.per_shop,
            vec![
                ShopShippingFee {
                    shop_id: None,
                    fee: 15_000.0,
                    fallback: false,
                },
                ShopShippingFee {
                    shop_id: Some("s1".into()),
                    fee: 20_000.0,
                    fallback: false,
                },
                ShopShippingFee {
                    shop_id: Some("s2".into()),
                    fee: FALLBACK_SHIPPING_FEE,
                    fallback: true,
                },
                ShopShippingFee {
                    shop_id: Some("s3".into()),
                    fee: 15_000.0,
                    fallback: false,
                },
            ]
        );
        assert_approx_eq!(estimate.total, 85_000.0);

        let mut calls = service.repository.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                "read_shipping_fee 1111/W1 -> 1490/1B0101 300g",
                "read_shipping_fee 1488/1A0607 -> 1490/1B0101 100g",
                "read_shipping_fee 1488/1A0607 -> 1490/1B0101 100g",
                "read_shipping_fee 1488/1A0607 -> 1490/1B0101 400g",
                "read_shop s1",
                "read_shop s2",
                "read_shop s3",
            ]
        );
    }

    #[test]
    fn test_estimate_shipping_without_items() {
        let service = Service::new(MockRepository::default());
        assert_eq!(
            block_on(service.estimate_shipping(&[], &destination())),
            ShippingEstimate::default()
        );
        assert!(service.repository.calls().is_empty());
    }

    #[test]
    fn test_place_order_requirements() {
        let service = Service::new(MockRepository::default());
        let items = vec![checkout_item("p1", None, 100)];
        assert!(matches!(
            block_on(service.place_order(None, CheckoutSource::Cart, &items)),
            Err(CreateError::Storage(StorageError::NoSession))
        ));
        let user_without_address = User {
            address: None,
            ..user(AccountStatus::Active)
        };
        assert!(matches!(
            block_on(service.place_order(
                Some(&user_without_address),
                CheckoutSource::Cart,
                &items
            )),
            Err(CreateError::MissingAddress)
        ));
        assert!(matches!(
            block_on(service.place_order(
                Some(&user(AccountStatus::Active)),
                CheckoutSource::Cart,
                &[]
            )),
            Err(CreateError::NothingToOrder)
        ));
        assert!(service.repository.calls().is_empty());
    }

    #[test]
    fn test_place_order() {
        let service = Service::new(MockRepository::default());
        let user = user(AccountStatus::Active);
        let items = vec![
            CheckoutItem {
                quantity: 3,
                ..checkout_item("p1", None, 100)
            },
            checkout_item("p2", None, 100),
        ];

        let orders =
            block_on(service.place_order(Some(&user), CheckoutSource::BuyNow, &items)).unwrap();
        assert_eq!(orders.len(), 1);
        block_on(service.place_order(Some(&user), CheckoutSource::Cart, &items)).unwrap();

        assert_eq!(
            service.repository.calls(),
            vec!["create_instant_order p1 3", "create_cart_orders p1,p2"]
        );
    }

    #[test]
    fn test_toggle_bans() {
        let service = Service::new(MockRepository::default());
        assert_eq!(
            block_on(service.toggle_user_ban(&user(AccountStatus::Active))).ok(),
            Some(true)
        );
        assert_eq!(
            block_on(service.toggle_user_ban(&user(AccountStatus::Banned))).ok(),
            Some(false)
        );
        let banned_shop = Shop {
            status: ListingStatus::Banned,
            ..shop("s1", None)
        };
        assert_eq!(
            block_on(service.toggle_shop_ban(&banned_shop)).ok(),
            Some(false)
        );
        assert_eq!(
            service.repository.calls(),
            vec![
                "replace_user_ban u1 true",
                "replace_user_ban u1 false",
                "replace_shop_ban s1 false",
            ]
        );
    }
}
