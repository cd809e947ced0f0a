//! REST client for the marketplace backend.
//!
//! Every response is wrapped in an envelope `{code, message, result}`, where a code of
//! [`SUCCESS_CODE`] marks success. A response with status 401 invalidates the stored token.

use std::collections::BTreeSet;

use bkmart_domain as domain;
use bkmart_web_app::{TokenRepository, authorization_header, config::API_BASE_URL};
use chrono::{NaiveDate, NaiveDateTime};
use domain::StorageError;
use gloo_net::http::{Request, RequestBuilder, Response};
use log::debug;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use url::Url;

use crate::local_storage;

pub const SUCCESS_CODE: i32 = 1000;

const NOT_FOUND_CODES: &[i32] = &[1005, 1014, 1016, 1018, 1019, 1022];
const CONFLICT_CODES: &[i32] = &[1002, 1009, 1013];
const CART_EMPTY_CODE: i32 = 1017;
const ADDRESS_NOT_FOUND_CODE: i32 = 1022;

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone, Default)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

#[derive(Clone)]
pub struct REST<S: SendRequest, T: TokenRepository> {
    pub sender: S,
    pub tokens: T,
    pub base_url: &'static str,
}

impl REST<GlooNetSendRequest, local_storage::Token> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sender: GlooNetSendRequest,
            tokens: local_storage::Token,
            base_url: API_BASE_URL,
        }
    }
}

impl Default for REST<GlooNetSendRequest, local_storage::Token> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl<S: SendRequest, T: TokenRepository> REST<S, T> {
    fn url(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = Url::parse(self.base_url).map_err(|err| StorageError::Other(err.into()))?;
        url.path_segments_mut()
            .map_err(|()| StorageError::Other("invalid base URL".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, verb: Verb, url: &Url) -> RequestBuilder {
        let builder = match verb {
            Verb::Get => Request::get(url.as_str()),
            Verb::Post => Request::post(url.as_str()),
            Verb::Put => Request::put(url.as_str()),
            Verb::Delete => Request::delete(url.as_str()),
        };
        match self.tokens.read_token() {
            Some(token) => builder.header("Authorization", &authorization_header(&token)),
            None => builder,
        }
    }

    async fn get<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<R, StorageError> {
        let url = self.url(segments)?;
        self.fetch(self.request(Verb::Get, &url).build()).await
    }

    async fn send_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        verb: Verb,
        segments: &[&str],
        body: &B,
    ) -> Result<R, StorageError> {
        let url = self.url(segments)?;
        self.fetch(self.request(verb, &url).json(body)).await
    }

    async fn send_json_no_content<B: Serialize + ?Sized>(
        &self,
        verb: Verb,
        segments: &[&str],
        body: &B,
    ) -> Result<(), StorageError> {
        let url = self.url(segments)?;
        self.fetch_optional::<serde_json::Value>(self.request(verb, &url).json(body))
            .await
            .map(|_| ())
    }

    async fn post_no_content(&self, url: &Url) -> Result<(), StorageError> {
        self.fetch_optional::<serde_json::Value>(self.request(Verb::Post, url).build())
            .await
            .map(|_| ())
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), StorageError> {
        let url = self.url(segments)?;
        self.fetch_optional::<serde_json::Value>(self.request(Verb::Delete, &url).build())
            .await
            .map(|_| ())
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<R, StorageError> {
        self.fetch_optional(request)
            .await?
            .ok_or_else(|| StorageError::Other("missing result".into()))
    }

    async fn fetch_optional<R: DeserializeOwned>(
        &self,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<Option<R>, StorageError> {
        let request = request.map_err(|err| StorageError::Other(err.into()))?;
        let response = self
            .sender
            .send_request(request)
            .await
            .map_err(|_| StorageError::NoConnection)?;
        if response.status() == 401 {
            debug!("session token rejected");
            self.tokens.delete_token();
            return Err(StorageError::Unauthorized);
        }
        let body = response
            .text()
            .await
            .map_err(|err| StorageError::Other(err.into()))?;
        unwrap_envelope(response.status(), &body)
    }

    fn require_token(&self) -> Result<(), StorageError> {
        if self.tokens.read_token().is_some() {
            Ok(())
        } else {
            Err(StorageError::NoSession)
        }
    }
}

/// Extract the result of a response body.
pub fn unwrap_envelope<R: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<Option<R>, StorageError> {
    if body.trim().is_empty() {
        return if (200..300).contains(&status) {
            Ok(None)
        } else {
            Err(StorageError::Rejected {
                code: i32::from(status),
                message: format!("HTTP {status}"),
            })
        };
    }
    let envelope = serde_json::from_str::<Envelope<R>>(body).map_err(|err| {
        if (200..300).contains(&status) {
            StorageError::Other(err.into())
        } else {
            StorageError::Rejected {
                code: i32::from(status),
                message: format!("HTTP {status}"),
            }
        }
    })?;
    if envelope.code == SUCCESS_CODE {
        Ok(envelope.result)
    } else {
        Err(StorageError::Rejected {
            code: envelope.code,
            message: envelope.message.unwrap_or_default(),
        })
    }
}

fn read_error(error: StorageError) -> domain::ReadError {
    match error {
        StorageError::Rejected { code, .. } if NOT_FOUND_CODES.contains(&code) => {
            domain::ReadError::NotFound
        }
        error => domain::ReadError::Storage(error),
    }
}

fn create_error(error: StorageError) -> domain::CreateError {
    match error {
        StorageError::Rejected { code, .. } if CONFLICT_CODES.contains(&code) => {
            domain::CreateError::Conflict
        }
        StorageError::Rejected {
            code: CART_EMPTY_CODE,
            ..
        } => domain::CreateError::NothingToOrder,
        StorageError::Rejected {
            code: ADDRESS_NOT_FOUND_CODE,
            ..
        } => domain::CreateError::MissingAddress,
        error => domain::CreateError::Storage(error),
    }
}

fn update_error(error: StorageError) -> domain::UpdateError {
    match error {
        StorageError::Rejected { code, .. } if CONFLICT_CODES.contains(&code) => {
            domain::UpdateError::Conflict
        }
        error => domain::UpdateError::Storage(error),
    }
}

impl<S: SendRequest, T: TokenRepository> domain::SessionRepository for REST<S, T> {
    async fn request_token(
        &self,
        credentials: domain::Credentials,
    ) -> Result<(), domain::ReadError> {
        let token: Token = self
            .send_json(
                Verb::Post,
                &["auth", "token"],
                &json!({
                    "username": credentials.username,
                    "password": credentials.password,
                }),
            )
            .await
            .map_err(read_error)?;
        self.tokens
            .write_token(&token.token)
            .map_err(|err| domain::ReadError::Other(err.into()))
    }

    async fn read_session(&self) -> Result<domain::User, domain::ReadError> {
        self.require_token()?;
        let user: User = self
            .get(&["users", "myInfo"])
            .await
            .map_err(read_error)?;
        Ok(user.into())
    }

    async fn delete_session(&self) -> Result<(), domain::DeleteError> {
        self.tokens.delete_token();
        Ok(())
    }

    async fn create_account(
        &self,
        registration: domain::Registration,
    ) -> Result<(), domain::CreateError> {
        self.send_json_no_content(
            Verb::Post,
            &["users"],
            &json!({
                "username": registration.username,
                "password": registration.password,
                "fullname": registration.fullname,
                "email": registration.email,
                "address": AddressInput::from(registration.address),
            }),
        )
        .await
        .map_err(create_error)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), domain::UpdateError> {
        let mut url = self.url(&["auth", "forgot-password"])?;
        url.query_pairs_mut().append_pair("email", email);
        self.post_no_content(&url).await.map_err(update_error)
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), domain::UpdateError> {
        let mut url = self.url(&["auth", "reset-password"])?;
        url.query_pairs_mut()
            .append_pair("token", token)
            .append_pair("newPassword", new_password);
        self.post_no_content(&url).await.map_err(update_error)
    }
}

impl<S: SendRequest, T: TokenRepository> domain::UserRepository for REST<S, T> {
    async fn read_user(&self, id: domain::UserID) -> Result<domain::User, domain::ReadError> {
        let user: User = self.get(&["users", &id]).await.map_err(read_error)?;
        Ok(user.into())
    }

    async fn replace_profile(
        &self,
        id: domain::UserID,
        profile: domain::ProfileUpdate,
    ) -> Result<domain::User, domain::UpdateError> {
        let user: User = self
            .send_json(
                Verb::Put,
                &["users", &id],
                &json!({
                    "fullname": profile.fullname,
                    "email": profile.email,
                    "address": AddressInput::from(profile.address),
                }),
            )
            .await
            .map_err(update_error)?;
        Ok(user.into())
    }
}

impl<S: SendRequest, T: TokenRepository> domain::LocationRepository for REST<S, T> {
    async fn read_provinces(&self) -> Result<Vec<domain::Province>, domain::ReadError> {
        let divisions: Vec<Division> = self
            .get(&["locations", "provinces"])
            .await
            .map_err(read_error)?;
        Ok(divisions.into_iter().map(domain::Division::from).collect())
    }

    async fn read_districts(
        &self,
        province_code: &str,
    ) -> Result<Vec<domain::District>, domain::ReadError> {
        let divisions: Vec<Division> = self
            .get(&["locations", "districts", province_code])
            .await
            .map_err(read_error)?;
        Ok(divisions.into_iter().map(domain::Division::from).collect())
    }

    async fn read_wards(
        &self,
        district_code: &str,
    ) -> Result<Vec<domain::Ward>, domain::ReadError> {
        let divisions: Vec<Division> = self
            .get(&["locations", "wards", district_code])
            .await
            .map_err(read_error)?;
        Ok(divisions.into_iter().map(domain::Division::from).collect())
    }
}

impl<S: SendRequest, T: TokenRepository> domain::ProductRepository for REST<S, T> {
    async fn read_products(&self) -> Result<Vec<domain::Product>, domain::ReadError> {
        let products: Vec<Product> = self.get(&["products"]).await.map_err(read_error)?;
        Ok(products.into_iter().map(domain::Product::from).collect())
    }

    async fn read_product(
        &self,
        id: domain::ProductID,
    ) -> Result<domain::Product, domain::ReadError> {
        let product: Product = self.get(&["products", &id]).await.map_err(read_error)?;
        Ok(product.into())
    }

    async fn search_products(
        &self,
        keyword: &str,
    ) -> Result<Vec<domain::Product>, domain::ReadError> {
        let products: Vec<Product> = self
            .get(&["products", "search", keyword])
            .await
            .map_err(read_error)?;
        Ok(products.into_iter().map(domain::Product::from).collect())
    }

    async fn read_shop_products(
        &self,
        shop_id: domain::ShopID,
    ) -> Result<Vec<domain::Product>, domain::ReadError> {
        let products: Vec<Product> = self
            .get(&["products", "shop", &shop_id])
            .await
            .map_err(read_error)?;
        Ok(products.into_iter().map(domain::Product::from).collect())
    }

    async fn create_product(
        &self,
        draft: domain::ProductDraft,
    ) -> Result<domain::Product, domain::CreateError> {
        let product: Product = self
            .send_json(Verb::Post, &["products"], &ProductDraft::from(draft))
            .await
            .map_err(create_error)?;
        Ok(product.into())
    }

    async fn replace_product(
        &self,
        id: domain::ProductID,
        draft: domain::ProductDraft,
    ) -> Result<domain::Product, domain::UpdateError> {
        let product: Product = self
            .send_json(Verb::Put, &["products", &id], &ProductDraft::from(draft))
            .await
            .map_err(update_error)?;
        Ok(product.into())
    }

    async fn delete_product(
        &self,
        id: domain::ProductID,
    ) -> Result<domain::ProductID, domain::DeleteError> {
        self.delete(&["products", &id]).await?;
        Ok(id)
    }

    async fn upload_product_images(
        &self,
        id: domain::ProductID,
        images: Vec<domain::ProductImage>,
    ) -> Result<(), domain::UpdateError> {
        let form = form_data(&images)?;
        let url = self.url(&["products", &id, "images", "upload"])?;
        self.fetch_optional::<serde_json::Value>(self.request(Verb::Post, &url).body(form))
            .await
            .map_err(update_error)?;
        Ok(())
    }
}

fn form_data(images: &[domain::ProductImage]) -> Result<web_sys::FormData, StorageError> {
    let js_error = |err: wasm_bindgen::JsValue| StorageError::Other(format!("{err:?}").into());
    let form = web_sys::FormData::new().map_err(js_error)?;
    for image in images {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(image.bytes.as_slice()));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(&image.content_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(js_error)?;
        form.append_with_blob_and_filename("files", &blob, &image.file_name)
            .map_err(js_error)?;
    }
    Ok(form)
}

impl<S: SendRequest, T: TokenRepository> domain::CategoryRepository for REST<S, T> {
    async fn read_categories(&self) -> Result<Vec<domain::Category>, domain::ReadError> {
        let categories: Vec<Category> = self.get(&["categories"]).await.map_err(read_error)?;
        Ok(categories.into_iter().map(domain::Category::from).collect())
    }

    async fn create_category(
        &self,
        name: domain::Name,
    ) -> Result<domain::Category, domain::CreateError> {
        let category: Category = self
            .send_json(
                Verb::Post,
                &["categories"],
                &json!({ "name": name.as_ref() }),
            )
            .await
            .map_err(create_error)?;
        Ok(category.into())
    }

    async fn delete_category(&self, name: &str) -> Result<(), domain::DeleteError> {
        Ok(self.delete(&["categories", name]).await?)
    }
}

impl<S: SendRequest, T: TokenRepository> domain::ShopRepository for REST<S, T> {
    async fn read_shop(&self, id: domain::ShopID) -> Result<domain::Shop, domain::ReadError> {
        let shop: Shop = self.get(&["shops", &id]).await.map_err(read_error)?;
        Ok(shop.into())
    }

    async fn read_shops(&self) -> Result<Vec<domain::Shop>, domain::ReadError> {
        let shops: Vec<Shop> = self.get(&["shops"]).await.map_err(read_error)?;
        Ok(shops.into_iter().map(domain::Shop::from).collect())
    }

    async fn read_owner_shops(
        &self,
        owner_username: &str,
    ) -> Result<Vec<domain::Shop>, domain::ReadError> {
        let shops: Vec<Shop> = self
            .get(&["shops", "owner", owner_username])
            .await
            .map_err(read_error)?;
        Ok(shops.into_iter().map(domain::Shop::from).collect())
    }

    async fn create_shop(
        &self,
        draft: domain::ShopDraft,
    ) -> Result<domain::Shop, domain::CreateError> {
        let shop: Shop = self
            .send_json(
                Verb::Post,
                &["shops"],
                &json!({
                    "name": draft.name.as_ref(),
                    "address": AddressInput::from(draft.address),
                }),
            )
            .await
            .map_err(create_error)?;
        Ok(shop.into())
    }

    async fn delete_shop(&self, id: domain::ShopID) -> Result<domain::ShopID, domain::DeleteError> {
        self.delete(&["shops", &id]).await?;
        Ok(id)
    }

    async fn read_shop_revenue(
        &self,
        id: domain::ShopID,
    ) -> Result<domain::ShopRevenue, domain::ReadError> {
        let revenue: ShopRevenue = self
            .get(&["shops", &id, "revenue"])
            .await
            .map_err(read_error)?;
        Ok(revenue.into())
    }
}

impl<S: SendRequest, T: TokenRepository> domain::CartRepository for REST<S, T> {
    async fn read_cart(&self, user_id: domain::UserID) -> Result<domain::Cart, domain::ReadError> {
        let cart: Option<Cart> = self
            .fetch_optional(self.request(Verb::Get, &self.url(&["cart", &user_id])?).build())
            .await
            .map_err(read_error)?;
        Ok(cart.map(domain::Cart::from).unwrap_or_default())
    }

    async fn add_cart_item(
        &self,
        user_id: domain::UserID,
        product_id: domain::ProductID,
        quantity: u32,
    ) -> Result<(), domain::UpdateError> {
        self.send_json_no_content(
            Verb::Post,
            &["cart", "add", &user_id],
            &json!({ "productId": product_id.as_str(), "quantity": quantity }),
        )
        .await
        .map_err(update_error)
    }

    async fn replace_cart_item(
        &self,
        user_id: domain::UserID,
        product_id: domain::ProductID,
        quantity: u32,
    ) -> Result<(), domain::UpdateError> {
        self.send_json_no_content(
            Verb::Put,
            &["cart", "update", &user_id],
            &json!({ "productId": product_id.as_str(), "quantity": quantity }),
        )
        .await
        .map_err(update_error)
    }

    async fn delete_cart_item(
        &self,
        user_id: domain::UserID,
        product_id: domain::ProductID,
    ) -> Result<(), domain::DeleteError> {
        Ok(self.delete(&["cart", "remove", &user_id, &product_id]).await?)
    }

    async fn delete_cart(&self, user_id: domain::UserID) -> Result<(), domain::DeleteError> {
        Ok(self.delete(&["cart", "clear", &user_id]).await?)
    }
}

impl<S: SendRequest, T: TokenRepository> domain::OrderRepository for REST<S, T> {
    async fn read_user_orders(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::Order>, domain::ReadError> {
        let orders: Vec<Order> = self
            .get(&["orders", "user", &user_id])
            .await
            .map_err(read_error)?;
        Ok(orders.into_iter().map(domain::Order::from).collect())
    }

    async fn read_shop_orders(
        &self,
        shop_id: domain::ShopID,
    ) -> Result<Vec<domain::Order>, domain::ReadError> {
        let orders: Vec<Order> = self
            .get(&["orders", "shop", &shop_id])
            .await
            .map_err(read_error)?;
        Ok(orders.into_iter().map(domain::Order::from).collect())
    }

    async fn read_order(&self, id: domain::OrderID) -> Result<domain::Order, domain::ReadError> {
        let order: Order = self.get(&["orders", &id]).await.map_err(read_error)?;
        Ok(order.into())
    }

    async fn create_cart_orders(
        &self,
        product_ids: Vec<domain::ProductID>,
    ) -> Result<Vec<domain::Order>, domain::CreateError> {
        let product_ids = product_ids
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>();
        let orders: Vec<Order> = self
            .send_json(
                Verb::Post,
                &["orders", "checkout", "selected"],
                &json!({ "productIds": product_ids }),
            )
            .await
            .map_err(create_error)?;
        Ok(orders.into_iter().map(domain::Order::from).collect())
    }

    async fn create_instant_order(
        &self,
        product_id: domain::ProductID,
        quantity: u32,
    ) -> Result<domain::Order, domain::CreateError> {
        let order: Order = self
            .send_json(
                Verb::Post,
                &["orders", "buy-now"],
                &json!({ "productId": product_id.as_str(), "quantity": quantity }),
            )
            .await
            .map_err(create_error)?;
        Ok(order.into())
    }

    async fn request_cancellation(
        &self,
        id: domain::OrderID,
    ) -> Result<domain::Order, domain::UpdateError> {
        let url = self.url(&["orders", &id, "cancel-request"])?;
        let order: Order = self
            .fetch(self.request(Verb::Post, &url).build())
            .await
            .map_err(update_error)?;
        Ok(order.into())
    }

    async fn respond_to_cancellation(
        &self,
        id: domain::OrderID,
        accept: bool,
    ) -> Result<domain::Order, domain::UpdateError> {
        let order: Order = self
            .send_json(Verb::Post, &["orders", &id, "cancel-response"], &accept)
            .await
            .map_err(update_error)?;
        Ok(order.into())
    }

    async fn confirm_order(
        &self,
        id: domain::OrderID,
    ) -> Result<domain::Order, domain::UpdateError> {
        let url = self.url(&["orders", &id, "confirm"])?;
        let order: Order = self
            .fetch(self.request(Verb::Post, &url).build())
            .await
            .map_err(update_error)?;
        Ok(order.into())
    }
}

impl<S: SendRequest, T: TokenRepository> domain::ShippingRepository for REST<S, T> {
    async fn read_shipping_fee(
        &self,
        request: domain::ShippingFeeRequest,
    ) -> Result<f64, domain::ReadError> {
        let fee: ShippingFee = self
            .send_json(
                Verb::Post,
                &["shipping", "calculate"],
                &ShippingFeeRequest::from(request),
            )
            .await
            .map_err(read_error)?;
        Ok(fee.fee)
    }
}

impl<S: SendRequest, T: TokenRepository> domain::AdminRepository for REST<S, T> {
    async fn read_all_users(&self) -> Result<Vec<domain::User>, domain::ReadError> {
        let users: Vec<User> = self.get(&["admin", "users"]).await.map_err(read_error)?;
        Ok(users.into_iter().map(domain::User::from).collect())
    }

    async fn read_user_detail(
        &self,
        id: domain::UserID,
    ) -> Result<domain::UserDetail, domain::ReadError> {
        let detail: UserDetail = self
            .get(&["admin", "users", &id])
            .await
            .map_err(read_error)?;
        Ok(detail.into())
    }

    async fn replace_user_ban(
        &self,
        id: domain::UserID,
        banned: bool,
    ) -> Result<(), domain::UpdateError> {
        self.send_json_no_content(
            Verb::Put,
            &["admin", "users", &id, "ban"],
            &json!({ "banned": banned }),
        )
        .await
        .map_err(update_error)
    }

    async fn read_all_shops(&self) -> Result<Vec<domain::Shop>, domain::ReadError> {
        let shops: Vec<Shop> = self.get(&["shops"]).await.map_err(read_error)?;
        Ok(shops.into_iter().map(domain::Shop::from).collect())
    }

    async fn replace_shop_ban(
        &self,
        id: domain::ShopID,
        banned: bool,
    ) -> Result<(), domain::UpdateError> {
        self.send_json_no_content(
            Verb::Put,
            &["admin", "shops", &id, "ban"],
            &json!({ "banned": banned }),
        )
        .await
        .map_err(update_error)
    }

    async fn read_all_products(&self) -> Result<Vec<domain::Product>, domain::ReadError> {
        let products: Vec<Product> = self
            .get(&["admin", "products"])
            .await
            .map_err(read_error)?;
        Ok(products.into_iter().map(domain::Product::from).collect())
    }

    async fn replace_product_ban(
        &self,
        id: domain::ProductID,
        banned: bool,
    ) -> Result<(), domain::UpdateError> {
        self.send_json_no_content(
            Verb::Put,
            &["admin", "products", &id, "ban"],
            &json!({ "banned": banned }),
        )
        .await
        .map_err(update_error)
    }

    async fn read_any_order(
        &self,
        id: domain::OrderID,
    ) -> Result<domain::Order, domain::ReadError> {
        let order: Order = self
            .get(&["admin", "orders", &id])
            .await
            .map_err(read_error)?;
        Ok(order.into())
    }
}

#[derive(Deserialize, Debug)]
pub struct Envelope<R> {
    pub code: i32,
    pub message: Option<String>,
    pub result: Option<R>,
}

#[derive(Deserialize, Debug)]
pub struct Token {
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub code: String,
    #[serde(default)]
    pub full_name: String,
}

impl From<Division> for domain::Division {
    fn from(value: Division) -> Self {
        domain::Division {
            code: value.code,
            full_name: value.full_name,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address_detail: Option<String>,
    pub ward: Option<Division>,
    pub district: Option<Division>,
    pub province: Option<Division>,
}

impl From<Address> for domain::Address {
    fn from(value: Address) -> Self {
        domain::Address {
            name: value.name.unwrap_or_default(),
            phone: value.phone.unwrap_or_default(),
            detail: value.address_detail.unwrap_or_default(),
            ward: value.ward.map(domain::Division::from),
            district: value.district.map(domain::Division::from),
            province: value.province.map(domain::Division::from),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub name: String,
    pub phone: String,
    pub address_detail: String,
    pub ward_code: String,
}

impl From<domain::AddressInput> for AddressInput {
    fn from(value: domain::AddressInput) -> Self {
        AddressInput {
            name: value.name,
            phone: value.phone,
            address_detail: value.address_detail,
            ward_code: value.ward_code,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Role {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub address: Option<Address>,
    pub status: Option<String>,
}

impl From<User> for domain::User {
    fn from(value: User) -> Self {
        domain::User {
            id: value.user_id.into(),
            username: value.username,
            fullname: value.fullname.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            roles: value
                .roles
                .iter()
                .map(|role| domain::Role::from(role.name.as_str()))
                .collect::<BTreeSet<_>>(),
            address: value.address.map(domain::Address::from),
            status: value
                .status
                .as_deref()
                .map(domain::AccountStatus::from)
                .unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub recent_orders: Vec<Order>,
    #[serde(default)]
    pub recent_activities: Vec<String>,
}

impl From<UserDetail> for domain::UserDetail {
    fn from(value: UserDetail) -> Self {
        domain::UserDetail {
            id: value.user_id.into(),
            username: value.username,
            fullname: value.fullname.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            status: value
                .status
                .as_deref()
                .map(domain::AccountStatus::from)
                .unwrap_or_default(),
            recent_orders: value
                .recent_orders
                .into_iter()
                .map(domain::Order::from)
                .collect(),
            recent_activities: value.recent_activities,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub category_id: Option<String>,
    pub name: String,
}

impl From<Category> for domain::Category {
    fn from(value: Category) -> Self {
        domain::Category {
            id: value.category_id.unwrap_or_default(),
            name: value.name,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image_url: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub shop_id: Option<String>,
    pub name: String,
    pub price: f64,
    pub weight: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub status: Option<String>,
}

impl From<Product> for domain::Product {
    fn from(value: Product) -> Self {
        domain::Product {
            id: value.product_id.into(),
            shop_id: value.shop_id.map(domain::ShopID::from),
            name: value.name,
            price: value.price,
            weight: grams(value.weight),
            brand: value.brand.unwrap_or_default(),
            description: value.description.unwrap_or_default(),
            categories: value.categories.into_iter().map(|c| c.name).collect(),
            images: value.images.into_iter().map(|i| i.image_url).collect(),
            status: value
                .status
                .as_deref()
                .map(domain::ListingStatus::from)
                .unwrap_or_default(),
        }
    }
}

/// Weights of zero count as unknown.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn grams(weight: Option<f64>) -> Option<u32> {
    weight
        .filter(|w| w.is_finite() && *w >= 0.5)
        .map(|w| w.round().min(f64::from(u32::MAX)) as u32)
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub shop_id: String,
    pub name: String,
    pub price: f64,
    pub weight: Option<u32>,
    pub brand: String,
    pub description: String,
    pub category_names: Vec<String>,
}

impl From<domain::ProductDraft> for ProductDraft {
    fn from(value: domain::ProductDraft) -> Self {
        ProductDraft {
            shop_id: value.shop_id.to_string(),
            name: value.name.to_string(),
            price: value.price,
            weight: value.weight,
            brand: value.brand,
            description: value.description,
            category_names: value.category_names,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub shop_id: String,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub owner_username: Option<String>,
    pub address: Option<Address>,
    pub status: Option<String>,
}

impl From<Shop> for domain::Shop {
    fn from(value: Shop) -> Self {
        domain::Shop {
            id: value.shop_id.into(),
            name: value.name,
            owner_id: value.owner_id.unwrap_or_default().into(),
            owner_username: value.owner_username.unwrap_or_default(),
            address: value.address.map(domain::Address::from),
            status: value
                .status
                .as_deref()
                .map(domain::ListingStatus::from)
                .unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
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

impl From<ShopRevenue> for domain::ShopRevenue {
    fn from(value: ShopRevenue) -> Self {
        domain::ShopRevenue {
            total_revenue: value.total_revenue,
            total_orders: value.total_orders,
            pending_orders: value.pending_orders,
            awaiting_pickup_orders: value.awaiting_pickup_orders,
            shipped_orders: value.shipped_orders,
            delivered_orders: value.delivered_orders,
            cancelled_orders: value.cancelled_orders,
            average_order_value: value.average_order_value,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_amount: f64,
}

impl From<Cart> for domain::Cart {
    fn from(value: Cart) -> Self {
        domain::Cart {
            items: value.items.into_iter().map(domain::CartItem::from).collect(),
            total_amount: value.total_amount,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub product_name: Option<String>,
    #[serde(default)]
    pub price: f64,
    pub quantity: u32,
    pub shop_id: Option<String>,
    pub weight: Option<f64>,
    pub product: Option<CartProduct>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

impl From<CartItem> for domain::CartItem {
    fn from(value: CartItem) -> Self {
        let (product_name, discontinued) = match value.product {
            Some(product) => (value.product_name.or(product.name), product.deleted),
            None => (value.product_name, false),
        };
        domain::CartItem {
            product_id: value.product_id.into(),
            product_name,
            price: value.price,
            quantity: value.quantity,
            shop_id: value.shop_id.map(domain::ShopID::from),
            weight: grams(value.weight),
            discontinued,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    #[serde(default)]
    pub total_amount: f64,
    pub status: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub shipment: Option<Shipment>,
    #[serde(default)]
    pub cancellation_requested: bool,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl From<Order> for domain::Order {
    fn from(value: Order) -> Self {
        domain::Order {
            id: value.order_id.into(),
            total_amount: value.total_amount,
            status: domain::OrderStatus::from(value.status.as_deref().unwrap_or_default()),
            created_at: value.created_at,
            shipment: value.shipment.map(domain::Shipment::from),
            cancellation_requested: value.cancellation_requested,
            items: value.items.into_iter().map(domain::OrderItem::from).collect(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub shipping_fee: f64,
    pub estimated_delivery_date: Option<NaiveDate>,
}

impl From<Shipment> for domain::Shipment {
    fn from(value: Shipment) -> Self {
        domain::Shipment {
            id: value.id.unwrap_or_default(),
            status: value.status.unwrap_or_default(),
            shipping_fee: value.shipping_fee,
            estimated_delivery_date: value.estimated_delivery_date,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub price_at_purchase: f64,
    #[serde(default)]
    pub product_deleted: bool,
}

impl From<OrderItem> for domain::OrderItem {
    fn from(value: OrderItem) -> Self {
        domain::OrderItem {
            product_id: value.product_id.map(domain::ProductID::from),
            product_name: value.product_name,
            quantity: value.quantity,
            price_at_purchase: value.price_at_purchase,
            product_deleted: value.product_deleted,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFeeRequest {
    pub from_district_code: String,
    pub from_ward_code: String,
    pub to_district_code: String,
    pub to_ward_code: String,
    pub weight_gram: u32,
}

impl From<domain::ShippingFeeRequest> for ShippingFeeRequest {
    fn from(value: domain::ShippingFeeRequest) -> Self {
        ShippingFeeRequest {
            from_district_code: value.from_district_code,
            from_ward_code: value.from_ward_code,
            to_district_code: value.to_district_code,
            to_ward_code: value.to_ward_code,
            weight_gram: value.weight_gram,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ShippingFee {
    pub fee: f64,
}
