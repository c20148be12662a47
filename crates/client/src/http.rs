//! reqwest implementation of [`CartApi`].

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use trolley::{CartItemUuid, CartUuid, CartView, ProductUuid, Quantity, UserUuid};

use crate::{
    api::{
        AddItemRequest, AddItemResponse, CartApi, CartResponse, UpdateQuantityRequest,
        UpdateQuantityResponse,
    },
    errors::ClientError,
};

/// Header carrying the caller's user id.
pub const USER_HEADER: &str = "x-user-id";

/// HTTP client for the cart JSON API, acting as one user.
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    base_url: String,
    user: UserUuid,
    http: Client,
}

impl HttpCartApi {
    /// Create a client for `base_url`, e.g. `"http://localhost:8698"`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, user: UserUuid) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(USER_HEADER, self.user.to_string())
    }

    async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();

        Err(ClientError::from_status(status.as_u16(), text))
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn fetch_cart(&self) -> Result<Option<CartView>, ClientError> {
        let response: CartResponse = Self::send(self.request(Method::GET, "/carts"))
            .await?
            .json()
            .await?;

        Ok(response.cart)
    }

    async fn add_item(
        &self,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<CartItemUuid, ClientError> {
        let body = AddItemRequest {
            product_id: product,
            quantity,
            cart_id: None,
        };

        let response: AddItemResponse =
            Self::send(self.request(Method::POST, "/cart_items").json(&body))
                .await?
                .json()
                .await?;

        Ok(response.id)
    }

    async fn update_item_quantity(
        &self,
        item: CartItemUuid,
        quantity: Quantity,
    ) -> Result<Quantity, ClientError> {
        let path = format!("/cart_items/{item}");
        let body = UpdateQuantityRequest { quantity };

        let response: UpdateQuantityResponse =
            Self::send(self.request(Method::PUT, &path).json(&body))
                .await?
                .json()
                .await?;

        Ok(response.quantity)
    }

    async fn remove_item(&self, item: CartItemUuid) -> Result<(), ClientError> {
        let path = format!("/cart_items/{item}");

        Self::send(self.request(Method::DELETE, &path)).await?;

        Ok(())
    }

    async fn clear_cart(&self, cart: CartUuid) -> Result<(), ClientError> {
        let path = format!("/carts/{cart}/items");

        Self::send(self.request(Method::DELETE, &path)).await?;

        Ok(())
    }
}
