use crate::api::traits::RentalApi;
use crate::api::types::PropertyQuery;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    Booking, BookingId, Favorite, NewBooking, Notification, NotificationId, Paginated,
    PaymentInitiation, PaymentMethod, ProfileUpdate, Property, PropertyId, ToggleResult,
    UserProfile,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// REST client for the rental API
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct UnreadCount {
    count: u64,
}

#[derive(Serialize)]
struct PaymentRequest {
    booking_id: BookingId,
    payment_method: PaymentMethod,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(concat!("shortlet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API returned status: {}", status);
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(builder).await?.text().await?;
        debug!("Received {} bytes", body.len());
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RentalApi for HttpApi {
    async fn list_properties(&self, query: &PropertyQuery) -> Result<Paginated<Property>, ApiError> {
        let req = self.request(Method::GET, "/api/properties/").query(&query.pairs());
        self.json(req).await
    }

    async fn get_property(&self, id: PropertyId) -> Result<Property, ApiError> {
        self.json(self.request(Method::GET, &format!("/api/properties/{id}/"))).await
    }

    async fn toggle_favorite(&self, id: PropertyId) -> Result<ToggleResult, ApiError> {
        self.json(self.request(Method::POST, &format!("/api/users/favorites/toggle/{id}/")))
            .await
    }

    async fn list_favorites(&self) -> Result<Vec<Favorite>, ApiError> {
        self.json(self.request(Method::GET, "/api/users/favorites/")).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        self.json(self.request(Method::POST, "/api/bookings/").json(booking)).await
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.json(self.request(Method::GET, "/api/bookings/")).await
    }

    async fn initiate_payment(
        &self,
        booking: BookingId,
        method: PaymentMethod,
    ) -> Result<PaymentInitiation, ApiError> {
        let body = PaymentRequest {
            booking_id: booking,
            payment_method: method,
        };
        self.json(self.request(Method::POST, "/api/payments/initiate/").json(&body))
            .await
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.json(self.request(Method::GET, "/api/notifications/")).await
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        let count: UnreadCount = self
            .json(self.request(Method::GET, "/api/notifications/count_unread/"))
            .await?;
        Ok(count.count)
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, &format!("/api/notifications/{id}/mark_as_read/")))
            .await?;
        Ok(())
    }

    async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, "/api/notifications/mark_all_as_read/"))
            .await?;
        Ok(())
    }

    async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.json(self.request(Method::GET, "/api/users/profile/")).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.json(self.request(Method::PATCH, "/api/users/profile/").json(update))
            .await
    }
}
