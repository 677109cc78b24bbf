use crate::api::types::PropertyQuery;
use crate::error::ApiError;
use crate::models::{
    Booking, BookingId, Favorite, NewBooking, Notification, NotificationId, Paginated,
    PaymentInitiation, PaymentMethod, ProfileUpdate, Property, PropertyId, ToggleResult,
    UserProfile,
};
use async_trait::async_trait;

/// Every endpoint of the rental REST API the client talks to.
/// One call is one request: no retries, no cancellation.
#[async_trait]
pub trait RentalApi: Send + Sync {
    async fn list_properties(&self, query: &PropertyQuery) -> Result<Paginated<Property>, ApiError>;

    async fn get_property(&self, id: PropertyId) -> Result<Property, ApiError>;

    /// Flips the favorite server-side and reports which way it went
    async fn toggle_favorite(&self, id: PropertyId) -> Result<ToggleResult, ApiError>;

    async fn list_favorites(&self) -> Result<Vec<Favorite>, ApiError>;

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError>;

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError>;

    async fn initiate_payment(
        &self,
        booking: BookingId,
        method: PaymentMethod,
    ) -> Result<PaymentInitiation, ApiError>;

    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError>;

    async fn unread_count(&self) -> Result<u64, ApiError>;

    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ApiError>;

    async fn mark_all_notifications_read(&self) -> Result<(), ApiError>;

    async fn get_profile(&self) -> Result<UserProfile, ApiError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError>;
}
