//! In-memory `RentalApi` used by the unit tests. Records every call.

use crate::api::traits::RentalApi;
use crate::api::types::PropertyQuery;
use crate::error::ApiError;
use crate::models::{
    Booking, BookingId, BookingStatus, Favorite, NewBooking, Notification, NotificationId,
    Paginated, PaymentInitiation, PaymentMethod, ProfileUpdate, Property, PropertyId,
    ToggleAction, ToggleResult, UserProfile,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    properties: Vec<Property>,
    favorites: BTreeSet<PropertyId>,
    bookings: Vec<Booking>,
    notifications: Vec<Notification>,
    profile: Option<UserProfile>,
    calls: Vec<String>,
    last_query: Option<PropertyQuery>,
    failing: BTreeSet<&'static str>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
    yield_on_create: AtomicBool,
}

pub fn property(id: PropertyId, price: &str, location: &str) -> Property {
    Property {
        id,
        title: format!("Property {id}"),
        property_type: "apartment".into(),
        price: price.into(),
        duration: "night".into(),
        duration_display: "Per Night".into(),
        location: location.into(),
        bedrooms: 2,
        bathrooms: 1,
        area: "40".into(),
        is_available: true,
        main_image: None,
        main_image_url: None,
        images: vec![],
        features: vec![],
        video_url: None,
        is_favorite: false,
        description: String::new(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn notification(id: NotificationId, is_read: bool) -> Notification {
    Notification {
        id,
        title: format!("Notice {id}"),
        message: "Your booking was updated".into(),
        is_read,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(self, properties: Vec<Property>) -> Self {
        self.state.lock().unwrap().properties = properties;
        self
    }

    pub fn with_favorites(self, ids: &[PropertyId]) -> Self {
        self.state.lock().unwrap().favorites.extend(ids);
        self
    }

    pub fn with_notifications(self, notifications: Vec<Notification>) -> Self {
        self.state.lock().unwrap().notifications = notifications;
        self
    }

    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        self.state.lock().unwrap().bookings = bookings;
        self
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.state.lock().unwrap().profile = Some(profile);
        self
    }

    /// `create_booking` gives control back to the runtime once before answering
    pub fn yield_on_create(&self) {
        self.yield_on_create.store(true, Ordering::SeqCst);
    }

    /// Make the named endpoint answer with a 500
    pub fn fail(&self, endpoint: &'static str) {
        self.state.lock().unwrap().failing.insert(endpoint);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn last_query(&self) -> Option<PropertyQuery> {
        self.state.lock().unwrap().last_query.clone()
    }

    pub fn favorites(&self) -> BTreeSet<PropertyId> {
        self.state.lock().unwrap().favorites.clone()
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.state.lock().unwrap().bookings.clone()
    }

    fn enter(&self, endpoint: &'static str) -> Result<std::sync::MutexGuard<'_, State>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(endpoint.to_string());
        if state.failing.contains(endpoint) {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".into(),
            });
        }
        Ok(state)
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: StatusCode::NOT_FOUND,
        body: "Not found.".into(),
    }
}

#[async_trait]
impl RentalApi for FakeApi {
    async fn list_properties(&self, query: &PropertyQuery) -> Result<Paginated<Property>, ApiError> {
        let mut state = self.enter("list_properties")?;
        state.last_query = Some(query.clone());
        let matches: Vec<Property> = state
            .properties
            .iter()
            .filter(|p| match &query.location {
                Some(loc) => p.location.contains(loc.as_str()),
                None => true,
            })
            .filter(|p| match &query.search {
                Some(term) => p.title.to_lowercase().contains(&term.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        let count = matches.len() as u64;
        let results = match (query.page, query.page_size) {
            (Some(page), Some(size)) => matches
                .into_iter()
                .skip((page.max(1) as usize - 1) * size as usize)
                .take(size as usize)
                .collect(),
            _ => matches,
        };
        Ok(Paginated {
            count,
            next: None,
            previous: None,
            results,
        })
    }

    async fn get_property(&self, id: PropertyId) -> Result<Property, ApiError> {
        let state = self.enter("get_property")?;
        state.properties.iter().find(|p| p.id == id).cloned().ok_or_else(not_found)
    }

    async fn toggle_favorite(&self, id: PropertyId) -> Result<ToggleResult, ApiError> {
        let mut state = self.enter("toggle_favorite")?;
        let action = if state.favorites.remove(&id) {
            ToggleAction::Removed
        } else {
            state.favorites.insert(id);
            ToggleAction::Added
        };
        Ok(ToggleResult { action })
    }

    async fn list_favorites(&self) -> Result<Vec<Favorite>, ApiError> {
        let state = self.enter("list_favorites")?;
        Ok(state
            .favorites
            .iter()
            .map(|&id| Favorite {
                id,
                property: state
                    .properties
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .unwrap_or_else(|| property(id, "0", "")),
            })
            .collect())
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        if self.yield_on_create.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        let mut state = self.enter("create_booking")?;
        let created = Booking {
            id: state.bookings.len() as BookingId + 1,
            property: booking.property,
            check_in: booking.check_in,
            check_out: booking.check_out,
            guests: booking.guests,
            payment_method: booking.payment_method,
            total_price: booking.total_price,
            status: BookingStatus::Pending,
            created_at: None,
        };
        state.bookings.push(created.clone());
        Ok(created)
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        Ok(self.enter("list_bookings")?.bookings.clone())
    }

    async fn initiate_payment(
        &self,
        booking: BookingId,
        method: PaymentMethod,
    ) -> Result<PaymentInitiation, ApiError> {
        let _state = self.enter("initiate_payment")?;
        Ok(PaymentInitiation {
            booking_id: booking,
            payment_link: format!("https://pay.example/{}/{}", method.as_str(), booking),
        })
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        Ok(self.enter("list_notifications")?.notifications.clone())
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        let state = self.enter("unread_count")?;
        Ok(state.notifications.iter().filter(|n| !n.is_read).count() as u64)
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ApiError> {
        let mut state = self.enter("mark_notification_read")?;
        let n = state.notifications.iter_mut().find(|n| n.id == id).ok_or_else(not_found)?;
        n.is_read = true;
        Ok(())
    }

    async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        let mut state = self.enter("mark_all_notifications_read")?;
        state.notifications.iter_mut().for_each(|n| n.is_read = true);
        Ok(())
    }

    async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.enter("get_profile")?.profile.clone().ok_or_else(not_found)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let mut state = self.enter("update_profile")?;
        let profile = state.profile.get_or_insert_with(|| UserProfile {
            id: 1,
            name: String::new(),
            email: String::new(),
            phone: None,
        });
        profile.name = update.name.clone();
        profile.email = update.email.clone();
        profile.phone = update.phone.clone();
        Ok(profile.clone())
    }
}
