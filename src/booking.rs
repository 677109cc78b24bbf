use crate::api::RentalApi;
use crate::busy::BusyFlag;
use crate::error::{Result, ValidationError};
use crate::models::{Booking, BookingStatus, NewBooking, PaymentMethod, PropertyId, UserProfile};
use crate::pricing::{self, Amount, PriceBreakdown, TaxRate};
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;
use tracing::{error, info, warn};

/// The booking confirmation form
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub property_id: PropertyId,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub guests: u32,
    pub payment_method: PaymentMethod,
}

/// A form that passed every check and can be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub property_id: PropertyId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub guests: u32,
    pub payment_method: PaymentMethod,
}

impl BookingForm {
    pub fn new(property_id: PropertyId) -> Self {
        Self {
            property_id,
            check_in: None,
            check_out: None,
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            guests: 1,
            payment_method: PaymentMethod::default(),
        }
    }

    /// Contact fields come from the signed-in user's profile
    pub fn prefilled(property_id: PropertyId, profile: &UserProfile) -> Self {
        Self {
            full_name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone().unwrap_or_default(),
            ..Self::new(property_id)
        }
    }

    pub fn validate(&self) -> Result<ValidatedBooking, ValidationError> {
        let check_in = self.check_in.ok_or(ValidationError::MissingField("Check-in date"))?;
        let check_out = self.check_out.ok_or(ValidationError::MissingField("Check-out date"))?;
        let full_name = required(&self.full_name, "Full name")?;
        let email = required(&self.email, "Email")?;
        let phone = required(&self.phone, "Phone number")?;
        if self.guests == 0 {
            return Err(ValidationError::NoGuests);
        }
        let nights = pricing::nights(check_in, check_out)?;

        Ok(ValidatedBooking {
            property_id: self.property_id,
            check_in,
            check_out,
            nights,
            full_name,
            email,
            phone,
            guests: self.guests,
            payment_method: self.payment_method,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// A created booking and where to send the browser to pay for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub booking: Booking,
    pub breakdown: PriceBreakdown,
    pub payment_link: String,
}

/// Submits booking forms one at a time
#[derive(Debug, Default)]
pub struct BookingFlow {
    busy: BusyFlag,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Validate, create the booking, then ask for a payment link.
    /// Validation failures never reach the API. A payment failure is reported as a
    /// failure even though the booking record exists server-side.
    pub async fn submit(
        &self,
        api: &dyn RentalApi,
        form: &BookingForm,
        nightly: Amount,
        rate: TaxRate,
    ) -> Result<Confirmation> {
        let _guard = self.busy.acquire()?;

        let booking = form.validate().map_err(|e| {
            info!("Booking blocked: {}", e);
            e
        })?;
        let breakdown = pricing::quote(nightly, booking.nights, rate)?;

        let request = NewBooking {
            property: booking.property_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            guests: booking.guests,
            payment_method: booking.payment_method,
            full_name: booking.full_name,
            email: booking.email,
            phone: booking.phone,
            total_price: breakdown.total,
        };

        info!(
            "Creating booking for property {} ({} nights, total {})",
            request.property, breakdown.nights, breakdown.total
        );
        let created = api.create_booking(&request).await.map_err(|e| {
            error!("Failed to create booking: {}", e);
            e
        })?;

        let payment = api
            .initiate_payment(created.id, request.payment_method)
            .await
            .map_err(|e| {
                error!("Failed to initiate payment for booking {}: {}", created.id, e);
                e
            })?;

        info!("Booking {} created, redirecting to payment", created.id);
        Ok(Confirmation {
            booking: created,
            breakdown,
            payment_link: payment.payment_link,
        })
    }
}

/// Status tab on the bookings page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl StatusFilter {
    pub fn matches(self, booking: &Booking) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => booking.status == status,
        }
    }
}

/// The user's past and upcoming bookings
#[derive(Debug, Default)]
pub struct BookingHistory {
    bookings: Vec<Booking>,
}

impl BookingHistory {
    pub async fn load(api: &dyn RentalApi) -> Result<Self> {
        let bookings = api.list_bookings().await.map_err(|e| {
            warn!("Failed to fetch bookings: {}", e);
            e
        })?;
        Ok(Self { bookings })
    }

    pub fn filtered(&self, filter: StatusFilter) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| filter.matches(b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::error::AppError;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn filled_form() -> BookingForm {
        BookingForm {
            check_in: Some(date(10)),
            check_out: Some(date(12)),
            full_name: "Ada Obi".into(),
            email: "ada@example.com".into(),
            phone: "+2348000000000".into(),
            guests: 2,
            ..BookingForm::new(2)
        }
    }

    #[test]
    fn prefill_copies_contact_details() {
        let profile = UserProfile {
            id: 1,
            name: "Ada Obi".into(),
            email: "ada@example.com".into(),
            phone: None,
        };
        let mut form = BookingForm::prefilled(9, &profile);
        assert_eq!(form.full_name, "Ada Obi");
        assert_eq!(form.phone, "");
        assert_eq!(form.payment_method, PaymentMethod::Flutterwave);
        assert_eq!(form.validate(), Err(ValidationError::MissingField("Check-in date")));

        form.check_in = Some(date(10));
        form.check_out = Some(date(12));
        assert_eq!(form.validate(), Err(ValidationError::MissingField("Phone number")));
    }

    #[test]
    fn blank_fields_are_missing() {
        let form = BookingForm {
            email: "   ".into(),
            ..filled_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingField("Email")));

        let form = BookingForm {
            guests: 0,
            ..filled_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::NoGuests));
    }

    #[tokio::test]
    async fn submits_booking_then_payment() {
        let api = FakeApi::new();
        let flow = BookingFlow::new();
        let confirmation = flow
            .submit(&api, &filled_form(), Amount::from_major(150_000), TaxRate::from_percent(20))
            .await
            .unwrap();

        assert_eq!(confirmation.breakdown.nights, 2);
        assert_eq!(confirmation.breakdown.total, Amount::from_major(360_000));
        assert_eq!(confirmation.booking.total_price, Amount::from_major(360_000));
        assert_eq!(confirmation.payment_link, "https://pay.example/flutterwave/1");
        assert_eq!(api.calls(), vec!["create_booking", "initiate_payment"]);
        assert!(!flow.is_busy());
    }

    #[tokio::test]
    async fn concurrent_submit_is_rejected_while_busy() {
        let api = FakeApi::new();
        api.yield_on_create();
        let flow = BookingFlow::new();
        let form = filled_form();

        let (first, second) = tokio::join!(
            flow.submit(&api, &form, Amount::from_major(150_000), TaxRate::default()),
            flow.submit(&api, &form, Amount::from_major(150_000), TaxRate::default()),
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(AppError::Busy)));
        assert_eq!(api.bookings().len(), 1);
        assert!(!flow.is_busy());

        flow.submit(&api, &form, Amount::from_major(150_000), TaxRate::default())
            .await
            .unwrap();
        assert_eq!(api.bookings().len(), 2);
    }

    #[tokio::test]
    async fn missing_phone_blocks_submission() {
        let api = FakeApi::new();
        let form = BookingForm {
            phone: String::new(),
            ..filled_form()
        };
        let err = BookingFlow::new()
            .submit(&api, &form, Amount::from_major(150_000), TaxRate::default())
            .await
            .unwrap_err();

        assert_eq!(err.notice(), "Phone number is required");
        assert!(api.calls().is_empty());
        assert!(api.bookings().is_empty());
    }

    #[tokio::test]
    async fn reversed_dates_never_reach_the_api() {
        let api = FakeApi::new();
        let form = BookingForm {
            check_in: Some(date(12)),
            check_out: Some(date(12)),
            ..filled_form()
        };
        let err = BookingFlow::new()
            .submit(&api, &form, Amount::from_major(1), TaxRate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ValidationError::CheckOutNotAfterCheckIn)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn payment_failure_is_not_success() {
        let api = FakeApi::new();
        api.fail("initiate_payment");
        let err = BookingFlow::new()
            .submit(&api, &filled_form(), Amount::from_major(1), TaxRate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Api(_)));
        assert_eq!(err.notice(), crate::error::RETRY_NOTICE);
    }

    #[tokio::test]
    async fn history_filters_by_status() {
        let booking = |id, status| Booking {
            id,
            property: 1,
            check_in: date(1),
            check_out: date(3),
            guests: 1,
            payment_method: PaymentMethod::Paystack,
            total_price: Amount::from_major(100),
            status,
            created_at: None,
        };
        let api = FakeApi::new().with_bookings(vec![
            booking(1, BookingStatus::Completed),
            booking(2, BookingStatus::Confirmed),
            booking(3, BookingStatus::Cancelled),
        ]);
        let history = BookingHistory::load(&api).await.unwrap();

        assert_eq!(history.filtered(StatusFilter::All).len(), 3);
        let canceled: StatusFilter = "Canceled".parse().unwrap();
        let ids: Vec<u64> = history.filtered(canceled).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3]);
    }
}
