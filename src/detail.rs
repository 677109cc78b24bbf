use crate::api::RentalApi;
use crate::error::{Result, ValidationError};
use crate::gallery::Gallery;
use crate::models::{Property, PropertyId};
use crate::pricing::{self, PriceBreakdown, TaxRate};
use chrono::NaiveDate;
use tracing::{info, warn};

/// What "Book now" hands to the confirmation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingIntent {
    pub property_id: PropertyId,
    pub nights: u32,
}

/// One property page: the listing and its gallery
#[derive(Debug, Clone)]
pub struct PropertyDetail {
    pub property: Property,
    pub gallery: Gallery,
}

impl PropertyDetail {
    pub fn new(property: Property) -> Self {
        let gallery = Gallery::for_property(&property);
        Self { property, gallery }
    }

    pub async fn load(api: &dyn RentalApi, id: PropertyId) -> Result<Self> {
        let property = api.get_property(id).await.map_err(|e| {
            warn!("Failed to fetch property {}: {}", id, e);
            e
        })?;
        info!("Loaded property {} ({})", property.id, property.title);
        Ok(Self::new(property))
    }

    /// Price for staying from `check_in` to `check_out`
    pub fn stay_quote(&self, check_in: NaiveDate, check_out: NaiveDate, rate: TaxRate) -> Result<PriceBreakdown> {
        let nightly = self.property.nightly_price()?;
        Ok(pricing::quote_stay(nightly, check_in, check_out, rate)?)
    }

    pub fn book_now(
        &self,
        logged_in: bool,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> Result<BookingIntent, ValidationError> {
        if !logged_in {
            return Err(ValidationError::LoginRequired);
        }
        let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
            return Err(ValidationError::MissingField("Check-in and check-out dates"));
        };
        Ok(BookingIntent {
            property_id: self.property.id,
            nights: pricing::nights(check_in, check_out)?,
        })
    }
}
