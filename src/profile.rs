use crate::api::RentalApi;
use crate::error::{Result, ValidationError};
use crate::models::{ProfileUpdate, UserProfile};
use tracing::{info, warn};

pub async fn fetch_profile(api: &dyn RentalApi) -> Result<UserProfile> {
    let profile = api.get_profile().await.map_err(|e| {
        warn!("Failed to fetch profile: {}", e);
        e
    })?;
    Ok(profile)
}

/// Name and email are required; phone is optional and a blank one clears it.
pub async fn update_profile(api: &dyn RentalApi, update: ProfileUpdate) -> Result<UserProfile> {
    let update = ProfileUpdate {
        name: update.name.trim().to_string(),
        email: update.email.trim().to_string(),
        phone: update.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
    };
    if update.name.is_empty() {
        return Err(ValidationError::MissingField("Name").into());
    }
    if update.email.is_empty() {
        return Err(ValidationError::MissingField("Email").into());
    }

    let profile = api.update_profile(&update).await.map_err(|e| {
        warn!("Failed to update profile: {}", e);
        e
    })?;
    info!("Profile {} updated", profile.id);
    Ok(profile)
}
