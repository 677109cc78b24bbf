use reqwest::StatusCode;
use thiserror::Error;

/// Problems caught before anything is sent to the API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,

    #[error("At least one guest is required")]
    NoGuests,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Please log in to continue")]
    LoginRequired,
}

/// Failures talking to the remote API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("A request is already in progress")]
    Busy,
}

pub const RETRY_NOTICE: &str = "Something went wrong. Please try again.";

impl AppError {
    /// Text shown to the user. API failures all collapse into the same retry notice.
    pub fn notice(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Api(_) => RETRY_NOTICE.to_string(),
            AppError::Busy => self.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_notice_names_the_field() {
        let err = AppError::from(ValidationError::MissingField("Phone number"));
        assert_eq!(err.notice(), "Phone number is required");
        assert!(err.is_validation());
    }

    #[test]
    fn api_failures_share_one_notice() {
        let err = AppError::from(ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".into(),
        });
        assert_eq!(err.notice(), RETRY_NOTICE);
        assert!(!err.is_validation());
    }
}
