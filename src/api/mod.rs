pub mod http;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use http::HttpApi;
pub use traits::RentalApi;
pub use types::PropertyQuery;
