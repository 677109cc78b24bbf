use serde::{Deserialize, Serialize};

/// Query parameters for `/api/properties/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PropertyQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    /// Minimum nightly price (NGN)
    pub min_price: Option<i64>,
    /// Maximum nightly price (NGN)
    pub max_price: Option<i64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub property_type: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PropertyQuery {
    /// Query pairs in a fixed order. Absent values and empty strings are left out.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut text = |key: &'static str, value: &Option<String>| {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        };
        text("search", &self.search);
        text("location", &self.location);

        let numbers = [
            ("min_price", self.min_price),
            ("max_price", self.max_price),
            ("bedrooms", self.bedrooms.map(i64::from)),
            ("bathrooms", self.bathrooms.map(i64::from)),
        ];
        pairs.extend(numbers.into_iter().filter_map(|(k, v)| v.map(|v| (k, v.to_string()))));

        if let Some(t) = self.property_type.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            pairs.push(("property_type", t.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("page_size", size.to_string()));
        }
        pairs
    }
}
