use crate::api::{PropertyQuery, RentalApi};
use crate::error::Result;
use crate::models::{Property, PropertyId};
use crate::pricing::Amount;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

pub const ITEMS_PER_PAGE: usize = 6;
pub const MAX_PAGES: usize = 10;
pub const DEFAULT_LOCATION: &str = "Lagos, Nigeria";
pub const DEFAULT_PROPERTY_TYPE: &str = "House";
pub const FALLBACK_IMAGE: &str = "/house.jpeg";

/// Nightly price buckets offered by the search filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceRange {
    #[default]
    From200To500,
    From500To1000,
    From1000To2000,
    Above2000,
}

impl PriceRange {
    pub const ALL: [PriceRange; 4] = [
        PriceRange::From200To500,
        PriceRange::From500To1000,
        PriceRange::From1000To2000,
        PriceRange::Above2000,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PriceRange::From200To500 => "₦200-₦500",
            PriceRange::From500To1000 => "₦500-₦1000",
            PriceRange::From1000To2000 => "₦1000-₦2000",
            PriceRange::Above2000 => "₦2000+",
        }
    }

    /// `(min, max)` in whole naira
    pub fn bounds(self) -> (i64, Option<i64>) {
        match self {
            PriceRange::From200To500 => (200_000, Some(500_000)),
            PriceRange::From500To1000 => (500_000, Some(1_000_000)),
            PriceRange::From1000To2000 => (1_000_000, Some(2_000_000)),
            PriceRange::Above2000 => (2_000_000, None),
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the labels above, with or without the naira sign
impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().replace('₦', "");
        PriceRange::ALL
            .into_iter()
            .find(|r| r.label().replace('₦', "") == wanted)
            .ok_or_else(|| format!("unknown price range: {s}"))
    }
}

/// What the search form holds
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilters {
    pub search: String,
    pub location: String,
    pub price_range: PriceRange,
    pub property_type: String,
    /// 1-based page to ask the server for
    pub page: usize,
}

impl Default for CatalogFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            location: DEFAULT_LOCATION.to_string(),
            price_range: PriceRange::default(),
            property_type: DEFAULT_PROPERTY_TYPE.to_string(),
            page: 1,
        }
    }
}

impl CatalogFilters {
    /// Translate to API query parameters. Values still at their default are dropped,
    /// except the price bucket which always bounds the search. `page` and
    /// `page_size` ask the server for one page of `ITEMS_PER_PAGE` listings.
    pub fn to_query(&self) -> PropertyQuery {
        let search = self.search.trim();
        let location = self.location.trim();
        let property_type = self.property_type.trim();
        let (min_price, max_price) = self.price_range.bounds();

        PropertyQuery {
            search: (!search.is_empty()).then(|| search.to_string()),
            location: (!location.is_empty() && location != DEFAULT_LOCATION).then(|| location.to_string()),
            min_price: Some(min_price),
            max_price,
            property_type: (!property_type.is_empty() && property_type != DEFAULT_PROPERTY_TYPE)
                .then(|| property_type.to_lowercase()),
            page: Some(self.page.max(1) as u32),
            page_size: Some(ITEMS_PER_PAGE as u32),
            ..Default::default()
        }
    }

    /// The same search without paging, for fetching every match at once
    pub fn to_unpaged_query(&self) -> PropertyQuery {
        PropertyQuery {
            page: None,
            page_size: None,
            ..self.to_query()
        }
    }
}

/// Paging state: over a fetched result set, or over the server's total count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    total_pages: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self { page: 1, total_pages: 1 }
    }
}

impl Pager {
    pub fn for_items(len: usize) -> Self {
        let pages = len.div_ceil(ITEMS_PER_PAGE).clamp(1, MAX_PAGES);
        Self { page: 1, total_pages: pages }
    }

    /// Pages for a server that reported `count` matches in total, positioned on `page`
    pub fn for_count(count: u64, page: usize) -> Self {
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        let mut pager = Self::for_items(count);
        pager.go_to(page);
        pager
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Move to `page`, clamped to `[1, total_pages]`
    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages);
        self.page
    }

    pub fn next(&mut self) -> usize {
        self.go_to(self.page + 1)
    }

    pub fn previous(&mut self) -> usize {
        self.go_to(self.page.saturating_sub(1))
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.page - 1) * ITEMS_PER_PAGE).min(items.len());
        let end = (start + ITEMS_PER_PAGE).min(items.len());
        &items[start..end]
    }
}

/// What a listing card shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyCard {
    pub id: PropertyId,
    pub title: String,
    pub price: Amount,
    pub address: String,
    pub area: String,
    pub city: String,
    pub beds: u32,
    pub baths: u32,
    pub size: String,
    pub image_url: String,
    pub is_favorite: bool,
}

impl PropertyCard {
    pub fn from_property(property: &Property, favorites: &BTreeSet<PropertyId>) -> Self {
        let mut parts = property.location.split(',').map(str::trim);
        let address = parts
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(property.location.as_str())
            .to_string();
        let area = parts.next().unwrap_or_default().to_string();
        let city = parts.next().unwrap_or_default().to_string();

        let price = property.nightly_price().unwrap_or_else(|e| {
            warn!("Property {} has an unreadable price: {}", property.id, e);
            Amount::ZERO
        });

        Self {
            id: property.id,
            title: property.title.clone(),
            price,
            address,
            area,
            city,
            beds: property.bedrooms,
            baths: property.bathrooms,
            size: if property.area.trim().is_empty() {
                "N/A".to_string()
            } else {
                format!("{} m²", property.area.trim())
            },
            image_url: property.main_image_url().unwrap_or(FALLBACK_IMAGE).to_string(),
            is_favorite: favorites.contains(&property.id) || property.is_favorite,
        }
    }
}

/// Up to three other listings to show under a property
pub fn similar(properties: &[Property], current: PropertyId) -> Vec<&Property> {
    properties.iter().filter(|p| p.id != current).take(3).collect()
}

/// Where paging happens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Paging {
    /// Fetch every match once and page through it locally
    #[default]
    Client,
    /// Ask the server for one page at a time
    Server,
}

/// The property search page: filters, the last fetched results and paging over them
#[derive(Debug, Default)]
pub struct Catalog {
    pub filters: CatalogFilters,
    paging: Paging,
    results: Vec<Property>,
    pager: Pager,
}

impl Catalog {
    pub fn new(filters: CatalogFilters) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn server_paged(filters: CatalogFilters) -> Self {
        Self {
            filters,
            paging: Paging::Server,
            ..Default::default()
        }
    }

    pub fn paging(&self) -> Paging {
        self.paging
    }

    /// Fetch with the current filters. Client paging goes back to page 1; server
    /// paging fetches `filters.page`. A failed fetch leaves the previous results untouched.
    pub async fn search(&mut self, api: &dyn RentalApi) -> Result<()> {
        let query = match self.paging {
            Paging::Client => self.filters.to_unpaged_query(),
            Paging::Server => self.filters.to_query(),
        };
        info!("Searching properties with {:?}", query.pairs());

        let page = api.list_properties(&query).await.map_err(|e| {
            warn!("Failed to fetch properties: {}", e);
            e
        })?;

        info!("Fetched {} of {} properties", page.results.len(), page.count);
        self.pager = match self.paging {
            Paging::Client => Pager::for_items(page.results.len()),
            Paging::Server => Pager::for_count(page.count, self.filters.page),
        };
        self.results = page.results;
        Ok(())
    }

    /// Back to the default filters, then search again
    pub async fn clear_filters(&mut self, api: &dyn RentalApi) -> Result<()> {
        self.filters = CatalogFilters::default();
        self.search(api).await
    }

    /// Move to `page`, clamped to the known page count. Server paging fetches that page.
    pub async fn go_to(&mut self, api: &dyn RentalApi, page: usize) -> Result<usize> {
        let target = self.pager.go_to(page);
        if self.paging == Paging::Server && target != self.filters.page {
            let shown = std::mem::replace(&mut self.filters.page, target);
            if let Err(e) = self.search(api).await {
                self.filters.page = shown;
                self.pager.go_to(shown);
                return Err(e);
            }
        }
        Ok(self.pager.page())
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn results(&self) -> &[Property] {
        &self.results
    }

    pub fn current_page(&self) -> &[Property] {
        match self.paging {
            Paging::Client => self.pager.slice(&self.results),
            Paging::Server => &self.results,
        }
    }

    pub fn cards(&self, favorites: &BTreeSet<PropertyId>) -> Vec<PropertyCard> {
        self.current_page()
            .iter()
            .map(|p| PropertyCard::from_property(p, favorites))
            .collect()
    }
}
