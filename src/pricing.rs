use crate::error::ValidationError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Money in minor units (kobo)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Saturates at the `i64` bounds; meant for literal amounts
    pub fn from_major(major: i64) -> Self {
        Self(major.saturating_mul(100))
    }

    pub fn minor(self) -> i64 {
        self.0
    }

    /// Whole naira, rounded half up
    pub fn major(self) -> i64 {
        (self.0 + 50).div_euclid(100)
    }

    pub fn checked_times(self, n: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(n)).map(Self)
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Parse a decimal string such as `"150000"`, `"150000.50"` or `"1,500.00"`
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidAmount(raw.to_string());
        let cleaned = raw.trim().replace(',', "");
        let (whole, frac) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let digits: Vec<i64> = frac.bytes().map(|b| i64::from(b - b'0')).collect();
        let mut cents = digits.first().copied().unwrap_or(0) * 10 + digits.get(1).copied().unwrap_or(0);
        if digits.get(2).copied().unwrap_or(0) >= 5 {
            cents += 1;
        }

        whole
            .checked_mul(100)
            .and_then(|m| m.checked_add(cents))
            .map(Self)
            .ok_or_else(invalid)
    }

    fn from_float(value: f64) -> Result<Self, ValidationError> {
        let minor = (value * 100.0).round();
        if !minor.is_finite() || minor < 0.0 || minor >= i64::MAX as f64 {
            return Err(ValidationError::InvalidAmount(value.to_string()));
        }
        Ok(Self(minor as i64))
    }
}

/// Renders as naira with no fraction digits, e.g. `₦150,000`
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.major();
        let digits = major.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if major < 0 {
            write!(f, "-₦{}", grouped)
        } else {
            write!(f, "₦{}", grouped)
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        serializer.serialize_str(&format!("{}{}.{:02}", sign, abs / 100, abs % 100))
    }
}

/// The API sends money either as a JSON number or as a decimal string
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Amount::from_float(n),
            Raw::Text(s) => Amount::parse(&s),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// Tax rate in basis points (1/100 of a percent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    pub fn from_basis_points(bps: u32) -> Self {
        Self(bps)
    }

    pub fn from_percent(percent: u32) -> Self {
        Self(percent.saturating_mul(100))
    }

    pub fn basis_points(self) -> u32 {
        self.0
    }

    /// Tax on `base`, rounded half up to whole naira. `None` if it does not fit.
    pub fn apply(self, base: Amount) -> Option<Amount> {
        // kobo * bps / 10_000 gives kobo; a further / 100 gives naira
        let scaled = i128::from(base.minor()) * i128::from(self.0);
        let naira = (scaled + 500_000).div_euclid(1_000_000);
        i64::try_from(naira * 100).ok().map(Amount::from_minor)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::from_percent(2)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

/// Billed nights between two instants: whole days rounded up, at least one.
pub fn nights_between(check_in: NaiveDateTime, check_out: NaiveDateTime) -> Result<u32, ValidationError> {
    let seconds = (check_out - check_in).num_seconds();
    if seconds <= 0 {
        return Err(ValidationError::CheckOutNotAfterCheckIn);
    }
    let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    Ok(u32::try_from(days).unwrap_or(u32::MAX).max(1))
}

/// Billed nights between two calendar dates
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> Result<u32, ValidationError> {
    nights_between(check_in.and_time(NaiveTime::MIN), check_out.and_time(NaiveTime::MIN))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub nightly: Amount,
    pub nights: u32,
    pub base: Amount,
    pub rate: TaxRate,
    pub tax: Amount,
    pub total: Amount,
}

impl PriceBreakdown {
    /// `"₦150,000 x 2 Nights"`
    pub fn nights_label(&self) -> String {
        let plural = if self.nights > 1 { "s" } else { "" };
        format!("{} x {} Night{}", self.nightly, self.nights, plural)
    }

    pub fn tax_label(&self) -> String {
        format!("Tax({})", self.rate)
    }
}

/// `base = nightly × nights`, `total = base + tax`. The base keeps any kobo the
/// nightly price has; the tax is whole naira.
pub fn quote(nightly: Amount, nights: u32, rate: TaxRate) -> Result<PriceBreakdown, ValidationError> {
    let too_large = || ValidationError::InvalidAmount(format!("{} x {} nights", nightly, nights));
    let base = nightly.checked_times(nights).ok_or_else(too_large)?;
    let tax = rate.apply(base).ok_or_else(too_large)?;
    let total = base.checked_add(tax).ok_or_else(too_large)?;
    Ok(PriceBreakdown {
        nightly,
        nights,
        base,
        rate,
        tax,
        total,
    })
}

/// Nights and price for a stay, rejecting a check-out on or before check-in.
pub fn quote_stay(
    nightly: Amount,
    check_in: NaiveDate,
    check_out: NaiveDate,
    rate: TaxRate,
) -> Result<PriceBreakdown, ValidationError> {
    let n = nights(check_in, check_out)?;
    quote(nightly, n, rate)
}
