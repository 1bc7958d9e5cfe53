//! Address Value Objects
//!
//! Billing address with placeholder substitution and a lat/long point.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::StateCode;

pub const STREET_PLACEHOLDER: &str = "Address not available";
pub const CITY_PLACEHOLDER: &str = "Unknown";
pub const POSTCODE_PLACEHOLDER: &str = "0000";

/// Billing address as shown on a company profile
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingAddress {
    pub street: String,
    pub city: String,
    pub state: StateCode,
    pub postcode: String,
}

impl BillingAddress {
    /// Build from cleaned fields; missing parts get placeholders and the state
    /// is normalized from the state field or, failing that, the city.
    pub fn from_parts(
        street: Option<&str>,
        city: Option<&str>,
        state: Option<&str>,
        postcode: Option<&str>,
    ) -> Self {
        Self {
            street: street.unwrap_or(STREET_PLACEHOLDER).to_string(),
            city: city.unwrap_or(CITY_PLACEHOLDER).to_string(),
            state: StateCode::normalize(state, city),
            postcode: postcode.unwrap_or(POSTCODE_PLACEHOLDER).to_string(),
        }
    }

    /// Single-line display form
    pub fn single_line(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if self.street != STREET_PLACEHOLDER {
            parts.push(self.street.clone());
        }
        if self.city != CITY_PLACEHOLDER {
            parts.push(self.city.clone());
        }
        let mut tail = self.state.code().to_string();
        if self.postcode != POSTCODE_PLACEHOLDER {
            tail.push(' ');
            tail.push_str(&self.postcode);
        }
        parts.push(tail);
        parts.join(", ")
    }
}

impl Default for BillingAddress {
    fn default() -> Self {
        Self::from_parts(None, None, None, None)
    }
}

impl fmt::Display for BillingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.single_line())
    }
}

/// Latitude/longitude in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance in kilometres (haversine)
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        2.0 * Self::EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        let addr = BillingAddress::from_parts(None, Some("Geelong"), None, None);
        assert_eq!(addr.street, STREET_PLACEHOLDER);
        assert_eq!(addr.state, StateCode::VIC);
        assert_eq!(addr.postcode, POSTCODE_PLACEHOLDER);
        assert_eq!(addr.single_line(), "Geelong, VIC");
    }

    #[test]
    fn test_single_line_full() {
        let addr = BillingAddress::from_parts(Some("1 Main St"), Some("Perth"), Some("WA"), Some("6000"));
        assert_eq!(addr.to_string(), "1 Main St, Perth, WA 6000");
    }

    #[test]
    fn test_distance() {
        let sydney = StateCode::NSW.default_location();
        let melbourne = StateCode::VIC.default_location();
        let d = sydney.distance_km(&melbourne);
        assert!((700.0..730.0).contains(&d), "got {d}");
        assert!(sydney.distance_km(&sydney) < 1e-9);
    }
}
