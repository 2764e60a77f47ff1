//! Embedded address value stored in the `users.address` JSONB column.

use serde::{Deserialize, Serialize};

/// Geographic coordinates of an address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

/// A postal address with coordinates.
///
/// Always complete: every sub-field is present on stored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

/// A partial address update.
///
/// Absent fields keep their stored value. `geo` is replaced as a whole since
/// latitude and longitude are only ever supplied together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

impl AddressPatch {
    /// Returns `true` if the patch carries no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.street.is_none() && self.city.is_none() && self.zipcode.is_none() && self.geo.is_none()
    }

    /// Apply the patch to a stored address.
    pub fn apply_to(&self, address: &mut Address) {
        if let Some(street) = &self.street {
            address.street.clone_from(street);
        }
        if let Some(city) = &self.city {
            address.city.clone_from(city);
        }
        if let Some(zipcode) = &self.zipcode {
            address.zipcode.clone_from(zipcode);
        }
        if let Some(geo) = self.geo {
            address.geo = geo;
        }
    }
}
