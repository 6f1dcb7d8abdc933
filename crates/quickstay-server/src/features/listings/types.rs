//! Listing domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::features::shared::{slugify, validation::round_cents};

/// Kind of accommodation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingType {
    #[serde(rename = "PG")]
    Pg,
    Rental,
    Hostel,
    #[serde(rename = "Co-living")]
    CoLiving,
}

impl ListingType {
    pub const NAMES: &'static [&'static str] = &["PG", "Rental", "Hostel", "Co-living"];

    pub fn as_str(self) -> &'static str {
        match self {
            ListingType::Pg => "PG",
            ListingType::Rental => "Rental",
            ListingType::Hostel => "Hostel",
            ListingType::CoLiving => "Co-living",
        }
    }
}

impl std::str::FromStr for ListingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PG" => Ok(ListingType::Pg),
            "Rental" => Ok(ListingType::Rental),
            "Hostel" => Ok(ListingType::Hostel),
            "Co-living" => Ok(ListingType::CoLiving),
            other => Err(format!("unknown listing type '{}'", other)),
        }
    }
}

impl std::fmt::Display for ListingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who the accommodation is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Boys,
    Girls,
    Both,
}

impl PropertyType {
    pub const NAMES: &'static [&'static str] = &["Boys", "Girls", "Both"];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Boys => "Boys",
            PropertyType::Girls => "Girls",
            PropertyType::Both => "Both",
        }
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Boys" => Ok(PropertyType::Boys),
            "Girls" => Ok(PropertyType::Girls),
            "Both" => Ok(PropertyType::Both),
            other => Err(format!("unknown property type '{}'", other)),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored accommodation listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub name: String,
    pub property_name: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub property_type: PropertyType,
    pub address: String,
    pub price: f64,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub verified: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub google_map_link: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Validated create payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub name: String,
    pub property_name: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub property_type: PropertyType,
    pub address: String,
    pub price: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub google_map_link: Option<String>,
}

fn default_true() -> bool {
    true
}

impl NewListing {
    /// Materialize a listing with a fresh id, derived slug and timestamps.
    pub fn into_listing(self, id: Uuid, now: DateTime<Utc>) -> Listing {
        Listing {
            id,
            slug: slugify(&self.property_name),
            name: self.name,
            property_name: self.property_name,
            listing_type: self.listing_type,
            property_type: self.property_type,
            address: self.address,
            price: round_cents(self.price),
            rating: self.rating.map(round_cents),
            description: self.description,
            verified: self.verified,
            is_active: self.is_active,
            is_deleted: false,
            amenities: self.amenities,
            images: self.images,
            email: self.email,
            phone: self.phone,
            google_map_link: self.google_map_link,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Validated partial update.
///
/// Outer `None` means the field was absent and keeps its value. For nullable
/// fields `Some(None)` is an explicit `null` that clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default, rename = "type")]
    pub listing_type: Option<ListingType>,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub google_map_link: Option<Option<String>>,
}

/// Distinguishes an explicit `null` from an absent key.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ListingPatch {
    /// Merge supplied fields into `listing`. Re-derives the slug when
    /// `propertyName` is supplied. Does not touch timestamps.
    pub fn apply_to(self, listing: &mut Listing) {
        if let Some(name) = self.name {
            listing.name = name;
        }
        if let Some(property_name) = self.property_name {
            listing.slug = slugify(&property_name);
            listing.property_name = property_name;
        }
        if let Some(listing_type) = self.listing_type {
            listing.listing_type = listing_type;
        }
        if let Some(property_type) = self.property_type {
            listing.property_type = property_type;
        }
        if let Some(address) = self.address {
            listing.address = address;
        }
        if let Some(price) = self.price {
            listing.price = round_cents(price);
        }
        if let Some(rating) = self.rating {
            listing.rating = rating.map(round_cents);
        }
        if let Some(description) = self.description {
            listing.description = description;
        }
        if let Some(verified) = self.verified {
            listing.verified = verified;
        }
        if let Some(is_active) = self.is_active {
            listing.is_active = is_active;
        }
        if let Some(amenities) = self.amenities {
            listing.amenities = amenities;
        }
        if let Some(images) = self.images {
            listing.images = images;
        }
        if let Some(email) = self.email {
            listing.email = email;
        }
        if let Some(phone) = self.phone {
            listing.phone = phone;
        }
        if let Some(google_map_link) = self.google_map_link {
            listing.google_map_link = google_map_link;
        }
    }
}

/// One page of a filtered listing query
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub items: Vec<Listing>,
    /// Matches before limit/offset
    pub total: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_listing() -> NewListing {
        serde_json::from_value(json!({
            "name": "Sunset PG",
            "propertyName": "Sunset Apartments!!",
            "type": "PG",
            "propertyType": "Both",
            "address": "12 MG Road",
            "price": 4500.456
        }))
        .unwrap()
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(ListingType::CoLiving).unwrap(), json!("Co-living"));
        assert_eq!(serde_json::to_value(ListingType::Pg).unwrap(), json!("PG"));
        assert_eq!("Co-living".parse::<ListingType>().unwrap(), ListingType::CoLiving);
        assert!("pg".parse::<ListingType>().is_err());
        assert_eq!("Girls".parse::<PropertyType>().unwrap(), PropertyType::Girls);
        for name in ListingType::NAMES {
            assert_eq!(name.parse::<ListingType>().unwrap().as_str(), *name);
        }
    }

    #[test]
    fn test_new_listing_defaults() {
        let listing = new_listing().into_listing(Uuid::new_v4(), Utc::now());
        assert_eq!(listing.slug, "sunset-apartments");
        assert!(!listing.verified);
        assert!(listing.is_active);
        assert!(!listing.is_deleted);
        assert!(listing.amenities.is_empty());
        assert_eq!(listing.price, 4500.46);
        assert_eq!(listing.created_at, listing.updated_at);
    }

    #[test]
    fn test_listing_json_is_camel_case_without_deleted_at() {
        let listing = new_listing().into_listing(Uuid::new_v4(), Utc::now());
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["propertyName"], "Sunset Apartments!!");
        assert_eq!(json["type"], "PG");
        assert_eq!(json["isActive"], true);
        assert!(json.get("deletedAt").is_none());
        assert!(json.get("googleMapLink").is_some());
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: ListingPatch =
            serde_json::from_value(json!({"description": null, "price": 2000})).unwrap();
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.rating, None);
        assert_eq!(patch.price, Some(2000.0));
    }

    #[test]
    fn test_patch_apply_only_touches_supplied_fields() {
        let mut listing = new_listing().into_listing(Uuid::new_v4(), Utc::now());
        listing.description = Some("Near metro".to_string());
        listing.rating = Some(4.2);
        let before = listing.clone();

        let patch: ListingPatch = serde_json::from_value(json!({
            "rating": null,
            "verified": false,
            "propertyName": "Green Valley"
        }))
        .unwrap();
        patch.apply_to(&mut listing);

        assert_eq!(listing.rating, None);
        assert_eq!(listing.description, before.description);
        assert_eq!(listing.slug, "green-valley");
        assert_eq!(listing.property_name, "Green Valley");
        assert_eq!(listing.price, before.price);
        assert_eq!(listing.updated_at, before.updated_at);
    }
}
