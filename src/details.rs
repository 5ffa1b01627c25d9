//! Place details for the modal opened from a marker.
//!
//! The catalog's geosearch answer is large and loosely typed; this module
//! keeps the parts the modal shows and gives them stable names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const DEFAULT_SCHEDULE: &str = "Schedule not specified";
const DEFAULT_ADDRESS: &str = "Address not specified";
const SOURCE: &str = "2gis";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data to search for a place: {0}")]
    InvalidQuery(&'static str),
    #[error("Place not found: {0}")]
    NotFound(String),
}

/// What the client knows about a marker when it asks for details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub id: Option<String>,
}

impl DetailsQuery {
    pub fn validate(&self) -> Result<(), self::Error> {
        if self.title.trim().is_empty() {
            return Err(self::Error::InvalidQuery("title is empty"));
        }
        if !self.lon.is_finite() || !self.lat.is_finite() || self.lon == 0.0 || self.lat == 0.0 {
            return Err(self::Error::InvalidQuery("coordinates are missing"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeosearchResponse {
    #[serde(default)]
    pub result: Option<GeosearchResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeosearchResult {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address_name: Option<String>,
    #[serde(default)]
    pub point: Option<CatalogPoint>,
    #[serde(default)]
    pub rubrics: Vec<Rubric>,
    #[serde(default)]
    pub contact_groups: Vec<ContactGroup>,
    #[serde(default)]
    pub schedule: Option<Value>,
    #[serde(default)]
    pub rating: Option<CatalogRating>,
    #[serde(default)]
    pub reviews: Option<CatalogReviews>,
    #[serde(default)]
    pub photos: Vec<CatalogPhoto>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub context: Option<CatalogContext>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CatalogPoint {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rubric {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactGroup {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contact {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogRating {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogReviews {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub general_rating: Option<f64>,
    #[serde(default)]
    pub general_review_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPhoto {
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogContext {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contacts {
    pub phones: Vec<String>,
    pub websites: Vec<String>,
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub text: String,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub value: Option<f64>,
    pub count: u64,
    pub reviews: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub image_url: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub id: Option<String>,
    pub source: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub name: String,
    pub address: String,
    pub description: String,
    pub contacts: Contacts,
    pub schedule: Schedule,
    pub rating: Rating,
    pub photos: Vec<Photo>,
    pub main_photo: Option<Photo>,
    pub rubrics: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub coordinates: LonLat,
    pub metadata: Metadata,
}

impl PlaceDetails {
    /// Normalizes the first catalog item of a geosearch answer.
    pub fn from_geosearch(
        response: GeosearchResponse,
        query: &DetailsQuery,
    ) -> Result<Self, self::Error> {
        let item = response
            .result
            .and_then(|result| result.items.into_iter().next())
            .ok_or_else(|| self::Error::NotFound(query.title.clone()))?;
        Ok(Self::from_item(item, query, Utc::now()))
    }

    fn from_item(item: CatalogItem, query: &DetailsQuery, now: DateTime<Utc>) -> Self {
        let contacts = Contacts {
            phones: contacts_of(&item.contact_groups, "phone"),
            websites: contacts_of(&item.contact_groups, "website"),
            emails: contacts_of(&item.contact_groups, "email"),
        };

        let raw_schedule = item.schedule.unwrap_or(Value::Null);
        let schedule = Schedule {
            text: raw_schedule
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_SCHEDULE)
                .to_string(),
            raw: raw_schedule,
        };

        let reviews = item.reviews.unwrap_or_default();
        let rating = item.rating.unwrap_or_default();
        let rating = Rating {
            value: rating.value.or(reviews.general_rating),
            count: rating.count.or(reviews.general_review_count).unwrap_or(0),
            reviews: reviews.count.unwrap_or(0),
        };

        let photos: Vec<Photo> = item
            .photos
            .into_iter()
            .map(|photo| Photo {
                image_url: photo.url,
                kind: photo.kind,
                width: photo.width,
                height: photo.height,
            })
            .collect();
        let main_photo = photos
            .iter()
            .find(|photo| photo.kind.as_deref() == Some("main"))
            .or_else(|| photos.first())
            .cloned();

        let coordinates = item
            .point
            .map(|point| LonLat {
                lon: point.lon,
                lat: point.lat,
            })
            .unwrap_or(LonLat {
                lon: query.lon,
                lat: query.lat,
            });

        Self {
            name: item.name.unwrap_or_else(|| query.title.clone()),
            address: item
                .address_name
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            description: item
                .context
                .and_then(|context| context.description)
                .unwrap_or_default(),
            contacts,
            schedule,
            rating,
            photos,
            main_photo,
            rubrics: item.rubrics.into_iter().map(|rubric| rubric.name).collect(),
            attributes: item.attributes,
            coordinates,
            metadata: Metadata {
                id: item.id.or_else(|| query.id.clone()),
                source: SOURCE.to_string(),
                last_updated: now,
            },
        }
    }
}

/// Minimal body returned when the catalog has nothing for a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsFallback {
    pub error: String,
    pub fallback: FallbackPlace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackPlace {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub website: Option<String>,
}

impl DetailsFallback {
    pub fn for_query(query: &DetailsQuery) -> Self {
        Self {
            error: "Place not found".to_string(),
            fallback: FallbackPlace {
                name: query.title.clone(),
                address: "Address not found".to_string(),
                rating: None,
                website: None,
            },
        }
    }
}

/// A contact counts as `kind` if either it or its group says so.
fn contacts_of(groups: &[ContactGroup], kind: &str) -> Vec<String> {
    groups
        .iter()
        .flat_map(|group| {
            group.contacts.iter().filter(move |contact| {
                contact.kind.as_deref().or(group.kind.as_deref()) == Some(kind)
            })
        })
        .map(|contact| contact.value.clone())
        .collect()
}

#[cfg(test)]
fn query() -> DetailsQuery {
    DetailsQuery {
        title: "Riverside".into(),
        lon: 37.6,
        lat: 55.7,
        id: Some("rc-1".into()),
    }
}

#[test]
fn validate_query_test() {
    assert!(query().validate().is_ok());
    let mut missing_title = query();
    missing_title.title = "  ".into();
    assert!(missing_title.validate().is_err());
    let mut missing_lon = query();
    missing_lon.lon = 0.0;
    assert_eq!(
        missing_lon.validate(),
        Err(Error::InvalidQuery("coordinates are missing"))
    );
}

#[test]
fn empty_geosearch_is_not_found_test() {
    let response: GeosearchResponse =
        serde_json::from_str(r#"{"result": {"items": []}}"#).unwrap();
    assert_eq!(
        PlaceDetails::from_geosearch(response, &query()),
        Err(Error::NotFound("Riverside".into()))
    );
}

#[test]
fn fallback_keeps_null_rating_and_website_test() {
    let body = serde_json::to_value(DetailsFallback::for_query(&query())).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "error": "Place not found",
            "fallback": {
                "name": "Riverside",
                "address": "Address not found",
                "rating": null,
                "website": null
            }
        })
    );
}

#[test]
fn contacts_by_contact_or_group_type_test() {
    let groups: Vec<ContactGroup> = serde_json::from_str(
        r#"[
            {"contacts": [{"type": "phone", "value": "+7 495 000-00-00"}, {"type": "website", "value": "https://a.example"}]},
            {"type": "email", "contacts": [{"value": "sales@a.example"}]}
        ]"#,
    )
    .unwrap();
    assert_eq!(contacts_of(&groups, "phone"), vec!["+7 495 000-00-00"]);
    assert_eq!(contacts_of(&groups, "website"), vec!["https://a.example"]);
    assert_eq!(contacts_of(&groups, "email"), vec!["sales@a.example"]);
}
