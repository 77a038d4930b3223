/// Core data types for the preparedness planning service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O, only types and the small conversions between them.
/// Reference text for each disaster (titles, tips, response steps) lives in
/// `disasters`, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// WGS84 coordinates of a resolved location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Normalized geographic identity produced by the geocoder.
///
/// Built once per request and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProfile {
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub formatted_address: String,
    pub coordinates: Coordinates,
}

impl LocationProfile {
    /// "City, State" when both are known, otherwise the formatted address.
    pub fn place_name(&self) -> String {
        match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.state),
            (false, true) => self.city.clone(),
            (true, false) => self.state.clone(),
            (true, true) => self.formatted_address.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Environmental signals
// ---------------------------------------------------------------------------

/// Raw measurements about a location, used as classifier input.
///
/// Every field is optional. A source that fails or times out leaves its
/// field as `None`, and every classifier rule that needs an absent field
/// resolves to `Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalSignals {
    pub seismic_activity: Option<f64>,
    pub elevation: Option<f64>,         // ft
    pub annual_rainfall: Option<f64>,   // in
    pub annual_snowfall: Option<f64>,   // in
    pub distance_to_coast: Option<f64>, // mi
    pub tornado_frequency: Option<f64>, // events per year
    pub temperature: Option<f64>,       // °F
    pub humidity: Option<f64>,          // %
}

/// Current conditions at the resolved coordinates (imperial units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub conditions: String,
    pub precipitation: f64,
}

// ---------------------------------------------------------------------------
// Disaster categories and risk levels
// ---------------------------------------------------------------------------

/// The fixed set of disaster types this service plans for.
///
/// Declaration order is the canonical display order; `Ord` follows it, so
/// any `BTreeMap` keyed by category iterates in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisasterCategory {
    Earthquake,
    Wildfire,
    Flood,
    Winter,
    Landslide,
    Tornado,
    Hurricane,
    Drought,
    Heatwave,
    Tsunami,
}

impl DisasterCategory {
    pub const ALL: [DisasterCategory; 10] = [
        DisasterCategory::Earthquake,
        DisasterCategory::Wildfire,
        DisasterCategory::Flood,
        DisasterCategory::Winter,
        DisasterCategory::Landslide,
        DisasterCategory::Tornado,
        DisasterCategory::Hurricane,
        DisasterCategory::Drought,
        DisasterCategory::Heatwave,
        DisasterCategory::Tsunami,
    ];

    /// Wire identifier, e.g. `"heatwave"`.
    pub fn id(&self) -> &'static str {
        match self {
            DisasterCategory::Earthquake => "earthquake",
            DisasterCategory::Wildfire => "wildfire",
            DisasterCategory::Flood => "flood",
            DisasterCategory::Winter => "winter",
            DisasterCategory::Landslide => "landslide",
            DisasterCategory::Tornado => "tornado",
            DisasterCategory::Hurricane => "hurricane",
            DisasterCategory::Drought => "drought",
            DisasterCategory::Heatwave => "heatwave",
            DisasterCategory::Tsunami => "tsunami",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Maps a free-text disaster label ("Winter Storms", "Heat Wave Risk",
    /// "**Flooding**") onto a category. Returns `None` for labels that do
    /// not name one of the ten categories.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        let normalized = normalized.strip_suffix("risk").unwrap_or(&normalized);

        let category = match normalized {
            "earthquake" | "earthquakes" | "seismic" | "seismicactivity" => {
                DisasterCategory::Earthquake
            }
            "wildfire" | "wildfires" | "fire" | "fires" | "forestfire" | "bushfire" => {
                DisasterCategory::Wildfire
            }
            "flood" | "floods" | "flooding" | "flashflood" | "flashflooding" => {
                DisasterCategory::Flood
            }
            "winter" | "winterstorm" | "winterstorms" | "winterweather" | "blizzard"
            | "blizzards" | "snowstorm" | "snowstorms" | "icestorm" | "icestorms" => {
                DisasterCategory::Winter
            }
            "landslide" | "landslides" | "mudslide" | "mudslides" => DisasterCategory::Landslide,
            "tornado" | "tornadoes" | "tornados" => DisasterCategory::Tornado,
            "hurricane" | "hurricanes" | "tropicalstorm" | "tropicalstorms" | "cyclone"
            | "typhoon" => DisasterCategory::Hurricane,
            "drought" | "droughts" => DisasterCategory::Drought,
            "heatwave" | "heatwaves" | "extremeheat" | "heat" => DisasterCategory::Heatwave,
            "tsunami" | "tsunamis" => DisasterCategory::Tsunami,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for DisasterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Risk level for one disaster category, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Parses `high`/`medium`/`low` (any case). `moderate` is accepted as
    /// a synonym for `medium`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "high" => Some(RiskLevel::High),
            "medium" | "moderate" => Some(RiskLevel::Medium),
            "low" => Some(RiskLevel::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Level and reasoning for a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub level: RiskLevel,
    pub explanation: String,
}

/// Per-category risk levels for one location.
///
/// Holds at most one entry per category. Iteration follows the
/// `DisasterCategory` declaration order regardless of insertion order.
/// An empty assessment means "unknown", not "no risk".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RiskAssessment {
    entries: BTreeMap<DisasterCategory, RiskEntry>,
}

impl RiskAssessment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a level for `category`. The first entry for a category wins;
    /// returns `false` if the category was already present.
    pub fn insert(&mut self, category: DisasterCategory, level: RiskLevel, explanation: impl Into<String>) -> bool {
        if self.entries.contains_key(&category) {
            return false;
        }
        self.entries.insert(
            category,
            RiskEntry {
                level,
                explanation: explanation.into(),
            },
        );
        true
    }

    pub fn get(&self, category: DisasterCategory) -> Option<&RiskEntry> {
        self.entries.get(&category)
    }

    pub fn level(&self, category: DisasterCategory) -> Option<RiskLevel> {
        self.entries.get(&category).map(|e| e.level)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DisasterCategory, &RiskEntry)> {
        self.entries.iter().map(|(c, e)| (*c, e))
    }

    /// Categories at exactly `level`, in display order.
    pub fn at_level(&self, level: RiskLevel) -> Vec<DisasterCategory> {
        self.iter()
            .filter(|(_, e)| e.level == level)
            .map(|(c, _)| c)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Household survey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HousingType {
    #[default]
    House,
    Apartment,
    Mobile,
    Condo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Basic,
    #[default]
    Moderate,
    Comprehensive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Immediate,
    #[default]
    Weeks,
    Months,
}

/// Household attributes that shape the supply list and action plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdProfile {
    pub household_size: u32,
    pub housing_type: HousingType,
    #[serde(default)]
    pub special_needs: bool,
    #[serde(default)]
    pub pets: bool,
    #[serde(default)]
    pub mobility_issues: bool,
    #[serde(default)]
    pub budget: Budget,
    #[serde(default)]
    pub timeframe: Timeframe,
}

/// Largest household a single plan is sized for.
pub const MAX_HOUSEHOLD_SIZE: u32 = 100;

/// Inbound survey payload for `POST /api/analyze`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRequest {
    pub location: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(flatten)]
    pub household: HouseholdProfile,
}

impl SurveyRequest {
    /// Rejects payloads that deserialized but cannot produce a plan.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.location.trim().is_empty() {
            return Err(PlanError::InvalidRequest("location must not be empty".to_string()));
        }
        if self.household.household_size == 0 {
            return Err(PlanError::InvalidRequest(
                "householdSize must be at least 1".to_string(),
            ));
        }
        if self.household.household_size > MAX_HOUSEHOLD_SIZE {
            return Err(PlanError::InvalidRequest(format!(
                "householdSize must be at most {}",
                MAX_HOUSEHOLD_SIZE
            )));
        }
        Ok(())
    }

    /// Text handed to the geocoder: the street address when one was given,
    /// otherwise the location field.
    pub fn geocoding_query(&self) -> &str {
        match self.address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => address,
            _ => self.location.trim(),
        }
    }
}

// ---------------------------------------------------------------------------
// Plan output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl From<RiskLevel> for Priority {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Priority::Low,
            RiskLevel::Medium => Priority::Medium,
            RiskLevel::High => Priority::High,
        }
    }
}

/// A purchasable supply with vendor search links keyed by vendor id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyItem {
    pub name: String,
    pub purchase_links: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyCategory {
    pub category: String,
    pub items: Vec<SupplyItem>,
    pub priority: Priority,
    pub estimated_cost: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Immediate,
    ShortTerm,
    LongTerm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    pub phase: Phase,
    pub title: String,
    pub steps: Vec<String>,
    pub timeline: String,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvacuationRoute {
    pub name: String,
    pub description: String,
    pub map_url: String,
}

/// Universal response steps for one disaster type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSteps {
    pub before: &'static [&'static str],
    pub during: &'static [&'static str],
    pub after: &'static [&'static str],
}

/// Static disaster metadata merged with the computed level for a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisasterCard {
    pub id: DisasterCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub tip: &'static str,
    pub level: RiskLevel,
    pub explanation: String,
    pub response_steps: ResponseSteps,
}

/// Disaster cards grouped by level, each group in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskBuckets {
    pub high: Vec<DisasterCard>,
    pub medium: Vec<DisasterCard>,
    pub low: Vec<DisasterCard>,
}

/// Which strategy produced the risk assessment in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentSource {
    /// Deterministic threshold classifier.
    Threshold,
    /// Parsed from generative-model output.
    Narrative,
    /// The narrative source produced nothing usable and the threshold
    /// classifier filled in. The presentation layer should say so.
    Fallback,
}

/// The single artifact returned to the caller. Not persisted server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparednessPlan {
    pub location: LocationProfile,
    pub household: HouseholdProfile,
    pub signals: EnvironmentalSignals,
    pub weather: Option<WeatherConditions>,
    pub risk_assessment: RiskAssessment,
    pub active_disasters: Vec<DisasterCategory>,
    pub risks: RiskBuckets,
    pub supplies: Vec<SupplyCategory>,
    pub action_plan: Vec<ActionPlan>,
    pub evacuation_routes: Vec<EvacuationRoute>,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub location_notes: Vec<String>,
    pub assessment_source: AssessmentSource,
    pub notices: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that end a plan request. Upstream failures never show up here;
/// they are absorbed as absent signals or fallbacks.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    /// The payload deserialized but is unusable (empty location, zero household).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// The geocoder had no match for the location text.
    #[error("Invalid location: {0}")]
    LocationNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ids_round_trip_through_from_id() {
        for category in DisasterCategory::ALL {
            assert_eq!(DisasterCategory::from_id(category.id()), Some(category));
        }
        assert_eq!(DisasterCategory::from_id("volcano"), None);
    }

    #[test]
    fn test_from_label_accepts_common_phrasings() {
        assert_eq!(DisasterCategory::from_label("Winter Storms"), Some(DisasterCategory::Winter));
        assert_eq!(DisasterCategory::from_label("Heat Wave"), Some(DisasterCategory::Heatwave));
        assert_eq!(DisasterCategory::from_label("**Flooding**"), Some(DisasterCategory::Flood));
        assert_eq!(DisasterCategory::from_label("Earthquake Risk"), Some(DisasterCategory::Earthquake));
        assert_eq!(DisasterCategory::from_label("  TSUNAMI "), Some(DisasterCategory::Tsunami));
        assert_eq!(DisasterCategory::from_label("Volcano"), None);
        assert_eq!(DisasterCategory::from_label(""), None);
    }

    #[test]
    fn test_risk_level_tokens_and_ordering() {
        assert_eq!(RiskLevel::from_token("HIGH"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_token("moderate"), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::from_token("severe"), None);
        assert!(RiskLevel::High > RiskLevel::Medium && RiskLevel::Medium > RiskLevel::Low);
    }

    #[test]
    fn test_assessment_keeps_first_entry_and_display_order() {
        let mut assessment = RiskAssessment::new();
        assert!(assessment.insert(DisasterCategory::Tsunami, RiskLevel::Low, "far from coast"));
        assert!(assessment.insert(DisasterCategory::Earthquake, RiskLevel::High, "fault line"));
        assert!(!assessment.insert(DisasterCategory::Earthquake, RiskLevel::Low, "duplicate"));

        assert_eq!(assessment.len(), 2);
        assert_eq!(assessment.level(DisasterCategory::Earthquake), Some(RiskLevel::High));

        let order: Vec<_> = assessment.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![DisasterCategory::Earthquake, DisasterCategory::Tsunami]);
    }

    #[test]
    fn test_assessment_serializes_as_category_keyed_object() {
        let mut assessment = RiskAssessment::new();
        assessment.insert(DisasterCategory::Flood, RiskLevel::Medium, "low elevation");
        let json = serde_json::to_value(&assessment).expect("assessment should serialize");
        assert_eq!(json["flood"]["level"], "medium");
        assert_eq!(json["flood"]["explanation"], "low elevation");
    }

    #[test]
    fn test_survey_request_defaults_optional_fields() {
        let json = r#"{ "location": "Tulsa, OK", "householdSize": 3, "housingType": "mobile" }"#;
        let request: SurveyRequest = serde_json::from_str(json).expect("minimal survey should parse");
        assert_eq!(request.household.housing_type, HousingType::Mobile);
        assert!(!request.household.pets);
        assert_eq!(request.household.budget, Budget::Moderate);
        assert_eq!(request.household.timeframe, Timeframe::Weeks);
        assert!(request.validate().is_ok());
        assert_eq!(request.geocoding_query(), "Tulsa, OK");
    }

    #[test]
    fn test_survey_request_prefers_address_for_geocoding() {
        let json = r#"{ "location": "Miami", "address": " 100 Biscayne Blvd ",
                        "householdSize": 2, "housingType": "condo" }"#;
        let request: SurveyRequest = serde_json::from_str(json).expect("survey should parse");
        assert_eq!(request.geocoding_query(), "100 Biscayne Blvd");
    }

    #[test]
    fn test_survey_request_validation_rejects_empty_location_and_zero_household() {
        let json = r#"{ "location": "  ", "householdSize": 2, "housingType": "house" }"#;
        let request: SurveyRequest = serde_json::from_str(json).expect("survey should parse");
        assert!(matches!(request.validate(), Err(PlanError::InvalidRequest(_))));

        let json = r#"{ "location": "Boise", "householdSize": 0, "housingType": "house" }"#;
        let request: SurveyRequest = serde_json::from_str(json).expect("survey should parse");
        assert!(matches!(request.validate(), Err(PlanError::InvalidRequest(_))));
    }

    #[test]
    fn test_survey_request_validation_caps_household_size() {
        let json = r#"{ "location": "Boise", "householdSize": 100, "housingType": "house" }"#;
        let request: SurveyRequest = serde_json::from_str(json).expect("survey should parse");
        assert!(request.validate().is_ok(), "the cap itself is accepted");

        let json = r#"{ "location": "Boise", "householdSize": 100000000, "housingType": "house" }"#;
        let request: SurveyRequest = serde_json::from_str(json).expect("survey should parse");
        assert!(matches!(request.validate(), Err(PlanError::InvalidRequest(_))));
    }

    #[test]
    fn test_place_name_falls_back_to_formatted_address() {
        let mut location = LocationProfile {
            city: "Peoria".to_string(),
            state: "Illinois".to_string(),
            zip_code: "61602".to_string(),
            formatted_address: "Peoria, IL 61602, United States".to_string(),
            coordinates: Coordinates { lat: 40.69, lng: -89.59 },
        };
        assert_eq!(location.place_name(), "Peoria, Illinois");
        location.city.clear();
        location.state.clear();
        assert_eq!(location.place_name(), "Peoria, IL 61602, United States");
    }
}
