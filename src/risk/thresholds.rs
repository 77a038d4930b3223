//! Threshold-based risk classification.
//!
//! Maps environmental signals to a level for each of the ten disaster
//! categories using fixed two-tier thresholds. Every rule is independent,
//! comparisons are strict, and a rule whose inputs are missing resolves to
//! `Low` with an explanation saying so. The function is pure: identical
//! signals always produce an identical assessment.

use crate::model::{DisasterCategory, EnvironmentalSignals, RiskAssessment, RiskLevel};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

const SEISMIC_HIGH: f64 = 3.0;
const SEISMIC_MEDIUM: f64 = 2.0;

const WILDFIRE_HIGH_TEMP_F: f64 = 85.0;
const WILDFIRE_HIGH_HUMIDITY: f64 = 30.0;
const WILDFIRE_MEDIUM_TEMP_F: f64 = 75.0;
const WILDFIRE_MEDIUM_HUMIDITY: f64 = 40.0;

const FLOOD_HIGH_ELEVATION_FT: f64 = 30.0;
const FLOOD_MEDIUM_ELEVATION_FT: f64 = 50.0;

const WINTER_HIGH_TEMP_F: f64 = 20.0;
const WINTER_MEDIUM_TEMP_F: f64 = 32.0;

const HURRICANE_HIGH_COAST_MI: f64 = 50.0;
const HURRICANE_MEDIUM_COAST_MI: f64 = 100.0;

const TORNADO_HIGH_PER_YEAR: f64 = 3.0;
const TORNADO_MEDIUM_PER_YEAR: f64 = 1.0;

const DROUGHT_HIGH_RAINFALL_IN: f64 = 15.0;
const DROUGHT_MEDIUM_RAINFALL_IN: f64 = 25.0;

const HEAT_HIGH_TEMP_F: f64 = 95.0;
const HEAT_MEDIUM_TEMP_F: f64 = 85.0;

const TSUNAMI_HIGH_COAST_MI: f64 = 30.0;
const TSUNAMI_HIGH_SEISMIC: f64 = 2.0;
const TSUNAMI_MEDIUM_COAST_MI: f64 = 50.0;
const TSUNAMI_MEDIUM_SEISMIC: f64 = 1.0;

const LANDSLIDE_HIGH_ELEVATION_FT: f64 = 1000.0;
const LANDSLIDE_HIGH_RAINFALL_IN: f64 = 40.0;
const LANDSLIDE_MEDIUM_ELEVATION_FT: f64 = 500.0;
const LANDSLIDE_MEDIUM_RAINFALL_IN: f64 = 30.0;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies every category in `DisasterCategory::ALL`.
pub fn classify(signals: &EnvironmentalSignals) -> RiskAssessment {
    let mut assessment = RiskAssessment::new();
    for category in DisasterCategory::ALL {
        let (level, explanation) = evaluate(category, signals);
        assessment.insert(category, level, explanation);
    }
    assessment
}

/// Applies the rule for a single category.
pub fn evaluate(category: DisasterCategory, signals: &EnvironmentalSignals) -> (RiskLevel, String) {
    match category {
        DisasterCategory::Earthquake => earthquake(signals),
        DisasterCategory::Wildfire => wildfire(signals),
        DisasterCategory::Flood => flood(signals),
        DisasterCategory::Winter => winter(signals),
        DisasterCategory::Landslide => landslide(signals),
        DisasterCategory::Tornado => tornado(signals),
        DisasterCategory::Hurricane => hurricane(signals),
        DisasterCategory::Drought => drought(signals),
        DisasterCategory::Heatwave => heatwave(signals),
        DisasterCategory::Tsunami => tsunami(signals),
    }
}

fn unavailable(what: &str) -> (RiskLevel, String) {
    (RiskLevel::Low, format!("No {} data available; treated as low risk.", what))
}

fn earthquake(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let Some(seismic) = s.seismic_activity else {
        return unavailable("seismic activity");
    };

    if seismic > SEISMIC_HIGH {
        (RiskLevel::High, format!("Seismic activity of {:.1} is above {:.0}.", seismic, SEISMIC_HIGH))
    } else if seismic > SEISMIC_MEDIUM {
        (RiskLevel::Medium, format!("Seismic activity of {:.1} is above {:.0}.", seismic, SEISMIC_MEDIUM))
    } else {
        (RiskLevel::Low, format!("Seismic activity of {:.1} is minimal.", seismic))
    }
}

fn wildfire(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let (Some(temp), Some(humidity)) = (s.temperature, s.humidity) else {
        return unavailable("temperature and humidity");
    };

    let observed = format!("{:.0}°F with {:.0}% humidity", temp, humidity);
    if temp > WILDFIRE_HIGH_TEMP_F && humidity < WILDFIRE_HIGH_HUMIDITY {
        (RiskLevel::High, format!("Hot, dry conditions ({}) favor rapid fire spread.", observed))
    } else if temp > WILDFIRE_MEDIUM_TEMP_F && humidity < WILDFIRE_MEDIUM_HUMIDITY {
        (RiskLevel::Medium, format!("Warm, dry conditions ({}) raise fire danger.", observed))
    } else {
        (RiskLevel::Low, format!("Current conditions ({}) do not favor wildfire.", observed))
    }
}

fn flood(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let Some(elevation) = s.elevation else {
        return unavailable("elevation");
    };

    if elevation < FLOOD_HIGH_ELEVATION_FT {
        (RiskLevel::High, format!("Elevation of {:.0} ft is below {:.0} ft.", elevation, FLOOD_HIGH_ELEVATION_FT))
    } else if elevation < FLOOD_MEDIUM_ELEVATION_FT {
        (RiskLevel::Medium, format!("Elevation of {:.0} ft is below {:.0} ft.", elevation, FLOOD_MEDIUM_ELEVATION_FT))
    } else {
        (RiskLevel::Low, format!("Elevation of {:.0} ft is well above flood-prone ground.", elevation))
    }
}

fn winter(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let Some(temp) = s.temperature else {
        return unavailable("temperature");
    };

    if temp < WINTER_HIGH_TEMP_F {
        (RiskLevel::High, format!("Temperature of {:.0}°F is below {:.0}°F.", temp, WINTER_HIGH_TEMP_F))
    } else if temp < WINTER_MEDIUM_TEMP_F {
        (RiskLevel::Medium, format!("Temperature of {:.0}°F is below freezing.", temp))
    } else {
        (RiskLevel::Low, format!("Temperature of {:.0}°F is above freezing.", temp))
    }
}

fn hurricane(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let Some(distance) = s.distance_to_coast else {
        return unavailable("coastal distance");
    };

    if distance < HURRICANE_HIGH_COAST_MI {
        (RiskLevel::High, format!("{:.0} miles from the coast, within {:.0} miles.", distance, HURRICANE_HIGH_COAST_MI))
    } else if distance < HURRICANE_MEDIUM_COAST_MI {
        (RiskLevel::Medium, format!("{:.0} miles from the coast, within {:.0} miles.", distance, HURRICANE_MEDIUM_COAST_MI))
    } else {
        (RiskLevel::Low, format!("{:.0} miles inland.", distance))
    }
}

fn tornado(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let Some(frequency) = s.tornado_frequency else {
        return unavailable("tornado frequency");
    };

    if frequency > TORNADO_HIGH_PER_YEAR {
        (RiskLevel::High, format!("About {:.1} tornadoes per year, above {:.0}.", frequency, TORNADO_HIGH_PER_YEAR))
    } else if frequency > TORNADO_MEDIUM_PER_YEAR {
        (RiskLevel::Medium, format!("About {:.1} tornadoes per year, above {:.0}.", frequency, TORNADO_MEDIUM_PER_YEAR))
    } else {
        (RiskLevel::Low, format!("About {:.1} tornadoes per year.", frequency))
    }
}

fn drought(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let Some(rainfall) = s.annual_rainfall else {
        return unavailable("annual rainfall");
    };

    if rainfall < DROUGHT_HIGH_RAINFALL_IN {
        (RiskLevel::High, format!("Annual rainfall of {:.1} in is below {:.0} in.", rainfall, DROUGHT_HIGH_RAINFALL_IN))
    } else if rainfall < DROUGHT_MEDIUM_RAINFALL_IN {
        (RiskLevel::Medium, format!("Annual rainfall of {:.1} in is below {:.0} in.", rainfall, DROUGHT_MEDIUM_RAINFALL_IN))
    } else {
        (RiskLevel::Low, format!("Annual rainfall of {:.1} in is adequate.", rainfall))
    }
}

fn heatwave(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let Some(temp) = s.temperature else {
        return unavailable("temperature");
    };

    if temp > HEAT_HIGH_TEMP_F {
        (RiskLevel::High, format!("Temperature of {:.0}°F is above {:.0}°F.", temp, HEAT_HIGH_TEMP_F))
    } else if temp > HEAT_MEDIUM_TEMP_F {
        (RiskLevel::Medium, format!("Temperature of {:.0}°F is above {:.0}°F.", temp, HEAT_MEDIUM_TEMP_F))
    } else {
        (RiskLevel::Low, format!("Temperature of {:.0}°F is not extreme.", temp))
    }
}

fn tsunami(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let (Some(distance), Some(seismic)) = (s.distance_to_coast, s.seismic_activity) else {
        return unavailable("coastal distance and seismic activity");
    };

    let observed = format!("{:.0} miles from the coast with seismic activity of {:.1}", distance, seismic);
    if distance < TSUNAMI_HIGH_COAST_MI && seismic > TSUNAMI_HIGH_SEISMIC {
        (RiskLevel::High, format!("Close to an active coastline ({}).", observed))
    } else if distance < TSUNAMI_MEDIUM_COAST_MI && seismic > TSUNAMI_MEDIUM_SEISMIC {
        (RiskLevel::Medium, format!("Near a seismically active coastline ({}).", observed))
    } else {
        (RiskLevel::Low, format!("Coastal and seismic exposure is limited ({}).", observed))
    }
}

fn landslide(s: &EnvironmentalSignals) -> (RiskLevel, String) {
    let (Some(elevation), Some(rainfall)) = (s.elevation, s.annual_rainfall) else {
        return unavailable("elevation and rainfall");
    };

    let observed = format!("{:.0} ft elevation with {:.1} in of annual rainfall", elevation, rainfall);
    if elevation > LANDSLIDE_HIGH_ELEVATION_FT && rainfall > LANDSLIDE_HIGH_RAINFALL_IN {
        (RiskLevel::High, format!("High, wet terrain ({}).", observed))
    } else if elevation > LANDSLIDE_MEDIUM_ELEVATION_FT && rainfall > LANDSLIDE_MEDIUM_RAINFALL_IN {
        (RiskLevel::Medium, format!("Elevated, wet terrain ({}).", observed))
    } else {
        (RiskLevel::Low, format!("Terrain is not landslide-prone ({}).", observed))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
