/// Prompt text for the generative risk source.

use std::fmt::Write;

use crate::model::{DisasterCategory, HousingType};
use crate::risk::AssessmentContext;

pub const SYSTEM_PROMPT: &str = "You are an emergency preparedness expert who provides detailed, \
location-specific disaster preparedness plans.";

/// Location and household facts shared by both prompts.
fn describe_context(ctx: &AssessmentContext<'_>) -> String {
    let mut out = String::new();
    let household = ctx.household;
    let location = ctx.location;

    let _ = writeln!(out, "Location: {}", location.formatted_address);
    let _ = writeln!(
        out,
        "Coordinates: {:.4}, {:.4}",
        location.coordinates.lat, location.coordinates.lng
    );
    let housing = match household.housing_type {
        HousingType::House => "house",
        HousingType::Apartment => "apartment",
        HousingType::Mobile => "mobile home",
        HousingType::Condo => "condo",
    };
    let _ = writeln!(out, "Household: {} people living in a {}", household.household_size, housing);
    if household.special_needs {
        let _ = writeln!(out, "- Household includes members with special needs");
    }
    if household.mobility_issues {
        let _ = writeln!(out, "- Household includes members with limited mobility");
    }
    if household.pets {
        let _ = writeln!(out, "- Household has pets");
    }

    if let Some(weather) = ctx.weather {
        let _ = writeln!(
            out,
            "Current weather: {}, {:.0}°F, {:.0}% humidity, wind {:.0} mph",
            weather.conditions, weather.temperature, weather.humidity, weather.wind_speed
        );
    }

    let signals = ctx.signals;
    let known = [
        ("Seismic activity", signals.seismic_activity, ""),
        ("Elevation", signals.elevation, " ft"),
        ("Annual rainfall", signals.annual_rainfall, " in"),
        ("Annual snowfall", signals.annual_snowfall, " in"),
        ("Distance to coast", signals.distance_to_coast, " mi"),
        ("Tornadoes per year", signals.tornado_frequency, ""),
    ];
    for (label, value, unit) in known {
        if let Some(value) = value {
            let _ = writeln!(out, "{}: {}{}", label, value, unit);
        }
    }

    out
}

/// Asks for a JSON risk object covering every category.
pub fn risk_prompt(ctx: &AssessmentContext<'_>) -> String {
    let ids: Vec<&str> = DisasterCategory::ALL.iter().map(|c| c.id()).collect();
    format!(
        "{}\n\
         Assess the risk of each of these disaster types for this location: {}.\n\
         Respond with a JSON object of the form \
         {{\"risks\": [{{\"disaster\": \"<type>\", \"level\": \"high|medium|low\", \
         \"explanation\": \"<one or two sentences>\"}}]}} \
         with exactly one entry per disaster type.",
        describe_context(ctx),
        ids.join(", ")
    )
}

/// Asks for numbered free-text preparations in the five sections the
/// extractor understands.
pub fn preparations_prompt(ctx: &AssessmentContext<'_>) -> String {
    format!(
        "{}\n\
         Create a preparedness plan for this household with these numbered sections:\n\
         1. Immediate Actions:\n\
         2. Short-term Preparations:\n\
         3. Long-term Planning:\n\
         4. Emergency Supplies: (group items under \"Category: <name>\" lines and mark \
         each item essential, recommended or optional)\n\
         5. Location-Specific Considerations:\n\
         Use one bulleted line per item.",
        describe_context(ctx)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Coordinates, EnvironmentalSignals, HouseholdProfile, LocationProfile, WeatherConditions,
    };

    #[test]
    fn test_prompts_include_location_household_and_known_signals() {
        let location = LocationProfile {
            city: "Eureka".to_string(),
            state: "California".to_string(),
            zip_code: "95501".to_string(),
            formatted_address: "Eureka, CA 95501, United States".to_string(),
            coordinates: Coordinates { lat: 40.8021, lng: -124.1637 },
        };
        let household = HouseholdProfile {
            household_size: 3,
            housing_type: HousingType::Mobile,
            special_needs: false,
            pets: true,
            mobility_issues: false,
            budget: Default::default(),
            timeframe: Default::default(),
        };
        let signals = EnvironmentalSignals {
            elevation: Some(44.0),
            ..Default::default()
        };
        let weather = WeatherConditions {
            temperature: 58.0,
            humidity: 80.0,
            wind_speed: 9.0,
            conditions: "Fog".to_string(),
            precipitation: 0.0,
        };
        let ctx = AssessmentContext {
            location: &location,
            household: &household,
            signals: &signals,
            weather: Some(&weather),
        };

        let risk = risk_prompt(&ctx);
        assert!(risk.contains("Eureka, CA 95501"));
        assert!(risk.contains("mobile home"));
        assert!(risk.contains("Household has pets"));
        assert!(risk.contains("Elevation: 44 ft"));
        assert!(!risk.contains("Seismic activity"), "absent signals are omitted");
        assert!(risk.contains("tsunami"), "every category is requested");

        let prep = preparations_prompt(&ctx);
        assert!(prep.contains("1. Immediate Actions:"));
        assert!(prep.contains("Category: <name>"));
        assert!(prep.contains("Fog"));
    }
}
