/// Plan assembly: merges a risk outcome with the static reference data into
/// the `PreparednessPlan` returned to the caller.
///
/// Assembly is pure. Every input is already gathered, so the same inputs
/// produce the same plan apart from `generated_at`.

pub mod actions;
pub mod supplies;

use chrono::Utc;

use crate::contacts::contact_list;
use crate::disasters::find_disaster;
use crate::model::{
    DisasterCard, DisasterCategory, EmergencyContact, EnvironmentalSignals, EvacuationRoute, HouseholdProfile,
    LocationProfile, PreparednessPlan, RiskAssessment, RiskBuckets, RiskLevel, WeatherConditions,
};
use crate::risk::{ActiveDisasterPolicy, RiskOutcome};

/// Everything the assembler needs for one plan.
pub struct PlanInputs {
    pub location: LocationProfile,
    pub household: HouseholdProfile,
    pub signals: EnvironmentalSignals,
    pub weather: Option<WeatherConditions>,
    pub outcome: RiskOutcome,
    pub policy: ActiveDisasterPolicy,
    pub local_contacts: Vec<EmergencyContact>,
}

pub fn assemble(inputs: PlanInputs) -> PreparednessPlan {
    let PlanInputs {
        location,
        household,
        signals,
        weather,
        outcome,
        policy,
        local_contacts,
    } = inputs;

    let assessment = outcome.assessment;
    let active_disasters = policy.active_disasters(&assessment);

    let mut supplies = supplies::select_supplies(&household, &active_disasters, &assessment);
    let preparations = outcome.preparations;
    if let Some(prep) = &preparations {
        supplies::merge_narrative_supplies(&mut supplies, &prep.supplies);
    }

    let action_plan = actions::build_action_plan(&household, &assessment, preparations.as_ref());
    let location_notes = preparations.map(|p| p.location_specific).unwrap_or_default();

    PreparednessPlan {
        risks: risk_buckets(&assessment),
        evacuation_routes: evacuation_routes(&location, &active_disasters),
        emergency_contacts: contact_list(&local_contacts),
        location,
        household,
        signals,
        weather,
        risk_assessment: assessment,
        active_disasters,
        supplies,
        action_plan,
        location_notes,
        assessment_source: outcome.source,
        notices: outcome.notices,
        generated_at: Utc::now(),
    }
}

/// Disaster cards for every assessed category, grouped by level. Each group
/// keeps display order.
pub fn risk_buckets(assessment: &RiskAssessment) -> RiskBuckets {
    let mut buckets = RiskBuckets::default();

    for (category, entry) in assessment.iter() {
        let Some(disaster) = find_disaster(category) else {
            continue;
        };
        let card = DisasterCard {
            id: category,
            title: disaster.title,
            description: disaster.description,
            emoji: disaster.emoji,
            tip: disaster.tip,
            level: entry.level,
            explanation: entry.explanation.clone(),
            response_steps: disaster.response_steps(),
        };
        match entry.level {
            RiskLevel::High => buckets.high.push(card),
            RiskLevel::Medium => buckets.medium.push(card),
            RiskLevel::Low => buckets.low.push(card),
        }
    }

    buckets
}

/// Map search URL for `query`, spaces encoded as `+`.
fn map_search_url(query: &str) -> String {
    format!(
        "https://www.google.com/maps/search/{}",
        urlencoding::encode(query).replace("%20", "+")
    )
}

/// Placeholder routes pointing at map searches around the location. These
/// are not computed routes; the descriptions say so.
pub fn evacuation_routes(location: &LocationProfile, active: &[DisasterCategory]) -> Vec<EvacuationRoute> {
    let place = location.place_name();

    let mut routes = vec![
        EvacuationRoute {
            name: "Primary Evacuation Route".to_string(),
            description: format!(
                "Follow posted evacuation signs out of {}; confirm official routes with local emergency management.",
                place
            ),
            map_url: map_search_url(&format!("evacuation routes near {}", place)),
        },
        EvacuationRoute {
            name: "Emergency Shelters".to_string(),
            description: format!("Public shelters serving {}.", place),
            map_url: map_search_url(&format!("emergency shelters near {}", place)),
        },
    ];

    let water_hazards = [DisasterCategory::Flood, DisasterCategory::Hurricane, DisasterCategory::Tsunami];
    if water_hazards.iter().any(|c| active.contains(c)) {
        routes.push(EvacuationRoute {
            name: "High Ground".to_string(),
            description: format!("Higher elevation areas reachable from {} when water rises.", place),
            map_url: map_search_url(&format!("high ground near {}", place)),
        });
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::NATIONAL_DIRECTORY;
    use crate::model::{AssessmentSource, Coordinates, HousingType};
    use crate::risk::narrative::Preparations;
    use crate::risk::thresholds::classify;

    fn location() -> LocationProfile {
        LocationProfile {
            city: "Galveston".to_string(),
            state: "Texas".to_string(),
            zip_code: "77550".to_string(),
            formatted_address: "Galveston, TX 77550, United States".to_string(),
            coordinates: Coordinates { lat: 29.3013, lng: -94.7977 },
        }
    }

    fn household() -> HouseholdProfile {
        HouseholdProfile {
            household_size: 3,
            housing_type: HousingType::House,
            special_needs: false,
            pets: true,
            mobility_issues: false,
            budget: Default::default(),
            timeframe: Default::default(),
        }
    }

    fn coastal_signals() -> EnvironmentalSignals {
        EnvironmentalSignals {
            elevation: Some(7.0),
            distance_to_coast: Some(2.0),
            seismic_activity: Some(0.5),
            temperature: Some(88.0),
            humidity: Some(70.0),
            ..Default::default()
        }
    }

    fn inputs(outcome: RiskOutcome, policy: ActiveDisasterPolicy) -> PlanInputs {
        PlanInputs {
            location: location(),
            household: household(),
            signals: coastal_signals(),
            weather: None,
            outcome,
            policy,
            local_contacts: Vec::new(),
        }
    }

    fn threshold_outcome() -> RiskOutcome {
        RiskOutcome {
            assessment: classify(&coastal_signals()),
            source: AssessmentSource::Threshold,
            preparations: None,
            notices: Vec::new(),
        }
    }

    #[test]
    fn test_assemble_buckets_every_category() {
        let plan = assemble(inputs(threshold_outcome(), ActiveDisasterPolicy::Elevated));
        let total = plan.risks.high.len() + plan.risks.medium.len() + plan.risks.low.len();
        assert_eq!(total, DisasterCategory::ALL.len());

        let high: Vec<DisasterCategory> = plan.risks.high.iter().map(|c| c.id).collect();
        assert_eq!(high, vec![DisasterCategory::Flood, DisasterCategory::Hurricane]);
        assert!(plan.risks.high.iter().all(|c| !c.response_steps.during.is_empty()));
    }

    #[test]
    fn test_assemble_selects_supplies_from_active_disasters() {
        let plan = assemble(inputs(threshold_outcome(), ActiveDisasterPolicy::Elevated));
        let categories: Vec<&str> = plan.supplies.iter().map(|c| c.category.as_str()).collect();
        assert!(categories.contains(&"Pet Supplies"));
        assert!(categories.contains(&"Storm Protection"), "hurricane is active");
        assert!(!categories.contains(&"Winter Weather"));
    }

    #[test]
    fn test_policy_changes_active_disasters() {
        let elevated = assemble(inputs(threshold_outcome(), ActiveDisasterPolicy::Elevated));
        let all = assemble(inputs(threshold_outcome(), ActiveDisasterPolicy::AllCategories));
        assert!(elevated.active_disasters.len() < all.active_disasters.len());
        assert_eq!(all.active_disasters, DisasterCategory::ALL.to_vec());
        let all_categories: Vec<&str> = all.supplies.iter().map(|c| c.category.as_str()).collect();
        assert!(all_categories.contains(&"Winter Weather"), "every category is active under `all`");
    }

    #[test]
    fn test_narrative_preparations_flow_into_plan() {
        let mut outcome = threshold_outcome();
        outcome.source = AssessmentSource::Narrative;
        outcome.preparations = Some(Preparations {
            immediate: vec!["Move the car to the parking garage".to_string()],
            location_specific: vec!["Seawall overtopping floods Broadway first".to_string()],
            ..Default::default()
        });

        let plan = assemble(inputs(outcome, ActiveDisasterPolicy::Elevated));
        assert_eq!(plan.assessment_source, AssessmentSource::Narrative);
        assert_eq!(plan.location_notes, vec!["Seawall overtopping floods Broadway first"]);
        assert!(plan.action_plan[0].steps.iter().any(|s| s.contains("parking garage")));
    }

    #[test]
    fn test_contacts_and_routes() {
        let plan = assemble(inputs(threshold_outcome(), ActiveDisasterPolicy::Elevated));
        assert_eq!(plan.emergency_contacts.len(), NATIONAL_DIRECTORY.len());
        assert_eq!(plan.evacuation_routes.len(), 3, "flood risk adds a high-ground route");
        assert_eq!(
            plan.evacuation_routes[0].map_url,
            "https://www.google.com/maps/search/evacuation+routes+near+Galveston%2C+Texas"
        );
    }

    #[test]
    fn test_plan_serializes_with_camel_case_keys() {
        let plan = assemble(inputs(threshold_outcome(), ActiveDisasterPolicy::Elevated));
        let json = serde_json::to_value(&plan).expect("plan should serialize");
        assert_eq!(json["assessmentSource"], "threshold");
        assert_eq!(json["riskAssessment"]["flood"]["level"], "high");
        assert_eq!(json["actionPlan"][1]["phase"], "short-term");
        assert!(json["supplies"][0]["items"][0]["purchaseLinks"]["amazon"].is_string());
        assert_eq!(json["location"]["zipCode"], "77550");
    }
}
