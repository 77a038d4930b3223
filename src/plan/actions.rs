/// Three-phase action plan.
///
/// Starts from a fixed template per phase, then adds steps driven by the
/// assessment (high risks → immediate, medium → short-term), by the
/// household, and by narrative preparations. Steps never repeat within a
/// phase.

use crate::disasters::find_disaster;
use crate::model::{ActionPlan, HouseholdProfile, HousingType, Phase, RiskAssessment, RiskLevel, Timeframe};
use crate::risk::narrative::Preparations;

struct PhaseTemplate {
    phase: Phase,
    title: &'static str,
    steps: &'static [&'static str],
    resources: &'static [&'static str],
}

static PHASE_TEMPLATES: [PhaseTemplate; 3] = [
    PhaseTemplate {
        phase: Phase::Immediate,
        title: "Immediate Actions",
        steps: &[
            "Sign up for local emergency alerts",
            "Identify safe spots in your home for each hazard",
            "Store at least 3 days of water and non-perishable food",
            "Make sure everyone knows how to call 911",
        ],
        resources: &["https://www.ready.gov/alerts", "https://www.weather.gov"],
    },
    PhaseTemplate {
        phase: Phase::ShortTerm,
        title: "Short-term Preparations",
        steps: &[
            "Create a family communication plan with an out-of-area contact",
            "Assemble go-bags for every household member",
            "Learn how to shut off gas, water and electricity",
            "Photograph valuables and store copies of important documents",
        ],
        resources: &["https://www.ready.gov/plan", "https://www.redcross.org/get-help/how-to-prepare-for-emergencies"],
    },
    PhaseTemplate {
        phase: Phase::LongTerm,
        title: "Long-term Planning",
        steps: &[
            "Review insurance coverage for the hazards you face",
            "Take first aid and CPR training",
            "Practice evacuation routes twice a year",
            "Get involved with a Community Emergency Response Team",
        ],
        resources: &["https://www.fema.gov/flood-insurance", "https://www.ready.gov/cert"],
    },
];

fn timeline(phase: Phase, timeframe: Timeframe) -> &'static str {
    match (timeframe, phase) {
        (Timeframe::Immediate, Phase::Immediate) => "Next 24 hours",
        (Timeframe::Immediate, Phase::ShortTerm) => "Next 3 days",
        (Timeframe::Immediate, Phase::LongTerm) => "Next 2 weeks",
        (Timeframe::Weeks, Phase::Immediate) => "This week",
        (Timeframe::Weeks, Phase::ShortTerm) => "Next 2-4 weeks",
        (Timeframe::Weeks, Phase::LongTerm) => "Next 3 months",
        (Timeframe::Months, Phase::Immediate) => "This month",
        (Timeframe::Months, Phase::ShortTerm) => "Next 2-3 months",
        (Timeframe::Months, Phase::LongTerm) => "Next 6-12 months",
    }
}

fn push_unique(steps: &mut Vec<String>, step: &str) {
    let step = step.trim();
    if !step.is_empty() && !steps.iter().any(|s| s.eq_ignore_ascii_case(step)) {
        steps.push(step.to_string());
    }
}

/// One step per category at `level`, built from its preparedness tip.
fn hazard_steps(assessment: &RiskAssessment, level: RiskLevel) -> Vec<String> {
    assessment
        .at_level(level)
        .into_iter()
        .filter_map(find_disaster)
        .map(|disaster| format!("{} {}: {}", disaster.emoji, disaster.title, disaster.tip))
        .collect()
}

fn from_template(template: &PhaseTemplate, timeframe: Timeframe) -> ActionPlan {
    ActionPlan {
        phase: template.phase,
        title: template.title.to_string(),
        steps: template.steps.iter().map(|s| s.to_string()).collect(),
        timeline: timeline(template.phase, timeframe).to_string(),
        resources: template.resources.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn build_action_plan(
    household: &HouseholdProfile,
    assessment: &RiskAssessment,
    preparations: Option<&Preparations>,
) -> Vec<ActionPlan> {
    let [immediate, short_term, long_term] = &PHASE_TEMPLATES;
    let mut immediate = from_template(immediate, household.timeframe);
    let mut short_term = from_template(short_term, household.timeframe);
    let mut long_term = from_template(long_term, household.timeframe);

    for step in hazard_steps(assessment, RiskLevel::High) {
        push_unique(&mut immediate.steps, &step);
    }
    for step in hazard_steps(assessment, RiskLevel::Medium) {
        push_unique(&mut short_term.steps, &step);
    }

    if household.mobility_issues {
        push_unique(
            &mut immediate.steps,
            "Arrange evacuation help with neighbors or register with local emergency management",
        );
    }
    if household.housing_type == HousingType::Mobile {
        push_unique(
            &mut immediate.steps,
            "Identify a sturdy shelter nearby; mobile homes are unsafe in high winds",
        );
        push_unique(&mut long_term.steps, "Install tie-downs and anchor your mobile home");
    }
    if household.pets {
        push_unique(&mut short_term.steps, "Find pet-friendly shelters and hotels along your evacuation route");
    }
    if household.special_needs {
        push_unique(
            &mut short_term.steps,
            "Register with your utility's medical priority list and plan backup power",
        );
    }

    if let Some(prep) = preparations {
        for step in &prep.immediate {
            push_unique(&mut immediate.steps, step);
        }
        for step in &prep.short_term {
            push_unique(&mut short_term.steps, step);
        }
        for step in &prep.long_term {
            push_unique(&mut long_term.steps, step);
        }
    }

    vec![immediate, short_term, long_term]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DisasterCategory;

    fn household() -> HouseholdProfile {
        HouseholdProfile {
            household_size: 2,
            housing_type: HousingType::House,
            special_needs: false,
            pets: false,
            mobility_issues: false,
            budget: Default::default(),
            timeframe: Default::default(),
        }
    }

    #[test]
    fn test_template_has_three_phases_in_order() {
        let plans = build_action_plan(&household(), &RiskAssessment::new(), None);
        let phases: Vec<Phase> = plans.iter().map(|p| p.phase).collect();
        assert_eq!(phases, vec![Phase::Immediate, Phase::ShortTerm, Phase::LongTerm]);
        assert!(plans.iter().all(|p| p.steps.len() == 4), "bare template has four steps per phase");
        assert_eq!(plans[0].timeline, "This week");
    }

    #[test]
    fn test_timeframe_changes_timelines() {
        let mut profile = household();
        profile.timeframe = Timeframe::Immediate;
        let plans = build_action_plan(&profile, &RiskAssessment::new(), None);
        assert_eq!(plans[0].timeline, "Next 24 hours");
        assert_eq!(plans[2].timeline, "Next 2 weeks");
    }

    #[test]
    fn test_risk_levels_route_to_phases() {
        let mut assessment = RiskAssessment::new();
        assessment.insert(DisasterCategory::Flood, RiskLevel::High, "");
        assessment.insert(DisasterCategory::Earthquake, RiskLevel::Medium, "");
        assessment.insert(DisasterCategory::Drought, RiskLevel::Low, "");

        let plans = build_action_plan(&household(), &assessment, None);
        assert!(plans[0].steps.iter().any(|s| s.contains("Flood")), "high risk → immediate");
        assert!(plans[1].steps.iter().any(|s| s.contains("Earthquake")), "medium risk → short-term");
        assert!(
            !plans.iter().flat_map(|p| &p.steps).any(|s| s.contains("Drought")),
            "low risks add nothing"
        );
    }

    #[test]
    fn test_household_factors_add_steps() {
        let mut profile = household();
        profile.housing_type = HousingType::Mobile;
        profile.mobility_issues = true;

        let plans = build_action_plan(&profile, &RiskAssessment::new(), None);
        assert!(plans[0].steps.iter().any(|s| s.contains("mobile homes")));
        assert!(plans[0].steps.iter().any(|s| s.contains("evacuation help")));
        assert!(plans[2].steps.iter().any(|s| s.contains("tie-downs")));
    }

    #[test]
    fn test_narrative_preparations_merge_without_duplicates() {
        let prep = Preparations {
            immediate: vec!["sign up for local emergency alerts".to_string(), "Fill prescriptions".to_string()],
            long_term: vec!["Retrofit the foundation".to_string()],
            ..Default::default()
        };

        let plans = build_action_plan(&household(), &RiskAssessment::new(), Some(&prep));
        assert_eq!(plans[0].steps.len(), 5, "case-insensitive duplicate skipped");
        assert_eq!(plans[0].steps.last().map(String::as_str), Some("Fill prescriptions"));
        assert_eq!(plans[2].steps.last().map(String::as_str), Some("Retrofit the foundation"));
    }
}
