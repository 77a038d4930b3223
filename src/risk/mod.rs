/// Risk assessment strategies.
///
/// A `RiskSource` turns the gathered signals for one location into a
/// `RiskAssessment`. The strategy is chosen once at startup:
///
/// - `ThresholdBased` runs the deterministic classifier in `thresholds`.
/// - `NarrativeBased` asks a generative model, parses the reply through
///   `narrative`, and degrades to the classifier when nothing usable comes
///   back. A narrative failure never fails the request.

pub mod narrative;
pub mod prompts;
pub mod thresholds;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::ingest::TextGenerator;
use crate::model::{
    AssessmentSource, DisasterCategory, EnvironmentalSignals, HouseholdProfile, LocationProfile,
    RiskAssessment, RiskLevel, WeatherConditions,
};
use narrative::Preparations;

pub const FALLBACK_NOTICE: &str =
    "Personalized risk analysis is unavailable; showing threshold-based defaults.";
pub const PREPARATIONS_UNAVAILABLE_NOTICE: &str =
    "Personalized preparation advice is unavailable; showing the standard plan.";

// ---------------------------------------------------------------------------
// Active disasters
// ---------------------------------------------------------------------------

/// Which categories of an assessment count as "active" for supply
/// selection and the plan summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveDisasterPolicy {
    /// Categories rated medium or high.
    #[default]
    #[serde(rename = "elevated")]
    Elevated,
    /// Every category in the assessment, whatever its level.
    #[serde(rename = "all")]
    AllCategories,
}

impl ActiveDisasterPolicy {
    /// Active categories in display order.
    pub fn active_disasters(&self, assessment: &RiskAssessment) -> Vec<DisasterCategory> {
        assessment
            .iter()
            .filter(|(_, entry)| match self {
                ActiveDisasterPolicy::Elevated => entry.level != RiskLevel::Low,
                ActiveDisasterPolicy::AllCategories => true,
            })
            .map(|(category, _)| category)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Strategy seam
// ---------------------------------------------------------------------------

/// Everything known about the request when risk is assessed.
#[derive(Debug, Clone, Copy)]
pub struct AssessmentContext<'a> {
    pub location: &'a LocationProfile,
    pub household: &'a HouseholdProfile,
    pub signals: &'a EnvironmentalSignals,
    pub weather: Option<&'a WeatherConditions>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskOutcome {
    pub assessment: RiskAssessment,
    pub source: AssessmentSource,
    /// Narrative preparation advice, when the strategy produced any.
    pub preparations: Option<Preparations>,
    /// Messages for the presentation layer about degraded output.
    pub notices: Vec<String>,
}

pub trait RiskSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn assess(&self, ctx: &AssessmentContext<'_>) -> RiskOutcome;
}

/// Deterministic classifier over the gathered signals.
pub struct ThresholdBased;

impl RiskSource for ThresholdBased {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn assess(&self, ctx: &AssessmentContext<'_>) -> RiskOutcome {
        RiskOutcome {
            assessment: thresholds::classify(ctx.signals),
            source: AssessmentSource::Threshold,
            preparations: None,
            notices: Vec::new(),
        }
    }
}

/// Generative-model assessment with threshold fallback.
pub struct NarrativeBased {
    generator: Arc<dyn TextGenerator>,
}

impl NarrativeBased {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        NarrativeBased { generator }
    }

    /// Structured JSON first, then free-text extraction on the same reply.
    fn request_assessment(&self, ctx: &AssessmentContext<'_>) -> Option<RiskAssessment> {
        let reply = match self
            .generator
            .complete(prompts::SYSTEM_PROMPT, &prompts::risk_prompt(ctx), true)
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Risk narrative request failed");
                return None;
            }
        };

        if let Some(assessment) = narrative::parse_structured_risks(&reply) {
            return Some(assessment);
        }

        let assessment = narrative::extract_risk_analysis(&reply);
        if assessment.is_empty() {
            warn!(reply_len = reply.len(), "Risk narrative contained no recognizable entries");
            None
        } else {
            info!(entries = assessment.len(), "Risk narrative parsed from free text");
            Some(assessment)
        }
    }

    fn request_preparations(&self, ctx: &AssessmentContext<'_>) -> Option<Preparations> {
        let reply = self
            .generator
            .complete(prompts::SYSTEM_PROMPT, &prompts::preparations_prompt(ctx), false)
            .map_err(|e| warn!(error = %e, "Preparations request failed"))
            .ok()?;

        let preparations = narrative::extract_preparations(&reply);
        if preparations.is_empty() {
            warn!("Preparations reply had no numbered sections");
            return None;
        }
        Some(preparations)
    }
}

impl RiskSource for NarrativeBased {
    fn name(&self) -> &'static str {
        "narrative"
    }

    fn assess(&self, ctx: &AssessmentContext<'_>) -> RiskOutcome {
        let mut notices = Vec::new();

        let (mut assessment, source) = match self.request_assessment(ctx) {
            Some(assessment) => (assessment, AssessmentSource::Narrative),
            None => {
                notices.push(FALLBACK_NOTICE.to_string());
                (thresholds::classify(ctx.signals), AssessmentSource::Fallback)
            }
        };

        // Categories the model skipped still need an entry for the cards.
        if source == AssessmentSource::Narrative {
            for category in DisasterCategory::ALL {
                if assessment.get(category).is_none() {
                    let (level, explanation) = thresholds::evaluate(category, ctx.signals);
                    assessment.insert(category, level, explanation);
                }
            }
        }

        let preparations = self.request_preparations(ctx);
        if preparations.is_none() {
            notices.push(PREPARATIONS_UNAVAILABLE_NOTICE.to_string());
        }

        RiskOutcome {
            assessment,
            source,
            preparations,
            notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::SourceError;
    use crate::ingest::fixtures::{fixture_preparations_text, fixture_risk_analysis_text};
    use crate::model::{Coordinates, HousingType};
    use std::sync::Mutex;

    /// Replays canned replies in order; errors once they run out.
    struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String, SourceError>>>,
        json_flags: Mutex<Vec<bool>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<String, SourceError>>) -> Arc<Self> {
            let mut replies = replies;
            replies.reverse();
            Arc::new(ScriptedGenerator {
                replies: Mutex::new(replies),
                json_flags: Mutex::new(Vec::new()),
            })
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn complete(&self, _system: &str, _prompt: &str, json_output: bool) -> Result<String, SourceError> {
            self.json_flags.lock().expect("flags lock").push(json_output);
            self.replies
                .lock()
                .expect("replies lock")
                .pop()
                .unwrap_or(Err(SourceError::NoAnswer))
        }
    }

    fn location() -> LocationProfile {
        LocationProfile {
            city: "San Francisco".to_string(),
            state: "California".to_string(),
            zip_code: "94103".to_string(),
            formatted_address: "San Francisco, CA 94103, United States".to_string(),
            coordinates: Coordinates { lat: 37.7725, lng: -122.4091 },
        }
    }

    fn household() -> HouseholdProfile {
        HouseholdProfile {
            household_size: 2,
            housing_type: HousingType::Apartment,
            special_needs: false,
            pets: false,
            mobility_issues: false,
            budget: Default::default(),
            timeframe: Default::default(),
        }
    }

    fn flood_prone_signals() -> EnvironmentalSignals {
        EnvironmentalSignals {
            elevation: Some(20.0),
            ..Default::default()
        }
    }

    fn assess_with(generator: Arc<ScriptedGenerator>) -> RiskOutcome {
        let location = location();
        let household = household();
        let signals = flood_prone_signals();
        let ctx = AssessmentContext {
            location: &location,
            household: &household,
            signals: &signals,
            weather: None,
        };
        NarrativeBased::new(generator).assess(&ctx)
    }

    #[test]
    fn test_elevated_policy_keeps_medium_and_high() {
        let mut assessment = RiskAssessment::new();
        assessment.insert(DisasterCategory::Tsunami, RiskLevel::Medium, "");
        assessment.insert(DisasterCategory::Flood, RiskLevel::High, "");
        assessment.insert(DisasterCategory::Drought, RiskLevel::Low, "");

        assert_eq!(
            ActiveDisasterPolicy::Elevated.active_disasters(&assessment),
            vec![DisasterCategory::Flood, DisasterCategory::Tsunami]
        );
    }

    #[test]
    fn test_all_categories_policy_keeps_everything_in_order() {
        let assessment = thresholds::classify(&EnvironmentalSignals::default());
        let active = ActiveDisasterPolicy::AllCategories.active_disasters(&assessment);
        assert_eq!(active, DisasterCategory::ALL.to_vec());
        assert!(
            ActiveDisasterPolicy::Elevated.active_disasters(&assessment).is_empty(),
            "all-low assessment has nothing elevated"
        );
    }

    #[test]
    fn test_threshold_source_reports_threshold() {
        let location = location();
        let household = household();
        let signals = flood_prone_signals();
        let ctx = AssessmentContext {
            location: &location,
            household: &household,
            signals: &signals,
            weather: None,
        };
        let outcome = ThresholdBased.assess(&ctx);
        assert_eq!(outcome.source, AssessmentSource::Threshold);
        assert_eq!(outcome.assessment.level(DisasterCategory::Flood), Some(RiskLevel::High));
        assert!(outcome.notices.is_empty());
    }

    #[test]
    fn test_narrative_uses_structured_reply_and_fills_gaps() {
        let generator = ScriptedGenerator::new(vec![
            Ok(r#"{"risks": [{"disaster": "earthquake", "level": "high", "explanation": "Near the Hayward fault"}]}"#
                .to_string()),
            Ok(fixture_preparations_text().to_string()),
        ]);
        let outcome = assess_with(Arc::clone(&generator));

        assert_eq!(outcome.source, AssessmentSource::Narrative);
        assert_eq!(outcome.assessment.level(DisasterCategory::Earthquake), Some(RiskLevel::High));
        assert_eq!(outcome.assessment.len(), DisasterCategory::ALL.len(), "skipped categories are filled in");
        assert_eq!(
            outcome.assessment.level(DisasterCategory::Flood),
            Some(RiskLevel::High),
            "gap filled from thresholds"
        );
        assert!(outcome.preparations.is_some());
        assert!(outcome.notices.is_empty());

        let flags = generator.json_flags.lock().expect("flags lock").clone();
        assert_eq!(flags, vec![true, false], "risk call asks for JSON, preparations call does not");
    }

    #[test]
    fn test_narrative_falls_back_to_free_text_extraction() {
        let generator = ScriptedGenerator::new(vec![
            Ok(fixture_risk_analysis_text().to_string()),
            Ok(fixture_preparations_text().to_string()),
        ]);
        let outcome = assess_with(generator);
        assert_eq!(outcome.source, AssessmentSource::Narrative);
        assert_eq!(outcome.assessment.level(DisasterCategory::Winter), Some(RiskLevel::Medium));
    }

    #[test]
    fn test_unusable_reply_degrades_to_thresholds_with_notice() {
        let generator = ScriptedGenerator::new(vec![
            Ok("I'm sorry, I can't help with that.".to_string()),
            Ok("Nothing numbered here.".to_string()),
        ]);
        let outcome = assess_with(generator);

        assert_eq!(outcome.source, AssessmentSource::Fallback);
        assert_eq!(outcome.assessment, thresholds::classify(&flood_prone_signals()));
        assert!(outcome.preparations.is_none());
        assert_eq!(
            outcome.notices,
            vec![FALLBACK_NOTICE.to_string(), PREPARATIONS_UNAVAILABLE_NOTICE.to_string()]
        );
    }

    #[test]
    fn test_generator_errors_degrade_to_thresholds() {
        let generator = ScriptedGenerator::new(vec![Err(SourceError::Timeout), Err(SourceError::Http(500))]);
        let outcome = assess_with(generator);
        assert_eq!(outcome.source, AssessmentSource::Fallback);
        assert_eq!(outcome.assessment.len(), DisasterCategory::ALL.len());
    }

    #[test]
    fn test_policy_deserializes_from_config_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: ActiveDisasterPolicy,
        }
        let all: Wrapper = toml::from_str("policy = \"all\"").expect("all should parse");
        assert_eq!(all.policy, ActiveDisasterPolicy::AllCategories);
        let elevated: Wrapper = toml::from_str("policy = \"elevated\"").expect("elevated should parse");
        assert_eq!(elevated.policy, ActiveDisasterPolicy::Elevated);
    }
}
