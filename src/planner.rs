/// Plan generation pipeline.
///
/// The `Planner` owns everything one request needs and runs the stages in
/// order:
/// 1. Validates the survey
/// 2. Resolves the location and gathers environmental signals (fan-out)
/// 3. Assesses risk with the configured `RiskSource`
/// 4. Assembles the plan from the outcome and the reference data
///
/// Built once at startup and reused for every request; it holds no
/// per-request state.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::aggregate::{Aggregator, Collaborators};
use crate::config::{ApiKeys, ConfigError, RiskSourceKind, ServiceConfig};
use crate::ingest::geocoding::OpenCageGeocoder;
use crate::ingest::knowledge::WolframKnowledge;
use crate::ingest::llm::OpenAiGenerator;
use crate::ingest::weather::OpenWeatherSource;
use crate::ingest::{KnowledgeSource, TextGenerator, Unconfigured, WeatherSource, build_http_client};
use crate::model::{PlanError, PreparednessPlan, RiskLevel, SurveyRequest};
use crate::plan::{self, PlanInputs};
use crate::risk::{ActiveDisasterPolicy, AssessmentContext, NarrativeBased, RiskSource, ThresholdBased};

pub struct Planner {
    aggregator: Aggregator,
    risk_source: Box<dyn RiskSource>,
    policy: ActiveDisasterPolicy,
}

impl Planner {
    pub fn new(aggregator: Aggregator, risk_source: Box<dyn RiskSource>, policy: ActiveDisasterPolicy) -> Self {
        Self {
            aggregator,
            risk_source,
            policy,
        }
    }

    /// Wires the real HTTP collaborators from configuration and keys.
    /// Optional collaborators without a key are replaced by `Unconfigured`.
    pub fn from_config(config: &ServiceConfig, keys: &ApiKeys) -> Result<Self, ConfigError> {
        let client = build_http_client(&config.http).map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        let endpoints = &config.endpoints;

        let weather: Arc<dyn WeatherSource> = match &keys.openweather {
            Some(key) => Arc::new(OpenWeatherSource::new(client.clone(), &endpoints.weather_url, key)),
            None => Arc::new(Unconfigured("weather")),
        };
        let knowledge: Arc<dyn KnowledgeSource> = match &keys.wolfram {
            Some(app_id) => Arc::new(WolframKnowledge::new(client.clone(), &endpoints.knowledge_url, app_id)),
            None => Arc::new(Unconfigured("knowledge engine")),
        };

        let risk_source: Box<dyn RiskSource> = match (config.effective_risk_source(keys), &keys.openai) {
            (RiskSourceKind::Narrative, Some(key)) => {
                let generator: Arc<dyn TextGenerator> = Arc::new(OpenAiGenerator::new(
                    client.clone(),
                    &config.llm.base_url,
                    &config.llm.model,
                    key,
                ));
                Box::new(NarrativeBased::new(generator))
            }
            _ => Box::new(ThresholdBased),
        };

        let sources = Collaborators {
            geocoder: Arc::new(OpenCageGeocoder::new(client, &endpoints.geocoding_url, &keys.opencage)),
            weather,
            knowledge,
        };
        let aggregator = Aggregator::new(
            sources,
            config.http.pool_size,
            Duration::from_secs(config.http.deadline_secs),
        );

        Ok(Self::new(aggregator, risk_source, config.risk.active_disasters))
    }

    pub fn risk_source_name(&self) -> &'static str {
        self.risk_source.name()
    }

    /// Runs the full pipeline for one survey.
    ///
    /// # Errors
    /// - `PlanError::InvalidRequest` for an empty location or zero household
    /// - `PlanError::LocationNotFound` when the location cannot be resolved
    ///
    /// Every other upstream failure degrades the plan instead of failing it.
    pub fn generate_plan(&self, request: &SurveyRequest) -> Result<PreparednessPlan, PlanError> {
        request.validate()?;

        let place = request.location.trim();
        info!(place, household_size = request.household.household_size, "Generating plan");

        let report = self.aggregator.gather(request.geocoding_query(), place)?;

        let ctx = AssessmentContext {
            location: &report.location,
            household: &request.household,
            signals: &report.signals,
            weather: report.weather.as_ref(),
        };
        let outcome = self.risk_source.assess(&ctx);

        info!(
            place = %report.location.place_name(),
            source = ?outcome.source,
            high = outcome.assessment.at_level(RiskLevel::High).len(),
            "Risk assessed"
        );

        Ok(plan::assemble(PlanInputs {
            location: report.location,
            household: request.household.clone(),
            signals: report.signals,
            weather: report.weather,
            outcome,
            policy: self.policy,
            local_contacts: report.local_contacts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(openai: Option<&str>) -> ApiKeys {
        ApiKeys {
            opencage: "oc".to_string(),
            openweather: None,
            wolfram: None,
            openai: openai.map(str::to_string),
        }
    }

    #[test]
    fn test_from_config_picks_narrative_when_keyed() {
        let planner = Planner::from_config(&ServiceConfig::default(), &keys(Some("sk"))).expect("planner builds");
        assert_eq!(planner.risk_source_name(), "narrative");
    }

    #[test]
    fn test_from_config_falls_back_to_threshold_without_llm_key() {
        let planner = Planner::from_config(&ServiceConfig::default(), &keys(None)).expect("planner builds");
        assert_eq!(planner.risk_source_name(), "threshold");

        let mut config = ServiceConfig::default();
        config.risk.source = RiskSourceKind::Threshold;
        let planner = Planner::from_config(&config, &keys(Some("sk"))).expect("planner builds");
        assert_eq!(planner.risk_source_name(), "threshold", "explicit threshold wins over a key");
    }
}
