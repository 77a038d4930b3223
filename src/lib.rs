/// readyplan_service: personalized disaster preparedness plans.
///
/// # Module structure
///
/// ```text
/// readyplan_service
/// ├── model       — shared data types (LocationProfile, RiskAssessment, PreparednessPlan, …)
/// ├── config      — service.toml loader and API keys from the environment
/// ├── disasters   — static registry of the ten disaster types (tips, response steps)
/// ├── contacts    — national emergency contact directory
/// ├── ingest
/// │   ├── geocoding — OpenCage: URL construction + JSON parsing
/// │   ├── weather   — OpenWeather current conditions
/// │   ├── knowledge — Wolfram|Alpha short answers + quantity/phone extraction
/// │   ├── llm       — OpenAI chat completions
/// │   └── fixtures (test only) — representative API payloads and model replies
/// ├── aggregate   — thread-pool fan-out of collaborator calls with a deadline
/// ├── risk
/// │   ├── thresholds — deterministic signal → level classifier
/// │   ├── narrative  — model text → assessment / preparations extraction
/// │   └── prompts    — prompt text for the narrative source
/// ├── plan
/// │   ├── supplies — checklist selection + vendor search links
/// │   └── actions  — three-phase, risk-adaptive action plan
/// ├── planner     — request pipeline (validate → gather → assess → assemble)
/// └── endpoint    — tiny_http routes (/api/analyze, /api/disasters, /health)
/// ```

/// Public modules
pub mod aggregate;
pub mod config;
pub mod contacts;
pub mod disasters;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod plan;
pub mod planner;
pub mod risk;
