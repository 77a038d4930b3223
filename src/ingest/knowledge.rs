/// Wolfram|Alpha Short Answers client and answer interpretation.
///
///   https://api.wolframalpha.com/v1/result?i=<question>&appid=..&units=imperial
///
/// The service answers a natural-language question with one line of plain
/// text ("about 52 feet", "1.2 thousand meters", "(309) 673-4521"). It
/// returns HTTP 501 when it has no answer. Answers are free text, so every
/// value pulled out of them is best effort; anything that does not parse
/// is treated as absent.

use regex::Regex;
use std::sync::LazyLock;

use super::{KnowledgeSource, SourceError, read_body};
use crate::model::{EmergencyContact, EnvironmentalSignals};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub fn build_knowledge_url(base_url: &str, question: &str, app_id: &str) -> String {
    format!(
        "{}?i={}&appid={}&units=imperial",
        base_url,
        urlencoding::encode(question),
        urlencoding::encode(app_id)
    )
}

pub struct WolframKnowledge {
    client: reqwest::blocking::Client,
    base_url: String,
    app_id: String,
}

impl WolframKnowledge {
    pub fn new(client: reqwest::blocking::Client, base_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        WolframKnowledge {
            client,
            base_url: base_url.into(),
            app_id: app_id.into(),
        }
    }
}

impl KnowledgeSource for WolframKnowledge {
    fn query(&self, question: &str) -> Result<String, SourceError> {
        let url = build_knowledge_url(&self.base_url, question, &self.app_id);
        let response = self.client.get(&url).send()?;

        if response.status().as_u16() == 501 {
            return Err(SourceError::NoAnswer);
        }
        let text = read_body(response)?;
        if text.trim().is_empty() {
            return Err(SourceError::NoAnswer);
        }
        Ok(text.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// Numeric extraction
// ---------------------------------------------------------------------------

/// Unit the caller wants the value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Feet,
    Miles,
    Inches,
    /// Dimensionless (counts, magnitudes).
    Count,
}

/// First number in the text, an optional `thousand`/`million` multiplier,
/// and the unit word that follows.
static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(-?\d[\d,]*(?:\.\d+)?)\s*(thousand|million)?\s*([a-z]+)?").expect("quantity pattern")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?\b\d{3}\)?[\s.\-]?\d{3}[\s.\-]\d{4}\b").expect("phone pattern"));

/// Pulls the first quantity out of a free-text answer and converts it to
/// `unit`. Returns `None` when no number is present or the unit word is
/// incompatible (e.g. "3 days" when feet were asked for).
pub fn extract_quantity(text: &str, unit: Unit) -> Option<f64> {
    let caps = QUANTITY.captures(text)?;
    let mut value: f64 = caps[1].replace(',', "").parse().ok()?;

    match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
        Some("thousand") => value *= 1_000.0,
        Some("million") => value *= 1_000_000.0,
        _ => {}
    }

    let word = caps.get(3).map(|m| m.as_str().to_ascii_lowercase());
    let factor = conversion_factor(word.as_deref(), unit)?;
    Some(value * factor)
}

/// Multiplier from the answer's unit word into `target`. A missing or
/// unrecognized word is taken to already be in the target unit; a word that
/// names a different dimension yields `None`.
fn conversion_factor(word: Option<&str>, target: Unit) -> Option<f64> {
    let Some(word) = word else {
        return Some(1.0);
    };

    let length_in_feet = match word {
        "ft" | "feet" | "foot" => Some(1.0),
        "in" | "inch" | "inches" => Some(1.0 / 12.0),
        "mi" | "mile" | "miles" => Some(5280.0),
        "m" | "meter" | "meters" | "metre" | "metres" => Some(3.28084),
        "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Some(3280.84),
        "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Some(0.0328084),
        "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Some(0.00328084),
        _ => None,
    };

    let target_in_feet = match target {
        Unit::Feet => 1.0,
        Unit::Miles => 5280.0,
        Unit::Inches => 1.0 / 12.0,
        Unit::Count => return Some(1.0),
    };

    match length_in_feet {
        Some(feet) => Some(feet / target_in_feet),
        // Words like "per", "days", "earthquakes" are not lengths.
        None if is_time_or_count_word(word) => None,
        None => Some(1.0),
    }
}

fn is_time_or_count_word(word: &str) -> bool {
    matches!(
        word,
        "day" | "days" | "hour" | "hours" | "year" | "years" | "minute" | "minutes" | "percent"
    )
}

/// First North American phone number in the text, as written.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE.find(text).map(|m| m.as_str().trim().to_string())
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// An environmental signal answered by the knowledge engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    SeismicActivity,
    Elevation,
    AnnualRainfall,
    AnnualSnowfall,
    DistanceToCoast,
    TornadoFrequency,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::SeismicActivity,
        Signal::Elevation,
        Signal::AnnualRainfall,
        Signal::AnnualSnowfall,
        Signal::DistanceToCoast,
        Signal::TornadoFrequency,
    ];

    pub fn question(&self, place: &str) -> String {
        match self {
            Signal::SeismicActivity => format!("magnitude of the largest recent earthquake near {}", place),
            Signal::Elevation => format!("elevation of {}", place),
            Signal::AnnualRainfall => format!("average annual rainfall in {}", place),
            Signal::AnnualSnowfall => format!("average annual snowfall in {}", place),
            Signal::DistanceToCoast => format!("distance from {} to the nearest coastline", place),
            Signal::TornadoFrequency => format!("average number of tornadoes per year in {}", place),
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Signal::SeismicActivity | Signal::TornadoFrequency => Unit::Count,
            Signal::Elevation => Unit::Feet,
            Signal::AnnualRainfall | Signal::AnnualSnowfall => Unit::Inches,
            Signal::DistanceToCoast => Unit::Miles,
        }
    }

    /// Stores an extracted value in the matching field.
    pub fn apply(&self, signals: &mut EnvironmentalSignals, value: f64) {
        let field = match self {
            Signal::SeismicActivity => &mut signals.seismic_activity,
            Signal::Elevation => &mut signals.elevation,
            Signal::AnnualRainfall => &mut signals.annual_rainfall,
            Signal::AnnualSnowfall => &mut signals.annual_snowfall,
            Signal::DistanceToCoast => &mut signals.distance_to_coast,
            Signal::TornadoFrequency => &mut signals.tornado_frequency,
        };
        *field = Some(value);
    }
}

/// Local emergency services looked up by place name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalService {
    Police,
    Fire,
    Hospital,
}

impl LocalService {
    pub const ALL: [LocalService; 3] = [LocalService::Police, LocalService::Fire, LocalService::Hospital];

    pub fn question(&self, place: &str) -> String {
        match self {
            LocalService::Police => format!("police department non-emergency phone number {}", place),
            LocalService::Fire => format!("fire department phone number {}", place),
            LocalService::Hospital => format!("nearest hospital to {}", place),
        }
    }

    /// Builds a contact from the answer. Police and fire need a phone
    /// number in the answer; the hospital answer is used as its name.
    pub fn to_contact(&self, answer: &str, place: &str) -> Option<EmergencyContact> {
        let answer = answer.trim();
        match self {
            LocalService::Police => Some(EmergencyContact {
                name: "Local Police (non-emergency)".to_string(),
                phone: Some(extract_phone(answer)?),
                website: None,
                description: format!("Police department serving {}", place),
            }),
            LocalService::Fire => Some(EmergencyContact {
                name: "Local Fire Department".to_string(),
                phone: Some(extract_phone(answer)?),
                website: None,
                description: format!("Fire department serving {}", place),
            }),
            LocalService::Hospital => {
                if answer.is_empty() || answer.len() > 120 {
                    return None;
                }
                Some(EmergencyContact {
                    name: "Nearest Hospital".to_string(),
                    phone: extract_phone(answer),
                    website: None,
                    description: answer.to_string(),
                })
            }
        }
    }
}
