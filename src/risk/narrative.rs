//! Narrative extraction: generative-model text → structured risk data.
//!
//! Model output is untrusted. Two parsing paths exist:
//!
//! 1. `parse_structured_risks`: the model was asked for a JSON object
//!    `{ "risks": [{ "disaster", "level", "explanation" }] }`. Used whenever
//!    the reply parses against that shape.
//! 2. `extract_risk_analysis` / `extract_preparations`: best-effort
//!    segmentation of free text. Lossy: sections that do not match are
//!    dropped without inferring anything.
//!
//! Neither path fails. Unusable input yields empty collections, and callers
//! must read an empty result as "unknown", not as "no risk".

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::debug;

use crate::model::{DisasterCategory, Priority, RiskAssessment, RiskLevel};

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// A blank line (possibly holding only spaces or tabs).
static SECTION_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("section break pattern"));

/// `Label:` or `Label -` at the start of a section, followed on the same
/// line by a whole-word risk level. A dash only delimits when spaced, so
/// hyphenated labels ("Flash-Flood") stay whole. Leading bullets, numbering
/// and markdown emphasis before the label are skipped.
static RISK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s#>*_•\-\d.)]*([^:\n]+?)([ \t]*:|[ \t]+-[ \t])[^\n]*?\b(high|medium|moderate|low)\b")
        .expect("risk header pattern")
});

/// A top-level numbered marker: `N.` in column 0, then optional text.
static SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\d+)\.(?:[ \t]+([^\n]*))?$").expect("section marker pattern"));

/// Supply group markers inside the supplies section.
static SUPPLY_GROUP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:category|type)\s*:").expect("supply group pattern"));

/// Leading list bullet.
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-•*]\s*").expect("bullet pattern"));

// ---------------------------------------------------------------------------
// Risk analysis
// ---------------------------------------------------------------------------

/// Parses free-text risk analysis into an assessment.
///
/// The text is split into paragraphs on blank lines. A paragraph
/// contributes an entry only if it opens with a recognizable disaster
/// label followed by `:` or `-` and a level word on the same line. The
/// explanation is the paragraph with everything up to and including that
/// delimiter removed. When a category appears more than once, the first
/// paragraph wins.
pub fn extract_risk_analysis(text: &str) -> RiskAssessment {
    let normalized = text.replace("\r\n", "\n");
    let mut assessment = RiskAssessment::new();

    for section in SECTION_BREAK.split(&normalized) {
        let section = section.trim();
        if section.is_empty() {
            continue;
        }

        let Some(caps) = RISK_HEADER.captures(section) else {
            debug!(section, "Dropping narrative section without a risk header");
            continue;
        };

        let label = &caps[1];
        let Some(category) = DisasterCategory::from_label(label) else {
            debug!(label, "Dropping narrative section with unknown disaster label");
            continue;
        };
        let Some(level) = RiskLevel::from_token(&caps[3]) else {
            continue;
        };

        let explanation_start = caps.get(2).map_or(0, |m| m.end());
        let explanation = section[explanation_start..].trim();

        if !assessment.insert(category, level, explanation) {
            debug!(%category, "Ignoring repeated narrative section");
        }
    }

    assessment
}

#[derive(Deserialize)]
struct StructuredRisks {
    risks: Vec<StructuredRisk>,
}

#[derive(Deserialize)]
struct StructuredRisk {
    disaster: String,
    level: String,
    #[serde(default)]
    explanation: String,
}

/// Parses schema-constrained model output. Returns `None` when the text is
/// not a JSON object of the expected shape or when no entry names a known
/// category with a valid level, so the caller can fall back to
/// `extract_risk_analysis`.
pub fn parse_structured_risks(text: &str) -> Option<RiskAssessment> {
    let parsed: StructuredRisks = serde_json::from_str(strip_code_fence(text)).ok()?;

    let mut assessment = RiskAssessment::new();
    for risk in parsed.risks {
        let category = DisasterCategory::from_id(risk.disaster.trim())
            .or_else(|| DisasterCategory::from_label(&risk.disaster));
        let level = RiskLevel::from_token(&risk.level);

        match (category, level) {
            (Some(category), Some(level)) => {
                assessment.insert(category, level, risk.explanation.trim());
            }
            _ => debug!(disaster = %risk.disaster, level = %risk.level, "Skipping unrecognized structured risk"),
        }
    }

    (!assessment.is_empty()).then_some(assessment)
}

/// Removes a surrounding markdown code fence (```json ... ```), if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop the info string ("json") on the opening fence line.
    match inner.find('\n') {
        Some(newline) => inner[newline + 1..].trim(),
        None => inner.trim(),
    }
}

// ---------------------------------------------------------------------------
// Preparations
// ---------------------------------------------------------------------------

/// A supply named in model output, with priority inferred from keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSupply {
    pub name: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplyGroup {
    pub category: String,
    pub items: Vec<ExtractedSupply>,
}

/// Structured preparation advice extracted from model output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preparations {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
    pub supplies: Vec<SupplyGroup>,
    pub location_specific: Vec<String>,
}

impl Preparations {
    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty()
            && self.short_term.is_empty()
            && self.long_term.is_empty()
            && self.supplies.is_empty()
            && self.location_specific.is_empty()
    }
}

/// Parses numbered preparation advice.
///
/// Top-level markers `1.` through `5.` (in column 0) open the immediate,
/// short-term, long-term, supplies and location-specific sections. Text on
/// a marker line ending in `:` is a heading and is dropped; otherwise it is
/// the section's first item. Other numbers are ignored along with their
/// content.
pub fn extract_preparations(text: &str) -> Preparations {
    let normalized = text.replace("\r\n", "\n");
    let mut sections: [String; 5] = Default::default();

    let markers: Vec<_> = SECTION_MARKER.captures_iter(&normalized).collect();
    for (i, caps) in markers.iter().enumerate() {
        let Some(index) = caps[1].parse::<usize>().ok().filter(|n| (1..=5).contains(n)) else {
            continue;
        };

        let body_start = caps.get(0).map_or(0, |m| m.end());
        let body_end = markers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(normalized.len(), |m| m.start());

        let section = &mut sections[index - 1];
        if let Some(first_line) = caps.get(2).map(|m| m.as_str().trim())
            && !first_line.is_empty()
            && !is_heading(first_line)
        {
            section.push_str(first_line);
            section.push('\n');
        }
        section.push_str(&normalized[body_start..body_end]);
        section.push('\n');
    }

    let [immediate, short_term, long_term, supplies, location_specific] = sections;
    Preparations {
        immediate: extract_list_items(&immediate),
        short_term: extract_list_items(&short_term),
        long_term: extract_list_items(&long_term),
        supplies: extract_supply_groups(&supplies),
        location_specific: extract_list_items(&location_specific),
    }
}

fn is_heading(line: &str) -> bool {
    let trimmed = line.trim();
    let bare = trimmed.trim_matches(|c| c == '*' || c == '#' || c == '_').trim();
    bare.ends_with(':') || (trimmed.starts_with("**") && trimmed.ends_with("**"))
}

fn strip_bullet(line: &str) -> String {
    BULLET.replace(line, "").trim().to_string()
}

/// One item per non-empty line, with bullets removed.
fn extract_list_items(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Splits the supplies section on `Category:` / `Type:` markers. The first
/// line after a marker names the group and the remaining lines are items.
/// Text before the first marker is ignored when markers exist; without any
/// markers the whole section becomes a single "Supplies" group.
fn extract_supply_groups(text: &str) -> Vec<SupplyGroup> {
    let chunks: Vec<&str> = SUPPLY_GROUP_MARKER.split(text).collect();

    if chunks.len() == 1 {
        let items: Vec<ExtractedSupply> = extract_list_items(text).iter().map(|line| to_supply(line)).collect();
        if items.is_empty() {
            return Vec::new();
        }
        return vec![SupplyGroup {
            category: "Supplies".to_string(),
            items,
        }];
    }

    chunks
        .into_iter()
        .skip(1)
        .filter_map(|chunk| {
            let mut lines = chunk.lines().map(str::trim).filter(|line| !line.is_empty());
            let name = lines.next()?.trim_matches('*').trim().to_string();
            let items = lines
                .map(strip_bullet)
                .filter(|line| !line.is_empty())
                .map(|line| to_supply(&line))
                .collect();
            Some(SupplyGroup { category: name, items })
        })
        .collect()
}

fn to_supply(line: &str) -> ExtractedSupply {
    ExtractedSupply {
        name: line.to_string(),
        priority: determine_priority(line),
    }
}

/// Keyword-based priority: critical/essential/immediate → high,
/// recommended/important → medium, anything else → low.
pub fn determine_priority(item: &str) -> Priority {
    let text = item.to_lowercase();
    if ["critical", "essential", "immediate"].iter().any(|k| text.contains(k)) {
        Priority::High
    } else if ["recommended", "important"].iter().any(|k| text.contains(k)) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
