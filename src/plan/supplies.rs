/// Supply checklist selection and vendor search links.
///
/// Base categories apply to every household. Conditional categories are
/// added for household traits (pets, special needs) and for active
/// disasters (winter, storms). Supply groups parsed from a narrative reply
/// are appended after the templates.

use std::collections::BTreeMap;

use crate::model::{
    DisasterCategory, HouseholdProfile, Priority, RiskAssessment, RiskLevel, SupplyCategory, SupplyItem,
};
use crate::risk::narrative::SupplyGroup;

/// Vendor id → search URL prefix. The encoded item name is appended.
pub const VENDORS: [(&str, &str); 2] = [
    ("amazon", "https://www.amazon.com/s?k="),
    ("walmart", "https://www.walmart.com/search?q="),
];

/// Search term for vendor links: URL-encoded name, spaces as `+`, then
/// `+emergency`.
pub fn search_term(name: &str) -> String {
    format!("{}+emergency", urlencoding::encode(name.trim()).replace("%20", "+"))
}

pub fn purchase_links(name: &str) -> BTreeMap<String, String> {
    let term = search_term(name);
    VENDORS
        .iter()
        .map(|(vendor, prefix)| (vendor.to_string(), format!("{}{}", prefix, term)))
        .collect()
}

pub fn supply_item(name: &str) -> SupplyItem {
    SupplyItem {
        name: name.trim().to_string(),
        purchase_links: purchase_links(name),
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Static supply category. Costs are whole dollars; per-person templates
/// multiply both bounds by household size.
struct SupplyTemplate {
    category: &'static str,
    items: &'static [&'static str],
    priority: Priority,
    cost: (u32, u32),
    per_person: bool,
    reason: &'static str,
}

const WATER_AND_FOOD: SupplyTemplate = SupplyTemplate {
    category: "Water & Food",
    items: &[
        "Water Storage Containers",
        "Bottled Water (1 gallon per person per day)",
        "Non-perishable Food",
        "Manual Can Opener",
    ],
    priority: Priority::High,
    cost: (30, 60),
    per_person: true,
    reason: "At least a 3-day supply of water and food for every household member",
};

const FIRST_AID: SupplyTemplate = SupplyTemplate {
    category: "First Aid",
    items: &[
        "First Aid Kit",
        "Prescription Medication Supply",
        "Hand Sanitizer",
        "Emergency Blankets",
    ],
    priority: Priority::High,
    cost: (40, 100),
    per_person: false,
    reason: "Treat minor injuries when medical help is delayed",
};

const COMMUNICATION_AND_LIGHTING: SupplyTemplate = SupplyTemplate {
    category: "Communication & Lighting",
    items: &[
        "Hand Crank Weather Radio",
        "LED Flashlight",
        "Extra Batteries",
        "Portable Phone Charger",
    ],
    priority: Priority::High,
    cost: (50, 120),
    per_person: false,
    reason: "Receive alerts and keep light when the power is out",
};

const PET_SUPPLIES: SupplyTemplate = SupplyTemplate {
    category: "Pet Supplies",
    items: &["Pet Food", "Pet Carrier", "Leash and Collar", "Pet Medications"],
    priority: Priority::Medium,
    cost: (40, 90),
    per_person: false,
    reason: "Pets need their own food, water and carrier for evacuation",
};

const SPECIAL_NEEDS: SupplyTemplate = SupplyTemplate {
    category: "Special Needs",
    items: &[
        "Medical Alert Bracelet",
        "Backup Power for Medical Devices",
        "Copies of Medical Records",
    ],
    priority: Priority::High,
    cost: (50, 200),
    per_person: false,
    reason: "Keep medical care going through outages and evacuations",
};

const MOBILITY_ITEMS: &[&str] = &["Portable Ramp", "Folding Wheelchair", "Walking Cane"];

const WINTER_WEATHER: SupplyTemplate = SupplyTemplate {
    category: "Winter Weather",
    items: &["Thermal Blankets", "Hand Warmers", "Ice Melt", "Snow Shovel"],
    priority: Priority::Medium,
    cost: (60, 150),
    per_person: false,
    reason: "Stay warm and mobile through snow, ice and extended outages",
};

const STORM_PROTECTION: SupplyTemplate = SupplyTemplate {
    category: "Storm Protection",
    items: &["Plywood Window Covers", "Heavy Duty Tarps", "Work Gloves", "Sandbags"],
    priority: Priority::Medium,
    cost: (100, 300),
    per_person: false,
    reason: "Protect windows and roof from high winds and flying debris",
};

/// Widened to `u64` so any `u32` household size fits.
fn format_cost(cost: (u32, u32), multiplier: u32) -> String {
    let scale = |amount: u32| u64::from(amount) * u64::from(multiplier);
    format!("${}-${}", scale(cost.0), scale(cost.1))
}

fn from_template(template: &SupplyTemplate, household: &HouseholdProfile) -> SupplyCategory {
    let multiplier = if template.per_person { household.household_size.max(1) } else { 1 };
    SupplyCategory {
        category: template.category.to_string(),
        items: template.items.iter().map(|name| supply_item(name)).collect(),
        priority: template.priority,
        estimated_cost: format_cost(template.cost, multiplier),
        reason: template.reason.to_string(),
    }
}

/// Highest priority implied by the given categories' levels, never below
/// the template's own.
fn escalate(base: Priority, assessment: &RiskAssessment, categories: &[DisasterCategory]) -> Priority {
    categories
        .iter()
        .filter_map(|c| assessment.level(*c))
        .filter(|level| *level == RiskLevel::High)
        .map(Priority::from)
        .fold(base, Priority::max)
}

/// Template supply categories for a household and its active disasters.
pub fn select_supplies(
    household: &HouseholdProfile,
    active: &[DisasterCategory],
    assessment: &RiskAssessment,
) -> Vec<SupplyCategory> {
    let mut supplies = vec![
        from_template(&WATER_AND_FOOD, household),
        from_template(&FIRST_AID, household),
        from_template(&COMMUNICATION_AND_LIGHTING, household),
    ];

    if household.pets {
        supplies.push(from_template(&PET_SUPPLIES, household));
    }

    if household.special_needs {
        let mut category = from_template(&SPECIAL_NEEDS, household);
        if household.mobility_issues {
            category.items.extend(MOBILITY_ITEMS.iter().map(|name| supply_item(name)));
        }
        supplies.push(category);
    }

    if active.contains(&DisasterCategory::Winter) {
        let mut category = from_template(&WINTER_WEATHER, household);
        category.priority = escalate(category.priority, assessment, &[DisasterCategory::Winter]);
        supplies.push(category);
    }

    let storms = [DisasterCategory::Hurricane, DisasterCategory::Tornado];
    if storms.iter().any(|c| active.contains(c)) {
        let mut category = from_template(&STORM_PROTECTION, household);
        category.priority = escalate(category.priority, assessment, &storms);
        supplies.push(category);
    }

    supplies
}

/// Converts narrative supply groups into checklist categories. A group
/// whose name matches an existing category adds its new items there;
/// other groups become categories of their own, prioritized by their most
/// urgent item.
pub fn merge_narrative_supplies(supplies: &mut Vec<SupplyCategory>, groups: &[SupplyGroup]) {
    for group in groups {
        if group.items.is_empty() {
            continue;
        }

        if let Some(existing) = supplies
            .iter_mut()
            .find(|c| c.category.eq_ignore_ascii_case(group.category.trim()))
        {
            for item in &group.items {
                if !existing.items.iter().any(|i| i.name.eq_ignore_ascii_case(item.name.trim())) {
                    existing.items.push(supply_item(&item.name));
                }
            }
            continue;
        }

        let priority = group.items.iter().map(|i| i.priority).max().unwrap_or(Priority::Low);
        supplies.push(SupplyCategory {
            category: group.category.trim().to_string(),
            items: group.items.iter().map(|i| supply_item(&i.name)).collect(),
            priority,
            estimated_cost: "Varies".to_string(),
            reason: "Recommended for your location".to_string(),
        });
    }
}
