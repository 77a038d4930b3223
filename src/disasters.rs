/// Disaster reference registry.
///
/// Defines the static metadata for every disaster category the service
/// plans for: display title, short description, icon, a preparedness tip,
/// and the universal before/during/after response steps. This is the
/// single source of truth for that text. The plan assembler, the action
/// plan builder and `GET /api/disasters` all read from here.

use serde::Serialize;

use crate::model::{DisasterCategory, ResponseSteps};

// ---------------------------------------------------------------------------
// Disaster metadata
// ---------------------------------------------------------------------------

/// Static reference data for one disaster category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disaster {
    #[serde(rename = "id")]
    pub category: DisasterCategory,
    pub title: &'static str,
    pub description: &'static str,
    /// Icon shown on the disaster card.
    pub emoji: &'static str,
    /// One-line preparedness tip for the summary tab.
    pub tip: &'static str,
    pub before: &'static [&'static str],
    pub during: &'static [&'static str],
    pub after: &'static [&'static str],
}

impl Disaster {
    pub fn response_steps(&self) -> ResponseSteps {
        ResponseSteps {
            before: self.before,
            during: self.during,
            after: self.after,
        }
    }
}

/// All disaster categories, in `DisasterCategory` declaration order.
///
/// Sources:
///   - Response steps: Ready.gov hazard pages and American Red Cross
///     preparedness checklists, condensed.
pub static DISASTER_REGISTRY: &[Disaster] = &[
    Disaster {
        category: DisasterCategory::Earthquake,
        title: "Earthquake",
        description: "Sudden shaking of the ground caused by movement along \
                      faults. Strikes without warning.",
        emoji: "🏚️",
        tip: "Secure heavy furniture and water heaters to wall studs.",
        before: &[
            "Secure heavy furniture, shelves and water heaters to walls",
            "Identify safe spots in each room under sturdy tables or against interior walls",
            "Practice Drop, Cover, and Hold On with everyone in the household",
            "Keep shoes and a flashlight next to every bed",
        ],
        during: &[
            "Drop to your hands and knees",
            "Cover your head and neck under a sturdy table or desk",
            "Hold on until the shaking stops",
            "If outdoors, move away from buildings, trees and power lines",
        ],
        after: &[
            "Expect aftershocks and Drop, Cover, and Hold On again when they come",
            "Check for gas leaks and shut off the main valve if you smell gas",
            "Inspect the home for structural damage before re-entering",
            "Text rather than call to keep phone lines open for emergencies",
        ],
    },
    Disaster {
        category: DisasterCategory::Wildfire,
        title: "Wildfire",
        description: "Uncontrolled fire spreading through vegetation, driven \
                      by heat, drought and wind.",
        emoji: "🔥",
        tip: "Keep a 30-foot defensible space clear of dry vegetation around the home.",
        before: &[
            "Create defensible space by clearing brush and dead leaves around the home",
            "Sign up for local emergency alerts and know your evacuation zone",
            "Pack a go-bag with N95 masks, documents and medications",
            "Keep gutters and roof free of debris",
        ],
        during: &[
            "Evacuate immediately when told to do so",
            "Close all windows, doors and vents before leaving",
            "Wear an N95 mask to limit smoke exposure",
            "Leave lights on so firefighters can see the house through smoke",
        ],
        after: &[
            "Return home only when officials say it is safe",
            "Watch for hot spots, ash pits and smoldering debris",
            "Discard food exposed to heat, smoke or soot",
            "Photograph damage for insurance claims",
        ],
    },
    Disaster {
        category: DisasterCategory::Flood,
        title: "Flood",
        description: "Overflow of water onto normally dry land from heavy \
                      rain, snowmelt, storm surge or river rise.",
        emoji: "🌊",
        tip: "Check whether your home is in a flood zone and consider flood insurance.",
        before: &[
            "Learn your flood zone and nearby high-ground routes",
            "Move valuables and important documents to upper floors",
            "Clear drains and gutters and consider a sump pump with battery backup",
            "Review flood insurance coverage, which takes 30 days to take effect",
        ],
        during: &[
            "Move to higher ground immediately",
            "Never walk, swim or drive through flood water",
            "Stay off bridges over fast-moving water",
            "Evacuate if told to do so",
        ],
        after: &[
            "Avoid flood water, which may be contaminated or electrically charged",
            "Do not return until authorities declare the area safe",
            "Clean and disinfect everything that got wet",
            "Check with local officials that tap water is safe to drink",
        ],
    },
    Disaster {
        category: DisasterCategory::Winter,
        title: "Winter Storm",
        description: "Heavy snow, ice and extreme cold that can cut power \
                      and strand households for days.",
        emoji: "❄️",
        tip: "Keep enough heating fuel and warm layers for a week without power.",
        before: &[
            "Winterize the home with insulation, weather stripping and storm windows",
            "Install carbon monoxide detectors and test their batteries",
            "Stock extra blankets, warm clothing and heating fuel",
            "Keep a winter kit in the car with a shovel, ice scraper and blanket",
        ],
        during: &[
            "Stay indoors and dress in warm layers",
            "Never run generators, grills or camp stoves indoors",
            "Let faucets drip to keep pipes from freezing",
            "Limit travel and keep the gas tank at least half full",
        ],
        after: &[
            "Check on neighbors, especially older adults",
            "Watch for signs of frostbite and hypothermia",
            "Clear snow from vents to prevent carbon monoxide buildup",
            "Shovel snow carefully and take frequent breaks",
        ],
    },
    Disaster {
        category: DisasterCategory::Landslide,
        title: "Landslide",
        description: "Rock, earth or debris moving down a slope, often \
                      triggered by heavy rain on steep terrain.",
        emoji: "⛰️",
        tip: "Watch for new cracks in walls or ground and tilting trees on slopes.",
        before: &[
            "Get a ground assessment of your property from a geotechnical professional",
            "Learn the emergency response and evacuation plans for your area",
            "Plant ground cover on slopes and build retaining walls",
            "Watch for changes in drainage patterns and new cracks in foundations",
        ],
        during: &[
            "Stay alert and awake during intense rainfall",
            "Listen for rumbling sounds that may indicate moving debris",
            "Move away from the path of the slide as quickly as possible",
            "Curl into a tight ball and protect your head if escape is impossible",
        ],
        after: &[
            "Stay away from the slide area because more slides may follow",
            "Watch for flooding, which often follows landslides",
            "Check for damaged utility lines and report them",
            "Replant damaged ground as soon as possible to reduce erosion",
        ],
    },
    Disaster {
        category: DisasterCategory::Tornado,
        title: "Tornado",
        description: "Violently rotating column of air reaching the ground, \
                      capable of destroying buildings in seconds.",
        emoji: "🌪️",
        tip: "Know the safest room in your home: lowest floor, interior, no windows.",
        before: &[
            "Identify a safe room on the lowest floor away from windows",
            "Sign up for tornado warnings and keep a weather radio",
            "Practice tornado drills with the household",
            "Keep sturdy shoes and a helmet near the safe room",
        ],
        during: &[
            "Go to the safe room or basement immediately when a warning is issued",
            "Cover your head and neck with your arms or a mattress",
            "Do not stay in a vehicle or mobile home",
            "Stay away from windows and outside walls",
        ],
        after: &[
            "Stay clear of downed power lines and damaged buildings",
            "Wear sturdy shoes and gloves when moving through debris",
            "Check on injured people and call for help if needed",
            "Use flashlights instead of candles",
        ],
    },
    Disaster {
        category: DisasterCategory::Hurricane,
        title: "Hurricane",
        description: "Large tropical storm with damaging winds, storm surge \
                      and flooding rain.",
        emoji: "🌀",
        tip: "Know your evacuation zone and plan where you will go before the season starts.",
        before: &[
            "Know your evacuation zone and route",
            "Install storm shutters or pre-cut plywood for windows",
            "Trim trees and secure outdoor furniture",
            "Fill prescriptions and stock at least a week of supplies",
        ],
        during: &[
            "Evacuate if ordered and leave early",
            "If sheltering in place, stay in an interior room away from windows",
            "Do not go outside during the calm eye of the storm",
            "Keep a battery-powered radio on for updates",
        ],
        after: &[
            "Wait for officials to declare the area safe before returning",
            "Avoid flood water and downed power lines",
            "Document damage with photos for insurance",
            "Use generators outdoors only, away from windows",
        ],
    },
    Disaster {
        category: DisasterCategory::Drought,
        title: "Drought",
        description: "Extended period of low rainfall that strains water \
                      supplies and raises fire danger.",
        emoji: "☀️",
        tip: "Store extra drinking water and fix leaks before restrictions begin.",
        before: &[
            "Fix leaking faucets, pipes and irrigation lines",
            "Install low-flow fixtures and plant drought-tolerant landscaping",
            "Store extra drinking water for the household",
            "Learn the local water restriction stages",
        ],
        during: &[
            "Follow local water restrictions",
            "Limit outdoor watering to early morning or evening",
            "Reuse household water for plants where safe",
            "Watch for heightened wildfire conditions",
        ],
        after: &[
            "Keep water-saving habits in place",
            "Check trees and foundations for drought damage",
            "Replenish stored water",
            "Review landscaping for future drought resilience",
        ],
    },
    Disaster {
        category: DisasterCategory::Heatwave,
        title: "Extreme Heat",
        description: "Prolonged period of dangerously high temperatures, \
                      often with high humidity.",
        emoji: "🌡️",
        tip: "Know where the nearest cooling center is and how to get there.",
        before: &[
            "Locate nearby cooling centers",
            "Install window reflectors and weather stripping",
            "Check that air conditioning works and has clean filters",
            "Plan regular check-ins for older adults and people with health conditions",
        ],
        during: &[
            "Stay indoors in air conditioning during the hottest hours",
            "Drink water regularly even if you do not feel thirsty",
            "Never leave people or pets in a closed vehicle",
            "Watch for heat exhaustion and heat stroke symptoms",
        ],
        after: &[
            "Keep hydrating and rest in cool places",
            "Check on vulnerable neighbors",
            "Seek medical care for lingering dizziness or confusion",
            "Restock water and electrolyte supplies",
        ],
    },
    Disaster {
        category: DisasterCategory::Tsunami,
        title: "Tsunami",
        description: "Series of ocean waves caused by undersea earthquakes or \
                      landslides, flooding coastal areas.",
        emoji: "🌊",
        tip: "If you feel a strong coastal earthquake, move to high ground without waiting for a warning.",
        before: &[
            "Learn whether your home, work or school is in a tsunami hazard zone",
            "Map an evacuation route to ground at least 100 feet above sea level",
            "Practice walking the route since roads may be blocked",
            "Keep a go-bag ready by the door",
        ],
        during: &[
            "Move to high ground or inland immediately",
            "Go on foot if possible",
            "Stay away from the coast until officials give the all clear",
            "If caught in water, grab something that floats",
        ],
        after: &[
            "Stay away from damaged areas until officials say it is safe",
            "Expect more waves; the first is often not the largest",
            "Avoid flood water and debris",
            "Check the home for gas leaks and electrical damage",
        ],
    },
];

/// Looks up the registry entry for a category.
pub fn find_disaster(category: DisasterCategory) -> Option<&'static Disaster> {
    DISASTER_REGISTRY.iter().find(|d| d.category == category)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
