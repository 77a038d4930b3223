/// Emergency contact directory.
///
/// National agencies and hotlines that apply to every plan, followed by any
/// local numbers the knowledge engine resolved for the location.

use crate::model::EmergencyContact;

/// A national directory entry.
pub struct DirectoryEntry {
    pub name: &'static str,
    pub phone: Option<&'static str>,
    pub website: Option<&'static str>,
    pub description: &'static str,
}

pub static NATIONAL_DIRECTORY: &[DirectoryEntry] = &[
    DirectoryEntry {
        name: "Emergency Services",
        phone: Some("911"),
        website: None,
        description: "Police, fire and medical emergencies",
    },
    DirectoryEntry {
        name: "Federal Emergency Management Agency (FEMA)",
        phone: Some("1-800-621-3362"),
        website: Some("https://www.fema.gov"),
        description: "Disaster assistance and recovery",
    },
    DirectoryEntry {
        name: "American Red Cross",
        phone: Some("1-800-733-2767"),
        website: Some("https://www.redcross.org"),
        description: "Shelters, supplies and family reunification",
    },
    DirectoryEntry {
        name: "National Weather Service (NWS)",
        phone: None,
        website: Some("https://www.weather.gov"),
        description: "Forecasts, watches and warnings",
    },
    DirectoryEntry {
        name: "CDC Emergency Preparedness",
        phone: None,
        website: Some("https://www.cdc.gov/prepyourhealth"),
        description: "Health guidance before and after disasters",
    },
    DirectoryEntry {
        name: "Ready.gov",
        phone: None,
        website: Some("https://www.ready.gov"),
        description: "Hazard-specific preparedness guides",
    },
    DirectoryEntry {
        name: "Poison Control",
        phone: Some("1-800-222-1222"),
        website: Some("https://www.poison.org"),
        description: "Exposure to chemicals, carbon monoxide or contaminated water",
    },
    DirectoryEntry {
        name: "988 Suicide & Crisis Lifeline",
        phone: Some("988"),
        website: Some("https://988lifeline.org"),
        description: "Crisis and emotional support after a disaster",
    },
];

impl From<&DirectoryEntry> for EmergencyContact {
    fn from(entry: &DirectoryEntry) -> Self {
        EmergencyContact {
            name: entry.name.to_string(),
            phone: entry.phone.map(str::to_string),
            website: entry.website.map(str::to_string),
            description: entry.description.to_string(),
        }
    }
}

/// National directory followed by local contacts. Local entries whose name
/// duplicates an earlier entry are skipped.
pub fn contact_list(local: &[EmergencyContact]) -> Vec<EmergencyContact> {
    let mut contacts: Vec<EmergencyContact> = NATIONAL_DIRECTORY.iter().map(EmergencyContact::from).collect();

    for contact in local {
        if !contacts.iter().any(|c| c.name.eq_ignore_ascii_case(&contact.name)) {
            contacts.push(contact.clone());
        }
    }

    contacts
}
