//! Static advisory catalog: the fixed guidance attached to every event label
//! the classifier knows about.
//!
//! The table is compiled into the binary and indexed once at startup. Lookups
//! are exact and case-sensitive; see [`crate::resolver`] for the fallback
//! applied when a label is missing.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

// ---

/// How serious an event is considered to be.
///
/// `NotRated` is only ever carried by the resolver fallback and renders as
/// `"N/A"`; every catalog entry has a real rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    #[serde(rename = "N/A")]
    NotRated,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::NotRated => "N/A",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guidance bundle for one event label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    // ---
    pub event_label: &'static str,
    pub recommendations: &'static [&'static str],
    pub emergency_number: &'static str,
    pub severity: Severity,
    pub precaution: &'static str,
}

/// Immutable label -> advisory index.
#[derive(Debug)]
pub struct AdvisoryCatalog {
    by_label: HashMap<&'static str, &'static Advisory>,
}

impl AdvisoryCatalog {
    /// Index the built-in table.
    pub fn new() -> Self {
        // ---
        let by_label = ADVISORIES.iter().map(|a| (a.event_label, a)).collect();
        Self { by_label }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, label: &str) -> Option<&'static Advisory> {
        self.by_label.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    /// Known labels in table order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        ADVISORIES.iter().map(|a| a.event_label)
    }
}

impl Default for AdvisoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// ---

static ADVISORIES: [Advisory; 20] = [
    Advisory {
        event_label: "accident",
        recommendations: &[
            "Check for injuries and call emergency services immediately.",
            "Move to a safe location if possible.",
            "Do not block traffic unnecessarily.",
            "Provide first aid if trained.",
            "Document the incident for authorities.",
        ],
        emergency_number: "108",
        severity: Severity::High,
        precaution: "Always follow traffic rules and wear safety gear.",
    },
    Advisory {
        event_label: "clash",
        recommendations: &[
            "Avoid the area immediately.",
            "Stay calm and do not engage.",
            "Inform local authorities about the situation.",
            "Seek shelter in a safe location.",
            "Keep communication lines open with family and friends.",
        ],
        emergency_number: "100",
        severity: Severity::Medium,
        precaution: "Avoid large gatherings and protests.",
    },
    Advisory {
        event_label: "covid-19",
        recommendations: &[
            "Wear a mask and maintain social distancing.",
            "Wash hands frequently with sanitizer.",
            "Stay home if feeling unwell.",
            "Get vaccinated and follow government guidelines.",
            "Inform local health authorities if symptoms appear.",
        ],
        emergency_number: "104",
        severity: Severity::High,
        precaution: "Follow health advisories and quarantine rules.",
    },
    Advisory {
        event_label: "cyclone",
        recommendations: &[
            "Seek shelter indoors and secure loose objects.",
            "Stock food, water, and emergency supplies.",
            "Avoid traveling during heavy winds.",
            "Stay tuned to local alerts and warnings.",
            "Have an evacuation plan ready.",
        ],
        emergency_number: "108",
        severity: Severity::High,
        precaution: "Avoid low-lying areas and coastal regions.",
    },
    Advisory {
        event_label: "dengue",
        recommendations: &[
            "Prevent mosquito breeding around your home.",
            "Use mosquito repellents and mosquito nets.",
            "Consult a doctor if fever or symptoms appear.",
            "Stay hydrated and rest adequately.",
            "Report suspected cases to health authorities.",
        ],
        emergency_number: "104",
        severity: Severity::Medium,
        precaution: "Wear full sleeves and remove standing water.",
    },
    Advisory {
        event_label: "earthquake",
        recommendations: &[
            "Drop, cover, and hold on immediately.",
            "Stay away from windows and heavy objects.",
            "If outside, move to an open area away from buildings.",
            "Keep communication lines clear.",
            "Check for injuries and damage after shaking stops.",
        ],
        emergency_number: "101",
        severity: Severity::High,
        precaution: "Prepare an emergency kit and safe spots in your home.",
    },
    Advisory {
        event_label: "epidemic",
        recommendations: &[
            "Follow local health authority guidelines.",
            "Maintain hygiene and avoid crowded areas.",
            "Seek medical advice if symptomatic.",
            "Stay home if unwell and avoid spreading infection.",
            "Report suspected cases to authorities.",
        ],
        emergency_number: "104",
        severity: Severity::High,
        precaution: "Vaccinate if available and avoid unnecessary travel.",
    },
    Advisory {
        event_label: "health emergency",
        recommendations: &[
            "Call emergency services immediately.",
            "Provide first aid if trained.",
            "Keep the patient calm and safe.",
            "Monitor vital signs until help arrives.",
            "Follow instructions from emergency responders.",
        ],
        emergency_number: "108",
        severity: Severity::High,
        precaution: "Learn basic first aid and CPR.",
    },
    Advisory {
        event_label: "landslide",
        recommendations: &[
            "Move to higher ground immediately.",
            "Avoid river valleys and low areas.",
            "Stay alert for warnings from authorities.",
            "Do not drive through debris or flooded areas.",
            "Help others if safe to do so.",
        ],
        emergency_number: "108",
        severity: Severity::High,
        precaution: "Avoid construction near slopes and monitor heavy rainfall alerts.",
    },
    Advisory {
        event_label: "malaria",
        recommendations: &[
            "Use mosquito repellents and nets.",
            "Avoid stagnant water to prevent breeding.",
            "Consult a doctor if fever appears.",
            "Take prescribed antimalarial medication if required.",
            "Report cases to local health authorities.",
        ],
        emergency_number: "104",
        severity: Severity::Medium,
        precaution: "Wear protective clothing and use insecticide-treated nets.",
    },
    Advisory {
        event_label: "no event",
        recommendations: &[
            "No specific action required.",
            "Stay alert to local news and weather updates.",
            "Maintain general safety precautions.",
            "Keep emergency contacts handy.",
            "Be prepared for any unexpected incidents.",
        ],
        emergency_number: "N/A",
        severity: Severity::Low,
        precaution: "Maintain general safety habits.",
    },
    Advisory {
        event_label: "outbreak",
        recommendations: &[
            "Follow health authority instructions carefully.",
            "Maintain hygiene and avoid crowded areas.",
            "Stay home if unwell.",
            "Report symptoms and suspected cases.",
            "Keep informed about outbreak updates.",
        ],
        emergency_number: "104",
        severity: Severity::High,
        precaution: "Get vaccinated if applicable and avoid high-risk areas.",
    },
    Advisory {
        event_label: "power outage",
        recommendations: &[
            "Use emergency lights or candles safely.",
            "Keep mobile devices charged.",
            "Avoid opening refrigerators frequently.",
            "Report the outage to local utility providers.",
            "Stay calm and inform neighbors if needed.",
        ],
        emergency_number: "1912",
        severity: Severity::Medium,
        precaution: "Keep backup power and emergency kits ready.",
    },
    Advisory {
        event_label: "protest",
        recommendations: &[
            "Avoid participating if unsafe.",
            "Stay away from the main protest areas.",
            "Follow updates from authorities.",
            "Keep communication open with family/friends.",
            "Seek shelter if the situation escalates.",
        ],
        emergency_number: "100",
        severity: Severity::Medium,
        precaution: "Stay informed about protest plans and traffic diversions.",
    },
    Advisory {
        event_label: "riot",
        recommendations: &[
            "Move to a safe location immediately.",
            "Do not engage with rioters.",
            "Call authorities if threatened.",
            "Stay indoors until safe.",
            "Help others if safe to do so.",
        ],
        emergency_number: "100",
        severity: Severity::High,
        precaution: "Avoid riot-prone areas and stay alert to news alerts.",
    },
    Advisory {
        event_label: "social unrest",
        recommendations: &[
            "Avoid the affected area.",
            "Stay calm and follow official instructions.",
            "Keep emergency contacts handy.",
            "Report unsafe situations to authorities.",
            "Assist vulnerable people safely if possible.",
        ],
        emergency_number: "100",
        severity: Severity::Medium,
        precaution: "Stay updated via reliable news sources.",
    },
    Advisory {
        event_label: "traffic accident",
        recommendations: &[
            "Call emergency services immediately.",
            "Move to a safe area if possible.",
            "Provide first aid if trained.",
            "Do not block traffic unnecessarily.",
            "Document the incident for authorities.",
        ],
        emergency_number: "108",
        severity: Severity::High,
        precaution: "Follow traffic rules and drive safely.",
    },
    Advisory {
        event_label: "transport breakdown",
        recommendations: &[
            "Move the vehicle to a safe location.",
            "Turn on hazard lights.",
            "Call towing or roadside assistance.",
            "Avoid standing in traffic lanes.",
            "Inform authorities if blocking roads.",
        ],
        emergency_number: "108",
        severity: Severity::Medium,
        precaution: "Regularly maintain vehicles and check fuel and battery.",
    },
    Advisory {
        event_label: "tsunami",
        recommendations: &[
            "Move to higher ground immediately.",
            "Stay away from the coast and low-lying areas.",
            "Follow tsunami alerts and official instructions.",
            "Keep emergency kits ready.",
            "Assist others if safe to do so.",
        ],
        emergency_number: "108",
        severity: Severity::High,
        precaution: "Know evacuation routes if living in coastal areas.",
    },
    Advisory {
        event_label: "water shortage",
        recommendations: &[
            "Use water sparingly and avoid wastage.",
            "Store enough drinking water safely.",
            "Report leaks or damages to local authorities.",
            "Follow water rationing rules if applicable.",
            "Recycle and reuse water when possible.",
        ],
        emergency_number: "181",
        severity: Severity::Medium,
        precaution: "Conserve water and educate family/community about water-saving habits.",
    },
];
