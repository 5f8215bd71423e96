//! Maps a raw predicted label onto its advisory, with a fixed fallback.

use tracing::warn;

use crate::catalog::{Advisory, AdvisoryCatalog, Severity};

// ---

/// Returned for any label the catalog does not know.
pub static FALLBACK_ADVISORY: Advisory = Advisory {
    event_label: "N/A",
    recommendations: &["No recommendation available."],
    emergency_number: "N/A",
    severity: Severity::NotRated,
    precaution: "N/A",
};

/// Whether a resolution came from the catalog or from the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Known,
    Fallback,
}

#[derive(Debug, Clone, Copy)]
pub struct LabelResolver<'a> {
    catalog: &'a AdvisoryCatalog,
}

impl<'a> LabelResolver<'a> {
    pub fn new(catalog: &'a AdvisoryCatalog) -> Self {
        Self { catalog }
    }

    /// Advisory for `label`, or [`FALLBACK_ADVISORY`] when the label is not
    /// catalogued. Never fails.
    pub fn resolve(&self, label: &str) -> &'static Advisory {
        self.resolve_with_status(label).0
    }

    /// Like [`resolve`](Self::resolve) but also reports whether the fallback
    /// was used.
    ///
    /// A miss means the classifier and the catalog disagree on the label set,
    /// so it is logged at `warn` even though the caller still gets a
    /// renderable result.
    pub fn resolve_with_status(&self, label: &str) -> (&'static Advisory, Resolution) {
        // ---
        match self.catalog.get(label) {
            Some(advisory) => (advisory, Resolution::Known),
            None => {
                warn!(label, "predicted label has no advisory, using fallback");
                (&FALLBACK_ADVISORY, Resolution::Fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_every_catalog_label_resolves_to_its_record() {
        // ---
        let catalog = AdvisoryCatalog::new();
        let resolver = LabelResolver::new(&catalog);

        for label in catalog.labels() {
            let (advisory, status) = resolver.resolve_with_status(label);
            assert_eq!(status, Resolution::Known);
            assert_eq!(advisory, catalog.get(label).unwrap());
            assert_eq!(advisory.event_label, label);
        }
    }

    #[test]
    fn test_cyclone_resolves_to_published_advisory() {
        // ---
        let catalog = AdvisoryCatalog::new();
        let resolver = LabelResolver::new(&catalog);

        let advisory = resolver.resolve("cyclone");
        assert_eq!(advisory.event_label, "cyclone");
        assert_eq!(
            advisory.recommendations,
            [
                "Seek shelter indoors and secure loose objects.",
                "Stock food, water, and emergency supplies.",
                "Avoid traveling during heavy winds.",
                "Stay tuned to local alerts and warnings.",
                "Have an evacuation plan ready.",
            ]
        );
        assert_eq!(advisory.emergency_number, "108");
        assert_eq!(advisory.severity.as_str(), "High");
        assert_eq!(advisory.precaution, "Avoid low-lying areas and coastal regions.");
    }

    #[test]
    fn test_unknown_label_gets_fallback() {
        // ---
        let catalog = AdvisoryCatalog::new();
        let resolver = LabelResolver::new(&catalog);

        let (advisory, status) = resolver.resolve_with_status("unknown-event");
        assert_eq!(status, Resolution::Fallback);
        assert_eq!(advisory.recommendations, ["No recommendation available."]);
        assert_eq!(advisory.emergency_number, "N/A");
        assert_eq!(advisory.severity.as_str(), "N/A");
        assert_eq!(advisory.precaution, "N/A");
    }

    #[test]
    fn test_capitalized_label_does_not_match() {
        // ---
        let catalog = AdvisoryCatalog::new();
        let resolver = LabelResolver::new(&catalog);

        assert_eq!(resolver.resolve("Accident"), &FALLBACK_ADVISORY);
        assert_ne!(resolver.resolve("accident"), &FALLBACK_ADVISORY);
    }

    #[test]
    fn test_empty_label_gets_fallback() {
        // ---
        let catalog = AdvisoryCatalog::new();
        let resolver = LabelResolver::new(&catalog);
        assert_eq!(resolver.resolve(""), &FALLBACK_ADVISORY);
    }
}
