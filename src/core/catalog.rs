//! Predefined failure-mode distributions per component type
//!
//! Each entry gives the share (percent of the component failure rate) that a
//! typical failure mode of that part family takes. Shares per family do not
//! sum to 100; the remainder is treated as safe/no-effect.

/// One predefined failure mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    pub description: &'static str,
    /// Percent of the component failure rate
    pub share: f64,
    pub system_effect: &'static str,
}

const fn entry(description: &'static str, share: f64, system_effect: &'static str) -> CatalogEntry {
    CatalogEntry {
        description,
        share,
        system_effect,
    }
}

/// Component families and their failure-mode distributions
pub const CATALOG: &[(&str, &[CatalogEntry])] = &[
    (
        "Resistor",
        &[
            entry("Open circuit", 10.0, "Loss of function"),
            entry("Short circuit", 5.0, "Overcurrent/overheating"),
        ],
    ),
    (
        "Capacitor",
        &[
            entry("Open circuit", 15.0, "Loss of filtering/decoupling"),
            entry("Short circuit", 8.0, "Overcurrent/overheating"),
        ],
    ),
    (
        "Inductor",
        &[
            entry("Open circuit", 12.0, "Loss of filtering"),
            entry("Short circuit", 6.0, "Overcurrent/overheating"),
        ],
    ),
    (
        "Diodes",
        &[
            entry("Open circuit", 20.0, "Loss of rectification/protection"),
            entry("Short circuit", 10.0, "Overcurrent/overheating"),
        ],
    ),
    (
        "Transistor/transistor like",
        &[
            entry("Pin open circuit", 25.0, "Loss of switching/amplification"),
            entry("Pin to pin short circuit", 15.0, "Malfunction"),
            entry("Pin to GND short circuit", 12.0, "Loss of function"),
            entry("Pin to VCC short circuit", 12.0, "Overcurrent/overheating"),
        ],
    ),
    (
        "IC",
        &[
            entry("Pin open circuit", 30.0, "Loss of function"),
            entry("Pin to pin short circuit", 20.0, "Malfunction"),
            entry("Pin to GND short circuit", 15.0, "Loss of function"),
            entry("Pin to VCC short circuit", 15.0, "Overcurrent/overheating"),
        ],
    ),
    (
        "Relays, contactors",
        &[
            entry("Stuck close", 35.0, "Continuous operation"),
            entry("Stuck open", 35.0, "Loss of switching"),
        ],
    ),
    (
        "Transformer",
        &[
            entry("Pin open circuit", 18.0, "Loss of isolation/transformation"),
            entry("Pin to pin short circuit", 12.0, "Malfunction"),
            entry("Pin to GND short circuit", 10.0, "Loss of isolation"),
            entry("Pin to VCC short circuit", 10.0, "Overcurrent/overheating"),
        ],
    ),
    (
        "Thermistor",
        &[
            entry("Open circuit", 22.0, "Loss of temperature sensing"),
            entry("Short circuit", 11.0, "False temperature reading"),
            entry("Resistance drift", 8.0, "Inaccurate temperature reading"),
        ],
    ),
    (
        "Crystals",
        &[
            entry("Open circuit", 28.0, "Loss of clock signal"),
            entry("Short circuit", 14.0, "Clock malfunction"),
            entry("Frequency drift", 10.0, "Inaccurate timing"),
        ],
    ),
    ("Other", &[]),
];

/// Find the distribution for a component type (case-insensitive)
pub fn lookup(component_type: &str) -> Option<&'static [CatalogEntry]> {
    let wanted = component_type.trim();
    CATALOG
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(_, entries)| *entries)
}

/// Canonical spelling of a catalog type, if known
pub fn canonical_type(component_type: &str) -> Option<&'static str> {
    let wanted = component_type.trim();
    CATALOG
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(name, _)| *name)
}

/// All known component types, in catalog order
pub fn component_types() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("ic").unwrap().len(), 4);
        assert_eq!(lookup(" Crystals ").unwrap().len(), 3);
        assert!(lookup("Fuse").is_none());
    }

    #[test]
    fn test_other_has_no_entries() {
        assert!(lookup("Other").unwrap().is_empty());
    }

    #[test]
    fn test_canonical_type() {
        assert_eq!(canonical_type("relays, CONTACTORS"), Some("Relays, contactors"));
        assert_eq!(canonical_type("unknown"), None);
    }

    #[test]
    fn test_shares_are_percentages() {
        for (name, entries) in CATALOG {
            let total: f64 = entries.iter().map(|e| e.share).sum();
            assert!(total <= 100.0, "{} shares exceed 100%", name);
        }
        assert_eq!(component_types().count(), 11);
    }
}
