//! Fire hose resistance catalog.
//!
//! Resistances are per section, for flow in l/s and head loss in meters.
//! Rubberised hoses up to 150 mm come in 20 m sections, larger ones in 100 m
//! sections.

use hf_core::{Length, Real, m, mm};

use crate::error::{ComponentError, ComponentResult};

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoseSpec {
    /// Short lookup key, e.g. `"51"` or `"77u"`.
    pub kind: &'static str,
    pub description: &'static str,
    /// Resistance of one section.
    pub resistance: Real,
    diameter_mm: Real,
    section_m: Real,
}

impl HoseSpec {
    const fn new(
        kind: &'static str,
        description: &'static str,
        diameter_mm: Real,
        section_m: Real,
        resistance: Real,
    ) -> Self {
        Self {
            kind,
            description,
            resistance,
            diameter_mm,
            section_m,
        }
    }

    pub fn diameter(&self) -> Length {
        mm(self.diameter_mm)
    }

    pub fn section_length(&self) -> Length {
        m(self.section_m)
    }

    /// Resistance of one meter of hose.
    pub fn resistance_per_meter(&self) -> Real {
        self.resistance / self.section_m
    }
}

// 225 mm is listed at 0.000184, above the 200 mm value; kept as published.
pub static HOSES: [HoseSpec; 15] = [
    HoseSpec::new("38", "Rubberised pressure hose 38 mm (20 m)", 38.0, 20.0, 0.34),
    HoseSpec::new("51", "Rubberised pressure hose 51 mm (20 m)", 51.0, 20.0, 0.13),
    HoseSpec::new("66", "Rubberised pressure hose 66 mm (20 m)", 66.0, 20.0, 0.034),
    HoseSpec::new("77", "Rubberised pressure hose 77 mm (20 m)", 77.0, 20.0, 0.015),
    HoseSpec::new("89", "Rubberised pressure hose 89 mm (20 m)", 89.0, 20.0, 0.0035),
    HoseSpec::new("110", "Rubberised pressure hose 110 mm (20 m)", 110.0, 20.0, 0.002),
    HoseSpec::new("150", "Rubberised pressure hose 150 mm (20 m)", 150.0, 20.0, 0.00046),
    HoseSpec::new("200", "Rubberised pressure hose 200 mm (100 m)", 200.0, 100.0, 0.00006),
    HoseSpec::new("225", "Rubberised pressure hose 225 mm (100 m)", 225.0, 100.0, 0.000184),
    HoseSpec::new("250", "Rubberised pressure hose 250 mm (100 m)", 250.0, 100.0, 0.0000136),
    HoseSpec::new("300", "Rubberised pressure hose 300 mm (100 m)", 300.0, 100.0, 0.0000056),
    HoseSpec::new("38dc", "Double-coated pressure hose 38 mm (20 m)", 38.0, 20.0, 0.51),
    HoseSpec::new("51u", "Unlined pressure hose 51 mm (20 m)", 51.0, 20.0, 0.03),
    HoseSpec::new("66u", "Unlined pressure hose 66 mm (20 m)", 66.0, 20.0, 0.077),
    HoseSpec::new("77u", "Unlined pressure hose 77 mm (20 m)", 77.0, 20.0, 0.24),
];

/// Look up a hose by its short kind.
pub fn lookup(kind: &str) -> ComponentResult<&'static HoseSpec> {
    HOSES
        .iter()
        .find(|h| h.kind == kind)
        .ok_or_else(|| ComponentError::UnknownHose {
            kind: kind.to_string(),
        })
}

pub fn by_description(description: &str) -> Option<&'static HoseSpec> {
    HOSES.iter().find(|h| h.description == description)
}

pub fn kinds() -> impl Iterator<Item = &'static str> {
    HOSES.iter().map(|h| h.kind)
}
