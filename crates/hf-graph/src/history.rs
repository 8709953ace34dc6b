//! Per-element change history.

use std::collections::BTreeMap;

use hf_core::Real;
use tracing::warn;

use crate::element::Element;

/// Records selected attributes of one element each time its state is fixed.
///
/// Attribute names the element does not expose are reported once and then
/// skipped; the other attributes keep recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryRecorder {
    attributes: Vec<String>,
    history: BTreeMap<String, Vec<Real>>,
    missing: Vec<String>,
}

impl HistoryRecorder {
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        let mut seen = Vec::with_capacity(attributes.len());
        attributes.retain(|a| {
            if seen.contains(a) {
                false
            } else {
                seen.push(a.clone());
                true
            }
        });
        let mut recorder = Self {
            attributes,
            ..Self::default()
        };
        recorder.reset();
        recorder
    }

    /// Tracked attribute names, in registration order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Clear every recorded series.
    pub fn reset(&mut self) {
        self.history = self
            .attributes
            .iter()
            .map(|a| (a.clone(), Vec::new()))
            .collect();
    }

    /// Append the element's current value of every tracked attribute.
    pub fn fix(&mut self, element: &Element) {
        for attribute in &self.attributes {
            match element.attribute(attribute) {
                Some(value) => {
                    self.history.entry(attribute.clone()).or_default().push(value);
                }
                None => {
                    if !self.missing.contains(attribute) {
                        warn!(
                            element = element.name(),
                            attribute = attribute.as_str(),
                            "element has no such attribute"
                        );
                        self.missing.push(attribute.clone());
                    }
                }
            }
        }
    }

    /// Attribute name to the values observed at each fixation.
    pub fn history(&self) -> &BTreeMap<String, Vec<Real>> {
        &self.history
    }

    pub fn series(&self, attribute: &str) -> Option<&[Real]> {
        self.history.get(attribute).map(Vec::as_slice)
    }

    /// Tracked attributes that could not be read.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_appends_one_value_per_attribute() {
        let mut recorder = HistoryRecorder::new(["q", "H_in"]);
        let mut nozzle = Element::sink("nozzle").with_flow(2.0).with_inlet_head(30.0);

        recorder.fix(&nozzle);
        nozzle.q = 2.5;
        recorder.fix(&nozzle);

        assert_eq!(recorder.series("q"), Some(&[2.0, 2.5][..]));
        assert_eq!(recorder.series("H_in"), Some(&[30.0, 30.0][..]));
    }

    #[test]
    fn reset_clears_but_keeps_attributes() {
        let mut recorder = HistoryRecorder::new(["q"]);
        recorder.fix(&Element::link("hose"));
        recorder.reset();
        assert_eq!(recorder.series("q"), Some(&[][..]));
        assert_eq!(recorder.attributes(), &["q".to_string()]);
    }

    #[test]
    fn missing_attribute_is_reported_once_and_others_continue() {
        let mut recorder = HistoryRecorder::new(["pressure", "q"]);
        let hose = Element::link("hose");
        recorder.fix(&hose);
        recorder.fix(&hose);

        assert_eq!(recorder.missing(), &["pressure".to_string()]);
        assert_eq!(recorder.series("q").map(<[Real]>::len), Some(2));
        assert_eq!(recorder.series("pressure"), Some(&[][..]));
    }

    #[test]
    fn duplicate_attributes_are_tracked_once() {
        let recorder = HistoryRecorder::new(["q", "q", "h"]);
        assert_eq!(recorder.attributes().len(), 2);
    }
}
