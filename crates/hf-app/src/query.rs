//! Query helpers for extracting data from loaded runs.

use std::fmt::Write as _;

use hf_results::{ElementRecord, HistoryRecord};

use crate::error::{AppError, AppResult};

/// Observed element ids, in first-seen order.
pub fn list_observed_elements(history: &[HistoryRecord]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for record in history {
        if !ids.contains(&record.element_id) {
            ids.push(record.element_id.clone());
        }
    }
    ids
}

/// Attributes recorded for an element.
pub fn list_attributes(history: &[HistoryRecord], element_id: &str) -> Vec<String> {
    history
        .iter()
        .filter(|r| r.element_id == element_id)
        .map(|r| r.attribute.clone())
        .collect()
}

/// Values of one attribute, as `(iteration, value)` with 1-based iterations.
pub fn extract_series(
    history: &[HistoryRecord],
    element_id: &str,
    attribute: &str,
) -> AppResult<Vec<(usize, f64)>> {
    if !history.iter().any(|r| r.element_id == element_id) {
        return Err(AppError::ElementNotFound(format!(
            "{} has no recorded history",
            element_id
        )));
    }
    let record = history
        .iter()
        .find(|r| r.element_id == element_id && r.attribute == attribute)
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Attribute '{}' was not recorded for {}",
                attribute, element_id
            ))
        })?;

    Ok(record
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i + 1, v))
        .collect())
}

/// Render a series as CSV with an `iteration,value` header.
pub fn series_to_csv(series: &[(usize, f64)]) -> String {
    let mut out = String::from("iteration,value\n");
    for (iteration, value) in series {
        // writing to a String cannot fail
        let _ = writeln!(out, "{},{}", iteration, value);
    }
    out
}

/// Find the final state of one element.
pub fn find_element<'a>(
    elements: &'a [ElementRecord],
    element_id: &str,
) -> AppResult<&'a ElementRecord> {
    elements
        .iter()
        .find(|e| e.element_id == element_id)
        .ok_or_else(|| AppError::ElementNotFound(element_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<HistoryRecord> {
        vec![
            HistoryRecord {
                element_id: "nozzle".into(),
                attribute: "q".into(),
                values: vec![10.1, 9.2, 8.5],
            },
            HistoryRecord {
                element_id: "nozzle".into(),
                attribute: "H_in".into(),
                values: vec![75.0, 61.0, 52.0],
            },
            HistoryRecord {
                element_id: "pump".into(),
                attribute: "q".into(),
                values: vec![3.7, 10.1, 9.2],
            },
        ]
    }

    #[test]
    fn observed_elements_keep_order() {
        assert_eq!(list_observed_elements(&history()), vec!["nozzle", "pump"]);
        assert_eq!(list_attributes(&history(), "nozzle"), vec!["q", "H_in"]);
    }

    #[test]
    fn series_is_numbered_from_one() {
        let series = extract_series(&history(), "nozzle", "q").unwrap();
        assert_eq!(series, vec![(1, 10.1), (2, 9.2), (3, 8.5)]);
    }

    #[test]
    fn unknown_element_and_attribute_are_distinguished() {
        assert!(matches!(
            extract_series(&history(), "hose", "q"),
            Err(AppError::ElementNotFound(_))
        ));
        assert!(matches!(
            extract_series(&history(), "pump", "H_in"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn csv_has_header_and_rows() {
        let csv = series_to_csv(&[(1, 2.5), (2, 3.0)]);
        assert_eq!(csv, "iteration,value\n1,2.5\n2,3\n");
    }
}
