//! Response Validator — the gate between untrusted model output and the renderer.
//!
//! # Contract
//! - Top level is an object carrying `total_cost`, `notes`, `parts`,
//!   `performance_benchmarks` and `compatibility_matrix` (null counts as missing).
//! - `parts` is an array (possibly empty); every part carries all five part fields and a
//!   readable price.
//! - Benchmarks and the compatibility matrix carry their fixed sub-keys.
//!
//! Price reconciliation is advisory only: a mismatch between summed part prices and
//! `total_cost` is recorded in `advisories` and appended to `notes`, never rejected.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::money::{format_inr, parse_amount, CURRENCY};
use crate::preferences::FormFactor;
use crate::recommendation::models::{
    CompatibilityMatrix, Part, PerformanceBenchmarks, RecommendationResponse,
};

pub const REQUIRED_FIELDS: [&str; 5] = [
    "total_cost",
    "notes",
    "parts",
    "performance_benchmarks",
    "compatibility_matrix",
];

const PART_FIELDS: [&str; 5] = ["type", "name", "price", "specs", "reason"];

/// Price drift under this many rupees is never worth flagging.
const MIN_ABSOLUTE_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("part {index} is malformed: {reason}")]
    MalformedPart { index: usize, reason: String },

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

/// Request-specific knobs for validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidationPolicy {
    pub form_factor: FormFactor,
    /// Allowed drift between summed part prices and `total_cost`, as a fraction of the total.
    pub price_tolerance: f64,
}

pub fn validate(
    parsed: &Value,
    policy: &ValidationPolicy,
) -> Result<RecommendationResponse, ValidationError> {
    let root = parsed.as_object().ok_or(ValidationError::WrongType {
        field: "response".to_string(),
        expected: "a JSON object",
    })?;

    for key in REQUIRED_FIELDS {
        require(root, key, key)?;
    }

    let total_cost = amount(&root["total_cost"]).ok_or(ValidationError::WrongType {
        field: "total_cost".to_string(),
        expected: "a non-negative amount",
    })?;

    let notes = text(&root["notes"]).ok_or(ValidationError::WrongType {
        field: "notes".to_string(),
        expected: "a string",
    })?;

    let parts = root["parts"]
        .as_array()
        .ok_or(ValidationError::WrongType {
            field: "parts".to_string(),
            expected: "an array",
        })?
        .iter()
        .enumerate()
        .map(|(index, value)| validate_part(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    let benchmarks = object(root, "performance_benchmarks")?;
    let performance_benchmarks = PerformanceBenchmarks {
        gaming_1080p: sub_text(benchmarks, "performance_benchmarks", "gaming_1080p")?,
        gaming_1440p: sub_text(benchmarks, "performance_benchmarks", "gaming_1440p")?,
        productivity_score: sub_text(benchmarks, "performance_benchmarks", "productivity_score")?,
    };

    let matrix = object(root, "compatibility_matrix")?;
    let compatibility_matrix = CompatibilityMatrix {
        cpu_motherboard: sub_text(matrix, "compatibility_matrix", "cpu_motherboard")?,
        ram_motherboard: sub_text(matrix, "compatibility_matrix", "ram_motherboard")?,
        gpu_case: sub_text(matrix, "compatibility_matrix", "gpu_case")?,
        psu_wattage: sub_text(matrix, "compatibility_matrix", "psu_wattage")?,
    };

    let mut advisories = Vec::new();
    let parts_total = reconcile(total_cost, &parts, policy, &mut advisories);
    if policy.form_factor == FormFactor::Laptop && parts.len() > 1 {
        advisories.push(format!(
            "Shape check: expected a single laptop line item but received {} parts.",
            parts.len()
        ));
    }
    for advisory in &advisories {
        warn!("Recommendation advisory: {advisory}");
    }

    Ok(RecommendationResponse {
        total_cost,
        currency: CURRENCY,
        notes: annotate(notes, &advisories),
        parts,
        parts_total,
        performance_benchmarks,
        compatibility_matrix,
        advisories,
    })
}

fn validate_part(index: usize, value: &Value) -> Result<Part, ValidationError> {
    let malformed = |reason: String| ValidationError::MalformedPart { index, reason };

    let fields = value
        .as_object()
        .ok_or_else(|| malformed("expected an object".to_string()))?;

    for field in PART_FIELDS {
        if fields.get(field).map_or(true, Value::is_null) {
            return Err(malformed(format!("missing '{field}'")));
        }
    }

    let part_text = |field: &str| {
        text(&fields[field]).ok_or_else(|| malformed(format!("'{field}' must be text")))
    };

    let price = amount(&fields["price"])
        .ok_or_else(|| malformed(format!("unreadable price {}", fields["price"])))?;

    Ok(Part {
        part_type: part_text("type")?,
        name: part_text("name")?,
        price,
        specs: part_text("specs")?,
        reason: part_text("reason")?,
    })
}

/// Sums part prices and records an advisory when they drift from the declared total.
fn reconcile(
    total_cost: f64,
    parts: &[Part],
    policy: &ValidationPolicy,
    advisories: &mut Vec<String>,
) -> Option<f64> {
    if parts.is_empty() {
        return None;
    }

    let sum: f64 = parts.iter().map(|p| p.price).sum();
    let allowed = (total_cost * policy.price_tolerance).max(MIN_ABSOLUTE_TOLERANCE);
    let difference = (sum - total_cost).abs();

    if difference > allowed {
        advisories.push(format!(
            "Price check: listed part prices add up to {} but total_cost is {} (difference {}).",
            format_inr(sum),
            format_inr(total_cost),
            format_inr(difference)
        ));
    }

    Some(sum)
}

fn annotate(notes: String, advisories: &[String]) -> String {
    if advisories.is_empty() {
        notes
    } else if notes.trim().is_empty() {
        advisories.join("\n")
    } else {
        format!("{notes}\n\n{}", advisories.join("\n"))
    }
}

fn require<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value, ValidationError> {
    map.get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ValidationError::MissingField(path.to_string()))
}

fn object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    root[key].as_object().ok_or(ValidationError::WrongType {
        field: key.to_string(),
        expected: "an object",
    })
}

fn sub_text(map: &Map<String, Value>, parent: &str, key: &str) -> Result<String, ValidationError> {
    let path = format!("{parent}.{key}");
    let value = require(map, key, &path)?;
    text(value).ok_or(ValidationError::WrongType {
        field: path,
        expected: "a string",
    })
}

/// Strings pass through; numbers and booleans are stringified. Arrays and objects are rejected.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v >= 0.0),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DESKTOP: ValidationPolicy = ValidationPolicy {
        form_factor: FormFactor::Desktop,
        price_tolerance: 0.02,
    };

    const LAPTOP: ValidationPolicy = ValidationPolicy {
        form_factor: FormFactor::Laptop,
        price_tolerance: 0.02,
    };

    fn minimal() -> Value {
        json!({
            "total_cost": 0,
            "notes": "No build fits ₹15,000 with a discrete GPU.",
            "parts": [],
            "performance_benchmarks": {
                "gaming_1080p": "N/A",
                "gaming_1440p": "N/A",
                "productivity_score": "N/A"
            },
            "compatibility_matrix": {
                "cpu_motherboard": "N/A",
                "ram_motherboard": "N/A",
                "gpu_case": "N/A",
                "psu_wattage": "N/A"
            }
        })
    }

    fn part(part_type: &str, name: &str, price: Value) -> Value {
        json!({
            "type": part_type,
            "name": name,
            "price": price,
            "specs": "specs",
            "reason": "value for money"
        })
    }

    fn desktop_build(total: Value) -> Value {
        let mut doc = minimal();
        doc["total_cost"] = total;
        doc["notes"] = json!("Balanced 1080p build.");
        doc["parts"] = json!([
            part("CPU", "Ryzen 5 7600", json!(18500)),
            part("GPU", "RTX 4060", json!("₹30,000")),
            part("Motherboard", "B650M", json!(14000)),
            part("RAM", "32GB DDR5", json!(9500)),
        ]);
        doc
    }

    #[test]
    fn test_minimal_document_with_empty_parts_is_valid() {
        let response = validate(&minimal(), &DESKTOP).unwrap();
        assert!(response.parts.is_empty());
        assert_eq!(response.parts_total, None);
        assert!(response.advisories.is_empty());
        assert_eq!(response.currency, "INR");
        assert_eq!(response.notes, "No build fits ₹15,000 with a discrete GPU.");
    }

    #[test]
    fn test_each_required_field_is_enforced() {
        for key in REQUIRED_FIELDS {
            let mut doc = minimal();
            doc.as_object_mut().unwrap().remove(key);
            assert_eq!(
                validate(&doc, &DESKTOP),
                Err(ValidationError::MissingField(key.to_string()))
            );
        }
    }

    #[test]
    fn test_missing_performance_benchmarks() {
        let mut doc = desktop_build(json!(72000));
        doc.as_object_mut().unwrap().remove("performance_benchmarks");
        assert!(matches!(
            validate(&doc, &DESKTOP),
            Err(ValidationError::MissingField(ref f)) if f == "performance_benchmarks"
        ));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut doc = minimal();
        doc["notes"] = Value::Null;
        assert_eq!(
            validate(&doc, &DESKTOP),
            Err(ValidationError::MissingField("notes".to_string()))
        );
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(matches!(
            validate(&json!(["not", "an", "object"]), &DESKTOP),
            Err(ValidationError::WrongType { .. })
        ));
    }

    #[test]
    fn test_parts_must_be_an_array() {
        let mut doc = minimal();
        doc["parts"] = json!({"CPU": "Ryzen 5"});
        assert_eq!(
            validate(&doc, &DESKTOP),
            Err(ValidationError::WrongType {
                field: "parts".to_string(),
                expected: "an array"
            })
        );
    }

    #[test]
    fn test_part_missing_price_is_malformed_at_index() {
        let mut doc = desktop_build(json!(72000));
        doc["parts"][2].as_object_mut().unwrap().remove("price");
        assert!(matches!(
            validate(&doc, &DESKTOP),
            Err(ValidationError::MalformedPart { index: 2, ref reason }) if reason.contains("price")
        ));
    }

    #[test]
    fn test_part_missing_name_is_malformed() {
        let mut doc = desktop_build(json!(72000));
        doc["parts"][0].as_object_mut().unwrap().remove("name");
        assert!(matches!(
            validate(&doc, &DESKTOP),
            Err(ValidationError::MalformedPart { index: 0, .. })
        ));
    }

    #[test]
    fn test_part_missing_reason_is_malformed() {
        let mut doc = desktop_build(json!(72000));
        doc["parts"][3].as_object_mut().unwrap().remove("reason");
        assert!(matches!(
            validate(&doc, &DESKTOP),
            Err(ValidationError::MalformedPart { index: 3, .. })
        ));
    }

    #[test]
    fn test_unreadable_price_is_malformed() {
        let mut doc = desktop_build(json!(72000));
        doc["parts"][1]["price"] = json!("around thirty thousand");
        assert!(matches!(
            validate(&doc, &DESKTOP),
            Err(ValidationError::MalformedPart { index: 1, .. })
        ));
    }

    #[test]
    fn test_currency_string_prices_are_normalised() {
        let response = validate(&desktop_build(json!("₹72,000")), &DESKTOP).unwrap();
        assert_eq!(response.total_cost, 72000.0);
        assert_eq!(response.parts[1].price, 30000.0);
        assert_eq!(response.parts_total, Some(72000.0));
        assert!(response.advisories.is_empty());
        assert_eq!(response.notes, "Balanced 1080p build.");
    }

    #[test]
    fn test_parts_keep_model_order() {
        let response = validate(&desktop_build(json!(72000)), &DESKTOP).unwrap();
        let types: Vec<&str> = response.parts.iter().map(|p| p.part_type.as_str()).collect();
        assert_eq!(types, ["CPU", "GPU", "Motherboard", "RAM"]);
    }

    #[test]
    fn test_small_drift_within_tolerance_is_silent() {
        // 72000 vs 73000 is ~1.4%, inside the 2% tolerance
        let response = validate(&desktop_build(json!(73000)), &DESKTOP).unwrap();
        assert!(response.advisories.is_empty());
    }

    #[test]
    fn test_price_mismatch_is_advisory_not_error() {
        let response = validate(&desktop_build(json!(80000)), &DESKTOP).unwrap();
        assert_eq!(response.total_cost, 80000.0);
        assert_eq!(response.parts_total, Some(72000.0));
        assert_eq!(response.advisories.len(), 1);
        assert!(response.advisories[0].contains("₹72,000"));
        assert!(response.advisories[0].contains("₹80,000"));
        assert!(response.notes.starts_with("Balanced 1080p build."));
        assert!(response.notes.contains("Price check"));
    }

    #[test]
    fn test_laptop_single_item_reconciles() {
        let mut doc = minimal();
        doc["total_cost"] = json!(58990);
        doc["parts"] = json!([part("Laptop", "Vivobook 16", json!(58990))]);
        let response = validate(&doc, &LAPTOP).unwrap();
        assert_eq!(response.parts_total, Some(58990.0));
        assert!(response.advisories.is_empty());
    }

    #[test]
    fn test_laptop_with_breakdown_gets_shape_advisory() {
        let response = validate(&desktop_build(json!(72000)), &LAPTOP).unwrap();
        assert_eq!(response.advisories.len(), 1);
        assert!(response.advisories[0].contains("single laptop line item"));
    }

    #[test]
    fn test_missing_benchmark_sub_key() {
        let mut doc = minimal();
        doc["performance_benchmarks"]
            .as_object_mut()
            .unwrap()
            .remove("gaming_1440p");
        assert_eq!(
            validate(&doc, &DESKTOP),
            Err(ValidationError::MissingField(
                "performance_benchmarks.gaming_1440p".to_string()
            ))
        );
    }

    #[test]
    fn test_missing_compatibility_sub_key() {
        let mut doc = minimal();
        doc["compatibility_matrix"]
            .as_object_mut()
            .unwrap()
            .remove("psu_wattage");
        assert_eq!(
            validate(&doc, &DESKTOP),
            Err(ValidationError::MissingField(
                "compatibility_matrix.psu_wattage".to_string()
            ))
        );
    }

    #[test]
    fn test_numeric_benchmark_is_stringified() {
        let mut doc = minimal();
        doc["performance_benchmarks"]["gaming_1080p"] = json!(144);
        let response = validate(&doc, &DESKTOP).unwrap();
        assert_eq!(response.performance_benchmarks.gaming_1080p, "144");
    }

    #[test]
    fn test_serialized_response_keeps_schema_keys() {
        let response = validate(&desktop_build(json!(72000)), &DESKTOP).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        for key in REQUIRED_FIELDS {
            assert!(value.get(key).is_some(), "{key} missing from output");
        }
        assert_eq!(value["parts"][0]["type"], "CPU");
        assert!(value.get("advisories").is_none());
    }
}
