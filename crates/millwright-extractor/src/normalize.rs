//! Response normalization
//!
//! Turns an arbitrarily-shaped model response into a canonical asset list.
//! Nothing here ever fails the caller: unparseable output, unexpected
//! shapes, and invalid records all degrade to fewer (or zero) assets,
//! logged for audit.

use millwright_domain::AssetRecord;
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of normalizing one raw model response
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Records that passed validation, in response order
    pub assets: Vec<AssetRecord>,
    /// Candidates dropped for failing validation (counted, not errors)
    pub dropped: usize,
}

impl Normalized {
    fn empty() -> Self {
        Self {
            assets: Vec::new(),
            dropped: 0,
        }
    }
}

/// Normalize a raw model response into validated asset records.
///
/// Accepted shapes, in order of recognition:
/// 1. an object with an `assets` key — its value is the candidate list
/// 2. an object with an `asset_type` key — a single-element candidate list
/// 3. a bare array — used as-is
///
/// Everything else (including parse failures and the literal `{}`) yields
/// an empty list. Each candidate must be an object with a non-empty
/// `asset_type`; failures are dropped silently and counted.
pub fn normalize_response(raw: &str) -> Normalized {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed == "{}" {
        debug!("model returned empty response");
        return Normalized::empty();
    }

    let payload = strip_code_fence(trimmed);

    let value: Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "model response is not valid JSON, discarding");
            return Normalized::empty();
        }
    };

    let candidates: Vec<Value> = match value {
        Value::Object(ref obj) => {
            if let Some(assets) = obj.get("assets") {
                match assets {
                    Value::Array(items) => items.clone(),
                    other => {
                        warn!(
                            shape = other_type_name(other),
                            "'assets' value is not an array, discarding"
                        );
                        Vec::new()
                    }
                }
            } else if obj.contains_key("asset_type") {
                // Single record emitted bare; wrap it
                vec![value.clone()]
            } else {
                warn!("object response has neither 'assets' nor 'asset_type', discarding");
                Vec::new()
            }
        }
        Value::Array(items) => items,
        other => {
            warn!(shape = other_type_name(&other), "unusable response shape");
            Vec::new()
        }
    };

    let total = candidates.len();
    let mut assets = Vec::with_capacity(total);
    let mut dropped = 0usize;

    for candidate in candidates {
        if !candidate.is_object() {
            dropped += 1;
            continue;
        }
        match serde_json::from_value::<AssetRecord>(candidate) {
            Ok(record) if record.validate().is_ok() => assets.push(record),
            _ => dropped += 1,
        }
    }

    debug!(total, valid = assets.len(), dropped, "normalized model response");

    Normalized { assets, dropped }
}

/// Strip a surrounding markdown code fence, if present.
///
/// Models in JSON mode usually emit bare JSON, but fenced output still
/// shows up often enough to be worth tolerating.
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let inner = match trimmed.find('\n') {
        Some(pos) => &trimmed[pos + 1..],
        None => return trimmed,
    };
    inner.trim_end().trim_end_matches("```").trim()
}

fn other_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use millwright_domain::Scalar;

    #[test]
    fn test_empty_and_empty_object_yield_no_assets() {
        assert_eq!(normalize_response(""), Normalized::empty());
        assert_eq!(normalize_response("   "), Normalized::empty());
        assert_eq!(normalize_response("{}"), Normalized::empty());
    }

    #[test]
    fn test_parse_failure_yields_no_assets() {
        let result = normalize_response("not json at all");
        assert!(result.assets.is_empty());
    }

    #[test]
    fn test_assets_object_shape() {
        let raw = r#"{"assets": [{"asset_type": "boiler", "capacity_value": "500", "capacity_unit": "kW"}]}"#;
        let result = normalize_response(raw);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].asset_type, "boiler");
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_single_object_shape() {
        let raw = r#"{"asset_type": "pump", "capacity_value": 75}"#;
        let result = normalize_response(raw);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].capacity_value, Some(Scalar::Number(75.0)));
    }

    #[test]
    fn test_bare_array_shape() {
        let raw = r#"[{"asset_type": "transformer"}, {"asset_type": "chiller"}]"#;
        let result = normalize_response(raw);
        assert_eq!(result.assets.len(), 2);
    }

    #[test]
    fn test_three_shapes_equivalent() {
        let wrapped = normalize_response(r#"{"assets": [{"asset_type": "pump"}]}"#);
        let single = normalize_response(r#"{"asset_type": "pump"}"#);
        let bare = normalize_response(r#"[{"asset_type": "pump"}]"#);
        assert_eq!(wrapped.assets, single.assets);
        assert_eq!(single.assets, bare.assets);
    }

    #[test]
    fn test_missing_asset_type_dropped_and_counted() {
        let raw = r#"{"assets": [
            {"asset_type": "boiler"},
            {"capacity_value": "500"},
            {"asset_type": ""},
            "not an object"
        ]}"#;
        let result = normalize_response(raw);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.dropped, 3);
    }

    #[test]
    fn test_object_without_recognized_keys() {
        let raw = r#"{"message": "I could not find any assets"}"#;
        let result = normalize_response(raw);
        assert!(result.assets.is_empty());
    }

    #[test]
    fn test_scalar_root_is_unusable() {
        assert!(normalize_response("42").assets.is_empty());
        assert!(normalize_response(r#""just a string""#).assets.is_empty());
    }

    #[test]
    fn test_assets_key_with_non_array_value() {
        let raw = r#"{"assets": "none"}"#;
        let result = normalize_response(raw);
        assert!(result.assets.is_empty());
    }

    #[test]
    fn test_markdown_fence_tolerated() {
        let raw = "```json\n{\"assets\": [{\"asset_type\": \"generator\"}]}\n```";
        let result = normalize_response(raw);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].asset_type, "generator");
    }

    #[test]
    fn test_round_trip_preserves_valid_records() {
        let original = vec![
            millwright_domain::AssetRecord {
                asset_type: "boiler".to_string(),
                capacity_value: Some("500".into()),
                capacity_unit: Some("kW".to_string()),
                count_of_units: Some("1".into()),
            },
            millwright_domain::AssetRecord::of_type("generator"),
        ];
        let serialized =
            serde_json::to_string(&serde_json::json!({ "assets": original })).unwrap();
        let result = normalize_response(&serialized);
        assert_eq!(result.assets, original);
        assert_eq!(result.dropped, 0);
    }
}
