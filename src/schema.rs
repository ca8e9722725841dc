//! Response-shape contract for the analysis service.
//!
//! [`response_schema`] is the machine-checked constraint sent with every
//! model invocation. The schema is advisory to the model, not a guarantee
//! on the wire, so [`parse_analysis_payload`] enforces the same shape
//! locally: every field checked, unknown fields rejected, values carried
//! through verbatim. A payload that fails here is a malformed response,
//! never a partially-populated result.

use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::{AnalysisResult, BoundingBox, DetectionEvent, Metric, Severity};

const RESULT_FIELDS: [&str; 3] = ["report", "metrics", "events"];
const METRIC_FIELDS: [&str; 2] = ["name", "value"];
const EVENT_FIELDS: [&str; 4] = ["time", "description", "type", "box"];
const BOX_FIELDS: [&str; 4] = ["x", "y", "width", "height"];

/// The structural contract on the model's output, in the generateContent
/// `responseSchema` representation (uppercase type names). Mirrors
/// [`AnalysisResult`] exactly: required `report`, `metrics`, `events`;
/// `box` optional per event with four required numeric fields.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "report": { "type": "STRING" },
            "metrics": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "value": { "type": "NUMBER" }
                    },
                    "required": ["name", "value"]
                }
            },
            "events": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "time": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "type": {
                            "type": "STRING",
                            "enum": ["info", "warning", "alert"]
                        },
                        "box": {
                            "type": "OBJECT",
                            "properties": {
                                "x": { "type": "NUMBER" },
                                "y": { "type": "NUMBER" },
                                "width": { "type": "NUMBER" },
                                "height": { "type": "NUMBER" }
                            },
                            "required": ["x", "y", "width", "height"]
                        }
                    },
                    "required": ["time", "description", "type"]
                }
            }
        },
        "required": ["report", "metrics", "events"]
    })
}

fn ensure_allowed_fields(
    context: &str,
    obj: &serde_json::Map<String, Value>,
    allowed: &[&str],
) -> Result<()> {
    let extras: Vec<String> = obj
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .cloned()
        .collect();
    if extras.is_empty() {
        return Ok(());
    }
    Err(anyhow!(
        "schema: {} contains extra fields: {}",
        context,
        extras.join(", ")
    ))
}

fn parse_severity(context: &str, value: &Value) -> Result<Severity> {
    let raw = value
        .as_str()
        .ok_or_else(|| anyhow!("schema: {}.type must be a string", context))?;
    let normalized = raw.trim().to_lowercase();
    match normalized.as_str() {
        "info" => Ok(Severity::Info),
        "warning" => Ok(Severity::Warning),
        "alert" => Ok(Severity::Alert),
        _ => Err(anyhow!(
            "schema: {}.type not in allowed vocabulary",
            context
        )),
    }
}

fn parse_box(context: &str, value: &Value) -> Result<BoundingBox> {
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("schema: {}.box must be an object", context))?;
    let box_context = format!("{}.box", context);
    ensure_allowed_fields(&box_context, obj, &BOX_FIELDS)?;

    let number = |field: &str| -> Result<f64> {
        obj.get(field)
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("schema: {}.{} must be a number", box_context, field))
    };

    Ok(BoundingBox {
        x: number("x")?,
        y: number("y")?,
        width: number("width")?,
        height: number("height")?,
    })
}

fn parse_metric(index: usize, value: &Value) -> Result<Metric> {
    let context = format!("metrics[{}]", index);
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("schema: {} must be an object", context))?;
    ensure_allowed_fields(&context, obj, &METRIC_FIELDS)?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("schema: {}.name must be a string", context))?
        .to_string();
    let value = obj
        .get("value")
        .and_then(Value::as_f64)
        .ok_or_else(|| anyhow!("schema: {}.value must be a number", context))?;

    Ok(Metric { name, value })
}

fn parse_event(index: usize, value: &Value) -> Result<DetectionEvent> {
    let context = format!("events[{}]", index);
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("schema: {} must be an object", context))?;
    ensure_allowed_fields(&context, obj, &EVENT_FIELDS)?;

    let time = obj
        .get("time")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("schema: {}.time must be a string", context))?
        .to_string();
    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("schema: {}.description must be a string", context))?
        .to_string();
    let severity = obj
        .get("type")
        .ok_or_else(|| anyhow!("schema: {}.type is required", context))
        .and_then(|value| parse_severity(&context, value))?;
    let bounds = match obj.get("box") {
        Some(value) => Some(parse_box(&context, value)?),
        None => None,
    };

    Ok(DetectionEvent {
        time,
        description,
        severity,
        bounds,
    })
}

/// Validate a parsed payload against the response shape and build the
/// typed result. Rejects any extra field at any level. Field values are
/// carried through verbatim: no reordering, no coercion beyond JSON
/// number/string typing.
pub fn parse_analysis_payload(payload: &Value) -> Result<AnalysisResult> {
    let obj = payload
        .as_object()
        .ok_or_else(|| anyhow!("schema: payload must be a JSON object"))?;
    ensure_allowed_fields("result", obj, &RESULT_FIELDS)?;

    let report = obj
        .get("report")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("schema: report must be a string"))?
        .to_string();

    let metrics = obj
        .get("metrics")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("schema: metrics must be an array"))?
        .iter()
        .enumerate()
        .map(|(index, value)| parse_metric(index, value))
        .collect::<Result<Vec<_>>>()?;

    let events = obj
        .get("events")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("schema: events must be an array"))?
        .iter()
        .enumerate()
        .map(|(index, value)| parse_event(index, value))
        .collect::<Result<Vec<_>>>()?;

    Ok(AnalysisResult {
        report,
        metrics,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_payload() -> Value {
        json!({
            "report": "Summary.\n\n1. Finding one.",
            "metrics": [
                { "name": "Corrosion", "value": 28.0 },
                { "name": "Overall Integrity", "value": 85.5 }
            ],
            "events": [
                {
                    "time": "01:12",
                    "description": "Minor corrosion detected on starboard bow.",
                    "type": "info"
                },
                {
                    "time": "07:21",
                    "description": "Potential stress fracture near Frame 150.",
                    "type": "alert",
                    "box": { "x": 0.42, "y": 0.31, "width": 0.18, "height": 0.12 }
                }
            ]
        })
    }

    #[test]
    fn parse_analysis_payload_accepts_full_payload() {
        let result = parse_analysis_payload(&full_payload()).expect("payload should parse");

        assert_eq!(result.report, "Summary.\n\n1. Finding one.");
        assert_eq!(result.metrics.len(), 2);
        assert_eq!(result.metrics[0].name, "Corrosion");
        assert_eq!(result.metrics[1].value, 85.5);
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].severity, Severity::Info);
        assert!(result.events[0].bounds.is_none());
        let bounds = result.events[1].bounds.expect("alert carries a box");
        assert_eq!(bounds.x, 0.42);
        assert_eq!(bounds.height, 0.12);
    }

    #[test]
    fn parse_analysis_payload_round_trips_verbatim() {
        let payload = full_payload();
        let result = parse_analysis_payload(&payload).expect("payload should parse");
        let reserialized = serde_json::to_value(&result).expect("serialize");
        assert_eq!(reserialized, payload);
    }

    #[test]
    fn parse_analysis_payload_accepts_integer_metric_values() {
        let payload = json!({
            "report": "r",
            "metrics": [{ "name": "Hazard Zones", "value": 3 }],
            "events": []
        });
        let result = parse_analysis_payload(&payload).expect("payload should parse");
        assert_eq!(result.metrics[0].value, 3.0);
    }

    #[test]
    fn parse_analysis_payload_normalizes_severity_case() {
        let payload = json!({
            "report": "r",
            "metrics": [],
            "events": [
                { "time": "00:05", "description": "d", "type": " Warning " }
            ]
        });
        let result = parse_analysis_payload(&payload).expect("payload should parse");
        assert_eq!(result.events[0].severity, Severity::Warning);
    }

    #[test]
    fn parse_analysis_payload_rejects_non_object() {
        let err = parse_analysis_payload(&json!(["not", "an", "object"])).unwrap_err();
        assert!(format!("{err}").contains("must be a JSON object"));
    }

    #[test]
    fn parse_analysis_payload_rejects_extra_root_fields() {
        let mut payload = full_payload();
        payload["confidence"] = json!(0.9);
        let err = parse_analysis_payload(&payload).unwrap_err();
        assert!(format!("{err}").contains("extra fields"));
    }

    #[test]
    fn parse_analysis_payload_rejects_extra_event_fields() {
        let mut payload = full_payload();
        payload["events"][0]["snapshot"] = json!("nope");
        let err = parse_analysis_payload(&payload).unwrap_err();
        assert!(format!("{err}").contains("extra fields"));
    }

    #[test]
    fn parse_analysis_payload_rejects_extra_box_fields() {
        let mut payload = full_payload();
        payload["events"][1]["box"]["depth"] = json!(0.5);
        let err = parse_analysis_payload(&payload).unwrap_err();
        assert!(format!("{err}").contains("extra fields"));
    }

    #[test]
    fn parse_analysis_payload_rejects_unknown_severity() {
        let mut payload = full_payload();
        payload["events"][0]["type"] = json!("critical");
        let err = parse_analysis_payload(&payload).unwrap_err();
        assert!(format!("{err}").contains("allowed vocabulary"));
    }

    #[test]
    fn parse_analysis_payload_rejects_stringly_metric_value() {
        let mut payload = full_payload();
        payload["metrics"][0]["value"] = json!("28");
        let err = parse_analysis_payload(&payload).unwrap_err();
        assert!(format!("{err}").contains("value must be a number"));
    }

    #[test]
    fn parse_analysis_payload_rejects_missing_report() {
        let payload = json!({ "metrics": [], "events": [] });
        let err = parse_analysis_payload(&payload).unwrap_err();
        assert!(format!("{err}").contains("report"));
    }

    #[test]
    fn parse_analysis_payload_rejects_incomplete_box() {
        let payload = json!({
            "report": "r",
            "metrics": [],
            "events": [
                {
                    "time": "00:05",
                    "description": "d",
                    "type": "alert",
                    "box": { "x": 0.1, "y": 0.2, "width": 0.3 }
                }
            ]
        });
        let err = parse_analysis_payload(&payload).unwrap_err();
        assert!(format!("{err}").contains("height must be a number"));
    }

    #[test]
    fn response_schema_mirrors_the_result_shape() {
        let schema = response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(
            schema["required"],
            json!(["report", "metrics", "events"])
        );
        assert_eq!(
            schema["properties"]["events"]["items"]["properties"]["type"]["enum"],
            json!(["info", "warning", "alert"])
        );
        let box_schema = &schema["properties"]["events"]["items"]["properties"]["box"];
        assert_eq!(
            box_schema["required"],
            json!(["x", "y", "width", "height"])
        );
        // box is optional per event
        assert_eq!(
            schema["properties"]["events"]["items"]["required"],
            json!(["time", "description", "type"])
        );
    }
}
