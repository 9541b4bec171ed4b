//! Structural validation of raw timer configurations.
//!
//! Checks run in a fixed order (`window_settings`, `binds`, `global_timer`,
//! then `timers`) and stop at the first offending field. Every timer and every
//! change rule is inspected; nothing is accepted on the strength of the first
//! element alone.

use super::is_valid_color;
use crate::error::{SchemaError, Violation};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// Returns `true` when `raw` is a structurally valid configuration. The
/// reason for a rejection is logged.
pub fn is_valid(raw: &Value) -> bool {
    match validate(raw) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(field = %e.field, reason = %e.violation, "timer config rejected");
            false
        }
    }
}

pub fn validate(raw: &Value) -> Result<(), SchemaError> {
    let root = raw
        .as_object()
        .ok_or_else(|| SchemaError::new("config", Violation::WrongType { expected: "object" }))?;
    only_known(root, &["window_settings", "binds", "global_timer", "timers"], None)?;

    validate_window_settings(object(root, "window_settings", "window_settings")?)?;
    validate_binds(object(root, "binds", "binds")?)?;
    validate_global_timer(object(root, "global_timer", "global_timer")?)?;

    let timers = array(root, "timers", "timers")?;
    for (idx, timer) in timers.iter().enumerate() {
        let path = format!("timers[{idx}]");
        let timer = timer.as_object().ok_or_else(|| {
            SchemaError::new(path.clone(), Violation::WrongType { expected: "object" })
        })?;
        validate_timer(timer, &path)?;
    }
    Ok(())
}

fn validate_window_settings(ws: &Object) -> Result<(), SchemaError> {
    only_known(
        ws,
        &["bg_color", "always_on_top", "global_hotkeys", "default_font"],
        Some("window_settings"),
    )?;
    color(ws, "bg_color", "window_settings")?;
    boolean(ws, "always_on_top", "window_settings")?;
    boolean(ws, "global_hotkeys", "window_settings")?;
    string(ws, "default_font", "window_settings")?;
    Ok(())
}

fn validate_binds(binds: &Object) -> Result<(), SchemaError> {
    only_known(binds, &["startstop", "restart"], Some("binds"))?;
    for key in ["startstop", "restart"] {
        if string(binds, key, "binds")?.trim().is_empty() {
            return Err(SchemaError::new(field_path("binds", key), Violation::Empty));
        }
    }
    Ok(())
}

fn validate_global_timer(gt: &Object) -> Result<(), SchemaError> {
    only_known(gt, &["color", "frames"], Some("global_timer"))?;
    color(gt, "color", "global_timer")?;
    positive_int(gt, "frames", "global_timer")?;
    Ok(())
}

fn validate_timer(timer: &Object, path: &str) -> Result<(), SchemaError> {
    only_known(timer, &["title", "color", "frames", "visible", "changes"], Some(path))?;
    string(timer, "title", path)?;
    color(timer, "color", path)?;
    positive_int(timer, "frames", path)?;
    boolean(timer, "visible", path)?;

    let changes = array(timer, "changes", path)?;
    for (idx, change) in changes.iter().enumerate() {
        let change_path = format!("{path}.changes[{idx}]");
        let change = change.as_object().ok_or_else(|| {
            SchemaError::new(change_path.clone(), Violation::WrongType { expected: "object" })
        })?;
        only_known(change, &["trigger_frame", "change_to", "overwrite"], Some(&change_path))?;
        positive_int(change, "trigger_frame", &change_path)?;
        positive_int(change, "change_to", &change_path)?;
        boolean(change, "overwrite", &change_path)?;
    }
    Ok(())
}

/// Reject keys the typed configuration would drop on save.
fn only_known(map: &Object, known: &[&str], parent: Option<&str>) -> Result<(), SchemaError> {
    match map.keys().find(|k| !known.contains(&k.as_str())) {
        Some(key) => {
            let path = match parent {
                Some(parent) => field_path(parent, key),
                None => key.clone(),
            };
            Err(SchemaError::new(path, Violation::Unknown))
        }
        None => Ok(()),
    }
}

fn field_path(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

fn field<'a>(map: &'a Object, key: &str, parent: &str) -> Result<&'a Value, SchemaError> {
    map.get(key)
        .ok_or_else(|| SchemaError::new(top_or_nested(parent, key), Violation::Missing))
}

// Top-level keys are reported by their bare name.
fn top_or_nested(parent: &str, key: &str) -> String {
    if parent == key {
        key.to_string()
    } else {
        field_path(parent, key)
    }
}

fn wrong_type(parent: &str, key: &str, expected: &'static str) -> SchemaError {
    SchemaError::new(top_or_nested(parent, key), Violation::WrongType { expected })
}

fn object<'a>(map: &'a Object, key: &str, parent: &str) -> Result<&'a Object, SchemaError> {
    field(map, key, parent)?
        .as_object()
        .ok_or_else(|| wrong_type(parent, key, "object"))
}

fn array<'a>(map: &'a Object, key: &str, parent: &str) -> Result<&'a Vec<Value>, SchemaError> {
    field(map, key, parent)?
        .as_array()
        .ok_or_else(|| wrong_type(parent, key, "array"))
}

fn string<'a>(map: &'a Object, key: &str, parent: &str) -> Result<&'a str, SchemaError> {
    field(map, key, parent)?
        .as_str()
        .ok_or_else(|| wrong_type(parent, key, "string"))
}

fn boolean(map: &Object, key: &str, parent: &str) -> Result<bool, SchemaError> {
    field(map, key, parent)?
        .as_bool()
        .ok_or_else(|| wrong_type(parent, key, "boolean"))
}

fn color(map: &Object, key: &str, parent: &str) -> Result<(), SchemaError> {
    if is_valid_color(string(map, key, parent)?) {
        Ok(())
    } else {
        Err(SchemaError::new(field_path(parent, key), Violation::InvalidColor))
    }
}

fn positive_int(map: &Object, key: &str, parent: &str) -> Result<u32, SchemaError> {
    let Value::Number(n) = field(map, key, parent)? else {
        return Err(wrong_type(parent, key, "integer"));
    };
    if let Some(value) = n.as_u64() {
        if value == 0 {
            return Err(SchemaError::new(field_path(parent, key), Violation::NotPositive));
        }
        return u32::try_from(value)
            .map_err(|_| SchemaError::new(field_path(parent, key), Violation::OutOfRange));
    }
    if n.as_i64().is_some() {
        return Err(SchemaError::new(field_path(parent, key), Violation::NotPositive));
    }
    Err(wrong_type(parent, key, "integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "window_settings": {
                "bg_color": "#1a1a1a",
                "always_on_top": true,
                "global_hotkeys": false,
                "default_font": "Consolas"
            },
            "binds": {"startstop": "s", "restart": "r"},
            "global_timer": {"color": "#FFFFFF", "frames": 3000},
            "timers": [
                {"title": "Foxy", "color": "#ff0000", "frames": 100, "visible": true,
                 "changes": [{"trigger_frame": 50, "change_to": 20, "overwrite": true}]},
                {"title": "Bonnie", "color": "#0000ff", "frames": 80, "visible": false, "changes": []}
            ]
        })
    }

    fn rejected_field(raw: &Value) -> String {
        validate(raw).expect_err("config should be rejected").field
    }

    #[test]
    fn accepts_valid_config() {
        assert!(is_valid(&valid()));
    }

    #[test]
    fn accepts_empty_timer_list() {
        let mut raw = valid();
        raw["timers"] = json!([]);
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn rejects_each_missing_top_level_key() {
        for key in ["window_settings", "binds", "global_timer", "timers"] {
            let mut raw = valid();
            raw.as_object_mut().unwrap().remove(key);
            assert_eq!(rejected_field(&raw), key);
        }
    }

    #[test]
    fn reports_first_failure_in_check_order() {
        let mut raw = valid();
        raw["binds"] = json!([]);
        raw["global_timer"]["frames"] = json!(0);
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "binds");
        assert_eq!(err.violation, Violation::WrongType { expected: "object" });
    }

    #[test]
    fn timers_must_be_an_array() {
        let mut raw = valid();
        raw["timers"] = json!({});
        assert_eq!(rejected_field(&raw), "timers");
    }

    #[test]
    fn rejects_non_positive_frames() {
        let mut raw = valid();
        raw["global_timer"]["frames"] = json!(-3);
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "global_timer.frames");
        assert_eq!(err.violation, Violation::NotPositive);
    }

    #[test]
    fn rejects_fractional_and_boolean_frames() {
        let mut raw = valid();
        raw["timers"][0]["frames"] = json!(12.5);
        assert_eq!(rejected_field(&raw), "timers[0].frames");

        let mut raw = valid();
        raw["timers"][0]["frames"] = json!(true);
        assert_eq!(rejected_field(&raw), "timers[0].frames");
    }

    #[test]
    fn rejects_frames_beyond_u32() {
        let mut raw = valid();
        raw["global_timer"]["frames"] = json!(u64::from(u32::MAX) + 1);
        assert_eq!(validate(&raw).unwrap_err().violation, Violation::OutOfRange);
    }

    #[test]
    fn validates_every_timer_not_only_the_first() {
        let mut raw = valid();
        raw["timers"][1]["color"] = json!("blue");
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "timers[1].color");
        assert_eq!(err.violation, Violation::InvalidColor);
    }

    #[test]
    fn validates_every_change_rule() {
        let mut raw = valid();
        raw["timers"][0]["changes"] = json!([
            {"trigger_frame": 10, "change_to": 5, "overwrite": false},
            {"trigger_frame": 10, "change_to": 0, "overwrite": false}
        ]);
        assert_eq!(rejected_field(&raw), "timers[0].changes[1].change_to");

        raw["timers"][0]["changes"][1] = json!({"trigger_frame": 0, "change_to": 5, "overwrite": true});
        assert_eq!(rejected_field(&raw), "timers[0].changes[1].trigger_frame");

        raw["timers"][0]["changes"][1] = json!({"trigger_frame": 3, "change_to": 5, "overwrite": "yes"});
        assert_eq!(rejected_field(&raw), "timers[0].changes[1].overwrite");
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["#12345", "#1234567", "123456", "#12345g"] {
            let mut raw = valid();
            raw["window_settings"]["bg_color"] = json!(bad);
            assert_eq!(rejected_field(&raw), "window_settings.bg_color", "{bad}");
        }
    }

    #[test]
    fn rejects_missing_timer_fields() {
        for key in ["title", "color", "frames", "visible", "changes"] {
            let mut raw = valid();
            raw["timers"][1].as_object_mut().unwrap().remove(key);
            assert_eq!(rejected_field(&raw), format!("timers[1].{key}"));
        }
    }

    #[test]
    fn rejects_empty_binding() {
        let mut raw = valid();
        raw["binds"]["restart"] = json!("  ");
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "binds.restart");
        assert_eq!(err.violation, Violation::Empty);
    }

    #[test]
    fn rejects_unknown_fields() {
        let mut raw = valid();
        raw["notes"] = json!("fnaf night 3");
        assert_eq!(rejected_field(&raw), "notes");

        let mut raw = valid();
        raw["timers"][1]["speed"] = json!(2);
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "timers[1].speed");
        assert_eq!(err.violation, Violation::Unknown);

        let mut raw = valid();
        raw["timers"][0]["changes"][0]["repeat"] = json!(true);
        assert_eq!(rejected_field(&raw), "timers[0].changes[0].repeat");
    }

    #[test]
    fn rejects_non_object_root() {
        assert!(!is_valid(&json!([1, 2, 3])));
    }
}
