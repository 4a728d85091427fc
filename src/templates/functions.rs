//! Helper functions available to every template.
//!
//! The table is fixed at compile time and registered on each page's template
//! set before any template is parsed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tera::{Tera, Value};

/// Signature shared by all template filters.
pub type HelperFn = fn(&Value, &HashMap<String, Value>) -> tera::Result<Value>;

/// Named filters registered on every template set.
pub static HELPERS: &[(&str, HelperFn)] = &[("human_date", human_date)];

pub(crate) fn register(tera: &mut Tera) {
    for (name, helper) in HELPERS {
        tera.register_filter(name, *helper);
    }
}

/// Human-readable UTC timestamp, e.g. `17 Mar 2024 at 10:15`.
pub fn format_human_date(t: &DateTime<Utc>) -> String {
    t.format("%d %b %Y at %H:%M").to_string()
}

fn human_date(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value {
        Value::Null => Ok(Value::String(String::new())),
        Value::String(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| tera::Error::msg(format!("human_date: '{raw}' is not a timestamp: {e}")))?;
            Ok(Value::String(format_human_date(&parsed.with_timezone(&Utc))))
        }
        other => Err(tera::Error::msg(format!(
            "human_date: expected a timestamp, got {other}"
        ))),
    }
}
