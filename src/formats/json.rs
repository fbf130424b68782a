use anyhow::{Context, Result};
use serde_json::Value;

use super::{Document, translation_or_source};

/// JSON document: every string leaf is a unit
///
/// Keys, numbers, booleans and nulls are never translated. Leaves are
/// visited depth first in document order.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    root: Value,
    units: Vec<String>,
}

impl JsonDocument {
    /// Parse JSON content
    pub fn parse(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content).context("Failed to parse JSON document")?;
        let mut units = Vec::new();
        collect_strings(&root, &mut units);
        Ok(Self { root, units })
    }
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

fn replace_strings(value: &mut Value, next: &mut dyn FnMut() -> String) {
    match value {
        Value::String(s) => *s = next(),
        Value::Array(items) => items.iter_mut().for_each(|v| replace_strings(v, next)),
        Value::Object(map) => map.values_mut().for_each(|v| replace_strings(v, next)),
        _ => {}
    }
}

impl Document for JsonDocument {
    fn units(&self) -> &[String] {
        &self.units
    }

    fn render(&self, _lang: &str, translations: &[String]) -> String {
        let mut root = self.root.clone();
        let mut index = 0;
        replace_strings(&mut root, &mut || {
            let text = translation_or_source(&self.units, translations, index).to_string();
            index += 1;
            text
        });

        // Serializing a Value cannot fail
        serde_json::to_string_pretty(&root).unwrap_or_default()
    }
}
