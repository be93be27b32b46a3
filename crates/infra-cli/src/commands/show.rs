//! Print the resolved config.

use infra_config::{ConfigDocument, sections};
use serde_json::Value;

use crate::error::Result;

const REDACTED: &str = "********";

pub fn run_show(doc: &ConfigDocument) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&redacted(doc)?)?;
    println!("{rendered}");
    Ok(())
}

/// The document as JSON with every non-empty credential value masked.
fn redacted(doc: &ConfigDocument) -> Result<Value> {
    let mut value = serde_json::to_value(doc)?;
    if let Some(Value::Object(credentials)) = value.get_mut(sections::CREDENTIALS) {
        for secret in credentials.values_mut() {
            if secret.as_str().is_some_and(|s| !s.is_empty()) {
                *secret = Value::from(REDACTED);
            }
        }
    }
    Ok(value)
}
