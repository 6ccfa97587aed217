//! # Usage Example Synthesizer
//!
//! Renders a minimal usage snippet for a component from its default props.
//! Pure and deterministic: the same name and defaults always produce the same
//! text.

use serde_json::Value;

use crate::props::Defaults;
use crate::source::utils::symbol_for_display_name;

/// Import prefix used when none is configured
pub const DEFAULT_IMPORT_PREFIX: &str = "@/components/vui";

/// Render a usage snippet for `name`.
///
/// String defaults become `key="value"`; every other literal becomes
/// `key={<json>}`. Attributes keep the order of `defaults`.
pub fn usage_example(name: &str, defaults: &Defaults, import_prefix: &str) -> String {
    let symbol = symbol_for_display_name(name);
    let prefix = import_prefix.trim_end_matches('/');

    let props = defaults
        .iter()
        .map(|(key, value)| format_attribute(key, value))
        .collect::<Vec<_>>()
        .join(" ");

    let element = if props.is_empty() {
        format!("<{} />", symbol)
    } else {
        format!("<{} {} />", symbol, props)
    };

    format!(
        r#"import {symbol} from '{prefix}/{symbol}';
export default function Example() {{
  return (
    <div className="p-8">
      {element}
    </div>
  );
}}"#
    )
}

fn format_attribute(key: &str, value: &Value) -> String {
    match value {
        Value::String(text) => format!("{}=\"{}\"", key, text),
        other => format!("{}={{{}}}", key, other),
    }
}
