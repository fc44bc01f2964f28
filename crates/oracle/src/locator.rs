//! CSS selectors rendered as JavaScript for CDP evaluation.
//!
//! Every query is a self-contained expression so it can be passed straight to
//! `Runtime.evaluate`. Values are embedded as JSON string literals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A CSS selector for one element on the page under test
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector {
    css: String,
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            css: selector.into(),
        }
    }

    /// The raw CSS
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.css
    }

    /// Expression evaluating to the first matching element or `null`
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("document.querySelector({})", js_string(&self.css))
    }

    /// Expression evaluating to whether the element is rendered and visible
    #[must_use]
    pub fn to_visible_query(&self) -> String {
        format!(
            "(() => {{ const el = {q}; if (!el) return false; \
             const s = window.getComputedStyle(el); const r = el.getBoundingClientRect(); \
             return s.visibility !== 'hidden' && s.display !== 'none' && r.width > 0 && r.height > 0; }})()",
            q = self.to_query()
        )
    }

    /// Expression evaluating to `{ found, text }`, where `text` is the
    /// element's `textContent` or `''` when unset. Deserializes as [`TextProbe`].
    #[must_use]
    pub fn to_text_query(&self) -> String {
        format!(
            "(() => {{ const el = {q}; \
             return el ? {{ found: true, text: el.textContent ?? '' }} : {{ found: false, text: '' }}; }})()",
            q = self.to_query()
        )
    }

    /// Script replacing the field value and firing `input`, as a paste would.
    /// Evaluates to `false` when the element is missing.
    #[must_use]
    pub fn to_fill_script(&self, value: &str) -> String {
        self.value_script(&js_string(value))
    }

    /// Script appending to the field value and firing `input`, as one keystroke
    #[must_use]
    pub fn to_append_script(&self, chunk: &str) -> String {
        self.value_script(&format!("el.value + {}", js_string(chunk)))
    }

    // Frameworks track the value through the prototype setter, so assigning
    // `el.value` directly would not reach their state.
    fn value_script(&self, value_expr: &str) -> String {
        format!(
            "(() => {{ const el = {q}; if (!el) return false; \
             const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
             const setter = Object.getOwnPropertyDescriptor(proto, 'value').set; \
             el.focus(); setter.call(el, {value_expr}); \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); return true; }})()",
            q = self.to_query()
        )
    }
}

/// Result of [`Selector::to_text_query`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TextProbe {
    /// Whether the element exists
    pub found: bool,
    /// Its text content
    pub text: String,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)
    }
}

impl From<&str> for Selector {
    fn from(css: &str) -> Self {
        Self::css(css)
    }
}

impl From<String> for Selector {
    fn from(css: String) -> Self {
        Self::css(css)
    }
}

/// JSON string literal, which is also a valid JavaScript string literal
fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const INPUT: &str = r#"textarea[placeholder="Input Your Singlish Text Here."]"#;

    #[test]
    fn test_query_escapes_quotes() {
        let sel = Selector::css(INPUT);
        assert_eq!(
            sel.to_query(),
            r#"document.querySelector("textarea[placeholder=\"Input Your Singlish Text Here.\"]")"#
        );
    }

    #[test]
    fn test_text_query_defaults_empty() {
        let q = Selector::css("div.out").to_text_query();
        assert!(q.contains("textContent ?? ''"));
        assert!(q.contains("found: false"));
    }

    #[test]
    fn test_text_probe_deserializes() {
        let probe: TextProbe =
            serde_json::from_str(r#"{"found": true, "text": " සුබ "}"#).unwrap();
        assert!(probe.found);
        assert_eq!(probe.text, " සුබ ");
    }

    #[test]
    fn test_visible_query_checks_box_and_style() {
        let q = Selector::css("div.out").to_visible_query();
        assert!(q.contains("getBoundingClientRect"));
        assert!(q.contains("visibility !== 'hidden'"));
    }

    #[test]
    fn test_fill_script_embeds_json_literal() {
        let script = Selector::css(INPUT).to_fill_script("mama \"gedhara\"\nyanawaa");
        assert!(script.contains(r#"setter.call(el, "mama \"gedhara\"\nyanawaa")"#));
        assert!(script.contains("new Event('input', { bubbles: true })"));
    }

    #[test]
    fn test_append_script_keeps_existing_value() {
        let script = Selector::css("textarea").to_append_script("a");
        assert!(script.contains(r#"setter.call(el, el.value + "a")"#));
    }

    #[test]
    fn test_sinhala_value_kept_verbatim() {
        let script = Selector::css("textarea").to_fill_script("සුබ");
        assert!(script.contains("\"සුබ\""));
    }

    #[test]
    fn test_conversions() {
        let a: Selector = "div".into();
        let b: Selector = String::from("div").into();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "div");
        assert_eq!(a.as_str(), "div");
    }
}
