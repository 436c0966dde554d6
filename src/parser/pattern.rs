//! Named regex patterns for field extraction.
//!
//! The registry is plainly-owned mutable state inside [`LogParser`]: created
//! at session start, mutated only through explicit add/remove calls, dropped
//! with the instance. There is no global registry and no internal locking;
//! callers needing cross-thread sharing must wrap an instance themselves.

use std::collections::HashMap;

use log::debug;
use regex::Regex;

use super::access::get_field_str;
use super::event::Event;
use crate::utils::error::PatternError;

/// A registered extraction pattern: the compiled regex plus the field it
/// applies to.
#[derive(Debug, Clone)]
pub struct ExtractionPattern {
    /// Field the pattern is matched against (dot notation allowed)
    pub source_field: String,

    regex: Regex,
}

/// Pattern registry and extraction engine.
///
/// **Public** - owns the named pattern mapping used by extraction
#[derive(Debug, Default)]
pub struct LogParser {
    patterns: HashMap<String, ExtractionPattern>,
}

impl LogParser {
    /// Create a parser with an empty pattern registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named pattern against a source field.
    ///
    /// **Public** - re-registering a name overwrites the previous pattern
    ///
    /// # Errors
    /// * `PatternError::InvalidRegex` - the pattern does not compile
    ///   (configuration error, raised immediately)
    pub fn add_pattern(
        &mut self,
        name: impl Into<String>,
        source_field: impl Into<String>,
        pattern: &str,
    ) -> Result<(), PatternError> {
        let name = name.into();
        let source_field = source_field.into();
        let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
            name: name.clone(),
            source,
        })?;

        debug!("Registering pattern '{}' on field '{}'", name, source_field);
        self.patterns.insert(name, ExtractionPattern { source_field, regex });
        Ok(())
    }

    /// Remove a pattern; returns whether it was registered
    pub fn remove_pattern(&mut self, name: &str) -> bool {
        self.patterns.remove(name).is_some()
    }

    /// Whether a pattern name is registered
    pub fn has_pattern(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// Names of all registered patterns (unordered)
    pub fn pattern_names(&self) -> Vec<&str> {
        self.patterns.keys().map(String::as_str).collect()
    }

    /// Apply a registered pattern to an event.
    ///
    /// **Public** - main extraction entry point
    ///
    /// Returns the capture groups of the first match: named groups keyed by
    /// their name, unnamed groups by their position as a string. A pattern
    /// without capture groups yields `{"match": <matched text>}`. A missing
    /// or empty source field, or no match, is `Ok(None)` - a per-event
    /// condition, not an error.
    ///
    /// # Errors
    /// * `PatternError::NotFound` - the name was never registered
    ///   (configuration error, raised immediately)
    pub fn extract(
        &self,
        event: &Event,
        name: &str,
    ) -> Result<Option<HashMap<String, String>>, PatternError> {
        let pattern = self
            .patterns
            .get(name)
            .ok_or_else(|| PatternError::NotFound(name.to_string()))?;

        let Some(text) = get_field_str(event, &pattern.source_field) else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }

        let Some(captures) = pattern.regex.captures(&text) else {
            return Ok(None);
        };

        let mut groups = HashMap::new();
        for (position, group_name) in pattern.regex.capture_names().enumerate() {
            if position == 0 {
                continue;
            }
            if let Some(matched) = captures.get(position) {
                let key = group_name
                    .map(str::to_string)
                    .unwrap_or_else(|| position.to_string());
                groups.insert(key, matched.as_str().to_string());
            }
        }

        if groups.is_empty() {
            groups.insert("match".to_string(), captures[0].to_string());
        }

        Ok(Some(groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> Event {
        value.as_object().expect("test event must be an object").clone()
    }

    #[test]
    fn test_named_groups() {
        let mut parser = LogParser::new();
        parser
            .add_pattern("ip", "_raw", r"(?P<ip>\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})")
            .unwrap();

        let e = event(json!({"_raw": "Connection from 192.168.1.100"}));
        let groups = parser.extract(&e, "ip").unwrap().unwrap();

        assert_eq!(groups["ip"], "192.168.1.100");
    }

    #[test]
    fn test_positional_groups() {
        let mut parser = LogParser::new();
        parser
            .add_pattern("status", "_raw", r"(\w+) (\d+)")
            .unwrap();

        let e = event(json!({"_raw": "status 404 somewhere"}));
        let groups = parser.extract(&e, "status").unwrap().unwrap();

        assert_eq!(groups["1"], "status");
        assert_eq!(groups["2"], "404");
    }

    #[test]
    fn test_groupless_pattern_yields_match_key() {
        let mut parser = LogParser::new();
        parser.add_pattern("err", "_raw", r"ERROR\S*").unwrap();

        let e = event(json!({"_raw": "oops ERROR42 here"}));
        let groups = parser.extract(&e, "err").unwrap().unwrap();

        assert_eq!(groups["match"], "ERROR42");
    }

    #[test]
    fn test_first_match_only() {
        let mut parser = LogParser::new();
        parser.add_pattern("num", "_raw", r"(\d+)").unwrap();

        let e = event(json!({"_raw": "a 10 b 20"}));
        let groups = parser.extract(&e, "num").unwrap().unwrap();

        assert_eq!(groups["1"], "10");
    }

    #[test]
    fn test_missing_field_and_no_match() {
        let mut parser = LogParser::new();
        parser.add_pattern("num", "message", r"\d+").unwrap();

        let no_field = event(json!({"_raw": "123"}));
        assert!(parser.extract(&no_field, "num").unwrap().is_none());

        let no_match = event(json!({"message": "no digits"}));
        assert!(parser.extract(&no_match, "num").unwrap().is_none());
    }

    #[test]
    fn test_unregistered_pattern_is_an_error() {
        let parser = LogParser::new();
        let e = event(json!({"_raw": "x"}));

        let err = parser.extract(&e, "nope").unwrap_err();
        assert!(matches!(err, PatternError::NotFound(name) if name == "nope"));
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let mut parser = LogParser::new();

        let err = parser.add_pattern("bad", "_raw", "(unclosed").unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { .. }));
        assert!(!parser.has_pattern("bad"));
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut parser = LogParser::new();
        parser.add_pattern("p", "_raw", r"(?P<a>\d+)").unwrap();
        parser.add_pattern("p", "_raw", r"(?P<b>\w+)").unwrap();

        let e = event(json!({"_raw": "word"}));
        let groups = parser.extract(&e, "p").unwrap().unwrap();

        assert!(groups.contains_key("b"));
        assert!(!groups.contains_key("a"));
    }

    #[test]
    fn test_remove_pattern() {
        let mut parser = LogParser::new();
        parser.add_pattern("p", "_raw", r"\d+").unwrap();

        assert!(parser.remove_pattern("p"));
        assert!(!parser.remove_pattern("p"));
        assert!(!parser.has_pattern("p"));
    }
}
