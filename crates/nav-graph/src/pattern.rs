//! Route pattern parsing and matching
//!
//! Grammar: path segments separated by `/`. A segment of the form
//! `{name}` is a required placeholder, `{name}?` an optional one;
//! anything else is a literal. Optional placeholders may only appear
//! at the tail of a pattern, otherwise an omitted segment would be
//! ambiguous to match.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::args::ArgValue;
use crate::error::{ResolutionError, SchemaError};

/// One segment of a parsed route pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternSegment {
    /// Fixed text that must match exactly
    Literal(String),
    /// Named placeholder
    Param {
        /// Placeholder name
        name: String,
        /// Whether the segment may be omitted from the path
        optional: bool,
    },
}

/// A parsed route template such as `details/{itemId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<PatternSegment>,
}

impl RoutePattern {
    /// Parse a pattern string, rejecting malformed placeholder syntax
    pub fn parse(pattern: &str) -> Result<Self, SchemaError> {
        let malformed = |reason: &str| SchemaError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut seen_optional = false;
        let mut seen_names: Vec<String> = Vec::new();

        for raw_segment in pattern.split('/').filter(|s| !s.is_empty()) {
            let segment = if let Some(inner) = raw_segment.strip_prefix('{') {
                let (name, optional) = match inner.strip_suffix("}?") {
                    Some(name) => (name, true),
                    None => match inner.strip_suffix('}') {
                        Some(name) => (name, false),
                        None => return Err(malformed("unterminated placeholder")),
                    },
                };
                if name.is_empty() {
                    return Err(malformed("empty placeholder name"));
                }
                if name.contains('{') || name.contains('}') {
                    return Err(malformed("nested braces in placeholder"));
                }
                if seen_names.iter().any(|n| n == name) {
                    return Err(malformed("duplicate placeholder name"));
                }
                seen_names.push(name.to_string());
                PatternSegment::Param {
                    name: name.to_string(),
                    optional,
                }
            } else {
                if raw_segment.contains('{') || raw_segment.contains('}') {
                    return Err(malformed("stray brace in literal segment"));
                }
                PatternSegment::Literal(raw_segment.to_string())
            };

            let optional = matches!(segment, PatternSegment::Param { optional: true, .. });
            if seen_optional && !optional {
                return Err(malformed("optional placeholder must be trailing"));
            }
            seen_optional |= optional;
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern text as registered
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments, in order
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Placeholder names with their optionality, in pattern order
    pub fn placeholders(&self) -> impl Iterator<Item = (&str, bool)> {
        self.segments.iter().filter_map(|s| match s {
            PatternSegment::Param { name, optional } => Some((name.as_str(), *optional)),
            PatternSegment::Literal(_) => None,
        })
    }

    /// Specificity key used to break ties between matching patterns
    ///
    /// Primary: literal segments before the first placeholder.
    /// Secondary: total literal segments. Higher wins; registration
    /// order breaks remaining ties.
    pub fn specificity(&self) -> (usize, usize) {
        let prefix = self
            .segments
            .iter()
            .take_while(|s| matches!(s, PatternSegment::Literal(_)))
            .count();
        let total = self
            .segments
            .iter()
            .filter(|s| matches!(s, PatternSegment::Literal(_)))
            .count();
        (prefix, total)
    }

    /// Match path segments against this pattern
    ///
    /// Returns percent-decoded placeholder values on a match. Trailing
    /// optional segments may be absent from the path.
    pub fn match_path(&self, path: &[&str]) -> Option<HashMap<String, String>> {
        if path.len() > self.segments.len() {
            return None;
        }
        if path.len() < self.segments.len() {
            let omitted = &self.segments[path.len()..];
            if !omitted
                .iter()
                .all(|s| matches!(s, PatternSegment::Param { optional: true, .. }))
            {
                return None;
            }
        }

        let mut values = HashMap::new();
        for (segment, actual) in self.segments.iter().zip(path.iter()) {
            match segment {
                PatternSegment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                PatternSegment::Param { name, .. } => {
                    values.insert(
                        name.clone(),
                        urlencoding::decode(actual).ok()?.into_owned(),
                    );
                }
            }
        }
        Some(values)
    }

    /// Instantiate the pattern with concrete argument values
    ///
    /// Inverse of [`RoutePattern::match_path`]: every placeholder must
    /// have a value in `values`.
    pub fn instantiate(
        &self,
        destination: &str,
        values: &HashMap<String, ArgValue>,
    ) -> Result<String, ResolutionError> {
        let mut parts = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                PatternSegment::Literal(text) => parts.push(text.clone()),
                PatternSegment::Param { name, .. } => {
                    let value = values.get(name).ok_or_else(|| {
                        ResolutionError::MissingRequiredArgument {
                            destination: destination.to_string(),
                            name: name.clone(),
                        }
                    })?;
                    parts.push(urlencoding::encode(&value.to_string()).into_owned());
                }
            }
        }
        Ok(parts.join("/"))
    }
}
