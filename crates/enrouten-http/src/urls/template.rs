//! Path template parsing and matching.
//!
//! A [`PathTemplate`] is a route path such as `/bar/:id/:action`, split once
//! into literal text and named parameter slots. A parameter starts at `:` and
//! runs to the next `/` (or the end of the path); a `:` with nothing after it
//! is literal text.
//!
//! The same parsed form serves both directions: [`PathTemplate::matcher`]
//! compiles it to a regex for incoming requests, and the `fill_*` methods
//! substitute values for reverse URL generation.

use std::fmt;

use regex::{Regex, RegexBuilder};

use enrouten_core::{EnroutenError, EnroutenResult, RouterOptions};

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Text matched and emitted verbatim.
    Literal(String),
    /// A `:name` placeholder.
    Param(String),
}

/// A parsed `:param` path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    parts: Vec<Part>,
}

impl PathTemplate {
    /// Parses a template. Parsing never fails: anything that is not a
    /// placeholder is literal text.
    ///
    /// # Examples
    ///
    /// ```
    /// use enrouten_http::urls::template::PathTemplate;
    ///
    /// let t = PathTemplate::parse("/bar/:id/:action");
    /// assert_eq!(t.param_names(), vec!["id", "action"]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while let Some(pos) = rest.find(':') {
            let after = &rest[pos + 1..];
            let name_len = after.find('/').unwrap_or(after.len());
            if name_len == 0 {
                // A bare ':' is literal text.
                literal.push_str(&rest[..=pos]);
                rest = after;
                continue;
            }
            literal.push_str(&rest[..pos]);
            if !literal.is_empty() {
                parts.push(Part::Literal(std::mem::take(&mut literal)));
            }
            parts.push(Part::Param(after[..name_len].to_string()));
            rest = &after[name_len..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Self {
            raw: raw.to_string(),
            parts,
        }
    }

    /// Returns the template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed parts in order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns the parameter names in order of appearance.
    pub fn param_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Param(name) => Some(name.as_str()),
                Part::Literal(_) => None,
            })
            .collect()
    }

    /// Fills placeholders left to right, one per value.
    ///
    /// Extra values are ignored. Placeholders left without a value are
    /// emitted as their literal `:name` text.
    pub fn fill_positional<S: AsRef<str>>(&self, values: &[S]) -> String {
        let mut values = values.iter();
        self.render(|_| values.next().map(AsRef::as_ref))
    }

    /// Fills, for each key, the first placeholder with exactly that name.
    ///
    /// Names are compared whole, never as text prefixes: key `id` leaves
    /// `:idx` unfilled instead of producing `7x`. Keys without a matching
    /// placeholder are ignored; placeholders without a key are emitted as
    /// their literal `:name` text.
    pub fn fill_keyed<K: AsRef<str>, V: AsRef<str>>(&self, pairs: &[(K, V)]) -> String {
        let mut slots: Vec<Option<&str>> = vec![None; self.parts.len()];
        for (key, value) in pairs {
            let key = key.as_ref();
            let slot = self.parts.iter().enumerate().position(|(i, part)| {
                slots[i].is_none() && matches!(part, Part::Param(name) if name == key)
            });
            if let Some(i) = slot {
                slots[i] = Some(value.as_ref());
            }
        }
        self.render(|i| slots[i])
    }

    /// Emits the template, asking `value_for` for each param by part index.
    fn render<'a>(&self, mut value_for: impl FnMut(usize) -> Option<&'a str>) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for (i, part) in self.parts.iter().enumerate() {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Param(name) => match value_for(i) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push(':');
                        out.push_str(name);
                    }
                },
            }
        }
        out
    }

    /// Compiles a regex matching request paths against this template.
    ///
    /// Each parameter becomes one capture group, in the order of
    /// [`param_names`](Self::param_names). Unless `options.strict` is set, a
    /// single trailing slash is optional. Unless `options.case_sensitive` is
    /// set, matching ignores case.
    ///
    /// # Errors
    ///
    /// Returns [`EnroutenError::InvalidPattern`] if the template does not
    /// start with `/`.
    pub fn matcher(&self, options: RouterOptions) -> EnroutenResult<Regex> {
        if !self.raw.starts_with('/') {
            return Err(EnroutenError::InvalidPattern {
                pattern: self.raw.clone(),
                reason: "route paths must start with '/'".to_string(),
            });
        }

        let mut pattern = String::from("^");
        for part in &self.parts {
            match part {
                Part::Literal(text) => pattern.push_str(&regex::escape(text)),
                Part::Param(_) => pattern.push_str("([^/]+)"),
            }
        }
        if !options.strict {
            if self.raw.ends_with('/') {
                pattern.push('?');
            } else {
                pattern.push_str("/?");
            }
        }
        pattern.push('$');

        RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|e| EnroutenError::InvalidPattern {
                pattern: self.raw.clone(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
