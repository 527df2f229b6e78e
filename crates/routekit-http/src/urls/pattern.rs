//! Route pattern compilation, matching, and expansion.
//!
//! A route pattern is regex text with `{name}` or `{name:subpattern}`
//! placeholders. Names match `[a-zA-Z_][a-zA-Z0-9_-]*`; whitespace is allowed
//! around the name and after the colon. A subpattern may contain balanced
//! `{...}` groups (e.g. `{code:[a-z]{2,4}}`), found with an explicit brace
//! scanner. Four shortcuts are expanded textually before scanning:
//!
//! | Shortcut | Expands to |
//! |---|---|
//! | `{x:i}` | `[0-9]+` |
//! | `{x:a}` | `[0-9A-Za-z]+` |
//! | `{x:al}` | `[a-zA-Z0-9+_\-\.]+` |
//! | `{x:any}` | `.*` |
//!
//! A placeholder with no subpattern matches one or more characters other
//! than `/`. Text outside placeholders is used as regex verbatim, so a pattern
//! may carry its own groups, e.g. `/news(/{page:i})?`.

use std::borrow::Cow;
use std::fmt::Write as _;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use routekit_core::{RouteError, RouteResult};

use super::parameter::ParameterSource;

/// The default parameter character restriction (one or more characters that are not `/`).
pub const DEFAULT_PARAMETER_REGEX: &str = "[^/]+";

/// Shortcut expansions, longest key first so `:al}` wins over `:a}`.
const SHORTCUTS: [(&str, &str); 4] = [
    (":any}", ":.*}"),
    (":al}", r":[a-zA-Z0-9+_\-\.]+}"),
    (":i}", ":[0-9]+}"),
    (":a}", ":[0-9A-Za-z]+}"),
];

/// Characters escaped when a value is written into a generated path. `/` is
/// kept so catch-all values like `docs/readme.md` stay readable.
const PATH_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped when literal pattern text is written into a generated
/// path. Regex and path punctuation pass through untouched.
const PATH_LITERAL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// A placeholder found in a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    name: String,
    subpattern: Option<String>,
    text: String,
}

impl Placeholder {
    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The custom subpattern, if one was given (after shortcut expansion).
    pub fn subpattern(&self) -> Option<&str> {
        self.subpattern.as_deref()
    }

    /// The regex this placeholder's value must match.
    pub fn regex(&self) -> &str {
        self.subpattern.as_deref().unwrap_or(DEFAULT_PARAMETER_REGEX)
    }

    /// The literal placeholder text, e.g. `{id:[0-9]+}`.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Placeholder(usize),
}

/// A route pattern compiled once, at registration time.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    placeholders: Vec<Placeholder>,
    segments: Vec<Segment>,
    matcher: Regex,
    group_names: Vec<String>,
    validators: Vec<Regex>,
}

impl CompiledPattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if a placeholder is left open or
    /// the resulting regex does not compile.
    pub fn compile(pattern: &str) -> RouteResult<Self> {
        let expanded = expand_shortcuts(pattern);
        let (placeholders, segments) = scan(pattern, &expanded)?;

        let mut regex_str = String::from("(?i)^");
        let group_names: Vec<String> = (0..placeholders.len()).map(group_name).collect();
        let mut validators = Vec::with_capacity(placeholders.len());
        for segment in &segments {
            match segment {
                Segment::Literal(text) => regex_str.push_str(text),
                Segment::Placeholder(index) => {
                    let placeholder = &placeholders[*index];
                    write!(
                        regex_str,
                        "(?P<{}>{})",
                        group_names[*index],
                        placeholder.regex()
                    )
                    .ok();
                    validators.push(build_regex(
                        pattern,
                        &format!("^(?:{})$", placeholder.regex()),
                    )?);
                }
            }
        }
        regex_str.push('$');

        Ok(Self {
            source: pattern.to_string(),
            matcher: build_regex(pattern, &regex_str)?,
            placeholders,
            segments,
            group_names,
            validators,
        })
    }

    /// Returns the pattern as written at registration.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the placeholders in order of appearance.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Returns the anchored, case-insensitive matching regex.
    pub const fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Percent-decodes `path` and matches it against the whole pattern.
    ///
    /// On success returns one value per placeholder, in placeholder order.
    /// A placeholder inside an optional group that did not participate yields
    /// `None`.
    pub fn captures(&self, path: &str) -> Option<Vec<Option<String>>> {
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let caps = self.matcher.captures(&decoded)?;
        Some(
            self.group_names
                .iter()
                .map(|group| caps.name(group).map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Substitutes a value for every placeholder.
    ///
    /// Every placeholder needs a value that fully matches its subpattern
    /// (case-sensitively); values are then percent-encoded for use in a path.
    /// Literal text is written as-is except for spaces, quotes, angle
    /// brackets, backticks, controls and non-ASCII, which are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::MissingOrInvalidParameter`] naming the first
    /// placeholder whose value is absent or does not match.
    pub fn expand<P>(&self, params: &P) -> RouteResult<String>
    where
        P: ParameterSource + ?Sized,
    {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.extend(utf8_percent_encode(text, PATH_LITERAL)),
                Segment::Placeholder(index) => {
                    let placeholder = &self.placeholders[*index];
                    let value = params
                        .parameter_value(placeholder.name())
                        .filter(|v| self.validators[*index].is_match(v))
                        .ok_or_else(|| {
                            RouteError::MissingOrInvalidParameter(placeholder.name.clone())
                        })?;
                    out.extend(utf8_percent_encode(&value, PATH_VALUE));
                }
            }
        }
        Ok(out)
    }
}

fn group_name(index: usize) -> String {
    format!("__rk_p{index}")
}

fn build_regex(pattern: &str, regex_str: &str) -> RouteResult<Regex> {
    Regex::new(regex_str).map_err(|e| RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Expands the `:i`, `:a`, `:al` and `:any` shortcuts. Replacement text is
/// never rescanned.
pub fn expand_shortcuts(pattern: &str) -> Cow<'_, str> {
    if !SHORTCUTS.iter().any(|(from, _)| pattern.contains(from)) {
        return Cow::Borrowed(pattern);
    }

    let mut out = String::with_capacity(pattern.len() + 16);
    let mut rest = pattern;
    'scan: while let Some(ch) = rest.chars().next() {
        for (from, to) in SHORTCUTS {
            if let Some(tail) = rest.strip_prefix(from) {
                out.push_str(to);
                rest = tail;
                continue 'scan;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    Cow::Owned(out)
}

/// Splits the expanded pattern into literal text and placeholders.
fn scan(original: &str, pattern: &str) -> RouteResult<(Vec<Placeholder>, Vec<Segment>)> {
    let mut placeholders = Vec::new();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(offset) = pattern[pos..].find('{') {
        let start = pos + offset;
        match parse_placeholder(original, pattern, start)? {
            Some((placeholder, end)) => {
                if literal_start < start {
                    segments.push(Segment::Literal(pattern[literal_start..start].to_string()));
                }
                segments.push(Segment::Placeholder(placeholders.len()));
                placeholders.push(placeholder);
                literal_start = end;
                pos = end;
            }
            None => pos = start + 1,
        }
    }

    if literal_start < pattern.len() {
        segments.push(Segment::Literal(pattern[literal_start..].to_string()));
    }

    Ok((placeholders, segments))
}

/// Parses a placeholder starting at the `{` at byte `start`.
///
/// Returns `Ok(None)` when the brace does not open a placeholder (e.g. a
/// regex quantifier like `{2}` in literal text), and the placeholder with the
/// byte offset just past its closing `}` otherwise.
fn parse_placeholder(
    original: &str,
    pattern: &str,
    start: usize,
) -> RouteResult<Option<(Placeholder, usize)>> {
    let bytes = pattern.as_bytes();
    let mut i = skip_whitespace(bytes, start + 1);

    let name_start = i;
    match bytes.get(i) {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => i += 1,
        _ => return Ok(None),
    }
    while matches!(bytes.get(i), Some(b) if b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
    {
        i += 1;
    }
    let name = &pattern[name_start..i];
    i = skip_whitespace(bytes, i);

    let subpattern = match bytes.get(i) {
        Some(b'}') => None,
        Some(b':') => {
            let sub_start = skip_whitespace(bytes, i + 1);
            let sub_end = find_closing_brace(bytes, sub_start).ok_or_else(|| {
                RouteError::InvalidPattern {
                    pattern: original.to_string(),
                    message: format!("unclosed placeholder [{name}]"),
                }
            })?;
            i = sub_end;
            Some(&pattern[sub_start..sub_end]).filter(|s| !s.is_empty())
        }
        _ => return Ok(None),
    };

    let end = i + 1;
    Ok(Some((
        Placeholder {
            name: name.to_string(),
            subpattern: subpattern.map(String::from),
            text: pattern[start..end].to_string(),
        },
        end,
    )))
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while matches!(bytes.get(i), Some(b) if b.is_ascii_whitespace()) {
        i += 1;
    }
    i
}

/// Finds the `}` that closes a subpattern, skipping balanced `{...}` pairs.
fn find_closing_brace(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match b {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            _ => {}
        }
    }
    None
}
