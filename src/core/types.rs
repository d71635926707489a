use serde::Serialize;
use std::fmt;

/// Scheme prepended to inputs that don't carry one.
pub const DEFAULT_SCHEME: &str = "https://";

/// Schemes written without `//` that must not be mistaken for a bare host.
const OPAQUE_SCHEMES: [&str; 5] = ["mailto", "tel", "data", "javascript", "urn"];

/// A single URL to check.
///
/// Holds the raw input exactly as it was provided together with its
/// normalized form. Normalization trims surrounding whitespace and prepends
/// `https://` when no scheme is present; nothing else is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UrlTarget {
    raw: String,
    url: String,
}

impl UrlTarget {
    /// Create a target from a raw input string.
    ///
    /// # Examples
    /// ```
    /// use urlcheck::UrlTarget;
    ///
    /// let target = UrlTarget::new("example.com/docs");
    /// assert_eq!(target.url(), "https://example.com/docs");
    ///
    /// let target = UrlTarget::new("http://example.com");
    /// assert_eq!(target.url(), "http://example.com");
    /// ```
    pub fn new<S: Into<String>>(raw: S) -> Self {
        let raw = raw.into();
        let url = normalize(&raw);
        Self { raw, url }
    }

    /// Build targets from an ordered list of raw inputs, keeping duplicates.
    pub fn from_raw_list<I, S>(inputs: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        inputs.into_iter().map(Self::new).collect()
    }

    /// The input as provided.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The normalized URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// True when the input was empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.url.is_empty()
    }
}

impl From<&str> for UrlTarget {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for UrlTarget {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for UrlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{trimmed}")
    }
}

fn has_scheme(input: &str) -> bool {
    let Some((scheme, rest)) = input.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return false;
    }

    rest.starts_with("//")
        || OPAQUE_SCHEMES
            .iter()
            .any(|opaque| scheme.eq_ignore_ascii_case(opaque))
}
