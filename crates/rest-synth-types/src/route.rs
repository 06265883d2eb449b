//! Route templates and HTTP verbs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP verb carried by a route annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "put")]
    Put,
    #[serde(alias = "patch")]
    Patch,
    #[serde(alias = "delete")]
    Delete,
    #[serde(alias = "head")]
    Head,
    #[serde(alias = "options")]
    Options,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Variant name as written in Rust source (`HttpVerb::Get`).
    pub fn variant_name(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Patch => "Patch",
            Self::Delete => "Delete",
            Self::Head => "Head",
            Self::Options => "Options",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One piece of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePiece {
    /// Text copied verbatim into the URL.
    Literal(String),
    /// A `{name}` token filled from the parameter of the same name.
    Placeholder(String),
}

/// A parsed route template such as `/widgets/{id}`.
///
/// Placeholders are recognized anywhere in the path (`/files/{name}.json`),
/// while [`RouteTemplate::has_segment_placeholder`] only matches a whole
/// `/`-separated segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    pieces: Vec<RoutePiece>,
}

impl RouteTemplate {
    pub fn parse(raw: &str) -> Self {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            let after_open = &rest[open + 1..];
            match after_open.find('}') {
                Some(close) if is_placeholder_name(&after_open[..close]) => {
                    literal.push_str(&rest[..open]);
                    if !literal.is_empty() {
                        pieces.push(RoutePiece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(RoutePiece::Placeholder(after_open[..close].to_string()));
                    rest = &after_open[close + 1..];
                }
                _ => {
                    // Not a placeholder: keep the brace as literal text.
                    literal.push_str(&rest[..=open]);
                    rest = after_open;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            pieces.push(RoutePiece::Literal(literal));
        }

        Self {
            raw: raw.to_string(),
            pieces,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn pieces(&self) -> &[RoutePiece] {
        &self.pieces
    }

    /// Path segments with the leading `/` trimmed.
    pub fn segments(&self) -> Vec<&str> {
        self.raw.trim_start_matches('/').split('/').collect()
    }

    /// Whether some path segment is exactly `{name}`.
    pub fn has_segment_placeholder(&self, name: &str) -> bool {
        let token = format!("{{{}}}", name);
        self.segments().iter().any(|segment| *segment == token)
    }

    /// Placeholder names in order of first appearance, without duplicates.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for piece in &self.pieces {
            if let RoutePiece::Placeholder(name) = piece {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Fill every placeholder using `lookup`.
    ///
    /// Returns the name of the first placeholder `lookup` cannot resolve.
    pub fn fill<F>(&self, mut lookup: F) -> Result<String, String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut url = String::with_capacity(self.raw.len());
        for piece in &self.pieces {
            match piece {
                RoutePiece::Literal(text) => url.push_str(text),
                RoutePiece::Placeholder(name) => match lookup(name) {
                    Some(value) => url.push_str(&value),
                    None => return Err(name.clone()),
                },
            }
        }
        Ok(url)
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Any non-empty token without braces or `/`, matching the raw segment
/// comparison in [`RouteTemplate::has_segment_placeholder`].
fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['{', '}', '/'])
}
