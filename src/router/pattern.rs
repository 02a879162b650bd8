use std::collections::HashMap;

/// Marks a parameter segment, as in `/users/:id`.
pub const PARAM_PREFIX: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed route template such as `/users/:id/posts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

/// Splits a path into segments after dropping one leading `/`.
///
/// `""` and `"/"` both yield a single empty segment; a trailing slash adds
/// an empty segment, so `/foo` and `/foo/` never have the same shape.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

impl RoutePattern {
    pub fn parse(source: &str) -> Self {
        let segments = split_path(source)
            .map(|s| match s.strip_prefix(PARAM_PREFIX) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            source: source.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Never empty: even `""` parses to one empty literal.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Matches pre-split path segments against this pattern.
    ///
    /// Literals compare exactly (case-sensitive); parameters accept any
    /// segment, including an empty one.
    pub fn matches(&self, segments: &[&str]) -> Option<HashMap<String, String>> {
        if segments.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, actual) in self.segments.iter().zip(segments) {
            match segment {
                Segment::Literal(lit) if lit == actual => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*actual).to_string());
                }
            }
        }
        Some(params)
    }
}
