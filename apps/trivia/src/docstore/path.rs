use std::fmt;

use crate::errors::domain::{DomainError, ValidationKind};

const FORBIDDEN: &[char] = &['.', '#', '$', '[', ']', '/'];

/// Slash-separated address of a document, e.g. `users/u1/purchases/hat`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocPath(Vec<String>);

impl DocPath {
    /// Parse `a/b/c`. Leading and trailing slashes are ignored.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidPath,
                "document path is empty",
            ));
        }
        let mut path = Self(Vec::new());
        for segment in trimmed.split('/') {
            path = path.child(segment)?;
        }
        Ok(path)
    }

    /// Append one segment.
    pub fn child(&self, segment: impl AsRef<str>) -> Result<Self, DomainError> {
        let segment = segment.as_ref();
        if segment.is_empty() || segment.contains(FORBIDDEN) {
            return Err(DomainError::validation(
                ValidationKind::InvalidPath,
                format!("invalid path segment '{segment}' under '{self}'"),
            ));
        }
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Ok(Self(segments))
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.len() <= 1 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Last segment, which is the document's key under its parent.
    pub fn key(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// True for `prefix` itself and everything below it.
    pub fn starts_with(&self, prefix: &DocPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn is_child_of(&self, parent: &DocPath) -> bool {
        self.0.len() == parent.0.len() + 1 && self.0.starts_with(&parent.0)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
