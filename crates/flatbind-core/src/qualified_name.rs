use std::fmt;

/// Qualified name of a host declaration.
///
/// Used as the primary key of the type registry and for function
/// de-duplication.
///
/// # Examples
///
/// ```
/// use flatbind_core::QualifiedName;
///
/// let name = QualifiedName::parse("engine::scene::Node");
/// assert_eq!(name.simple_name(), "Node");
/// assert_eq!(name.exported_identifier(), "engine__scene__Node");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Simple name (e.g., "Node", "update", "vec<3, float>")
    pub name: String,
    /// Namespace path (e.g., ["engine", "scene"]).
    /// Empty for the global namespace.
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with namespace.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Parse a qualified spelling such as `engine::Node` or
    /// `glm::vec<3, float, glm::defaultp>`.
    ///
    /// Splits on `::` at template depth zero only; separators inside a
    /// template argument list stay part of the simple name. A leading `::`
    /// is normalized away.
    pub fn parse(s: &str) -> Self {
        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        let mut chars = s.trim().chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '<' => {
                    depth += 1;
                    current.push(ch);
                }
                '>' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ':' if depth == 0 && chars.peek() == Some(&':') => {
                    chars.next();
                    if !current.is_empty() {
                        parts.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(ch),
            }
        }
        if !current.is_empty() {
            parts.push(current);
        }

        match parts.pop() {
            Some(name) => Self {
                name,
                namespace: parts,
            },
            None => Self::global(""),
        }
    }

    /// Check if this is in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// The name with every scope separator replaced by `_`.
    ///
    /// Each `:` becomes one underscore, so `a::B` maps to `a__B`.
    pub fn exported_identifier(&self) -> String {
        self.to_string().replace(':', "_")
    }

    /// Strip `owner` and the following separator from this name.
    ///
    /// Returns `None` when `owner` is not a proper prefix.
    pub fn strip_owner(&self, owner: &QualifiedName) -> Option<String> {
        let full = self.to_string();
        let prefix = format!("{owner}::");
        full.strip_prefix(&prefix).map(str::to_string)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace.join("::"), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}
