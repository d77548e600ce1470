/// Settings of a lowering run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweringOptions {
    /// Namespaces whose types are synthesized as math value records.
    pub math_namespaces: Vec<String>,
    /// Maximum nesting of on-demand record lowering triggered by pointers.
    pub max_depth: usize,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            math_namespaces: vec!["glm".to_string()],
            max_depth: 64,
        }
    }
}

impl LoweringOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the math namespaces.
    pub fn with_math_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.math_namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = LoweringOptions::default();
        assert_eq!(options.math_namespaces, vec!["glm"]);
        assert_eq!(options.max_depth, 64);
    }

    #[test]
    fn builders() {
        let options = LoweringOptions::new()
            .with_math_namespaces(["linalg", "glm"])
            .with_max_depth(4);
        assert_eq!(options.math_namespaces, vec!["linalg", "glm"]);
        assert_eq!(options.max_depth, 4);
    }
}
