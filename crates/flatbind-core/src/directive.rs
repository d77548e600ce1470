//! Export directives attached to declarations.
//!
//! The collector parses the host annotation arguments into [`Directive`]
//! values before lowering starts. Lowering only pattern-matches over this
//! closed set.

use crate::{LoweringError, SourceSite};

/// Argument of a rename directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveArg {
    /// A string literal, e.g. `name("Mesh")`.
    Literal(String),
    /// Any other expression, kept verbatim for diagnostics.
    Expr(String),
}

/// A single export directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Drop this entity from the export.
    Ignore,
    /// Export a record as an opaque handle instead of a value type.
    AsHandle,
    /// Override the default exported identifier.
    Rename(DirectiveArg),
    /// An annotation argument the exporter does not understand. Inert.
    Unrecognized(String),
}

impl Directive {
    /// Rename directive with a literal argument.
    pub fn rename(name: impl Into<String>) -> Self {
        Directive::Rename(DirectiveArg::Literal(name.into()))
    }
}

/// The ordered directive list of one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Directives(Vec<Directive>);

impl Directives {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any `Ignore` directive is present.
    pub fn is_ignored(&self) -> bool {
        self.0.iter().any(|d| matches!(d, Directive::Ignore))
    }

    /// Whether any `AsHandle` directive is present.
    pub fn is_handle(&self) -> bool {
        self.0.iter().any(|d| matches!(d, Directive::AsHandle))
    }

    /// The requested name override, if any. The last rename wins.
    ///
    /// A rename whose argument is not a literal fails with
    /// [`LoweringError::InvalidDirectiveArgument`] reported at `site`.
    pub fn rename(&self, site: &SourceSite) -> Result<Option<&str>, LoweringError> {
        let mut name = None;
        for directive in &self.0 {
            match directive {
                Directive::Rename(DirectiveArg::Literal(literal)) => name = Some(literal.as_str()),
                Directive::Rename(DirectiveArg::Expr(expr)) => {
                    return Err(LoweringError::InvalidDirectiveArgument {
                        site: site.clone(),
                        expr: expr.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Directive>> for Directives {
    fn from(directives: Vec<Directive>) -> Self {
        Self(directives)
    }
}

impl FromIterator<Directive> for Directives {
    fn from_iter<I: IntoIterator<Item = Directive>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let directives = Directives::from(vec![Directive::AsHandle]);
        assert!(directives.is_handle());
        assert!(!directives.is_ignored());
    }

    #[test]
    fn last_rename_wins() {
        let directives = Directives::from(vec![Directive::rename("A"), Directive::rename("B")]);
        assert_eq!(directives.rename(&SourceSite::unknown()), Ok(Some("B")));
    }

    #[test]
    fn non_literal_rename_is_rejected() {
        let directives = Directives::from(vec![Directive::Rename(DirectiveArg::Expr(
            "kName".into(),
        ))]);
        let err = directives.rename(&SourceSite::unknown()).unwrap_err();
        assert!(matches!(err, LoweringError::InvalidDirectiveArgument { ref expr, .. } if expr == "kName"));
    }

    #[test]
    fn unrecognized_is_inert() {
        let directives = Directives::from(vec![Directive::Unrecognized("inline".into())]);
        assert!(!directives.is_ignored());
        assert!(!directives.is_handle());
        assert_eq!(directives.rename(&SourceSite::unknown()), Ok(None));
    }
}
