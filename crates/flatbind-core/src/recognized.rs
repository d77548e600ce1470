//! Classification of type names the exporter treats specially.
//!
//! Two families get dedicated lowering rules:
//!
//! - **Math value types** living in a math namespace (`glm` by default).
//!   They are synthesized into flat structs such as `Vector3` on demand.
//! - **Views and containers** from the standard library. As parameters,
//!   `std::span` and `std::string_view` become a `(pointer, size)` pair. As
//!   return values, all four kinds are handed back through a callback.
//!
//! Everything here is plain name matching over a small closed set; the
//! result is always a [`RecognizedKind`].

use num_enum::IntoPrimitive;

/// Family of a math value type.
///
/// The discriminant is the index of the element type among the template
/// arguments of the family's class template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive)]
#[repr(usize)]
pub enum MathFamily {
    /// `qua<T, Q>`
    Quaternion = 0,
    /// `vec<L, T, Q>`
    Vector = 1,
    /// `mat<C, R, T, Q>`
    Matrix = 2,
}

impl MathFamily {
    /// Name fragments in scan order; the first match wins.
    pub const PATTERNS: [(&'static str, MathFamily); 3] = [
        ("quat", MathFamily::Quaternion),
        ("vec", MathFamily::Vector),
        ("mat", MathFamily::Matrix),
    ];

    /// Replacement for the matched fragment.
    pub const fn replacement(self) -> &'static str {
        match self {
            MathFamily::Quaternion => "Quaternion",
            MathFamily::Vector => "Vector",
            MathFamily::Matrix => "Matrix",
        }
    }

    /// Index of the element type in the template argument list.
    pub fn element_index(self) -> usize {
        self.into()
    }
}

/// A recognized standard view or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Span,
    StringView,
    String,
    Vector,
}

impl ViewKind {
    const NAMES: [(&'static str, ViewKind); 6] = [
        ("std::span", ViewKind::Span),
        ("std::string_view", ViewKind::StringView),
        ("std::basic_string_view", ViewKind::StringView),
        ("std::string", ViewKind::String),
        ("std::basic_string", ViewKind::String),
        ("std::vector", ViewKind::Vector),
    ];

    /// Whether a parameter of this kind is lowered to `(pointer, size)`.
    pub fn is_param_view(self) -> bool {
        matches!(self, ViewKind::Span | ViewKind::StringView)
    }

    /// String kinds carry `char` elements without a template argument.
    pub fn is_string(self) -> bool {
        matches!(self, ViewKind::StringView | ViewKind::String)
    }
}

/// Result of classifying a type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizedKind {
    /// A math value type and its exported name (e.g. `Vector3`).
    Math {
        family: MathFamily,
        exported_name: String,
    },
    /// In a math namespace but matching no known fragment.
    UnknownMath,
    /// A standard view or container.
    View(ViewKind),
    /// Nothing special.
    Plain,
}

/// Strip a template argument list and surrounding whitespace.
pub fn strip_template_args(name: &str) -> &str {
    match name.find('<') {
        Some(pos) => name[..pos].trim(),
        None => name.trim(),
    }
}

/// Classify a type spelling against the given math namespaces.
///
/// `name` must not carry cv qualifiers.
pub fn classify(name: &str, math_namespaces: &[String]) -> RecognizedKind {
    let base = strip_template_args(name);

    if let Some(view) = ViewKind::NAMES
        .iter()
        .find(|(known, _)| *known == base)
        .map(|(_, kind)| *kind)
    {
        return RecognizedKind::View(view);
    }

    for namespace in math_namespaces {
        let prefix = format!("{namespace}::");
        let Some(rest) = name.trim().strip_prefix(&prefix) else {
            continue;
        };
        return match MathFamily::PATTERNS
            .iter()
            .find(|(fragment, _)| rest.contains(fragment))
        {
            Some((fragment, family)) => RecognizedKind::Math {
                family: *family,
                exported_name: rest.replacen(fragment, family.replacement(), 1),
            },
            None => RecognizedKind::UnknownMath,
        };
    }

    RecognizedKind::Plain
}

/// Normalize a built-in scalar spelling for C.
///
/// Drops a leading `const` and the `std::` qualification of fixed-width
/// integer names, so `const std::uint32_t` becomes `uint32_t`.
pub fn normalize_scalar(name: &str) -> String {
    let trimmed = name.trim();
    let unqualified = trimmed.strip_prefix("const ").unwrap_or(trimmed).trim();
    unqualified
        .strip_prefix("std::")
        .unwrap_or(unqualified)
        .to_string()
}
