//! Type expression parsing.
//!
//! Contracts declare parameter and return types as strings such as
//! `Future<Widget>`, `Vec<Option<i64>>` or `()`. This module turns them into
//! a small [`TypeExpr`] tree the inspector can pattern-match on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used for the unit type.
pub const UNIT: &str = "()";

/// A parsed type expression: a (possibly `::`-qualified) name with optional
/// generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
}

impl TypeExpr {
    /// A type without generic arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A generic type applied to `args`.
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// The unit type `()`.
    pub fn unit() -> Self {
        Self::named(UNIT)
    }

    pub fn is_unit(&self) -> bool {
        self.name == UNIT && self.args.is_empty()
    }

    /// Last path segment of the name (`widgets::Widget` -> `Widget`).
    pub fn base_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// The single generic argument, if there is exactly one.
    pub fn single_arg(&self) -> Option<&TypeExpr> {
        match self.args.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (idx, arg) in self.args.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for TypeExpr {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_type_expr(&value).ok_or_else(|| format!("invalid type expression `{}`", value))
    }
}

impl From<TypeExpr> for String {
    fn from(value: TypeExpr) -> Self {
        value.to_string()
    }
}

/// Parse a type string into a [`TypeExpr`].
///
/// Supports:
/// - Unit: `()`
/// - Plain and path names: `Widget`, `widgets::Widget`, `i64`
/// - Generics, nested to any depth: `Future<Vec<widgets::Widget>>`, `HashMap<String, i64>`
///
/// Returns `None` for empty input, unbalanced brackets or invalid names.
///
/// # Examples
///
/// ```
/// use rest_synth_types::parse_type_expr;
///
/// let ty = parse_type_expr("Future<Vec<Widget>>").unwrap();
/// assert_eq!(ty.name, "Future");
/// assert_eq!(ty.args[0].to_string(), "Vec<Widget>");
/// ```
pub fn parse_type_expr(type_str: &str) -> Option<TypeExpr> {
    let type_str = type_str.trim();
    if type_str.is_empty() {
        return None;
    }
    if type_str == UNIT {
        return Some(TypeExpr::unit());
    }

    let (base, args_str) = match type_str.find('<') {
        Some(angle_pos) => (&type_str[..angle_pos], Some(&type_str[angle_pos..])),
        None => (type_str, None),
    };

    let base = base.trim();
    if !is_valid_type_name(base) {
        return None;
    }

    let args = match args_str {
        Some(args_str) => parse_type_args(args_str)?,
        None => Vec::new(),
    };

    Some(TypeExpr::generic(base, args))
}

/// Parse type arguments string like "<T1, T2, T3>".
fn parse_type_args(args_str: &str) -> Option<Vec<TypeExpr>> {
    let inner = args_str.strip_prefix('<')?.strip_suffix('>')?;
    if !brackets_balanced(inner) {
        return None;
    }
    if inner.trim().is_empty() {
        return None;
    }

    split_type_params(inner)
        .into_iter()
        .map(parse_type_expr)
        .collect()
}

fn brackets_balanced(s: &str) -> bool {
    let mut depth: i32 = 0;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn is_valid_type_name(name: &str) -> bool {
    if name.is_empty() || name.starts_with("::") || name.ends_with("::") {
        return false;
    }
    name.split("::").all(|segment| {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}

/// Split type parameters respecting nested angle brackets.
///
/// Given "A, B<C, D>, E", returns ["A", "B<C, D>", "E"] by tracking bracket depth.
pub fn split_type_params(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < s.len() {
        result.push(s[start..].trim());
    }

    result
}
