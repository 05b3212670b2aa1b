//! The closed set of primitive kinds a symbol can have, plus literal typing.

use std::fmt;
use std::str::FromStr;

/// The primitive types of s-Java. There are no user-defined types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolType {
    /// `int`
    Int,
    /// `double`
    Double,
    /// `boolean`
    Boolean,
    /// `char`
    Char,
    /// `String`
    String,
}

/// Words that can never be used as a variable, parameter or method name.
pub const RESERVED_WORDS: &[&str] = &[
    "int", "double", "boolean", "char", "String", "final", "if", "while", "true", "false",
    "return", "void",
];

impl SymbolType {
    /// All primitive types, in declaration order.
    pub const ALL: [SymbolType; 5] = [
        SymbolType::Int,
        SymbolType::Double,
        SymbolType::Boolean,
        SymbolType::Char,
        SymbolType::String,
    ];

    /// The source keyword naming this type.
    pub fn keyword(self) -> &'static str {
        match self {
            SymbolType::Int => "int",
            SymbolType::Double => "double",
            SymbolType::Boolean => "boolean",
            SymbolType::Char => "char",
            SymbolType::String => "String",
        }
    }

    /// Whether a value of type `value` may be stored in a slot of this type.
    ///
    /// Besides identical types, an `int` widens to `double`, and both numeric
    /// types are accepted where a `boolean` is expected.
    pub fn accepts(self, value: SymbolType) -> bool {
        match (self, value) {
            (expected, found) if expected == found => true,
            (SymbolType::Double, SymbolType::Int) => true,
            (SymbolType::Boolean, SymbolType::Int | SymbolType::Double) => true,
            _ => false,
        }
    }

    /// Whether a value of this type can stand as an `if`/`while` operand.
    pub fn is_condition_operand(self) -> bool {
        SymbolType::Boolean.accepts(self)
    }

    /// Determine the type of a literal, or `None` if `text` is not a literal.
    pub fn of_literal(text: &str) -> Option<SymbolType> {
        let text = text.trim();
        if text == "true" || text == "false" {
            return Some(SymbolType::Boolean);
        }
        if is_int_literal(text) {
            return Some(SymbolType::Int);
        }
        if is_double_literal(text) {
            return Some(SymbolType::Double);
        }
        if is_char_literal(text) {
            return Some(SymbolType::Char);
        }
        if is_string_literal(text) {
            return Some(SymbolType::String);
        }
        None
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for SymbolType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SymbolType::ALL
            .into_iter()
            .find(|ty| ty.keyword() == s)
            .ok_or_else(|| format!("unknown type `{}`", s))
    }
}

/// Whether `name` is a legal variable or parameter name.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if name == "_" || RESERVED_WORDS.contains(&name) {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `name` is a legal method name. Method names must start with a letter.
pub fn is_valid_method_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic()) && is_valid_identifier(name)
}

fn strip_sign(text: &str) -> &str {
    text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text)
}

fn is_int_literal(text: &str) -> bool {
    let digits = strip_sign(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_double_literal(text: &str) -> bool {
    let body = strip_sign(text);
    let Some((whole, fraction)) = body.split_once('.') else {
        return false;
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    // One side of the point may be empty ("5." and ".5"), but not both.
    (!whole.is_empty() || !fraction.is_empty()) && all_digits(whole) && all_digits(fraction)
}

fn is_char_literal(text: &str) -> bool {
    text.strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .is_some_and(|inner| inner.chars().count() == 1)
}

fn is_string_literal(text: &str) -> bool {
    text.len() >= 2
        && text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .is_some_and(|inner| !inner.contains('"'))
}
