//! Parameter-list and condition descriptors carried by callable and conditional scopes.
//!
//! These are the parts of a block header the scope factory parses: the formal
//! parameters of a method declaration and the condition of an `if`/`while`.
//! A callable scope also uses its [`FormalParameters`] to judge the argument
//! string of a call.

use crate::error::{NameKind, Result, ValidationError};
use crate::symbol::Symbol;
use crate::types::{is_valid_identifier, SymbolType};

/// One formal parameter of a method, e.g. `final int count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalParameter {
    pub name: String,
    pub ty: SymbolType,
    pub is_final: bool,
}

impl FormalParameter {
    /// The symbol this parameter introduces into the method body.
    /// Parameters always hold the caller's value, so the symbol starts initialized.
    pub fn to_symbol(&self) -> Symbol {
        Symbol::initialized(self.name.clone(), self.ty, self.is_final)
    }
}

/// The ordered formal parameter list of a method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormalParameters {
    params: Vec<FormalParameter>,
}

impl FormalParameters {
    /// Parse a raw list such as `int a, final String b`.
    ///
    /// An empty (or all-whitespace) string is a method without parameters.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut params: Vec<FormalParameter> = Vec::new();
        if raw.trim().is_empty() {
            return Ok(Self { params });
        }

        for entry in raw.split(',') {
            let param = parse_formal_parameter(raw, entry)?;
            if params.iter().any(|existing| existing.name == param.name) {
                return Err(ValidationError::already_exists(&param.name, NameKind::Parameter));
            }
            params.push(param);
        }

        Ok(Self { params })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormalParameter> {
        self.params.iter()
    }

    /// Judge an argument string against this parameter list.
    ///
    /// Literal arguments are typed directly. Identifier arguments are handed to
    /// `type_of`, which may return `Ok(None)` when the caller has no scope to
    /// resolve them in; such arguments are then accepted by shape alone.
    /// Errors from `type_of` (unknown or uninitialized variables) propagate.
    ///
    /// Returns `Ok(false)` on an arity mismatch, an empty argument, an argument
    /// that is neither a literal nor an identifier, or a type the parameter
    /// does not accept.
    pub fn check_arguments<F>(&self, arguments: &str, mut type_of: F) -> Result<bool>
    where
        F: FnMut(&str) -> Result<Option<SymbolType>>,
    {
        let args = split_arguments(arguments);
        if args.len() != self.params.len() {
            return Ok(false);
        }

        for (param, arg) in self.params.iter().zip(&args) {
            let found = if let Some(ty) = SymbolType::of_literal(arg) {
                Some(ty)
            } else if is_valid_identifier(arg) {
                type_of(arg)?
            } else {
                return Ok(false);
            };

            if let Some(ty) = found {
                if !param.ty.accepts(ty) {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

fn parse_formal_parameter(raw: &str, entry: &str) -> Result<FormalParameter> {
    let malformed = |reason: String| ValidationError::MalformedParameters {
        parameters: raw.to_string(),
        reason,
    };

    let tokens: Vec<&str> = entry.split_whitespace().collect();
    let (is_final, ty, name) = match tokens.as_slice() {
        ["final", ty, name] => (true, *ty, *name),
        [ty, name] => (false, *ty, *name),
        [] => return Err(malformed("empty parameter entry".to_string())),
        _ => {
            return Err(malformed(format!(
                "expected `[final] <type> <name>`, found `{}`",
                entry.trim()
            )))
        }
    };

    let ty = ty.parse::<SymbolType>().map_err(malformed)?;
    if !is_valid_identifier(name) {
        return Err(ValidationError::InvalidName { name: name.to_string() });
    }

    Ok(FormalParameter {
        name: name.to_string(),
        ty,
        is_final,
    })
}

/// Split an argument string on top-level commas. Commas inside quoted
/// literals do not split. An all-whitespace string has no arguments.
pub fn split_arguments(arguments: &str) -> Vec<String> {
    if arguments.trim().is_empty() {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in arguments.chars() {
        match (quote, c) {
            (None, ',') => {
                args.push(current.trim().to_string());
                current.clear();
                continue;
            }
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), _) if open == c => quote = None,
            _ => {}
        }
        current.push(c);
    }
    args.push(current.trim().to_string());

    args
}

/// Split a condition on `||` and `&&` outside quoted literals.
fn split_condition(raw: &str) -> Vec<&str> {
    let mut operands = Vec::new();
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match (quote, bytes[i]) {
            (None, b'"' | b'\'') => quote = Some(bytes[i]),
            (Some(open), c) if open == c => quote = None,
            (None, op @ (b'|' | b'&')) if bytes.get(i + 1) == Some(&op) => {
                operands.push(&raw[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    operands.push(&raw[start..]);

    operands
}

/// The parsed condition of an `if`/`while` block: its `||`/`&&` operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    raw: String,
    operands: Vec<String>,
}

impl Condition {
    /// Parse a raw condition such as `a || b && true`.
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = |reason: String| ValidationError::MalformedCondition {
            condition: raw.to_string(),
            reason,
        };

        if raw.trim().is_empty() {
            return Err(malformed("empty condition".to_string()));
        }

        let mut operands = Vec::new();
        for operand in split_condition(raw) {
            let operand = operand.trim();
            if operand.is_empty() {
                return Err(malformed("missing operand around `||` or `&&`".to_string()));
            }
            if SymbolType::of_literal(operand).is_none() && !is_valid_identifier(operand) {
                return Err(malformed(format!(
                    "`{}` is neither a literal nor a variable name",
                    operand
                )));
            }
            operands.push(operand.to_string());
        }

        Ok(Self {
            raw: raw.trim().to_string(),
            operands,
        })
    }

    /// The condition text as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn operands(&self) -> &[String] {
        &self.operands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape_only(_: &str) -> Result<Option<SymbolType>> {
        Ok(None)
    }

    #[test]
    fn test_parse_empty_parameter_list() {
        let params = FormalParameters::parse("  ").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_parse_parameters() {
        let params = FormalParameters::parse("int a, final String b").unwrap();
        let parsed: Vec<_> = params.iter().collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].ty, SymbolType::Int);
        assert!(!parsed[0].is_final);
        assert_eq!(parsed[1].name, "b");
        assert!(parsed[1].is_final);
    }

    #[test]
    fn test_parse_rejects_bad_entries() {
        assert!(matches!(
            FormalParameters::parse("int a,"),
            Err(ValidationError::MalformedParameters { .. })
        ));
        assert!(matches!(
            FormalParameters::parse("float a"),
            Err(ValidationError::MalformedParameters { .. })
        ));
        assert!(matches!(
            FormalParameters::parse("int 2a"),
            Err(ValidationError::InvalidName { .. })
        ));
        assert!(matches!(
            FormalParameters::parse("int a, double a"),
            Err(ValidationError::NameAlreadyExists { what: NameKind::Parameter, .. })
        ));
    }

    #[test]
    fn test_split_arguments_respects_quotes() {
        assert_eq!(split_arguments("1, \"a,b\", ','"), vec!["1", "\"a,b\"", "','"]);
        assert!(split_arguments("").is_empty());
        assert_eq!(split_arguments("x,"), vec!["x", ""]);
    }

    #[test]
    fn test_check_arguments() {
        let params = FormalParameters::parse("int a, double b, boolean c").unwrap();
        assert!(params.check_arguments("1, 2, 3.5", shape_only).unwrap());
        assert!(params.check_arguments("x, y, z", shape_only).unwrap());
        assert!(!params.check_arguments("1.5, 2, true", shape_only).unwrap());
        assert!(!params.check_arguments("1, 2", shape_only).unwrap());
        assert!(!params.check_arguments("1, , true", shape_only).unwrap());
        assert!(!params.check_arguments("1, 2 + 3, true", shape_only).unwrap());
    }

    #[test]
    fn test_check_arguments_uses_resolved_types() {
        let params = FormalParameters::parse("String s").unwrap();
        let verdict = params
            .check_arguments("count", |_| Ok(Some(SymbolType::Int)))
            .unwrap();
        assert!(!verdict);

        let err = params
            .check_arguments("missing", |name| Err(ValidationError::not_found(name)))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NameNotFound { .. }));
    }

    #[test]
    fn test_condition_operands() {
        let condition = Condition::parse(" a || b && true ").unwrap();
        assert_eq!(condition.operands(), &["a", "b", "true"]);
        assert_eq!(condition.raw(), "a || b && true");
    }

    #[test]
    fn test_condition_keeps_operators_inside_quotes() {
        let condition = Condition::parse("\"a||b\" && '&'").unwrap();
        assert_eq!(condition.operands(), &["\"a||b\"", "'&'"]);
    }

    #[test]
    fn test_condition_rejects_malformed() {
        for raw in ["", "a ||", "&& b", "a | b", "a == b"] {
            assert!(
                matches!(Condition::parse(raw), Err(ValidationError::MalformedCondition { .. })),
                "expected `{}` to be rejected",
                raw
            );
        }
    }
}
