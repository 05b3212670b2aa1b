//! Variable symbols stored in a scope's table.

use crate::types::SymbolType;

/// A single variable (or parameter) visible in a scope.
///
/// Type and finality are fixed when the symbol is created. The only mutable
/// state is the initialization flag, which moves from `false` to `true` once
/// and never back.
///
/// Cloning a symbol yields an independent entry carrying the same type,
/// finality and initialization state. Inner scopes rely on this when they
/// shadow an outer variable on first assignment: initializing the clone leaves
/// the original untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    name: String,
    ty: SymbolType,
    is_final: bool,
    initialized: bool,
}

impl Symbol {
    /// Create an uninitialized symbol.
    pub fn new(name: impl Into<String>, ty: SymbolType, is_final: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            is_final,
            initialized: false,
        }
    }

    /// Create a symbol that already holds a value, such as a method parameter
    /// or a variable declared together with its initializer.
    pub fn initialized(name: impl Into<String>, ty: SymbolType, is_final: bool) -> Self {
        let mut symbol = Self::new(name, ty, is_final);
        symbol.mark_initialized();
        symbol
    }

    /// The name the symbol was declared under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn ty(&self) -> SymbolType {
        self.ty
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Whether an assignment to this symbol has been validated.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Record a validated assignment. Idempotent.
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }
}
