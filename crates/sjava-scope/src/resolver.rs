//! Name resolution over the scope tree.
//!
//! [`Resolver`] holds no state of its own. Every operation receives the tree
//! and the scope the front end is currently in, and either answers or fails
//! with the first [`ValidationError`] it meets.
//!
//! Variables are looked up in the current scope first and then up the chain
//! of enclosing scopes, innermost first. Assigning to a variable that only
//! lives in an enclosing scope copies it into the current scope before marking
//! it initialized, so the outer symbol keeps its own state once the inner
//! block closes. Reading never copies.

use log::{debug, trace};

use crate::error::{NameKind, Result, ValidationError};
use crate::factory::ScopeFactory;
use crate::params::FormalParameters;
use crate::scope::{ScopeId, ScopeNode, ScopeTree};
use crate::symbol::Symbol;
use crate::types::SymbolType;

/// Scope-chain lookups and the legality checks built on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver;

impl Resolver {
    /// Look `name` up in `scope`'s own table.
    ///
    /// An unknown `scope` simply has no symbols.
    pub fn lookup_local<'t>(tree: &'t ScopeTree, name: &str, scope: ScopeId) -> Option<&'t Symbol> {
        tree.get(scope).and_then(|node| node.lookup(name))
    }

    /// Look `name` up in the scopes enclosing `scope`, innermost first.
    ///
    /// The search starts at the parent; `scope` itself is not consulted.
    pub fn lookup_chain<'t>(tree: &'t ScopeTree, name: &str, scope: ScopeId) -> Result<&'t Symbol> {
        Self::lookup_chain_with_owner(tree, name, scope).map(|(_, symbol)| symbol)
    }

    fn lookup_chain_with_owner<'t>(
        tree: &'t ScopeTree,
        name: &str,
        scope: ScopeId,
    ) -> Result<(ScopeId, &'t Symbol)> {
        tree.node(scope)?;
        for scope_id in tree.ancestors(scope).skip(1) {
            trace!("looking up `{}` in {:?}", name, scope_id);
            if let Some(symbol) = tree.node(scope_id)?.lookup(name) {
                return Ok((scope_id, symbol));
            }
        }
        Err(ValidationError::not_found(name))
    }

    /// Resolve `name` locally, then through the chain.
    fn resolve<'t>(tree: &'t ScopeTree, name: &str, scope: ScopeId) -> Result<&'t Symbol> {
        match tree.node(scope)?.lookup(name) {
            Some(symbol) => Ok(symbol),
            None => Self::lookup_chain(tree, name, scope),
        }
    }

    /// Whether `name` may be declared in `scope`.
    ///
    /// Only the local table matters: shadowing a variable of an enclosing
    /// scope is legal, redeclaring one in the same scope is not.
    pub fn declare_variable(tree: &ScopeTree, name: &str, scope: ScopeId) -> bool {
        Self::lookup_local(tree, name, scope).is_none()
    }

    /// Declare a new variable in `scope`.
    ///
    /// This is the only way a `final` variable receives its value: declare it
    /// with `initialized` set. Every later [`Resolver::assign_variable`] on it
    /// fails.
    pub fn define_variable(
        tree: &mut ScopeTree,
        scope: ScopeId,
        name: &str,
        ty: SymbolType,
        is_final: bool,
        initialized: bool,
    ) -> Result<()> {
        let node = tree.node_mut(scope)?;
        if node.lookup(name).is_some() {
            return Err(ValidationError::already_exists(name, NameKind::Variable));
        }

        let symbol = if initialized {
            Symbol::initialized(name, ty, is_final)
        } else {
            Symbol::new(name, ty, is_final)
        };
        node.insert(name, symbol);
        debug!("declared {}{} `{}` in {:?}", if is_final { "final " } else { "" }, ty, name, scope);
        Ok(())
    }

    /// Validate an assignment to `name` from within `scope` and return the
    /// variable's type.
    ///
    /// A local symbol is marked initialized in place. A symbol found only in an
    /// enclosing scope is copied into `scope` first and the copy is marked.
    /// Fails with `FinalityViolation` for a final symbol (before any copy is
    /// made) and with `NameNotFound` if no scope declares `name`.
    pub fn assign_variable(tree: &mut ScopeTree, name: &str, scope: ScopeId) -> Result<SymbolType> {
        if let Some(symbol) = tree.node_mut(scope)?.lookup_mut(name) {
            if symbol.is_final() {
                return Err(ValidationError::FinalityViolation { name: name.to_string() });
            }
            symbol.mark_initialized();
            return Ok(symbol.ty());
        }

        let (owner, ancestor) = Self::lookup_chain_with_owner(tree, name, scope)?;
        if ancestor.is_final() {
            return Err(ValidationError::FinalityViolation { name: name.to_string() });
        }

        let mut copy = ancestor.clone();
        copy.mark_initialized();
        let ty = copy.ty();
        tree.node_mut(scope)?.insert(name, copy);

        debug!("shadowed `{}` from {:?} into {:?} on assignment", name, owner, scope);
        Ok(ty)
    }

    /// Validate a read of `name` from within `scope` and return its type.
    ///
    /// Fails with `NameNotFound` if no scope declares `name` and with
    /// `UninitializedRead` if the visible symbol was never assigned.
    pub fn check_initialized(tree: &ScopeTree, name: &str, scope: ScopeId) -> Result<SymbolType> {
        let symbol = Self::resolve(tree, name, scope)?;
        if !symbol.is_initialized() {
            return Err(ValidationError::UninitializedRead { name: name.to_string() });
        }
        Ok(symbol.ty())
    }

    /// Check that `name` is free in the method namespace of `root` and build
    /// the method's body scope.
    ///
    /// The returned node is not registered; pass it to
    /// [`ScopeTree::register_method`] to enter it into the namespace.
    pub fn declare_method(
        tree: &ScopeTree,
        factory: &ScopeFactory,
        name: &str,
        parameters: &str,
        root: ScopeId,
    ) -> Result<ScopeNode> {
        if tree.methods_of(root)?.contains_key(name) {
            return Err(ValidationError::already_exists(name, NameKind::Method));
        }
        // A method named after a block tag would come back as a root or conditional scope.
        let config = factory.config();
        if name == config.main_tag || name == config.conditional_tag {
            return Err(ValidationError::InvalidName { name: name.to_string() });
        }
        factory.produce(name, parameters)
    }

    /// Check a call to `name` with the given argument string.
    ///
    /// Returns `Ok(false)` if no such method is registered; whether that is an
    /// error is for the caller to decide. Otherwise returns the method's
    /// verdict on the arguments. Identifier arguments are judged by shape only.
    pub fn call_method(tree: &ScopeTree, name: &str, arguments: &str, root: ScopeId) -> Result<bool> {
        let Some(body) = tree.methods_of(root)?.get(name).copied() else {
            debug!("call to unknown method `{}`", name);
            return Ok(false);
        };
        Self::parameters_of(tree, body)?.check_arguments(arguments, |_| Ok(None))
    }

    /// Like [`Resolver::call_method`], but identifier arguments are resolved
    /// as reads from `scope`, so their types are checked as well. Unknown or
    /// uninitialized argument variables fail the call.
    pub fn call_method_in_scope(
        tree: &ScopeTree,
        name: &str,
        arguments: &str,
        root: ScopeId,
        scope: ScopeId,
    ) -> Result<bool> {
        let Some(body) = tree.methods_of(root)?.get(name).copied() else {
            debug!("call to unknown method `{}`", name);
            return Ok(false);
        };
        Self::parameters_of(tree, body)?
            .check_arguments(arguments, |arg| Self::check_initialized(tree, arg, scope).map(Some))
    }

    fn parameters_of(tree: &ScopeTree, body: ScopeId) -> Result<&FormalParameters> {
        tree.node(body)?.parameters().ok_or_else(|| {
            ValidationError::internal(format!("method namespace entry {:?} is not a method scope", body))
        })
    }

    /// Check the condition guarding the `if`/`while` scope `scope`.
    ///
    /// Each operand must be a boolean, int or double literal, or an
    /// initialized variable of one of those types. Variables are read from the
    /// enclosing scope, since the condition is evaluated before the block is
    /// entered.
    pub fn check_condition(tree: &ScopeTree, scope: ScopeId) -> Result<()> {
        let node = tree.node(scope)?;
        let condition = node.condition().ok_or_else(|| {
            ValidationError::internal(format!("scope {:?} has no condition", scope))
        })?;
        let outer = node
            .parent()
            .ok_or_else(|| ValidationError::internal(format!("condition scope {:?} is detached", scope)))?;

        for operand in condition.operands() {
            let ty = match SymbolType::of_literal(operand) {
                Some(ty) => ty,
                None => Self::check_initialized(tree, operand, outer)?,
            };
            if !ty.is_condition_operand() {
                return Err(ValidationError::TypeMismatch {
                    expected: "boolean".to_string(),
                    found: ty.to_string(),
                    context: format!("condition `{}`", condition.raw()),
                });
            }
        }
        Ok(())
    }
}
