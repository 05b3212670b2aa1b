//! Scope nodes and the tree that owns them.
//!
//! Every block the front end opens becomes a [`ScopeNode`] stored in a
//! [`ScopeTree`]. The tree owns all nodes; each node refers to its enclosing
//! scope by [`ScopeId`], which is only ever used to look upward during name
//! resolution.

use fxhash::FxHashMap;
use log::debug;

use crate::error::{NameKind, Result, ValidationError};
use crate::params::{Condition, FormalParameters};
use crate::symbol::Symbol;

/// A unique identifier for a scope in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

/// The signature of a method body scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: FormalParameters,
}

/// What kind of block a scope belongs to.
#[derive(Debug, Clone)]
pub enum ScopeKind {
    /// The single top-level scope. Holds global variables and the flat method
    /// namespace, mapping each method name to its body scope.
    Root {
        methods: FxHashMap<String, ScopeId>,
    },
    /// The body of an `if` or `while`.
    Conditional(Condition),
    /// A method body.
    Callable(MethodSignature),
}

/// A single lexical scope: its kind, its variable table and its parent.
#[derive(Debug, Clone)]
pub struct ScopeNode {
    kind: ScopeKind,
    variables: FxHashMap<String, Symbol>,
    parent: Option<ScopeId>,
}

impl ScopeNode {
    /// A fresh root scope with an empty method namespace.
    pub fn root() -> Self {
        Self::with_kind(ScopeKind::Root { methods: FxHashMap::default() })
    }

    /// A scope for the body of an `if`/`while` guarded by `condition`.
    pub fn conditional(condition: Condition) -> Self {
        Self::with_kind(ScopeKind::Conditional(condition))
    }

    /// A method body scope. Its table starts out holding one initialized
    /// symbol per formal parameter.
    pub fn callable(name: impl Into<String>, parameters: FormalParameters) -> Self {
        let mut node = Self::with_kind(ScopeKind::Callable(MethodSignature {
            name: name.into(),
            parameters,
        }));
        node.seed_parameters();
        node
    }

    fn with_kind(kind: ScopeKind) -> Self {
        Self {
            kind,
            variables: FxHashMap::default(),
            parent: None,
        }
    }

    fn seed_parameters(&mut self) {
        let seeds: Vec<Symbol> = match &self.kind {
            ScopeKind::Callable(signature) => {
                signature.parameters.iter().map(|param| param.to_symbol()).collect()
            }
            _ => return,
        };
        self.variables.clear();
        for symbol in seeds {
            self.variables.insert(symbol.name().to_string(), symbol);
        }
    }

    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, ScopeKind::Root { .. })
    }

    /// The method name, if this is a method body.
    pub fn method_name(&self) -> Option<&str> {
        match &self.kind {
            ScopeKind::Callable(signature) => Some(&signature.name),
            _ => None,
        }
    }

    /// The formal parameters, if this is a method body.
    pub fn parameters(&self) -> Option<&FormalParameters> {
        match &self.kind {
            ScopeKind::Callable(signature) => Some(&signature.parameters),
            _ => None,
        }
    }

    /// The guarding condition, if this is an `if`/`while` body.
    pub fn condition(&self) -> Option<&Condition> {
        match &self.kind {
            ScopeKind::Conditional(condition) => Some(condition),
            _ => None,
        }
    }

    /// Insert a symbol into the local table, returning any symbol it replaced.
    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) -> Option<Symbol> {
        self.variables.insert(name.into(), symbol)
    }

    /// Look a name up in this scope only.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.variables.get(name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.variables.get_mut(name)
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Set the enclosing scope. Only the tree validates the result, so prefer
    /// [`ScopeTree::set_parent`] for nodes that are already attached.
    pub fn set_parent(&mut self, parent: Option<ScopeId>) {
        self.parent = parent;
    }
}

/// Owner of every scope opened during one validation pass.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    /// The scopes in the tree
    scopes: FxHashMap<ScopeId, ScopeNode>,
    /// Child scopes of each scope, used when a block closes
    children: FxHashMap<ScopeId, Vec<ScopeId>>,
    /// The root scope
    root: ScopeId,
    /// The next scope ID to assign
    next_scope_id: usize,
}

impl ScopeTree {
    /// Create a tree holding a fresh root scope.
    pub fn new() -> Self {
        let root_id = ScopeId(0);
        let mut scopes = FxHashMap::default();
        scopes.insert(root_id, ScopeNode::root());

        ScopeTree {
            scopes,
            children: FxHashMap::default(),
            root: root_id,
            next_scope_id: 1,
        }
    }

    /// Create a tree around a root node produced by the scope factory.
    pub fn from_root(mut node: ScopeNode) -> Result<Self> {
        if !node.is_root() {
            return Err(ValidationError::internal("a scope tree must start from a root scope"));
        }
        node.set_parent(None);

        let mut tree = Self::new();
        tree.scopes.insert(tree.root, node);
        Ok(tree)
    }

    /// The root scope ID.
    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn contains(&self, id: ScopeId) -> bool {
        self.scopes.contains_key(&id)
    }

    pub fn get(&self, id: ScopeId) -> Option<&ScopeNode> {
        self.scopes.get(&id)
    }

    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut ScopeNode> {
        self.scopes.get_mut(&id)
    }

    /// Like [`ScopeTree::get`], but an unknown id is an internal error.
    pub fn node(&self, id: ScopeId) -> Result<&ScopeNode> {
        self.scopes
            .get(&id)
            .ok_or_else(|| ValidationError::internal(format!("unknown scope {:?}", id)))
    }

    pub fn node_mut(&mut self, id: ScopeId) -> Result<&mut ScopeNode> {
        self.scopes
            .get_mut(&id)
            .ok_or_else(|| ValidationError::internal(format!("unknown scope {:?}", id)))
    }

    /// The enclosing scope of `id`, if any.
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).and_then(|scope| scope.parent)
    }

    /// Open a block: store `node` as a child of `parent` and return its id.
    ///
    /// Method bodies are not accepted here; they enter the tree through
    /// [`ScopeTree::register_method`].
    pub fn attach(&mut self, node: ScopeNode, parent: ScopeId) -> Result<ScopeId> {
        match node.kind() {
            ScopeKind::Root { .. } => {
                Err(ValidationError::internal("a scope tree has exactly one root scope"))
            }
            ScopeKind::Callable(signature) => Err(ValidationError::internal(format!(
                "method scope `{}` must be registered on the root scope",
                signature.name
            ))),
            ScopeKind::Conditional(_) => self.insert_child(node, parent),
        }
    }

    fn insert_child(&mut self, mut node: ScopeNode, parent: ScopeId) -> Result<ScopeId> {
        self.node(parent)?;

        let id = ScopeId(self.next_scope_id);
        self.next_scope_id += 1;

        node.set_parent(Some(parent));
        self.scopes.insert(id, node);
        self.children.entry(parent).or_default().push(id);

        debug!("opened scope {:?} under {:?}", id, parent);
        Ok(id)
    }

    /// Attach a method body under the root and enter it into the method namespace.
    pub fn register_method(&mut self, node: ScopeNode) -> Result<ScopeId> {
        let name = node
            .method_name()
            .ok_or_else(|| ValidationError::internal("only method scopes can be registered"))?
            .to_string();
        if self.method(&name).is_some() {
            return Err(ValidationError::already_exists(&name, NameKind::Method));
        }

        let root = self.root;
        let id = self.insert_child(node, root)?;
        self.methods_mut()?.insert(name.clone(), id);

        debug!("registered method `{}` as {:?}", name, id);
        Ok(id)
    }

    /// The body scope of the method called `name`, if one is registered.
    pub fn method(&self, name: &str) -> Option<ScopeId> {
        match self.get(self.root).map(ScopeNode::kind) {
            Some(ScopeKind::Root { methods }) => methods.get(name).copied(),
            _ => None,
        }
    }

    /// The method namespace held by `root`. Fails if `root` is not the root scope.
    pub fn methods_of(&self, root: ScopeId) -> Result<&FxHashMap<String, ScopeId>> {
        match self.node(root)?.kind() {
            ScopeKind::Root { methods } => Ok(methods),
            _ => Err(ValidationError::internal(format!("scope {:?} is not the root scope", root))),
        }
    }

    fn methods_mut(&mut self) -> Result<&mut FxHashMap<String, ScopeId>> {
        let root = self.root;
        match &mut self.node_mut(root)?.kind {
            ScopeKind::Root { methods } => Ok(methods),
            _ => Err(ValidationError::internal("root scope lost its method namespace")),
        }
    }

    /// Close a block, discarding it together with every scope nested in it.
    ///
    /// A registered method body stays in the namespace so later calls still
    /// resolve; only its nested scopes are dropped and its table is reset to
    /// the parameter symbols.
    pub fn close(&mut self, id: ScopeId) -> Result<()> {
        if id == self.root {
            return Err(ValidationError::internal("the root scope cannot be closed"));
        }
        let node = self.node(id)?;
        let is_registered = node
            .method_name()
            .is_some_and(|name| self.method(name) == Some(id));

        self.remove_descendants(id);
        if is_registered {
            self.node_mut(id)?.seed_parameters();
            debug!("closed method scope {:?}", id);
            return Ok(());
        }

        if let Some(node) = self.scopes.remove(&id) {
            if let Some(parent) = node.parent {
                if let Some(siblings) = self.children.get_mut(&parent) {
                    siblings.retain(|child| *child != id);
                }
            }
        }
        debug!("closed scope {:?}", id);
        Ok(())
    }

    fn remove_descendants(&mut self, id: ScopeId) {
        let mut pending = self.children.remove(&id).unwrap_or_default();
        while let Some(child) = pending.pop() {
            self.scopes.remove(&child);
            if let Some(grandchildren) = self.children.remove(&child) {
                pending.extend(grandchildren);
            }
        }
    }

    /// Move `id` under a different enclosing scope.
    ///
    /// Fails if either scope is unknown, if `id` is the root or a method body,
    /// or if `parent` is `id` itself or nested inside it. Method bodies stay
    /// directly under the root for as long as they are registered.
    pub fn set_parent(&mut self, id: ScopeId, parent: ScopeId) -> Result<()> {
        if id == self.root {
            return Err(ValidationError::internal("the root scope has no parent"));
        }
        self.node(parent)?;
        let node = self.node(id)?;
        if let Some(name) = node.method_name() {
            return Err(ValidationError::internal(format!(
                "method scope `{}` cannot be moved off the root scope",
                name
            )));
        }
        let old_parent = node.parent;

        let mut current = Some(parent);
        while let Some(scope_id) = current {
            if scope_id == id {
                return Err(ValidationError::internal(format!(
                    "re-parenting {:?} under {:?} would create a cycle",
                    id, parent
                )));
            }
            current = self.parent(scope_id);
        }

        if let Some(old) = old_parent {
            if let Some(siblings) = self.children.get_mut(&old) {
                siblings.retain(|child| *child != id);
            }
        }
        self.children.entry(parent).or_default().push(id);
        self.node_mut(id)?.set_parent(Some(parent));
        Ok(())
    }

    /// Iterate from `id` upward to the root, including `id` itself.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), move |current| self.parent(*current))
    }

    /// Number of live scopes, the root included.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
