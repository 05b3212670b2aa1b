//! Whole-program walks, driving the factory, tree and resolver the way the
//! front end does.

use sjava_scope::{Resolver, ScopeFactory, ScopeTree, SymbolType, ValidationError};

#[test]
fn test_method_body_with_nested_block() {
    let factory = ScopeFactory::default();
    let mut tree = ScopeTree::from_root(factory.produce("main", "").unwrap()).unwrap();
    let root = tree.root();

    // void bar(int n) { int x; x = 1; if (n) { x = 2; } return x; }
    let bar = Resolver::declare_method(&tree, &factory, "bar", "int n", root).unwrap();
    let bar = tree.register_method(bar).unwrap();

    assert!(Resolver::declare_variable(&tree, "x", bar));
    Resolver::define_variable(&mut tree, bar, "x", SymbolType::Int, false, false).unwrap();
    assert_eq!(Resolver::assign_variable(&mut tree, "x", bar), Ok(SymbolType::Int));
    assert_eq!(Resolver::check_initialized(&tree, "x", bar), Ok(SymbolType::Int));

    let branch = tree.attach(factory.produce("ifWhile", "n").unwrap(), bar).unwrap();
    Resolver::check_condition(&tree, branch).unwrap();
    assert_eq!(Resolver::assign_variable(&mut tree, "x", branch), Ok(SymbolType::Int));
    assert!(Resolver::lookup_local(&tree, "x", branch).is_some());

    tree.close(branch).unwrap();
    assert!(!tree.contains(branch));
    assert_eq!(Resolver::check_initialized(&tree, "x", bar), Ok(SymbolType::Int));
}

#[test]
fn test_branch_assignment_does_not_leak_out() {
    let factory = ScopeFactory::default();
    let mut tree = ScopeTree::from_root(factory.produce("main", "").unwrap()).unwrap();
    let root = tree.root();

    // int g; void f() { while (true) { g = 3; } g; }
    Resolver::define_variable(&mut tree, root, "g", SymbolType::Int, false, false).unwrap();
    let f = Resolver::declare_method(&tree, &factory, "f", "", root).unwrap();
    let f = tree.register_method(f).unwrap();

    let body = tree.attach(factory.produce("ifWhile", "true").unwrap(), f).unwrap();
    Resolver::assign_variable(&mut tree, "g", body).unwrap();
    tree.close(body).unwrap();

    assert_eq!(
        Resolver::check_initialized(&tree, "g", f),
        Err(ValidationError::UninitializedRead { name: "g".to_string() })
    );
}

#[test]
fn test_final_variable_assigned_twice() {
    let mut tree = ScopeTree::new();
    let scope = tree.root();

    // final int y = 5; y = 6;
    Resolver::define_variable(&mut tree, scope, "y", SymbolType::Int, true, true).unwrap();
    assert_eq!(Resolver::check_initialized(&tree, "y", scope), Ok(SymbolType::Int));
    assert_eq!(
        Resolver::assign_variable(&mut tree, "y", scope),
        Err(ValidationError::FinalityViolation { name: "y".to_string() })
    );
    // The failed assignment changes nothing.
    assert_eq!(Resolver::check_initialized(&tree, "y", scope), Ok(SymbolType::Int));
}

#[test]
fn test_global_assigned_inside_method_copies_into_body() {
    let factory = ScopeFactory::default();
    let mut tree = ScopeTree::from_root(factory.produce("main", "").unwrap()).unwrap();
    let root = tree.root();

    Resolver::define_variable(&mut tree, root, "limit", SymbolType::Double, false, false).unwrap();
    let m = Resolver::declare_method(&tree, &factory, "m", "", root).unwrap();
    let m = tree.register_method(m).unwrap();

    assert_eq!(Resolver::assign_variable(&mut tree, "limit", m), Ok(SymbolType::Double));
    assert_eq!(Resolver::check_initialized(&tree, "limit", m), Ok(SymbolType::Double));

    // Re-entering the method body starts from its parameters only.
    tree.close(m).unwrap();
    assert!(Resolver::lookup_local(&tree, "limit", m).is_none());
    assert!(Resolver::check_initialized(&tree, "limit", m).is_err());
}
