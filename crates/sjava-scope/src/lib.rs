#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod factory;
pub mod params;
pub mod resolver;
pub mod scope;
pub mod symbol;
pub mod types;

pub use config::ResolverConfig;
pub use error::{ConfigError, NameKind, Result, ValidationError};
pub use factory::ScopeFactory;
pub use params::{Condition, FormalParameter, FormalParameters};
pub use resolver::Resolver;
pub use scope::{MethodSignature, ScopeId, ScopeKind, ScopeNode, ScopeTree};
pub use symbol::Symbol;
pub use types::SymbolType;
