//! Turning a block header into the matching scope node.

use log::debug;

use crate::config::ResolverConfig;
use crate::error::{Result, ValidationError};
use crate::params::{Condition, FormalParameters};
use crate::scope::ScopeNode;
use crate::types::is_valid_method_name;

/// Builds scope nodes from the block tag and raw parameter string the front end
/// reports when it opens a block.
///
/// The factory only allocates: it never attaches the node to a tree or enters
/// it into the method namespace. That is up to the caller.
#[derive(Debug, Clone, Default)]
pub struct ScopeFactory {
    config: ResolverConfig,
}

impl ScopeFactory {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Produce the scope for a block.
    ///
    /// * the main tag yields the root scope, ignoring `parameters`;
    /// * the conditional tag yields an `if`/`while` scope whose condition is
    ///   parsed from `parameters`;
    /// * any other tag yields a method scope named after the tag, with
    ///   `parameters` parsed as its formal parameter list.
    pub fn produce(&self, kind_tag: &str, parameters: &str) -> Result<ScopeNode> {
        if kind_tag == self.config.main_tag {
            return Ok(ScopeNode::root());
        }

        if kind_tag == self.config.conditional_tag {
            let condition = Condition::parse(parameters)?;
            return Ok(ScopeNode::conditional(condition));
        }

        if !is_valid_method_name(kind_tag) {
            return Err(ValidationError::InvalidName { name: kind_tag.to_string() });
        }
        let formal = FormalParameters::parse(parameters)?;
        debug!("producing method scope `{}` with {} parameter(s)", kind_tag, formal.len());
        Ok(ScopeNode::callable(kind_tag, formal))
    }
}
