//! Request and declaration types passed into the reconcilers

use nestattr_core_types::RequestContext;
use serde_json::Value;

use crate::model::ReservedKeys;
use crate::options::AssociationOptions;
use crate::registry::NestedAttributesRegistry;

/// One reconciliation call: which association, and the raw nested input
///
/// The parent entity is reached through the association resolver.
#[derive(Debug, Clone)]
pub struct ReconciliationRequest<'a> {
    pub association: &'a str,
    pub attributes: &'a Value,
    pub context: RequestContext,
}

impl<'a> ReconciliationRequest<'a> {
    pub fn new(association: &'a str, attributes: &'a Value) -> Self {
        Self {
            association,
            attributes,
            context: RequestContext::new(),
        }
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }
}

/// Everything the policies need to know about a declared association
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'a> {
    pub options: &'a AssociationOptions,
    pub keys: &'a ReservedKeys,
}

impl<'a> Declaration<'a> {
    pub fn new(options: &'a AssociationOptions, keys: &'a ReservedKeys) -> Self {
        Self { options, keys }
    }

    /// Look up a declaration by association name
    ///
    /// # Errors
    ///
    /// `UnknownAssociation` if the registry has no entry for the name.
    pub fn lookup(
        registry: &'a NestedAttributesRegistry,
        association: &str,
    ) -> crate::errors::Result<Self> {
        Ok(Self {
            options: registry.get(association)?,
            keys: registry.reserved_keys(),
        })
    }
}
