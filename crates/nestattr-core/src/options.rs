//! Per-association nested attributes options
//!
//! Options are immutable once built. Predicates are tagged by how they are
//! invoked (bound to an entity, or handed the attribute map) when they are
//! declared, so the reconcilers never inspect a callable's shape at call time.

use std::sync::Arc;

use crate::errors::{NestedAttributesError, Result};
use crate::model::attributes::is_blank;
use crate::model::{AttributeMap, Entity};

/// Predicate handed the attribute map of one entry
pub type AttrsPredicate = Arc<dyn Fn(&AttributeMap) -> bool + Send + Sync>;

/// Predicate bound to an entity, taking no other input
pub type EntityPredicate = Arc<dyn Fn(&dyn Entity) -> bool + Send + Sync>;

/// Limit computed from the owning entity at call time
pub type LimitFn = Arc<dyn Fn(&dyn Entity) -> usize + Send + Sync>;

/// Option keys accepted in declarative configuration
pub const VALID_KEYS: &[&str] = &[
    "allow_destroy",
    "reject_if",
    "destroy_if",
    "limit",
    "update_only",
];

/// Skip-entirely filter
#[derive(Clone)]
pub enum RejectIf {
    /// Reject when every non-reserved value is blank
    AllBlank,
    Predicate(AttrsPredicate),
}

/// Mark-for-destruction filter
#[derive(Clone)]
pub enum DestroyIf {
    /// Bound to the existing child being assigned, or to the owner for a new entry
    Entity(EntityPredicate),
    Attrs(AttrsPredicate),
}

/// Maximum number of entries per call
#[derive(Clone)]
pub enum Limit {
    Fixed(usize),
    Computed(LimitFn),
}

impl Limit {
    /// Resolve the bound against the owning entity
    pub fn resolve(&self, owner: &dyn Entity) -> usize {
        match self {
            Limit::Fixed(n) => *n,
            Limit::Computed(f) => f(owner),
        }
    }
}

impl std::fmt::Debug for RejectIf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectIf::AllBlank => f.write_str("AllBlank"),
            RejectIf::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl std::fmt::Debug for DestroyIf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DestroyIf::Entity(_) => f.write_str("Entity(..)"),
            DestroyIf::Attrs(_) => f.write_str("Attrs(..)"),
        }
    }
}

impl std::fmt::Debug for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Fixed(n) => write!(f, "Fixed({})", n),
            Limit::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Options for one association
#[derive(Debug, Clone, Default)]
pub struct AssociationOptions {
    allow_destroy: bool,
    reject_if: Option<RejectIf>,
    destroy_if: Option<DestroyIf>,
    limit: Option<Limit>,
    update_only: bool,
}

impl AssociationOptions {
    pub fn builder() -> AssociationOptionsBuilder {
        AssociationOptionsBuilder::default()
    }

    pub fn allow_destroy(&self) -> bool {
        self.allow_destroy
    }

    pub fn reject_if(&self) -> Option<&RejectIf> {
        self.reject_if.as_ref()
    }

    pub fn destroy_if(&self) -> Option<&DestroyIf> {
        self.destroy_if.as_ref()
    }

    pub fn limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    pub fn update_only(&self) -> bool {
        self.update_only
    }

    /// Build options from a declarative table
    ///
    /// Recognized keys are exactly those in [`VALID_KEYS`]. `reject_if`
    /// accepts `"all_blank"` or `{ blank = "<field>" }`; `destroy_if`
    /// accepts `{ blank = "<field>" }`.
    ///
    /// # Errors
    ///
    /// `UnknownOption` for keys outside the recognized set, `InvalidOption`
    /// for values of the wrong shape.
    pub fn from_table(association: &str, table: &toml::Table) -> Result<Self> {
        let mut builder = Self::builder();

        for (key, value) in table {
            let invalid = |reason: &str| NestedAttributesError::InvalidOption {
                association: association.to_string(),
                key: key.clone(),
                reason: reason.to_string(),
            };

            let as_bool = || value.as_bool().ok_or_else(|| invalid("expected a boolean"));

            builder = match key.as_str() {
                "allow_destroy" => builder.allow_destroy(as_bool()?),
                "update_only" => builder.update_only(as_bool()?),
                "limit" => {
                    let n = value
                        .as_integer()
                        .ok_or_else(|| invalid("expected an integer"))?;
                    let n = usize::try_from(n).map_err(|_| invalid("must not be negative"))?;
                    builder.limit(n)
                }
                "reject_if" => match value {
                    toml::Value::String(s) if s == "all_blank" => builder.reject_all_blank(),
                    toml::Value::Table(t) => {
                        let field = blank_field(t).ok_or_else(|| {
                            invalid("expected \"all_blank\" or { blank = \"<field>\" }")
                        })?;
                        builder.reject_if(move |attrs| field_is_blank(attrs, &field))
                    }
                    _ => return Err(invalid("expected \"all_blank\" or { blank = \"<field>\" }")),
                },
                "destroy_if" => {
                    let field = value
                        .as_table()
                        .and_then(blank_field)
                        .ok_or_else(|| invalid("expected { blank = \"<field>\" }"))?;
                    builder.destroy_if_attrs(move |attrs| field_is_blank(attrs, &field))
                }
                _ => {
                    return Err(NestedAttributesError::UnknownOption {
                        association: association.to_string(),
                        key: key.clone(),
                    })
                }
            };
        }

        Ok(builder.build())
    }
}

fn blank_field(table: &toml::Table) -> Option<String> {
    if table.len() != 1 {
        return None;
    }
    table.get("blank")?.as_str().map(str::to_string)
}

/// Absent fields count as blank
fn field_is_blank(attrs: &AttributeMap, field: &str) -> bool {
    attrs.get(field).map_or(true, is_blank)
}

/// Builder for [`AssociationOptions`]
#[derive(Debug, Default)]
pub struct AssociationOptionsBuilder {
    options: AssociationOptions,
}

impl AssociationOptionsBuilder {
    pub fn allow_destroy(mut self, allow: bool) -> Self {
        self.options.allow_destroy = allow;
        self
    }

    pub fn update_only(mut self, update_only: bool) -> Self {
        self.options.update_only = update_only;
        self
    }

    pub fn reject_all_blank(mut self) -> Self {
        self.options.reject_if = Some(RejectIf::AllBlank);
        self
    }

    pub fn reject_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&AttributeMap) -> bool + Send + Sync + 'static,
    {
        self.options.reject_if = Some(RejectIf::Predicate(Arc::new(predicate)));
        self
    }

    pub fn destroy_if_attrs<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&AttributeMap) -> bool + Send + Sync + 'static,
    {
        self.options.destroy_if = Some(DestroyIf::Attrs(Arc::new(predicate)));
        self
    }

    /// Predicate over an entity; a new entry is checked against the owner
    pub fn destroy_if_entity<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&dyn Entity) -> bool + Send + Sync + 'static,
    {
        self.options.destroy_if = Some(DestroyIf::Entity(Arc::new(predicate)));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.options.limit = Some(Limit::Fixed(limit));
        self
    }

    pub fn limit_with<F>(mut self, limit: F) -> Self
    where
        F: Fn(&dyn Entity) -> usize + Send + Sync + 'static,
    {
        self.options.limit = Some(Limit::Computed(Arc::new(limit)));
        self
    }

    pub fn build(self) -> AssociationOptions {
        self.options
    }
}
