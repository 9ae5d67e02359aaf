//! Immutable registry of nested attributes declarations
//!
//! Built once when the owning type is defined, then passed explicitly into
//! every reconciliation call.

use std::collections::BTreeMap;

use crate::errors::{NestedAttributesError, Result};
use crate::model::ReservedKeys;
use crate::options::AssociationOptions;

#[derive(Debug, Clone, Default)]
pub struct NestedAttributesRegistry {
    options: BTreeMap<String, AssociationOptions>,
    reserved_keys: ReservedKeys,
}

impl NestedAttributesRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Parse declarations from TOML, one table per association
    ///
    /// ```
    /// use nestattr_core::NestedAttributesRegistry;
    ///
    /// let registry = NestedAttributesRegistry::from_toml_str(r#"
    ///     [children]
    ///     allow_destroy = true
    ///     destroy_if = { blank = "name" }
    /// "#).unwrap();
    ///
    /// assert!(registry.get("children").unwrap().allow_destroy());
    /// ```
    ///
    /// # Errors
    ///
    /// `ConfigParse` for malformed TOML or a non-table entry, otherwise any
    /// error from [`AssociationOptions::from_table`].
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let root = src
            .parse::<toml::Table>()
            .map_err(|e| NestedAttributesError::ConfigParse {
                message: e.to_string(),
            })?;

        let mut builder = Self::builder();
        for (association, value) in &root {
            let table = value
                .as_table()
                .ok_or_else(|| NestedAttributesError::ConfigParse {
                    message: format!("`{}` must be a table of options", association),
                })?;
            let options = AssociationOptions::from_table(association, table)?;
            builder = builder.accepts_nested_attributes_for(&[association.as_str()], options);
        }

        Ok(builder.build())
    }

    /// Options declared for an association
    ///
    /// # Errors
    ///
    /// `UnknownAssociation` if nothing was declared under that name.
    pub fn get(&self, association: &str) -> Result<&AssociationOptions> {
        self.options
            .get(association)
            .ok_or_else(|| NestedAttributesError::UnknownAssociation {
                association: association.to_string(),
            })
    }

    pub fn reserved_keys(&self) -> &ReservedKeys {
        &self.reserved_keys
    }

    /// Declared association names in sorted order
    pub fn association_names(&self) -> Vec<&str> {
        self.options.keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    options: BTreeMap<String, AssociationOptions>,
    reserved_keys: ReservedKeys,
}

impl RegistryBuilder {
    /// Declare the same options for one or more associations
    ///
    /// Re-declaring a name replaces its earlier options.
    pub fn accepts_nested_attributes_for(
        mut self,
        associations: &[&str],
        options: AssociationOptions,
    ) -> Self {
        for association in associations {
            self.options
                .insert((*association).to_string(), options.clone());
        }
        self
    }

    pub fn reserved_keys(mut self, keys: ReservedKeys) -> Self {
        self.reserved_keys = keys;
        self
    }

    pub fn build(self) -> NestedAttributesRegistry {
        NestedAttributesRegistry {
            options: self.options,
            reserved_keys: self.reserved_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_declares_several_names() {
        let registry = NestedAttributesRegistry::builder()
            .accepts_nested_attributes_for(
                &["children", "pets"],
                AssociationOptions::builder().allow_destroy(true).build(),
            )
            .build();

        assert_eq!(registry.association_names(), vec!["children", "pets"]);
        assert!(registry.get("pets").unwrap().allow_destroy());
    }

    #[test]
    fn test_redeclaration_replaces() {
        let registry = NestedAttributesRegistry::builder()
            .accepts_nested_attributes_for(
                &["children"],
                AssociationOptions::builder().allow_destroy(true).build(),
            )
            .accepts_nested_attributes_for(&["children"], AssociationOptions::default())
            .build();

        assert!(!registry.get("children").unwrap().allow_destroy());
    }

    #[test]
    fn test_unknown_association() {
        let registry = NestedAttributesRegistry::default();
        assert!(matches!(
            registry.get("children"),
            Err(NestedAttributesError::UnknownAssociation { .. })
        ));
    }

    #[test]
    fn test_from_toml_rejects_unknown_option_eagerly() {
        let err = NestedAttributesRegistry::from_toml_str(
            r#"
            [children]
            allow_destroy = true

            [pets]
            allow_destory = true
            "#,
        )
        .unwrap_err();

        assert!(err.is_configuration());
        assert!(matches!(
            err,
            NestedAttributesError::UnknownOption { ref key, .. } if key == "allow_destory"
        ));
    }

    #[test]
    fn test_from_toml_parse_errors() {
        assert!(matches!(
            NestedAttributesRegistry::from_toml_str("[children"),
            Err(NestedAttributesError::ConfigParse { .. })
        ));
        assert!(matches!(
            NestedAttributesRegistry::from_toml_str("children = 1"),
            Err(NestedAttributesError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_reserved_keys_override() {
        let registry = NestedAttributesRegistry::builder()
            .reserved_keys(ReservedKeys::default().with_type_discriminator("type"))
            .build();
        assert!(registry.reserved_keys().contains("type"));
    }
}
