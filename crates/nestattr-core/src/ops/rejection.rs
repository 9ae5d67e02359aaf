use crate::model::AttributeMap;
use crate::options::RejectIf;
use crate::request::Declaration;

/// Whether an entry should be skipped entirely
///
/// A rejected entry is neither built nor applied to an existing entity.
pub fn call_reject_if(decl: &Declaration<'_>, attrs: &AttributeMap) -> bool {
    match decl.options.reject_if() {
        None => false,
        Some(RejectIf::AllBlank) => attrs.is_all_blank(decl.keys),
        Some(RejectIf::Predicate(predicate)) => predicate(attrs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReservedKeys;
    use crate::options::AssociationOptions;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> AttributeMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_never_rejects() {
        let options = AssociationOptions::default();
        let keys = ReservedKeys::default();
        let decl = Declaration::new(&options, &keys);

        assert!(!call_reject_if(&decl, &attrs(json!({"name": ""}))));
    }

    #[test]
    fn test_all_blank() {
        let options = AssociationOptions::builder().reject_all_blank().build();
        let keys = ReservedKeys::default();
        let decl = Declaration::new(&options, &keys);

        assert!(call_reject_if(&decl, &attrs(json!({"_destroy": "1", "name": ""}))));
        assert!(!call_reject_if(&decl, &attrs(json!({"name": "m"}))));
    }

    #[test]
    fn test_custom_predicate() {
        let options = AssociationOptions::builder()
            .reject_if(|a| a.get("name") == Some(&json!("skip me")))
            .build();
        let keys = ReservedKeys::default();
        let decl = Declaration::new(&options, &keys);

        assert!(call_reject_if(&decl, &attrs(json!({"name": "skip me"}))));
        assert!(!call_reject_if(&decl, &attrs(json!({"name": "keep"}))));
    }
}
