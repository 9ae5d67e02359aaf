use crate::errors::{NestedAttributesError, Result};
use crate::model::Entity;
use crate::options::Limit;

/// Fail when more entries were supplied than the association allows
///
/// A computed limit is resolved here, against the owning entity, and only
/// when a limit is configured at all.
///
/// # Errors
///
/// `TooManyRecords` if `count` is strictly greater than the bound.
pub fn check_record_limit(
    association: &str,
    limit: Option<&Limit>,
    owner: &dyn Entity,
    count: usize,
) -> Result<()> {
    let Some(limit) = limit else {
        return Ok(());
    };

    let bound = limit.resolve(owner);
    if count > bound {
        return Err(NestedAttributesError::TooManyRecords {
            association: association.to_string(),
            limit: bound,
            count,
        });
    }

    Ok(())
}
