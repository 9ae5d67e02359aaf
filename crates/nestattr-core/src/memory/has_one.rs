use tracing::debug;

use crate::association::{AssociationResolver, SingularAssociation};
use crate::model::{AttributeMap, Entity, Record};

use super::{MemoryStore, SaveSummary};

/// One-to-one view over a [`MemoryStore`]
///
/// A polymorphic association has no single target type to build, so
/// `can_build` reports false for it.
pub struct HasOne<'a> {
    store: &'a mut MemoryStore,
    owner: &'a mut Record,
    name: String,
    current: Option<Record>,
    polymorphic: bool,
}

impl<'a> HasOne<'a> {
    /// Open the view, reading the owner's stored record if there is one
    pub fn new(store: &'a mut MemoryStore, owner: &'a mut Record, name: impl Into<String>) -> Self {
        let name = name.into();
        let current = owner
            .id
            .as_deref()
            .and_then(|owner_id| store.rows(&name, owner_id).first().cloned());
        Self {
            store,
            owner,
            name,
            current,
            polymorphic: false,
        }
    }

    pub fn polymorphic(mut self, polymorphic: bool) -> Self {
        self.polymorphic = polymorphic;
        self
    }

    pub fn current(&self) -> Option<&Record> {
        self.current.as_ref()
    }

    /// Persist the current record
    ///
    /// A marked record is deleted and cleared. A replacement target deletes the
    /// row it replaced.
    pub fn save(&mut self) -> SaveSummary {
        let owner_id = self.store.persist_owner(&mut *self.owner);
        let rows = self.store.rows_mut(&self.name, &owner_id);
        let mut summary = SaveSummary::default();

        match self.current.take() {
            None => {}
            Some(record) if record.marked_for_destruction => {
                if let Some(id) = record.id.as_deref() {
                    rows.retain(|row| row.id.as_deref() != Some(id));
                    summary.deleted += 1;
                }
            }
            Some(mut record) => {
                if record.id.is_none() {
                    record.id = Some(MemoryStore::allocate_id());
                    summary.inserted += 1;
                } else {
                    summary.updated += 1;
                }
                let before = rows.len();
                rows.retain(|row| row.id == record.id);
                summary.deleted += before - rows.len();
                rows.clear();
                rows.push(record.clone());
                self.current = Some(record);
            }
        }

        debug!(
            association = self.name.as_str(),
            inserted = summary.inserted as u64,
            updated = summary.updated as u64,
            deleted = summary.deleted as u64,
            "saved singular association"
        );
        summary
    }
}

impl AssociationResolver for HasOne<'_> {
    type Entity = Record;

    fn owner(&self) -> &dyn Entity {
        &*self.owner
    }
}

impl SingularAssociation for HasOne<'_> {
    fn current_mut(&mut self) -> Option<&mut Record> {
        self.current.as_mut()
    }

    fn can_build(&self) -> bool {
        !self.polymorphic
    }

    fn build(&mut self, fields: AttributeMap) -> &mut Record {
        self.current.insert(Record::new(fields))
    }
}
