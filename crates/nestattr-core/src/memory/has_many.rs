use tracing::debug;

use crate::association::{AddMode, AssociationResolver, CollectionAssociation};
use crate::model::{AttributeMap, Entity, Record};

use super::{upsert, MemoryStore, SaveSummary};

/// Side effect fired when a record is added with callbacks
///
/// Receives the record about to be appended, the materialized target and the
/// owner's stored rows. It may rewrite the target (e.g. reload it), which is
/// what the reconciler's re-resolution step guards against.
pub type OnAddHook = Box<dyn FnMut(&Record, &mut Vec<Record>, &[Record])>;

/// One-to-many view over a [`MemoryStore`]
///
/// The target starts unloaded for a persisted owner and loaded (empty) for a
/// transient one.
pub struct HasMany<'a> {
    store: &'a mut MemoryStore,
    owner: &'a mut Record,
    name: String,
    target: Vec<Record>,
    loaded: bool,
    on_add: Option<OnAddHook>,
}

impl<'a> HasMany<'a> {
    pub fn new(store: &'a mut MemoryStore, owner: &'a mut Record, name: impl Into<String>) -> Self {
        let loaded = !owner.is_persisted();
        Self {
            store,
            owner,
            name: name.into(),
            target: Vec::new(),
            loaded,
            on_add: None,
        }
    }

    pub fn with_on_add<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Record, &mut Vec<Record>, &[Record]) + 'static,
    {
        self.on_add = Some(Box::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Materialize stored rows into the target
    ///
    /// Records already in the target keep their in-memory state.
    pub fn load(&mut self) {
        if let Some(owner_id) = self.owner.id.as_deref() {
            for row in self.store.rows(&self.name, owner_id) {
                if !self.target.iter().any(|r| r.id == row.id) {
                    self.target.push(row.clone());
                }
            }
        }
        self.loaded = true;
    }

    pub fn records(&self) -> &[Record] {
        &self.target
    }

    /// Persist the materialized target
    ///
    /// New records get ids, changed records are written back and records
    /// marked for destruction are deleted and dropped from the target. Stored
    /// rows that were never materialized are left alone.
    pub fn save(&mut self) -> SaveSummary {
        let owner_id = self.store.persist_owner(&mut *self.owner);
        let rows = self.store.rows_mut(&self.name, &owner_id);

        let mut summary = SaveSummary::default();
        let mut kept = Vec::with_capacity(self.target.len());
        for mut record in self.target.drain(..) {
            if record.marked_for_destruction {
                if let Some(id) = record.id.as_deref() {
                    rows.retain(|row| row.id.as_deref() != Some(id));
                    summary.deleted += 1;
                }
                continue;
            }

            if record.id.is_none() {
                record.id = Some(MemoryStore::allocate_id());
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
            upsert(rows, record.clone());
            kept.push(record);
        }
        self.target = kept;

        debug!(
            association = self.name.as_str(),
            inserted = summary.inserted as u64,
            updated = summary.updated as u64,
            deleted = summary.deleted as u64,
            "saved collection"
        );
        summary
    }

    fn push_record(&mut self, record: Record, mode: AddMode) -> &mut Record {
        if mode == AddMode::WithCallbacks {
            if let Some(hook) = self.on_add.as_mut() {
                let stored: &[Record] = match self.owner.id.as_deref() {
                    Some(owner_id) => self.store.rows(&self.name, owner_id),
                    None => &[],
                };
                hook(&record, &mut self.target, stored);
            }
        }

        let index = self.target.len();
        self.target.push(record);
        &mut self.target[index]
    }
}

impl AssociationResolver for HasMany<'_> {
    type Entity = Record;

    fn owner(&self) -> &dyn Entity {
        &*self.owner
    }
}

impl CollectionAssociation for HasMany<'_> {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn target(&self) -> &[Record] {
        &self.target
    }

    fn target_mut(&mut self) -> &mut [Record] {
        &mut self.target
    }

    fn query_by_ids(&self, ids: &[String]) -> Vec<Record> {
        let Some(owner_id) = self.owner.id.as_deref() else {
            return Vec::new();
        };
        self.store
            .rows(&self.name, owner_id)
            .iter()
            .filter(|row| row.id.as_ref().is_some_and(|id| ids.contains(id)))
            .cloned()
            .collect()
    }

    fn build(&mut self, fields: AttributeMap) -> &mut Record {
        self.push_record(Record::new(fields), AddMode::WithCallbacks)
    }

    fn add_to_target(&mut self, entity: Record, mode: AddMode) -> &mut Record {
        self.push_record(entity, mode)
    }
}
