//! In-memory ledger of child records, written through to storage on every
//! mutation.
//!
//! The store owns the record list outright. Persistence failures never undo
//! a mutation: the in-memory list stays authoritative for the session and the
//! failure is parked until the caller collects it with
//! [`RecordStore::take_storage_error`].

use std::collections::HashSet;

use shared::{ChildRecord, LedgerSummary};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::commands::{AddChildCommand, ChildPatch};
use super::date_utils::today_iso;
use super::errors::LedgerError;
use crate::storage::LedgerStorage;

pub struct RecordStore {
    records: Vec<ChildRecord>,
    storage: LedgerStorage,
    storage_error: Option<LedgerError>,
}

impl RecordStore {
    /// Load the persisted ledger. A failed load starts an empty session
    /// rather than refusing to start.
    pub async fn open(storage: LedgerStorage) -> Self {
        let (records, storage_error) = match storage.load_children().await {
            Ok(records) => (records, None),
            Err(e) => {
                error!("❌ Failed to load child records: {}", e);
                (Vec::new(), Some(e))
            }
        };

        let mut store = Self {
            records,
            storage,
            storage_error,
        };
        if store.repair_ids() > 0 {
            store.persist().await;
        }
        info!("Loaded {} child records", store.records.len());
        store
    }

    pub fn records(&self) -> &[ChildRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ChildRecord> {
        self.records.iter().find(|c| c.id == id)
    }

    /// Create a record from user input and append it
    pub async fn add(&mut self, command: AddChildCommand) -> Result<ChildRecord, LedgerError> {
        let child = self.build_record(command, &[])?;
        self.records.push(child.clone());
        self.persist().await;

        info!("Added child: {} with ID: {}", child.name, child.id);
        Ok(child)
    }

    /// Create several records with a single storage write.
    ///
    /// Every command is validated before anything is appended, so one bad
    /// row leaves the ledger untouched.
    pub async fn add_many(
        &mut self,
        commands: Vec<AddChildCommand>,
    ) -> Result<Vec<ChildRecord>, LedgerError> {
        let mut created: Vec<ChildRecord> = Vec::with_capacity(commands.len());
        for command in commands {
            let child = self.build_record(command, &created)?;
            created.push(child);
        }

        self.records.extend(created.iter().cloned());
        self.persist().await;

        info!("Added {} children in one batch", created.len());
        Ok(created)
    }

    /// Merge `patch` onto the record with `id`.
    ///
    /// Unknown ids are a no-op and return false. Paid-related fields are
    /// taken verbatim; use [`RecordStore::set_paid`] to keep them consistent.
    pub async fn update(&mut self, id: &str, patch: ChildPatch) -> bool {
        let Some(child) = self.records.iter_mut().find(|c| c.id == id) else {
            warn!("Update skipped, child not found: {}", id);
            return false;
        };
        patch.apply(child);
        self.persist().await;
        true
    }

    /// Apply an edit-dialog submission: validated and coerced like `add`.
    /// An absent amount or week keeps the stored value.
    pub async fn edit(&mut self, id: &str, command: AddChildCommand) -> Result<bool, LedgerError> {
        let (name, email) = validate_contact(&command.name, &command.email)?;
        let patch = ChildPatch {
            name: Some(name),
            email: Some(email),
            amount: command.amount.map(|a| a.value()),
            week: command.week,
            ..Default::default()
        };
        Ok(self.update(id, patch).await)
    }

    /// Flip the paid flag. Stamps or clears the payment date and always
    /// makes a new receipt due.
    pub async fn set_paid(&mut self, id: &str, paid: bool) -> bool {
        let date_paid = if paid { today_iso() } else { String::new() };
        let patch = ChildPatch {
            paid: Some(paid),
            date_paid: Some(date_paid),
            receipt_sent: Some(false),
            ..Default::default()
        };
        let found = self.update(id, patch).await;
        if found {
            info!("Marked child {} as {}", id, if paid { "paid" } else { "unpaid" });
        }
        found
    }

    /// Remove the record with `id`; unknown ids are a no-op
    pub async fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|c| c.id != id);
        let removed = self.records.len() != before;

        self.persist().await;
        if removed {
            info!("Deleted child with ID: {}", id);
        }
        removed
    }

    /// Records whose "name email" contains `filter`, ignoring case
    pub fn list(&self, filter: &str) -> Vec<ChildRecord> {
        let query = filter.trim().to_lowercase();
        self.records
            .iter()
            .filter(|c| query.is_empty() || format!("{} {}", c.name, c.email).to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    pub fn summary(&self) -> LedgerSummary {
        let total = self.records.len();
        let paid = self.records.iter().filter(|c| c.paid).count();
        let receipts_sent = self.records.iter().filter(|c| c.receipt_sent).count();
        LedgerSummary {
            total,
            paid,
            owing: total - paid,
            receipts_sent,
        }
    }

    /// Populate an empty ledger with two sample records
    pub async fn seed_demo_records(&mut self) {
        if !self.records.is_empty() {
            return;
        }

        let mut ava = self.blank_record("Ava Johnson", "parent1@example.com");
        ava.amount = 25.0;
        self.records.push(ava);

        let mut liam = self.blank_record("Liam Smith", "parent2@example.com");
        liam.amount = 25.0;
        liam.paid = true;
        liam.date_paid = today_iso();
        self.records.push(liam);

        self.persist().await;
        info!("Initialized demo data with {} records", self.records.len());
    }

    /// The most recent persistence failure, if any, cleared on read
    pub fn take_storage_error(&mut self) -> Option<LedgerError> {
        self.storage_error.take()
    }

    fn build_record(
        &self,
        command: AddChildCommand,
        pending: &[ChildRecord],
    ) -> Result<ChildRecord, LedgerError> {
        let (name, email) = validate_contact(&command.name, &command.email)?;
        Ok(ChildRecord {
            id: self.fresh_id(pending),
            name,
            email,
            amount: command.amount.map(|a| a.value()).unwrap_or(0.0),
            week: command.week.unwrap_or_default(),
            paid: false,
            date_paid: String::new(),
            receipt_sent: false,
        })
    }

    fn blank_record(&self, name: &str, email: &str) -> ChildRecord {
        ChildRecord {
            id: self.fresh_id(&[]),
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    fn fresh_id(&self, pending: &[ChildRecord]) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            let taken = self.records.iter().chain(pending).any(|c| c.id == id);
            if !taken {
                return id;
            }
        }
    }

    /// Give every record with a missing or duplicate id a new one.
    /// Returns how many were changed.
    fn repair_ids(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut repaired = 0;
        for i in 0..self.records.len() {
            let id = self.records[i].id.clone();
            if id.is_empty() || !seen.insert(id.clone()) {
                let new_id = loop {
                    let candidate = Uuid::new_v4().to_string();
                    if !self.records.iter().any(|c| c.id == candidate) {
                        break candidate;
                    }
                };
                warn!("Reassigned id for child {} ({:?} -> {})", self.records[i].name, id, new_id);
                seen.insert(new_id.clone());
                self.records[i].id = new_id;
                repaired += 1;
            }
        }
        repaired
    }

    async fn persist(&mut self) {
        if let Err(e) = self.storage.save_children(&self.records).await {
            error!("❌ Failed to save child records: {}", e);
            self.storage_error = Some(e);
        }
    }
}

fn validate_contact(name: &str, email: &str) -> Result<(String, String), LedgerError> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() {
        return Err(LedgerError::Validation(
            "Name and email are required.".to_string(),
        ));
    }
    Ok((name.to_string(), email.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils::FailingKeyValueStore;
    use crate::storage::InMemoryKeyValueStore;
    use std::sync::Arc;

    async fn setup_test() -> (RecordStore, LedgerStorage) {
        let storage = LedgerStorage::new(Arc::new(InMemoryKeyValueStore::new()));
        (RecordStore::open(storage.clone()).await, storage)
    }

    fn ava() -> AddChildCommand {
        AddChildCommand::new("Ava Johnson", "p1@example.com")
            .with_amount(25.0)
            .with_week("W1")
    }

    #[tokio::test]
    async fn test_add_child() {
        let (mut store, storage) = setup_test().await;

        let child = store
            .add(AddChildCommand::new("  Ava Johnson ", " p1@example.com ").with_amount("12.50"))
            .await
            .expect("Failed to add child");

        assert_eq!(child.name, "Ava Johnson");
        assert_eq!(child.email, "p1@example.com");
        assert_eq!(child.amount, 12.5);
        assert_eq!(child.week, "");
        assert!(!child.paid);
        assert_eq!(child.date_paid, "");
        assert!(!child.receipt_sent);
        assert!(!child.id.is_empty());

        let persisted = storage.load_children().await.unwrap();
        assert_eq!(persisted, vec![child]);
    }

    #[tokio::test]
    async fn test_add_child_validation() {
        let (mut store, _) = setup_test().await;

        let result = store.add(AddChildCommand::new("   ", "p@x.com")).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));

        let result = store.add(AddChildCommand::new("Ava", "")).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));

        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_add_coerces_amount() {
        let (mut store, _) = setup_test().await;

        let junk = store.add(AddChildCommand::new("A", "a@x").with_amount("lots")).await.unwrap();
        assert_eq!(junk.amount, 0.0);

        let missing = store.add(AddChildCommand::new("B", "b@x")).await.unwrap();
        assert_eq!(missing.amount, 0.0);

        let negative = store.add(AddChildCommand::new("C", "c@x").with_amount(-5.0)).await.unwrap();
        assert_eq!(negative.amount, -5.0);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (mut store, _) = setup_test().await;

        let mut ids = HashSet::new();
        for i in 0..50 {
            let child = store
                .add(AddChildCommand::new(format!("Child {}", i), "p@x.com"))
                .await
                .unwrap();
            assert!(ids.insert(child.id), "duplicate id issued");
        }
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let (mut store, _) = setup_test().await;
        let child = store.add(ava()).await.unwrap();

        let found = store
            .update(
                &child.id,
                ChildPatch {
                    week: Some("W2".to_string()),
                    paid: Some(true),
                    ..Default::default()
                },
            )
            .await;

        assert!(found);
        let updated = store.get(&child.id).unwrap();
        assert_eq!(updated.week, "W2");
        assert!(updated.paid);
        // raw update does not derive the payment date
        assert_eq!(updated.date_paid, "");
        assert_eq!(updated.name, "Ava Johnson");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let (mut store, _) = setup_test().await;
        store.add(ava()).await.unwrap();
        let before = store.records().to_vec();

        assert!(!store.update("missing", ChildPatch::receipt_sent()).await);
        assert_eq!(store.records(), before.as_slice());
    }

    #[tokio::test]
    async fn test_edit_validates_and_trims() {
        let (mut store, _) = setup_test().await;
        let child = store.add(ava()).await.unwrap();

        let result = store.edit(&child.id, AddChildCommand::new("", "x@y")).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));

        let found = store
            .edit(
                &child.id,
                AddChildCommand::new(" Ava J ", "new@example.com").with_amount("30"),
            )
            .await
            .unwrap();
        assert!(found);
        let edited = store.get(&child.id).unwrap();
        assert_eq!(edited.name, "Ava J");
        assert_eq!(edited.email, "new@example.com");
        assert_eq!(edited.amount, 30.0);
    }

    #[tokio::test]
    async fn test_edit_keeps_absent_amount_and_week() {
        let (mut store, _) = setup_test().await;
        let child = store
            .add(AddChildCommand::new("Ava", "p@x.com").with_amount(25.0).with_week("W1"))
            .await
            .unwrap();

        store
            .edit(&child.id, AddChildCommand::new("Ava J", "p@x.com"))
            .await
            .unwrap();

        let edited = store.get(&child.id).unwrap();
        assert_eq!(edited.name, "Ava J");
        assert_eq!(edited.amount, 25.0);
        assert_eq!(edited.week, "W1");
    }

    #[tokio::test]
    async fn test_set_paid_round_trip() {
        let (mut store, _) = setup_test().await;
        let child = store.add(ava()).await.unwrap();
        store.update(&child.id, ChildPatch::receipt_sent()).await;

        assert!(store.set_paid(&child.id, true).await);
        let paid = store.get(&child.id).unwrap().clone();
        assert!(paid.paid);
        assert_eq!(paid.date_paid, today_iso());
        assert!(!paid.receipt_sent);

        store.update(&child.id, ChildPatch::receipt_sent()).await;

        assert!(store.set_paid(&child.id, false).await);
        let unpaid = store.get(&child.id).unwrap();
        assert!(!unpaid.paid);
        assert_eq!(unpaid.date_paid, "");
        assert!(!unpaid.receipt_sent);
    }

    #[tokio::test]
    async fn test_delete_child() {
        let (mut store, storage) = setup_test().await;
        let child = store.add(ava()).await.unwrap();

        assert!(!store.delete("missing").await);
        assert_eq!(store.records().len(), 1);

        assert!(store.delete(&child.id).await);
        assert!(store.get(&child.id).is_none());
        assert!(storage.load_children().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filter_is_case_insensitive() {
        let (mut store, _) = setup_test().await;
        store.add(ava()).await.unwrap();
        store.add(AddChildCommand::new("Liam Smith", "smiths@example.com")).await.unwrap();

        let matches = store.list("AVA");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Ava Johnson");

        let by_email = store.list("smiths@");
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "Liam Smith");

        let all = store.list("  ");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Ava Johnson");
        assert_eq!(all[1].name, "Liam Smith");
    }

    #[tokio::test]
    async fn test_summary() {
        let (mut store, _) = setup_test().await;
        assert_eq!(
            store.summary(),
            LedgerSummary { total: 0, paid: 0, owing: 0, receipts_sent: 0 }
        );

        let a = store.add(ava()).await.unwrap();
        let b = store.add(AddChildCommand::new("Liam", "l@x")).await.unwrap();
        store.add(AddChildCommand::new("Mia", "m@x")).await.unwrap();
        store.set_paid(&a.id, true).await;
        store.update(&b.id, ChildPatch::receipt_sent()).await;

        assert_eq!(
            store.summary(),
            LedgerSummary { total: 3, paid: 1, owing: 2, receipts_sent: 1 }
        );
    }

    #[tokio::test]
    async fn test_add_many_is_all_or_nothing() {
        let (mut store, _) = setup_test().await;

        let result = store
            .add_many(vec![ava(), AddChildCommand::new("", "x@y")])
            .await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert!(store.records().is_empty());

        let created = store
            .add_many(vec![ava(), AddChildCommand::new("Liam", "l@x")])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
        assert_eq!(store.records().len(), 2);
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let (mut store, storage) = setup_test().await;
        let child = store.add(ava()).await.unwrap();
        store.set_paid(&child.id, true).await;

        let reopened = RecordStore::open(storage).await;
        assert_eq!(reopened.records(), store.records());
    }

    #[tokio::test]
    async fn test_open_repairs_duplicate_ids() {
        let storage = LedgerStorage::new(Arc::new(InMemoryKeyValueStore::new()));
        let duplicate = ChildRecord {
            id: "same".to_string(),
            name: "Ava".to_string(),
            email: "a@x".to_string(),
            ..Default::default()
        };
        let nameless_id = ChildRecord {
            name: "Liam".to_string(),
            email: "l@x".to_string(),
            ..Default::default()
        };
        storage
            .save_children(&[duplicate.clone(), duplicate, nameless_id])
            .await
            .unwrap();

        let store = RecordStore::open(storage.clone()).await;

        let ids: HashSet<_> = store.records().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(""));
        assert_eq!(store.records()[0].id, "same");
        assert_eq!(storage.load_children().await.unwrap(), store.records());
    }

    #[tokio::test]
    async fn test_seed_demo_records_only_when_empty() {
        let (mut store, _) = setup_test().await;

        store.seed_demo_records().await;
        assert_eq!(store.records().len(), 2);
        assert_eq!(store.records()[0].name, "Ava Johnson");
        assert!(!store.records()[0].paid);
        assert!(store.records()[1].paid);
        assert_eq!(store.records()[1].date_paid, today_iso());

        store.seed_demo_records().await;
        assert_eq!(store.records().len(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_in_memory_state() {
        let kv = FailingKeyValueStore::healthy();
        let storage = LedgerStorage::new(Arc::new(kv.clone()));
        let mut store = RecordStore::open(storage).await;
        assert!(store.take_storage_error().is_none());

        kv.set_fail_writes(true);
        let child = store.add(ava()).await.expect("add should still succeed");

        assert_eq!(store.get(&child.id), Some(&child));
        assert!(matches!(store.take_storage_error(), Some(LedgerError::Persistence(_))));
        assert!(store.take_storage_error().is_none());
    }

    #[tokio::test]
    async fn test_failed_load_starts_empty() {
        let storage = LedgerStorage::new(Arc::new(FailingKeyValueStore::new()));
        let mut store = RecordStore::open(storage).await;

        assert!(store.records().is_empty());
        assert!(matches!(store.take_storage_error(), Some(LedgerError::Persistence(_))));
    }
}
