//! Searchable, paginated list of one entity.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use domain::{
    entity::EntityDefinition,
    record::{EntityRecord, RecordId},
};
use tracing::{info, warn};

use super::{
    busy::BusyTracker,
    deletion::{Confirmation, DeletionOutcome, DeletionTrigger},
    entity_client::EntityClient,
    lookup::LookupTable,
    notification::{Notification, Notifier},
};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A row as handed to the grid, keyed for reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRow<'a> {
    pub key: &'a str,
    pub record: &'a EntityRecord,
}

pub struct ListScreen {
    client: EntityClient,
    notifier: Arc<dyn Notifier>,
    busy: BusyTracker,
    deletion: DeletionTrigger,
    rows: Vec<EntityRecord>,
    keys: Vec<String>,
    search: String,
    /// Indices into `rows` matching `search`; recomputed only when either changes.
    filtered: Vec<usize>,
    pagination: Pagination,
    lookups: HashMap<&'static str, LookupTable>,
}

impl ListScreen {
    pub fn new(client: EntityClient, notifier: Arc<dyn Notifier>, busy: BusyTracker) -> Self {
        let deletion = DeletionTrigger::new(client.clone(), notifier.clone(), busy.clone());
        Self {
            client,
            notifier,
            busy,
            deletion,
            rows: Vec::new(),
            keys: Vec::new(),
            search: String::new(),
            filtered: Vec::new(),
            pagination: Pagination::default(),
            lookups: HashMap::new(),
        }
    }

    pub fn definition(&self) -> &'static EntityDefinition {
        self.client.definition()
    }

    /// Read the collection. On failure the previous rows stay and an error
    /// notification is emitted; returns whether the read succeeded.
    pub async fn load(&mut self) -> bool {
        let definition = self.definition();
        match self.busy.track(self.client.list()).await {
            Ok(rows) => {
                info!(entity = %definition.kind, count = rows.len(), "Loaded list");
                self.replace_rows(rows);
                true
            }
            Err(e) => {
                warn!(entity = %definition.kind, error = %e, "List query failed");
                self.notifier.notify(
                    Notification::error(format!("Failed to load {}", definition.plural_label))
                        .with_description(e.user_message()),
                );
                false
            }
        }
    }

    fn replace_rows(&mut self, rows: Vec<EntityRecord>) {
        self.keys = assign_keys(self.definition(), &rows);
        self.rows = rows;
        self.refilter();
    }

    pub fn rows(&self) -> &[EntityRecord] {
        &self.rows
    }

    pub fn find(&self, id: &RecordId) -> Option<&EntityRecord> {
        self.rows.iter().find(|r| r.id.as_ref() == Some(id))
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Change the search term. The current page is left alone.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.refilter();
        }
    }

    fn refilter(&mut self) {
        let needle = self.search.trim().to_lowercase();
        let search_fields = self.definition().search_fields;
        self.filtered = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                needle.is_empty()
                    || search_fields.iter().any(|field| {
                        row.text(field)
                            .is_some_and(|value| utils::text::contains_lowercase(&value, &needle))
                    })
            })
            .map(|(idx, _)| idx)
            .collect();
    }

    pub fn filtered_rows(&self) -> impl Iterator<Item = &EntityRecord> {
        self.filtered.iter().map(|&idx| &self.rows[idx])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.page = page;
    }

    /// A new page size starts over at the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination = Pagination {
            page: 0,
            page_size: page_size.max(1),
        };
    }

    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.pagination.page_size).max(1)
    }

    /// The page actually shown: the requested page, clamped to the last one.
    pub fn current_page(&self) -> usize {
        self.pagination.page.min(self.page_count() - 1)
    }

    pub fn page_rows(&self) -> Vec<GridRow<'_>> {
        let start = self.current_page() * self.pagination.page_size;
        self.filtered
            .iter()
            .skip(start)
            .take(self.pagination.page_size)
            .map(|&idx| GridRow {
                key: &self.keys[idx],
                record: &self.rows[idx],
            })
            .collect()
    }

    pub fn set_lookup(&mut self, field: &'static str, table: LookupTable) {
        self.lookups.insert(field, table);
    }

    pub fn lookup(&self, field: &str) -> Option<&LookupTable> {
        self.lookups.get(field)
    }

    /// Cell text for `field`, with foreign references shown by label when the
    /// lookup table is available.
    pub fn display_value(&self, record: &EntityRecord, field: &str) -> String {
        match (record.get(field), self.lookups.get(field)) {
            (Some(raw), Some(table)) => table.label_for(raw),
            _ => record.text(field).unwrap_or_default(),
        }
    }

    /// Confirm, delete, and re-read the list once the delete has resolved.
    pub async fn delete(&mut self, id: &RecordId, confirmation: &dyn Confirmation) -> DeletionOutcome {
        let Some(record) = self.find(id).cloned() else {
            warn!(entity = %self.definition().kind, id = %id, "Delete requested for unknown row");
            return DeletionOutcome::Failed(format!("{} {} not found", self.definition().label, id));
        };

        let outcome = self.deletion.run(&record, confirmation).await;
        if outcome == DeletionOutcome::Deleted {
            self.load().await;
        }
        outcome
    }
}

/// Grid keys: the `id`, else the natural key. Colliding fallback keys get a
/// positional suffix so distinct rows never merge.
fn assign_keys(definition: &EntityDefinition, rows: &[EntityRecord]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let base = match (&row.id, row.text(definition.natural_key)) {
                (Some(id), _) => format!("id:{id}"),
                (None, Some(natural)) => format!("{}:{natural}", definition.natural_key),
                (None, None) => format!("row:{idx}"),
            };
            match seen.entry(base.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(1);
                    base
                }
                Entry::Occupied(mut slot) => {
                    warn!(
                        entity = %definition.kind,
                        key = %base,
                        "Duplicate grid key, disambiguating row"
                    );
                    let n = slot.get_mut();
                    *n += 1;
                    format!("{base}#{n}")
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use domain::models::EntityKind;
    use serde_json::json;

    use super::*;
    use crate::services::{
        graphql::GraphQlClientError,
        test_support::{FixedConfirmation, RecordingNotifier, ScriptedTransport},
    };

    fn vendors() -> serde_json::Value {
        json!({"vendors": [
            {"id": "v1", "name": "CoolAir HVAC", "email": "sales@coolair.com", "phone": "555-0100"},
            {"id": "v2", "name": "Pumpco", "email": "info@pumpco.io", "phone": "555-0101"},
            {"id": "v3", "name": "Northwind Electric", "email": "hvac@northwind.com", "phone": null}
        ]})
    }

    fn screen(transport: &Arc<ScriptedTransport>) -> (ListScreen, Arc<RecordingNotifier>) {
        let notifier = RecordingNotifier::new();
        let screen = ListScreen::new(
            EntityClient::new(transport.clone(), EntityKind::Vendor.definition()),
            notifier.clone(),
            BusyTracker::new(),
        );
        (screen, notifier)
    }

    fn ids<'a>(rows: impl Iterator<Item = &'a EntityRecord>) -> Vec<String> {
        rows.filter_map(|r| r.id.as_ref().map(ToString::to_string)).collect()
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively_and_clears() {
        let transport = ScriptedTransport::new();
        transport.respond("Vendors", vendors());
        let (mut screen, _) = screen(&transport);
        assert!(screen.load().await);

        screen.set_search("HvAc");
        assert_eq!(ids(screen.filtered_rows()), vec!["v1", "v3"]);

        screen.set_search("pump");
        assert_eq!(ids(screen.filtered_rows()), vec!["v2"]);

        screen.set_search("");
        assert_eq!(screen.filtered_len(), 3);
        assert_eq!(transport.calls("Vendors"), 1, "filtering is local");
    }

    #[tokio::test]
    async fn test_search_keeps_page_and_view_clamps() {
        let transport = ScriptedTransport::new();
        transport.respond("Vendors", vendors());
        let (mut screen, _) = screen(&transport);
        screen.load().await;
        screen.set_page_size(1);
        screen.set_page(2);
        assert_eq!(screen.current_page(), 2);

        screen.set_search("pump");
        assert_eq!(screen.pagination().page, 2, "filtering does not reset the page");
        assert_eq!(screen.current_page(), 0);
        assert_eq!(screen.page_rows()[0].key, "id:v2");

        screen.set_search("");
        assert_eq!(screen.current_page(), 2);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_rows_and_notifies() {
        let transport = ScriptedTransport::new();
        transport.respond("Vendors", vendors());
        let (mut screen, notifier) = screen(&transport);
        screen.load().await;

        transport.fail("Vendors", GraphQlClientError::Timeout);
        assert!(!screen.load().await);
        assert_eq!(screen.rows().len(), 3);
        let last = notifier.last().unwrap();
        assert_eq!(last.title, "Failed to load Vendors");
        assert_eq!(last.description.as_deref(), Some("request timed out"));
    }

    #[tokio::test]
    async fn test_cancelled_delete_leaves_state_untouched() {
        let transport = ScriptedTransport::new();
        transport.respond("Vendors", vendors());
        let (mut screen, _) = screen(&transport);
        screen.load().await;
        screen.set_search("co");
        let before_rows = screen.rows().to_vec();
        let before_filtered = ids(screen.filtered_rows());

        let outcome = screen
            .delete(&RecordId::new("v2"), &FixedConfirmation::new(false))
            .await;

        assert_eq!(outcome, DeletionOutcome::Cancelled);
        assert_eq!(transport.calls("DeleteVendor"), 0);
        assert_eq!(transport.calls("Vendors"), 1);
        assert_eq!(screen.rows(), before_rows.as_slice());
        assert_eq!(ids(screen.filtered_rows()), before_filtered);
        assert_eq!(screen.search(), "co");
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches_once() {
        let transport = ScriptedTransport::new();
        transport.respond("Vendors", vendors());
        let (mut screen, _) = screen(&transport);
        screen.load().await;

        transport.respond("DeleteVendor", json!({"deleteVendor": true}));
        transport.respond(
            "Vendors",
            json!({"vendors": [{"id": "v1", "name": "CoolAir HVAC"}]}),
        );
        let outcome = screen
            .delete(&RecordId::new("v2"), &FixedConfirmation::new(true))
            .await;

        assert_eq!(outcome, DeletionOutcome::Deleted);
        assert_eq!(transport.calls("DeleteVendor"), 1);
        assert_eq!(transport.calls("Vendors"), 2);
        assert_eq!(screen.rows().len(), 1);
    }

    #[test]
    fn test_fallback_keys_never_collide() {
        let def = EntityKind::Vendor.definition();
        let rows = vec![
            EntityRecord::default().with("name", "Acme"),
            EntityRecord::default().with("name", "Acme"),
            EntityRecord::new("a1").with("name", "Acme"),
            EntityRecord::default(),
        ];
        let keys = assign_keys(def, &rows);
        assert_eq!(keys, vec!["name:Acme", "name:Acme#2", "id:a1", "row:3"]);
    }

    #[test]
    fn test_display_value_uses_lookup_when_loaded() {
        let transport = ScriptedTransport::new();
        let (mut screen, _) = screen(&transport);
        let record = EntityRecord::new("v1").with("serviceTypeIds", json!(["s1", "s2"]));

        assert_eq!(screen.display_value(&record, "serviceTypeIds"), "s1, s2");

        screen.set_lookup(
            "serviceTypeIds",
            LookupTable::from_records(
                &[
                    EntityRecord::new("s1").with("name", "Repair"),
                    EntityRecord::new("s2").with("name", "Inspection"),
                ],
                "name",
            ),
        );
        assert_eq!(screen.display_value(&record, "serviceTypeIds"), "Repair, Inspection");
    }
}
