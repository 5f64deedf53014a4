//! One management screen: list, side panel and delete, wired to the same
//! entity and refreshed together.

use domain::{
    entity::EntityDefinition,
    models::EntityKind,
    record::RecordId,
};
use futures::future::join_all;
use tracing::{debug, warn};

use super::{
    context::AdminContext,
    deletion::{Confirmation, DeletionOutcome},
    list_screen::ListScreen,
    lookup::LookupTable,
    side_panel::{FormMode, SidePanelForm, SubmitOutcome},
};

pub struct EntityTable {
    ctx: AdminContext,
    list: ListScreen,
    form: SidePanelForm,
}

impl EntityTable {
    pub fn new(kind: EntityKind, ctx: &AdminContext) -> Self {
        Self {
            ctx: ctx.clone(),
            list: ListScreen::new(ctx.client(kind), ctx.notifier.clone(), ctx.busy.clone()),
            form: SidePanelForm::new(ctx.client(kind), ctx.notifier.clone(), ctx.busy.clone()),
        }
    }

    pub fn definition(&self) -> &'static EntityDefinition {
        self.list.definition()
    }

    pub fn list(&self) -> &ListScreen {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListScreen {
        &mut self.list
    }

    pub fn form(&self) -> &SidePanelForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SidePanelForm {
        &mut self.form
    }

    /// Load the list. Reference labels arrive separately through
    /// [`EntityTable::lookups`] so the rows can render with raw ids first.
    pub async fn mount(&mut self) -> bool {
        self.list.load().await
    }

    /// Reads every referenced collection concurrently. The future owns its
    /// handles, so it can be spawned while the list loads.
    pub fn lookups(
        &self,
    ) -> impl Future<Output = Vec<(&'static str, LookupTable)>> + Send + use<> {
        fetch_lookups(self.ctx.clone(), self.definition())
    }

    pub fn apply_lookups(&mut self, tables: Vec<(&'static str, LookupTable)>) {
        for (field, table) in tables {
            self.list.set_lookup(field, table);
        }
    }

    pub fn open_create(&mut self) {
        self.form.open(FormMode::Add);
    }

    /// Open the panel on a loaded row. Returns `false` if no such row is listed.
    pub fn open_edit(&mut self, id: &RecordId) -> bool {
        match self.list.find(id).cloned() {
            Some(record) => {
                self.form.open(FormMode::Edit(record));
                true
            }
            None => {
                warn!(entity = %self.definition().kind, id = %id, "Edit requested for unknown row");
                false
            }
        }
    }

    /// Submit the panel; a successful save triggers exactly one list refetch.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.form.submit().await;
        if matches!(outcome, SubmitOutcome::Saved(_)) {
            self.list.load().await;
        }
        outcome
    }

    pub async fn delete(&mut self, id: &RecordId, confirmation: &dyn Confirmation) -> DeletionOutcome {
        self.list.delete(id, confirmation).await
    }

    /// Select choices for a reference field, from its lookup table.
    pub fn reference_options(&self, field: &str) -> Vec<(RecordId, String)> {
        self.list
            .lookup(field)
            .map(|table| {
                table
                    .options()
                    .into_iter()
                    .map(|(id, label)| (id.clone(), label.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Read the referenced collections of `definition`. A failed lookup is
/// skipped so references keep showing raw ids.
async fn fetch_lookups(
    ctx: AdminContext,
    definition: &'static EntityDefinition,
) -> Vec<(&'static str, LookupTable)> {
    let reads = definition.references().filter_map(|field| {
        let reference = field.reference.as_ref()?;
        let client = ctx.client(reference.entity);
        Some(async move {
            match client.list().await {
                Ok(records) => {
                    let table = LookupTable::from_records(&records, reference.label_field);
                    debug!(field = field.name, entries = table.len(), "Lookup loaded");
                    Some((field.name, table))
                }
                Err(e) => {
                    warn!(
                        entity = %definition.kind,
                        field = field.name,
                        error = %e,
                        "Lookup query failed"
                    );
                    None
                }
            }
        })
    });
    join_all(reads).await.into_iter().flatten().collect()
}
