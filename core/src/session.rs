//! One user's browsing session over an immutable collection.

use crate::analytics::{AnalyticsEvent, AnalyticsSink, EventKind};
use crate::cards::{render_cards, CardPage};
use crate::catalog::Catalog;
use crate::drawer::{render_drawer, DetailPanel};
use crate::model::{EntityType, Record};
use crate::options::{derive_options, FilterOptions};
use crate::persist::{SavedSearch, SavedSearchStore};
use crate::query::compute_view;
use crate::state::{Action, RowEvent, ViewMode, ViewState};
use crate::table::{default_columns, page_ids, render_page, Column, EmptyState, TablePage};
use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Current page in whichever mode the session is in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Rendered {
    Table(TablePage),
    Cards(CardPage),
}

pub struct Session {
    entity_type: EntityType,
    records: Vec<Record>,
    options: FilterOptions,
    columns: Vec<Column>,
    state: ViewState,
    analytics: Arc<dyn AnalyticsSink>,
}

impl Session {
    /// Records of other entity types are dropped.
    pub fn new(entity_type: EntityType, records: Vec<Record>, analytics: Arc<dyn AnalyticsSink>) -> Self {
        let total = records.len();
        let records: Vec<Record> = records.into_iter().filter(|r| r.entity_type() == entity_type).collect();
        if records.len() != total {
            tracing::warn!(%entity_type, dropped = total - records.len(), "records of another type ignored");
        }
        // the collection is fixed for the session, so options are derived once
        let options = derive_options(&records);
        Session {
            entity_type,
            records,
            options,
            columns: default_columns(entity_type),
            state: ViewState::new(entity_type),
            analytics,
        }
    }

    pub fn from_catalog(catalog: &Catalog, entity_type: EntityType, analytics: Arc<dyn AnalyticsSink>) -> Self {
        Session::new(entity_type, catalog.records_of(entity_type), analytics)
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Filtered and sorted result for the current state.
    pub fn view(&self) -> Vec<&Record> {
        compute_view(&self.records, &self.state.query, &self.state.filters, &self.state.sort)
    }

    pub fn dispatch(&mut self, action: Action) {
        let pending = self.pending_event(&action);
        let state = std::mem::replace(&mut self.state, ViewState::new(self.entity_type));
        self.state = state.apply(action);
        if let Some((kind, mut detail)) = pending {
            match kind {
                EventKind::SearchPerformed | EventKind::FilterApplied => {
                    detail["resultCount"] = json!(self.view().len());
                }
                EventKind::SortChanged => {
                    detail["direction"] = json!(self.state.sort.sort_direction.as_str());
                }
                _ => {}
            }
            self.emit(kind, detail);
        }
    }

    fn pending_event(&self, action: &Action) -> Option<(EventKind, Value)> {
        match action {
            Action::SetQuery(query) if !query.is_empty() => Some((EventKind::SearchPerformed, json!({ "query": query }))),
            Action::ToggleFacet { facet, value } => {
                let selecting = !self.state.filters.selected(*facet).contains(value);
                Some((
                    EventKind::FilterApplied,
                    json!({ "filter": facet.as_str(), "value": value, "selected": selecting }),
                ))
            }
            Action::ClearFacet(facet) => Some((EventKind::FilterApplied, json!({ "filter": facet.as_str(), "cleared": true }))),
            Action::SetRange { range, bounds } => {
                Some((EventKind::FilterApplied, json!({ "filter": range.as_str(), "value": bounds })))
            }
            Action::ClearFilters => Some((EventKind::FilterApplied, json!({ "filter": "all", "cleared": true }))),
            Action::SortBy(key) => Some((EventKind::SortChanged, json!({ "sortBy": key }))),
            Action::SetMode(mode) if *mode != self.state.mode => Some((EventKind::ViewToggled, json!({ "mode": mode }))),
            Action::Activate(id) => Some((EventKind::EntityOpened, json!({ "id": id }))),
            _ => None,
        }
    }

    fn emit(&self, kind: EventKind, detail: Value) {
        self.analytics.track(AnalyticsEvent::new(kind, self.entity_type, detail));
    }

    pub fn row_event(&mut self, event: RowEvent) {
        self.dispatch(event.into_action());
    }

    /// Header checkbox: selects or clears the rows of the current page only.
    pub fn select_all(&mut self, checked: bool) {
        let ids = page_ids(&self.view(), self.state.page, self.state.page_size);
        self.dispatch(Action::SetPageSelected { ids, selected: checked });
    }

    pub fn table(&self) -> TablePage {
        let view = self.view();
        let mut page = render_page(
            self.entity_type,
            &view,
            self.state.page,
            self.state.page_size,
            &self.columns,
            &self.state.sort,
            &self.state.selection,
        );
        if self.records.is_empty() {
            page.empty = Some(EmptyState::no_records(self.entity_type));
        }
        page
    }

    pub fn cards(&self) -> CardPage {
        let view = self.view();
        let mut page = render_cards(self.entity_type, &view, self.state.page, self.state.page_size);
        if self.records.is_empty() {
            page.empty = Some(EmptyState::no_records(self.entity_type));
        }
        page
    }

    pub fn render(&self) -> Rendered {
        match self.state.mode {
            ViewMode::Table => Rendered::Table(self.table()),
            ViewMode::Cards => Rendered::Cards(self.cards()),
        }
    }

    /// Detail panel of the open record. `None` while the drawer is closed.
    pub fn drawer(&self) -> Option<DetailPanel> {
        let open = self.state.drawer.open_id().and_then(|id| self.records.iter().find(|r| r.id() == id));
        render_drawer(open)
    }

    /// Selected records in collection order.
    pub fn selected_records(&self) -> Vec<&Record> {
        self.records.iter().filter(|r| self.state.selection.contains(r.id())).collect()
    }

    pub fn compare(&self) -> Vec<&Record> {
        let selected = self.selected_records();
        let ids: Vec<&str> = selected.iter().map(|r| r.id()).collect();
        self.emit(EventKind::CompareClicked, json!({ "count": selected.len(), "ids": ids }));
        selected
    }

    /// Selected records, or the whole filtered result when nothing is selected.
    pub fn export(&self) -> Result<Value> {
        let (scope, records) = if self.state.selection.is_empty() {
            ("filtered", self.view())
        } else {
            ("selected", self.selected_records())
        };
        self.emit(EventKind::ExportClicked, json!({ "count": records.len(), "scope": scope }));
        Ok(serde_json::to_value(&records)?)
    }

    pub fn save_search(&self, name: &str, store: &dyn SavedSearchStore) -> Result<SavedSearch> {
        let search = SavedSearch::new(name, self.entity_type, self.state.query.clone(), self.state.filters.clone());
        store.save(search.clone())?;
        Ok(search)
    }

    pub fn apply_saved(&mut self, saved: &SavedSearch) -> Result<()> {
        if saved.entity_type != self.entity_type {
            bail!("saved search {} is for {}, not {}", saved.id, saved.entity_type, self.entity_type);
        }
        self.dispatch(Action::LoadSearch { query: saved.query.clone(), filters: saved.filters.clone() });
        Ok(())
    }
}
