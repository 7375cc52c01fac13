//! Browsing state for one entity view and its reducer.
//!
//! Every user interaction becomes an [`Action`]; [`ViewState::apply`] is a
//! pure `ViewState -> Action -> ViewState` transition. Rendering reads the
//! state, it never mutates it.

use crate::drawer::DrawerState;
use crate::model::{EntityType, Facet, RangeFilter};
use crate::query::{Bounds, SearchFilters, SortState};
use crate::table::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub entity_type: EntityType,
    pub query: String,
    pub filters: SearchFilters,
    pub sort: SortState,
    pub page: usize,
    pub page_size: usize,
    pub mode: ViewMode,
    pub selection: BTreeSet<String>,
    pub drawer: DrawerState,
}

impl ViewState {
    pub fn new(entity_type: EntityType) -> Self {
        ViewState {
            entity_type,
            query: String::new(),
            filters: SearchFilters::default(),
            sort: SortState::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            mode: ViewMode::Table,
            selection: BTreeSet::new(),
            drawer: DrawerState::Closed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetQuery(String),
    ToggleFacet { facet: Facet, value: String },
    ClearFacet(Facet),
    SetRange { range: RangeFilter, bounds: Option<Bounds> },
    ClearFilters,
    /// Replace query and filters, e.g. from a saved search.
    LoadSearch { query: String, filters: SearchFilters },
    /// Column header click.
    SortBy(String),
    SetPage(usize),
    SetPageSize(usize),
    SetMode(ViewMode),
    ToggleRow(String),
    /// Header checkbox. `ids` are the rows of the current page only.
    SetPageSelected { ids: Vec<String>, selected: bool },
    ClearSelection,
    Activate(String),
    CloseDrawer,
}

/// Pointer events on a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEvent {
    /// Anywhere on the row outside its controls.
    RowClicked(String),
    /// The checkbox cell; does not bubble to the row.
    CheckboxClicked(String),
}

impl RowEvent {
    pub fn into_action(self) -> Action {
        match self {
            RowEvent::RowClicked(id) => Action::Activate(id),
            RowEvent::CheckboxClicked(id) => Action::ToggleRow(id),
        }
    }
}

impl ViewState {
    pub fn apply(mut self, action: Action) -> ViewState {
        match action {
            Action::SetQuery(query) => {
                self.query = query;
                self.page = 1;
            }
            Action::ToggleFacet { facet, value } => {
                self.filters.toggle(facet, &value);
                self.page = 1;
            }
            Action::ClearFacet(facet) => {
                self.filters.selected_mut(facet).clear();
                self.page = 1;
            }
            Action::SetRange { range, bounds } => {
                self.filters.set_range(range, bounds);
                self.page = 1;
            }
            Action::ClearFilters => {
                self.filters = SearchFilters::default();
                self.page = 1;
            }
            Action::LoadSearch { query, filters } => {
                self.query = query;
                self.filters = filters;
                self.page = 1;
            }
            Action::SortBy(key) => {
                self.sort = self.sort.click(&key);
                self.page = 1;
            }
            Action::SetPage(page) => self.page = page.max(1),
            Action::SetPageSize(size) => {
                self.page_size = size.max(1);
                self.page = 1;
            }
            Action::SetMode(mode) => self.mode = mode,
            Action::ToggleRow(id) => {
                if !self.selection.remove(&id) {
                    self.selection.insert(id);
                }
            }
            Action::SetPageSelected { ids, selected } => {
                if selected {
                    self.selection.extend(ids);
                } else {
                    for id in &ids {
                        self.selection.remove(id);
                    }
                }
            }
            Action::ClearSelection => self.selection.clear(),
            Action::Activate(id) => self.drawer = DrawerState::open(id),
            Action::CloseDrawer => self.drawer = std::mem::take(&mut self.drawer).close(),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortDirection;

    #[test]
    fn filter_changes_reset_the_page_but_keep_selection() {
        let state = ViewState::new(EntityType::Supplier)
            .apply(Action::ToggleRow("S1".into()))
            .apply(Action::SetPage(3))
            .apply(Action::ToggleFacet { facet: Facet::Country, value: "China".into() });
        assert_eq!(state.page, 1);
        assert!(state.selection.contains("S1"));
        assert_eq!(state.filters.country, vec!["China"]);
    }

    #[test]
    fn checkbox_click_does_not_open_drawer() {
        let state = ViewState::new(EntityType::Carrier)
            .apply(RowEvent::CheckboxClicked("C1".into()).into_action());
        assert!(state.selection.contains("C1"));
        assert_eq!(state.drawer, DrawerState::Closed);

        let state = state.apply(RowEvent::RowClicked("C2".into()).into_action());
        assert_eq!(state.drawer.open_id(), Some("C2"));
        assert_eq!(state.selection.len(), 1);
    }

    #[test]
    fn activating_another_record_replaces_open_drawer() {
        let state = ViewState::new(EntityType::Factory)
            .apply(Action::Activate("F1".into()))
            .apply(Action::Activate("F2".into()));
        assert_eq!(state.drawer, DrawerState::open("F2"));
        assert_eq!(state.apply(Action::CloseDrawer).drawer, DrawerState::Closed);
    }

    #[test]
    fn sort_clicks_toggle_direction() {
        let state = ViewState::new(EntityType::Warehouse)
            .apply(Action::SortBy("utilization".into()))
            .apply(Action::SortBy("utilization".into()));
        assert_eq!(state.sort, SortState::new("utilization", SortDirection::Desc));
    }

    #[test]
    fn deselecting_page_keeps_other_pages() {
        let state = ViewState::new(EntityType::Supplier)
            .apply(Action::SetPageSelected { ids: vec!["A".into(), "B".into()], selected: true })
            .apply(Action::SetPageSelected { ids: vec!["C".into()], selected: true })
            .apply(Action::SetPageSelected { ids: vec!["A".into(), "B".into()], selected: false });
        assert_eq!(state.selection.into_iter().collect::<Vec<_>>(), vec!["C".to_string()]);
    }
}
