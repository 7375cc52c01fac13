use crate::fields::{field_meta, FieldMeta, FieldValue, Unit};
use crate::format::{default_cell, format_value, Cell};
use crate::model::{EntityType, Record};
use crate::query::{SortDirection, SortState};
use serde::Serialize;
use std::collections::BTreeSet;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Receives `None` when the record lacks the column's attribute.
pub type Formatter = fn(Option<&FieldValue>) -> Cell;

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub unit: Unit,
    /// Overrides the unit-based rendering when set.
    pub formatter: Option<Formatter>,
}

impl Column {
    pub fn new(key: &'static str, label: &'static str, unit: Unit) -> Self {
        Column { key, label, sortable: unit != Unit::List, unit, formatter: None }
    }

    pub fn from_meta(meta: FieldMeta) -> Self {
        Column::new(meta.key, meta.label, meta.unit)
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn render(&self, record: &Record) -> Cell {
        let value = record.field(self.key);
        if let Some(formatter) = self.formatter {
            return formatter(value.as_ref());
        }
        let Some(value) = value else {
            return Cell::Missing;
        };
        match (self.unit, &value) {
            (Unit::Number | Unit::Text | Unit::List, _) => default_cell(Some(&value)),
            (Unit::Link, FieldValue::Text(href)) => Cell::Link { href: href.clone() },
            (unit, v) => Cell::text(format_value(v, unit)),
        }
    }

    fn header(&self, sort: &SortState) -> ColumnHeader {
        ColumnHeader {
            key: self.key,
            label: self.label,
            sortable: self.sortable,
            sorted: (self.sortable && sort.sort_by == self.key).then_some(sort.sort_direction),
        }
    }
}

/// Risk index 1-5 as a band label.
fn risk_band(value: Option<&FieldValue>) -> Cell {
    match value.and_then(FieldValue::as_number) {
        Some(n) if n <= 2.0 => Cell::text(format!("Low ({n})")),
        Some(n) if n <= 3.0 => Cell::text(format!("Medium ({n})")),
        Some(n) => Cell::text(format!("High ({n})")),
        None => default_cell(value),
    }
}

fn columns_from(entity_type: EntityType, keys: &[&str]) -> Vec<Column> {
    keys.iter()
        .filter_map(|k| field_meta(entity_type, k))
        .map(Column::from_meta)
        .collect()
}

pub fn default_columns(entity_type: EntityType) -> Vec<Column> {
    match entity_type {
        EntityType::Supplier => {
            let mut cols = columns_from(
                entity_type,
                &["name", "country", "onTimePercent", "defectRate", "avgLeadTimeDays", "riskIndex", "moq", "certifications"],
            );
            for col in cols.iter_mut().filter(|c| c.key == "riskIndex") {
                *col = col.with_formatter(risk_band);
            }
            cols
        }
        EntityType::Factory => columns_from(
            entity_type,
            &["name", "country", "capacity", "utilization", "complianceScore", "employeeCount", "capabilities"],
        ),
        EntityType::Warehouse => columns_from(
            entity_type,
            &["name", "city", "country", "capacity", "utilization", "slaPickRate", "slaPackRate", "services"],
        ),
        EntityType::FreightForwarder => columns_from(
            entity_type,
            &["name", "country", "serviceRating", "quoteResponsiveness", "avgTransitVariance", "totalShipments", "modes", "lanes"],
        ),
        EntityType::Carrier => columns_from(
            entity_type,
            &["name", "country", "onTimePercent", "claimsRate", "costPerMile", "serviceLevel", "fleetSize", "modes"],
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub sorted: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: String,
    pub cells: Vec<Cell>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: String,
    pub hint: String,
}

impl EmptyState {
    pub fn no_matches(entity_type: EntityType) -> Self {
        EmptyState {
            title: format!("No {} match your search", entity_type.plural()),
            hint: "Try a different search term or clear some filters.".to_string(),
        }
    }

    pub fn no_records(entity_type: EntityType) -> Self {
        EmptyState {
            title: format!("No {} yet", entity_type.plural()),
            hint: "Records appear here once they are added to the catalog.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<Row>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_results: usize,
    /// Every row on this page is selected. Rows on other pages are ignored.
    pub all_selected: bool,
    pub empty: Option<EmptyState>,
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Items `[(page-1)*size, page*size)`; page numbers start at 1.
pub fn page_slice<'r, T>(result: &'r [T], page: usize, page_size: usize) -> &'r [T] {
    let size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(size).min(result.len());
    let end = start.saturating_add(size).min(result.len());
    &result[start..end]
}

pub fn page_ids(result: &[&Record], page: usize, page_size: usize) -> Vec<String> {
    page_slice(result, page, page_size).iter().map(|r| r.id().to_string()).collect()
}

pub fn render_page(
    entity_type: EntityType,
    result: &[&Record],
    page: usize,
    page_size: usize,
    columns: &[Column],
    sort: &SortState,
    selection: &BTreeSet<String>,
) -> TablePage {
    let rows: Vec<Row> = page_slice(result, page, page_size)
        .iter()
        .map(|record| Row {
            id: record.id().to_string(),
            cells: columns.iter().map(|c| c.render(record)).collect(),
            selected: selection.contains(record.id()),
        })
        .collect();
    let all_selected = !rows.is_empty() && rows.iter().all(|r| r.selected);
    TablePage {
        columns: columns.iter().map(|c| c.header(sort)).collect(),
        rows,
        page: page.max(1),
        page_size: page_size.max(1),
        total_pages: total_pages(result.len(), page_size),
        total_results: result.len(),
        all_selected,
        empty: result.is_empty().then(|| EmptyState::no_matches(entity_type)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_round_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn slices_pages_and_tolerates_out_of_range() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(page_slice(&items, 1, 10), &items[0..10]);
        assert_eq!(page_slice(&items, 3, 10), &items[20..25]);
        assert!(page_slice(&items, 4, 10).is_empty());
        assert_eq!(page_slice(&items, 0, 10), &items[0..10]);
    }

    #[test]
    fn supplier_columns_band_the_risk_index() {
        let cols = default_columns(EntityType::Supplier);
        let risk = cols.iter().find(|c| c.key == "riskIndex").unwrap();
        assert!(risk.formatter.is_some());
        assert_eq!(risk_band(Some(&FieldValue::Number(4.0))), Cell::text("High (4)"));
        assert_eq!(risk_band(None), Cell::Missing);
        let certs = cols.iter().find(|c| c.key == "certifications").unwrap();
        assert!(!certs.sortable);
    }
}
