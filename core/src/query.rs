use crate::fields::FieldValue;
use crate::model::{Facet, RangeFilter, Record};
use crate::text::{contains_folded, fold};
use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Inclusive `[min, max]`, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds(pub f64, pub f64);

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.0 && value <= self.1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub country: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mode: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specialty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certification: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moq_range: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_range: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization_range: Option<Bounds>,
}

impl SearchFilters {
    pub fn selected(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Country => &self.country,
            Facet::Mode => &self.mode,
            Facet::Specialty => &self.specialty,
            Facet::Certification => &self.certification,
            Facet::Service => &self.service,
        }
    }

    pub fn selected_mut(&mut self, facet: Facet) -> &mut Vec<String> {
        match facet {
            Facet::Country => &mut self.country,
            Facet::Mode => &mut self.mode,
            Facet::Specialty => &mut self.specialty,
            Facet::Certification => &mut self.certification,
            Facet::Service => &mut self.service,
        }
    }

    /// Adds `value` if absent, removes it otherwise. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        let selected = self.selected_mut(facet);
        match selected.iter().position(|v| v == value) {
            Some(i) => {
                selected.remove(i);
                false
            }
            None => {
                selected.push(value.to_string());
                true
            }
        }
    }

    pub fn range(&self, range: RangeFilter) -> Option<Bounds> {
        match range {
            RangeFilter::Moq => self.moq_range,
            RangeFilter::Capacity => self.capacity_range,
            RangeFilter::Utilization => self.utilization_range,
        }
    }

    pub fn set_range(&mut self, range: RangeFilter, bounds: Option<Bounds>) {
        let slot = match range {
            RangeFilter::Moq => &mut self.moq_range,
            RangeFilter::Capacity => &mut self.capacity_range,
            RangeFilter::Utilization => &mut self.utilization_range,
        };
        *slot = bounds;
    }

    /// Selected facet values plus active ranges.
    pub fn active_count(&self) -> usize {
        let facets: usize = Facet::ALL.iter().map(|f| self.selected(*f).len()).sum();
        let ranges = RangeFilter::ALL.iter().filter(|r| self.range(**r).is_some()).count();
        facets + ranges
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(anyhow!("invalid sort direction: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub sort_by: String,
    pub sort_direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        SortState { sort_by: "name".to_string(), sort_direction: SortDirection::Asc }
    }
}

impl SortState {
    pub fn new(sort_by: impl Into<String>, sort_direction: SortDirection) -> Self {
        SortState { sort_by: sort_by.into(), sort_direction }
    }

    /// Header click: the same column flips direction, a new column starts ascending.
    pub fn click(&self, key: &str) -> SortState {
        if self.sort_by == key {
            SortState::new(key, self.sort_direction.toggled())
        } else {
            SortState::new(key, SortDirection::Asc)
        }
    }
}

/// `folded_query` must be non-empty and already folded.
pub fn matches_query(record: &Record, folded_query: &str) -> bool {
    record.search_fields().into_iter().any(|f| contains_folded(f, folded_query))
}

pub fn matches_facets(record: &Record, filters: &SearchFilters) -> bool {
    Facet::ALL.into_iter().all(|facet| {
        let wanted = filters.selected(facet);
        wanted.is_empty() || record.facet_values(facet).into_iter().any(|v| wanted.iter().any(|w| w == v))
    })
}

/// A record without the ranged attribute does not satisfy an active range.
pub fn matches_ranges(record: &Record, filters: &SearchFilters) -> bool {
    RangeFilter::ALL.into_iter().all(|range| match filters.range(range) {
        None => true,
        Some(bounds) => record.range_value(range).is_some_and(|v| bounds.contains(v)),
    })
}

#[derive(Debug)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn from_value(value: FieldValue) -> Self {
        match value {
            FieldValue::Number(n) => SortKey::Number(n),
            FieldValue::Text(s) => SortKey::Text(fold(&s)),
            FieldValue::List(items) => SortKey::Text(fold(&items.join(", "))),
        }
    }
}

fn compare_keys(a: &Option<SortKey>, b: &Option<SortKey>, direction: SortDirection) -> Ordering {
    let ord = match (a, b) {
        (None, None) => return Ordering::Equal,
        // missing values go last in both directions
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(SortKey::Number(x)), Some(SortKey::Number(y))) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Some(SortKey::Text(x)), Some(SortKey::Text(y))) => x.cmp(y),
        _ => Ordering::Equal,
    };
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// Stable sort by `sort.sort_by`. An unknown key leaves the order untouched.
pub fn sort_records(records: &mut Vec<&Record>, sort: &SortState) {
    let mut keyed: Vec<(Option<SortKey>, &Record)> = records
        .iter()
        .map(|r| (r.field(&sort.sort_by).map(SortKey::from_value), *r))
        .collect();
    keyed.sort_by(|a, b| compare_keys(&a.0, &b.0, sort.sort_direction));
    *records = keyed.into_iter().map(|(_, r)| r).collect();
}

/// Filter and order `collection`: text query, facets (OR within a facet, AND
/// across facets), inclusive ranges, then a stable sort.
pub fn compute_view<'a>(
    collection: &'a [Record],
    query: &str,
    filters: &SearchFilters,
    sort: &SortState,
) -> Vec<&'a Record> {
    let mut view: Vec<&Record> = collection.iter().collect();
    if !query.is_empty() {
        let q = fold(query);
        view.retain(|r| matches_query(r, &q));
    }
    view.retain(|r| matches_facets(r, filters));
    view.retain(|r| matches_ranges(r, filters));
    sort_records(&mut view, sort);
    tracing::trace!(
        total = collection.len(),
        hits = view.len(),
        sort_by = %sort.sort_by,
        direction = sort.sort_direction.as_str(),
        "computed view"
    );
    view
}
