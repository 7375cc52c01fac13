//! Read-only detail panel for a single record.

use crate::fields::{field_meta, FieldValue, Tone};
use crate::format::{format_value, Cell};
use crate::model::{EntityType, Record};
use serde::{Deserialize, Serialize};

/// `Closed` is the resting state; opening another record while open replaces
/// the id without passing through `Closed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DrawerState {
    #[default]
    Closed,
    Open { id: String },
}

impl DrawerState {
    pub fn open(id: impl Into<String>) -> Self {
        DrawerState::Open { id: id.into() }
    }

    pub fn close(self) -> Self {
        DrawerState::Closed
    }

    pub fn open_id(&self) -> Option<&str> {
        match self {
            DrawerState::Open { id } => Some(id.as_str()),
            DrawerState::Closed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailHeader {
    pub name: String,
    pub location: String,
    pub website: Cell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub label: String,
    pub value: Cell,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSection {
    pub title: &'static str,
    pub rows: Vec<DetailRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPanel {
    pub entity_type: EntityType,
    pub id: String,
    pub header: DetailHeader,
    pub sections: Vec<DetailSection>,
}

fn detail_row(record: &Record, key: &str) -> Option<DetailRow> {
    let meta = field_meta(record.entity_type(), key)?;
    let row = match record.field(key) {
        // detail view lists every tag, no overflow
        Some(FieldValue::List(items)) => DetailRow {
            label: meta.label.to_string(),
            value: Cell::Badges { shown: items, overflow: 0 },
            tone: Tone::Neutral,
        },
        Some(value) => DetailRow {
            label: meta.label.to_string(),
            tone: meta.tone(&value),
            value: Cell::text(format_value(&value, meta.unit)),
        },
        None => DetailRow { label: meta.label.to_string(), value: Cell::Missing, tone: Tone::Neutral },
    };
    Some(row)
}

fn section(record: &Record, title: &'static str, keys: &[&str]) -> DetailSection {
    DetailSection { title, rows: keys.iter().filter_map(|k| detail_row(record, k)).collect() }
}

fn header(record: &Record) -> DetailHeader {
    let base = record.base();
    let mut location = match record {
        Record::Warehouse(w) => w.city.clone().map(|c| format!("{c}, {}", base.country)).unwrap_or_else(|| base.country.clone()),
        _ => base.country.clone(),
    };
    if let Some(region) = &base.region {
        location.push_str(&format!(" ({region})"));
    }
    DetailHeader {
        name: base.name.clone(),
        location,
        website: match &base.website {
            Some(href) => Cell::Link { href: href.clone() },
            None => Cell::Missing,
        },
    }
}

/// Build the variant-specific panel for `record`.
pub fn open_detail(record: &Record) -> DetailPanel {
    let sections = match record {
        Record::Supplier(_) => vec![
            section(record, "Performance", &["onTimePercent", "defectRate", "avgLeadTimeDays", "riskIndex"]),
            section(record, "Commercial", &["moq", "totalOrders", "lastOrderDate", "contactEmail"]),
            section(record, "Certifications & Specialties", &["certifications", "specialties"]),
        ],
        Record::Factory(_) => vec![
            section(record, "Operations", &["capacity", "utilization", "employeeCount", "moq"]),
            section(record, "Compliance", &["complianceScore", "establishedYear"]),
            section(record, "Capabilities", &["capabilities"]),
        ],
        Record::Warehouse(_) => vec![
            section(record, "Capacity", &["capacity", "utilization", "inboundVolume", "outboundVolume"]),
            section(record, "SLA Performance", &["slaPickRate", "slaPackRate"]),
            section(record, "Services", &["services"]),
        ],
        Record::FreightForwarder(_) => vec![
            section(record, "Service", &["serviceRating", "quoteResponsiveness", "avgTransitVariance"]),
            section(record, "Network", &["modes", "lanes", "totalShipments", "establishedYear"]),
        ],
        Record::Carrier(_) => vec![
            section(record, "Performance", &["onTimePercent", "claimsRate", "costPerMile", "serviceLevel"]),
            section(record, "Fleet & Network", &["fleetSize", "modes", "lanes", "establishedYear"]),
        ],
    };
    DetailPanel {
        entity_type: record.entity_type(),
        id: record.id().to_string(),
        header: header(record),
        sections,
    }
}

/// Nothing is rendered while no record is selected.
pub fn render_drawer(record: Option<&Record>) -> Option<DetailPanel> {
    record.map(open_detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordBase, Warehouse};

    fn warehouse(website: Option<&str>) -> Record {
        Record::Warehouse(Warehouse {
            base: RecordBase {
                id: "W7".into(),
                name: "Harbor DC".into(),
                country: "USA".into(),
                region: Some("West".into()),
                website: website.map(String::from),
            },
            capacity: Some(250_000),
            utilization: Some(82.5),
            sla_pick_rate: Some(99.1),
            sla_pack_rate: None,
            services: vec!["Cross-dock".into(), "Kitting".into(), "Returns".into()],
            inbound_volume: None,
            outbound_volume: None,
            city: Some("Oakland".into()),
        })
    }

    #[test]
    fn closed_drawer_renders_nothing() {
        assert_eq!(render_drawer(None), None);
    }

    #[test]
    fn warehouse_panel_has_header_and_sections() {
        let panel = open_detail(&warehouse(None));
        assert_eq!(panel.header.location, "Oakland, USA (West)");
        assert_eq!(panel.header.website, Cell::Missing);
        let titles: Vec<&str> = panel.sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Capacity", "SLA Performance", "Services"]);
        let sla = &panel.sections[1];
        assert_eq!(sla.rows[0].tone, Tone::Good);
        assert_eq!(sla.rows[1].value, Cell::Missing);
        // all services listed, no "+N"
        assert_eq!(
            panel.sections[2].rows[0].value,
            Cell::Badges { shown: vec!["Cross-dock".into(), "Kitting".into(), "Returns".into()], overflow: 0 }
        );
    }

    #[test]
    fn website_renders_as_link() {
        let panel = open_detail(&warehouse(Some("https://harbor.example")));
        assert_eq!(panel.header.website, Cell::Link { href: "https://harbor.example".into() });
    }
}
