//! Card-grid rendering of a filtered result.

use crate::fields::{field_meta, Tone};
use crate::format::{badges, format_value, Cell, CARD_TAG_LIMIT, MISSING};
use crate::model::{EntityType, Record};
use crate::table::{page_slice, total_pages, EmptyState};
use serde::Serialize;

pub const CARD_METRIC_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardMetric {
    pub label: String,
    pub display: String,
    pub tone: Tone,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub metrics: Vec<CardMetric>,
    pub tags: Cell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPage {
    pub cards: Vec<Card>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub empty: Option<EmptyState>,
}

fn metric_keys(entity_type: EntityType) -> [&'static str; CARD_METRIC_LIMIT] {
    match entity_type {
        EntityType::Supplier => ["onTimePercent", "defectRate", "avgLeadTimeDays", "riskIndex"],
        EntityType::Factory => ["utilization", "complianceScore", "capacity", "employeeCount"],
        EntityType::Warehouse => ["utilization", "slaPickRate", "slaPackRate", "capacity"],
        EntityType::FreightForwarder => ["serviceRating", "quoteResponsiveness", "avgTransitVariance", "totalShipments"],
        EntityType::Carrier => ["onTimePercent", "claimsRate", "costPerMile", "fleetSize"],
    }
}

fn subtitle(record: &Record) -> String {
    let base = record.base();
    let mut parts: Vec<&str> = Vec::new();
    if let Record::Warehouse(w) = record {
        if let Some(city) = w.city.as_deref() {
            parts.push(city);
        }
    }
    parts.push(&base.country);
    if let Some(region) = base.region.as_deref() {
        parts.push(region);
    }
    parts.join(" · ")
}

pub fn render_card(record: &Record) -> Card {
    let entity_type = record.entity_type();
    let metrics = metric_keys(entity_type)
        .into_iter()
        .filter_map(|key| field_meta(entity_type, key))
        .map(|meta| match record.field(meta.key) {
            Some(value) => {
                let tone = meta.tone(&value);
                CardMetric {
                    label: meta.label.to_string(),
                    display: format_value(&value, meta.unit),
                    tone,
                    color: tone.color(),
                }
            }
            None => CardMetric {
                label: meta.label.to_string(),
                display: MISSING.to_string(),
                tone: Tone::Neutral,
                color: Tone::Neutral.color(),
            },
        })
        .collect();
    Card {
        id: record.id().to_string(),
        title: record.name().to_string(),
        subtitle: subtitle(record),
        metrics,
        tags: badges(record.tags(), CARD_TAG_LIMIT),
    }
}

pub fn render_cards(entity_type: EntityType, result: &[&Record], page: usize, page_size: usize) -> CardPage {
    CardPage {
        cards: page_slice(result, page, page_size).iter().map(|r| render_card(r)).collect(),
        page: page.max(1),
        page_size: page_size.max(1),
        total_pages: total_pages(result.len(), page_size),
        total_results: result.len(),
        empty: result.is_empty().then(|| EmptyState::no_matches(entity_type)),
    }
}
