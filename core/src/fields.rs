//! Static accessor tables mapping attribute keys to typed extractors.
//!
//! Sorting, table columns, cards and the detail drawer all address attributes
//! by their camelCase key (`onTimePercent`, `defectRate`, ...). Each variant
//! gets one table, built once, so lookups never need reflection.

use crate::model::{Carrier, EntityType, Factory, FreightForwarder, Record, RecordBase, Supplier, Warehouse};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Display hint for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Unit {
    Number,
    /// Already in `0..=100`.
    Percent,
    /// A `0..=1` fraction shown as a percentage.
    Fraction,
    Days,
    Currency,
    Stars,
    Year,
    Text,
    List,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

/// Traffic-light colour of a rated metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tone {
    Good,
    Warning,
    Critical,
    Neutral,
}

impl Tone {
    pub fn color(&self) -> &'static str {
        match self {
            Tone::Good => "green",
            Tone::Warning => "yellow",
            Tone::Critical => "red",
            Tone::Neutral => "gray",
        }
    }
}

/// Three-tier thresholds. `good` is the stricter bound in both polarities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rating {
    pub polarity: Polarity,
    pub good: f64,
    pub warn: f64,
}

impl Rating {
    pub const fn higher(good: f64, warn: f64) -> Self {
        Rating { polarity: Polarity::HigherIsBetter, good, warn }
    }

    pub const fn lower(good: f64, warn: f64) -> Self {
        Rating { polarity: Polarity::LowerIsBetter, good, warn }
    }

    pub fn tone(&self, value: f64) -> Tone {
        match self.polarity {
            Polarity::HigherIsBetter if value >= self.good => Tone::Good,
            Polarity::HigherIsBetter if value >= self.warn => Tone::Warning,
            Polarity::LowerIsBetter if value <= self.good => Tone::Good,
            Polarity::LowerIsBetter if value <= self.warn => Tone::Warning,
            _ => Tone::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Unit,
    pub rating: Option<Rating>,
}

impl FieldMeta {
    const fn new(key: &'static str, label: &'static str, unit: Unit) -> Self {
        FieldMeta { key, label, unit, rating: None }
    }

    const fn rated(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn tone(&self, value: &FieldValue) -> Tone {
        match (self.rating, value.as_number()) {
            (Some(r), Some(n)) => r.tone(n),
            _ => Tone::Neutral,
        }
    }
}

pub struct Field<T> {
    pub meta: FieldMeta,
    pub get: fn(&T) -> Option<FieldValue>,
}

fn float(v: Option<f64>) -> Option<FieldValue> {
    v.map(FieldValue::Number)
}

fn int<N: Into<u64>>(v: Option<N>) -> Option<FieldValue> {
    v.map(|n| {
        let n: u64 = n.into();
        FieldValue::Number(n as f64)
    })
}

fn text(v: &Option<String>) -> Option<FieldValue> {
    v.clone().map(FieldValue::Text)
}

fn list(v: &[String]) -> Option<FieldValue> {
    Some(FieldValue::List(v.to_vec()))
}

static BASE_FIELDS: &[Field<RecordBase>] = &[
    Field { meta: FieldMeta::new("id", "ID", Unit::Text), get: |b| Some(FieldValue::Text(b.id.clone())) },
    Field { meta: FieldMeta::new("name", "Name", Unit::Text), get: |b| Some(FieldValue::Text(b.name.clone())) },
    Field { meta: FieldMeta::new("country", "Country", Unit::Text), get: |b| Some(FieldValue::Text(b.country.clone())) },
    Field { meta: FieldMeta::new("region", "Region", Unit::Text), get: |b| text(&b.region) },
    Field { meta: FieldMeta::new("website", "Website", Unit::Link), get: |b| text(&b.website) },
];

static SUPPLIER_FIELDS: &[Field<Supplier>] = &[
    Field {
        meta: FieldMeta::new("onTimePercent", "On-Time %", Unit::Percent).rated(Rating::higher(95.0, 85.0)),
        get: |s| float(s.on_time_percent),
    },
    Field {
        meta: FieldMeta::new("defectRate", "Defect Rate", Unit::Fraction).rated(Rating::lower(0.01, 0.03)),
        get: |s| float(s.defect_rate),
    },
    Field {
        meta: FieldMeta::new("avgLeadTimeDays", "Avg Lead Time", Unit::Days).rated(Rating::lower(14.0, 30.0)),
        get: |s| int(s.avg_lead_time_days),
    },
    Field {
        meta: FieldMeta::new("riskIndex", "Risk Index", Unit::Number).rated(Rating::lower(2.0, 3.0)),
        get: |s| int(s.risk_index),
    },
    Field { meta: FieldMeta::new("moq", "MOQ", Unit::Number), get: |s| int(s.moq) },
    Field { meta: FieldMeta::new("totalOrders", "Total Orders", Unit::Number), get: |s| int(s.total_orders) },
    Field { meta: FieldMeta::new("lastOrderDate", "Last Order", Unit::Text), get: |s| text(&s.last_order_date) },
    Field { meta: FieldMeta::new("contactEmail", "Contact", Unit::Text), get: |s| text(&s.contact_email) },
    Field { meta: FieldMeta::new("certifications", "Certifications", Unit::List), get: |s| list(&s.certifications) },
    Field { meta: FieldMeta::new("specialties", "Specialties", Unit::List), get: |s| list(&s.specialties) },
];

static FACTORY_FIELDS: &[Field<Factory>] = &[
    Field { meta: FieldMeta::new("capacity", "Capacity / mo", Unit::Number), get: |f| int(f.capacity) },
    Field { meta: FieldMeta::new("utilization", "Utilization", Unit::Percent), get: |f| float(f.utilization) },
    Field {
        meta: FieldMeta::new("complianceScore", "Compliance", Unit::Percent).rated(Rating::higher(90.0, 75.0)),
        get: |f| float(f.compliance_score),
    },
    Field { meta: FieldMeta::new("employeeCount", "Employees", Unit::Number), get: |f| int(f.employee_count) },
    Field { meta: FieldMeta::new("establishedYear", "Established", Unit::Year), get: |f| int(f.established_year) },
    Field { meta: FieldMeta::new("moq", "MOQ", Unit::Number), get: |f| int(f.moq) },
    Field { meta: FieldMeta::new("capabilities", "Capabilities", Unit::List), get: |f| list(&f.capabilities) },
];

static WAREHOUSE_FIELDS: &[Field<Warehouse>] = &[
    Field { meta: FieldMeta::new("city", "City", Unit::Text), get: |w| text(&w.city) },
    Field { meta: FieldMeta::new("capacity", "Capacity (sq ft)", Unit::Number), get: |w| int(w.capacity) },
    Field { meta: FieldMeta::new("utilization", "Utilization", Unit::Percent), get: |w| float(w.utilization) },
    Field {
        meta: FieldMeta::new("slaPickRate", "Pick SLA", Unit::Percent).rated(Rating::higher(98.0, 95.0)),
        get: |w| float(w.sla_pick_rate),
    },
    Field {
        meta: FieldMeta::new("slaPackRate", "Pack SLA", Unit::Percent).rated(Rating::higher(98.0, 95.0)),
        get: |w| float(w.sla_pack_rate),
    },
    Field { meta: FieldMeta::new("inboundVolume", "Inbound / mo", Unit::Number), get: |w| int(w.inbound_volume) },
    Field { meta: FieldMeta::new("outboundVolume", "Outbound / mo", Unit::Number), get: |w| int(w.outbound_volume) },
    Field { meta: FieldMeta::new("services", "Services", Unit::List), get: |w| list(&w.services) },
];

static FORWARDER_FIELDS: &[Field<FreightForwarder>] = &[
    Field {
        meta: FieldMeta::new("serviceRating", "Service Rating", Unit::Stars).rated(Rating::higher(4.5, 3.5)),
        get: |ff| float(ff.service_rating),
    },
    Field {
        meta: FieldMeta::new("quoteResponsiveness", "Quote Response", Unit::Percent).rated(Rating::higher(90.0, 75.0)),
        get: |ff| float(ff.quote_responsiveness),
    },
    Field {
        meta: FieldMeta::new("avgTransitVariance", "Transit Variance", Unit::Days).rated(Rating::lower(1.0, 3.0)),
        get: |ff| float(ff.avg_transit_variance),
    },
    Field { meta: FieldMeta::new("totalShipments", "Shipments", Unit::Number), get: |ff| int(ff.total_shipments) },
    Field { meta: FieldMeta::new("establishedYear", "Established", Unit::Year), get: |ff| int(ff.established_year) },
    Field { meta: FieldMeta::new("lanes", "Lanes", Unit::List), get: |ff| list(&ff.lanes) },
    Field { meta: FieldMeta::new("modes", "Modes", Unit::List), get: |ff| list(&ff.modes) },
];

static CARRIER_FIELDS: &[Field<Carrier>] = &[
    Field {
        meta: FieldMeta::new("onTimePercent", "On-Time %", Unit::Percent).rated(Rating::higher(95.0, 85.0)),
        get: |c| float(c.on_time_percent),
    },
    Field {
        meta: FieldMeta::new("claimsRate", "Claims Rate", Unit::Fraction).rated(Rating::lower(0.01, 0.02)),
        get: |c| float(c.claims_rate),
    },
    Field {
        meta: FieldMeta::new("costPerMile", "Cost / Mile", Unit::Currency).rated(Rating::lower(2.5, 3.5)),
        get: |c| float(c.cost_per_mile),
    },
    Field { meta: FieldMeta::new("serviceLevel", "Service Level", Unit::Text), get: |c| text(&c.service_level) },
    Field { meta: FieldMeta::new("fleetSize", "Fleet Size", Unit::Number), get: |c| int(c.fleet_size) },
    Field { meta: FieldMeta::new("establishedYear", "Established", Unit::Year), get: |c| int(c.established_year) },
    Field { meta: FieldMeta::new("lanes", "Lanes", Unit::List), get: |c| list(&c.lanes) },
    Field { meta: FieldMeta::new("modes", "Modes", Unit::List), get: |c| list(&c.modes) },
];

/// `None` when `key` is not in the table, `Some(None)` when the record lacks a value.
fn lookup<T>(fields: &[Field<T>], key: &str, rec: &T) -> Option<Option<FieldValue>> {
    fields.iter().find(|f| f.meta.key == key).map(|f| (f.get)(rec))
}

fn metas<T>(fields: &[Field<T>]) -> impl Iterator<Item = FieldMeta> + '_ {
    fields.iter().map(|f| f.meta)
}

impl Record {
    /// Value of the attribute named `key`. Unknown keys and absent values
    /// both yield `None`.
    pub fn field(&self, key: &str) -> Option<FieldValue> {
        if let Some(v) = lookup(BASE_FIELDS, key, self.base()) {
            return v;
        }
        let found = match self {
            Record::Supplier(s) => lookup(SUPPLIER_FIELDS, key, s),
            Record::Factory(f) => lookup(FACTORY_FIELDS, key, f),
            Record::Warehouse(w) => lookup(WAREHOUSE_FIELDS, key, w),
            Record::FreightForwarder(ff) => lookup(FORWARDER_FIELDS, key, ff),
            Record::Carrier(c) => lookup(CARRIER_FIELDS, key, c),
        };
        found.flatten()
    }
}

/// Common fields followed by the variant's own fields.
pub fn fields_of(entity_type: EntityType) -> Vec<FieldMeta> {
    let mut out: Vec<FieldMeta> = metas(BASE_FIELDS).collect();
    match entity_type {
        EntityType::Supplier => out.extend(metas(SUPPLIER_FIELDS)),
        EntityType::Factory => out.extend(metas(FACTORY_FIELDS)),
        EntityType::Warehouse => out.extend(metas(WAREHOUSE_FIELDS)),
        EntityType::FreightForwarder => out.extend(metas(FORWARDER_FIELDS)),
        EntityType::Carrier => out.extend(metas(CARRIER_FIELDS)),
    }
    out
}

pub fn field_meta(entity_type: EntityType, key: &str) -> Option<FieldMeta> {
    fields_of(entity_type).into_iter().find(|m| m.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordBase;

    fn carrier() -> Record {
        Record::Carrier(Carrier {
            base: RecordBase {
                id: "C1".into(),
                name: "Blue Line".into(),
                country: "USA".into(),
                region: Some("North America".into()),
                website: None,
            },
            on_time_percent: Some(91.0),
            claims_rate: None,
            cost_per_mile: Some(2.1),
            service_level: Some("Expedited".into()),
            fleet_size: Some(420),
            lanes: vec!["LAX-CHI".into()],
            modes: vec!["FTL".into()],
            established_year: Some(1998),
        })
    }

    #[test]
    fn looks_up_common_and_variant_fields() {
        let c = carrier();
        assert_eq!(c.field("name"), Some(FieldValue::Text("Blue Line".into())));
        assert_eq!(c.field("fleetSize"), Some(FieldValue::Number(420.0)));
        assert_eq!(c.field("claimsRate"), None);
        assert_eq!(c.field("website"), None);
        assert_eq!(c.field("noSuchKey"), None);
        // supplier-only key on a carrier
        assert_eq!(c.field("defectRate"), None);
    }

    #[test]
    fn rating_tones_follow_polarity() {
        let on_time = Rating::higher(95.0, 85.0);
        assert_eq!(on_time.tone(97.0), Tone::Good);
        assert_eq!(on_time.tone(90.0), Tone::Warning);
        assert_eq!(on_time.tone(70.0), Tone::Critical);

        let defects = Rating::lower(0.01, 0.03);
        assert_eq!(defects.tone(0.005), Tone::Good);
        assert_eq!(defects.tone(0.02), Tone::Warning);
        assert_eq!(defects.tone(0.08), Tone::Critical);
    }

    #[test]
    fn every_variant_exposes_base_fields_first() {
        for t in EntityType::ALL {
            let keys: Vec<&str> = fields_of(t).iter().map(|m| m.key).collect();
            assert_eq!(&keys[..5], &["id", "name", "country", "region", "website"]);
        }
        assert_eq!(field_meta(EntityType::Warehouse, "slaPickRate").unwrap().unit, Unit::Percent);
    }
}
