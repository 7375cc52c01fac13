use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Supplier,
    Factory,
    Warehouse,
    FreightForwarder,
    Carrier,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Supplier,
        EntityType::Factory,
        EntityType::Warehouse,
        EntityType::FreightForwarder,
        EntityType::Carrier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Supplier => "supplier",
            EntityType::Factory => "factory",
            EntityType::Warehouse => "warehouse",
            EntityType::FreightForwarder => "freight-forwarder",
            EntityType::Carrier => "carrier",
        }
    }

    /// Lowercase plural noun, used in empty states ("No suppliers match ...").
    pub fn plural(&self) -> &'static str {
        match self {
            EntityType::Supplier => "suppliers",
            EntityType::Factory => "factories",
            EntityType::Warehouse => "warehouses",
            EntityType::FreightForwarder => "freight forwarders",
            EntityType::Carrier => "carriers",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("unknown entity type: {s}"))
    }
}

/// Filter dimensions with a discrete set of selectable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    Country,
    Mode,
    Specialty,
    Certification,
    Service,
}

impl Facet {
    pub const ALL: [Facet; 5] = [Facet::Country, Facet::Mode, Facet::Specialty, Facet::Certification, Facet::Service];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Country => "country",
            Facet::Mode => "mode",
            Facet::Specialty => "specialty",
            Facet::Certification => "certification",
            Facet::Service => "service",
        }
    }
}

impl FromStr for Facet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facet::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| anyhow!("unknown filter: {s}"))
    }
}

/// Numeric attributes that can be bounded by a `[min, max]` range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeFilter {
    Moq,
    Capacity,
    Utilization,
}

impl RangeFilter {
    pub const ALL: [RangeFilter; 3] = [RangeFilter::Moq, RangeFilter::Capacity, RangeFilter::Utilization];

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeFilter::Moq => "moqRange",
            RangeFilter::Capacity => "capacityRange",
            RangeFilter::Utilization => "utilizationRange",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBase {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(flatten)]
    pub base: RecordBase,
    #[serde(default)]
    pub on_time_percent: Option<f64>,
    /// Fraction in `0..=1`, not a percentage.
    #[serde(default)]
    pub defect_rate: Option<f64>,
    #[serde(default)]
    pub avg_lead_time_days: Option<u32>,
    /// 1 (low) to 5 (high).
    #[serde(default)]
    pub risk_index: Option<u8>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub moq: Option<u32>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub last_order_date: Option<String>,
    #[serde(default)]
    pub total_orders: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Factory {
    #[serde(flatten)]
    pub base: RecordBase,
    /// Units per month.
    #[serde(default)]
    pub capacity: Option<u64>,
    #[serde(default)]
    pub utilization: Option<f64>,
    #[serde(default)]
    pub compliance_score: Option<f64>,
    #[serde(default)]
    pub employee_count: Option<u32>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub established_year: Option<u16>,
    #[serde(default)]
    pub moq: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    #[serde(flatten)]
    pub base: RecordBase,
    /// Square feet.
    #[serde(default)]
    pub capacity: Option<u64>,
    #[serde(default)]
    pub utilization: Option<f64>,
    #[serde(default)]
    pub sla_pick_rate: Option<f64>,
    #[serde(default)]
    pub sla_pack_rate: Option<f64>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub inbound_volume: Option<u64>,
    #[serde(default)]
    pub outbound_volume: Option<u64>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreightForwarder {
    #[serde(flatten)]
    pub base: RecordBase,
    /// 0 to 5 stars.
    #[serde(default)]
    pub service_rating: Option<f64>,
    #[serde(default)]
    pub quote_responsiveness: Option<f64>,
    /// Days, may be negative (early arrivals).
    #[serde(default)]
    pub avg_transit_variance: Option<f64>,
    #[serde(default)]
    pub lanes: Vec<String>,
    #[serde(default)]
    pub modes: Vec<String>,
    #[serde(default)]
    pub total_shipments: Option<u64>,
    #[serde(default)]
    pub established_year: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    #[serde(flatten)]
    pub base: RecordBase,
    #[serde(default)]
    pub on_time_percent: Option<f64>,
    /// Fraction in `0..=1`.
    #[serde(default)]
    pub claims_rate: Option<f64>,
    #[serde(default)]
    pub cost_per_mile: Option<f64>,
    #[serde(default)]
    pub service_level: Option<String>,
    #[serde(default)]
    pub fleet_size: Option<u32>,
    #[serde(default)]
    pub lanes: Vec<String>,
    #[serde(default)]
    pub modes: Vec<String>,
    #[serde(default)]
    pub established_year: Option<u16>,
}

/// A searchable entity. JSON records carry their variant in `entityType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entityType", rename_all = "kebab-case")]
pub enum Record {
    Supplier(Supplier),
    Factory(Factory),
    Warehouse(Warehouse),
    FreightForwarder(FreightForwarder),
    Carrier(Carrier),
}

impl Record {
    pub fn base(&self) -> &RecordBase {
        match self {
            Record::Supplier(s) => &s.base,
            Record::Factory(f) => &f.base,
            Record::Warehouse(w) => &w.base,
            Record::FreightForwarder(ff) => &ff.base,
            Record::Carrier(c) => &c.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Record::Supplier(_) => EntityType::Supplier,
            Record::Factory(_) => EntityType::Factory,
            Record::Warehouse(_) => EntityType::Warehouse,
            Record::FreightForwarder(_) => EntityType::FreightForwarder,
            Record::Carrier(_) => EntityType::Carrier,
        }
    }

    /// Values this record contributes to `facet`. Empty when the facet does
    /// not apply to the variant.
    pub fn facet_values(&self, facet: Facet) -> Vec<&str> {
        if facet == Facet::Country {
            return vec![self.base().country.as_str()];
        }
        let values: &[String] = match (self, facet) {
            (Record::FreightForwarder(ff), Facet::Mode) => ff.modes.as_slice(),
            (Record::Carrier(c), Facet::Mode) => c.modes.as_slice(),
            (Record::Supplier(s), Facet::Specialty) => s.specialties.as_slice(),
            (Record::Factory(f), Facet::Specialty) => f.capabilities.as_slice(),
            (Record::Supplier(s), Facet::Certification) => s.certifications.as_slice(),
            (Record::Warehouse(w), Facet::Service) => w.services.as_slice(),
            _ => &[],
        };
        values.iter().map(String::as_str).collect()
    }

    /// Fields matched by the free-text query: name, country and the
    /// variant's tag lists.
    pub fn search_fields(&self) -> Vec<&str> {
        let base = self.base();
        let mut fields = vec![base.name.as_str(), base.country.as_str()];
        let lists: [&[String]; 2] = match self {
            Record::Supplier(s) => [s.specialties.as_slice(), s.certifications.as_slice()],
            Record::Factory(f) => [f.capabilities.as_slice(), &[]],
            Record::Warehouse(w) => [w.services.as_slice(), &[]],
            Record::FreightForwarder(ff) => [ff.lanes.as_slice(), ff.modes.as_slice()],
            Record::Carrier(c) => [c.lanes.as_slice(), c.modes.as_slice()],
        };
        fields.extend(lists.iter().flat_map(|l| l.iter().map(String::as_str)));
        fields
    }

    /// Numeric attribute bounded by `range`, if the variant has it and the
    /// record carries a value.
    pub fn range_value(&self, range: RangeFilter) -> Option<f64> {
        match (self, range) {
            (Record::Supplier(s), RangeFilter::Moq) => s.moq.map(f64::from),
            (Record::Factory(f), RangeFilter::Moq) => f.moq.map(f64::from),
            (Record::Factory(f), RangeFilter::Capacity) => f.capacity.map(|c| c as f64),
            (Record::Warehouse(w), RangeFilter::Capacity) => w.capacity.map(|c| c as f64),
            (Record::Factory(f), RangeFilter::Utilization) => f.utilization,
            (Record::Warehouse(w), RangeFilter::Utilization) => w.utilization,
            _ => None,
        }
    }

    /// Tag list shown as badges on cards.
    pub fn tags(&self) -> &[String] {
        match self {
            Record::Supplier(s) => &s.specialties,
            Record::Factory(f) => &f.capabilities,
            Record::Warehouse(w) => &w.services,
            Record::FreightForwarder(ff) => &ff.modes,
            Record::Carrier(c) => &c.modes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_record() {
        let json = r#"{
            "entityType": "supplier",
            "id": "S1",
            "name": "Acme Textiles",
            "country": "China",
            "region": "Asia",
            "onTimePercent": 96.5,
            "certifications": ["ISO9001"],
            "moq": 500
        }"#;
        let rec: Record = serde_json::from_str(json).unwrap();
        assert_eq!(rec.entity_type(), EntityType::Supplier);
        assert_eq!(rec.id(), "S1");
        assert_eq!(rec.facet_values(Facet::Certification), vec!["ISO9001"]);
        assert_eq!(rec.range_value(RangeFilter::Moq), Some(500.0));
        assert!(rec.facet_values(Facet::Mode).is_empty());
        assert_eq!(rec.base().website, None);
    }

    #[test]
    fn entity_type_round_trips_through_str() {
        for t in EntityType::ALL {
            assert_eq!(t.as_str().parse::<EntityType>().unwrap(), t);
        }
        assert!("truck".parse::<EntityType>().is_err());
    }
}
