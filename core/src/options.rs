use crate::model::{Facet, Record};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    /// Records in the base collection carrying this value.
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub country: Vec<FilterOption>,
    pub mode: Vec<FilterOption>,
    pub specialty: Vec<FilterOption>,
    pub certification: Vec<FilterOption>,
    pub service: Vec<FilterOption>,
}

impl FilterOptions {
    pub fn get(&self, facet: Facet) -> &[FilterOption] {
        match facet {
            Facet::Country => &self.country,
            Facet::Mode => &self.mode,
            Facet::Specialty => &self.specialty,
            Facet::Certification => &self.certification,
            Facet::Service => &self.service,
        }
    }

    fn slot(&mut self, facet: Facet) -> &mut Vec<FilterOption> {
        match facet {
            Facet::Country => &mut self.country,
            Facet::Mode => &mut self.mode,
            Facet::Specialty => &mut self.specialty,
            Facet::Certification => &mut self.certification,
            Facet::Service => &mut self.service,
        }
    }
}

/// Distinct values of `facet` in first-encounter order, each with the number
/// of records containing it.
pub fn derive_facet(collection: &[Record], facet: Facet) -> Vec<FilterOption> {
    let mut out: Vec<FilterOption> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for record in collection {
        let mut seen_in_record: HashSet<&str> = HashSet::new();
        for value in record.facet_values(facet) {
            if !seen_in_record.insert(value) {
                continue;
            }
            match index.get(value) {
                Some(&i) => out[i].count += 1,
                None => {
                    index.insert(value, out.len());
                    out.push(FilterOption { value: value.to_string(), label: value.to_string(), count: 1 });
                }
            }
        }
    }
    out
}

pub fn derive_options(collection: &[Record]) -> FilterOptions {
    let mut options = FilterOptions::default();
    for facet in Facet::ALL {
        *options.slot(facet) = derive_facet(collection, facet);
    }
    tracing::debug!(
        records = collection.len(),
        countries = options.country.len(),
        modes = options.mode.len(),
        "derived filter options"
    );
    options
}
