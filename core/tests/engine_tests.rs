use serde_json::json;
use sla_core::options::derive_options;
use sla_core::query::{compute_view, Bounds, SearchFilters, SortDirection, SortState};
use sla_core::{Facet, RangeFilter, Record};

fn rec(v: serde_json::Value) -> Record {
    serde_json::from_value(v).unwrap()
}

fn ids<'a>(view: &[&'a Record]) -> Vec<&'a str> {
    view.iter().map(|&r| r.id()).collect()
}

/// S1/S2/S3 fixture; names sort in id order.
fn three_suppliers() -> Vec<Record> {
    vec![
        rec(json!({"entityType": "supplier", "id": "S1", "name": "Alpha Textiles", "country": "China",
                   "certifications": ["ISO9001"], "onTimePercent": 91.0, "moq": 500})),
        rec(json!({"entityType": "supplier", "id": "S2", "name": "Bravo Garments", "country": "Vietnam",
                   "certifications": ["ISO9001", "BSCI"], "onTimePercent": 97.5, "moq": 1200})),
        rec(json!({"entityType": "supplier", "id": "S3", "name": "Charlie Knits", "country": "China",
                   "certifications": []})),
    ]
}

#[test]
fn country_then_certification_narrows() {
    let records = three_suppliers();
    let mut filters = SearchFilters::default();
    filters.toggle(Facet::Country, "China");
    let view = compute_view(&records, "", &filters, &SortState::default());
    assert_eq!(ids(&view), vec!["S1", "S3"]);

    filters.toggle(Facet::Certification, "ISO9001");
    let view = compute_view(&records, "", &filters, &SortState::default());
    assert_eq!(ids(&view), vec!["S1"]);
}

#[test]
fn derived_country_counts() {
    let options = derive_options(&three_suppliers());
    let china = options.country.iter().find(|o| o.value == "China").unwrap();
    let vietnam = options.country.iter().find(|o| o.value == "Vietnam").unwrap();
    assert_eq!(china.count, 2);
    assert_eq!(vietnam.count, 1);
    // first-encounter order, not alphabetical
    let certs: Vec<(&str, usize)> = options.certification.iter().map(|o| (o.value.as_str(), o.count)).collect();
    assert_eq!(certs, vec![("ISO9001", 2), ("BSCI", 1)]);
    assert!(options.mode.is_empty());
}

#[test]
fn query_matches_certification_substrings() {
    let records = three_suppliers();
    let view = compute_view(&records, "iso", &SearchFilters::default(), &SortState::default());
    assert_eq!(ids(&view), vec!["S1", "S2"]);
}

#[test]
fn query_matches_name_and_country_case_insensitively() {
    let records = three_suppliers();
    let view = compute_view(&records, "VIET", &SearchFilters::default(), &SortState::default());
    assert_eq!(ids(&view), vec!["S2"]);
    let view = compute_view(&records, "knits", &SearchFilters::default(), &SortState::default());
    assert_eq!(ids(&view), vec!["S3"]);
}

#[test]
fn missing_sort_attribute_goes_last_both_ways() {
    let records = three_suppliers();
    let desc = compute_view(&records, "", &SearchFilters::default(), &SortState::new("onTimePercent", SortDirection::Desc));
    assert_eq!(ids(&desc), vec!["S2", "S1", "S3"]);
    let asc = compute_view(&records, "", &SearchFilters::default(), &SortState::new("onTimePercent", SortDirection::Asc));
    assert_eq!(ids(&asc), vec!["S1", "S2", "S3"]);
}

#[test]
fn record_without_region_sorts_after_regions() {
    let records = vec![
        rec(json!({"entityType": "warehouse", "id": "A", "name": "Depot A", "country": "USA"})),
        rec(json!({"entityType": "warehouse", "id": "B", "name": "Depot B", "country": "USA", "region": "West"})),
        rec(json!({"entityType": "warehouse", "id": "C", "name": "Depot C", "country": "USA", "region": "East"})),
    ];
    let asc = compute_view(&records, "", &SearchFilters::default(), &SortState::new("region", SortDirection::Asc));
    assert_eq!(ids(&asc), vec!["C", "B", "A"]);
    let desc = compute_view(&records, "", &SearchFilters::default(), &SortState::new("region", SortDirection::Desc));
    assert_eq!(ids(&desc), vec!["B", "C", "A"]);
    assert_eq!(records[0].field("region"), None);
}

#[test]
fn unknown_sort_key_keeps_input_order() {
    let mut records = three_suppliers();
    records.reverse();
    for dir in [SortDirection::Asc, SortDirection::Desc] {
        let view = compute_view(&records, "", &SearchFilters::default(), &SortState::new("noSuchColumn", dir));
        assert_eq!(ids(&view), vec!["S3", "S2", "S1"]);
    }
}

#[test]
fn equal_keys_keep_input_order() {
    let records: Vec<Record> = ["A", "B", "C", "D"]
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let country = if i % 2 == 0 { "USA" } else { "Canada" };
            rec(json!({"entityType": "carrier", "id": id, "name": format!("Carrier {id}"), "country": country}))
        })
        .collect();
    let asc = compute_view(&records, "", &SearchFilters::default(), &SortState::new("country", SortDirection::Asc));
    assert_eq!(ids(&asc), vec!["B", "D", "A", "C"]);
    let desc = compute_view(&records, "", &SearchFilters::default(), &SortState::new("country", SortDirection::Desc));
    assert_eq!(ids(&desc), vec!["A", "C", "B", "D"]);
}

#[test]
fn text_sort_ignores_case() {
    let records = vec![
        rec(json!({"entityType": "factory", "id": "F1", "name": "zeta Works", "country": "India"})),
        rec(json!({"entityType": "factory", "id": "F2", "name": "Alpha Plant", "country": "India"})),
        rec(json!({"entityType": "factory", "id": "F3", "name": "beta Mill", "country": "India"})),
    ];
    let view = compute_view(&records, "", &SearchFilters::default(), &SortState::default());
    assert_eq!(ids(&view), vec!["F2", "F3", "F1"]);
}

#[test]
fn facet_values_or_within_and_across() {
    let records = vec![
        rec(json!({"entityType": "carrier", "id": "C1", "name": "One", "country": "USA", "modes": ["FTL"]})),
        rec(json!({"entityType": "carrier", "id": "C2", "name": "Two", "country": "Mexico", "modes": ["LTL"]})),
        rec(json!({"entityType": "carrier", "id": "C3", "name": "Three", "country": "USA", "modes": ["Intermodal", "LTL"]})),
    ];
    let mut filters = SearchFilters::default();
    filters.toggle(Facet::Mode, "FTL");
    filters.toggle(Facet::Mode, "LTL");
    let sort = SortState::new("id", SortDirection::Asc);
    assert_eq!(ids(&compute_view(&records, "", &filters, &sort)), vec!["C1", "C2", "C3"]);

    filters.toggle(Facet::Country, "USA");
    assert_eq!(ids(&compute_view(&records, "", &filters, &sort)), vec!["C1", "C3"]);

    filters.toggle(Facet::Mode, "FTL");
    assert_eq!(ids(&compute_view(&records, "", &filters, &sort)), vec!["C3"]);
}

#[test]
fn carrier_query_searches_lanes() {
    let records = vec![
        rec(json!({"entityType": "carrier", "id": "C1", "name": "One", "country": "USA", "lanes": ["LAX-CHI"]})),
        rec(json!({"entityType": "carrier", "id": "C2", "name": "Two", "country": "USA", "lanes": ["NYC-ATL"]})),
    ];
    let view = compute_view(&records, "chi", &SearchFilters::default(), &SortState::default());
    assert_eq!(ids(&view), vec!["C1"]);
}

#[test]
fn ranges_are_inclusive_and_require_the_attribute() {
    let records = three_suppliers();
    let mut filters = SearchFilters::default();
    filters.set_range(RangeFilter::Moq, Some(Bounds(500.0, 1200.0)));
    let view = compute_view(&records, "", &filters, &SortState::default());
    assert_eq!(ids(&view), vec!["S1", "S2"]);

    filters.set_range(RangeFilter::Moq, Some(Bounds(501.0, 1199.0)));
    assert!(compute_view(&records, "", &filters, &SortState::default()).is_empty());
}

#[test]
fn identical_inputs_give_identical_views() {
    let records = three_suppliers();
    let mut filters = SearchFilters::default();
    filters.toggle(Facet::Certification, "ISO9001");
    let sort = SortState::new("moq", SortDirection::Desc);
    let first = ids(&compute_view(&records, "a", &filters, &sort));
    let second = ids(&compute_view(&records, "a", &filters, &sort));
    assert_eq!(first, second);
}

#[test]
fn option_counts_ignore_active_filters() {
    let records = three_suppliers();
    let mut filters = SearchFilters::default();
    filters.toggle(Facet::Country, "Vietnam");
    let narrowed = compute_view(&records, "", &filters, &SortState::default());
    assert_eq!(narrowed.len(), 1);
    // options are derived from the base collection
    let options = derive_options(&records);
    assert_eq!(options.country.iter().map(|o| o.count).sum::<usize>(), 3);
}
