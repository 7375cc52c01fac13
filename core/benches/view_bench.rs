use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use sla_core::{compute_view, derive_options, Facet, Record, SearchFilters, SortDirection, SortState};

fn collection(n: usize) -> Vec<Record> {
    let countries = ["China", "Vietnam", "India", "Mexico", "Turkey"];
    (0..n)
        .map(|i| {
            let certifications = if i % 2 == 0 { vec!["ISO9001", "BSCI"] } else { vec!["SA8000"] };
            serde_json::from_value(json!({
                "entityType": "supplier",
                "id": format!("S{i}"),
                "name": format!("Supplier {i}"),
                "country": countries[i % countries.len()],
                "onTimePercent": (i % 40) as f64 + 60.0,
                "certifications": certifications,
                "specialties": ["Apparel", "Footwear"],
                "moq": (i % 20) * 100
            }))
            .expect("valid record")
        })
        .collect()
}

fn bench_view(c: &mut Criterion) {
    let records = collection(500);
    let mut filters = SearchFilters::default();
    filters.toggle(Facet::Country, "China");
    filters.toggle(Facet::Country, "India");
    let sort = SortState::new("onTimePercent", SortDirection::Desc);
    c.bench_function("compute_view_500", |b| b.iter(|| compute_view(&records, "iso", &filters, &sort)));
    c.bench_function("derive_options_500", |b| b.iter(|| derive_options(&records)));
}

criterion_group!(benches, bench_view);
criterion_main!(benches);
