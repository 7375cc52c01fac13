use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sla_core::analytics::{AnalyticsEvent, AnalyticsSink, EventKind, TracingSink};
use sla_core::cards::render_cards;
use sla_core::catalog::{load_catalog, Catalog};
use sla_core::drawer::{open_detail, DetailPanel};
use sla_core::persist::{JsonFileStore, MemoryStore, SavedSearch, SavedSearchStore};
use sla_core::session::Rendered;
use sla_core::table::{default_columns, render_page, EmptyState, DEFAULT_PAGE_SIZE};
use sla_core::{
    compute_view, derive_options, Bounds, EntityType, Facet, FilterOptions, RangeFilter, Record, SearchFilters,
    SortDirection, SortState, ViewMode,
};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const MAX_PAGE_SIZE: usize = 100;

type ApiError = (StatusCode, String);

pub struct AppConfig {
    /// Catalog file or directory.
    pub data: PathBuf,
    /// Directory holding `saved_searches.json`; in-memory when unset.
    pub saved_searches: Option<PathBuf>,
    pub default_page_size: usize,
}

impl AppConfig {
    pub fn new(data: impl Into<PathBuf>) -> Self {
        AppConfig { data: data.into(), saved_searches: None, default_page_size: DEFAULT_PAGE_SIZE }
    }
}

/// Base collection of one entity type with its facet options.
pub struct Collection {
    pub records: Vec<Record>,
    pub options: FilterOptions,
}

#[derive(Clone)]
pub struct AppState {
    pub collections: Arc<HashMap<EntityType, Collection>>,
    pub saved: Arc<dyn SavedSearchStore>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub default_page_size: usize,
}

impl AppState {
    pub fn new(catalog: &Catalog, saved: Arc<dyn SavedSearchStore>, analytics: Arc<dyn AnalyticsSink>, default_page_size: usize) -> Self {
        let collections = EntityType::ALL
            .into_iter()
            .map(|t| {
                let records = catalog.records_of(t);
                let options = derive_options(&records);
                (t, Collection { records, options })
            })
            .collect();
        AppState { collections: Arc::new(collections), saved, analytics, default_page_size }
    }

    fn collection(&self, entity_type: EntityType) -> Result<&Collection, ApiError> {
        self.collections
            .get(&entity_type)
            .ok_or_else(|| (StatusCode::NOT_FOUND, format!("no collection for {entity_type}")))
    }
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let catalog = load_catalog(&config.data)?;
    let saved: Arc<dyn SavedSearchStore> = match &config.saved_searches {
        Some(dir) => Arc::new(JsonFileStore::new(dir)),
        None => Arc::new(MemoryStore::new()),
    };
    tracing::info!(records = catalog.len(), counts = ?catalog.counts(), "catalog ready");
    let state = AppState::new(&catalog, saved, Arc::new(TracingSink), config.default_page_size.clamp(1, MAX_PAGE_SIZE));
    Ok(router(state))
}

pub fn router(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/entities/:entity_type/search", get(search_handler))
        .route("/entities/:entity_type/options", get(options_handler))
        .route("/entities/:entity_type/records/:id", get(detail_handler))
        .route("/saved-searches", get(list_saved).post(create_saved))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn parse_entity(raw: &str) -> Result<EntityType, ApiError> {
    raw.parse().map_err(|e: anyhow::Error| (StatusCode::NOT_FOUND, e.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub country: Option<String>,
    pub mode: Option<String>,
    pub specialty: Option<String>,
    pub certification: Option<String>,
    pub service: Option<String>,
    pub moq_min: Option<f64>,
    pub moq_max: Option<f64>,
    pub capacity_min: Option<f64>,
    pub capacity_max: Option<f64>,
    pub utilization_min: Option<f64>,
    pub utilization_max: Option<f64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    pub page_size: Option<usize>,
    #[serde(default)]
    pub view: ViewMode,
}
fn default_page() -> usize { 1 }

fn bounds(min: Option<f64>, max: Option<f64>) -> Option<Bounds> {
    match (min, max) {
        (None, None) => None,
        (min, max) => Some(Bounds(min.unwrap_or(f64::MIN), max.unwrap_or(f64::MAX))),
    }
}

impl SearchParams {
    fn facet_param(&self, facet: Facet) -> Option<&str> {
        let raw = match facet {
            Facet::Country => &self.country,
            Facet::Mode => &self.mode,
            Facet::Specialty => &self.specialty,
            Facet::Certification => &self.certification,
            Facet::Service => &self.service,
        };
        raw.as_deref()
    }

    /// Facet params are comma-separated value lists.
    pub fn filters(&self) -> SearchFilters {
        let mut filters = SearchFilters::default();
        for facet in Facet::ALL {
            if let Some(raw) = self.facet_param(facet) {
                for value in raw.split(',').map(str::trim).filter(|v| !v.is_empty()) {
                    if !filters.selected(facet).iter().any(|v| v == value) {
                        filters.toggle(facet, value);
                    }
                }
            }
        }
        filters.set_range(RangeFilter::Moq, bounds(self.moq_min, self.moq_max));
        filters.set_range(RangeFilter::Capacity, bounds(self.capacity_min, self.capacity_max));
        filters.set_range(RangeFilter::Utilization, bounds(self.utilization_min, self.utilization_max));
        filters
    }

    pub fn sort(&self) -> Result<SortState, ApiError> {
        let direction = match &self.sort_dir {
            Some(raw) => raw.parse::<SortDirection>().map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
            None => SortDirection::Asc,
        };
        Ok(SortState::new(self.sort_by.clone().unwrap_or_else(|| "name".to_string()), direction))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub entity_type: EntityType,
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub filters: SearchFilters,
    pub sort: SortState,
    pub options: FilterOptions,
    pub result: Rendered,
}

pub async fn search_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let entity_type = parse_entity(&entity)?;
    let collection = state.collection(entity_type)?;
    let filters = params.filters();
    let sort = params.sort()?;
    let view = compute_view(&collection.records, &params.q, &filters, &sort);
    let page_size = params.page_size.unwrap_or(state.default_page_size).clamp(1, MAX_PAGE_SIZE);

    let no_records = collection.records.is_empty().then(|| EmptyState::no_records(entity_type));
    let result = match params.view {
        ViewMode::Table => {
            let mut page = render_page(
                entity_type,
                &view,
                params.page,
                page_size,
                &default_columns(entity_type),
                &sort,
                &BTreeSet::new(),
            );
            page.empty = no_records.or(page.empty);
            Rendered::Table(page)
        }
        ViewMode::Cards => {
            let mut page = render_cards(entity_type, &view, params.page, page_size);
            page.empty = no_records.or(page.empty);
            Rendered::Cards(page)
        }
    };
    if !params.q.is_empty() {
        state.analytics.track(AnalyticsEvent::new(
            EventKind::SearchPerformed,
            entity_type,
            json!({ "query": params.q, "resultCount": view.len() }),
        ));
    }

    let total_hits = view.len();
    let elapsed = start.elapsed();
    Ok(Json(SearchResponse {
        entity_type,
        query: params.q,
        took_s: elapsed.as_secs_f64(),
        total_hits,
        filters,
        sort,
        options: collection.options.clone(),
        result,
    }))
}

pub async fn options_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<FilterOptions>, ApiError> {
    let entity_type = parse_entity(&entity)?;
    Ok(Json(state.collection(entity_type)?.options.clone()))
}

pub async fn detail_handler(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Json<DetailPanel>, ApiError> {
    let entity_type = parse_entity(&entity)?;
    let record = state
        .collection(entity_type)?
        .records
        .iter()
        .find(|r| r.id() == id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("{entity_type} {id} not found")))?;
    state
        .analytics
        .track(AnalyticsEvent::new(EventKind::EntityOpened, entity_type, json!({ "id": id })));
    Ok(Json(open_detail(record)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub entity_type: Option<String>,
}

pub async fn list_saved(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SavedSearch>>, ApiError> {
    let wanted = params.entity_type.as_deref().map(parse_entity).transpose()?;
    let all = state.saved.list().map_err(internal)?;
    Ok(Json(all.into_iter().filter(|s| wanted.map_or(true, |t| s.entity_type == t)).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavedSearch {
    pub name: String,
    pub entity_type: EntityType,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filters: SearchFilters,
}

pub async fn create_saved(
    State(state): State<AppState>,
    Json(body): Json<NewSavedSearch>,
) -> Result<(StatusCode, Json<SavedSearch>), ApiError> {
    if body.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name must not be empty".into()));
    }
    let search = SavedSearch::new(body.name, body.entity_type, body.query, body.filters);
    state.saved.save(search.clone()).map_err(internal)?;
    Ok((StatusCode::CREATED, Json(search)))
}

fn internal(err: anyhow::Error) -> ApiError {
    tracing::error!(error = %err, "saved search store failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
