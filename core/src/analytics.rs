use crate::model::EntityType;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SearchPerformed,
    FilterApplied,
    SortChanged,
    ViewToggled,
    EntityOpened,
    CompareClicked,
    ExportClicked,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SearchPerformed => "search_performed",
            EventKind::FilterApplied => "filter_applied",
            EventKind::SortChanged => "sort_changed",
            EventKind::ViewToggled => "view_toggled",
            EventKind::EntityOpened => "entity_opened",
            EventKind::CompareClicked => "compare_clicked",
            EventKind::ExportClicked => "export_clicked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub kind: EventKind,
    pub entity_type: EntityType,
    pub detail: Value,
}

impl AnalyticsEvent {
    pub fn new(kind: EventKind, entity_type: EntityType, detail: Value) -> Self {
        AnalyticsEvent { kind, entity_type, detail }
    }
}

/// Receives user-action events. Called synchronously, once per action.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}

/// Emits each event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn track(&self, event: AnalyticsEvent) {
        tracing::info!(
            target: "analytics",
            event = event.kind.as_str(),
            entity_type = %event.entity_type,
            detail = %event.detail,
            "analytics event"
        );
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(|e| e.kind).collect()
    }
}

impl AnalyticsSink for MemorySink {
    fn track(&self, event: AnalyticsEvent) {
        self.events.lock().push(event);
    }
}
