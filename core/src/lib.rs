pub mod analytics;
pub mod cards;
pub mod catalog;
pub mod drawer;
pub mod fields;
pub mod format;
pub mod model;
pub mod options;
pub mod persist;
pub mod query;
pub mod session;
pub mod state;
pub mod table;
pub mod text;

pub use model::{Carrier, EntityType, Facet, Factory, FreightForwarder, RangeFilter, Record, RecordBase, Supplier, Warehouse};
pub use options::{derive_options, FilterOption, FilterOptions};
pub use query::{compute_view, Bounds, SearchFilters, SortDirection, SortState};
pub use session::Session;
pub use state::{Action, ViewMode, ViewState};
