pub mod catalog;
pub mod dashboard;
pub mod layout;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod widgets;

pub use catalog::{WidgetDefinition, WidgetKind, MAX_ACTIVE_KPIS};
pub use dashboard::{Dashboard, DashboardContext, DashboardEvent, GridMetrics};
pub use layout::{Breakpoint, BreakpointLayouts, LayoutItem, Placement};
pub use seed::SeedData;
pub use snapshot::{LocalStorage, Snapshot, STORAGE_KEY};
pub use store::{DashboardState, DashboardStore, ToggleOutcome, ToggleRejection};
pub use widgets::{Widget, WidgetAction, WidgetFactory, WidgetRegistry};
