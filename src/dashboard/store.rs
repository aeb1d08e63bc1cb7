use crate::dashboard::catalog::{self, WidgetDefinition, MAX_ACTIVE_KPIS};
use crate::dashboard::layout::{
    default_layouts, initial_slot, Breakpoint, BreakpointLayouts, LayoutItem, SlotGroup,
    DEFAULT_ACTIVE_WIDGETS,
};
use crate::dashboard::snapshot::{LocalStorage, Snapshot, SnapshotRead, STORAGE_KEY};
use anyhow::Context;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Number of vacated KPI slots remembered for reuse.
pub const KPI_SLOT_CAPACITY: usize = 4;

/// Recently vacated KPI geometry, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSlotBuffer {
    slots: VecDeque<SlotGroup>,
}

impl KpiSlotBuffer {
    pub fn from_vec(slots: Vec<SlotGroup>) -> Self {
        let mut slots: VecDeque<SlotGroup> = slots.into();
        slots.truncate(KPI_SLOT_CAPACITY);
        Self { slots }
    }

    pub fn push_front(&mut self, group: SlotGroup) {
        self.slots.push_front(group);
        self.slots.truncate(KPI_SLOT_CAPACITY);
    }

    pub fn pop_front(&mut self) -> Option<SlotGroup> {
        self.slots.pop_front()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotGroup> {
        self.slots.iter()
    }

    pub fn to_vec(&self) -> Vec<SlotGroup> {
        self.slots.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub active_widgets: Vec<String>,
    pub layouts: BreakpointLayouts,
    pub minimized_widgets: Vec<String>,
    pub is_edit_mode: bool,
    pub is_dark_mode: bool,
    pub removed_kpi_slots: KpiSlotBuffer,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            active_widgets: DEFAULT_ACTIVE_WIDGETS.iter().map(|s| s.to_string()).collect(),
            layouts: default_layouts(),
            minimized_widgets: Vec::new(),
            is_edit_mode: false,
            is_dark_mode: false,
            removed_kpi_slots: KpiSlotBuffer::default(),
        }
    }
}

impl DashboardState {
    pub fn is_active(&self, id: &str) -> bool {
        self.active_widgets.iter().any(|w| w == id)
    }

    pub fn is_minimized(&self, id: &str) -> bool {
        self.minimized_widgets.iter().any(|w| w == id)
    }

    pub fn kpi_count(&self) -> usize {
        self.active_widgets
            .iter()
            .filter(|id| catalog::is_kpi(id))
            .count()
    }

    /// Build a state from a persisted snapshot, field by field, then repair
    /// anything inconsistent. Returns the repairs made.
    pub fn from_snapshot(snapshot: Snapshot) -> (Self, Vec<String>) {
        let defaults = Self::default();
        let layouts = match (snapshot.layouts, snapshot.layout) {
            (Some(layouts), _) => layouts,
            (None, Some(lg)) => {
                let mut layouts = defaults.layouts.clone();
                layouts.set(Breakpoint::Lg, lg);
                layouts
            }
            (None, None) => defaults.layouts.clone(),
        };
        let mut state = Self {
            active_widgets: snapshot.active_widgets.unwrap_or(defaults.active_widgets),
            layouts,
            minimized_widgets: snapshot.minimized_widgets.unwrap_or_default(),
            is_edit_mode: false,
            is_dark_mode: snapshot.is_dark_mode.unwrap_or(false),
            removed_kpi_slots: KpiSlotBuffer::default(),
        };
        let mut warnings = Vec::new();
        if let Some(slots) = snapshot.removed_kpi_slots {
            if slots.len() > KPI_SLOT_CAPACITY {
                warnings.push(format!(
                    "{} recycled KPI slots truncated to {KPI_SLOT_CAPACITY}",
                    slots.len()
                ));
            }
            state.removed_kpi_slots = KpiSlotBuffer::from_vec(slots);
        }
        warnings.extend(state.sanitize());
        (state, warnings)
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            layout: Some(self.layouts.get(Breakpoint::Lg).to_vec()),
            layouts: Some(self.layouts.clone()),
            active_widgets: Some(self.active_widgets.clone()),
            minimized_widgets: Some(self.minimized_widgets.clone()),
            is_dark_mode: Some(self.is_dark_mode),
            removed_kpi_slots: Some(self.removed_kpi_slots.to_vec()),
        }
    }

    /// Drop unknown, duplicate and over-cap widgets, align every breakpoint
    /// with the active set and keep minimized ids a subset of it. A consistent
    /// state is left untouched.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();
        let mut kpis = 0;
        self.active_widgets.retain(|id| {
            let Some(def) = catalog::find(id) else {
                tracing::warn!(widget = %id, "unknown dashboard widget dropped");
                warnings.push(format!("unknown dashboard widget '{id}' dropped"));
                return false;
            };
            if !seen.insert(id.clone()) {
                warnings.push(format!("duplicate dashboard widget '{id}' dropped"));
                return false;
            }
            if def.is_kpi() {
                if kpis >= MAX_ACTIVE_KPIS {
                    tracing::warn!(widget = %id, "KPI over the limit dropped");
                    warnings.push(format!("KPI widget '{id}' exceeds the limit and was dropped"));
                    return false;
                }
                kpis += 1;
            }
            true
        });

        for bp in Breakpoint::ALL {
            let current = self.layouts.get(bp).to_vec();
            let (items, mut notes) = reconcile(bp, current.clone(), &current, &self.active_widgets);
            warnings.append(&mut notes);
            self.layouts.set(bp, items);
        }

        let active = &self.active_widgets;
        let mut seen_minimized = HashSet::new();
        self.minimized_widgets.retain(|id| {
            let keep = active.iter().any(|a| a == id) && seen_minimized.insert(id.clone());
            if !keep {
                warnings.push(format!("minimized widget '{id}' is not active and was dropped"));
            }
            keep
        });

        for w in &warnings {
            tracing::debug!("{w}");
        }
        warnings
    }
}

/// Align one breakpoint's items with `active`: orphans and duplicates are
/// dropped, missing widgets come back from `previous` or get a fresh slot.
fn reconcile(
    bp: Breakpoint,
    items: Vec<LayoutItem>,
    previous: &[LayoutItem],
    active: &[String],
) -> (Vec<LayoutItem>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    let mut out: Vec<LayoutItem> = Vec::with_capacity(active.len());
    for item in items {
        if !active.iter().any(|a| *a == item.id) {
            warnings.push(format!(
                "layout item '{}' in {} has no active widget and was dropped",
                item.id,
                bp.as_str()
            ));
            continue;
        }
        if seen.insert(item.id.clone()) {
            out.push(item);
        }
    }
    for id in active {
        if seen.contains(id) {
            continue;
        }
        let restored = previous.iter().find(|item| item.id == *id).cloned();
        let item = restored.unwrap_or_else(|| {
            warnings.push(format!(
                "widget '{id}' had no layout in {} and was appended",
                bp.as_str()
            ));
            let kind = catalog::find(id)
                .map(|d| d.kind)
                .unwrap_or(catalog::WidgetKind::Kpi);
            initial_slot(id, kind).get(bp).clone()
        });
        seen.insert(id.clone());
        out.push(item);
    }
    (out, warnings)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleRejection {
    KpiLimit { max: usize },
}

impl ToggleRejection {
    pub fn title(&self) -> &'static str {
        match self {
            ToggleRejection::KpiLimit { .. } => "Maximum limit",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ToggleRejection::KpiLimit { max } => format!(
                "You can add at most {max} KPI cards. Remove one before adding a new card."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Activated,
    Deactivated,
    Rejected(ToggleRejection),
    UnknownWidget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Missing,
    Corrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    ThemeChanged { dark: bool },
}

pub type StoreListener = Arc<dyn Fn(StoreEvent) + Send + Sync>;

/// Owner of the dashboard state. Every mutation goes through its methods and
/// leaves the state consistent.
pub struct DashboardStore {
    state: DashboardState,
    storage: LocalStorage,
    listener: Option<StoreListener>,
}

impl DashboardStore {
    /// Store with the compiled-in defaults; storage is not read.
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            state: DashboardState::default(),
            storage,
            listener: None,
        }
    }

    /// Store restored from storage, or defaults when nothing usable is saved.
    pub fn load(storage: LocalStorage) -> Self {
        let mut store = Self::new(storage);
        let outcome = store.restore_snapshot();
        tracing::info!(?outcome, dir = %store.storage.dir().display(), "dashboard state loaded");
        store
    }

    pub fn with_listener(mut self, listener: StoreListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn active_widgets(&self) -> &[String] {
        &self.state.active_widgets
    }

    pub fn layouts(&self) -> &BreakpointLayouts {
        &self.state.layouts
    }

    /// The `lg` sequence.
    pub fn layout(&self) -> &[LayoutItem] {
        self.state.layouts.get(Breakpoint::Lg)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.state.is_active(id)
    }

    pub fn is_minimized(&self, id: &str) -> bool {
        self.state.is_minimized(id)
    }

    pub fn is_edit_mode(&self) -> bool {
        self.state.is_edit_mode
    }

    pub fn is_dark_mode(&self) -> bool {
        self.state.is_dark_mode
    }

    pub fn kpi_count(&self) -> usize {
        self.state.kpi_count()
    }

    pub fn removed_kpi_slots(&self) -> &KpiSlotBuffer {
        &self.state.removed_kpi_slots
    }

    /// Catalog entries not currently on the dashboard, in catalog order.
    pub fn inactive_widgets(&self) -> Vec<&'static WidgetDefinition> {
        catalog::all()
            .iter()
            .filter(|w| !self.state.is_active(w.id))
            .collect()
    }

    pub fn toggle_widget(&mut self, id: &str) -> ToggleOutcome {
        if self.state.is_active(id) {
            self.deactivate(id);
            return ToggleOutcome::Deactivated;
        }

        let Some(def) = catalog::find(id) else {
            tracing::debug!(widget = %id, "toggle ignored for unknown widget");
            return ToggleOutcome::UnknownWidget;
        };

        if def.is_kpi() && self.state.kpi_count() >= MAX_ACTIVE_KPIS {
            tracing::info!(widget = %id, "KPI limit reached");
            return ToggleOutcome::Rejected(ToggleRejection::KpiLimit {
                max: MAX_ACTIVE_KPIS,
            });
        }

        let recycled = if def.is_kpi() {
            self.state.removed_kpi_slots.pop_front()
        } else {
            None
        };
        let group = match recycled {
            Some(group) => group.with_id(id),
            None => initial_slot(id, def.kind),
        };

        self.state.active_widgets.push(id.to_string());
        self.state.layouts.insert_group(group);
        tracing::debug!(widget = %id, "widget activated");
        ToggleOutcome::Activated
    }

    fn deactivate(&mut self, id: &str) {
        self.state.active_widgets.retain(|w| w != id);
        self.state.minimized_widgets.retain(|w| w != id);
        let removed = self.state.layouts.remove_widget(id);
        if catalog::is_kpi(id) {
            if let Some(group) = removed {
                self.state.removed_kpi_slots.push_front(group);
            }
        }
        tracing::debug!(widget = %id, "widget deactivated");
    }

    /// Remove every widget, in display order.
    pub fn remove_all_widgets(&mut self) {
        let ids = self.state.active_widgets.clone();
        for id in ids {
            self.toggle_widget(&id);
        }
    }

    /// Flip the minimized flag of an active widget. Returns the new flag.
    pub fn toggle_minimize(&mut self, id: &str) -> bool {
        if !self.state.is_active(id) {
            return false;
        }
        if self.state.is_minimized(id) {
            self.state.minimized_widgets.retain(|w| w != id);
            false
        } else {
            self.state.minimized_widgets.push(id.to_string());
            true
        }
    }

    pub fn set_edit_mode(&mut self, value: bool) {
        self.state.is_edit_mode = value;
    }

    pub fn toggle_edit_mode(&mut self) {
        self.state.is_edit_mode = !self.state.is_edit_mode;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.state.is_dark_mode = !self.state.is_dark_mode;
        let dark = self.state.is_dark_mode;
        tracing::debug!(dark, "theme toggled");
        if let Some(listener) = &self.listener {
            (listener)(StoreEvent::ThemeChanged { dark });
        }
    }

    /// Replace the `lg` layout.
    pub fn set_layout(&mut self, items: Vec<LayoutItem>) {
        self.replace_breakpoint(Breakpoint::Lg, items);
    }

    /// Replace every breakpoint layout, typically after a drag or resize.
    pub fn set_layouts(&mut self, layouts: BreakpointLayouts) {
        for bp in Breakpoint::ALL {
            self.replace_breakpoint(bp, layouts.get(bp).to_vec());
        }
    }

    fn replace_breakpoint(&mut self, bp: Breakpoint, items: Vec<LayoutItem>) {
        let previous = self.state.layouts.get(bp).to_vec();
        let (items, warnings) = reconcile(bp, items, &previous, &self.state.active_widgets);
        for w in warnings {
            tracing::debug!("{w}");
        }
        self.state.layouts.set(bp, items);
    }

    pub fn reset_layout(&mut self) {
        let defaults = DashboardState::default();
        self.state.active_widgets = defaults.active_widgets;
        self.state.layouts = defaults.layouts;
        self.state.minimized_widgets.clear();
        self.state.removed_kpi_slots.clear();
        tracing::info!("dashboard layout reset");
    }

    pub fn save_snapshot(&self) -> anyhow::Result<()> {
        let path = self.storage.path_for(STORAGE_KEY);
        match self
            .state
            .to_snapshot()
            .write(&self.storage)
            .context("failed to save dashboard layout")
        {
            Ok(()) => {
                tracing::info!(path = %path.display(), "dashboard saved");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "dashboard save failed");
                Err(e)
            }
        }
    }

    /// Reload persisted state. A corrupt snapshot resets to defaults; a
    /// missing one keeps the current state.
    pub fn restore_snapshot(&mut self) -> RestoreOutcome {
        match Snapshot::read(&self.storage) {
            SnapshotRead::Missing => RestoreOutcome::Missing,
            SnapshotRead::Corrupt(e) => {
                tracing::error!(
                    error = %format!("{e:#}"),
                    "dashboard snapshot unreadable, using defaults"
                );
                let edit = self.state.is_edit_mode;
                self.state = DashboardState {
                    is_edit_mode: edit,
                    ..DashboardState::default()
                };
                RestoreOutcome::Corrupt
            }
            SnapshotRead::Found(snapshot) => {
                let (state, warnings) = DashboardState::from_snapshot(snapshot);
                for w in warnings {
                    tracing::warn!("{w}");
                }
                let edit = self.state.is_edit_mode;
                self.state = DashboardState {
                    is_edit_mode: edit,
                    ..state
                };
                RestoreOutcome::Restored
            }
        }
    }
}
