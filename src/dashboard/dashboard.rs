use crate::dashboard::catalog;
use crate::dashboard::layout::{bottom, compact, move_item, resize_item, Breakpoint, LayoutItem};
use crate::dashboard::seed::SeedData;
use crate::dashboard::store::DashboardStore;
use crate::dashboard::widgets::{card_frame, Widget, WidgetAction, WidgetRegistry, ACCENT};
use eframe::egui;
use std::collections::HashMap;

/// Something the grid did that the application may react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DashboardEvent {
    /// A catalog entry dragged from the selector was released over the grid.
    WidgetDropped(String),
    /// A drag or resize was committed to the store.
    LayoutChanged,
}

/// Drag-and-drop payload carried from the component selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetDragPayload(pub &'static str);

/// Context shared with widgets at render time.
pub struct DashboardContext<'a> {
    pub seed: &'a SeedData,
    pub dark_mode: bool,
    pub edit_mode: bool,
}

/// Pixel geometry of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMetrics {
    pub row_height: f32,
    pub margin: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            row_height: 80.0,
            margin: 12.0,
        }
    }
}

impl GridMetrics {
    pub fn col_width(&self, width: f32, cols: u32) -> f32 {
        let cols = cols.max(1) as f32;
        ((width - self.margin * (cols - 1.0)) / cols).max(1.0)
    }

    pub fn item_rect(&self, origin: egui::Pos2, col_width: f32, item: &LayoutItem) -> egui::Rect {
        let y = item.placement.y().unwrap_or(0.0);
        let left = (col_width + self.margin) * item.x() as f32;
        let top = (self.row_height + self.margin) * y;
        let w = item.w as f32;
        let size = egui::vec2(
            col_width * w + self.margin * (w - 1.0).max(0.0),
            self.row_height * item.h + self.margin * (item.h - 1.0).max(0.0),
        );
        egui::Rect::from_min_size(origin + egui::vec2(left, top), size)
    }

    pub fn content_height(&self, rows: f32) -> f32 {
        if rows <= 0.0 {
            return 0.0;
        }
        self.row_height * rows + self.margin * (rows - 1.0).max(0.0)
    }

    /// Grid offset for a pointer movement: whole columns, quarter rows.
    pub fn grid_delta(&self, delta: egui::Vec2, col_width: f32) -> (i64, f32) {
        let dx = (delta.x / (col_width + self.margin)).round() as i64;
        let dy = (delta.y / (self.row_height + self.margin) * 4.0).round() / 4.0;
        (dx, dy)
    }
}

const HEADER_HEIGHT: f32 = 26.0;
const RESIZE_HANDLE: f32 = 14.0;
const MIN_DROP_HEIGHT: f32 = 160.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InteractionKind {
    Move,
    Resize,
}

struct Interaction {
    id: String,
    kind: InteractionKind,
    start: LayoutItem,
    preview: Vec<LayoutItem>,
}

/// Responsive grid of active widgets.
pub struct Dashboard {
    registry: WidgetRegistry,
    runtime: HashMap<String, Box<dyn Widget>>,
    interaction: Option<Interaction>,
    breakpoint: Option<Breakpoint>,
    slot_rects: Vec<(String, egui::Rect)>,
    pub metrics: GridMetrics,
}

impl Dashboard {
    pub fn new(registry: WidgetRegistry, metrics: GridMetrics) -> Self {
        Self {
            registry,
            runtime: HashMap::new(),
            interaction: None,
            breakpoint: None,
            slot_rects: Vec::new(),
            metrics,
        }
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Breakpoint used by the last frame.
    pub fn breakpoint(&self) -> Option<Breakpoint> {
        self.breakpoint
    }

    /// Screen rectangles of the widgets drawn in the last frame.
    pub fn slot_rects(&self) -> &[(String, egui::Rect)] {
        &self.slot_rects
    }

    fn sync_widgets(&mut self, active: &[String]) {
        self.runtime.retain(|id, _| active.contains(id));
        for id in active {
            if self.runtime.contains_key(id) {
                continue;
            }
            let Some(def) = catalog::find(id) else {
                continue;
            };
            if let Some(widget) = self.registry.create(def) {
                self.runtime.insert(id.clone(), widget);
            }
        }
    }

    fn update_preview(&mut self, ui: &egui::Ui, base: &[LayoutItem], cols: u32, col_width: f32) {
        let Some(inter) = self.interaction.as_mut() else {
            return;
        };
        let (origin, pos) = ui.input(|i| (i.pointer.press_origin(), i.pointer.interact_pos()));
        let (Some(origin), Some(pos)) = (origin, pos) else {
            return;
        };
        let (dx, dy) = self.metrics.grid_delta(pos - origin, col_width);
        inter.preview = match inter.kind {
            InteractionKind::Move => {
                let w = inter.start.w.min(cols);
                let x = (inter.start.x() as i64 + dx).clamp(0, i64::from(cols - w)) as u32;
                let y = (inter.start.placement.y().unwrap_or(0.0) + dy).max(0.0);
                move_item(base, cols, &inter.id, x, y)
            }
            InteractionKind::Resize => {
                let w = (inter.start.w as i64 + dx).clamp(1, i64::from(cols)) as u32;
                let h = (inter.start.h + dy).max(0.25);
                resize_item(base, cols, &inter.id, w, h)
            }
        };
    }

    fn begin(&mut self, item: &LayoutItem, kind: InteractionKind, items: &[LayoutItem]) {
        tracing::debug!(widget = %item.id, ?kind, "grid interaction started");
        self.interaction = Some(Interaction {
            id: item.id.clone(),
            kind,
            start: item.clone(),
            preview: items.to_vec(),
        });
    }

    fn commit(&mut self, id: &str, bp: Breakpoint, store: &mut DashboardStore) -> bool {
        let Some(inter) = self.interaction.take() else {
            return false;
        };
        if inter.id != id {
            self.interaction = Some(inter);
            return false;
        }
        let mut layouts = store.layouts().clone();
        layouts.set(bp, inter.preview);
        store.set_layouts(layouts);
        tracing::debug!(widget = %id, breakpoint = bp.as_str(), "grid layout committed");
        true
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        store: &mut DashboardStore,
        seed: &SeedData,
    ) -> Option<DashboardEvent> {
        let mut event = None;
        let width = ui.available_width().max(1.0);
        let bp = Breakpoint::for_width(width);
        if self.breakpoint != Some(bp) {
            tracing::debug!(breakpoint = bp.as_str(), width, "grid breakpoint changed");
            self.breakpoint = Some(bp);
        }
        let cols = bp.cols();

        self.sync_widgets(store.active_widgets());
        if !store.is_edit_mode() {
            self.interaction = None;
        }

        let committed = store.layouts().get(bp).to_vec();
        let compacted = compact(&committed, cols);
        if compacted != committed {
            let mut layouts = store.layouts().clone();
            layouts.set(bp, compacted.clone());
            store.set_layouts(layouts);
        }

        let col_width = self.metrics.col_width(width, cols);
        self.update_preview(ui, &compacted, cols, col_width);
        let items = match &self.interaction {
            Some(inter) => inter.preview.clone(),
            None => compacted,
        };

        let height = self
            .metrics
            .content_height(bottom(&items))
            .max(MIN_DROP_HEIGHT);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
        let drop_zone =
            ui.interact(rect, ui.id().with("dashboard-drop-zone"), egui::Sense::hover());
        let mut child = ui.child_ui(rect, egui::Layout::top_down(egui::Align::LEFT));

        let ctx = DashboardContext {
            seed,
            dark_mode: store.is_dark_mode(),
            edit_mode: store.is_edit_mode(),
        };

        let mut actions = Vec::new();
        self.slot_rects.clear();
        for item in &items {
            let slot_rect = self.metrics.item_rect(rect.min, col_width, item);
            self.slot_rects.push((item.id.clone(), slot_rect));

            if ctx.edit_mode {
                let header = egui::Rect::from_min_size(
                    slot_rect.min,
                    egui::vec2(slot_rect.width(), HEADER_HEIGHT.min(slot_rect.height())),
                );
                let grab = child
                    .interact(header, child.id().with(("grid-move", &item.id)), egui::Sense::drag())
                    .on_hover_cursor(egui::CursorIcon::Grab);
                if grab.drag_started() {
                    self.begin(item, InteractionKind::Move, &items);
                }
                if grab.drag_stopped() && self.commit(&item.id, bp, store) {
                    event = Some(DashboardEvent::LayoutChanged);
                }
            }

            let minimized = store.is_minimized(&item.id);
            if let Some(widget) = self.runtime.get_mut(&item.id) {
                let clip = slot_rect.intersect(child.clip_rect());
                let action = child
                    .allocate_ui_at_rect(slot_rect, |slot_ui| {
                        slot_ui.set_clip_rect(clip);
                        Self::render_slot(widget.as_mut(), slot_ui, slot_rect, &ctx, minimized)
                    })
                    .inner;
                actions.extend(action);
            }

            if ctx.edit_mode {
                let handle = egui::Rect::from_min_max(
                    slot_rect.max - egui::vec2(RESIZE_HANDLE, RESIZE_HANDLE),
                    slot_rect.max,
                );
                let resize = child
                    .interact(
                        handle,
                        child.id().with(("grid-resize", &item.id)),
                        egui::Sense::drag(),
                    )
                    .on_hover_cursor(egui::CursorIcon::ResizeNwSe);
                paint_resize_handle(child.painter(), handle, resize.hovered());
                if resize.drag_started() {
                    self.begin(item, InteractionKind::Resize, &items);
                }
                if resize.drag_stopped() && self.commit(&item.id, bp, store) {
                    event = Some(DashboardEvent::LayoutChanged);
                }
            }
        }

        if let Some(inter) = &self.interaction {
            if let Some(item) = inter.preview.iter().find(|i| i.id == inter.id) {
                let ghost = self.metrics.item_rect(rect.min, col_width, item);
                child.painter().rect_stroke(
                    ghost,
                    egui::Rounding::same(8.0),
                    egui::Stroke::new(2.0, ACCENT),
                );
            }
        }

        for action in actions {
            Self::apply_action(store, action);
        }

        if drop_zone.dnd_hover_payload::<WidgetDragPayload>().is_some() {
            ui.painter().rect_stroke(
                rect.expand(4.0),
                egui::Rounding::same(8.0),
                egui::Stroke::new(2.0, ACCENT.gamma_multiply(0.6)),
            );
        }
        if let Some(payload) = drop_zone.dnd_release_payload::<WidgetDragPayload>() {
            tracing::debug!(widget = payload.0, "widget dropped on grid");
            event = Some(DashboardEvent::WidgetDropped(payload.0.to_string()));
        }

        event
    }

    fn render_slot(
        widget: &mut dyn Widget,
        ui: &mut egui::Ui,
        slot_rect: egui::Rect,
        ctx: &DashboardContext<'_>,
        minimized: bool,
    ) -> Option<WidgetAction> {
        let def = widget.definition();
        let frame = card_frame(ui);
        let chrome = frame.inner_margin.sum() + egui::vec2(2.0, 2.0);
        let body = (slot_rect.size() - chrome).max(egui::Vec2::ZERO);
        frame
            .show(ui, |ui| {
                ui.set_min_size(body);
                ui.set_max_size(body);
                if minimized {
                    return widget.render_minimized(ui, ctx);
                }
                let mut header_action = None;
                ui.horizontal(|ui| {
                    if ui
                        .small_button("🗕")
                        .on_hover_text(format!("Minimize {}", def.title))
                        .clicked()
                    {
                        header_action = Some(WidgetAction::ToggleMinimize(def.id.to_string()));
                    }
                    ui.label(egui::RichText::new(def.title).strong());
                    if ctx.edit_mode {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let remove = egui::Button::new(
                                egui::RichText::new("🗙").color(egui::Color32::WHITE),
                            )
                            .fill(ACCENT)
                            .small();
                            if ui
                                .add(remove)
                                .on_hover_text(format!("Remove {}", def.title))
                                .clicked()
                            {
                                header_action = Some(WidgetAction::Remove(def.id.to_string()));
                            }
                        });
                    }
                });
                let action = widget.render(ui, ctx);
                header_action.or(action)
            })
            .inner
    }

    /// Apply a widget request to the store.
    pub fn apply_action(store: &mut DashboardStore, action: WidgetAction) {
        match action {
            WidgetAction::Remove(id) => {
                if store.is_active(&id) {
                    store.toggle_widget(&id);
                }
            }
            WidgetAction::ToggleMinimize(id) => {
                store.toggle_minimize(&id);
            }
        }
    }
}

fn paint_resize_handle(painter: &egui::Painter, rect: egui::Rect, hovered: bool) {
    let color = if hovered {
        ACCENT
    } else {
        ACCENT.gamma_multiply(0.5)
    };
    let stroke = egui::Stroke::new(1.5, color);
    for step in [0.3, 0.65] {
        let offset = rect.width() * step;
        painter.line_segment(
            [
                egui::pos2(rect.max.x - offset, rect.max.y - 2.0),
                egui::pos2(rect.max.x - 2.0, rect.max.y - offset),
            ],
            stroke,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::layout::Placement;
    use crate::dashboard::snapshot::LocalStorage;

    fn store() -> (tempfile::TempDir, DashboardStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DashboardStore::new(LocalStorage::new(dir.path()));
        (dir, store)
    }

    fn render(dashboard: &mut Dashboard, store: &mut DashboardStore, width: f32) {
        egui::__run_test_ui(|ui| {
            let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(width, 900.0));
            ui.allocate_ui_at_rect(rect, |ui| {
                dashboard.ui(ui, store, SeedData::bundled());
            });
        });
    }

    #[test]
    fn metrics_match_grid_units() {
        let m = GridMetrics::default();
        let col = m.col_width(15.0 * 100.0 + 14.0 * 12.0, 15);
        assert!((col - 100.0).abs() < 1e-3);
        let item = LayoutItem::fixed("a", 3, 1.25, 3, 1.25, 3, 1.0);
        let rect = m.item_rect(egui::Pos2::ZERO, col, &item);
        assert!((rect.min.x - 336.0).abs() < 1e-3);
        assert!((rect.min.y - 115.0).abs() < 1e-3);
        assert!((rect.width() - 324.0).abs() < 1e-3);
        assert!((rect.height() - 103.0).abs() < 1e-3);
        assert_eq!(m.content_height(0.0), 0.0);
        assert_eq!(m.grid_delta(egui::vec2(230.0, 46.0), col), (2, 0.5));
    }

    #[test]
    fn renders_every_active_widget_without_overlap() {
        let (_dir, mut store) = store();
        let mut dashboard = Dashboard::new(WidgetRegistry::with_defaults(), GridMetrics::default());
        render(&mut dashboard, &mut store, 1400.0);
        assert_eq!(dashboard.breakpoint(), Some(Breakpoint::Lg));
        let rects = dashboard.slot_rects();
        assert_eq!(rects.len(), store.active_widgets().len());
        for (i, (a_id, a)) in rects.iter().enumerate() {
            for (b_id, b) in rects.iter().skip(i + 1) {
                let overlap = a.intersect(*b);
                assert!(
                    overlap.width() <= 0.5 || overlap.height() <= 0.5,
                    "{a_id} overlaps {b_id}"
                );
            }
        }
    }

    #[test]
    fn narrow_width_picks_smaller_breakpoint() {
        let (_dir, mut store) = store();
        let mut dashboard = Dashboard::new(WidgetRegistry::with_defaults(), GridMetrics::default());
        render(&mut dashboard, &mut store, 700.0);
        assert_eq!(dashboard.breakpoint(), Some(Breakpoint::Sm));
        render(&mut dashboard, &mut store, 400.0);
        assert_eq!(dashboard.breakpoint(), Some(Breakpoint::Xs));
    }

    #[test]
    fn appended_widget_is_fixed_after_render() {
        let (_dir, mut store) = store();
        store.toggle_widget("capacitiveGauge");
        store.toggle_widget("capacitiveGauge");
        let mut dashboard = Dashboard::new(WidgetRegistry::with_defaults(), GridMetrics::default());
        store.set_edit_mode(true);
        render(&mut dashboard, &mut store, 1400.0);
        let item = store.layouts().find(Breakpoint::Lg, "capacitiveGauge").unwrap();
        assert_eq!(item.placement, Placement::Fixed { x: 6, y: 6.25 });
        let md = store.layouts().find(Breakpoint::Md, "capacitiveGauge").unwrap();
        assert!(md.placement.is_append());
    }

    #[test]
    fn actions_apply_to_store() {
        let (_dir, mut store) = store();
        Dashboard::apply_action(&mut store, WidgetAction::ToggleMinimize("topDebi".into()));
        assert!(store.is_minimized("topDebi"));
        Dashboard::apply_action(&mut store, WidgetAction::Remove("topDebi".into()));
        assert!(!store.is_active("topDebi"));
        Dashboard::apply_action(&mut store, WidgetAction::Remove("topDebi".into()));
        assert!(!store.is_active("topDebi"));
    }

    #[test]
    fn minimized_and_removed_widgets_render() {
        let (_dir, mut store) = store();
        store.toggle_minimize("electricityChart");
        store.toggle_widget("hotWater");
        let mut dashboard = Dashboard::new(WidgetRegistry::with_defaults(), GridMetrics::default());
        render(&mut dashboard, &mut store, 1400.0);
        assert!(dashboard.slot_rects().iter().all(|(id, _)| id != "hotWater"));
        assert_eq!(dashboard.slot_rects().len(), 11);
    }
}
