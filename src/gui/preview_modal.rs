use crate::dashboard::catalog;
use crate::dashboard::dashboard::DashboardContext;
use crate::dashboard::widgets::{card_frame, Widget, WidgetRegistry};
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    Add(&'static str),
    Close,
}

/// Modal rendering a catalog entry before it is added.
#[derive(Default)]
pub struct PreviewModal {
    widget: Option<Box<dyn Widget>>,
}

impl PreviewModal {
    /// Open the preview for `id`. Returns `false` for ids without a renderer.
    pub fn open(&mut self, id: &str, registry: &WidgetRegistry) -> bool {
        let Some(def) = catalog::find(id) else {
            tracing::warn!(widget = %id, "preview requested for unknown widget");
            return false;
        };
        self.widget = registry.create(def);
        self.widget.is_some()
    }

    pub fn close(&mut self) {
        self.widget = None;
    }

    pub fn is_open(&self) -> bool {
        self.widget.is_some()
    }

    pub fn widget_id(&self) -> Option<&'static str> {
        self.widget.as_ref().map(|w| w.definition().id)
    }

    pub fn ui(
        &mut self,
        ctx: &egui::Context,
        dash: &DashboardContext<'_>,
        is_active: bool,
    ) -> Option<PreviewAction> {
        let widget = self.widget.as_mut()?;
        let def = widget.definition();
        let mut action = None;
        let mut open = true;
        egui::Window::new(def.title)
            .id(egui::Id::new("widget-preview"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(520.0)
            .open(&mut open)
            .show(ctx, |ui| {
                if let Some(description) = def.description {
                    ui.label(egui::RichText::new(description).weak());
                    ui.add_space(6.0);
                }
                card_frame(ui).show(ui, |ui| {
                    ui.set_min_size(egui::vec2(480.0, if def.is_kpi() { 80.0 } else { 280.0 }));
                    widget.render_preview(ui, dash);
                });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if !is_active && ui.button("Add to dashboard").clicked() {
                        action = Some(PreviewAction::Add(def.id));
                    }
                    if ui.button("Close").clicked() {
                        action = Some(PreviewAction::Close);
                    }
                });
            });
        if !open {
            action = Some(PreviewAction::Close);
        }
        if action.is_some() {
            self.close();
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::seed::SeedData;

    #[test]
    fn opens_known_widgets_only() {
        let registry = WidgetRegistry::with_defaults();
        let mut modal = PreviewModal::default();
        assert!(!modal.open("nope", &registry));
        assert!(!modal.is_open());
        assert!(modal.open("departmentConsumption", &registry));
        assert_eq!(modal.widget_id(), Some("departmentConsumption"));
        modal.close();
        assert!(!modal.is_open());
    }

    #[test]
    fn renders_inside_a_window() {
        let registry = WidgetRegistry::with_defaults();
        let mut modal = PreviewModal::default();
        assert!(modal.open("capacitiveGauge", &registry));
        let dash = DashboardContext {
            seed: SeedData::bundled(),
            dark_mode: false,
            edit_mode: false,
        };
        let ctx = egui::Context::default();
        let _ = ctx.run(Default::default(), |ctx| {
            assert!(modal.ui(ctx, &dash, false).is_none());
        });
        assert!(modal.is_open());
    }
}
