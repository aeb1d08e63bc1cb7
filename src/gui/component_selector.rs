use crate::dashboard::catalog::WidgetDefinition;
use crate::dashboard::dashboard::WidgetDragPayload;
use crate::dashboard::store::DashboardStore;
use crate::dashboard::widgets::{card_frame, ACCENT};
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorAction {
    Add(&'static str),
    Preview(&'static str),
    Reset,
    Save,
    RemoveAll,
}

/// Panel listing the components that are not on the dashboard.
#[derive(Debug, Default)]
pub struct ComponentSelector {
    pub query: String,
}

impl ComponentSelector {
    /// Inactive entries matching the current search text.
    pub fn candidates(&self, store: &DashboardStore) -> Vec<&'static WidgetDefinition> {
        store
            .inactive_widgets()
            .into_iter()
            .filter(|def| def.matches(&self.query))
            .collect()
    }

    pub fn empty_message(&self) -> &'static str {
        if self.query.trim().is_empty() {
            "All components are on the dashboard."
        } else {
            "No matching components."
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, store: &DashboardStore) -> Option<SelectorAction> {
        let mut action = None;
        card_frame(ui).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Components");
                ui.label(
                    egui::RichText::new(format!("{} KPI cards active", store.kpi_count())).weak(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button("Remove all")
                        .on_hover_text("Remove every widget from the dashboard")
                        .clicked()
                    {
                        action = Some(SelectorAction::RemoveAll);
                    }
                    if ui.button("Save").on_hover_text("Save this layout").clicked() {
                        action = Some(SelectorAction::Save);
                    }
                    if ui
                        .button("Reset")
                        .on_hover_text("Restore the default dashboard")
                        .clicked()
                    {
                        action = Some(SelectorAction::Reset);
                    }
                });
            });
            ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .hint_text("Search components")
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(4.0);

            let candidates = self.candidates(store);
            if candidates.is_empty() {
                ui.label(egui::RichText::new(self.empty_message()).italics().weak());
                return;
            }
            ui.horizontal_wrapped(|ui| {
                for def in candidates {
                    if let Some(a) = entry_ui(ui, def) {
                        action = Some(a);
                    }
                }
            });
        });
        action
    }
}

fn entry_ui(ui: &mut egui::Ui, def: &'static WidgetDefinition) -> Option<SelectorAction> {
    let mut action = None;
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::symmetric(6.0, 4.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add(egui::Button::new(egui::RichText::new("⊞").color(ACCENT)).small())
                    .on_hover_text(format!("Add {}", def.title))
                    .clicked()
                {
                    action = Some(SelectorAction::Add(def.id));
                }
                let drag_id = egui::Id::new(("component-drag", def.id));
                let response = ui
                    .dnd_drag_source(drag_id, WidgetDragPayload(def.id), |ui| {
                        ui.label(def.title);
                    })
                    .response;
                response.on_hover_ui(|ui| hover_card(ui, def));
                if ui
                    .add(egui::Button::new("👁").small())
                    .on_hover_text("Preview")
                    .clicked()
                {
                    action = Some(SelectorAction::Preview(def.id));
                }
            });
        });
    action
}

fn hover_card(ui: &mut egui::Ui, def: &WidgetDefinition) {
    ui.set_max_width(260.0);
    ui.label(egui::RichText::new(def.title).strong());
    if let Some(description) = def.description {
        ui.label(description);
    }
    if !def.tags.is_empty() {
        ui.label(egui::RichText::new(def.tags.join(" · ")).small().weak());
    }
}
