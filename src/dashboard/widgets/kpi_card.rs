use super::{DashboardContext, Widget, WidgetAction, ACCENT};
use crate::dashboard::catalog::WidgetDefinition;
use crate::dashboard::seed::{KpiDisplay, Trend};
use eframe::egui;

const TREND_DOWN: egui::Color32 = egui::Color32::from_rgb(0x16, 0xa3, 0x4a);
const TREND_UP: egui::Color32 = egui::Color32::from_rgb(0xdc, 0x26, 0x26);

/// Icon glyph shown on a KPI card.
pub fn kpi_icon(id: &str) -> &'static str {
    match id {
        "totalConsumption" => "🔌",
        "topDebi" => "⛽",
        "carbonFootprint" => "👣",
        "naturalGas" => "🔥",
        "steamConsumption" => "🌊",
        "hotWater" => "♨",
        "waterConsumption" => "💧",
        _ => "⚡",
    }
}

/// Single value card. Falls back to a placeholder when the seed has no entry.
pub struct KpiCardWidget {
    def: &'static WidgetDefinition,
}

impl KpiCardWidget {
    pub fn new(def: &'static WidgetDefinition) -> Self {
        Self { def }
    }

    fn body(&self, ui: &mut egui::Ui, display: Option<&KpiDisplay>) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                let Some(kpi) = display else {
                    ui.label(egui::RichText::new("No data").italics().weak());
                    return;
                };
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&kpi.value).size(20.0).strong().color(ACCENT));
                    ui.label(egui::RichText::new(&kpi.unit).small().color(ACCENT));
                    let (arrow, color) = match kpi.trend {
                        Trend::Down => ("⏷", TREND_DOWN),
                        Trend::Up => ("⏶", TREND_UP),
                    };
                    ui.label(
                        egui::RichText::new(format!("{arrow} {}", kpi.change))
                            .small()
                            .color(color),
                    );
                });
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(kpi_icon(self.def.id)).size(18.0));
            });
        });
    }
}

impl Widget for KpiCardWidget {
    fn definition(&self) -> &'static WidgetDefinition {
        self.def
    }

    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction> {
        let display = ctx.seed.kpi_by_id(self.def.id).map(KpiDisplay::from_kpi);
        self.body(ui, display.as_ref());
        None
    }
}
