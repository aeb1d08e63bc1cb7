use crate::dashboard::catalog::{RendererKind, WidgetDefinition};
pub use crate::dashboard::dashboard::DashboardContext;
use eframe::egui;
use std::collections::HashMap;
use std::sync::Arc;

mod capacitive_gauge;
mod department_chart;
mod electricity_chart;
mod kpi_card;

pub use capacitive_gauge::{needle_angle, segment_color, CapacitiveGaugeWidget, GAUGE_SEGMENTS};
pub use department_chart::DepartmentChartWidget;
pub use electricity_chart::{ChartMode, ElectricityChartWidget};
pub use kpi_card::{kpi_icon, KpiCardWidget};

/// Brand accent used for values and highlights.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x00, 0xd1, 0xd2);

/// Line colours cycled across chart series.
pub const SERIES_COLORS: [egui::Color32; 14] = [
    egui::Color32::from_rgb(0x88, 0x84, 0xd8),
    egui::Color32::from_rgb(0x82, 0xca, 0x9d),
    egui::Color32::from_rgb(0xff, 0xc6, 0x58),
    egui::Color32::from_rgb(0xff, 0x80, 0x42),
    egui::Color32::from_rgb(0x00, 0x88, 0xfe),
    egui::Color32::from_rgb(0x00, 0xc4, 0x9f),
    egui::Color32::from_rgb(0xff, 0xbb, 0x28),
    egui::Color32::from_rgb(0xff, 0x80, 0x42),
    egui::Color32::from_rgb(0xa4, 0xde, 0x6c),
    egui::Color32::from_rgb(0xd0, 0xed, 0x57),
    egui::Color32::from_rgb(0x8d, 0xd1, 0xe1),
    egui::Color32::from_rgb(0xd8, 0x88, 0x84),
    egui::Color32::from_rgb(0xff, 0xa0, 0x7a),
    egui::Color32::from_rgb(0x93, 0x70, 0xdb),
];

pub fn series_color(index: usize) -> egui::Color32 {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Request raised from inside a widget, applied by the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    Remove(String),
    ToggleMinimize(String),
}

/// Widget trait implemented by all dashboard renderers.
pub trait Widget: Send {
    fn definition(&self) -> &'static WidgetDefinition;

    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction>;

    /// Non-interactive rendering used by the preview modal.
    fn render_preview(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) {
        let _ = self.render(ui, ctx);
    }

    /// Compact body shown while the widget is minimized.
    fn render_minimized(
        &mut self,
        ui: &mut egui::Ui,
        _ctx: &DashboardContext<'_>,
    ) -> Option<WidgetAction> {
        let def = self.definition();
        let mut action = None;
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(def.title).strong());
            if ui
                .small_button("⛶")
                .on_hover_text(format!("Expand {}", def.title))
                .clicked()
            {
                action = Some(WidgetAction::ToggleMinimize(def.id.to_string()));
            }
        });
        action
    }
}

/// Builds a renderer for one catalog entry.
#[derive(Clone)]
pub struct WidgetDescriptor {
    ctor: Arc<dyn Fn(&'static WidgetDefinition) -> Box<dyn Widget> + Send + Sync>,
}

pub type WidgetFactory = WidgetDescriptor;

impl WidgetDescriptor {
    pub fn new<T: Widget + 'static>(build: fn(&'static WidgetDefinition) -> T) -> Self {
        Self {
            ctor: Arc::new(move |def| Box::new(build(def))),
        }
    }

    pub fn create(&self, def: &'static WidgetDefinition) -> Box<dyn Widget> {
        (self.ctor)(def)
    }
}

#[derive(Clone, Default)]
pub struct WidgetRegistry {
    map: HashMap<RendererKind, WidgetDescriptor>,
}

impl WidgetRegistry {
    pub fn with_defaults() -> Self {
        let mut reg = Self::default();
        reg.register(RendererKind::KpiCard, WidgetFactory::new(KpiCardWidget::new));
        reg.register(
            RendererKind::ElectricityChart,
            WidgetFactory::new(ElectricityChartWidget::new),
        );
        reg.register(
            RendererKind::DepartmentChart,
            WidgetFactory::new(DepartmentChartWidget::new),
        );
        reg.register(
            RendererKind::CapacitiveGauge,
            WidgetFactory::new(CapacitiveGaugeWidget::new),
        );
        reg
    }

    pub fn register(&mut self, kind: RendererKind, factory: WidgetFactory) {
        self.map.insert(kind, factory);
    }

    pub fn create(&self, def: &'static WidgetDefinition) -> Option<Box<dyn Widget>> {
        let widget = self.map.get(&def.renderer).map(|f| f.create(def));
        if widget.is_none() {
            tracing::warn!(widget = def.id, renderer = ?def.renderer, "no renderer registered");
        }
        widget
    }
}

/// Frame used by every widget card.
pub(crate) fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(egui::Margin::same(10.0))
}
