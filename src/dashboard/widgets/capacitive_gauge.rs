use super::{DashboardContext, Widget, WidgetAction};
use crate::dashboard::catalog::WidgetDefinition;
use crate::dashboard::seed::GaugeReading;
use eframe::egui;
use std::f32::consts::PI;

/// Ten equal arc segments, green to red.
pub const GAUGE_SEGMENTS: [egui::Color32; 10] = [
    egui::Color32::from_rgb(0x22, 0xc5, 0x5e),
    egui::Color32::from_rgb(0x65, 0xa3, 0x0d),
    egui::Color32::from_rgb(0x84, 0xcc, 0x16),
    egui::Color32::from_rgb(0xa3, 0xe6, 0x35),
    egui::Color32::from_rgb(0xfa, 0xcc, 0x15),
    egui::Color32::from_rgb(0xfb, 0xbf, 0x24),
    egui::Color32::from_rgb(0xfb, 0x92, 0x3c),
    egui::Color32::from_rgb(0xf9, 0x73, 0x16),
    egui::Color32::from_rgb(0xef, 0x44, 0x44),
    egui::Color32::from_rgb(0xdc, 0x26, 0x26),
];

const NEEDLE: egui::Color32 = egui::Color32::from_rgb(0x22, 0xc5, 0x5e);

/// Colour of the segment `percent` falls into.
pub fn segment_color(percent: f32) -> egui::Color32 {
    let idx = (percent.clamp(0.0, 99.999) / 10.0) as usize;
    GAUGE_SEGMENTS[idx.min(GAUGE_SEGMENTS.len() - 1)]
}

/// Needle angle in radians: `PI` (left) at 0 %, `2 PI` (right) at 100 %.
/// Screen y grows downward, so angles in `[PI, 2 PI]` draw the upper half.
pub fn needle_angle(percent: f32) -> f32 {
    PI + percent.clamp(0.0, 100.0) / 100.0 * PI
}

fn polar(center: egui::Pos2, radius: f32, angle: f32) -> egui::Pos2 {
    center + egui::vec2(radius * angle.cos(), radius * angle.sin())
}

fn percent_of(reading: &GaugeReading) -> f32 {
    if reading.max <= 0.0 {
        return 0.0;
    }
    (reading.current / reading.max * 100.0) as f32
}

pub struct CapacitiveGaugeWidget {
    def: &'static WidgetDefinition,
}

impl CapacitiveGaugeWidget {
    pub fn new(def: &'static WidgetDefinition) -> Self {
        Self { def }
    }

    fn paint(&self, ui: &mut egui::Ui, reading: &GaugeReading) {
        let size = ui.available_size();
        let side = size.x.min(size.y * 1.6).max(120.0);
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(side, side * 0.62), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let visuals = ui.visuals();

        let outer = side * 0.38;
        let inner = outer * 0.78;
        let thickness = outer - inner;
        let mid = (outer + inner) / 2.0;
        let center = egui::pos2(rect.center().x, rect.top() + outer + side * 0.08);

        let step = PI / GAUGE_SEGMENTS.len() as f32;
        for (i, color) in GAUGE_SEGMENTS.iter().enumerate() {
            let start = PI + i as f32 * step;
            let points: Vec<egui::Pos2> = (0..=8)
                .map(|k| polar(center, mid, start + step * k as f32 / 8.0))
                .collect();
            painter.add(egui::Shape::line(points, egui::Stroke::new(thickness, *color)));
        }

        let label_font = egui::FontId::proportional(10.0);
        for tick in (0..=100).step_by(20) {
            let pos = polar(center, outer + 12.0, needle_angle(tick as f32));
            painter.text(
                pos,
                egui::Align2::CENTER_CENTER,
                format!("{tick}%"),
                label_font.clone(),
                visuals.weak_text_color(),
            );
        }

        let percent = percent_of(reading);
        let tip = polar(center, inner * 0.86, needle_angle(percent));
        painter.line_segment([center, tip], egui::Stroke::new(4.0, NEEDLE));
        painter.circle_filled(center, 7.0, NEEDLE);

        painter.text(
            center + egui::vec2(0.0, side * 0.1),
            egui::Align2::CENTER_CENTER,
            format!("{}{}", reading.current, reading.unit),
            egui::FontId::proportional(22.0),
            visuals.strong_text_color(),
        );

        response.on_hover_text(format!(
            "Capacitive usage: {}{} of {}{}",
            reading.current, reading.unit, reading.max, reading.unit
        ));
    }
}

impl Widget for CapacitiveGaugeWidget {
    fn definition(&self) -> &'static WidgetDefinition {
        self.def
    }

    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction> {
        let reading = ctx.seed.capacitive_gauge();
        ui.vertical_centered(|ui| {
            self.paint(ui, reading);
            ui.label(
                egui::RichText::new("Capacitive")
                    .color(segment_color(percent_of(reading)))
                    .strong(),
            );
        });
        None
    }
}
