use super::{series_color, DashboardContext, Widget, WidgetAction};
use crate::dashboard::catalog::WidgetDefinition;
use crate::dashboard::seed::{format_percentage, DepartmentTotal};
use eframe::egui;
use egui_plot::{Bar, BarChart, Plot};

pub struct DepartmentChartWidget {
    def: &'static WidgetDefinition,
}

impl DepartmentChartWidget {
    pub fn new(def: &'static WidgetDefinition) -> Self {
        Self { def }
    }

    fn bars(totals: &[DepartmentTotal]) -> Vec<Bar> {
        totals
            .iter()
            .enumerate()
            .map(|(i, total)| {
                Bar::new(i as f64, total.value)
                    .name(&total.name)
                    .width(0.6)
                    .fill(series_color(i))
            })
            .collect()
    }

    fn chart(&self, ui: &mut egui::Ui, totals: &[DepartmentTotal]) {
        let height = (ui.available_height() - 24.0).max(100.0);
        Plot::new((self.def.id, "bars"))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_x(false)
            .include_y(0.0)
            .y_axis_label("kWh")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(Self::bars(totals)).name("Consumption"));
            });
        ui.horizontal_wrapped(|ui| {
            for (i, total) in totals.iter().enumerate() {
                ui.label(
                    egui::RichText::new(format!("■ {}", total.name))
                        .small()
                        .color(series_color(i)),
                )
                .on_hover_text(format!("{} kWh", format_percentage(total.value)));
            }
        });
    }
}

impl Widget for DepartmentChartWidget {
    fn definition(&self) -> &'static WidgetDefinition {
        self.def
    }

    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction> {
        let totals = ctx.seed.department_consumption();
        if totals.is_empty() {
            ui.label("No department data");
            return None;
        }
        self.chart(ui, &totals);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_bar_per_department() {
        let totals = vec![
            DepartmentTotal {
                name: "A".into(),
                value: 10.0,
            },
            DepartmentTotal {
                name: "B".into(),
                value: 2.5,
            },
        ];
        let bars = DepartmentChartWidget::bars(&totals);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].value, 2.5);
        assert_eq!(bars[1].argument, 1.0);
    }
}
