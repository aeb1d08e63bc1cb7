use super::{series_color, DashboardContext, Widget, WidgetAction};
use crate::dashboard::catalog::WidgetDefinition;
use crate::dashboard::seed::{moving_average, DatePreset, SeriesPoint, INTERVAL_OPTIONS};
use chrono::Timelike;
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use std::collections::HashSet;

/// Smoothing applied to the plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    Raw,
    MovingAverage5,
    MovingAverage10,
}

impl ChartMode {
    pub const ALL: [ChartMode; 3] = [
        ChartMode::Raw,
        ChartMode::MovingAverage5,
        ChartMode::MovingAverage10,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartMode::Raw => "Raw",
            ChartMode::MovingAverage5 => "MA5",
            ChartMode::MovingAverage10 => "MA10",
        }
    }

    pub fn window(&self) -> Option<usize> {
        match self {
            ChartMode::Raw => None,
            ChartMode::MovingAverage5 => Some(5),
            ChartMode::MovingAverage10 => Some(10),
        }
    }
}

pub struct ElectricityChartWidget {
    def: &'static WidgetDefinition,
    preset: DatePreset,
    interval: u32,
    mode: ChartMode,
    hidden: HashSet<usize>,
}

impl ElectricityChartWidget {
    pub fn new(def: &'static WidgetDefinition) -> Self {
        Self {
            def,
            preset: DatePreset::AllThreeDays,
            interval: INTERVAL_OPTIONS[0],
            mode: ChartMode::Raw,
            hidden: HashSet::new(),
        }
    }

    /// Rows currently plotted, after range, interval and smoothing.
    pub fn rows(&self, ctx: &DashboardContext<'_>) -> Vec<SeriesPoint> {
        let range = match self.preset {
            DatePreset::AllThreeDays => ctx.seed.default_date_range(),
            preset => preset.range(),
        };
        let rows = ctx.seed.series_data(Some(range), self.interval);
        match self.mode.window() {
            Some(window) => moving_average(&rows, window),
            None => rows,
        }
    }

    pub fn toggle_series(&mut self, index: usize) {
        if !self.hidden.remove(&index) {
            self.hidden.insert(index);
        }
    }

    pub fn is_series_visible(&self, index: usize) -> bool {
        !self.hidden.contains(&index)
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            egui::ComboBox::from_id_source((self.def.id, "preset"))
                .selected_text(self.preset.label())
                .show_ui(ui, |ui| {
                    for preset in DatePreset::ALL {
                        ui.selectable_value(&mut self.preset, preset, preset.label());
                    }
                });
            egui::ComboBox::from_id_source((self.def.id, "interval"))
                .selected_text(format!("{} min", self.interval))
                .show_ui(ui, |ui| {
                    for minutes in INTERVAL_OPTIONS {
                        ui.selectable_value(&mut self.interval, minutes, format!("{minutes} min"));
                    }
                });
            for mode in ChartMode::ALL {
                ui.selectable_value(&mut self.mode, mode, mode.label());
            }
        });
    }

    fn series_toggles(&mut self, ui: &mut egui::Ui, names: &[&str]) {
        ui.horizontal_wrapped(|ui| {
            for (index, name) in names.iter().enumerate() {
                let visible = self.is_series_visible(index);
                let color = if visible {
                    series_color(index)
                } else {
                    ui.visuals().weak_text_color()
                };
                let text = egui::RichText::new(format!("● {name}")).color(color);
                let text = if visible { text } else { text.strikethrough() };
                if ui.selectable_label(false, text).clicked() {
                    self.toggle_series(index);
                }
            }
        });
    }

    fn plot(&self, ui: &mut egui::Ui, rows: &[SeriesPoint], names: &[&str], interactive: bool) {
        let height = ui.available_height().max(120.0);
        Plot::new((self.def.id, "plot", interactive))
            .height(height)
            .legend(Legend::default())
            .allow_zoom(interactive)
            .allow_drag(interactive)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("hour")
            .y_axis_label("kWh")
            .show(ui, |plot_ui| {
                for (index, name) in names.iter().enumerate() {
                    if !self.is_series_visible(index) {
                        continue;
                    }
                    let points: Vec<[f64; 2]> = rows
                        .iter()
                        .filter_map(|row| {
                            let value = row.values.get(index).copied().flatten()?;
                            let hour = f64::from(row.timestamp.hour())
                                + f64::from(row.timestamp.minute()) / 60.0;
                            Some([hour, value])
                        })
                        .collect();
                    plot_ui.line(
                        Line::new(PlotPoints::new(points))
                            .name(*name)
                            .color(series_color(index))
                            .width(2.0),
                    );
                }
            });
    }
}

impl Widget for ElectricityChartWidget {
    fn definition(&self) -> &'static WidgetDefinition {
        self.def
    }

    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction> {
        let names = ctx.seed.series_names();
        self.controls(ui);
        self.series_toggles(ui, &names);
        let rows = self.rows(ctx);
        if rows.is_empty() {
            ui.label("No data for the selected range");
            return None;
        }
        self.plot(ui, &rows, &names, true);
        None
    }

    fn render_preview(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) {
        let names = ctx.seed.series_names();
        let rows = self.rows(ctx);
        self.plot(ui, &rows, &names, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::catalog;
    use crate::dashboard::seed::SeedData;

    fn widget() -> ElectricityChartWidget {
        ElectricityChartWidget::new(catalog::find("electricityChart").unwrap())
    }

    fn ctx() -> DashboardContext<'static> {
        DashboardContext {
            seed: SeedData::bundled(),
            dark_mode: false,
            edit_mode: false,
        }
    }

    #[test]
    fn opens_on_full_range_hourly_average() {
        let seed = SeedData::bundled();
        let rows = widget().rows(&ctx());
        assert_eq!(rows, seed.series_data(Some(seed.default_date_range()), 60));
        assert_eq!(rows.len(), 24);
        assert_eq!(rows[0].time, "00:00");
        assert_eq!(rows[0].timestamp.date(), seed.default_date_range().from.date());
    }

    #[test]
    fn single_day_hourly_rows_keep_last_point() {
        let mut chart = widget();
        chart.preset = DatePreset::LastDay;
        let rows = chart.rows(&ctx());
        assert_eq!(rows.len(), 25);
        assert_eq!(rows[24].time, "23:30");
        assert_eq!(rows[0].values.len(), 5);
    }

    #[test]
    fn moving_average_keeps_row_count() {
        let mut chart = widget();
        chart.mode = ChartMode::MovingAverage5;
        let smoothed = chart.rows(&ctx());
        chart.mode = ChartMode::Raw;
        let raw = chart.rows(&ctx());
        assert_eq!(smoothed.len(), raw.len());
        assert_eq!(smoothed[0], raw[0]);
        assert_ne!(smoothed[10], raw[10]);
    }

    #[test]
    fn series_toggle_flips_visibility() {
        let mut chart = widget();
        chart.toggle_series(2);
        assert!(!chart.is_series_visible(2));
        chart.toggle_series(2);
        assert!(chart.is_series_visible(2));
    }
}
