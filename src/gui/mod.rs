mod component_selector;
mod notice_modal;
mod preview_modal;
mod theme;

pub use component_selector::{ComponentSelector, SelectorAction};
pub use notice_modal::{Notice, NoticeModal};
pub use preview_modal::{PreviewAction, PreviewModal};
pub use theme::{dashboard_visuals, ColorScheme};

use crate::dashboard::dashboard::{Dashboard, DashboardContext, DashboardEvent};
use crate::dashboard::seed::SeedData;
use crate::dashboard::store::{DashboardStore, StoreEvent, ToggleOutcome};
use crate::dashboard::widgets::WidgetRegistry;
use crate::settings::Settings;
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct DashboardApp {
    store: DashboardStore,
    dashboard: Dashboard,
    seed: &'static SeedData,
    selector: ComponentSelector,
    preview: PreviewModal,
    notice: NoticeModal,
    toasts: Toasts,
    pub enable_toasts: bool,
    pub toast_duration: f64,
    settings_path: String,
    window_size: (f32, f32),
    visuals_dirty: Arc<AtomicBool>,
}

impl DashboardApp {
    pub fn new(store: DashboardStore, settings: &Settings, settings_path: &str) -> Self {
        let visuals_dirty = Arc::new(AtomicBool::new(true));
        let flag = visuals_dirty.clone();
        let store = store.with_listener(Arc::new(move |ev: StoreEvent| match ev {
            StoreEvent::ThemeChanged { .. } => flag.store(true, Ordering::SeqCst),
        }));
        Self {
            store,
            dashboard: Dashboard::new(WidgetRegistry::with_defaults(), settings.grid_metrics()),
            seed: SeedData::bundled(),
            selector: ComponentSelector::default(),
            preview: PreviewModal::default(),
            notice: NoticeModal::default(),
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration_secs(),
            settings_path: settings_path.to_string(),
            window_size: settings.window_size.unwrap_or((1440.0, 900.0)),
            visuals_dirty,
        }
    }

    pub fn store(&self) -> &DashboardStore {
        &self.store
    }

    pub fn notice(&self) -> &NoticeModal {
        &self.notice
    }

    pub fn preview(&self) -> &PreviewModal {
        &self.preview
    }

    pub fn add_toast(&mut self, text: impl Into<String>, kind: ToastKind) {
        if !self.enable_toasts {
            return;
        }
        let text: String = text.into();
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(self.toast_duration),
        });
    }

    /// Put a catalog entry on the dashboard. Entries already on it are left alone.
    pub fn add_widget(&mut self, id: &str) -> Option<ToggleOutcome> {
        if self.store.is_active(id) {
            tracing::debug!(widget = %id, "widget already on the dashboard");
            return None;
        }
        let outcome = self.store.toggle_widget(id);
        match outcome {
            ToggleOutcome::Rejected(rejection) => {
                tracing::info!(widget = %id, ?rejection, "widget not added");
                self.notice.open(Notice::Rejected(rejection));
            }
            ToggleOutcome::UnknownWidget => {
                tracing::warn!(widget = %id, "unknown widget requested");
            }
            ToggleOutcome::Activated | ToggleOutcome::Deactivated => {}
        }
        Some(outcome)
    }

    pub fn save(&mut self) -> bool {
        match self.store.save_snapshot() {
            Ok(()) => {
                self.add_toast("Dashboard saved", ToastKind::Info);
                true
            }
            Err(e) => {
                self.notice.open(Notice::SaveFailed(format!("{e:#}")));
                false
            }
        }
    }

    pub fn handle_selector_action(&mut self, action: SelectorAction) {
        match action {
            SelectorAction::Add(id) => {
                self.add_widget(id);
            }
            SelectorAction::Preview(id) => {
                self.preview.open(id, self.dashboard.registry());
            }
            SelectorAction::Reset => self.store.reset_layout(),
            SelectorAction::Save => {
                self.save();
            }
            SelectorAction::RemoveAll => self.store.remove_all_widgets(),
        }
    }

    pub fn handle_dashboard_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::WidgetDropped(id) => {
                self.add_widget(&id);
            }
            DashboardEvent::LayoutChanged => {
                tracing::debug!("layout changed");
            }
        }
    }

    fn header_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Energy Dashboard");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut editing = self.store.is_edit_mode();
                if ui
                    .toggle_value(&mut editing, "Components")
                    .on_hover_text("Show the component selector and edit the layout")
                    .changed()
                {
                    self.store.set_edit_mode(editing);
                }
                let (icon, hint) = if self.store.is_dark_mode() {
                    ("☀", "Switch to light mode")
                } else {
                    ("🌙", "Switch to dark mode")
                };
                if ui.button(icon).on_hover_text(hint).clicked() {
                    self.store.toggle_dark_mode();
                }
            });
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.visuals_dirty.swap(false, Ordering::SeqCst) {
            ctx.set_visuals(dashboard_visuals(self.store.is_dark_mode()));
        }
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.window_size = (rect.width(), rect.height());
        }

        egui::TopBottomPanel::top("dashboard_header").show(ctx, |ui| {
            ui.add_space(4.0);
            self.header_ui(ui);
            ui.add_space(4.0);
        });

        let mut selector_action = None;
        if self.store.is_edit_mode() {
            egui::TopBottomPanel::top("component_selector").show(ctx, |ui| {
                ui.add_space(4.0);
                selector_action = self.selector.ui(ui, &self.store);
                ui.add_space(4.0);
            });
        }

        let mut grid_event = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    grid_event = self.dashboard.ui(ui, &mut self.store, self.seed);
                });
        });

        if let Some(action) = selector_action {
            self.handle_selector_action(action);
        }
        if let Some(event) = grid_event {
            self.handle_dashboard_event(event);
        }

        let preview_action = {
            let dash = DashboardContext {
                seed: self.seed,
                dark_mode: self.store.is_dark_mode(),
                edit_mode: false,
            };
            let is_active = self
                .preview
                .widget_id()
                .map(|id| self.store.is_active(id))
                .unwrap_or(false);
            self.preview.ui(ctx, &dash, is_active)
        };
        if let Some(PreviewAction::Add(id)) = preview_action {
            self.add_widget(id);
        }

        self.notice.ui(ctx);
        if self.enable_toasts {
            self.toasts.show(ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Ok(mut settings) = Settings::load(&self.settings_path) {
            settings.window_size = Some(self.window_size);
            if let Err(e) = settings.save(&self.settings_path) {
                tracing::warn!(error = %e, "failed to store window size");
            }
        }
    }
}
