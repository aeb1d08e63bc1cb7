use crate::dashboard::store::ToggleRejection;
use eframe::egui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Rejected(ToggleRejection),
    SaveFailed(String),
}

impl Notice {
    pub fn title(&self) -> String {
        match self {
            Notice::Rejected(r) => r.title().into(),
            Notice::SaveFailed(_) => "Save failed".into(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::Rejected(r) => r.message(),
            Notice::SaveFailed(err) => format!("The dashboard could not be saved: {err}"),
        }
    }
}

/// Blocking message dialog with a single dismiss button.
#[derive(Debug, Clone, Default)]
pub struct NoticeModal {
    current: Option<Notice>,
}

impl NoticeModal {
    pub fn open(&mut self, notice: Notice) {
        tracing::debug!(title = %notice.title(), "notice shown");
        self.current = Some(notice);
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Draw the dialog. Returns `true` on the frame it is dismissed.
    pub fn ui(&mut self, ctx: &egui::Context) -> bool {
        let Some(notice) = &self.current else {
            return false;
        };
        let mut dismissed = false;
        let mut open = true;
        egui::Window::new(notice.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(notice.message());
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if !open || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            dismissed = true;
        }
        if dismissed {
            self.current = None;
        }
        dismissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kpi_limit_notice_mentions_max() {
        let notice = Notice::Rejected(ToggleRejection::KpiLimit { max: 9 });
        assert_eq!(notice.title(), "Maximum limit");
        assert!(notice.message().contains('9'));
    }

    #[test]
    fn open_and_close() {
        let mut modal = NoticeModal::default();
        assert!(!modal.is_open());
        modal.open(Notice::SaveFailed("disk full".into()));
        assert!(modal.current().unwrap().message().contains("disk full"));
        let ctx = egui::Context::default();
        let _ = ctx.run(Default::default(), |ctx| {
            assert!(!modal.ui(ctx));
        });
        assert!(modal.is_open());
    }
}
