use crate::dashboard::widgets::ACCENT;
use eframe::egui;

/// Surface colours of one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub panel_fill: egui::Color32,
    pub window_fill: egui::Color32,
    pub card_fill: egui::Color32,
    pub text: egui::Color32,
    pub weak_stroke: egui::Color32,
}

impl ColorScheme {
    pub fn light() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0xf9, 0xfa, 0xfb),
            window_fill: egui::Color32::WHITE,
            card_fill: egui::Color32::WHITE,
            text: egui::Color32::from_rgb(0x11, 0x18, 0x27),
            weak_stroke: egui::Color32::from_rgb(0xe5, 0xe7, 0xeb),
        }
    }

    pub fn dark() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0x11, 0x18, 0x27),
            window_fill: egui::Color32::from_rgb(0x1f, 0x29, 0x37),
            card_fill: egui::Color32::from_rgb(0x1f, 0x29, 0x37),
            text: egui::Color32::from_rgb(0xf3, 0xf4, 0xf6),
            weak_stroke: egui::Color32::from_rgb(0x37, 0x41, 0x51),
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

pub fn dashboard_visuals(dark: bool) -> egui::Visuals {
    let scheme = ColorScheme::for_mode(dark);
    let mut visuals = if dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.panel_fill = scheme.panel_fill;
    visuals.window_fill = scheme.window_fill;
    visuals.extreme_bg_color = scheme.card_fill;
    visuals.override_text_color = Some(scheme.text);
    visuals.hyperlink_color = ACCENT;

    visuals.widgets.noninteractive.bg_stroke.color = scheme.weak_stroke;
    visuals.widgets.hovered.bg_stroke.color = ACCENT;
    visuals.widgets.active.bg_stroke.color = ACCENT;

    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.6);
    visuals.selection.stroke.color = ACCENT;
    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_map_to_schemes() {
        let dark = dashboard_visuals(true);
        let light = dashboard_visuals(false);
        assert!(dark.dark_mode);
        assert!(!light.dark_mode);
        assert_eq!(dark.panel_fill, egui::Color32::from_rgb(0x11, 0x18, 0x27));
        assert_eq!(light.panel_fill, egui::Color32::from_rgb(0xf9, 0xfa, 0xfb));
        assert_ne!(dark.extreme_bg_color, light.extreme_bg_color);
    }

    #[test]
    fn accent_is_shared() {
        for dark in [true, false] {
            let visuals = dashboard_visuals(dark);
            assert_eq!(visuals.hyperlink_color, ACCENT);
            assert_eq!(visuals.selection.stroke.color, ACCENT);
        }
    }
}
