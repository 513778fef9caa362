/// Editor Theme Module
/// Dark theme for the fog overlay

use bevy_egui::egui;

/// Editor theme configuration
#[derive(Clone)]
pub struct EditorTheme {
    pub background_color: egui::Color32,
    pub panel_color: egui::Color32,
    pub accent_color: egui::Color32,
    pub text_color: egui::Color32,
    pub border_color: egui::Color32,
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self {
            background_color: egui::Color32::from_rgba_unmultiplied(24, 26, 30, 230),
            panel_color: egui::Color32::from_rgb(40, 43, 48),
            accent_color: egui::Color32::from_rgb(120, 150, 170),
            text_color: egui::Color32::from_rgb(215, 218, 222),
            border_color: egui::Color32::from_rgb(62, 66, 72),
        }
    }
}

impl EditorTheme {
    /// Apply the theme to the EGUI context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();

        visuals.window_fill = self.background_color;
        visuals.panel_fill = self.panel_color;
        visuals.window_stroke.color = self.border_color;

        visuals.widgets.noninteractive.fg_stroke.color = self.text_color;
        visuals.widgets.inactive.bg_fill = self.panel_color;
        visuals.widgets.hovered.bg_stroke.color = self.accent_color;
        visuals.widgets.active.bg_stroke.color = self.accent_color;

        visuals.selection.bg_fill = self.accent_color.linear_multiply(0.3);
        visuals.selection.stroke.color = self.accent_color;

        ctx.set_visuals(visuals);
    }

    pub fn warning_color(&self) -> egui::Color32 {
        egui::Color32::from_rgb(237, 108, 2)
    }

    pub fn error_color(&self) -> egui::Color32 {
        egui::Color32::from_rgb(211, 47, 47)
    }
}
