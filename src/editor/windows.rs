/// Editor Windows Module
/// Floating fog console window

use bevy_egui::egui;

use super::{ConsoleLine, FogConsoleState};
use super::theme::EditorTheme;
use crate::rendering::fog::command::FogCommand;
use crate::rendering::fog::definition::FogMode;
use crate::rendering::fog::FogFrame;

/// Fog console window. Returns a command when one was entered this frame.
pub fn show_fog_console(
    ctx: &egui::Context,
    console: &mut FogConsoleState,
    frame: &FogFrame,
    theme: &EditorTheme,
) -> Option<FogCommand> {
    let mut is_open = console.open;
    let mut submitted = None;
    egui::Window::new("Fog")
        .open(&mut is_open)
        .default_width(360.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Current");
            let current = &frame.current;
            match frame.active {
                Some(slot) => ui.label(format!("Active fog: {} ({})", slot.label(), slot.index())),
                None => ui.label("Active fog: none"),
            };
            if current.registered {
                let mode = match current.mode {
                    FogMode::Linear => "distance",
                    FogMode::Exponential => "density",
                };
                egui::Grid::new("fog_current").num_columns(2).show(ui, |ui| {
                    ui.label("Mode");
                    ui.label(mode);
                    ui.end_row();
                    ui.label("Start / end");
                    ui.label(format!("{:.1} / {:.1}", current.start, current.end));
                    ui.end_row();
                    ui.label("Density");
                    ui.label(format!("{:.4}", current.density));
                    ui.end_row();
                    ui.label("Color");
                    ui.horizontal(|ui| {
                        color_swatch(ui, [current.color.x, current.color.y, current.color.z]);
                        ui.label(format!("{:.2} {:.2} {:.2}", current.color.x, current.color.y, current.color.z));
                    });
                    ui.end_row();
                    ui.label("Sky / clear");
                    ui.label(format!("{} / {}", current.draw_sky, current.clear_screen));
                    ui.end_row();
                    ui.label("Far clip");
                    ui.label(format!("{:.1}", frame.z_far));
                    ui.end_row();
                });
            } else {
                ui.colored_label(theme.warning_color(), "No fog active");
            }

            ui.separator();
            ui.heading("Global");
            match &frame.global {
                Some(global) => {
                    ui.horizontal(|ui| {
                        color_swatch(ui, global.color.to_array());
                        ui.label(format!(
                            "opaque at {:.1}, scale {:.6}, packed {:08x}",
                            global.depth_for_opaque, global.tc_scale, global.color_int
                        ));
                    });
                    if frame.global_fading {
                        ui.label("fading");
                    }
                }
                None => {
                    ui.label("World has no global fog");
                }
            }

            ui.separator();
            egui::ScrollArea::vertical()
                .max_height(160.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &console.history {
                        match line {
                            ConsoleLine::Echo(text) => {
                                ui.monospace(format!("> {text}"));
                            }
                            ConsoleLine::Error(text) => {
                                ui.colored_label(theme.error_color(), text);
                            }
                        }
                    }
                });

            let response = ui.add(
                egui::TextEdit::singleline(&mut console.input)
                    .hint_text(FogCommand::USAGE[1])
                    .desired_width(f32::INFINITY),
            );
            if response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter)) {
                submitted = console.submit();
                response.request_focus();
            }

            ui.collapsing("Usage", |ui| {
                for usage in FogCommand::USAGE {
                    ui.monospace(usage);
                }
            });
        });
    console.open = is_open;
    submitted
}

fn color_swatch(ui: &mut egui::Ui, rgb: [f32; 3]) {
    let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 2.0, egui::Color32::from_rgb(r, g, b));
}
