//! Live parameter panel.
//!
//! Exposes every [`DisplayParams`] field as an editable control. Numeric
//! fields and the design selector take effect on the next spawn with no
//! change notification; color edits are reported back so the frame driver
//! can re-map the gradient of every active burst.

use glam::Vec3;

use crate::params::{self, BurstDesign, DisplayParams};

/// What the panel changed this frame.
pub struct PanelResponse {
    /// Either endpoint color was edited; active bursts need a color remap.
    pub colors_changed: bool,
}

/// Draw the panel window and apply edits to `params`.
pub fn draw(ctx: &egui::Context, params: &mut DisplayParams) -> PanelResponse {
    let mut colors_changed = false;

    egui::Window::new("Fireworks")
        .default_width(240.0)
        .resizable(false)
        .show(ctx, |ui| {
            colors_changed |= color_row(ui, "Inside Color", &mut params.inside_color);
            colors_changed |= color_row(ui, "Outside Color", &mut params.outside_color);

            ui.add_space(4.0);

            ui.add(
                egui::Slider::new(&mut params.particle_size, params::PARTICLE_SIZE_RANGE)
                    .text("Particle Size"),
            );
            ui.add(egui::Slider::new(&mut params.speed, params::SPEED_RANGE).text("Speed"));
            ui.add(
                egui::Slider::new(&mut params.particle_count, params::PARTICLE_COUNT_RANGE)
                    .step_by(params::PARTICLE_COUNT_STEP as f64)
                    .text("Count"),
            );
            ui.add(
                egui::Slider::new(&mut params.randomness, params::RANDOMNESS_RANGE)
                    .text("Randomness"),
            );

            egui::ComboBox::from_label("Firework Design")
                .selected_text(params.design.name())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut params.design, BurstDesign::Explosion, "Explosion");
                    ui.selectable_value(&mut params.design, BurstDesign::Spiral, "Spiral");
                });
        });

    PanelResponse { colors_changed }
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Vec3) -> bool {
    let mut rgb = color.to_array();
    let changed = ui
        .horizontal(|ui| {
            let response = ui.color_edit_button_rgb(&mut rgb);
            ui.label(label);
            response.changed()
        })
        .inner;
    if changed {
        *color = Vec3::from_array(rgb);
    }
    changed
}
