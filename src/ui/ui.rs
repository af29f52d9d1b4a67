use egui_macroquad::egui;
use evo_drive::simulation::episode::Episode;
use evo_drive::simulation::evolution::Population;
use evo_drive::simulation::params::Params;

pub struct UIState {
    pub stats_panel_width: f32,
    /// Simulation steps per rendered frame.
    pub steps_per_frame: usize,
    pub show_radars: bool,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            stats_panel_width: 280.0,
            steps_per_frame: 1,
            show_radars: true,
        }
    }
}

pub fn draw_ui(state: &mut UIState, population: &Population, episode: &Episode, params: &Params) {
    egui_macroquad::ui(|egui_ctx| {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_panel(egui_ctx, state, population, episode, params);
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
