use egui_macroquad::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use evo_drive::simulation::episode::{Episode, EpisodeOutcome};
use evo_drive::simulation::evolution::Population;
use evo_drive::simulation::params::Params;

use super::ui::UIState;

const BEST_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 255, 100);
const MEAN_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);

pub(super) fn draw_stats_panel(
    egui_ctx: &egui::Context,
    state: &mut UIState,
    population: &Population,
    episode: &Episode,
    params: &Params,
) {
    egui::SidePanel::right("stats_panel")
        .default_width(state.stats_panel_width)
        .resizable(true)
        .show(egui_ctx, |ui| {
            ui.heading("Evolution Stats");
            ui.separator();

            ui.label(format!("Generation: {}", population.generation()));
            ui.label(format!(
                "Still alive: {} / {}",
                episode.alive_count(),
                episode.cars().len()
            ));

            let progress = episode.steps() as f32 / params.max_steps as f32;
            ui.add(
                egui::ProgressBar::new(progress)
                    .text(format!("Step {} / {}", episode.steps(), params.max_steps)),
            );

            ui.separator();

            ui.label("Simulation Speed");
            ui.add(egui::Slider::new(&mut state.steps_per_frame, 1..=20).text("steps/frame"));
            ui.checkbox(&mut state.show_radars, "Show radars");

            ui.separator();

            if let Some(last) = population.statistics().last() {
                ui.heading("Previous Generation");
                ui.label(format!("Best fitness: {:.1}", last.best));
                ui.label(format!("Mean fitness: {:.1} (sd {:.1})", last.mean, last.stdev));
                let outcome = match last.outcome {
                    EpisodeOutcome::AllCrashed => "all crashed",
                    EpisodeOutcome::TimeUp => "time up",
                };
                ui.label(format!("Ended after {} steps ({})", last.steps, outcome));
            }

            if let Some(best) = population.best_genome() {
                ui.label(format!("Best ever: {:.1} (genome {})", best.fitness, best.id));
            }
            if population.stagnation() > 0 {
                ui.label(format!("Stagnant for {} generations", population.stagnation()));
            }

            ui.separator();

            ui.heading("Fitness Per Generation");
            draw_fitness_plot(ui, population);
        });
}

fn draw_fitness_plot(ui: &mut egui::Ui, population: &Population) {
    let stats = population.statistics();
    if stats.history().is_empty() {
        ui.label("Collecting data...");
        return;
    }

    let best: PlotPoints = stats
        .best_fitness_history()
        .into_iter()
        .map(|(x, y)| [x, y])
        .collect();
    let mean: PlotPoints = stats
        .mean_fitness_history()
        .into_iter()
        .map(|(x, y)| [x, y])
        .collect();

    Plot::new("fitness_plot")
        .height(200.0)
        .show_axes([true, true])
        .legend(Legend::default())
        .label_formatter(|name, value| {
            format!("{}: Generation {:.0}, Fitness {:.1}", name, value.x, value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(best).color(BEST_COLOR).name("Best"));
            plot_ui.line(Line::new(mean).color(MEAN_COLOR).name("Mean"));
        });
}
