use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use evo_drive::assets;
use evo_drive::simulation::episode::Episode;
use evo_drive::simulation::evolution::Population;
use evo_drive::simulation::params::Config;
use log::{error, info, warn};
use macroquad::prelude::*;

mod graphics;
mod ui;

#[derive(Parser)]
#[command(name = "evo_drive")]
#[command(about = "Cars learning to drive around a track through neuroevolution")]
struct Cli {
    /// JSON file with simulation and evolution parameters
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Track bitmap; boundary pixels use the configured border colour
    #[arg(long, default_value = "map.png")]
    track: PathBuf,

    /// Car sprite
    #[arg(long, default_value = "car.png")]
    sprite: PathBuf,

    /// Number of generations to evolve
    #[arg(long, default_value = "1000")]
    generations: u32,

    /// Train without opening a window
    #[arg(long)]
    headless: bool,

    /// Open the window in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    if cli.headless {
        return run_headless(&cli, &config);
    }

    let conf = Conf {
        window_title: "Evo Drive".to_owned(),
        window_width: config.simulation.screen_width as i32,
        window_height: config.simulation.screen_height as i32,
        fullscreen: cli.fullscreen,
        ..Default::default()
    };

    macroquad::Window::from_config(conf, async move {
        if let Err(e) = run_windowed(cli, config).await {
            error!("{e:#}");
            std::process::exit(1);
        }
    });
    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let config = Config::load(path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    } else {
        warn!("Config file {} not found, using defaults", path.display());
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }
}

/// Evolve without rendering, one full episode per generation.
fn run_headless(cli: &Cli, config: &Config) -> Result<()> {
    info!("Running in headless mode for {} generations", cli.generations);

    let params = &config.simulation;
    let track = assets::load_track(&cli.track, params.border_color)?;
    let mut population = Population::new(&config.evolution);

    population.run(cli.generations, |genomes| {
        Episode::new(genomes, params).run_to_end(genomes, &track, params)
    });
    Ok(())
}

async fn run_windowed(cli: Cli, config: Config) -> Result<()> {
    let params = config.simulation;

    let track_image = assets::load_image(&cli.track)?;
    let track = assets::track_from_image(&track_image, params.border_color);
    let track_texture = Texture2D::from_image(&track_image);
    let sprite = Texture2D::from_image(&assets::load_image(&cli.sprite)?);

    let mut population = Population::new(&config.evolution);
    let mut ui_state = ui::UIState::new();

    while population.generation() <= cli.generations && !population.is_solved() {
        population.begin_generation();
        let mut episode = Episode::new(population.genomes_mut(), &params);

        let report = loop {
            let frame_start = get_time();

            if is_key_pressed(KeyCode::Escape) {
                info!("Quit requested");
                std::process::exit(0);
            }

            for _ in 0..ui_state.steps_per_frame {
                if episode.step(population.genomes_mut(), &track, &params).is_some() {
                    break;
                }
            }
            if let Some(report) = episode.report() {
                break report;
            }

            clear_background(WHITE);
            graphics::draw_track(&track_texture, &params);
            graphics::draw_cars(&episode, &sprite, &params, ui_state.show_radars);
            graphics::draw_overlay(population.generation(), episode.alive_count(), &params);

            ui::draw_ui(&mut ui_state, &population, &episode, &params);
            ui::process_egui();

            graphics::limit_frame_rate(frame_start, params.fps);
            next_frame().await;
        };

        population.end_generation(report);
    }

    if let Some(best) = population.best_genome() {
        info!(
            "Finished after {} generations, best fitness {:.3}",
            population.statistics().history().len(),
            best.fitness
        );
    }
    Ok(())
}
