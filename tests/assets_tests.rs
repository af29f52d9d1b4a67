#![allow(missing_docs)]

use evo_drive::assets;
use evo_drive::simulation::car::Car;
use evo_drive::simulation::episode::{Episode, EpisodeOutcome};
use evo_drive::simulation::evolution::Population;
use evo_drive::simulation::params::{Config, EvolutionParams, Params};

fn asset(name: &str) -> String {
    format!("{}/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_shipped_track_loads() {
    let params = Params::default();
    let track = assets::load_track(asset("map.png"), params.border_color).expect("map.png loads");

    assert_eq!(track.width(), 1920);
    assert_eq!(track.height(), 1080);
    assert!(track.boundary_pixel_count() > 0);
    // screen corners are off the road
    assert!(track.is_boundary(0, 0));
}

#[test]
fn test_start_pose_is_on_the_road() {
    let params = Params::default();
    let track = assets::load_track(asset("map.png"), params.border_color).expect("map.png loads");
    let mut car = Car::new(0, &params);

    car.check_collision(&track);
    assert!(car.is_alive());
}

#[test]
fn test_missing_image_reports_path() {
    let err = assets::load_track("no_such_track.png", [255, 255, 255, 255]).expect_err("missing");
    assert!(format!("{err:#}").contains("no_such_track.png"));
}

#[test]
fn test_headless_generations_on_shipped_track() {
    let config = Config {
        simulation: Params {
            max_steps: 200,
            ..Params::default()
        },
        evolution: EvolutionParams {
            population_size: 8,
            elitism: 2,
            ..EvolutionParams::default()
        },
    };
    let params = &config.simulation;
    let track = assets::load_track(asset("map.png"), params.border_color).expect("map.png loads");
    let mut population = Population::new(&config.evolution);

    let mut reports = Vec::new();
    population.run(3, |genomes| {
        let report = Episode::new(genomes, params).run_to_end(genomes, &track, params);
        reports.push(report);
        report
    });

    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert!(report.steps <= params.max_steps);
        if report.outcome == EpisodeOutcome::AllCrashed {
            assert_eq!(report.survivors, 0);
        }
    }
    assert!(population.best_genome().is_some_and(|g| g.fitness > 0.0));
}
