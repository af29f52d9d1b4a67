#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_drive::simulation::car::{Action, Car};
use evo_drive::simulation::params::Params;
use evo_drive::simulation::track::TrackMap;
use ndarray::Array1;

fn create_test_params() -> Params {
    Params {
        screen_width: 1920.0,
        screen_height: 1080.0,
        car_width: 60.0,
        car_height: 60.0,
        start_position: [830.0, 920.0],
        start_angle: 0.0,
        ..Params::default()
    }
}

/// Track without any boundary pixels inside the image.
fn open_track(params: &Params) -> TrackMap {
    TrackMap::from_fn(
        params.screen_width as usize,
        params.screen_height as usize,
        |_, _| false,
    )
}

#[test]
fn test_position_clamped_for_any_heading_and_speed() {
    let params = create_test_params();
    let track = open_track(&params);

    for angle in (0..360).step_by(15) {
        for speed in [0.0, 5.0, 50.0, 500.0, 5000.0] {
            let mut car = Car::new(0, &params);
            car.update(&track, &params);
            car.angle = angle as f32;
            car.speed = speed;

            for _ in 0..20 {
                car.update(&track, &params);
                assert!(car.pos[0] >= params.clamp_min && car.pos[0] <= params.max_x());
                assert!(car.pos[1] >= params.clamp_min && car.pos[1] <= params.max_y());
            }
        }
    }
}

#[test]
fn test_first_update_sets_default_speed() {
    let params = create_test_params();
    let track = open_track(&params);
    let mut car = Car::new(0, &params);

    // Actions before the first update are overwritten by the default speed
    car.apply_action(Action::Accelerate, &params);
    car.update(&track, &params);

    assert_eq!(car.speed, params.default_speed);
    assert_eq!(car.distance, params.default_speed);
    assert_eq!(car.time, 1);
    assert!((car.pos[0] - (params.start_position[0] + params.default_speed)).abs() < 1e-3);
}

#[test]
fn test_radar_never_exceeds_max_range() {
    let params = create_test_params();
    let track = open_track(&params);

    for angle in (0..360).step_by(10) {
        let mut car = Car::new(0, &params);
        car.angle = angle as f32;
        for _ in 0..30 {
            car.update(&track, &params);
            assert_eq!(car.radars.len(), params.radar_angles.len());
            for radar in &car.radars {
                assert!(radar.distance <= params.radar_max_range);
            }
        }
    }
}

#[test]
fn test_radar_reaches_full_range_in_open_space() {
    let params = Params {
        start_position: [900.0, 500.0],
        ..create_test_params()
    };
    let track = open_track(&params);
    let car = Car::new(0, &params);

    for &offset in &params.radar_angles {
        let radar = car.check_radar(offset, &track, &params);
        assert!(
            radar.distance >= params.radar_max_range - 1,
            "radar {} only reached {}",
            offset,
            radar.distance
        );
    }
}

#[test]
fn test_radar_stops_at_boundary() {
    let params = Params {
        start_position: [900.0, 500.0],
        ..create_test_params()
    };
    // vertical wall 70 pixels ahead of the car center (930, 530)
    let track = TrackMap::from_fn(1920, 1080, |x, _| x >= 1000);
    let car = Car::new(0, &params);

    let radar = car.check_radar(0, &track, &params);
    assert_eq!(radar.distance, 70);
    assert_eq!(radar.end.x(), 1000.0);

    // sideways radars never see the wall
    let left = car.check_radar(90, &track, &params);
    assert!(left.distance >= params.radar_max_range - 1);
}

#[test]
fn test_sensor_inputs_are_normalized() {
    let params = Params {
        start_position: [900.0, 500.0],
        ..create_test_params()
    };
    let track = TrackMap::from_fn(1920, 1080, |x, _| x >= 1000);
    let mut car = Car::new(0, &params);

    assert_eq!(car.sensor_inputs(&params), Array1::<f32>::zeros(5));

    car.radars = params
        .radar_angles
        .iter()
        .map(|&offset| car.check_radar(offset, &track, &params))
        .collect();

    let inputs = car.sensor_inputs(&params);
    assert_eq!(inputs.len(), params.radar_angles.len());
    assert_eq!(inputs[2], 2.0); // 70 / 30
    assert_eq!(inputs[0], 10.0); // 300 / 30
}

#[test]
fn test_car_on_boundary_dies() {
    let params = create_test_params();
    let track = TrackMap::from_fn(1920, 1080, |_, _| true);
    let mut car = Car::new(0, &params);

    assert!(car.is_alive());
    car.check_collision(&track);
    assert!(!car.is_alive());
}

#[test]
fn test_car_driving_into_wall_dies_without_radars() {
    let params = create_test_params();
    // start pose center is (860, 950); after one step the front corners reach x = 905
    let track = TrackMap::from_fn(1920, 1080, |x, _| x >= 900);
    let mut car = Car::new(0, &params);

    car.update(&track, &params);

    assert!(!car.is_alive());
    assert!(car.radars.is_empty());
}

#[test]
fn test_corners_surround_center() {
    let params = create_test_params();
    let track = open_track(&params);
    let mut car = Car::new(0, &params);
    car.angle = 37.0;
    car.update(&track, &params);

    for corner in &car.corners {
        let dx = corner.x() - car.center[0];
        let dy = corner.y() - car.center[1];
        let radius = (dx * dx + dy * dy).sqrt();
        assert!((radius - params.car_width / 2.0).abs() < 1e-3);
    }
}

#[test]
fn test_action_from_outputs() {
    let pick = |values: [f32; 4]| Action::from_outputs(&Array1::from_vec(values.to_vec()));

    assert_eq!(pick([0.9, 0.1, 0.2, 0.3]), Action::TurnLeft);
    assert_eq!(pick([0.1, 0.9, 0.2, 0.3]), Action::TurnRight);
    assert_eq!(pick([-0.5, -0.4, -0.1, -0.2]), Action::Brake);
    assert_eq!(pick([0.0, 0.0, 0.0, 0.5]), Action::Accelerate);

    // ties resolve to the first index
    assert_eq!(pick([0.3, 0.3, 0.3, 0.3]), Action::TurnLeft);
    assert_eq!(pick([0.1, 0.5, 0.5, 0.2]), Action::TurnRight);

    // NaN never wins
    assert_eq!(pick([f32::NAN, 0.1, 0.2, 0.0]), Action::Brake);
}

#[test]
fn test_apply_action() {
    let params = create_test_params();
    let mut car = Car::new(0, &params);
    car.speed = 14.0;

    car.apply_action(Action::Brake, &params);
    assert_eq!(car.speed, 12.0);

    // braking never goes below the minimum speed
    car.apply_action(Action::Brake, &params);
    assert_eq!(car.speed, 12.0);

    car.apply_action(Action::Accelerate, &params);
    assert_eq!(car.speed, 14.0);

    car.angle = 355.0;
    car.apply_action(Action::TurnLeft, &params);
    assert_eq!(car.angle, 5.0);

    car.apply_action(Action::TurnRight, &params);
    car.apply_action(Action::TurnRight, &params);
    assert_eq!(car.angle, 345.0);
}

#[test]
fn test_reward_scales_distance() {
    let params = create_test_params();
    let track = open_track(&params);
    let mut car = Car::new(0, &params);

    car.update(&track, &params);
    car.update(&track, &params);

    assert_eq!(car.distance, 40.0);
    assert_eq!(car.reward(&params), 40.0 / params.fitness_divisor);
}
