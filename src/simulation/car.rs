//! Car state, physics and radar sensors.
//!
//! A car moves along its heading at a scalar speed, dies when one of the four
//! corners of its footprint lands on a boundary pixel, and measures the
//! distance to the boundary with a fan of ray-cast radars.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};
use log::debug;
use ndarray::Array1;

use super::params::Params;
use super::track::TrackMap;

/// Heading offsets (degrees) of the four collision corners.
const CORNER_OFFSETS: [f32; 4] = [30.0, 150.0, 210.0, 330.0];

/// Discrete steering decision taken from the network output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Increase the heading by one turn step.
    TurnLeft,
    /// Decrease the heading by one turn step.
    TurnRight,
    /// Slow down, never below the minimum speed.
    Brake,
    /// Speed up by one speed step.
    Accelerate,
}

impl Action {
    /// Number of actions, which is also the network output size.
    pub const COUNT: usize = 4;

    /// All actions in network output order.
    pub const ALL: [Action; Self::COUNT] = [
        Action::TurnLeft,
        Action::TurnRight,
        Action::Brake,
        Action::Accelerate,
    ];

    /// Picks the action with the highest network output.
    ///
    /// Ties resolve to the lowest index and NaN outputs never win.
    pub fn from_outputs(outputs: &Array1<f32>) -> Self {
        let mut best = 0;
        let mut best_value = f32::NEG_INFINITY;
        for (i, &value) in outputs.iter().take(Self::COUNT).enumerate() {
            if value > best_value {
                best = i;
                best_value = value;
            }
        }
        Self::ALL[best]
    }
}

/// One radar reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radar {
    /// Offset from the heading in degrees.
    pub offset: i32,
    /// Pixel where the ray stopped.
    pub end: Point<f32>,
    /// Truncated distance from the car center to `end`.
    pub distance: u32,
}

/// A simulated car driven by a neural network.
#[derive(Debug, Clone)]
pub struct Car {
    /// Index of the genome driving this car.
    pub id: usize,
    /// Top-left corner of the footprint.
    pub pos: Array1<f32>,
    /// Center of the footprint, derived from `pos` every update.
    pub center: Array1<f32>,
    /// Heading in degrees, counter-clockwise on screen.
    pub angle: f32,
    /// Pixels travelled per step.
    pub speed: f32,
    speed_set: bool,
    alive: bool,
    /// Total distance travelled.
    pub distance: f32,
    /// Number of updates performed.
    pub time: u32,
    /// Readings from the most recent radar sweep.
    pub radars: Vec<Radar>,
    /// Collision corners of the rotated footprint.
    pub corners: [Point<f32>; 4],
}

impl Car {
    /// Creates a car at the configured start pose.
    pub fn new(id: usize, params: &Params) -> Self {
        let pos = Array1::from_vec(params.start_position.to_vec());
        let center = footprint_center(&pos, params);
        let corners = footprint_corners(&center, params.start_angle, params.car_width);

        Self {
            id,
            pos,
            center,
            angle: params.start_angle,
            speed: 0.0,
            speed_set: false,
            alive: true,
            distance: 0.0,
            time: 0,
            radars: Vec::with_capacity(params.radar_angles.len()),
            corners,
        }
    }

    /// Checks if the car is still racing.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Takes the car out of the race.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Advances the car by one simulation step.
    ///
    /// Moves along the heading, clamps to the screen, recomputes the
    /// footprint, checks for collisions and re-casts the radars.
    pub fn update(&mut self, track: &TrackMap, params: &Params) {
        if !self.speed_set {
            self.speed = params.default_speed;
            self.speed_set = true;
        }

        let (dx, dy) = heading_vector(self.angle);

        self.pos[0] = (self.pos[0] + dx * self.speed).clamp(params.clamp_min, params.max_x());

        self.distance += self.speed;
        self.time += 1;

        self.pos[1] = (self.pos[1] + dy * self.speed).clamp(params.clamp_min, params.max_y());

        self.center = footprint_center(&self.pos, params);
        self.corners = footprint_corners(&self.center, self.angle, params.car_width);

        self.check_collision(track);

        self.radars.clear();
        if self.alive {
            for &offset in &params.radar_angles {
                let radar = self.check_radar(offset, track, params);
                self.radars.push(radar);
            }
        }
    }

    /// Kills the car if any footprint corner sits on a boundary pixel.
    pub fn check_collision(&mut self, track: &TrackMap) {
        let hit = self
            .corners
            .iter()
            .any(|corner| track.is_boundary(corner.x() as i32, corner.y() as i32));

        if hit {
            debug!(
                "car {} crashed after {} steps at ({:.0}, {:.0})",
                self.id, self.time, self.center[0], self.center[1]
            );
            self.kill();
        }
    }

    /// Casts a single radar ray at `offset` degrees from the heading.
    ///
    /// The ray grows one pixel at a time until it reaches a boundary pixel
    /// or the maximum range.
    pub fn check_radar(&self, offset: i32, track: &TrackMap, params: &Params) -> Radar {
        let (dx, dy) = heading_vector(self.angle + offset as f32);
        let (cx, cy) = (self.center[0], self.center[1]);
        let point_at = |length: u32| {
            let length = length as f32;
            ((cx + dx * length) as i32, (cy + dy * length) as i32)
        };

        let mut length = 0;
        let (mut x, mut y) = point_at(length);
        while !track.is_boundary(x, y) && length < params.radar_max_range {
            length += 1;
            (x, y) = point_at(length);
        }

        let end = Point::new(x as f32, y as f32);
        let distance = Euclidean.distance(Point::new(cx, cy), end) as u32;

        Radar {
            offset,
            end,
            distance: distance.min(params.radar_max_range),
        }
    }

    /// Normalized radar distances, one slot per configured radar angle.
    ///
    /// Slots without a reading (before the first update, or after a crash)
    /// are zero.
    pub fn sensor_inputs(&self, params: &Params) -> Array1<f32> {
        let mut inputs = Array1::zeros(params.radar_angles.len());
        for (slot, radar) in inputs.iter_mut().zip(&self.radars) {
            *slot = (radar.distance / params.radar_normalization) as f32;
        }
        inputs
    }

    /// Applies a steering decision to heading and speed.
    pub fn apply_action(&mut self, action: Action, params: &Params) {
        match action {
            Action::TurnLeft => self.angle += params.turn_step,
            Action::TurnRight => self.angle -= params.turn_step,
            Action::Brake => {
                if self.speed - params.speed_step >= params.min_speed {
                    self.speed -= params.speed_step;
                }
            }
            Action::Accelerate => self.speed += params.speed_step,
        }
        self.angle = self.angle.rem_euclid(360.0);
    }

    /// Fitness earned for the current step.
    pub fn reward(&self, params: &Params) -> f32 {
        self.distance / params.fitness_divisor
    }
}

/// Unit direction of a heading on screen (y grows downwards).
#[inline]
fn heading_vector(degrees: f32) -> (f32, f32) {
    let rad = (360.0 - degrees).to_radians();
    (rad.cos(), rad.sin())
}

fn footprint_center(pos: &Array1<f32>, params: &Params) -> Array1<f32> {
    Array1::from_vec(vec![
        pos[0].trunc() + params.car_width / 2.0,
        pos[1].trunc() + params.car_height / 2.0,
    ])
}

fn footprint_corners(center: &Array1<f32>, angle: f32, car_width: f32) -> [Point<f32>; 4] {
    let length = 0.5 * car_width;
    CORNER_OFFSETS.map(|offset| {
        let (dx, dy) = heading_vector(angle + offset);
        Point::new(center[0] + dx * length, center[1] + dy * length)
    })
}
