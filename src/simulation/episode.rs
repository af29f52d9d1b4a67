//! One generation's drive around the track.
//!
//! Every genome gets a car. Each tick the live cars ask their brain for an
//! action, move, and add their reward to the genome's fitness. The episode
//! ends when no car is left alive or the step budget runs out.

use super::car::{Action, Car};
use super::evolution::Genome;
use super::params::Params;
use super::track::TrackMap;

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// Every car crashed.
    AllCrashed,
    /// The step budget was exhausted.
    TimeUp,
}

/// Summary handed to the evolutionary driver once an episode ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeReport {
    /// Why the episode ended.
    pub outcome: EpisodeOutcome,
    /// Number of completed steps.
    pub steps: u32,
    /// Cars still alive at the end.
    pub survivors: usize,
}

/// State of a running generation.
#[derive(Debug, Clone)]
pub struct Episode {
    cars: Vec<Car>,
    steps: u32,
    finished: Option<EpisodeOutcome>,
}

impl Episode {
    /// Starts an episode: zeroes every genome's fitness and creates one car per genome.
    pub fn new(genomes: &mut [Genome], params: &Params) -> Self {
        let cars = genomes
            .iter_mut()
            .enumerate()
            .map(|(i, genome)| {
                genome.fitness = 0.0;
                Car::new(i, params)
            })
            .collect();

        Self {
            cars,
            steps: 0,
            finished: None,
        }
    }

    /// Advances every car by one tick.
    ///
    /// Returns the outcome once the episode has ended; further calls are no-ops.
    /// `genomes` must be the slice the episode was created with.
    pub fn step(
        &mut self,
        genomes: &mut [Genome],
        track: &TrackMap,
        params: &Params,
    ) -> Option<EpisodeOutcome> {
        if self.finished.is_some() {
            return self.finished;
        }

        for (car, genome) in self.cars.iter_mut().zip(genomes.iter()) {
            if car.is_alive() {
                let outputs = genome.brain.think(&car.sensor_inputs(params));
                car.apply_action(Action::from_outputs(&outputs), params);
            }
        }

        // Cars that crash during this update still count as alive for this tick.
        let mut still_alive = 0;
        for (car, genome) in self.cars.iter_mut().zip(genomes.iter_mut()) {
            if car.is_alive() {
                still_alive += 1;
                car.update(track, params);
                genome.fitness += car.reward(params);
            }
        }

        if still_alive == 0 {
            self.finished = Some(EpisodeOutcome::AllCrashed);
            return self.finished;
        }

        self.steps += 1;
        if self.steps >= params.max_steps {
            self.finished = Some(EpisodeOutcome::TimeUp);
        }
        self.finished
    }

    /// Steps until the episode ends.
    pub fn run_to_end(
        &mut self,
        genomes: &mut [Genome],
        track: &TrackMap,
        params: &Params,
    ) -> EpisodeReport {
        loop {
            if let Some(report) = self.report() {
                return report;
            }
            self.step(genomes, track, params);
        }
    }

    /// Report for a finished episode, `None` while it is still running.
    pub fn report(&self) -> Option<EpisodeReport> {
        self.finished.map(|outcome| EpisodeReport {
            outcome,
            steps: self.steps,
            survivors: self.alive_count(),
        })
    }

    /// All cars, dead or alive.
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    /// Number of cars still racing.
    pub fn alive_count(&self) -> usize {
        self.cars.iter().filter(|car| car.is_alive()).count()
    }

    /// Completed steps so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Checks if the episode has ended.
    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }
}
