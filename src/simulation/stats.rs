//! Per-generation fitness statistics and reporting.

use std::time::Duration;

use log::info;

use super::episode::{EpisodeOutcome, EpisodeReport};
use super::evolution::Genome;

/// Fitness summary of one finished generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// Generation number, starting at 1.
    pub generation: u32,
    /// Highest fitness in the generation.
    pub best: f32,
    /// Mean fitness.
    pub mean: f32,
    /// Population standard deviation of fitness.
    pub stdev: f32,
    /// Why the episode ended.
    pub outcome: EpisodeOutcome,
    /// Steps the episode ran for.
    pub steps: u32,
    /// Cars alive when the episode ended.
    pub survivors: usize,
    /// Wall-clock time spent on the generation.
    pub elapsed: Duration,
}

impl GenerationStats {
    /// Computes the fitness summary for `genomes` after an episode.
    pub fn from_genomes(
        generation: u32,
        genomes: &[Genome],
        report: &EpisodeReport,
        elapsed: Duration,
    ) -> Self {
        let count = genomes.len().max(1) as f32;
        let best = genomes
            .iter()
            .map(|g| g.fitness)
            .fold(f32::NEG_INFINITY, f32::max);
        let mean = genomes.iter().map(|g| g.fitness).sum::<f32>() / count;
        let variance = genomes
            .iter()
            .map(|g| (g.fitness - mean).powi(2))
            .sum::<f32>()
            / count;

        Self {
            generation,
            best: if genomes.is_empty() { 0.0 } else { best },
            mean,
            stdev: variance.sqrt(),
            outcome: report.outcome,
            steps: report.steps,
            survivors: report.survivors,
            elapsed,
        }
    }
}

/// History of generation summaries, used for logging and plotting.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    history: Vec<GenerationStats>,
}

impl Statistics {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs a summary and appends it to the history.
    pub fn record(&mut self, stats: GenerationStats) {
        let outcome = match stats.outcome {
            EpisodeOutcome::AllCrashed => "all cars crashed",
            EpisodeOutcome::TimeUp => "time limit reached",
        };
        info!(
            "Population's average fitness: {:.5} stdev: {:.5}",
            stats.mean, stats.stdev
        );
        info!("Best fitness: {:.5}", stats.best);
        info!(
            "Episode ended after {} steps ({}), {} survivors",
            stats.steps, outcome, stats.survivors
        );
        info!(
            "Generation {} time: {:.3} sec",
            stats.generation,
            stats.elapsed.as_secs_f32()
        );
        self.history.push(stats);
    }

    /// All recorded generations, oldest first.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Most recently recorded generation.
    pub fn last(&self) -> Option<&GenerationStats> {
        self.history.last()
    }

    /// `(generation, best fitness)` pairs.
    pub fn best_fitness_history(&self) -> Vec<(f64, f64)> {
        self.history
            .iter()
            .map(|s| (s.generation as f64, s.best as f64))
            .collect()
    }

    /// `(generation, mean fitness)` pairs.
    pub fn mean_fitness_history(&self) -> Vec<(f64, f64)> {
        self.history
            .iter()
            .map(|s| (s.generation as f64, s.mean as f64))
            .collect()
    }
}
