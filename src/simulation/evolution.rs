//! Evolutionary driver.
//!
//! Keeps a population of brains, turns the fitness collected during an
//! episode into the next generation through elitism, truncation selection,
//! crossover and mutation, and reseeds the population when progress stalls.

use std::time::Instant;

use log::{info, warn};
use rand::Rng;

use super::brain::Brain;
use super::episode::EpisodeReport;
use super::params::EvolutionParams;
use super::stats::{GenerationStats, Statistics};

/// A brain together with the fitness it earned in the current generation.
#[derive(Debug, Clone)]
pub struct Genome {
    /// Unique identifier, preserved for elites.
    pub id: usize,
    /// Network that drives the car.
    pub brain: Brain,
    /// Fitness accumulated during the current episode.
    pub fitness: f32,
}

impl Genome {
    /// Creates a genome with a freshly initialised brain.
    pub fn new_random(id: usize, params: &EvolutionParams) -> Self {
        Self {
            id,
            brain: Brain::new(&params.layer_sizes, params.init_weight_scale),
            fitness: 0.0,
        }
    }
}

/// The evolving population and its bookkeeping.
#[derive(Debug, Clone)]
pub struct Population {
    params: EvolutionParams,
    genomes: Vec<Genome>,
    /// Current generation, starting at 1.
    generation: u32,
    next_id: usize,
    best_genome: Option<Genome>,
    /// Generations since the best fitness last improved.
    stagnation: u32,
    statistics: Statistics,
    generation_started: Instant,
    solved: bool,
}

impl Population {
    /// Creates a population of random genomes.
    pub fn new(params: &EvolutionParams) -> Self {
        let genomes = (0..params.population_size)
            .map(|id| Genome::new_random(id, params))
            .collect();

        info!(
            "Created population of {} genomes with layers {:?}",
            params.population_size, params.layer_sizes
        );

        Self {
            params: params.clone(),
            genomes,
            generation: 1,
            next_id: params.population_size,
            best_genome: None,
            stagnation: 0,
            statistics: Statistics::new(),
            generation_started: Instant::now(),
            solved: false,
        }
    }

    /// Marks the start of a generation's episode.
    pub fn begin_generation(&mut self) {
        info!("****** Running generation {} ******", self.generation);
        self.generation_started = Instant::now();
    }

    /// Consumes the fitness of a finished episode.
    ///
    /// Records statistics and, unless the fitness threshold was reached,
    /// replaces the genomes with the next generation.
    pub fn end_generation(&mut self, report: EpisodeReport) -> GenerationStats {
        let stats = GenerationStats::from_genomes(
            self.generation,
            &self.genomes,
            &report,
            self.generation_started.elapsed(),
        );
        self.statistics.record(stats.clone());

        let best_so_far = self.best_genome.as_ref().map(|g| g.fitness);
        let generation_best = self
            .genomes
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness));
        if let Some(best) = generation_best {
            if best_so_far.is_none_or(|fitness| best.fitness > fitness) {
                self.best_genome = Some(best.clone());
                self.stagnation = 0;
            } else {
                self.stagnation += 1;
            }
        }

        if stats.best >= self.params.fitness_threshold {
            info!(
                "Best individual in generation {} meets fitness threshold ({:.3} >= {:.3})",
                self.generation, stats.best, self.params.fitness_threshold
            );
            self.solved = true;
            return stats;
        }

        self.reproduce();

        if self.params.max_stagnation > 0 && self.stagnation >= self.params.max_stagnation {
            self.reseed();
        }

        self.generation += 1;
        stats
    }

    /// Runs generations until `max_generations` or the fitness threshold is reached.
    ///
    /// `evaluate` drives one episode for the genomes and reports how it ended.
    /// Returns the best genome seen over the whole run.
    pub fn run<F>(&mut self, max_generations: u32, mut evaluate: F) -> Option<&Genome>
    where
        F: FnMut(&mut [Genome]) -> EpisodeReport,
    {
        for _ in 0..max_generations {
            self.begin_generation();
            let report = evaluate(&mut self.genomes);
            self.end_generation(report);
            if self.solved {
                break;
            }
        }

        if let Some(best) = &self.best_genome {
            info!(
                "Best genome: id {} with fitness {:.3} ({} parameters)",
                best.id,
                best.fitness,
                best.brain.parameter_count()
            );
        }
        self.best_genome.as_ref()
    }

    /// Replaces the genomes with the offspring of the fittest ones.
    fn reproduce(&mut self) {
        let mut ranked = std::mem::take(&mut self.genomes);
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let size = self.params.population_size;
        let elites = self.params.elitism.min(ranked.len());
        let parents = ((ranked.len() as f32 * self.params.survival_threshold).ceil() as usize)
            .clamp(1, ranked.len().max(1));

        let mut next = Vec::with_capacity(size);
        next.extend(ranked.iter().take(elites).map(|elite| Genome {
            fitness: 0.0,
            ..elite.clone()
        }));

        let mut rng = rand::rng();
        while next.len() < size {
            let parent_1 = &ranked[rng.random_range(0..parents)];

            let crossover =
                parents >= 2 && rng.random::<f32>() < self.params.crossover_probability;

            let mut brain = if crossover {
                let mut parent_2_idx = rng.random_range(0..parents);
                while ranked[parent_2_idx].id == parent_1.id {
                    parent_2_idx = rng.random_range(0..parents);
                }
                let alpha = rng.random::<f32>();
                Brain::crossover_weighted(&parent_1.brain, &ranked[parent_2_idx].brain, alpha)
            } else {
                parent_1.brain.clone()
            };

            let mutation_scale = sample_mutation_scale(
                self.params.mutation_scale_min,
                self.params.mutation_scale_max,
            );
            brain.mutate(self.params.mutation_rate, mutation_scale);

            next.push(Genome {
                id: self.next_id,
                brain,
                fitness: 0.0,
            });
            self.next_id += 1;
        }

        self.genomes = next;
    }

    /// Replaces every non-elite genome with a fresh random one.
    fn reseed(&mut self) {
        warn!(
            "No improvement for {} generations, reseeding {} genomes",
            self.stagnation,
            self.genomes.len().saturating_sub(self.params.elitism)
        );

        for genome in self.genomes.iter_mut().skip(self.params.elitism) {
            genome.brain = Brain::new(&self.params.layer_sizes, self.params.init_weight_scale);
        }
        self.stagnation = 0;
    }

    /// Current generation number, starting at 1.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Genomes of the current generation.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Mutable access for the episode that scores them.
    pub fn genomes_mut(&mut self) -> &mut [Genome] {
        &mut self.genomes
    }

    /// Best genome seen over all finished generations.
    pub fn best_genome(&self) -> Option<&Genome> {
        self.best_genome.as_ref()
    }

    /// Recorded generation statistics.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Whether a genome has reached the fitness threshold.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Generations since the best fitness last improved.
    pub fn stagnation(&self) -> u32 {
        self.stagnation
    }
}

/// Samples a mutation scale from a log-uniform distribution over `[min, max]`.
fn sample_mutation_scale(min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    let log_mutation_scale = rand::rng().random_range(min.ln()..max.ln());
    log_mutation_scale.exp()
}
