#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::time::Duration;

use evo_drive::simulation::brain::Brain;
use evo_drive::simulation::episode::{EpisodeOutcome, EpisodeReport};
use evo_drive::simulation::evolution::{Genome, Population};
use evo_drive::simulation::params::EvolutionParams;
use evo_drive::simulation::stats::GenerationStats;
use ndarray::Array1;

fn create_test_params() -> EvolutionParams {
    EvolutionParams {
        population_size: 10,
        layer_sizes: vec![5, 6, 4],
        init_weight_scale: 1.0,
        elitism: 2,
        survival_threshold: 0.3,
        crossover_probability: 0.5,
        mutation_rate: 0.8,
        mutation_scale_min: 0.01,
        mutation_scale_max: 0.5,
        max_stagnation: 20,
        fitness_threshold: 1_000.0,
    }
}

fn time_up_report() -> EpisodeReport {
    EpisodeReport {
        outcome: EpisodeOutcome::TimeUp,
        steps: 100,
        survivors: 3,
    }
}

#[test]
fn test_brain_shapes() {
    let brain = Brain::new(&[5, 6, 4], 1.0);

    assert_eq!(brain.layers.len(), 2);
    assert_eq!(brain.input_size(), 5);
    assert_eq!(brain.output_size(), 4);
    assert_eq!(brain.parameter_count(), 5 * 6 + 6 + 6 * 4 + 4);

    let outputs = brain.think(&Array1::from_vec(vec![1.0, 2.0, 10.0, 3.0, 0.0]));
    assert_eq!(outputs.len(), 4);
    assert!(outputs.iter().all(|v| (-1.0..=1.0).contains(v)));
}

#[test]
fn test_brain_crossover_and_mutation() {
    let parent1 = Brain::new(&[5, 6, 4], 1.0);
    let parent2 = Brain::new(&[5, 6, 4], 1.0);

    assert_eq!(Brain::crossover_weighted(&parent1, &parent2, 1.0), parent1);
    assert_eq!(Brain::crossover_weighted(&parent1, &parent2, 0.0), parent2);

    let mut unchanged = parent1.clone();
    unchanged.mutate(0.0, 0.5);
    assert_eq!(unchanged, parent1);

    let mut mutated = parent1.clone();
    mutated.mutate(1.0, 0.5);
    assert_ne!(mutated, parent1);
    for (a, b) in mutated.layers.iter().zip(&parent1.layers) {
        for (w1, w2) in a.weights.iter().zip(b.weights.iter()) {
            assert!((w1 - w2).abs() <= 0.5);
        }
    }
}

#[test]
fn test_population_creation() {
    let params = create_test_params();
    let population = Population::new(&params);

    assert_eq!(population.genomes().len(), params.population_size);
    assert_eq!(population.generation(), 1);
    assert!(population.best_genome().is_none());

    let mut ids: Vec<usize> = population.genomes().iter().map(|g| g.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), params.population_size);
}

#[test]
fn test_next_generation_keeps_size_and_elites() {
    let params = create_test_params();
    let mut population = Population::new(&params);

    for (i, genome) in population.genomes_mut().iter_mut().enumerate() {
        genome.fitness = i as f32;
    }
    let mut ranked: Vec<Genome> = population.genomes().to_vec();
    ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

    let stats = population.end_generation(time_up_report());

    assert_eq!(stats.generation, 1);
    assert_eq!(stats.best, 9.0);
    assert_eq!(population.generation(), 2);
    assert_eq!(population.genomes().len(), params.population_size);

    for (elite, next) in ranked.iter().zip(population.genomes()).take(params.elitism) {
        assert_eq!(elite.id, next.id);
        assert_eq!(elite.brain, next.brain);
        assert_eq!(next.fitness, 0.0);
    }

    // offspring get fresh ids
    for child in population.genomes().iter().skip(params.elitism) {
        assert!(child.id >= params.population_size);
    }

    let best = population.best_genome().expect("best genome recorded");
    assert_eq!(best.fitness, 9.0);
    assert_eq!(best.id, ranked[0].id);
}

#[test]
fn test_fitness_threshold_stops_run() {
    let params = create_test_params();
    let mut population = Population::new(&params);

    let mut evaluations = 0;
    let best = population.run(50, |genomes| {
        evaluations += 1;
        for (i, genome) in genomes.iter_mut().enumerate() {
            genome.fitness = if i == 3 { 2_000.0 } else { 1.0 };
        }
        time_up_report()
    });

    assert_eq!(best.map(|g| g.fitness), Some(2_000.0));
    assert_eq!(evaluations, 1);
    assert!(population.is_solved());
    assert_eq!(population.generation(), 1);
    assert_eq!(population.statistics().history().len(), 1);
}

#[test]
fn test_run_stops_at_generation_limit() {
    let params = create_test_params();
    let mut population = Population::new(&params);

    let mut evaluations = 0;
    population.run(4, |genomes| {
        evaluations += 1;
        for genome in genomes.iter_mut() {
            genome.fitness = evaluations as f32;
        }
        time_up_report()
    });

    assert_eq!(evaluations, 4);
    assert!(!population.is_solved());
    assert_eq!(population.generation(), 5);
    assert_eq!(
        population.statistics().best_fitness_history(),
        vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]
    );
}

#[test]
fn test_stagnation_reseeds_population() {
    let params = EvolutionParams {
        max_stagnation: 2,
        ..create_test_params()
    };
    let mut population = Population::new(&params);

    population.run(1, |genomes| {
        genomes.iter_mut().for_each(|g| g.fitness = 10.0);
        time_up_report()
    });
    assert_eq!(population.stagnation(), 0);

    population.run(1, |genomes| {
        genomes.iter_mut().for_each(|g| g.fitness = 5.0);
        time_up_report()
    });
    assert_eq!(population.stagnation(), 1);

    // second generation without improvement triggers the reseed
    population.run(1, |genomes| {
        genomes.iter_mut().for_each(|g| g.fitness = 5.0);
        time_up_report()
    });
    assert_eq!(population.stagnation(), 0);
    assert_eq!(population.genomes().len(), params.population_size);
    assert_eq!(population.best_genome().map(|g| g.fitness), Some(10.0));
}

#[test]
fn test_generation_stats() {
    let genomes: Vec<Genome> = [1.0, 2.0, 3.0]
        .iter()
        .enumerate()
        .map(|(id, &fitness)| Genome {
            id,
            brain: Brain::new(&[5, 4], 0.1),
            fitness,
        })
        .collect();

    let stats =
        GenerationStats::from_genomes(7, &genomes, &time_up_report(), Duration::from_millis(5));

    assert_eq!(stats.generation, 7);
    assert_eq!(stats.best, 3.0);
    assert_eq!(stats.mean, 2.0);
    assert!((stats.stdev - (2.0f32 / 3.0).sqrt()).abs() < 1e-6);
    assert_eq!(stats.outcome, EpisodeOutcome::TimeUp);
    assert_eq!(stats.survivors, 3);
}
