//! # Evo Drive - Neuroevolved Cars
//!
//! Simple car agents drive around a fixed 2D track bitmap, steered by small
//! feed-forward neural networks whose weights evolve generation over
//! generation.
//!
//! ## Features
//!
//! - Per-step car physics with screen clamping and corner-based collision
//! - Ray-cast radar sensors against the track boundary colour
//! - Neural network brains (MLP with tanh activation)
//! - Genetic algorithm evolution (elitism, crossover, mutation, stagnation reset)
//! - Headless training or real-time visualization with macroquad/egui
//!
//! ## Core Modules
//!
//! - [`simulation::car`] - Car state, physics and radars
//! - [`simulation::episode`] - One generation's drive
//! - [`simulation::evolution`] - Population and reproduction
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::track`] - Boundary lookup for the track bitmap

/// Image asset loading.
pub mod assets;

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network implementation for car brains.
    pub mod brain;
    /// Car state, physics and radar sensors.
    pub mod car;
    /// Generation loop driving every car through one episode.
    pub mod episode;
    /// Population, selection and reproduction.
    pub mod evolution;
    /// Simulation and evolution parameters.
    pub mod params;
    /// Per-generation fitness statistics.
    pub mod stats;
    /// Track boundary map.
    pub mod track;
}
