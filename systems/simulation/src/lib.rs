#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that owns the world and runs every system in a fixed order.
//!
//! One call to [`Simulation::tick`] per rendered frame advances waves, enemy
//! motion, tower fire and projectiles, then decays transient presentation
//! state. Commands are applied between ticks through [`Simulation::execute`].

use fantasy_td_core::{Command, ConfigError, DamageCue, Event, FrameSnapshot, GameConfig};
use fantasy_td_system_movement::Movement;
use fantasy_td_system_projectiles::ProjectileResolution;
use fantasy_td_system_tower_combat::TowerCombat;
use fantasy_td_system_tower_targeting::{TowerTarget, TowerTargeting};
use fantasy_td_system_waves::WaveDirector;
use fantasy_td_world::{self as world, persistence, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

/// Failures surfaced by the simulation driver.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration failed validation.
    #[error("invalid game configuration")]
    Config(#[from] ConfigError),
    /// The save could not be serialized.
    #[error("failed to serialize save")]
    Save(#[from] serde_json::Error),
}

/// Owns the world, the wave random source and every system.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    rng: ChaCha8Rng,
    waves: WaveDirector,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    projectiles: ProjectileResolution,
    targets: Vec<TowerTarget>,
}

impl Simulation {
    /// Validates `config` and creates a fresh game.
    pub fn new(config: GameConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        info!(
            columns = config.grid.columns(),
            rows = config.grid.rows(),
            seed = config.seed,
            "simulation ready"
        );
        Ok(Self {
            world: World::new(config),
            rng,
            waves: WaveDirector::new(),
            movement: Movement::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            projectiles: ProjectileResolution::new(),
            targets: Vec::new(),
        })
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Applies a player command and returns the events it produced.
    pub fn execute(&mut self, command: Command) -> Vec<Event> {
        let reseed = matches!(command, Command::Reset);
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        if reseed {
            self.reseed();
        }
        events
    }

    /// Advances the game by one rendered frame.
    ///
    /// `frame_dt` is clamped to the configured maximum frame delta (non-finite
    /// input counts as zero) and then scaled by the speed multiplier.
    pub fn tick(&mut self, frame_dt: f32, cue: &mut dyn DamageCue) -> Vec<Event> {
        let dt = self.scaled_dt(frame_dt);
        let mut events = vec![Event::TimeAdvanced { dt }];

        if !self.world.economy.defeated {
            self.waves
                .handle(&mut self.world, dt, &mut self.rng, &mut events);
            self.movement.handle(&mut self.world, dt, &mut events);
            self.targeting.handle(&self.world, &mut self.targets);
            self.combat
                .handle(&mut self.world, dt, &self.targets, &mut events);
            self.projectiles
                .handle(&mut self.world, dt, cue, &mut events);
        }

        self.world.decay_transients(dt);
        events
    }

    /// Derives the tile size from a new viewport.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.world.set_viewport(width, height);
    }

    /// Captures the read-only view handed to rendering.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        query::frame_snapshot(&self.world)
    }

    /// Serializes the persistable state to JSON.
    pub fn save(&self) -> Result<String, SimulationError> {
        Ok(persistence::to_json(&self.world)?)
    }

    /// Replaces the game with the provided save.
    ///
    /// Unreadable input starts a fresh game instead. Returns whether the save
    /// was applied.
    pub fn restore(&mut self, text: &str) -> bool {
        let applied = match persistence::parse(text) {
            Some(data) => {
                persistence::restore(&mut self.world, &data);
                true
            }
            None => {
                self.world.reset();
                false
            }
        };
        self.reseed();
        applied
    }

    fn scaled_dt(&self, frame_dt: f32) -> f32 {
        let frame_dt = if frame_dt.is_finite() { frame_dt } else { 0.0 };
        let clamped = frame_dt.clamp(0.0, self.world.config.motion.max_frame_dt);
        clamped * self.world.economy.speed_multiplier
    }

    fn reseed(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.world.config.seed);
        self.targets.clear();
        debug!(seed = self.world.config.seed, "wave random source reseeded");
    }
}
