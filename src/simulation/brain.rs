//! Scripted muscle controller.
//!
//! A brain is a looping sequence of timed commands. Each command holds a short
//! contraction pattern that is tiled over all muscles (`muscle i` follows
//! `pattern[i % len]`). A small per-tick chance flips a muscle regardless of
//! the script, so no two runs of the same brain look exactly alike.

use log::trace;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::muscle::Muscle;
use super::rng::SimRng;

/// Template patterns commands are derived from.
const PATTERNS: [[bool; 4]; 5] = [
    [true, false, true, false],
    [false, true, false, true],
    [true, true, false, false],
    [false, false, true, true],
    [true, false, false, true],
];
/// Number of pattern picks when generating a command sequence.
const PATTERN_PICKS: usize = 15;
/// Inclusive range of consecutive commands per pick.
const REPEATS: std::ops::RangeInclusive<usize> = 2..=5;
/// Inclusive range of command durations in brain ticks.
const DURATION: std::ops::RangeInclusive<u32> = 8..=25;
/// Probability a generated bit ignores the template and contracts.
const CONTRACT_BIAS: f32 = 0.7;
/// Brain ticks per simulated second.
const TICK_RATE: f32 = 60.0;
/// Per-muscle, per-tick probability of a random flip.
const FLIP_PROBABILITY: f32 = 0.05;
/// Per-command probability of flipping one action bit.
const BIT_MUTATION_PROBABILITY: f32 = 0.1;
/// Per-command probability of jittering the duration.
const DURATION_MUTATION_PROBABILITY: f32 = 0.05;
/// Maximum duration jitter in ticks.
const DURATION_JITTER: i64 = 3;
/// Shortest duration a mutation can produce.
const MIN_DURATION: u32 = 5;
/// Probability of throwing the whole sequence away and regenerating it.
const REGENERATE_PROBABILITY: f32 = 0.2;

/// One timed step of the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Desired contraction state, tiled over the muscles.
    pub muscle_actions: Vec<bool>,
    /// How long the command is held, in brain ticks.
    pub duration: u32,
}

/// A creature's scripted control sequence.
#[derive(Debug, Clone)]
pub struct Brain {
    commands: Vec<Command>,
    current_command: usize,
    command_timer: f32,
    rng: SimRng,
}

impl Brain {
    /// Creates a brain with a freshly generated command sequence.
    pub fn new(rng: SimRng) -> Self {
        let mut brain = Self {
            commands: Vec::new(),
            current_command: 0,
            command_timer: 0.0,
            rng,
        };
        brain.generate_commands();
        brain
    }

    /// Creates a brain running a given script.
    ///
    /// An empty script is replaced by a generated one, so the cursor always
    /// points at a valid command.
    pub fn from_commands(commands: Vec<Command>, rng: SimRng) -> Self {
        if commands.is_empty() {
            return Self::new(rng);
        }
        Self {
            commands,
            current_command: 0,
            command_timer: 0.0,
            rng,
        }
    }

    /// The command sequence.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Index of the command being executed.
    pub fn current_command(&self) -> usize {
        self.current_command
    }

    /// Ticks spent in the current command.
    pub fn command_timer(&self) -> f32 {
        self.command_timer
    }

    /// Replaces the command sequence with a newly generated one.
    pub fn generate_commands(&mut self) {
        self.commands.clear();
        for _ in 0..PATTERN_PICKS {
            let pattern = PATTERNS
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(PATTERNS[0]);
            let repeats = self.rng.random_range(REPEATS);
            for _ in 0..repeats {
                let muscle_actions = pattern
                    .iter()
                    .map(|&bit| self.rng.random::<f32>() < CONTRACT_BIAS || bit)
                    .collect();
                let duration = self.rng.random_range(DURATION);
                self.commands.push(Command {
                    muscle_actions,
                    duration,
                });
            }
        }
        self.current_command = 0;
        self.command_timer = 0.0;
    }

    /// Sets every muscle's contraction state and advances the script.
    ///
    /// # Arguments
    ///
    /// * `muscles` - The owning creature's muscles
    /// * `dt` - Time delta in seconds
    pub fn update(&mut self, muscles: &mut [Muscle], dt: f32) {
        if self.current_command >= self.commands.len() {
            self.current_command = 0;
        }
        let Some(command) = self.commands.get(self.current_command) else {
            return;
        };

        let len = command.muscle_actions.len();
        for (i, muscle) in muscles.iter_mut().enumerate() {
            if self.rng.random::<f32>() < FLIP_PROBABILITY {
                muscle.contracting = !muscle.contracting;
            } else if len > 0 {
                muscle.contracting = command.muscle_actions[i % len];
            }
        }

        self.command_timer += dt * TICK_RATE;
        if self.command_timer >= command.duration as f32 {
            self.current_command = (self.current_command + 1) % self.commands.len();
            self.command_timer = 0.0;
        }
    }

    /// Randomly perturbs the script.
    ///
    /// Each command may get one action bit flipped or its duration jittered;
    /// with a small probability the whole sequence is regenerated instead.
    pub fn mutate(&mut self) {
        self.perturb_commands();

        if self.rng.random::<f32>() < REGENERATE_PROBABILITY {
            trace!("brain regenerated its command sequence");
            self.generate_commands();
        }

        if self.current_command >= self.commands.len() {
            self.current_command = 0;
        }
    }

    /// Flips at most one bit of each command and jitters durations by up to
    /// three ticks, never below five.
    pub fn perturb_commands(&mut self) {
        for command in &mut self.commands {
            if self.rng.random::<f32>() < BIT_MUTATION_PROBABILITY
                && !command.muscle_actions.is_empty()
            {
                let idx = self.rng.random_range(0..command.muscle_actions.len());
                command.muscle_actions[idx] = !command.muscle_actions[idx];
            }
            if self.rng.random::<f32>() < DURATION_MUTATION_PROBABILITY {
                let jitter = self.rng.random_range(-DURATION_JITTER..=DURATION_JITTER);
                command.duration = (command.duration as i64 + jitter).max(MIN_DURATION as i64) as u32;
            }
        }
    }
}
