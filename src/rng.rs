//! Injectable randomness
//!
//! Engines draw uniform values in [0, 1) through `UnitRng`. Any `rand`
//! generator works (production uses a seeded `Pcg32`); `ScriptedRng`
//! replays fixed draws so tests can force a specific branch.

use std::collections::VecDeque;

use rand::{Rng, RngCore};

/// Source of uniform draws in [0, 1)
pub trait UnitRng {
    fn next_unit(&mut self) -> f64;

    /// Uniform draw in [min, max)
    fn next_in(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_unit() * (max - min)
    }
}

impl<R: RngCore> UnitRng for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays a fixed list of draws, then repeats the last one (0.0 if empty)
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    draws: VecDeque<f64>,
    last: f64,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws
                .into_iter()
                .map(|d| d.clamp(0.0, 1.0 - f64::EPSILON))
                .collect(),
            last: 0.0,
        }
    }

    /// Queue more draws
    pub fn push(&mut self, draw: f64) {
        self.draws.push_back(draw.clamp(0.0, 1.0 - f64::EPSILON));
    }

    /// Draws still queued
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl UnitRng for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        if let Some(draw) = self.draws.pop_front() {
            self.last = draw;
        }
        self.last
    }
}
