//! Wave engine: managed populations of transient sprites.
//!
//! A wave exposes at most `window` sprites at a time; a sprite enters at
//! one border of the playfield and crosses to the other over exactly
//! `window` frame transitions. Two storage strategies implement the same
//! contract:
//!
//! * [`WindowedWave`] — double-length ring buffer with a per-frame slot
//!   and random per-slot visibility.
//! * [`TimedWave`] — explicit birth-frames and a compacting arena with a
//!   live-index list.
//!
//! What kind of sprite a wave carries (targets vs. bullets) is decided by
//! its [`Spawner`], which generates content and receives the
//! entering/leaving hooks.

mod timed;
mod windowed;

pub use timed::TimedWave;
pub use windowed::WindowedWave;

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Geometric};

use crate::entities::{Exposed, FrameEvents, Orientation};

/// Shared contract of both wave engines. Object-safe so the game can
/// hold either variant behind `Box<dyn Wave>`.
pub trait Wave {
    /// Number of exposure rows, equal to the frames a sprite stays exposed.
    fn window(&self) -> usize;

    fn orientation(&self) -> Orientation;

    /// Vertical position of an exposure row.
    fn row_y(&self, row: usize) -> f64 {
        self.orientation().row_y(row, self.window())
    }

    /// Advance one frame transition, firing entering/leaving hooks.
    fn update(&mut self, avatar_x: f64, events: &mut FrameEvents);

    /// Collect the currently-exposed sprites into `out` (cleared first).
    /// Never yields more than `window()` entries.
    fn exposed(&self, out: &mut Vec<Exposed>);

    /// Remove a sprite from play; `slot` comes from [`Wave::exposed`]
    /// and stays valid until the next update.
    fn deactivate(&mut self, slot: usize);

    /// Cumulative score owned by this wave (misses for targets).
    fn score(&self) -> u32;
}

/// Content generation and lifecycle hooks for one kind of sprite.
///
/// `fill_page` serves the windowed engine (visibility flags per slot),
/// `fill_timed` the timed engine (explicit birth-frames). Both fill the
/// given slices completely; slice lengths are chosen by the engine.
pub trait Spawner {
    fn orientation(&self) -> Orientation;

    fn fill_page(
        &mut self,
        window: usize,
        rng: &mut StdRng,
        xpos: &mut [f64],
        xspeed: &mut [f64],
        visible: &mut [bool],
    );

    /// Birth-frames must be strictly increasing, starting after `t`.
    fn fill_timed(
        &mut self,
        window: usize,
        t: i64,
        rng: &mut StdRng,
        xpos: &mut [f64],
        xspeed: &mut [f64],
        born: &mut [i64],
    );

    /// Fired once when a sprite becomes exposed; may adjust its position.
    fn entering(&mut self, _x: &mut f64, _avatar_x: f64) {}

    /// Fired once when an exposed sprite ages out unintercepted.
    fn leaving(&mut self, _events: &mut FrameEvents) {}

    fn score(&self) -> u32 {
        0
    }
}

/// Targets fall from the top; spawning is stochastic at `rate` per
/// second and every escape counts as a miss.
pub struct TargetSpawner {
    /// Per-frame spawn probability, in (0,1].
    p: f64,
    geo: Geometric,
    score: u32,
}

impl TargetSpawner {
    /// `rate` must lie in (0, fps]; enforced by config validation.
    pub fn new(rate: f64, fps: u32) -> TargetSpawner {
        let p = rate / fps as f64;
        TargetSpawner {
            p,
            geo: Geometric::new(p).expect("spawn probability in (0,1]"),
            score: 0,
        }
    }
}

impl Spawner for TargetSpawner {
    fn orientation(&self) -> Orientation {
        Orientation::Down
    }

    fn fill_page(
        &mut self,
        window: usize,
        rng: &mut StdRng,
        xpos: &mut [f64],
        xspeed: &mut [f64],
        visible: &mut [bool],
    ) {
        for i in 0..xpos.len() {
            let start: f64 = rng.gen();
            let end: f64 = rng.gen();
            xpos[i] = start;
            xspeed[i] = (end - start) / window as f64;
            visible[i] = rng.gen::<f64>() < self.p;
        }
    }

    fn fill_timed(
        &mut self,
        window: usize,
        t: i64,
        rng: &mut StdRng,
        xpos: &mut [f64],
        xspeed: &mut [f64],
        born: &mut [i64],
    ) {
        let mut tail = t;
        for i in 0..xpos.len() {
            let start: f64 = rng.gen();
            let end: f64 = rng.gen();
            xpos[i] = start;
            xspeed[i] = (end - start) / window as f64;
            // Geometric inter-arrival gaps of at least one frame.
            tail += 1 + self.geo.sample(rng) as i64;
            born[i] = tail;
        }
    }

    fn leaving(&mut self, events: &mut FrameEvents) {
        self.score += 1;
        events.miss = true;
    }

    fn score(&self) -> u32 {
        self.score
    }
}

/// Bullets rise from the bottom on a fixed reload cadence and lock onto
/// the avatar's position the instant they spawn.
pub struct BulletSpawner {
    /// Frames between consecutive bullets, at least 1.
    rload: usize,
}

impl BulletSpawner {
    /// `rload * fps` must be at least one frame; enforced by config
    /// validation.
    pub fn new(rload: f64, fps: u32) -> BulletSpawner {
        BulletSpawner {
            rload: (rload * fps as f64) as usize,
        }
    }
}

impl Spawner for BulletSpawner {
    fn orientation(&self) -> Orientation {
        Orientation::Up
    }

    fn fill_page(
        &mut self,
        _window: usize,
        _rng: &mut StdRng,
        xpos: &mut [f64],
        xspeed: &mut [f64],
        visible: &mut [bool],
    ) {
        for i in 0..xpos.len() {
            // Placeholder; the entering hook snaps x to the avatar.
            xpos[i] = 0.5;
            xspeed[i] = 0.0;
            visible[i] = i % self.rload == 0;
        }
    }

    fn fill_timed(
        &mut self,
        _window: usize,
        t: i64,
        _rng: &mut StdRng,
        xpos: &mut [f64],
        xspeed: &mut [f64],
        born: &mut [i64],
    ) {
        for i in 0..xpos.len() {
            xpos[i] = 0.5;
            xspeed[i] = 0.0;
            born[i] = t + self.rload as i64 * (i as i64 + 1);
        }
    }

    fn entering(&mut self, x: &mut f64, avatar_x: f64) {
        *x = avatar_x;
    }
}
