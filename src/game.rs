//! Frame orchestrator: wires the avatar, the two waves and the
//! collision detector, and owns the scalar session state.

use std::time::Instant;

use log::info;

use crate::avatar::Avatar;
use crate::config::{Config, ConfigError};
use crate::entities::{FrameEvents, FrameInput};
use crate::hits::Hits;
use crate::wave::{BulletSpawner, TargetSpawner, TimedWave, Wave, WindowedWave};

/// Which wave engine drives the session. A closed set: the fixed-window
/// ring buffer, or the event-timed compacting arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveModel {
    FixedWindow,
    EventTimed,
}

pub struct Game {
    pub fps: u32,
    pub avatar: Avatar,
    pub targets: Box<dyn Wave>,
    pub bullets: Box<dyn Wave>,
    pub hits: Hits,
    /// Frame transitions performed so far.
    pub nstep: u64,
    pub gameover: bool,
    /// Status-bar text, frozen once the game is over.
    pub status: String,
    /// Running average of per-tick processing time, in seconds.
    pub perf: f64,
}

impl Game {
    pub fn new(cfg: &Config, model: WaveModel, seed: u64) -> Result<Game, ConfigError> {
        cfg.validate()?;

        let tw = cfg.window(cfg.targets.v);
        let bw = cfg.window(cfg.bullets.v);
        let tspawn = TargetSpawner::new(cfg.targets.rate, cfg.fps);
        let bspawn = BulletSpawner::new(cfg.bullets.rload, cfg.fps);
        // Distinct per-wave streams derived from one session seed.
        let (tseed, bseed) = (seed, seed ^ 0x9e37_79b9_7f4a_7c15);

        let (targets, bullets): (Box<dyn Wave>, Box<dyn Wave>) = match model {
            WaveModel::FixedWindow => (
                Box::new(WindowedWave::new(tw, tspawn, tseed)),
                Box::new(WindowedWave::new(bw, bspawn, bseed)),
            ),
            WaveModel::EventTimed => (
                Box::new(TimedWave::new(tw, tspawn, tseed)),
                Box::new(TimedWave::new(bw, bspawn, bseed)),
            ),
        };

        let hits = Hits::new(
            targets.as_ref(),
            bullets.as_ref(),
            cfg.timeout_frames(),
            cfg.targets.width / 2.0,
        );

        info!(
            "new {model:?} game: fps={} target rows={tw} bullet rows={bw} seed={seed}",
            cfg.fps
        );

        Ok(Game {
            fps: cfg.fps,
            avatar: Avatar::new(&cfg.avatar, cfg.fps),
            targets,
            bullets,
            hits,
            nstep: 0,
            gameover: false,
            status: "time: 0".to_string(),
            perf: 0.0,
        })
    }

    /// Advance one frame transition. A no-op once the game is over.
    ///
    /// Hits must run after both waves have moved, so the fixed order is
    /// Avatar, Targets, Bullets, Hits.
    pub fn tick(&mut self, input: FrameInput) -> FrameEvents {
        let mut events = FrameEvents::default();
        if self.gameover {
            return events;
        }
        let start = Instant::now();

        if input.quit {
            self.gameover = true;
            self.status = format!(
                "Game over. Efficiency (logic): {:.2}%",
                self.perf * self.fps as f64 * 100.0
            );
            return events;
        }

        self.avatar.update(input.movec);
        self.targets.update(self.avatar.x, &mut events);
        self.bullets.update(self.avatar.x, &mut events);
        self.hits
            .update(self.targets.as_mut(), self.bullets.as_mut(), &mut events);

        self.nstep += 1;
        self.status = format!(
            "time: {:06.1}; hit: {}; miss: {}; score: {}",
            self.nstep as f64 / self.fps as f64,
            self.hit_count(),
            self.miss_count(),
            self.score_text(),
        );
        let elapsed = start.elapsed().as_secs_f64();
        self.perf += (elapsed - self.perf) / self.nstep as f64;
        events
    }

    pub fn hit_count(&self) -> u32 {
        self.hits.score
    }

    pub fn miss_count(&self) -> u32 {
        self.targets.score()
    }

    /// Hit percentage formatted to two decimals, or `"*"` before the
    /// first hit or miss (no division by a zero total).
    pub fn score_text(&self) -> String {
        let hit = self.hit_count();
        let total = hit + self.miss_count();
        if total == 0 {
            "*".to_string()
        } else {
            format!("{:.2}", 100.0 * hit as f64 / total as f64)
        }
    }
}
