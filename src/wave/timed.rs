//! Event-timed wave engine: explicit birth-frames over a sliding window.
//!
//! Sprites live in a fixed arena of `2 * window` slots. A sliding time
//! window `[tbeg, tbeg + window)` decides exposure: slot `i` is exposed
//! while `born[i] - tbeg` lies in `[0, window)`. The exposed-and-alive
//! slots are tracked densely in `ialive`, in admission order, and
//! compacted every frame with an order-preserving mask select. When the
//! admission pointer exhausts the arena, survivors are compacted to the
//! front and the spawner generates a fresh tail of birth-frames.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::entities::{Exposed, FrameEvents, Orientation};
use crate::wave::{Spawner, Wave};

pub struct TimedWave<S> {
    window: usize,
    /// Arena size, `2 * window`.
    size: usize,
    born: Vec<i64>,
    xpos: Vec<f64>,
    xspeed: Vec<f64>,
    alive: Vec<bool>,
    /// Arena indices of live exposed sprites; first `nalive` entries,
    /// in admission (hence birth) order.
    ialive: Vec<usize>,
    nalive: usize,
    /// Arena index of the next sprite to admit.
    nborn: usize,
    /// Birth-frame of that sprite.
    tborn: i64,
    /// Lower edge of the exposure window.
    tbeg: i64,
    spawner: S,
    rng: StdRng,
}

impl<S: Spawner> TimedWave<S> {
    /// `window` is the exposure span in frames; must be at least 1.
    pub fn new(window: usize, spawner: S, seed: u64) -> TimedWave<S> {
        let size = 2 * window;
        let mut wave = TimedWave {
            window,
            size,
            born: vec![0; size],
            xpos: vec![0.0; size],
            xspeed: vec![0.0; size],
            alive: vec![true; size],
            ialive: vec![0; window],
            nalive: 0,
            nborn: 0,
            tborn: 0,
            tbeg: 0,
            spawner,
            rng: StdRng::seed_from_u64(seed),
        };
        // First births start after the initial window edge, so the first
        // sprite is admitted the frame its birth reaches tend.
        let t0 = window as i64 - 1;
        wave.spawner.fill_timed(
            window,
            t0,
            &mut wave.rng,
            &mut wave.xpos,
            &mut wave.xspeed,
            &mut wave.born,
        );
        wave.tborn = wave.born[0];
        wave
    }
}

impl<S: Spawner> Wave for TimedWave<S> {
    fn window(&self) -> usize {
        self.window
    }

    fn orientation(&self) -> Orientation {
        self.spawner.orientation()
    }

    fn update(&mut self, avatar_x: f64, events: &mut FrameEvents) {
        let tend = self.tbeg + self.window as i64;

        if self.nalive > 0 {
            // Only the front can age out: births are strictly increasing
            // and the window slides one frame at a time.
            let front = self.ialive[0];
            if self.born[front] == self.tbeg && self.alive[front] {
                self.spawner.leaving(events);
                self.alive[front] = false;
            }
            // Mask-select the survivors, preserving order.
            let mut k = 0;
            for i in 0..self.nalive {
                let slot = self.ialive[i];
                if self.alive[slot] {
                    self.ialive[k] = slot;
                    k += 1;
                }
            }
            self.nalive = k;
        }

        if self.tborn == tend {
            let slot = self.nborn;
            self.ialive[self.nalive] = slot;
            self.nalive += 1;
            self.spawner.entering(&mut self.xpos[slot], avatar_x);
            self.nborn += 1;

            if self.nborn == self.size {
                // Arena exhausted: compact survivors to the front.
                // ialive is ascending, so forward copies cannot clobber.
                for i in 0..self.nalive {
                    let s = self.ialive[i];
                    self.born[i] = self.born[s];
                    self.xpos[i] = self.xpos[s];
                    self.xspeed[i] = self.xspeed[s];
                    self.ialive[i] = i;
                }
                self.nborn = self.nalive;
                let k = self.nborn;
                let w = self.window;
                self.spawner.fill_timed(
                    w,
                    tend,
                    &mut self.rng,
                    &mut self.xpos[k..],
                    &mut self.xspeed[k..],
                    &mut self.born[k..],
                );
                for flag in self.alive.iter_mut() {
                    *flag = true;
                }
            }
            self.tborn = self.born[self.nborn];
        }

        for i in 0..self.nalive {
            let slot = self.ialive[i];
            self.xpos[slot] += self.xspeed[slot];
        }
        self.tbeg += 1;
    }

    fn exposed(&self, out: &mut Vec<Exposed>) {
        out.clear();
        for i in 0..self.nalive {
            let slot = self.ialive[i];
            out.push(Exposed {
                slot,
                row: (self.born[slot] - self.tbeg) as usize,
                x: self.xpos[slot],
                vx: self.xspeed[slot],
            });
        }
    }

    fn deactivate(&mut self, slot: usize) {
        self.alive[slot] = false;
    }

    fn score(&self) -> u32 {
        self.spawner.score()
    }
}
