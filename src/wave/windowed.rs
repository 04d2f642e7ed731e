//! Fixed-window wave engine: a double-length ring buffer paged in halves.
//!
//! The backing arrays hold `2 * window` slots. A cursor `n` exposes the
//! slice `[n, n + window)`; one slot enters and one leaves per frame.
//! When the cursor has walked a full window, the second half is copied
//! over the first and regenerated, so no slot is ever reallocated.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::entities::{Exposed, FrameEvents, Orientation};
use crate::wave::{Spawner, Wave};

pub struct WindowedWave<S> {
    window: usize,
    /// Cursor into the backing arrays, in [0, window).
    cursor: usize,
    xpos: Vec<f64>,
    xspeed: Vec<f64>,
    visible: Vec<bool>,
    spawner: S,
    rng: StdRng,
}

impl<S: Spawner> WindowedWave<S> {
    /// `window` is the exposure span in frames; must be at least 1.
    pub fn new(window: usize, spawner: S, seed: u64) -> WindowedWave<S> {
        let mut wave = WindowedWave {
            window,
            cursor: 0,
            xpos: vec![0.0; 2 * window],
            xspeed: vec![0.0; 2 * window],
            visible: vec![false; 2 * window],
            spawner,
            rng: StdRng::seed_from_u64(seed),
        };
        wave.fill_back_half();
        wave
    }

    fn fill_back_half(&mut self) {
        let w = self.window;
        self.spawner.fill_page(
            w,
            &mut self.rng,
            &mut self.xpos[w..],
            &mut self.xspeed[w..],
            &mut self.visible[w..],
        );
    }
}

impl<S: Spawner> Wave for WindowedWave<S> {
    fn window(&self) -> usize {
        self.window
    }

    fn orientation(&self) -> Orientation {
        self.spawner.orientation()
    }

    fn update(&mut self, avatar_x: f64, events: &mut FrameEvents) {
        let n = self.cursor;
        let m = n + self.window;

        // The slot about to fall out of the window ages out now; the
        // slot about to enter gets its one-time entering hook.
        if self.visible[n] {
            self.spawner.leaving(events);
        }
        if self.visible[m] {
            self.spawner.entering(&mut self.xpos[m], avatar_x);
        }

        for i in n..m {
            self.xpos[i] += self.xspeed[i];
        }

        self.cursor = n + 1;
        if self.cursor == self.window {
            let w = self.window;
            self.xpos.copy_within(w.., 0);
            self.xspeed.copy_within(w.., 0);
            self.visible.copy_within(w.., 0);
            self.fill_back_half();
            self.cursor = 0;
        }
    }

    fn exposed(&self, out: &mut Vec<Exposed>) {
        out.clear();
        for row in 0..self.window {
            let slot = self.cursor + row;
            if self.visible[slot] {
                out.push(Exposed {
                    slot,
                    row,
                    x: self.xpos[slot],
                    vx: self.xspeed[slot],
                });
            }
        }
    }

    fn deactivate(&mut self, slot: usize) {
        self.visible[slot] = false;
    }

    fn score(&self) -> u32 {
        self.spawner.score()
    }
}
