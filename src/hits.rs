//! Target/bullet collision detection and the fading hit-marker buffer.
//!
//! The two waves close on each other at a constant vertical speed, so
//! the fractional-frame instant at which target row `i` and bullet row
//! `j` would coincide vertically depends only on the two static row
//! maps. That instant is precomputed once into `clashmat`; per frame
//! only the horizontal test remains.

use log::debug;

use crate::entities::{Exposed, FrameEvents};
use crate::wave::Wave;

pub struct Hits {
    /// Marker lifetime in frames.
    timeout: u32,
    /// Horizontal tolerance in x-units (half the target width).
    tol: f64,
    /// Target row count; markers are indexed by target row.
    rows: usize,
    /// Bullet row count (clashmat column stride).
    cols: usize,
    /// `clashmat[i * cols + j]` = fractional-frame coincidence time of
    /// target row `i` and bullet row `j`. Immutable after construction.
    clashmat: Vec<f64>,
    /// Marker vertical positions, fixed per target row.
    ypos: Vec<f64>,
    /// Marker horizontal positions, overwritten per hit.
    xpos: Vec<f64>,
    /// Remaining marker visibility in frames, clamped to [0, timeout].
    weight: Vec<u32>,
    /// Cumulative hit count.
    pub score: u32,
    // Per-frame scratch, allocated once.
    tbuf: Vec<Exposed>,
    bbuf: Vec<Exposed>,
    tused: Vec<bool>,
    bused: Vec<bool>,
}

impl Hits {
    pub fn new(targets: &dyn Wave, bullets: &dyn Wave, timeout: u32, tol: f64) -> Hits {
        let rows = targets.window();
        let cols = bullets.window();
        let closing = 1.0 / rows as f64 + 1.0 / cols as f64;
        let mut clashmat = Vec::with_capacity(rows * cols);
        let mut ypos = Vec::with_capacity(rows);
        for i in 0..rows {
            let ty = targets.row_y(i);
            ypos.push(ty);
            for j in 0..cols {
                clashmat.push((ty - bullets.row_y(j)) / closing);
            }
        }
        Hits {
            timeout,
            tol,
            rows,
            cols,
            clashmat,
            ypos,
            xpos: vec![0.0; rows],
            weight: vec![0; rows],
            score: 0,
            tbuf: Vec::with_capacity(rows),
            bbuf: Vec::with_capacity(cols),
            tused: vec![false; rows],
            bused: vec![false; cols],
        }
    }

    /// Detect this frame's collisions, deactivate the sprites involved,
    /// and age the marker buffer.
    ///
    /// Must run after both waves have moved: the test extrapolates the
    /// current horizontal positions to the coincidence instant.
    pub fn update(
        &mut self,
        targets: &mut dyn Wave,
        bullets: &mut dyn Wave,
        events: &mut FrameEvents,
    ) {
        // Age first, so a marker set this frame survives its full
        // timeout starting now.
        for w in self.weight.iter_mut() {
            *w = w.saturating_sub(1).min(self.timeout);
        }

        targets.exposed(&mut self.tbuf);
        bullets.exposed(&mut self.bbuf);
        if self.tbuf.is_empty() || self.bbuf.is_empty() {
            return;
        }

        self.tused.truncate(0);
        self.tused.resize(self.tbuf.len(), false);
        self.bused.truncate(0);
        self.bused.resize(self.bbuf.len(), false);

        let mut count = 0u32;
        for (ti, t) in self.tbuf.iter().enumerate() {
            for (bi, b) in self.bbuf.iter().enumerate() {
                if self.bused[bi] {
                    continue;
                }
                // Coincidence must fall within this frame transition,
                // and the extrapolated horizontal gap inside tolerance.
                let m = self.clashmat[t.row * self.cols + b.row];
                if !(0.0..=1.0).contains(&m) {
                    continue;
                }
                let dx = b.x - t.x;
                let dv = b.vx - t.vx;
                if (dx + dv * m).abs() < self.tol {
                    // First match wins; one collision per sprite per frame.
                    self.tused[ti] = true;
                    self.bused[bi] = true;
                    self.weight[t.row] = self.timeout;
                    self.xpos[t.row] = t.x;
                    count += 1;
                    break;
                }
            }
        }

        if count > 0 {
            for (ti, t) in self.tbuf.iter().enumerate() {
                if self.tused[ti] {
                    targets.deactivate(t.slot);
                }
            }
            for (bi, b) in self.bbuf.iter().enumerate() {
                if self.bused[bi] {
                    bullets.deactivate(b.slot);
                }
            }
            self.score += count;
            events.hit = true;
            debug!("{count} hit(s), score {}", self.score);
        }
    }

    /// Marker lifetime in frames.
    pub fn timeout(&self) -> u32 {
        self.timeout
    }

    /// Number of marker rows (the target wave's window).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Coincidence time for a (target row, bullet row) pair.
    pub fn clash(&self, target_row: usize, bullet_row: usize) -> f64 {
        self.clashmat[target_row * self.cols + bullet_row]
    }

    /// Collect the (x, y) of currently visible hit markers.
    pub fn markers(&self, out: &mut Vec<(f64, f64)>) {
        out.clear();
        for row in 0..self.rows {
            if self.weight[row] > 0 {
                out.push((self.xpos[row], self.ypos[row]));
            }
        }
    }
}
