use skyshot::entities::{Exposed, FrameEvents, Orientation};
use skyshot::hits::Hits;
use skyshot::wave::Wave;

/// Scripted wave: exposes exactly the sprites it is told to and records
/// deactivations, so collision geometry can be pinned down exactly.
struct StubWave {
    window: usize,
    orientation: Orientation,
    sprites: Vec<Exposed>,
    dead: Vec<usize>,
}

impl StubWave {
    fn new(window: usize, orientation: Orientation) -> StubWave {
        StubWave {
            window,
            orientation,
            sprites: Vec::new(),
            dead: Vec::new(),
        }
    }

    fn with_sprite(mut self, slot: usize, row: usize, x: f64, vx: f64) -> StubWave {
        self.sprites.push(Exposed { slot, row, x, vx });
        self
    }
}

impl Wave for StubWave {
    fn window(&self) -> usize {
        self.window
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn update(&mut self, _avatar_x: f64, _events: &mut FrameEvents) {}

    fn exposed(&self, out: &mut Vec<Exposed>) {
        out.clear();
        out.extend(self.sprites.iter().copied());
    }

    fn deactivate(&mut self, slot: usize) {
        self.dead.push(slot);
        self.sprites.retain(|s| s.slot != slot);
    }

    fn score(&self) -> u32 {
        0
    }
}

fn markers_of(hits: &Hits) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    hits.markers(&mut out);
    out
}

// ── Clash matrix ──────────────────────────────────────────────────────────────

#[test]
fn clashmat_matches_row_geometry() {
    let targets = StubWave::new(25, Orientation::Down);
    let bullets = StubWave::new(100, Orientation::Up);
    let hits = Hits::new(&targets, &bullets, 10, 0.02);

    let closing = 1.0 / 25.0 + 1.0 / 100.0;
    for &(i, j) in &[(0, 0), (20, 20), (24, 99), (12, 50)] {
        let expect = (targets.row_y(i) - bullets.row_y(j)) / closing;
        assert!((hits.clash(i, j) - expect).abs() < 1e-12);
    }
    // rows at equal height coincide immediately
    assert_eq!(hits.clash(24, 0), 0.0); // both at y = 1
    assert_eq!(hits.clash(0, 99), 0.0); // both at y = 0
}

// ── Collision scenario (fps=25 geometry from the reference tuning) ────────────

#[test]
fn aligned_pair_scores_exactly_one_hit() {
    let mut targets = StubWave::new(25, Orientation::Down).with_sprite(7, 20, 0.5, 0.0);
    let mut bullets = StubWave::new(100, Orientation::Up).with_sprite(3, 20, 0.5, 0.0);
    let mut hits = Hits::new(&targets, &bullets, 10, 0.02);

    // precondition of the scenario: the rows coincide within this frame
    let m = hits.clash(20, 20);
    assert!((0.0..=1.0).contains(&m));

    let mut events = FrameEvents::default();
    hits.update(&mut targets, &mut bullets, &mut events);

    assert_eq!(hits.score, 1);
    assert!(events.hit);
    assert_eq!(targets.dead, vec![7]);
    assert_eq!(bullets.dead, vec![3]);
    assert_eq!(markers_of(&hits), vec![(0.5, targets.row_y(20))]);
}

#[test]
fn horizontal_extrapolation_uses_coincidence_time() {
    let mut targets = StubWave::new(25, Orientation::Down).with_sprite(0, 20, 0.5, 0.0);
    let mut bullets = StubWave::new(100, Orientation::Up).with_sprite(0, 20, 0.5, 0.0);
    let mut hits = Hits::new(&targets, &bullets, 10, 0.02);
    let m = hits.clash(20, 20);
    assert!(m > 0.5 && m <= 1.0);

    // dx alone exceeds tol, but dx + dv*m comes back inside it
    let dx = 0.03;
    targets.sprites[0].x = 0.5;
    bullets.sprites[0].x = 0.5 + dx;
    bullets.sprites[0].vx = -dx / m;

    let mut events = FrameEvents::default();
    hits.update(&mut targets, &mut bullets, &mut events);
    assert_eq!(hits.score, 1);

    // same geometry with no horizontal speed stays a miss
    let mut targets = StubWave::new(25, Orientation::Down).with_sprite(0, 20, 0.5, 0.0);
    let mut bullets = StubWave::new(100, Orientation::Up).with_sprite(0, 20, 0.5 + dx, 0.0);
    let mut hits = Hits::new(&targets, &bullets, 10, 0.02);
    let mut events = FrameEvents::default();
    hits.update(&mut targets, &mut bullets, &mut events);
    assert_eq!(hits.score, 0);
}

#[test]
fn coincidence_outside_this_frame_is_ignored() {
    // target at the bottom, bullet at the top: they met in the past
    let mut targets = StubWave::new(25, Orientation::Down).with_sprite(0, 0, 0.5, 0.0);
    let mut bullets = StubWave::new(100, Orientation::Up).with_sprite(0, 0, 0.5, 0.0);
    let mut hits = Hits::new(&targets, &bullets, 10, 0.02);
    assert!(hits.clash(0, 0) < 0.0);

    let mut events = FrameEvents::default();
    hits.update(&mut targets, &mut bullets, &mut events);
    assert_eq!(hits.score, 0);
    assert!(!events.hit);
    assert!(targets.dead.is_empty());

    // far apart in the other direction: they meet many frames from now
    let mut targets = StubWave::new(25, Orientation::Down).with_sprite(0, 24, 0.5, 0.0);
    let mut bullets = StubWave::new(100, Orientation::Up).with_sprite(0, 99, 0.5, 0.0);
    let mut hits = Hits::new(&targets, &bullets, 10, 0.02);
    assert!(hits.clash(24, 99) > 1.0);
    let mut events = FrameEvents::default();
    hits.update(&mut targets, &mut bullets, &mut events);
    assert_eq!(hits.score, 0);
}

#[test]
fn empty_waves_are_a_no_op() {
    let mut targets = StubWave::new(25, Orientation::Down);
    let mut bullets = StubWave::new(100, Orientation::Up).with_sprite(0, 50, 0.5, 0.0);
    let mut hits = Hits::new(&targets, &bullets, 10, 0.02);

    let mut events = FrameEvents::default();
    hits.update(&mut targets, &mut bullets, &mut events);
    hits.update(&mut bullets, &mut targets, &mut events); // empty on the other side
    assert_eq!(hits.score, 0);
    assert_eq!(events, FrameEvents::default());
}

#[test]
fn one_collision_per_sprite_per_frame() {
    // two bullets aligned with one target: first match wins, the second
    // bullet survives for the next frame
    let mut targets = StubWave::new(25, Orientation::Down).with_sprite(1, 20, 0.5, 0.0);
    let mut bullets = StubWave::new(100, Orientation::Up)
        .with_sprite(4, 20, 0.5, 0.0)
        .with_sprite(5, 20, 0.501, 0.0);
    let mut hits = Hits::new(&targets, &bullets, 10, 0.02);

    let mut events = FrameEvents::default();
    hits.update(&mut targets, &mut bullets, &mut events);
    assert_eq!(hits.score, 1);
    assert_eq!(targets.dead, vec![1]);
    assert_eq!(bullets.dead, vec![4]);
    assert_eq!(bullets.sprites.len(), 1);
}

// ── Marker lifecycle ──────────────────────────────────────────────────────────

#[test]
fn marker_visible_for_exactly_timeout_frames() {
    let mut targets = StubWave::new(25, Orientation::Down).with_sprite(0, 20, 0.5, 0.0);
    let mut bullets = StubWave::new(100, Orientation::Up).with_sprite(0, 20, 0.5, 0.0);
    let mut hits = Hits::new(&targets, &bullets, 3, 0.02);

    let mut events = FrameEvents::default();
    hits.update(&mut targets, &mut bullets, &mut events);
    assert_eq!(hits.score, 1);
    assert_eq!(markers_of(&hits).len(), 1); // collision frame F

    // both sprites are gone now; only the marker ages
    for frame in 1..3 {
        hits.update(&mut targets, &mut bullets, &mut events);
        assert_eq!(markers_of(&hits).len(), 1, "frame F+{frame}");
    }
    hits.update(&mut targets, &mut bullets, &mut events);
    assert!(markers_of(&hits).is_empty(), "frame F+timeout");

    // never resurrects
    for _ in 0..10 {
        hits.update(&mut targets, &mut bullets, &mut events);
        assert!(markers_of(&hits).is_empty());
    }
}

#[test]
fn new_hit_rewrites_the_row_marker() {
    let mut targets = StubWave::new(25, Orientation::Down).with_sprite(0, 20, 0.3, 0.0);
    let mut bullets = StubWave::new(100, Orientation::Up).with_sprite(0, 20, 0.3, 0.0);
    let mut hits = Hits::new(&targets, &bullets, 5, 0.02);
    let mut events = FrameEvents::default();
    hits.update(&mut targets, &mut bullets, &mut events);
    assert_eq!(markers_of(&hits)[0].0, 0.3);

    // a later hit on the same row moves the marker and resets its clock
    let mut targets = StubWave::new(25, Orientation::Down).with_sprite(9, 20, 0.8, 0.0);
    let mut bullets = StubWave::new(100, Orientation::Up).with_sprite(9, 20, 0.8, 0.0);
    hits.update(&mut targets, &mut bullets, &mut events);
    let markers = markers_of(&hits);
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].0, 0.8);
    assert_eq!(hits.score, 2);
}
