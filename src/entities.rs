/// Shared game data types — pure data, no logic beyond small helpers.

/// Per-frame horizontal move command, worth −2..=+2 avatar steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MoveCommand {
    FastLeft,
    Left,
    #[default]
    Stay,
    Right,
    FastRight,
}

impl MoveCommand {
    /// Number of avatar speed units this command is worth.
    pub fn steps(self) -> f64 {
        match self {
            MoveCommand::FastLeft => -2.0,
            MoveCommand::Left => -1.0,
            MoveCommand::Stay => 0.0,
            MoveCommand::Right => 1.0,
            MoveCommand::FastRight => 2.0,
        }
    }

    /// Compose a command from held-key state. Opposing directions
    /// cancel; `boost` doubles the step.
    pub fn compose(left: bool, right: bool, boost: bool) -> MoveCommand {
        match (left, right, boost) {
            (true, false, false) => MoveCommand::Left,
            (true, false, true) => MoveCommand::FastLeft,
            (false, true, false) => MoveCommand::Right,
            (false, true, true) => MoveCommand::FastRight,
            _ => MoveCommand::Stay,
        }
    }
}

/// External input for one frame transition.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub movec: MoveCommand,
    pub quit: bool,
}

/// Events raised during one frame transition, consumed by the notifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameEvents {
    /// At least one target was hit this frame.
    pub hit: bool,
    /// At least one target escaped unintercepted this frame.
    pub miss: bool,
}

/// Traversal direction of a wave across the unit playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Sprites enter at the top (y=1) and exit at the bottom (y=0).
    Down,
    /// Sprites enter at the bottom (y=0) and exit at the top (y=1).
    Up,
}

impl Orientation {
    /// Vertical position of row `row` in a wave of `window` rows.
    ///
    /// Row 0 is the oldest sprite (about to leave), row `window-1` the
    /// newest. A degenerate single-row wave sits at y=0 either way.
    pub fn row_y(self, row: usize, window: usize) -> f64 {
        if window <= 1 {
            return 0.0;
        }
        let t = row as f64 / (window as f64 - 1.0);
        match self {
            Orientation::Down => t,
            Orientation::Up => 1.0 - t,
        }
    }
}

/// One currently-exposed sprite, as reported by `Wave::exposed`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exposed {
    /// Index into the wave's backing store; valid for `Wave::deactivate`
    /// until the wave's next update.
    pub slot: usize,
    /// Row within the exposure window, in [0, window): 0 is oldest.
    pub row: usize,
    /// Horizontal position in x-units.
    pub x: f64,
    /// Horizontal speed in x-units per frame.
    pub vx: f64,
}
