use crate::config::AvatarConfig;
use crate::entities::MoveCommand;

/// The player's ship: a single point sliding along the bottom edge.
#[derive(Clone, Debug)]
pub struct Avatar {
    /// Horizontal position in x-units, always within [0,1].
    pub x: f64,
    /// Fixed vertical position in y-units.
    pub y: f64,
    /// Horizontal speed in x-units per frame transition.
    xspeed: f64,
}

impl Avatar {
    pub fn new(cfg: &AvatarConfig, fps: u32) -> Avatar {
        Avatar {
            x: cfg.x,
            y: cfg.y,
            xspeed: cfg.v / fps as f64,
        }
    }

    /// Apply one frame's move command and clamp to the playfield.
    pub fn update(&mut self, cmd: MoveCommand) {
        self.x = (self.x + cmd.steps() * self.xspeed).clamp(0.0, 1.0);
    }
}
