//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state. No game logic is performed; this module only maps unit
//! playfield coordinates onto terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use skyshot::entities::Exposed;
use skyshot::game::Game;
use skyshot::wave::Wave;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_BORDER_MISS: Color = Color::Red;
const C_STATUS: Color = Color::Yellow;
const C_AVATAR: Color = Color::Blue;
const C_TARGET: Color = Color::Red;
const C_BULLET: Color = Color::Cyan;
const C_MARKER: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Terminal-cell geometry of the playfield.
struct Grid {
    width: u16,
    height: u16,
}

impl Grid {
    /// Top field row: y = 1.0.
    fn top(&self) -> u16 {
        2
    }

    /// Baseline row: y = 0.0. The avatar sits one row below it.
    fn baseline(&self) -> u16 {
        self.height.saturating_sub(4)
    }

    fn col(&self, x: f64) -> u16 {
        let span = self.width.saturating_sub(3) as f64;
        1 + (x.clamp(0.0, 1.0) * span).round() as u16
    }

    fn row(&self, y: f64) -> u16 {
        let span = self.baseline().saturating_sub(self.top()) as f64;
        self.baseline()
            .saturating_sub((y.clamp(0.0, 1.0) * span).round() as u16)
    }

    /// Row of the avatar lane, below the baseline.
    fn avatar_row(&self) -> u16 {
        (self.baseline() + 2).min(self.height.saturating_sub(1))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame. `miss_flash` recolours the border for
/// frames on which a target escaped.
pub fn render<W: Write>(
    out: &mut W,
    game: &Game,
    width: u16,
    height: u16,
    miss_flash: bool,
) -> std::io::Result<()> {
    let grid = Grid { width, height };

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, &grid, miss_flash)?;
    draw_status(out, game, &grid)?;
    draw_wave(out, game.targets.as_ref(), &grid, C_TARGET, '▬')?;
    draw_wave(out, game.bullets.as_ref(), &grid, C_BULLET, '•')?;
    draw_markers(out, game, &grid)?;
    draw_avatar(out, game, &grid)?;
    draw_hint(out, &grid)?;
    if game.gameover {
        draw_game_over(out, game, &grid)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border & chrome ───────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, grid: &Grid, miss_flash: bool) -> std::io::Result<()> {
    let w = grid.width as usize;
    let color = if miss_flash { C_BORDER_MISS } else { C_BORDER };
    out.queue(style::SetForegroundColor(color))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    for row in 2..grid.height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(grid.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    out.queue(cursor::MoveTo(0, grid.height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Baseline separating the field from the avatar lane
    out.queue(cursor::MoveTo(1, grid.baseline() + 1))?;
    out.queue(Print("┈".repeat(w.saturating_sub(2))))?;
    Ok(())
}

fn draw_status<W: Write>(out: &mut W, game: &Game, _grid: &Grid) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_STATUS))?;
    out.queue(Print(&game.status))?;
    Ok(())
}

fn draw_hint<W: Write>(out: &mut W, grid: &Grid) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, grid.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SHIFT : Boost   Q : Quit"))?;
    Ok(())
}

// ── Sprites ───────────────────────────────────────────────────────────────────

fn draw_wave<W: Write>(
    out: &mut W,
    wave: &dyn Wave,
    grid: &Grid,
    color: Color,
    glyph: char,
) -> std::io::Result<()> {
    let mut sprites: Vec<Exposed> = Vec::new();
    wave.exposed(&mut sprites);

    out.queue(style::SetForegroundColor(color))?;
    for s in &sprites {
        let col = grid.col(s.x);
        let row = grid.row(wave.row_y(s.row));
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_markers<W: Write>(out: &mut W, game: &Game, grid: &Grid) -> std::io::Result<()> {
    let mut markers: Vec<(f64, f64)> = Vec::new();
    game.hits.markers(&mut markers);

    out.queue(style::SetForegroundColor(C_MARKER))?;
    for &(x, y) in &markers {
        out.queue(cursor::MoveTo(grid.col(x), grid.row(y)))?;
        out.queue(Print('✶'))?;
    }
    Ok(())
}

fn draw_avatar<W: Write>(out: &mut W, game: &Game, grid: &Grid) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_AVATAR))?;
    out.queue(cursor::MoveTo(grid.col(game.avatar.x), grid.avatar_row()))?;
    out.queue(Print('▲'))?;
    Ok(())
}

// ── Game over ─────────────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, game: &Game, grid: &Grid) -> std::io::Result<()> {
    let cx = grid.width / 2;
    let cy = grid.height / 2;

    out.queue(cursor::MoveTo(
        cx.saturating_sub(game.status.chars().count() as u16 / 2),
        cy,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&game.status))?;

    let hint = "press any key to exit";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(hint.chars().count() as u16 / 2),
        cy + 2,
    ))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}
