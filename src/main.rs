mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::Print,
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::RngCore;

use skyshot::config::Config;
use skyshot::entities::{FrameInput, MoveCommand};
use skyshot::game::{Game, WaveModel};

// ── Held-key model ────────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived
/// within this many frames. Covers terminals that don't emit
/// key-release events: the OS key-repeat refreshes the entry before it
/// expires.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── CLI ───────────────────────────────────────────────────────────────────────

struct Args {
    config: Option<String>,
    model: WaveModel,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        model: WaveModel::FixedWindow,
        seed: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--windowed" => args.model = WaveModel::FixedWindow,
            "--timed" => args.model = WaveModel::EventTimed,
            "--seed" => {
                let v = it.next().ok_or("--seed needs a value")?;
                args.seed = Some(v.parse().map_err(|_| format!("bad seed: {v}"))?);
            }
            "--help" | "-h" => {
                return Err("usage: skyshot [config.toml] [--windowed|--timed] [--seed N]".into())
            }
            path if !path.starts_with('-') => args.config = Some(path.to_string()),
            other => return Err(format!("unknown option: {other}")),
        }
    }
    Ok(args)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs one game to completion. Input events arrive over `rx`; each
/// frame the held directional keys are folded into one move command.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let frame_budget = Duration::from_millis(1000 / game.fps.max(1) as u64);

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut boost_frame: u64 = 0;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut quit = false;

        // Drain all pending input events (non-blocking)
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                    if modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::CONTROL) {
                        boost_frame = frame;
                    }
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => quit = true,
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            quit = true
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let left = is_held(&key_frame, &KeyCode::Left, frame)
            || is_held(&key_frame, &KeyCode::Char('a'), frame)
            || is_held(&key_frame, &KeyCode::Char('A'), frame);
        let right = is_held(&key_frame, &KeyCode::Right, frame)
            || is_held(&key_frame, &KeyCode::Char('d'), frame)
            || is_held(&key_frame, &KeyCode::Char('D'), frame);
        let boost = frame.saturating_sub(boost_frame) <= HOLD_WINDOW;

        let input = FrameInput {
            movec: MoveCommand::compose(left, right, boost),
            quit,
        };
        let events = game.tick(input);

        let (width, height) = terminal::size()?;
        display::render(out, game, width, height, events.miss)?;

        // Audio cue: terminal bell on a hit frame. Terminals without a
        // bell simply ignore it.
        if events.hit {
            out.queue(Print('\x07'))?;
            out.flush()?;
        }

        if game.gameover {
            // Final status stays on screen until a key is pressed.
            loop {
                match rx.recv() {
                    Ok(Event::Key(KeyEvent { kind: KeyEventKind::Press, .. })) | Err(_) => {
                        return Ok(());
                    }
                    _ => {}
                }
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    // Log to a file when requested; stderr would corrupt raw mode.
    if let Ok(path) = std::env::var("SKYSHOT_LOG") {
        if let Ok(file) = File::create(path) {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
    }

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let cfg = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("{err}");
                return Ok(());
            }
        },
        None => Config::default(),
    };

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut game = match Game::new(&cfg, args.model, seed) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return Ok(());
        }
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending
    // them through a channel so the game loop never blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut game, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
