mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use space_invader::compute::{play_again_button, GameState};
use space_invader::config::{AlienVisual, GameConfig};
use space_invader::entities::{AudioCue, GameEvent, GamePhase, TickInput};
use space_invader::pixil::load_sprite_set;
use space_invader::snapshot::snapshot;

use display::Viewport;

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// Frames a movement key stays down after its last press or repeat.  Many
/// terminals never report releases, and key repeat refreshes well inside
/// 8 ticks (about 133 ms at 60 ticks per second).
const HOLD_WINDOW: u64 = 8;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// A press counts as new only if the key was not already held.  Without
/// release reporting, OS auto-repeat arrives as a stream of presses.
fn is_fresh_press(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    !is_held(key_frame, key, frame)
}

// ── Assets & logging ──────────────────────────────────────────────────────────

fn asset_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Logs go to a file so they never scribble over the alternate screen.
fn init_logging() {
    let path = std::env::temp_dir().join("space_invader.log");
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Ok(file) = File::create(&path) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

/// Sound output is not wired up in the terminal build; cues are only logged.
fn play_cue(cue: AudioCue) {
    log::trace!("audio cue {:?}", cue);
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(GameConfig),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  SPACE  INVADER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select a swarm:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Classic  ", Color::Green, "Block invaders, they shoot from the start"),
        ("2", "Pixel art", Color::Magenta, "Animated invaders, first wave holds fire"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<10}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("  {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 3))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Wait for a choice
    loop {
        if let Ok(Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        })) = rx.recv()
        {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(GameConfig::classic())),
                KeyCode::Char('2') => return Ok(MenuResult::Start(GameConfig::pixel_art())),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the game reaches `GamePhase::Exit`.
///
/// Movement keys are tracked in a `key_frame` map holding the frame each key
/// was last pressed or repeated, so left/right and fire combine freely.
/// Fire itself is edge-triggered: only a fresh press shoots.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let frame_time = Duration::from_secs(1) / state.config.tick_rate.max(1);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    let left_keys = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
    let right_keys = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

    loop {
        let frame_start = Instant::now();
        frame += 1;

        let (cols, rows) = terminal::size()?;
        let view = Viewport::new(cols, rows, state.config.screen_width, state.config.screen_height);
        let mut input = TickInput::default();

        // Input gathered since the last tick
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        let fresh = is_fresh_press(&key_frame, &code, frame);
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                input.quit = true;
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                input.quit = true;
                            }
                            KeyCode::Char(' ') => input.fire |= fresh,
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if state.phase == GamePhase::GameOver =>
                            {
                                let button = play_again_button(&state.config);
                                input.click = Some((button.center_x(), button.y + button.h / 2));
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    input.click = Some(view.to_screen(column, row));
                }
                _ => {}
            }
        }

        input.left = any_held(&key_frame, &left_keys, frame);
        input.right = any_held(&key_frame, &right_keys, frame);

        for event in state.tick(&input, &mut rng) {
            match event {
                GameEvent::Audio(cue) => play_cue(cue),
                other => log::debug!("{:?}", other),
            }
        }

        if state.phase == GamePhase::Exit {
            return Ok(());
        }

        display::render(out, &snapshot(state), &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    // Release events where the terminal supports them; otherwise HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen off the game thread.
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

    let result = run(&mut out, &rx);

    // Restore the terminal even if the game failed
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<()> {
    let config = match show_menu(out, rx)? {
        MenuResult::Quit => return Ok(()),
        MenuResult::Start(config) => config,
    };

    let sprites = match &config.swarm.visual {
        AlienVisual::PixelSprites { resources, .. } => load_sprite_set(&asset_dir(), resources),
        AlienVisual::Rects { .. } => Vec::new(),
    };

    let mut state = GameState::new(config, sprites, &mut thread_rng());
    game_loop(out, &mut state, rx)?;
    log::info!("exiting with best score {}", state.score.best);
    Ok(())
}
