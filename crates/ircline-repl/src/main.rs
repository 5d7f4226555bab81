use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use futures::StreamExt;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use ircline_core::{ClientConfig, ClientEvent, OutputMode, OutputSink, Session};

// ANSI color codes
pub(crate) const YELLOW: &str = "\x1b[33m";
pub(crate) const DIM: &str = "\x1b[2m";
pub(crate) const RESET: &str = "\x1b[0m";

const TICK_INTERVAL_MS: u64 = 50;

mod backend;
mod completion;
mod editor;
mod render;
mod tracing_setup;

use backend::LoopbackConnector;
use completion::{tab_complete, TabOutcome};
use editor::LineEditor;
use render::{clear_input_line, print_above_input, redraw_input};

#[derive(Parser, Debug)]
#[command(name = "ircline")]
#[command(about = "Line-oriented IRC-style chat client")]
struct Args {
    /// Read commands line by line from stdin and write plain lines to stdout
    #[arg(long)]
    subprocess: bool,

    /// Config file (defaults to <config dir>/ircline/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Apply every backend event that has arrived.
fn drain_events(session: &mut Session, events: &Receiver<ClientEvent>) {
    for event in events.try_iter() {
        session.handle_event(event);
    }
}

// ─── Raw-stream mode ────────────────────────────────────────────────────────

/// Feed `input` to the session line by line. Bytes that are not UTF-8 are
/// replaced rather than rejected; only a failing reader is fatal.
async fn run_stream<R>(session: &mut Session, events: &Receiver<ClientEvent>, mut input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut tick = tokio::time::interval(tokio::time::Duration::from_millis(TICK_INTERVAL_MS));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    while !session.quit_requested() {
        tokio::select! {
            read = input.read_until(b'\n', &mut buf) => {
                let n = read.context("Couldn't get input.")?;
                if n == 0 && buf.is_empty() {
                    tracing::info!("end of input");
                    break;
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                buf.clear();
                session.handle_line(&line);
                drain_events(session, events);
            }
            _ = tick.tick() => {
                drain_events(session, events);
            }
        }
    }
    Ok(())
}

// ─── Line-editor mode ───────────────────────────────────────────────────────

async fn run_interactive(session: &mut Session, events: &Receiver<ClientEvent>) -> Result<()> {
    let mut stdout = io::stdout();
    let mut editor = LineEditor::new();
    let mut input = EventStream::new();

    redraw_input(&mut stdout, &session.prompt(), &editor);

    let mut tick = tokio::time::interval(tokio::time::Duration::from_millis(TICK_INTERVAL_MS));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            maybe_event = input.next() => {
                let Some(Ok(event)) = maybe_event else {
                    break;
                };

                match event {
                    Event::Paste(text) => {
                        editor.insert_text(&text.replace(['\r', '\n'], " "));
                    }
                    Event::Key(KeyEvent { code, modifiers, kind, .. }) => {
                        if kind != KeyEventKind::Press {
                            continue;
                        }
                        if !handle_key(session, events, &mut stdout, &mut editor, code, modifiers) {
                            break;
                        }
                    }
                    _ => {}
                }

                if session.quit_requested() {
                    break;
                }
                redraw_input(&mut stdout, &session.prompt(), &editor);
            }
            _ = tick.tick() => {
                let pending: Vec<ClientEvent> = events.try_iter().collect();
                if !pending.is_empty() {
                    clear_input_line(&mut stdout);
                    for event in pending {
                        session.handle_event(event);
                    }
                    redraw_input(&mut stdout, &session.prompt(), &editor);
                }
            }
        }
    }

    clear_input_line(&mut stdout);
    Ok(())
}

/// Handle one key press. Returns false when the user asked to leave.
fn handle_key(
    session: &mut Session,
    events: &Receiver<ClientEvent>,
    stdout: &mut Stdout,
    editor: &mut LineEditor,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    match code {
        KeyCode::Char('c') if ctrl => return false,
        KeyCode::Char('d') if ctrl => {
            if editor.buffer.is_empty() {
                return false;
            }
            editor.delete_forward();
        }
        KeyCode::Char('a') if ctrl => editor.move_home(),
        KeyCode::Char('e') if ctrl => editor.move_end(),
        KeyCode::Char('k') if ctrl => editor.kill_to_end(),
        KeyCode::Char('u') if ctrl => editor.kill_to_start(),
        KeyCode::Char('w') if ctrl => editor.delete_word_back(),
        KeyCode::Char('b') if alt => editor.move_word_left(),
        KeyCode::Char('f') if alt => editor.move_word_right(),
        KeyCode::Char(c) => editor.insert_char(c),
        KeyCode::Enter => {
            // Leave the submitted line on screen above the output it causes.
            editor.move_end();
            redraw_input(stdout, &session.prompt(), editor);
            write!(stdout, "\r\n").ok();
            stdout.flush().ok();

            let line = editor.submit();
            session.handle_line(&line);
            drain_events(session, events);
        }
        KeyCode::Tab => match tab_complete(session, editor) {
            TabOutcome::Listed(words) => {
                let listing = format!("{DIM}{}{RESET}", words.join("  "));
                print_above_input(stdout, &listing, &session.prompt(), editor);
            }
            TabOutcome::Inserted | TabOutcome::Nothing => {}
        },
        KeyCode::Backspace => editor.delete_back(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Left if alt || ctrl => editor.move_word_left(),
        KeyCode::Right if alt || ctrl => editor.move_word_right(),
        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Home => editor.move_home(),
        KeyCode::End => editor.move_end(),
        KeyCode::Up => editor.history_up(),
        KeyCode::Down => editor.history_down(),
        _ => {}
    }
    true
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_setup::init_tracing();

    let config_path = args.config.unwrap_or_else(ClientConfig::default_path);
    let config = ClientConfig::load(&config_path)
        .with_context(|| format!("Couldn't load config from {}", config_path.display()))?;

    let (event_tx, event_rx) = std::sync::mpsc::channel();
    let connector = LoopbackConnector::new(event_tx);

    let mode = if args.subprocess {
        OutputMode::Stdio
    } else {
        OutputMode::LineEditor
    };
    let mut session = Session::new(
        OutputSink::stdout(mode),
        Box::new(connector),
        config.block_list(),
    )
    .with_wrap_column(config.wrap_column);

    tracing::info!(?mode, config = %config_path.display(), "starting");

    if args.subprocess {
        session.info("Type /help for a list of commands.");
        let stdin = BufReader::new(tokio::io::stdin());
        return run_stream(&mut session, &event_rx, stdin).await;
    }

    // Install panic hook to restore terminal
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show, crossterm::event::DisableBracketedPaste);
        default_panic(info);
    }));

    terminal::enable_raw_mode()?;
    execute!(io::stdout(), crossterm::event::EnableBracketedPaste)?;

    session.info("Type /help for a list of commands.");
    let result = run_interactive(&mut session, &event_rx).await;

    terminal::disable_raw_mode()?;
    execute!(io::stdout(), cursor::Show, crossterm::event::DisableBracketedPaste)?;

    result
}
