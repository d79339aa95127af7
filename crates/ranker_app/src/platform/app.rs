use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use engine_logging::{engine_debug, engine_info, engine_warn, redact};
use ranker_core::{update, AppState, Msg, UploadedDocument};

use super::config::AppConfig;
use super::effects::{EffectQueue, EffectRunner};
use super::logging;
use super::ui;
use super::ui::input::{InputAction, LineComposer};

/// Everything the main loop reacts to, funneled through one channel.
pub enum AppEvent {
    Core(Msg),
    Line(String),
    InputClosed,
    ServiceHealth(Result<String, String>),
}

pub fn run_app() -> Result<()> {
    let config = AppConfig::load()?;
    logging::initialize(config.log_destination());
    engine_info!(
        "Starting with endpoint={} api_key={}",
        config.endpoint,
        redact(&config.api_key)
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(&config, event_tx.clone())?;
    runner.check_health();
    spawn_stdin_reader(event_tx)?;

    let mut session = Session::new(runner, io::stdout());
    session.start()?;

    while let Ok(event) = event_rx.recv() {
        if session.handle(event)? == Flow::Exit {
            break;
        }
    }
    engine_info!("Session ended");
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) -> Result<()> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(AppEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        engine_warn!("Failed to read stdin: {}", err);
                        break;
                    }
                }
            }
            let _ = tx.send(AppEvent::InputClosed);
        })
        .context("Failed to spawn stdin reader")?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

struct Session<W: Write, Q: EffectQueue> {
    state: AppState,
    composer: LineComposer,
    runner: Q,
    out: W,
    shown_messages: usize,
    input_closed: bool,
}

impl<W: Write, Q: EffectQueue> Session<W, Q> {
    fn new(runner: Q, out: W) -> Self {
        Self {
            state: AppState::new(),
            composer: LineComposer::default(),
            runner,
            out,
            shown_messages: 0,
            input_closed: false,
        }
    }

    fn start(&mut self) -> Result<()> {
        let view = self.state.view();
        write!(self.out, "{}", ui::render::header(&view))?;
        writeln!(self.out, "{}", ui::constants::HELP_TEXT)?;
        self.prompt()
    }

    fn handle(&mut self, event: AppEvent) -> Result<Flow> {
        match event {
            AppEvent::Core(msg) => self.dispatch(msg)?,
            AppEvent::Line(line) => {
                if self.handle_line(&line)? == Flow::Exit {
                    return Ok(Flow::Exit);
                }
            }
            AppEvent::InputClosed => {
                engine_info!("Input closed; waiting for work in flight");
                self.input_closed = true;
            }
            AppEvent::ServiceHealth(Ok(greeting)) => {
                engine_info!("Ranking service reachable: {}", greeting);
            }
            AppEvent::ServiceHealth(Err(reason)) => {
                engine_warn!("Ranking service health check failed: {}", reason);
                writeln!(
                    self.out,
                    "(warning: the ranking service did not answer the health check: {reason})"
                )?;
            }
        }

        if self.input_closed && self.state.phase().accepts_submission() {
            return Ok(Flow::Exit);
        }
        Ok(Flow::Continue)
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match self.composer.feed(line) {
            InputAction::Edit { text, submit } => {
                self.dispatch(Msg::InputChanged(text))?;
                self.dispatch(Msg::EnterPressed { shift: !submit })?;
            }
            InputAction::Upload(path) => match read_document(&path) {
                Ok(document) => self.dispatch(Msg::DocumentSelected(document))?,
                Err(err) => {
                    engine_warn!("Upload of {:?} failed: {:#}", path, err);
                    writeln!(self.out, "Could not open {}: {err:#}", path.display())?;
                }
            },
            InputAction::Send => self.dispatch(Msg::SubmitClicked)?,
            InputAction::Clear => self.dispatch(Msg::InputChanged(String::new()))?,
            InputAction::Status => self.render()?,
            InputAction::Help => writeln!(self.out, "{}", ui::constants::HELP_TEXT)?,
            InputAction::Quit => return Ok(Flow::Exit),
            InputAction::Unknown(command) => {
                writeln!(self.out, "Unknown command :{command}. Type :help for help.")?;
            }
        }
        self.prompt()?;
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, msg: Msg) -> Result<()> {
        let completion = completion_label(&msg);
        let phase_before = self.state.phase().clone();
        let notice_before = self.state.notice().cloned();

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if let Some(label) = completion.filter(|_| !was_dirty) {
            engine_debug!("Discarding stale {}", label);
        }
        if self.state.phase() != &phase_before {
            engine_info!("Phase {:?} -> {:?}", phase_before, self.state.phase());
        }
        if let Some(notice) = self.state.notice() {
            if notice_before.as_ref() != Some(notice) {
                engine_warn!("Notice raised: {:?}", notice);
            }
        }
        self.runner.enqueue(effects);
        if was_dirty {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let view = self.state.view();
        write!(self.out, "{}", ui::render::render(&view, self.shown_messages))?;
        self.shown_messages = view.messages.len();
        self.out.flush()?;
        Ok(())
    }

    fn prompt(&mut self) -> Result<()> {
        write!(self.out, "{}", ui::constants::PROMPT)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Names an asynchronous completion so a discarded one can be logged.
fn completion_label(msg: &Msg) -> Option<String> {
    match msg {
        Msg::ExtractionFinished { upload_id, .. } => {
            Some(format!("extraction for upload {upload_id}"))
        }
        Msg::RankingFinished { request_id, .. } => Some(format!("ranking result {request_id}")),
        _ => None,
    }
}

fn read_document(path: &Path) -> Result<UploadedDocument> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let media_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedDocument::new(file_name, media_type, bytes))
}
