use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_debug, engine_info};
use qrforge_core::{update, AppState, Msg, Phase};
use qrforge_engine::EngineHandle;

use super::clipboard::{ClipboardWriter, SystemClipboard};
use super::effects::EffectRunner;
use super::settings::Settings;
use super::ui::commands::{parse_line, Command, HELP};
use super::ui::render::{render, status_line};
use super::AppEvent;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app(settings: Settings) -> anyhow::Result<()> {
    let engine = EngineHandle::new(&settings.engine_settings())
        .context("failed to start the render engine")?;
    let clipboard: Arc<dyn ClipboardWriter> = Arc::new(SystemClipboard::new());
    let mut app = App::new(
        engine,
        settings.output_dir.clone(),
        clipboard,
        io::BufReader::new(io::stdin()),
        io::stdout(),
    );
    app.dispatch(Msg::RenderConfigChanged(settings.render_config()))?;
    writeln!(app.out, "qrforge ready; type help for commands")?;
    app.run().context("terminal i/o failed")?;
    engine_info!("Exiting at generation {}", app.state().generation());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Owns the state and runs the message loop for one terminal session.
pub struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    events: mpsc::Receiver<AppEvent>,
    out: W,
    held: VecDeque<String>,
    waiting: bool,
    input_closed: bool,
}

impl<W: Write> App<W> {
    pub fn new<R>(
        engine: EngineHandle,
        output_dir: PathBuf,
        clipboard: Arc<dyn ClipboardWriter>,
        input: R,
        out: W,
    ) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (event_tx, events) = mpsc::channel();
        spawn_input_reader(input, event_tx.clone());
        Self {
            state: AppState::new(),
            runner: EffectRunner::new(engine, output_dir, clipboard, event_tx),
            events,
            out,
            held: VecDeque::new(),
            waiting: false,
            input_closed: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs until `quit`, or until the input ends and the render in flight
    /// has settled.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            for msg in self.runner.drain_engine() {
                self.dispatch(msg)?;
            }

            if self.waiting && self.state.phase() != Phase::Computing {
                self.waiting = false;
            }
            while !self.waiting {
                let Some(line) = self.held.pop_front() else {
                    break;
                };
                if self.handle_line(&line)? == Flow::Quit {
                    return Ok(());
                }
            }

            if self.input_closed
                && self.held.is_empty()
                && self.state.phase() != Phase::Computing
            {
                return Ok(());
            }

            match self.events.recv_timeout(POLL_INTERVAL) {
                Ok(AppEvent::Line(line)) => {
                    if self.waiting {
                        self.held.push_back(line);
                    } else if self.handle_line(&line)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Ok(AppEvent::InputClosed) => {
                    engine_debug!("Input closed");
                    self.input_closed = true;
                }
                Ok(AppEvent::Msg(msg)) => self.dispatch(msg)?,
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => self.input_closed = true,
            }
        }
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "error: {err}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Send(msg) => self.dispatch(msg)?,
            Command::Config(edit) => {
                let config = edit.apply(self.state.config());
                self.dispatch(Msg::RenderConfigChanged(config))?;
            }
            Command::Show => write!(self.out, "{}", render(&self.state.view()))?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Wait => self.waiting = self.state.phase() == Phase::Computing,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            if let Msg::DownloadSaved { path } = &msg {
                writeln!(self.out, "saved {path}")?;
            }
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            queue.extend(self.runner.run(effects));
        }

        if self.state.consume_dirty() {
            writeln!(self.out, "{}", status_line(&self.state.view()))?;
            self.out.flush()?;
        }
        Ok(())
    }
}

fn spawn_input_reader<R>(input: R, tx: mpsc::Sender<AppEvent>)
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            match line {
                Ok(line) => {
                    if tx.send(AppEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}
