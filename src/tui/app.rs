//! Main TUI application.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::{debug, info, warn};

use crate::collector::{AddressCache, FileSystem, PortCounters, Sampler};
use crate::fmt::Units;
use crate::storage::{CsvSink, RateHistory};

use super::event::{Event, EventSource};
use super::input::{KeyAction, handle_key};
use super::layout::Geometry;
use super::render::{RenderContext, render};
use super::state::{Background, ViewMode, ViewState};
use super::style::Styles;

/// Where and how to write the CSV log.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    pub path: PathBuf,
    /// Append to an existing file instead of truncating it.
    pub append: bool,
    /// Write the header row even when appending.
    pub force_header: bool,
}

/// Run-time settings taken from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub interval: Duration,
    /// Stop after this long; `None` runs until quit.
    pub duration: Option<Duration>,
    pub units: Units,
    pub background: Background,
    pub history_capacity: usize,
    pub csv: Option<CsvConfig>,
}

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
                let _ = disable_raw_mode();
                Err(e)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show) {
            warn!("failed to leave alternate screen: {}", e);
        }
    }
}

/// Shortest sampling interval; smaller requests are raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Why the main loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitReason {
    Signal,
    Duration,
}

/// What one loop iteration does after input has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Exit(ExitReason),
    /// A tick is due: sample (unless paused), then draw.
    Sample,
    /// Draw only.
    Draw,
}

/// Tick and deadline bookkeeping of the main loop.
#[derive(Debug, Clone, Copy)]
struct Scheduler {
    interval: Duration,
    next_tick: Instant,
    /// `None` when unbounded or past the range of `Instant`.
    deadline: Option<Instant>,
}

impl Scheduler {
    fn new(start: Instant, interval: Duration, duration: Option<Duration>) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next_tick: start.checked_add(interval).unwrap_or(start),
            deadline: duration.and_then(|d| start.checked_add(d)),
        }
    }

    /// Decides the next step at `now`.
    ///
    /// A redraw request defers a due tick to the next iteration. After a
    /// stall the schedule restarts from `now` instead of sampling in a burst.
    fn step(&mut self, now: Instant, redraw_only: bool, stop_requested: bool) -> Step {
        if stop_requested {
            return Step::Exit(ExitReason::Signal);
        }
        if self.deadline.is_some_and(|d| now >= d) {
            return Step::Exit(ExitReason::Duration);
        }
        if redraw_only || now < self.next_tick {
            return Step::Draw;
        }
        self.next_tick = match self.next_tick.checked_add(self.interval) {
            Some(next) if next > now => next,
            _ => now.checked_add(self.interval).unwrap_or(now),
        };
        Step::Sample
    }

    /// How long to wait for input before the next tick or the deadline.
    fn wait_time(&self, now: Instant) -> Duration {
        let wait = self.next_tick.saturating_duration_since(now);
        match self.deadline {
            Some(d) => wait.min(d.saturating_duration_since(now)),
            None => wait,
        }
    }
}

/// Restores the terminal before the default panic message is printed.
///
/// Release builds abort on panic, so the guard's `Drop` never runs there.
pub fn install_panic_hook() {
    let default = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        default(info);
    }));
}

/// Main TUI application.
///
/// Owns the sampler, the history and the view state; sampling and drawing
/// both happen on the calling thread.
pub struct App<F: FileSystem> {
    fs: F,
    port: PortCounters,
    sampler: Sampler,
    history: RateHistory,
    view: ViewState,
    csv: Option<CsvSink>,
    addresses: AddressCache,
    config: AppConfig,
    styles: Styles,
    geometry: Option<Geometry>,
    stop: Arc<AtomicBool>,
}

impl<F: FileSystem> App<F> {
    /// Creates the app around a primed sampler.
    ///
    /// Opens the CSV log if one is configured; if it cannot be opened the
    /// run continues without it.
    pub fn new(
        fs: F,
        port: PortCounters,
        sampler: Sampler,
        config: AppConfig,
        stop: Arc<AtomicBool>,
    ) -> Self {
        let started = Instant::now();
        let csv = config.csv.as_ref().and_then(|csv| {
            CsvSink::open(&csv.path, csv.append, csv.force_header, started)
                .inspect_err(|e| {
                    warn!("CSV logging disabled: {}: {}", csv.path.display(), e);
                })
                .ok()
        });
        let view = ViewState::new(config.units, port.link.rate_gbps());
        Self {
            fs,
            sampler,
            history: RateHistory::new(config.history_capacity),
            view,
            csv,
            addresses: AddressCache::new(),
            styles: Styles::new(config.background),
            geometry: None,
            stop,
            port,
            config,
        }
    }

    /// Runs the TUI application until quit, the stop flag, or the duration
    /// bound.
    pub fn run(mut self) -> io::Result<()> {
        let mut guard = TerminalGuard::enter()?;
        let events = EventSource::new();
        let mut scheduler =
            Scheduler::new(Instant::now(), self.config.interval, self.config.duration);

        info!(
            device = %self.port.device,
            port = self.port.port,
            interval_ms = scheduler.interval.as_millis() as u64,
            "monitoring started"
        );

        loop {
            let mut redraw_only = false;
            for event in events.drain()? {
                match event {
                    Event::Key(key) => match handle_key(&mut self.view, key) {
                        KeyAction::Quit => {
                            info!("quit requested");
                            return Ok(());
                        }
                        KeyAction::Redraw => redraw_only = true,
                        KeyAction::None => {}
                    },
                    // Layout follows in draw().
                    Event::Resize(width, height) => debug!(width, height, "resize event"),
                }
            }

            let now = Instant::now();
            match scheduler.step(now, redraw_only, self.stop.load(Ordering::SeqCst)) {
                Step::Exit(ExitReason::Signal) => {
                    info!("stop signal received");
                    return Ok(());
                }
                Step::Exit(ExitReason::Duration) => {
                    info!("duration elapsed");
                    return Ok(());
                }
                Step::Sample => {
                    self.on_tick(now);
                }
                Step::Draw => {}
            }

            self.draw(&mut guard.terminal)?;
            events.wait(scheduler.wait_time(Instant::now()))?;
        }
    }

    /// Samples once unless paused. Returns whether a sample was attempted.
    fn on_tick(&mut self, now: Instant) -> bool {
        if self.view.paused {
            return false;
        }
        self.sample(now);
        true
    }

    /// Reads the counters and records the new rates.
    ///
    /// A failed read keeps the previous rates and skips the history append.
    fn sample(&mut self, now: Instant) {
        let rates = match self.sampler.sample_at(&self.fs, now) {
            Ok(rates) => rates,
            Err(e) => {
                warn!("sample skipped: {}", e);
                return;
            }
        };
        self.history
            .append(rates.rx_bytes_per_sec, rates.tx_bytes_per_sec);

        if let Some(sink) = &mut self.csv
            && let Err(e) = sink.write_sample(now, &rates)
        {
            warn!("CSV logging disabled: {}: {}", sink.path().display(), e);
            self.csv = None;
        }
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let size = terminal.size()?;
        let geometry = Geometry {
            width: size.width,
            height: size.height,
        };
        match self.geometry {
            None => debug!(
                width = geometry.width,
                height = geometry.height,
                "initial terminal geometry"
            ),
            Some(previous) if previous != geometry => {
                debug!(
                    width = geometry.width,
                    height = geometry.height,
                    "terminal geometry changed"
                );
                terminal.clear()?;
            }
            Some(_) => {}
        }
        self.geometry = Some(geometry);

        if self.view.view == ViewMode::Address {
            self.addresses
                .refresh_if_stale(&self.fs, &self.port.port_dir, Instant::now());
        }
        let optional = if self.view.view == ViewMode::Raw {
            self.port.optional.read_all(&self.fs)
        } else {
            Vec::new()
        };

        let ctx = RenderContext {
            view: &self.view,
            port: &self.port,
            interval: self.config.interval,
            rates: self.sampler.current(),
            history: &self.history,
            snapshot: self.sampler.last_snapshot(),
            optional: &optional,
            addresses: self.addresses.entries(),
            styles: self.styles,
            now: Local::now(),
        };
        terminal.draw(|frame| render(frame, &ctx))?;
        Ok(())
    }
}
