use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{Terminal, backend::TestBackend, layout::Rect};
use term_desk::apps::{AppCatalog, AppId};
use term_desk::desktop::Desktop;
use term_desk::settings::SystemSettings;
use term_desk::ui::UiFrame;
use term_desk::viewport::{CellMetrics, clip_rect};

#[derive(Parser, Debug)]
#[command(
    name = "desk-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replays synthetic drag and resize gestures through the desktop and reports throughput"
)]
struct BenchCli {
    /// How many app windows to open before replaying.
    #[arg(short = 'w', long = "windows", value_name = "N", default_value_t = 6)]
    windows: usize,

    /// Number of press-move-release gestures to replay.
    #[arg(short = 'g', long = "gestures", value_name = "N", default_value_t = 500)]
    gestures: u32,

    /// Pointer moves per gesture.
    #[arg(short = 'm', long = "moves", value_name = "N", default_value_t = 24)]
    moves: u32,

    /// Virtual screen size in cells.
    #[arg(long = "size", value_name = "COLSxROWS", default_value = "160x48")]
    size: String,

    /// Seed for the pointer path generator.
    #[arg(long = "seed", default_value_t = 0x5EED)]
    seed: u64,
}

struct BenchConfig {
    apps: Vec<AppId>,
    gestures: u32,
    moves: u32,
    screen: Rect,
    seed: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        let dock_apps: Vec<AppId> = AppCatalog.dock_apps().map(|d| d.id).collect();
        if !(1..=dock_apps.len()).contains(&cli.windows) {
            return Err(format!("windows must be between 1 and {}", dock_apps.len()));
        }
        if !(1..=1_000_000).contains(&cli.gestures) {
            return Err("gestures must be between 1 and 1000000".to_string());
        }
        if !(1..=1_000).contains(&cli.moves) {
            return Err("moves must be between 1 and 1000".to_string());
        }
        let (cols, rows) = cli
            .size
            .split_once('x')
            .and_then(|(c, r)| Some((c.parse::<u16>().ok()?, r.parse::<u16>().ok()?)))
            .ok_or_else(|| format!("size must look like 160x48, got {:?}", cli.size))?;
        if cols < 40 || rows < 16 {
            return Err("screen must be at least 40x16".to_string());
        }
        Ok(Self {
            apps: dock_apps.into_iter().take(cli.windows).collect(),
            gestures: cli.gestures,
            moves: cli.moves,
            screen: Rect::new(0, 0, cols, rows),
            seed: cli.seed,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_benchmark(&config)?;
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn run_benchmark(config: &BenchConfig) -> io::Result<BenchStats> {
    let mut terminal = Terminal::new(TestBackend::new(config.screen.width, config.screen.height))
        .map_err(|err| io::Error::other(err.to_string()))?;
    let mut desktop = Desktop::new(config.screen, SystemSettings::default(), CellMetrics::default());
    for app in &config.apps {
        desktop.launch(*app);
    }
    let mut path = PointerPath::new(config.seed);
    let mut stats = BenchStats::new();

    for index in 0..config.gestures {
        let Some(press) = gesture_start(&desktop, config.screen, index % 2 == 1) else {
            // Nothing grabbable on top; rotate focus and try the next one.
            stats.dispatch(&mut desktop, &key(KeyCode::F(6)));
            stats.missed += 1;
            continue;
        };
        stats.dispatch(&mut desktop, &mouse(MouseEventKind::Down(MouseButton::Left), press));
        if desktop.is_gesture_active() {
            stats.started += 1;
        } else {
            stats.missed += 1;
        }
        let mut pointer = press;
        for _ in 0..config.moves {
            pointer = path.step(pointer, config.screen);
            stats.dispatch(&mut desktop, &mouse(MouseEventKind::Drag(MouseButton::Left), pointer));
        }
        stats.dispatch(&mut desktop, &mouse(MouseEventKind::Up(MouseButton::Left), pointer));

        if desktop.active_captures() != 0 {
            return Err(io::Error::other(format!(
                "{} capture guards still live after gesture {index}",
                desktop.active_captures()
            )));
        }
        desktop
            .registry()
            .check_invariants()
            .map_err(|violation| io::Error::other(violation.to_string()))?;

        let frame_start = Instant::now();
        terminal
            .draw(|frame| desktop.render(&mut UiFrame::new(frame)))
            .map_err(|err| io::Error::other(err.to_string()))?;
        stats.record_frame(frame_start.elapsed());

        if index % 7 == 6 {
            stats.dispatch(&mut desktop, &key(KeyCode::F(6)));
        }
    }

    stats.mark_completed();
    Ok(stats)
}

/// Title bar cell for a drag, or the bottom-right corner for a resize, of
/// the topmost window.
fn gesture_start(desktop: &Desktop, screen: Rect, resize: bool) -> Option<(u16, u16)> {
    let record = desktop.registry().topmost_visible()?;
    let outer = desktop.outer_rect(&record.id)?;
    let visible = clip_rect(outer, desktop.regions().work_area)?;
    if resize && !record.is_maximized {
        let x = outer.x + i32::from(outer.width) - 1;
        let y = outer.y + i32::from(outer.height) - 1;
        if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y))
            && x < screen.right()
            && y < desktop.regions().work_area.bottom()
        {
            return Some((x, y));
        }
    }
    let row = u16::try_from(outer.y + 1).ok()?;
    let column = (visible.x + visible.width / 2).max(u16::try_from(outer.x + 8).unwrap_or(0));
    (column < visible.right() && row < visible.bottom()).then_some((column, row))
}

fn mouse(kind: MouseEventKind, (column, row): (u16, u16)) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Deterministic wandering pointer.
struct PointerPath {
    state: u64,
}

impl PointerPath {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0xA5A5_A5A5_1234_5678,
        }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn step(&mut self, (column, row): (u16, u16), screen: Rect) -> (u16, u16) {
        let dx = (self.next() % 7) as i32 - 3;
        let dy = (self.next() % 5) as i32 - 2;
        let column = (i32::from(column) + dx).clamp(0, i32::from(screen.right()) - 1);
        let row = (i32::from(row) + dy).clamp(0, i32::from(screen.bottom()) - 1);
        (column as u16, row as u16)
    }
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    events: u64,
    consumed: u64,
    started: u64,
    missed: u64,
    frame_count: u64,
    dispatch_time: Duration,
    total_draw_time: Duration,
    slowest_frame: Duration,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            events: 0,
            consumed: 0,
            started: 0,
            missed: 0,
            frame_count: 0,
            dispatch_time: Duration::ZERO,
            total_draw_time: Duration::ZERO,
            slowest_frame: Duration::ZERO,
        }
    }

    fn dispatch(&mut self, desktop: &mut Desktop, event: &Event) {
        let started = Instant::now();
        if desktop.handle_event(event) {
            self.consumed += 1;
        }
        self.dispatch_time += started.elapsed();
        self.events += 1;
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_frame(&mut self, draw_time: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.total_draw_time += draw_time;
        if draw_time > self.slowest_frame {
            self.slowest_frame = draw_time;
        }
    }

    fn average_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        (self.total_draw_time.as_secs_f64() / self.frame_count as f64) * 1_000.0
    }

    fn events_per_second(&self) -> f64 {
        let seconds = self.dispatch_time.as_secs_f64();
        if seconds > 0.0 {
            self.events as f64 / seconds
        } else {
            0.0
        }
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        indoc::formatdoc!(
            r#"
            Desk bench completed in {elapsed:.2}s on a {cols}x{rows} screen.
            Windows: {windows} | Gestures: {gestures} ({started} started, {missed} missed) x {moves} moves
            Events: {events} dispatched, {consumed} consumed (~{eps:.0}/s)
            Frames: {frames} | Avg frame: {avg:.3} ms | Worst: {worst:.3} ms
            Registry invariants held after every gesture.
            "#,
            elapsed = self.elapsed().as_secs_f64(),
            cols = config.screen.width,
            rows = config.screen.height,
            windows = config.apps.len(),
            gestures = config.gestures,
            started = self.started,
            missed = self.missed,
            moves = config.moves,
            events = self.events,
            consumed = self.consumed,
            eps = self.events_per_second(),
            frames = self.frame_count,
            avg = self.average_frame_ms(),
            worst = self.slowest_frame.as_secs_f64() * 1_000.0,
        )
    }
}
