//! crossterm implementations of the rendering, input, clock and frame
//! services.

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use unicode_width::UnicodeWidthStr;

use crate::components::{Direction, EntityKind, Pos};
use crate::game::{Clock, FrameGovernor, Input, Outcome, Renderer};
use crate::render::{sprite_orientation, SpriteOrientation};

/// Terminals report presses and repeats but no releases, so a key counts as
/// held for this long after its last event.
const INPUT_HOLD_MS: u64 = 160;

/// Raw mode plus alternate screen, undone on drop.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(Hide)?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.stdout.execute(Show);
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Empty,
    Wall,
    Dot,
    Player(SpriteOrientation),
    Adversary(SpriteOrientation),
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

/// Buffers one frame of cells and writes only what changed since the last
/// presented frame.
pub struct TerminalRenderer<W: Write> {
    out: W,
    width: usize,
    height: usize,
    cell_columns: usize,
    frame: Vec<Cell>,
    last: Vec<Cell>,
    score: u32,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, width: usize, height: usize, cell_columns: usize) -> Self {
        Self {
            out,
            width,
            height,
            cell_columns,
            frame: vec![BLANK; width * height],
            last: vec![BLANK; width * height],
            score: 0,
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    fn put(&mut self, pos: Pos, cell: Cell) {
        if pos.x < self.width && pos.y < self.height {
            self.frame[pos.y * self.width + pos.x] = cell;
        }
    }

    fn needed_size(&self) -> (u16, u16) {
        let columns = self.width.saturating_mul(self.cell_columns);
        (
            u16::try_from(columns).unwrap_or(u16::MAX),
            u16::try_from(self.height + 2).unwrap_or(u16::MAX),
        )
    }

    fn draw_cell(&mut self, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = glyph_text(cell.glyph);
        let x_pos = self.origin_x + (x * self.cell_columns) as u16;
        let y_pos = self.origin_y + y as u16;
        self.out.queue(MoveTo(x_pos, y_pos))?;
        self.out.queue(SetForegroundColor(cell.color))?;
        let pad = if cell.glyph == Glyph::Wall { '█' } else { ' ' };
        let w = UnicodeWidthStr::width(text);
        if w <= self.cell_columns {
            self.out.queue(Print(text))?;
            for _ in w..self.cell_columns {
                self.out.queue(Print(pad))?;
            }
        } else {
            self.out.queue(Print("?".repeat(self.cell_columns)))?;
        }
        self.out.queue(ResetColor)?;
        Ok(())
    }

    /// Prints the end-of-session line just below the maze.
    pub fn show_outcome(&mut self, outcome: Outcome) -> io::Result<()> {
        let banner = match outcome {
            Outcome::GameOver { score } => format!("GAME OVER - Final Score: {score}"),
            Outcome::Cleared { score } => format!("MAZE CLEARED - Final Score: {score}"),
            Outcome::Quit { score } => format!("Final Score: {score}"),
        };
        let (_, needed_h) = self.needed_size();
        let row = if self.needs_full {
            needed_h
        } else {
            self.origin_y + self.height as u16
        };
        self.out.queue(MoveTo(self.origin_x, row))?;
        self.out.queue(SetForegroundColor(Color::White))?;
        self.out
            .queue(Print(format!("{banner} (press q to quit)")))?;
        self.out.queue(ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw_wall(&mut self, pos: Pos) -> io::Result<()> {
        self.put(
            pos,
            Cell {
                glyph: Glyph::Wall,
                color: Color::Blue,
            },
        );
        Ok(())
    }

    fn draw_dot(&mut self, pos: Pos) -> io::Result<()> {
        self.put(
            pos,
            Cell {
                glyph: Glyph::Dot,
                color: Color::White,
            },
        );
        Ok(())
    }

    fn draw_sprite(&mut self, kind: EntityKind, pos: Pos, facing: Direction) -> io::Result<()> {
        let orientation = sprite_orientation(kind, facing);
        let cell = match kind {
            EntityKind::Player => Cell {
                glyph: Glyph::Player(orientation),
                color: Color::Yellow,
            },
            EntityKind::Adversary => Cell {
                glyph: Glyph::Adversary(orientation),
                color: Color::Red,
            },
        };
        self.put(pos, cell);
        Ok(())
    }

    fn draw_score(&mut self, score: u32) -> io::Result<()> {
        self.score = score;
        Ok(())
    }

    fn present_frame(&mut self) -> io::Result<()> {
        let (needed_w, needed_h) = self.needed_size();
        let (term_w, term_h) = terminal::size()?;
        self.out.queue(MoveTo(0, 0))?;
        if term_w < needed_w || term_h < needed_h {
            self.out.queue(Clear(ClearType::All))?;
            self.out.queue(Print(format!(
                "Terminal too small. Need at least {needed_w}x{needed_h} (cols x rows). Current: {term_w}x{term_h}."
            )))?;
            self.out.flush()?;
            self.needs_full = true;
            self.frame.fill(BLANK);
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.out.queue(Clear(ClearType::All))?;
            self.needs_full = true;
        }

        let hud = format!("Score: {}  (q to quit)", self.score);
        if self.needs_full || hud != self.last_hud {
            self.out.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            self.out.queue(SetForegroundColor(Color::White))?;
            self.out.queue(Clear(ClearType::CurrentLine))?;
            self.out.queue(Print(&hud))?;
            self.out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let cell = self.frame[idx];
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(x, y, cell)?;
                }
            }
        }
        self.needs_full = false;
        self.frame.fill(BLANK);
        self.out.flush()
    }
}

fn glyph_text(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Empty => " ",
        Glyph::Wall => "█",
        Glyph::Dot => "·",
        Glyph::Player(SpriteOrientation::Mirrored) => "ᗧ",
        Glyph::Player(SpriteOrientation::AsDrawn) => "ᗤ",
        Glyph::Player(SpriteOrientation::TurnedUp) => "ᗢ",
        Glyph::Player(SpriteOrientation::TurnedDown) => "ᗣ",
        Glyph::Adversary(_) => "👻",
    }
}

/// Keyboard state rebuilt from crossterm key events.
#[derive(Default)]
pub struct TerminalInput {
    last_seen: [Option<Instant>; 4],
    quit: bool,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, key: KeyEvent, at: Instant) {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return;
        }
        let dir = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit = true;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => Direction::Up,
            KeyCode::Down | KeyCode::Char('j') => Direction::Down,
            KeyCode::Left | KeyCode::Char('h') => Direction::Left,
            KeyCode::Right | KeyCode::Char('l') => Direction::Right,
            _ => return,
        };
        self.last_seen[idx_for_dir(dir)] = Some(at);
    }

    fn held_at(&self, dir: Direction, now: Instant) -> bool {
        self.last_seen[idx_for_dir(dir)]
            .is_some_and(|t| now.duration_since(t) <= Duration::from_millis(INPUT_HOLD_MS))
    }

    /// Blocks until `q`, `Esc` or `Ctrl-C`.
    pub fn wait_for_quit(&mut self) -> io::Result<()> {
        self.quit = false;
        while !self.quit {
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.record(key, Instant::now());
                }
            }
        }
        Ok(())
    }
}

impl Input for TerminalInput {
    fn poll_quit_requested(&mut self) -> io::Result<bool> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                self.record(key, Instant::now());
            }
        }
        Ok(self.quit)
    }

    fn is_direction_pressed(&self, dir: Direction) -> bool {
        self.held_at(dir, Instant::now())
    }
}

fn idx_for_dir(dir: Direction) -> usize {
    match dir {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

/// Milliseconds since construction.
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Sleeps away whatever is left of the frame budget.
pub struct SleepGovernor {
    frame_start: Instant,
}

impl SleepGovernor {
    pub fn new() -> Self {
        Self {
            frame_start: Instant::now(),
        }
    }
}

impl Default for SleepGovernor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameGovernor for SleepGovernor {
    fn cap_frame_rate(&mut self, fps: u32) {
        let frame_time = Duration::from_micros(1_000_000 / u64::from(fps.max(1)));
        let elapsed = self.frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
        self.frame_start = Instant::now();
    }
}
