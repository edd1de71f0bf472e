//! Crossterm terminal backend
//!
//! The world is scaled onto the whole terminal, two characters per cell so
//! cells come out roughly square. Sprites are painted as cell backgrounds and
//! text overlays are printed on top.

use std::io::{self, Write};
use std::ops::Range;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use glam::Vec2;

use super::{Polled, Surface};
use crate::sim::jumper::PlatformKind;
use crate::sim::{Anchor, Fill, Frame, HeldKeys, Key, Rect};

/// Held keys without a release event are dropped after this long
/// (terminals without key release reporting only send repeats)
pub const HOLD_EXPIRY: Duration = Duration::from_millis(250);

/// How one cell is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub bg: Color,
    pub fg: Color,
    /// Two characters wide
    pub glyph: &'static str,
}

const EMPTY: Paint = Paint {
    bg: Color::Black,
    fg: Color::White,
    glyph: "  ",
};

const fn solid(color: Color) -> Paint {
    Paint {
        bg: color,
        fg: color,
        glyph: "  ",
    }
}

/// Colors for each kind of sprite
pub fn paint_for(fill: Fill) -> Paint {
    match fill {
        Fill::Paddle => solid(Color::Blue),
        Fill::Ball => Paint {
            bg: Color::Black,
            fg: Color::Red,
            glyph: "()",
        },
        Fill::Brick { hits_remaining, .. } => match hits_remaining {
            0 | 1 => solid(Color::Green),
            2 => solid(Color::Yellow),
            _ => solid(Color::Magenta),
        },
        Fill::Player => solid(Color::Blue),
        Fill::Platform(PlatformKind::Static) => solid(Color::Green),
        Fill::Platform(PlatformKind::Moving) => solid(Color::Cyan),
        Fill::Platform(PlatformKind::Breakable) => solid(Color::DarkYellow),
        Fill::SnakeHead => solid(Color::Green),
        Fill::SnakeBody => solid(Color::DarkGreen),
        Fill::Food => solid(Color::Red),
    }
}

/// Cells covered by `[start, end)` when each cell is `cell` units wide.
/// Anything visible covers at least one cell.
pub fn cell_span(start: f32, end: f32, cell: f32, count: u16) -> Range<u16> {
    let limit = cell * count as f32;
    if count == 0 || end <= 0.0 || start >= limit || end <= start {
        return 0..0;
    }
    let first = (start / cell).floor().max(0.0);
    let last = (end / cell).ceil().max(first + 1.0).min(count as f32);
    first as u16..last as u16
}

/// World-to-cell raster for one frame
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    /// World units per cell
    cell: Vec2,
    cells: Vec<Option<Paint>>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, world: Vec2) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cell: Vec2::new(world.x / cols as f32, world.y / rows as f32),
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    /// Rasterize a whole frame's sprites, later sprites on top
    pub fn from_frame(cols: u16, rows: u16, frame: &Frame) -> Self {
        let mut canvas = Self::new(cols, rows, frame.world);
        for sprite in &frame.sprites {
            canvas.fill_rect(&sprite.rect, paint_for(sprite.fill));
        }
        canvas
    }

    pub fn fill_rect(&mut self, rect: &Rect, paint: Paint) {
        let cols = cell_span(rect.left(), rect.right(), self.cell.x, self.cols);
        let rows = cell_span(rect.top(), rect.bottom(), self.cell.y, self.rows);
        for row in rows {
            for col in cols.clone() {
                self.cells[row as usize * self.cols as usize + col as usize] = Some(paint);
            }
        }
    }

    pub fn at(&self, col: u16, row: u16) -> Option<Paint> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    /// Width in terminal characters
    pub fn width_chars(&self) -> u16 {
        self.cols * 2
    }

    /// Terminal position where a text of `len` characters starts
    pub fn text_origin(&self, anchor: Anchor, len: usize) -> (u16, u16) {
        let width = self.width_chars() as usize;
        match anchor {
            Anchor::TopLeft => (0, 0),
            Anchor::TopRight => (width.saturating_sub(len) as u16, 0),
            Anchor::Center { line } => {
                let row = (self.rows as i32 / 2 + line as i32).clamp(0, self.rows as i32 - 1);
                (((width.saturating_sub(len)) / 2) as u16, row as u16)
            }
        }
    }
}

/// Which held-key slot an arrow fills
fn slot(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Left => Some(0),
        KeyCode::Right => Some(1),
        KeyCode::Up => Some(2),
        KeyCode::Down => Some(3),
        _ => None,
    }
}

/// Tracks held arrows from press, repeat and release events
#[derive(Debug, Clone)]
pub struct HeldTracker {
    since: [Option<Instant>; 4],
    releases_seen: bool,
    expiry: Duration,
}

impl HeldTracker {
    pub fn new(expiry: Duration) -> Self {
        Self {
            since: [None; 4],
            releases_seen: false,
            expiry,
        }
    }

    pub fn record(&mut self, code: KeyCode, kind: KeyEventKind, now: Instant) {
        let Some(i) = slot(code) else {
            return;
        };
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.since[i] = Some(now);
                // Pressing one way cancels the other on the same axis
                self.since[i ^ 1] = None;
            }
            KeyEventKind::Release => {
                self.since[i] = None;
                self.releases_seen = true;
            }
        }
    }

    pub fn snapshot(&self, now: Instant) -> HeldKeys {
        let held = |i: usize| {
            self.since[i]
                .map(|t| self.releases_seen || now.duration_since(t) < self.expiry)
                .unwrap_or(false)
        };
        HeldKeys {
            left: held(0),
            right: held(1),
            up: held(2),
            down: held(3),
        }
    }
}

/// Discrete key for a key code
pub fn key_for(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => Some(Key::Letter(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub struct TerminalRenderer {
    last_render: Instant,
    target_frame_time: Duration,
    held: HeldTracker,
    /// Terminal size at the last draw; a change forces a full clear
    size: (u16, u16),
    show_fps: bool,
    fps: u32,
    fps_frames: u32,
    fps_since: Instant,
    enhanced: bool,
    active: bool,
}

impl TerminalRenderer {
    pub fn new(show_fps: bool) -> Self {
        let now = Instant::now();
        Self {
            last_render: now,
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
            held: HeldTracker::new(HOLD_EXPIRY),
            size: (0, 0),
            show_fps,
            fps: 0,
            fps_frames: 0,
            fps_since: now,
            enhanced: false,
            active: false,
        }
    }

    fn draw_canvas(&self, canvas: &Canvas, rows: u16, stdout: &mut io::Stdout) -> io::Result<()> {
        for row in 0..rows {
            queue!(stdout, cursor::MoveTo(0, row))?;
            for col in 0..canvas.cols {
                let paint = canvas.at(col, row).unwrap_or(EMPTY);
                queue!(
                    stdout,
                    SetBackgroundColor(paint.bg),
                    SetForegroundColor(paint.fg),
                    Print(paint.glyph)
                )?;
            }
        }
        queue!(stdout, ResetColor)?;
        Ok(())
    }

    fn draw_text(
        &self,
        canvas: &Canvas,
        anchor: Anchor,
        text: &str,
        stdout: &mut io::Stdout,
    ) -> io::Result<()> {
        let shown: String = text.chars().take(canvas.width_chars() as usize).collect();
        let (col, row) = canvas.text_origin(anchor, shown.chars().count());
        queue!(
            stdout,
            cursor::MoveTo(col, row),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(Color::White),
            Print(shown),
            ResetColor
        )?;
        Ok(())
    }

    fn tick_fps(&mut self) {
        self.fps_frames += 1;
        let elapsed = self.fps_since.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.fps = (self.fps_frames as f32 / elapsed.as_secs_f32()).round() as u32;
            self.fps_frames = 0;
            self.fps_since = Instant::now();
        }
    }
}

impl Surface for TerminalRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        self.enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::info!(
            "Terminal initialized (key release events: {})",
            if self.enhanced { "yes" } else { "no" }
        );
        self.active = true;
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }
        self.last_render = Instant::now();
        self.tick_fps();

        let mut stdout = io::stdout();
        let size = terminal::size()?;
        if size != self.size {
            log::debug!("Terminal resized to {}x{}", size.0, size.1);
            queue!(stdout, ResetColor, terminal::Clear(ClearType::All))?;
            self.size = size;
        }
        let (width, height) = size;
        let canvas = Canvas::from_frame(width / 2, height, frame);

        self.draw_canvas(&canvas, height.max(1), &mut stdout)?;
        for overlay in &frame.overlays {
            self.draw_text(&canvas, overlay.anchor, &overlay.text, &mut stdout)?;
        }
        if self.show_fps {
            let fps = format!("{} fps", self.fps);
            self.draw_text(&canvas, Anchor::Center { line: i8::MAX }, &fps, &mut stdout)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Polled> {
        let mut polled = Polled::default();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    self.held.record(key.code, key.kind, Instant::now());
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if is_quit(&key) {
                        polled.quit = true;
                    } else if let Some(k) = key_for(key.code) {
                        polled.input.pressed.push(k);
                    }
                }
                Event::Resize(..) => self.size = (0, 0),
                _ => {}
            }
        }
        polled.input.held = self.held.snapshot(Instant::now());
        Ok(polled)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let mut stdout = io::stdout();
        if self.enhanced {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        log::info!("Terminal restored");
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
