//! Fixed-rate run loop
//!
//! Drives any `Simulation` against a `Surface`: poll input, tick at the
//! game's rate, present the frame. When a run ends the end screen takes over
//! (initials entry for a qualifying score, then restart or back to the menu).

use std::io;
use std::mem;
use std::path::Path;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use crate::highscores::{HighScores, InitialsPrompt, PromptEvent};
use crate::menu::{Menu, MenuItem};
use crate::renderer::{Polled, Surface};
use crate::settings::Settings;
use crate::sim::breakout::BreakoutState;
use crate::sim::jumper::JumperState;
use crate::sim::snake::SnakeState;
use crate::sim::{Anchor, Frame, Key, RunOutcome, Simulation, TextOverlay, TickInput};

/// Longest sleep between input polls
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// The three games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Breakout,
    Jumper,
    Snake,
}

impl GameKind {
    pub fn name(&self) -> &'static str {
        match self {
            GameKind::Breakout => "Breakout",
            GameKind::Jumper => "Jumper",
            GameKind::Snake => "Snake",
        }
    }

    /// High score file name for this game
    pub fn scores_file(&self) -> &'static str {
        match self {
            GameKind::Breakout => "breakout_scores.txt",
            GameKind::Jumper => "jumper_scores.txt",
            GameKind::Snake => "snake_scores.txt",
        }
    }
}

/// How the play phase of a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayExit {
    Finished(RunOutcome),
    /// Escape pressed mid-run
    Abandoned,
}

/// Choice made on the end screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterRun {
    Restart,
    Menu,
}

/// Fixed-step timer
#[derive(Debug)]
struct Pacer {
    step: Duration,
    next: Instant,
}

impl Pacer {
    fn new(hz: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / hz.max(1),
            next: Instant::now(),
        }
    }

    /// True when a tick is due. Missed ticks are dropped, not replayed.
    fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.step;
        if self.next < now {
            self.next = now + self.step;
        }
        true
    }

    fn wait(&self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep((self.next - now).min(POLL_INTERVAL));
        }
    }
}

/// Restore the display and exit the process
pub fn quit(surface: &mut dyn Surface) -> ! {
    log::info!("Quit requested");
    if let Err(e) = surface.cleanup() {
        log::error!("Failed to restore terminal: {}", e);
    }
    process::exit(0);
}

fn poll(surface: &mut dyn Surface) -> io::Result<Polled> {
    let polled = surface.poll_input()?;
    if polled.quit {
        quit(surface);
    }
    Ok(polled)
}

/// Main menu loop; returns when Quit is chosen
pub fn run_menu(surface: &mut dyn Surface, settings: &Settings) -> io::Result<()> {
    let mut menu = Menu::new();
    loop {
        surface.present(&menu.frame())?;
        let polled = poll(surface)?;
        for key in polled.input.pressed {
            let Some(item) = menu.handle(key) else {
                continue;
            };
            log::info!("Menu: {}", item.label());
            match item {
                MenuItem::Breakout(level) => run_breakout(surface, settings, level)?,
                MenuItem::Jumper => run_jumper(surface, settings)?,
                MenuItem::Snake => run_snake(surface, settings)?,
                MenuItem::Quit => return Ok(()),
            }
            // Keys typed during the game do not carry over
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Play Breakout on a layout (0-based) until the player returns to the menu
pub fn run_breakout(
    surface: &mut dyn Surface,
    settings: &Settings,
    level: usize,
) -> io::Result<()> {
    run_game(surface, settings, GameKind::Breakout, |seed| {
        BreakoutState::new(level, seed)
    })
}

/// Play Jumper until the player returns to the menu
pub fn run_jumper(surface: &mut dyn Surface, settings: &Settings) -> io::Result<()> {
    run_game(surface, settings, GameKind::Jumper, JumperState::new)
}

/// Play Snake until the player returns to the menu
pub fn run_snake(surface: &mut dyn Surface, settings: &Settings) -> io::Result<()> {
    run_game(surface, settings, GameKind::Snake, SnakeState::new)
}

fn run_game<G, F>(
    surface: &mut dyn Surface,
    settings: &Settings,
    game: GameKind,
    mut new_run: F,
) -> io::Result<()>
where
    G: Simulation,
    F: FnMut(u64) -> G,
{
    let path = settings.scores_path(game);
    loop {
        let seed = settings.seed_for_run();
        log::info!("Starting {} (seed {})", game.name(), seed);
        let mut scores = HighScores::load(&path);
        let mut sim = new_run(seed);

        let outcome = match play(surface, &mut sim, settings.tick_rate(game))? {
            PlayExit::Finished(outcome) => outcome,
            PlayExit::Abandoned => {
                log::info!("{} abandoned with score {}", game.name(), sim.score());
                return Ok(());
            }
        };

        log::info!("{} ended: {:?}, score {}", game.name(), outcome, sim.score());
        let last_frame = sim.frame();
        let result = RunResult {
            game,
            outcome,
            score: sim.score(),
        };
        match end_of_run(surface, &mut scores, &path, result, &last_frame)? {
            AfterRun::Restart => continue,
            AfterRun::Menu => return Ok(()),
        }
    }
}

/// Tick the simulation at `hz` until it reaches a terminal state
fn play<G: Simulation>(surface: &mut dyn Surface, sim: &mut G, hz: u32) -> io::Result<PlayExit> {
    let mut pacer = Pacer::new(hz);
    let mut pending: Vec<Key> = Vec::new();
    surface.present(&sim.frame())?;

    loop {
        let polled = poll(surface)?;
        if polled.input.was_pressed(Key::Escape) {
            return Ok(PlayExit::Abandoned);
        }
        pending.extend(polled.input.pressed);

        if pacer.due(Instant::now()) {
            let input = TickInput {
                held: polled.input.held,
                pressed: mem::take(&mut pending),
            };
            sim.tick(&input);
            surface.present(&sim.frame())?;
            if let Some(outcome) = sim.outcome() {
                return Ok(PlayExit::Finished(outcome));
            }
        }
        pacer.wait();
    }
}

/// Text drawn over the final frame of a run
pub fn end_screen_overlays(
    outcome: RunOutcome,
    score: u32,
    scores: &HighScores,
    prompt: Option<&InitialsPrompt>,
) -> Vec<TextOverlay> {
    let mut lines = Vec::new();
    let mut line = |row: i8, text: String| {
        lines.push(TextOverlay {
            anchor: Anchor::Center { line: row },
            text,
        })
    };

    let title = match outcome {
        RunOutcome::Cleared => "Level Cleared!",
        RunOutcome::GameOver => "Game Over",
    };
    line(-4, title.to_string());
    line(-3, format!("Final Score: {}", score));

    if let Some(prompt) = prompt {
        line(-1, format!("New High Score! Initials: {}", prompt.display()));
        line(0, "Type letters, Enter to save, Esc to skip".to_string());
        return lines;
    }

    line(-1, "Enter: play again   Esc: menu".to_string());
    if !scores.is_empty() {
        line(1, "High Scores".to_string());
        for (i, entry) in scores.entries.iter().enumerate() {
            line(
                2 + i as i8,
                format!("{}. {} {:>6}", i + 1, entry.initials, entry.score),
            );
        }
    }
    lines
}

/// How a finished run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub game: GameKind,
    pub outcome: RunOutcome,
    pub score: u32,
}

/// End screen: record initials for a qualifying score, then wait for
/// Enter (restart) or Escape (menu)
///
/// `scores` is the table read when the run started; it is written back to
/// `path` when initials are submitted.
pub fn end_of_run(
    surface: &mut dyn Surface,
    scores: &mut HighScores,
    path: &Path,
    result: RunResult,
    last_frame: &Frame,
) -> io::Result<AfterRun> {
    let RunResult {
        game,
        outcome,
        score,
    } = result;
    let mut prompt = scores.qualifies(score).then(InitialsPrompt::new);

    loop {
        let mut frame = last_frame.clone();
        frame
            .overlays
            .extend(end_screen_overlays(outcome, score, scores, prompt.as_ref()));
        surface.present(&frame)?;

        let polled = poll(surface)?;
        for key in polled.input.pressed {
            if let Some(p) = prompt.as_mut() {
                match p.handle(key) {
                    PromptEvent::Editing => {}
                    PromptEvent::Submitted(initials) => {
                        if let Some(rank) = scores.add_score(&initials, score) {
                            log::info!(
                                "{} high score #{}: {} {}",
                                game.name(),
                                rank,
                                initials,
                                score
                            );
                        }
                        if let Err(e) = scores.save(path) {
                            log::error!(
                                "Failed to save high scores to {}: {}",
                                path.display(),
                                e
                            );
                        }
                        prompt = None;
                    }
                    PromptEvent::Skipped => prompt = None,
                }
                continue;
            }
            match key {
                Key::Enter => return Ok(AfterRun::Restart),
                Key::Escape => return Ok(AfterRun::Menu),
                _ => {}
            }
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::PathBuf;

    /// Feeds one scripted key per poll on menus and end screens, and idles
    /// during play. Runs out of script by pressing Escape.
    #[derive(Default)]
    struct ScriptedSurface {
        during_play: VecDeque<Key>,
        keys: VecDeque<Key>,
        frames: Vec<Frame>,
        polls: usize,
        /// File contents written on the first poll during play
        rewrite_during_play: Option<(PathBuf, String)>,
    }

    impl ScriptedSurface {
        fn with_keys(keys: &[Key]) -> Self {
            Self {
                keys: keys.iter().copied().collect(),
                ..Default::default()
            }
        }

        fn waiting_for_key(&self) -> bool {
            self.frames.last().is_some_and(|f| {
                f.overlays.iter().any(|o| {
                    o.text.contains("Esc: menu")
                        || o.text.contains("Esc to skip")
                        || o.text.contains("Choose a Game:")
                })
            })
        }

        fn shown(&self, text: &str) -> bool {
            self.frames
                .iter()
                .any(|f| f.overlays.iter().any(|o| o.text.contains(text)))
        }
    }

    impl Surface for ScriptedSurface {
        fn init(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn present(&mut self, frame: &Frame) -> io::Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn poll_input(&mut self) -> io::Result<Polled> {
            self.polls += 1;
            let mut polled = Polled::default();
            if self.waiting_for_key() {
                polled.input.pressed.push(self.keys.pop_front().unwrap_or(Key::Escape));
            } else if let Some((path, contents)) = self.rewrite_during_play.take() {
                fs::write(path, contents)?;
            } else if let Some(key) = self.during_play.pop_front() {
                polled.input.pressed.push(key);
            } else if self.polls > 200_000 {
                polled.input.pressed.push(Key::Escape);
            }
            Ok(polled)
        }

        fn cleanup(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn test_settings(name: &str) -> Settings {
        let data_dir: PathBuf =
            std::env::temp_dir().join(format!("mini-arcade-app-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&data_dir);
        fs::create_dir_all(&data_dir).unwrap();
        Settings {
            data_dir,
            seed: Some(1),
            breakout_hz: 1000,
            jumper_hz: 1000,
            snake_hz: 1000,
            show_fps: false,
        }
    }

    #[test]
    fn test_pacer_drops_missed_ticks() {
        let mut pacer = Pacer::new(10);
        let start = pacer.next;
        assert!(pacer.due(start));
        assert!(!pacer.due(start + Duration::from_millis(50)));
        // Far behind: one tick, then rescheduled from now
        let late = start + Duration::from_secs(5);
        assert!(pacer.due(late));
        assert!(!pacer.due(late + Duration::from_millis(50)));
        assert!(pacer.due(late + Duration::from_millis(100)));
    }

    #[test]
    fn test_snake_runs_to_game_over_and_back_to_menu() {
        let settings = test_settings("snake");
        let mut surface = ScriptedSurface::with_keys(&[Key::Escape]);
        run_snake(&mut surface, &settings).unwrap();

        assert!(surface.shown("Game Over"));
        assert!(surface.shown("Final Score: 0"));
        // A zero score never asks for initials
        assert!(!surface.shown("Initials"));
        assert!(!settings.scores_path(GameKind::Snake).exists());
        fs::remove_dir_all(&settings.data_dir).unwrap();
    }

    #[test]
    fn test_scores_read_when_run_starts() {
        let settings = test_settings("read-at-start");
        let path = settings.scores_path(GameKind::Snake);
        fs::write(&path, "AAA 50\n").unwrap();
        let mut surface = ScriptedSurface {
            keys: VecDeque::from([Key::Escape]),
            rewrite_during_play: Some((path.clone(), "ZZZ 90\n".to_string())),
            ..Default::default()
        };
        run_snake(&mut surface, &settings).unwrap();

        // The end screen shows the table as it was when the run began
        assert!(surface.shown("1. AAA"));
        assert!(!surface.shown("ZZZ"));
        fs::remove_dir_all(&settings.data_dir).unwrap();
    }

    #[test]
    fn test_escape_abandons_run() {
        let settings = test_settings("abandon");
        let mut surface = ScriptedSurface {
            during_play: VecDeque::from([Key::Escape]),
            ..Default::default()
        };
        run_breakout(&mut surface, &settings, 0).unwrap();
        assert!(!surface.shown("Game Over"));
        assert!(surface.shown("Press SPACE to Start"));
        fs::remove_dir_all(&settings.data_dir).unwrap();
    }

    #[test]
    fn test_restart_from_end_screen() {
        let settings = test_settings("restart");
        let mut surface = ScriptedSurface::with_keys(&[Key::Enter, Key::Escape]);
        run_snake(&mut surface, &settings).unwrap();
        let game_overs = surface
            .frames
            .iter()
            .filter(|f| f.overlays.iter().any(|o| o.text == "Game Over"))
            .count();
        assert!(game_overs >= 2);
        fs::remove_dir_all(&settings.data_dir).unwrap();
    }

    #[test]
    fn test_qualifying_score_records_initials() {
        let settings = test_settings("initials");
        let mut surface = ScriptedSurface::with_keys(&[
            Key::Letter('a'),
            Key::Letter('b'),
            Key::Letter('c'),
            Key::Enter,
            Key::Enter,
        ]);
        let last = Frame::new(glam::Vec2::new(600.0, 400.0));
        let path = settings.scores_path(GameKind::Jumper);
        let result = RunResult {
            game: GameKind::Jumper,
            outcome: RunOutcome::GameOver,
            score: 7,
        };
        let mut scores = HighScores::load(&path);
        let after = end_of_run(&mut surface, &mut scores, &path, result, &last).unwrap();

        assert_eq!(after, AfterRun::Restart);
        assert!(surface.shown("New High Score! Initials: AB_"));
        assert!(surface.shown("1. ABC"));
        let saved = fs::read_to_string(&path).unwrap();
        assert_eq!(saved, "ABC 7\n");
        fs::remove_dir_all(&settings.data_dir).unwrap();
    }

    #[test]
    fn test_skipping_initials_saves_nothing() {
        let settings = test_settings("skip");
        let mut surface = ScriptedSurface::with_keys(&[Key::Escape, Key::Escape]);
        let last = Frame::new(glam::Vec2::new(600.0, 400.0));
        let path = settings.scores_path(GameKind::Breakout);
        let result = RunResult {
            game: GameKind::Breakout,
            outcome: RunOutcome::Cleared,
            score: 500,
        };
        let mut scores = HighScores::load(&path);
        let after = end_of_run(&mut surface, &mut scores, &path, result, &last).unwrap();
        assert_eq!(after, AfterRun::Menu);
        assert!(surface.shown("Level Cleared!"));
        assert!(!path.exists());
        fs::remove_dir_all(&settings.data_dir).unwrap();
    }

    #[test]
    fn test_menu_dispatches_and_quits() {
        let settings = test_settings("menu");
        let mut surface = ScriptedSurface::with_keys(&[
            Key::Down,
            Key::Down,
            Key::Down,
            Key::Down,
            Key::Enter,
            Key::Escape,
            Key::Escape,
        ]);
        run_menu(&mut surface, &settings).unwrap();
        assert!(surface.shown("Choose a Game:"));
        assert!(surface.shown("Game Over"));
        assert!(surface.keys.is_empty());
        fs::remove_dir_all(&settings.data_dir).unwrap();
    }

    #[test]
    fn test_end_screen_lists_scores() {
        let mut scores = HighScores::new();
        scores.add_score("AAA", 50);
        let lines = end_screen_overlays(RunOutcome::GameOver, 3, &scores, None);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts[0], "Game Over");
        assert!(texts.contains(&"High Scores"));
        assert!(texts.iter().any(|t| t.starts_with("1. AAA")));

        let prompt = InitialsPrompt::new();
        let lines = end_screen_overlays(RunOutcome::GameOver, 3, &scores, Some(&prompt));
        assert!(lines.iter().all(|l| !l.text.contains("High Scores")));
    }
}
