//! Line-based presentation bridge
//!
//! One command per line. Every command is answered with the events it caused followed
//! by the current session view (score, timer, checklist, last message).

use std::io::{self, BufRead, Write};

use seek_engine::events::EventHandler;
use seek_engine::foundation::time::format_clock;
use seek_engine::prelude::*;

const HELP: &str = "\
Commands:
  start            begin a new search
  click <x> <y>    click at pixel (x, y)
  wait <seconds>   let time pass
  tick             advance the timer by one second
  hint             show where the remaining objects are on screen
  view <x> <y> <z> move the camera (it keeps looking at the scene target)
  resize <w> <h>   change the window size in pixels
  again            play again after winning
  status           show the session
  help             show this text
  quit             leave the game";

/// Input line errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Unrecognised command word
    #[error("Unknown command '{0}', type 'help'")]
    Unknown(String),

    /// Too few arguments
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// Argument is not a number
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start a session
    Start,
    /// Click at pixel coordinates
    Click {
        /// Pixels from the left edge
        x: f32,
        /// Pixels from the top edge
        y: f32,
    },
    /// Let frame time pass
    Wait(f32),
    /// One timer tick
    Tick,
    /// Screen positions of the remaining objects
    Hint,
    /// Move the camera
    View(Vec3),
    /// Change the viewport size
    Resize {
        /// Width in pixels
        width: f32,
        /// Height in pixels
        height: f32,
    },
    /// Play again after a win
    Again,
    /// Print the session
    Status,
    /// Print the command list
    Help,
    /// Leave
    Quit,
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(Self::Status);
        };
        let args: Vec<&str> = words.collect();

        let command = match word.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "click" => {
                let [x, y] = numbers::<2>(&args, "click <x> <y>")?;
                Self::Click { x, y }
            }
            "wait" => {
                let [seconds] = numbers::<1>(&args, "wait <seconds>")?;
                Self::Wait(seconds)
            }
            "tick" => Self::Tick,
            "hint" => Self::Hint,
            "view" => {
                let [x, y, z] = numbers::<3>(&args, "view <x> <y> <z>")?;
                Self::View(Vec3::new(x, y, z))
            }
            "resize" => {
                let [width, height] = numbers::<2>(&args, "resize <w> <h>")?;
                if width < 1.0 || height < 1.0 {
                    return Err(CommandError::Usage("resize <w> <h>"));
                }
                Self::Resize { width, height }
            }
            "again" => Self::Again,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn numbers<const N: usize>(args: &[&str], usage: &'static str) -> Result<[f32; N], CommandError> {
    if args.len() < N {
        return Err(CommandError::Usage(usage));
    }
    let mut values = [0.0; N];
    for (value, arg) in values.iter_mut().zip(args) {
        *value = arg
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CommandError::InvalidNumber((*arg).to_string()))?;
    }
    Ok(values)
}

/// Turns game events into console lines
#[derive(Debug, Default)]
struct EventFeed {
    lines: Vec<String>,
}

impl EventHandler for EventFeed {
    fn on_event(&mut self, event: &GameEvent) -> bool {
        let line = match event {
            GameEvent::SessionStarted { total } => format!("Find the {total} hidden objects!"),
            GameEvent::ObjectFound { feedback, .. } => feedback.clone(),
            GameEvent::Won { score, elapsed_seconds } => format!(
                "*** You found all {score} objects in {}! Type 'again' to play again. ***",
                format_clock(*elapsed_seconds)
            ),
            GameEvent::SessionReset => "The scene has been reset.".to_string(),
            GameEvent::Tick { .. } => return false,
        };
        self.lines.push(line);
        true
    }
}

/// Session view printed after every command
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut view = format!(
        "Score: {}/{}   Time: {}",
        snapshot.score,
        snapshot.total,
        snapshot.elapsed_clock()
    );

    match snapshot.phase {
        Phase::Idle => view.push_str("\nType 'start' to begin."),
        Phase::Running => {
            view.push_str("\nStill to find: ");
            view.push_str(&snapshot.remaining.join(", "));
        }
        Phase::Won => view.push_str("\nEverything found!"),
    }

    if !snapshot.message.is_empty() {
        view.push_str("\n> ");
        view.push_str(&snapshot.message);
    }
    view
}

/// Console game: scene, camera and state machine driven by text commands
pub struct ConsoleApp {
    config: GameConfig,
    scene: SceneIndex,
    camera: Camera,
    game: GameStateMachine,
    viewport: (f32, f32),
}

impl ConsoleApp {
    /// Assemble the scene and register its objects
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let mut scene = SceneIndex::new();
        assemble_props(&config.scene.props, &mut scene)?;

        let camera = config.scene.camera.to_camera(config.viewport.aspect_ratio());
        let mut game = GameStateMachine::new(HitResolver::new(config.scene.detection_radius));
        game.install_registry(config.scene.build_registry()?)?;

        let viewport = (config.viewport.width as f32, config.viewport.height as f32);
        Ok(Self {
            config,
            scene,
            camera,
            game,
            viewport,
        })
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> io::Result<()> {
        writeln!(out, "Welcome to {}!", self.config.scene.name)?;
        writeln!(out, "{HELP}")?;
        writeln!(out, "{}", render_snapshot(&self.game.snapshot()))?;

        for line in input.lines() {
            let line = line?;
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => writeln!(out, "{}", self.execute(command))?,
                Err(err) => writeln!(out, "! {err}")?,
            }
            out.flush()?;
        }
        Ok(())
    }

    /// Apply one command and describe the result
    pub fn execute(&mut self, command: Command) -> String {
        let mut lines = Vec::new();
        let show_session = match self.apply(command, &mut lines) {
            Ok(show) => show,
            Err(err) => {
                lines.push(format!("! {err}"));
                false
            }
        };

        let mut feed = EventFeed::default();
        self.game.dispatch_events(&mut [&mut feed as &mut dyn EventHandler]);
        lines.extend(feed.lines);

        if show_session {
            lines.push(render_snapshot(&self.game.snapshot()));
        }
        lines.join("\n")
    }

    fn apply(&mut self, command: Command, lines: &mut Vec<String>) -> Result<bool, GameError> {
        match command {
            Command::Start => self.game.start_game()?,
            Command::Click { x, y } => {
                let pointer = PointerEvent::new(x, y, self.viewport.0, self.viewport.1);
                let outcome = self.game.pointer_click(&pointer, &self.camera, &mut self.scene)?;
                if let Some(line) = self.describe(&outcome) {
                    lines.push(line);
                }
            }
            Command::Wait(seconds) => {
                let ticks = self.game.update(seconds);
                log::debug!("{} seconds waited, {} ticks applied", seconds, ticks);
            }
            Command::Tick => {
                self.game.tick();
            }
            Command::Hint => {
                lines.extend(self.hints().into_iter().map(|(label, at)| match at {
                    Some((x, y)) => format!("  {label}: click {x:.0} {y:.0}"),
                    None => format!("  {label}: not visible from here"),
                }));
                return Ok(false);
            }
            Command::View(position) => {
                self.camera.set_position(position);
                lines.push(format!("Camera moved to ({}, {}, {}).", position.x, position.y, position.z));
                return Ok(false);
            }
            Command::Resize { width, height } => {
                self.viewport = (width, height);
                self.camera.set_aspect_ratio(width / height);
                lines.push(format!("Viewport is now {width}x{height}."));
                return Ok(false);
            }
            Command::Again => self.restart()?,
            Command::Status => {}
            Command::Help => {
                lines.push(HELP.to_string());
                return Ok(false);
            }
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn describe(&self, outcome: &ClickOutcome) -> Option<String> {
        match outcome {
            ClickOutcome::Ignored if self.game.phase() == Phase::Idle => {
                Some("Type 'start' first.".to_string())
            }
            ClickOutcome::Ignored => Some("The game is over, type 'again'.".to_string()),
            ClickOutcome::Missed(reason) if self.config.engine.debug_mode => {
                Some(format!("Nothing here ({reason:?})."))
            }
            ClickOutcome::Missed(_) => Some("Nothing here.".to_string()),
            ClickOutcome::AlreadyFound(id) => {
                let label = self.game.registry().get(id).map_or(id.as_str(), |d| d.label.as_str());
                Some(format!("You already found the {label}."))
            }
            ClickOutcome::Found { .. } | ClickOutcome::Won { .. } => None,
        }
    }

    /// Tear down the won session, reload the scene and register fresh objects
    fn restart(&mut self) -> Result<(), GameError> {
        self.game.play_again()?;

        self.scene.clear();
        assemble_props(&self.config.scene.props, &mut self.scene)?;
        self.game.install_registry(self.config.scene.build_registry()?)?;
        Ok(())
    }

    /// Pixel position of every unfound object, `None` when none of its nodes is visible
    pub fn hints(&self) -> Vec<(String, Option<(f32, f32)>)> {
        self.game
            .registry()
            .iter()
            .filter(|descriptor| !descriptor.is_found())
            .map(|descriptor| {
                let at = descriptor
                    .aliases
                    .iter()
                    .find_map(|alias| aim_point(&self.scene, alias))
                    .and_then(|point| self.camera.world_to_screen(point, self.viewport.0, self.viewport.1));
                (descriptor.label.clone(), at)
            })
            .collect()
    }

    /// Current session view
    pub fn snapshot(&self) -> SessionSnapshot {
        self.game.snapshot()
    }
}

/// Centre of the first visible mesh at or below the node called `name`
fn aim_point(scene: &SceneIndex, name: &str) -> Option<Vec3> {
    let mut stack = vec![scene.node_by_name(name)?];
    while let Some(handle) = stack.pop() {
        let node = scene.get(handle)?;
        if let Some(bounds) = node.bounds {
            if scene.is_visible(handle) {
                return Some(bounds.transform(&scene.world_matrix(handle)).center());
            }
        }
        stack.extend(node.children().iter().rev());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house() -> GameConfig {
        GameConfig::load_from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/../resources/config/house.toml"))
            .unwrap()
    }

    fn app() -> ConsoleApp {
        ConsoleApp::new(house()).unwrap()
    }

    fn click_hint(app: &mut ConsoleApp, label: &str) -> String {
        let (_, at) = app.hints().into_iter().find(|(l, _)| l == label).unwrap();
        let (x, y) = at.unwrap();
        app.execute(Command::Click { x, y })
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("start"), Ok(Command::Start));
        assert_eq!(Command::parse("  CLICK 10 20.5 "), Ok(Command::Click { x: 10.0, y: 20.5 }));
        assert_eq!(Command::parse("wait 2.5"), Ok(Command::Wait(2.5)));
        assert_eq!(Command::parse("view 1 2 3"), Ok(Command::View(Vec3::new(1.0, 2.0, 3.0))));
        assert_eq!(Command::parse(""), Ok(Command::Status));
        assert_eq!(Command::parse("click 10"), Err(CommandError::Usage("click <x> <y>")));
        assert_eq!(Command::parse("wait soon"), Err(CommandError::InvalidNumber("soon".into())));
        assert_eq!(Command::parse("jump"), Err(CommandError::Unknown("jump".into())));
        assert_eq!(Command::parse("resize 800 600"), Ok(Command::Resize { width: 800.0, height: 600.0 }));
        assert_eq!(Command::parse("resize 0 600"), Err(CommandError::Usage("resize <w> <h>")));
    }

    #[test]
    fn test_clicks_follow_a_resized_window() {
        let mut app = app();
        app.execute(Command::Start);
        let before = app.hints();

        let report = app.execute(Command::Resize { width: 800.0, height: 800.0 });
        assert!(report.contains("Viewport is now 800x800."));
        assert_ne!(app.hints(), before);

        let report = click_hint(&mut app, "Spray paint");
        assert!(report.contains("Score: 1/5"));
    }

    #[test]
    fn test_very_long_wait_returns() {
        let mut app = app();
        app.execute(Command::Start);
        app.execute(Command::Wait(2.0e7));

        assert_eq!(app.snapshot().elapsed_seconds, 20_000_000);
    }

    #[test]
    fn test_house_scene_is_valid() {
        let config = house();
        assert!(config.validate().is_ok());
        assert_eq!(config.scene.objects.len(), 5);
        approx::assert_relative_eq!(config.scene.detection_radius, 9.0);
    }

    #[test]
    fn test_every_object_is_visible_from_the_start() {
        let app = app();
        let hints = app.hints();

        assert_eq!(hints.len(), 5);
        for (label, at) in hints {
            assert!(at.is_some(), "{label} should be on screen");
        }
    }

    #[test]
    fn test_clicks_before_start_are_ignored() {
        let mut app = app();
        let report = app.execute(Command::Click { x: 640.0, y: 360.0 });

        assert!(report.contains("Type 'start' first."));
        assert_eq!(app.snapshot().score, 0);
    }

    #[test]
    fn test_full_game_and_replay() {
        let mut app = app();
        assert!(app.execute(Command::Start).contains("Find the 5 hidden objects!"));

        let report = click_hint(&mut app, "Camera");
        assert!(report.contains("You clicked the camera! Camera hidden."));
        assert!(report.contains("Score: 1/5"));

        app.execute(Command::Wait(65.0));
        for label in ["Rat", "Spray paint", "Baseball"] {
            click_hint(&mut app, label);
        }
        assert_eq!(app.snapshot().remaining, vec!["Garden gloves"]);

        let report = click_hint(&mut app, "Garden gloves");
        assert!(report.contains("You found all 5 objects in 01:05!"));
        assert!(app.snapshot().is_won());

        let report = app.execute(Command::Again);
        assert!(report.contains("The scene has been reset."));
        assert_eq!(app.hints().len(), 5);

        app.execute(Command::Start);
        let fresh = app.snapshot();
        assert_eq!((fresh.score, fresh.total, fresh.elapsed_seconds), (0, 5, 0));
    }

    #[test]
    fn test_invalid_transition_is_reported() {
        let mut app = app();
        let report = app.execute(Command::Again);

        assert!(report.starts_with("! Cannot play again"));
    }

    #[test]
    fn test_scripted_session() {
        let mut app = app();
        let mut out = Vec::new();
        app.run("start\ntick\nbogus\nquit\nstart\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Welcome to house!"));
        assert!(text.contains("Score: 0/5   Time: 00:01"));
        assert!(text.contains("! Unknown command 'bogus'"));
        assert!(!text.contains("! Cannot start"));
    }

    #[test]
    fn test_render_won_snapshot() {
        let snapshot = SessionSnapshot {
            phase: Phase::Won,
            score: 2,
            total: 2,
            remaining: Vec::new(),
            elapsed_seconds: 42,
            message: "You found the Rat!".into(),
        };

        assert_eq!(
            render_snapshot(&snapshot),
            "Score: 2/2   Time: 00:42\nEverything found!\n> You found the Rat!"
        );
    }
}
