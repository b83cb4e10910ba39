//! Drives a headless decoration from a line-oriented event script.
//!
//! One command per line. Lines whose first non-blank character is `#` are
//! comments; a `#` later in a line is ordinary text:
//!
//! ```text
//! resize 300 200
//! title Terminal
//! motion 290 12
//! press
//! release
//! render
//! ```

use std::io::{BufRead, Write};

use smithay::{
    backend::input::ButtonState,
    utils::{Logical, Point, Rectangle, Size},
};

use crate::{
    DecorationError, Result,
    action::DecorationAction,
    headless::{HeadlessOutput, HeadlessWindow, WindowDamage},
    render_helpers::{Canvas, RenderTarget},
    surface::{BTN_LEFT, DecorationSurface},
    theme::DecorationTheme,
    window::DecoratedWindow,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Resize(i32, i32),
    Title(String),
    Enter(i32, i32),
    Motion(i32, i32),
    Leave,
    Press,
    Release,
    TouchDown(i32, i32),
    TouchMotion(i32, i32),
    TouchUp,
    Fullscreen(bool),
    Activate(bool),
    Render,
}

impl Command {
    /// Parses one script line; `Ok(None)` for blank lines and comments.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match name {
            "resize" => {
                let (w, h) = parse_pair(rest)?;
                Command::Resize(w, h)
            }
            "title" => Command::Title(rest.to_owned()),
            "enter" => parse_pair(rest).map(|(x, y)| Command::Enter(x, y))?,
            "motion" => parse_pair(rest).map(|(x, y)| Command::Motion(x, y))?,
            "leave" => no_args(rest, Command::Leave)?,
            "press" => no_args(rest, Command::Press)?,
            "release" => no_args(rest, Command::Release)?,
            "touch-down" => parse_pair(rest).map(|(x, y)| Command::TouchDown(x, y))?,
            "touch-motion" => parse_pair(rest).map(|(x, y)| Command::TouchMotion(x, y))?,
            "touch-up" => no_args(rest, Command::TouchUp)?,
            "fullscreen" => Command::Fullscreen(parse_switch(rest)?),
            "activate" => Command::Activate(parse_switch(rest)?),
            "render" => no_args(rest, Command::Render)?,
            other => return Err(format!("unknown command `{other}`")),
        };
        Ok(Some(command))
    }
}

fn parse_pair(args: &str) -> std::result::Result<(i32, i32), String> {
    let mut parts = args.split_whitespace();
    let mut next = |what: &str| -> std::result::Result<i32, String> {
        let raw = parts.next().ok_or_else(|| format!("missing {what}"))?;
        raw.parse::<i32>()
            .map_err(|err| format!("invalid {what} `{raw}` ({err})"))
    };
    let pair = (next("x")?, next("y")?);
    match parts.next() {
        Some(extra) => Err(format!("unexpected argument `{extra}`")),
        None => Ok(pair),
    }
}

fn parse_switch(args: &str) -> std::result::Result<bool, String> {
    match args {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(format!("expected on or off, got `{other}`")),
    }
}

fn no_args(args: &str, command: Command) -> std::result::Result<Command, String> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(format!("unexpected argument `{args}`"))
    }
}

pub struct Replay {
    window: HeadlessWindow,
    output: HeadlessOutput,
    surface: DecorationSurface<HeadlessWindow>,
}

impl Replay {
    const INITIAL_CONTENT: (i32, i32) = (640, 480);

    pub fn new(theme: DecorationTheme) -> Self {
        let output = HeadlessOutput::new();
        let window = HeadlessWindow::new(
            "",
            Rectangle::from_size(Self::INITIAL_CONTENT.into()),
            Some(output.clone()),
        );
        let surface = DecorationSurface::new(window.clone(), theme);
        Self {
            window,
            output,
            surface,
        }
    }

    pub fn surface(&self) -> &DecorationSurface<HeadlessWindow> {
        &self.surface
    }

    /// Runs every line of `script`, writing one line per observable effect.
    pub fn run(&mut self, script: impl BufRead, mut out: impl Write) -> Result<()> {
        for (index, line) in script.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|err| {
                DecorationError::Io(format!("failed to read line {line_number}: {err}"))
            })?;
            let Some(command) = Command::parse(&line)
                .map_err(|msg| DecorationError::Replay(format!("line {line_number}: {msg}")))?
            else {
                continue;
            };

            for event in self.apply(command) {
                writeln!(out, "{line_number}: {event}").map_err(|err| {
                    DecorationError::Io(format!("failed to write replay output: {err}"))
                })?;
            }
        }
        Ok(())
    }

    /// Applies one command and describes what the decoration did.
    pub fn apply(&mut self, command: Command) -> Vec<String> {
        tracing::trace!(?command, "replaying");
        let mut events = Vec::new();

        let action = match command {
            Command::Resize(width, height) => {
                let target = Size::from((width.max(0), height.max(0)));
                let content = self.surface.calculate_resize_size(target);
                let loc = self.window.wm_geometry().loc;
                self.window.set_geometry(Rectangle::new(loc, content));
                let frame = self.surface.expand_wm_geometry(self.window.wm_geometry());
                self.surface.notify_view_resized(frame);
                DecorationAction::None
            }
            Command::Title(title) => {
                self.window.set_title(title);
                self.surface.dispatch_signals();
                DecorationAction::None
            }
            Command::Enter(x, y) => {
                self.surface.on_pointer_enter(x, y);
                DecorationAction::None
            }
            Command::Motion(x, y) => {
                self.surface.on_pointer_motion(x, y);
                DecorationAction::None
            }
            Command::Leave => {
                self.surface.on_pointer_leave();
                DecorationAction::None
            }
            Command::Press => self.surface.on_pointer_button(BTN_LEFT, ButtonState::Pressed),
            Command::Release => self.surface.on_pointer_button(BTN_LEFT, ButtonState::Released),
            Command::TouchDown(x, y) => self.surface.on_touch_down(x, y),
            Command::TouchMotion(x, y) => {
                self.surface.on_touch_motion(x, y);
                DecorationAction::None
            }
            Command::TouchUp => self.surface.on_touch_up(),
            Command::Fullscreen(fullscreen) => {
                self.window.set_fullscreen(fullscreen);
                self.surface.notify_view_fullscreen();
                DecorationAction::None
            }
            Command::Activate(active) => {
                self.surface.notify_view_activated(active);
                DecorationAction::None
            }
            Command::Render => {
                events.push(self.render());
                DecorationAction::None
            }
        };

        events.push(format!("state {:?}", self.surface.layout().state()));
        if action != DecorationAction::None {
            events.push(format!("action {action:?}"));
        }
        events.extend(
            self.window
                .take_requests()
                .into_iter()
                .map(|request| format!("window {request:?}")),
        );
        events.extend(
            self.output
                .take_requests()
                .into_iter()
                .map(|request| format!("output {request:?}")),
        );

        let damage = self.window.take_damage();
        if !damage.is_empty() {
            let full = damage.iter().filter(|d| **d == WindowDamage::Full).count();
            events.push(format!("damage full={full} rects={}", damage.len() - full));
        }
        events
    }

    fn render(&mut self) -> String {
        let size = self.surface.get_size();
        let mut canvas = Canvas::new((size.w, size.h), 1.0);
        let full = Rectangle::from_size(canvas.buffer().size());
        let origin = Point::<i32, Logical>::from((0, 0));
        let Ok(()) = self.surface.render(&mut canvas, origin, &[full]);

        format!(
            "render {}x{} scale={} covered={}",
            size.w,
            size.h,
            canvas.scale().x,
            canvas.buffer().covered_pixels()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DecorationConfig;

    use super::*;

    #[test]
    fn commands_parse() {
        assert_eq!(Command::parse("resize 300 200"), Ok(Some(Command::Resize(300, 200))));
        assert_eq!(
            Command::parse("title  Hello world "),
            Ok(Some(Command::Title("Hello world".to_owned())))
        );
        assert_eq!(Command::parse("  # comment"), Ok(None));
        assert_eq!(Command::parse("fullscreen on"), Ok(Some(Command::Fullscreen(true))));
        assert_eq!(
            Command::parse("title C# notes"),
            Ok(Some(Command::Title("C# notes".to_owned())))
        );
        assert!(Command::parse("press # now").is_err());
        assert!(Command::parse("motion 1").is_err());
        assert!(Command::parse("press now").is_err());
        assert!(Command::parse("shade").is_err());
    }

    #[test]
    fn script_errors_carry_line_numbers() {
        let mut replay = Replay::new(DecorationTheme::new(DecorationConfig::default()));
        let err = replay
            .run("resize 300 200\nmotion x 1\n".as_bytes(), Vec::new())
            .unwrap_err();
        assert!(matches!(err, DecorationError::Replay(msg) if msg.starts_with("line 2:")));
    }

    #[test]
    fn click_on_close_is_reported() {
        let mut replay = Replay::new(DecorationTheme::new(DecorationConfig::default()));
        let mut out = Vec::new();
        replay
            .run("resize 300 200\nmotion 290 12\npress\nrelease\n".as_bytes(), &mut out)
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("4: action Close"), "{out}");
        assert!(out.contains("4: window Close"), "{out}");
    }
}
