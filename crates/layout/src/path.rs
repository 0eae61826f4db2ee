//! Edge path descriptions.
//!
//! A [`PathData`] is a list of absolute drawing commands. Its `Display`
//! output is the compact SVG-like string handed to renderers, e.g.
//! `M 10 55 C 10 102.5, 40 102.5, 40 150`.

use crate::Point;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic bezier: two control points then the end point
    CurveTo(Point, Point, Point),
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo(p) => write!(f, "M {p}"),
            PathCommand::LineTo(p) => write!(f, "L {p}"),
            PathCommand::CurveTo(c1, c2, p) => write!(f, "C {c1}, {c2}, {p}"),
        }
    }
}

/// Drawing commands of one edge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subpath at `p`
    pub fn move_to(mut self, p: Point) -> Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    /// Straight line to `p`
    pub fn line_to(mut self, p: Point) -> Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    /// Cubic bezier to `p` through control points `c1` and `c2`
    pub fn curve_to(mut self, c1: Point, c2: Point, p: Point) -> Self {
        self.commands.push(PathCommand::CurveTo(c1, c2, p));
        self
    }

    /// The commands in drawing order
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Whether the path has no command
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Append `other`, joining it to the current end point with a line
    /// instead of starting a new subpath
    pub fn append_joined(&mut self, other: &PathData) {
        for command in &other.commands {
            let command = match *command {
                PathCommand::MoveTo(p) if !self.commands.is_empty() => PathCommand::LineTo(p),
                c => c,
            };
            self.commands.push(command);
        }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}
