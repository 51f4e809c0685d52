//! Key names to grid commands
//!
//! Names follow browser `KeyboardEvent.key` values so a web front end can
//! forward them untouched.

/// A key press relevant to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    ArrowDown,
    ArrowUp,
    Tab,
    Backspace,
    Delete,
    Letter(char),
    Other,
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            "ArrowRight" => Self::ArrowRight,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowDown" => Self::ArrowDown,
            "ArrowUp" => Self::ArrowUp,
            "Tab" => Self::Tab,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => {
                        Self::Letter(c.to_ascii_uppercase())
                    }
                    _ => Self::Other,
                }
            }
        }
    }
}

/// What a key asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move by `(d_row, d_col)`, whatever the reading direction
    Move(isize, isize),
    ToggleDirection,
    /// Clear the selected cell, optionally stepping back afterwards
    Erase { then_prev: bool },
    /// Write a letter and advance
    Type(char),
}

impl Key {
    pub const fn command(self) -> Option<Command> {
        match self {
            Self::ArrowRight => Some(Command::Move(0, 1)),
            Self::ArrowLeft => Some(Command::Move(0, -1)),
            Self::ArrowDown => Some(Command::Move(1, 0)),
            Self::ArrowUp => Some(Command::Move(-1, 0)),
            Self::Tab => Some(Command::ToggleDirection),
            Self::Backspace => Some(Command::Erase { then_prev: true }),
            Self::Delete => Some(Command::Erase { then_prev: false }),
            Self::Letter(c) => Some(Command::Type(c)),
            Self::Other => None,
        }
    }
}
