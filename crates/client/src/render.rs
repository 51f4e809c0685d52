//! Render step
//!
//! The session calls a [`Renderer`] synchronously after every mutation. The
//! library ships a plain text implementation; richer front ends implement
//! the trait themselves.

use std::io::Write;

use fleche_protocol::Direction;

use crate::grid::{GridModel, Position};
use crate::reconnect::ConnectionStatus;
use crate::roster::PlayerRoster;
use crate::selection::SelectionView;
use crate::state::SessionState;
use crate::sync::CellChange;

/// Sink for everything the user sees
pub trait Renderer {
    /// Full redraw of grid and fill
    fn grid(&mut self, grid: &GridModel, state: &SessionState);

    /// One cell changed; `change.author` is set for remote edits
    fn cell(&mut self, change: &CellChange);

    /// Cursor, highlighted word and active clue
    fn selection(&mut self, view: &SelectionView);

    fn roster(&mut self, roster: &PlayerRoster);

    fn connection(&mut self, status: ConnectionStatus);

    /// Inline error (join rejection, invalid move)
    fn error(&mut self, message: &str);
}

/// Line-oriented renderer for terminals and logs
///
/// Write errors are ignored: losing a frame must not stop the session.
pub struct TextRenderer<W: Write> {
    out: W,
    view: Option<SelectionView>,
}

impl<W: Write> TextRenderer<W> {
    pub const fn new(out: W) -> Self {
        Self { out, view: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn glyph(&self, grid: &GridModel, state: &SessionState, pos: Position) -> String {
        let Some(cell) = grid.cell(pos) else {
            return String::new();
        };
        if cell.black {
            let arrows: String = [Direction::Right, Direction::Down]
                .into_iter()
                .filter(|&d| cell.definition(d).is_some())
                .map(Direction::arrow)
                .collect();
            return format!("{arrows:#<2}");
        }

        let letter = state.get(pos).unwrap_or('.');
        let view = self.view.as_ref();
        if view.and_then(|v| v.cursor) == Some(pos) {
            format!("[{letter}")
        } else if view.is_some_and(|v| v.highlighted.contains(&pos)) {
            format!("-{letter}")
        } else {
            format!(" {letter}")
        }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn grid(&mut self, grid: &GridModel, state: &SessionState) {
        for row in 0..grid.rows() {
            let line: String = (0..grid.cols())
                .map(|col| self.glyph(grid, state, Position::new(row, col)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(self.out, "{line}");
        }
        let _ = self.out.flush();
    }

    fn cell(&mut self, change: &CellChange) {
        let value = change.value.unwrap_or('.');
        let Position { row, col } = change.position;
        let _ = match &change.author {
            Some(author) => writeln!(self.out, "({row},{col}) = {value}  by {author}"),
            None => writeln!(self.out, "({row},{col}) = {value}"),
        };
    }

    fn selection(&mut self, view: &SelectionView) {
        if let Some(Position { row, col }) = view.cursor {
            let _ = writeln!(self.out, "cursor ({row},{col}) {}", view.direction.arrow());
        }
        if let Some(label) = view.definition_label() {
            let _ = writeln!(self.out, "clue: {label}");
        }
        self.view = Some(view.clone());
    }

    fn roster(&mut self, roster: &PlayerRoster) {
        let names: Vec<String> = roster
            .badges()
            .map(|b| {
                let mut badge = b.pseudo.clone();
                if !b.color.is_empty() {
                    badge.push_str(&format!(" {}", b.color));
                }
                if b.leaving {
                    badge.push_str(" (leaving)");
                }
                badge
            })
            .collect();
        let _ = writeln!(self.out, "players: {}", names.join(", "));
    }

    fn connection(&mut self, status: ConnectionStatus) {
        let _ = writeln!(self.out, "[{status}]");
    }

    fn error(&mut self, message: &str) {
        let _ = writeln!(self.out, "error: {message}");
    }
}
