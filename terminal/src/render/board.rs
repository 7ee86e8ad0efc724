use common::ReplayStore;

const EMPTY_CELL: char = '.';

/// Formats a square tile grid as boxed text, one `String` per line.
pub struct BoardRenderer {
    cell_width: usize,
}

impl BoardRenderer {
    pub fn new(cell_width: usize) -> Self {
        Self {
            cell_width: cell_width.max(1),
        }
    }

    /// Sizes cells for the widest tile anywhere in the replay, so the board
    /// doesn't change width while stepping through it.
    pub fn for_store(store: &ReplayStore) -> Self {
        let widest = store
            .moves()
            .iter()
            .flat_map(|m| m.tiles.iter())
            .map(|t| t.to_string().len())
            .max()
            .unwrap_or(1);
        Self::new(widest)
    }

    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    /// Tiles missing from a short slice (e.g. before the first move) render empty.
    pub fn render(&self, tiles: &[i64], dimension: usize) -> Vec<String> {
        let inner_width = dimension * (self.cell_width + 2);
        let mut lines = Vec::with_capacity(dimension + 2);

        lines.push(format!("┌{}┐", "─".repeat(inner_width)));
        for row in 0..dimension {
            let mut line = String::from("│");
            for col in 0..dimension {
                let cell = match tiles.get(row * dimension + col) {
                    Some(&value) if value != 0 => value.to_string(),
                    _ => EMPTY_CELL.to_string(),
                };
                line.push_str(&format!(" {:>width$} ", cell, width = self.cell_width));
            }
            line.push('│');
            lines.push(line);
        }
        lines.push(format!("└{}┘", "─".repeat(inner_width)));

        lines
    }
}
