//! Plain-text and HTML presenters for terminal front ends.

use std::fmt::Write as _;

use wordgrid_core::{
    GameEvent, PlacementError, PlayError, ReturnError, SquareKind, Tile, WordStatus,
};

use crate::{heat_color, square_color, tile_image, CellNode, Color};

/// Body cell of a strict product table together with its heat color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatCell {
    /// Displayed product.
    pub value: i64,
    /// Background color derived from the heat amount.
    pub color: Color,
}

impl HeatCell {
    /// Colors `value` by its heat `amount`.
    #[must_use]
    pub fn new(value: i64, amount: f64) -> Self {
        Self {
            value,
            color: heat_color(amount),
        }
    }
}

/// Renderable form of a strict product table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TablePresentation {
    /// Header row values.
    pub column_headers: Vec<i64>,
    /// Header column value and body cells of each row.
    pub rows: Vec<(i64, Vec<HeatCell>)>,
}

impl TablePresentation {
    /// Right-aligned text grid with an empty corner cell.
    #[must_use]
    pub fn to_text(&self) -> String {
        let width = self
            .column_headers
            .iter()
            .copied()
            .chain(self.rows.iter().map(|(header, _)| *header))
            .chain(self.rows.iter().flat_map(|(_, cells)| cells.iter().map(|cell| cell.value)))
            .map(|value| value.to_string().len())
            .max()
            .unwrap_or(1);

        let mut text = String::new();
        let _ = write!(text, "{:>width$}", "");
        for header in &self.column_headers {
            let _ = write!(text, " {header:>width$}");
        }
        text.push('\n');
        for (header, cells) in &self.rows {
            let _ = write!(text, "{header:>width$}");
            for cell in cells {
                let _ = write!(text, " {:>width$}", cell.value);
            }
            text.push('\n');
        }
        text
    }

    /// HTML table with heat-colored body cells.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table>\n<tr><th></th>");
        for header in &self.column_headers {
            let _ = write!(html, "<th>{header}</th>");
        }
        html.push_str("</tr>\n");
        for (header, cells) in &self.rows {
            let _ = write!(html, "<tr><th>{header}</th>");
            for cell in cells {
                let _ = write!(
                    html,
                    "<td style=\"background-color: {}\">{}</td>",
                    cell.color.to_hex(),
                    cell.value
                );
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
        html
    }
}

/// Lays realized cells out as text rows ordered by their pixel position.
#[must_use]
pub fn render_cells<'a>(nodes: impl IntoIterator<Item = &'a CellNode>) -> String {
    let mut nodes: Vec<&CellNode> = nodes.into_iter().collect();
    nodes.sort_by(|a, b| {
        a.position
            .y
            .total_cmp(&b.position.y)
            .then(a.position.x.total_cmp(&b.position.x))
    });
    let width = nodes.iter().map(|node| node.text.len()).max().unwrap_or(1);

    let mut text = String::new();
    let mut current_row: Option<f32> = None;
    for node in nodes {
        match current_row {
            Some(top) if top == node.position.y => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        current_row = Some(node.position.y);
        let _ = write!(text, "{:>width$}", node.text);
    }
    if current_row.is_some() {
        text.push('\n');
    }
    text
}

/// One board square as shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquarePresentation {
    /// Scoring type of the square.
    pub kind: SquareKind,
    /// Tile resting on the square.
    pub tile: Option<Tile>,
}

/// Everything a front end displays after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Tiles on the rack.
    pub rack: Vec<Tile>,
    /// Board squares in column order.
    pub squares: Vec<SquarePresentation>,
    /// Tiles left in the bag.
    pub tiles_left: usize,
    /// Running total score.
    pub total_score: u32,
    /// Score of the word on the board.
    pub round_score: u32,
    /// Word on the board.
    pub word: String,
    /// Classification of the word on the board.
    pub word_status: WordStatus,
}

impl HudPresentation {
    /// Multi-line text rendering: column numbers, board, rack and score line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for column in 0..self.squares.len() {
            let _ = write!(text, "{column:^4}");
        }
        text.push('\n');
        for square in &self.squares {
            let _ = write!(text, "[{}]", square_label(square));
        }
        text.push('\n');

        text.push_str("rack:");
        for (index, tile) in self.rack.iter().enumerate() {
            let _ = write!(text, " {index}:{}", tile_label(tile));
        }
        text.push('\n');

        let status = match self.word_status {
            WordStatus::NoWord => "no word",
            WordStatus::Invalid => "invalid",
            WordStatus::Valid => "valid",
        };
        let _ = writeln!(
            text,
            "word: {} ({status})  round: {}  total: {}  tiles left: {}",
            if self.word.is_empty() { "-" } else { self.word.as_str() },
            self.round_score,
            self.total_score,
            self.tiles_left
        );
        text
    }

    /// HTML board and rack: squares colored by kind, tiles drawn with their
    /// printed-face images.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table class=\"board\">\n<tr>");
        for square in &self.squares {
            let _ = write!(
                html,
                "<td style=\"background-color: {}\">",
                square_color(square.kind).to_hex()
            );
            match square.tile {
                Some(tile) => html.push_str(&tile_html(&tile)),
                None if square.kind == SquareKind::Plain => {}
                None => html.push_str(square.kind.code()),
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>\n</table>\n<div class=\"rack\">");
        for tile in &self.rack {
            html.push_str(&tile_html(tile));
        }
        html.push_str("</div>\n");
        let _ = writeln!(
            html,
            "<p>Score: {}  Tiles left: {}</p>",
            self.total_score, self.tiles_left
        );
        html
    }
}

fn tile_html(tile: &Tile) -> String {
    let alt = tile.letter().unwrap_or('_');
    format!("<img src=\"{}\" alt=\"{alt}\">", tile_image(tile))
}

fn square_label(square: &SquarePresentation) -> String {
    match square.tile {
        Some(tile) => format!("{:^2}", tile.letter().unwrap_or('?')),
        None if square.kind == SquareKind::Plain => "  ".to_owned(),
        None => square.kind.code().to_owned(),
    }
}

fn tile_label(tile: &Tile) -> String {
    match tile.letter() {
        Some(letter) => format!("{letter}({})", tile.value()),
        None => format!("_({})", tile.value()),
    }
}

/// Player-facing message for events that deserve one.
#[must_use]
pub fn event_message(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::PlayRejected { word, reason } => Some(match reason {
            PlayError::NoWord => "No word found on the board!".to_owned(),
            PlayError::TooShort => "Words must be at least 2 letters long!".to_owned(),
            PlayError::NotInDictionary => format!("\"{word}\" is not a valid word!"),
        }),
        GameEvent::WordPlayed {
            word, bonus, score, ..
        } => {
            if *bonus > 0 {
                Some(format!(
                    "\"{word}\" is a {}-letter word! +{bonus} bonus points!",
                    word.chars().count()
                ))
            } else {
                Some(format!("\"{word}\" scored {score} points."))
            }
        }
        GameEvent::PlacementRejected { column, reason, .. } => Some(match reason {
            PlacementError::NotStarted => "No game in progress.".to_owned(),
            PlacementError::OutOfBounds => format!("Square {column} is off the board."),
            PlacementError::Occupied => format!("Square {column} is already taken."),
            PlacementError::NotAdjacent => {
                format!("Square {column} must touch a tile already on the board.")
            }
            PlacementError::MissingTile => "There is no tile there to move.".to_owned(),
            PlacementError::UndeclaredBlank => "Choose a letter for the blank tile.".to_owned(),
            PlacementError::InvalidLetter => "Blank tiles take a letter from A to Z.".to_owned(),
        }),
        GameEvent::ReturnRejected { column, reason } => Some(match reason {
            ReturnError::OutOfBounds => format!("Square {column} is off the board."),
            ReturnError::EmptySquare => format!("Square {column} holds no tile."),
        }),
        GameEvent::GameStarted { .. }
        | GameEvent::RackRefilled { .. }
        | GameEvent::TilePlaced { .. }
        | GameEvent::TileReturned { .. }
        | GameEvent::BoardCleared => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use wordgrid_core::{CellCoord, CellKey, TileFace, TileId};

    fn node(x: i64, y: i64, left: f32, top: f32) -> CellNode {
        CellNode {
            key: CellKey::from(CellCoord::new(x, y)),
            text: (x * y).to_string(),
            position: Vec2::new(left, top),
            size: Vec2::new(52.0, 32.0),
        }
    }

    #[test]
    fn table_text_aligns_columns() {
        let table = TablePresentation {
            column_headers: vec![1, 10],
            rows: vec![(2, vec![HeatCell::new(2, 0.0), HeatCell::new(20, 1.0)])],
        };

        assert_eq!(table.to_text(), "    1 10\n 2  2 20\n");
    }

    #[test]
    fn table_html_colors_body_cells() {
        let table = TablePresentation {
            column_headers: vec![3],
            rows: vec![(3, vec![HeatCell::new(9, 0.0)])],
        };

        let html = table.to_html();
        assert!(html.contains("<th>3</th>"));
        assert!(html.contains("<td style=\"background-color: #00ff00\">9</td>"));
    }

    #[test]
    fn cells_render_in_pixel_order() {
        let nodes = [
            node(2, 2, 52.0, 32.0),
            node(1, 1, 0.0, 0.0),
            node(2, 1, 52.0, 0.0),
            node(1, 2, 0.0, 32.0),
        ];

        assert_eq!(render_cells(&nodes), "1 2\n2 4\n");
        assert_eq!(render_cells(Vec::<&CellNode>::new()), "");
    }

    #[test]
    fn hud_shows_squares_rack_and_scores() {
        let cat = Tile::new(TileId::new(1), TileFace::Letter('C'), 3);
        let blank = Tile::new(TileId::new(2), TileFace::Blank, 0);
        let hud = HudPresentation {
            rack: vec![blank],
            squares: vec![
                SquarePresentation {
                    kind: SquareKind::TripleLetter,
                    tile: Some(cat),
                },
                SquarePresentation {
                    kind: SquareKind::Plain,
                    tile: None,
                },
                SquarePresentation {
                    kind: SquareKind::DoubleWord,
                    tile: None,
                },
            ],
            tiles_left: 12,
            total_score: 0,
            round_score: 9,
            word: "C".to_owned(),
            word_status: WordStatus::Invalid,
        };

        let text = hud.to_text();
        assert!(text.contains("[C ][  ][DW]"));
        assert!(text.contains("rack: 0:_(0)"));
        assert!(text.contains("word: C (invalid)  round: 9  total: 0  tiles left: 12"));
    }

    #[test]
    fn hud_html_colors_squares_and_draws_tile_images() {
        let queen = Tile::new(TileId::new(1), TileFace::Letter('Q'), 10);
        let blank = Tile::new(TileId::new(2), TileFace::Blank, 0).with_chosen_letter('E');
        let hud = HudPresentation {
            rack: vec![queen],
            squares: vec![
                SquarePresentation {
                    kind: SquareKind::DoubleLetter,
                    tile: Some(blank),
                },
                SquarePresentation {
                    kind: SquareKind::TripleLetter,
                    tile: None,
                },
            ],
            tiles_left: 3,
            total_score: 14,
            round_score: 0,
            word: "E".to_owned(),
            word_status: WordStatus::Invalid,
        };

        let html = hud.to_html();
        assert!(html.contains(
            "<td style=\"background-color: #9fd3f2\"><img src=\"Scrabble_Tile_Blank.jpg\" alt=\"E\"></td>"
        ));
        assert!(html.contains("<td style=\"background-color: #2f7fc1\">TL</td>"));
        assert!(html.contains(
            "<div class=\"rack\"><img src=\"Scrabble_Tile_Q.jpg\" alt=\"Q\"></div>"
        ));
        assert!(html.contains("<p>Score: 14  Tiles left: 3</p>"));
    }

    #[test]
    fn play_messages_match_rejection_reasons() {
        let message = event_message(&GameEvent::PlayRejected {
            word: "ZZQ".to_owned(),
            reason: PlayError::NotInDictionary,
        });
        assert_eq!(message.as_deref(), Some("\"ZZQ\" is not a valid word!"));

        let message = event_message(&GameEvent::WordPlayed {
            word: "CATTLES".to_owned(),
            score: 9,
            bonus: 50,
            total: 59,
        });
        assert_eq!(
            message.as_deref(),
            Some("\"CATTLES\" is a 7-letter word! +50 bonus points!")
        );
        assert_eq!(event_message(&GameEvent::BoardCleared), None);
    }
}
