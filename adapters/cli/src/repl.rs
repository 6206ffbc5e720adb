//! Line-oriented front end for the tile game.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use thiserror::Error;
use wordgrid_app::{AssetLoader, AssetSource, GameSession};
use wordgrid_core::{Tile, TileSource};
use wordgrid_rendering::DragDropSurface;
use wordgrid_system_placement::{DropOutcome, DropRequest};

const HELP: &str = "\
commands:
  place <rack> <square>   drop a rack tile on a board square
  move <from> <to>        move a board tile to another square
  return <square>         drag a board tile back to the rack
  play                    score the word on the board
  new                     refill the rack from the bag
  reset                   start over with a fresh bag
  show                    print the board again
  html                    print the board as HTML
  quit                    leave the game";

/// One line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Place { index: usize, column: u32 },
    Move { from: u32, to: u32 },
    Return { column: u32 },
    Play,
    NewHand,
    Reset,
    Show,
    Html,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum ParseError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },
}

fn parse_action(line: &str) -> Result<Option<Action>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let arguments: Vec<&str> = words.collect();
    let action = match command.to_ascii_lowercase().as_str() {
        "place" | "p" => match arguments.as_slice() {
            [index, column] => Action::Place {
                index: number(index, "place", "<rack> <square>")?,
                column: number(column, "place", "<rack> <square>")?,
            },
            _ => return Err(arguments_error("place", "<rack> <square>")),
        },
        "move" | "m" => match arguments.as_slice() {
            [from, to] => Action::Move {
                from: number(from, "move", "<from> <to>")?,
                to: number(to, "move", "<from> <to>")?,
            },
            _ => return Err(arguments_error("move", "<from> <to>")),
        },
        "return" | "r" => match arguments.as_slice() {
            [column] => Action::Return {
                column: number(column, "return", "<square>")?,
            },
            _ => return Err(arguments_error("return", "<square>")),
        },
        "play" => Action::Play,
        "new" => Action::NewHand,
        "reset" => Action::Reset,
        "show" => Action::Show,
        "html" => Action::Html,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(ParseError::Unknown(other.to_owned())),
    };
    Ok(Some(action))
}

fn number<T: std::str::FromStr>(
    text: &str,
    command: &'static str,
    expected: &'static str,
) -> Result<T, ParseError> {
    text.parse().map_err(|_| arguments_error(command, expected))
}

fn arguments_error(command: &'static str, expected: &'static str) -> ParseError {
    ParseError::Arguments { command, expected }
}

/// Starts a game and runs commands read from `input` until it ends or `quit`.
pub(crate) fn run<S, A, R, W>(
    session: &mut GameSession<S>,
    loader: &mut AssetLoader<A>,
    seed: u64,
    input: R,
    out: &mut W,
) -> Result<()>
where
    S: DragDropSurface,
    A: AssetSource,
    R: BufRead,
    W: Write,
{
    session.start(loader, seed)?;
    flush_messages(session, out)?;
    write!(out, "{}", session.hud().to_text())?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read input")?;
        let action = match parse_action(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(error) => {
                writeln!(out, "{error}")?;
                continue;
            }
        };

        match action {
            Action::Place { index, column } => {
                let request = DropRequest::new(TileSource::Rack { index }, column);
                drop_with_prompt(session, request, &mut lines, out)?;
            }
            Action::Move { from, to } => {
                let request = DropRequest::new(TileSource::Board { column: from }, to);
                drop_with_prompt(session, request, &mut lines, out)?;
            }
            Action::Return { column } => session.return_tile(column)?,
            Action::Play => session.play_word()?,
            Action::NewHand => session.new_hand()?,
            Action::Reset => session.reset()?,
            Action::Show => {}
            Action::Html => {
                write!(out, "{}", session.hud().to_html())?;
                continue;
            }
            Action::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Action::Quit => break,
        }
        flush_messages(session, out)?;
        write!(out, "{}", session.hud().to_text())?;
    }

    let summary = session.summary();
    writeln!(out, "final score: {}", summary.total_score)?;
    Ok(())
}

/// Performs a drop, asking on the next input line which letter a blank stands for.
fn drop_with_prompt<S, L, W>(
    session: &mut GameSession<S>,
    request: DropRequest,
    lines: &mut L,
    out: &mut W,
) -> Result<()>
where
    S: DragDropSurface,
    L: Iterator<Item = std::io::Result<String>>,
    W: Write,
{
    let mut prompt = |_: &Tile| {
        let _ = write!(out, "letter for the blank (empty to cancel): ");
        let _ = out.flush();
        let line = lines.next()?.ok()?;
        line.trim().chars().next()
    };
    let outcome = session.drop_tile(request, &mut prompt)?;
    if outcome == DropOutcome::Cancelled {
        writeln!(out, "placement cancelled")?;
    }
    Ok(())
}

fn flush_messages<S: DragDropSurface, W: Write>(
    session: &mut GameSession<S>,
    out: &mut W,
) -> Result<()> {
    for message in session.take_messages() {
        writeln!(out, "{message}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use wordgrid_app::{
        assets::{DICTIONARY_PATH, PIECES_PATH},
        AssetError,
    };
    use wordgrid_rendering::RecordingSurface;

    use super::*;

    struct Fixture;

    impl AssetSource for Fixture {
        fn fetch(&self, relative: &Path) -> Result<String, AssetError> {
            if relative == Path::new(PIECES_PATH) {
                Ok(r#"{"pieces":[{"letter":"Blank","amount":8,"value":0}]}"#.to_owned())
            } else if relative == Path::new(DICTIONARY_PATH) {
                Ok("HI\n".to_owned())
            } else {
                Err(AssetError::NotFound(relative.to_path_buf()))
            }
        }
    }

    fn play(script: &str) -> String {
        let mut session = GameSession::new(RecordingSurface::new());
        let mut loader = AssetLoader::new(Fixture);
        let mut out = Vec::new();
        run(&mut session, &mut loader, 3, script.as_bytes(), &mut out).expect("session runs");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(
            parse_action("place 2 7"),
            Ok(Some(Action::Place { index: 2, column: 7 }))
        );
        assert_eq!(parse_action("  M 1 2 "), Ok(Some(Action::Move { from: 1, to: 2 })));
        assert_eq!(parse_action("r 4"), Ok(Some(Action::Return { column: 4 })));
        assert_eq!(parse_action("exit"), Ok(Some(Action::Quit)));
        assert_eq!(parse_action("   "), Ok(None));
    }

    #[test]
    fn malformed_commands_explain_themselves() {
        assert_eq!(
            parse_action("place 1").unwrap_err().to_string(),
            "`place` expects <rack> <square>"
        );
        assert_eq!(
            parse_action("return x").unwrap_err().to_string(),
            "`return` expects <square>"
        );
        assert_eq!(
            parse_action("dance"),
            Err(ParseError::Unknown("dance".to_owned()))
        );
    }

    #[test]
    fn blanks_take_the_letter_from_the_next_line() {
        let output = play("place 0 3\nh\nplace 0 4\ni\nplay\nquit\n");

        assert!(output.contains("\"HI\" scored 0 points."), "{output}");
        assert!(output.ends_with("final score: 0\n"), "{output}");
    }

    #[test]
    fn empty_letter_cancels_the_drop() {
        let output = play("place 0 3\n\nshow\n");

        assert!(output.contains("placement cancelled"), "{output}");
        assert!(output.contains("rack: 0:_(0) 1:_(0) 2:_(0) 3:_(0) 4:_(0) 5:_(0) 6:_(0)"));
    }

    #[test]
    fn html_prints_the_board_with_tile_images() {
        let output = play("place 0 3\nh\nhtml\n");

        assert!(output.contains("<table class=\"board\">"), "{output}");
        assert!(
            output.contains("<img src=\"Scrabble_Tile_Blank.jpg\" alt=\"H\">"),
            "{output}"
        );
        assert_eq!(parse_action("HTML"), Ok(Some(Action::Html)));
    }
}
