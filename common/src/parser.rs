use std::io::BufRead;
use std::str::{FromStr, SplitWhitespace};
use tracing::{debug, warn};

use crate::config::LoadOptions;
use crate::constants::EMPTY_LIST_MARKER;
use crate::error::{ReplayError, ReplayResult};
use crate::line_reader::LineReader;
use crate::moves::{Direction, Move};

/// Everything a replay file yields, before it is published to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReplay {
    pub did_undo: bool,
    pub playback_delay_ms: u64,
    pub moves: Vec<Move>,
}

/// Walks a whole replay file: undo flag, undo list, redo list, header and
/// then one record per move. Trailing content after the last move is ignored.
pub fn parse_replay<R: BufRead>(
    reader: &mut LineReader<R>,
    options: &LoadOptions,
) -> ReplayResult<ParsedReplay> {
    let undo_line = reader.expect_line("undo flag")?;
    let did_undo = leading_integer(&undo_line).ok_or_else(|| ReplayError::InvalidInteger {
        line: reader.line_number(),
        field: "undo flag",
        token: undo_line.clone(),
    })? != 0;

    let undo_nodes = skip_list(reader, "undo list")?;
    let redo_nodes = skip_list(reader, "redo list")?;
    debug!("Skipped {} undo and {} redo list nodes", undo_nodes, redo_nodes);

    let header = reader.expect_line("header")?;
    let (playback_delay_ms, move_count) = parse_header(&header, reader.line_number())?;
    debug!(
        "Replay header: delay {}ms, {} moves",
        playback_delay_ms, move_count
    );

    // The count comes from the file, so don't trust it for the up-front reservation
    let mut moves = Vec::with_capacity(move_count.min(4096));
    for index in 0..move_count {
        let line = reader.expect_line("move record")?;
        let mv = parse_move_record(&line, reader.line_number(), options)?;
        debug!(
            "Parsed move {}: score {} best {} dim {}",
            index, mv.score, mv.best_score, mv.board_dimension
        );
        moves.push(mv);
    }

    Ok(ParsedReplay {
        did_undo,
        playback_delay_ms,
        moves,
    })
}

/// Consumes one undo/redo list section and returns its node count.
///
/// The section is either the `NULL:` marker alone, or a first line whose
/// leading integer is the node count followed by `count - 1` more lines.
pub fn skip_list<R: BufRead>(
    reader: &mut LineReader<R>,
    section: &'static str,
) -> ReplayResult<usize> {
    let first = reader.expect_line(section)?;
    if first == EMPTY_LIST_MARKER {
        return Ok(0);
    }

    let count = leading_integer(&first).ok_or_else(|| ReplayError::InvalidInteger {
        line: reader.line_number(),
        field: "list node count",
        token: first.clone(),
    })?;

    for _ in 1..count {
        reader.expect_line(section)?;
    }

    Ok(count.max(0) as usize)
}

/// Parses `<playbackDelayMillis> <moveCount>`.
pub fn parse_header(text: &str, line: usize) -> ReplayResult<(u64, usize)> {
    let mut fields = FieldScanner::new(text, line);
    let delay = fields.next_value("playback delay")?;
    let move_count = fields.next_value("move count")?;
    Ok((delay, move_count))
}

/// Parses one move line:
/// `<prefix>:<score> <best> <isWin> <prev> <next>@<dim> <sentinel> <spawn>#<tiles...>`
pub fn parse_move_record(text: &str, line: usize, options: &LoadOptions) -> ReplayResult<Move> {
    let missing = |delimiter| ReplayError::MissingDelimiter { line, delimiter };
    let (_, rest) = text.split_once(':').ok_or_else(|| missing(':'))?;
    let (stats, rest) = rest.split_once('@').ok_or_else(|| missing('@'))?;
    let (board, tile_text) = rest.split_once('#').ok_or_else(|| missing('#'))?;

    let mut fields = FieldScanner::new(stats, line);
    let score = fields.next_value("score")?;
    let best_score = fields.next_value("best score")?;
    let is_win = fields.next_value::<i64>("win flag")? != 0;
    let prev_direction = fields.next_direction("previous direction")?;
    let next_direction = fields.next_direction("next direction")?;

    let mut fields = FieldScanner::new(board, line);
    let board_dimension: usize = fields.next_value("board dimension")?;
    let sentinel_value = fields.next_value("sentinel value")?;
    let spawn_count = fields.next_value("spawn count")?;

    if board_dimension > options.max_board_dimension {
        return Err(ReplayError::BoardTooLarge {
            line,
            dimension: board_dimension,
            limit: options.max_board_dimension,
        });
    }

    let too_large = || ReplayError::BoardTooLarge {
        line,
        dimension: board_dimension,
        limit: options.max_board_dimension,
    };
    let expected = board_dimension
        .checked_mul(board_dimension)
        .ok_or_else(too_large)?;
    let mut tiles = Vec::new();
    tiles.try_reserve_exact(expected).map_err(|_| too_large())?;
    tiles.resize(expected, 0);
    let mut found = 0;
    for (slot, token) in tiles.iter_mut().zip(tile_text.split_whitespace()) {
        *slot = parse_token(token, line, "tile value")?;
        found += 1;
    }

    if found < expected {
        if options.strict_tiles {
            return Err(ReplayError::ShortTileList {
                line,
                expected,
                found,
            });
        }
        warn!(
            "Line {}: only {} of {} tiles present, zero-filling the rest",
            line, found, expected
        );
    }

    Ok(Move {
        score,
        best_score,
        is_win,
        prev_direction,
        next_direction,
        board_dimension,
        sentinel_value,
        spawn_count,
        tiles,
    })
}

/// Reads an optionally signed run of digits at the start of `text`,
/// skipping leading whitespace. Anything after the digits is ignored.
pub fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..sign_len + digits_len].parse().ok()
}

fn parse_token<T: FromStr>(token: &str, line: usize, field: &'static str) -> ReplayResult<T> {
    token.parse().map_err(|_| ReplayError::InvalidInteger {
        line,
        field,
        token: token.to_string(),
    })
}

struct FieldScanner<'a> {
    tokens: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> FieldScanner<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self {
            tokens: text.split_whitespace(),
            line,
        }
    }

    fn next_value<T: FromStr>(&mut self, field: &'static str) -> ReplayResult<T> {
        let token = self.tokens.next().ok_or(ReplayError::MissingField {
            line: self.line,
            field,
        })?;
        parse_token(token, self.line, field)
    }

    fn next_direction(&mut self, field: &'static str) -> ReplayResult<Direction> {
        let value: i64 = self.next_value(field)?;
        Direction::from_code(value).ok_or(ReplayError::InvalidDirection {
            line: self.line,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(text.as_bytes().to_vec()), 4096)
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("3"), Some(3));
        assert_eq!(leading_integer("  12:abc"), Some(12));
        assert_eq!(leading_integer("-4 x"), Some(-4));
        assert_eq!(leading_integer("+7"), Some(7));
        assert_eq!(leading_integer("NULL:"), None);
        assert_eq!(leading_integer("-"), None);
        assert_eq!(leading_integer(""), None);
    }

    #[test]
    fn test_skip_empty_list() {
        let mut r = reader("NULL:\nnext\n");
        assert_eq!(skip_list(&mut r, "undo list").unwrap(), 0);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("next"));
    }

    #[test]
    fn test_skip_list_consumes_count_lines() {
        let mut r = reader("3:first node\nsecond\nthird\nafter\n");
        assert_eq!(skip_list(&mut r, "undo list").unwrap(), 3);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("after"));
    }

    #[test]
    fn test_skip_list_single_node() {
        let mut r = reader("1:only\nafter\n");
        assert_eq!(skip_list(&mut r, "redo list").unwrap(), 1);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("after"));
    }

    #[test]
    fn test_skip_list_non_positive_count() {
        let mut r = reader("0:nothing\n-3:less than nothing\nafter\n");
        assert_eq!(skip_list(&mut r, "undo list").unwrap(), 0);
        assert_eq!(skip_list(&mut r, "redo list").unwrap(), 0);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("after"));
        assert_eq!(r.line_number(), 3);
    }

    #[test]
    fn test_skip_list_truncated() {
        let mut r = reader("4:first\nsecond\n");
        assert!(matches!(
            skip_list(&mut r, "redo list"),
            Err(ReplayError::UnexpectedEof {
                expected: "redo list"
            })
        ));
    }

    #[test]
    fn test_skip_list_garbage_count() {
        let mut r = reader("garbage\n");
        assert!(matches!(
            skip_list(&mut r, "undo list"),
            Err(ReplayError::InvalidInteger { line: 1, .. })
        ));
    }

    #[test]
    fn test_header() {
        assert_eq!(parse_header("500 2", 4).unwrap(), (500, 2));
        assert_eq!(parse_header("  250\t10  ", 4).unwrap(), (250, 10));
        assert!(matches!(
            parse_header("500", 4),
            Err(ReplayError::MissingField {
                line: 4,
                field: "move count"
            })
        ));
        assert!(matches!(
            parse_header("-1 2", 4),
            Err(ReplayError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn test_move_record() {
        let options = LoadOptions::default();
        let mv = parse_move_record(
            "bb:20 20 0 1 0@4 2048 1 0 0#0 0 0 0 2 2 0 0 0 0 0 0 0 0 0 0",
            6,
            &options,
        )
        .unwrap();
        assert_eq!(mv.score, 20);
        assert_eq!(mv.best_score, 20);
        assert!(!mv.is_win);
        assert_eq!(mv.prev_direction, Direction::Up);
        assert_eq!(mv.next_direction, Direction::None);
        assert_eq!(mv.board_dimension, 4);
        assert_eq!(mv.sentinel_value, 2048);
        assert_eq!(mv.spawn_count, 1);
        assert_eq!(mv.tiles.len(), 16);
        assert_eq!(mv.tiles[4], 2);
        assert_eq!(mv.tiles[5], 2);
    }

    #[test]
    fn test_move_record_missing_delimiters() {
        let options = LoadOptions::default();
        let cases = [
            ("aa 10 10 0 0 1@4 2048 1#0", ':'),
            ("aa:10 10 0 0 1 4 2048 1#0", '@'),
            ("aa:10 10 0 0 1@4 2048 1 0 0 0", '#'),
        ];
        for (text, expected) in cases {
            match parse_move_record(text, 9, &options) {
                Err(ReplayError::MissingDelimiter { line, delimiter }) => {
                    assert_eq!(line, 9);
                    assert_eq!(delimiter, expected);
                }
                other => panic!("{:?}: expected missing {:?}, got {:?}", text, expected, other),
            }
        }
    }

    #[test]
    fn test_move_record_short_tiles() {
        let text = "x:4 4 0 2 3@2 8 1#2 4";
        let mv = parse_move_record(text, 5, &LoadOptions::default()).unwrap();
        assert_eq!(mv.tiles, vec![2, 4, 0, 0]);

        let strict = LoadOptions::default().strict(true);
        assert!(matches!(
            parse_move_record(text, 5, &strict),
            Err(ReplayError::ShortTileList {
                expected: 4,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_move_record_extra_tiles_ignored() {
        let mv = parse_move_record("x:0 0 1 0 0@1 2 0#16 32 64", 5, &LoadOptions::default())
            .unwrap();
        assert_eq!(mv.tiles, vec![16]);
        assert!(mv.is_win);
    }

    #[test]
    fn test_move_record_bad_fields() {
        let options = LoadOptions::default();
        assert!(matches!(
            parse_move_record("x:1 1 0 7 0@2 8 1#0 0 0 0", 5, &options),
            Err(ReplayError::InvalidDirection { value: 7, .. })
        ));
        assert!(matches!(
            parse_move_record("x:1 1 0 0@2 8 1#0 0 0 0", 5, &options),
            Err(ReplayError::MissingField {
                field: "next direction",
                ..
            })
        ));
        assert!(matches!(
            parse_move_record("x:1 1 0 0 0@2 8 1#0 zz 0 0", 5, &options),
            Err(ReplayError::InvalidInteger {
                field: "tile value",
                ..
            })
        ));
        assert!(matches!(
            parse_move_record("x:1 1 0 0 0@-2 8 1#", 5, &options),
            Err(ReplayError::InvalidInteger {
                field: "board dimension",
                ..
            })
        ));
        assert!(matches!(
            parse_move_record("x:1 1 0 0 0@100 8 1#", 5, &options),
            Err(ReplayError::BoardTooLarge {
                dimension: 100,
                limit: 64,
                ..
            })
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_huge_board_with_raised_limit() {
        let options = LoadOptions {
            max_board_dimension: usize::MAX,
            ..LoadOptions::default()
        };
        // 2^32 squared overflows usize; 2^31 squared tiles overflow the allocator
        for dimension in [4_294_967_296usize, 2_147_483_648] {
            let text = format!("a:0 0 0 0 0@{} 8 1#2", dimension);
            match parse_move_record(&text, 5, &options) {
                Err(ReplayError::BoardTooLarge {
                    line,
                    dimension: found,
                    limit,
                }) => {
                    assert_eq!(line, 5);
                    assert_eq!(found, dimension);
                    assert_eq!(limit, usize::MAX);
                }
                other => panic!("dimension {}: expected BoardTooLarge, got {:?}", dimension, other),
            }
        }
    }

    #[test]
    fn test_parse_replay_with_lists() {
        let text = "1\n2:undo a\nundo b\nNULL:\n100 1\nm:8 8 0 0 4@2 2048 1#2 2 0 4\n";
        let parsed = parse_replay(&mut reader(text), &LoadOptions::default()).unwrap();
        assert!(parsed.did_undo);
        assert_eq!(parsed.playback_delay_ms, 100);
        assert_eq!(parsed.moves.len(), 1);
        assert_eq!(parsed.moves[0].next_direction, Direction::Right);
    }

    #[test]
    fn test_parse_replay_premature_eof() {
        let text = "0\nNULL:\nNULL:\n100 3\nm:0 0 0 0 1@2 8 1#0 0 0 0\n";
        assert!(matches!(
            parse_replay(&mut reader(text), &LoadOptions::default()),
            Err(ReplayError::UnexpectedEof {
                expected: "move record"
            })
        ));
    }
}
