use anyhow::Result;
use common::ReplayStore;
use std::io::Cursor;
use terminal::render::BoardRenderer;

#[test]
fn test_board_rendering() {
    let renderer = BoardRenderer::new(4);
    let lines = renderer.render(&[2, 0, 1024, 16], 2);

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], format!("┌{}┐", "─".repeat(12)));
    assert_eq!(lines[1], "│    2     . │");
    assert_eq!(lines[2], "│ 1024    16 │");
    assert_eq!(lines[3], format!("└{}┘", "─".repeat(12)));
}

#[test]
fn test_empty_board_before_first_move() {
    let renderer = BoardRenderer::new(1);
    let lines = renderer.render(&[], 3);

    assert_eq!(lines.len(), 5);
    for row in &lines[1..4] {
        assert_eq!(row, "│ .  .  . │");
    }
}

#[test]
fn test_cell_width_from_replay() -> Result<()> {
    let text = "0\nNULL:\nNULL:\n100 2\n\
        a:0 0 0 0 1@2 2048 1#2 0 0 0\n\
        b:0 0 0 1 0@2 2048 1#2048 0 2 0\n";
    let mut store = ReplayStore::new();
    store.load_from_reader("widths", Cursor::new(text.as_bytes().to_vec()))?;

    let renderer = BoardRenderer::for_store(&store);
    assert_eq!(renderer.cell_width(), 4);

    // Same width on every move
    let first = renderer.render(store.tiles_at(0), store.board_dimension());
    let second = renderer.render(store.tiles_at(1), store.board_dimension());
    assert_eq!(first[1].chars().count(), second[1].chars().count());

    assert_eq!(BoardRenderer::for_store(&ReplayStore::new()).cell_width(), 1);
    Ok(())
}
