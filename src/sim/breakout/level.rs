//! Brick layouts
//!
//! A layout is a list of rows; each character is one grid column. `'3'` and
//! `'2'` make three- and two-hit bricks, a space leaves the cell empty, and
//! any other character makes a one-hit brick.

use super::consts::*;
use super::state::Brick;
use crate::consts::SCREEN_WIDTH;
use crate::sim::rect::Rect;

/// The predefined layouts, selected by index
pub const LEVELS: [&[&str]; 3] = [
    &[
        "1111111111",
        "1111111111",
        "1111111111",
        "1111111111",
        "1111111111",
    ],
    &[
        "2222222222",
        "2111111112",
        "2111111112",
        "2111111112",
        "2222222222",
    ],
    &[
        "3333333333",
        "2 2 2 2 2 ",
        " 2 2 2 2 2",
        "1111111111",
        "  11  11  ",
    ],
];

/// Layout by index
pub fn layout(index: usize) -> Option<&'static [&'static str]> {
    LEVELS.get(index).copied()
}

/// Hits needed to destroy a brick built from `c` (`None` for empty cells)
fn hits_for(c: char) -> Option<u8> {
    match c {
        ' ' => None,
        '3' => Some(3),
        '2' => Some(2),
        _ => Some(1),
    }
}

/// Build the brick grid for a layout, centered horizontally on the screen
///
/// The grid is as wide as the longest row. Bricks are returned row by row,
/// left to right, with ids starting at 1.
pub fn build_bricks(rows: &[&str]) -> Vec<Brick> {
    let columns = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }

    let grid_width = columns as f32 * BRICK_WIDTH + (columns - 1) as f32 * BRICK_GAP;
    let offset_x = (SCREEN_WIDTH - grid_width) / 2.0;

    let mut bricks = Vec::new();
    let mut next_id = 1;
    for (row, line) in rows.iter().enumerate() {
        let y = BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP);
        for (col, c) in line.chars().enumerate() {
            let Some(hits) = hits_for(c) else {
                continue;
            };
            let x = offset_x + col as f32 * (BRICK_WIDTH + BRICK_GAP);
            bricks.push(Brick::new(
                next_id,
                Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT),
                hits,
            ));
            next_id += 1;
        }
    }
    bricks
}
