//! Terminal rendering of a wall and its placement state.

use std::fmt::Write;

use wall_core::{BrickId, BrickLayout};
use wall_plan::PlacementState;

const PLACED: char = '█';
const UNPLACED: char = '▒';
const HEAD_JOINT: char = ' ';
/// Cells taken by one stretcher plus its trailing head joint.
const CELLS_PER_UNIT: f64 = 8.0;
const HEAD_JOINT_CELLS: usize = 1;

const PALETTE: [u8; 10] = [196, 208, 226, 46, 51, 27, 201, 93, 118, 39];

/// 256-colour code of a stride. Strides past the palette shift by 10 per lap.
pub fn stride_color(stride: usize) -> u8 {
    let base = usize::from(PALETTE[stride % PALETTE.len()]);
    ((base + 10 * (stride / PALETTE.len())) % 256) as u8
}

fn colorize(text: &str, stride: usize) -> String {
    format!("\x1b[38;5;{}m{text}\x1b[0m", stride_color(stride))
}

/// Renders the wall top course first, one blank line after every course.
///
/// Placed bricks are solid and coloured by stride when `color` is set; unplaced bricks
/// are hatched.
pub fn render_wall(layout: &BrickLayout, state: &PlacementState, color: bool) -> String {
    let mut out = String::new();
    for course_no in (0..layout.course_count()).rev() {
        for id in layout.course_ids(course_no) {
            let brick = &layout[id];
            let cells = ((brick.relative_length() * CELLS_PER_UNIT).round() as usize)
                .saturating_sub(HEAD_JOINT_CELLS);
            match state.placed_in_stride(id) {
                Some(stride) => {
                    let body: String = std::iter::repeat(PLACED).take(cells).collect();
                    if color {
                        out.push_str(&colorize(&body, stride));
                    } else {
                        out.push_str(&body);
                    }
                }
                None => out.extend(std::iter::repeat(UNPLACED).take(cells)),
            }
            out.extend(std::iter::repeat(HEAD_JOINT).take(HEAD_JOINT_CELLS));
        }
        out.push_str("\n\n");
    }
    out
}

/// One line per stride: index, colour swatch when enabled, and brick count.
pub fn render_summary(strides: &[Vec<BrickId>], color: bool) -> String {
    let mut out = String::new();
    for (stride, bricks) in strides.iter().enumerate() {
        let swatch = if color {
            colorize(&PLACED.to_string(), stride)
        } else {
            String::from("-")
        };
        let _ = writeln!(out, "stride {stride:>3} {swatch} {} bricks", bricks.len());
    }
    out
}
