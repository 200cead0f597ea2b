//! Orientation helper geometry
//!
//! Grid and axis lines generated on the CPU for the external renderer.
//! These belong to the viewer, not to any generation, so they survive model
//! swaps and are toggled rather than rebuilt.

use vantage_core::Color;

/// Which helpers the frame should include.
#[derive(Debug, Clone, Copy)]
pub struct HelperState {
    pub show_grid: bool,
    pub show_axes: bool,
}

impl Default for HelperState {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_axes: true,
        }
    }
}

/// One colored axis segment from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLine {
    pub color: Color,
    pub from: [f32; 3],
    pub to: [f32; 3],
}

/// Line segments for a square ground grid on the XZ plane, centered on the
/// origin: `divisions + 1` lines in each direction.
pub fn grid_lines(size: f32, divisions: u32) -> Vec<[[f32; 3]; 2]> {
    let half = size / 2.0;
    let step = size / divisions.max(1) as f32;
    let mut lines = Vec::with_capacity(2 * (divisions as usize + 1));

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;
        // Parallel to X, then parallel to Z
        lines.push([[-half, 0.0, offset], [half, 0.0, offset]]);
        lines.push([[offset, 0.0, -half], [offset, 0.0, half]]);
    }

    lines
}

/// The three world axes in the conventional colors (X red, Y green, Z blue).
pub fn axis_lines(length: f32) -> [AxisLine; 3] {
    [
        AxisLine {
            color: Color::rgb(1.0, 0.0, 0.0),
            from: [0.0; 3],
            to: [length, 0.0, 0.0],
        },
        AxisLine {
            color: Color::rgb(0.0, 1.0, 0.0),
            from: [0.0; 3],
            to: [0.0, length, 0.0],
        },
        AxisLine {
            color: Color::rgb(0.0, 0.0, 1.0),
            from: [0.0; 3],
            to: [0.0, 0.0, length],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_a_line_per_division_boundary() {
        let lines = grid_lines(10.0, 10);
        assert_eq!(lines.len(), 22);
        // Outermost line spans the full grid
        assert_eq!(lines[0], [[-5.0, 0.0, -5.0], [5.0, 0.0, -5.0]]);
    }

    #[test]
    fn axes_reach_their_length() {
        let axes = axis_lines(3.0);
        assert_eq!(axes[0].to, [3.0, 0.0, 0.0]);
        assert_eq!(axes[1].to, [0.0, 3.0, 0.0]);
        assert_eq!(axes[2].to, [0.0, 0.0, 3.0]);
    }
}
