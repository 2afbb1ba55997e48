use arrowboard_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use super::HEADER_HEIGHT_PX;
use crate::model::GridConfig;

const FONT_SIZE: f64 = 11.0;
const LABEL_Y: f64 = 16.0;
const TICK_HEIGHT: f64 = 6.0;

/// Render the hour header: one label per column, a tick at every column
/// edge, and gridlines extending `grid_height` below the header.
pub fn render_hour_axis(grid: &GridConfig, grid_height: f64) -> Vec<RenderCommand> {
    let origin = grid.name_column_px;
    let width = origin + grid.grid_width_px() + grid.actions_column_px;
    let mut commands = Vec::with_capacity(3 * grid.column_count as usize + 4);

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, width, HEADER_HEIGHT_PX),
        color: ThemeToken::HeaderBackground,
        border_color: Some(ThemeToken::GridLine),
    });

    for column in 0..=grid.column_count {
        let x = origin + f64::from(column) * grid.column_width_px;

        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, HEADER_HEIGHT_PX - TICK_HEIGHT),
            to: Point::new(x, HEADER_HEIGHT_PX + grid_height.max(0.0)),
            color: ThemeToken::GridLine,
            width: if column == 0 || column == grid.column_count { 1.0 } else { 0.5 },
        });

        // The closing edge has no column of its own.
        if column < grid.column_count {
            commands.push(RenderCommand::DrawText {
                position: Point::new(x + grid.column_width_px / 2.0, LABEL_Y),
                text: grid.column_label(column),
                color: ThemeToken::HeaderText,
                font_size: FONT_SIZE,
                align: TextAlign::Center,
            });
        }
    }

    commands
}
