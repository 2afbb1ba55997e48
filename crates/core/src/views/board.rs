use arrowboard_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use super::HEADER_HEIGHT_PX;
use crate::layout::{ARROW_HEAD_WIDTH_PX, ArrowLayout, BoardLayout, RowLayout};
use crate::model::GridConfig;

const NAME_FONT_SIZE: f64 = 13.0;
const NAME_PADDING: f64 = 6.0;

/// Render every row of a laid-out board below the hour header.
///
/// `selected` outlines one row; pass `None` for none.
pub fn render_board(layout: &BoardLayout, selected: Option<usize>) -> Vec<RenderCommand> {
    let grid = &layout.grid;
    let mut commands = Vec::with_capacity(layout.rows.len() * 8);

    for (index, row) in layout.rows.iter().enumerate() {
        let top = HEADER_HEIGHT_PX + index as f64 * grid.row_height_px;
        commands.push(RenderCommand::BeginGroup {
            id: format!("row-{index}"),
            label: Some(row.name.clone()),
        });
        render_row(&mut commands, row, grid, top, layout.plain_word_scale);
        if selected == Some(index) {
            commands.push(RenderCommand::DrawRect {
                rect: Rect::new(0.0, top, row_width(grid), grid.row_height_px),
                color: ThemeToken::Selection,
                border_color: Some(ThemeToken::Selection),
            });
        }
        commands.push(RenderCommand::EndGroup);
    }

    commands
}

fn row_width(grid: &GridConfig) -> f64 {
    grid.name_column_px + grid.grid_width_px() + grid.actions_column_px
}

fn render_row(
    commands: &mut Vec<RenderCommand>,
    row: &RowLayout,
    grid: &GridConfig,
    top: f64,
    plain_word_scale: f64,
) {
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, top, row_width(grid), grid.row_height_px),
        color: ThemeToken::RowBackground,
        border_color: Some(ThemeToken::GridLine),
    });

    // Name cell
    let name_width = grid.name_column_px;
    if row.highlighted {
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, top, name_width, grid.row_height_px),
            color: ThemeToken::NameHighlight,
            border_color: None,
        });
    }
    if let Some(hazard) = row.hazard {
        let x = name_width * hazard.start_pct / 100.0;
        let w = name_width * (hazard.end_pct - hazard.start_pct) / 100.0;
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, top, w.max(1.0), grid.row_height_px),
            color: ThemeToken::HazardBand,
            border_color: None,
        });
    }
    commands.push(RenderCommand::DrawText {
        position: Point::new(NAME_PADDING, top + grid.row_height_px / 2.0),
        text: row.name.clone(),
        color: ThemeToken::NameText,
        font_size: NAME_FONT_SIZE,
        align: TextAlign::Left,
    });

    let arrow_top = top + (grid.row_height_px - grid.arrow_height_px).max(0.0) / 2.0;
    for arrow in &row.arrows {
        render_arrow(commands, arrow, grid, arrow_top, plain_word_scale);
    }
}

fn render_arrow(
    commands: &mut Vec<RenderCommand>,
    arrow: &ArrowLayout,
    grid: &GridConfig,
    top: f64,
    plain_word_scale: f64,
) {
    let origin = grid.name_column_px;
    let height = grid.arrow_height_px;
    let fill = ThemeToken::Condition(arrow.interval.label.color);

    let left = origin + arrow.pixel_box.left;
    let right = origin + arrow.pixel_box.right();
    let body = Rect::new(left, top, arrow.pixel_box.width, height).trim_right(ARROW_HEAD_WIDTH_PX);
    let head_start = body.right().min(right);

    if body.w > 0.0 {
        commands.push(RenderCommand::DrawRect {
            rect: body,
            color: fill,
            border_color: Some(ThemeToken::ArrowOutline),
        });
    }
    commands.push(RenderCommand::DrawPolygon {
        points: vec![
            Point::new(head_start, top),
            Point::new(right, top + height / 2.0),
            Point::new(head_start, top + height),
        ],
        color: fill,
        stroke: Some(ThemeToken::ArrowOutline),
    });

    let fit = &arrow.fit;
    if fit.truncated {
        commands.push(RenderCommand::SetClip { rect: body });
    }
    commands.push(RenderCommand::DrawLabel {
        rect: body,
        segments: arrow.interval.label.segments(),
        font_size: fit.font_px,
        plain_word_scale,
        wrapped: fit.wrapped,
        truncated: fit.truncated,
    });
    if fit.truncated {
        commands.push(RenderCommand::ClearClip);
    }
}
