use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::Result;
use arrowboard_core::fit::{ApproxMeasurer, TextFitter};
use arrowboard_core::model::{Board, GridConfig, SharedGrid};
use arrowboard_core::views::{HEADER_HEIGHT_PX, render_board, render_hour_axis};
use arrowboard_core::{BoardConfig, BoardView, GeometryChange};
use arrowboard_protocol::{ConditionColor, RenderCommand, TextAlign, ThemeToken};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Block,
};
use tracing::debug;

/// Board pixels per terminal column.
pub const CELL_WIDTH_PX: f64 = 8.0;

fn theme_to_color(token: &ThemeToken) -> Color {
    match token {
        ThemeToken::Condition(color) => {
            let (r, g, b) = color.rgb();
            Color::Rgb(r, g, b)
        }
        ThemeToken::ArrowOutline => Color::DarkGray,
        ThemeToken::LabelText => Color::Black,
        ThemeToken::EmphasisText => Color::Rgb(190, 20, 20),
        ThemeToken::HeaderBackground => Color::DarkGray,
        ThemeToken::HeaderText => Color::White,
        ThemeToken::GridLine => Color::DarkGray,
        ThemeToken::RowBackground => Color::Rgb(24, 24, 24),
        ThemeToken::NameText => Color::White,
        ThemeToken::NameHighlight => Color::Rgb(110, 90, 10),
        ThemeToken::HazardBand => Color::Rgb(120, 30, 30),
        ThemeToken::Selection => Color::White,
        ThemeToken::Background => Color::Black,
    }
}

/// Maps board coordinates onto terminal cells: a fixed number of pixels per
/// column, one line for the header and one per row.
#[derive(Debug, Clone, Copy)]
struct CellMapper {
    grid: GridConfig,
    /// Rows scrolled off the top.
    scroll: usize,
}

impl CellMapper {
    fn col(&self, x: f64) -> i32 {
        (x / CELL_WIDTH_PX).floor() as i32
    }

    fn line(&self, y: f64) -> Option<i32> {
        if y < HEADER_HEIGHT_PX {
            return Some(0);
        }
        let row = ((y - HEADER_HEIGHT_PX) / self.grid.row_height_px).floor() as i64;
        let row = row - self.scroll as i64;
        (row >= 0).then(|| (row + 1) as i32)
    }
}

struct Painter<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    mapper: CellMapper,
    clip: Option<(i32, i32)>,
}

impl Painter<'_> {
    fn cell(&mut self, col: i32, line: i32) -> Option<&mut ratatui::buffer::Cell> {
        if col < 0 || line < 0 || col >= i32::from(self.area.width) || line >= i32::from(self.area.height) {
            return None;
        }
        if let Some((from, to)) = self.clip
            && (col < from || col >= to)
        {
            return None;
        }
        self.buf
            .cell_mut((self.area.x + col as u16, self.area.y + line as u16))
    }

    fn fill(&mut self, rect: &arrowboard_protocol::Rect, apply: impl Fn(&mut ratatui::buffer::Cell)) {
        let Some(line) = self.mapper.line(rect.y) else {
            return;
        };
        let from = self.mapper.col(rect.x);
        let to = self.mapper.col(rect.right()).max(from + 1);
        for col in from..to {
            if let Some(cell) = self.cell(col, line) {
                apply(cell);
            }
        }
    }

    fn put(&mut self, col: i32, line: i32, text: &str, style: Style, max_cols: Option<i32>) -> i32 {
        let mut written = 0;
        for ch in text.chars() {
            if max_cols.is_some_and(|max| written >= max) {
                break;
            }
            if let Some(cell) = self.cell(col + written, line) {
                cell.set_char(ch).set_style(style);
            }
            written += 1;
        }
        written
    }

    fn paint(&mut self, cmd: &RenderCommand) {
        match cmd {
            RenderCommand::DrawRect { rect, color, .. } => {
                if *color == ThemeToken::Selection {
                    let name = arrowboard_protocol::Rect::new(
                        rect.x,
                        rect.y,
                        self.mapper.grid.name_column_px,
                        rect.h,
                    );
                    self.fill(&name, |cell| {
                        cell.modifier.insert(Modifier::REVERSED);
                    });
                } else {
                    let bg = theme_to_color(color);
                    self.fill(rect, |cell| {
                        cell.set_bg(bg);
                    });
                }
            }
            RenderCommand::DrawPolygon { points, color, .. } => {
                let Some(tip) = points.iter().max_by(|a, b| a.x.total_cmp(&b.x)) else {
                    return;
                };
                let Some(line) = self.mapper.line(tip.y) else {
                    return;
                };
                let col = self.mapper.col(tip.x - 1.0);
                let fg = theme_to_color(color);
                if let Some(cell) = self.cell(col, line) {
                    cell.set_char('▶').set_fg(fg);
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let Some(line) = self.mapper.line(position.y) else {
                    return;
                };
                let len = text.chars().count() as i32;
                let anchor = self.mapper.col(position.x);
                let col = match align {
                    TextAlign::Left => anchor,
                    TextAlign::Center => anchor - len / 2,
                    TextAlign::Right => anchor - len,
                };
                let style = Style::default().fg(theme_to_color(color));
                self.put(col, line, text, style, None);
            }
            RenderCommand::DrawLabel { rect, segments, .. } => {
                let Some(line) = self.mapper.line(rect.y) else {
                    return;
                };
                let mut col = self.mapper.col(rect.x);
                let end = self.mapper.col(rect.right());
                let plain = Style::default().fg(theme_to_color(&ThemeToken::LabelText));
                let emphasis = Style::default()
                    .fg(theme_to_color(&ThemeToken::EmphasisText))
                    .add_modifier(Modifier::BOLD);
                let parts = [
                    (segments.main.as_str(), plain),
                    (segments.emphasis.as_str(), emphasis),
                    (segments.trailing.as_str(), plain),
                ];
                let mut first = true;
                for (text, style) in parts.into_iter().filter(|(t, _)| !t.is_empty()) {
                    if !first {
                        col += 1;
                    }
                    first = false;
                    let room = end - col;
                    if room <= 0 {
                        break;
                    }
                    col += self.put(col, line, text, style, Some(room));
                }
            }
            RenderCommand::SetClip { rect } => {
                self.clip = Some((self.mapper.col(rect.x), self.mapper.col(rect.right())));
            }
            RenderCommand::ClearClip => self.clip = None,
            // Column edges are implied by the cells; rows are one line each.
            RenderCommand::DrawLine { .. }
            | RenderCommand::BeginGroup { .. }
            | RenderCommand::EndGroup => {}
        }
    }
}

fn paint_commands(buf: &mut Buffer, area: Rect, grid: GridConfig, scroll: usize, cmds: &[RenderCommand]) {
    let mut painter = Painter {
        buf,
        area,
        mapper: CellMapper { grid, scroll },
        clip: None,
    };
    for cmd in cmds {
        painter.paint(cmd);
    }
}

/// Interactive state: the laid-out board plus the cursor.
pub struct App {
    view: BoardView<ApproxMeasurer>,
    selected: usize,
    scroll: usize,
    table_width: u16,
}

impl App {
    pub fn new(board: Board, config: BoardConfig) -> Self {
        let fitter = TextFitter::new(ApproxMeasurer::default(), config.fit);
        Self {
            view: BoardView::new(board, SharedGrid::new(config.grid), fitter),
            selected: 0,
            scroll: 0,
            table_width: 0,
        }
    }

    fn resize(&mut self, width: u16) {
        if width != self.table_width {
            self.table_width = width;
            self.view.apply(GeometryChange::Resized {
                table_width_px: f64::from(width) * CELL_WIDTH_PX,
            });
        }
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let len = self.view.board().len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Char('h') => {
                self.view
                    .edit_subject(self.selected, |s| s.highlighted = !s.highlighted);
            }
            KeyCode::Char('J') if self.selected + 1 < len => {
                let from = self.selected;
                self.view.edit_board(|b| {
                    b.move_subject(from, from + 1);
                });
                self.selected += 1;
            }
            KeyCode::Char('K') if self.selected > 0 && self.selected < len => {
                let from = self.selected;
                self.view.edit_board(|b| {
                    b.move_subject(from, from - 1);
                });
                self.selected -= 1;
            }
            _ => {}
        }
        false
    }

    fn keep_selection_visible(&mut self, visible_rows: usize) {
        let visible_rows = visible_rows.max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible_rows {
            self.scroll = self.selected + 1 - visible_rows;
        }
    }

    /// Palette names present on the selected row, worst first.
    fn legend(&self) -> String {
        let Some(subject) = self.view.board().subjects().get(self.selected) else {
            return String::new();
        };
        let mut colors: Vec<ConditionColor> =
            subject.timeline.iter().map(|i| i.label.color).collect();
        colors.sort_unstable_by(|a, b| b.cmp(a));
        colors.dedup();
        if colors.is_empty() {
            return subject.name.clone();
        }
        let names: Vec<&str> = colors.into_iter().map(ConditionColor::display_name).collect();
        format!("{}: {}", subject.name, names.join(", "))
    }

    fn header_title(&self) -> String {
        format!(
            " arrowboard · {} rows | {} | ↑↓ select | h highlight | J/K move | q quit ",
            self.view.board().len(),
            self.legend()
        )
    }

    fn commands(&self) -> Vec<RenderCommand> {
        let layout = self.view.layout();
        let grid_height = layout.grid.row_height_px * layout.rows.len() as f64;
        let mut cmds = render_hour_axis(&layout.grid, grid_height);
        cmds.extend(render_board(layout, Some(self.selected)));
        cmds
    }

    fn draw(&mut self, buf: &mut Buffer, area: Rect) {
        self.resize(area.width);
        self.keep_selection_visible(usize::from(area.height.saturating_sub(1)));
        let cmds = self.commands();
        paint_commands(buf, area, self.view.layout().grid, self.scroll, &cmds);
    }
}

/// Raw mode and the alternate screen for as long as the value lives.
///
/// Dropping it restores the terminal, including on error returns and
/// unwinding panics.
struct TerminalSession;

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let session = Self;
        execute!(stdout(), EnterAlternateScreen)?;
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(stdout(), LeaveAlternateScreen, cursor::Show);
        let _ = disable_raw_mode();
        debug!("terminal restored");
    }
}

pub fn render_tui(board: Board, config: BoardConfig) -> Result<()> {
    let _session = TerminalSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    event_loop(&mut terminal, App::new(board, config))
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(app.header_title())
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            let block = Block::default().style(Style::default().bg(Color::Black));
            frame.render_widget(block, content_area);
            app.draw(frame.buffer_mut(), content_area);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key.code)
        {
            debug!("quit requested");
            return Ok(());
        }
    }
}
