//! Frame description, text rasterizer, and terminal surfaces.
//!
//! [`build_frame`] turns the model into a [`Frame`]: a pure description of
//! what the panel shows. Surfaces decide how to put it on screen. Building a
//! frame twice from an unchanged model yields identical output.

#![allow(missing_docs)]

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use super::bar::{render_bar, truncate_name, truncate_value};
use super::model::DashboardModel;
use crate::core::config::{DashboardConfig, LIST_START_ROW, MARKER_COL, NAME_COL};
use crate::core::errors::Result;

/// Help text drawn on the bottom border.
pub const FOOTER_TEXT: &str = " use arrow keys, or 'q' to quit ";

const SELECTION_MARKER: char = '*';
const HEADING_ROW: usize = 2;
const TEXT_COL: usize = 2;

// ──────────────────── frame description ────────────────────

/// One visible parameter row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRow {
    pub selected: bool,
    pub name: String,
    pub bar: String,
    pub value: String,
}

/// Everything a surface needs to draw one redraw of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub title: String,
    pub heading: String,
    pub status: Option<String>,
    pub rows: Vec<FrameRow>,
    pub footer: String,
    pub width: u16,
    pub height: u16,
    pub origin_col: u16,
    pub origin_row: u16,
    pub bar_col: usize,
    pub value_col: usize,
}

/// Describe the panel for the model's current state.
#[must_use]
pub fn build_frame(model: &DashboardModel, config: &DashboardConfig) -> Frame {
    let rows = model
        .window()
        .filter_map(|i| {
            let param = model.params.get(i)?;
            Some(FrameRow {
                selected: model.selected == Some(i),
                name: truncate_name(param.name(), config.name_column_width),
                bar: render_bar(param, config.bar_track_length),
                value: truncate_value(param.value(), config.value_column_width),
            })
        })
        .collect();

    Frame {
        title: config.title.clone(),
        heading: config.heading.clone(),
        status: model
            .hook_error
            .as_ref()
            .map(|err| format!("hook error: {err}")),
        rows,
        footer: FOOTER_TEXT.to_string(),
        width: config.panel_width,
        height: config.panel_height,
        origin_col: config.origin_col,
        origin_row: config.origin_row,
        bar_col: config.bar_col(),
        value_col: config.value_col(),
    }
}

impl Frame {
    /// Panel line index of the selected row, if it is visible.
    #[must_use]
    pub fn selected_line(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.selected)
            .map(|pos| usize::from(LIST_START_ROW) + pos)
    }

    /// Rasterize into `height` lines of exactly `width` characters.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        let width = usize::from(self.width);
        let height = usize::from(self.height);
        if width < 2 || height < 2 {
            return vec![" ".repeat(width); height];
        }

        let mut grid = vec![vec![' '; width]; height];
        let inner = width - 1;

        put(&mut grid, HEADING_ROW, TEXT_COL, &self.heading, inner);
        if let Some(status) = &self.status {
            let col = TEXT_COL + self.heading.chars().count() + 2;
            put(&mut grid, HEADING_ROW, col, status, inner);
        }

        for (offset, row) in self.rows.iter().enumerate() {
            let line = usize::from(LIST_START_ROW) + offset;
            if line >= height - 1 {
                break;
            }
            if row.selected {
                put(
                    &mut grid,
                    line,
                    usize::from(MARKER_COL),
                    &SELECTION_MARKER.to_string(),
                    inner,
                );
            }
            put(&mut grid, line, usize::from(NAME_COL), &row.name, inner);
            put(&mut grid, line, self.bar_col, &row.bar, inner);
            put(&mut grid, line, self.value_col, &row.value, inner);
        }

        draw_box(&mut grid);
        put(&mut grid, 0, TEXT_COL, &self.title, inner);
        put(&mut grid, height - 1, TEXT_COL, &self.footer, inner);

        grid.into_iter().map(|line| line.into_iter().collect()).collect()
    }
}

fn put(grid: &mut [Vec<char>], row: usize, col: usize, text: &str, limit: usize) {
    let Some(line) = grid.get_mut(row) else {
        return;
    };
    for (i, ch) in text.chars().enumerate() {
        let x = col + i;
        if x >= limit {
            break;
        }
        line[x] = ch;
    }
}

fn draw_box(grid: &mut [Vec<char>]) {
    let height = grid.len();
    for (y, line) in grid.iter_mut().enumerate() {
        let width = line.len();
        for (x, cell) in line.iter_mut().enumerate() {
            let top_or_bottom = y == 0 || y == height - 1;
            let side = x == 0 || x == width - 1;
            *cell = match (y, x) {
                (0, 0) => '┌',
                (0, _) if x == width - 1 => '┐',
                (_, 0) if y == height - 1 => '└',
                _ if y == height - 1 && x == width - 1 => '┘',
                _ if top_or_bottom => '─',
                _ if side => '│',
                _ => *cell,
            };
        }
    }
}

// ──────────────────── surfaces ────────────────────

/// Destination for rendered frames.
pub trait Surface {
    fn draw(&mut self, frame: &Frame) -> Result<()>;

    /// Forget what is on screen so the next draw repaints from scratch.
    fn invalidate(&mut self) {}
}

/// In-memory surface that keeps every rasterized frame.
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    frames: Vec<Vec<String>>,
    invalidations: usize,
}

impl TextSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    #[must_use]
    pub fn last(&self) -> Option<&[String]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// How many times the surface was told to repaint from scratch.
    #[must_use]
    pub fn invalidations(&self) -> usize {
        self.invalidations
    }
}

impl Surface for TextSurface {
    fn draw(&mut self, frame: &Frame) -> Result<()> {
        self.frames.push(frame.to_lines());
        Ok(())
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}

/// Draws frames onto a real terminal with crossterm.
pub struct CrosstermSurface<W: Write> {
    out: W,
    cleared: bool,
}

impl CrosstermSurface<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cleared: false,
        }
    }
}

impl<W: Write> Surface for CrosstermSurface<W> {
    fn draw(&mut self, frame: &Frame) -> Result<()> {
        if !self.cleared {
            queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
            self.cleared = true;
        }

        let lines = frame.to_lines();
        let last = lines.len().saturating_sub(1);
        let selected = frame.selected_line();

        for (i, line) in lines.iter().enumerate() {
            let Ok(offset) = u16::try_from(i) else {
                break;
            };
            queue!(
                self.out,
                MoveTo(frame.origin_col, frame.origin_row.saturating_add(offset))
            )?;
            if i == 0 || i == last {
                queue!(self.out, SetForegroundColor(Color::Cyan))?;
            } else if Some(i) == selected {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            queue!(self.out, Print(line), SetAttribute(Attribute::Reset))?;
        }

        self.out.flush()?;
        Ok(())
    }

    fn invalidate(&mut self) {
        self.cleared = false;
    }
}

// ──────────────────── tests ────────────────────
