use crate::core::{Cell, Color, Grid, Row};
use std::collections::VecDeque;
use unicode_width::UnicodeWidthChar;
use vte::{Params, Parser, Perform};

mod alt_screen;
mod grid_ops;
mod handlers;
mod reflow;
mod resize;

/// Cursor style reported by DECSCUSR.
#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub enum CursorStyle {
    BlinkingBlock,     // 0, 1
    SteadyBlock,       // 2
    BlinkingUnderline, // 3
    SteadyUnderline,   // 4
    #[default]
    BlinkingBar, // 5
    SteadyBar,         // 6
}

impl CursorStyle {
    pub fn is_blinking(self) -> bool {
        matches!(
            self,
            Self::BlinkingBlock | Self::BlinkingUnderline | Self::BlinkingBar
        )
    }
}

pub struct Terminal {
    pub grid: Grid,
    alt_grid: Option<Grid>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    saved_cursor: (usize, usize),     // ESC 7 / ESC 8 (DECSC/DECRC)
    alt_saved_cursor: (usize, usize), // Saved separately for alt-screen enter/leave.
    current_fg: Color,
    current_bg: Color,
    current_bold: bool,
    current_reverse: bool,
    current_underline: bool,
    scroll_top: usize,
    scroll_bottom: usize,
    saved_scroll_top: usize,
    saved_scroll_bottom: usize,
    pub scrollback: VecDeque<Row>,
    max_scrollback: usize,
    pub decckm: bool,               // Application Cursor Key Mode (ESC[?1h/l)
    pub cursor_visible: bool,       // DECTCEM (mode 25)
    pub pending_responses: Vec<u8>, // Bytes queued for PTY replies.
    pub cursor_style: CursorStyle,
    pub resize_at: Option<std::time::Instant>,
    scrollback_popped: usize,
    parser: Parser,
    ansi_palette: [Color; 16],
}

impl Terminal {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::new_with_palette(rows, cols, Color::ANSI)
    }

    /// Builds a terminal whose SGR 30-37/40-47/90-97/100-107 codes and
    /// 256-color indices 0-15 resolve against `palette` instead of the
    /// built-in Nord-derived default. Used to seed a pane's emulator from
    /// the configured theme at spawn time.
    pub fn new_with_palette(rows: usize, cols: usize, palette: [Color; 16]) -> Self {
        Self {
            grid: Grid::new(rows, cols),
            alt_grid: None,
            cursor_row: 0,
            cursor_col: 0,
            saved_cursor: (0, 0),
            alt_saved_cursor: (0, 0),
            current_fg: Color::SENTINEL_FG,
            current_bg: Color::SENTINEL_BG,
            current_bold: false,
            current_reverse: false,
            current_underline: false,
            scroll_top: 0,
            scroll_bottom: rows - 1,
            saved_scroll_top: 0,
            saved_scroll_bottom: rows - 1,
            scrollback: VecDeque::new(),
            max_scrollback: 1000,
            decckm: false,
            cursor_visible: true,
            pending_responses: Vec::new(),
            cursor_style: CursorStyle::default(),
            resize_at: None,
            scrollback_popped: 0,
            parser: Parser::new(),
            ansi_palette: palette,
        }
    }

    /// Resolves a 0-255 SGR color index against this terminal's ANSI
    /// palette for 0-15, falling back to the fixed color-cube/grayscale
    /// table in [`Color::from_256`] for 16-255.
    pub fn color_from_256(&self, n: u16) -> Color {
        match usize::try_from(n) {
            Ok(i) if i < 16 => self.ansi_palette[i],
            _ => Color::from_256(n),
        }
    }

    fn ansi(&self, index: usize) -> Color {
        self.ansi_palette[index]
    }

    /// Overrides the scrollback cap set at construction (default 1000),
    /// e.g. from the user's configured `terminal.max_scrollback`.
    pub fn set_max_scrollback(&mut self, max: usize) {
        self.max_scrollback = max;
        while self.scrollback.len() > self.max_scrollback {
            self.scrollback.pop_front();
            self.scrollback_popped += 1;
        }
    }

    pub fn process(&mut self, bytes: &[u8]) {
        let mut parser = std::mem::replace(&mut self.parser, Parser::new());
        parser.advance(self, bytes);
        self.parser = parser;
    }

    fn param(&self, params: &Params, default: u16) -> u16 {
        params
            .iter()
            .next()
            .and_then(|p| p.first().copied())
            .unwrap_or(default)
    }

    /// Queues a response that the event core will flush back to the pane's PTY.
    fn respond(&mut self, data: &[u8]) {
        self.pending_responses.extend_from_slice(data);
    }

    /// Drains all pending PTY response bytes.
    pub fn drain_responses(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pending_responses)
    }

    /// Returns and resets the accumulated scrollback-popped counter.
    pub fn drain_scrollback_popped(&mut self) -> usize {
        std::mem::take(&mut self.scrollback_popped)
    }

    fn reset_attributes(&mut self) {
        handlers::attributes::reset_attributes(self);
    }

    fn set_fg(&mut self, color: Color) {
        self.current_fg = color;
    }

    fn set_bg(&mut self, color: Color) {
        self.current_bg = color;
    }

    fn set_bold(&mut self, value: bool) {
        self.current_bold = value;
    }

    fn set_reverse(&mut self, value: bool) {
        self.current_reverse = value;
    }

    fn set_underline(&mut self, value: bool) {
        self.current_underline = value;
    }

    fn set_decckm(&mut self, enabled: bool) {
        self.decckm = enabled;
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn set_cursor_style(&mut self, style: CursorStyle) {
        self.cursor_style = style;
    }

    fn full_reset(&mut self) {
        let rows = self.grid.rows;
        let cols = self.grid.cols;

        self.alt_grid = None;
        self.grid = Grid::new(rows, cols);
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.saved_cursor = (0, 0);
        self.alt_saved_cursor = (0, 0);
        self.scroll_top = 0;
        self.scroll_bottom = rows.saturating_sub(1);
        self.saved_scroll_top = 0;
        self.saved_scroll_bottom = rows.saturating_sub(1);
        self.scrollback.clear();
        self.decckm = false;
        self.cursor_visible = true;
        self.cursor_style = CursorStyle::default();
        self.pending_responses.clear();
        self.reset_attributes();
    }

    fn handle_private_mode(&mut self, params: &Params, intermediates: &[u8], action: char) -> bool {
        handlers::private_modes::handle_private_mode(self, params, intermediates, action)
    }

    fn handle_cursor_style_csi(
        &mut self,
        params: &Params,
        intermediates: &[u8],
        action: char,
    ) -> bool {
        handlers::private_modes::handle_cursor_style_csi(self, params, intermediates, action)
    }

    fn handle_sgr(&mut self, params: &Params) {
        handlers::sgr::handle_sgr(self, params);
    }

    fn handle_cursor_csi(&mut self, action: char, params: &Params) -> bool {
        handlers::cursor::handle_cursor_csi(self, action, params)
    }

    fn handle_inline_edit_csi(&mut self, action: char, params: &Params) -> bool {
        handlers::edit::handle_inline_edit_csi(self, action, params)
    }

    fn handle_scroll_csi(&mut self, action: char, params: &Params) -> bool {
        handlers::scroll::handle_scroll_csi(self, action, params)
    }

    fn handle_erase_csi(&mut self, action: char, params: &Params) -> bool {
        handlers::erase::handle_erase_csi(self, action, params)
    }

    fn handle_device_csi(&mut self, action: char, params: &Params, intermediates: &[u8]) -> bool {
        handlers::device::handle_device_csi(self, action, params, intermediates)
    }
}

impl Perform for Terminal {
    fn print(&mut self, c: char) {
        let mut width = UnicodeWidthChar::width(c).unwrap_or(1);
        if width == 0 {
            // Keep combining marks visible as standalone glyphs instead of dropping them.
            width = 1;
        }

        if self.cursor_col + width > self.grid.cols {
            // Mark current row as soft-wrapped before moving to next row
            self.grid.set_wrapped(self.cursor_row, true);
            self.cursor_col = 0;
            self.cursor_row += 1;
            if self.cursor_row > self.scroll_bottom {
                self.scroll_up_region(self.scroll_top, self.scroll_bottom);
                self.cursor_row = self.scroll_bottom;
            }
        }

        self.grid.set(
            self.cursor_row,
            self.cursor_col,
            Cell {
                character: c,
                fg: self.current_fg,
                bg: self.current_bg,
                bold: self.current_bold,
                reverse: self.current_reverse,
                underline: self.current_underline,
            },
        );

        // Reserve the trailing cell for wide glyphs.
        if width == 2 && self.cursor_col + 1 < self.grid.cols {
            self.grid.set(
                self.cursor_row,
                self.cursor_col + 1,
                Cell {
                    character: ' ',
                    fg: self.current_fg,
                    bg: self.current_bg,
                    bold: self.current_bold,
                    reverse: self.current_reverse,
                    underline: self.current_underline,
                },
            );
        }

        self.cursor_col += width;
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            10..=12 => {
                // LF/VT/FF: move to next row, keep current column.
                // Mark current row as NOT wrapped (hard line break).
                self.grid.set_wrapped(self.cursor_row, false);
                self.cursor_row += 1;
                if self.cursor_row > self.scroll_bottom {
                    self.scroll_up_region(self.scroll_top, self.scroll_bottom);
                    self.cursor_row = self.scroll_bottom;
                }
            }
            13 => {
                self.cursor_col = 0;
            }
            8 => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                }
            }
            9 => {
                const DEFAULT_TAB_WIDTH: usize = 8;
                self.cursor_col = (self.cursor_col + DEFAULT_TAB_WIDTH) & !(DEFAULT_TAB_WIDTH - 1);
                if self.cursor_col >= self.grid.cols {
                    self.cursor_col = self.grid.cols - 1;
                }
            }
            _ => {}
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}
    fn unhook(&mut self) {}
    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        if self.handle_private_mode(params, intermediates, action) {
            return;
        }
        if self.handle_cursor_style_csi(params, intermediates, action) {
            return;
        }
        if action == 'm' {
            self.handle_sgr(params);
            return;
        }
        if self.handle_cursor_csi(action, params) {
            return;
        }
        if self.handle_inline_edit_csi(action, params) {
            return;
        }
        if self.handle_scroll_csi(action, params) {
            return;
        }
        if self.handle_erase_csi(action, params) {
            return;
        }
        let _ = self.handle_device_csi(action, params, intermediates);
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, byte: u8) {
        match byte {
            b'7' => self.saved_cursor = (self.cursor_row, self.cursor_col),
            b'8' => {
                self.cursor_row = self.saved_cursor.0;
                self.cursor_col = self.saved_cursor.1;
            }
            b'M' => {
                // Reverse Index: cursor up, scroll down if at top of region
                if self.cursor_row == self.scroll_top {
                    self.scroll_down_region(self.scroll_top, self.scroll_bottom);
                } else {
                    self.cursor_row = self.cursor_row.saturating_sub(1);
                }
            }
            b'c' => self.full_reset(), // RIS - full terminal reset
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core_terminal.rs"]
mod tests;
