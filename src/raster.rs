//! Two-pass cell rasterizer: background fill, then glyph alpha-blend, then
//! tab-bar and pane-divider chrome, straight into the display surface's
//! shadow buffer (spec §4.2).
//!
//! Grounded in the teacher's `CpuRenderer`: same `draw_bg`/glyph-cache/
//! alpha-blend shape, adapted from an in-memory `&mut [u32]` pixel buffer
//! to the byte-addressed, strided `Xrgb8888` shadow the display surface
//! owns.

use std::collections::HashMap;

use fontdue::Font;

use crate::config::ThemePalette;
use crate::core::{Cell, Color};
use crate::display::DisplaySurface;
use crate::metrics::GlyphMetrics;
use crate::session::SessionStore;

struct GlyphBitmap {
    data: Vec<u8>,
    width: usize,
    height: usize,
    left: i32,
    top: i32,
    advance: f32,
}

/// Owns the loaded face and its rasterized-glyph cache; stateless
/// otherwise, so `render` can run every event-core iteration that needs
/// one without carrying layout state across calls.
pub struct Rasterizer {
    font: Font,
    glyph_cache: HashMap<char, GlyphBitmap>,
}

impl Rasterizer {
    pub fn new(font: Font) -> Self {
        Self {
            font,
            glyph_cache: HashMap::new(),
        }
    }

    /// Renders the session's active tab into `surface`'s shadow buffer and
    /// presents it. Idempotent: calling twice with no state change between
    /// produces byte-identical shadow contents (spec §8 property 3).
    pub fn render(
        &mut self,
        surface: &mut DisplaySurface,
        metrics: &GlyphMetrics,
        palette: &ThemePalette,
        store: &SessionStore,
    ) {
        let Some(tab) = store.active_tab_ref() else {
            return;
        };

        let width = surface.width as usize;
        let height = surface.height as usize;
        let stride = surface.stride as usize;
        let content_height = height.saturating_sub(metrics.cell_h as usize);
        let shadow = surface.shadow_mut();

        for i in 0..tab.num_panes {
            let Some(pane) = tab.pane(i) else { continue };
            let emulator = pane.emulator();
            let is_active_pane = i == tab.active_pane;
            let cursor_cell = if is_active_pane && emulator.cursor_visible {
                Some((emulator.cursor_row, emulator.cursor_col))
            } else {
                None
            };

            for row in 0..emulator.grid.rows {
                let origin_y = row as u32 * metrics.cell_h;
                if origin_y as usize >= content_height {
                    break;
                }
                for col in 0..emulator.grid.cols.min(pane.cols) {
                    let origin_x = pane.start_col_px + col as u32 * metrics.cell_w;
                    if origin_x as usize >= width {
                        break;
                    }
                    let cell = emulator.grid.get(row, col);
                    let is_cursor = cursor_cell == Some((row, col));
                    let (_, bg) = resolve_colors(cell, palette, is_cursor);
                    fill_cell_rect(
                        shadow, stride, width, content_height, origin_x, origin_y, metrics, bg,
                    );
                }
            }
        }

        for i in 0..tab.num_panes {
            let Some(pane) = tab.pane(i) else { continue };
            let emulator = pane.emulator();
            let is_active_pane = i == tab.active_pane;
            let cursor_cell = if is_active_pane && emulator.cursor_visible {
                Some((emulator.cursor_row, emulator.cursor_col))
            } else {
                None
            };

            for row in 0..emulator.grid.rows {
                let origin_y = row as u32 * metrics.cell_h;
                if origin_y as usize >= content_height {
                    break;
                }
                for col in 0..emulator.grid.cols.min(pane.cols) {
                    let cell = emulator.grid.get(row, col);
                    if cell.character == ' ' {
                        continue;
                    }
                    let origin_x = pane.start_col_px + col as u32 * metrics.cell_w;
                    if origin_x as usize >= width {
                        break;
                    }
                    let is_cursor = cursor_cell == Some((row, col));
                    let (fg, bg) = resolve_colors(cell, palette, is_cursor);
                    self.blit_glyph(
                        shadow,
                        stride,
                        width,
                        content_height,
                        origin_x,
                        origin_y,
                        metrics,
                        cell.character,
                        fg,
                        bg,
                    );
                }
            }
        }

        if tab.num_panes == 2 {
            if let Some(pane1) = tab.pane(1) {
                let divider_x = pane1.start_col_px.saturating_sub(1) as usize;
                for y in 0..content_height {
                    put_pixel(shadow, stride, width, divider_x, y, palette.tabbar_fg);
                }
            }
        }

        self.paint_tab_bar(shadow, stride, width, height, content_height, metrics, palette, store);

        let _ = surface.present();
    }

    fn paint_tab_bar(
        &mut self,
        shadow: &mut [u8],
        stride: usize,
        width: usize,
        height: usize,
        content_height: usize,
        metrics: &GlyphMetrics,
        palette: &ThemePalette,
        store: &SessionStore,
    ) {
        for y in content_height..height {
            for x in 0..width {
                put_pixel(shadow, stride, width, x, y, palette.tabbar_bg);
            }
        }

        let mut pen_x: u32 = 0;
        for (index, _tab) in store.tabs().enumerate() {
            let label = format!(" {} ", index + 1);
            let active = index == store.active_tab;
            let (fg, bg) = if active {
                (palette.tabbar_active_fg, palette.tabbar_active_bg)
            } else {
                (palette.tabbar_fg, palette.tabbar_bg)
            };

            let label_px_w = label.chars().count() as u32 * metrics.cell_w;
            for dx in 0..label_px_w {
                put_pixel(
                    shadow,
                    stride,
                    width,
                    (pen_x + dx) as usize,
                    content_height,
                    bg,
                );
            }
            // Fill the rest of the bar's cell height for this label too.
            for y in content_height..height {
                for dx in 0..label_px_w {
                    put_pixel(shadow, stride, width, (pen_x + dx) as usize, y, bg);
                }
            }

            for (i, ch) in label.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let origin_x = pen_x + i as u32 * metrics.cell_w;
                self.blit_glyph(
                    shadow, stride, width, height, origin_x, content_height as u32, metrics, ch,
                    fg, bg,
                );
            }

            pen_x += label_px_w + metrics.cell_w / 2;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn blit_glyph(
        &mut self,
        shadow: &mut [u8],
        stride: usize,
        width: usize,
        height: usize,
        origin_x: u32,
        origin_y: u32,
        metrics: &GlyphMetrics,
        character: char,
        fg: Color,
        bg: Color,
    ) {
        if !self.glyph_cache.contains_key(&character) {
            let (m, bitmap) = self.font.rasterize(character, metrics.font_size);
            self.glyph_cache.insert(
                character,
                GlyphBitmap {
                    data: bitmap,
                    width: m.width,
                    height: m.height,
                    left: m.xmin,
                    top: m.height as i32 + m.ymin,
                    advance: m.advance_width,
                },
            );
        }
        let glyph = self.glyph_cache.get(&character).expect("just inserted");
        if glyph.width == 0 || glyph.height == 0 {
            return; // missing glyph: background only, per spec error policy
        }

        let centering_offset =
            ((metrics.cell_w as f32 - glyph.advance) / 2.0).max(0.0).round() as i32;
        let blit_x = origin_x as i32 + glyph.left + centering_offset;
        let blit_y = origin_y as i32 + metrics.ascender as i32 - glyph.top;

        for gy in 0..glyph.height {
            let py = blit_y + gy as i32;
            if py < 0 || py as usize >= height {
                continue;
            }
            for gx in 0..glyph.width {
                let px = blit_x + gx as i32;
                if px < 0 || px as usize >= width {
                    continue;
                }
                let alpha = glyph.data[gy * glyph.width + gx];
                if alpha == 0 {
                    continue;
                }
                let a = alpha as u32;
                let inv_a = 255 - a;
                let out = Color {
                    r: ((fg.r as u32 * a + bg.r as u32 * inv_a) / 255) as u8,
                    g: ((fg.g as u32 * a + bg.g as u32 * inv_a) / 255) as u8,
                    b: ((fg.b as u32 * a + bg.b as u32 * inv_a) / 255) as u8,
                };
                put_pixel(shadow, stride, width, px as usize, py as usize, out);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_cell_rect(
    shadow: &mut [u8],
    stride: usize,
    width: usize,
    content_height: usize,
    origin_x: u32,
    origin_y: u32,
    metrics: &GlyphMetrics,
    color: Color,
) {
    for dy in 0..metrics.cell_h {
        let y = (origin_y + dy) as usize;
        if y >= content_height {
            break;
        }
        for dx in 0..metrics.cell_w {
            let x = (origin_x + dx) as usize;
            if x >= width {
                break;
            }
            put_pixel(shadow, stride, width, x, y, color);
        }
    }
}

fn put_pixel(shadow: &mut [u8], stride: usize, width: usize, x: usize, y: usize, color: Color) {
    if x >= width {
        return;
    }
    let offset = y * stride + x * 4;
    if offset + 4 > shadow.len() {
        return;
    }
    shadow[offset..offset + 4].copy_from_slice(&color.to_pixel().to_le_bytes());
}

/// Resolves a cell's stored attributes against the active theme, applying
/// sentinel substitution, bold-implies-bright, reverse-video swap, and a
/// cursor-cell override, in that order (spec §4.2 passes A/B).
fn resolve_colors(cell: &Cell, palette: &ThemePalette, is_cursor: bool) -> (Color, Color) {
    let mut fg = if cell.fg == Color::SENTINEL_FG {
        palette.default_fg
    } else {
        cell.fg
    };
    let bg = if cell.bg == Color::SENTINEL_BG {
        palette.default_bg
    } else {
        cell.bg
    };
    if cell.bold {
        fg = fg.bold_bright_with_palette(&palette.ansi);
    }
    let (mut fg, mut bg) = if cell.reverse { (bg, fg) } else { (fg, bg) };
    if is_cursor {
        fg = palette.cursor_fg;
        bg = palette.cursor_bg;
    }
    (fg, bg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cell;

    fn test_font() -> Option<Font> {
        let bytes = crate::config::load_font_bytes(crate::config::FontFamily::DejaVuSansMono)
            .or_else(|_| crate::config::load_font_bytes(crate::config::FontFamily::JetBrainsMono))
            .ok()?;
        Font::from_bytes(bytes.as_slice(), fontdue::FontSettings::default()).ok()
    }

    #[test]
    fn resolve_colors_substitutes_sentinels() {
        let palette = crate::config::ThemeChoice::Dark.resolve();
        let cell = Cell::default();
        let (fg, bg) = resolve_colors(&cell, &palette, false);
        assert_eq!(fg, palette.default_fg);
        assert_eq!(bg, palette.default_bg);
    }

    #[test]
    fn resolve_colors_reverse_swaps() {
        let palette = crate::config::ThemeChoice::Dark.resolve();
        let cell = Cell {
            reverse: true,
            ..Cell::default()
        };
        let (fg, bg) = resolve_colors(&cell, &palette, false);
        assert_eq!(fg, palette.default_bg);
        assert_eq!(bg, palette.default_fg);
    }

    #[test]
    fn resolve_colors_cursor_overrides_everything() {
        let palette = crate::config::ThemeChoice::Dark.resolve();
        let cell = Cell::default();
        let (fg, bg) = resolve_colors(&cell, &palette, true);
        assert_eq!(fg, palette.cursor_fg);
        assert_eq!(bg, palette.cursor_bg);
    }

    #[test]
    fn put_pixel_round_trips_a_color() {
        let mut shadow = vec![0u8; 4 * 4 * 4];
        let color = Color {
            r: 0x11,
            g: 0x22,
            b: 0x33,
        };
        put_pixel(&mut shadow, 16, 4, 2, 1, color);
        let offset = 1 * 16 + 2 * 4;
        assert_eq!(
            u32::from_le_bytes(shadow[offset..offset + 4].try_into().unwrap()),
            color.to_pixel()
        );
    }

    #[test]
    fn glyph_cache_fills_lazily() {
        let Some(font) = test_font() else { return };
        let mut rasterizer = Rasterizer::new(font);
        assert!(rasterizer.glyph_cache.is_empty());
        let metrics = GlyphMetrics::compute(&rasterizer.font, 16.0);
        let mut shadow = vec![0u8; 200 * 200 * 4];
        rasterizer.blit_glyph(
            &mut shadow,
            200 * 4,
            200,
            200,
            0,
            0,
            &metrics,
            'A',
            Color { r: 255, g: 255, b: 255 },
            Color { r: 0, g: 0, b: 0 },
        );
        assert!(rasterizer.glyph_cache.contains_key(&'A'));
    }
}
