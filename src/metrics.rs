//! Shared, immutable-after-init glyph metrics (spec §3).
//!
//! Both the pane layer (to size PTYs in pixels) and the rasterizer (to lay
//! out cells) need the same `cell_w`/`cell_h`/`ascender` triple, so it lives
//! in its own module rather than under either.

use fontdue::Font;

/// Cell geometry derived once from the loaded face and configured point
/// size. Invariant: `cell_w > 0 && cell_h > 0 && 0 < ascender <= cell_h`.
#[derive(Clone, Copy, Debug)]
pub struct GlyphMetrics {
    pub cell_w: u32,
    pub cell_h: u32,
    pub ascender: u32,
    pub font_size: f32,
}

impl GlyphMetrics {
    /// Mirrors the teacher's CPU-renderer metric derivation: cell height
    /// from the face's horizontal line metrics, cell width from the
    /// advance of `'M'` at the same size.
    pub fn compute(font: &Font, font_size: f32) -> Self {
        let line_metrics = font
            .horizontal_line_metrics(font_size)
            .expect("font has no horizontal line metrics");
        let ascent = line_metrics.ascent.round() as i32;
        let descent = line_metrics.descent.round() as i32; // negative
        let cell_h = (ascent - descent).max(1) as u32;
        let ascender = ascent.clamp(1, cell_h as i32) as u32;

        let (m_metrics, _) = font.rasterize('M', font_size);
        let cell_w = m_metrics.advance_width.round().max(1.0) as u32;

        GlyphMetrics {
            cell_w,
            cell_h,
            ascender,
            font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A real face is only available if one of the fallback paths exists
    /// on the machine running the tests; skip rather than fail over an
    /// environment gap.
    fn test_font() -> Option<Font> {
        let bytes = crate::config::load_font_bytes(crate::config::FontFamily::DejaVuSansMono)
            .or_else(|_| crate::config::load_font_bytes(crate::config::FontFamily::JetBrainsMono))
            .ok()?;
        Font::from_bytes(bytes.as_slice(), fontdue::FontSettings::default()).ok()
    }

    #[test]
    fn metrics_satisfy_the_spec_invariant() {
        let Some(font) = test_font() else {
            return;
        };
        let metrics = GlyphMetrics::compute(&font, 16.0);
        assert!(metrics.cell_w > 0);
        assert!(metrics.cell_h > 0);
        assert!(metrics.ascender > 0 && metrics.ascender <= metrics.cell_h);
    }
}
