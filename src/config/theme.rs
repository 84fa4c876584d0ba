use crate::core::Color;

use super::ThemeChoice;

/// Complete color palette resolved from a [`ThemeChoice`].
///
/// Contains everything the rasterizer needs to paint panes, the cursor, and
/// the tab bar. There is no GUI chrome here — no scrollbars, no window
/// buttons — because there is no window manager to chrome for.
pub(crate) struct ThemePalette {
    pub default_fg: Color,
    pub default_bg: Color,
    pub ansi: [Color; 16],

    pub cursor_fg: Color,
    pub cursor_bg: Color,

    pub tabbar_bg: Color,
    pub tabbar_fg: Color,
    pub tabbar_active_bg: Color,
    pub tabbar_active_fg: Color,
}

impl ThemeChoice {
    /// Resolves this theme choice into a full color palette.
    pub fn resolve(&self) -> ThemePalette {
        match self {
            ThemeChoice::Dark => ThemePalette::dark(),
            ThemeChoice::Light => ThemePalette::light(),
        }
    }
}

impl ThemePalette {
    /// The default palette — Nord-derived, matching the reference hardware
    /// console's hardcoded colors exactly.
    fn dark() -> Self {
        Self {
            default_fg: Color::from_pixel(0xD8DEE9),
            default_bg: Color::from_pixel(0x2E3440),
            ansi: [
                Color { r: 59, g: 66, b: 82 },     //  0 black    #3B4252
                Color { r: 191, g: 97, b: 106 },   //  1 red      #BF616A
                Color { r: 163, g: 190, b: 140 },  //  2 green    #A3BE8C
                Color { r: 235, g: 203, b: 139 },  //  3 yellow   #EBCB8B
                Color { r: 129, g: 161, b: 193 },  //  4 blue     #81A1C1
                Color { r: 180, g: 142, b: 173 },  //  5 magenta  #B48EAD
                Color { r: 136, g: 192, b: 208 },  //  6 cyan     #88C0D0
                Color { r: 229, g: 233, b: 240 },  //  7 white    #E5E9F0
                Color { r: 76, g: 86, b: 106 },    //  8 br black #4C566A
                Color { r: 191, g: 97, b: 106 },   //  9 br red   #BF616A
                Color { r: 163, g: 190, b: 140 },  // 10 br green #A3BE8C
                Color { r: 235, g: 203, b: 139 },  // 11 br yello #EBCB8B
                Color { r: 129, g: 161, b: 193 },  // 12 br blue  #81A1C1
                Color { r: 180, g: 142, b: 173 },  // 13 br magen #B48EAD
                Color { r: 143, g: 188, b: 187 },  // 14 br cyan  #8FBCBB
                Color { r: 236, g: 239, b: 244 },  // 15 br white #ECEFF4
            ],
            cursor_fg: Color::from_pixel(0x2E3440),
            cursor_bg: Color::from_pixel(0xD8DEE9),
            tabbar_bg: Color::from_pixel(0x3B4252),
            tabbar_fg: Color::from_pixel(0xD8DEE9),
            tabbar_active_bg: Color::from_pixel(0x88C0D0),
            tabbar_active_fg: Color::from_pixel(0x2E3440),
        }
    }

    /// Light variant — same hues, inverted brightness balance.
    fn light() -> Self {
        Self {
            default_fg: Color::from_pixel(0x2E3440),
            default_bg: Color::from_pixel(0xECEFF4),
            ansi: [
                Color { r: 229, g: 233, b: 240 },  //  0 black    #E5E9F0
                Color { r: 191, g: 97, b: 106 },   //  1 red      #BF616A
                Color { r: 106, g: 140, b: 80 },   //  2 green    #6A8C50
                Color { r: 166, g: 123, b: 40 },   //  3 yellow   #A67B28
                Color { r: 76, g: 110, b: 145 },   //  4 blue     #4C6E91
                Color { r: 140, g: 97, b: 133 },   //  5 magenta  #8C6185
                Color { r: 76, g: 136, b: 150 },   //  6 cyan     #4C8896
                Color { r: 59, g: 66, b: 82 },     //  7 white    #3B4252
                Color { r: 143, g: 150, b: 163 },  //  8 br black #8F96A3
                Color { r: 191, g: 97, b: 106 },   //  9 br red   #BF616A
                Color { r: 106, g: 140, b: 80 },   // 10 br green #6A8C50
                Color { r: 166, g: 123, b: 40 },   // 11 br yello #A67B28
                Color { r: 76, g: 110, b: 145 },   // 12 br blue  #4C6E91
                Color { r: 140, g: 97, b: 133 },   // 13 br magen #8C6185
                Color { r: 80, g: 140, b: 138 },   // 14 br cyan  #508C8A
                Color { r: 46, g: 52, b: 64 },     // 15 br white #2E3440
            ],
            cursor_fg: Color::from_pixel(0xECEFF4),
            cursor_bg: Color::from_pixel(0x2E3440),
            tabbar_bg: Color::from_pixel(0xD8DEE9),
            tabbar_fg: Color::from_pixel(0x2E3440),
            tabbar_active_bg: Color::from_pixel(0x5E81AC),
            tabbar_active_fg: Color::from_pixel(0xECEFF4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_matches_reference_console_defaults() {
        let palette = ThemeChoice::Dark.resolve();
        assert_eq!(palette.default_fg.to_pixel(), 0xD8DEE9);
        assert_eq!(palette.default_bg.to_pixel(), 0x2E3440);
        assert_eq!(palette.tabbar_bg.to_pixel(), 0x3B4252);
        assert_eq!(palette.tabbar_active_bg.to_pixel(), 0x88C0D0);
        assert_eq!(palette.ansi.len(), 16);
    }

    #[test]
    fn light_is_brighter_than_dark() {
        let dark = ThemeChoice::Dark.resolve();
        let light = ThemeChoice::Light.resolve();
        let brightness = |c: Color| c.r as u32 + c.g as u32 + c.b as u32;
        assert!(brightness(light.default_bg) > brightness(dark.default_bg));
    }

    #[test]
    fn each_theme_has_16_ansi_colors() {
        for theme in [ThemeChoice::Dark, ThemeChoice::Light] {
            let palette = theme.resolve();
            assert_eq!(palette.ansi.len(), 16);
        }
    }

    #[test]
    fn cursor_colors_are_swapped_fg_bg() {
        let palette = ThemeChoice::Dark.resolve();
        assert_eq!(palette.cursor_bg, palette.default_fg);
        assert_eq!(palette.cursor_fg, palette.default_bg);
    }
}
