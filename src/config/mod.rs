mod fonts;
mod model;
mod persistence;
mod theme;

pub(crate) use fonts::{load_font_bytes, FONT_FALLBACKS};
pub(crate) use model::{AppConfig, FontConfig, FontFamily, ShellConfig, TerminalConfig, ThemeChoice};
pub(crate) use persistence::{config_base_dir, load_config, save_config};
pub(crate) use theme::ThemePalette;
