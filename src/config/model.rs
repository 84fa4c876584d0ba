use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub font: FontConfig,
    pub theme: ThemeChoice,
    pub terminal: TerminalConfig,
    pub shell: ShellConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct FontConfig {
    pub size: f32,
    pub family: FontFamily,
    pub line_padding: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: 14.0,
            family: FontFamily::default(),
            line_padding: 0,
        }
    }
}

impl FontConfig {
    pub const SIZE_MIN: f32 = 8.0;
    pub const SIZE_MAX: f32 = 32.0;
    pub const SIZE_STEP: f32 = 0.5;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct TerminalConfig {
    pub max_scrollback: usize,
    pub cursor_blink_interval_ms: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            max_scrollback: 1000,
            cursor_blink_interval_ms: 500,
        }
    }
}

impl TerminalConfig {
    pub const BLINK_MS_MIN: u64 = 100;
    pub const BLINK_MS_MAX: u64 = 2000;
    pub const BLINK_MS_STEP: u64 = 50;
}

/// Shell to launch in each pane. `path: None` means fall back to `$SHELL`,
/// then `/bin/sh`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ShellConfig {
    pub path: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub(crate) enum FontFamily {
    #[default]
    JetBrainsMono,
    FiraCode,
    DejaVuSansMono,
    LiberationMono,
}

impl FontFamily {
    /// Display names for config round-tripping — order matches variant order.
    pub(crate) const DISPLAY_NAMES: &'static [&'static str] = &[
        "JetBrains Mono",
        "Fira Code",
        "DejaVu Sans Mono",
        "Liberation Mono",
    ];

    /// All variants in declaration order.
    pub(crate) const ALL: &'static [FontFamily] = &[
        FontFamily::JetBrainsMono,
        FontFamily::FiraCode,
        FontFamily::DejaVuSansMono,
        FontFamily::LiberationMono,
    ];

    /// Returns the index of this variant (matches `DISPLAY_NAMES` and `ALL`).
    pub(crate) fn index(self) -> usize {
        Self::ALL.iter().position(|&v| v == self).unwrap_or(0)
    }

    /// Returns the variant at the given index, or the default if out of range.
    pub(crate) fn from_index(i: usize) -> Self {
        Self::ALL.get(i).copied().unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub(crate) enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trip() {
        let config = AppConfig::default();
        let serialized = ron::to_string(&config).expect("serialize");
        let deserialized: AppConfig = ron::from_str(&serialized).expect("deserialize");
        assert_eq!(deserialized.font.size, 14.0);
        assert_eq!(deserialized.theme, ThemeChoice::Dark);
        assert_eq!(deserialized.terminal.max_scrollback, 1000);
        assert_eq!(deserialized.shell.path, None);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let partial = "(theme: Light)";
        let config: AppConfig = ron::from_str(partial).expect("deserialize partial");
        assert_eq!(config.theme, ThemeChoice::Light);
        assert_eq!(config.font.size, 14.0);
        assert_eq!(config.terminal.max_scrollback, 1000);
    }

    #[test]
    fn default_values_are_correct() {
        let config = AppConfig::default();
        assert_eq!(config.font.size, 14.0);
        assert_eq!(config.font.family, FontFamily::JetBrainsMono);
        assert_eq!(config.font.line_padding, 0);
        assert_eq!(config.terminal.max_scrollback, 1000);
        assert_eq!(config.terminal.cursor_blink_interval_ms, 500);
    }

    #[test]
    fn font_family_index_round_trips() {
        for &family in FontFamily::ALL {
            assert_eq!(FontFamily::from_index(family.index()), family);
        }
    }

    #[test]
    fn shell_config_explicit_path_round_trips() {
        let config = ShellConfig {
            path: Some("/bin/zsh".to_string()),
        };
        let serialized = ron::to_string(&config).expect("serialize");
        let deserialized: ShellConfig = ron::from_str(&serialized).expect("deserialize");
        assert_eq!(deserialized.path.as_deref(), Some("/bin/zsh"));
    }
}
