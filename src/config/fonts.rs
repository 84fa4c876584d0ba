use std::fs;

/// Absolute paths checked in order for a usable monospace font.
///
/// Mirrors the search list a bare console compositor uses: no fontconfig,
/// no XDG font cache, just `access(F_OK)` down a fixed list until one
/// exists.
pub(crate) const FONT_FALLBACKS: &[&str] = &[
    "/usr/share/fonts/TTF/JetBrainsMonoNerdFont-Regular.ttf",
    "/usr/share/fonts/truetype/jetbrains-mono/JetBrainsMono-Regular.ttf",
    "/usr/share/fonts/TTF/FiraCodeNerdFont-Regular.ttf",
    "/usr/share/fonts/truetype/firacode/FiraCode-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
];

/// Loads the first font on the fallback list that exists on disk.
///
/// The configured `FontFamily` only narrows where in the list we start
/// looking — it is a preference, not a guarantee, since none of these
/// paths are guaranteed to be installed.
pub(crate) fn load_font_bytes(preferred: super::FontFamily) -> Result<Vec<u8>, std::io::Error> {
    let start = preferred_start_index(preferred);
    let ordered = FONT_FALLBACKS[start..].iter().chain(FONT_FALLBACKS[..start].iter());
    let mut last_err = None;
    for path in ordered {
        match fs::read(path) {
            Ok(bytes) => return Ok(bytes),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no fallback font found")
    }))
}

fn preferred_start_index(family: super::FontFamily) -> usize {
    use super::FontFamily;
    match family {
        FontFamily::JetBrainsMono => 0,
        FontFamily::FiraCode => 2,
        FontFamily::DejaVuSansMono => 4,
        FontFamily::LiberationMono => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_list_is_nonempty_and_absolute() {
        assert!(!FONT_FALLBACKS.is_empty());
        for path in FONT_FALLBACKS {
            assert!(path.starts_with('/'), "{path} should be an absolute path");
        }
    }

    #[test]
    fn preferred_start_index_covers_all_families() {
        use super::super::FontFamily;
        for &family in FontFamily::ALL {
            assert!(preferred_start_index(family) < FONT_FALLBACKS.len());
        }
    }
}
