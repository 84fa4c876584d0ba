//! Ordered collection of up to `T_MAX` tabs with an active-tab index
//! (spec §4.5). Only the active tab is ever rendered.

use std::os::fd::RawFd;

use crate::config::ThemePalette;
use crate::error::{PaneError, SessionError};
use crate::metrics::GlyphMetrics;
use crate::tab::{Tab, P_MAX};

/// Fixed tab capacity (spec §3).
pub const T_MAX: usize = 8;

pub struct SessionStore {
    tabs: Vec<Option<Tab>>,
    pub num_tabs: usize,
    pub active_tab: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        let mut tabs = Vec::with_capacity(T_MAX);
        tabs.resize_with(T_MAX, || None);
        Self {
            tabs,
            num_tabs: 0,
            active_tab: 0,
        }
    }

    pub fn tab(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index).and_then(|t| t.as_ref())
    }

    pub fn tab_mut(&mut self, index: usize) -> Option<&mut Tab> {
        self.tabs.get_mut(index).and_then(|t| t.as_mut())
    }

    pub fn active_tab_ref(&self) -> Option<&Tab> {
        if self.num_tabs == 0 {
            None
        } else {
            self.tab(self.active_tab)
        }
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        if self.num_tabs == 0 {
            None
        } else {
            self.tab_mut(self.active_tab)
        }
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.tabs[..self.num_tabs].iter().filter_map(|t| t.as_ref())
    }

    /// Appends a new, single-pane tab and makes it active. No-op (logged)
    /// once the store is at `T_MAX` capacity.
    #[allow(clippy::too_many_arguments)]
    pub fn new_tab(
        &mut self,
        total_cols: usize,
        rows: usize,
        metrics: &GlyphMetrics,
        shell: &str,
        palette: &ThemePalette,
        max_scrollback: usize,
    ) -> Result<(), PanelOutcome> {
        if self.num_tabs >= T_MAX {
            log::warn!("session store at capacity ({T_MAX} tabs); refusing new-tab");
            return Err(PanelOutcome::Refused(SessionError::Full(T_MAX)));
        }
        let tab = Tab::init(total_cols, rows, metrics, shell, palette, max_scrollback)
            .map_err(PanelOutcome::SpawnFailed)?;
        let slot = self.num_tabs;
        self.tabs[slot] = Some(tab);
        self.num_tabs += 1;
        self.active_tab = slot;
        Ok(())
    }

    /// Rotates the active tab forward, wrapping modulo `num_tabs`.
    pub fn next(&mut self) {
        if self.num_tabs > 0 {
            self.active_tab = (self.active_tab + 1) % self.num_tabs;
        }
    }

    /// Rotates the active tab backward, wrapping modulo `num_tabs`.
    pub fn prev(&mut self) {
        if self.num_tabs > 0 {
            self.active_tab = (self.active_tab + self.num_tabs - 1) % self.num_tabs;
        }
    }

    pub fn split_active(
        &mut self,
        metrics: &GlyphMetrics,
        shell: &str,
        palette: &ThemePalette,
        max_scrollback: usize,
    ) -> Result<(), SessionError> {
        match self.active_tab_mut() {
            Some(tab) => tab.split_vertical(metrics, shell, palette, max_scrollback),
            None => Err(SessionError::TooNarrow),
        }
    }

    pub fn focus_left_active(&mut self) {
        if let Some(tab) = self.active_tab_mut() {
            tab.focus_left();
        }
    }

    pub fn focus_right_active(&mut self) {
        if let Some(tab) = self.active_tab_mut() {
            tab.focus_right();
        }
    }

    /// Drains every tab's panes, compacting/removing dead ones, then
    /// re-derives which tabs remain active and picks a new active tab
    /// deterministically (lowest surviving index) if the current one
    /// died. Returns `true` if the active tab produced output worth a
    /// render.
    pub fn drain_all(&mut self) -> bool {
        let mut active_progressed = false;
        for i in 0..self.num_tabs {
            let Some(tab) = self.tabs[i].as_mut() else {
                continue;
            };
            let progressed = tab.drain_all();
            if i == self.active_tab && progressed {
                active_progressed = true;
            }
            if !tab.is_active() {
                self.tabs[i] = None;
            }
        }
        self.reindex();
        active_progressed
    }

    /// Removes dead tab slots by shifting survivors down to keep the
    /// `[0, num_tabs)` prefix dense, then clamps `active_tab` into range,
    /// preferring the lowest still-active tab if the previous active tab
    /// was among those removed.
    fn reindex(&mut self) {
        let previously_active_alive = self
            .tabs
            .get(self.active_tab)
            .and_then(|t| t.as_ref())
            .is_some();

        let mut write = 0;
        let mut new_active = None;
        for read in 0..self.num_tabs {
            if self.tabs[read].is_some() {
                if read == self.active_tab && previously_active_alive {
                    new_active = Some(write);
                }
                self.tabs.swap(write, read);
                write += 1;
            }
        }
        for slot in self.tabs.iter_mut().skip(write) {
            *slot = None;
        }
        self.num_tabs = write;
        self.active_tab = match new_active {
            Some(idx) => idx,
            None if write > 0 => 0,
            None => 0,
        };
    }

    /// `true` once every tab has died and the process should begin
    /// shutdown.
    pub fn should_shutdown(&self) -> bool {
        self.num_tabs == 0
    }

    /// Fixed `T_MAX * P_MAX` view of every pane master fd, slot
    /// `tab_idx * P_MAX + pane_idx`, sentinel `-1` where no live pane
    /// occupies that slot (spec §4.9 "fixed pollset").
    pub fn raw_pane_fds(&self) -> [RawFd; T_MAX * P_MAX] {
        let mut fds = [-1; T_MAX * P_MAX];
        for t in 0..self.num_tabs {
            let Some(tab) = self.tab(t) else { continue };
            for p in 0..tab.num_panes {
                if let Some(pane) = tab.pane(p) {
                    fds[t * P_MAX + p] = pane.as_raw_fd();
                }
            }
        }
        fds
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Distinguishes an operational refusal (logged, no state change) from a
/// pane-spawn failure that should propagate as fatal only when the store
/// ends up with zero tabs (checked by the caller via `should_shutdown`).
pub enum PanelOutcome {
    Refused(SessionError),
    SpawnFailed(PaneError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeChoice;

    fn test_metrics() -> Option<GlyphMetrics> {
        let bytes = crate::config::load_font_bytes(crate::config::FontFamily::DejaVuSansMono)
            .or_else(|_| crate::config::load_font_bytes(crate::config::FontFamily::JetBrainsMono))
            .ok()?;
        let font = fontdue::Font::from_bytes(bytes.as_slice(), fontdue::FontSettings::default())
            .ok()?;
        Some(GlyphMetrics::compute(&font, 16.0))
    }

    #[test]
    fn new_tab_becomes_active_and_bounds_hold() {
        let Some(metrics) = test_metrics() else {
            return;
        };
        let palette = ThemeChoice::Dark.resolve();
        let mut store = SessionStore::new();
        if store
            .new_tab(80, 24, &metrics, "/bin/sh", &palette, 1000)
            .is_err()
        {
            return;
        }
        assert_eq!(store.num_tabs, 1);
        assert_eq!(store.active_tab, 0);
    }

    #[test]
    fn round_trip_new_new_prev_next_restores_active_tab() {
        let Some(metrics) = test_metrics() else {
            return;
        };
        let palette = ThemeChoice::Dark.resolve();
        let mut store = SessionStore::new();
        if store
            .new_tab(80, 24, &metrics, "/bin/sh", &palette, 1000)
            .is_err()
        {
            return;
        }
        let after_first = store.active_tab;
        if store
            .new_tab(80, 24, &metrics, "/bin/sh", &palette, 1000)
            .is_err()
        {
            return;
        }
        store.prev();
        store.next();
        // After new-tab, new-tab, prev, next: active_tab must equal what it
        // was right after the first new-tab (spec §8 property 5).
        assert_eq!(store.active_tab, after_first);
    }

    #[test]
    fn full_store_refuses_a_ninth_tab() {
        let Some(metrics) = test_metrics() else {
            return;
        };
        let palette = ThemeChoice::Dark.resolve();
        let mut store = SessionStore::new();
        for _ in 0..T_MAX {
            if store
                .new_tab(80, 24, &metrics, "/bin/sh", &palette, 1000)
                .is_err()
            {
                return;
            }
        }
        let result = store.new_tab(80, 24, &metrics, "/bin/sh", &palette, 1000);
        assert!(matches!(result, Err(PanelOutcome::Refused(SessionError::Full(T_MAX)))));
    }
}
