//! An ordered group of 1-2 panes sharing a row count and horizontal span
//! (spec §4.4). `Tab` owns its panes and lays them out left-to-right with
//! no gaps.

use crate::config::ThemePalette;
use crate::error::{PaneError, SessionError};
use crate::metrics::GlyphMetrics;
use crate::pane::{DrainOutcome, Pane};

/// Fixed pane capacity per tab (spec §3).
pub const P_MAX: usize = 2;

pub struct Tab {
    panes: [Option<Pane>; P_MAX],
    pub num_panes: usize,
    pub active_pane: usize,
    pub rows: usize,
    pub total_cols: usize,
}

impl Tab {
    /// Creates a tab with a single pane spanning `[0, total_cols)`.
    pub fn init(
        total_cols: usize,
        rows: usize,
        metrics: &GlyphMetrics,
        shell: &str,
        palette: &ThemePalette,
        max_scrollback: usize,
    ) -> Result<Self, PaneError> {
        let pane0 = Pane::spawn(
            rows,
            total_cols,
            0,
            metrics,
            shell,
            palette.ansi,
            max_scrollback,
        )?;
        Ok(Self {
            panes: [Some(pane0), None],
            num_panes: 1,
            active_pane: 0,
            rows,
            total_cols,
        })
    }

    pub fn pane(&self, index: usize) -> Option<&Pane> {
        self.panes.get(index).and_then(|p| p.as_ref())
    }

    pub fn pane_mut(&mut self, index: usize) -> Option<&mut Pane> {
        self.panes.get_mut(index).and_then(|p| p.as_mut())
    }

    pub fn active_pane_mut(&mut self) -> Option<&mut Pane> {
        let idx = self.active_pane;
        self.pane_mut(idx)
    }

    pub fn panes(&self) -> impl Iterator<Item = &Pane> {
        self.panes.iter().filter_map(|p| p.as_ref())
    }

    pub fn panes_mut(&mut self) -> impl Iterator<Item = &mut Pane> {
        self.panes.iter_mut().filter_map(|p| p.as_mut())
    }

    /// Splits pane 0 into two side-by-side panes. Fails with `TooNarrow`
    /// if either half would be under 2 columns; on the new pane's spawn
    /// failure, pane 0's width (and PTY size) is rolled back exactly.
    pub fn split_vertical(
        &mut self,
        metrics: &GlyphMetrics,
        shell: &str,
        palette: &ThemePalette,
        max_scrollback: usize,
    ) -> Result<(), SessionError> {
        if self.num_panes != 1 {
            return Err(SessionError::Full(self.num_panes));
        }
        let old_cols = self.panes[0]
            .as_ref()
            .map(|p| p.cols)
            .unwrap_or(self.total_cols);
        let left = old_cols / 2;
        let right = old_cols - left;
        if left < 2 || right < 2 {
            return Err(SessionError::TooNarrow);
        }

        let pane0 = self.panes[0].as_mut().expect("num_panes == 1 implies pane 0");
        if pane0.resize(self.rows, left, 0, metrics).is_err() {
            // Resize itself failing means the PTY ioctl failed; nothing to
            // roll back since cols/start_col_px are only mutated on success.
            return Err(SessionError::TooNarrow);
        }

        let right_start_px = left as u32 * metrics.cell_w;
        match Pane::spawn(
            self.rows,
            right,
            right_start_px,
            metrics,
            shell,
            palette.ansi,
            max_scrollback,
        ) {
            Ok(pane1) => {
                self.panes[1] = Some(pane1);
                self.num_panes = 2;
                self.active_pane = 1;
                Ok(())
            }
            Err(_) => {
                // Roll back pane 0 to its pre-split dimensions.
                let pane0 = self.panes[0].as_mut().expect("pane 0 is still present");
                let _ = pane0.resize(self.rows, old_cols, 0, metrics);
                Err(SessionError::TooNarrow)
            }
        }
    }

    /// Sets the active pane within this tab. Index out of range is a no-op.
    pub fn focus(&mut self, index: usize) {
        if index < self.num_panes {
            self.active_pane = index;
        }
    }

    pub fn focus_left(&mut self) {
        if self.num_panes == 2 {
            self.focus(0);
        }
    }

    pub fn focus_right(&mut self) {
        if self.num_panes == 2 {
            self.focus(1);
        }
    }

    /// Drains every live pane's master fd; reaps and removes dead ones.
    /// Returns `true` if anything was read (render-worthy) for the active
    /// pane specifically, separate from the "some pane changed" signal
    /// the caller also gets via the return tuple.
    pub fn drain_all(&mut self) -> bool {
        let mut active_progressed = false;
        for i in 0..P_MAX {
            let Some(pane) = self.panes[i].as_mut() else {
                continue;
            };
            match pane.drain() {
                DrainOutcome::Dead => {
                    pane.terminate();
                    self.panes[i] = None;
                    self.compact_after_removal(i);
                    continue;
                }
                DrainOutcome::Progressed => {
                    if i == self.active_pane {
                        active_progressed = true;
                    }
                }
                DrainOutcome::WouldBlock => {}
            }
            if let Some(pane) = self.panes[i].as_mut() {
                pane.flush_responses();
            }
        }
        active_progressed
    }

    /// After pane `removed` dies, keeps `num_panes`/`active_pane` dense
    /// and valid: the surviving pane (if any) becomes pane 0 spanning the
    /// full tab width, and becomes active.
    fn compact_after_removal(&mut self, removed: usize) {
        let survivor = (0..P_MAX).find(|&i| i != removed && self.panes[i].is_some());
        match survivor {
            Some(idx) => {
                if idx != 0 {
                    self.panes.swap(0, idx);
                }
                self.num_panes = 1;
                self.active_pane = 0;
                if let Some(pane) = self.panes[0].as_mut() {
                    pane.start_col_px = 0;
                    // Width is left as-is: the spec defines no auto-regrow
                    // of a surviving pane after a split partner's exit, and
                    // a mid-width pane is fine to render and drive.
                }
            }
            None => {
                self.num_panes = 0;
            }
        }
    }

    /// True if at least one pane is still alive.
    pub fn is_active(&self) -> bool {
        self.num_panes > 0 && self.panes.iter().any(|p| p.is_some())
    }
}
