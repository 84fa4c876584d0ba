//! One pseudo-terminal master + child process + terminal-state emulator,
//! occupying a pixel span inside its tab's row (spec §4.3).

use std::os::fd::RawFd;

use crate::core::{Color, Terminal};
use crate::error::PaneError;
use crate::metrics::GlyphMetrics;
use crate::pty::{self, PtyMaster};

/// Outcome of one event-core drain pass over a pane's master fd.
pub enum DrainOutcome {
    /// No more bytes ready right now (`EAGAIN`/`EWOULDBLOCK`); nothing
    /// notable happened.
    WouldBlock,
    /// Bytes were read and fed to the emulator.
    Progressed,
    /// EOF or `EIO`: the pane's shell is gone. Caller should tear the pane
    /// down.
    Dead,
}

pub struct Pane {
    master: PtyMaster,
    child_pid: libc::pid_t,
    emulator: Terminal,
    pub cols: usize,
    pub start_col_px: u32,
    /// Set once a write exhausts its retry budget (spec `WriteStalled`):
    /// the pane is kept alive but flagged, per §7 ("pane is marked
    /// failing, not torn down").
    pub failing: bool,
}

impl Pane {
    /// Spawns a new pane: an emulator sized `(rows, cols)` seeded with
    /// `palette`, and a PTY/child pair sized to `cols*cell_w` by
    /// `rows*cell_h` pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        rows: usize,
        cols: usize,
        start_col_px: u32,
        metrics: &GlyphMetrics,
        shell: &str,
        palette: [Color; 16],
        max_scrollback: usize,
    ) -> Result<Self, PaneError> {
        if cols < 2 {
            return Err(PaneError::SpawnFailed(format!(
                "pane width {cols} below minimum of 2 columns"
            )));
        }

        let pixel_width = (cols as u32 * metrics.cell_w).min(u16::MAX as u32) as u16;
        let pixel_height = (rows as u32 * metrics.cell_h).min(u16::MAX as u32) as u16;

        let (master, child_pid) = PtyMaster::spawn(
            shell,
            rows as u16,
            cols as u16,
            pixel_width,
            pixel_height,
        )?;

        let mut emulator = Terminal::new_with_palette(rows, cols, palette);
        emulator.set_max_scrollback(max_scrollback);

        Ok(Self {
            master,
            child_pid,
            emulator,
            cols,
            start_col_px,
            failing: false,
        })
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }

    pub fn emulator(&self) -> &Terminal {
        &self.emulator
    }

    /// Drains the master fd into a 4KiB buffer until `EAGAIN`/EOF/EIO,
    /// feeding every chunk read into the emulator (spec §4.9 step 5).
    pub fn drain(&mut self) -> DrainOutcome {
        let mut buf = [0u8; 4096];
        let mut progressed = false;
        loop {
            match self.master.read(&mut buf) {
                Ok(0) => return DrainOutcome::Dead,
                Ok(n) => {
                    self.emulator.process(&buf[..n]);
                    progressed = true;
                }
                Err(e) => {
                    return match e.raw_os_error() {
                        Some(libc::EAGAIN) | Some(libc::EWOULDBLOCK) => {
                            if progressed {
                                DrainOutcome::Progressed
                            } else {
                                DrainOutcome::WouldBlock
                            }
                        }
                        Some(libc::EIO) => DrainOutcome::Dead,
                        _ => DrainOutcome::Dead,
                    };
                }
            }
        }
    }

    /// Flushes any pending device-control responses (e.g. cursor position
    /// reports) queued by the emulator back to the shell.
    pub fn flush_responses(&mut self) {
        let pending = self.emulator.drain_responses();
        if !pending.is_empty() {
            self.write(&pending);
        }
    }

    /// Forwards user or response bytes to the PTY master. A stalled write
    /// marks the pane failing and is logged, never torn down outright
    /// (spec §7, `WriteStalled`).
    pub fn write(&mut self, bytes: &[u8]) {
        if let Err(e) = self.master.write_all_retry(bytes) {
            log::warn!("pane write stalled: {e}");
            self.failing = true;
        }
    }

    /// Resizes the emulator and the underlying PTY; a changed emulator
    /// size causes the kernel to deliver `SIGWINCH` to the child via the
    /// `TIOCSWINSZ` ioctl as a side effect.
    pub fn resize(
        &mut self,
        new_rows: usize,
        new_cols: usize,
        new_start_col_px: u32,
        metrics: &GlyphMetrics,
    ) -> Result<(), PaneError> {
        self.emulator.resize(new_rows, new_cols);
        self.cols = new_cols;
        self.start_col_px = new_start_col_px;

        let pixel_width = (new_cols as u32 * metrics.cell_w).min(u16::MAX as u32) as u16;
        let pixel_height = (new_rows as u32 * metrics.cell_h).min(u16::MAX as u32) as u16;
        self.master
            .resize(new_rows as u16, new_cols as u16, pixel_width, pixel_height)
            .map_err(|e| PaneError::SpawnFailed(format!("resize ioctl: {e}")))
    }

    /// Closes the master and non-blockingly reaps the child. Called once,
    /// when [`DrainOutcome::Dead`] is observed.
    pub fn terminate(&self) {
        self.master.close_master();
        // The child may take a moment after its slave fd closes; a single
        // WNOHANG attempt here is best-effort. Any stragglers are reaped
        // on a later loop iteration or at process exit.
        let _ = pty::reap(self.child_pid);
    }

    pub fn child_pid(&self) -> libc::pid_t {
        self.child_pid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_font_bytes;

    fn test_metrics() -> Option<GlyphMetrics> {
        let bytes = load_font_bytes(crate::config::FontFamily::DejaVuSansMono)
            .or_else(|_| load_font_bytes(crate::config::FontFamily::JetBrainsMono))
            .ok()?;
        let font = fontdue::Font::from_bytes(bytes.as_slice(), fontdue::FontSettings::default())
            .ok()?;
        Some(GlyphMetrics::compute(&font, 16.0))
    }

    #[test]
    fn spawn_rejects_too_narrow_panes() {
        let Some(metrics) = test_metrics() else {
            return;
        };
        let err = Pane::spawn(24, 1, 0, &metrics, "/bin/sh", Color::ANSI, 1000);
        assert!(err.is_err());
    }

    #[test]
    fn spawn_and_drain_a_live_shell() {
        let Some(metrics) = test_metrics() else {
            return;
        };
        let mut pane = match Pane::spawn(24, 80, 0, &metrics, "/bin/sh", Color::ANSI, 1000) {
            Ok(p) => p,
            Err(_) => return, // no PTY subsystem in this sandbox
        };
        pane.write(b"echo hi\nexit\n");
        let mut saw_progress = false;
        for _ in 0..500 {
            match pane.drain() {
                DrainOutcome::Dead => {
                    saw_progress = true;
                    break;
                }
                DrainOutcome::Progressed => saw_progress = true,
                DrainOutcome::WouldBlock => {
                    std::thread::sleep(std::time::Duration::from_millis(10));
                }
            }
        }
        assert!(saw_progress);
        pane.terminate();
    }
}
