//! Single-threaded, `poll`-driven main loop (spec §4.9, §5).
//!
//! The only suspension point is the `poll` call below; every read/write
//! elsewhere in the crate is non-blocking. Struct field order matters:
//! `Drop` runs fields in declaration order, and the display surface must
//! be released last (spec §9 "chain them in construction order"), so it
//! is declared last here.

use std::os::fd::RawFd;

use crate::config::ThemePalette;
use crate::display::DisplaySurface;
use crate::input::{self, RawModeGuard};
use crate::ipc::{Command, IpcServer};
use crate::metrics::GlyphMetrics;
use crate::raster::Rasterizer;
use crate::session::{SessionStore, T_MAX};
use crate::tab::P_MAX;
use crate::vt::VtArbiter;

const STDIN_SLOT: usize = T_MAX * P_MAX;
const IPC_SLOT: usize = T_MAX * P_MAX + 1;
const POLLSET_LEN: usize = T_MAX * P_MAX + 2;

pub struct EventCore {
    pub store: SessionStore,
    shell: String,
    palette: ThemePalette,
    max_scrollback: usize,
    cols: usize,
    rows: usize,
    ipc: IpcServer,
    rasterizer: Rasterizer,
    metrics: GlyphMetrics,
    input_guard: RawModeGuard,
    vt: VtArbiter,
    surface: DisplaySurface,
}

impl EventCore {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: SessionStore,
        shell: String,
        palette: ThemePalette,
        max_scrollback: usize,
        cols: usize,
        rows: usize,
        ipc: IpcServer,
        rasterizer: Rasterizer,
        metrics: GlyphMetrics,
        input_guard: RawModeGuard,
        vt: VtArbiter,
        surface: DisplaySurface,
    ) -> Self {
        Self {
            store,
            shell,
            palette,
            max_scrollback,
            cols,
            rows,
            ipc,
            rasterizer,
            metrics,
            input_guard,
            vt,
            surface,
        }
    }

    /// Runs until a shutdown condition is observed (spec §4.9 step list).
    /// Resources unwind via `Drop` in field-declaration order once this
    /// returns, display surface last.
    pub fn run(&mut self) {
        // Force an initial frame before blocking on the first poll.
        self.rasterizer
            .render(&mut self.surface, &self.metrics, &self.palette, &self.store);

        loop {
            if self.vt.shutdown_requested() {
                log::info!("shutdown requested; unwinding");
                break;
            }

            let mut fds = self.build_pollset();
            let ret = unsafe {
                libc::poll(
                    fds.as_mut_ptr(),
                    fds.len() as libc::nfds_t,
                    -1,
                )
            };

            if ret < 0 {
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() == Some(libc::EINTR) {
                    continue;
                }
                log::error!("poll failed: {err}; shutting down");
                break;
            }

            if self.vt.shutdown_requested() {
                break;
            }
            if !self.vt.is_active() {
                // Suspended: PTYs are not drained and no frame is presented
                // until an acquire signal flips this back (spec §8 property 7).
                continue;
            }

            let mut needs_render = self.store.drain_all();

            if fds[STDIN_SLOT].revents & libc::POLLIN != 0 {
                let mut buf = [0u8; 4096];
                if let Ok(n) = input::read_stdin(&mut buf) {
                    if n > 0 {
                        if let Some(tab) = self.store.active_tab_mut() {
                            if let Some(pane) = tab.active_pane_mut() {
                                pane.write(&buf[..n]);
                            }
                        }
                    }
                }
            }

            if fds[IPC_SLOT].revents & libc::POLLIN != 0 {
                match self.ipc.accept_one() {
                    Ok(Some(command)) => {
                        if self.apply(command) {
                            needs_render = true;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => log::warn!("ipc client rejected: {e}"),
                }
            }

            if self.store.should_shutdown() {
                log::info!("no active tabs remain; shutting down");
                break;
            }

            if needs_render {
                self.rasterizer.render(
                    &mut self.surface,
                    &self.metrics,
                    &self.palette,
                    &self.store,
                );
            }
        }
    }

    fn build_pollset(&self) -> [libc::pollfd; POLLSET_LEN] {
        let pane_fds = self.store.raw_pane_fds();
        let mut fds = [libc::pollfd {
            fd: -1,
            events: libc::POLLIN,
            revents: 0,
        }; POLLSET_LEN];
        for (slot, fd) in pane_fds.iter().enumerate() {
            fds[slot].fd = *fd;
        }
        fds[STDIN_SLOT].fd = 0 as RawFd;
        fds[IPC_SLOT].fd = self.ipc.as_raw_fd();
        fds
    }

    /// Applies one IPC command to the session store. Returns `true` if it
    /// mutated anything worth a render.
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::NewTab => {
                match self.store.new_tab(
                    self.cols,
                    self.rows,
                    &self.metrics,
                    &self.shell,
                    &self.palette,
                    self.max_scrollback,
                ) {
                    Ok(()) => true,
                    Err(_) => false,
                }
            }
            Command::Next => {
                self.store.next();
                true
            }
            Command::Prev => {
                self.store.prev();
                true
            }
            Command::SplitVertical => self
                .store
                .split_active(&self.metrics, &self.shell, &self.palette, self.max_scrollback)
                .is_ok(),
            Command::FocusLeft => {
                self.store.focus_left_active();
                true
            }
            Command::FocusRight => {
                self.store.focus_right_active();
                true
            }
        }
    }
}
