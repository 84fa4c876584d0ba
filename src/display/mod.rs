//! DRM/KMS display surface: device probe, dumb-buffer allocation, mode-set,
//! and the shadow-buffer present path.
//!
//! Grounded in the pack's `drm`-crate KMS backend reference: dumb buffers
//! are created, wrapped in a framebuffer, and mapped transiently on each
//! present rather than held mapped for the surface's whole lifetime — the
//! same pattern that reference uses for its front/back buffer pair.

use std::fs::{File, OpenOptions};
use std::os::fd::{AsFd, BorrowedFd};

use drm::buffer::{Buffer, DrmFourcc};
use drm::control::dumbbuffer::DumbBuffer;
use drm::control::{connector, crtc, framebuffer, Device as ControlDevice, Mode};
use drm::Device;

use crate::error::DisplayError;

struct Card(File);

impl AsFd for Card {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.0.as_fd()
    }
}

impl Device for Card {}
impl ControlDevice for Card {}

/// The live DRM display: one CRTC, one connector, one programmed mode, one
/// dumb framebuffer, plus a host-memory shadow of identical layout.
///
/// `Drop` restores the CRTC to its pre-takeover state and tears buffers
/// down in reverse acquisition order, best-effort, so a panic unwinding
/// through this struct still leaves the console usable.
pub(crate) struct DisplaySurface {
    card: Card,
    connector: connector::Handle,
    crtc: crtc::Handle,
    mode: Mode,
    original_crtc: crtc::Info,
    fb: framebuffer::Handle,
    db: DumbBuffer,
    shadow: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    released: bool,
}

impl DisplaySurface {
    /// Scans `/dev/dri/card0..63` for a device with at least one connector
    /// and one CRTC, picks the first connected connector with a mode, and
    /// acquires a CRTC for it — programming nothing yet.
    pub fn acquire() -> Result<Self, DisplayError> {
        let (card, connector, crtc, mode) = probe()?;
        let original_crtc = card
            .get_crtc(crtc)
            .map_err(|e| DisplayError::ModeSetFailed(e.to_string()))?;

        let (width, height) = mode.size();
        let (width, height) = (width as u32, height as u32);

        let db = card
            .create_dumb_buffer((width, height), DrmFourcc::Xrgb8888, 32)
            .map_err(|e| DisplayError::AllocFailed(e.to_string()))?;
        let fb = card
            .add_framebuffer(&db, 24, 32)
            .map_err(|e| DisplayError::AllocFailed(e.to_string()))?;

        let stride = db.pitch();
        let shadow = vec![0u8; (stride as u64 * height as u64) as usize];

        card.set_crtc(crtc, Some(fb), (0, 0), &[connector], Some(mode))
            .map_err(|e| DisplayError::ModeSetFailed(e.to_string()))?;

        Ok(Self {
            card,
            connector,
            crtc,
            mode,
            original_crtc,
            fb,
            db,
            shadow,
            width,
            height,
            stride,
            released: false,
        })
    }

    /// Mutable access to the shadow buffer for the rasterizer.
    pub fn shadow_mut(&mut self) -> &mut [u8] {
        &mut self.shadow
    }

    pub fn shadow(&self) -> &[u8] {
        &self.shadow
    }

    /// Copies the shadow buffer wholesale into the mapped framebuffer.
    /// Synchronous; tearing is tolerated.
    pub fn present(&mut self) -> Result<(), DisplayError> {
        let mut mapping = self
            .card
            .map_dumb_buffer(&mut self.db)
            .map_err(|e| DisplayError::AllocFailed(e.to_string()))?;
        // SAFETY: the mapping is exclusively ours for the duration of this
        // call and covers `mapping.len()` mapped bytes.
        let dst = unsafe { std::slice::from_raw_parts_mut(mapping.as_mut_ptr(), mapping.len()) };
        let len = dst.len().min(self.shadow.len());
        dst[..len].copy_from_slice(&self.shadow[..len]);
        Ok(())
    }

    /// Restores the original CRTC state and tears down buffers. Safe to
    /// call more than once; every step is best-effort and logged, never
    /// propagated, since we're already on a shutdown path.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = self.card.set_crtc(
            self.crtc,
            self.original_crtc.framebuffer(),
            self.original_crtc.position(),
            &[self.connector],
            self.original_crtc.mode(),
        ) {
            log::warn!("failed to restore original CRTC state: {e}");
        }
        if let Err(e) = self.card.destroy_framebuffer(self.fb) {
            log::warn!("failed to destroy framebuffer: {e}");
        }
        if let Err(e) = self.card.destroy_dumb_buffer(self.db) {
            log::warn!("failed to destroy dumb buffer: {e}");
        }
    }
}

impl Drop for DisplaySurface {
    fn drop(&mut self) {
        self.release();
    }
}

fn probe() -> Result<(Card, connector::Handle, crtc::Handle, Mode), DisplayError> {
    for index in 0..64 {
        let path = format!("/dev/dri/card{index}");
        let Ok(file) = OpenOptions::new().read(true).write(true).open(&path) else {
            continue;
        };
        let card = Card(file);
        let Ok(handles) = card.resource_handles() else {
            continue;
        };
        if handles.connectors().is_empty() || handles.crtcs().is_empty() {
            continue;
        }

        // First device reporting both: commit to it, per the reference
        // program's probe loop. A dead end here is fatal, not a reason to
        // keep scanning further device nodes.
        log::info!("probing {path} as the KMS device");

        let mut selected = None;
        for &conn_handle in handles.connectors() {
            let Ok(info) = card.get_connector(conn_handle, false) else {
                continue;
            };
            if info.state() != connector::State::Connected {
                continue;
            }
            if let Some(&mode) = info.modes().first() {
                selected = Some((conn_handle, info, mode));
                break;
            }
        }

        let (conn_handle, info, mode) = selected.ok_or(DisplayError::NoConnector)?;

        let crtc = info
            .current_encoder()
            .and_then(|enc_handle| card.get_encoder(enc_handle).ok())
            .and_then(|enc| enc.crtc())
            .or_else(|| handles.crtcs().first().copied())
            .ok_or(DisplayError::NoCrtc)?;

        log::info!(
            "using {path}, connector {conn_handle:?}, mode {}x{}",
            mode.size().0,
            mode.size().1
        );
        return Ok((card, conn_handle, crtc, mode));
    }
    Err(DisplayError::NoDevice)
}
