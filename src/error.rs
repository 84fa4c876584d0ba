use thiserror::Error;

/// Failures from acquiring and programming the KMS display surface.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("no KMS-capable device found among /dev/dri/card0..63")]
    NoDevice,
    #[error("no connected connector with at least one mode")]
    NoConnector,
    #[error("no usable CRTC for the selected connector")]
    NoCrtc,
    #[error("failed to program CRTC: {0}")]
    ModeSetFailed(String),
    #[error("failed to allocate display buffers: {0}")]
    AllocFailed(String),
}

/// Failures from a single pane's PTY/child-process lifecycle.
#[derive(Debug, Error)]
pub enum PaneError {
    #[error("failed to spawn pane: {0}")]
    SpawnFailed(String),
    #[error("pty master closed (EOF)")]
    PtyEof,
    #[error("pty master I/O error: {0}")]
    PtyIoError(#[from] std::io::Error),
    #[error("write to pty master stalled after bounded retries")]
    WriteStalled,
}

/// Operational refusals from the tab/session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("pane is already at minimum width; split would be too narrow")]
    TooNarrow,
    #[error("session store is at capacity ({0} tabs)")]
    Full(usize),
}

/// Failures and refusals from the control-plane IPC listener.
#[derive(Debug, Error)]
pub enum IpcError {
    #[error("unrecognized command token: {0:?}")]
    BadToken(String),
    #[error("client did not send a command within the read deadline")]
    Timeout,
    #[error("socket I/O error: {0}")]
    Io(#[from] std::io::Error),
}
