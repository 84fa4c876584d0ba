mod config;
mod core;
mod display;
mod error;
mod event_core;
mod input;
mod ipc;
mod logging;
mod metrics;
mod pane;
mod pty;
mod raster;
mod session;
mod tab;
mod vt;

use std::path::Path;

use config::{load_config, load_font_bytes, FONT_FALLBACKS};
use display::DisplaySurface;
use event_core::EventCore;
use input::RawModeGuard;
use ipc::{Command, IpcServer};
use metrics::GlyphMetrics;
use raster::Rasterizer;
use session::SessionStore;
use vt::VtArbiter;

const PRODUCT: &str = "cinderbox";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        std::process::exit(0);
    }

    let socket_path = ipc::socket_path(PRODUCT);

    if let Some(token) = args.first() {
        match Command::parse(token) {
            Some(command) => match ipc::send_command(&socket_path, command) {
                Ok(()) => std::process::exit(0),
                Err(_) => std::process::exit(1),
            },
            None => {
                eprintln!("unrecognized command: {token}");
                std::process::exit(1);
            }
        }
    }

    if ipc::probe_existing_server(&socket_path) {
        eprintln!(
            "{PRODUCT} is already running; use --new-tab, --next, --prev, --split-v, --left, or --right to control it"
        );
        std::process::exit(1);
    }

    logging::init(PRODUCT);
    std::process::exit(run_server(&socket_path));
}

fn print_help() {
    println!("{PRODUCT}: a bare-metal terminal multiplexer");
    println!();
    println!("USAGE:");
    println!("    {PRODUCT}                run as the server (or report 'already running')");
    println!("    {PRODUCT} --new-tab       open a new tab");
    println!("    {PRODUCT} --next          focus the next tab");
    println!("    {PRODUCT} --prev          focus the previous tab");
    println!("    {PRODUCT} --split-v       split the active tab vertically");
    println!("    {PRODUCT} --left          focus the left pane");
    println!("    {PRODUCT} --right         focus the right pane");
    println!("    {PRODUCT} --help          print this message and exit");
}

/// Boots every subsystem in acquisition order and runs the event loop.
/// Cleanup happens via `Drop` as `EventCore` goes out of scope at the end
/// of this function, display surface last (spec §4.9, §9).
fn run_server(socket_path: &Path) -> i32 {
    let app_config = load_config();
    let palette = app_config.theme.resolve();
    let shell = pty::resolve_shell(app_config.shell.path.as_deref());

    let font_bytes = match load_font_bytes(app_config.font.family) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!(
                "no usable monospace font found on disk ({e}); cannot start without glyph rendering. searched: {}",
                FONT_FALLBACKS.join(", ")
            );
            return 1;
        }
    };
    let font =
        match fontdue::Font::from_bytes(font_bytes.as_slice(), fontdue::FontSettings::default()) {
            Ok(font) => font,
            Err(e) => {
                log::error!("failed to parse font data: {e}");
                return 1;
            }
        };
    let metrics = GlyphMetrics::compute(&font, app_config.font.size);

    let mut surface = match DisplaySurface::acquire() {
        Ok(surface) => surface,
        Err(e) => {
            log::error!("failed to acquire display surface: {e}");
            return 1;
        }
    };

    let cols = (surface.width / metrics.cell_w).max(1) as usize;
    let rows = ((surface.height / metrics.cell_h).max(2) - 1) as usize;

    let mut store = SessionStore::new();
    if let Err(e) = store.new_tab(
        cols,
        rows,
        &metrics,
        &shell,
        &palette,
        app_config.terminal.max_scrollback,
    ) {
        match e {
            session::PanelOutcome::SpawnFailed(err) => log::error!("initial pane spawn failed: {err}"),
            session::PanelOutcome::Refused(err) => log::error!("initial pane refused: {err}"),
        }
        surface.release();
        return 1;
    }

    let vt = match VtArbiter::acquire() {
        Ok(vt) => vt,
        Err(e) => {
            log::error!("failed to acquire VT: {e}");
            return 1;
        }
    };

    let input_guard = match RawModeGuard::install() {
        Ok(guard) => guard,
        Err(e) => {
            log::error!("failed to install raw mode on stdin: {e}");
            return 1;
        }
    };

    let ipc_server = match IpcServer::bind(socket_path.to_path_buf()) {
        Ok(server) => server,
        Err(e) => {
            log::error!("failed to bind control socket: {e}");
            return 1;
        }
    };

    let rasterizer = Rasterizer::new(font);

    let mut event_core = EventCore::new(
        store,
        shell,
        palette,
        app_config.terminal.max_scrollback,
        cols,
        rows,
        ipc_server,
        rasterizer,
        metrics,
        input_guard,
        vt,
        surface,
    );

    event_core.run();
    0
}
