//! Binary entry point. The collection lives only for the session, so
//! bootstrapping is just: start with an empty library, hand it to the app
//! state, and drive the Ratatui event loop until the user exits.
use book_list_manager::{run_app, App, Library};

/// Launch the Ratatui event loop over a fresh, empty library.
///
/// Returning a `Result` bubbles up fatal problems (terminal setup failures,
/// or an out-of-range index reaching the dialog layer, which means the UI is
/// out of sync with the collection) to the terminal instead of crashing
/// silently.
fn main() -> anyhow::Result<()> {
    let mut app = App::new(Library::new());
    run_app(&mut app)
}
