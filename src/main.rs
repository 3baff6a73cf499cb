//! gltime main entrypoint.

use gltime::run;
use gltime::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
