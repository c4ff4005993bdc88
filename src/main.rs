//! opsched main entrypoint.

use opsched::run;
use opsched::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
