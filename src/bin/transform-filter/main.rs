mod app;
mod bootstrap;
mod clap_app;

use app::App;
use std::process;
use transform_filter::error::*;

/// Returns `Err(..)` upon fatal errors, non-fatal diagnostics only go to the log.
fn run() -> Result<()> {
    let app = App::new()?;
    app.start()
}

fn main() {
    let result = run();

    match result {
        Err(error) => {
            let stderr = std::io::stderr();
            default_error_handler(&error, &mut stderr.lock());
            process::exit(1);
        }
        Ok(()) => {
            process::exit(0);
        }
    }
}
