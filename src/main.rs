mod cmd;
mod core;
mod lookup;
mod util;

use std::process::ExitCode;

use tracing::{Level, event};

use crate::cmd::cli::Cli;
use crate::cmd::runtime::{block_on_detached, build_runtime};
use crate::core::konst::APP_NAME;

fn main() -> ExitCode {
    let cli = Cli::init();

    let result = build_runtime().and_then(|runtime| block_on_detached(runtime, cli.run()));

    match result {
        Ok(_) => ExitCode::from(0),
        Err(e) => {
            match e.source() {
                Some(s) => {
                    eprintln!("{e}: {s}");
                    event!(target: APP_NAME, Level::ERROR, "{e}: {s}")
                }
                None => {
                    eprintln!("{e}");
                    event!(target: APP_NAME, Level::ERROR, "{e}")
                }
            }
            ExitCode::from(1)
        }
    }
}
