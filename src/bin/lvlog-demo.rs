#![deny(unsafe_code)]

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::{env, io, process::ExitCode};

fn main() -> ExitCode {
    // Unlocked handles: the listener thread writes records to stdout too.
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    cli::demo::run_with(env::args_os(), &mut stdout, &mut stderr)
}
