use lc3_vm::emulator::{Emulator, RunExit};
use lc3_vm::hardware::console::TerminalConsole;
use lc3_vm::terminal;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let image_paths: Vec<String> = env::args().skip(1).collect();
    if image_paths.is_empty() {
        eprintln!("usage: lc3-vm image-file1 [image-file2] ...");
        return ExitCode::from(2);
    }

    let mut emu = Emulator::new(TerminalConsole::new());
    for path in &image_paths {
        if let Err(e) = emu.load_image_file(path) {
            eprintln!("{path}: {e}");
            return ExitCode::from(1);
        }
    }

    let result = {
        let _raw = terminal::set_terminal_raw();
        emu.run()
        // raw mode is restored here, before anything else is printed
    };
    match result {
        Ok(RunExit::Halted) => ExitCode::SUCCESS,
        Ok(RunExit::Interrupted) => ExitCode::from(130),
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
