use std::process::ExitCode;

fn main() -> ExitCode {
    match launchpad::initialize_command_line() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:?}");
            ExitCode::FAILURE
        }
    }
}
