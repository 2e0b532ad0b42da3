use std::process::ExitCode;

use gitkit::ui::output;

fn main() -> ExitCode {
    match gitkit::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        // The reader has everything it asked for, e.g. `gitkit log | head`
        Err(err) if output::is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
