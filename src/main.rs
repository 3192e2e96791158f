use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = memo::run() {
        eprintln!("error: {err:#}");
        if memo::needs_login(&err) {
            eprintln!("hint: run `memo login`");
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
