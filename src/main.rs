use std::process::ExitCode;

fn main() -> ExitCode {
    mealbench::entry::run()
}
