use std::process::ExitCode;

fn main() -> ExitCode {
    orientnet_cli::run()
}
