use std::env;
use std::process::ExitCode;

use cli_harness_cli::checker::{program_name, Checker};
use cli_harness_core::{Application, Mode};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args_os();
    let name = program_name(args.next());
    let application = Application::new(name.clone(), Checker::default(), Mode::Production);

    match application.run(args) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("{name}: {e}");
            ExitCode::FAILURE
        }
    }
}
