#![allow(non_snake_case)]
use RustedDomain::Examples::domain_examples::domain_examples;
use RustedDomain::Utils::task_runner::run_task;

fn main() {
    // with a path argument run the task document, otherwise run an example
    match std::env::args().nth(1) {
        Some(path) => {
            if let Err(e) = run_task(&path) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        None => {
            let example = 0;
            domain_examples(example);
        }
    }
}
