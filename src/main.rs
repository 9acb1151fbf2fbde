use crate::cli::run;

pub mod acquire;
pub mod catalog;
pub mod cli;
mod config;
pub mod domain;
pub mod pipeline;
pub mod tagging;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
