use structopt::StructOpt;

// argument parser and configuation
pub mod cli;
pub mod manifest;
pub mod schema;
pub mod status;

// command implementations
pub mod check;
pub mod parse;

use crate::{
    cli::KTypes,
    status::Status,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let subcommand = KTypes::from_args();

    let result = match subcommand {
        KTypes::Check(schema) => check::check(schema.path),
        KTypes::Parse(args) => parse::parse(args),
    };

    if let Err(r) = result {
        Status::Fatal.log(&r);
        std::process::exit(1);
    }
}
