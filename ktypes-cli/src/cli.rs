use std::path::PathBuf;

use ktypes::Policy;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
pub struct Schema {
    /// Path to the schema manifest
    #[structopt(parse(from_os_str))]
    pub path: PathBuf,
}

#[derive(StructOpt, Debug)]
pub struct Parse {
    #[structopt(flatten)]
    pub schema: Schema,
    /// Path to the data file, read line by line
    #[structopt(parse(from_os_str))]
    pub input: PathBuf,
    /// Overrides the schema's error policy: `raise` or `pass`
    #[structopt(long)]
    pub policy: Option<Policy>,
    /// Stops after printing this many records
    #[structopt(long)]
    pub limit: Option<usize>,
}

#[derive(StructOpt, Debug)]
#[structopt(name = "KTypes", bin_name = "ktypes", about)]
pub enum KTypes {
    /// Compiles a schema and prints its types and format
    Check(Schema),
    /// Parses a data file against a schema
    Parse(Parse),
}
