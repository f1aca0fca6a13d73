use std::{
    fs::File,
    io::{
        BufRead,
        BufReader,
    },
};

use ktypes::{Token, Universe};

use crate::{
    cli::Parse,
    manifest::Manifest,
    schema::Schema,
    status::Status,
};

/// Running totals of what has been printed so far.
#[derive(Default)]
struct Tally {
    printed: usize,
    failed: usize,
}

impl Tally {
    /// Prints the records not yet printed, up to `limit`.
    /// Returns whether more may be printed.
    fn report(&mut self, universe: &Universe, records: &[Token], limit: usize) -> bool {
        for record in records.iter().skip(self.printed + self.failed) {
            if self.printed + self.failed >= limit {
                return false;
            }
            match record.failure() {
                Some(error) => {
                    Status::Warn.log(&error.to_string());
                    self.failed += 1;
                },
                None => {
                    println!("{}", record.shown(universe));
                    self.printed += 1;
                },
            }
        }
        self.printed + self.failed < limit
    }
}

/// Streams the input through the schema's parser one line at a time.
pub fn parse(args: Parse) -> Result<(), String> {
    let manifest = Manifest::load(&args.schema.path)?;
    let mut schema = Schema::build(&manifest, args.policy)?;
    let limit = args.limit.unwrap_or(usize::MAX);

    let file = File::open(&args.input)
        .map_err(|e| format!("The input '{}' could not be opened: {}", args.input.display(), e))?;
    let mut reader = BufReader::new(file);
    log::debug!("parsing {} as <{}>", args.input.display(), manifest.record.name);

    let mut tally = Tally::default();
    let mut line = String::new();
    let mut number = 0;
    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|e| format!("The input could not be read: {}", e))?;
        if read == 0 {
            break;
        }
        number += 1;

        let records = schema
            .parser
            .parse_stream(&schema.universe, &line, false)
            .map_err(|e| format!("line {}: {}", number, e))?;
        if !tally.report(&schema.universe, records, limit) {
            break;
        }
    }

    if tally.printed + tally.failed < limit {
        let records = schema
            .parser
            .finish(&schema.universe)
            .map_err(|e| format!("end of input: {}", e))?;
        tally.report(&schema.universe, records, limit);
    }

    let summary = format!("{} records parsed, {} failed", tally.printed, tally.failed);
    if tally.failed > 0 {
        Status::Warn.log(&summary);
    } else {
        Status::Success.log(&summary);
    }
    Ok(())
}
