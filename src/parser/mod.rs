//! Schema-driven parsing of raw text into records.
//!
//! A format string is compiled once against a product type into [`Fragment`]s.
//! Text is then matched one character at a time, with a single character of lookahead,
//! and every completed record is built through the product's constructor.
//!
//! A [`Parser`] can parse a single record from complete input,
//! or keep its state across calls and accumulate records from a stream of chunks.
//! When a chunk ends inside a typed slot, the last character is held back
//! until the next chunk tells whether the slot continues;
//! [`Parser::finish`] ends the stream and flushes it.

pub mod format;
pub mod matcher;

use crate::{
    common::{
        error::Error,
        token::{
            Raw,
            Token,
        },
    },
    types::universe::{
        TypeId,
        Universe,
    },
};

pub use format::Fragment;
use matcher::{Matcher, Step};

#[derive(Debug, Clone)]
pub struct Parser {
    product: TypeId,
    fragments: Vec<Fragment>,
    stream: Matcher,
    carry: Option<char>,
    /// Characters consumed since the last reset.
    consumed: usize,
    records: Vec<Token>,
}

impl Parser {
    /// Compiles `format` against the fields of `product`.
    /// Compilation errors are always returned as `Err`.
    pub fn compile(universe: &Universe, product: TypeId, format: &str) -> Result<Parser, Error> {
        let fragments = format::compile(universe, product, format)?;
        log::debug!("compiled parser for <{}> with {} fragments", universe.get(product), fragments.len());
        Ok(Parser {
            product,
            fragments,
            stream: Matcher::new(),
            carry: None,
            consumed: 0,
            records: vec![],
        })
    }

    pub fn product(&self) -> TypeId {
        self.product
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// The records completed so far by `parse_stream`.
    pub fn records(&self) -> &[Token] {
        &self.records
    }

    /// Parses one record from the start of `input`.
    /// Anything after the record is ignored.
    /// This doesn't touch the streaming state.
    pub fn parse_one(&self, universe: &Universe, input: &str) -> Result<Token, Error> {
        let mut matcher = Matcher::new();
        let chars: Vec<char> = input.chars().collect();

        for (offset, c) in chars.iter().enumerate() {
            let lookahead = chars.get(offset + 1).copied();
            match matcher.step(universe, &self.fragments, *c, lookahead, offset) {
                Ok(Step::Pending) => (),
                Ok(Step::Complete(fields)) => return universe.construct(self.product, Raw::Fields(fields)),
                Err(error) => return universe.take(error),
            }
        }

        universe.take(Error::UnexpectedEnd(matcher.expecting(&self.fragments)))
    }

    /// Feeds a chunk of a stream, returning every record completed so far.
    /// State is kept between calls unless `reset` is set.
    ///
    /// If matching fails, the partial record is dropped.
    /// Under `Policy::Raise` the error is returned;
    /// under `Policy::Pass` a failure token is recorded
    /// and the rest of the chunk is skipped.
    pub fn parse_stream(&mut self, universe: &Universe, input: &str, reset: bool) -> Result<&[Token], Error> {
        if reset {
            self.reset();
        }

        let chars: Vec<char> = self.carry.take().into_iter().chain(input.chars()).collect();
        for (index, c) in chars.iter().enumerate() {
            let lookahead = chars.get(index + 1).copied();
            if lookahead.is_none() && self.stream.in_slot(&self.fragments) {
                self.carry = Some(*c);
                break;
            }
            if !self.feed(universe, *c, lookahead)? {
                break;
            }
        }

        Ok(&self.records)
    }

    /// Ends the stream: a held back character is matched with no lookahead,
    /// and a record left unfinished is reported as `UnexpectedEnd`.
    pub fn finish(&mut self, universe: &Universe) -> Result<&[Token], Error> {
        if let Some(c) = self.carry.take() {
            self.feed(universe, c, None)?;
        }

        if self.stream.in_progress() {
            let error = Error::UnexpectedEnd(self.stream.expecting(&self.fragments));
            self.stream = Matcher::new();
            let failure = universe.take(error)?;
            self.records.push(failure);
        }

        Ok(&self.records)
    }

    /// Discards the in-flight record and every accumulated one.
    pub fn reset(&mut self) {
        self.stream = Matcher::new();
        self.carry = None;
        self.consumed = 0;
        self.records.clear();
    }

    /// Matches one character of the stream.
    /// Returns whether to keep going.
    fn feed(&mut self, universe: &Universe, c: char, lookahead: Option<char>) -> Result<bool, Error> {
        let offset = self.consumed;
        self.consumed += 1;

        match self.stream.step(universe, &self.fragments, c, lookahead, offset) {
            Ok(Step::Pending) => Ok(true),
            Ok(Step::Complete(fields)) => {
                let record = universe.construct(self.product, Raw::Fields(fields))?;
                log::trace!("completed record {}", record.shown(universe));
                self.records.push(record);
                Ok(true)
            },
            Err(error) => {
                log::debug!("stream failed at offset {}: {}", offset, error);
                self.stream = Matcher::new();
                let failure = universe.take(error)?;
                self.records.push(failure);
                Ok(false)
            },
        }
    }
}

impl Universe {
    /// Compiles a parser for `product`; see [`Parser::compile`].
    pub fn parser(&self, product: TypeId, format: &str) -> Result<Parser, Error> {
        Parser::compile(self, product, format)
    }
}
