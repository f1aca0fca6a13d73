use std::collections::BTreeMap;

use crate::{
    common::{
        error::Error,
        token::Raw,
    },
    parser::format::Fragment,
    types::universe::Universe,
};

/// What feeding one character to a `Matcher` produced.
#[derive(Debug, PartialEq)]
pub enum Step {
    Pending,
    /// Every fragment matched; holds the committed field tokens.
    Complete(BTreeMap<String, Raw>),
}

/// Matches characters against a list of fragments, one at a time.
/// Inside a literal, each character must be the next expected one.
/// Inside a slot, characters collect into a candidate that is committed
/// as soon as it matches the slot's type and either no character follows
/// or the following one would make it stop matching.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    /// The fragment being matched.
    index: usize,
    /// Byte offset into the current literal.
    position: usize,
    candidate: String,
    fields: BTreeMap<String, Raw>,
}

impl Matcher {
    pub fn new() -> Matcher {
        Matcher::default()
    }

    pub fn in_slot(&self, fragments: &[Fragment]) -> bool {
        matches!(fragments.get(self.index), Some(Fragment::Slot { .. }))
    }

    /// Whether part of a record has been matched.
    pub fn in_progress(&self) -> bool {
        self.index > 0 || self.position > 0 || !self.candidate.is_empty()
    }

    /// Describes what the matcher is waiting for.
    pub fn expecting(&self, fragments: &[Fragment]) -> String {
        match fragments.get(self.index) {
            Some(Fragment::Literal(text)) => format!("literal {:?}", &text[self.position..]),
            Some(Fragment::Slot { name, .. }) => format!("field '{}'", name),
            None => "nothing".to_string(),
        }
    }

    /// Feeds one character.
    /// `lookahead` is the character after, or `None` at the end of the input.
    /// On error the matcher is left mid-record and should be discarded.
    pub fn step(
        &mut self,
        universe: &Universe,
        fragments: &[Fragment],
        c: char,
        lookahead: Option<char>,
        offset: usize,
    ) -> Result<Step, Error> {
        let done = match fragments.get(self.index) {
            Some(Fragment::Literal(text)) => {
                let expected = text[self.position..].chars().next();
                match expected {
                    Some(expected) if expected == c => {
                        self.position += c.len_utf8();
                        self.position == text.len()
                    },
                    Some(expected) => return Err(Error::LiteralMismatch { expected, got: c, offset }),
                    None => true,
                }
            },
            Some(Fragment::Slot { name, ty }) => {
                self.candidate.push(c);
                if !universe.matches(*ty, &self.candidate) {
                    return Ok(Step::Pending);
                }

                let stops = match lookahead {
                    None => true,
                    Some(next) => {
                        let mut longer = self.candidate.clone();
                        longer.push(next);
                        !universe.matches(*ty, &longer)
                    },
                };
                if stops {
                    let token = universe.construct(*ty, self.candidate.as_str())?;
                    log::trace!("committed field '{}' from {:?}", name, self.candidate);
                    self.fields.insert(name.clone(), Raw::Token(token));
                }
                stops
            },
            None => true,
        };

        if !done {
            return Ok(Step::Pending);
        }

        self.index += 1;
        self.position = 0;
        self.candidate.clear();

        if self.index < fragments.len() {
            return Ok(Step::Pending);
        }

        let fields = std::mem::take(&mut self.fields);
        *self = Matcher::default();
        Ok(Step::Complete(fields))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Refinement, TypeId};

    fn setup() -> (Universe, TypeId, Vec<Fragment>) {
        let mut universe = Universe::new();
        let int = universe.int();
        let word = universe.refine(universe.str(), Refinement::new().ends_on(' ')).unwrap();
        let fragments = vec![
            Fragment::Slot { name: "n".to_string(), ty: int },
            Fragment::Literal(" ".to_string()),
            Fragment::Slot { name: "w".to_string(), ty: word },
        ];
        (universe, word, fragments)
    }

    fn feed(universe: &Universe, fragments: &[Fragment], input: &str) -> Result<Step, Error> {
        let mut matcher = Matcher::new();
        let chars: Vec<char> = input.chars().collect();
        let mut last = Step::Pending;
        for (offset, c) in chars.iter().enumerate() {
            last = matcher.step(universe, fragments, *c, chars.get(offset + 1).copied(), offset)?;
        }
        Ok(last)
    }

    #[test]
    fn commits_on_lookahead() {
        let (universe, _, fragments) = setup();
        match feed(&universe, &fragments, "42 hello").unwrap() {
            Step::Complete(fields) => {
                assert!(matches!(fields.get("n"), Some(Raw::Token(t)) if t.as_int() == Some(42)));
                assert!(matches!(fields.get("w"), Some(Raw::Token(t)) if t.as_str() == Some("hello")));
            },
            Step::Pending => panic!("record should be complete"),
        }
    }

    #[test]
    fn literal_mismatch() {
        let (universe, _, fragments) = setup();
        assert_eq!(
            feed(&universe, &fragments, "42,hello"),
            Err(Error::LiteralMismatch {
                expected: ' ',
                got: ',',
                offset: 2,
            })
        );
    }

    #[test]
    fn waits_for_more_input() {
        let (universe, _, fragments) = setup();
        let mut matcher = Matcher::new();
        assert_eq!(matcher.step(&universe, &fragments, '4', Some('2'), 0), Ok(Step::Pending));
        assert!(matcher.in_progress());
        assert!(matcher.in_slot(&fragments));
        assert_eq!(matcher.expecting(&fragments), "field 'n'");
    }
}
