use std::collections::HashSet;

use crate::{
    common::error::Error,
    types::{
        descriptor::Kind,
        universe::{
            TypeId,
            Universe,
        },
    },
};

/// A piece of a compiled format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Text that must appear verbatim.
    Literal(String),
    /// A typed field of the target product.
    Slot { name: String, ty: TypeId },
}

enum State {
    Literal,
    Slot,
}

/// Scans a format string into fragments, resolving each slot's type
/// against the fields of `product`.
/// Every field of the product needs a slot.
/// Slots are field names between two markers, e.g. `$name$` with the default marker.
pub fn compile(universe: &Universe, product: TypeId, format: &str) -> Result<Vec<Fragment>, Error> {
    let fields = universe.fields(product).ok_or_else(|| Error::InvalidArgument {
        expected: "a product type to parse into".to_string(),
        got: format!("<{}>", universe.get(product)),
    })?;

    let marker = universe.config().marker;
    let mut fragments = vec![];
    let mut state = State::Literal;
    let mut text = String::new();

    for c in format.chars() {
        if c != marker {
            text.push(c);
            continue;
        }

        match state {
            State::Literal => {
                if !text.is_empty() {
                    fragments.push(Fragment::Literal(std::mem::take(&mut text)));
                }
                state = State::Slot;
            },
            State::Slot => {
                let name = std::mem::take(&mut text);
                let ty = match fields.iter().find(|(field, _)| *field == name) {
                    Some((_, ty)) => *ty,
                    None => return Err(Error::UnknownFieldName(name)),
                };
                if !textual(universe, ty) {
                    return Err(Error::InvalidArgument {
                        expected: format!("a text type for field '{}'", name),
                        got: format!("<{}>", universe.get(ty)),
                    });
                }
                fragments.push(Fragment::Slot { name, ty });
                state = State::Literal;
            },
        }
    }

    match state {
        State::Slot => return Err(Error::UnterminatedField(text)),
        State::Literal if !text.is_empty() => fragments.push(Fragment::Literal(text)),
        State::Literal => (),
    }

    if fragments.is_empty() {
        return Err(Error::InvalidArgument {
            expected: "a non-empty format".to_string(),
            got: format!("{:?}", format),
        });
    }

    let used: HashSet<&str> = fragments
        .iter()
        .filter_map(|fragment| match fragment {
            Fragment::Slot { name, .. } => Some(name.as_str()),
            Fragment::Literal(_) => None,
        })
        .collect();
    if let Some((field, _)) = fields.iter().find(|(field, _)| !used.contains(field.as_str())) {
        return Err(Error::MissingField(field.clone()));
    }

    log::debug!("compiled format {:?} into {} fragments", format, fragments.len());
    Ok(fragments)
}

/// Whether raw text can ever build a token of this type.
fn textual(universe: &Universe, ty: TypeId) -> bool {
    match universe.get(ty).kind() {
        Kind::Primitive(_) => true,
        Kind::Sum { left, right } => textual(universe, *left) && textual(universe, *right),
        Kind::Product { .. } | Kind::Function { .. } | Kind::Failure => false,
    }
}
