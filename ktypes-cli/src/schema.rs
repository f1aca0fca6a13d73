use std::collections::BTreeMap;

use ktypes::{Config, Error, Parser, Policy, Predicate, Refinement, TypeId, Universe};

use crate::manifest::{Manifest, TypeDecl};

/// A manifest compiled into a session: its universe,
/// the record type, and a parser for the record's format.
#[derive(Debug)]
pub struct Schema {
    pub universe: Universe,
    pub record: TypeId,
    pub parser: Parser,
}

fn show(error: Error) -> String {
    error.to_string()
}

impl Schema {
    /// Builds the schema's types in a fresh universe.
    /// A `policy` given here overrides the manifest's.
    pub fn build(manifest: &Manifest, policy: Option<Policy>) -> Result<Schema, String> {
        let mut config = Config::default();
        if let Some(policy) = &manifest.config.policy {
            config = config.policy(policy.parse().map_err(show)?);
        }
        if let Some(marker) = manifest.config.marker {
            config = config.marker(marker);
        }
        if let Some(policy) = policy {
            config = config.policy(policy);
        }

        let mut universe = Universe::with_config(config);
        for name in manifest.types.keys() {
            if universe.lookup(name).is_some() {
                return Err(format!("The type '{}' is built in and can't be redefined", name));
            }
        }

        let mut resolving = vec![];
        for name in manifest.types.keys() {
            resolve(&mut universe, &manifest.types, name, &mut resolving)?;
        }

        let mut fields = vec![];
        for field in manifest.fields.iter() {
            let ty = resolve(&mut universe, &manifest.types, &field.ty, &mut resolving)?;
            fields.push((field.name.as_str(), ty));
        }

        let record = universe
            .named_product(&manifest.record.name, fields)
            .map_err(show)?;
        let parser = universe.parser(record, &manifest.record.format).map_err(show)?;

        Ok(Schema { universe, record, parser })
    }
}

/// Finds or builds the type called `name`, building what it depends on first.
fn resolve(
    universe: &mut Universe,
    types: &BTreeMap<String, TypeDecl>,
    name: &str,
    resolving: &mut Vec<String>,
) -> Result<TypeId, String> {
    if let Some(id) = universe.lookup(name) {
        return Ok(id);
    }

    let decl = types.get(name).ok_or_else(|| format!("Unknown type '{}'", name))?;
    if resolving.iter().any(|other| other == name) {
        return Err(format!("The type '{}' is defined in terms of itself", name));
    }
    resolving.push(name.to_string());

    let id = match (&decl.base, &decl.union) {
        (Some(base), None) => {
            let base = resolve(universe, types, base, resolving)?;
            refine(universe, base, decl).map_err(show)?
        },
        (None, Some(members)) if members.len() >= 2 && !refines(decl) => {
            let mut id = resolve(universe, types, &members[0], resolving)?;
            for member in members[1..].iter() {
                let member = resolve(universe, types, member, resolving)?;
                id = universe.union(id, member);
            }
            id
        },
        _ => {
            return Err(format!(
                "The type '{}' needs either a `base` to refine or a `union` of two or more types",
                name
            ))
        },
    };

    resolving.pop();
    universe.declare(name, id).map_err(show)?;
    Ok(id)
}

fn refines(decl: &TypeDecl) -> bool {
    decl.size_eq.is_some() || decl.ends_on.is_some() || decl.equals.is_some() || decl.contains.is_some()
}

fn refine(universe: &mut Universe, base: TypeId, decl: &TypeDecl) -> Result<TypeId, Error> {
    let mut refinement = Refinement::new();
    if let Some(size) = decl.size_eq {
        refinement = refinement.size_eq(size);
    }
    if let Some(end) = decl.ends_on {
        refinement = refinement.ends_on(end);
    }
    if let Some(text) = &decl.equals {
        refinement = refinement.predicate(Predicate::equals(text));
    }

    let refined = universe.refine(base, refinement)?;
    match &decl.contains {
        Some(text) => universe.refine(refined, Refinement::new().predicate(Predicate::contains(text))),
        None => Ok(refined),
    }
}
