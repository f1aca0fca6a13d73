use std::path::PathBuf;

use ktypes::{Constraint, Fragment, Kind, TypeId, Universe};

use crate::{
    manifest::Manifest,
    schema::Schema,
    status::Status,
};

/// Describes a type by its display name and, for refinements, its constraints.
fn describe(universe: &Universe, id: TypeId) -> String {
    let descriptor = universe.get(id);
    let constraints = descriptor
        .constraints()
        .iter()
        .map(|constraint| match constraint {
            Constraint::Predicate(predicate) => predicate.key().to_string(),
            Constraint::SizeEq(size) => format!("size={}", size),
            Constraint::EndsOn(end) => format!("ends_on={:?}", end),
        })
        .collect::<Vec<_>>();

    match descriptor.kind() {
        Kind::Product { fields } => {
            let fields = fields
                .iter()
                .map(|(name, ty)| format!("{}: {}", name, universe.get(*ty)))
                .collect::<Vec<_>>();
            format!("{{{}}}", fields.join(", "))
        },
        _ if constraints.is_empty() => descriptor.to_string(),
        _ => format!("{} where {}", descriptor, constraints.join(", ")),
    }
}

pub fn check(path: PathBuf) -> Result<(), String> {
    Status::Info.log(&format!("Checking '{}'", path.display()));
    let manifest = Manifest::load(&path)?;
    let schema = Schema::build(&manifest, None)?;
    let universe = &schema.universe;

    for name in manifest.types.keys() {
        if let Some(id) = universe.lookup(name) {
            println!("{:>12} = {}", name, describe(universe, id));
        }
    }
    println!("{:>12} = {}", manifest.record.name, describe(universe, schema.record));

    for fragment in schema.parser.fragments() {
        match fragment {
            Fragment::Literal(text) => println!("{:>12} {:?}", "literal", text),
            Fragment::Slot { name, ty } => println!("{:>12} {} : {}", "slot", name, universe.get(*ty)),
        }
    }

    Status::Success.log(&format!("'{}' is a valid schema", path.display()));
    Ok(())
}
