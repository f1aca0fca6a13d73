use std::{
    collections::BTreeMap,
    fs,
    path::Path,
};

use serde::Deserialize;

/// A schema: named types, one record type built from them,
/// and the format its lines are written in.
///
/// ```toml
/// [config]
/// policy = "pass"
///
/// [types.five]
/// base = "int"
/// size_eq = 5
///
/// [types.line]
/// base = "str"
/// ends_on = "\n"
///
/// [record]
/// name = "entry"
/// format = "$a$ $b$,$c$\n"
///
/// [[fields]]
/// name = "a"
/// type = "int"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub config: Settings,
    #[serde(default)]
    pub types: BTreeMap<String, TypeDecl>,
    pub record: Record,
    pub fields: Vec<Field>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub policy: Option<String>,
    pub marker: Option<char>,
}

/// A named type: either a refinement of `base` or a union of other types.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub base: Option<String>,
    pub union: Option<Vec<String>>,

    // refinements, applied to `base`
    pub size_eq: Option<usize>,
    pub ends_on: Option<char>,
    pub equals: Option<String>,
    pub contains: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub name: String,
    pub format: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Manifest, String> {
        let source = fs::read_to_string(path)
            .map_err(|e| format!("The schema '{}' could not be read: {}", path.display(), e))?;
        Manifest::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Manifest, String> {
        toml::from_str(source).map_err(|e| format!("Could not parse the schema: {}", e))
    }
}
