use std::collections::{
    BTreeMap,
    HashSet,
};

use crate::{
    common::{
        data::Data,
        error::Error,
        token::{
            Raw,
            Token,
        },
    },
    types::{
        descriptor::{
            Descriptor,
            Kind,
        },
        universe::{
            Key,
            TypeId,
            Universe,
        },
    },
};

/// Field names must be unique within a product.
fn owned_fields(fields: Vec<(&str, TypeId)>) -> Result<Vec<(String, TypeId)>, Error> {
    let mut seen = HashSet::new();
    for (field, _) in fields.iter() {
        if !seen.insert(*field) {
            return Err(Error::InvalidArgument {
                expected: "unique field names".to_string(),
                got: format!("`{}` twice", field),
            });
        }
    }

    Ok(fields
        .into_iter()
        .map(|(field, ty)| (field.to_string(), ty))
        .collect())
}

impl Universe {
    /// An anonymous record type, named after its field types: `int & int & str`.
    pub fn product(&mut self, fields: Vec<(&str, TypeId)>) -> Result<TypeId, Error> {
        let name = fields
            .iter()
            .map(|(_, ty)| self.name(*ty))
            .collect::<Vec<_>>()
            .join(" & ");
        let fields = owned_fields(fields)?;
        Ok(self.intern_product(name, fields))
    }

    /// A record type declared under `name`.
    /// Declaring the same name with the same fields again returns the same type;
    /// reusing the name for different fields is an error and registers nothing.
    pub fn named_product(&mut self, name: &str, fields: Vec<(&str, TypeId)>) -> Result<TypeId, Error> {
        let fields = owned_fields(fields)?;
        if let Some(existing) = self.lookup(name) {
            let key = Key::Product(name.to_string(), fields);
            return match self.find(&key) {
                Some(id) if id == existing => Ok(id),
                _ => Err(Error::AlreadyDefined(name.to_string())),
            };
        }

        let id = self.intern_product(name.to_string(), fields);
        self.declare(name, id)?;
        Ok(id)
    }

    fn intern_product(&mut self, name: String, fields: Vec<(String, TypeId)>) -> TypeId {
        let key = Key::Product(name.clone(), fields.clone());
        if let Some(existing) = self.find(&key) {
            return existing;
        }

        log::debug!("interning product type {}", name);
        self.register(Descriptor::new(name, Kind::Product { fields }), key)
    }

    /// The declared fields of a product type, in order.
    pub fn fields(&self, id: TypeId) -> Option<&[(String, TypeId)]> {
        match self.get(id).kind() {
            Kind::Product { fields } => Some(fields),
            _ => None,
        }
    }

    /// Builds a record from a map of already-typed tokens.
    /// Every declared field must be present and be of its field's type;
    /// undeclared entries are ignored. Records are all-or-nothing:
    /// the first missing or mistyped field is reported and nothing is built.
    pub(crate) fn construct_record(&self, id: TypeId, mut raw: BTreeMap<String, Raw>) -> Result<Token, Error> {
        let declared = match self.fields(id) {
            Some(fields) => fields,
            None => {
                return self.take(Error::InvalidArgument {
                    expected: "a product type".to_string(),
                    got: format!("<{}>", self.get(id)),
                })
            },
        };

        let mut record = Vec::with_capacity(declared.len());
        for (name, ty) in declared.iter() {
            let expected = || format!("{} for field '{}'", self.get(*ty), name);
            let token = match raw.remove(name) {
                Some(Raw::Token(token)) => token,
                Some(Raw::Text(text)) => return self.take(Error::ExpectedToken(format!("text {:?}", text))),
                Some(Raw::Fields(_)) => return self.take(Error::ExpectedToken("a field map".to_string())),
                None => {
                    return self.take(Error::TypeMismatch {
                        expected: expected(),
                        got: "nothing".to_string(),
                    })
                },
            };

            match self.narrow(&token, *ty) {
                Some(narrowed) => record.push((name.clone(), narrowed)),
                None => {
                    return self.take(Error::TypeMismatch {
                        expected: expected(),
                        got: self.name(token.ty()),
                    })
                },
            }
        }

        Ok(Token::new(Data::Record(record), id))
    }

    /// Builds a record from `(field, token)` pairs.
    pub fn record<K: Into<String>>(
        &self,
        id: TypeId,
        fields: impl IntoIterator<Item = (K, Token)>,
    ) -> Result<Token, Error> {
        self.construct(id, fields.into_iter().collect::<Raw>())
    }

    /// Reads a field of a record token.
    pub fn field(&self, token: &Token, attr: &str) -> Result<Token, Error> {
        match token.field(attr) {
            Some(field) => Ok(field.clone()),
            None => self.take(Error::UndefinedAttribute {
                attr: attr.to_string(),
                ty: self.name(token.ty()),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Policy, Refinement};

    fn abc(universe: &mut Universe) -> TypeId {
        let (int, str) = (universe.int(), universe.str());
        universe.product(vec![("a", int), ("b", int), ("c", str)]).unwrap()
    }

    #[test]
    fn record_round_trip() {
        let mut universe = Universe::new();
        let product = abc(&mut universe);
        assert_eq!(universe.name(product), "int & int & str");

        let a = universe.construct(universe.int(), "10").unwrap();
        let b = universe.construct(universe.int(), "200").unwrap();
        let c = universe.construct(universe.str(), " is the sum").unwrap();
        let record = universe
            .record(product, vec![("a", a.clone()), ("b", b.clone()), ("c", c.clone())])
            .unwrap();

        assert_eq!(record.ty(), product);
        assert_eq!(record.field("a"), Some(&a));
        assert_eq!(record.field("b"), Some(&b));
        assert_eq!(universe.field(&record, "c").unwrap(), c);
        assert_eq!(
            record.shown(&universe).to_string(),
            "[10 : int, 200 : int,  is the sum : str] : int & int & str"
        );
    }

    #[test]
    fn record_equality() {
        let mut universe = Universe::new();
        let product = abc(&mut universe);
        let build = |universe: &Universe| {
            let int = universe.int();
            let fields = vec![
                ("a", universe.construct(int, "10").unwrap()),
                ("b", universe.construct(int, "200").unwrap()),
                ("c", universe.construct(universe.str(), "x").unwrap()),
            ];
            universe.record(product, fields).unwrap()
        };
        assert_eq!(build(&universe), build(&universe));
    }

    #[test]
    fn missing_field() {
        let mut universe = Universe::new();
        let product = abc(&mut universe);
        let a = universe.construct(universe.int(), "10").unwrap();
        let result = universe.record(product, vec![("a", a.clone()), ("c", a)]);
        assert_eq!(
            result,
            Err(Error::TypeMismatch {
                expected: "int for field 'b'".to_string(),
                got: "nothing".to_string(),
            })
        );
    }

    #[test]
    fn mistyped_field() {
        let mut universe = Universe::new();
        let product = abc(&mut universe);
        let int = universe.construct(universe.int(), "10").unwrap();
        let str = universe.construct(universe.str(), "ten").unwrap();
        let result = universe.record(product, vec![("a", str.clone()), ("b", int), ("c", str)]);
        assert_eq!(
            result,
            Err(Error::TypeMismatch {
                expected: "int for field 'a'".to_string(),
                got: "str".to_string(),
            })
        );
    }

    #[test]
    fn raw_text_is_not_a_token() {
        let mut universe = Universe::new();
        let product = abc(&mut universe);
        let mut fields = BTreeMap::new();
        fields.insert("a".to_string(), Raw::from("10"));
        let result = universe.construct(product, Raw::Fields(fields));
        assert!(matches!(result, Err(Error::ExpectedToken(_))));

        let result = universe.construct(product, "10");
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn out_of_domain_field_passes_as_value() {
        let mut universe = Universe::new();
        let int = universe.int();
        let five = universe.refine(int, Refinement::new().size_eq(5)).unwrap();
        let product = universe.product(vec![("id", five)]).unwrap();
        let short = universe.construct(int, "12").unwrap();

        assert!(universe.record(product, vec![("id", short.clone())]).is_err());

        universe.set_policy(Policy::Pass);
        let token = universe.record(product, vec![("id", short)]).unwrap();
        assert_eq!(token.ty(), universe.error());
        assert!(matches!(token.failure(), Some(Error::TypeMismatch { .. })));
    }

    #[test]
    fn named_products() {
        let mut universe = Universe::new();
        let int = universe.int();
        let str = universe.str();
        let user = universe.named_product("user", vec![("id", int)]).unwrap();
        assert_eq!(universe.named_product("user", vec![("id", int)]).unwrap(), user);
        assert_eq!(universe.lookup("user"), Some(user));
        assert_eq!(universe.name(user), "user");
        assert!(universe.named_product("user", vec![("id", str)]).is_err());
    }

    #[test]
    fn rejected_redeclarations_register_nothing() {
        let mut universe = Universe::new();
        let int = universe.int();
        let str = universe.str();
        universe.named_product("user", vec![("id", int)]).unwrap();
        let before = universe.types().count();
        assert_eq!(
            universe.named_product("user", vec![("id", str)]),
            Err(Error::AlreadyDefined("user".to_string()))
        );
        assert_eq!(universe.types().count(), before);
    }

    #[test]
    fn duplicate_field_names() {
        let mut universe = Universe::new();
        let int = universe.int();
        assert!(universe.product(vec![("a", int), ("a", int)]).is_err());
    }

    #[test]
    fn undefined_attribute() {
        let mut universe = Universe::new();
        let product = universe.product(vec![("a", universe.int())]).unwrap();
        let a = universe.construct(universe.int(), "1").unwrap();
        let record = universe.record(product, vec![("a", a)]).unwrap();
        assert_eq!(
            universe.field(&record, "z"),
            Err(Error::UndefinedAttribute {
                attr: "z".to_string(),
                ty: "int".to_string(),
            })
        );
    }

    #[test]
    fn lookup_by_field_types() {
        let mut universe = Universe::new();
        let product = abc(&mut universe);
        let (int, str) = (universe.int(), universe.str());
        assert_eq!(universe.lookup_product(&[int, int, str]), Some(product));
        assert_eq!(universe.lookup_product(&[int, str]), None);
    }
}
