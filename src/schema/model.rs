//! Compiled schema model
//!
//! The subset of XSD needed for document schemas of the hotel-directory
//! shape: global element declarations, complex types with a single sequence
//! content model, attribute declarations, and simple-type restrictions over
//! the common built-in types. Constructs outside this subset are recorded as
//! compile warnings and validated leniently.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{4,}-\d{2}-\d{2}(Z|[+-]\d{2}:\d{2})?$").unwrap());

/// Built-in XSD simple types supported for value checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// xs:string
    String,
    /// xs:normalizedString
    NormalizedString,
    /// xs:token
    Token,
    /// xs:anyURI
    AnyUri,
    /// xs:boolean
    Boolean,
    /// xs:decimal
    Decimal,
    /// xs:float
    Float,
    /// xs:double
    Double,
    /// xs:integer
    Integer,
    /// xs:int
    Int,
    /// xs:long
    Long,
    /// xs:nonNegativeInteger
    NonNegativeInteger,
    /// xs:positiveInteger
    PositiveInteger,
    /// xs:unsignedInt
    UnsignedInt,
    /// xs:date
    Date,
}

impl Builtin {
    /// Look up a built-in type by its XSD local name
    pub fn from_local_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Builtin::String),
            "normalizedString" => Some(Builtin::NormalizedString),
            "token" => Some(Builtin::Token),
            "anyURI" => Some(Builtin::AnyUri),
            "boolean" => Some(Builtin::Boolean),
            "decimal" => Some(Builtin::Decimal),
            "float" => Some(Builtin::Float),
            "double" => Some(Builtin::Double),
            "integer" => Some(Builtin::Integer),
            "int" => Some(Builtin::Int),
            "long" => Some(Builtin::Long),
            "nonNegativeInteger" => Some(Builtin::NonNegativeInteger),
            "positiveInteger" => Some(Builtin::PositiveInteger),
            "unsignedInt" => Some(Builtin::UnsignedInt),
            "date" => Some(Builtin::Date),
            _ => None,
        }
    }

    /// XSD local name of the type
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::String => "string",
            Builtin::NormalizedString => "normalizedString",
            Builtin::Token => "token",
            Builtin::AnyUri => "anyURI",
            Builtin::Boolean => "boolean",
            Builtin::Decimal => "decimal",
            Builtin::Float => "float",
            Builtin::Double => "double",
            Builtin::Integer => "integer",
            Builtin::Int => "int",
            Builtin::Long => "long",
            Builtin::NonNegativeInteger => "nonNegativeInteger",
            Builtin::PositiveInteger => "positiveInteger",
            Builtin::UnsignedInt => "unsignedInt",
            Builtin::Date => "date",
        }
    }

    /// Check a lexical value against this type, returning the violation
    /// reason when invalid
    pub fn check(&self, value: &str) -> std::result::Result<(), String> {
        let v = value.trim();
        let fail = |why: &str| {
            Err(format!(
                "The value '{}' is invalid for type 'xs:{}': {}.",
                v,
                self.name(),
                why
            ))
        };

        match self {
            // String family is lexically unconstrained
            Builtin::String | Builtin::NormalizedString | Builtin::Token | Builtin::AnyUri => {
                Ok(())
            }
            Builtin::Boolean => match v {
                "true" | "false" | "1" | "0" => Ok(()),
                _ => fail("expected 'true', 'false', '1' or '0'"),
            },
            Builtin::Decimal => match v.parse::<Decimal>() {
                Ok(_) => Ok(()),
                Err(_) => fail("not a decimal number"),
            },
            Builtin::Float | Builtin::Double => match v {
                "INF" | "-INF" | "NaN" => Ok(()),
                _ => match v.parse::<f64>() {
                    Ok(_) => Ok(()),
                    Err(_) => fail("not a floating point number"),
                },
            },
            Builtin::Integer => match Self::parse_integer(v) {
                Some(_) => Ok(()),
                None => fail("not an integer"),
            },
            Builtin::Int => match v.parse::<i32>() {
                Ok(_) => Ok(()),
                Err(_) => fail("not a 32-bit integer"),
            },
            Builtin::Long => match v.parse::<i64>() {
                Ok(_) => Ok(()),
                Err(_) => fail("not a 64-bit integer"),
            },
            Builtin::NonNegativeInteger => match Self::parse_integer(v) {
                Some(d) if d >= Decimal::ZERO => Ok(()),
                Some(_) => fail("value is negative"),
                None => fail("not an integer"),
            },
            Builtin::PositiveInteger => match Self::parse_integer(v) {
                Some(d) if d > Decimal::ZERO => Ok(()),
                Some(_) => fail("value is not positive"),
                None => fail("not an integer"),
            },
            Builtin::UnsignedInt => match v.parse::<u32>() {
                Ok(_) => Ok(()),
                Err(_) => fail("not an unsigned 32-bit integer"),
            },
            Builtin::Date => {
                if DATE_RE.is_match(v) {
                    Ok(())
                } else {
                    fail("expected a date in YYYY-MM-DD form")
                }
            }
        }
    }

    fn parse_integer(v: &str) -> Option<Decimal> {
        let d = v.parse::<Decimal>().ok()?;
        if d.fract().is_zero() {
            Some(d)
        } else {
            None
        }
    }
}

/// A restriction facet on a simple type
#[derive(Debug, Clone)]
pub enum Facet {
    /// xs:enumeration - value must be one of the listed values
    Enumeration(Vec<String>),
    /// xs:pattern - value must match the (implicitly anchored) pattern
    Pattern {
        /// Pattern as written in the schema
        source: String,
        /// Compiled anchored regex
        regex: Regex,
    },
    /// xs:length - exact character count
    Length(usize),
    /// xs:minLength
    MinLength(usize),
    /// xs:maxLength
    MaxLength(usize),
    /// xs:minInclusive
    MinInclusive(Decimal),
    /// xs:maxInclusive
    MaxInclusive(Decimal),
    /// xs:minExclusive
    MinExclusive(Decimal),
    /// xs:maxExclusive
    MaxExclusive(Decimal),
}

impl Facet {
    /// Check a lexical value against this facet, returning the violation
    /// reason when invalid
    pub fn check(&self, value: &str) -> std::result::Result<(), String> {
        let v = value.trim();
        match self {
            Facet::Enumeration(values) => {
                if values.iter().any(|e| e == v) {
                    Ok(())
                } else {
                    Err(format!(
                        "The value '{}' is not in the enumeration [{}].",
                        v,
                        values.join(", ")
                    ))
                }
            }
            Facet::Pattern { source, regex } => {
                if regex.is_match(v) {
                    Ok(())
                } else {
                    Err(format!(
                        "The value '{}' does not match the pattern '{}'.",
                        v, source
                    ))
                }
            }
            Facet::Length(len) => {
                let count = v.chars().count();
                if count == *len {
                    Ok(())
                } else {
                    Err(format!(
                        "The value '{}' has length {}, expected {}.",
                        v, count, len
                    ))
                }
            }
            Facet::MinLength(len) => {
                if v.chars().count() >= *len {
                    Ok(())
                } else {
                    Err(format!(
                        "The value '{}' is shorter than the minimum length {}.",
                        v, len
                    ))
                }
            }
            Facet::MaxLength(len) => {
                if v.chars().count() <= *len {
                    Ok(())
                } else {
                    Err(format!(
                        "The value '{}' is longer than the maximum length {}.",
                        v, len
                    ))
                }
            }
            Facet::MinInclusive(bound) => Self::check_numeric(v, |d| d >= *bound, "less than", bound),
            Facet::MaxInclusive(bound) => {
                Self::check_numeric(v, |d| d <= *bound, "greater than", bound)
            }
            Facet::MinExclusive(bound) => {
                Self::check_numeric(v, |d| d > *bound, "not greater than", bound)
            }
            Facet::MaxExclusive(bound) => {
                Self::check_numeric(v, |d| d < *bound, "not less than", bound)
            }
        }
    }

    fn check_numeric(
        value: &str,
        ok: impl Fn(Decimal) -> bool,
        relation: &str,
        bound: &Decimal,
    ) -> std::result::Result<(), String> {
        match value.parse::<Decimal>() {
            // Non-numeric values are reported by the base type check instead
            Err(_) => Ok(()),
            Ok(d) if ok(d) => Ok(()),
            Ok(_) => Err(format!(
                "The value '{}' is {} the bound {}.",
                value, relation, bound
            )),
        }
    }
}

/// A simple type: a built-in base plus restriction facets
#[derive(Debug, Clone)]
pub struct SimpleType {
    /// Base built-in type
    pub base: Builtin,
    /// Restriction facets, in declaration order
    pub facets: Vec<Facet>,
}

impl SimpleType {
    /// Create a simple type with no facets
    pub fn of(base: Builtin) -> Self {
        Self {
            base,
            facets: Vec::new(),
        }
    }

    /// Check a lexical value, returning every violation reason
    pub fn check_value(&self, value: &str) -> Vec<String> {
        if let Err(reason) = self.base.check(value) {
            // Facet checks presume a lexically valid base value
            return vec![reason];
        }
        self.facets
            .iter()
            .filter_map(|f| f.check(value).err())
            .collect()
    }
}

/// Upper occurrence bound of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    /// Bounded occurrence count
    Bounded(u32),
    /// maxOccurs="unbounded"
    Unbounded,
}

impl MaxOccurs {
    /// Check whether a count is within the bound
    pub fn allows(&self, count: u32) -> bool {
        match self {
            MaxOccurs::Bounded(max) => count <= *max,
            MaxOccurs::Unbounded => true,
        }
    }
}

/// Reference to a type, resolved against the schema at validation time
#[derive(Debug, Clone)]
pub enum TypeRef {
    /// A built-in XSD type
    Builtin(Builtin),
    /// A named type declared globally in the schema
    Named(String),
    /// An anonymous type declared inline
    Inline(Box<TypeDef>),
    /// No type declared or the type is outside the supported subset;
    /// content is validated leniently
    Any,
}

/// A type definition
#[derive(Debug, Clone)]
pub enum TypeDef {
    /// Simple content
    Simple(SimpleType),
    /// Complex content
    Complex(ComplexType),
}

/// A resolved type, borrowed from the schema
#[derive(Debug, Clone, Copy)]
pub enum ResolvedType<'a> {
    /// A built-in type
    Builtin(Builtin),
    /// A user-declared simple type
    Simple(&'a SimpleType),
    /// A user-declared complex type
    Complex(&'a ComplexType),
    /// Lenient validation
    Any,
}

/// One element particle inside a sequence content model
#[derive(Debug, Clone)]
pub struct Particle {
    /// Element name
    pub name: String,
    /// Element type
    pub type_ref: TypeRef,
    /// Minimum occurrence count
    pub min_occurs: u32,
    /// Maximum occurrence count
    pub max_occurs: MaxOccurs,
}

/// An attribute declaration on a complex type
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    /// Attribute name
    pub name: String,
    /// Attribute type (always simple content)
    pub type_ref: TypeRef,
    /// Whether use="required"
    pub required: bool,
}

/// A complex type: a sequence of element particles plus attributes
#[derive(Debug, Clone, Default)]
pub struct ComplexType {
    /// Sequence content model, in declaration order
    pub particles: Vec<Particle>,
    /// Declared attributes, in declaration order
    pub attributes: Vec<AttributeDecl>,
    /// Content used constructs outside the supported subset; occurrence
    /// constraints are not enforced and unknown children only warn
    pub lenient: bool,
    /// xs:anyAttribute was present; undeclared attributes are allowed
    pub open_attributes: bool,
}

impl ComplexType {
    /// Find a particle by element name
    pub fn find_particle(&self, name: &str) -> Option<&Particle> {
        self.particles.iter().find(|p| p.name == name)
    }

    /// Find an attribute declaration by name
    pub fn find_attribute(&self, name: &str) -> Option<&AttributeDecl> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A global element declaration
#[derive(Debug, Clone)]
pub struct ElementDecl {
    /// Element name
    pub name: String,
    /// Element type
    pub type_ref: TypeRef,
}

/// A compiled schema
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Global element declarations, in declaration order
    pub elements: IndexMap<String, ElementDecl>,
    /// Named type definitions, in declaration order
    pub types: IndexMap<String, TypeDef>,
    /// Constructs outside the supported subset noticed during compilation
    pub warnings: Vec<String>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a global element declaration
    pub fn element(&self, name: &str) -> Option<&ElementDecl> {
        self.elements.get(name)
    }

    /// Resolve a type reference against the schema
    ///
    /// Named references are checked at compile time, so an unknown name can
    /// only mean the schema was built by hand; it degrades to `Any`.
    pub fn resolve<'a>(&'a self, type_ref: &'a TypeRef) -> ResolvedType<'a> {
        match type_ref {
            TypeRef::Builtin(b) => ResolvedType::Builtin(*b),
            TypeRef::Named(name) => match self.types.get(name) {
                Some(TypeDef::Simple(s)) => ResolvedType::Simple(s),
                Some(TypeDef::Complex(c)) => ResolvedType::Complex(c),
                None => ResolvedType::Any,
            },
            TypeRef::Inline(def) => match def.as_ref() {
                TypeDef::Simple(s) => ResolvedType::Simple(s),
                TypeDef::Complex(c) => ResolvedType::Complex(c),
            },
            TypeRef::Any => ResolvedType::Any,
        }
    }
}
