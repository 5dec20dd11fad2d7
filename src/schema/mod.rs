//! XSD schema compilation and document validation

pub mod messages;
pub mod model;
pub mod parsing;
pub mod validation;

pub use messages::{Severity, ValidationMessage, ValidationReport, NO_ERROR};
pub use model::{
    AttributeDecl, Builtin, ComplexType, ElementDecl, Facet, MaxOccurs, Particle, ResolvedType,
    Schema, SimpleType, TypeDef, TypeRef,
};
pub use parsing::{compile, XSD_NAMESPACE};
pub use validation::SchemaValidator;
