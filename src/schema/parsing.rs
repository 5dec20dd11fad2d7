//! XSD schema compilation
//!
//! Parses XSD text into the [`Schema`](super::model::Schema) model. Genuine
//! defects in the schema (malformed text, nameless declarations, bad facet
//! values, references to undeclared types) abort compilation with
//! [`Error::Schema`]. Constructs outside the supported subset do not: they
//! are recorded as warnings and the affected content is validated leniently.

use crate::error::{Error, Result};
use crate::schema::model::{
    AttributeDecl, Builtin, ComplexType, ElementDecl, Facet, MaxOccurs, Particle, Schema,
    SimpleType, TypeDef, TypeRef,
};
use regex::Regex;
use roxmltree::Node;

/// The XML Schema namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Compile XSD text into a schema
pub fn compile(xsd_text: &str) -> Result<Schema> {
    let doc = roxmltree::Document::parse(xsd_text)
        .map_err(|e| Error::Schema(format!("XSD is not well-formed XML: {}", e)))?;

    let root = doc.root_element();
    if !is_xsd(&root, "schema") {
        return Err(Error::Schema(format!(
            "root element is '{}', expected 'schema' in the XML Schema namespace",
            root.tag_name().name()
        )));
    }

    let mut compiler = Compiler::default();
    let mut schema = Schema::new();

    for child in root.children().filter(Node::is_element) {
        match local_name_if_xsd(&child) {
            Some("element") => {
                let decl = compiler.parse_element_decl(&child)?;
                schema.elements.insert(decl.name.clone(), decl);
            }
            Some("complexType") => {
                let name = require_name(&child, "complexType")?;
                let def = compiler.parse_complex_type(&child)?;
                schema.types.insert(name, TypeDef::Complex(def));
            }
            Some("simpleType") => {
                let name = require_name(&child, "simpleType")?;
                let def = compiler.parse_simple_type(&child)?;
                schema.types.insert(name, TypeDef::Simple(def));
            }
            Some("annotation") => {}
            Some(other) => {
                compiler
                    .warnings
                    .push(format!("Unsupported schema construct 'xs:{}' ignored.", other));
            }
            None => {}
        }
    }

    compiler.check_references(&schema)?;
    schema.warnings = compiler.warnings;
    Ok(schema)
}

/// Stateful compilation pass collecting warnings and named type references
#[derive(Default)]
struct Compiler {
    warnings: Vec<String>,
    named_refs: Vec<String>,
}

impl Compiler {
    fn parse_element_decl(&mut self, node: &Node) -> Result<ElementDecl> {
        let name = require_name(node, "element")?;
        let type_ref = self.parse_type_of(node, &name)?;
        Ok(ElementDecl { name, type_ref })
    }

    /// Determine the type of an element or attribute declaration: a `type`
    /// attribute, an inline type child, or nothing (validated leniently)
    fn parse_type_of(&mut self, node: &Node, name: &str) -> Result<TypeRef> {
        if let Some(type_attr) = node.attribute("type") {
            return Ok(self.resolve_type_name(node, type_attr));
        }

        for child in node.children().filter(Node::is_element) {
            match local_name_if_xsd(&child) {
                Some("complexType") => {
                    let def = self.parse_complex_type(&child)?;
                    return Ok(TypeRef::Inline(Box::new(TypeDef::Complex(def))));
                }
                Some("simpleType") => {
                    let def = self.parse_simple_type(&child)?;
                    return Ok(TypeRef::Inline(Box::new(TypeDef::Simple(def))));
                }
                _ => {}
            }
        }

        self.warnings.push(format!(
            "No schema type declared for '{}'; its content is not checked.",
            name
        ));
        Ok(TypeRef::Any)
    }

    /// Resolve a QName in a `type` or `base` attribute
    fn resolve_type_name(&mut self, node: &Node, value: &str) -> TypeRef {
        let (prefix, local) = match value.split_once(':') {
            Some((p, l)) => (Some(p), l),
            None => (None, value),
        };

        let namespace = node.lookup_namespace_uri(prefix);
        if namespace == Some(XSD_NAMESPACE) {
            return match Builtin::from_local_name(local) {
                Some(builtin) => TypeRef::Builtin(builtin),
                None => {
                    self.warnings.push(format!(
                        "Unsupported built-in type 'xs:{}'; values are not checked.",
                        local
                    ));
                    TypeRef::Any
                }
            };
        }

        self.named_refs.push(local.to_string());
        TypeRef::Named(local.to_string())
    }

    fn parse_complex_type(&mut self, node: &Node) -> Result<ComplexType> {
        let mut ct = ComplexType::default();

        if node.attribute("mixed") == Some("true") {
            self.warnings.push(
                "Mixed content models are not supported; text content is not checked.".to_string(),
            );
            ct.lenient = true;
        }

        for child in node.children().filter(Node::is_element) {
            match local_name_if_xsd(&child) {
                Some("sequence") => self.parse_sequence(&child, &mut ct)?,
                Some("choice") | Some("all") => {
                    self.warnings.push(format!(
                        "Unsupported content model 'xs:{}'; occurrence constraints are not checked.",
                        child.tag_name().name()
                    ));
                    ct.lenient = true;
                    self.parse_sequence(&child, &mut ct)?;
                }
                Some("attribute") => {
                    if let Some(attr) = self.parse_attribute(&child)? {
                        ct.attributes.push(attr);
                    }
                }
                Some("simpleContent") | Some("complexContent") => {
                    self.warnings.push(format!(
                        "Unsupported construct 'xs:{}'; content is not checked.",
                        child.tag_name().name()
                    ));
                    ct.lenient = true;
                }
                Some("anyAttribute") => {
                    self.warnings.push(
                        "xs:anyAttribute is not supported; undeclared attributes are allowed."
                            .to_string(),
                    );
                    ct.open_attributes = true;
                }
                Some("annotation") => {}
                Some(other) => {
                    self.warnings
                        .push(format!("Unsupported schema construct 'xs:{}' ignored.", other));
                }
                None => {}
            }
        }

        Ok(ct)
    }

    fn parse_sequence(&mut self, node: &Node, ct: &mut ComplexType) -> Result<()> {
        for child in node.children().filter(Node::is_element) {
            match local_name_if_xsd(&child) {
                Some("element") => {
                    let name = require_name(&child, "element")?;
                    let type_ref = self.parse_type_of(&child, &name)?;
                    let min_occurs = parse_min_occurs(&child)?;
                    let max_occurs = parse_max_occurs(&child)?;
                    ct.particles.push(Particle {
                        name,
                        type_ref,
                        min_occurs,
                        max_occurs,
                    });
                }
                Some("choice") | Some("all") | Some("sequence") | Some("any") => {
                    self.warnings.push(format!(
                        "Unsupported particle 'xs:{}'; occurrence constraints are not checked.",
                        child.tag_name().name()
                    ));
                    ct.lenient = true;
                    if matches!(local_name_if_xsd(&child), Some("choice") | Some("sequence")) {
                        self.parse_sequence(&child, ct)?;
                    }
                }
                Some("annotation") => {}
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_attribute(&mut self, node: &Node) -> Result<Option<AttributeDecl>> {
        if node.attribute("ref").is_some() {
            self.warnings
                .push("Attribute references are not supported; declaration ignored.".to_string());
            return Ok(None);
        }

        let name = require_name(node, "attribute")?;
        let required = node.attribute("use") == Some("required");

        // An attribute with no type is anySimpleType: any value is accepted
        let type_ref = if let Some(type_attr) = node.attribute("type") {
            self.resolve_type_name(node, type_attr)
        } else if let Some(st) = node
            .children()
            .filter(Node::is_element)
            .find(|c| is_xsd(c, "simpleType"))
        {
            TypeRef::Inline(Box::new(TypeDef::Simple(self.parse_simple_type(&st)?)))
        } else {
            TypeRef::Any
        };

        Ok(Some(AttributeDecl {
            name,
            type_ref,
            required,
        }))
    }

    fn parse_simple_type(&mut self, node: &Node) -> Result<SimpleType> {
        let restriction = match node
            .children()
            .filter(Node::is_element)
            .find(|c| is_xsd(c, "restriction"))
        {
            Some(r) => r,
            None => {
                self.warnings.push(
                    "Only restriction simple types are supported; values are not checked."
                        .to_string(),
                );
                return Ok(SimpleType::of(Builtin::String));
            }
        };

        let base = match restriction.attribute("base") {
            Some(base_attr) => match self.resolve_type_name(&restriction, base_attr) {
                TypeRef::Builtin(b) => b,
                _ => {
                    // Derivation from user types is flattened to xs:string
                    self.warnings.push(format!(
                        "Restriction base '{}' is not a supported built-in; treated as xs:string.",
                        base_attr
                    ));
                    Builtin::String
                }
            },
            None => {
                return Err(Error::Schema(
                    "xs:restriction is missing the 'base' attribute".to_string(),
                ))
            }
        };

        let mut facets = Vec::new();
        for child in restriction.children().filter(Node::is_element) {
            let facet_name = match local_name_if_xsd(&child) {
                Some(n) => n,
                None => continue,
            };
            if facet_name == "annotation" {
                continue;
            }
            let value = child.attribute("value").ok_or_else(|| {
                Error::Schema(format!("facet 'xs:{}' is missing its value", facet_name))
            })?;

            match facet_name {
                "enumeration" => match facets.iter_mut().find_map(|f| match f {
                    Facet::Enumeration(values) => Some(values),
                    _ => None,
                }) {
                    Some(values) => values.push(value.to_string()),
                    None => facets.push(Facet::Enumeration(vec![value.to_string()])),
                },
                "pattern" => {
                    // XSD patterns are implicitly anchored
                    let anchored = format!("^(?:{})$", value);
                    let regex = Regex::new(&anchored).map_err(|e| {
                        Error::Schema(format!("invalid pattern facet '{}': {}", value, e))
                    })?;
                    facets.push(Facet::Pattern {
                        source: value.to_string(),
                        regex,
                    });
                }
                "length" => facets.push(Facet::Length(parse_facet_number(facet_name, value)?)),
                "minLength" => {
                    facets.push(Facet::MinLength(parse_facet_number(facet_name, value)?))
                }
                "maxLength" => {
                    facets.push(Facet::MaxLength(parse_facet_number(facet_name, value)?))
                }
                "minInclusive" => {
                    facets.push(Facet::MinInclusive(parse_facet_decimal(facet_name, value)?))
                }
                "maxInclusive" => {
                    facets.push(Facet::MaxInclusive(parse_facet_decimal(facet_name, value)?))
                }
                "minExclusive" => {
                    facets.push(Facet::MinExclusive(parse_facet_decimal(facet_name, value)?))
                }
                "maxExclusive" => {
                    facets.push(Facet::MaxExclusive(parse_facet_decimal(facet_name, value)?))
                }
                "whiteSpace" => {} // values are compared trimmed already
                other => {
                    self.warnings
                        .push(format!("Unsupported facet 'xs:{}' ignored.", other));
                }
            }
        }

        Ok(SimpleType { base, facets })
    }

    /// Verify every named type reference resolves
    fn check_references(&self, schema: &Schema) -> Result<()> {
        for name in &self.named_refs {
            if !schema.types.contains_key(name) {
                return Err(Error::Schema(format!(
                    "reference to undeclared type '{}'",
                    name
                )));
            }
        }
        Ok(())
    }
}

fn is_xsd(node: &Node, local: &str) -> bool {
    node.tag_name().name() == local && node.tag_name().namespace() == Some(XSD_NAMESPACE)
}

fn local_name_if_xsd<'a>(node: &'a Node) -> Option<&'a str> {
    if node.tag_name().namespace() == Some(XSD_NAMESPACE) {
        Some(node.tag_name().name())
    } else {
        None
    }
}

fn require_name(node: &Node, what: &str) -> Result<String> {
    node.attribute("name")
        .map(str::to_string)
        .ok_or_else(|| Error::Schema(format!("xs:{} is missing the 'name' attribute", what)))
}

fn parse_min_occurs(node: &Node) -> Result<u32> {
    match node.attribute("minOccurs") {
        None => Ok(1),
        Some(v) => v
            .parse::<u32>()
            .map_err(|_| Error::Schema(format!("invalid minOccurs value '{}'", v))),
    }
}

fn parse_max_occurs(node: &Node) -> Result<MaxOccurs> {
    match node.attribute("maxOccurs") {
        None => Ok(MaxOccurs::Bounded(1)),
        Some("unbounded") => Ok(MaxOccurs::Unbounded),
        Some(v) => v
            .parse::<u32>()
            .map(MaxOccurs::Bounded)
            .map_err(|_| Error::Schema(format!("invalid maxOccurs value '{}'", v))),
    }
}

fn parse_facet_number(facet: &str, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|_| Error::Schema(format!("invalid xs:{} value '{}'", facet, value)))
}

fn parse_facet_decimal(facet: &str, value: &str) -> Result<rust_decimal::Decimal> {
    value
        .parse::<rust_decimal::Decimal>()
        .map_err(|_| Error::Schema(format!("invalid xs:{} value '{}'", facet, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::model::ResolvedType;

    const HOTELS_XSD: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:simpleType name="ratingType">
    <xs:restriction base="xs:positiveInteger">
      <xs:minInclusive value="1"/>
      <xs:maxInclusive value="5"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:element name="Hotels">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="Hotel" minOccurs="0" maxOccurs="unbounded">
          <xs:complexType>
            <xs:sequence>
              <xs:element name="Name" type="xs:string"/>
              <xs:element name="Phone" type="xs:string" maxOccurs="unbounded"/>
              <xs:element name="Address" minOccurs="0">
                <xs:complexType>
                  <xs:sequence>
                    <xs:element name="Number" type="xs:string"/>
                    <xs:element name="Street" type="xs:string"/>
                    <xs:element name="City" type="xs:string"/>
                    <xs:element name="State" type="xs:string"/>
                    <xs:element name="Zip" type="xs:string"/>
                  </xs:sequence>
                  <xs:attribute name="NearestAirport" type="xs:string"/>
                </xs:complexType>
              </xs:element>
            </xs:sequence>
            <xs:attribute name="Rating" type="ratingType"/>
          </xs:complexType>
        </xs:element>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    #[test]
    fn test_compile_hotels_schema() {
        let schema = compile(HOTELS_XSD).unwrap();
        assert!(schema.warnings.is_empty());
        assert!(schema.element("Hotels").is_some());
        assert!(schema.types.contains_key("ratingType"));

        let hotels = schema.element("Hotels").unwrap();
        let resolved = schema.resolve(&hotels.type_ref);
        let ct = match resolved {
            ResolvedType::Complex(ct) => ct,
            other => panic!("expected complex type, got {:?}", other),
        };
        assert_eq!(ct.particles.len(), 1);
        assert_eq!(ct.particles[0].name, "Hotel");
        assert_eq!(ct.particles[0].min_occurs, 0);
        assert_eq!(ct.particles[0].max_occurs, MaxOccurs::Unbounded);
    }

    #[test]
    fn test_malformed_xsd_fails() {
        let result = compile("<xs:schema");
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_wrong_root_fails() {
        let result = compile("<Hotels/>");
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_nameless_element_fails() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element type="xs:string"/>
        </xs:schema>"#;
        assert!(matches!(compile(xsd), Err(Error::Schema(_))));
    }

    #[test]
    fn test_undeclared_type_reference_fails() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element name="Hotels" type="missingType"/>
        </xs:schema>"#;
        let result = compile(xsd);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:simpleType name="bad">
                <xs:restriction base="xs:string">
                    <xs:pattern value="("/>
                </xs:restriction>
            </xs:simpleType>
        </xs:schema>"#;
        assert!(matches!(compile(xsd), Err(Error::Schema(_))));
    }

    #[test]
    fn test_unsupported_construct_warns() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element name="Hotels">
                <xs:complexType>
                    <xs:choice>
                        <xs:element name="Hotel" type="xs:string"/>
                    </xs:choice>
                </xs:complexType>
            </xs:element>
        </xs:schema>"#;
        let schema = compile(xsd).unwrap();
        assert_eq!(schema.warnings.len(), 1);
        assert!(schema.warnings[0].contains("xs:choice"));
    }

    #[test]
    fn test_enumeration_facets_grouped() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:simpleType name="stateType">
                <xs:restriction base="xs:string">
                    <xs:enumeration value="AZ"/>
                    <xs:enumeration value="CA"/>
                </xs:restriction>
            </xs:simpleType>
        </xs:schema>"#;
        let schema = compile(xsd).unwrap();
        let st = match schema.types.get("stateType") {
            Some(TypeDef::Simple(st)) => st,
            other => panic!("expected simple type, got {:?}", other),
        };
        assert_eq!(st.facets.len(), 1);
        assert!(matches!(&st.facets[0], Facet::Enumeration(v) if v.len() == 2));
    }

    #[test]
    fn test_missing_facet_value_fails() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:simpleType name="bad">
                <xs:restriction base="xs:string">
                    <xs:maxLength/>
                </xs:restriction>
            </xs:simpleType>
        </xs:schema>"#;
        assert!(matches!(compile(xsd), Err(Error::Schema(_))));
    }
}
