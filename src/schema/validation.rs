//! Schema-driven document validation
//!
//! [`SchemaValidator::validate`] compiles an XSD and checks XML text against
//! it, accumulating every diagnostic rather than stopping at the first.
//! Well-formedness is checked before any schema-level reporting, so a
//! malformed document yields exactly one positioned diagnostic and no
//! schema violations.

use crate::error::{Error, Result};
use crate::schema::messages::{ValidationMessage, ValidationReport};
use crate::schema::model::{ComplexType, ResolvedType, Schema, SimpleType};
use crate::schema::parsing;
use roxmltree::{Node, ParsingOptions};

/// Nesting depth guard against degenerate documents
const MAX_DEPTH: usize = 512;

/// Validates XML documents against a compiled XSD
#[derive(Debug, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate XML text against XSD text
    ///
    /// Returns the full diagnostic sequence; the run is successful iff the
    /// report is empty. Compilation failure short-circuits with a single
    /// unpositioned Error; malformed XML short-circuits with a single
    /// positioned Error.
    pub fn validate(&self, xml_text: &str, xsd_text: &str) -> ValidationReport {
        let schema = match parsing::compile(xsd_text) {
            Ok(schema) => schema,
            Err(e) => {
                let reason = match e {
                    Error::Schema(msg) => msg,
                    other => other.to_string(),
                };
                return ValidationReport::single(ValidationMessage::error(format!(
                    "Schema compilation failed: {}",
                    reason
                )));
            }
        };

        // DTD processing stays disabled: the parser rejects documents
        // carrying a DOCTYPE instead of expanding it.
        let options = ParsingOptions {
            allow_dtd: false,
            ..ParsingOptions::default()
        };
        let doc = match roxmltree::Document::parse_with_options(xml_text, options) {
            Ok(doc) => doc,
            Err(e) => {
                let pos = e.pos();
                return ValidationReport::single(
                    ValidationMessage::error(format!("XML formatting error: {}", e))
                        .at(pos.row, pos.col),
                );
            }
        };

        let mut report = ValidationReport::new();
        for warning in &schema.warnings {
            report.push(ValidationMessage::warning(warning.clone()));
        }

        let mut walker = Walker {
            schema: &schema,
            doc: &doc,
            report: &mut report,
        };
        if let Err(e) = walker.walk_root() {
            report.push(ValidationMessage::error(format!("Validation failed: {}", e)));
        }

        report
    }
}

/// Depth-first walker collecting diagnostics in document order
struct Walker<'a, 'input> {
    schema: &'a Schema,
    doc: &'a roxmltree::Document<'input>,
    report: &'a mut ValidationReport,
}

impl<'a, 'input> Walker<'a, 'input> {
    fn walk_root(&mut self) -> Result<()> {
        let root = self.doc.root_element();
        let name = root.tag_name().name();

        match self.schema.element(name) {
            Some(decl) => {
                let resolved = self.schema.resolve(&decl.type_ref);
                self.validate_element(&root, resolved, 0)
            }
            None => {
                self.error_at(
                    &root,
                    format!("The '{}' element is not declared.", name),
                );
                Ok(())
            }
        }
    }

    fn validate_element(
        &mut self,
        node: &Node,
        resolved: ResolvedType<'_>,
        depth: usize,
    ) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::Other(
                "maximum element nesting depth exceeded".to_string(),
            ));
        }

        match resolved {
            // Lenient: content was already flagged during compilation
            ResolvedType::Any => Ok(()),
            ResolvedType::Builtin(builtin) => {
                self.check_simple_content(node, &SimpleType::of(builtin));
                Ok(())
            }
            ResolvedType::Simple(st) => {
                self.check_simple_content(node, st);
                Ok(())
            }
            ResolvedType::Complex(ct) => self.check_complex_content(node, ct, depth),
        }
    }

    /// Simple content: no attributes, no child elements, text per the type
    fn check_simple_content(&mut self, node: &Node, st: &SimpleType) {
        for attr in node.attributes() {
            if attr.namespace().is_some() {
                continue; // xsi:* and friends
            }
            self.error_at(
                node,
                format!(
                    "The attribute '{}' is not declared for element '{}'.",
                    attr.name(),
                    node.tag_name().name()
                ),
            );
        }

        for child in node.children().filter(Node::is_element) {
            self.error_at(
                &child,
                format!(
                    "The element '{}' cannot contain child element '{}' because it has simple content.",
                    node.tag_name().name(),
                    child.tag_name().name()
                ),
            );
        }

        let text = self.text_of(node);
        for reason in st.check_value(&text) {
            self.error_at(node, reason);
        }
    }

    fn check_complex_content(&mut self, node: &Node, ct: &ComplexType, depth: usize) -> Result<()> {
        self.check_attributes(node, ct);

        // Element-only content: non-whitespace text is a violation
        if !ct.lenient && node.children().any(|c| {
            c.is_text() && c.text().map(|t| !t.trim().is_empty()).unwrap_or(false)
        }) {
            self.error_at(
                node,
                format!(
                    "The element '{}' cannot contain text.",
                    node.tag_name().name()
                ),
            );
        }

        if ct.lenient {
            self.check_children_lenient(node, ct, depth)
        } else {
            self.check_sequence(node, ct, depth)
        }
    }

    fn check_attributes(&mut self, node: &Node, ct: &ComplexType) {
        for attr in node.attributes() {
            if attr.namespace().is_some() {
                continue;
            }
            match ct.find_attribute(attr.name()) {
                Some(decl) => match self.schema.resolve(&decl.type_ref) {
                    ResolvedType::Builtin(builtin) => {
                        if let Err(reason) = builtin.check(attr.value()) {
                            self.error_at(node, reason);
                        }
                    }
                    ResolvedType::Simple(st) => {
                        for reason in st.check_value(attr.value()) {
                            self.error_at(node, reason);
                        }
                    }
                    // anySimpleType or unsupported: accept any value
                    ResolvedType::Any | ResolvedType::Complex(_) => {}
                },
                None if ct.open_attributes => {}
                None => {
                    self.error_at(
                        node,
                        format!(
                            "The attribute '{}' is not declared for element '{}'.",
                            attr.name(),
                            node.tag_name().name()
                        ),
                    );
                }
            }
        }

        for decl in &ct.attributes {
            if decl.required && node.attribute(decl.name.as_str()).is_none() {
                self.error_at(
                    node,
                    format!(
                        "The required attribute '{}' is missing on element '{}'.",
                        decl.name,
                        node.tag_name().name()
                    ),
                );
            }
        }
    }

    /// Strict sequence matching. Diagnostics never abort the scan; after a
    /// mismatch the walker recovers so later violations are still reported.
    fn check_sequence(&mut self, node: &Node, ct: &ComplexType, depth: usize) -> Result<()> {
        let mut idx = 0usize;
        let mut count = 0u32;

        'children: for child in node.children().filter(Node::is_element) {
            let child_name = child.tag_name().name();

            loop {
                let particle = match ct.particles.get(idx) {
                    Some(p) => p,
                    None => {
                        self.error_at(
                            &child,
                            format!(
                                "The element '{}' has invalid child element '{}'.",
                                node.tag_name().name(),
                                child_name
                            ),
                        );
                        continue 'children;
                    }
                };

                if particle.name == child_name {
                    count += 1;
                    if !particle.max_occurs.allows(count) {
                        self.error_at(
                            &child,
                            format!(
                                "The element '{}' appears more times than allowed.",
                                child_name
                            ),
                        );
                    }
                    let resolved = self.schema.resolve(&particle.type_ref);
                    self.validate_element(&child, resolved, depth + 1)?;
                    continue 'children;
                }

                if count < particle.min_occurs {
                    self.error_at(
                        &child,
                        format!(
                            "The element '{}' has invalid child element '{}'. Expected '{}'.",
                            node.tag_name().name(),
                            child_name,
                            particle.name
                        ),
                    );
                }
                // Move on so one skipped element does not cascade
                idx += 1;
                count = 0;
            }
        }

        // Required particles with no matching children left
        while let Some(particle) = ct.particles.get(idx) {
            if count < particle.min_occurs {
                self.error_at(
                    node,
                    format!(
                        "The element '{}' is missing required child element '{}'.",
                        node.tag_name().name(),
                        particle.name
                    ),
                );
            }
            idx += 1;
            count = 0;
        }

        Ok(())
    }

    /// Lenient matching for content models outside the supported subset:
    /// children are checked by name only, unknown ones warn
    fn check_children_lenient(&mut self, node: &Node, ct: &ComplexType, depth: usize) -> Result<()> {
        for child in node.children().filter(Node::is_element) {
            let child_name = child.tag_name().name();
            match ct.find_particle(child_name) {
                Some(particle) => {
                    let resolved = self.schema.resolve(&particle.type_ref);
                    self.validate_element(&child, resolved, depth + 1)?;
                }
                None => {
                    let pos = self.pos_of(&child);
                    self.report.push(
                        ValidationMessage::warning(format!(
                            "The element '{}' was not expected and was not validated.",
                            child_name
                        ))
                        .at(pos.0, pos.1),
                    );
                }
            }
        }
        Ok(())
    }

    /// Concatenated text of the element's direct text children
    fn text_of(&self, node: &Node) -> String {
        node.children()
            .filter(Node::is_text)
            .filter_map(|c| c.text())
            .collect()
    }

    fn pos_of(&self, node: &Node) -> (u32, u32) {
        let pos = self.doc.text_pos_at(node.range().start);
        (pos.row, pos.col)
    }

    fn error_at(&mut self, node: &Node, text: String) {
        let (line, col) = self.pos_of(node);
        self.report.push(ValidationMessage::error(text).at(line, col));
    }
}
