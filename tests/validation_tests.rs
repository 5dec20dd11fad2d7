//! Validation integration tests
//!
//! These exercise the whole validation pipeline against a realistic hotel
//! directory schema: compile the XSD, parse the document, and collect every
//! diagnostic in document order.

use hoteldir::{validate, Severity};
use pretty_assertions::assert_eq;

const HOTELS_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:simpleType name="ratingType">
    <xs:restriction base="xs:positiveInteger">
      <xs:minInclusive value="1"/>
      <xs:maxInclusive value="5"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:simpleType name="zipType">
    <xs:restriction base="xs:string">
      <xs:pattern value="\d{5}"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:element name="Hotels">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="Hotel" minOccurs="0" maxOccurs="unbounded">
          <xs:complexType>
            <xs:sequence>
              <xs:element name="Name" type="xs:string"/>
              <xs:element name="Phone" type="xs:string" minOccurs="0" maxOccurs="unbounded"/>
              <xs:element name="Address" minOccurs="0">
                <xs:complexType>
                  <xs:sequence>
                    <xs:element name="Number" type="xs:string"/>
                    <xs:element name="Street" type="xs:string"/>
                    <xs:element name="City" type="xs:string"/>
                    <xs:element name="State" type="xs:string"/>
                    <xs:element name="Zip" type="zipType"/>
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

const VALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Hotels>
  <Hotel Rating="4">
    <Name>The Grand Plaza</Name>
    <Phone>602-555-1111</Phone>
    <Phone>602-555-2222</Phone>
    <Address NearestAirport="PHX">
      <Number>100</Number>
      <Street>Main St</Street>
      <City>Phoenix</City>
      <State>AZ</State>
      <Zip>85001</Zip>
    </Address>
  </Hotel>
  <Hotel>
    <Name>Desert Rest</Name>
  </Hotel>
</Hotels>"#;

#[test]
fn valid_document_yields_empty_report() {
    let report = validate(VALID_XML, HOTELS_XSD);
    assert!(report.is_valid(), "unexpected: {}", report.render());
    assert_eq!(report.render(), "No Error");
}

#[test]
fn all_independent_violations_are_reported() {
    // Four independent violations spread over three hotels
    let xml = r#"<Hotels>
  <Hotel Rating="9"><Name>Too Starry</Name></Hotel>
  <Hotel Stars="3"><Name>Wrong Attribute</Name></Hotel>
  <Hotel>
    <Name>Bad Zip</Name>
    <Address>
      <Number>1</Number>
      <Street>Elm</Street>
      <City>Mesa</City>
      <State>AZ</State>
      <Zip>ABCDE</Zip>
    </Address>
  </Hotel>
  <Hotel><Phone>555</Phone></Hotel>
</Hotels>"#;

    let report = validate(xml, HOTELS_XSD);
    assert_eq!(report.len(), 4, "report: {}", report.render());
    assert!(report.messages.iter().all(|m| m.severity == Severity::Error));

    // Document order: rating facet, undeclared attribute, zip pattern,
    // missing Name
    assert!(report.messages[0].text.contains("'9'"));
    assert!(report.messages[1].text.contains("'Stars'"));
    assert!(report.messages[2].text.contains("'ABCDE'"));
    assert!(report.messages[3].text.contains("'Name'"));

    // Diagnostics are positioned and ordered front-to-back
    let lines: Vec<u32> = report.messages.iter().map(|m| m.line.unwrap()).collect();
    let mut sorted = lines.clone();
    sorted.sort_unstable();
    assert_eq!(lines, sorted);
}

#[test]
fn hotel_without_name_yields_one_positioned_error() {
    let xml = r#"<Hotels>
  <Hotel Rating="4">
    <Phone>602-555-1111</Phone>
    <Address NearestAirport="PHX">
      <Number>100</Number>
      <Street>Main St</Street>
      <City>Phoenix</City>
      <State>AZ</State>
      <Zip>85001</Zip>
    </Address>
  </Hotel>
</Hotels>"#;

    let report = validate(xml, HOTELS_XSD);
    assert_eq!(report.len(), 1, "report: {}", report.render());
    let msg = &report.messages[0];
    assert_eq!(msg.severity, Severity::Error);
    assert!(msg.text.contains("'Name'"));
    assert_eq!(msg.line, Some(3));
}

#[test]
fn malformed_xml_yields_one_positioned_diagnostic() {
    let xml = "<Hotels>\n  <Hotel>\n</Hotels>";
    let report = validate(xml, HOTELS_XSD);
    assert_eq!(report.len(), 1);
    let msg = &report.messages[0];
    assert!(msg.text.starts_with("XML formatting error:"));
    assert!(msg.line.is_some());
    assert!(msg.column.is_some());
    assert_eq!(msg.severity, Severity::Error);
}

#[test]
fn malformed_xml_suppresses_schema_diagnostics() {
    // The document also violates the schema, but well-formedness is decided
    // first and is the sole diagnostic
    let xml = "<Hotels><Hotel Stars=\"3\"><Pool></Hotel></Hotels>";
    let report = validate(xml, HOTELS_XSD);
    assert_eq!(report.len(), 1);
    assert!(report.messages[0].text.starts_with("XML formatting error:"));
}

#[test]
fn invalid_xsd_yields_single_fatal_diagnostic() {
    let report = validate(VALID_XML, "<xs:schema");
    assert_eq!(report.len(), 1);
    let msg = &report.messages[0];
    assert_eq!(msg.severity, Severity::Error);
    assert!(msg.text.starts_with("Schema compilation failed:"));
    assert_eq!(msg.line, None);
    assert_eq!(msg.column, None);
}

#[test]
fn dtd_is_prohibited() {
    let xml = "<!DOCTYPE Hotels SYSTEM \"evil.dtd\"><Hotels/>";
    let report = validate(xml, HOTELS_XSD);
    assert_eq!(report.len(), 1);
    assert!(report.messages[0].text.starts_with("XML formatting error:"));
}

#[test]
fn comments_and_whitespace_are_ignored() {
    let xml = r#"<Hotels>
  <!-- directory is allowed to be empty -->

</Hotels>"#;
    let report = validate(xml, HOTELS_XSD);
    assert!(report.is_valid(), "unexpected: {}", report.render());
}

#[test]
fn unsupported_constructs_warn_without_failing_compilation() {
    let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Hotels">
    <xs:complexType>
      <xs:choice>
        <xs:element name="Hotel" type="xs:string"/>
        <xs:element name="Motel" type="xs:string"/>
      </xs:choice>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    let report = validate("<Hotels><Motel>ok</Motel></Hotels>", xsd);
    assert_eq!(report.len(), 1, "report: {}", report.render());
    let msg = &report.messages[0];
    assert_eq!(msg.severity, Severity::Warning);
    assert!(msg.text.contains("xs:choice"));
    // Compile warnings carry no position
    assert_eq!(msg.line, None);
    assert!(msg.to_string().starts_with("Warning: "));
}

#[test]
fn rendering_joins_diagnostics_line_per_message() {
    let xml = "<Hotels><Hotel Rating=\"0\"><Name>A</Name></Hotel></Hotels>";
    let report = validate(xml, HOTELS_XSD);
    assert_eq!(report.len(), 1);

    let rendered = report.render();
    assert!(rendered.starts_with("Error (line 1, pos "));
    assert!(!rendered.contains('\n'));
}

#[test]
fn missing_file_locator_is_a_retrieval_error() {
    // A bare file name that does not exist must not be mistaken for
    // document text
    let result = hoteldir::fetch("DefinitelyMissingHotels.xml");
    assert!(matches!(result, Err(hoteldir::Error::Resource(_))));
}

#[test]
fn validation_is_independent_per_call() {
    // No state leaks between runs: the same inputs give the same report
    let xml = "<Hotels><Hotel><Phone>555</Phone></Hotel></Hotels>";
    let first = validate(xml, HOTELS_XSD);
    let second = validate(xml, HOTELS_XSD);
    assert_eq!(first.len(), second.len());
    assert_eq!(first.render(), second.render());
}
