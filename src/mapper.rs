//! Hotel-directory XML to JSON mapping
//!
//! A deterministic structural mapping for the hotel-record document shape,
//! not a generic XML-to-JSON transform. The mapper performs no validation:
//! it assumes the input was validated separately and degrades missing
//! structure to empty strings, arrays and objects instead of failing.
//!
//! Element-derived fields always appear (empty string when the element is
//! absent); attribute-derived fields (`_Rating`, `_NearestAirport`) appear
//! only when the attribute is present and non-empty. Both states of that
//! policy are deliberate and preserved through serialization.

use crate::documents::{Document, Element};
use crate::json::JsonValue;

const ADDRESS_FIELDS: [&str; 5] = ["Number", "Street", "City", "State", "Zip"];

/// Maps hotel-directory documents to the JSON value model
#[derive(Debug, Default)]
pub struct HotelMapper;

impl HotelMapper {
    /// Create a new mapper
    pub fn new() -> Self {
        Self
    }

    /// Map a parsed document to `{"Hotels":{"Hotel":[...]}}`
    ///
    /// The double nesting mirrors the source schema's wrapper shape. A
    /// document with no root or no `Hotel` children maps to an empty array.
    pub fn map(&self, doc: &Document) -> JsonValue {
        let mut hotels = JsonValue::array();
        if let Some(root) = doc.root() {
            for hotel in root.find_children("Hotel") {
                hotels.push(self.map_hotel(hotel));
            }
        }

        let mut wrapper = JsonValue::object();
        wrapper.insert("Hotel", hotels);

        let mut out = JsonValue::object();
        out.insert("Hotels", wrapper);
        out
    }

    /// Map one `Hotel` element; key order is Name, Phone, Address, _Rating
    fn map_hotel(&self, hotel: &Element) -> JsonValue {
        let mut obj = JsonValue::object();

        obj.insert("Name", hotel.child_text("Name").unwrap_or(""));

        let phones: Vec<JsonValue> = hotel
            .find_children("Phone")
            .iter()
            .map(|p| JsonValue::from(p.trimmed_text()))
            .collect();
        obj.insert("Phone", phones);

        obj.insert("Address", self.map_address(hotel.find_child("Address")));

        if let Some(rating) = hotel.attribute("Rating") {
            if !rating.is_empty() {
                obj.insert("_Rating", rating);
            }
        }

        obj
    }

    /// Map the `Address` child; an absent element yields an empty object so
    /// every hotel record keeps a uniform shape
    fn map_address(&self, address: Option<&Element>) -> JsonValue {
        let mut obj = JsonValue::object();
        let address = match address {
            Some(a) => a,
            None => return obj,
        };

        for field in ADDRESS_FIELDS {
            obj.insert(field, address.child_text(field).unwrap_or(""));
        }

        if let Some(airport) = address.attribute("NearestAirport") {
            if !airport.is_empty() {
                obj.insert("_NearestAirport", airport);
            }
        }

        obj
    }
}

/// Map hotel XML text straight to a JSON value tree
pub fn map_hotels(doc: &Document) -> JsonValue {
    HotelMapper::new().map(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::serialize;

    fn map(xml: &str) -> JsonValue {
        let doc = Document::from_string(xml).unwrap();
        map_hotels(&doc)
    }

    #[test]
    fn test_empty_directory() {
        let value = map("<Hotels/>");
        assert_eq!(serialize(&value), r#"{"Hotels":{"Hotel":[]}}"#);
    }

    #[test]
    fn test_key_order_per_hotel() {
        let value = map(
            r#"<Hotels><Hotel Rating="4"><Name>Plaza</Name><Phone>555</Phone><Address/></Hotel></Hotels>"#,
        );
        let json = serialize(&value);
        let name = json.find("\"Name\"").unwrap();
        let phone = json.find("\"Phone\"").unwrap();
        let address = json.find("\"Address\"").unwrap();
        let rating = json.find("\"_Rating\"").unwrap();
        assert!(name < phone && phone < address && address < rating);
    }

    #[test]
    fn test_missing_name_is_empty_string() {
        let value = map("<Hotels><Hotel/></Hotels>");
        let hotel = &value.get("Hotels").unwrap().get("Hotel").unwrap().as_array().unwrap()[0];
        assert_eq!(hotel.get("Name").and_then(JsonValue::as_str), Some(""));
    }

    #[test]
    fn test_no_phone_children_is_empty_array() {
        let value = map("<Hotels><Hotel><Name>A</Name></Hotel></Hotels>");
        let hotel = &value.get("Hotels").unwrap().get("Hotel").unwrap().as_array().unwrap()[0];
        let phones = hotel.get("Phone").unwrap().as_array().unwrap();
        assert!(phones.is_empty());
    }

    #[test]
    fn test_phones_in_document_order() {
        let value = map(
            "<Hotels><Hotel><Phone> 555-1111 </Phone><Phone>555-2222</Phone></Hotel></Hotels>",
        );
        let hotel = &value.get("Hotels").unwrap().get("Hotel").unwrap().as_array().unwrap()[0];
        let phones = hotel.get("Phone").unwrap().as_array().unwrap();
        assert_eq!(phones[0].as_str(), Some("555-1111"));
        assert_eq!(phones[1].as_str(), Some("555-2222"));
    }

    #[test]
    fn test_absent_address_is_empty_object() {
        let value = map("<Hotels><Hotel><Name>A</Name></Hotel></Hotels>");
        let hotel = &value.get("Hotels").unwrap().get("Hotel").unwrap().as_array().unwrap()[0];
        assert_eq!(hotel.get("Address"), Some(&JsonValue::object()));
    }

    #[test]
    fn test_address_fields_default_to_empty_string() {
        let value = map(
            "<Hotels><Hotel><Address><City>Metropolis</City></Address></Hotel></Hotels>",
        );
        let hotel = &value.get("Hotels").unwrap().get("Hotel").unwrap().as_array().unwrap()[0];
        let address = hotel.get("Address").unwrap();
        assert_eq!(address.get("Number").and_then(JsonValue::as_str), Some(""));
        assert_eq!(
            address.get("City").and_then(JsonValue::as_str),
            Some("Metropolis")
        );
        assert_eq!(address.get("Zip").and_then(JsonValue::as_str), Some(""));
    }

    #[test]
    fn test_empty_rating_attribute_is_omitted() {
        let value = map(r#"<Hotels><Hotel Rating=""><Name>A</Name></Hotel></Hotels>"#);
        let hotel = &value.get("Hotels").unwrap().get("Hotel").unwrap().as_array().unwrap()[0];
        assert_eq!(hotel.get("_Rating"), None);
    }

    #[test]
    fn test_nearest_airport_appended_last() {
        let value = map(
            r#"<Hotels><Hotel><Address NearestAirport="PHX"><City>Phoenix</City></Address></Hotel></Hotels>"#,
        );
        let hotel = &value.get("Hotels").unwrap().get("Hotel").unwrap().as_array().unwrap()[0];
        let json = serialize(hotel.get("Address").unwrap());
        assert!(json.ends_with(r#""_NearestAirport":"PHX"}"#));
    }

    #[test]
    fn test_empty_nearest_airport_is_omitted() {
        let value = map(
            r#"<Hotels><Hotel><Address NearestAirport=""><City>Phoenix</City></Address></Hotel></Hotels>"#,
        );
        let hotel = &value.get("Hotels").unwrap().get("Hotel").unwrap().as_array().unwrap()[0];
        assert_eq!(hotel.get("Address").unwrap().get("_NearestAirport"), None);
    }
}
