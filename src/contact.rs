//! Contacts – company and customer cards, with an optional raster logo and
//! an optional postal address.

use serde::{Deserialize, Serialize};

/// A company or customer shown on the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    /// Raw logo bytes (PNG or JPEG). Serialized as base64 in JSON.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "logo_base64"
    )]
    pub logo: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Free-form postal fields plus business identifiers. Empty fields are
/// simply skipped when the display lines are derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub address: String,
    #[serde(rename = "address_2", skip_serializing_if = "String::is_empty")]
    pub address2: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub business_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tax_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vat: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub iban: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bank_name: String,
}

impl Address {
    /// Derive the ordered display lines: address, address 2,
    /// "postal-code city", country, then the business identifiers. Lines
    /// whose source field is empty are omitted. Pure, no side effects.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.address.clone()];
        if !self.address2.is_empty() {
            lines.push(self.address2.clone());
        }
        if !self.postal_code.is_empty() {
            lines.push(format!("{} {}", self.postal_code, self.city));
        }
        if !self.country.is_empty() {
            lines.push(self.country.clone());
        }
        for id in [
            &self.business_id,
            &self.tax_id,
            &self.vat,
            &self.iban,
            &self.bank_name,
        ] {
            if !id.is_empty() {
                lines.push(id.clone());
            }
        }
        lines
    }
}

/// Serde adapter: logo bytes as a base64 string in JSON.
mod logo_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_str(&STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        match encoded {
            Some(s) => STANDARD
                .decode(s.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_address_lines_in_order() {
        let addr = Address {
            address: "89 Rue de Brest".to_string(),
            address2: "Appartement 2".to_string(),
            postal_code: "75000".to_string(),
            city: "Paris".to_string(),
            country: "France".to_string(),
            business_id: "21343214321".to_string(),
            tax_id: "215421543215".to_string(),
            vat: "45432523543".to_string(),
            iban: "HU1200005432503454350".to_string(),
            bank_name: "MehMeh bank".to_string(),
        };
        let lines = addr.lines();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "89 Rue de Brest");
        assert_eq!(lines[2], "75000 Paris");
        assert_eq!(lines[8], "MehMeh bank");
    }

    #[test]
    fn empty_fields_are_skipped() {
        let addr = Address {
            address: "1 Main St".to_string(),
            postal_code: "29200".to_string(),
            city: "Brest".to_string(),
            ..Address::default()
        };
        assert_eq!(addr.lines(), vec!["1 Main St", "29200 Brest"]);
    }

    #[test]
    fn logo_roundtrips_as_base64() {
        let contact = Contact {
            name: "ACME".to_string(),
            logo: Some(vec![1, 2, 3, 255]),
            address: None,
        };
        let json = serde_json::to_string(&contact).unwrap();
        assert!(json.contains("AQID/w=="));
        let back: Contact = serde_json::from_str(&json).unwrap();
        assert_eq!(back.logo, contact.logo);
    }
}
