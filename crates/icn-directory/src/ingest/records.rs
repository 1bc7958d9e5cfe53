//! Raw dataset records
//!
//! The export is one item per row with an embedded list of organizations
//! (one per organization × capability pairing). Ids arrive as strings or
//! numbers, so every scalar is read leniently and cleaned later.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One item (sector + item identity) with its organization rows
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawItem {
    #[serde(alias = "itemId", alias = "Item ID", deserialize_with = "lenient_string")]
    pub item_id: Option<String>,
    #[serde(alias = "itemName", alias = "Item Name", deserialize_with = "lenient_string")]
    pub item_name: Option<String>,
    #[serde(alias = "detailedItemName", alias = "Detailed Item Name", deserialize_with = "lenient_string")]
    pub detailed_item_name: Option<String>,
    #[serde(alias = "sectorName", alias = "Sector Name", deserialize_with = "lenient_string")]
    pub sector_name: Option<String>,
    #[serde(alias = "sectorMappingId", alias = "Sector Mapping ID", deserialize_with = "lenient_string")]
    pub sector_mapping_id: Option<String>,
    /// Kept raw so a malformed row can be skipped on its own
    #[serde(alias = "organisations")]
    pub organizations: Vec<Value>,
}

/// One organization × capability row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOrganization {
    #[serde(
        alias = "organizationId",
        alias = "organisationId",
        alias = "Organisation: Organisation ID",
        deserialize_with = "lenient_string"
    )]
    pub organization_id: Option<String>,
    #[serde(
        alias = "organizationName",
        alias = "organisationName",
        alias = "Organisation: Organisation Name",
        deserialize_with = "lenient_string"
    )]
    pub organization_name: Option<String>,
    #[serde(alias = "capabilityId", alias = "Organisation Capability", deserialize_with = "lenient_string")]
    pub capability_id: Option<String>,
    #[serde(alias = "capabilityType", alias = "Capability Type", deserialize_with = "lenient_string")]
    pub capability_type: Option<String>,
    #[serde(alias = "sectorName", alias = "Sector Name", deserialize_with = "lenient_string")]
    pub sector_name: Option<String>,
    #[serde(alias = "validationDate", alias = "Validation Date", deserialize_with = "lenient_string")]
    pub validation_date: Option<String>,
    #[serde(alias = "Organisation: Billing Street", deserialize_with = "lenient_string")]
    pub street: Option<String>,
    #[serde(alias = "Organisation: Billing City", deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(alias = "Organisation: Billing State/Province", deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(
        alias = "postCode",
        alias = "Organisation: Billing Zip/Postal Code",
        deserialize_with = "lenient_string"
    )]
    pub postcode: Option<String>,
}

/// Accept a string, number or bool; anything else reads as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_ids_and_aliases() {
        let item: RawItem = serde_json::from_value(json!({
            "Item ID": 1042,
            "itemName": "Steel fabrication",
            "sector_name": "Defence",
            "organisations": [{"organisationId": "ORG-1"}]
        }))
        .unwrap();

        assert_eq!(item.item_id.as_deref(), Some("1042"));
        assert_eq!(item.item_name.as_deref(), Some("Steel fabrication"));
        assert_eq!(item.sector_name.as_deref(), Some("Defence"));
        assert_eq!(item.organizations.len(), 1);
    }

    #[test]
    fn test_objects_read_as_absent() {
        let org: RawOrganization =
            serde_json::from_value(json!({"organization_id": {"nested": true}, "city": null})).unwrap();
        assert_eq!(org.organization_id, None);
        assert_eq!(org.city, None);
    }
}
