use anyhow::{Context, Result};
use serde::de;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::sentinel;

/// The field a repair job targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    City,
    Address,
}

impl Field {
    /// JSON key of the field inside a location record
    pub fn key(self) -> &'static str {
        match self {
            Field::City => "city",
            Field::Address => "address",
        }
    }
}

/// A single location record.
///
/// Backed by the raw JSON object so that fields this tool does not know about
/// survive the read-modify-write cycle verbatim and in their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(Map<String, Value>);

impl Location {
    /// Label used in progress lines and failure lists
    pub fn id_label(&self) -> String {
        match self.0.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "?".to_string(),
            Some(other) => other.to_string(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// `(lat, lng)` when both are present and numeric
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.0.get("lat")?.as_f64()?;
        let lng = self.0.get("lng")?.as_f64()?;
        Some((lat, lng))
    }

    pub fn city(&self) -> Option<&str> {
        self.str_field(Field::City.key())
    }

    pub fn address(&self) -> Option<&str> {
        self.str_field(Field::Address.key())
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.str_field(field.key())
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.set(Field::City, city);
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        // Existing keys keep their position; insert only appends for new keys
        self.0
            .insert(field.key().to_string(), Value::String(value.into()));
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// The whole `locations.json` document.
///
/// Top-level keys other than `locations` are kept as raw JSON, and the
/// position of `locations` among them is remembered so the document is
/// written back in its original key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub locations: Vec<Location>,
    other: Map<String, Value>,
    locations_at: usize,
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.other.len() + 1))?;
        for (idx, (key, value)) in self.other.iter().enumerate() {
            if idx == self.locations_at {
                map.serialize_entry("locations", &self.locations)?;
            }
            map.serialize_entry(key, value)?;
        }
        if self.locations_at >= self.other.len() {
            map.serialize_entry("locations", &self.locations)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let document = Map::<String, Value>::deserialize(deserializer)?;

        let mut locations = None;
        let mut other = Map::new();
        let mut locations_at = 0;
        for (idx, (key, value)) in document.into_iter().enumerate() {
            if key == "locations" {
                locations_at = idx;
                let records = Vec::<Location>::deserialize(value)
                    .map_err(<D::Error as de::Error>::custom)?;
                locations = Some(records);
            } else {
                other.insert(key, value);
            }
        }

        Ok(Self {
            locations: locations
                .ok_or_else(|| <D::Error as de::Error>::missing_field("locations"))?,
            other,
            locations_at,
        })
    }
}

impl Dataset {
    /// Load the dataset from disk
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        let dataset: Dataset = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;

        log::info!(
            "Loaded {} locations from {}",
            dataset.locations.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Overwrite the dataset file with the current in-memory state.
    ///
    /// Output is pretty-printed with two-space indentation and non-ASCII text
    /// (Hebrew names, cities) is written literally.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Failed to serialize dataset")?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write dataset {}", path.display()))?;

        log::info!("Saved {} locations to {}", self.locations.len(), path.display());
        Ok(())
    }

    /// Indices of the records whose `field` still holds the placeholder, in dataset order
    pub fn unresolved(&self, field: Field) -> Vec<usize> {
        self.locations
            .iter()
            .enumerate()
            .filter(|(_, loc)| sentinel::is_unresolved(loc.get(field)))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Number of records whose `field` still holds the placeholder
    pub fn unresolved_count(&self, field: Field) -> usize {
        self.locations
            .iter()
            .filter(|loc| sentinel::is_unresolved(loc.get(field)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
  "generated": "2024-05-01",
  "locations": [
    {
      "id": 1,
      "name": "Collection Point",
      "type": "battery",
      "lat": 32.794,
      "lng": 34.989,
      "city": "Unknown",
      "address": "Unknown"
    },
    {
      "id": "b-7",
      "name": "סופר פארם",
      "lat": 31.771,
      "lng": 35.217,
      "city": "ירושלים",
      "address": "יפו 1, ירושלים",
      "hours": null
    }
  ]
}"#;

    #[test]
    fn test_location_accessors() {
        let loc: Location = serde_json::from_value(json!({
            "id": 42,
            "name": "Collection Point",
            "lat": 32.08,
            "lng": 34.78,
            "city": "Unknown"
        }))
        .unwrap();

        assert_eq!(loc.id_label(), "42");
        assert_eq!(loc.name(), Some("Collection Point"));
        assert_eq!(loc.coordinates(), Some((32.08, 34.78)));
        assert_eq!(loc.city(), Some("Unknown"));
        assert_eq!(loc.address(), None);
    }

    #[test]
    fn test_coordinates_require_numbers() {
        let loc: Location =
            serde_json::from_value(json!({ "id": "x", "lat": "32.0", "lng": 34.0 })).unwrap();
        assert_eq!(loc.coordinates(), None);
        assert_eq!(loc.id_label(), "x");
    }

    #[test]
    fn test_unresolved_selection() {
        let dataset: Dataset = serde_json::from_value(json!({
            "locations": [
                { "id": 1, "city": "Unknown", "address": "" },
                { "id": 2, "city": "", "address": "Unknown" },
                { "id": 3, "city": "חיפה" },
                { "id": 4, "city": "Unknown", "address": "Unknown" }
            ]
        }))
        .unwrap();

        assert_eq!(dataset.unresolved(Field::City), vec![0, 3]);
        assert_eq!(dataset.unresolved(Field::Address), vec![1, 3]);
        assert_eq!(dataset.unresolved_count(Field::City), 2);
    }

    #[test]
    fn test_set_keeps_key_order() {
        let mut loc: Location = serde_json::from_value(json!({
            "id": 1,
            "city": "Unknown",
            "lat": 1.0
        }))
        .unwrap();
        loc.set_city("חיפה");

        let out = serde_json::to_string(&loc).unwrap();
        assert_eq!(out, r#"{"id":1,"city":"חיפה","lat":1.0}"#);
    }

    #[test]
    fn test_round_trip_preserves_document() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("locations.json");
        fs::write(&path, SAMPLE)?;

        let dataset = Dataset::load(&path)?;
        assert_eq!(dataset.locations.len(), 2);
        dataset.save(&path)?;

        let written = fs::read_to_string(&path)?;
        // Non-ASCII text stays literal
        assert!(written.contains("סופר פארם"));
        assert!(!written.contains("\\u"));

        let before: Value = serde_json::from_str(SAMPLE)?;
        let after: Value = serde_json::from_str(&written)?;
        assert_eq!(before, after);

        // Field order inside each record is unchanged
        let first_keys: Vec<&str> = after["locations"][0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            first_keys,
            vec!["id", "name", "type", "lat", "lng", "city", "address"]
        );

        Ok(())
    }

    #[test]
    fn test_round_trip_keeps_top_level_key_order() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("locations.json");
        fs::write(&path, r#"{"version":3,"locations":[],"updated":"x"}"#)?;

        Dataset::load(&path)?.save(&path)?;
        let written = fs::read_to_string(&path)?;

        let version = written.find("\"version\"").unwrap();
        let locations = written.find("\"locations\"").unwrap();
        let updated = written.find("\"updated\"").unwrap();
        assert!(version < locations && locations < updated, "{}", written);

        // Same with `locations` as the last key
        fs::write(&path, r#"{"b":1,"a":2,"locations":[{"id":1}]}"#)?;
        Dataset::load(&path)?.save(&path)?;
        let compact: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(
            serde_json::to_string(&compact)?,
            r#"{"b":1,"a":2,"locations":[{"id":1}]}"#
        );

        Ok(())
    }

    #[test]
    fn test_missing_locations_fails() {
        let err = serde_json::from_str::<Dataset>(r#"{"version":3}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `locations`"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = Dataset::load(&temp_dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset"));
    }
}
