//! Power profile library document and its flat record form
//!
//! The upstream `/library` endpoint groups models by manufacturer:
//!
//! ```json
//! {"manufacturers": [{"full_name": "Signify", "dir_name": "signify",
//!   "models": [{"id": "LCT010", "name": "Hue White and Color", ...}]}]}
//! ```
//!
//! Views work on one flat [`PowerProfile`] per model, converted to a
//! [`Record`] so the aggregation and filter code can address fields by path
//! (`manufacturer.fullName`, `deviceType`, ...).

use crate::core::error::{DashResult, LibraryError};
use crate::core::field::Record;
use serde::{Deserialize, Serialize};

/// Kind of device a profile describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Camera,
    Cover,
    Fan,
    GenericIot,
    Light,
    PowerMeter,
    Printer,
    Network,
    SmartDimmer,
    SmartSpeaker,
    SmartSwitch,
    VacuumRobot,
}

/// Light color mode measured by a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Brightness,
    ColorTemp,
    Hs,
    Effect,
}

/// Model entry as delivered by the library endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryModel {
    pub id: String,
    pub name: String,
    pub device_type: String,
    #[serde(default)]
    pub color_modes: Option<Vec<String>>,
    #[serde(default)]
    pub aliases: Option<Vec<String>>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_info: Option<AuthorInfo>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub measure_device: String,
    #[serde(default)]
    pub measure_method: String,
    #[serde(default)]
    pub measure_description: String,
    #[serde(default)]
    pub calculation_strategy: String,
    #[serde(default)]
    pub max_power: Option<f64>,
    #[serde(default)]
    pub standby_power: f64,
    #[serde(default)]
    pub standby_power_on: Option<f64>,
    #[serde(default)]
    pub sub_profile_count: u32,
}

/// Contributor details attached to a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryManufacturer {
    pub full_name: String,
    pub dir_name: String,
    #[serde(default)]
    pub models: Vec<LibraryModel>,
}

/// The full library document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryDocument {
    #[serde(default)]
    pub manufacturers: Vec<LibraryManufacturer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manufacturer {
    pub full_name: String,
    pub dir_name: String,
}

/// Profile author; `githubUsername` is empty when unknown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    pub email: Option<String>,
    pub github_username: String,
}

impl Author {
    /// Prefer `author_info`, falling back to the plain `author` string for the name
    fn from_model(model: &LibraryModel) -> Self {
        let info = model.author_info.clone().unwrap_or_default();
        Self {
            name: info
                .name
                .or_else(|| model.author.clone())
                .unwrap_or_default(),
            email: info.email,
            github_username: info.github.unwrap_or_default(),
        }
    }
}

/// Flat per-model record used by the grid and statistics views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerProfile {
    pub manufacturer: Manufacturer,
    pub model_id: String,
    pub name: String,

    /// Aliases joined with `|` so a global text search can match them
    pub aliases: String,
    pub device_type: String,
    pub color_modes: Vec<String>,
    pub author: Author,
    pub updated_at: Option<String>,
    pub created_at: String,
    pub description: String,
    pub measure_device: String,
    pub measure_method: String,
    pub measure_description: String,
    pub calculation_strategy: String,

    /// Only present when strictly positive
    pub max_power: Option<f64>,
    pub standby_power: f64,
    pub standby_power_on: Option<f64>,
    pub sub_profile_count: u32,
}

impl PowerProfile {
    pub fn from_model(model: &LibraryModel, manufacturer: &LibraryManufacturer) -> Self {
        Self {
            manufacturer: Manufacturer {
                full_name: manufacturer.full_name.clone(),
                dir_name: manufacturer.dir_name.clone(),
            },
            model_id: model.id.clone(),
            name: model.name.clone(),
            aliases: model.aliases.as_deref().unwrap_or_default().join("|"),
            device_type: model.device_type.clone(),
            color_modes: model.color_modes.clone().unwrap_or_default(),
            author: Author::from_model(model),
            updated_at: model.updated_at.clone(),
            created_at: model.created_at.clone(),
            description: model.description.clone(),
            measure_device: model.measure_device.clone(),
            measure_method: model.measure_method.clone(),
            measure_description: model.measure_description.clone(),
            calculation_strategy: model.calculation_strategy.clone(),
            max_power: model.max_power.filter(|p| *p > 0.0),
            standby_power: model.standby_power,
            standby_power_on: model.standby_power_on,
            sub_profile_count: model.sub_profile_count,
        }
    }

    /// Known device type, if the upstream value is one
    pub fn device_kind(&self) -> Option<DeviceType> {
        serde_json::from_value(serde_json::Value::String(self.device_type.clone())).ok()
    }

    /// Detail page path: `/profiles/{manufacturer dir}/{model id}`
    pub fn detail_path(&self) -> String {
        format!("/profiles/{}/{}", self.manufacturer.dir_name, self.model_id)
    }

    pub fn to_record(&self) -> DashResult<Record> {
        serde_json::to_value(self).map_err(|e| {
            LibraryError::RecordConversion {
                model_id: self.model_id.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

impl LibraryDocument {
    pub fn from_json_str(json: &str) -> DashResult<Self> {
        let document: Self = serde_json::from_str(json)?;
        tracing::debug!(
            manufacturers = document.manufacturers.len(),
            "Loaded library document"
        );
        Ok(document)
    }

    /// One profile per model, in document order
    pub fn profiles(&self) -> Vec<PowerProfile> {
        self.manufacturers
            .iter()
            .flat_map(|m| m.models.iter().map(move |model| PowerProfile::from_model(model, m)))
            .collect()
    }

    pub fn records(&self) -> DashResult<Vec<Record>> {
        profiles_to_records(&self.profiles())
    }
}

pub fn profiles_to_records(profiles: &[PowerProfile]) -> DashResult<Vec<Record>> {
    profiles.iter().map(PowerProfile::to_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LIBRARY: &str = r#"{
        "manufacturers": [
            {
                "full_name": "Signify",
                "dir_name": "signify",
                "models": [
                    {
                        "id": "LCT010",
                        "name": "Hue White and Color Ambiance A19",
                        "device_type": "light",
                        "color_modes": ["hs", "color_temp"],
                        "aliases": ["LCT015", "LCT016"],
                        "author": "Bram",
                        "author_info": {"name": "Bram Gerritsen", "email": "bram@example.org", "github": "bramstroker"},
                        "created_at": "2021-05-01T12:00:00",
                        "updated_at": "2023-02-01T12:00:00",
                        "measure_device": "Shelly Plug S",
                        "measure_method": "script",
                        "calculation_strategy": "lut",
                        "max_power": 0,
                        "standby_power": 0.4,
                        "sub_profile_count": 0
                    }
                ]
            },
            {
                "full_name": "IKEA",
                "dir_name": "ikea",
                "models": [
                    {
                        "id": "E1603",
                        "name": "Tradfri control outlet",
                        "device_type": "smart_switch",
                        "created_at": "2022-01-01T00:00:00",
                        "max_power": 3.5,
                        "standby_power": 0.3
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_flatten_profiles() {
        let document = LibraryDocument::from_json_str(LIBRARY).expect("should parse");
        let profiles = document.profiles();
        assert_eq!(profiles.len(), 2);

        let hue = &profiles[0];
        assert_eq!(hue.manufacturer.full_name, "Signify");
        assert_eq!(hue.aliases, "LCT015|LCT016");
        assert_eq!(hue.color_modes, vec!["hs", "color_temp"]);
        assert_eq!(hue.max_power, None);
        assert_eq!(hue.device_kind(), Some(DeviceType::Light));
        assert_eq!(hue.detail_path(), "/profiles/signify/LCT010");
        assert_eq!(hue.author.name, "Bram Gerritsen");
        assert_eq!(hue.author.github_username, "bramstroker");

        let outlet = &profiles[1];
        assert_eq!(outlet.aliases, "");
        assert!(outlet.color_modes.is_empty());
        assert_eq!(outlet.max_power, Some(3.5));
        assert_eq!(outlet.author, Author::default());
        assert_eq!(outlet.device_kind(), Some(DeviceType::SmartSwitch));
    }

    #[test]
    fn test_records_use_camel_case_paths() {
        let document = LibraryDocument::from_json_str(LIBRARY).expect("should parse");
        let records = document.records().expect("should convert");
        assert_eq!(records[0]["manufacturer"]["fullName"], json!("Signify"));
        assert_eq!(records[0]["deviceType"], json!("light"));
        assert_eq!(records[0]["author"]["githubUsername"], json!("bramstroker"));
        assert_eq!(records[1]["author"]["githubUsername"], json!(""));
    }

    #[test]
    fn test_unknown_device_type() {
        let document = LibraryDocument::from_json_str(
            r#"{"manufacturers":[{"full_name":"X","dir_name":"x","models":[
                {"id":"1","name":"n","device_type":"toaster","created_at":"2024-01-01"}]}]}"#,
        )
        .expect("should parse");
        assert_eq!(document.profiles()[0].device_kind(), None);
    }

    #[test]
    fn test_invalid_document() {
        let err = LibraryDocument::from_json_str("{\"manufacturers\": 3}").unwrap_err();
        assert_eq!(err.error_code(), "LIBRARY_INVALID_JSON");
    }

    #[test]
    fn test_author_name_falls_back_to_plain_author() {
        let document = LibraryDocument::from_json_str(
            r#"{"manufacturers":[{"full_name":"X","dir_name":"x","models":[
                {"id":"1","name":"n","device_type":"fan","created_at":"2024-01-01","author":"alice"}]}]}"#,
        )
        .expect("should parse");
        let author = &document.profiles()[0].author;
        assert_eq!(author.name, "alice");
        assert_eq!(author.github_username, "");
        assert_eq!(author.email, None);
    }

    #[test]
    fn test_empty_document() {
        let document = LibraryDocument::from_json_str("{}").expect("should parse");
        assert!(document.profiles().is_empty());
    }
}
