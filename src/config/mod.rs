//! Dashboard configuration loading and management

use crate::core::error::{ConfigError, DashError, DashResult};
use crate::core::field::FieldPath;
use crate::core::filter::MatchMode;
use crate::core::query::FilterParamMap;
use crate::core::visibility::ColumnVisibility;
use crate::stats::StatisticPage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for one grid column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Field path of the column (e.g. "manufacturer.fullName")
    pub id: FieldPath,

    /// Column header
    pub header: String,

    /// How the column filter matches cell values
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Visible by default
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

fn default_limit() -> usize {
    10
}

/// Complete configuration of the library views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// URL parameter name -> column field path
    pub filter_params: FilterParamMap,

    /// Grid columns
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,

    /// "Top N" statistics pages
    #[serde(default)]
    pub statistics: Vec<StatisticPage>,

    /// Initial row count of statistics tables
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> DashResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DashError::Config(ConfigError::FileNotFound {
                path: path.to_string(),
            }),
            _ => DashError::from(e),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> DashResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty logical names and empty field paths
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, field) in self.filter_params.iter() {
            if name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "filter_params".to_string(),
                    value: field.to_string(),
                    message: "logical filter name must not be empty".to_string(),
                });
            }
            if field.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("filter_params.{}", name),
                    value: field.to_string(),
                    message: "field path must not be empty".to_string(),
                });
            }
        }
        for page in &self.statistics {
            if page.selector.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("statistics.{}.selector", page.slug),
                    value: page.selector.to_string(),
                    message: "selector must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn filter_param_map(&self) -> &FilterParamMap {
        &self.filter_params
    }

    /// Filter match mode per column
    pub fn match_modes(&self) -> HashMap<FieldPath, MatchMode> {
        self.columns
            .iter()
            .map(|c| (c.id.clone(), c.match_mode))
            .collect()
    }

    /// Visibility before any user preference is applied
    pub fn default_visibility(&self) -> ColumnVisibility {
        self.columns
            .iter()
            .map(|c| (c.id.to_string(), c.visible))
            .collect()
    }

    /// Find a statistics page by slug
    pub fn statistic(&self, slug: &str) -> Option<&StatisticPage> {
        self.statistics.iter().find(|page| page.slug == slug)
    }

    /// The power profile library dashboard layout
    pub fn default_config() -> Self {
        let filter_params = FilterParamMap::new()
            .with("manufacturer", "manufacturer.fullName")
            .with("colorMode", "colorModes")
            .with("deviceType", "deviceType")
            .with("author", "author.githubUsername")
            .with("measureDevice", "measureDevice")
            .with("calculationStrategy", "calculationStrategy")
            .with("measureMethod", "measureMethod");

        let column = |id: &str, header: &str, match_mode: MatchMode, visible: bool| ColumnConfig {
            id: FieldPath::parse(id),
            header: header.to_string(),
            match_mode,
            visible,
        };

        let columns = vec![
            column("deviceType", "Device type", MatchMode::Equals, true),
            column("manufacturer.fullName", "Manufacturer", MatchMode::Equals, true),
            column("modelId", "Model", MatchMode::Contains, true),
            column("name", "Name", MatchMode::Contains, true),
            column("aliases", "Aliases", MatchMode::Contains, true),
            column("colorModes", "Color Modes", MatchMode::AnyContains, false),
            column("author.name", "Author", MatchMode::Contains, false),
            column("author.githubUsername", "GitHub", MatchMode::Equals, false),
            column("measureMethod", "Measure method", MatchMode::Contains, false),
            column("measureDevice", "Measure device", MatchMode::Equals, false),
            column("standbyPower", "Standby power", MatchMode::Contains, false),
            column("standbyPowerOn", "Standby power on", MatchMode::Contains, false),
            column("maxPower", "Max power", MatchMode::Contains, false),
            column("updatedAt", "Updated", MatchMode::Contains, false),
            column("createdAt", "Created", MatchMode::Contains, false),
            column("calculationStrategy", "Calculation strategy", MatchMode::Contains, false),
            column("subProfileCount", "Sub profile count", MatchMode::Contains, false),
        ];

        let page = |slug: &str, title: &str, label: &str, selector: &str, param: Option<&str>| {
            StatisticPage {
                slug: slug.to_string(),
                title: title.to_string(),
                name_column_label: label.to_string(),
                selector: FieldPath::parse(selector),
                filter_query_param: param.map(str::to_string),
            }
        };

        let statistics = vec![
            page(
                "top-manufacturers",
                "Top 10 Most Common Manufacturers",
                "Manufacturer",
                "manufacturer.fullName",
                Some("manufacturer"),
            ),
            page(
                "top-device-types",
                "Top 10 Most Common Device Types",
                "Device Type",
                "deviceType",
                None,
            ),
            page(
                "top-authors",
                "Top 10 Most Active Authors",
                "Author",
                "author.name",
                None,
            ),
            page(
                "top-contributors",
                "Top 10 Most Active Contributors",
                "Author",
                "author.githubUsername",
                Some("author"),
            ),
            page(
                "top-measure-devices",
                "Top 10 Most Used Measure Devices",
                "Measure Device",
                "measureDevice",
                None,
            ),
        ];

        Self {
            filter_params,
            columns,
            statistics,
            default_limit: default_limit(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
