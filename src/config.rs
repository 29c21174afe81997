//! Configuration for the motion vectorizer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::features::STATISTICS_PER_CHANNEL;
use crate::core::vectorizer::DEFAULT_METADATA_FIELDS;

/// Default window length in samples (one second at 90 Hz).
pub const DEFAULT_SAMPLING_RATE: usize = 90;

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Samples per window
    pub sampling_rate: usize,

    /// Tracked entities and their channel columns
    pub channel_groups: ChannelGroups,

    /// Per-recording identifier columns copied onto every feature vector
    pub metadata_fields: Vec<String>,

    /// Expected statistic dimensions; derived from the channel groups when unset
    #[serde(default)]
    pub expected_dimensions: Option<usize>,

    /// Directory layout and naming used by the aggregator
    pub aggregation: AggregationConfig,

    /// Where output tables are written unless a path is given explicitly
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("motion-vectorizer");

        Self {
            sampling_rate: DEFAULT_SAMPLING_RATE,
            channel_groups: ChannelGroups::default(),
            metadata_fields: DEFAULT_METADATA_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            expected_dimensions: None,
            aggregation: AggregationConfig::default(),
            output_dir: data_dir.join("output"),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.channel_groups.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("motion-vectorizer")
            .join("config.json")
    }

    /// Expected statistic dimensions for a full recording.
    pub fn expected_dimensions(&self) -> usize {
        self.expected_dimensions
            .unwrap_or_else(|| self.channel_groups.expected_dimensions())
    }

    /// Ensure the output directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

/// One tracked entity: three position axes and three Euler rotation axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelGroup {
    pub name: String,
    pub position: Vec<String>,
    pub rotation: Vec<String>,
}

impl ChannelGroup {
    /// Build a group using the `<name>_pos_<axis>` / `<name>_rot_<axis>` convention.
    pub fn with_axes(name: &str) -> Self {
        let axes = |kind: &str| -> Vec<String> {
            ["x", "y", "z"]
                .iter()
                .map(|axis| format!("{name}_{kind}_{axis}"))
                .collect()
        };
        Self {
            name: name.to_string(),
            position: axes("pos"),
            rotation: axes("rot"),
        }
    }

    /// Position channels followed by rotation channels.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.position
            .iter()
            .chain(self.rotation.iter())
            .map(String::as_str)
    }
}

/// Ordered set of channel groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelGroups(pub Vec<ChannelGroup>);

impl Default for ChannelGroups {
    fn default() -> Self {
        Self(
            ["head", "left_hand", "right_hand"]
                .iter()
                .map(|name| ChannelGroup::with_axes(name))
                .collect(),
        )
    }
}

impl ChannelGroups {
    /// Load channel groups from a standalone JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let groups: ChannelGroups =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        groups.validate()?;
        Ok(groups)
    }

    pub fn groups(&self) -> &[ChannelGroup] {
        &self.0
    }

    /// Every configured channel, in group order.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().flat_map(ChannelGroup::channels)
    }

    pub fn channel_count(&self) -> usize {
        self.channels().count()
    }

    /// Statistic dimensions produced when every channel is present.
    pub fn expected_dimensions(&self) -> usize {
        self.channel_count() * STATISTICS_PER_CHANNEL
    }

    /// Check group shape. Duplicate channel names are left to the
    /// vectorizer's dimension check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::Invalid("no channel groups configured".into()));
        }

        let mut names = BTreeSet::new();
        for group in &self.0 {
            if group.name.trim().is_empty() {
                return Err(ConfigError::Invalid("channel group with empty name".into()));
            }
            if !names.insert(group.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "channel group '{}' defined twice",
                    group.name
                )));
            }
            if group.position.len() != 3 || group.rotation.len() != 3 {
                return Err(ConfigError::Invalid(format!(
                    "channel group '{}' needs 3 position and 3 rotation channels, got {} and {}",
                    group.name,
                    group.position.len(),
                    group.rotation.len()
                )));
            }
            if group.channels().any(|c| c.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "channel group '{}' has an empty channel name",
                    group.name
                )));
            }
        }
        Ok(())
    }
}

/// Directory layout of raw per-subject recordings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Session folder names looked up under each subject
    pub sessions: Vec<String>,
    /// Folder inside each session holding the recordings
    pub motion_dir: String,
    /// File name suffix identifying a recording
    pub file_suffix: String,
    /// Column normalized to a canonical timestamp format, when present
    pub timestamp_column: Option<String>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            sessions: vec!["ses-A".to_string(), "ses-B".to_string()],
            motion_dir: "motion".to_string(),
            file_suffix: "_motion.tsv".to_string(),
            timestamp_column: Some("timestamp".to_string()),
        }
    }
}

impl AggregationConfig {
    /// Parse session names from a comma-separated string.
    pub fn sessions_from_csv(s: &str) -> Vec<String> {
        s.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sampling_rate, 90);
        assert_eq!(config.channel_groups.groups().len(), 3);
        assert_eq!(config.channel_groups.channel_count(), 18);
        assert_eq!(config.expected_dimensions(), 90);
        assert_eq!(config.metadata_fields, ["user", "subject", "session", "build"]);
    }

    #[test]
    fn test_default_channel_names() {
        let groups = ChannelGroups::default();
        let channels: Vec<&str> = groups.channels().collect();
        assert_eq!(channels[0], "head_pos_x");
        assert_eq!(channels[5], "head_rot_z");
        assert_eq!(channels[6], "left_hand_pos_x");
        assert_eq!(channels[17], "right_hand_rot_z");
        assert!(groups.validate().is_ok());
    }

    #[test]
    fn test_expected_dimensions_override() {
        let config = Config {
            expected_dimensions: Some(72),
            ..Config::default()
        };
        assert_eq!(config.expected_dimensions(), 72);
    }

    #[test]
    fn test_validate_rejects_short_group() {
        let mut group = ChannelGroup::with_axes("head");
        group.rotation.pop();
        let groups = ChannelGroups(vec![group]);
        assert!(matches!(groups.validate(), Err(ConfigError::Invalid(_))));

        assert!(ChannelGroups(Vec::new()).validate().is_err());
    }

    #[test]
    fn test_channel_groups_json_shape() {
        let json = serde_json::to_string(&ChannelGroups::default()).unwrap();
        let parsed: ChannelGroups = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ChannelGroups::default());
        assert!(json.starts_with('['));
    }

    #[test]
    fn test_sessions_parsing() {
        assert_eq!(
            AggregationConfig::sessions_from_csv("ses-A, ses-B,"),
            vec!["ses-A", "ses-B"]
        );
    }
}
