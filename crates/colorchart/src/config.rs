use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Profiling run configuration.
///
/// The JSON file uses human-readable space-separated keys (a long-standing
/// convention of this tool's config files); unknown keys are ignored and
/// absent keys keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    #[serde(rename = "input cht file")]
    pub input_cht_file: String,
    #[serde(rename = "input cie file")]
    pub input_cie_file: String,
    #[serde(rename = "output directory")]
    pub output_directory: String,
    #[serde(rename = "output image file")]
    pub output_image_file: String,
    #[serde(rename = "feducial marks file")]
    pub fiducial_marks_file: String,
    #[serde(rename = "output generate file")]
    pub output_generate_file: String,
    pub scanin: String,
    pub dcamprof: String,
    #[serde(rename = "dcamprof opt json")]
    pub dcamprof_opt_json: String,
    #[serde(rename = "dcamprof opt dcp")]
    pub dcamprof_opt_dcp: String,
    #[serde(rename = "output ti3 file")]
    pub output_ti3_file: String,
    #[serde(rename = "output json file")]
    pub output_json_file: String,
    #[serde(rename = "calibration illuminant")]
    pub calibration_illuminant: String,
    #[serde(rename = "output dcp file")]
    pub output_dcp_file: String,
    #[serde(rename = "unique camera name")]
    pub unique_camera_name: String,
    #[serde(rename = "profile name")]
    pub profile_name: String,
    #[serde(rename = "number of crops")]
    pub number_of_crops: i64,
    #[serde(rename = "label font")]
    pub label_font: String,
    #[serde(rename = "label font size")]
    pub label_font_size: u32,
    #[serde(rename = "folder separator")]
    pub folder_separator: String,
    pub executor: String,
    #[serde(rename = "max process image width")]
    pub max_process_image_width: u32,
    #[serde(rename = "max process image height")]
    pub max_process_image_height: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            input_cht_file: String::new(),
            input_cie_file: String::new(),
            output_directory: String::new(),
            output_image_file: String::from("Image.tif"),
            fiducial_marks_file: String::from("FiducialMarks.txt"),
            output_generate_file: String::new(),
            scanin: String::new(),
            dcamprof: String::new(),
            dcamprof_opt_json: String::from("make-profile"),
            dcamprof_opt_dcp: String::from("make-dcp"),
            output_ti3_file: String::from("Image.ti3"),
            output_json_file: String::from("Image.json"),
            calibration_illuminant: String::from("D50"),
            output_dcp_file: String::from("Image.dcp"),
            unique_camera_name: String::from("Camera"),
            profile_name: String::from("Profile"),
            number_of_crops: 1,
            label_font: String::from("Arial"),
            label_font_size: 14,
            folder_separator: std::path::MAIN_SEPARATOR.to_string(),
            executor: default_executor(),
            max_process_image_width: 2048,
            max_process_image_height: 2048,
        }
    }
}

fn default_executor() -> String {
    if cfg!(windows) {
        String::from("{}")
    } else {
        String::from("sh -exc .\\ {}")
    }
}

impl ProfileConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Number of interactive crop passes, clamped to be non-negative.
    pub fn crop_count(&self) -> usize {
        self.number_of_crops.max(0) as usize
    }
}
