//! Output generation for the external calibration tools.
//!
//! Produces the fiducial-marks file and the `scanin`/`dcamprof` command
//! script. The corner order in the marks depends on the user's start
//! corner and is an exact contract with `scanin`; the command-line shapes
//! are likewise fixed by the downstream tools.

use std::fs;

use colorchart_core::{Quad, StartCorner};

use crate::config::ProfileConfig;

#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("output image name is not defined")]
    MissingImageName,
    #[error("generate file name is not defined")]
    MissingGenerateFile,
    #[error("scanin tool is not defined")]
    MissingScanin,
    #[error("dcamprof tool is not defined")]
    MissingDcamprof,
}

/// Fiducial pixel coordinates at native image resolution, ordered from the
/// user's start corner onward in canonical winding.
///
/// The frame is stored at the display proportion captured when marking
/// began; dividing by that proportion recovers image pixels. Truncation
/// matches the downstream tool's integer expectations.
pub fn fiducial_marks(
    frame: &Quad,
    start_corner: StartCorner,
    capture_proportion: f32,
) -> [i32; 8] {
    let ordered = start_corner.corner_cycle(frame);
    let mut out = [0i32; 8];
    for (i, p) in ordered.iter().enumerate() {
        out[2 * i] = (p.x / capture_proportion) as i32;
        out[2 * i + 1] = (p.y / capture_proportion) as i32;
    }
    out
}

/// The marks file content: eight integers, comma-joined.
pub fn fiducial_marks_line(marks: &[i32; 8]) -> String {
    marks
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Everything ready to be written: file contents plus their target paths
/// (built with the configured folder separator, since the same strings are
/// embedded into the generated commands).
#[derive(Clone, Debug)]
pub struct GeneratedFiles {
    pub output_directory: String,
    pub fiducial_marks_path: String,
    pub fiducial_marks: String,
    pub script_path: String,
    pub script: String,
}

impl GeneratedFiles {
    /// Write the marks file and command script, creating the output
    /// directory if needed. Running the script is the process
    /// collaborator's job.
    pub fn write(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.output_directory)?;
        fs::write(&self.fiducial_marks_path, &self.fiducial_marks)?;
        fs::write(&self.script_path, &self.script)?;
        Ok(())
    }
}

/// Assemble the fiducial-marks file and the calibration command script.
pub fn build_outputs(
    cfg: &ProfileConfig,
    marks: &[i32; 8],
) -> Result<GeneratedFiles, GenerateError> {
    let sep = &cfg.folder_separator;
    let out_dir = if cfg.output_directory.is_empty() {
        "."
    } else {
        cfg.output_directory.as_str()
    };

    if cfg.output_image_file.is_empty() {
        return Err(GenerateError::MissingImageName);
    }
    let image_file = format!("{out_dir}{sep}{}", cfg.output_image_file);

    let marks_name = if cfg.fiducial_marks_file.is_empty() {
        "FiducialMarks.txt"
    } else {
        cfg.fiducial_marks_file.as_str()
    };
    let fiducial_marks_path = format!("{out_dir}{sep}{marks_name}");
    let fid = fiducial_marks_line(marks);

    if cfg.output_generate_file.is_empty() {
        return Err(GenerateError::MissingGenerateFile);
    }
    let script_path = format!("{out_dir}{sep}{}", cfg.output_generate_file);

    if cfg.scanin.is_empty() {
        return Err(GenerateError::MissingScanin);
    }
    if cfg.dcamprof.is_empty() {
        return Err(GenerateError::MissingDcamprof);
    }

    let cie_file = if cfg.input_cie_file.is_empty() {
        default_cie_path(&cfg.input_cht_file)
    } else {
        cfg.input_cie_file.clone()
    };
    let ti3_name = if cfg.output_ti3_file.is_empty() {
        "Output.ti3"
    } else {
        cfg.output_ti3_file.as_str()
    };
    let ti3_file = format!("{out_dir}{sep}{ti3_name}");
    let json_name = if cfg.output_json_file.is_empty() {
        "Output.json"
    } else {
        cfg.output_json_file.as_str()
    };
    let json_file = format!("{out_dir}{sep}{json_name}");
    let dcp_name = if cfg.output_dcp_file.is_empty() {
        "Output.dcp"
    } else {
        cfg.output_dcp_file.as_str()
    };
    let dcp_file = format!("{out_dir}{sep}{dcp_name}");

    let scanin_cmd = format!(
        ".{sep}{} -dipn -F {fid} -O \"{ti3_file}\" \"{image_file}\" \"{}\" \"{cie_file}\" \"{out_dir}{sep}diag.tif\"\n",
        cfg.scanin, cfg.input_cht_file
    );
    let dcamprof_json_cmd = format!(
        ".{sep}{} {} -i {} \"{ti3_file}\" \"{json_file}\"\n",
        cfg.dcamprof, cfg.dcamprof_opt_json, cfg.calibration_illuminant
    );
    let dcamprof_dcp_cmd = format!(
        ".{sep}{} {} -n \"{}\" -d \"{}\" \"{json_file}\" \"{dcp_file}\"\n",
        cfg.dcamprof, cfg.dcamprof_opt_dcp, cfg.unique_camera_name, cfg.profile_name
    );

    Ok(GeneratedFiles {
        output_directory: out_dir.to_string(),
        fiducial_marks_path,
        fiducial_marks: fid,
        script_path,
        script: format!("{scanin_cmd}{dcamprof_json_cmd}{dcamprof_dcp_cmd}"),
    })
}

/// Default `.cie` reference path: the chart path with its three-letter
/// extension swapped for `cie`.
fn default_cie_path(cht: &str) -> String {
    let stem = cht
        .len()
        .checked_sub(3)
        .and_then(|i| cht.get(..i))
        .unwrap_or("");
    format!("{stem}cie")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn frame() -> Quad {
        Quad::new(
            Point2::new(10.0, 20.0),
            Point2::new(110.0, 22.0),
            Point2::new(112.0, 95.0),
            Point2::new(8.0, 93.0),
        )
    }

    fn tool_config() -> ProfileConfig {
        let mut cfg = ProfileConfig::default();
        cfg.input_cht_file = String::from("ColorChecker.cht");
        cfg.output_directory = String::from("out");
        cfg.output_generate_file = String::from("generate.sh");
        cfg.scanin = String::from("scanin");
        cfg.dcamprof = String::from("dcamprof");
        cfg.folder_separator = String::from("/");
        cfg
    }

    #[test]
    fn marks_follow_the_start_corner_cycle() {
        let f = frame();
        assert_eq!(
            fiducial_marks(&f, StartCorner::Lt, 1.0),
            [10, 20, 110, 22, 112, 95, 8, 93]
        );
        assert_eq!(
            fiducial_marks(&f, StartCorner::Rt, 1.0),
            [110, 22, 112, 95, 8, 93, 10, 20]
        );
        assert_eq!(
            fiducial_marks(&f, StartCorner::Rb, 1.0),
            [112, 95, 8, 93, 10, 20, 110, 22]
        );
        assert_eq!(
            fiducial_marks(&f, StartCorner::Lb, 1.0),
            [8, 93, 10, 20, 110, 22, 112, 95]
        );
    }

    #[test]
    fn marks_rescale_to_native_resolution() {
        let f = frame();
        // Frame captured at half zoom: native pixels are twice the stored
        // coordinates.
        let marks = fiducial_marks(&f, StartCorner::Lt, 0.5);
        assert_eq!(marks[0], 20);
        assert_eq!(marks[1], 40);
    }

    #[test]
    fn marks_line_is_comma_joined() {
        let marks = fiducial_marks(&frame(), StartCorner::Lt, 1.0);
        assert_eq!(fiducial_marks_line(&marks), "10,20,110,22,112,95,8,93");
    }

    #[test]
    fn script_contains_the_three_tool_invocations() {
        let cfg = tool_config();
        let marks = fiducial_marks(&frame(), StartCorner::Lt, 1.0);
        let files = build_outputs(&cfg, &marks).unwrap();
        assert_eq!(files.fiducial_marks_path, "out/FiducialMarks.txt");
        assert_eq!(files.fiducial_marks, "10,20,110,22,112,95,8,93");
        let lines: Vec<&str> = files.script.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "./scanin -dipn -F 10,20,110,22,112,95,8,93 -O \"out/Image.ti3\" \
             \"out/Image.tif\" \"ColorChecker.cht\" \"ColorChecker.cie\" \"out/diag.tif\""
        );
        assert_eq!(
            lines[1],
            "./dcamprof make-profile -i D50 \"out/Image.ti3\" \"out/Image.json\""
        );
        assert_eq!(
            lines[2],
            "./dcamprof make-dcp -n \"Camera\" -d \"Profile\" \"out/Image.json\" \"out/Image.dcp\""
        );
    }

    #[test]
    fn explicit_cie_file_wins_over_the_derived_one() {
        let mut cfg = tool_config();
        cfg.input_cie_file = String::from("custom.cie");
        let marks = [0i32; 8];
        let files = build_outputs(&cfg, &marks).unwrap();
        assert!(files.script.contains("\"custom.cie\""));
        assert!(!files.script.contains("ColorChecker.cie"));
    }

    #[test]
    fn missing_tools_are_typed_errors() {
        let marks = [0i32; 8];

        let mut cfg = tool_config();
        cfg.output_image_file = String::new();
        assert!(matches!(
            build_outputs(&cfg, &marks),
            Err(GenerateError::MissingImageName)
        ));

        let mut cfg = tool_config();
        cfg.output_generate_file = String::new();
        assert!(matches!(
            build_outputs(&cfg, &marks),
            Err(GenerateError::MissingGenerateFile)
        ));

        let mut cfg = tool_config();
        cfg.scanin = String::new();
        assert!(matches!(
            build_outputs(&cfg, &marks),
            Err(GenerateError::MissingScanin)
        ));

        let mut cfg = tool_config();
        cfg.dcamprof = String::new();
        assert!(matches!(
            build_outputs(&cfg, &marks),
            Err(GenerateError::MissingDcamprof)
        ));
    }

    #[test]
    fn empty_output_directory_defaults_to_cwd() {
        let mut cfg = tool_config();
        cfg.output_directory = String::new();
        let marks = [0i32; 8];
        let files = build_outputs(&cfg, &marks).unwrap();
        assert_eq!(files.fiducial_marks_path, "./FiducialMarks.txt");
    }

    #[test]
    fn writes_both_files_into_the_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = tool_config();
        cfg.output_directory = dir.path().join("nested").to_string_lossy().into_owned();
        let marks = fiducial_marks(&frame(), StartCorner::Rb, 1.0);
        let files = build_outputs(&cfg, &marks).unwrap();
        files.write().unwrap();
        let marks_content = std::fs::read_to_string(&files.fiducial_marks_path).unwrap();
        assert_eq!(marks_content, "112,95,8,93,10,20,110,22");
        let script_content = std::fs::read_to_string(&files.script_path).unwrap();
        assert!(script_content.ends_with('\n'));
    }
}
