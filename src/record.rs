use serde::Serialize;

use crate::geometry::SizeClass;

/// One manifest line per generated sample (`manifest.jsonl`). The `.txt`
/// label files remain the ground truth; this is machine-readable provenance
/// for the training side.
#[derive(Debug, Serialize)]
pub struct SampleRecord<'a> {
    pub schema: &'static str,
    pub image: String,
    pub label_file: String,
    pub label: &'a str,
    pub seed: u64,
    pub size_class: SizeClass,
    pub height: f64,
    pub radius: f64,
    pub azimuth: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl SampleRecord<'_> {
    pub const SCHEMA: &'static str = "v1";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_without_font_when_builtin() {
        let rec = SampleRecord {
            schema: SampleRecord::SCHEMA,
            image: "images/AB12_001.png".into(),
            label_file: "labels/AB12_001.txt".into(),
            label: "AB12",
            seed: 42,
            size_class: SizeClass::Medium,
            height: 3.0,
            radius: 0.8,
            azimuth: "front",
            font: None,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"schema\":\"v1\""));
        assert!(json.contains("\"size_class\":\"medium\""));
        assert!(!json.contains("font"));
    }
}
