use serde::{Deserialize, Serialize};

/// One identified item in the photo, as returned to the caller.
/// Field names follow the wire contract the UI consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub material_type: String,
    #[serde(default)]
    pub recyclable: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub preparation: String,
    #[serde(rename = "binType", default)]
    pub bin_type: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub materials: Vec<MaterialRecord>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recyclability {
    Yes,
    No,
    Conditional,
}

impl std::fmt::Display for Recyclability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Recyclability::Yes => "Recyclable",
            Recyclability::No => "Not Recyclable",
            Recyclability::Conditional => "Conditionally Recyclable",
        };
        write!(f, "{}", s)
    }
}

impl Recyclability {
    /// Case-insensitive read of the model's `recyclable` label.
    /// Anything outside the known vocabulary classifies as Conditional.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "yes" => Recyclability::Yes,
            "no" => Recyclability::No,
            _ => Recyclability::Conditional,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialCategory {
    Plastic,
    Paper,
    Metal,
    Glass,
    Organic,
    Other,
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MaterialCategory::Plastic => "plastic",
            MaterialCategory::Paper => "paper",
            MaterialCategory::Metal => "metal",
            MaterialCategory::Glass => "glass",
            MaterialCategory::Organic => "organic",
            MaterialCategory::Other => "other",
        };
        write!(f, "{}", s)
    }
}

impl MaterialCategory {
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "plastic" => MaterialCategory::Plastic,
            "paper" | "cardboard" => MaterialCategory::Paper,
            "metal" => MaterialCategory::Metal,
            "glass" => MaterialCategory::Glass,
            "organic" => MaterialCategory::Organic,
            _ => MaterialCategory::Other,
        }
    }
}

impl MaterialRecord {
    /// The record keeps the model's labels verbatim; these helpers give
    /// downstream code the classified view.
    pub fn recyclability(&self) -> Recyclability {
        Recyclability::from_label(&self.recyclable)
    }

    pub fn category(&self) -> MaterialCategory {
        MaterialCategory::from_label(&self.material_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recyclability_is_case_insensitive() {
        assert_eq!(Recyclability::from_label("YES"), Recyclability::Yes);
        assert_eq!(Recyclability::from_label("yes"), Recyclability::Yes);
        assert_eq!(Recyclability::from_label("Yes"), Recyclability::Yes);
        assert_eq!(Recyclability::from_label("No"), Recyclability::No);
        assert_eq!(
            Recyclability::from_label("CONDITIONAL"),
            Recyclability::Conditional
        );
    }

    #[test]
    fn test_unknown_recyclable_label_classifies_as_conditional() {
        assert_eq!(
            Recyclability::from_label("depends on your council"),
            Recyclability::Conditional
        );
        assert_eq!(Recyclability::from_label(""), Recyclability::Conditional);
    }

    #[test]
    fn test_category_maps_unknown_labels_to_other() {
        assert_eq!(MaterialCategory::from_label("Glass"), MaterialCategory::Glass);
        assert_eq!(
            MaterialCategory::from_label("tetra pak"),
            MaterialCategory::Other
        );
    }

    #[test]
    fn test_material_record_deserializes_with_missing_optionals() {
        let json = r#"{
            "name": "plastic water bottle",
            "type": "plastic",
            "recyclable": "yes",
            "instructions": "Rinse and place in the recycling bin."
        }"#;

        let record: MaterialRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.name, "plastic water bottle");
        assert_eq!(record.recyclability(), Recyclability::Yes);
        assert_eq!(record.category(), MaterialCategory::Plastic);
        assert!(record.preparation.is_empty());
        assert!(record.bin_type.is_empty());
        assert!(record.notes.is_empty());
    }

    #[test]
    fn test_bin_type_uses_wire_name() {
        let json = r#"{"name": "can", "binType": "metals bin"}"#;
        let record: MaterialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.bin_type, "metals bin");
    }
}
