//! Locations of every artifact, relative to the data directory

use std::path::{Path, PathBuf};

use crate::workflow_utils::PartialFiles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl ArtifactPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Source dataset
    pub fn source(&self) -> PathBuf {
        self.file("case_study_data.parquet")
    }

    pub fn unlabelled(&self) -> PathBuf {
        self.file("unlabelled_data.parquet")
    }

    pub fn classification_partials(&self) -> PartialFiles {
        PartialFiles::new(self.file("data"), "zkp_projects_pred_")
    }

    pub fn predictions(&self) -> PathBuf {
        self.file("final_zkp_predictions.parquet")
    }

    pub fn curation_partials(&self) -> PartialFiles {
        PartialFiles::new(self.file("curated_data"), "zkp_projects_pred_curated_")
    }

    pub fn curated(&self) -> PathBuf {
        self.file("curated_zkp_predictions.parquet")
    }

    pub fn mining_partials(&self) -> PartialFiles {
        PartialFiles::new(self.file("dimensions"), "zkp_projects_dim_")
    }

    pub fn mined_dimensions(&self) -> PathBuf {
        self.file("zkp_projects_dimensions.parquet")
    }

    /// Agreed dimension set as JSON text
    pub fn comparison_dimensions(&self) -> PathBuf {
        self.file("comparison_dimensions.json")
    }

    pub fn extraction_partials(&self) -> PartialFiles {
        PartialFiles::new(self.file("extract_dimensions"), "zkp_projects_extracted_dim_")
    }

    pub fn extracted_dimensions(&self) -> PathBuf {
        self.file("zkp_predictions_extracted_dimensions.parquet")
    }

    pub fn comparison_table(&self) -> PathBuf {
        self.file("project_comparison_dimensions.parquet")
    }

    pub fn comparison_sheet(&self) -> PathBuf {
        self.file("project_comparison_dimensions.xlsx")
    }

    pub fn filtered_table(&self) -> PathBuf {
        self.file("project_comparison_dimensions_filtered.parquet")
    }

    pub fn filtered_sheet(&self) -> PathBuf {
        self.file("project_comparison_dimensions_filtered.xlsx")
    }

    pub fn comparison_json(&self) -> PathBuf {
        self.file("zkp_comparison.json")
    }

    pub fn report(&self) -> PathBuf {
        self.file("pipeline_report.yaml")
    }
}
