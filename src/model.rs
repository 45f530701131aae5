//! Cluster assignment with a pre-trained K-Means pipeline
//!
//! The model artifact is produced elsewhere; this module only reads it and
//! applies it. Responses are one-hot encoded column by column and assigned to
//! the nearest centroid of the fitted linfa model.

use crate::data::read_artifact;
use crate::error::{LoadError, PredictionError};
use crate::survey::{Field, SurveyResponse};
use linfa::traits::Predict;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Identifier of a cluster, as used in the cluster metadata file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterLabel(String);

impl ClusterLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClusterLabel {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for ClusterLabel {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A historical survey respondent together with the cluster the model put them in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub response: SurveyResponse,
    pub label: ClusterLabel,
}

/// Anything that maps survey responses to cluster labels
pub trait ClusteringModel {
    fn name(&self) -> &str;

    /// Predict one label per response. Must be deterministic.
    fn predict(&self, responses: &[SurveyResponse]) -> Result<Vec<ClusterLabel>, PredictionError>;
}

/// Assign a cluster label to every response
///
/// The result has the same length and order as `responses`; a model that
/// returns anything else is rejected.
pub fn assign(
    model: &dyn ClusteringModel,
    responses: &[SurveyResponse],
) -> Result<Vec<ClusterLabel>, PredictionError> {
    let labels = model.predict(responses)?;
    if labels.len() != responses.len() {
        return Err(PredictionError::LengthMismatch {
            expected: responses.len(),
            actual: labels.len(),
        });
    }
    debug!(model = model.name(), rows = responses.len(), "assigned clusters");
    Ok(labels)
}

/// Assign labels to the historical population
pub fn label_population(
    model: &dyn ClusteringModel,
    responses: &[SurveyResponse],
) -> Result<Vec<Participant>, PredictionError> {
    let labels = assign(model, responses)?;
    Ok(responses
        .iter()
        .zip(labels)
        .map(|(response, label)| Participant {
            response: *response,
            label,
        })
        .collect())
}

/// Category vocabulary of each column, in the order the model was trained with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub age: Vec<String>,
    pub edu_level: Vec<String>,
    pub fav_animals: Vec<String>,
    pub fav_place: Vec<String>,
    pub gender: Vec<String>,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        let vocabulary = |field: Field| -> Vec<String> {
            field
                .answers()
                .iter()
                .map(|answer| answer.value.to_string())
                .collect()
        };
        Self {
            age: vocabulary(Field::Age),
            edu_level: vocabulary(Field::EduLevel),
            fav_animals: vocabulary(Field::FavAnimals),
            fav_place: vocabulary(Field::FavPlace),
            gender: vocabulary(Field::Gender),
        }
    }
}

impl OneHotEncoder {
    pub fn categories(&self, field: Field) -> &[String] {
        match field {
            Field::Age => &self.age,
            Field::EduLevel => &self.edu_level,
            Field::FavAnimals => &self.fav_animals,
            Field::FavPlace => &self.fav_place,
            Field::Gender => &self.gender,
        }
    }

    /// Number of columns of an encoded row
    pub fn width(&self) -> usize {
        Field::ALL.iter().map(|f| self.categories(*f).len()).sum()
    }

    /// Encode responses into a (n_responses, width) indicator matrix
    pub fn encode(&self, responses: &[SurveyResponse]) -> Result<Array2<f64>, PredictionError> {
        let mut records = Array2::zeros((responses.len(), self.width()));

        for (row, response) in responses.iter().enumerate() {
            let mut offset = 0;
            for answer in response.answers() {
                let categories = self.categories(answer.field);
                let position = categories
                    .iter()
                    .position(|c| c == answer.value)
                    .ok_or_else(|| PredictionError::UnknownCategory {
                        field: answer.field,
                        value: answer.value.to_string(),
                    })?;
                records[[row, offset + position]] = 1.0;
                offset += categories.len();
            }
        }

        Ok(records)
    }
}

/// On-disk form of the clustering pipeline
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    #[serde(default)]
    pub encoder: OneHotEncoder,
    /// Label of each centroid; `Cluster {i}` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<ClusterLabel>>,
    pub kmeans: KMeans<f64, L2Dist>,
}

/// Fitted K-Means model with its input encoding and label names
#[derive(Debug)]
pub struct KMeansPipeline {
    name: String,
    encoder: OneHotEncoder,
    kmeans: KMeans<f64, L2Dist>,
    labels: Vec<ClusterLabel>,
}

impl KMeansPipeline {
    /// Validate an artifact and turn it into a usable pipeline
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, String> {
        let centroids = artifact.kmeans.centroids();
        let n_clusters = centroids.nrows();

        if n_clusters == 0 {
            return Err("model has no centroids".to_string());
        }
        if centroids.ncols() != artifact.encoder.width() {
            return Err(format!(
                "encoder produces {} columns but centroids have {}",
                artifact.encoder.width(),
                centroids.ncols()
            ));
        }

        let labels = match artifact.labels {
            Some(labels) if labels.len() != n_clusters => {
                return Err(format!(
                    "{} labels given for {} centroids",
                    labels.len(),
                    n_clusters
                ));
            }
            Some(labels) => labels,
            None => (0..n_clusters)
                .map(|i| ClusterLabel::from(format!("Cluster {i}")))
                .collect(),
        };

        Ok(Self {
            name: artifact.name,
            encoder: artifact.encoder,
            kmeans: artifact.kmeans,
            labels,
        })
    }

    /// Load a pipeline from its JSON artifact
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = read_artifact(path)?;
        let artifact: ModelArtifact =
            serde_json::from_str(&text).map_err(|e| LoadError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let pipeline = Self::from_artifact(artifact).map_err(|reason| LoadError::Malformed {
            path: path.to_path_buf(),
            reason,
        })?;

        info!(
            model = %pipeline.name,
            clusters = pipeline.n_clusters(),
            "loaded clustering model"
        );
        Ok(pipeline)
    }

    pub fn n_clusters(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[ClusterLabel] {
        &self.labels
    }
}

impl ClusteringModel for KMeansPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, responses: &[SurveyResponse]) -> Result<Vec<ClusterLabel>, PredictionError> {
        if responses.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.encoder.encode(responses)?;
        let expected = self.kmeans.centroids().ncols();
        if records.ncols() != expected {
            return Err(PredictionError::FeatureWidth {
                expected,
                actual: records.ncols(),
            });
        }

        let indices: Array1<usize> = self.kmeans.predict(&records);
        indices
            .iter()
            .map(|&i| {
                self.labels
                    .get(i)
                    .cloned()
                    .ok_or(PredictionError::UnknownCentroid(i))
            })
            .collect()
    }
}
