//! cohortscope: find the group of survey participants you are most similar to
//!
//! A pre-trained K-Means pipeline assigns every historical survey participant
//! and each new respondent to a cluster. The respondent then sees the name
//! and description of their cluster, how many people share it, and how the
//! answers of those people are distributed.

pub mod cli;
pub mod data;
pub mod error;
pub mod input;
pub mod locale;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod survey;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{ArtifactPaths, ArtifactStore, ClusterProfile, ClusterProfiles};
pub use error::{Error, LoadError, LookupError, PredictionError};
pub use locale::Language;
pub use model::{assign, ClusterLabel, ClusteringModel, KMeansPipeline, Participant};
pub use pipeline::DashboardContext;
pub use report::{build_report, CohortReport};
pub use survey::SurveyResponse;

/// Common result type used throughout the library
pub type Result<T, E = Error> = std::result::Result<T, E>;
