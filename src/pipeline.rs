//! One-time initialization and per-interaction execution

use crate::data::{ArtifactStore, ClusterProfiles};
use crate::error::PredictionError;
use crate::model::{assign, label_population, ClusterLabel, ClusteringModel, Participant};
use crate::report::{build_report, CohortReport};
use crate::survey::SurveyResponse;
use crate::Result;
use tracing::{debug, info, warn};

/// Immutable state shared by every interaction of a session
///
/// Holds the loaded model and cluster metadata together with the historical
/// population, labeled once when the context is created.
pub struct DashboardContext<'a> {
    model: &'a dyn ClusteringModel,
    profiles: &'a ClusterProfiles,
    population: Vec<Participant>,
}

impl<'a> DashboardContext<'a> {
    /// Load every artifact from the store and label the historical population
    pub fn initialize(store: &'a ArtifactStore) -> Result<Self> {
        let model = store.model()?;
        let profiles = store.profiles()?;
        let participants = store.participants()?;
        Self::new(model, profiles, participants)
    }

    pub fn new(
        model: &'a dyn ClusteringModel,
        profiles: &'a ClusterProfiles,
        participants: &[SurveyResponse],
    ) -> Result<Self> {
        let population = label_population(model, participants)?;

        let unknown = population
            .iter()
            .filter(|p| !profiles.contains(&p.label))
            .count();
        if unknown > 0 {
            warn!(
                participants = unknown,
                "historical participants assigned to clusters missing from the metadata"
            );
        }

        info!(
            model = model.name(),
            participants = population.len(),
            clusters = profiles.len(),
            "dashboard ready"
        );
        Ok(Self {
            model,
            profiles,
            population,
        })
    }

    pub fn population(&self) -> &[Participant] {
        &self.population
    }

    pub fn profiles(&self) -> &ClusterProfiles {
        self.profiles
    }

    /// Cluster label for a single new response
    pub fn predict(&self, response: &SurveyResponse) -> Result<ClusterLabel> {
        let labels = assign(self.model, std::slice::from_ref(response))?;
        let label = labels
            .into_iter()
            .next()
            .ok_or(PredictionError::LengthMismatch {
                expected: 1,
                actual: 0,
            })?;
        Ok(label)
    }

    /// Run one interaction: assign the response and describe its cohort
    pub fn interact(&self, response: &SurveyResponse) -> Result<CohortReport> {
        let label = self.predict(response)?;
        debug!(%label, ?response, "response assigned");

        let report = build_report(&label, &self.population, self.profiles)?;
        info!(%label, cohort = report.cohort_size, "report built");
        Ok(report)
    }
}
