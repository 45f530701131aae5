//! Read-only access to the survey artifacts
//!
//! Three files feed the dashboard: the trained model, the historical survey
//! answers (semicolon separated, read with Polars) and the cluster names and
//! descriptions. Each is loaded at most once per [`ArtifactStore`].

use crate::error::{LoadError, LookupError};
use crate::model::{ClusterLabel, ClusteringModel, KMeansPipeline};
use crate::survey::{Field, SurveyResponse};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MODEL_FILE: &str = "welcome_survey_clustering_pipeline_v1.json";
pub const PARTICIPANTS_FILE: &str = "welcome_survey_simple_v1.csv";
pub const PROFILES_FILE: &str = "welcome_survey_cluster_names_and_descriptions_v1.json";

/// Display name and explanation of a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub name: String,
    pub description: String,
}

/// Cluster metadata keyed by label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterProfiles(BTreeMap<ClusterLabel, ClusterProfile>);

impl ClusterProfiles {
    pub fn get(&self, label: &ClusterLabel) -> Result<&ClusterProfile, LookupError> {
        self.0.get(label).ok_or_else(|| LookupError {
            label: label.clone(),
        })
    }

    pub fn contains(&self, label: &ClusterLabel) -> bool {
        self.0.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ClusterLabel, ClusterProfile)> for ClusterProfiles {
    fn from_iter<I: IntoIterator<Item = (ClusterLabel, ClusterProfile)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Locations of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub participants: PathBuf,
    pub profiles: PathBuf,
}

impl ArtifactPaths {
    /// Standard artifact names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join(MODEL_FILE),
            participants: dir.join(PARTICIPANTS_FILE),
            profiles: dir.join(PROFILES_FILE),
        }
    }
}

/// Read a whole artifact into memory, reporting a missing file distinctly
pub(crate) fn read_artifact(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Load cluster names and descriptions from JSON
pub fn load_cluster_profiles(path: &Path) -> Result<ClusterProfiles, LoadError> {
    let text = read_artifact(path)?;
    let profiles: ClusterProfiles =
        serde_json::from_str(&text).map_err(|e| LoadError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    info!(clusters = profiles.len(), path = %path.display(), "loaded cluster profiles");
    Ok(profiles)
}

/// Load the historical survey answers
///
/// # Arguments
/// * `path` - Semicolon separated file with a header row containing at least
///   the five survey columns; other columns are ignored
///
/// # Returns
/// * One `SurveyResponse` per data row, in file order
pub fn load_participants(path: &Path) -> Result<Vec<SurveyResponse>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing {
            path: path.to_path_buf(),
        });
    }

    let columns: Vec<Expr> = Field::ALL.iter().map(|f| col(f.column())).collect();

    // Schema inference is disabled so every column comes back as a string
    let df = LazyCsvReader::new(path)
        .with_separator(b';')
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .and_then(|lf| lf.select(columns).collect())
        .map_err(|e| match e {
            PolarsError::ColumnNotFound(_) => LoadError::Schema {
                path: path.to_path_buf(),
                line: None,
                reason: e.to_string(),
            },
            _ => LoadError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

    let schema_error = |line: Option<usize>, reason: String| LoadError::Schema {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut cells = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        let column = df
            .column(field.column())
            .and_then(|c| c.as_materialized_series().str().cloned())
            .map_err(|e| schema_error(None, e.to_string()))?;
        cells.push(column);
    }

    let mut responses = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        // header is line 1
        let line = row + 2;
        // blank lines come back as rows of nulls
        if cells.iter().all(|column| column.get(row).is_none()) {
            continue;
        }
        let mut values = [""; 5];
        for (value, (field, column)) in values.iter_mut().zip(Field::ALL.iter().zip(&cells)) {
            *value = column
                .get(row)
                .ok_or_else(|| schema_error(Some(line), format!("empty {field}")))?;
        }
        let response = SurveyResponse::parse(values)
            .map_err(|e| schema_error(Some(line), e.to_string()))?;
        responses.push(response);
    }

    info!(participants = responses.len(), path = %path.display(), "loaded survey data");
    Ok(responses)
}

/// Load-once cache over the three artifacts
pub struct ArtifactStore {
    paths: ArtifactPaths,
    model: OnceCell<KMeansPipeline>,
    profiles: OnceCell<ClusterProfiles>,
    participants: OnceCell<Vec<SurveyResponse>>,
}

impl ArtifactStore {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            model: OnceCell::new(),
            profiles: OnceCell::new(),
            participants: OnceCell::new(),
        }
    }

    pub fn model(&self) -> Result<&dyn ClusteringModel, LoadError> {
        let model = cached(&self.model, || KMeansPipeline::load(&self.paths.model))?;
        Ok(model)
    }

    pub fn profiles(&self) -> Result<&ClusterProfiles, LoadError> {
        cached(&self.profiles, || load_cluster_profiles(&self.paths.profiles))
    }

    pub fn participants(&self) -> Result<&[SurveyResponse], LoadError> {
        let participants = cached(&self.participants, || {
            load_participants(&self.paths.participants)
        })?;
        Ok(participants)
    }
}

/// Return the cached value, loading it first if this is the first call
fn cached<T>(
    cell: &OnceCell<T>,
    load: impl FnOnce() -> Result<T, LoadError>,
) -> Result<&T, LoadError> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = load()?;
    Ok(cell.get_or_init(|| value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{AgeBracket, EducationLevel, FavoritePlace, Gender};
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn create_test_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "age;edu_level;fav_animals;fav_place;gender").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    fn create_profiles_json() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "Cluster 0": {{"name": "Miłośnicy gór", "description": "Lubią wędrówki."}},
                "Cluster 1": {{"name": "Kociarze", "description": "Koty ponad wszystko."}}
            }}"#
        )
        .unwrap();
        file
    }

    #[test]
    fn test_load_participants() {
        let file = create_test_csv(&[
            "<18;Wyższe;Psy;W lesie;Kobieta",
            "25-34;Średnie;Koty i Psy;Nad wodą;Mężczyzna",
            "unknown;Podstawowe;Brak ulubionych;Inne;Kobieta",
        ]);

        let participants = load_participants(file.path()).unwrap();
        assert_eq!(participants.len(), 3);
        assert_eq!(participants[0].age, AgeBracket::Under18);
        assert_eq!(participants[0].edu_level, EducationLevel::Higher);
        assert_eq!(participants[0].fav_place, FavoritePlace::InForest);
        assert_eq!(participants[1].gender, Gender::Male);
        assert_eq!(participants[2].age, AgeBracket::Unknown);
    }

    #[test]
    fn test_load_participants_ignores_extra_columns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id;gender;age;fav_place;hobby;edu_level;fav_animals").unwrap();
        writeln!(file, "1;Kobieta;45-54;W górach;chess;Wyższe;Koty").unwrap();

        let participants = load_participants(file.path()).unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].age, AgeBracket::From45To54);
        assert_eq!(participants[0].fav_place, FavoritePlace::InMountains);
    }

    #[test]
    fn test_load_participants_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_participants(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Missing { .. }));
    }

    #[test]
    fn test_load_participants_missing_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "age;edu_level;fav_animals;fav_place").unwrap();
        writeln!(file, "<18;Wyższe;Psy;W lesie").unwrap();

        let err = load_participants(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Schema { line: None, .. }), "{err}");
    }

    #[test]
    fn test_load_participants_rejects_unknown_value() {
        let file = create_test_csv(&[
            "<18;Wyższe;Psy;W lesie;Kobieta",
            "<18;Wyższe;Chomiki;W lesie;Kobieta",
        ]);

        let err = load_participants(file.path()).unwrap_err();
        match err {
            LoadError::Schema { line, reason, .. } => {
                assert_eq!(line, Some(3));
                assert!(reason.contains("Chomiki"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_participants_rejects_empty_cell() {
        let file = create_test_csv(&["<18;;Psy;W lesie;Kobieta"]);

        let err = load_participants(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Schema { line: Some(2), .. }), "{err}");
    }

    #[test]
    fn test_load_participants_skips_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "age;edu_level;fav_animals;fav_place;gender\n<18;Wyższe;Psy;W lesie;Kobieta\n\n"
        )
        .unwrap();
        let participants = load_participants(file.path()).unwrap();
        assert_eq!(participants.len(), 1);

        let file = create_test_csv(&[
            "<18;Wyższe;Psy;W lesie;Kobieta",
            "",
            "25-34;Średnie;Koty;Nad wodą;Mężczyzna",
        ]);
        let participants = load_participants(file.path()).unwrap();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[1].age, AgeBracket::From25To34);
    }

    #[test]
    fn test_load_cluster_profiles() {
        let file = create_profiles_json();
        let profiles = load_cluster_profiles(file.path()).unwrap();

        assert_eq!(profiles.len(), 2);
        let profile = profiles.get(&ClusterLabel::from("Cluster 1")).unwrap();
        assert_eq!(profile.name, "Kociarze");

        let err = profiles.get(&ClusterLabel::from("Cluster 7")).unwrap_err();
        assert_eq!(err.label, ClusterLabel::from("Cluster 7"));
    }

    #[test]
    fn test_load_cluster_profiles_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"Cluster 0": {{"name": "no description"}}}}"#).unwrap();

        let err = load_cluster_profiles(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_store_loads_once() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        std::fs::copy(create_profiles_json().path(), &paths.profiles).unwrap();

        let store = ArtifactStore::new(paths.clone());
        let first = store.profiles().unwrap() as *const ClusterProfiles;

        // Removing the file must not matter once the profiles are cached
        std::fs::remove_file(&paths.profiles).unwrap();
        let second = store.profiles().unwrap() as *const ClusterProfiles;
        assert_eq!(first, second);
    }

    #[test]
    fn test_store_reports_missing_artifacts() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        assert!(matches!(store.model(), Err(LoadError::Missing { .. })));
        assert!(matches!(store.participants(), Err(LoadError::Missing { .. })));
        assert!(matches!(store.profiles(), Err(LoadError::Missing { .. })));
    }
}
