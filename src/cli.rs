//! Command-line interface definitions and argument parsing

use crate::data::ArtifactPaths;
use crate::locale::Language;
use crate::survey::{AgeBracket, EducationLevel, FavoriteAnimals, FavoritePlace, Gender, SurveyResponse};
use clap::Parser;
use std::path::PathBuf;

/// Find the survey group you are most similar to
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the model, survey data and cluster descriptions
    #[arg(long, env = "COHORTSCOPE_ARTIFACTS", default_value = ".")]
    pub artifacts_dir: PathBuf,

    /// Model artifact, overrides the one in the artifacts directory
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Historical survey data (semicolon separated)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Cluster names and descriptions (JSON)
    #[arg(long)]
    pub clusters: Option<PathBuf>,

    /// Display language
    #[arg(short, long, value_enum, env = "COHORTSCOPE_LANG", default_value = "pl")]
    pub lang: Language,

    /// Directory for the PNG charts
    #[arg(short, long, default_value = "charts")]
    pub output_dir: PathBuf,

    /// Only print the report, do not write chart images
    #[arg(long)]
    pub no_charts: bool,

    /// Age bracket, e.g. "<18" or "25-34"
    #[arg(long)]
    pub age: Option<AgeBracket>,

    /// Education level ("Podstawowe"/"Primary", ...)
    #[arg(long)]
    pub edu_level: Option<EducationLevel>,

    /// Favorite animals ("Psy"/"Dogs", ...)
    #[arg(long)]
    pub fav_animals: Option<FavoriteAnimals>,

    /// Favorite place ("W lesie"/"In forest", ...)
    #[arg(long)]
    pub fav_place: Option<FavoritePlace>,

    /// Gender ("Kobieta"/"Female", ...)
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Do not prompt; unanswered questions take their first choice
    #[arg(long)]
    pub no_input: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Resolve artifact locations, preferring explicit paths
    pub fn artifact_paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::in_dir(&self.artifacts_dir);
        ArtifactPaths {
            model: self.model.clone().unwrap_or(defaults.model),
            participants: self.data.clone().unwrap_or(defaults.participants),
            profiles: self.clusters.clone().unwrap_or(defaults.profiles),
        }
    }

    /// Answers given on the command line, if running non-interactively
    pub fn fixed_answers(&self) -> Option<SurveyResponse> {
        let any_answer = self.age.is_some()
            || self.edu_level.is_some()
            || self.fav_animals.is_some()
            || self.fav_place.is_some()
            || self.gender.is_some();
        if !any_answer && !self.no_input {
            return None;
        }

        Some(SurveyResponse {
            age: self.age.unwrap_or_default(),
            edu_level: self.edu_level.unwrap_or_default(),
            fav_animals: self.fav_animals.unwrap_or_default(),
            fav_place: self.fav_place.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
        })
    }
}
