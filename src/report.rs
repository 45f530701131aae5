//! Cohort filtering and per-field distributions
//!
//! A report is a plain value: it borrows nothing and is rebuilt from the
//! same inputs to the same result, so rendering it any number of times never
//! touches the labeled population.

use crate::data::{ClusterProfile, ClusterProfiles};
use crate::error::LookupError;
use crate::model::{ClusterLabel, Participant};
use crate::survey::{Answer, Field, SurveyResponse};

/// RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Plotly's qualitative "Pastel" palette
pub const PASTEL: [Rgb; 11] = [
    Rgb(102, 197, 204),
    Rgb(246, 207, 113),
    Rgb(248, 156, 116),
    Rgb(220, 176, 242),
    Rgb(135, 197, 95),
    Rgb(158, 185, 243),
    Rgb(254, 136, 177),
    Rgb(201, 219, 116),
    Rgb(139, 224, 164),
    Rgb(180, 151, 231),
    Rgb(179, 179, 179),
];

/// Historical participants that share one cluster label
#[derive(Debug, Clone)]
pub struct Cohort<'a> {
    members: Vec<&'a Participant>,
}

impl<'a> Cohort<'a> {
    /// Select the participants labeled `label`, keeping population order
    pub fn filter(population: &'a [Participant], label: &ClusterLabel) -> Self {
        let members = population.iter().filter(|p| &p.label == label).collect();
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> impl Iterator<Item = &SurveyResponse> + '_ {
        self.members.iter().map(|p| &p.response)
    }

    /// Count how often each value of `field` occurs in the cohort
    ///
    /// Bars follow the natural order of the choices for ordered fields and
    /// the order of first appearance otherwise. Colors are assigned by bar
    /// position.
    pub fn distribution(&self, field: Field) -> Distribution {
        let mut counts: Vec<(Answer, usize)> = Vec::new();
        for response in self.members() {
            let answer = response.answer(field);
            match counts.iter_mut().find(|(seen, _)| *seen == answer) {
                Some((_, count)) => *count += 1,
                None => counts.push((answer, 1)),
            }
        }

        if field.is_ordered() {
            counts.sort_by_key(|(answer, _)| answer.ordinal);
        }

        let bars = counts
            .into_iter()
            .enumerate()
            .map(|(i, (answer, count))| Bar {
                answer,
                count,
                color: PASTEL[i % PASTEL.len()],
            })
            .collect();

        Distribution { field, bars }
    }
}

/// One bar of a distribution chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub answer: Answer,
    pub count: usize,
    pub color: Rgb,
}

/// Frequency of each observed value of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub field: Field,
    pub bars: Vec<Bar>,
}

impl Distribution {
    /// Sum of all bar heights
    pub fn total(&self) -> usize {
        self.bars.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bars.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Everything shown to the user after an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortReport {
    pub label: ClusterLabel,
    pub profile: ClusterProfile,
    /// Number of similar people
    pub cohort_size: usize,
    /// One distribution per field, in column order
    pub distributions: Vec<Distribution>,
}

/// Build the report for a user assigned to `label`
pub fn build_report(
    label: &ClusterLabel,
    population: &[Participant],
    profiles: &ClusterProfiles,
) -> Result<CohortReport, LookupError> {
    let profile = profiles.get(label)?;
    let cohort = Cohort::filter(population, label);

    Ok(CohortReport {
        label: label.clone(),
        profile: profile.clone(),
        cohort_size: cohort.len(),
        distributions: Field::ALL
            .iter()
            .map(|field| cohort.distribution(*field))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{AgeBracket, EducationLevel, FavoriteAnimals, FavoritePlace, Gender};

    fn participant(age: AgeBracket, place: FavoritePlace, label: &str) -> Participant {
        Participant {
            response: SurveyResponse {
                age,
                fav_place: place,
                ..SurveyResponse::default()
            },
            label: ClusterLabel::from(label),
        }
    }

    fn create_population() -> Vec<Participant> {
        vec![
            participant(AgeBracket::Unknown, FavoritePlace::InMountains, "1"),
            participant(AgeBracket::From25To34, FavoritePlace::ByWater, "0"),
            participant(AgeBracket::From18To24, FavoritePlace::InMountains, "1"),
            participant(AgeBracket::Under18, FavoritePlace::InForest, "1"),
            participant(AgeBracket::From18To24, FavoritePlace::InMountains, "1"),
            participant(AgeBracket::Over65, FavoritePlace::ByWater, "0"),
        ]
    }

    fn create_profiles() -> ClusterProfiles {
        profiles_for(&[("0", "Wodniacy"), ("1", "Górale")])
    }

    fn profiles_for(names: &[(&str, &str)]) -> ClusterProfiles {
        names
            .iter()
            .map(|&(label, name)| {
                (
                    ClusterLabel::from(label),
                    ClusterProfile {
                        name: name.to_string(),
                        description: format!("Opis grupy {name}"),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_cohort_is_subset_with_matching_label() {
        let population = create_population();
        let label = ClusterLabel::from("1");
        let cohort = Cohort::filter(&population, &label);

        assert_eq!(cohort.len(), 4);
        assert!(cohort.len() <= population.len());
        assert!(cohort.members.iter().all(|p| p.label == label));
    }

    #[test]
    fn test_age_distribution_in_natural_order() {
        let population = create_population();
        let label = ClusterLabel::from("1");
        let distribution = Cohort::filter(&population, &label).distribution(Field::Age);

        let bars: Vec<(&str, usize)> = distribution
            .bars
            .iter()
            .map(|b| (b.answer.value, b.count))
            .collect();
        assert_eq!(bars, vec![("<18", 1), ("18-24", 2), ("unknown", 1)]);
    }

    #[test]
    fn test_unordered_fields_keep_first_appearance() {
        let population = create_population();
        let label = ClusterLabel::from("1");
        let distribution = Cohort::filter(&population, &label).distribution(Field::FavPlace);

        let values: Vec<&str> = distribution.bars.iter().map(|b| b.answer.value).collect();
        assert_eq!(values, vec!["W górach", "W lesie"]);
    }

    #[test]
    fn test_counts_are_conserved() {
        let population = create_population();
        let label = ClusterLabel::from("1");
        let cohort = Cohort::filter(&population, &label);

        for field in Field::ALL {
            let distribution = cohort.distribution(field);
            assert_eq!(distribution.total(), cohort.len());

            let mut distinct: Vec<Answer> = cohort.members().map(|r| r.answer(field)).collect();
            distinct.sort_by_key(|a| a.ordinal);
            distinct.dedup();
            assert_eq!(distribution.bars.len(), distinct.len());
        }
    }

    #[test]
    fn test_colors_follow_bar_position() {
        let population = create_population();
        let label = ClusterLabel::from("1");
        let distribution = Cohort::filter(&population, &label).distribution(Field::Age);

        let colors: Vec<Rgb> = distribution.bars.iter().map(|b| b.color).collect();
        assert_eq!(colors, PASTEL[..3].to_vec());
    }

    #[test]
    fn test_single_valued_fields() {
        let population = create_population();
        let label = ClusterLabel::from("0");
        let cohort = Cohort::filter(&population, &label);

        let gender = cohort.distribution(Field::Gender);
        assert_eq!(gender.bars.len(), 1);
        assert_eq!(gender.bars[0].answer.value, Gender::Male.to_string());
        assert_eq!(gender.max_count(), 2);

        let education = cohort.distribution(Field::EduLevel);
        assert_eq!(education.bars[0].answer.value, EducationLevel::Primary.to_string());
        let animals = cohort.distribution(Field::FavAnimals);
        assert_eq!(animals.bars[0].answer.value, FavoriteAnimals::NoFavorite.to_string());
    }

    #[test]
    fn test_build_report() {
        let population = create_population();
        let report = build_report(&ClusterLabel::from("0"), &population, &create_profiles()).unwrap();

        assert_eq!(report.profile.name, "Wodniacy");
        assert_eq!(report.cohort_size, 2);
        assert_eq!(report.distributions.len(), 5);
        let fields: Vec<Field> = report.distributions.iter().map(|d| d.field).collect();
        assert_eq!(fields, Field::ALL.to_vec());
    }

    #[test]
    fn test_build_report_is_repeatable() {
        let population = create_population();
        let snapshot = population.clone();
        let profiles = create_profiles();
        let label = ClusterLabel::from("1");

        let first = build_report(&label, &population, &profiles).unwrap();
        let second = build_report(&label, &population, &profiles).unwrap();
        assert_eq!(first, second);
        assert_eq!(population, snapshot);
    }

    #[test]
    fn test_build_report_unknown_label() {
        let population = create_population();
        let err = build_report(&ClusterLabel::from("5"), &population, &create_profiles()).unwrap_err();
        assert_eq!(err.label, ClusterLabel::from("5"));
    }

    #[test]
    fn test_empty_cohort() {
        let population = create_population();
        let profiles = profiles_for(&[("0", "Wodniacy"), ("9", "Pusta")]);

        let report = build_report(&ClusterLabel::from("9"), &population, &profiles).unwrap();
        assert_eq!(report.cohort_size, 0);
        assert!(report.distributions.iter().all(|d| d.bars.is_empty()));
    }
}
