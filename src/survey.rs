//! Survey answers as closed enumerations
//!
//! Every field of the welcome survey has a fixed set of choices. The
//! canonical value of a choice is the string stored in the historical data
//! file and in the model vocabulary; English labels are accepted as input
//! aliases and used for display when the dashboard runs in English.

use crate::locale::Language;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a string is not one of the choices of a field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid choice for {field}")]
pub struct UnknownChoice {
    pub field: Field,
    pub value: String,
}

/// A closed set of answers for one survey question
pub trait Choice: Copy + Eq + fmt::Debug + 'static {
    /// The field this choice answers
    const FIELD: Field;
    /// Every choice, in natural order. The first one is the default.
    const ALL: &'static [Self];

    /// Value as stored in the data file
    fn as_str(self) -> &'static str;

    fn english(self) -> &'static str;

    fn label(self, language: Language) -> &'static str {
        match language {
            Language::Polish => self.as_str(),
            Language::English => self.english(),
        }
    }

    /// Position within [`Choice::ALL`]
    fn ordinal(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    fn first() -> Self {
        Self::ALL[0]
    }

    fn parse_choice(s: &str) -> Result<Self, UnknownChoice> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == trimmed || c.english().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownChoice {
                field: Self::FIELD,
                value: s.to_string(),
            })
    }
}

macro_rules! survey_choice {
    (
        $(#[$meta:meta])*
        $name:ident for $field:ident {
            $($variant:ident => ($value:literal, $english:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            const FIELD: Field = Field::$field;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            fn english(self) -> &'static str {
                match self {
                    $(Self::$variant => $english),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::first()
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_choice(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

survey_choice! {
    /// Age bracket
    AgeBracket for Age {
        Under18 => ("<18", "<18"),
        From18To24 => ("18-24", "18-24"),
        From25To34 => ("25-34", "25-34"),
        From35To44 => ("35-44", "35-44"),
        From45To54 => ("45-54", "45-54"),
        From55To64 => ("55-64", "55-64"),
        Over65 => (">=65", ">=65"),
        Unknown => ("unknown", "unknown"),
    }
}

survey_choice! {
    /// Highest completed education level
    EducationLevel for EduLevel {
        Primary => ("Podstawowe", "Primary"),
        Secondary => ("Średnie", "Secondary"),
        Higher => ("Wyższe", "Higher"),
    }
}

survey_choice! {
    FavoriteAnimals for FavAnimals {
        NoFavorite => ("Brak ulubionych", "None"),
        Dogs => ("Psy", "Dogs"),
        Cats => ("Koty", "Cats"),
        Other => ("Inne", "Other"),
        CatsAndDogs => ("Koty i Psy", "Cats and Dogs"),
    }
}

survey_choice! {
    FavoritePlace for FavPlace {
        ByWater => ("Nad wodą", "By water"),
        InForest => ("W lesie", "In forest"),
        InMountains => ("W górach", "In mountains"),
        Other => ("Inne", "Other"),
    }
}

survey_choice! {
    Gender for Gender {
        Male => ("Mężczyzna", "Male"),
        Female => ("Kobieta", "Female"),
    }
}

/// The five survey questions, in column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Age,
    EduLevel,
    FavAnimals,
    FavPlace,
    Gender,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Age,
        Field::EduLevel,
        Field::FavAnimals,
        Field::FavPlace,
        Field::Gender,
    ];

    /// Column name in the historical data file
    pub fn column(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::EduLevel => "edu_level",
            Field::FavAnimals => "fav_animals",
            Field::FavPlace => "fav_place",
            Field::Gender => "gender",
        }
    }

    /// Question text, also used as the chart's x-axis title
    pub fn title(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::Polish, Field::Age) => "Wiek",
            (Language::Polish, Field::EduLevel) => "Wykształcenie",
            (Language::Polish, Field::FavAnimals) => "Ulubione zwierzęta",
            (Language::Polish, Field::FavPlace) => "Ulubione miejsce",
            (Language::Polish, Field::Gender) => "Płeć",
            (Language::English, Field::Age) => "Age",
            (Language::English, Field::EduLevel) => "Education",
            (Language::English, Field::FavAnimals) => "Favorite animals",
            (Language::English, Field::FavPlace) => "Favorite place",
            (Language::English, Field::Gender) => "Gender",
        }
    }

    pub fn chart_title(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::Polish, Field::Age) => "Rozkład wieku w grupie",
            (Language::Polish, Field::EduLevel) => "Rozkład wykształcenia w grupie",
            (Language::Polish, Field::FavAnimals) => "Rozkład ulubionych zwierząt w grupie",
            (Language::Polish, Field::FavPlace) => "Rozkład ulubionych miejsc w grupie",
            (Language::Polish, Field::Gender) => "Rozkład płci w grupie",
            (Language::English, Field::Age) => "Age distribution in the group",
            (Language::English, Field::EduLevel) => "Education distribution in the group",
            (Language::English, Field::FavAnimals) => "Favorite animals in the group",
            (Language::English, Field::FavPlace) => "Favorite places in the group",
            (Language::English, Field::Gender) => "Gender distribution in the group",
        }
    }

    /// Whether the chart axis follows the natural order of the choices
    /// rather than the order values first appear in the data
    ///
    /// Natural order is declaration order, not a string sort: `<18` comes
    /// first even though it sorts after `55-64` as text.
    pub fn is_ordered(self) -> bool {
        matches!(self, Field::Age)
    }

    /// Every choice of this field as an [`Answer`], in natural order
    pub fn answers(self) -> Vec<Answer> {
        fn all<C: Choice>() -> Vec<Answer> {
            C::ALL.iter().map(|c| Answer::of(*c)).collect()
        }
        match self {
            Field::Age => all::<AgeBracket>(),
            Field::EduLevel => all::<EducationLevel>(),
            Field::FavAnimals => all::<FavoriteAnimals>(),
            Field::FavPlace => all::<FavoritePlace>(),
            Field::Gender => all::<Gender>(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Type-erased view of one answer, used where fields are handled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Answer {
    pub field: Field,
    pub ordinal: usize,
    pub value: &'static str,
    english: &'static str,
}

impl Answer {
    pub fn of<C: Choice>(choice: C) -> Self {
        Self {
            field: C::FIELD,
            ordinal: choice.ordinal(),
            value: choice.as_str(),
            english: choice.english(),
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::Polish => self.value,
            Language::English => self.english,
        }
    }
}

/// One person's answers to the welcome survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurveyResponse {
    pub age: AgeBracket,
    pub edu_level: EducationLevel,
    pub fav_animals: FavoriteAnimals,
    pub fav_place: FavoritePlace,
    pub gender: Gender,
}

impl SurveyResponse {
    pub fn new(
        age: AgeBracket,
        edu_level: EducationLevel,
        fav_animals: FavoriteAnimals,
        fav_place: FavoritePlace,
        gender: Gender,
    ) -> Self {
        Self {
            age,
            edu_level,
            fav_animals,
            fav_place,
            gender,
        }
    }

    /// Build a response from raw strings in column order
    pub fn parse(values: [&str; 5]) -> Result<Self, UnknownChoice> {
        let [age, edu_level, fav_animals, fav_place, gender] = values;
        Ok(Self {
            age: age.parse()?,
            edu_level: edu_level.parse()?,
            fav_animals: fav_animals.parse()?,
            fav_place: fav_place.parse()?,
            gender: gender.parse()?,
        })
    }

    pub fn answer(&self, field: Field) -> Answer {
        match field {
            Field::Age => Answer::of(self.age),
            Field::EduLevel => Answer::of(self.edu_level),
            Field::FavAnimals => Answer::of(self.fav_animals),
            Field::FavPlace => Answer::of(self.fav_place),
            Field::Gender => Answer::of(self.gender),
        }
    }

    /// All five answers in column order
    pub fn answers(&self) -> [Answer; 5] {
        Field::ALL.map(|field| self.answer(field))
    }
}
