//! Collecting survey answers from the user

use crate::locale::Language;
use crate::survey::{Choice, Field, SurveyResponse};
use crate::Result;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};

/// Source of survey responses for a session
pub trait AnswerSource {
    /// Next response to report on, or `None` when the session is over
    ///
    /// `previous` holds the last submitted answers (or the defaults before
    /// the first round); unchanged fields keep those values.
    fn next_response(&mut self, previous: &SurveyResponse) -> Result<Option<SurveyResponse>>;

    fn is_interactive(&self) -> bool;
}

/// Answers given up front, reported on exactly once
#[derive(Debug, Clone)]
pub struct FixedAnswers {
    response: Option<SurveyResponse>,
}

impl FixedAnswers {
    pub fn new(response: SurveyResponse) -> Self {
        Self {
            response: Some(response),
        }
    }
}

impl AnswerSource for FixedAnswers {
    fn next_response(&mut self, _previous: &SurveyResponse) -> Result<Option<SurveyResponse>> {
        Ok(self.response.take())
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Terminal prompts, one selection list per survey question
pub struct PromptCollector {
    language: Language,
    theme: ColorfulTheme,
    rounds: usize,
}

impl PromptCollector {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            theme: ColorfulTheme::default(),
            rounds: 0,
        }
    }

    fn select<C: Choice>(&self, field: Field, current: C) -> Result<C> {
        let items: Vec<&str> = C::ALL.iter().map(|c| c.label(self.language)).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt(field.title(self.language))
            .items(&items)
            .default(current.ordinal())
            .interact()?;
        Ok(C::ALL[index])
    }
}

impl AnswerSource for PromptCollector {
    fn next_response(&mut self, previous: &SurveyResponse) -> Result<Option<SurveyResponse>> {
        let texts = self.language.texts();

        if self.rounds > 0 {
            let again = Confirm::with_theme(&self.theme)
                .with_prompt(texts.change_answers)
                .default(true)
                .interact()?;
            if !again {
                return Ok(None);
            }
        }

        println!("\n{}", texts.sidebar_header.bold());
        println!("{}\n", texts.sidebar_intro);

        let response = SurveyResponse {
            age: self.select(Field::Age, previous.age)?,
            edu_level: self.select(Field::EduLevel, previous.edu_level)?,
            fav_animals: self.select(Field::FavAnimals, previous.fav_animals)?,
            fav_place: self.select(Field::FavPlace, previous.fav_place)?,
            gender: self.select(Field::Gender, previous.gender)?,
        };

        self.rounds += 1;
        Ok(Some(response))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{AgeBracket, EducationLevel, FavoriteAnimals, FavoritePlace, Gender};

    #[test]
    fn test_fixed_answers_yield_once() {
        let response = SurveyResponse::new(
            AgeBracket::Under18,
            EducationLevel::Higher,
            FavoriteAnimals::Dogs,
            FavoritePlace::InForest,
            Gender::Female,
        );
        let mut source = FixedAnswers::new(response);
        assert!(!source.is_interactive());

        let previous = SurveyResponse::default();
        assert_eq!(source.next_response(&previous).unwrap(), Some(response));
        assert_eq!(source.next_response(&response).unwrap(), None);
    }
}
