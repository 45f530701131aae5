//! Display language and the fixed UI strings of the dashboard

use clap::ValueEnum;

/// Language used for prompts, headings and chart labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    /// Polish, the language the survey was run in
    #[default]
    #[value(name = "pl")]
    Polish,
    #[value(name = "en")]
    English,
}

/// Static strings shown around the report
#[derive(Debug, Clone, Copy)]
pub struct Texts {
    pub sidebar_header: &'static str,
    pub sidebar_intro: &'static str,
    pub headline_prefix: &'static str,
    pub metric_label: &'static str,
    pub cohort_header: &'static str,
    pub count_axis: &'static str,
    pub change_answers: &'static str,
}

const POLISH: Texts = Texts {
    sidebar_header: "Powiedz nam coś o sobie",
    sidebar_intro: "Pomożemy Ci znaleźć osoby, które mają podobne zainteresowania",
    headline_prefix: "Najbliżej Ci do grupy",
    metric_label: "Liczba twoich znajomych",
    cohort_header: "Osoby z grupy",
    count_axis: "Liczba osób",
    change_answers: "Czy chcesz zmienić odpowiedzi?",
};

const ENGLISH: Texts = Texts {
    sidebar_header: "Tell us something about yourself",
    sidebar_intro: "We will help you find people with similar interests",
    headline_prefix: "You are closest to the group",
    metric_label: "Number of similar people",
    cohort_header: "People in the group",
    count_axis: "Number of people",
    change_answers: "Do you want to change your answers?",
};

impl Language {
    pub fn texts(self) -> &'static Texts {
        match self {
            Language::Polish => &POLISH,
            Language::English => &ENGLISH,
        }
    }

    /// Headline naming the cluster the user was assigned to
    pub fn headline(self, cluster_name: &str) -> String {
        format!("{} {}", self.texts().headline_prefix, cluster_name)
    }
}
