pub mod options;

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::parser::extract::{ExtractedArticle, KeyEntities};
use crate::parser::region::PLACEHOLDER_TITLE;
use options::{make_options_with, same_answer, OPTION_COUNT};

pub const MAX_QUESTIONS: usize = 8;
pub const MAX_RELATED_TOPICS: usize = 12;

const SECTION_POOL: &[&str] = &["Overview", "Timeline", "References", "Appendix"];
const PERSON_POOL: &[&str] = &["Ada Lovelace", "Isaac Newton", "Marie Curie", "Nikola Tesla"];
const ORGANIZATION_POOL: &[&str] = &["NASA", "UNESCO", "World Bank", "CERN"];
const LOCATION_POOL: &[&str] = &["Canada", "Australia", "Brazil", "South Africa"];
const DESCRIPTION_POOL: &[&str] = &["A news report", "A research paper", "A product manual"];

const FALLBACK_SECTION: &str = "Introduction";
const FALLBACK_ORGANIZATION: &str = "Wikipedia";
const FALLBACK_LOCATION: &str = "United Kingdom";
const DESCRIPTION_ANSWER: &str = "A Wikipedia article summary";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; OPTION_COUNT],
    pub answer: String,
    pub difficulty: Difficulty,
    pub explanation: String,
}

impl QuizQuestion {
    fn ask<R: Rng + ?Sized>(
        question: String,
        correct: &str,
        pool: &[&str],
        difficulty: Difficulty,
        explanation: String,
        rng: &mut R,
    ) -> Self {
        Self {
            question,
            options: make_options_with(correct, pool, rng),
            answer: correct.to_string(),
            difficulty,
            explanation,
        }
    }

    /// Index of the option matching `answer`, if any.
    pub fn answer_index(&self) -> Option<usize> {
        self.options.iter().position(|o| same_answer(o, &self.answer))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuiz {
    pub quiz: Vec<QuizQuestion>,
    pub related_topics: Vec<String>,
}

pub fn generate_quiz(article: &ExtractedArticle) -> GeneratedQuiz {
    generate_quiz_with(article, &mut rand::thread_rng())
}

/// Five fixed question slots seeded from the article; only option order is random.
pub fn generate_quiz_with<R: Rng + ?Sized>(article: &ExtractedArticle, rng: &mut R) -> GeneratedQuiz {
    let title = first_non_empty(std::slice::from_ref(&article.title), PLACEHOLDER_TITLE);
    let entities = &article.key_entities;

    let section = first_non_empty(&article.sections, FALLBACK_SECTION);
    let person = first_non_empty(&entities.people, title);
    let organization = first_non_empty(&entities.organizations, FALLBACK_ORGANIZATION);
    let location = first_non_empty(&entities.locations, FALLBACK_LOCATION);

    let mut quiz = vec![
        QuizQuestion::ask(
            format!("Which section is present in the article \"{}\"?", title),
            section,
            SECTION_POOL,
            Difficulty::Easy,
            format!("The section list extracted from the page includes \"{}\".", section),
            rng,
        ),
        QuizQuestion::ask(
            format!(
                "Which of the following is mentioned as a key person related to \"{}\"?",
                title
            ),
            person,
            PERSON_POOL,
            Difficulty::Easy,
            "Extracted from linked entities on the article page.".to_string(),
            rng,
        ),
        QuizQuestion::ask(
            format!(
                "Which organization is associated with the article content about \"{}\"?",
                title
            ),
            organization,
            ORGANIZATION_POOL,
            Difficulty::Medium,
            "Derived from entities/links found on the page.".to_string(),
            rng,
        ),
        QuizQuestion::ask(
            format!(
                "Which location is connected to \"{}\" according to the extracted entities?",
                title
            ),
            location,
            LOCATION_POOL,
            Difficulty::Medium,
            "Derived from entities/links found on the page.".to_string(),
            rng,
        ),
        QuizQuestion::ask(
            format!("What best describes the article \"{}\"?", title),
            DESCRIPTION_ANSWER,
            DESCRIPTION_POOL,
            Difficulty::Hard,
            "This quiz is generated from the article's extracted summary text.".to_string(),
            rng,
        ),
    ];
    quiz.truncate(MAX_QUESTIONS);

    GeneratedQuiz {
        quiz,
        related_topics: related_topics(entities, &article.sections),
    }
}

/// people ++ organizations ++ locations ++ sections, deduplicated, first 12.
pub fn related_topics(entities: &KeyEntities, sections: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    entities
        .people
        .iter()
        .chain(&entities.organizations)
        .chain(&entities.locations)
        .chain(sections)
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(*t))
        .take(MAX_RELATED_TOPICS)
        .cloned()
        .collect()
}

fn first_non_empty<'a>(values: &'a [String], fallback: &'a str) -> &'a str {
    values
        .iter()
        .map(|v| v.as_str())
        .find(|v| !v.trim().is_empty())
        .unwrap_or(fallback)
}

// ── Tests ──
