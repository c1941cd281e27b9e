use std::sync::Arc;

use forum_repository::{QuestionRepository, RepositoryError};
use forum_shared::types::{
    Answer, Author, NewAnswer, NewQuestion, Question, QuestionFilter, QuestionId,
    QuestionWithAnswers,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::ai::{TextGenerator, prompts};

/// Default and maximum number of questions in one feed page.
pub const FEED_LIMIT: i64 = 20;
const MAX_TITLE_CHARS: usize = 150;
const SUMMARY_FALLBACK_CHARS: usize = 150;
const MAX_TAGS: usize = 5;

#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("Please log in to {0}")]
    Unauthenticated(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Question not found: {0}")]
    NotFound(QuestionId),

    #[error("Storage error: {0}")]
    Storage(RepositoryError),
}

impl From<RepositoryError> for QuestionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::QuestionNotFound(id) => QuestionError::NotFound(id),
            other => QuestionError::Storage(other),
        }
    }
}

/// Body of an ask-question request.
#[derive(Debug, Clone, Deserialize)]
pub struct AskQuestion {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// A summary written by the author. Generated when absent.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Body of a post-answer request.
#[derive(Debug, Clone, Deserialize)]
pub struct PostAnswer {
    pub body: String,
}

/// Question feed, detail and creation flows.
#[derive(Clone)]
pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl QuestionService {
    pub fn new(
        repository: Arc<dyn QuestionRepository>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self { repository, generator }
    }

    /// Lists one feed page. `limit` is clamped to `1..=FEED_LIMIT`.
    pub async fn list_questions(
        &self,
        filter: QuestionFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Question>, QuestionError> {
        let limit = limit.unwrap_or(FEED_LIMIT).clamp(1, FEED_LIMIT);
        Ok(self.repository.list_questions(filter, limit).await?)
    }

    pub async fn get_question(&self, id: QuestionId) -> Result<QuestionWithAnswers, QuestionError> {
        self.repository
            .get_question_with_answers(id)
            .await?
            .ok_or(QuestionError::NotFound(id))
    }

    /// Validates and stores a new question, with an AI summary and initial
    /// answer when a text generator is configured.
    ///
    /// Generation failures are logged; the question is created without the
    /// AI answer and with a summary cut from the body.
    pub async fn create_question(
        &self,
        author: Option<Author>,
        request: AskQuestion,
    ) -> Result<QuestionWithAnswers, QuestionError> {
        let author = author.ok_or(QuestionError::Unauthenticated("ask a question"))?;
        let title = request.title.trim().to_string();
        let body = request.body.trim().to_string();
        let tags = normalize_tags(request.tags)?;

        if title.is_empty() {
            return Err(QuestionError::Validation("Title must not be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(QuestionError::Validation(format!(
                "Title must not be longer than {MAX_TITLE_CHARS} characters"
            )));
        }
        if body.is_empty() {
            return Err(QuestionError::Validation("Question body must not be empty".to_string()));
        }

        let provided_summary = request
            .summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let (generated_summary, ai_answer) = match &self.generator {
            Some(generator) => {
                let summary_prompt = prompts::summary(&body);
                let answer_prompt = prompts::initial_answer(&title, &body);
                let summary = async {
                    match provided_summary {
                        Some(_) => None,
                        None => {
                            generate_logged(generator.as_ref(), &summary_prompt, "summary").await
                        }
                    }
                };
                let answer = generate_logged(generator.as_ref(), &answer_prompt, "answer");
                tokio::join!(summary, answer)
            }
            None => (None, None),
        };

        let summary = provided_summary
            .or(generated_summary)
            .unwrap_or_else(|| body.chars().take(SUMMARY_FALLBACK_CHARS).collect());

        let created = self
            .repository
            .create_question(
                &NewQuestion {
                    title,
                    body,
                    summary,
                    tags,
                    author,
                },
                ai_answer.as_deref(),
            )
            .await?;

        info!(
            question_id = %created.question.id,
            author_id = %created.question.author.id,
            ai_answer = ai_answer.is_some(),
            "Question created"
        );
        Ok(created)
    }

    /// Stores an answer and bumps the question's answer count.
    pub async fn create_answer(
        &self,
        author: Option<Author>,
        question_id: QuestionId,
        request: PostAnswer,
    ) -> Result<Answer, QuestionError> {
        let author = author.ok_or(QuestionError::Unauthenticated("answer"))?;
        let body = request.body.trim().to_string();
        if body.is_empty() {
            return Err(QuestionError::Validation("Answer body must not be empty".to_string()));
        }

        let answer = self
            .repository
            .create_answer(&NewAnswer {
                question_id,
                body,
                author,
            })
            .await?;
        info!(question_id = %question_id, answer_id = %answer.id, "Answer created");
        Ok(answer)
    }
}

fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, QuestionError> {
    let tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .collect();
    if tags.iter().any(String::is_empty) {
        return Err(QuestionError::Validation("Tags must not be empty".to_string()));
    }
    if tags.len() > MAX_TAGS {
        return Err(QuestionError::Validation(format!("At most {MAX_TAGS} tags are allowed")));
    }
    Ok(tags)
}

async fn generate_logged(
    generator: &dyn TextGenerator,
    prompt: &str,
    purpose: &'static str,
) -> Option<String> {
    match generator.generate(prompt).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(purpose, error = %e, "AI generation failed, continuing without it");
            None
        }
    }
}
