use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use crate::types::{AnswerId, QuestionId, UserId};

/// Author id used for answers produced by the text-generation service.
pub const AI_ASSISTANT_ID: &str = "ai-assistant";
pub const AI_ASSISTANT_NAME: &str = "AI Assistant";

/// Public profile fragment embedded in questions and answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

impl Author {
    pub fn ai_assistant() -> Self {
        Self {
            id: AI_ASSISTANT_ID.to_string(),
            name: AI_ASSISTANT_NAME.to_string(),
            avatar_url: String::new(),
        }
    }

    pub fn is_ai_assistant(&self) -> bool {
        self.id == AI_ASSISTANT_ID
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub body: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub answer_count: i32,
    pub upvotes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub body: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub upvotes: i64,
}

/// A question together with its answers, ordered by `upvotes desc, created_at asc`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionWithAnswers {
    pub question: Question,
    pub answers: Vec<Answer>,
}

/// Feed selection for the question list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionFilter {
    /// Newest first.
    #[default]
    Latest,
    /// Highest counter first, newest first on ties.
    Popular,
    /// Questions without a human answer (at most the AI answer), newest first.
    Unanswered,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid question filter: {0}")]
pub struct ParseFilterError(pub String);

impl FromStr for QuestionFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(QuestionFilter::Latest),
            "popular" => Ok(QuestionFilter::Popular),
            "unanswered" => Ok(QuestionFilter::Unanswered),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// A validated question ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub title: String,
    pub body: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub author: Author,
}

/// A validated answer ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub question_id: QuestionId,
    pub body: String,
    pub author: Author,
}

impl NewAnswer {
    pub fn by_user(
        question_id: QuestionId,
        body: String,
        user: &UserId,
        name: String,
        avatar_url: String,
    ) -> Self {
        Self {
            question_id,
            body,
            author: Author {
                id: user.to_string(),
                name,
                avatar_url,
            },
        }
    }
}
