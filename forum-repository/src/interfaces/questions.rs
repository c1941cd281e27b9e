//! This module defines the `QuestionRepository` trait for the question feed,
//! question detail pages, and question/answer creation.
use forum_shared::types::{
    Answer, NewAnswer, NewQuestion, Question, QuestionFilter, QuestionId, QuestionWithAnswers,
};
use crate::errors::RepositoryError;

/// A trait that defines the interface for questions and answers.
///
/// Counters (`upvotes`) are never written through this trait; they belong to
/// the `VoteRepository`.
#[async_trait::async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Lists questions for a feed.
    ///
    /// # Arguments
    ///
    /// * `filter` - Feed selection and ordering.
    /// * `limit` - Maximum number of questions to return.
    async fn list_questions(
        &self,
        filter: QuestionFilter,
        limit: i64,
    ) -> Result<Vec<Question>, RepositoryError>;

    /// Returns a question and its answers ordered by `upvotes desc, created_at asc`.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The question does not exist.
    async fn get_question_with_answers(
        &self,
        question_id: QuestionId,
    ) -> Result<Option<QuestionWithAnswers>, RepositoryError>;

    /// Stores a question and, optionally, its AI-generated answer in one transaction.
    ///
    /// `answer_count` starts at 1 when an AI answer is stored, 0 otherwise.
    async fn create_question(
        &self,
        question: &NewQuestion,
        ai_answer: Option<&str>,
    ) -> Result<QuestionWithAnswers, RepositoryError>;

    /// Stores an answer and increments the question's `answer_count` in one transaction.
    ///
    /// # Returns
    ///
    /// * `Err(RepositoryError::QuestionNotFound)` - The question does not exist.
    async fn create_answer(&self, answer: &NewAnswer) -> Result<Answer, RepositoryError>;
}
