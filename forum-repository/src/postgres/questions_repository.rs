//! PostgreSQL implementation of the question and answer store.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forum_shared::types::{
    AI_ASSISTANT_ID, Answer, Author, NewAnswer, NewQuestion, Question, QuestionFilter, QuestionId,
    QuestionWithAnswers,
};
use uuid::Uuid;

use crate::{QuestionRepository, RepositoryError};

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: Uuid,
    title: String,
    body: String,
    summary: String,
    tags: Vec<String>,
    author_id: String,
    author_name: String,
    author_avatar_url: String,
    created_at: DateTime<Utc>,
    answer_count: i32,
    upvotes: i64,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Question {
            id: row.id,
            title: row.title,
            body: row.body,
            summary: row.summary,
            tags: row.tags,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                avatar_url: row.author_avatar_url,
            },
            created_at: row.created_at,
            answer_count: row.answer_count,
            upvotes: row.upvotes,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AnswerRow {
    id: Uuid,
    question_id: Uuid,
    body: String,
    author_id: String,
    author_name: String,
    author_avatar_url: String,
    created_at: DateTime<Utc>,
    upvotes: i64,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Answer {
            id: row.id,
            question_id: row.question_id,
            body: row.body,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                avatar_url: row.author_avatar_url,
            },
            created_at: row.created_at,
            upvotes: row.upvotes,
        }
    }
}

const QUESTION_COLUMNS: &str = "id, title, body, summary, tags, author_id, author_name, \
    author_avatar_url, created_at, answer_count, upvotes";
const ANSWER_COLUMNS: &str =
    "id, question_id, body, author_id, author_name, author_avatar_url, created_at, upvotes";

/// PostgreSQL implementation of the question and answer store.
pub struct PostgresQuestionRepository {
    pool: sqlx::PgPool,
}

impl PostgresQuestionRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    async fn insert_answer_tx(
        &self,
        question_id: QuestionId,
        body: &str,
        author: &Author,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Answer, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO answers
                (id, question_id, body, author_id, author_name, author_avatar_url,
                 created_at, upvotes)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), 0)
            RETURNING {ANSWER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, AnswerRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(question_id)
            .bind(body)
            .bind(&author.id)
            .bind(&author.name)
            .bind(&author.avatar_url)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.into())
    }
}

#[async_trait]
impl QuestionRepository for PostgresQuestionRepository {
    async fn list_questions(
        &self,
        filter: QuestionFilter,
        limit: i64,
    ) -> Result<Vec<Question>, RepositoryError> {
        let sql = match filter {
            QuestionFilter::Latest => format!(
                "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY created_at DESC LIMIT $1"
            ),
            QuestionFilter::Popular => format!(
                "SELECT {QUESTION_COLUMNS} FROM questions \
                 ORDER BY upvotes DESC, created_at DESC LIMIT $1"
            ),
            // Unanswered means no human answer; the AI answer does not count.
            QuestionFilter::Unanswered => format!(
                "SELECT {QUESTION_COLUMNS} FROM questions \
                 WHERE NOT EXISTS ( \
                     SELECT 1 FROM answers a \
                     WHERE a.question_id = questions.id AND a.author_id <> '{AI_ASSISTANT_ID}' \
                 ) \
                 ORDER BY created_at DESC LIMIT $1"
            ),
        };
        let rows = sqlx::query_as::<_, QuestionRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn get_question_with_answers(
        &self,
        question_id: QuestionId,
    ) -> Result<Option<QuestionWithAnswers>, RepositoryError> {
        let question_sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1");
        let Some(question) = sqlx::query_as::<_, QuestionRow>(&question_sql)
            .bind(question_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let answers_sql = format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE question_id = $1 \
             ORDER BY upvotes DESC, created_at ASC"
        );
        let answers = sqlx::query_as::<_, AnswerRow>(&answers_sql)
            .bind(question_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(QuestionWithAnswers {
            question: question.into(),
            answers: answers.into_iter().map(Answer::from).collect(),
        }))
    }

    async fn create_question(
        &self,
        question: &NewQuestion,
        ai_answer: Option<&str>,
    ) -> Result<QuestionWithAnswers, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO questions
                (id, title, body, summary, tags, author_id, author_name, author_avatar_url,
                 created_at, answer_count, upvotes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), $9, 0)
            RETURNING {QUESTION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, QuestionRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&question.title)
            .bind(&question.body)
            .bind(&question.summary)
            .bind(&question.tags)
            .bind(&question.author.id)
            .bind(&question.author.name)
            .bind(&question.author.avatar_url)
            .bind(i32::from(ai_answer.is_some()))
            .fetch_one(&mut *tx)
            .await?;
        let created: Question = row.into();

        let mut answers = Vec::new();
        if let Some(body) = ai_answer {
            let answer = self
                .insert_answer_tx(created.id, body, &Author::ai_assistant(), &mut tx)
                .await?;
            answers.push(answer);
        }

        tx.commit().await?;
        Ok(QuestionWithAnswers {
            question: created,
            answers,
        })
    }

    async fn create_answer(&self, answer: &NewAnswer) -> Result<Answer, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let bumped = sqlx::query_scalar::<_, Uuid>(
            "UPDATE questions SET answer_count = answer_count + 1 WHERE id = $1 RETURNING id",
        )
        .bind(answer.question_id)
        .fetch_optional(&mut *tx)
        .await?;
        if bumped.is_none() {
            return Err(RepositoryError::QuestionNotFound(answer.question_id));
        }

        let created = self
            .insert_answer_tx(answer.question_id, &answer.body, &answer.author, &mut tx)
            .await?;
        tx.commit().await?;
        Ok(created)
    }
}
