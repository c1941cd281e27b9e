//! In-process implementation of the forum repository traits.
//!
//! All reads and writes go through one mutex, so every operation, including
//! the compare-then-write of `apply_vote_change`, is atomic. It backs unit
//! tests and local development; production deployments use the PostgreSQL
//! repositories.
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use forum_shared::transition;
use forum_shared::types::{
    Answer, Author, NewAnswer, NewQuestion, Question, QuestionFilter, QuestionId,
    QuestionWithAnswers, TargetId, TargetKind, UserId, UserVote, VoteAction, VoteChange, VoteTarget,
    VoteValue, VotesCount,
};
use uuid::Uuid;

use crate::{QuestionRepository, RepositoryError, VoteRepository};

#[derive(Default)]
struct ForumState {
    questions: HashMap<QuestionId, Question>,
    answers: HashMap<Uuid, Answer>,
    votes: HashMap<(UserId, TargetId), UserVote>,
}

impl ForumState {
    fn counter_mut(&mut self, target: &VoteTarget) -> Option<&mut i64> {
        match target.kind {
            TargetKind::Question => self.questions.get_mut(&target.id).map(|q| &mut q.upvotes),
            TargetKind::Answer => self.answers.get_mut(&target.id).map(|a| &mut a.upvotes),
        }
    }
}

/// Mutex-guarded forum store.
#[derive(Default)]
pub struct InMemoryForumRepository {
    state: Mutex<ForumState>,
}

impl InMemoryForumRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ForumState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored vote records on a target.
    pub fn vote_records(&self, target: &VoteTarget) -> usize {
        self.lock()
            .votes
            .values()
            .filter(|v| v.target == *target)
            .count()
    }
}

#[async_trait]
impl VoteRepository for InMemoryForumRepository {
    async fn get_vote(
        &self,
        user_id: &UserId,
        target: &VoteTarget,
    ) -> Result<Option<VoteValue>, RepositoryError> {
        Ok(self
            .lock()
            .votes
            .get(&(user_id.clone(), target.id))
            .map(|v| v.vote_type))
    }

    async fn apply_vote_change(
        &self,
        user_id: &UserId,
        target: &VoteTarget,
        prior: Option<VoteValue>,
        action: VoteAction,
    ) -> Result<VoteChange, RepositoryError> {
        let mut state = self.lock();
        if state.counter_mut(target).is_none() {
            return Err(RepositoryError::TargetNotFound(*target));
        }

        let key = (user_id.clone(), target.id);
        let stored = state.votes.get(&key).map(|v| v.vote_type);
        if stored != prior {
            return Err(RepositoryError::Conflict(*target));
        }

        let step = transition(prior, action);
        let now = Utc::now();
        match step.next {
            Some(vote_type) => {
                state
                    .votes
                    .entry(key)
                    .and_modify(|v| {
                        v.vote_type = vote_type;
                        v.updated_at = now;
                    })
                    .or_insert_with(|| UserVote {
                        user_id: user_id.clone(),
                        target: *target,
                        vote_type,
                        created_at: now,
                        updated_at: now,
                    });
            }
            None => {
                state.votes.remove(&key);
            }
        }

        let counter = state
            .counter_mut(target)
            .ok_or(RepositoryError::TargetNotFound(*target))?;
        *counter += step.delta;

        Ok(VoteChange {
            previous: prior,
            next: step.next,
            delta: step.delta,
            upvotes: *counter,
        })
    }

    async fn get_votes_count(&self, target: &VoteTarget) -> Result<VotesCount, RepositoryError> {
        let mut state = self.lock();
        let upvotes = *state
            .counter_mut(target)
            .ok_or(RepositoryError::TargetNotFound(*target))?;
        Ok(VotesCount {
            target: *target,
            upvotes,
        })
    }
}

#[async_trait]
impl QuestionRepository for InMemoryForumRepository {
    async fn list_questions(
        &self,
        filter: QuestionFilter,
        limit: i64,
    ) -> Result<Vec<Question>, RepositoryError> {
        let state = self.lock();
        let has_human_answer = |question_id: QuestionId| {
            state
                .answers
                .values()
                .any(|a| a.question_id == question_id && !a.author.is_ai_assistant())
        };
        let mut questions: Vec<Question> = state
            .questions
            .values()
            .filter(|q| filter != QuestionFilter::Unanswered || !has_human_answer(q.id))
            .cloned()
            .collect();

        match filter {
            QuestionFilter::Popular => questions.sort_by(|a, b| {
                b.upvotes
                    .cmp(&a.upvotes)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
            QuestionFilter::Latest | QuestionFilter::Unanswered => {
                questions.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
        }
        questions.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(questions)
    }

    async fn get_question_with_answers(
        &self,
        question_id: QuestionId,
    ) -> Result<Option<QuestionWithAnswers>, RepositoryError> {
        let state = self.lock();
        let Some(question) = state.questions.get(&question_id).cloned() else {
            return Ok(None);
        };
        let mut answers: Vec<Answer> = state
            .answers
            .values()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect();
        answers.sort_by(|a, b| {
            b.upvotes
                .cmp(&a.upvotes)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(Some(QuestionWithAnswers { question, answers }))
    }

    async fn create_question(
        &self,
        question: &NewQuestion,
        ai_answer: Option<&str>,
    ) -> Result<QuestionWithAnswers, RepositoryError> {
        let now = Utc::now();
        let created = Question {
            id: Uuid::new_v4(),
            title: question.title.clone(),
            body: question.body.clone(),
            summary: question.summary.clone(),
            tags: question.tags.clone(),
            author: question.author.clone(),
            created_at: now,
            answer_count: i32::from(ai_answer.is_some()),
            upvotes: 0,
        };
        let answers: Vec<Answer> = ai_answer
            .map(|body| Answer {
                id: Uuid::new_v4(),
                question_id: created.id,
                body: body.to_string(),
                author: Author::ai_assistant(),
                created_at: now,
                upvotes: 0,
            })
            .into_iter()
            .collect();

        let mut state = self.lock();
        state.questions.insert(created.id, created.clone());
        for answer in &answers {
            state.answers.insert(answer.id, answer.clone());
        }
        Ok(QuestionWithAnswers {
            question: created,
            answers,
        })
    }

    async fn create_answer(&self, answer: &NewAnswer) -> Result<Answer, RepositoryError> {
        let mut state = self.lock();
        let question = state
            .questions
            .get_mut(&answer.question_id)
            .ok_or(RepositoryError::QuestionNotFound(answer.question_id))?;
        question.answer_count += 1;

        let created = Answer {
            id: Uuid::new_v4(),
            question_id: answer.question_id,
            body: answer.body.clone(),
            author: answer.author.clone(),
            created_at: Utc::now(),
            upvotes: 0,
        };
        state.answers.insert(created.id, created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VoteAction::{ClickDown, ClickUp};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn new_question(title: &str) -> NewQuestion {
        NewQuestion {
            title: title.to_string(),
            body: "How do I register for electives?".to_string(),
            summary: "Elective registration".to_string(),
            tags: vec!["academics".to_string()],
            author: Author {
                id: "student-1".to_string(),
                name: "Student".to_string(),
                avatar_url: String::new(),
            },
        }
    }

    fn human_answer(question_id: QuestionId, body: &str, author: &str) -> NewAnswer {
        NewAnswer::by_user(
            question_id,
            body.to_string(),
            &user(author),
            author.to_uppercase(),
            String::new(),
        )
    }

    async fn seeded() -> (InMemoryForumRepository, VoteTarget) {
        let repository = InMemoryForumRepository::new();
        let created = repository.create_question(&new_question("Electives"), None).await.unwrap();
        (repository, VoteTarget::question(created.question.id))
    }

    #[tokio::test]
    async fn test_missing_vote_is_none() {
        let (repository, target) = seeded().await;
        assert_eq!(repository.get_vote(&user("u1"), &target).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_vote_lifecycle_keeps_counter_in_sync() {
        let (repository, target) = seeded().await;
        let u1 = user("u1");

        let change = repository.apply_vote_change(&u1, &target, None, ClickDown).await.unwrap();
        assert_eq!((change.next, change.delta, change.upvotes), (Some(VoteValue::Down), -1, -1));

        let change = repository
            .apply_vote_change(&u1, &target, Some(VoteValue::Down), ClickUp)
            .await
            .unwrap();
        assert_eq!((change.next, change.delta, change.upvotes), (Some(VoteValue::Up), 2, 1));
        assert_eq!(repository.vote_records(&target), 1);

        let change = repository
            .apply_vote_change(&u1, &target, Some(VoteValue::Up), ClickUp)
            .await
            .unwrap();
        assert_eq!((change.next, change.delta, change.upvotes), (None, -1, 0));
        assert_eq!(repository.vote_records(&target), 0);
        assert_eq!(repository.get_votes_count(&target).await.unwrap().upvotes, 0);
    }

    #[tokio::test]
    async fn test_stale_prior_is_a_conflict() {
        let (repository, target) = seeded().await;
        let u1 = user("u1");
        repository.apply_vote_change(&u1, &target, None, ClickUp).await.unwrap();

        let err = repository.apply_vote_change(&u1, &target, None, ClickUp).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(repository.vote_records(&target), 1);
        assert_eq!(repository.get_votes_count(&target).await.unwrap().upvotes, 1);
    }

    #[tokio::test]
    async fn test_unknown_target() {
        let repository = InMemoryForumRepository::new();
        let target = VoteTarget::answer(Uuid::new_v4());
        let err = repository
            .apply_vote_change(&user("u1"), &target, None, ClickUp)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::TargetNotFound(t) if t == target));
    }

    #[tokio::test]
    async fn test_answers_ordered_by_votes_then_age() {
        let (repository, target) = seeded().await;
        let question_id = target.id;
        let first = repository
            .create_answer(&human_answer(question_id, "first", "a"))
            .await
            .unwrap();
        let second = repository
            .create_answer(&human_answer(question_id, "second", "b"))
            .await
            .unwrap();
        repository
            .apply_vote_change(&user("u1"), &VoteTarget::answer(second.id), None, ClickUp)
            .await
            .unwrap();

        let detail = repository.get_question_with_answers(question_id).await.unwrap().unwrap();
        assert_eq!(detail.question.answer_count, 2);
        let order: Vec<Uuid> = detail.answers.iter().map(|a| a.id).collect();
        assert_eq!(order, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_unanswered_filter_ignores_ai_answers() {
        let repository = InMemoryForumRepository::new();
        let ai_only = repository
            .create_question(&new_question("AI only"), Some("Try the registrar."))
            .await
            .unwrap();
        let answered = repository
            .create_question(&new_question("Answered"), Some("AI"))
            .await
            .unwrap();
        repository
            .create_answer(&human_answer(answered.question.id, "human", "h"))
            .await
            .unwrap();
        // No AI answer, one human answer.
        let human_only = repository
            .create_question(&new_question("Human only"), None)
            .await
            .unwrap();
        repository
            .create_answer(&human_answer(human_only.question.id, "human", "h"))
            .await
            .unwrap();

        let unanswered = repository.list_questions(QuestionFilter::Unanswered, 20).await.unwrap();
        let ids: Vec<Uuid> = unanswered.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![ai_only.question.id]);
        assert_eq!(ai_only.question.answer_count, 1);
        assert!(ai_only.answers[0].author.is_ai_assistant());
    }

    #[tokio::test]
    async fn test_create_answer_for_unknown_question() {
        let repository = InMemoryForumRepository::new();
        let missing = Uuid::new_v4();
        let err = repository
            .create_answer(&human_answer(missing, "hello", "h"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::QuestionNotFound(id) if id == missing));
    }
}
