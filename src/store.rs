//! In-memory quiz persistence: quizzes, their questions and answers.
//!
//! Generated MCQs are saved as a quiz owned by the uploader. Records are
//! keyed by UUID strings; ordering of questions follows insertion.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::Mcq;
use crate::error::StoreError;

#[derive(Clone, Debug, Serialize)]
pub struct QuizRecord {
  pub id: String,
  pub title: String,
  pub created_by: String,
  pub created_at: DateTime<Utc>,
  pub question_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct QuestionRecord {
  pub id: String,
  pub quiz_id: String,
  pub question_text: String,
  pub answer_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnswerRecord {
  pub id: String,
  pub question_id: String,
  pub answer_text: String,
  pub is_correct: bool,
}

/// A quiz with its questions and answers resolved.
#[derive(Clone, Debug, Serialize)]
pub struct QuizView {
  pub id: String,
  pub title: String,
  pub created_by: String,
  pub created_at: DateTime<Utc>,
  pub questions: Vec<QuestionView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct QuestionView {
  pub id: String,
  pub question_text: String,
  pub answers: Vec<AnswerRecord>,
}

/// Id and text of one question written by `save_generated_quiz`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreatedQuestion {
  pub question_id: String,
  pub question_text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SavedQuiz {
  pub quiz_id: String,
  pub questions: Vec<CreatedQuestion>,
}

#[derive(Clone, Default)]
pub struct QuizStore {
  quizzes: Arc<RwLock<HashMap<String, QuizRecord>>>,
  questions: Arc<RwLock<HashMap<String, QuestionRecord>>>,
  answers: Arc<RwLock<HashMap<String, AnswerRecord>>>,
}

impl QuizStore {
  pub fn new() -> Self {
    Self::default()
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn create_quiz(&self, title: &str, created_by: &str) -> QuizRecord {
    let quiz = QuizRecord {
      id: Uuid::new_v4().to_string(),
      title: title.to_string(),
      created_by: created_by.to_string(),
      created_at: Utc::now(),
      question_ids: Vec::new(),
    };
    self.quizzes.write().await.insert(quiz.id.clone(), quiz.clone());
    quiz
  }

  #[instrument(level = "debug", skip(self, question_text))]
  pub async fn create_question(&self, quiz_id: &str, question_text: &str) -> Result<QuestionRecord, StoreError> {
    let mut quizzes = self.quizzes.write().await;
    let quiz = quizzes.get_mut(quiz_id).ok_or_else(|| StoreError::UnknownQuiz(quiz_id.to_string()))?;
    let question = QuestionRecord {
      id: Uuid::new_v4().to_string(),
      quiz_id: quiz_id.to_string(),
      question_text: question_text.to_string(),
      answer_ids: Vec::new(),
    };
    quiz.question_ids.push(question.id.clone());
    self.questions.write().await.insert(question.id.clone(), question.clone());
    Ok(question)
  }

  #[instrument(level = "debug", skip(self, answer_text))]
  pub async fn create_answer(&self, question_id: &str, answer_text: &str, is_correct: bool) -> Result<AnswerRecord, StoreError> {
    let mut questions = self.questions.write().await;
    let question = questions
      .get_mut(question_id)
      .ok_or_else(|| StoreError::UnknownQuestion(question_id.to_string()))?;
    let answer = AnswerRecord {
      id: Uuid::new_v4().to_string(),
      question_id: question_id.to_string(),
      answer_text: answer_text.to_string(),
      is_correct,
    };
    question.answer_ids.push(answer.id.clone());
    self.answers.write().await.insert(answer.id.clone(), answer.clone());
    Ok(answer)
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn get_quiz(&self, id: &str) -> Result<QuizView, StoreError> {
    let quiz = { self.quizzes.read().await.get(id).cloned() }.ok_or_else(|| StoreError::UnknownQuiz(id.to_string()))?;
    let questions = self.questions.read().await;
    let answers = self.answers.read().await;

    let questions = quiz
      .question_ids
      .iter()
      .filter_map(|qid| questions.get(qid))
      .map(|q| QuestionView {
        id: q.id.clone(),
        question_text: q.question_text.clone(),
        answers: q.answer_ids.iter().filter_map(|aid| answers.get(aid).cloned()).collect(),
      })
      .collect();

    Ok(QuizView {
      id: quiz.id,
      title: quiz.title,
      created_by: quiz.created_by,
      created_at: quiz.created_at,
      questions,
    })
  }

  /// Persist a generated batch as a new quiz.
  #[instrument(level = "info", skip(self, mcqs), fields(count = mcqs.len()))]
  pub async fn save_generated_quiz(&self, title: &str, created_by: &str, mcqs: &[Mcq]) -> Result<SavedQuiz, StoreError> {
    let quiz = self.create_quiz(title, created_by).await;
    let mut questions = Vec::with_capacity(mcqs.len());
    for mcq in mcqs {
      let question = self.create_question(&quiz.id, &mcq.question_text).await?;
      for answer in &mcq.answers {
        self.create_answer(&question.id, &answer.answer_text, answer.is_correct).await?;
      }
      questions.push(CreatedQuestion { question_id: question.id, question_text: question.question_text });
    }
    info!(target: "quizgen_backend", quiz_id = %quiz.id, questions = questions.len(), "Quiz saved");
    Ok(SavedQuiz { quiz_id: quiz.id, questions })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::AnswerOption;

  fn mcq(q: &str) -> Mcq {
    Mcq {
      question_text: q.into(),
      answers: vec![
        AnswerOption::wrong("w1"),
        AnswerOption::correct("right"),
        AnswerOption::wrong("w2"),
        AnswerOption::wrong("w3"),
      ],
    }
  }

  #[tokio::test]
  async fn saved_batch_reads_back_in_order() {
    let store = QuizStore::new();
    let saved = store.save_generated_quiz("Cells", "Ms. Rivera", &[mcq("Q1?"), mcq("Q2?")]).await.expect("saved");
    assert_eq!(saved.questions.len(), 2);
    assert_eq!(saved.questions[1].question_text, "Q2?");

    let quiz = store.get_quiz(&saved.quiz_id).await.expect("stored");
    assert_eq!(quiz.title, "Cells");
    assert_eq!(quiz.questions[0].question_text, "Q1?");
    assert_eq!(quiz.questions[1].id, saved.questions[1].question_id);
    assert_eq!(quiz.questions[0].answers.len(), 4);
    assert!(quiz.questions[0].answers[1].is_correct);
  }

  #[tokio::test]
  async fn unknown_ids_are_errors() {
    let store = QuizStore::new();
    assert!(matches!(store.get_quiz("nope").await, Err(StoreError::UnknownQuiz(_))));
    assert!(matches!(store.create_question("nope", "Q?").await, Err(StoreError::UnknownQuiz(_))));
    assert!(matches!(store.create_answer("nope", "a", true).await, Err(StoreError::UnknownQuestion(_))));
  }
}
