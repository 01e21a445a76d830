use std::collections::HashSet;

use axum::{extract::State, routing::post, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_category,
            questions::{get_all_questions, get_questions_for_category},
        },
        Question,
    },
    server::{
        app::AppState,
        deserializers::LooseI64,
        error::{ApiError, ApiResponse},
        extractors::Json,
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

/// Category id the web client sends when the player picks "All".
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizCategory {
    id: LooseI64,
}

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Vec<LooseI64>,
    // a malformed category is a bad request, so it is decoded in the handler
    quiz_category: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

async fn play(
    State(pool): State<SqlitePool>,
    Json(request): Json<QuizRequest>,
) -> ApiResponse<QuizQuestion> {
    let category = match request.quiz_category {
        None | Some(serde_json::Value::Null) => {
            return Err(ApiError::bad_request("Missing quiz_category"))
        }
        Some(value) => serde_json::from_value::<QuizCategory>(value)
            .map_err(|e| ApiError::bad_request(format!("Malformed quiz_category: {e}")))?
            .id
            .0,
    };

    let candidates = if category == ALL_CATEGORIES {
        get_all_questions(&pool).await?
    } else {
        get_category(&pool, category)
            .await?
            .ok_or_else(|| ApiError::bad_request(format!("Unknown category {category}")))?;
        get_questions_for_category(&pool, category).await?
    };

    let previous: HashSet<i64> = request.previous_questions.iter().map(|id| id.0).collect();
    let question = pick_question(candidates, &previous);

    match &question {
        Some(q) => {
            let label = if category == ALL_CATEGORIES {
                "all".to_owned()
            } else {
                category.to_string()
            };
            QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
            tracing::debug!("Serving quiz question {} for category {label}", q.id);
        }
        None => tracing::debug!("Quiz over after {} questions", previous.len()),
    }

    Ok(axum::Json(QuizQuestion {
        success: true,
        question,
    }))
}

/// A random candidate that has not been asked yet, or `None` once all have.
fn pick_question(candidates: Vec<Question>, previous: &HashSet<i64>) -> Option<Question> {
    let remaining: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    remaining.choose(&mut rand::thread_rng()).cloned()
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64) -> Question {
        Question {
            id,
            question: format!("question {id}"),
            answer: "answer".into(),
            category: 1,
            difficulty: 1,
        }
    }

    #[test]
    fn never_repeats_previous_questions() {
        let previous: HashSet<i64> = [1, 2].into_iter().collect();
        for _ in 0..20 {
            let picked = pick_question(vec![question(1), question(2), question(3)], &previous);
            assert_eq!(picked.map(|q| q.id), Some(3));
        }
    }

    #[test]
    fn exhausted_pool_yields_none() {
        let previous: HashSet<i64> = [1].into_iter().collect();
        assert!(pick_question(vec![question(1)], &previous).is_none());
        assert!(pick_question(vec![], &HashSet::new()).is_none());
    }
}
