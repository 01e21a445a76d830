use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_categories_map,
            questions::{self, count_questions, get_all_questions, get_question, search_questions},
        },
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
        extractors::{Json, Path, Query},
        pagination::{paginate, PageQuery},
    },
};

#[derive(Deserialize)]
struct QuestionPayload {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl QuestionPayload {
    fn validate(&self) -> Result<NewQuestion<'_>, ApiError> {
        fn text<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, ApiError> {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(ApiError::Unprocessable(format!("Field `{field}` is required"))),
            }
        }
        fn number(field: &'static str, value: Option<i64>) -> Result<i64, ApiError> {
            value.ok_or_else(|| ApiError::Unprocessable(format!("Field `{field}` is required")))
        }

        Ok(NewQuestion {
            question: text("question", &self.question)?,
            answer: text("answer", &self.answer)?,
            category: number("category", self.category)?,
            difficulty: number("difficulty", self.difficulty)?,
        })
    }
}

#[derive(Deserialize)]
struct SearchPayload {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct DeletedQuestion {
    success: bool,
    deleted: String,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct CreatedQuestion {
    success: bool,
    created: i64,
    question_created: String,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    Query(page): Query<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let selection = get_all_questions(&pool).await?;
    let total_questions = selection.len() as i64;
    let questions = paginate(page.page(), selection);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(axum::Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories: get_categories_map(&pool).await?,
        current_category: None,
    }))
}

// `deleted` echoes the path segment verbatim. A missing question is reported
// as unprocessable, like any other failed delete.
async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(question_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> ApiResponse<DeletedQuestion> {
    let id: i64 = question_id
        .parse()
        .map_err(|_| ApiError::Unprocessable(format!("Question id {question_id} is not numeric")))?;
    if get_question(&pool, id).await?.is_none() {
        return Err(ApiError::Unprocessable(format!("Question {id} does not exist")));
    }
    questions::delete_question(&pool, id).await?;
    tracing::info!("Deleted question {id}");

    let selection = get_all_questions(&pool).await?;
    Ok(axum::Json(DeletedQuestion {
        success: true,
        deleted: question_id,
        total_questions: selection.len() as i64,
        questions: paginate(page.page(), selection),
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    Query(page): Query<PageQuery>,
    Json(payload): Json<QuestionPayload>,
) -> ApiResponse<CreatedQuestion> {
    let new = payload.validate()?;
    let question_created = new.question.to_owned();
    let id = questions::create_question(&pool, new).await?;
    tracing::info!("Created question {id}");

    let selection = get_all_questions(&pool).await?;
    Ok(axum::Json(CreatedQuestion {
        success: true,
        created: id,
        question_created,
        total_questions: selection.len() as i64,
        questions: paginate(page.page(), selection),
        current_category: None,
    }))
}

// An empty match set is a successful response. total_questions counts every
// question, not the matches.
async fn search(
    State(pool): State<SqlitePool>,
    Query(page): Query<PageQuery>,
    Json(payload): Json<SearchPayload>,
) -> ApiResponse<SearchResults> {
    let term = payload.search_term.unwrap_or_default();
    let selection = search_questions(&pool, &term).await?;
    tracing::debug!("Search for {term:?} matched {} questions", selection.len());

    Ok(axum::Json(SearchResults {
        success: true,
        questions: paginate(page.page(), selection),
        total_questions: count_questions(&pool).await?,
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions))
        .route("/questions/{id}", delete(delete_question))
        .route("/questions/add", post(create_question))
        .route("/questions/searchTerm", post(search))
        .with_state(state)
}
