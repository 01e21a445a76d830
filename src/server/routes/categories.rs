use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_categories_map, get_category},
            questions::{count_questions, get_questions_for_category},
        },
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
        extractors::{Path, Query},
        pagination::{paginate, PageQuery},
    },
};

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: String,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesBody> {
    let categories = get_categories_map(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody {
        success: true,
        total_categories: categories.len(),
        categories,
    }))
}

// total_questions counts every question, not just this category's.
async fn questions_by_category(
    State(pool): State<SqlitePool>,
    Path(category_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> ApiResponse<CategoryQuestionsBody> {
    let category = get_category(&pool, category_id)
        .await?
        .ok_or_else(|| ApiError::bad_request(format!("Unknown category {category_id}")))?;
    let selection = get_questions_for_category(&pool, category.id).await?;

    Ok(Json(CategoryQuestionsBody {
        success: true,
        questions: paginate(page.page(), selection),
        total_questions: count_questions(&pool).await?,
        current_category: category.kind,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_by_category))
        .with_state(state)
}
