use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    access::{GuardChain, Policy, RequestContext, Resolution},
    app_state::AppState,
    errors::AppError,
    models::dto::request::{CreateQuestionRequest, CreateQuizRequest},
};

#[post("/api/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    ctx: RequestContext,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .require(Policy::TeacherOrAdmin)
        .run(ctx, &state.repositories)
        .await?;

    let quiz = state
        .quiz_service
        .create(request.into_inner(), ctx.require_user()?, &ctx.translator())
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[get("/api/quizzes")]
pub async fn list_quizzes(
    state: web::Data<AppState>,
    ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .require(Policy::Authenticated)
        .run(ctx, &state.repositories)
        .await?;

    let quizzes = state
        .quiz_service
        .list_by_author(ctx.require_user()?)
        .await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/api/quizzes/{quiz_id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    ctx: RequestContext,
    quiz_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .resolve(Resolution::Quiz, &quiz_id)
        .require(Policy::AuthorOfQuiz)
        .run(ctx, &state.repositories)
        .await?;

    Ok(HttpResponse::Ok().json(ctx.resolved_quiz()?))
}

#[delete("/api/quizzes/{quiz_id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    ctx: RequestContext,
    quiz_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .resolve(Resolution::Quiz, &quiz_id)
        .require(Policy::AuthorOfQuiz)
        .run(ctx, &state.repositories)
        .await?;

    state
        .quiz_service
        .delete(ctx.resolved_quiz()?, &ctx.translator())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/quizzes/{quiz_id}/questions")]
pub async fn add_question(
    state: web::Data<AppState>,
    ctx: RequestContext,
    quiz_id: web::Path<String>,
    request: web::Json<CreateQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .resolve(Resolution::Quiz, &quiz_id)
        .require(Policy::AuthorOfQuiz)
        .run(ctx, &state.repositories)
        .await?;

    let quiz = state
        .quiz_service
        .add_question(ctx.resolved_quiz()?, request.into_inner(), &ctx.translator())
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}
