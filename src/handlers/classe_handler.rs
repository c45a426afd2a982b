use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    access::{decide, Decision, GuardChain, Policy, RequestContext, Resolution},
    app_state::AppState,
    errors::AppError,
    i18n::MessageKey,
    models::{
        domain::Membership,
        dto::{
            request::{CreateClasseRequest, JoinClasseRequest},
            response::MemberQuizDto,
        },
    },
    validation::validate_request,
};

#[post("/api/classes")]
pub async fn create_classe(
    state: web::Data<AppState>,
    ctx: RequestContext,
    request: web::Json<CreateClasseRequest>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .require(Policy::TeacherOrAdmin)
        .run(ctx, &state.repositories)
        .await?;

    let classe = state
        .classe_service
        .create(request.into_inner(), ctx.require_user()?, &ctx.translator())
        .await?;
    Ok(HttpResponse::Created().json(classe))
}

#[get("/api/classes")]
pub async fn list_classes(
    state: web::Data<AppState>,
    ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .require(Policy::Authenticated)
        .run(ctx, &state.repositories)
        .await?;

    let classes = state.classe_service.list_for(ctx.require_user()?).await?;
    Ok(HttpResponse::Ok().json(classes))
}

#[post("/api/classes/join")]
pub async fn join_classe(
    state: web::Data<AppState>,
    ctx: RequestContext,
    request: web::Json<JoinClasseRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner().normalized();
    validate_request(&request, &ctx.translator())?;

    let ctx = GuardChain::new()
        .resolve(Resolution::ClasseCode, &request.code)
        .require(Policy::StudentOnly(MessageKey::OnlyStudentsCanJoin))
        .run(ctx, &state.repositories)
        .await?;

    let classe = state
        .classe_service
        .join(ctx.resolved_classe()?, ctx.require_user()?, &ctx.translator())
        .await?;
    Ok(HttpResponse::Ok().json(classe))
}

#[get("/api/classes/{classe_id}")]
pub async fn get_classe(
    state: web::Data<AppState>,
    ctx: RequestContext,
    classe_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .resolve(Resolution::Classe, &classe_id)
        .require(Policy::MemberOfClass)
        .run(ctx, &state.repositories)
        .await?;

    Ok(HttpResponse::Ok().json(ctx.resolved_classe()?))
}

#[delete("/api/classes/{classe_id}")]
pub async fn delete_classe(
    state: web::Data<AppState>,
    ctx: RequestContext,
    classe_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .resolve(Resolution::Classe, &classe_id)
        .require(Policy::TeacherOfClass)
        .run(ctx, &state.repositories)
        .await?;

    state
        .classe_service
        .delete(ctx.resolved_classe()?, &ctx.translator())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[put("/api/classes/{classe_id}/students/{student_id}")]
pub async fn add_student(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (classe_id, student_id) = path.into_inner();
    let ctx = GuardChain::new()
        .resolve(Resolution::Classe, &classe_id)
        .resolve(Resolution::Student, &student_id)
        .require(Policy::TeacherOfClass)
        .run(ctx, &state.repositories)
        .await?;

    let classe = state
        .classe_service
        .add_member(
            ctx.resolved_classe()?,
            Membership::Student,
            &ctx.resolved_student()?.id,
            &ctx.translator(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(classe))
}

#[delete("/api/classes/{classe_id}/students/{student_id}")]
pub async fn remove_student(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (classe_id, student_id) = path.into_inner();
    let ctx = GuardChain::new()
        .resolve(Resolution::Classe, &classe_id)
        .resolve(Resolution::Student, &student_id)
        .require(Policy::TeacherOfClass)
        .run(ctx, &state.repositories)
        .await?;

    let classe = state
        .classe_service
        .remove_member(
            ctx.resolved_classe()?,
            Membership::Student,
            &ctx.resolved_student()?.id,
            &ctx.translator(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(classe))
}

#[put("/api/classes/{classe_id}/teachers/{teacher_id}")]
pub async fn add_teacher(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (classe_id, teacher_id) = path.into_inner();
    let ctx = GuardChain::new()
        .resolve(Resolution::Classe, &classe_id)
        .resolve(Resolution::Teacher, &teacher_id)
        .require(Policy::TeacherOfClass)
        .run(ctx, &state.repositories)
        .await?;

    let classe = state
        .classe_service
        .add_member(
            ctx.resolved_classe()?,
            Membership::Teacher,
            &ctx.resolved_teacher()?.id,
            &ctx.translator(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(classe))
}

#[delete("/api/classes/{classe_id}/teachers/{teacher_id}")]
pub async fn remove_teacher(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (classe_id, teacher_id) = path.into_inner();
    let ctx = GuardChain::new()
        .resolve(Resolution::Classe, &classe_id)
        .resolve(Resolution::Teacher, &teacher_id)
        .require(Policy::TeacherOfClass)
        .run(ctx, &state.repositories)
        .await?;

    let classe = state
        .classe_service
        .remove_member(
            ctx.resolved_classe()?,
            Membership::Teacher,
            &ctx.resolved_teacher()?.id,
            &ctx.translator(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(classe))
}

#[get("/api/classes/{classe_id}/quizzes")]
pub async fn list_classe_quizzes(
    state: web::Data<AppState>,
    ctx: RequestContext,
    classe_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .resolve(Resolution::Classe, &classe_id)
        .require(Policy::MemberOfClass)
        .run(ctx, &state.repositories)
        .await?;

    let quizzes = state
        .quiz_service
        .list_for_classe(ctx.resolved_classe()?)
        .await?;

    // Teachers of the class (and admins) see the answer key, students do not.
    if decide(Policy::TeacherOfClass, &ctx) == Decision::Admit {
        return Ok(HttpResponse::Ok().json(quizzes));
    }
    let quizzes: Vec<MemberQuizDto> = quizzes.into_iter().map(MemberQuizDto::from).collect();
    Ok(HttpResponse::Ok().json(quizzes))
}

#[put("/api/classes/{classe_id}/quizzes/{quiz_id}")]
pub async fn assign_quiz(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (classe_id, quiz_id) = path.into_inner();
    let ctx = GuardChain::new()
        .resolve(Resolution::Classe, &classe_id)
        .resolve(Resolution::Quiz, &quiz_id)
        .require(Policy::TeacherOfClass)
        .require(Policy::AuthorOfQuiz)
        .run(ctx, &state.repositories)
        .await?;

    let quiz = state
        .quiz_service
        .assign(ctx.resolved_quiz()?, ctx.resolved_classe()?, &ctx.translator())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/api/classes/{classe_id}/quizzes/{quiz_id}")]
pub async fn unassign_quiz(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (classe_id, quiz_id) = path.into_inner();
    let ctx = GuardChain::new()
        .resolve(Resolution::Classe, &classe_id)
        .resolve(Resolution::Quiz, &quiz_id)
        .require(Policy::TeacherOfClass)
        .require(Policy::AuthorOfQuiz)
        .run(ctx, &state.repositories)
        .await?;

    let quiz = state
        .quiz_service
        .unassign(ctx.resolved_quiz()?, ctx.resolved_classe()?, &ctx.translator())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}
