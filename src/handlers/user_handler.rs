use actix_web::{delete, get, patch, web, HttpResponse};

use crate::{
    access::{GuardChain, Policy, RequestContext, Resolution},
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{PaginationParams, UpdateRoleRequest},
        response::UserDto,
    },
    validation::validate_request,
};

#[get("/api/users")]
pub async fn list_users(
    state: web::Data<AppState>,
    ctx: RequestContext,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .require(Policy::AdminOnly)
        .run(ctx, &state.repositories)
        .await?;
    validate_request(&*query, &ctx.translator())?;

    let response = state.user_service.list(&query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/users/{user_id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    ctx: RequestContext,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .resolve(Resolution::User, &user_id)
        .require(Policy::AdminOnly)
        .run(ctx, &state.repositories)
        .await?;

    let user = ctx.resolved_user()?.clone();
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

#[patch("/api/users/{user_id}/role")]
pub async fn update_role(
    state: web::Data<AppState>,
    ctx: RequestContext,
    user_id: web::Path<String>,
    request: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .resolve(Resolution::User, &user_id)
        .require(Policy::AdminOnly)
        .run(ctx, &state.repositories)
        .await?;
    let translator = ctx.translator();
    validate_request(&*request, &translator)?;

    let user = state
        .user_service
        .change_role(ctx.resolved_user()?, request.role, &translator)
        .await?;
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

#[delete("/api/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    ctx: RequestContext,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .resolve(Resolution::User, &user_id)
        .require(Policy::AdminOnly)
        .run(ctx, &state.repositories)
        .await?;

    state
        .user_service
        .delete(ctx.resolved_user()?, &ctx.translator())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
