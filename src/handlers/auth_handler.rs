use actix_web::{get, post, web, HttpResponse};

use crate::{
    access::{GuardChain, Policy, RequestContext},
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{LoginRequest, RegisterRequest},
        response::{AuthResponse, UserDto},
    },
};

#[post("/api/auth/register")]
pub async fn register(
    state: web::Data<AppState>,
    ctx: RequestContext,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .user_service
        .register(request.into_inner(), &ctx.translator())
        .await?;
    let token = state.jwt_service.create_token(&user)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: UserDto::from(user),
    }))
}

#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    ctx: RequestContext,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .user_service
        .login(request.into_inner(), &ctx.translator())
        .await?;
    let token = state.jwt_service.create_token(&user)?;

    log::info!("User {} logged in", user.id);
    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserDto::from(user),
    }))
}

#[get("/api/auth/me")]
pub async fn me(state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse, AppError> {
    let ctx = GuardChain::new()
        .require(Policy::Authenticated)
        .run(ctx, &state.repositories)
        .await?;

    let user = state
        .user_service
        .get_current(ctx.require_user()?, &ctx.translator())
        .await?;
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}
