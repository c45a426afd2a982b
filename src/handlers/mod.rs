pub mod auth_handler;
pub mod classe_handler;
pub mod health;
pub mod quiz_handler;
pub mod user_handler;

use actix_web::{error::JsonPayloadError, error::QueryPayloadError, web, HttpRequest};

use crate::{
    access::context::request_translator,
    errors::AppError,
    i18n::{MessageKey, Translate},
};

/// Registers every route plus JSON/query error handlers that answer in the
/// same error shape as the guards.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(health::health_check)
        .service(health::health_check_live)
        .service(health::health_check_ready)
        .service(auth_handler::register)
        .service(auth_handler::login)
        .service(auth_handler::me)
        .service(user_handler::list_users)
        .service(user_handler::get_user)
        .service(user_handler::update_role)
        .service(user_handler::delete_user)
        .service(classe_handler::join_classe)
        .service(classe_handler::create_classe)
        .service(classe_handler::list_classes)
        .service(classe_handler::get_classe)
        .service(classe_handler::delete_classe)
        .service(classe_handler::add_student)
        .service(classe_handler::remove_student)
        .service(classe_handler::add_teacher)
        .service(classe_handler::remove_teacher)
        .service(classe_handler::list_classe_quizzes)
        .service(classe_handler::assign_quiz)
        .service(classe_handler::unassign_quiz)
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::list_quizzes)
        .service(quiz_handler::get_quiz)
        .service(quiz_handler::delete_quiz)
        .service(quiz_handler::add_question);
}

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON body: {}", err);
    malformed(req).into()
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected query string: {}", err);
    malformed(req).into()
}

fn malformed(req: &HttpRequest) -> AppError {
    let translator = request_translator(req);
    AppError::ValidationError(translator.translate(MessageKey::ValidationFailed), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app_state::AppState,
        config::Config,
        test_utils::{fixtures::untouched_repositories, test_helpers::assert_error_status},
    };
    use actix_web::{http::StatusCode, test, App};

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::with_repositories(
            Config::test_config(),
            untouched_repositories(),
        ))
    }

    #[actix_web::test]
    async fn test_malformed_json_uses_error_shape() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/classes")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_status(resp.status());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["message"], "The request is invalid");
    }

    #[actix_web::test]
    async fn test_invalid_identifier_is_rejected_before_any_lookup() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/classes/invalid-uuid")
            .insert_header(("accept-language", "fr"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "L'identifiant n'est pas un UUID valide");
    }

    #[actix_web::test]
    async fn test_anonymous_listing_is_unauthorized() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/classes").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
