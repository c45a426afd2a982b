use crate::{
    access::context::RequestContext,
    auth::Identity,
    errors::{AppError, AppResult},
    i18n::{MessageKey, Translate},
    models::domain::UserRole,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    Authenticated,
    AdminOnly,
    /// Carries the message shown to non-students, e.g. "only students may join".
    StudentOnly(MessageKey),
    TeacherOrAdmin,
    TeacherOfClass,
    MemberOfClass,
    AuthorOfQuiz,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Admit,
    Deny(Denial),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated,
    PermissionDenied(MessageKey),
    NotTeacherOfClass,
}

/// `None` means an entity the rule depends on is missing from the context.
type Check = fn(&Identity, &RequestContext) -> Option<bool>;

struct Rule {
    admin_bypass: bool,
    check: Check,
    denial: Denial,
}

impl Policy {
    fn rule(self) -> Rule {
        match self {
            Policy::Authenticated => Rule {
                admin_bypass: false,
                check: |_, _| Some(true),
                denial: Denial::Unauthenticated,
            },
            Policy::AdminOnly => Rule {
                admin_bypass: true,
                check: |_, _| Some(false),
                denial: Denial::PermissionDenied(MessageKey::AdminOnly),
            },
            Policy::StudentOnly(message) => Rule {
                admin_bypass: false,
                check: |identity, _| Some(identity.role == UserRole::Student),
                denial: Denial::PermissionDenied(message),
            },
            Policy::TeacherOrAdmin => Rule {
                admin_bypass: true,
                check: |identity, _| Some(identity.role == UserRole::Teacher),
                denial: Denial::PermissionDenied(MessageKey::TeacherOrAdminOnly),
            },
            Policy::TeacherOfClass => Rule {
                admin_bypass: true,
                check: |identity, ctx| ctx.classe().map(|c| c.has_teacher(&identity.id)),
                denial: Denial::NotTeacherOfClass,
            },
            Policy::MemberOfClass => Rule {
                admin_bypass: true,
                check: |identity, ctx| ctx.classe().map(|c| c.has_member(&identity.id)),
                denial: Denial::PermissionDenied(MessageKey::NotMemberOfClass),
            },
            Policy::AuthorOfQuiz => Rule {
                admin_bypass: true,
                check: |identity, ctx| ctx.quiz().map(|q| q.is_authored_by(&identity.id)),
                denial: Denial::PermissionDenied(MessageKey::NotAuthorOfQuiz),
            },
        }
    }
}

/// Pure admit/deny decision. Admin bypass is applied here and nowhere else.
pub fn decide(policy: Policy, ctx: &RequestContext) -> Decision {
    let Some(identity) = ctx.user() else {
        return Decision::Deny(Denial::Unauthenticated);
    };

    let rule = policy.rule();
    match (rule.check)(identity, ctx) {
        None => Decision::Deny(Denial::Unauthenticated),
        Some(_) if rule.admin_bypass && identity.is_admin() => Decision::Admit,
        Some(true) => Decision::Admit,
        Some(false) => Decision::Deny(rule.denial),
    }
}

/// Policy guard: turns a denial into the matching translated error.
pub fn enforce(policy: Policy, ctx: &RequestContext, translator: &dyn Translate) -> AppResult<()> {
    match decide(policy, ctx) {
        Decision::Admit => Ok(()),
        Decision::Deny(denial) => {
            log::debug!(
                "{:?} denied {:?} for user {:?}",
                policy,
                denial,
                ctx.user().map(|u| u.id.as_str())
            );
            Err(denial_error(denial, translator))
        }
    }
}

fn denial_error(denial: Denial, translator: &dyn Translate) -> AppError {
    match denial {
        Denial::Unauthenticated => {
            AppError::Unauthorized(translator.translate(MessageKey::AuthenticationRequired))
        }
        Denial::PermissionDenied(key) => AppError::Forbidden(translator.translate(key)),
        Denial::NotTeacherOfClass => {
            AppError::NotTeacherOfClass(translator.translate(MessageKey::NotTeacherOfClass))
        }
    }
}
