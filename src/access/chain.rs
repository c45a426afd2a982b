use crate::{
    access::{
        context::RequestContext,
        policy::{enforce, Policy},
        resolve::{resolve, Resolution},
    },
    errors::AppResult,
    repositories::Repositories,
};

/// Ordered guard pipeline for one route.
///
/// Resolution steps always run before policy steps, each group in the order
/// it was declared, since policies read what the resolutions attached.
#[derive(Debug, Default)]
pub struct GuardChain<'a> {
    resolutions: Vec<(Resolution, &'a str)>,
    policies: Vec<Policy>,
}

impl<'a> GuardChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(mut self, resolution: Resolution, raw: &'a str) -> Self {
        self.resolutions.push((resolution, raw));
        self
    }

    pub fn require(mut self, policy: Policy) -> Self {
        self.policies.push(policy);
        self
    }

    /// Runs every guard, stopping at the first failure.
    pub async fn run(
        self,
        ctx: RequestContext,
        repositories: &Repositories,
    ) -> AppResult<RequestContext> {
        let translator = ctx.translator();

        let mut ctx = ctx;
        for (resolution, raw) in self.resolutions {
            ctx = resolve(resolution, raw, ctx, repositories, &translator).await?;
        }

        for policy in self.policies {
            enforce(policy, &ctx, &translator)?;
        }

        Ok(ctx)
    }
}
