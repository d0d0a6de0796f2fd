//! Wrapper entry point: pick the target, then exec it

use crate::argv::read_argv;
use crate::context::WrapperContext;
use crate::envv::read_envv;
use crate::exec::{ExecPlan, Execve, ProcessImage};
use crate::redirect::RuntimeRedirect;
use execwrap_common::Result;
use log::{debug, warn};
use std::convert::Infallible;

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    redirect: RuntimeRedirect,
}

impl Dispatcher {
    pub fn new(redirect: RuntimeRedirect) -> Self {
        Self { redirect }
    }

    /// Decide what to exec for `ctx` without exec'ing it.
    pub fn plan(&self, ctx: &WrapperContext) -> Result<ExecPlan> {
        if self.redirect.applies_to(ctx) && !self.redirect.host_ready() {
            warn!(
                "nvidia driver modules are not yet loaded, invoking {} directly",
                self.redirect.fallback
            );
            return self.redirect.plan(ctx);
        }
        let plan = ExecPlan {
            program: ctx.real_binary(),
            argv: read_argv(ctx),
            envv: read_envv(ctx),
        };
        debug!("exec {} with {} args", plan.program.display(), plan.argv.len());
        Ok(plan)
    }

    /// Plan and hand over to `image`. Only returns on failure.
    pub fn run(&self, ctx: &WrapperContext, image: &dyn ProcessImage) -> Result<Infallible> {
        let plan = self.plan(ctx)?;
        image.replace(&plan)
    }
}

/// Run the wrapper for the current process.
pub fn run_wrapper() -> Result<Infallible> {
    let ctx = WrapperContext::from_current_process()?;
    Dispatcher::default().run(&ctx, &Execve)
}
