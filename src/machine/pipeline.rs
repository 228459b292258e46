//! Continuation-passing middleware pipeline.
//!
//! A transition runs through two middleware stages before its guard is
//! checked: the global stage, then the stage registered for the transition's
//! name. Each middleware receives a continuation and has to call `proceed`
//! on it for the pipeline to advance. The chain is a pair of slices used as
//! cursors, so there is no recursion through stored closures.

use crate::core::TransitionError;
use std::cell::Cell;

/// Middleware that runs for every transition.
///
/// Receives the transition name, the context and the continuation for the
/// rest of the pipeline.
pub type GlobalMiddleware<C> =
    Box<dyn Fn(&str, &mut C, GlobalNext<'_, C>) -> Result<(), TransitionError> + Send + Sync>;

/// Middleware registered for a single transition name.
pub type Middleware<C> =
    Box<dyn Fn(&mut C, Next<'_, C>) -> Result<(), TransitionError> + Send + Sync>;

type GuardStage<'a, C> = &'a dyn Fn(&C) -> Result<(), TransitionError>;

struct Chain<'a, C> {
    global: &'a [GlobalMiddleware<C>],
    local: &'a [Middleware<C>],
    guard: GuardStage<'a, C>,
    completed: &'a Cell<bool>,
}

impl<'a, C> Chain<'a, C> {
    fn run_global(self, name: &str, context: &mut C) -> Result<(), TransitionError> {
        match self.global.split_first() {
            Some((head, rest)) => {
                let next = GlobalNext {
                    chain: Chain {
                        global: rest,
                        ..self
                    },
                };
                head(name, context, next)
            }
            None => self.run_local(context),
        }
    }

    fn run_local(self, context: &mut C) -> Result<(), TransitionError> {
        match self.local.split_first() {
            Some((head, rest)) => {
                let next = Next {
                    chain: Chain {
                        local: rest,
                        ..self
                    },
                };
                head(context, next)
            }
            None => {
                (self.guard)(context)?;
                self.completed.set(true);
                Ok(())
            }
        }
    }
}

/// Continuation handed to global middleware.
///
/// Consumed by `proceed`, so each middleware can advance the pipeline at
/// most once. Dropping it without calling `proceed` stops the pipeline.
pub struct GlobalNext<'a, C> {
    chain: Chain<'a, C>,
}

impl<C> GlobalNext<'_, C> {
    /// Run the remaining global middleware, then the per-transition stage.
    ///
    /// `name` is what the next global middleware sees; it does not change
    /// which transition fires.
    pub fn proceed(self, name: &str, context: &mut C) -> Result<(), TransitionError> {
        self.chain.run_global(name, context)
    }
}

/// Continuation handed to per-transition middleware.
pub struct Next<'a, C> {
    chain: Chain<'a, C>,
}

impl<C> Next<'_, C> {
    /// Run the remaining per-transition middleware, then the guard stage.
    pub fn proceed(self, context: &mut C) -> Result<(), TransitionError> {
        self.chain.run_local(context)
    }
}

/// Run both middleware stages and the guard stage.
///
/// Returns `Ok(true)` when the guard stage was reached and passed, and
/// `Ok(false)` when some middleware returned without proceeding. Errors from
/// middleware or the guard stage are propagated untouched.
pub(crate) fn run<C>(
    global: &[GlobalMiddleware<C>],
    local: &[Middleware<C>],
    name: &str,
    context: &mut C,
    guard: &dyn Fn(&C) -> Result<(), TransitionError>,
) -> Result<bool, TransitionError> {
    let completed = Cell::new(false);
    let chain = Chain {
        global,
        local,
        guard,
        completed: &completed,
    };
    chain.run_global(name, context)?;
    Ok(completed.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn global(log: &Log, label: &'static str) -> GlobalMiddleware<i32> {
        let log = Arc::clone(log);
        Box::new(move |name: &str, ctx: &mut i32, next: GlobalNext<'_, i32>| {
            log.lock().unwrap().push(format!("{label}:{name}"));
            next.proceed(name, ctx)
        })
    }

    fn local(log: &Log, label: &'static str) -> Middleware<i32> {
        let log = Arc::clone(log);
        Box::new(move |ctx: &mut i32, next: Next<'_, i32>| {
            log.lock().unwrap().push(label.to_string());
            next.proceed(ctx)
        })
    }

    fn pass(_: &i32) -> Result<(), TransitionError> {
        Ok(())
    }

    #[test]
    fn empty_pipeline_reaches_guard() {
        let mut ctx = 0;
        let completed = run::<i32>(&[], &[], "t", &mut ctx, &pass).unwrap();
        assert!(completed);
    }

    #[test]
    fn stages_run_in_registration_order() {
        let log: Log = Arc::default();
        let globals = vec![global(&log, "g1"), global(&log, "g2")];
        let locals = vec![local(&log, "l1"), local(&log, "l2")];
        let guard_log = Arc::clone(&log);
        let guard = move |_: &i32| -> Result<(), TransitionError> {
            guard_log.lock().unwrap().push("guard".to_string());
            Ok(())
        };

        let mut ctx = 0;
        let completed = run(&globals, &locals, "open", &mut ctx, &guard).unwrap();

        assert!(completed);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["g1:open", "g2:open", "l1", "l2", "guard"]
        );
    }

    #[test]
    fn middleware_sees_context_changes() {
        let locals: Vec<Middleware<i32>> = vec![Box::new(|ctx: &mut i32, next: Next<'_, i32>| {
            *ctx += 10;
            next.proceed(ctx)
        })];
        let guard = |ctx: &i32| {
            if *ctx == 10 {
                Ok(())
            } else {
                Err(TransitionError::ConditionFailed {
                    transition: "t".to_string(),
                })
            }
        };

        let mut ctx = 0;
        assert!(run(&[], &locals, "t", &mut ctx, &guard).unwrap());
        assert_eq!(ctx, 10);
    }

    #[test]
    fn swallowed_continuation_stops_pipeline() {
        let log: Log = Arc::default();
        let globals: Vec<GlobalMiddleware<i32>> =
            vec![Box::new(
            |_: &str, _: &mut i32, _next: GlobalNext<'_, i32>| -> Result<(), TransitionError> {
                Ok(())
            },
        )];
        let locals = vec![local(&log, "l1")];

        let mut ctx = 0;
        let completed = run(&globals, &locals, "t", &mut ctx, &pass).unwrap();

        assert!(!completed);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn guard_error_unwinds_through_middleware() {
        let log: Log = Arc::default();
        let globals = vec![global(&log, "g1")];
        let fail = |_: &i32| -> Result<(), TransitionError> {
            Err(TransitionError::ConditionFailed {
                transition: "t".to_string(),
            })
        };

        let mut ctx = 0;
        let err = run(&globals, &[], "t", &mut ctx, &fail).unwrap_err();

        assert!(matches!(err, TransitionError::ConditionFailed { .. }));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn middleware_can_reject() {
        let locals: Vec<Middleware<i32>> = vec![Box::new(|_: &mut i32, _: Next<'_, i32>| -> Result<(), TransitionError> {
            Err(TransitionError::rejected("t", "not today"))
        })];

        let mut ctx = 0;
        let err = run(&[], &locals, "t", &mut ctx, &pass).unwrap_err();

        assert!(matches!(err, TransitionError::Rejected { .. }));
    }

    #[test]
    fn renamed_proceed_is_seen_by_next_global() {
        let log: Log = Arc::default();
        let globals: Vec<GlobalMiddleware<i32>> = vec![
            Box::new(|_: &str, ctx: &mut i32, next: GlobalNext<'_, i32>| {
                next.proceed("renamed", ctx)
            }),
            global(&log, "g2"),
        ];

        let mut ctx = 0;
        assert!(run(&globals, &[], "t", &mut ctx, &pass).unwrap());
        assert_eq!(*log.lock().unwrap(), vec!["g2:renamed"]);
    }
}
