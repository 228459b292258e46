//! Guard predicates for controlling transitions.
//!
//! Guards are boolean functions over the machine context. They run as the
//! last stage of the transition pipeline, after every middleware has
//! proceeded, and see the context exactly as the middleware left it.

/// Predicate that determines if a transition can fire.
///
/// # Example
///
/// ```rust
/// use switchyard::core::Guard;
///
/// struct Door {
///     openness: u8,
/// }
///
/// let nearly_shut = Guard::new(|door: &Door| door.openness <= 1);
///
/// assert!(nearly_shut.check(&Door { openness: 1 }));
/// assert!(!nearly_shut.check(&Door { openness: 50 }));
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate function.
    ///
    /// The predicate should be deterministic: `auto_transition` relies on
    /// evaluating it to pick a candidate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Check if the guard allows the transition for this context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }
}

impl<C> std::fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard(..)")
    }
}
