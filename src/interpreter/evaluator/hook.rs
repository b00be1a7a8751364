/// Decides whether a running evaluation should stop.
///
/// The evaluator consults the hook every `check_interval` steps, where a step
/// is one executed statement or one loop iteration. Returning `true` makes the
/// evaluation fail with `ExecutionAborted`, which `pcall` does not catch.
///
/// Any `FnMut(u64) -> bool` closure is a hook.
pub trait InterruptHook {
    /// Called with the number of steps executed so far.
    fn should_interrupt(&mut self, steps: u64) -> bool;
}

impl<F: FnMut(u64) -> bool> InterruptHook for F {
    fn should_interrupt(&mut self, steps: u64) -> bool {
        self(steps)
    }
}

/// Aborts evaluation once more than a fixed number of steps have run.
///
/// # Example
/// ```
/// use moonwalk::interpreter::evaluator::{core::Context, hook::StepBudget};
///
/// let mut context = Context::new();
/// context.set_interrupt_hook(StepBudget::new(1_000));
/// assert!(context.run("while true do end").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StepBudget {
    limit: u64,
}

impl StepBudget {
    #[must_use]
    pub const fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl InterruptHook for StepBudget {
    fn should_interrupt(&mut self, steps: u64) -> bool {
        steps > self.limit
    }
}
