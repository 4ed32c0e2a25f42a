use jsongate_types::EvalError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cancellation and deadline for one `Engine::run`.
///
/// Cloning shares the cancellation flag. Evaluations check the context before each rule and
/// before each predicate.
#[derive(Clone, Debug, Default)]
pub struct EvalContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

/// Cancels every evaluation observing the context it was taken from.
#[derive(Clone, Debug)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

impl EvalContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancelled))
    }

    pub fn check(&self) -> Result<(), EvalError> {
        if self.cancelled.load(Ordering::Acquire) {
            return Err(EvalError::Cancelled {
                reason: "cancelled by caller".to_string(),
            });
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(EvalError::Cancelled {
                reason: "deadline exceeded".to_string(),
            });
        }
        Ok(())
    }
}
