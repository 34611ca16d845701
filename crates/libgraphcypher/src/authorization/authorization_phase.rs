use crate::translate::TranslateError;

/// Where a write statement is in its authorization lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuthorizationPhase {
    PreFilter,
    Write,
    PostValidate,
    Response,
}

/// Enforces `PreFilter -> Write -> PostValidate -> Response` while a
/// statement is assembled. Phases may be skipped but never revisited.
#[derive(Clone, Debug)]
pub struct PhaseTracker {
    current: AuthorizationPhase,
}
impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: AuthorizationPhase::PreFilter,
        }
    }

    pub fn current(&self) -> AuthorizationPhase {
        self.current
    }

    pub fn advance(&mut self, next: AuthorizationPhase) -> Result<(), TranslateError> {
        if next < self.current {
            return Err(TranslateError::Internal {
                message: format!("authorization phase {next:?} requested after {:?}", self.current),
            });
        }
        tracing::trace!("authorization phase {:?} -> {next:?}", self.current);
        self.current = next;
        Ok(())
    }
}
impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
