use serde::Serialize;

/// Load state of the engine's models. Queried before every detection pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum ModelState {
    #[default]
    Unloaded,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct ModelLifecycle {
    state: ModelState,
}

impl ModelLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to `Loading`. Returns false when a load is already running or
    /// has succeeded, so concurrent callers do not load twice. A failed load
    /// may be retried.
    pub fn begin_load(&mut self) -> bool {
        match self.state {
            ModelState::Loading | ModelState::Ready => false,
            ModelState::Unloaded | ModelState::Failed(_) => {
                self.state = ModelState::Loading;
                true
            }
        }
    }

    pub fn mark_ready(&mut self) {
        self.state = ModelState::Ready;
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.state = ModelState::Failed(reason.into());
    }

    pub fn is_ready(&self) -> bool {
        self.state == ModelState::Ready
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unloaded() {
        let lifecycle = ModelLifecycle::new();
        assert_eq!(lifecycle.state(), &ModelState::Unloaded);
        assert!(!lifecycle.is_ready());
    }

    #[test]
    fn test_load_then_ready() {
        let mut lifecycle = ModelLifecycle::new();
        assert!(lifecycle.begin_load());
        assert_eq!(lifecycle.state(), &ModelState::Loading);
        assert!(!lifecycle.is_ready());
        lifecycle.mark_ready();
        assert!(lifecycle.is_ready());
    }

    #[test]
    fn test_begin_load_rejected_while_loading_or_ready() {
        let mut lifecycle = ModelLifecycle::new();
        assert!(lifecycle.begin_load());
        assert!(!lifecycle.begin_load());
        lifecycle.mark_ready();
        assert!(!lifecycle.begin_load());
        assert!(lifecycle.is_ready());
    }

    #[test]
    fn test_failed_load_can_be_retried() {
        let mut lifecycle = ModelLifecycle::new();
        lifecycle.begin_load();
        lifecycle.mark_failed("no manifest");
        assert_eq!(lifecycle.state(), &ModelState::Failed("no manifest".into()));
        assert!(lifecycle.begin_load());
    }

    #[test]
    fn test_serializes_with_reason() {
        let json = serde_json::to_string(&ModelState::Failed("x".into())).unwrap();
        assert_eq!(json, r#"{"state":"failed","reason":"x"}"#);
        assert_eq!(serde_json::to_string(&ModelState::Ready).unwrap(), r#"{"state":"ready"}"#);
    }
}
