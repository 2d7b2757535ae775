use hecs::Entity;

/// Errors raised while wiring a world together.
///
/// Per-frame systems never fail; they skip their work when a singleton or
/// component they need is missing. Everything here is a setup mistake.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown phase `{0}`")]
    UnknownPhase(String),

    #[error("phase `{0}` is already registered")]
    DuplicatePhase(String),

    #[error("phase dependency cycle: {}", .0.join(" -> "))]
    PhaseCycle(Vec<String>),

    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),

    #[error("cannot parent {child:?} under {parent:?}: it is one of its descendants")]
    HierarchyCycle { child: Entity, parent: Entity },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_phases() {
        let err = EngineError::PhaseCycle(vec!["A".into(), "B".into(), "A".into()]);
        assert_eq!(err.to_string(), "phase dependency cycle: A -> B -> A");
    }

    #[test]
    fn config_error_converts() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: EngineError = parse.into();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
