use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown map mode `{0}` (expected one of: activity, explore, events, train, social)")]
    UnknownMode(String),
}
