use thiserror::Error;

/// Input the engine refuses to enrich. Numeric hazards (zero intervals,
/// counter resets) are never errors; they resolve to 0.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed snapshot: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("snapshot is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("snapshot timestamp {0} is negative")]
    InvalidTimestamp(i64),
}
