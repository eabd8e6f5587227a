/// Rejections raised at the boundary before input reaches the engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    #[error("mood rating must be between {min} and {max}, got {value}")]
    OutOfRange { value: i64, min: u8, max: u8 },
}
