mod ids;
mod progress;
mod status;

pub use ids::{ContentId, ParseIdError};
pub use progress::{
    ProgressPayload, ProgressState, RAW_SCORE_MAX, clamp_raw, clamp_unit, format_real,
    parse_real,
};
pub use status::{CompletionStatus, SessionState, StatusParseError, SuccessStatus};
