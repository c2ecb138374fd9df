use platform_api::ApiError;
use sea_orm::DbErr;
use thiserror::Error;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    /// Input rejected before any write reached the store.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("storage failure: {0}")]
    Storage(#[from] DbErr),
}

impl HrError {
    pub(crate) fn employee_not_found() -> Self {
        Self::NotFound("Employee not found")
    }
}

impl From<HrError> for ApiError {
    fn from(value: HrError) -> Self {
        match value {
            HrError::Validation(msg) => ApiError::InvalidInput(msg),
            HrError::NotFound(msg) => ApiError::NotFound(msg.to_string()),
            HrError::Storage(err) => ApiError::internal(err.into()),
        }
    }
}
