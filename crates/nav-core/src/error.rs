//! NAV 지표 시스템의 에러 타입.
//!
//! 이 모듈은 핵심 타입에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 NAV 에러.
#[derive(Debug, Error)]
pub enum NavError {
    /// 날짜 파싱 에러
    #[error("잘못된 날짜 형식: {0} (YYYY-MM-DD 형식이어야 합니다)")]
    InvalidDate(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// NAV 작업을 위한 Result 타입.
pub type NavResult<T> = Result<T, NavError>;
