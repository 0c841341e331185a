//! # NAV Core
//!
//! 순자산가치(NAV) 성과 지표 시스템의 핵심 타입을 제공합니다.
//!
//! 이 크레이트는 지표 계산 전반에서 사용되는 기본 구성 요소를 제공합니다:
//! - 거래일 타입 (`TradeDate`)
//! - 수익률/연율화 계산 함수
//! - 에러 타입
//! - 로깅 인프라

pub mod calculations;
pub mod error;
pub mod logging;
pub mod types;

pub use calculations::*;
pub use error::*;
pub use logging::*;
pub use types::*;
