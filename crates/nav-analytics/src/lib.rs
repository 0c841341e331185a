//! 순자산가치(NAV) 시계열 성과 분석.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 관측 단위 증분 계산 성과 지표 (누적/연율화 수익률, 최대 낙폭,
//!   샤프/소르티노/칼마 비율)
//!
//! # Re-exports
//!
//! - [`performance`]: 성과 지표 계산 (NetValueIndicator 등)

pub mod performance;

pub use performance::indicator::{
    IndicatorError, IndicatorResult, IndicatorSnapshot, NetValueIndicator, RiskFreeInput,
};
