//! 성과 분석 모듈
//!
//! 순자산가치 시계열의 성과를 측정하기 위한 도구를 제공합니다.
//!
//! # 모듈 구성
//!
//! - [`indicator`]: 증분 성과 지표 누적기 (수익률, 최대 낙폭, 비율)

pub mod indicator;

pub use indicator::*;
