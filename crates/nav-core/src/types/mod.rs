//! NAV 지표 시스템의 기본 타입.

pub mod trade_date;

pub use trade_date::*;
