//! 거래일 타입 정의.
//!
//! 이 모듈은 순자산가치 시계열의 관측 날짜를 나타내는 타입을 정의합니다.
//! 시장 데이터에서 사용하는 `"YYYY-MM-DD"` 문자열 형식으로 파싱/출력됩니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NavError;

/// 날짜 문자열 형식.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// 순자산가치 관측 날짜.
///
/// 캘린더 날짜만 가지며 시각 정보는 없습니다. 정렬 순서는 시간 순서와
/// 일치하므로 낙폭 구간의 날짜 비교에 그대로 사용할 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeDate(NaiveDate);

impl TradeDate {
    /// 연/월/일로부터 거래일을 생성합니다.
    ///
    /// 존재하지 않는 날짜(예: 2월 30일)는 `None`을 반환합니다.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// 기준 날짜로부터 경과한 일수를 반환합니다.
    ///
    /// `earlier`가 미래이면 음수가 반환됩니다. 호출자는 날짜를
    /// 시간순으로 공급할 책임이 있습니다.
    pub fn days_since(&self, earlier: TradeDate) -> i64 {
        (self.0 - earlier.0).num_days()
    }

    /// 다음 날짜를 반환합니다.
    ///
    /// 표현 가능한 마지막 날짜에서는 `None`을 반환합니다.
    pub fn next_day(&self) -> Option<TradeDate> {
        self.0.succ_opt().map(Self)
    }

    /// 내부 `NaiveDate`를 반환합니다.
    pub fn inner(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for TradeDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for TradeDate {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| NavError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let date: TradeDate = "2024-03-15".parse().unwrap();
        assert_eq!(date.to_string(), "2024-03-15");
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!("2024/03/15".parse::<TradeDate>().is_err());
        assert!("15-03-2024".parse::<TradeDate>().is_err());
        assert!("not-a-date".parse::<TradeDate>().is_err());
    }

    #[test]
    fn test_from_ymd() {
        assert!(TradeDate::from_ymd(2024, 2, 29).is_some()); // 윤년
        assert!(TradeDate::from_ymd(2023, 2, 29).is_none());
    }

    #[test]
    fn test_days_since() {
        let start: TradeDate = "2024-01-01".parse().unwrap();
        let end: TradeDate = "2024-01-31".parse().unwrap();

        assert_eq!(end.days_since(start), 30);
        assert_eq!(start.days_since(start), 0);
        assert_eq!(start.days_since(end), -30);
    }

    #[test]
    fn test_next_day() {
        let date: TradeDate = "2024-02-28".parse().unwrap();
        assert_eq!(date.next_day().unwrap().to_string(), "2024-02-29");
    }

    #[test]
    fn test_ordering_matches_chronology() {
        let a: TradeDate = "2024-01-01".parse().unwrap();
        let b: TradeDate = "2024-06-01".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_serde_transparent() {
        let date: TradeDate = "2024-03-15".parse().unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2024-03-15\"");
    }
}
