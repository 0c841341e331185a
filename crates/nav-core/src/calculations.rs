//! 수익률 및 변동성 계산 공통 로직.
//!
//! 지표 누적기에서 사용하는 순수 계산 함수를 제공합니다. 모든 함수는
//! 상태가 없으며, 누적기가 유지하는 합계/제곱합으로부터 파생값을
//! 계산합니다.

/// 연간 거래일 수 (연율화 계산에 사용).
///
/// 일반적인 주식 시장 기준 연간 약 252 거래일입니다.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// 단순 수익률 계산.
///
/// 직전 관측값 대비 현재 관측값의 변화율입니다.
///
/// # Arguments
///
/// * `previous` - 직전 순자산가치
/// * `current` - 현재 순자산가치
///
/// # Returns
///
/// `current / previous - 1`
pub fn simple_return(previous: f64, current: f64) -> f64 {
    current / previous - 1.0
}

/// 누적 수익률 계산.
///
/// 최초 관측값 대비 현재 관측값의 변화율입니다.
pub fn cumulative_return(initial: f64, current: f64) -> f64 {
    current / initial - 1.0
}

/// 수익률 연율화 (선형 근사).
///
/// # Arguments
///
/// * `ret` - 수익률
/// * `duration_days` - 수익률이 발생한 기간 (일)
///
/// # Returns
///
/// `ret * 252 / duration_days`
///
/// 기간이 0이면 f64 나눗셈 규칙에 따라 무한대가 되므로, 호출자는
/// `duration_days > 0`을 보장해야 합니다.
pub fn annualize(ret: f64, duration_days: f64) -> f64 {
    ret * TRADING_DAYS_PER_YEAR / duration_days
}

/// 제곱합 항등식을 사용한 표본 표준편차.
///
/// 원본 관측값을 다시 순회하지 않고 누적된 합계만으로 계산합니다:
/// `sqrt((sum_sq - n * mean^2) / (n - 1))`
///
/// # Arguments
///
/// * `sum_sq` - 관측값 제곱의 합
/// * `mean` - 관측값 평균
/// * `n` - 관측 수 (2 이상이어야 함)
pub fn sample_std(sum_sq: f64, mean: f64, n: u64) -> f64 {
    let n = n as f64;
    ((sum_sq - n * mean * mean) / (n - 1.0)).sqrt()
}

/// 하방 관측값의 표본 표준편차.
///
/// 대칭 공식과 달리 평균이 아닌 하방 *합계*를 중심화 항으로 사용합니다:
/// `sqrt((sum_sq - sum^2 / n) / (n - 1))`
///
/// # Arguments
///
/// * `sum_sq` - 하방 관측값 제곱의 합
/// * `sum` - 하방 관측값의 합
/// * `n` - 하방 관측 수 (2 이상이어야 함)
pub fn downside_sample_std(sum_sq: f64, sum: f64, n: u64) -> f64 {
    let n = n as f64;
    ((sum_sq - sum * sum / n) / (n - 1.0)).sqrt()
}
