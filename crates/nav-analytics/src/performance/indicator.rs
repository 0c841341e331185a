//! 증분 성과 지표 계산 모듈
//!
//! 순자산가치 시계열을 관측 단위로 받아 매 관측마다 모든 지표를
//! 재계산합니다. 과거 이력을 다시 순회하지 않고 누적 합계만으로
//! O(1)에 갱신됩니다:
//! - 누적/연율화 수익률
//! - 일간 수익률 평균/표준편차
//! - 최대 낙폭 (시작/종료/회복 날짜 포함)
//! - 샤프 비율, 소르티노 비율, 칼마 비율
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use nav_analytics::NetValueIndicator;
//! use nav_core::TradeDate;
//!
//! let d0: TradeDate = "2024-01-01".parse()?;
//! let mut indicator = NetValueIndicator::new(d0, 1000.0, 0.02)?;
//!
//! let d1: TradeDate = "2024-01-02".parse()?;
//! indicator.update(d1, 1010.0, None)?;
//!
//! println!("최대 낙폭: {:.2}%", indicator.drawdown * 100.0);
//! println!("샤프 비율: {:.2}", indicator.sharpe_ratio);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use nav_core::{
    annualize, cumulative_return, downside_sample_std, sample_std, simple_return, TradeDate,
};

/// 성과 지표 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 시드 관측값 또는 시계열이 유효하지 않음
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 날짜/순자산가치 시계열의 길이가 다름
    #[error("시계열 길이 불일치: 날짜 {dates}개, 순자산가치 {values}개")]
    InputLengthMismatch { dates: usize, values: usize },

    /// 무위험 수익률 시계열이 날짜 수와 맞지 않음
    #[error("무위험 수익률 입력 오류: {0}")]
    InvalidRiskFreeInput(String),

    /// 분산 누적값이 음수가 됨 (도달해서는 안 되는 불변식 위반)
    #[error("분산 누적값이 음수입니다: {0}")]
    NegativeVarianceAccumulator(f64),
}

/// 성과 지표 Result 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 무위험 수익률 입력.
///
/// 배치 생성 시 모든 스텝에 같은 값을 적용하거나, 날짜와 같은 길이의
/// 시계열을 스텝별로 적용할 수 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RiskFreeInput {
    /// 모든 스텝에 적용되는 단일 값 (연율)
    Constant(f64),
    /// 날짜와 1:1 대응하는 스텝별 값
    PerStep(Vec<f64>),
}

impl From<f64> for RiskFreeInput {
    fn from(rf: f64) -> Self {
        Self::Constant(rf)
    }
}

impl From<Vec<f64>> for RiskFreeInput {
    fn from(rf: Vec<f64>) -> Self {
        Self::PerStep(rf)
    }
}

/// 순자산가치 증분 성과 지표 누적기.
///
/// 시계열 하나당 인스턴스 하나를 사용합니다. 내부 가변 상태는
/// `&mut self`를 통해서만 갱신되므로 호출자가 접근을 직렬화해야
/// 합니다 (스레드 간 동시 갱신 불가).
///
/// 날짜는 시간순(비감소)으로 공급되어야 하며, 역순 날짜에 대한
/// 방어는 하지 않습니다.
#[derive(Debug, Clone)]
pub struct NetValueIndicator {
    // === 노출 지표 ===
    /// 누적 수익률 (최초 관측값 대비)
    pub return_acc: f64,

    /// 연율화 누적 수익률 (252 거래일 기준 선형 환산)
    ///
    /// 최소 한 번의 update로 날짜가 진행된 뒤에만 의미가 있습니다.
    pub annual_return_acc: f64,

    /// 직전 스텝 수익률의 연율화 값
    pub annual_return_pct: f64,

    /// 일간 수익률 평균
    pub return_mean: f64,

    /// 일간 수익률 표본 표준편차 (관측 2개 이상부터 계산)
    pub return_std: f64,

    /// 연율화 초과 수익률 평균 (무위험 수익률 차감)
    pub excess_return_avg: f64,

    /// 최대 낙폭 (0~1 사이 소수 비율)
    pub drawdown: f64,

    /// 최대 낙폭을 정의한 고점의 순자산가치
    ///
    /// 낙폭이 한 번도 기록되지 않은 동안은 0입니다.
    pub drawdown_high_spot: f64,

    /// 최대 낙폭 시작 날짜 (고점 날짜)
    pub drawdown_start_date: TradeDate,

    /// 최대 낙폭 종료 날짜 (저점 날짜)
    pub drawdown_end_date: TradeDate,

    /// 최대 낙폭 회복 날짜
    ///
    /// 순자산가치가 낙폭을 정의한 고점까지 처음 복귀한 날짜입니다.
    /// 새로운 최대 낙폭이 기록되면 회복 전까지 `None`이 됩니다.
    pub drawdown_recovery_date: Option<TradeDate>,

    /// 샤프 비율 (관측 2개 이상부터 계산, 그 전에는 0)
    pub sharpe_ratio: f64,

    /// 소르티노 비율 (하방 관측이 없으면 0)
    pub sortino_ratio: f64,

    /// 칼마 비율
    ///
    /// 낙폭이 0인 동안은 갱신되지 않고 마지막 계산값을 유지합니다.
    pub calmar_ratio: f64,

    /// 현재 적용 중인 무위험 수익률 (연율)
    pub rf: f64,

    /// 현재 관측 날짜
    pub trade_date: TradeDate,

    /// 최초 관측 날짜로부터 경과한 일수
    pub duration: i64,

    // === 내부 상태 ===
    /// 최초 관측 날짜
    init_date: TradeDate,
    /// 최초 순자산가치
    init_net: f64,
    /// 직전 관측의 순자산가치
    net: f64,
    /// 지금까지의 최고 순자산가치
    max_net: f64,
    /// 최고점 날짜
    last_max_date: TradeDate,
    /// 마지막 고점 이후의 최저 순자산가치
    min_net: f64,
    /// 최저점 날짜
    last_min_date: TradeDate,
    /// update 호출 횟수
    num: u64,
    /// 일간 수익률 합
    return_sum: f64,
    /// 일간 수익률 제곱합
    return_square: f64,
    /// 연율화 초과 수익률 합
    excess_sum: f64,
    /// 연율화 초과 수익률 제곱합
    excess_square: f64,
    /// 하방(음수 초과 수익률) 관측 수
    down_num: u64,
    /// 하방 초과 수익률 합
    down_sum: f64,
    /// 하방 초과 수익률 제곱합
    down_square: f64,
    /// 연율화 초과 수익률 표본 표준편차
    annual_return_std: f64,
    /// 연율화 하방 초과 수익률 표본 표준편차
    annual_return_down_std: f64,
}

impl NetValueIndicator {
    /// 단일 시드 관측값으로 누적기를 생성합니다.
    ///
    /// 모든 합계/카운터는 0으로, 낙폭 날짜는 시드 날짜로 설정됩니다.
    /// 첫 관측은 수익률이 없으므로 비율 지표도 모두 0입니다.
    ///
    /// # Arguments
    ///
    /// * `trade_date` - 최초 관측 날짜
    /// * `net` - 최초 순자산가치 (유한한 값이어야 함)
    /// * `rf` - 무위험 수익률 (연율, 유한한 값이어야 함)
    pub fn new(trade_date: TradeDate, net: f64, rf: f64) -> IndicatorResult<Self> {
        if !net.is_finite() {
            return Err(IndicatorError::InvalidInput(format!(
                "순자산가치가 유한한 값이 아닙니다: {}",
                net
            )));
        }
        if !rf.is_finite() {
            return Err(IndicatorError::InvalidInput(format!(
                "무위험 수익률이 유한한 값이 아닙니다: {}",
                rf
            )));
        }

        Ok(Self {
            return_acc: 0.0,
            annual_return_acc: 0.0,
            annual_return_pct: 0.0,
            return_mean: 0.0,
            return_std: 0.0,
            excess_return_avg: 0.0,
            drawdown: 0.0,
            drawdown_high_spot: 0.0,
            drawdown_start_date: trade_date,
            drawdown_end_date: trade_date,
            drawdown_recovery_date: Some(trade_date),
            sharpe_ratio: 0.0,
            sortino_ratio: 0.0,
            calmar_ratio: 0.0,
            rf,
            trade_date,
            duration: 0,
            init_date: trade_date,
            init_net: net,
            net,
            max_net: net,
            last_max_date: trade_date,
            min_net: net,
            last_min_date: trade_date,
            num: 0,
            return_sum: 0.0,
            return_square: 0.0,
            excess_sum: 0.0,
            excess_square: 0.0,
            down_num: 0,
            down_sum: 0.0,
            down_square: 0.0,
            annual_return_std: 0.0,
            annual_return_down_std: 0.0,
        })
    }

    /// 전체 시계열에서 누적기를 생성합니다.
    ///
    /// 첫 관측값으로 시드한 뒤 나머지 관측값에 대해 순서대로
    /// [`update`](Self::update)를 재생합니다.
    ///
    /// # Arguments
    ///
    /// * `dates` - 시간순으로 정렬된 관측 날짜 (비어 있으면 안 됨)
    /// * `nets` - 날짜와 1:1 대응하는 순자산가치
    /// * `rf` - 단일 값 또는 날짜와 같은 길이의 무위험 수익률
    ///
    /// # Errors
    ///
    /// * [`IndicatorError::InputLengthMismatch`] - 날짜/순자산가치 길이가 다름
    /// * [`IndicatorError::InvalidRiskFreeInput`] - 스텝별 rf 길이가 다름
    /// * [`IndicatorError::InvalidInput`] - 빈 시계열 또는 유한하지 않은 값
    pub fn from_series(
        dates: &[TradeDate],
        nets: &[f64],
        rf: impl Into<RiskFreeInput>,
    ) -> IndicatorResult<Self> {
        if dates.len() != nets.len() {
            return Err(IndicatorError::InputLengthMismatch {
                dates: dates.len(),
                values: nets.len(),
            });
        }
        if dates.is_empty() {
            return Err(IndicatorError::InvalidInput(
                "시계열이 비어 있습니다".to_string(),
            ));
        }

        match rf.into() {
            RiskFreeInput::Constant(rate) => {
                let mut indicator = Self::new(dates[0], nets[0], rate)?;
                for i in 1..dates.len() {
                    indicator.update(dates[i], nets[i], Some(rate))?;
                }
                Ok(indicator)
            }
            RiskFreeInput::PerStep(rates) => {
                if rates.len() != dates.len() {
                    return Err(IndicatorError::InvalidRiskFreeInput(format!(
                        "날짜 {}개에 대해 무위험 수익률이 {}개 제공됨",
                        dates.len(),
                        rates.len()
                    )));
                }
                let mut indicator = Self::new(dates[0], nets[0], rates[0])?;
                for i in 1..dates.len() {
                    indicator.update(dates[i], nets[i], Some(rates[i]))?;
                }
                Ok(indicator)
            }
        }
    }

    /// 관측값 하나로 시계열을 전진시키고 모든 지표를 재계산합니다.
    ///
    /// 날짜는 직전 관측 이후(비감소)여야 하며, 시드 날짜와 같은
    /// 날짜로 다시 호출하면 연율화 값이 무한대가 됩니다.
    ///
    /// # Arguments
    ///
    /// * `trade_date` - 관측 날짜
    /// * `net` - 순자산가치
    /// * `rf` - 무위험 수익률. `None`이면 직전 값을 유지
    ///
    /// # Errors
    ///
    /// * [`IndicatorError::NegativeVarianceAccumulator`] - 분산 누적값이
    ///   음수가 된 경우 (정상 산술에서는 발생하지 않음)
    pub fn update(
        &mut self,
        trade_date: TradeDate,
        net: f64,
        rf: Option<f64>,
    ) -> IndicatorResult<()> {
        if let Some(rate) = rf {
            self.rf = rate;
        }
        self.duration = trade_date.days_since(self.init_date);
        self.trade_date = trade_date;

        self.accumulate_returns(net);
        self.net = net;

        self.update_drawdown();
        self.update_ratios()
    }

    /// 수익률 합계/제곱합을 누적하고 파생 통계량을 갱신합니다.
    ///
    /// `self.net`은 아직 직전 관측값을 담고 있어야 합니다 (스텝
    /// 수익률의 기준값). 호출자가 이후에 덮어씁니다.
    fn accumulate_returns(&mut self, net: f64) {
        self.num += 1;

        // 일간 수익률
        self.return_acc = cumulative_return(self.init_net, net);
        let step_return = simple_return(self.net, net);
        self.return_sum += step_return;
        self.return_square += step_return * step_return;
        self.return_mean = self.return_sum / self.num as f64;

        // 연율화 수익률
        self.annual_return_acc = annualize(self.return_acc, self.duration as f64);
        self.annual_return_pct = annualize(step_return, 1.0);

        // 초과 수익률
        let excess = self.annual_return_pct - self.rf;
        self.excess_sum += excess;
        self.excess_return_avg = self.excess_sum / self.num as f64;

        self.excess_square += excess * excess;
        if excess < 0.0 {
            self.down_square += excess * excess;
            self.down_sum += excess;
            self.down_num += 1;
        }

        // 표준편차는 관측 2개 이상부터 정의됨
        if self.num > 1 {
            self.return_std = sample_std(self.return_square, self.return_mean, self.num);
            self.annual_return_std =
                sample_std(self.excess_square, self.excess_return_avg, self.num);
            if self.down_num > 1 {
                self.annual_return_down_std =
                    downside_sample_std(self.down_square, self.down_sum, self.down_num);
            }
        }
    }

    /// 최대 낙폭 상태를 갱신합니다.
    ///
    /// 저점이 여러 번 같은 값에 도달하면 가장 이른 날짜를 유지합니다
    /// (엄격한 `<` 비교). 같은 크기의 낙폭이 여러 번 나타나면 처음
    /// 기록된 구간을 유지합니다 (엄격한 `>` 비교).
    fn update_drawdown(&mut self) {
        if self.net >= self.max_net {
            // 신고점: 저점 추적을 리셋
            self.max_net = self.net;
            self.min_net = self.net;
            self.last_max_date = self.trade_date;
        } else if self.net < self.min_net {
            // 마지막 고점 이후의 신저점
            self.min_net = self.net;
            self.last_min_date = self.trade_date;

            let candidate = (self.max_net - self.min_net) / self.max_net;
            if candidate > self.drawdown {
                self.drawdown = candidate;
                self.drawdown_high_spot = self.max_net;
                self.drawdown_start_date = self.last_max_date;
                self.drawdown_end_date = self.last_min_date;
                self.drawdown_recovery_date = None;

                debug!(
                    drawdown = self.drawdown,
                    start = %self.drawdown_start_date,
                    end = %self.drawdown_end_date,
                    "새로운 최대 낙폭 기록"
                );
            }
        }

        // 낙폭을 정의한 고점으로 처음 복귀한 날짜를 기록
        if self.net == self.drawdown_high_spot && self.drawdown_recovery_date.is_none() {
            self.drawdown_recovery_date = Some(self.trade_date);
        }
    }

    /// 샤프/칼마/소르티노 비율을 재계산합니다.
    ///
    /// 분모가 0 이하이거나 정의되지 않은 비율은 0입니다. 칼마 비율만
    /// 예외로, 낙폭이 0인 동안은 마지막 값을 유지합니다.
    fn update_ratios(&mut self) -> IndicatorResult<()> {
        if self.excess_square < 0.0 {
            return Err(IndicatorError::NegativeVarianceAccumulator(
                self.excess_square,
            ));
        }

        if self.num > 1 {
            self.sharpe_ratio = if self.annual_return_std > 0.0 {
                self.excess_return_avg / self.annual_return_std
            } else {
                0.0
            };
        }

        if self.drawdown > 0.0 {
            self.calmar_ratio = self.annual_return_acc / self.drawdown;
        }

        if self.num > 0 && self.down_square > 0.0 {
            self.sortino_ratio =
                self.excess_return_avg / (self.down_square / self.down_num as f64).sqrt();
        } else {
            self.sortino_ratio = 0.0;
        }

        Ok(())
    }

    /// update 호출 횟수를 반환합니다.
    pub fn count(&self) -> u64 {
        self.num
    }

    /// 현재 순자산가치를 반환합니다.
    pub fn net(&self) -> f64 {
        self.net
    }

    /// 최초 관측 날짜를 반환합니다.
    pub fn init_date(&self) -> TradeDate {
        self.init_date
    }

    /// 최초 순자산가치를 반환합니다.
    pub fn init_net(&self) -> f64 {
        self.init_net
    }

    /// 연율화 초과 수익률의 표본 표준편차를 반환합니다.
    ///
    /// 관측이 2개 미만이면 0입니다.
    pub fn annual_return_std(&self) -> f64 {
        self.annual_return_std
    }

    /// 연율화 하방 초과 수익률의 표본 표준편차를 반환합니다.
    ///
    /// 하방 관측이 2개 미만이면 0입니다.
    pub fn annual_return_down_std(&self) -> f64 {
        self.annual_return_down_std
    }

    /// 현재 지표 전체의 스냅샷을 반환합니다.
    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            trade_date: self.trade_date,
            net: self.net,
            duration: self.duration,
            return_acc: self.return_acc,
            annual_return_acc: self.annual_return_acc,
            return_mean: self.return_mean,
            return_std: self.return_std,
            drawdown: self.drawdown,
            drawdown_high_spot: self.drawdown_high_spot,
            drawdown_start_date: self.drawdown_start_date,
            drawdown_end_date: self.drawdown_end_date,
            drawdown_recovery_date: self.drawdown_recovery_date,
            sharpe_ratio: self.sharpe_ratio,
            sortino_ratio: self.sortino_ratio,
            calmar_ratio: self.calmar_ratio,
            rf: self.rf,
        }
    }

    /// 성과 요약을 문자열로 반환합니다.
    ///
    /// 대시보드나 로그 출력용 한 줄 요약입니다.
    pub fn summary(&self) -> String {
        format!(
            "날짜: {} | 순자산: {:.4} | 누적: {:.2}% | MDD: {:.2}% | 샤프: {:.2} | 소르티노: {:.2} | 칼마: {:.2}",
            self.trade_date,
            self.net,
            self.return_acc * 100.0,
            self.drawdown * 100.0,
            self.sharpe_ratio,
            self.sortino_ratio,
            self.calmar_ratio
        )
    }
}

/// 지표 읽기 표면의 직렬화 가능한 스냅샷.
///
/// 리포트/JSON 출력용으로 매 update 후의 전체 지표 상태를
/// 하나의 레코드로 담습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// 관측 날짜
    pub trade_date: TradeDate,
    /// 순자산가치
    pub net: f64,
    /// 최초 관측 이후 경과 일수
    pub duration: i64,
    /// 누적 수익률
    pub return_acc: f64,
    /// 연율화 누적 수익률
    pub annual_return_acc: f64,
    /// 일간 수익률 평균
    pub return_mean: f64,
    /// 일간 수익률 표준편차
    pub return_std: f64,
    /// 최대 낙폭
    pub drawdown: f64,
    /// 최대 낙폭 고점의 순자산가치
    pub drawdown_high_spot: f64,
    /// 최대 낙폭 시작 날짜
    pub drawdown_start_date: TradeDate,
    /// 최대 낙폭 종료 날짜
    pub drawdown_end_date: TradeDate,
    /// 최대 낙폭 회복 날짜
    pub drawdown_recovery_date: Option<TradeDate>,
    /// 샤프 비율
    pub sharpe_ratio: f64,
    /// 소르티노 비율
    pub sortino_ratio: f64,
    /// 칼마 비율
    pub calmar_ratio: f64,
    /// 무위험 수익률
    pub rf: f64,
}
