//! End-to-end equivalence test for the incremental indicator.
//!
//! This test feeds a seeded pseudo-random net-value walk one
//! observation at a time and verifies, after every single update:
//! 1. The drawdown stays inside [0, 1]
//! 2. The drawdown interval is chronologically ordered
//! 3. The incrementally maintained drawdown state equals a
//!    from-scratch peak-to-trough scan over the same prefix
//! 4. Calmar stays consistent with annualized return / drawdown
//!
//! At the end of the walk, Sharpe and Sortino are recomputed directly
//! from the raw per-step annualized excess returns and compared
//! against the incrementally maintained ratios.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nav_analytics::NetValueIndicator;
use nav_core::logging::{init_logging, LogConfig};
use nav_core::{TradeDate, TRADING_DAYS_PER_YEAR};

const RISK_FREE: f64 = 0.025;
const STEPS: usize = 300;

/// 전체 시계열을 처음부터 순회하여 최대 낙폭을 재계산합니다.
///
/// 증분 구현과 동일한 타이브레이크 규칙(엄격한 `>` 비교)을 따릅니다.
fn scan_max_drawdown(dates: &[TradeDate], nets: &[f64]) -> (f64, TradeDate, TradeDate) {
    let mut peak = nets[0];
    let mut peak_date = dates[0];
    let mut max_drawdown = 0.0;
    let mut start = dates[0];
    let mut end = dates[0];

    for i in 1..nets.len() {
        if nets[i] >= peak {
            peak = nets[i];
            peak_date = dates[i];
        }
        let drawdown = (peak - nets[i]) / peak;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
            start = peak_date;
            end = dates[i];
        }
    }

    (max_drawdown, start, end)
}

/// 시드 고정 랜덤 워크 생성: (날짜, 순자산가치) 시계열.
fn random_walk(seed: u64, steps: usize) -> (Vec<TradeDate>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut date: TradeDate = "2023-01-02".parse().unwrap();
    let mut net = 1000.0;

    let mut dates = vec![date];
    let mut nets = vec![net];

    for _ in 0..steps {
        date = date.next_day().unwrap();
        net *= 1.0 + rng.gen_range(-0.03..0.03);
        dates.push(date);
        nets.push(net);
    }

    (dates, nets)
}

#[test]
fn incremental_matches_batch_recomputation() {
    let _ = init_logging(LogConfig::new("warn"));

    let (dates, nets) = random_walk(42, STEPS);
    let mut indicator = NetValueIndicator::new(dates[0], nets[0], RISK_FREE).unwrap();

    for i in 1..dates.len() {
        indicator.update(dates[i], nets[i], Some(RISK_FREE)).unwrap();

        // 1. 낙폭 범위
        assert!(indicator.drawdown >= 0.0 && indicator.drawdown <= 1.0);

        // 2. 낙폭 구간 날짜 순서
        if indicator.drawdown > 0.0 {
            assert!(indicator.drawdown_start_date <= indicator.drawdown_end_date);
        }

        // 3. 접두 구간에 대한 전체 재계산과 일치
        let (expected_dd, expected_start, expected_end) =
            scan_max_drawdown(&dates[..=i], &nets[..=i]);
        assert!(
            (indicator.drawdown - expected_dd).abs() < 1e-12,
            "step {}: incremental {} != batch {}",
            i,
            indicator.drawdown,
            expected_dd
        );
        if indicator.drawdown > 0.0 {
            assert_eq!(indicator.drawdown_start_date, expected_start, "step {}", i);
            assert_eq!(indicator.drawdown_end_date, expected_end, "step {}", i);
        }

        // 4. 칼마 일관성
        if indicator.drawdown > 0.0 {
            let expected = indicator.annual_return_acc / indicator.drawdown;
            assert!((indicator.calmar_ratio - expected).abs() < 1e-5);
        }

        // 카운트는 호출마다 정확히 1씩 증가
        assert_eq!(indicator.count(), i as u64);
    }
}

#[test]
fn ratios_match_direct_recomputation() {
    let (dates, nets) = random_walk(7, STEPS);
    let indicator = NetValueIndicator::from_series(&dates, &nets, RISK_FREE).unwrap();

    // 스텝별 연율화 초과 수익률에서 직접 재계산
    let excess: Vec<f64> = nets
        .windows(2)
        .map(|w| (w[1] / w[0] - 1.0) * TRADING_DAYS_PER_YEAR - RISK_FREE)
        .collect();

    let n = excess.len() as f64;
    let mean = excess.iter().sum::<f64>() / n;

    // 샤프: 평균 / 표본 표준편차
    let variance = excess.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let expected_sharpe = mean / variance.sqrt();
    assert!(
        (indicator.sharpe_ratio - expected_sharpe).abs() < 1e-5,
        "sharpe: incremental {} != direct {}",
        indicator.sharpe_ratio,
        expected_sharpe
    );

    // 소르티노: 평균 / 하방 RMS
    let downside: Vec<f64> = excess.iter().copied().filter(|e| *e < 0.0).collect();
    assert!(!downside.is_empty(), "random walk should contain losses");
    let down_rms = (downside.iter().map(|e| e * e).sum::<f64>() / downside.len() as f64).sqrt();
    let expected_sortino = mean / down_rms;
    assert!(
        (indicator.sortino_ratio - expected_sortino).abs() < 1e-5,
        "sortino: incremental {} != direct {}",
        indicator.sortino_ratio,
        expected_sortino
    );
}

#[test]
fn snapshot_serializes_full_read_surface() {
    let (dates, nets) = random_walk(11, 50);
    let indicator = NetValueIndicator::from_series(&dates, &nets, RISK_FREE).unwrap();

    let json = serde_json::to_value(indicator.snapshot()).unwrap();

    for field in [
        "trade_date",
        "net",
        "duration",
        "return_acc",
        "annual_return_acc",
        "return_mean",
        "return_std",
        "drawdown",
        "drawdown_high_spot",
        "drawdown_start_date",
        "drawdown_end_date",
        "drawdown_recovery_date",
        "sharpe_ratio",
        "sortino_ratio",
        "calmar_ratio",
        "rf",
    ] {
        assert!(json.get(field).is_some(), "missing field: {}", field);
    }
}
