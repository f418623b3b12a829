//! Butterflies: long the wings, short two of the body, one option type

use tracing::warn;

use super::{Blueprint, BreakEven, Bound, LegPricer, Position, Premium, StrategyError, StrategyKind};
use crate::pricing::OptionType;

const EQUIDISTANCE_TOLERANCE: f64 = 0.01;

pub(crate) fn build(
    kind: StrategyKind,
    legs: &LegPricer,
    strikes: &[f64],
) -> Result<Blueprint, StrategyError> {
    let option_type = match kind {
        StrategyKind::CallButterfly => OptionType::Call,
        StrategyKind::PutButterfly => OptionType::Put,
        StrategyKind::BullCallSpread
        | StrategyKind::BearCallSpread
        | StrategyKind::BullPutSpread
        | StrategyKind::BearPutSpread
        | StrategyKind::IronCondor
        | StrategyKind::Straddle => return Err(StrategyError::UnsupportedStrategy(kind.to_string())),
    };

    let mut sorted = strikes.to_vec();
    sorted.sort_by(f64::total_cmp);
    let [lower, body, upper] = sorted[..] else {
        return Err(StrategyError::WrongStrikeCount {
            kind,
            expected: 3,
            actual: strikes.len(),
        });
    };

    if !is_equidistant(lower, body, upper) {
        warn!(%kind, lower, body, upper, "butterfly strikes are not equidistant");
    }

    let lower_wing = legs.leg(option_type, lower, Position::Long, 1)?;
    let short_body = legs.leg(option_type, body, Position::Short, 2)?;
    let upper_wing = legs.leg(option_type, upper, Position::Long, 1)?;

    let net_cost = lower_wing.theoretical_price + upper_wing.theoretical_price
        - 2.0 * short_body.theoretical_price;

    Ok(Blueprint {
        legs: vec![lower_wing, short_body, upper_wing],
        premium: Premium::NetDebit(net_cost),
        max_profit: Bound::Limited((body - lower) - net_cost),
        max_loss: net_cost,
        break_even: BreakEven::Range {
            low: lower + net_cost,
            high: upper - net_cost,
        },
    })
}

/// Gaps compared after rounding to cents
fn is_equidistant(lower: f64, body: f64, upper: f64) -> bool {
    let round_cents = |x: f64| (x * 100.0).round() / 100.0;
    (round_cents(body - lower) - round_cents(upper - body)).abs() <= EQUIDISTANCE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::strategies::payoff::payoff_at;
    use crate::strategies::{StrategyEngine, StrategyResult};

    /// Collects formatted log lines so tests can assert on them
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn build_with_captured_logs(strikes: &[f64]) -> (StrategyResult, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || {
            StrategyEngine::default()
                .butterfly(StrategyKind::CallButterfly, 100.0, strikes, 30, 0.25)
                .unwrap()
        });
        (result, logs.contents())
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("options_analytics=debug")
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_call_butterfly() {
        init_tracing();
        let result = StrategyEngine::default()
            .butterfly(StrategyKind::CallButterfly, 100.0, &[110.0, 90.0, 100.0], 30, 0.25)
            .unwrap();

        let layout: Vec<(f64, Position, u32)> =
            result.legs.iter().map(|leg| (leg.strike, leg.position, leg.quantity)).collect();
        assert_eq!(
            layout,
            vec![
                (90.0, Position::Long, 1),
                (100.0, Position::Short, 2),
                (110.0, Position::Long, 1),
            ]
        );
        assert!(result.legs.iter().all(|leg| leg.option_type == OptionType::Call));

        let net_cost = result.net_cost().unwrap();
        assert!(net_cost > 0.0 && net_cost < 10.0);
        assert_eq!(result.max_loss, net_cost);
        assert_eq!(result.max_profit.limited(), Some(10.0 - net_cost));

        // Peak payoff sits on the body strike
        let peak = payoff_at(&result.legs, result.premium, 100.0);
        assert!((peak - (10.0 - net_cost)).abs() < 1e-12);

        let BreakEven::Range { low, high } = result.break_even else {
            panic!("butterfly has two breakevens");
        };
        assert!(payoff_at(&result.legs, result.premium, low).abs() < 1e-9);
        assert!(payoff_at(&result.legs, result.premium, high).abs() < 1e-9);
    }

    #[test]
    fn test_put_butterfly_matches_call_payoff_shape() {
        let engine = StrategyEngine::default();
        let puts = engine
            .butterfly(StrategyKind::PutButterfly, 100.0, &[90.0, 100.0, 110.0], 30, 0.25)
            .unwrap();
        assert!(puts.legs.iter().all(|leg| leg.option_type == OptionType::Put));

        // Equidistant call and put butterflies cost the same under parity
        let calls = engine
            .butterfly(StrategyKind::CallButterfly, 100.0, &[90.0, 100.0, 110.0], 30, 0.25)
            .unwrap();
        assert!((puts.net_cost().unwrap() - calls.net_cost().unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_equidistance_rounds_to_cents() {
        assert!(!is_equidistant(90.0, 100.0, 115.0));
        assert!(is_equidistant(90.0, 100.0, 110.004));
    }

    #[test]
    fn test_uneven_strikes_warn_but_build() {
        let (result, logs) = build_with_captured_logs(&[90.0, 100.0, 115.0]);
        assert_eq!(result.legs.len(), 3);
        assert!(logs.contains("WARN"), "{}", logs);
        assert!(logs.contains("butterfly strikes are not equidistant"), "{}", logs);

        let (_, logs) = build_with_captured_logs(&[90.0, 100.0, 110.0]);
        assert!(!logs.contains("not equidistant"), "{}", logs);
    }

    #[test]
    fn test_non_butterfly_kinds_rejected_by_builder() {
        let legs = LegPricer {
            pricer: Default::default(),
            spot: 100.0,
            time_to_expiry_years: 30.0 / 365.0,
            volatility: 0.25,
        };
        for kind in StrategyKind::ALL.into_iter().filter(|k| !k.is_butterfly()) {
            let err = build(kind, &legs, &[90.0, 100.0, 110.0]).unwrap_err();
            assert_eq!(err, StrategyError::UnsupportedStrategy(kind.to_string()));
        }
    }
}
