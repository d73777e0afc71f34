//! Serde round trips for the deal input and valuation output payloads.

use chrono::NaiveDate;

use mezzanine::core::Position;
use mezzanine::instruments::{
    AntiDilution, ConvertibleTerms, ExerciseWindow, Participation, ResetEvent, Security,
};
use mezzanine::portfolio::{price_deal, Deal, DealResult, DealSecurity};
use mezzanine::rates::{CurvePair, TenorCurve};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_deal() -> Deal {
    Deal {
        deal_name: "roundtrip".to_string(),
        valuation_date: date(2025, 1, 1),
        share_price_current: 18_000.0,
        underlying_num_shares: 2_000_000.0,
        volatility: 0.35,
        risk_free_rate: 0.035,
        credit_spread: 0.02,
        curves: Some(CurvePair::new(
            TenorCurve::new(vec![(1.0, 0.03), (5.0, 0.04)]),
            TenorCurve::flat(0.02),
        )),
        securities: vec![DealSecurity {
            name: "rcps-1".to_string(),
            position: Position::Holder,
            security: Security::Rcps(ConvertibleTerms {
                maturity_date: date(2028, 1, 1),
                face_total: 1_000_000_000.0,
                share_count: 50_000.0,
                coupon_rate: 0.02,
                dividend_rate: 0.01,
                redemption_premium: 0.05,
                initial_conversion_price: 20_000.0,
                conversion_ratio_override: None,
                anti_dilution: AntiDilution::WeightedAverage,
                refixing_floor: Some(14_000.0),
                reset_events: vec![ResetEvent {
                    date: date(2025, 6, 1),
                    new_price: 15_000.0,
                    new_shares: 10_000.0,
                    shares_outstanding_before: Some(2_000_000.0),
                }],
                participation: Participation::Participating,
                participation_cap: Some(2.0),
                issuer_call: Some(ExerciseWindow {
                    price: 24_000.0,
                    start: date(2027, 1, 1),
                    end: date(2028, 1, 1),
                }),
                holder_put: None,
                stepwise_risk_free: None,
                stepwise_spread: None,
            }),
        }],
    }
}

#[test]
fn deal_round_trips_through_json() {
    let deal = sample_deal();
    let json = serde_json::to_string_pretty(&deal).unwrap();
    let decoded: Deal = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, deal);
}

#[test]
fn deal_result_round_trips_through_json() {
    let result = price_deal(&sample_deal()).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let decoded: DealResult = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, result);
}

#[test]
fn missing_exercise_multiple_defaults_on_deserialization() {
    let json = r#"{
        "maturity_date": "2030-01-01",
        "option_count": 10000.0,
        "strike": 20000.0,
        "vesting_end": null,
        "exit_rate": 0.05,
        "stepwise_risk_free": null
    }"#;
    let terms: mezzanine::instruments::EsoTerms = serde_json::from_str(json).unwrap();
    assert_eq!(
        terms.early_exercise_multiple,
        mezzanine::instruments::DEFAULT_EXERCISE_MULTIPLE
    );
}
