use crate::shaper::exact_average;
use proptest::prelude::*;

#[test]
fn terminating_means_are_exact() {
    assert_eq!(exact_average(5, 2).as_deref(), Some("2.5"));
    assert_eq!(exact_average(6, 3).as_deref(), Some("2"));
    assert_eq!(exact_average(1, 8).as_deref(), Some("0.125"));
}

#[test]
fn repeating_means_are_truncated() {
    assert_eq!(exact_average(10, 3).as_deref(), Some("3.33333333333333333333"));
    assert_eq!(exact_average(2, 3).as_deref(), Some("0.66666666666666666666"));
}

#[test]
fn negative_sums() {
    assert_eq!(exact_average(-7, 2).as_deref(), Some("-3.5"));
    assert_eq!(exact_average(-1, 3).as_deref(), Some("-0.33333333333333333333"));
}

#[test]
fn sums_beyond_i64() {
    let sum = i128::from(i64::MAX) * 4;
    assert_eq!(exact_average(sum, 4), Some(i64::MAX.to_string()));
}

#[test]
fn empty_sets_have_no_mean() {
    assert_eq!(exact_average(0, 0), None);
}

proptest! {
    #[test]
    fn agrees_with_float_division(sum in -1_000_000_000i64..1_000_000_000, count in 1u64..10_000) {
        let average = exact_average(i128::from(sum), count).expect("non-empty");
        let parsed: f64 = average.parse().expect("decimal");
        let expected = sum as f64 / count as f64;

        prop_assert!((parsed - expected).abs() <= 1e-6 * expected.abs().max(1.0));
    }

    #[test]
    fn exact_multiples_have_no_fraction(quotient in -1_000_000i64..1_000_000, count in 1u64..1000) {
        let sum = i128::from(quotient) * i128::from(count);

        prop_assert_eq!(exact_average(sum, count), Some(quotient.to_string()));
    }
}
