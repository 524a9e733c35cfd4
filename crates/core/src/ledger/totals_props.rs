//! Property-based tests for payment aggregation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::payment::Payment;
use super::totals::aggregate;

/// Strategy to generate a money amount with two decimal places, possibly negative.
fn money() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn payment_strategy() -> impl Strategy<Value = Payment> {
    (money(), money(), prop_oneof![Just("Cash"), Just("UPI"), Just("Bank")]).prop_map(
        |(paid, expenditure, mode)| Payment {
            date: "01/01/2026".to_string(),
            paid,
            expenditure,
            mode: mode.to_string(),
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// `paid` is the sum of every payment's `paid`, and `due` is what remains.
    #[test]
    fn prop_paid_is_sum_and_due_is_remainder(
        payments in prop::collection::vec(payment_strategy(), 0..40),
        amount in money(),
    ) {
        let totals = aggregate(&payments, amount).unwrap();
        let expected_paid: Decimal = payments.iter().map(|p| p.paid).sum();

        prop_assert_eq!(totals.paid, expected_paid);
        prop_assert_eq!(totals.due, amount - expected_paid);
    }

    /// `balance` is `paid - expenditure` for any history.
    #[test]
    fn prop_balance_is_paid_minus_expenditure(
        payments in prop::collection::vec(payment_strategy(), 0..40),
        amount in money(),
    ) {
        let totals = aggregate(&payments, amount).unwrap();
        let expected_expenditure: Decimal = payments.iter().map(|p| p.expenditure).sum();

        prop_assert_eq!(totals.expenditure, expected_expenditure);
        prop_assert_eq!(totals.balance, totals.paid - totals.expenditure);
    }

    /// Payment order does not change the totals.
    #[test]
    fn prop_totals_ignore_order(
        payments in prop::collection::vec(payment_strategy(), 0..40),
        amount in money(),
    ) {
        let mut reversed = payments.clone();
        reversed.reverse();

        prop_assert_eq!(
            aggregate(&payments, amount).unwrap(),
            aggregate(&reversed, amount).unwrap()
        );
    }
}
