//! Money types with precise decimal arithmetic
//!
//! Premiums, claimed amounts, deductibles and payments are all expressed as
//! `Money`. Amounts use rust_decimal so that coinsurance and deductible
//! arithmetic never suffers floating-point drift.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    INR,
    JPY,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::INR => "₹",
            Currency::JPY => "¥",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::INR => "INR",
            Currency::JPY => "JPY",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            "INR" => Ok(Currency::INR),
            "JPY" => Ok(Currency::JPY),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Amount overflow")]
    Overflow,
}

/// Largest amount accepted from callers
///
/// Fits the NUMERIC(19,4) columns and leaves headroom for report totals.
pub const MAX_AMOUNT: Decimal = dec!(999999999999999.99);

/// A monetary amount with associated currency
///
/// Amounts are stored with 4 decimal places internally; use
/// [`Money::round_to_currency`] before presenting or persisting a final figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Validates a caller-supplied amount that must be greater than zero
    ///
    /// The amount is rounded to the currency's places before the range check,
    /// so a fraction of the minor unit is rejected rather than stored as zero.
    pub fn positive_input(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let money = Self::input(amount, currency)?;
        if !money.is_positive() {
            return Err(MoneyError::InvalidAmount(format!(
                "{} must be greater than zero",
                amount
            )));
        }
        Ok(money)
    }

    /// Validates a caller-supplied amount that may be zero
    pub fn non_negative_input(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let money = Self::input(amount, currency)?;
        if money.is_negative() {
            return Err(MoneyError::InvalidAmount(format!("{} must not be negative", amount)));
        }
        Ok(money)
    }

    fn input(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let money = Self::new(amount, currency).round_to_currency();
        if money.amount > MAX_AMOUNT {
            return Err(MoneyError::InvalidAmount(format!(
                "{} exceeds the maximum of {}",
                amount, MAX_AMOUNT
            )));
        }
        Ok(money)
    }

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        let divisor = Decimal::new(10_i64.pow(currency.decimal_places()), 0);
        Self::new(Decimal::new(minor_units, 0) / divisor, currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds to the currency's standard decimal places using banker's rounding
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                self.currency.decimal_places(),
                rust_decimal::RoundingStrategy::MidpointNearestEven,
            ),
            currency: self.currency,
        }
    }

    /// Checked addition that returns an error on currency mismatch or overflow
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch or overflow
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Returns the smaller of two amounts in the same currency
    pub fn checked_min(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(if self.amount <= other.amount { *self } else { *other })
    }

    /// Clamps negative amounts to zero
    pub fn floor_zero(&self) -> Self {
        if self.amount.is_sign_negative() {
            Self::zero(self.currency)
        } else {
            *self
        }
    }

    /// Multiplies by a scalar (e.g., for rate calculations)
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::new(self.amount * factor, self.currency)
    }

    /// Sums an iterator of amounts, all of which must be in `currency`
    pub fn sum<'a>(
        currency: Currency,
        items: impl IntoIterator<Item = &'a Money>,
    ) -> Result<Money, MoneyError> {
        items
            .into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Currency mismatch in Money::add")
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other)
            .expect("Currency mismatch in Money::sub")
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}

/// A percentage rate such as a plan's copay (coinsurance) share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.20 for 20%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.20 for 20%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 20 for 20%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Returns true if the rate lies within 0% to 100% inclusive
    pub fn is_proportion(&self) -> bool {
        self.value >= dec!(0) && self.value <= dec!(1)
    }

    /// Applies this rate to a money amount
    pub fn apply(&self, money: &Money) -> Money {
        money.multiply(self.value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50), Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::new(dec!(100.00), Currency::USD);
        let eur = Money::new(dec!(100.00), Currency::EUR);

        let result = usd.checked_add(&eur);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_copay_rate_application() {
        let copay = Rate::from_percentage(dec!(20));
        let approved = Money::new(dec!(500.00), Currency::USD);

        assert_eq!(copay.apply(&approved).amount(), dec!(100.00));
    }

    #[test]
    fn test_sub_cent_input_is_not_positive() {
        assert!(Money::positive_input(dec!(0.001), Currency::USD).is_err());
        assert!(Money::positive_input(dec!(0.004), Currency::USD).is_err());
        let cent = Money::positive_input(dec!(0.006), Currency::USD).unwrap();
        assert_eq!(cent.amount(), dec!(0.01));
    }

    #[test]
    fn test_input_above_maximum_is_rejected() {
        assert!(Money::positive_input(MAX_AMOUNT, Currency::USD).is_ok());
        assert!(Money::positive_input(MAX_AMOUNT + dec!(1), Currency::USD).is_err());
        assert!(Money::non_negative_input(dec!(0), Currency::USD).is_ok());
        assert!(Money::non_negative_input(dec!(-0.01), Currency::USD).is_err());
    }

    #[test]
    fn test_checked_add_reports_overflow() {
        let big = Money::new(Decimal::MAX, Currency::USD);
        assert_eq!(big.checked_add(&big), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_floor_zero() {
        let m = Money::new(dec!(-12.50), Currency::USD);
        assert!(m.floor_zero().is_zero());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn money_arithmetic_is_associative(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64,
            c in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a, Currency::USD);
            let mb = Money::from_minor(b, Currency::USD);
            let mc = Money::from_minor(c, Currency::USD);

            prop_assert_eq!((ma + mb) + mc, ma + (mb + mc));
        }

        #[test]
        fn checked_min_never_exceeds_either_operand(
            a in 0i64..1_000_000i64,
            b in 0i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a, Currency::USD);
            let mb = Money::from_minor(b, Currency::USD);
            let min = ma.checked_min(&mb).unwrap();

            prop_assert!(min.amount() <= ma.amount());
            prop_assert!(min.amount() <= mb.amount());
        }
    }
}
