use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::EvaluationError;

/// Snapshot of a challenge account's balances
///
/// The engine only ever reads this. Recording trades goes through
/// `record_trade`, which keeps `highest_balance` a running maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Balance the challenge started with (the account size)
    pub starting_balance: Decimal,

    /// Balance right now
    pub current_balance: Decimal,

    /// Highest balance ever reached (trailing drawdown baseline)
    pub highest_balance: Decimal,

    /// Balance at the start of the current trading day
    pub daily_starting_balance: Decimal,

    /// Number of days with at least one trade
    pub trading_days: u32,

    /// Largest single-day profit so far
    #[serde(default)]
    pub best_day_profit: Decimal,

    /// Day `daily_starting_balance` refers to
    #[serde(default)]
    pub trading_date: Option<NaiveDate>,
}

impl AccountState {
    /// Fresh account with no trading history
    pub fn new(starting_balance: Decimal) -> Self {
        Self {
            starting_balance,
            current_balance: starting_balance,
            highest_balance: starting_balance,
            daily_starting_balance: starting_balance,
            trading_days: 0,
            best_day_profit: Decimal::ZERO,
            trading_date: None,
        }
    }

    /// Profit made so far today
    pub fn day_profit(&self) -> Decimal {
        self.current_balance - self.daily_starting_balance
    }

    /// Copy of this account with `pnl` applied to the current day
    ///
    /// Raises `highest_balance` and `best_day_profit` when the new balance
    /// exceeds them. The receiver is left untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` on `pnl_field` when the new balance does not fit a `Decimal`
    pub fn with_pnl(&self, pnl: Decimal, pnl_field: &str) -> Result<Self, EvaluationError> {
        let overflow = || {
            EvaluationError::invalid(
                pnl_field,
                format!("{} overflows a balance of {}", pnl, self.current_balance),
            )
        };

        let mut projected = self.clone();
        projected.current_balance = self.current_balance.checked_add(pnl).ok_or_else(overflow)?;
        if projected.current_balance > projected.highest_balance {
            projected.highest_balance = projected.current_balance;
        }
        let day_profit = projected
            .current_balance
            .checked_sub(projected.daily_starting_balance)
            .ok_or_else(overflow)?;
        if day_profit > projected.best_day_profit {
            projected.best_day_profit = day_profit;
        }
        Ok(projected)
    }

    /// Roll over to `date` if it is a new trading day
    ///
    /// The daily starting balance resets to the current balance and the
    /// trading day counter increments. Returns true when a roll happened.
    pub fn roll_day(&mut self, date: NaiveDate) -> bool {
        match self.trading_date {
            Some(current) if current >= date => false,
            _ => {
                self.trading_date = Some(date);
                self.daily_starting_balance = self.current_balance;
                self.trading_days += 1;
                true
            }
        }
    }

    /// Record a closed trade on `date`
    ///
    /// Leaves the account untouched when the trade cannot be applied.
    pub fn record_trade(&mut self, pnl: Decimal, date: NaiveDate) -> Result<(), EvaluationError> {
        let mut next = self.clone();
        next.roll_day(date);
        *self = next.with_pnl(pnl, "pnl")?;
        Ok(())
    }

    /// Check the snapshot is usable for evaluation
    ///
    /// # Errors
    ///
    /// - `ComputationImpossible` when the starting balance is zero or negative
    /// - `InvalidInput` naming the first other malformed field
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.starting_balance <= Decimal::ZERO {
            return Err(EvaluationError::ComputationImpossible {
                reason: format!(
                    "starting_balance must be positive, got {}",
                    self.starting_balance
                ),
            });
        }
        if self.current_balance < Decimal::ZERO {
            return Err(EvaluationError::invalid(
                "current_balance",
                format!("must not be negative, got {}", self.current_balance),
            ));
        }
        if self.highest_balance < Decimal::ZERO {
            return Err(EvaluationError::invalid(
                "highest_balance",
                format!("must not be negative, got {}", self.highest_balance),
            ));
        }
        if self.daily_starting_balance <= Decimal::ZERO {
            return Err(EvaluationError::invalid(
                "daily_starting_balance",
                format!("must be positive, got {}", self.daily_starting_balance),
            ));
        }
        if self.best_day_profit < Decimal::ZERO {
            return Err(EvaluationError::invalid(
                "best_day_profit",
                format!("must not be negative, got {}", self.best_day_profit),
            ));
        }
        Ok(())
    }
}
