use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::tracking::tier_gate::TierGate;
use crate::domain::account::{AccountState, TrackedAccount};
use crate::domain::errors::{EvaluationError, TrackerError};
use crate::domain::evaluation::HealthEngine;
use crate::domain::evaluation::types::{EvaluationResult, SimulationResult};
use crate::domain::events::{EventListener, HealthEvent};
use crate::domain::repositories::AccountRepository;
use crate::domain::rules::RuleSet;
use crate::infrastructure::event_bus::{EventBus, Subscription, SubscriptionId};
use crate::infrastructure::observability::Metrics;

/// Follows a user's challenge accounts: records trades, re-evaluates them and
/// notifies listeners when an account's classification moves.
pub struct AccountTracker {
    repository: Arc<dyn AccountRepository>,
    engine: Arc<HealthEngine>,
    gate: TierGate,
    event_bus: EventBus,
    metrics: Option<Metrics>,
}

impl AccountTracker {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        engine: Arc<HealthEngine>,
        gate: TierGate,
        event_bus: EventBus,
    ) -> Self {
        Self {
            repository,
            engine,
            gate,
            event_bus,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Register a listener for account events
    pub async fn subscribe(
        &self,
        subscription: Subscription,
        listener: Arc<dyn EventListener>,
    ) -> SubscriptionId {
        self.event_bus.subscribe(subscription, listener).await
    }

    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.event_bus.unsubscribe(id).await
    }

    /// Start tracking a fresh account
    ///
    /// # Errors
    ///
    /// - `TierLimit` when the plan's account cap is reached
    /// - `Evaluation` when the rule set or starting balance is unusable
    pub async fn open_account(
        &self,
        label: impl Into<String>,
        rule_set: RuleSet,
        starting_balance: Decimal,
    ) -> Result<TrackedAccount, TrackerError> {
        // Cheap early refusal; the capped insert below is what enforces the cap
        self.gate
            .check_open_account(self.repository.count().await?)?;

        rule_set.validate()?;
        let state = AccountState::new(starting_balance);
        state.validate()?;

        let mut account = TrackedAccount::new(label, rule_set, state);
        let evaluation = self.engine.evaluate(&account.state, &account.rule_set)?;
        account.last_status = Some(evaluation.status);

        let Some(tracked) = self
            .repository
            .insert_capped(&account, self.gate.max_accounts())
            .await?
        else {
            return Err(self.gate.account_limit_reached());
        };

        info!(
            "Opened account {} ({}) on {} with {}",
            account.label,
            account.id,
            account.rule_set.display_name(),
            starting_balance
        );
        if let Some(metrics) = &self.metrics {
            metrics.tracked_accounts.set(tracked as f64);
        }
        self.event_bus
            .publish(HealthEvent::AccountOpened {
                account_id: account.id,
                label: account.label.clone(),
                timestamp: Utc::now(),
            })
            .await;

        Ok(account)
    }

    /// Record a closed trade and re-evaluate
    ///
    /// A trade that would take the balance below zero, or past what a
    /// `Decimal` holds, is rejected and the account is left as it was.
    pub async fn record_trade(
        &self,
        id: Uuid,
        pnl: Decimal,
        date: NaiveDate,
    ) -> Result<EvaluationResult, TrackerError> {
        let mut account = self.load(id).await?;

        let mut next = account.state.clone();
        next.record_trade(pnl, date)
            .map_err(|source| TrackerError::TradeRejected { pnl, source })?;
        if next.current_balance < Decimal::ZERO {
            return Err(TrackerError::TradeRejected {
                pnl,
                source: EvaluationError::invalid(
                    "pnl",
                    format!("would take the balance to {}", next.current_balance),
                ),
            });
        }

        let evaluation = self.engine.evaluate(&next, &account.rule_set)?;
        let previous = account.last_status;
        account.state = next;
        account.last_status = Some(evaluation.status);
        self.repository.save(&account).await?;

        debug!(
            "Recorded {} on {} for {}: balance {} -> {}",
            pnl, date, account.label, account.state.current_balance, evaluation.status
        );
        self.record_evaluation(&evaluation);

        if previous != Some(evaluation.status) {
            let mut rules = evaluation.breached.clone();
            rules.extend(evaluation.approaching.iter().copied());
            self.event_bus
                .publish(HealthEvent::StatusChanged {
                    account_id: account.id,
                    label: account.label.clone(),
                    from: previous,
                    to: evaluation.status,
                    rules,
                    timestamp: Utc::now(),
                })
                .await;
        }

        Ok(evaluation)
    }

    /// Evaluate an account as it stands
    pub async fn evaluate(&self, id: Uuid) -> Result<EvaluationResult, TrackerError> {
        let account = self.load(id).await?;
        let evaluation = self.engine.evaluate(&account.state, &account.rule_set)?;
        self.record_evaluation(&evaluation);
        Ok(evaluation)
    }

    /// Project a hypothetical trade on an account (paid feature)
    pub async fn simulate(
        &self,
        id: Uuid,
        hypothetical_pnl: Decimal,
    ) -> Result<SimulationResult, TrackerError> {
        self.gate.check_simulation()?;
        let account = self.load(id).await?;
        Ok(self
            .engine
            .simulate(&account.state, &account.rule_set, hypothetical_pnl)?)
    }

    pub async fn accounts(&self) -> Result<Vec<TrackedAccount>, TrackerError> {
        Ok(self.repository.get_all().await?)
    }

    async fn load(&self, id: Uuid) -> Result<TrackedAccount, TrackerError> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| TrackerError::AccountNotFound { id: id.to_string() })
    }

    fn record_evaluation(&self, evaluation: &EvaluationResult) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_evaluation(evaluation.status);
        }
    }
}
