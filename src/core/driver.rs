//! The rate-limit-aware request loop.
//!
//! The driver starts in [`DriverState::Warmup`], making up to
//! `warmup_calls` requests one interval apart. A `429` carrying a usable
//! `Retry-After` ends warmup early and moves to [`DriverState::CooldownWait`],
//! which counts the wait down one second at a time before settling into
//! [`DriverState::Steady`]. Steady state loops until the shutdown token fires.
//!
//! Every request and every wait is raced against the shutdown token, so an
//! interrupt preempts whatever the driver is doing. `run` only returns `Err`
//! when a request could not be sent at all.

use crate::config::DriverConfig;
use crate::domain::model::{CallOutcome, RunSummary, TransactionRequest};
use crate::domain::ports::{Pacer, Transport};
use crate::utils::error::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Warmup { completed: u32 },
    Steady,
    CooldownWait { seconds: u64 },
}

/// Posts `request` and classifies the reply. Only transport failures are
/// returned as errors.
pub async fn submit<T: Transport + ?Sized>(
    transport: &T,
    request: &TransactionRequest,
    config: &DriverConfig,
) -> Result<CallOutcome> {
    let body = serde_json::to_string(request)?;
    tracing::debug!("POST {} ({} bytes)", config.url, body.len());

    let reply = transport
        .post(&config.url, &config.content_type, body)
        .await
        .inspect_err(|e| tracing::error!("Request to {} failed: {}", config.url, e))?;

    let outcome = CallOutcome::from_reply(reply);
    match outcome {
        CallOutcome::Success { .. } => tracing::info!("{}", outcome),
        CallOutcome::RateLimited { .. } | CallOutcome::Failure { .. } => {
            tracing::warn!("{}", outcome)
        }
    }
    Ok(outcome)
}

pub struct LoadDriver<T: Transport, P: Pacer> {
    config: DriverConfig,
    transport: T,
    pacer: P,
    shutdown: CancellationToken,
}

impl<T: Transport, P: Pacer> LoadDriver<T, P> {
    pub fn new(
        config: DriverConfig,
        transport: T,
        pacer: P,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            transport,
            pacer,
            shutdown,
        }
    }

    /// Runs until the shutdown token is cancelled, returning what was sent.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!(
            "Calling {} every {}s ({} warmup calls)",
            self.config.url,
            self.config.interval.as_secs(),
            self.config.warmup_calls
        );

        let mut summary = RunSummary::default();
        let mut state = DriverState::Warmup { completed: 0 };

        while !self.shutdown.is_cancelled() {
            match self.step(state, &mut summary).await? {
                Some(next) => {
                    if std::mem::discriminant(&next) != std::mem::discriminant(&state) {
                        tracing::debug!("Driver state {:?} -> {:?}", state, next);
                    }
                    state = next;
                }
                None => break,
            }
        }

        tracing::info!(
            "Stopped after {} calls ({} succeeded, {} failed, {} rate limited)",
            summary.calls,
            summary.successes,
            summary.failures,
            summary.rate_limited
        );
        Ok(summary)
    }

    /// Performs the work of one state and returns the next one, or `None`
    /// once an interrupt has been observed.
    pub(crate) async fn step(
        &self,
        state: DriverState,
        summary: &mut RunSummary,
    ) -> Result<Option<DriverState>> {
        match state {
            DriverState::Warmup { completed } if completed >= self.config.warmup_calls => {
                Ok(Some(DriverState::Steady))
            }
            DriverState::Warmup { completed } => {
                let Some(outcome) = self.call(summary).await? else {
                    return Ok(None);
                };
                if let Some(seconds) = outcome.cooldown_secs() {
                    tracing::info!("Rate limited during warmup, skipping remaining warmup calls");
                    return Ok(Some(DriverState::CooldownWait { seconds }));
                }
                if !self.pause(self.config.interval).await {
                    return Ok(None);
                }
                Ok(Some(DriverState::Warmup {
                    completed: completed + 1,
                }))
            }
            DriverState::CooldownWait { seconds } => {
                if !self.countdown(seconds).await {
                    return Ok(None);
                }
                Ok(Some(DriverState::Steady))
            }
            DriverState::Steady => {
                let Some(outcome) = self.call(summary).await? else {
                    return Ok(None);
                };
                if let Some(seconds) = outcome.cooldown_secs() {
                    tracing::info!("Rate limit hit again. Waiting for {} seconds...", seconds);
                    return Ok(Some(DriverState::CooldownWait { seconds }));
                }
                if !self.pause(self.config.interval).await {
                    return Ok(None);
                }
                Ok(Some(DriverState::Steady))
            }
        }
    }

    async fn call(&self, summary: &mut RunSummary) -> Result<Option<CallOutcome>> {
        let request = TransactionRequest::random();

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Ok(None),
            outcome = submit(&self.transport, &request, &self.config) => {
                let outcome = outcome?;
                summary.record(&outcome);
                Ok(Some(outcome))
            }
        }
    }

    /// Returns `false` if the wait was cut short by an interrupt.
    async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => false,
            _ = self.pacer.pause(duration) => true,
        }
    }

    async fn countdown(&self, seconds: u64) -> bool {
        for remaining in (1..=seconds).rev() {
            tracing::info!("Waiting for {} seconds before resuming...", remaining);
            if !self.pause(Duration::from_secs(1)).await {
                return false;
            }
        }
        true
    }
}
