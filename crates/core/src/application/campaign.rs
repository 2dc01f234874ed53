// Multi-iteration runner
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use super::verifier::{DeviceTarget, RecoveryVerifier};
use crate::domain::{IterationNumber, IterationRecord, Scenario};
use crate::error::{AppError, Result};

/// Which iterations to run against one device pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignPlan {
    pub scenario: Scenario,
    pub first_iteration: IterationNumber,
    pub count: u32,
    /// Pause between consecutive iterations (not after the last)
    pub cooldown: Duration,
}

impl CampaignPlan {
    pub fn new(scenario: Scenario, first_iteration: IterationNumber, count: u32) -> Self {
        Self {
            scenario,
            first_iteration,
            count,
            cooldown: Duration::ZERO,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }
}

/// Runs iterations one at a time, each verified and persisted before the next
pub struct Campaign {
    verifier: Arc<RecoveryVerifier>,
}

impl Campaign {
    pub fn new(verifier: Arc<RecoveryVerifier>) -> Self {
        Self { verifier }
    }

    /// Run every iteration of `plan`
    ///
    /// Iteration failures are data, not errors; the run stops early only when
    /// a record cannot be persisted.
    ///
    /// # Returns
    /// The records produced, in iteration order
    pub async fn run(&self, target: &DeviceTarget, plan: &CampaignPlan) -> Result<Vec<IterationRecord>> {
        if plan.count == 0 {
            return Err(AppError::Config("iteration count must be at least 1".to_string()));
        }

        info!(
            scenario = %plan.scenario,
            first_iteration = %plan.first_iteration,
            count = %plan.count,
            local = %target.local_address,
            remote = %target.remote_address,
            "Starting campaign"
        );

        let mut records = Vec::with_capacity(plan.count as usize);
        for offset in 0..plan.count {
            if offset > 0 && !plan.cooldown.is_zero() {
                sleep(plan.cooldown).await;
            }

            let iteration = plan.first_iteration + IterationNumber::from(offset);
            let record = self
                .verifier
                .run_iteration(target, iteration, plan.scenario)
                .await?;
            records.push(record);
        }

        info!(completed = records.len(), "Campaign complete");
        Ok(records)
    }
}
