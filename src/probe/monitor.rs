//! Periodic probing.
//!
//! # Responsibilities
//! - Dial every configured target once per interval
//! - Log status transitions per target
//! - Pick up reloaded configuration between rounds

use std::collections::HashMap;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::sync::{broadcast, mpsc};
use tokio::time;

use crate::config::{DialerConfig, ProbeConfig, ProbeTarget};
use crate::net::{Connect, Dialer};
use crate::probe::report::{ProbeReport, ProbeStatus};

/// Dial every target concurrently and report how each went.
///
/// Successful connections are closed as soon as they are counted.
pub async fn run_once<C: Connect>(dialer: &Dialer<C>, targets: &[ProbeTarget]) -> Vec<ProbeReport> {
    join_all(targets.iter().map(|t| probe_one(dialer, t))).await
}

async fn probe_one<C: Connect>(dialer: &Dialer<C>, probe: &ProbeTarget) -> ProbeReport {
    let target = probe.target();
    let deadline = probe.deadline(dialer.deadline());

    let started = Instant::now();
    let result = dialer.dial_target(&target, deadline).await;
    let report = ProbeReport::from_result(&probe.name, &target, started.elapsed(), &result);
    drop(result);

    report
}

pub struct ProbeMonitor<C: Connect> {
    dialer: Dialer<C>,
    config: ProbeConfig,
    last_status: HashMap<String, ProbeStatus>,
}

impl<C: Connect> ProbeMonitor<C> {
    pub fn new(dialer: Dialer<C>, config: ProbeConfig) -> Self {
        Self {
            dialer,
            config,
            last_status: HashMap::new(),
        }
    }

    /// Probe until shutdown, applying configuration updates as they arrive.
    pub async fn run(
        mut self,
        mut updates: mpsc::UnboundedReceiver<DialerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!(
            interval = self.config.interval_secs,
            targets = self.config.targets.len(),
            "Probe monitor starting"
        );

        let mut ticker = time::interval(self.interval());

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.round().await;
                }
                Some(config) = updates.recv() => {
                    self.apply(config);
                    ticker = time::interval(self.interval());
                }
                _ = shutdown.recv() => {
                    tracing::info!("Probe monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one probe round and log transitions.
    pub async fn round(&mut self) -> Vec<ProbeReport> {
        let reports = run_once(&self.dialer, &self.config.targets).await;

        for report in &reports {
            let previous = self.last_status.insert(report.name.clone(), report.status);
            if previous == Some(report.status) {
                continue;
            }
            match report.status {
                ProbeStatus::Up => tracing::info!(
                    name = %report.name,
                    target = %report.target,
                    elapsed_ms = report.elapsed_ms,
                    "Target reachable"
                ),
                _ => tracing::warn!(
                    name = %report.name,
                    target = %report.target,
                    status = ?report.status,
                    error = report.error.as_deref().unwrap_or(""),
                    "Target unreachable"
                ),
            }
        }

        reports
    }

    /// Status seen for `name` in the last round it took part in.
    pub fn last_status(&self, name: &str) -> Option<ProbeStatus> {
        self.last_status.get(name).copied()
    }

    fn apply(&mut self, config: DialerConfig) {
        self.dialer = self.dialer.clone().with_config(&config.dial);
        self.last_status
            .retain(|name, _| config.probe.targets.iter().any(|t| &t.name == name));
        self.config = config.probe;
        tracing::info!(
            interval = self.config.interval_secs,
            targets = self.config.targets.len(),
            "Probe configuration reloaded"
        );
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.config.interval_secs.max(1))
    }
}
