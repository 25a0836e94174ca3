use std::time::Duration;

use gym_proto::GymsResponse;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, trace, warn};

use crate::client::{FetchError, GymClient};

/// Fetches gym updates on a fixed cadence, one request at a time.
#[derive(Debug, Clone)]
pub struct Poller {
    client: GymClient,
    period: Duration,
    after: Option<i64>,
}

impl Poller {
    pub fn new(client: GymClient, period: Duration) -> Self {
        Self {
            client,
            period,
            after: None,
        }
    }

    /// Filter that the next request will carry.
    pub fn next_after(&self) -> Option<i64> {
        self.after
    }

    pub async fn poll_once(&mut self) -> Result<GymsResponse, FetchError> {
        let response = self.client.fetch(self.after).await?;
        self.after = (response.timestamp > 0).then_some(response.timestamp);
        trace!(
            target: "gym_watch::poller",
            timestamp = response.timestamp,
            gyms = response.gyms.len(),
            "poll.fetched"
        );
        Ok(response)
    }

    /// Poll until `sink` is closed. Failed requests are logged and the tick is skipped.
    ///
    /// The first request goes out immediately. A request that outlasts the
    /// period delays the next one instead of overlapping it. Closing `sink`
    /// abandons an in-flight request.
    pub async fn run(mut self, sink: UnboundedSender<GymsResponse>) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            target: "gym_watch::poller",
            endpoint = self.client.base_url(),
            period_ms = self.period.as_millis() as u64,
            "poller.started"
        );

        loop {
            tokio::select! {
                _ = sink.closed() => break,
                _ = ticker.tick() => {}
            }
            let result = tokio::select! {
                _ = sink.closed() => break,
                result = self.poll_once() => result,
            };
            match result {
                Ok(response) => {
                    if sink.send(response).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(
                        target: "gym_watch::poller",
                        error = %err,
                        after = ?self.after,
                        "poll.failed"
                    );
                }
            }
        }

        info!(target: "gym_watch::poller", "poller.stopped");
    }
}
