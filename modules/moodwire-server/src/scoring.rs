//! The scoring loop: one shared producer for all subscribers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use moodwire_common::{aggregate_score, ClassificationResult, SentimentSample};
use moodwire_feed::HeadlineSource;

use crate::classifier::SentimentClassifier;
use crate::registry::SubscriberRegistry;

/// Periodically fetches the current headline batch, scores it, and
/// broadcasts one sample through the registry.
///
/// Running a single producer instead of one loop per connection means N
/// subscribers cost one upstream fetch/classify pass per cycle, not N.
pub struct ScoringLoop {
    source: Arc<dyn HeadlineSource>,
    classifier: Arc<dyn SentimentClassifier>,
    registry: Arc<SubscriberRegistry>,
    interval: Duration,
}

impl ScoringLoop {
    pub fn new(
        source: Arc<dyn HeadlineSource>,
        classifier: Arc<dyn SentimentClassifier>,
        registry: Arc<SubscriberRegistry>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            classifier,
            registry,
            interval,
        }
    }

    /// Run cycles forever. Collaborator failures skip the cycle; nothing
    /// here terminates the loop.
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "Scoring loop started");
        loop {
            self.cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One fetch → score → broadcast pass.
    pub async fn cycle(&self) {
        // No subscribers: skip the upstream work entirely.
        if self.registry.count().await == 0 {
            debug!("No subscribers, skipping cycle");
            return;
        }

        let headlines = match self.source.fetch().await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, "Failed to fetch headlines, skipping cycle");
                return;
            }
        };

        if headlines.is_empty() {
            debug!("Empty headline batch, skipping cycle");
            return;
        }

        let results = self.score(&headlines);
        let Some(score) = aggregate_score(&results) else {
            debug!("No classifiable headlines this cycle");
            return;
        };

        let sample = SentimentSample::now(score);
        info!(
            score = sample.score,
            headlines = headlines.len(),
            scored = results.len(),
            "Scored headline batch"
        );
        self.registry.broadcast(&sample).await;
    }

    /// Classify every headline independently. Items that fail
    /// classification are dropped from the aggregate, keeping one bad
    /// input from starving subscribers.
    fn score(&self, headlines: &[String]) -> Vec<ClassificationResult> {
        headlines
            .iter()
            .filter_map(|text| match self.classifier.classify(text) {
                Ok(result) => Some(result),
                Err(e) => {
                    debug!(error = %e, "Skipping unclassifiable headline");
                    None
                }
            })
            .collect()
    }
}
