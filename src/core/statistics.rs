use crate::domain::model::{ImportStatistics, Link, LinkSource};
use crate::domain::ports::StatisticsBuilder;
use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Stamps each run with the time it was summarised, so a run that fetched
/// nothing still moves the checkpoint forward.
///
/// Links published between the fetch and this call fall behind the new
/// checkpoint and are not requested again. Links dated after the run time
/// (clock skew, future timestamps) stay ahead of it and are fetched and
/// stored again on every run until a checkpoint passes them.
#[derive(Debug, Clone, Default)]
pub struct RunTimeStatisticsBuilder<C: Clock = SystemClock> {
    clock: C,
}

impl RunTimeStatisticsBuilder<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> RunTimeStatisticsBuilder<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> StatisticsBuilder for RunTimeStatisticsBuilder<C> {
    fn prepare_statistics(&self, source: LinkSource, links: &[Link]) -> ImportStatistics {
        ImportStatistics::new(source, self.clock.now(), links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn link(id: &str, created_at: DateTime<Utc>) -> Link {
        Link {
            source: LinkSource::Pocket,
            external_id: id.to_string(),
            created_at,
            title: Some(format!("Link {id}")),
            url: format!("https://example.com/{id}"),
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn checkpoint_is_the_run_time_not_the_newest_link() {
        let run_at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2025, 5, 30, 0, 0, 0).unwrap();
        let builder = RunTimeStatisticsBuilder::with_clock(FixedClock(run_at));

        let stats = builder.prepare_statistics(LinkSource::Pocket, &[link("1", older)]);

        assert_eq!(stats.source, LinkSource::Pocket);
        assert_eq!(stats.dt, run_at);
        assert_eq!(stats.links_count, 1);
        assert_eq!(stats.link_ids, vec!["1".to_string()]);
    }

    #[test]
    fn empty_batch_still_produces_a_record() {
        let run_at = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        let builder = RunTimeStatisticsBuilder::with_clock(FixedClock(run_at));

        let stats = builder.prepare_statistics(LinkSource::Custom, &[]);

        assert_eq!(stats.links_count, 0);
        assert!(stats.link_ids.is_empty());
        assert_eq!(stats.dt, run_at);
    }

    #[test]
    fn system_clock_moves_forward() {
        let builder = RunTimeStatisticsBuilder::new();
        let before = Utc::now();
        let stats = builder.prepare_statistics(LinkSource::Rss, &[]);
        assert!(stats.dt >= before);
    }
}
