// Staleness Classifier - selects devices silent for longer than the threshold
use crate::config::SweepConfig;
use crate::domain::{
    parse_timestamp, DeviceRecord, ExclusionCounts, StaleDeviceRecord, StaleSet,
};
use crate::port::TimeProvider;
use std::sync::Arc;
use tracing::{info, warn};

pub struct StalenessClassifier {
    threshold: chrono::Duration,
    time_provider: Arc<dyn TimeProvider>,
}

impl StalenessClassifier {
    pub fn new(threshold: chrono::Duration, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            threshold,
            time_provider,
        }
    }

    pub fn from_config(config: &SweepConfig, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self::new(config.staleness_threshold(), time_provider)
    }

    /// Build the stale set for `devices`
    ///
    /// The cutoff is taken once, up front. A device is stale iff its parsed
    /// timestamp is strictly earlier than the cutoff. Devices with a missing
    /// or unparsable timestamp, or without an ID, are left out and counted.
    /// The result is ordered oldest first; ties keep inventory order.
    pub fn classify(&self, devices: &[DeviceRecord]) -> StaleSet {
        let cutoff = self.time_provider.now() - self.threshold;
        let mut excluded = ExclusionCounts::default();
        let mut stale = Vec::new();

        for device in devices {
            let device_id = device.device_id();

            let Some(raw) = device.timestamp() else {
                warn!(device_id = ?device_id, "Skipping device: no timestamp");
                excluded.missing_timestamp += 1;
                continue;
            };

            let last_seen = match parse_timestamp(raw) {
                Ok(ts) => ts,
                Err(e) => {
                    warn!(device_id = ?device_id, error = %e, "Skipping device: bad timestamp");
                    excluded.unparsable_timestamp += 1;
                    continue;
                }
            };

            if last_seen >= cutoff {
                continue;
            }

            let Some(device_id) = device_id else {
                warn!(timestamp = %raw, "Skipping stale device: no DeviceID");
                excluded.missing_id += 1;
                continue;
            };

            stale.push(StaleDeviceRecord {
                device_id,
                device_name: device.device_name().unwrap_or_default().to_string(),
                raw_timestamp: raw.to_string(),
                last_seen,
            });
        }

        stale.sort_by_key(|d| d.last_seen);

        info!(
            cutoff = %cutoff,
            inventory = devices.len(),
            stale = stale.len(),
            excluded = excluded.total(),
            "Classified inventory"
        );

        StaleSet {
            cutoff,
            devices: stale,
            excluded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::time_provider::mocks::FixedTimeProvider;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn classifier() -> StalenessClassifier {
        StalenessClassifier::new(Duration::days(60), Arc::new(FixedTimeProvider(now())))
    }

    fn iso(ts: NaiveDateTime) -> String {
        ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    fn device(id: &str, ts: &str) -> DeviceRecord {
        serde_json::from_value(json!({
            "DeviceID": id,
            "DeviceName": format!("name-{id}"),
            "DeviceTimeStamp": ts
        }))
        .unwrap()
    }

    fn ids(set: &StaleSet) -> Vec<&str> {
        set.devices.iter().map(|d| d.device_id.as_str()).collect()
    }

    #[test]
    fn test_cutoff_boundary_is_strict() {
        let devices = vec![
            device("61", &iso(now() - Duration::days(61))),
            device("59", &iso(now() - Duration::days(59))),
            device("60", &iso(now() - Duration::days(60))),
        ];

        let stale = classifier().classify(&devices);

        assert_eq!(stale.cutoff, now() - Duration::days(60));
        assert_eq!(ids(&stale), vec!["61"]);
    }

    #[test]
    fn test_result_sorted_oldest_first_across_formats() {
        let devices = vec![
            device("mid", "2023-03-01T00:00:00Z"),
            device("newest", "2024-01-01T05:00:00+0500"),
            device("oldest", "01/15/2022 08:30:00 AM"),
            device("recent", &iso(now() - Duration::days(1))),
        ];

        let stale = classifier().classify(&devices);

        assert_eq!(ids(&stale), vec!["oldest", "mid", "newest"]);
        for pair in stale.devices.windows(2) {
            assert!(pair[0].last_seen <= pair[1].last_seen);
        }
    }

    #[test]
    fn test_equal_timestamps_keep_inventory_order() {
        let devices = vec![
            device("first", "2023-01-01T00:00:00Z"),
            device("second", "01/01/2023 12:00:00 AM"),
        ];
        let stale = classifier().classify(&devices);
        assert_eq!(ids(&stale), vec!["first", "second"]);
    }

    #[test]
    fn test_missing_timestamp_never_stale() {
        let devices: Vec<DeviceRecord> = vec![
            serde_json::from_value(json!({"DeviceID": "none"})).unwrap(),
            serde_json::from_value(json!({"DeviceID": "null", "DeviceTimeStamp": null})).unwrap(),
            device("empty", ""),
        ];

        // Even an absurdly small threshold keeps them out
        let stale = StalenessClassifier::new(Duration::zero(), Arc::new(FixedTimeProvider(now())))
            .classify(&devices);

        assert!(stale.is_empty());
        assert_eq!(stale.excluded.missing_timestamp, 3);
    }

    #[test]
    fn test_unparsable_timestamp_is_excluded_not_fatal() {
        let devices = vec![
            device("bad", "last tuesday"),
            device("good", "2020-01-01T00:00:00Z"),
        ];

        let stale = classifier().classify(&devices);

        assert_eq!(ids(&stale), vec!["good"]);
        assert_eq!(stale.excluded.unparsable_timestamp, 1);
        assert_eq!(stale.excluded.total(), 1);
    }

    #[test]
    fn test_stale_device_without_id_is_excluded() {
        let devices: Vec<DeviceRecord> = vec![serde_json::from_value(
            json!({"DeviceName": "ghost", "DeviceTimeStamp": "2020-01-01T00:00:00Z"}),
        )
        .unwrap()];

        let stale = classifier().classify(&devices);
        assert!(stale.is_empty());
        assert_eq!(stale.excluded.missing_id, 1);
    }

    #[test]
    fn test_projection_keeps_raw_timestamp() {
        let devices = vec![device("d1", "01/15/2022 08:30:00 AM")];
        let stale = classifier().classify(&devices);

        let record = &stale.devices[0];
        assert_eq!(record.device_name, "name-d1");
        assert_eq!(record.raw_timestamp, "01/15/2022 08:30:00 AM");
        assert_eq!(
            record.last_seen,
            NaiveDate::from_ymd_opt(2022, 1, 15)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_input_not_mutated() {
        let devices = vec![
            device("b", "2021-01-01T00:00:00Z"),
            device("a", "2020-01-01T00:00:00Z"),
        ];
        let before = devices.clone();
        classifier().classify(&devices);
        assert_eq!(devices, before);
    }
}
