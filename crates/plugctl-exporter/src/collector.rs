//! Per-target metric collectors and the lazily-populated collector cache.
//!
//! Each target gets one collector with its own registry, created on first
//! scrape and kept for the life of the process. Metric values are
//! overwritten on every scrape; concurrent scrapes of the same target
//! race with last-write-wins, each having re-queried the live device.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use plugctl_core::{parse_addr, query_device, CoreError, Transport};

/// Errors a scrape request can surface. All of them are request-scoped:
/// none invalidates cached collectors.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

#[derive(Debug)]
struct DeviceMetrics {
    on_time: Gauge,
    relay_state: Gauge,
    rssi: Gauge,
    info: GaugeVec,
}

impl DeviceMetrics {
    fn new() -> Result<Self, prometheus::Error> {
        Ok(Self {
            on_time: Gauge::new(
                "plug_on_time_seconds",
                "Seconds the plug's relay has been on.",
            )?,
            relay_state: Gauge::new("plug_relay_state", "Relay state of the plug (0=off, 1=on).")?,
            rssi: Gauge::new("plug_rssi_dbm", "Signal strength of the plug radio in dBm.")?,
            info: GaugeVec::new(
                Opts::new("plug_device_info", "Identity of the plug, constant 1."),
                &["alias", "id", "name", "model", "sw"],
            )?,
        })
    }

    fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        registry.register(Box::new(self.on_time.clone()))?;
        registry.register(Box::new(self.relay_state.clone()))?;
        registry.register(Box::new(self.rssi.clone()))?;
        registry.register(Box::new(self.info.clone()))?;
        Ok(())
    }
}

/// Metric collector for one target, with an isolated registry so scrapes
/// of different targets never interleave metric families.
#[derive(Debug)]
pub struct DeviceCollector {
    addr: SocketAddr,
    metrics: DeviceMetrics,
    registry: Registry,
}

impl DeviceCollector {
    fn new(addr: SocketAddr) -> Result<Self, ScrapeError> {
        let metrics = DeviceMetrics::new()?;
        let registry = Registry::new();
        metrics.register(&registry)?;
        Ok(Self {
            addr,
            metrics,
            registry,
        })
    }

    /// Re-query the device and overwrite this collector's gauges.
    pub async fn update(&self, transport: &Transport) -> Result<(), ScrapeError> {
        let info = query_device(transport, self.addr).await?;
        info.err().map_err(CoreError::from)?;

        self.metrics.on_time.set(info.on_time as f64);
        self.metrics.relay_state.set(info.relay_state as f64);
        self.metrics.rssi.set(info.rssi as f64);
        self.metrics
            .info
            .with_label_values(&[
                info.alias.as_str(),
                info.device_id.as_str(),
                info.device_name.as_str(),
                info.model.as_str(),
                info.software_version.as_str(),
            ])
            .set(1.0);
        Ok(())
    }

    /// Render only this collector's metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, ScrapeError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Target-keyed cache of collectors. Membership only grows; a failed
/// scrape never evicts or resets a collector.
pub struct CollectorCache {
    collectors: RwLock<HashMap<String, Arc<DeviceCollector>>>,
    constructions: AtomicUsize,
}

impl CollectorCache {
    pub fn new() -> Self {
        Self {
            collectors: RwLock::new(HashMap::new()),
            constructions: AtomicUsize::new(0),
        }
    }

    /// Look up the collector for a target, constructing it on first use.
    ///
    /// A malformed target fails before any cache interaction. Hits only
    /// take the read lock, so scrapes of known targets do not serialize;
    /// misses re-check under the write lock so a construction race still
    /// produces exactly one collector.
    pub async fn collector_for(&self, target: &str) -> Result<Arc<DeviceCollector>, ScrapeError> {
        let addr = parse_addr(target)?;

        if let Some(collector) = self.collectors.read().await.get(target) {
            return Ok(collector.clone());
        }

        let mut collectors = self.collectors.write().await;
        if let Some(collector) = collectors.get(target) {
            return Ok(collector.clone());
        }

        debug!(%target, "creating collector");
        let collector = Arc::new(DeviceCollector::new(addr)?);
        collectors.insert(target.to_string(), collector.clone());
        self.constructions.fetch_add(1, Ordering::Relaxed);
        Ok(collector)
    }

    /// Number of collectors ever constructed.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }

    pub async fn len(&self) -> usize {
        self.collectors.read().await.len()
    }
}

impl Default for CollectorCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugctl_core::{DeviceError, Envelope};
    use serde_json::json;
    use std::time::Duration;
    use tokio::net::UdpSocket;

    fn test_transport() -> Transport {
        Transport::new().with_read_deadline(Duration::from_millis(200))
    }

    fn sysinfo_reply(alias: &str, on_time: i64) -> Vec<u8> {
        let mut envelope = Envelope::default();
        envelope.system.insert(
            "get_sysinfo".to_string(),
            json!({
                "err_code": 0,
                "alias": alias,
                "deviceId": "80068FD99AB7",
                "dev_name": "Smart Wi-Fi Plug",
                "model": "HS103(US)",
                "sw_ver": "1.5.8",
                "relay_state": 1,
                "on_time": on_time,
                "rssi": -52,
            }),
        );
        envelope.encode().unwrap()
    }

    /// Device that ignores the first `ignore` queries, then answers.
    async fn flaky_device(reply: Vec<u8>, ignore: usize) -> SocketAddr {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 2048];
            let mut seen = 0usize;
            loop {
                let Ok((_, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                seen += 1;
                if seen > ignore {
                    socket.send_to(&reply, peer).await.unwrap();
                }
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_concurrent_first_scrapes_construct_once() {
        let cache = Arc::new(CollectorCache::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.collector_for("127.0.0.1:9999").await.unwrap()
            }));
        }

        let mut collectors = Vec::new();
        for handle in handles {
            collectors.push(handle.await.unwrap());
        }

        assert_eq!(cache.constructions(), 1);
        assert_eq!(cache.len().await, 1);
        for collector in &collectors[1..] {
            assert!(Arc::ptr_eq(&collectors[0], collector));
        }
    }

    #[tokio::test]
    async fn test_bad_target_never_touches_cache() {
        let cache = CollectorCache::new();

        let err = cache.collector_for("not-an-address").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Core(CoreError::BadTarget(_))));
        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.constructions(), 0);
    }

    #[tokio::test]
    async fn test_failed_scrape_keeps_collector_cached() {
        let reply = sysinfo_reply("heater", 120);
        let addr = flaky_device(reply, 1).await;
        let target = addr.to_string();
        let transport = test_transport();

        let cache = CollectorCache::new();
        let collector = cache.collector_for(&target).await.unwrap();

        // First scrape: the device stays silent and the query times out.
        let err = collector.update(&transport).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::Core(CoreError::Device(DeviceError::NoResponse { .. }))
        ));

        // The collector survives the failure and the next scrape works.
        let again = cache.collector_for(&target).await.unwrap();
        assert!(Arc::ptr_eq(&collector, &again));
        assert_eq!(cache.constructions(), 1);

        again.update(&transport).await.unwrap();
        let body = again.encode().unwrap();
        assert!(body.contains("plug_on_time_seconds 120"));
        assert!(body.contains("plug_relay_state 1"));
        assert!(body.contains("plug_rssi_dbm -52"));
        assert!(body.contains("alias=\"heater\""));
    }

    #[tokio::test]
    async fn test_registries_are_isolated_per_target() {
        let first = flaky_device(sysinfo_reply("one", 10), 0).await;
        let second = flaky_device(sysinfo_reply("two", 20), 0).await;
        let transport = test_transport();

        let cache = CollectorCache::new();
        let a = cache.collector_for(&first.to_string()).await.unwrap();
        let b = cache.collector_for(&second.to_string()).await.unwrap();
        a.update(&transport).await.unwrap();
        b.update(&transport).await.unwrap();

        let body_a = a.encode().unwrap();
        assert!(body_a.contains("alias=\"one\""));
        assert!(!body_a.contains("alias=\"two\""));

        let body_b = b.encode().unwrap();
        assert!(body_b.contains("alias=\"two\""));
        assert!(!body_b.contains("alias=\"one\""));
    }

    #[tokio::test]
    async fn test_device_reported_error_fails_scrape() {
        let mut envelope = Envelope::default();
        envelope.system.insert(
            "get_sysinfo".to_string(),
            json!({"err_code": -1, "error_msg": "module not support"}),
        );
        let addr = flaky_device(envelope.encode().unwrap(), 0).await;

        let cache = CollectorCache::new();
        let collector = cache.collector_for(&addr.to_string()).await.unwrap();
        let err = collector.update(&test_transport()).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::Core(CoreError::Device(DeviceError::Reported { .. }))
        ));
    }
}
