//! ## aegis-telemetry::metrics
//! **Prometheus recorder for the simulation session**
//!
//! Counters and histograms fed by the tick loop and the background
//! reroute path. Export goes through the text encoder so a frontend or
//! the CLI can dump the registry on session end.

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: prometheus::Registry,
    pub ticks: prometheus::Counter,
    pub reroutes: prometheus::Counter,
    pub races: prometheus::Counter,
    pub reroute_latency: prometheus::Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let ticks = Counter::new("aegis_ticks_total", "Total simulation ticks").unwrap();
        let reroutes =
            Counter::new("aegis_reroutes_total", "Total applied reroute splices").unwrap();
        let races = Counter::new("aegis_races_total", "Total algorithm races replayed").unwrap();

        let reroute_latency = Histogram::with_opts(
            HistogramOpts::new(
                "aegis_reroute_latency_ms",
                "Background reroute fetch latency",
            )
            .buckets(vec![50.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0]),
        )
        .unwrap();

        registry.register(Box::new(ticks.clone())).unwrap();
        registry.register(Box::new(reroutes.clone())).unwrap();
        registry.register(Box::new(races.clone())).unwrap();
        registry.register(Box::new(reroute_latency.clone())).unwrap();

        Self {
            registry,
            ticks,
            reroutes,
            races,
            reroute_latency,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }

    pub fn inc_ticks(&self) {
        self.ticks.inc();
    }
}
