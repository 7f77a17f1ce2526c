//! Telemetry ingestion: fetch, decode, convert, diff and render.
//!
//! One cycle of the pipeline:
//!
//! 1. Render the endpoint URL for the current gateway.
//! 2. GET it into a fixed buffer; any transport failure aborts the cycle.
//! 3. Decode the body; a malformed body aborts the cycle with no draws.
//! 4. For each field carrying a numeric `v`: convert km to miles where
//!    needed, compare with the current value, and only on change call the
//!    render engine. The safety margin goes first and is stored at once so a
//!    payload that switches layouts never draws cells the switch would wipe.
//! 5. Sync the new battery, speed and distance into the [`MetricStore`].
//!
//! Missing fields are not errors; they simply leave that metric unchanged.
//!
//! # Payload Shape
//!
//! ```json
//! { "vba": { "v": 90 }, "vsp": { "v": 50 }, "vsmg": { "v": 20 }, "vdi": { "v": 5 } }
//! ```
//!
//! Extra keys at either level are ignored. Fractional readings are truncated.
//! A field of any other shape is treated as missing.

use core::fmt;
use core::net::Ipv4Addr;

use log::{debug, trace};
use serde::Deserialize;
use serde::de::{DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};

use crate::config::network::{API_PORT, BODY_CAPACITY};
use crate::metrics::{Metric, MetricStore};
use crate::net::{Transport, TransportError, endpoint_url};
use crate::render::{DisplayMode, Redraw, RenderEngine};
use crate::surface::Surface;
use crate::thresholds::km_to_miles;

// =============================================================================
// Errors
// =============================================================================

/// Why a fetch cycle was abandoned. None of these are fatal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetchError {
    /// The link has no gateway address to send the request to.
    NoGateway,
    /// The GET failed or returned a non-success status.
    Transport(TransportError),
    /// The body is not a JSON object of the expected shape.
    Decode,
}

impl fmt::Display for FetchError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::NoGateway => f.write_str("no gateway address"),
            Self::Transport(err) => write!(f, "transport: {err}"),
            Self::Decode => f.write_str("malformed response body"),
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self { Self::Transport(err) }
}

// =============================================================================
// Payload
// =============================================================================

/// Body must be a JSON object; its members are read per key.
#[derive(Deserialize)]
struct Envelope {}

/// One field object; only the numeric `v` is used.
#[derive(Deserialize)]
struct Field {
    #[serde(default)]
    v: Option<f32>,
}

/// Reads the field object under one key and skips every other member.
struct KeySeed(&'static str);

impl<'de> DeserializeSeed<'de> for KeySeed {
    type Value = Option<f32>;

    fn deserialize<D>(
        self,
        deserializer: D,
    ) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for KeySeed {
    type Value = Option<f32>;

    fn expecting(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "an object with a `{}` field", self.0)
    }

    fn visit_map<A>(
        self,
        mut map: A,
    ) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut reading = None;
        while let Some(key) = map.next_key::<&str>()? {
            if key == self.0 {
                reading = map.next_value::<Field>()?.v;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(reading)
    }
}

/// Decoded response body.
///
/// A field whose value is not an object, or whose `v` is missing, `null` or
/// not a number, reads as absent without failing its siblings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Payload {
    /// Indexed by `Metric as usize`.
    readings: [Option<f32>; 4],
}

impl Payload {
    /// Decode a response body.
    ///
    /// Only a body that is not a JSON object fails.
    pub fn decode(body: &[u8]) -> Result<Self, FetchError> {
        serde_json_core::from_slice::<Envelope>(body).map_err(|_| FetchError::Decode)?;

        let mut payload = Self::default();
        for metric in Metric::ALL {
            let mut de = serde_json_core::de::Deserializer::new(body, None);
            match KeySeed(metric.code()).deserialize(&mut de) {
                Ok(reading) => payload.readings[metric as usize] = reading,
                Err(err) => trace!("{} skipped: {}", metric.code(), err),
            }
        }
        Ok(payload)
    }

    /// Raw reading for `metric` as the integer the API meant, if present.
    pub fn raw(
        &self,
        metric: Metric,
    ) -> Option<i32> {
        self.readings[metric as usize].map(|v| v as i32)
    }

    /// Reading for `metric` in display units.
    pub fn displayed(
        &self,
        metric: Metric,
    ) -> Option<i32> {
        self.raw(metric)
            .map(|raw| if metric.is_metric_distance() { km_to_miles(raw) } else { raw })
    }
}

// =============================================================================
// Cycle Report
// =============================================================================

/// What one ingested payload changed.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Bit `i` set if `Metric::ALL[i]` changed.
    changed: u8,
    /// Combined screen writes.
    pub redraw: Redraw,
}

impl CycleReport {
    #[inline]
    pub const fn changed(
        &self,
        metric: Metric,
    ) -> bool {
        self.changed & (1 << metric as u8) != 0
    }

    /// Whether any field changed.
    #[inline]
    pub const fn any_changed(&self) -> bool { self.changed != 0 }

    fn mark(
        &mut self,
        metric: Metric,
        redraw: Redraw,
    ) {
        self.changed |= 1 << metric as u8;
        self.redraw = self.redraw.merge(redraw);
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// The ingestion pipeline: owns the render engine and the metric store.
///
/// The store is the single source of "what is on screen"; the engine only
/// ever sees explicit (old, new) pairs taken from it.
pub struct Dashboard<S> {
    engine: RenderEngine<S>,
    store: MetricStore,
    port: u16,
    body: [u8; BODY_CAPACITY],
}

impl<S> Dashboard<S>
where
    S: Surface,
{
    pub const fn new(surface: S) -> Self {
        Self {
            engine: RenderEngine::new(surface),
            store: MetricStore::new(),
            port: API_PORT,
            body: [0; BODY_CAPACITY],
        }
    }

    /// Talk to the API on `port` instead of the default.
    #[must_use]
    pub fn with_port(
        mut self,
        port: u16,
    ) -> Self {
        self.port = port;
        self
    }

    #[inline]
    pub const fn port(&self) -> u16 { self.port }

    #[inline]
    pub const fn store(&self) -> &MetricStore { &self.store }

    #[inline]
    pub const fn engine(&self) -> &RenderEngine<S> { &self.engine }

    #[inline]
    pub fn engine_mut(&mut self) -> &mut RenderEngine<S> { &mut self.engine }

    #[inline]
    pub const fn mode(&self) -> DisplayMode { self.engine.mode() }

    /// Full-screen clear and repaint of the stored values.
    pub fn clear_and_initialize(&mut self) -> Redraw { self.engine.clear_and_initialize(&self.store) }

    /// Run one fetch cycle against the telemetry endpoint on `gateway`.
    ///
    /// On error nothing has been drawn and the store is untouched.
    pub fn fetch_values<T>(
        &mut self,
        transport: &mut T,
        gateway: Option<Ipv4Addr>,
    ) -> Result<CycleReport, FetchError>
    where
        T: Transport + ?Sized,
    {
        let gateway = gateway.ok_or(FetchError::NoGateway)?;
        let url = endpoint_url(gateway, self.port);
        trace!("GET {}", url.as_str());

        let len = transport.get(&url, &mut self.body)?;
        let len = len.min(self.body.len());
        let payload = Payload::decode(&self.body[..len])?;
        Ok(self.apply(&payload))
    }

    /// Decode `body` and apply it. Exposed for replaying captured payloads.
    pub fn ingest(
        &mut self,
        body: &[u8],
    ) -> Result<CycleReport, FetchError> {
        let payload = Payload::decode(body)?;
        Ok(self.apply(&payload))
    }

    /// Diff every present field against the store, render the changes and
    /// write them back.
    pub fn apply(
        &mut self,
        payload: &Payload,
    ) -> CycleReport {
        let mut report = CycleReport::default();
        // Displayed values settle here and reach the store in one sync at the end
        let mut current = self.store;

        for metric in Metric::INGEST_ORDER {
            let Some(new) = payload.displayed(metric) else {
                continue;
            };
            let old = current.get(metric);
            if new == old {
                continue;
            }

            debug!("{:?} {} -> {}", metric, old, new);
            let redraw = match metric {
                Metric::Battery => self.engine.update_battery(old, new),
                Metric::Speed => self.engine.update_speed(old, new),
                Metric::Distance => self.engine.update_distance(old, new),
                Metric::SafetyMargin => {
                    let redraw = self.engine.update_safety_margin(old, new, &self.store);
                    self.store.set(Metric::SafetyMargin, new);
                    redraw
                }
            };
            current.set(metric, new);
            report.mark(metric, redraw);
        }

        self.store
            .set_current_values(current.battery(), current.speed(), current.distance());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{ALERT_COLOR, GREEN, TEXT_COLOR};
    use crate::surface::recording::RecordingSurface;

    const FIRST: &[u8] = br#"{"vba":{"v":90},"vsp":{"v":50},"vsmg":{"v":20},"vdi":{"v":5}}"#;

    fn dashboard() -> Dashboard<RecordingSurface> { Dashboard::new(RecordingSurface::new()) }

    struct CannedTransport {
        status: Result<&'static [u8], TransportError>,
        last_url: Option<std::string::String>,
    }

    impl Transport for CannedTransport {
        fn get(
            &mut self,
            url: &str,
            body: &mut [u8],
        ) -> Result<usize, TransportError> {
            self.last_url = Some(url.into());
            let bytes = self.status?;
            if bytes.len() > body.len() {
                return Err(TransportError::Overflow);
            }
            body[..bytes.len()].copy_from_slice(bytes);
            Ok(bytes.len())
        }
    }

    #[test]
    fn test_decode_full_payload() {
        let payload = Payload::decode(FIRST).unwrap();
        assert_eq!(payload.raw(Metric::Battery), Some(90));
        assert_eq!(payload.displayed(Metric::Speed), Some(31));
        assert_eq!(payload.displayed(Metric::SafetyMargin), Some(20));
        assert_eq!(payload.displayed(Metric::Distance), Some(3));
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let body = br#"{"vba":{"v":70,"u":"%","ts":123},"other":{"v":1},"vsp":{"v":100}}"#;
        let payload = Payload::decode(body).unwrap();
        assert_eq!(payload.raw(Metric::Battery), Some(70));
        assert_eq!(payload.displayed(Metric::Speed), Some(62));
        assert_eq!(payload.raw(Metric::SafetyMargin), None);
        assert_eq!(payload.raw(Metric::Distance), None);
    }

    #[test]
    fn test_decode_truncates_fractional_readings() {
        let payload = Payload::decode(br#"{"vba":{"v":87.9}}"#).unwrap();
        assert_eq!(payload.raw(Metric::Battery), Some(87));
    }

    #[test]
    fn test_field_without_value_is_skipped() {
        let payload = Payload::decode(br#"{"vba":{},"vsp":{"v":null}}"#).unwrap();
        assert_eq!(payload.raw(Metric::Battery), None);
        assert_eq!(payload.raw(Metric::Speed), None);
    }

    #[test]
    fn test_non_object_field_does_not_fail_siblings() {
        let payload = Payload::decode(br#"{"vsp":"n/a","vba":{"v":90}}"#).unwrap();
        assert_eq!(payload.raw(Metric::Battery), Some(90));
        assert_eq!(payload.raw(Metric::Speed), None);

        let payload = Payload::decode(br#"{"vdi":[1,2],"vsmg":7,"vsp":{"v":100}}"#).unwrap();
        assert_eq!(payload.displayed(Metric::Speed), Some(62));
        assert_eq!(payload.raw(Metric::Distance), None);
        assert_eq!(payload.raw(Metric::SafetyMargin), None);
    }

    #[test]
    fn test_non_numeric_value_does_not_fail_siblings() {
        let payload = Payload::decode(br#"{"vba":{"v":"90"},"vsp":{"v":100}}"#).unwrap();
        assert_eq!(payload.raw(Metric::Battery), None);
        assert_eq!(payload.displayed(Metric::Speed), Some(62));

        let payload = Payload::decode(br#"{"vsmg":{"v":true},"vdi":{"v":{"km":8}},"vba":{"v":40}}"#).unwrap();
        assert_eq!(payload.raw(Metric::SafetyMargin), None);
        assert_eq!(payload.raw(Metric::Distance), None);
        assert_eq!(payload.raw(Metric::Battery), Some(40));
    }

    #[test]
    fn test_ingest_applies_well_formed_fields_next_to_bad_ones() {
        let mut dash = dashboard();
        let report = dash.ingest(br#"{"vsp":"n/a","vba":{"v":90},"vdi":{"v":"x"}}"#).unwrap();

        assert!(report.changed(Metric::Battery));
        assert!(!report.changed(Metric::Speed));
        assert!(!report.changed(Metric::Distance));
        assert_eq!(dash.store().battery(), 90);
        assert_eq!(dash.store().speed(), 22);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(Payload::decode(b"<html>").unwrap_err(), FetchError::Decode);
        assert_eq!(Payload::decode(br#"{"vba":{"v":9"#).unwrap_err(), FetchError::Decode);
        assert_eq!(Payload::decode(b"").unwrap_err(), FetchError::Decode);
    }

    #[test]
    fn test_first_cycle_redraws_against_sentinel() {
        let mut dash = dashboard();
        let report = dash.ingest(FIRST).unwrap();

        assert!(report.changed(Metric::Battery));
        assert!(report.changed(Metric::Speed));
        assert!(report.changed(Metric::SafetyMargin));
        assert!(report.changed(Metric::Distance));
        assert_eq!(dash.mode(), DisplayMode::Normal);
        // 90 vs 22, 31 vs 22, 03 vs 22: every column differs
        assert_eq!(report.redraw.cells, 6);
        assert!(!report.redraw.full_screen);

        let battery: Vec<&str> = dash.engine().surface().texts_in(GREEN).into_iter().map(|(t, _)| t).collect();
        assert_eq!(battery, vec!["9", "0"]);

        let store = dash.store();
        assert_eq!((store.battery(), store.speed(), store.distance()), (90, 31, 3));
        assert_eq!(store.safety_margin(), 20);
    }

    #[test]
    fn test_identical_payload_is_idempotent() {
        let mut dash = dashboard();
        dash.ingest(FIRST).unwrap();
        dash.engine_mut().surface_mut().take();

        let report = dash.ingest(FIRST).unwrap();
        assert!(!report.any_changed());
        assert!(report.redraw.is_empty());
        assert!(dash.engine().surface().ops.is_empty());
    }

    #[test]
    fn test_alert_suppresses_metrics_in_same_payload() {
        let mut dash = dashboard();
        dash.ingest(FIRST).unwrap();
        dash.engine_mut().surface_mut().take();

        let body = br#"{"vba":{"v":75},"vsp":{"v":80},"vsmg":{"v":10},"vdi":{"v":9}}"#;
        let report = dash.ingest(body).unwrap();

        assert_eq!(dash.mode(), DisplayMode::Alert);
        assert!(report.redraw.full_screen);
        let surface = dash.engine().surface();
        assert_eq!(surface.fills(), 1);
        let shown: Vec<&str> = surface.texts_in(TEXT_COLOR).into_iter().map(|(t, _)| t).collect();
        assert_eq!(shown, vec!["SAFETY MARGIN", "1", "0", "%"]);
        assert_eq!(surface.texts_in(ALERT_COLOR).len(), 2, "only percentage erases");

        // Suppressed values still land in the store for the exit repaint
        assert_eq!(dash.store().battery(), 75);
        assert_eq!(dash.store().speed(), 50);
        assert_eq!(dash.store().distance(), 6);
    }

    #[test]
    fn test_exit_alert_shows_values_received_during_alert() {
        let mut dash = dashboard();
        dash.ingest(br#"{"vsmg":{"v":5}}"#).unwrap();
        dash.ingest(br#"{"vba":{"v":95},"vsp":{"v":100}}"#).unwrap();
        dash.engine_mut().surface_mut().take();

        let report = dash.ingest(br#"{"vsmg":{"v":50}}"#).unwrap();
        assert_eq!(dash.mode(), DisplayMode::Normal);
        assert!(report.redraw.full_screen);

        let battery: Vec<&str> = dash.engine().surface().texts_in(GREEN).into_iter().map(|(t, _)| t).collect();
        assert_eq!(battery, vec!["9", "5"], "battery repainted with the value hidden by the alert");
    }

    #[test]
    fn test_missing_fields_leave_store_untouched() {
        let mut dash = dashboard();
        let report = dash.ingest(br#"{"vba":{"v":50}}"#).unwrap();
        assert!(report.changed(Metric::Battery));
        assert!(!report.changed(Metric::Speed));
        assert_eq!(dash.store().speed(), 22);
        assert_eq!(dash.store().distance(), 22);
    }

    #[test]
    fn test_speed_compared_after_conversion() {
        let mut dash = dashboard();
        // 35 km/h is 21.7 -> 22 mph, equal to the sentinel: nothing to draw
        let report = dash.ingest(br#"{"vsp":{"v":35}}"#).unwrap();
        assert!(!report.changed(Metric::Speed));
        assert!(dash.engine().surface().ops.is_empty());
    }

    #[test]
    fn test_decode_failure_draws_nothing() {
        let mut dash = dashboard();
        assert_eq!(dash.ingest(b"not json").unwrap_err(), FetchError::Decode);
        assert!(dash.engine().surface().ops.is_empty());
        assert_eq!(*dash.store(), MetricStore::new());
    }

    #[test]
    fn test_fetch_values_uses_gateway_url() {
        let mut dash = dashboard();
        let mut transport = CannedTransport {
            status: Ok(FIRST),
            last_url: None,
        };
        let report = dash.fetch_values(&mut transport, Some(Ipv4Addr::new(10, 0, 0, 1))).unwrap();

        assert!(report.any_changed());
        let url = transport.last_url.unwrap();
        assert!(url.starts_with("http://10.0.0.1:8080/api/values?"));
    }

    #[test]
    fn test_fetch_values_honours_port_override() {
        let mut dash = dashboard().with_port(18080);
        let mut transport = CannedTransport {
            status: Ok(FIRST),
            last_url: None,
        };
        dash.fetch_values(&mut transport, Some(Ipv4Addr::new(10, 0, 0, 1))).unwrap();
        assert!(transport.last_url.unwrap().starts_with("http://10.0.0.1:18080/"));
    }

    #[test]
    fn test_fetch_values_aborts_on_transport_error() {
        let mut dash = dashboard();
        let mut transport = CannedTransport {
            status: Err(TransportError::Status(500)),
            last_url: None,
        };
        let err = dash.fetch_values(&mut transport, Some(Ipv4Addr::LOCALHOST)).unwrap_err();
        assert_eq!(err, FetchError::Transport(TransportError::Status(500)));
        assert!(dash.engine().surface().ops.is_empty());
    }

    #[test]
    fn test_fetch_values_without_gateway() {
        let mut dash = dashboard();
        let mut transport = CannedTransport {
            status: Ok(FIRST),
            last_url: None,
        };
        assert_eq!(dash.fetch_values(&mut transport, None).unwrap_err(), FetchError::NoGateway);
        assert!(transport.last_url.is_none());
    }
}
