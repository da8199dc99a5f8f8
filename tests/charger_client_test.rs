use chargewise::charger::{
    CarState, ChargerClient, HttpResponse, HttpTransport, REQUEST_TIMEOUT,
};
use chargewise::error::{ChargewiseError, Result};
use std::sync::Mutex;
use std::time::Duration;

/// Records every requested URL and answers with a canned reply
struct StubTransport {
    reply: fn() -> Result<HttpResponse>,
    delay: Option<Duration>,
    self_timed: bool,
    requests: Mutex<Vec<String>>,
}

impl StubTransport {
    fn new(reply: fn() -> Result<HttpResponse>) -> Self {
        Self {
            reply,
            delay: None,
            self_timed: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn delayed(reply: fn() -> Result<HttpResponse>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(reply)
        }
    }

    /// A transport that enforces its own per-read limits
    fn self_timed(reply: fn() -> Result<HttpResponse>, delay: Duration) -> Self {
        Self {
            self_timed: true,
            ..Self::delayed(reply, delay)
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpTransport for StubTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.reply)()
    }

    fn enforces_timeouts(&self) -> bool {
        self.self_timed
    }
}

fn client(reply: fn() -> Result<HttpResponse>) -> ChargerClient<StubTransport> {
    ChargerClient::with_transport(StubTransport::new(reply))
}

#[tokio::test]
async fn test_connection_reports_device_type() {
    let c = client(|| Ok(HttpResponse::ok(r#"{"car":"1","typ":"go-eCharger"}"#)));
    let msg = c.test_connection("192.168.1.50").await.unwrap();
    assert_eq!(msg, "Connected to go-eCharger");
    assert_eq!(
        c.transport().requests(),
        vec!["http://192.168.1.50/api/status?filter=car,typ".to_string()]
    );
}

#[tokio::test]
async fn test_connection_without_type_is_generic_success() {
    let c = client(|| Ok(HttpResponse::ok(r#"{"car":"1"}"#)));
    assert_eq!(
        c.test_connection("go-e.local").await.unwrap(),
        "Connected successfully"
    );
}

#[tokio::test]
async fn test_connection_rejects_non_json_body() {
    let c = client(|| Ok(HttpResponse::ok("<html>router login</html>")));
    let err = c.test_connection("192.168.1.1").await.unwrap_err();
    assert!(matches!(err, ChargewiseError::Unexpected { .. }));
}

#[tokio::test]
async fn non_200_status_is_http_error() {
    let c = client(|| Ok(HttpResponse::new(404, "not found")));
    let err = c.get_status("192.168.1.50").await.unwrap_err();
    assert!(matches!(err, ChargewiseError::Http { status: 404 }));
    assert_eq!(err.to_string(), "HTTP error: 404");
}

#[tokio::test]
async fn get_status_requests_all_fields() {
    let c = client(|| {
        Ok(HttpResponse::ok(
            r#"{"car":"2","amp":"16","alw":"true","dwo":"20000","acu":"15"}"#,
        ))
    });
    let status = c.get_status("10.0.0.7").await.unwrap();
    assert_eq!(status.car_state, CarState::Charging);
    assert_eq!(status.current_ampere, Some(15));
    assert_eq!(status.current_limit_ampere, Some(16));
    assert_eq!(status.allow_charging, Some(true));
    assert_eq!(status.energy_limit_wh, Some(20000.0));
    assert_eq!(
        c.transport().requests(),
        vec!["http://10.0.0.7/api/status?filter=car,amp,alw,dwo,acu".to_string()]
    );
}

#[tokio::test]
async fn get_status_missing_alw_keeps_other_fields() {
    let c = client(|| Ok(HttpResponse::ok(r#"{"car":"4","amp":"10","dwo":"5000","acu":"0"}"#)));
    let status = c.get_status("10.0.0.7").await.unwrap();
    assert_eq!(status.allow_charging, None);
    assert_eq!(status.car_state, CarState::Complete);
    assert_eq!(status.current_ampere, Some(0));
    assert_eq!(status.current_limit_ampere, Some(10));
    assert_eq!(status.energy_limit_wh, Some(5000.0));
}

#[tokio::test]
async fn set_current_out_of_range_sends_nothing() {
    for amps in [0, 5, 33, 64] {
        let c = client(|| Ok(HttpResponse::ok(r#"{"amp":"true"}"#)));
        let err = c.set_current_limit("192.168.1.50", amps).await.unwrap_err();
        assert!(matches!(err, ChargewiseError::Validation { .. }), "amps={amps}");
        assert!(!err.is_retryable());
        assert!(c.transport().requests().is_empty());
    }
}

#[tokio::test]
async fn set_current_accepts_bounds() {
    for amps in [6, 32] {
        let c = client(|| Ok(HttpResponse::ok(r#"{"amp":"true"}"#)));
        assert!(c.set_current_limit("192.168.1.50", amps).await.is_ok());
        assert_eq!(
            c.transport().requests(),
            vec![format!("http://192.168.1.50/api/set?amp={amps}")]
        );
    }
}

#[tokio::test]
async fn set_current_success_on_echoed_value() {
    let c = client(|| Ok(HttpResponse::ok(r#"{"amp":"16"}"#)));
    let msg = c.set_current_limit("192.168.1.50", 16).await.unwrap();
    assert_eq!(msg, "Current limit set to 16A");
}

#[tokio::test]
async fn set_current_device_failure() {
    let c = client(|| Ok(HttpResponse::ok(r#"{"amp":"false"}"#)));
    let err = c.set_current_limit("192.168.1.50", 16).await.unwrap_err();
    assert!(matches!(err, ChargewiseError::Device { .. }));
    assert_eq!(err.to_string(), "Device error: Failed to set current: false");

    // A different echoed value is a refusal too
    let c = client(|| Ok(HttpResponse::ok(r#"{"amp":"10"}"#)));
    let err = c.set_current_limit("192.168.1.50", 16).await.unwrap_err();
    assert!(matches!(err, ChargewiseError::Device { .. }));
}

#[tokio::test]
async fn set_energy_limit_truncates_watt_hours() {
    let c = client(|| Ok(HttpResponse::ok(r#"{"dwo":"true"}"#)));
    let msg = c.set_energy_limit("192.168.1.50", 12345.6).await.unwrap();
    assert_eq!(msg, "Energy limit set to 12345 Wh");
    assert_eq!(
        c.transport().requests(),
        vec!["http://192.168.1.50/api/set?dwo=12345".to_string()]
    );
}

#[tokio::test]
async fn set_energy_limit_requires_literal_true() {
    let c = client(|| Ok(HttpResponse::ok(r#"{"dwo":"12345"}"#)));
    let err = c.set_energy_limit("192.168.1.50", 12345.0).await.unwrap_err();
    assert!(matches!(err, ChargewiseError::Device { .. }));

    let c = client(|| Ok(HttpResponse::ok("{}")));
    let err = c.set_energy_limit("192.168.1.50", 12345.0).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Device error: Failed to set energy limit: no value returned"
    );
}

#[tokio::test]
async fn set_energy_limit_rejects_negative_and_non_finite() {
    for wh in [-1.0, f64::NAN, f64::INFINITY] {
        let c = client(|| Ok(HttpResponse::ok(r#"{"dwo":"true"}"#)));
        let err = c.set_energy_limit("192.168.1.50", wh).await.unwrap_err();
        assert!(matches!(err, ChargewiseError::Validation { .. }));
        assert!(c.transport().requests().is_empty());
    }
}

#[tokio::test]
async fn blank_address_never_reaches_transport() {
    let c = client(|| Ok(HttpResponse::ok(r#"{"amp":"true","dwo":"true"}"#)));
    for address in ["", "   "] {
        assert!(matches!(
            c.test_connection(address).await,
            Err(ChargewiseError::EmptyAddress)
        ));
        assert!(matches!(
            c.get_status(address).await,
            Err(ChargewiseError::EmptyAddress)
        ));
        assert!(matches!(
            c.set_current_limit(address, 16).await,
            Err(ChargewiseError::EmptyAddress)
        ));
        assert!(matches!(
            c.set_energy_limit(address, 1000.0).await,
            Err(ChargewiseError::EmptyAddress)
        ));
    }
    assert!(c.transport().requests().is_empty());
}

#[tokio::test]
async fn transport_errors_pass_through() {
    let c = client(|| Err(ChargewiseError::ConnectionRefused));
    let err = c.test_connection("192.168.1.50").await.unwrap_err();
    assert!(matches!(err, ChargewiseError::ConnectionRefused));
    assert!(err.is_retryable());

    let c = client(|| Err(ChargewiseError::network("dns error")));
    let err = c.get_status("nonexistent.local").await.unwrap_err();
    assert_eq!(err.to_string(), "Network error: dns error");
}

#[tokio::test(start_paused = true)]
async fn slow_transport_resolves_as_timeout() {
    let c = ChargerClient::with_transport(StubTransport::delayed(
        || Ok(HttpResponse::ok(r#"{"typ":"go-eCharger"}"#)),
        Duration::from_secs(60),
    ));
    let started = tokio::time::Instant::now();
    let err = c.test_connection("192.168.1.50").await.unwrap_err();
    assert!(matches!(err, ChargewiseError::Timeout));
    assert!(started.elapsed() >= REQUEST_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn slow_but_in_time_transport_succeeds() {
    let c = ChargerClient::with_transport(StubTransport::delayed(
        || Ok(HttpResponse::ok(r#"{"dwo":"true"}"#)),
        Duration::from_millis(4900),
    ));
    assert!(c.set_energy_limit("192.168.1.50", 500.0).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn self_timed_transport_is_not_cut_off_by_overall_bound() {
    let c = ChargerClient::with_transport(StubTransport::self_timed(
        || Ok(HttpResponse::ok(r#"{"typ":"go-eCharger"}"#)),
        Duration::from_secs(8),
    ));
    assert_eq!(
        c.test_connection("192.168.1.50").await.unwrap(),
        "Connected to go-eCharger"
    );
}

#[tokio::test(start_paused = true)]
async fn self_timed_transport_timeout_passes_through() {
    let c = ChargerClient::with_transport(StubTransport::self_timed(
        || Err(ChargewiseError::Timeout),
        Duration::from_secs(5),
    ));
    let err = c.get_status("192.168.1.50").await.unwrap_err();
    assert!(matches!(err, ChargewiseError::Timeout));
}
