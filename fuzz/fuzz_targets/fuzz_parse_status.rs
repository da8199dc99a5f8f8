#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a response body: parsing may fail but must never panic
    let body = String::from_utf8_lossy(data);
    if let Ok(status) = chargewise::charger::ChargerStatus::from_json_str(&body) {
        let _ = status.car_state.description();
    }
});
