//! Semantic validation tests for nullkit-config.
// crates/nullkit-config/tests/boundary_validation.rs
// =============================================================================
// Module: Config Boundary Validation Tests
// Description: Validate semantic field checks after parsing.
// Purpose: Ensure a config that loads is a config every factory accepts.
// =============================================================================

use nullkit_config::ConfigError;
use nullkit_config::NullkitConfig;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<NullkitConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn cleartext_endpoint_requires_opt_in() -> TestResult {
    let document = "[http]\nendpoint = \"http://127.0.0.1:8080\"\n";
    assert_invalid(NullkitConfig::from_toml_str(document), "http.endpoint")?;

    let opted_in = "[http]\nendpoint = \"http://127.0.0.1:8080\"\nallow_http = true\n";
    NullkitConfig::from_toml_str(opted_in).map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn unsupported_scheme_is_rejected() -> TestResult {
    let document = "[http]\nendpoint = \"ftp://example.com\"\n";
    assert_invalid(NullkitConfig::from_toml_str(document), "unsupported scheme")
}

#[test]
fn zero_timeout_is_rejected() -> TestResult {
    let document = "[http]\ntimeout_ms = 0\n";
    assert_invalid(NullkitConfig::from_toml_str(document), "http.timeout_ms")
}

#[test]
fn zero_response_cap_is_rejected() -> TestResult {
    let document = "[http]\nmax_response_bytes = 0\n";
    assert_invalid(NullkitConfig::from_toml_str(document), "http.max_response_bytes")
}

#[test]
fn empty_store_root_is_rejected() -> TestResult {
    let document = "[store]\nroot = \"\"\n";
    assert_invalid(NullkitConfig::from_toml_str(document), "store.root")
}

#[test]
fn unknown_fields_are_rejected() -> TestResult {
    let document = "[http]\nendpoitn = \"https://example.com\"\n";
    assert_invalid(NullkitConfig::from_toml_str(document), "config parse error")
}

#[test]
fn null_responses_parse_from_toml() -> TestResult {
    let document = concat!(
        "[http.responses.get]\n",
        "kind = \"sequence\"\n",
        "values = [{ status = 500 }, { status = 200 }]\n",
        "on_exhausted = \"fail\"\n",
    );
    let config = NullkitConfig::from_toml_str(document).map_err(|err| err.to_string())?;
    let responses = config.http.responses.ok_or("expected parsed responses")?;
    if responses.contains_key("get") {
        Ok(())
    } else {
        Err("expected a response configured for get".to_string())
    }
}
