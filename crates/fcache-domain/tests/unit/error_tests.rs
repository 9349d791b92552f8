//! Unit tests for domain error types

use fcache_domain::Error;

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("Invalid input provided");
    assert!(error.is_invalid_argument());
    match error {
        Error::InvalidArgument { message } => assert_eq!(message, "Invalid input provided"),
        _ => panic!("Expected InvalidArgument error"),
    }
}

#[test]
fn test_cache_error() {
    let error = Error::cache("SCAN cursor lost");
    assert!(!error.is_invalid_argument());
    assert_eq!(error.to_string(), "Cache error: SCAN cursor lost");
}

#[test]
fn test_infrastructure_error_with_source() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error = Error::infrastructure_with_source("Redis GET failed", io);
    match &error {
        Error::Infrastructure { message, source } => {
            assert_eq!(message, "Redis GET failed");
            assert!(source.is_some());
        }
        _ => panic!("Expected Infrastructure error"),
    }
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_configuration_error() {
    let error = Error::configuration("scan batch size cannot be 0");
    assert_eq!(
        error.to_string(),
        "Configuration error: scan batch size cannot be 0"
    );
}

#[test]
fn test_json_error_conversion() {
    let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = parse.into();
    assert!(matches!(error, Error::Json { .. }));
}

#[test]
fn test_io_error_converts() {
    fn read() -> fcache_domain::Result<()> {
        Err::<(), _>(std::io::Error::new(std::io::ErrorKind::NotFound, "fcache.toml"))?;
        Ok(())
    }

    let error = read().unwrap_err();
    assert!(matches!(error, Error::Io { .. }));
    assert_eq!(error.to_string(), "I/O error: fcache.toml");
}
