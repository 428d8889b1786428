//! Property-based tests for argument resolution and endpoint validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use proptest::prelude::*;

use anywhere_common::GatewayConfig;
use mcp_anywhere::cli::{ResolveError, resolve_from};
use mcp_anywhere::domain::{Endpoint, HandlerError, ResolvedAction};

fn config() -> GatewayConfig {
    GatewayConfig {
        host: "0.0.0.0".to_string(),
        port: 8000,
        data_dir: PathBuf::from("/srv/anywhere"),
    }
}

fn resolve(args: &[String]) -> Result<ResolvedAction, ResolveError> {
    let argv = std::iter::once("mcp-anywhere".to_string()).chain(args.iter().cloned());
    resolve_from(argv, &config())
}

// ============================================================================
// resolve_from() property tests
// ============================================================================

proptest! {
    /// Explicit host and port always land in the endpoint unchanged.
    #[test]
    fn prop_serve_options_round_trip(
        host in "[a-z0-9][a-z0-9.]{0,19}",
        port in any::<i64>(),
        stdio in any::<bool>(),
    ) {
        let transport = if stdio { "stdio" } else { "http" };
        let args = vec![
            "serve".to_string(),
            transport.to_string(),
            "--host".to_string(),
            host.clone(),
            format!("--port={port}"),
        ];

        let action = resolve(&args).expect("valid serve invocation");

        let endpoint = Endpoint::new(host, port);
        let expected = if stdio {
            ResolvedAction::ServeStdio(endpoint)
        } else {
            ResolvedAction::ServeHttp(endpoint)
        };
        prop_assert_eq!(action, expected);
    }

    /// Omitted options fall back to configuration.
    #[test]
    fn prop_missing_options_use_config(give_host in any::<bool>(), give_port in any::<bool>()) {
        let mut args = vec!["serve".to_string(), "http".to_string()];
        if give_host {
            args.extend(["--host".to_string(), "example.test".to_string()]);
        }
        if give_port {
            args.push("--port=9".to_string());
        }

        let action = resolve(&args).expect("valid serve invocation");

        let expected = Endpoint::new(
            if give_host { "example.test" } else { "0.0.0.0" },
            if give_port { 9 } else { 8000 },
        );
        prop_assert_eq!(action, ResolvedAction::ServeHttp(expected));
    }

    /// Unknown top-level words never resolve.
    #[test]
    fn prop_unknown_commands_rejected(word in "[a-z]{1,12}") {
        prop_assume!(!["serve", "connect", "reset", "help"].contains(&word.as_str()));
        let result = resolve(&[word.clone()]);
        prop_assert!(matches!(result, Err(ResolveError::Usage(_))), "accepted {}", word);
    }
}

// ============================================================================
// Endpoint::validated_port() property tests
// ============================================================================

proptest! {
    /// Every port in 1..=65535 is accepted as itself.
    #[test]
    fn prop_valid_ports_accepted(port in 1i64..=65535) {
        let checked = Endpoint::new("h", port).validated_port().expect("in range");
        prop_assert_eq!(i64::from(checked), port);
    }

    /// Everything outside 1..=65535 is a validation error.
    #[test]
    fn prop_out_of_range_ports_rejected(
        port in prop_oneof![i64::MIN..=0i64, 65536i64..=i64::MAX],
    ) {
        let err = Endpoint::new("h", port).validated_port().expect_err("out of range");
        prop_assert!(matches!(err, HandlerError::Validation(_)));
        prop_assert!(err.is_recoverable());
    }
}

#[test]
fn test_reset_flag_maps_to_skip_confirm() {
    assert_eq!(
        resolve(&["reset".to_string()]).expect("reset"),
        ResolvedAction::Reset {
            skip_confirm: false
        }
    );
    assert_eq!(
        resolve(&["reset".to_string(), "--confirm".to_string()]).expect("reset --confirm"),
        ResolvedAction::Reset { skip_confirm: true }
    );
}
