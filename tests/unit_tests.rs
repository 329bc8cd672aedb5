use clap::Parser;
use rev_verify::config::parse_duration_to_secs;
use rev_verify::{RNodeOpts, ReferenceOpts};
use std::path::PathBuf;

#[derive(Parser)]
struct TestCli {
    #[command(flatten)]
    reference: ReferenceOpts,

    #[command(flatten)]
    rnode: RNodeOpts,
}

#[test]
fn test_reference_opts_creation() {
    let opts = ReferenceOpts {
        wallets_file: PathBuf::from("/tmp/wallets.txt"),
        snapshot_url: "https://example.com/wallets.txt".to_string(),
    };

    let loader = opts.loader();
    assert_eq!(loader.cache_path(), PathBuf::from("/tmp/wallets.txt"));
    assert_eq!(
        loader.source().display_name(),
        "https://example.com/wallets.txt"
    );
}

#[test]
fn test_rnode_opts_creation() {
    let opts = RNodeOpts {
        rnode_endpoint: "http://localhost:40403".to_string(),
        request_timeout: "30s".to_string(),
    };

    assert_eq!(opts.rnode_endpoint, "http://localhost:40403");
    assert!(opts.transport().is_ok());
}

#[test]
fn test_invalid_timeout_rejected() {
    let opts = RNodeOpts {
        rnode_endpoint: "http://localhost:40403".to_string(),
        request_timeout: "soon".to_string(),
    };

    assert!(opts.transport().is_err());
}

#[test]
fn test_defaults() {
    let cli = TestCli::parse_from(["test"]);

    assert_eq!(cli.reference.wallets_file, PathBuf::from("wallets.txt"));
    assert!(cli
        .reference
        .snapshot_url
        .ends_with("wallets_REV_BLOCK-908300.txt"));
    assert_eq!(
        cli.rnode.rnode_endpoint,
        "https://observer-eu.services.mainnet.rchain.coop"
    );
    assert_eq!(parse_duration_to_secs(&cli.rnode.request_timeout).unwrap(), 60);
}

#[test]
fn test_flags_override_defaults() {
    let cli = TestCli::parse_from([
        "test",
        "--wallets-file",
        "cache/w.txt",
        "--snapshot-url",
        "/data/snapshot.txt",
        "--rnode-endpoint",
        "http://node:40403",
        "--request-timeout",
        "2m",
    ]);

    assert_eq!(cli.reference.wallets_file, PathBuf::from("cache/w.txt"));
    assert_eq!(cli.reference.snapshot_url, "/data/snapshot.txt");
    assert_eq!(cli.rnode.rnode_endpoint, "http://node:40403");
    assert_eq!(parse_duration_to_secs(&cli.rnode.request_timeout).unwrap(), 120);
}
