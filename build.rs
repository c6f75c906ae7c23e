use std::env;

fn main() {
    // Build-time defaults for the telemetry endpoint.
    // Runtime overrides are read by TelemetryConfig::from_env().

    // Version string reported in the on-demand version message
    if let Ok(version) = env::var("LINK_TELEMETRY_VERSION") {
        println!("cargo:rustc-env=LINK_TELEMETRY_VERSION={}", version);
        println!(
            "cargo:warning=Using LINK_TELEMETRY_VERSION from environment: {}",
            version
        );
    } else {
        let pkg_version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
        println!("cargo:rustc-env=LINK_TELEMETRY_VERSION={}", pkg_version);
    }

    // Local log message UDP port (default: 9999)
    if let Ok(port) = env::var("LINK_TELEMETRY_LOG_PORT") {
        println!("cargo:rustc-env=LINK_TELEMETRY_LOG_PORT={}", port);
        println!(
            "cargo:warning=Using LINK_TELEMETRY_LOG_PORT from environment: {}",
            port
        );
    } else {
        println!("cargo:rustc-env=LINK_TELEMETRY_LOG_PORT=9999");
    }

    println!("cargo:rerun-if-env-changed=LINK_TELEMETRY_VERSION");
    println!("cargo:rerun-if-env-changed=LINK_TELEMETRY_LOG_PORT");
}
