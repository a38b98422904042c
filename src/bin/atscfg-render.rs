// Copyright (c) 2025 - Cowboy AI, Inc.
//! ATS Config Renderer
//!
//! Renders one config file for the server described by a snapshot document
//! and writes it to stdout. Logs go to stderr.
//!
//! Run with: cargo run --bin atscfg-render
//!
//! Environment:
//! 1. `ATSCFG_SNAPSHOT` - path to the snapshot JSON (required)
//! 2. `ATSCFG_FILE` - config file to render (default: ip_allow.config)
//! 3. `ATSCFG_TOOL` - tool name stamped into the header (default: atscfg-render)

use anyhow::{Context, Result};
use cdn_atscfg::atscfg::header_comment_text;
use cdn_atscfg::{ConfigFile, ServerSnapshot};
use chrono::Utc;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Configuration for a render run
#[derive(Debug, Clone)]
struct RenderConfig {
    /// Snapshot document to render from
    snapshot_path: PathBuf,
    /// Which file to render
    file: ConfigFile,
    /// Tool name for the header comment
    tool_name: String,
}

impl RenderConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let snapshot_path = std::env::var("ATSCFG_SNAPSHOT")
            .map(PathBuf::from)
            .context("ATSCFG_SNAPSHOT not set")?;

        let file = std::env::var("ATSCFG_FILE")
            .unwrap_or_else(|_| ConfigFile::IpAllow.file_name().to_string())
            .parse::<ConfigFile>()
            .context("Invalid ATSCFG_FILE")?;

        let tool_name =
            std::env::var("ATSCFG_TOOL").unwrap_or_else(|_| "atscfg-render".to_string());

        Ok(Self {
            snapshot_path,
            file,
            tool_name,
        })
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = RenderConfig::from_env()?;
    info!("📋 Configuration loaded:");
    info!("  - Snapshot: {}", config.snapshot_path.display());
    info!("  - File: {}", config.file);
    info!("  - Tool: {}", config.tool_name);

    let json = std::fs::read_to_string(&config.snapshot_path).with_context(|| {
        format!(
            "Failed to read snapshot {}",
            config.snapshot_path.display()
        )
    })?;
    let snapshot = ServerSnapshot::from_json(&json).context("Failed to parse snapshot")?;

    let hdr = header_comment_text(
        snapshot.server.display_name(),
        &config.tool_name,
        Utc::now(),
    );

    let cfg = match snapshot.render(config.file, &hdr) {
        Ok(cfg) => cfg,
        Err(err) => {
            for warning in &err.warnings {
                warn!("{}", warning);
            }
            error!("❌ Failed to render {}: {}", config.file, err);
            return Err(err).with_context(|| format!("Failed to render {}", config.file));
        }
    };

    for warning in &cfg.warnings {
        warn!("{}", warning);
    }

    std::io::stdout()
        .write_all(cfg.text.as_bytes())
        .context("Failed to write config to stdout")?;

    info!(
        "✅ Rendered {} for {} ({} warnings)",
        config.file,
        snapshot.server.display_name(),
        cfg.warnings.len()
    );
    Ok(())
}
