//! gattfs host daemon.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  line in ──▶ ATT write ─┐                                │
//! │                         ▼                                │
//! │     GattCharacteristic ─▶ FileTransferService             │
//! │        (one central)      DownloadCache · Uploads        │
//! │                         │  DirectoryStore · LogSink      │
//! │  line out ◀── ATT read ─┘                                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! By default a single simulated central speaks over stdin/stdout. With
//! `--listen <addr>` each TCP connection becomes a central in turn,
//! served one after another. Logs go to stderr (`RUST_LOG`, default
//! `info`).

use std::io;
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use gattfs::adapters::log_sink::LogEventSink;
use gattfs::adapters::stream;
use gattfs::protocol::transport::{AttStatus, Responder};
use gattfs::{CentralId, DirectoryStore, FileTransferService, GattCharacteristic, ServerConfig};

const STDIO_CENTRAL: CentralId = CentralId(1);

// ── Command line ──────────────────────────────────────────────

#[derive(Parser)]
#[command(version, about = "File transfer over a single GATT characteristic")]
struct Args {
    /// JSON config file (defaults to $GATTFS_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Working directory, overriding the config
    #[arg(long)]
    root: Option<PathBuf>,

    /// Serve line-framed commands over TCP instead of stdio
    #[arg(long, value_name = "ADDR")]
    listen: Option<SocketAddr>,
}

// ── ATT acknowledgements ──────────────────────────────────────

/// Stdio and TCP have no ATT layer; acknowledgements only show up in the log.
struct LogResponder;

impl Responder for LogResponder {
    fn respond(&mut self, status: AttStatus) {
        if status == AttStatus::Success {
            debug!("att: ok");
        } else {
            warn!("att: 0x{:02X} ({:?})", status.code(), status);
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ServerConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(root) = args.root {
        config.root_dir = root;
    }

    info!("gattfs v{} ({})", env!("CARGO_PKG_VERSION"), config.device_name);
    info!(
        "service {} / characteristic {}",
        config.service_uuid, config.characteristic_uuid
    );
    info!(
        "serving {} (chunk {} units)",
        config.root_dir.display(),
        config.chunk_size
    );

    let service = FileTransferService::with_chunk_size(
        DirectoryStore::new(&config.root_dir),
        LogEventSink::new(),
        config.chunk_size,
    );
    let gatt = GattCharacteristic::with_max_attribute_len(service, config.max_attribute_len);
    let mut ack = LogResponder;

    if let Some(addr) = args.listen {
        let listener = TcpListener::bind(addr).with_context(|| format!("binding {}", addr))?;
        info!("listening on {}", addr);
        stream::serve_tcp(&gatt, &listener, &mut ack).context("accepting connections")?;
        return Ok(());
    }

    if !gatt.connect(STDIO_CENTRAL) {
        anyhow::bail!("stdio central could not connect");
    }
    let served = stream::serve_lines(
        &gatt,
        STDIO_CENTRAL,
        io::stdin().lock(),
        io::stdout().lock(),
        &mut ack,
    )
    .context("serving stdio")?;
    gatt.disconnect(STDIO_CENTRAL);

    info!("stdin closed after {} commands, exiting", served);
    Ok(())
}
