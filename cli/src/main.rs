//! csms-admin: maintenance CLI for csms-core
//!
//! ```sh
//! # Validate the configuration
//! csms-admin check
//!
//! # Create or upgrade the schema
//! csms-admin migrate
//!
//! # Out-of-band registration
//! csms-admin register-charge-point CP001
//! csms-admin add-tag 04A2B3C4 --expires 2027-01-01T00:00:00Z
//!
//! # Reserve connector 1 of CP001 for 30 minutes
//! csms-admin reserve CP001 1 04A2B3C4 --minutes 30
//!
//! # Expire overdue reservations once, or keep doing it until Ctrl+C
//! csms-admin expire-reservations --watch
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use csms_core::application::{start_reservation_expiry_task, CoreServices};
use csms_core::domain::{IdTagStatus, OcppTag, RepositoryProvider};
use csms_core::{
    default_config_path, init_database, init_tracing, run_migrations, AppConfig, DatabaseConfig,
    InMemoryRepositoryProvider, SeaOrmRepositoryProvider, ShutdownSignal,
};

#[derive(Parser, Debug)]
#[command(
    name = "csms-admin",
    version,
    about = "Maintenance tasks for the csms-core OCPP 1.6 central system",
    long_about = "Maintenance tasks for the csms-core OCPP 1.6 central system.\n\n\
                  Default config: ~/.config/csms-core/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CSMS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Use a throwaway in-memory store instead of the configured database.
    #[arg(long, global = true)]
    memory: bool,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration file and print the effective settings.
    Check,
    /// Run database migrations.
    Migrate,
    /// Register a charge point so that its BootNotification is accepted.
    RegisterChargePoint { id: String },
    /// Register or replace an id tag.
    AddTag {
        id_tag: String,
        #[arg(long, default_value = "Accepted")]
        status: IdTagStatus,
        /// Expiry date, RFC 3339
        #[arg(long)]
        expires: Option<DateTime<Utc>>,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Reserve a connector (0 = any connector) for an id tag.
    Reserve {
        charge_point_id: String,
        connector_id: u32,
        id_tag: String,
        #[arg(long, default_value_t = 30)]
        minutes: i64,
    },
    /// Mark overdue reservations as expired.
    ExpireReservations {
        /// Keep running on the configured interval until Ctrl+C.
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = AppConfig::load(&config_path)?;
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    info!(path = %config_path.display(), "Configuration loaded");

    if let Command::Check = cli.command {
        println!("Configuration is valid");
        println!("   Config file       : {}", config_path.display());
        println!("   Database          : {}", config.database.url);
        println!("   Log level         : {}", config.logging.level);
        println!("   Heartbeat interval: {}s", config.ocpp.heartbeat_interval_secs);
        println!("   Request timeout   : {}s", config.ocpp.request_timeout_secs);
        return Ok(());
    }

    let repos: Arc<dyn RepositoryProvider> = if cli.memory {
        info!("Using in-memory store");
        Arc::new(InMemoryRepositoryProvider::new())
    } else {
        let db = init_database(&DatabaseConfig::new(config.database.url.clone())).await?;
        run_migrations(&db).await?;
        Arc::new(SeaOrmRepositoryProvider::new(db))
    };
    let services = CoreServices::new(repos, &config.ocpp);

    match cli.command {
        Command::Check => {}
        Command::Migrate => {
            println!("Migrations applied to {}", config.database.url);
        }
        Command::RegisterChargePoint { id } => {
            services.charge_points.register_charge_point(&id).await?;
            println!("Registered charge point {}", id);
        }
        Command::AddTag {
            id_tag,
            status,
            expires,
            parent,
        } => {
            let mut tag = OcppTag::new(id_tag.clone()).with_status(status);
            if let Some(expiry) = expires {
                tag = tag.with_expiry(expiry);
            }
            if let Some(parent) = parent {
                tag = tag.with_parent(parent);
            }
            services.authorization.register_tag(tag).await?;
            println!("Saved id tag {} ({})", id_tag, status);
        }
        Command::Reserve {
            charge_point_id,
            connector_id,
            id_tag,
            minutes,
        } => {
            let expiry = Utc::now() + Duration::minutes(minutes);
            let reservation = services
                .reservations
                .reserve(&charge_point_id, connector_id, &id_tag, expiry)
                .await?;
            println!(
                "Reservation {} on {} connector {} for {} until {}",
                reservation.id, charge_point_id, connector_id, id_tag, expiry
            );
        }
        Command::ExpireReservations { watch: false } => {
            let expired = services.reservations.expire_overdue(Utc::now()).await?;
            println!("Expired {} reservation(s)", expired.len());
        }
        Command::ExpireReservations { watch: true } => {
            let shutdown = ShutdownSignal::new();
            let task = start_reservation_expiry_task(
                services.reservations.clone(),
                shutdown.clone(),
                config.ocpp.reservation_check_interval_secs,
            );
            tokio::signal::ctrl_c().await?;
            shutdown.trigger();
            task.await?;
        }
    }

    Ok(())
}
