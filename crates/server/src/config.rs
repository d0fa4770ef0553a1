use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use patrimoine_core::models::settings::{DashboardSettings, DEFAULT_USD_CAD_RATE};
use patrimoine_core::store::credentials::ServiceAccountKey;
use patrimoine_core::store::google_sheets::GoogleSheetsStore;
use patrimoine_core::store::memory::InMemoryStore;
use patrimoine_core::store::traits::HoldingStore;

const DEFAULT_LOG_FILTER: &str = "patrimoine=info,patrimoine_core=info,tower_http=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Google Sheets worksheet (needs credentials and a spreadsheet id)
    Sheets,
    /// Process memory, lost on exit
    Memory,
}

#[derive(Parser, Debug)]
#[command(name = "patrimoine")]
#[command(about = "Household holdings dashboard valued live in CAD")]
pub struct ServerArgs {
    /// Address to listen on.
    #[arg(long, env = "PATRIMOINE_BIND", default_value = "127.0.0.1:8501")]
    pub bind: SocketAddr,

    /// Where holdings are stored.
    #[arg(long, env = "PATRIMOINE_STORE", value_enum, default_value_t = StoreKind::Sheets)]
    pub store: StoreKind,

    /// Service-account key file (JSON) with access to the spreadsheet.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Spreadsheet id, as found in the sheet URL.
    #[arg(long, env = "PATRIMOINE_SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Worksheet (tab) holding the rows.
    #[arg(long, env = "PATRIMOINE_WORKSHEET", default_value = "Sheet1")]
    pub worksheet: String,

    /// Seconds a fetched holdings sheet is reused before re-reading it.
    #[arg(long, env = "PATRIMOINE_CACHE_TTL_SECS", default_value_t = 60)]
    pub cache_ttl_secs: u64,

    /// CAD per USD used when no FX provider answers.
    #[arg(long, env = "PATRIMOINE_DEFAULT_FX_RATE", default_value_t = DEFAULT_USD_CAD_RATE)]
    pub default_fx_rate: Decimal,

    /// Emit logs as JSON lines.
    #[arg(long, env = "PATRIMOINE_LOG_JSON")]
    pub log_json: bool,
}

impl ServerArgs {
    pub fn settings(&self) -> Result<DashboardSettings> {
        if self.default_fx_rate <= Decimal::ZERO {
            bail!("--default-fx-rate must be positive (got {})", self.default_fx_rate);
        }
        Ok(DashboardSettings {
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            default_fx_rate: self.default_fx_rate,
            ..DashboardSettings::default()
        })
    }

    pub fn build_store(&self) -> Result<Box<dyn HoldingStore>> {
        match self.store {
            StoreKind::Memory => Ok(Box::new(InMemoryStore::new())),
            StoreKind::Sheets => {
                let Some(path) = &self.credentials else {
                    bail!("--credentials (or GOOGLE_APPLICATION_CREDENTIALS) is required with --store sheets");
                };
                let Some(spreadsheet_id) = &self.spreadsheet_id else {
                    bail!("--spreadsheet-id (or PATRIMOINE_SPREADSHEET_ID) is required with --store sheets");
                };
                let key = ServiceAccountKey::from_file(path).with_context(|| {
                    format!("Failed to load service-account key: {}", path.display())
                })?;
                Ok(Box::new(GoogleSheetsStore::with_service_account(
                    key,
                    spreadsheet_id.clone(),
                    self.worksheet.clone(),
                )))
            }
        }
    }
}

pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_dashboard() {
        let args = ServerArgs::try_parse_from(["patrimoine", "--store", "memory"]).unwrap();
        assert_eq!(args.bind, "127.0.0.1:8501".parse::<SocketAddr>().unwrap());
        assert_eq!(args.worksheet, "Sheet1");

        let settings = args.settings().unwrap();
        assert_eq!(settings.cache_ttl, Duration::from_secs(60));
        assert_eq!(settings.default_fx_rate, DEFAULT_USD_CAD_RATE);
    }

    /// Built by hand so no environment variable can supply a value.
    fn sheets_args(credentials: Option<PathBuf>, spreadsheet_id: Option<&str>) -> ServerArgs {
        ServerArgs {
            bind: "127.0.0.1:0".parse().unwrap(),
            store: StoreKind::Sheets,
            credentials,
            spreadsheet_id: spreadsheet_id.map(str::to_string),
            worksheet: "Sheet1".into(),
            cache_ttl_secs: 60,
            default_fx_rate: DEFAULT_USD_CAD_RATE,
            log_json: false,
        }
    }

    #[test]
    fn sheets_store_requires_credentials() {
        let err = sheets_args(None, Some("abc")).build_store().err().unwrap();
        assert!(err.to_string().contains("--credentials"));
    }

    #[test]
    fn sheets_store_requires_spreadsheet_id() {
        let err = sheets_args(Some(PathBuf::from("/nonexistent/key.json")), None)
            .build_store()
            .err()
            .unwrap();
        assert!(err.to_string().contains("--spreadsheet-id"));
    }

    #[test]
    fn unreadable_key_file_is_reported() {
        let err = sheets_args(Some(PathBuf::from("/nonexistent/key.json")), Some("abc"))
            .build_store()
            .err()
            .unwrap();
        assert!(err.to_string().contains("service-account key"));
    }

    #[test]
    fn rejects_non_positive_fx_rate() {
        let args = ServerArgs::try_parse_from([
            "patrimoine",
            "--store",
            "memory",
            "--default-fx-rate",
            "0",
        ])
        .unwrap();
        assert!(args.settings().is_err());
    }

    #[test]
    fn memory_store_builds() {
        let args = ServerArgs::try_parse_from(["patrimoine", "--store", "memory"]).unwrap();
        assert_eq!(args.build_store().unwrap().name(), "memory");
    }
}
