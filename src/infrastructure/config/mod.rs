//! Infrastructure configuration modules.

pub mod ledger;
pub mod logging;
pub mod settings;
pub mod wallet;

pub use ledger::{LedgerConfig, LedgerKind};
pub use logging::LoggingConfig;
pub use settings::Config;
pub use wallet::WalletConfig;
