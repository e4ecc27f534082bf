use std::str::FromStr;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Installs the global subscriber. Safe to call more than once; only the
/// first call takes effect (tests initialize logging per test body).
pub fn init(level: &str, json: bool) -> Result<()> {
    INITIALIZED.get_or_try_init(|| {
        let env_filter = EnvFilter::from_str(level).expect("failed to parse log level");

        let builder = tracing_subscriber::fmt()
            .with_line_number(true)
            .with_file(true)
            .with_env_filter(env_filter);

        if json {
            builder.json().finish().try_init()
        } else {
            builder.pretty().finish().try_init()
        }
    })?;

    Ok(())
}
