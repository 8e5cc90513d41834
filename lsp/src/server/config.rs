use anyhow::Context;
use serde::Deserialize;
use tower_lsp::lsp_types::ConfigurationItem;
use tracing::{debug, info};

use super::state::MacrorifyLanguageServer;

pub(crate) const CONFIG_SECTION: &str = "macrorify";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServerConfig {
    /// Most diagnostics published for one document.
    pub(crate) check_errors: usize,
    pub(crate) debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            check_errors: 1000,
            debounce_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct MacrorifyConfigSection {
    #[serde(default)]
    check_errors: Option<usize>,
    #[serde(default)]
    debounce_ms: Option<u64>,
}

impl ServerConfig {
    /// Overlay the client's `macrorify` section. Missing keys keep their
    /// current value; a zero `checkErrors` is ignored.
    pub(crate) fn apply_section(&mut self, value: serde_json::Value) -> anyhow::Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let section: MacrorifyConfigSection =
            serde_json::from_value(value).context("Failed to decode the macrorify configuration section")?;
        if let Some(limit) = section.check_errors.filter(|v| *v > 0) {
            self.check_errors = limit;
        }
        if let Some(delay) = section.debounce_ms {
            self.debounce_ms = delay;
        }
        Ok(())
    }
}

impl MacrorifyLanguageServer {
    pub(crate) async fn load_config(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];

        let values = match self.client.configuration(items).await {
            Ok(values) => values,
            Err(err) => {
                debug!("configuration request failed, keeping defaults: {err}");
                return;
            }
        };
        let Some(value) = values.into_iter().next() else {
            return;
        };

        let mut config = self.config();
        match config.apply_section(value) {
            Ok(()) => {
                info!(check_errors = config.check_errors, debounce_ms = config.debounce_ms, "configuration loaded");
                self.set_config(config);
            }
            Err(err) => debug!("{err:#}"),
        }
    }
}
