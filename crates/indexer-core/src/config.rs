use std::collections::HashMap;
use std::sync::Arc;

use indexer_common::ScannerKind;
use tracing::warn;

use crate::scanner::{ConfigFn, ScannerHandle, noop_config_fn};

/// Per-kind maps from scanner name to a configuration-application
/// function, one map per scanner kind.
#[derive(Default, Clone)]
pub struct ScannerConfig {
    package: HashMap<String, ConfigFn>,
    distribution: HashMap<String, ConfigFn>,
    repository: HashMap<String, ConfigFn>,
    file: HashMap<String, ConfigFn>,
}

impl ScannerConfig {
    pub fn set(&mut self, kind: ScannerKind, name: impl Into<String>, apply: ConfigFn) {
        self.map_for_mut(kind).insert(name.into(), apply);
    }

    pub fn get(&self, kind: ScannerKind, name: &str) -> Option<&ConfigFn> {
        self.map_for(kind).get(name)
    }

    fn map_for(&self, kind: ScannerKind) -> &HashMap<String, ConfigFn> {
        match kind {
            ScannerKind::Package => &self.package,
            ScannerKind::Distribution => &self.distribution,
            ScannerKind::Repository => &self.repository,
            ScannerKind::File => &self.file,
        }
    }

    fn map_for_mut(&mut self, kind: ScannerKind) -> &mut HashMap<String, ConfigFn> {
        match kind {
            ScannerKind::Package => &mut self.package,
            ScannerKind::Distribution => &mut self.distribution,
            ScannerKind::Repository => &mut self.repository,
            ScannerKind::File => &mut self.file,
        }
    }
}

/// Decides, per scanner, whether and how to apply its configuration: RPC
/// configuration takes precedence when a scanner supports it, falling back
/// to plain configuration, and a scanner that receives a configuration
/// entry it cannot accept is dropped with a warning. Filtering is stable:
/// surviving scanners retain their relative order, per kind, because this
/// is a single pass over the flattened list that only ever removes
/// elements.
pub async fn apply_configuration(
    scanners: Vec<ScannerHandle>,
    scanner_config: &ScannerConfig,
    client: Option<Arc<reqwest::Client>>,
) -> Vec<ScannerHandle> {
    let mut kept = Vec::with_capacity(scanners.len());

    for handle in scanners {
        let name = handle.name().to_string();
        let kind = handle.kind();
        let have_cfg = scanner_config.get(kind, &name).is_some();
        let configurable = handle.as_configurable();
        let rpc = handle.as_rpc();

        let mut drop_scanner = false;
        if have_cfg && configurable.is_none() && rpc.is_none() {
            warn!(scanner = %name, kind = %kind, "unconfigurable but config present; dropping scanner");
            drop_scanner = true;
        } else if let Some(rpc) = rpc {
            let apply = scanner_config
                .get(kind, &name)
                .cloned()
                .unwrap_or_else(noop_config_fn);
            let client = client.clone().unwrap_or_else(|| Arc::new(reqwest::Client::new()));
            if let Err(err) = rpc.configure_rpc(&apply, client).await {
                warn!(scanner = %name, kind = %kind, error = %err, "rpc configuration rejected; dropping scanner");
                drop_scanner = true;
            }
        } else if let Some(configurable) = configurable {
            let apply = scanner_config
                .get(kind, &name)
                .cloned()
                .unwrap_or_else(noop_config_fn);
            if let Err(err) = configurable.configure(&apply).await {
                warn!(scanner = %name, kind = %kind, error = %err, "configuration rejected; dropping scanner");
                drop_scanner = true;
            }
        }

        if !drop_scanner {
            kept.push(handle);
        }
    }

    kept
}
