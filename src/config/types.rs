use serde::Deserialize;
use std::time::Duration;

/// The GDT page listing organizations registered to provide e-invoice services
pub const DEFAULT_SOURCE_URL: &str = "https://www.gdt.gov.vn/wps/portal/!ut/p/z1/tZNNc4IwEIb_SnvwyGRTEj6O6LSCgzrWQSQXJwSlaQW0ZujHrxdqD60dxY6ay85mdp9s3rxBDE0Ry3kpU65kkfNllUfMmAGxPd-ajIc67RPwcAd6fc_CXY-g8Kug03VcYvoAFukCeKQ9HLidEQZPR-xn_yPVH8ALBq49HPkYKHz3w4HlQFP_BDHERK5W6glFaaJuRJGrea5asOGzKq-jJsWmBUoIkZQtsDA1zJhyLY5hoRE-x5qNY7tKbWLHdwblPKmhKyETFJ1UHf5W6e-U7BQRjxSw4xqF9bwNz9DEiKoZzMN3wCgs5fwNBXnxmlXGGP9TIrfxBPPME47jfXJdPD0T30MsXRbx7svJ5_WaOZWvay-_KzS9nLH3rrFntZFxWZX28fSqeNe8Kt4-10KrLAgyS_-Q2suif6-TqFd-tgdaHfx6g6bZbBec2y3wS1r1/dz/d5/L2dBISEvZ0FBIS9nQSEh/";

/// Environment variable holding an optional HTTP/HTTPS proxy URL
pub const PROXY_ENV_VAR: &str = "PROXY_URL";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT_LANGUAGE: &str = "vi-VN,vi;q=0.9,en-US;q=0.8,en;q=0.7";

/// Main configuration structure for hddt-sync
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Applies environment overrides on top of the loaded values
    ///
    /// A non-empty `PROXY_URL` replaces any proxy set in the file.
    pub fn apply_env(&mut self) {
        self.apply_proxy_override(std::env::var(PROXY_ENV_VAR).ok());
    }

    fn apply_proxy_override(&mut self, proxy: Option<String>) {
        if let Some(proxy) = proxy.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) {
            self.source.proxy = Some(proxy);
        }
    }
}

/// Upstream page and transport settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Page to fetch
    pub url: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// TCP/TLS connect timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Additional attempts made after a 500/502/503/504 response
    pub max_retries: u32,

    /// First backoff delay (milliseconds); doubled on every further retry
    pub backoff_base_ms: u64,

    /// Skip certificate validation for this source.
    ///
    /// The GDT portal serves a legacy certificate chain that rustls rejects,
    /// so the default is `true` for this one endpoint only.
    pub accept_invalid_certs: bool,

    pub user_agent: String,

    pub accept_language: String,

    /// HTTP/HTTPS proxy; direct connection when unset
    pub proxy: Option<String>,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 1000,
            accept_invalid_certs: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            proxy: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the JSON record store
    pub records_path: String,

    /// Path to the file holding the last applied source date
    pub sync_date_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_path: "hddtvn.json".to_string(),
            sync_date_path: "date.txt".to_string(),
        }
    }
}
