use std::net::SocketAddr;
use std::path::Path;

use canopy_core::DeviceDescriptor;
use canopy_tls::TlsConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub server: ServerConfig,
    pub cloud: CloudConfig,
    /// Fleet override; the built-in simulated fleet is used when absent.
    #[serde(default)]
    pub devices: Option<Vec<DeviceDescriptor>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Platform-assigned unique id of the gateway device
    pub unique_id: String,
    /// Interval in seconds between telemetry uploads
    pub upload_interval_secs: u64,
    /// Backoff in seconds after a failed upload
    pub retry_backoff_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address for the HTTP server to listen on
    pub http_addr: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CloudConfig {
    Mock,
    Tcp {
        /// Address of the platform ingestion endpoint
        addr: SocketAddr,
        /// Credential material for the mutual-TLS session
        tls: TlsConfig,
    },
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig {
                unique_id: "GW-20001448".to_string(),
                upload_interval_secs: 60,
                retry_backoff_secs: 5,
            },
            server: ServerConfig {
                http_addr: "0.0.0.0:8081".parse().unwrap(),
            },
            cloud: CloudConfig::Mock,
            devices: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_tcp_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[gateway]
unique_id = "GW-1"
upload_interval_secs = 30
retry_backoff_secs = 2

[server]
http_addr = "127.0.0.1:8081"

[cloud]
type = "tcp"
addr = "127.0.0.1:9000"

[cloud.tls]
cert = "./certs/gateway.crt"
key = "./certs/gateway.key"
root_ca = "./certs/rootCA.pem"
domain = "platform.example"

[[devices]]
uniqueId = "Thermostat-1"
deviceType = "thermostat"
model = "PCT504-E"
name = "Stat-1"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.gateway.unique_id, "GW-1");
        assert_eq!(config.gateway.upload_interval_secs, 30);

        match config.cloud {
            CloudConfig::Tcp { addr, ref tls } => {
                assert_eq!(addr, "127.0.0.1:9000".parse().unwrap());
                assert_eq!(tls.domain, "platform.example");
            }
            CloudConfig::Mock => panic!("expected tcp cloud config"),
        }

        let devices = config.devices.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].unique_id.as_str(), "Thermostat-1");
    }

    #[test]
    fn default_config_uses_mock_cloud() {
        let config = Config::default();
        assert!(matches!(config.cloud, CloudConfig::Mock));
        assert_eq!(config.gateway.upload_interval_secs, 60);
        assert_eq!(config.gateway.retry_backoff_secs, 5);
    }
}
