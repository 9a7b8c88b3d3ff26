//! telemetry - 可观测性库

use fleet_config::TelemetryConfig;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),

    #[error("Failed to install Prometheus recorder: {0}")]
    Metrics(#[from] BuildError),
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// 初始化 tracing
pub fn init_tracing(log_level: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;
    Ok(())
}

/// 按配置选择日志格式
pub fn init_from_config(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    if config.json {
        init_tracing_json(&config.log_level)
    } else {
        init_tracing(&config.log_level)
    }
}

/// 初始化 Prometheus metrics
pub fn init_metrics() -> Result<PrometheusHandle, TelemetryError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_subscriber_installs_once() {
        let config = TelemetryConfig {
            log_level: "debug".to_string(),
            json: true,
        };
        assert!(init_from_config(&config).is_ok());
        tracing::info!(target: "fleet_telemetry", "subscriber installed");

        // 全局 subscriber 只能安装一次
        assert!(matches!(
            init_tracing("info"),
            Err(TelemetryError::Tracing(_))
        ));
    }

    #[test]
    fn test_metrics_recorder_renders_counters() {
        let handle = init_metrics().expect("recorder should install");
        metrics::counter!("permission_checks_total", "check" => "check_admin", "allowed" => "true")
            .increment(1);
        assert!(handle.render().contains("permission_checks_total"));
    }
}
