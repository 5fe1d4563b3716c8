//! Tracing setup and per-request logging

use crate::config::{LogFileSettings, Settings};
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Response};
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use platform::client::extract_client_ip;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: stdout plus the rotating log file.
///
/// The returned guard flushes the file writer on drop and must live as long
/// as the process logs.
pub fn init_tracing(settings: &Settings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter()));

    let stdout = if settings.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let (file, guard) = match &settings.log_file {
        Some(log_file) => {
            let (writer, guard) = tracing_appender::non_blocking(rotating_file(log_file)?);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            let layer = if settings.log_json {
                layer.json().boxed()
            } else {
                layer.boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .init();

    Ok(guard)
}

/// Size-rotated file writer; `backend.log` rolls over to `backend.log.1`, ...
pub fn rotating_file(settings: &LogFileSettings) -> anyhow::Result<FileRotate<AppendCount>> {
    if let Some(dir) = settings.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    Ok(FileRotate::new(
        &settings.path,
        AppendCount::new(settings.backup_count),
        ContentLimit::Bytes(usize::try_from(settings.max_bytes)?),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}

/// Client address for the access log, honouring proxy headers
pub fn request_client_ip<B>(request: &Request<B>) -> String {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    extract_client_ip(request.headers(), peer).unwrap_or_else(|| "unknown".to_string())
}

/// `TraceLayer` span: one `http_request` span per request
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        client_ip = %request_client_ip(request),
    )
}

/// `TraceLayer` response hook
pub fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    tracing::info!(
        status_code = response.status().as_u16(),
        duration_ms = latency.as_secs_f64() * 1000.0,
        "http_request"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn request(headers: &[(&str, &str)], peer: Option<[u8; 4]>) -> Request<Body> {
        let mut builder = Request::get("/v1/contact");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(ip) = peer {
            request
                .extensions_mut()
                .insert(ConnectInfo(SocketAddr::from((ip, 443))));
        }
        request
    }

    #[test]
    fn test_request_client_ip_prefers_forwarded_for() {
        let req = request(
            &[("x-forwarded-for", "203.0.113.5, 10.0.0.1"), ("x-real-ip", "192.0.2.1")],
            Some([10, 0, 0, 9]),
        );
        assert_eq!(request_client_ip(&req), "203.0.113.5");
    }

    #[test]
    fn test_request_client_ip_falls_back_to_peer() {
        let req = request(&[], Some([10, 0, 0, 9]));
        assert_eq!(request_client_ip(&req), "10.0.0.9");

        let req = request(&[], None);
        assert_eq!(request_client_ip(&req), "unknown");
    }

    #[test]
    fn test_rotating_file_creates_directory_and_rolls_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("backend.log");
        let settings = LogFileSettings {
            path: path.clone(),
            max_bytes: 64,
            backup_count: 2,
        };

        let mut writer = rotating_file(&settings).unwrap();
        for _ in 0..10 {
            writer.write_all(&[b'x'; 40]).unwrap();
            writer.write_all(b"\n").unwrap();
        }
        writer.flush().unwrap();

        assert!(path.exists());
        assert!(dir.path().join("logs").join("backend.log.1").exists());
        // Older backups beyond the count are deleted
        assert!(!dir.path().join("logs").join("backend.log.3").exists());
    }
}
