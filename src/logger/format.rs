//! Access log formats.
//!
//! Supports `combined` (Apache/nginx), `common` (CLF), `json`, and
//! custom patterns with nginx-style `$variable` substitution.

use chrono::Local;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log format, parsed once from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Combined,
    Common,
    Json,
    /// Custom `$variable` pattern
    Custom(String),
}

impl LogFormat {
    /// Parse the configured format name; anything unrecognized is treated
    /// as a custom pattern.
    pub fn parse(format: &str) -> Self {
        match format {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            custom => Self::Custom(custom.to_string()),
        }
    }
}

/// One served request, as it appears in the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Wall time spent handling the request
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// New entry stamped with the current time; the router fills in the
    /// response side after handling
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Render the entry in the given format
    pub fn format(&self, format: &LogFormat) -> String {
        match format {
            LogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.clf_line(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            LogFormat::Common => self.clf_line(),
            LogFormat::Json => self.json_line(),
            LogFormat::Custom(pattern) => self.substitute(pattern),
        }
    }

    /// `/path?query` as the client sent it
    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// The quoted request line: `GET /path?query HTTP/1.1`
    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    /// Common Log Format core, shared by `common` and `combined`
    fn clf_line(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn json_line(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Replace `$variable` occurrences in a custom pattern
    fn substitute(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time_s = self.request_time_us as f64 / 1_000_000.0;

        // Longer names first so $request does not eat $request_uri etc.
        let substitutions: &[(&str, String)] = &[
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_user_agent", dash(self.user_agent.as_deref())),
            ("$request_method", self.method.clone()),
            ("$http_referer", dash(self.referer.as_deref())),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{request_time_s:.3}")),
            ("$request_uri", self.request_uri()),
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
        ];

        let mut line = pattern.to_string();
        for (name, value) in substitutions {
            line = line.replace(name, value);
        }
        line
    }
}

fn dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "GET".to_string(),
            "/api/v1/duplicate-check".to_string(),
        );
        entry.query = Some("output_path=result.md".to_string());
        entry.status = 200;
        entry.body_bytes = 1234;
        entry.referer = Some("https://example.com".to_string());
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 4200;
        entry
    }

    #[test]
    fn test_parse_format_names() {
        assert_eq!(LogFormat::parse("combined"), LogFormat::Combined);
        assert_eq!(LogFormat::parse("common"), LogFormat::Common);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(
            LogFormat::parse("$status $request"),
            LogFormat::Custom("$status $request".to_string())
        );
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format(&LogFormat::Combined);
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("GET /api/v1/duplicate-check?output_path=result.md HTTP/1.1"));
        assert!(log.contains("200 1234"));
        assert!(log.contains("\"https://example.com\" \"Mozilla/5.0\""));
    }

    #[test]
    fn test_format_common_has_no_headers() {
        let log = create_test_entry().format(&LogFormat::Common);
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("200 1234"));
        assert!(!log.contains("https://example.com"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format(&LogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["method"], "GET");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 1234);
        assert_eq!(value["query"], "output_path=result.md");
    }

    #[test]
    fn test_json_nulls_for_missing_fields() {
        let entry =
            AccessLogEntry::new("10.0.0.1".to_string(), "GET".to_string(), "/".to_string());
        let value: serde_json::Value =
            serde_json::from_str(&entry.format(&LogFormat::Json)).unwrap();
        assert!(value["query"].is_null());
        assert!(value["referer"].is_null());
        assert!(value["user_agent"].is_null());
    }

    #[test]
    fn test_custom_pattern_substitution() {
        let log = create_test_entry().format(&LogFormat::Custom(
            "$remote_addr $status $request_uri $request_time".to_string(),
        ));
        // 4200us renders as 0.004 (three decimal places)
        assert_eq!(
            log,
            "192.168.1.1 200 /api/v1/duplicate-check?output_path=result.md 0.004"
        );
    }

    #[test]
    fn test_custom_request_not_shadowed_by_longer_variables() {
        let log = create_test_entry().format(&LogFormat::Custom(
            "$request_method | $request".to_string(),
        ));
        assert_eq!(
            log,
            "GET | GET /api/v1/duplicate-check?output_path=result.md HTTP/1.1"
        );
    }

    #[test]
    fn test_missing_optional_fields_render_dashes() {
        let entry =
            AccessLogEntry::new("10.0.0.1".to_string(), "HEAD".to_string(), "/".to_string());
        let log = entry.format(&LogFormat::Combined);
        assert!(log.contains("\"-\" \"-\""), "got: {log}");
    }
}
