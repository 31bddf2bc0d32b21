//! Transient user notifications.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use stay_core::NotificationConfig;
use stay_data::ApiError;

/// Code for failures detected before any request was sent.
pub const CODE_CLIENT: u16 = 0;
/// Code for failures without an HTTP status (network, undecodable body).
pub const CODE_TRANSPORT: u16 = 1;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A message shown to the user until it expires.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    /// HTTP status for server errors, otherwise `CODE_CLIENT` or `CODE_TRANSPORT`.
    pub code: u16,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Holds notifications and drops them after a fixed delay.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    dismiss_after: Duration,
    next_id: u64,
    items: Vec<Notification>,
}

impl NotificationCenter {
    /// Delays above `NotificationConfig::MAX_DISMISS_AFTER_MS` are capped.
    pub fn new(dismiss_after_ms: u64) -> Self {
        let capped = dismiss_after_ms.min(NotificationConfig::MAX_DISMISS_AFTER_MS);
        Self {
            dismiss_after: Duration::milliseconds(capped as i64),
            next_id: 1,
            items: Vec::new(),
        }
    }

    /// Add a notification and return its id.
    pub fn push(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        code: u16,
        severity: Severity,
        now: DateTime<Utc>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            title: title.into(),
            message: message.into(),
            code,
            severity,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.dismiss_after)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        });
        id
    }

    /// Warning shown when an action needs a session.
    pub fn login_required(&mut self, action: &str, now: DateTime<Utc>) -> u64 {
        self.push(
            "Login required",
            format!("Please log in to {}.", action),
            CODE_CLIENT,
            Severity::Warning,
            now,
        )
    }

    /// Error notification for a failed API call.
    pub fn api_error(&mut self, title: &str, err: &ApiError, now: DateTime<Utc>) -> u64 {
        let code = match err {
            ApiError::Server { status, .. } => *status,
            ApiError::Validation(_) => CODE_CLIENT,
            ApiError::Transport { .. } | ApiError::Decode { .. } => CODE_TRANSPORT,
        };
        self.push(title, err.message(), code, Severity::Error, now)
    }

    /// Notifications not yet expired at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.items.iter().filter(|n| !n.is_expired(now)).collect()
    }

    /// Drop expired notifications; returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired(now));
        before - self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_expiry() {
        let mut center = NotificationCenter::new(3000);
        center.push("Saved", "ok", CODE_CLIENT, Severity::Success, t0());

        assert_eq!(center.active(t0() + Duration::milliseconds(2999)).len(), 1);
        assert!(center.active(t0() + Duration::milliseconds(3000)).is_empty());

        assert_eq!(center.prune(t0() + Duration::seconds(5)), 1);
        assert!(center.active(t0()).is_empty());
    }

    #[test]
    fn test_login_required_is_warning() {
        let mut center = NotificationCenter::new(3000);
        center.login_required("mark reviews as helpful", t0());

        let n = center.active(t0())[0];
        assert_eq!(n.severity, Severity::Warning);
        assert_eq!(n.code, CODE_CLIENT);
        assert_eq!(n.title, "Login required");
    }

    #[test]
    fn test_api_error_codes() {
        let mut center = NotificationCenter::new(3000);
        center.api_error(
            "Error",
            &ApiError::Server {
                status: 502,
                message: "Bad gateway".to_string(),
            },
            t0(),
        );
        center.api_error(
            "Error",
            &ApiError::Transport {
                message: "offline".to_string(),
                detail: "dns".to_string(),
            },
            t0(),
        );

        let active = center.active(t0());
        let codes: Vec<u16> = active.iter().map(|n| n.code).collect();
        assert_eq!(codes, vec![502, CODE_TRANSPORT]);
        assert_eq!(active[0].message, "Bad gateway");
    }

    #[test]
    fn test_oversized_delay_is_capped() {
        let mut center = NotificationCenter::new(u64::MAX);
        center.push("a", "b", CODE_CLIENT, Severity::Info, t0());

        let cap = Duration::milliseconds(NotificationConfig::MAX_DISMISS_AFTER_MS as i64);
        assert_eq!(center.active(t0() + cap - Duration::milliseconds(1)).len(), 1);
        assert!(center.active(t0() + cap).is_empty());
    }

    #[test]
    fn test_expiry_saturates_at_end_of_time() {
        let mut center = NotificationCenter::new(60_000);
        let late = DateTime::<Utc>::MAX_UTC - Duration::seconds(1);
        center.push("a", "b", CODE_CLIENT, Severity::Info, late);

        assert_eq!(center.active(late).len(), 1);
        assert!(center.active(DateTime::<Utc>::MAX_UTC).is_empty());
    }
}
