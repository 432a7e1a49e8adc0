//! Alerting capabilities and the one-time permission gate.
//!
//! Audio playback, system notifications, and the page-visibility
//! signal are modeled as abstract capabilities so the alert pipeline
//! is not tied to any particular platform surface. The production
//! implementations target the terminal the display runs in: the bell
//! character for audio and `notify-send` for system notifications,
//! with visibility derived from terminal focus.

use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::Result;
use crate::drafts::KeyValueStore;

/// Durable cache key for the notification permission decision.
const NOTIFY_PERMISSION_KEY: &str = "notification_permission";

/// Outcome of probing or requesting a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityStatus {
    Granted,
    Denied,
    /// The capability does not exist in this environment (no TTY, no
    /// notification daemon). Not cached: the next session may differ.
    Unavailable,
}

/// Audible alert channel.
pub trait AudioAlert: Send + Sync {
    /// Near-silent probe: checks that playback is possible in the
    /// current context without alerting anyone.
    fn probe(&self) -> CapabilityStatus;

    /// Plays the alert sound.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails; the dispatcher falls
    /// through to the next channel.
    fn play(&self) -> Result<()>;
}

/// System notification channel.
pub trait Notifier: Send + Sync {
    /// Current permission state without prompting.
    fn permission(&self) -> CapabilityStatus;

    /// Requests permission if undecided. May prompt the operator.
    fn request_permission(&self) -> CapabilityStatus;

    /// Emits a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; the dispatcher falls
    /// through to the banner channel.
    fn notify(&self, summary: &str, body: &str) -> Result<()>;
}

/// Shared page-visibility signal.
///
/// Written by the display's event loop on focus changes, read by the
/// poller when dispatching alerts.
#[derive(Debug, Clone)]
pub struct VisibilitySignal(Arc<AtomicBool>);

impl VisibilitySignal {
    /// Creates a signal with the given initial state.
    pub fn new(visible: bool) -> Self {
        Self(Arc::new(AtomicBool::new(visible)))
    }

    pub fn set(&self, visible: bool) {
        self.0.store(visible, Ordering::Relaxed);
    }

    pub fn is_visible(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of the permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Both alert capabilities are usable.
    Granted,
    /// At least one capability is denied or unavailable. Polling and
    /// alerting still start; the dispatcher degrades per channel.
    DegradedGranted,
}

/// One-time acquisition of the alerting capabilities.
///
/// Runs before the poll loop starts. A probe failure never blocks the
/// operator out of the display: the worst outcome is
/// [`GateOutcome::DegradedGranted`]. The notification decision is
/// cached in `settings` so decided sessions skip the prompt.
pub fn acquire_permissions<S: KeyValueStore>(
    audio: &dyn AudioAlert,
    notifier: &dyn Notifier,
    settings: &S,
) -> GateOutcome {
    let audio_status = audio.probe();
    if audio_status != CapabilityStatus::Granted {
        warn!(status = ?audio_status, "audio alert channel degraded");
    }

    let notify_status = match settings.get(NOTIFY_PERMISSION_KEY) {
        Some(cached) if cached == "granted" => CapabilityStatus::Granted,
        Some(cached) if cached == "denied" => CapabilityStatus::Denied,
        _ => {
            let status = notifier.request_permission();
            let cached = match status {
                CapabilityStatus::Granted => Some("granted"),
                CapabilityStatus::Denied => Some("denied"),
                CapabilityStatus::Unavailable => None,
            };
            if let Some(value) = cached
                && let Err(e) = settings.set(NOTIFY_PERMISSION_KEY, value)
            {
                warn!(error = %e, "failed to cache notification permission");
            }
            status
        }
    };

    if audio_status == CapabilityStatus::Granted && notify_status == CapabilityStatus::Granted {
        info!("alert capabilities acquired");
        GateOutcome::Granted
    } else {
        info!(audio = ?audio_status, notify = ?notify_status, "alert capabilities degraded");
        GateOutcome::DegradedGranted
    }
}

/// Audio alert backed by the terminal bell.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn new() -> Self {
        Self
    }
}

impl AudioAlert for TerminalBell {
    fn probe(&self) -> CapabilityStatus {
        // A zero-length write checks the channel without sounding it.
        if !std::io::stdout().is_terminal() {
            return CapabilityStatus::Unavailable;
        }
        match std::io::stdout().flush() {
            Ok(()) => CapabilityStatus::Granted,
            Err(_) => CapabilityStatus::Unavailable,
        }
    }

    fn play(&self) -> Result<()> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(b"\x07")
            .and_then(|()| stdout.flush())
            .map_err(|e| crate::KebubbiError::Io(format!("bell write failed: {e}")))
    }
}

/// System notifications via the `notify-send` command.
#[derive(Debug)]
pub struct DesktopNotifier {
    available: bool,
}

impl DesktopNotifier {
    /// Probes for `notify-send` once at construction.
    pub fn new() -> Self {
        let available = std::process::Command::new("notify-send")
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        Self { available }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> CapabilityStatus {
        if self.available {
            CapabilityStatus::Granted
        } else {
            CapabilityStatus::Unavailable
        }
    }

    fn request_permission(&self) -> CapabilityStatus {
        // Command-line notifications have no prompt flow; availability
        // is the decision.
        self.permission()
    }

    fn notify(&self, summary: &str, body: &str) -> Result<()> {
        let status = std::process::Command::new("notify-send")
            .arg(summary)
            .arg(body)
            .status()
            .map_err(|e| crate::KebubbiError::Io(format!("notify-send failed: {e}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(crate::KebubbiError::Io(format!(
                "notify-send exited with {status}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::MemoryStore;

    pub(crate) struct FakeAudio {
        pub status: CapabilityStatus,
        pub fail_play: bool,
    }

    impl AudioAlert for FakeAudio {
        fn probe(&self) -> CapabilityStatus {
            self.status
        }

        fn play(&self) -> Result<()> {
            if self.fail_play {
                Err(crate::KebubbiError::Io("playback failed".to_string()))
            } else {
                Ok(())
            }
        }
    }

    pub(crate) struct FakeNotifier {
        pub status: CapabilityStatus,
        pub requests: std::sync::atomic::AtomicUsize,
    }

    impl FakeNotifier {
        pub(crate) fn new(status: CapabilityStatus) -> Self {
            Self {
                status,
                requests: std::sync::atomic::AtomicUsize::new(0),
            }
        }
    }

    impl Notifier for FakeNotifier {
        fn permission(&self) -> CapabilityStatus {
            self.status
        }

        fn request_permission(&self) -> CapabilityStatus {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.status
        }

        fn notify(&self, _summary: &str, _body: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn full_grant_when_both_channels_work() {
        let audio = FakeAudio {
            status: CapabilityStatus::Granted,
            fail_play: false,
        };
        let notifier = FakeNotifier::new(CapabilityStatus::Granted);
        let settings = MemoryStore::new();
        assert_eq!(
            acquire_permissions(&audio, &notifier, &settings),
            GateOutcome::Granted
        );
    }

    #[test]
    fn degraded_but_never_blocked_on_probe_failure() {
        let audio = FakeAudio {
            status: CapabilityStatus::Unavailable,
            fail_play: true,
        };
        let notifier = FakeNotifier::new(CapabilityStatus::Denied);
        let settings = MemoryStore::new();
        assert_eq!(
            acquire_permissions(&audio, &notifier, &settings),
            GateOutcome::DegradedGranted
        );
    }

    #[test]
    fn notification_decision_cached_across_sessions() {
        let audio = FakeAudio {
            status: CapabilityStatus::Granted,
            fail_play: false,
        };
        let notifier = FakeNotifier::new(CapabilityStatus::Denied);
        let settings = MemoryStore::new();

        acquire_permissions(&audio, &notifier, &settings);
        acquire_permissions(&audio, &notifier, &settings);

        // Only the first session prompted; the decision came from cache after.
        assert_eq!(notifier.requests.load(Ordering::SeqCst), 1);
        assert_eq!(settings.get(NOTIFY_PERMISSION_KEY).as_deref(), Some("denied"));
    }

    #[test]
    fn unavailable_is_not_cached() {
        let audio = FakeAudio {
            status: CapabilityStatus::Granted,
            fail_play: false,
        };
        let notifier = FakeNotifier::new(CapabilityStatus::Unavailable);
        let settings = MemoryStore::new();

        acquire_permissions(&audio, &notifier, &settings);
        assert!(settings.get(NOTIFY_PERMISSION_KEY).is_none());

        // Undecided sessions probe again.
        acquire_permissions(&audio, &notifier, &settings);
        assert_eq!(notifier.requests.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn visibility_signal_shared_between_clones() {
        let signal = VisibilitySignal::new(true);
        let clone = signal.clone();
        clone.set(false);
        assert!(!signal.is_visible());
    }
}
