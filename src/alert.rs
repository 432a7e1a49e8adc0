//! Tiered alert dispatch for newly-arrived orders.
//!
//! A missed order is an operational failure for the restaurant, so the
//! dispatcher walks a strict fallback chain and always lands on a
//! channel: audible alert when the display is visible, system
//! notification otherwise, and a sticky banner as the last resort.

use std::collections::BTreeSet;

use tracing::warn;

use crate::capability::{AudioAlert, CapabilityStatus, Notifier};

/// Which channel ultimately carried the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    /// The alert sound played; no banner is raised.
    Audible,
    /// A system notification was emitted naming the arriving orders.
    SystemNotified,
    /// Neither channel worked; the display must raise a persistent,
    /// dismissible banner. Never silently dropped.
    BannerOnly,
}

/// Chooses an alert channel for a batch of newly-arrived orders.
pub struct AlertDispatcher {
    audio: Box<dyn AudioAlert>,
    notifier: Box<dyn Notifier>,
}

impl AlertDispatcher {
    pub fn new(audio: Box<dyn AudioAlert>, notifier: Box<dyn Notifier>) -> Self {
        Self { audio, notifier }
    }

    /// Dispatches an alert for `newly_arrived`, which must be non-empty.
    ///
    /// Tolerates a hidden page and a denied or unavailable
    /// notification permission; every failure falls through to the
    /// next channel instead of propagating.
    pub fn dispatch(&self, newly_arrived: &BTreeSet<u64>, page_visible: bool) -> AlertOutcome {
        if page_visible && self.audio.probe() == CapabilityStatus::Granted {
            match self.audio.play() {
                Ok(()) => return AlertOutcome::Audible,
                Err(e) => warn!(error = %e, "audio alert failed, falling back"),
            }
        }

        if self.notifier.permission() == CapabilityStatus::Granted {
            let body = notification_body(newly_arrived);
            match self.notifier.notify("New kitchen order", &body) {
                Ok(()) => return AlertOutcome::SystemNotified,
                Err(e) => warn!(error = %e, "system notification failed, falling back"),
            }
        }

        warn!(orders = ?newly_arrived, "no alert channel available, raising banner");
        AlertOutcome::BannerOnly
    }
}

/// Formats the notification body, naming each arriving order.
pub fn notification_body(ids: &BTreeSet<u64>) -> String {
    let labels: Vec<String> = ids.iter().map(|id| format!("#{id}")).collect();
    if labels.len() == 1 {
        format!("Order {} arrived", labels[0])
    } else {
        format!("Orders {} arrived", labels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedAudio {
        status: CapabilityStatus,
        fail_play: bool,
    }

    impl ScriptedAudio {
        fn new(status: CapabilityStatus, fail_play: bool) -> Self {
            Self { status, fail_play }
        }
    }

    impl AudioAlert for ScriptedAudio {
        fn probe(&self) -> CapabilityStatus {
            self.status
        }

        fn play(&self) -> crate::Result<()> {
            if self.fail_play {
                Err(crate::KebubbiError::Io("no audio device".to_string()))
            } else {
                Ok(())
            }
        }
    }

    struct RecordingNotifier {
        status: CapabilityStatus,
        fail: bool,
        bodies: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new(status: CapabilityStatus) -> Self {
            Self {
                status,
                fail: false,
                bodies: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(CapabilityStatus::Granted)
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn permission(&self) -> CapabilityStatus {
            self.status
        }

        fn request_permission(&self) -> CapabilityStatus {
            self.status
        }

        fn notify(&self, _summary: &str, body: &str) -> crate::Result<()> {
            if self.fail {
                return Err(crate::KebubbiError::Io("daemon gone".to_string()));
            }
            self.bodies.lock().unwrap().push(body.to_string());
            Ok(())
        }
    }

    fn ids(values: &[u64]) -> BTreeSet<u64> {
        values.iter().copied().collect()
    }

    #[test]
    fn visible_page_with_audio_is_audible() {
        let dispatcher = AlertDispatcher::new(
            Box::new(ScriptedAudio::new(CapabilityStatus::Granted, false)),
            Box::new(RecordingNotifier::new(CapabilityStatus::Granted)),
        );
        assert_eq!(dispatcher.dispatch(&ids(&[103]), true), AlertOutcome::Audible);
    }

    #[test]
    fn hidden_page_never_selects_audible() {
        let audio = ScriptedAudio::new(CapabilityStatus::Granted, false);
        let dispatcher = AlertDispatcher::new(
            Box::new(audio),
            Box::new(RecordingNotifier::new(CapabilityStatus::Granted)),
        );
        assert_eq!(
            dispatcher.dispatch(&ids(&[103]), false),
            AlertOutcome::SystemNotified
        );
    }

    #[test]
    fn notification_names_the_order() {
        let notifier = RecordingNotifier::new(CapabilityStatus::Granted);
        let dispatcher = AlertDispatcher::new(
            Box::new(ScriptedAudio::new(CapabilityStatus::Unavailable, false)),
            Box::new(notifier),
        );
        assert_eq!(
            dispatcher.dispatch(&ids(&[103]), true),
            AlertOutcome::SystemNotified
        );
    }

    #[test]
    fn audio_failure_falls_through_without_panicking() {
        let dispatcher = AlertDispatcher::new(
            Box::new(ScriptedAudio::new(CapabilityStatus::Granted, true)),
            Box::new(RecordingNotifier::new(CapabilityStatus::Granted)),
        );
        assert_eq!(
            dispatcher.dispatch(&ids(&[7]), true),
            AlertOutcome::SystemNotified
        );
    }

    #[test]
    fn everything_failing_lands_on_banner() {
        let dispatcher = AlertDispatcher::new(
            Box::new(ScriptedAudio::new(CapabilityStatus::Granted, true)),
            Box::new(RecordingNotifier::failing()),
        );
        assert_eq!(dispatcher.dispatch(&ids(&[7]), true), AlertOutcome::BannerOnly);
    }

    #[test]
    fn denied_notification_lands_on_banner_when_hidden() {
        let dispatcher = AlertDispatcher::new(
            Box::new(ScriptedAudio::new(CapabilityStatus::Granted, false)),
            Box::new(RecordingNotifier::new(CapabilityStatus::Denied)),
        );
        assert_eq!(
            dispatcher.dispatch(&ids(&[7]), false),
            AlertOutcome::BannerOnly
        );
    }

    #[test]
    fn body_lists_every_arrival_in_order() {
        assert_eq!(notification_body(&ids(&[103])), "Order #103 arrived");
        assert_eq!(
            notification_body(&ids(&[105, 103])),
            "Orders #103, #105 arrived"
        );
    }
}
