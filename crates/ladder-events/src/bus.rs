#![forbid(unsafe_code)]

use tokio::sync::broadcast;

use crate::Event;

/// Broadcast channel carrying selection and playback events of one session.
///
/// The session publishes from the engine thread, the operator surface from
/// its own thread; every subscriber sees both streams in publish order.
/// Publishing is synchronous and never fails: with no receivers the event is
/// dropped, and a receiver that falls behind sees `RecvError::Lagged`.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Capacity is clamped to at least one slot.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish<E: Into<Event>>(&self, event: E) {
        let _ = self.tx.send(event.into());
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Whether anyone listens. Lets publishers skip building costly payloads.
    pub fn has_subscribers(&self) -> bool {
        self.tx.receiver_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use ladder_abr::{BitrateCommand, SelectionReason};
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    use super::*;
    use crate::{AbrEvent, PlaybackEvent};

    fn selected(to_bps: u64, reason: SelectionReason) -> AbrEvent {
        AbrEvent::VariantSelected {
            from_bps: None,
            to_bps,
            reason,
        }
    }

    #[test]
    fn selection_without_listeners_is_dropped() {
        let bus = EventBus::new(4);
        assert!(!bus.has_subscribers());
        bus.publish(selected(500_000, SelectionReason::Initial));

        let mut rx = bus.subscribe();
        assert!(bus.has_subscribers());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        drop(rx);
        assert!(!bus.has_subscribers());
    }

    #[tokio::test]
    async fn catalog_is_announced_before_first_selection() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(AbrEvent::CatalogBuilt {
            variants: Vec::new(),
        });
        bus.publish(selected(1_000_000, SelectionReason::Initial));
        bus.publish(AbrEvent::SelectionUnchanged {
            reason: SelectionReason::NoCandidate,
        });

        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::Abr(AbrEvent::CatalogBuilt { .. })
        ));
        assert_eq!(
            rx.recv().await.unwrap(),
            Event::Abr(selected(1_000_000, SelectionReason::Initial))
        );
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::Abr(AbrEvent::SelectionUnchanged { .. })
        ));
    }

    #[test]
    fn operator_thread_publishes_on_shared_bus() {
        let bus = EventBus::new(8);
        let mut engine_rx = bus.subscribe();
        let mut overlay_rx = bus.subscribe();

        let operator = bus.clone();
        thread::spawn(move || {
            operator.publish(AbrEvent::CommandChanged {
                from: BitrateCommand::Auto,
                to: BitrateCommand::Increase,
            });
        })
        .join()
        .unwrap();
        bus.publish(selected(2_000_000, SelectionReason::Increase));

        for rx in [&mut engine_rx, &mut overlay_rx] {
            assert!(matches!(
                rx.try_recv(),
                Ok(Event::Abr(AbrEvent::CommandChanged {
                    to: BitrateCommand::Increase,
                    ..
                }))
            ));
            assert!(matches!(
                rx.try_recv(),
                Ok(Event::Abr(AbrEvent::VariantSelected {
                    to_bps: 2_000_000,
                    ..
                }))
            ));
        }
    }

    #[tokio::test]
    async fn slow_overlay_lags_behind_bitrate_updates() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for bps in [250_000, 500_000, 1_000_000, 2_000_000] {
            bus.publish(PlaybackEvent::DownloadBitrateChanged { bps });
        }

        assert_eq!(rx.recv().await, Err(RecvError::Lagged(2)));
        assert_eq!(
            rx.recv().await.unwrap(),
            Event::Playback(PlaybackEvent::DownloadBitrateChanged { bps: 1_000_000 })
        );
    }

    #[test]
    fn zero_capacity_still_delivers() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        bus.publish(PlaybackEvent::PlaybackBitrateChanged { bps: 800_000 });
        assert_eq!(
            rx.try_recv(),
            Ok(Event::Playback(PlaybackEvent::PlaybackBitrateChanged {
                bps: 800_000
            }))
        );
    }
}
