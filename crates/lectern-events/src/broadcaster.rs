//! Per-lecture event fan-out.
//!
//! A registry mapping each lecture to its current subscriber set. `publish`
//! fans out to whoever is registered at call time; there is no replay and no
//! cross-lecture leakage. The registry tolerates concurrent subscribe,
//! unsubscribe, and publish.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use lectern_core::{LectureId, SubscriberId};

use crate::types::LectureEvent;

/// Buffered events per subscriber before sends start dropping.
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 64;

type ChannelMap = HashMap<LectureId, HashMap<SubscriberId, mpsc::Sender<LectureEvent>>>;

/// Registry of live subscribers, keyed by lecture.
///
/// Cloning is cheap and shares the underlying registry.
#[derive(Clone)]
pub struct LectureBroadcaster {
    channels: Arc<RwLock<ChannelMap>>,
}

impl LectureBroadcaster {
    /// Create an empty broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Attach a new subscriber to `lecture_id`.
    ///
    /// The returned [`Subscription`] deregisters itself when dropped, so a
    /// disconnecting client cannot leak a channel slot.
    #[must_use]
    pub fn subscribe(&self, lecture_id: LectureId) -> Subscription {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        let id = SubscriberId::new();
        {
            let mut channels = self.channels.write();
            let _ = channels
                .entry(lecture_id.clone())
                .or_default()
                .insert(id.clone(), tx);
        }
        debug!(lecture_id = %lecture_id, subscriber_id = %id, "subscriber attached");
        Subscription {
            lecture_id,
            id,
            rx,
            channels: Arc::clone(&self.channels),
        }
    }

    /// Publish an event to every subscriber of its lecture.
    ///
    /// Delivery is at-most-once: a full or closed subscriber channel drops
    /// the event for that subscriber only. Returns how many subscribers the
    /// event was handed to.
    pub fn publish(&self, event: &LectureEvent) -> usize {
        let channels = self.channels.read();
        let Some(subscribers) = channels.get(&event.lecture_id) else {
            debug!(lecture_id = %event.lecture_id, "publish with no subscribers");
            return 0;
        };
        let mut delivered = 0;
        for (id, tx) in subscribers {
            if tx.try_send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                warn!(
                    lecture_id = %event.lecture_id,
                    subscriber_id = %id,
                    "dropping event for slow or closed subscriber"
                );
            }
        }
        delivered
    }

    /// Number of subscribers currently attached to `lecture_id`.
    #[must_use]
    pub fn subscriber_count(&self, lecture_id: &LectureId) -> usize {
        self.channels
            .read()
            .get(lecture_id)
            .map_or(0, HashMap::len)
    }

    /// Total subscribers across all lectures.
    #[must_use]
    pub fn total_subscribers(&self) -> usize {
        self.channels.read().values().map(HashMap::len).sum()
    }
}

impl Default for LectureBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// A live channel bound to one lecture.
///
/// Dropping the subscription deregisters it from the broadcaster.
pub struct Subscription {
    lecture_id: LectureId,
    id: SubscriberId,
    rx: mpsc::Receiver<LectureEvent>,
    channels: Arc<RwLock<ChannelMap>>,
}

impl Subscription {
    /// The lecture this subscription is bound to.
    #[must_use]
    pub fn lecture_id(&self) -> &LectureId {
        &self.lecture_id
    }

    /// Receive the next event, or `None` once the channel is closed.
    pub async fn recv(&mut self) -> Option<LectureEvent> {
        self.rx.recv().await
    }

    /// Non-blocking receive, for tests and drain loops.
    pub fn try_recv(&mut self) -> Option<LectureEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut channels = self.channels.write();
        if let Some(subscribers) = channels.get_mut(&self.lecture_id) {
            let _ = subscribers.remove(&self.id);
            if subscribers.is_empty() {
                let _ = channels.remove(&self.lecture_id);
            }
        }
        debug!(lecture_id = %self.lecture_id, subscriber_id = %self.id, "subscriber detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LectureEventKind;

    fn make_event(lecture: &str, kind: LectureEventKind) -> LectureEvent {
        LectureEvent::new(
            kind,
            LectureId::from(lecture),
            serde_json::json!({"probe": true}),
        )
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bc = LectureBroadcaster::new();
        let mut sub = bc.subscribe(LectureId::from("lec_a"));

        let delivered = bc.publish(&make_event("lec_a", LectureEventKind::Highlight));
        assert_eq!(delivered, 1);

        let ev = sub.recv().await.unwrap();
        assert_eq!(ev.kind, LectureEventKind::Highlight);
        assert_eq!(ev.lecture_id, LectureId::from("lec_a"));
    }

    #[tokio::test]
    async fn events_scoped_to_own_lecture() {
        let bc = LectureBroadcaster::new();
        let mut sub_a = bc.subscribe(LectureId::from("lec_a"));
        let mut sub_b = bc.subscribe(LectureId::from("lec_b"));

        let _ = bc.publish(&make_event("lec_a", LectureEventKind::Highlight));

        assert!(sub_a.try_recv().is_some());
        assert!(sub_b.try_recv().is_none());
    }

    #[tokio::test]
    async fn multiple_subscribers_same_lecture() {
        let bc = LectureBroadcaster::new();
        let mut sub1 = bc.subscribe(LectureId::from("lec_a"));
        let mut sub2 = bc.subscribe(LectureId::from("lec_a"));

        let delivered = bc.publish(&make_event("lec_a", LectureEventKind::Status));
        assert_eq!(delivered, 2);
        assert!(sub1.try_recv().is_some());
        assert!(sub2.try_recv().is_some());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_lost() {
        let bc = LectureBroadcaster::new();
        let delivered = bc.publish(&make_event("lec_a", LectureEventKind::Status));
        assert_eq!(delivered, 0);

        // An event published before the subscription existed is not replayed.
        let mut sub = bc.subscribe(LectureId::from("lec_a"));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn drop_deregisters_subscriber() {
        let bc = LectureBroadcaster::new();
        let lecture = LectureId::from("lec_a");
        let sub = bc.subscribe(lecture.clone());
        assert_eq!(bc.subscriber_count(&lecture), 1);

        drop(sub);
        assert_eq!(bc.subscriber_count(&lecture), 0);
        assert_eq!(bc.total_subscribers(), 0);
    }

    #[tokio::test]
    async fn dropped_subscriber_not_counted_in_delivery() {
        let bc = LectureBroadcaster::new();
        let lecture = LectureId::from("lec_a");
        let sub1 = bc.subscribe(lecture.clone());
        let mut sub2 = bc.subscribe(lecture.clone());
        drop(sub1);

        let delivered = bc.publish(&make_event("lec_a", LectureEventKind::Highlight));
        assert_eq!(delivered, 1);
        assert!(sub2.try_recv().is_some());
    }

    #[tokio::test]
    async fn full_channel_drops_event() {
        let bc = LectureBroadcaster::new();
        let lecture = LectureId::from("lec_a");
        let mut sub = bc.subscribe(lecture.clone());

        for _ in 0..SUBSCRIBER_CHANNEL_CAPACITY {
            let _ = bc.publish(&make_event("lec_a", LectureEventKind::Debug));
        }
        // Channel is full; the next publish reaches nobody.
        let delivered = bc.publish(&make_event("lec_a", LectureEventKind::Debug));
        assert_eq!(delivered, 0);

        // Earlier events are still readable.
        assert!(sub.try_recv().is_some());
    }

    #[tokio::test]
    async fn concurrent_subscribe_and_publish() {
        let bc = LectureBroadcaster::new();
        let lecture = LectureId::from("lec_a");

        let publisher = {
            let bc = bc.clone();
            let lecture = lecture.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    let _ = bc.publish(&LectureEvent::new(
                        LectureEventKind::Status,
                        lecture.clone(),
                        serde_json::json!({}),
                    ));
                    tokio::task::yield_now().await;
                }
            })
        };

        let mut subs = Vec::new();
        for _ in 0..20 {
            subs.push(bc.subscribe(lecture.clone()));
            tokio::task::yield_now().await;
        }
        publisher.await.unwrap();

        drop(subs);
        assert_eq!(bc.subscriber_count(&lecture), 0);
    }

    #[test]
    fn default_is_empty() {
        let bc = LectureBroadcaster::default();
        assert_eq!(bc.total_subscribers(), 0);
    }
}
