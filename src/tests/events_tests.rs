#[cfg(test)]
mod tests {
    use crate::services::events::{DashboardEvent, EventBroadcaster};
    use tokio::sync::broadcast::error::RecvError;
    use uuid::Uuid;

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let events = EventBroadcaster::new();
        let delivered = events.publish(DashboardEvent::DataUpdated {
            batch_id: Uuid::new_v4(),
            inserted: 3,
        });
        assert_eq!(delivered, 0);
        assert_eq!(events.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_the_event() {
        let events = EventBroadcaster::new();
        let mut first = events.subscribe();
        let mut second = events.subscribe();

        let event = DashboardEvent::DataUpdated {
            batch_id: Uuid::new_v4(),
            inserted: 12,
        };
        assert_eq!(events.publish(event.clone()), 2);

        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_old_events() {
        let events = EventBroadcaster::with_capacity(2);
        let mut receiver = events.subscribe();

        for inserted in 0..4 {
            events.publish(DashboardEvent::DataUpdated {
                batch_id: Uuid::new_v4(),
                inserted,
            });
        }

        assert!(matches!(receiver.recv().await, Err(RecvError::Lagged(2))));
        match receiver.recv().await.unwrap() {
            DashboardEvent::DataUpdated { inserted, .. } => assert_eq!(inserted, 2),
        }
    }

    #[test]
    fn test_event_wire_format() {
        let batch_id = Uuid::nil();
        let json = serde_json::to_value(DashboardEvent::DataUpdated { batch_id, inserted: 5 }).unwrap();

        assert_eq!(json["event"], "dataUpdated");
        assert_eq!(json["inserted"], 5);
        assert_eq!(json["batch_id"], batch_id.to_string());
    }
}
