//! End-to-end tests of the synchronizer over the in-memory store.

use itinera_protocol::{
    ClientMessage, DayDraft, EventDraft, EventOrder, EventPatch, ItineraryPatch, ServerMessage,
    UpdateAction,
};
use itinera_store::{ItineraryStore, MemoryStore};
use itinera_sync::{ClientHandle, SyncConfig, SyncCoordinator};
use itinera_testkit::{seeded_start_date, seeded_store, FlakyStore, SeededItinerary};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

fn coordinator(store: Arc<MemoryStore>) -> Arc<SyncCoordinator> {
    Arc::new(SyncCoordinator::with_shared_store(
        SyncConfig::default(),
        store,
    ))
}

/// Collects everything currently queued on a connection's outbox.
fn drain(rx: &mut UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

async fn join(
    coordinator: &SyncCoordinator,
    client: &ClientHandle,
    rx: &mut UnboundedReceiver<ServerMessage>,
    seeded: &SeededItinerary,
) {
    coordinator
        .handle(
            client,
            ClientMessage::JoinItinerary {
                itinerary_id: seeded.itinerary_id,
            },
        )
        .await;
    assert_eq!(drain(rx), vec![ServerMessage::ItineraryReady]);
}

fn draft(label: &str, order_index: u32) -> EventDraft {
    EventDraft {
        order_index,
        label: label.into(),
        description: None,
        category: None,
        image: None,
        start_time: None,
        end_time: None,
    }
}

/// The reorder the seeded day settles to: last event first.
fn rotated_order(seeded: &SeededItinerary) -> Vec<EventOrder> {
    let ids = &seeded.event_ids;
    vec![
        EventOrder {
            id: ids[2],
            order_index: 0,
        },
        EventOrder {
            id: ids[0],
            order_index: 1,
        },
        EventOrder {
            id: ids[1],
            order_index: 2,
        },
    ]
}

#[tokio::test]
async fn successful_mutation_reaches_all_members_including_sender() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    let (b, mut rx_b) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;
    join(&coordinator, &b, &mut rx_b, &seeded).await;

    coordinator
        .handle(
            &a,
            ClientMessage::AddEvent {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[1],
                event: draft("Douro cruise", 0),
            },
        )
        .await;

    let to_a = drain(&mut rx_a);
    let to_b = drain(&mut rx_b);
    assert_eq!(to_a.len(), 1);
    assert_eq!(to_a, to_b);
    match &to_a[0] {
        ServerMessage::ItineraryUpdate {
            update: UpdateAction::AddEvent { day_id, event },
            ..
        } => {
            assert_eq!(*day_id, seeded.day_ids[1]);
            assert_eq!(event.label, "Douro cruise");
            // Persisted before broadcast.
            assert_eq!(store.event(event.id).unwrap().label, "Douro cruise");
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn broadcasts_serialize_to_the_wire_contract() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store);
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    coordinator
        .handle(
            &a,
            ClientMessage::AddEvent {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[1],
                event: draft("Douro cruise", 0),
            },
        )
        .await;

    // What a transport would put on the wire: kebab-case tags, camelCase
    // fields, the action flattened beside the itinerary id.
    let messages = drain(&mut rx_a);
    assert_eq!(messages.len(), 1);
    let value = serde_json::to_value(&messages[0]).unwrap();
    assert_eq!(value["type"], "itinerary-update");
    assert_eq!(value["action"], "add-event");
    assert_eq!(value["itineraryId"], seeded.itinerary_id.to_string());
    assert_eq!(value["dayId"], seeded.day_ids[1].to_string());
    assert_eq!(value["event"]["orderIndex"], 0);
    assert_eq!(value["event"]["label"], "Douro cruise");
}

#[tokio::test]
async fn invalid_category_errors_to_sender_only_and_creates_nothing() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    let (b, mut rx_b) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;
    join(&coordinator, &b, &mut rx_b, &seeded).await;

    let mut event = draft("Mystery stop", 0);
    event.category = Some("not-a-real-category".into());
    coordinator
        .handle(
            &a,
            ClientMessage::AddEvent {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[1],
                event,
            },
        )
        .await;

    let to_a = drain(&mut rx_a);
    assert_eq!(to_a.len(), 1);
    assert!(matches!(to_a[0], ServerMessage::Error { .. }));
    assert!(drain(&mut rx_b).is_empty());
    assert!(store.events_of(seeded.day_ids[1]).is_empty());
}

#[tokio::test]
async fn reorder_broadcasts_immediately_but_persists_on_flush() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    let (b, mut rx_b) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;
    join(&coordinator, &b, &mut rx_b, &seeded).await;

    let order = rotated_order(&seeded);
    coordinator
        .handle(
            &a,
            ClientMessage::ReorderEvents {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[0],
                events: order.clone(),
            },
        )
        .await;

    // Both members render the change with no store write yet.
    for rx in [&mut rx_a, &mut rx_b] {
        let messages = drain(rx);
        assert!(matches!(
            &messages[..],
            [ServerMessage::ItineraryUpdate {
                update: UpdateAction::ReorderEvents { .. },
                ..
            }]
        ));
    }
    let unsettled: Vec<_> = store.events_of(seeded.day_ids[0]).iter().map(|e| e.id).collect();
    assert_eq!(unsettled, seeded.event_ids);
    assert!(coordinator.has_pending(seeded.itinerary_id));

    coordinator.flush_pending().await;

    let settled: Vec<_> = store.events_of(seeded.day_ids[0]).iter().map(|e| e.id).collect();
    assert_eq!(
        settled,
        vec![seeded.event_ids[2], seeded.event_ids[0], seeded.event_ids[1]]
    );
    let indices: Vec<u32> = store
        .events_of(seeded.day_ids[0])
        .iter()
        .map(|e| e.order_index)
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert!(!coordinator.has_pending(seeded.itinerary_id));
}

#[tokio::test]
async fn second_reorder_before_flush_supersedes_first() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    coordinator
        .handle(
            &a,
            ClientMessage::ReorderEvents {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[0],
                events: rotated_order(&seeded),
            },
        )
        .await;

    // A second drag lands before any flush; only it must ever be persisted.
    let reversed: Vec<EventOrder> = seeded
        .event_ids
        .iter()
        .rev()
        .enumerate()
        .map(|(i, id)| EventOrder {
            id: *id,
            order_index: i as u32,
        })
        .collect();
    coordinator
        .handle(
            &a,
            ClientMessage::ReorderEvents {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[0],
                events: reversed,
            },
        )
        .await;

    coordinator.flush_pending().await;

    let settled: Vec<_> = store.events_of(seeded.day_ids[0]).iter().map(|e| e.id).collect();
    let expected: Vec<_> = seeded.event_ids.iter().rev().copied().collect();
    assert_eq!(settled, expected);
}

#[tokio::test]
async fn join_drains_pending_reorder_before_ready() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    coordinator
        .handle(
            &a,
            ClientMessage::ReorderEvents {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[0],
                events: rotated_order(&seeded),
            },
        )
        .await;
    assert!(coordinator.has_pending(seeded.itinerary_id));

    // A late joiner must not read stale ordering from the store.
    let (c, mut rx_c) = ClientHandle::channel();
    coordinator
        .handle(
            &c,
            ClientMessage::JoinItinerary {
                itinerary_id: seeded.itinerary_id,
            },
        )
        .await;

    assert_eq!(drain(&mut rx_c), vec![ServerMessage::ItineraryReady]);
    assert!(!coordinator.has_pending(seeded.itinerary_id));
    let settled: Vec<_> = store.events_of(seeded.day_ids[0]).iter().map(|e| e.id).collect();
    assert_eq!(
        settled,
        vec![seeded.event_ids[2], seeded.event_ids[0], seeded.event_ids[1]]
    );
}

#[tokio::test]
async fn deleting_a_day_renumbers_and_relabels_the_rest() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    let remaining: Vec<_> = store
        .days_of(seeded.itinerary_id)
        .into_iter()
        .filter(|d| d.id != seeded.day_ids[1])
        .collect();

    coordinator
        .handle(
            &a,
            ClientMessage::DeleteDay {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[1],
                start_date: seeded_start_date(),
                days: remaining,
            },
        )
        .await;

    let messages = drain(&mut rx_a);
    let days = match &messages[..] {
        [ServerMessage::ItineraryUpdate {
            update: UpdateAction::DeleteDay { days },
            ..
        }] => days.clone(),
        other => panic!("unexpected messages: {other:?}"),
    };

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day_number, 1);
    assert_eq!(days[1].day_number, 2);
    // The former day 3 takes day 2's slot; its old label is discarded.
    assert_eq!(days[1].id, seeded.day_ids[2]);
    assert_eq!(days[1].label, "Day 2 - Sunday, June 2");

    let stored = store.days_of(seeded.itinerary_id);
    assert_eq!(
        stored.iter().map(|d| d.day_number).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(stored[1].label, "Day 2 - Sunday, June 2");
}

#[tokio::test]
async fn deleting_missing_day_reports_not_found_to_sender() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store);
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    coordinator
        .handle(
            &a,
            ClientMessage::DeleteDay {
                itinerary_id: seeded.itinerary_id,
                day_id: itinera_protocol::DayId::generate(),
                start_date: seeded_start_date(),
                days: Vec::new(),
            },
        )
        .await;

    let messages = drain(&mut rx_a);
    assert_eq!(messages.len(), 1);
    match &messages[0] {
        ServerMessage::Error { message } => assert!(message.contains("not found")),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn flush_failure_is_broadcast_room_wide_and_not_retried() {
    let (memory, seeded) = seeded_store();
    let flaky = Arc::new(FlakyStore::new(memory.clone()));
    let coordinator = Arc::new(SyncCoordinator::with_shared_store(
        SyncConfig::default(),
        flaky.clone(),
    ));
    let (a, mut rx_a) = ClientHandle::channel();
    let (b, mut rx_b) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;
    join(&coordinator, &b, &mut rx_b, &seeded).await;

    coordinator
        .handle(
            &a,
            ClientMessage::ReorderEvents {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[0],
                events: rotated_order(&seeded),
            },
        )
        .await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    flaky.set_fail_reorders(true);
    coordinator.flush_pending().await;

    // Everyone already believed the optimistic order; everyone hears that it
    // did not stick.
    for rx in [&mut rx_a, &mut rx_b] {
        let messages = drain(rx);
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], ServerMessage::Error { .. }));
    }

    // The slot was cleared regardless: a later flush writes nothing.
    assert!(!coordinator.has_pending(seeded.itinerary_id));
    flaky.set_fail_reorders(false);
    coordinator.flush_pending().await;
    let order: Vec<_> = memory.events_of(seeded.day_ids[0]).iter().map(|e| e.id).collect();
    assert_eq!(order, seeded.event_ids);
}

#[tokio::test]
async fn last_leave_flushes_pending_and_reaps_the_room() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    coordinator
        .handle(
            &a,
            ClientMessage::ReorderEvents {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[0],
                events: rotated_order(&seeded),
            },
        )
        .await;
    coordinator
        .handle(
            &a,
            ClientMessage::LeaveItinerary {
                itinerary_id: seeded.itinerary_id,
            },
        )
        .await;

    assert_eq!(coordinator.room_count(), 0);
    assert!(!coordinator.has_pending(seeded.itinerary_id));
    let settled: Vec<_> = store.events_of(seeded.day_ids[0]).iter().map(|e| e.id).collect();
    assert_eq!(
        settled,
        vec![seeded.event_ids[2], seeded.event_ids[0], seeded.event_ids[1]]
    );
}

#[tokio::test]
async fn order_invariant_holds_through_add_delete_reorder() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;
    let day_id = seeded.day_ids[1];

    for (i, label) in ["a", "b", "c"].iter().enumerate() {
        coordinator
            .handle(
                &a,
                ClientMessage::AddEvent {
                    itinerary_id: seeded.itinerary_id,
                    day_id,
                    event: draft(label, i as u32),
                },
            )
            .await;
    }
    let ids: Vec<_> = store.events_of(day_id).iter().map(|e| e.id).collect();

    // Delete the middle event; a gap at index 1 is tolerated until the next
    // reorder settles.
    coordinator
        .handle(
            &a,
            ClientMessage::DeleteEvent {
                itinerary_id: seeded.itinerary_id,
                day_id,
                event_id: ids[1],
            },
        )
        .await;
    let gapped: Vec<u32> = store.events_of(day_id).iter().map(|e| e.order_index).collect();
    assert_eq!(gapped, vec![0, 2]);

    coordinator
        .handle(
            &a,
            ClientMessage::ReorderEvents {
                itinerary_id: seeded.itinerary_id,
                day_id,
                events: vec![
                    EventOrder {
                        id: ids[2],
                        order_index: 0,
                    },
                    EventOrder {
                        id: ids[0],
                        order_index: 1,
                    },
                ],
            },
        )
        .await;
    coordinator.flush_pending().await;

    let settled: Vec<u32> = store.events_of(day_id).iter().map(|e| e.order_index).collect();
    assert_eq!(settled, vec![0, 1]);
}

#[tokio::test]
async fn edit_event_persists_and_broadcasts_patch() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    let patch = EventPatch {
        label: Some("Ribeira sunset walk".into()),
        start_time: Some("19:30".into()),
        ..EventPatch::default()
    };
    coordinator
        .handle(
            &a,
            ClientMessage::EditEvent {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[0],
                event_id: seeded.event_ids[0],
                patch: patch.clone(),
            },
        )
        .await;

    let messages = drain(&mut rx_a);
    assert!(matches!(
        &messages[..],
        [ServerMessage::ItineraryUpdate {
            update: UpdateAction::EditEvent { .. },
            ..
        }]
    ));

    let stored = store.event(seeded.event_ids[0]).unwrap();
    assert_eq!(stored.label, "Ribeira sunset walk");
    assert_eq!(stored.start_time.unwrap().to_string(), "19:30");
}

#[tokio::test]
async fn edit_itinerary_persists_through_the_external_store() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    let patch = ItineraryPatch {
        title: Some("Long weekend in Porto".into()),
        ..ItineraryPatch::default()
    };
    coordinator
        .handle(
            &a,
            ClientMessage::EditItinerary {
                itinerary_id: seeded.itinerary_id,
                patch: patch.clone(),
            },
        )
        .await;

    let messages = drain(&mut rx_a);
    assert_eq!(
        messages,
        vec![ServerMessage::update(
            seeded.itinerary_id,
            UpdateAction::EditItinerary { patch }
        )]
    );

    let fetched = store
        .fetch_itinerary(seeded.itinerary_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.title, "Long weekend in Porto");
}

#[tokio::test]
async fn add_day_round_trip() {
    let (store, seeded) = seeded_store();
    let coordinator = coordinator(store.clone());
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    coordinator
        .handle(
            &a,
            ClientMessage::AddDay {
                itinerary_id: seeded.itinerary_id,
                day: DayDraft {
                    label: "Day 4 - Tuesday, June 4".into(),
                    day_number: 4,
                },
            },
        )
        .await;

    let messages = drain(&mut rx_a);
    match &messages[..] {
        [ServerMessage::ItineraryUpdate {
            update: UpdateAction::AddDay { day },
            ..
        }] => {
            assert_eq!(day.day_number, 4);
            assert_eq!(store.day(day.id).unwrap().label, "Day 4 - Tuesday, June 4");
        }
        other => panic!("unexpected messages: {other:?}"),
    }
    assert_eq!(store.days_of(seeded.itinerary_id).len(), 4);
}

#[tokio::test(start_paused = true)]
async fn background_flusher_persists_on_the_interval() {
    let (store, seeded) = seeded_store();
    let coordinator = Arc::new(SyncCoordinator::with_shared_store(
        SyncConfig::new().with_flush_interval(Duration::from_secs(15)),
        store.clone(),
    ));
    let flusher = coordinator.spawn_flusher();
    let (a, mut rx_a) = ClientHandle::channel();
    join(&coordinator, &a, &mut rx_a, &seeded).await;

    coordinator
        .handle(
            &a,
            ClientMessage::ReorderEvents {
                itinerary_id: seeded.itinerary_id,
                day_id: seeded.day_ids[0],
                events: rotated_order(&seeded),
            },
        )
        .await;
    assert!(coordinator.has_pending(seeded.itinerary_id));

    tokio::time::sleep(Duration::from_secs(16)).await;
    tokio::task::yield_now().await;

    assert!(!coordinator.has_pending(seeded.itinerary_id));
    let settled: Vec<_> = store.events_of(seeded.day_ids[0]).iter().map(|e| e.id).collect();
    assert_eq!(
        settled,
        vec![seeded.event_ids[2], seeded.event_ids[0], seeded.event_ids[1]]
    );
    flusher.abort();
}
