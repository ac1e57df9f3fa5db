mod common;

use common::{new_task, task, Task, TaskId, TaskPatch};
use console_framework::mock::{create_mock_client, expect_create, expect_list};
use console_framework::{
    Admission, CreatePanel, EditSlot, EntityListController, ListPhase, MutationKind, Refusal,
    ResourceActor,
};
use std::sync::Arc;

fn mount_seeded(seed: Vec<Task>) -> console_framework::ControllerHandle<Task> {
    let (actor, client) = ResourceActor::seeded(10, seed);
    tokio::spawn(actor.run(()));
    let (controller, handle) = EntityListController::new(Arc::new(client), 10);
    tokio::spawn(controller.run());
    handle
}

#[tokio::test]
async fn create_round_trips_through_reference_backend() {
    let tasks = mount_seeded(vec![task(1, "Write docs", "ana"), task(2, "Ship", "bo")]);
    tasks.settled().await.unwrap();

    assert!(tasks.start_create().await.unwrap().is_accepted());
    let input = new_task("Review", "cy");
    assert!(tasks.submit_create(input.clone()).await.unwrap().is_accepted());

    let state = tasks.settled().await.unwrap();
    assert_eq!(state.create_panel, CreatePanel::Closed);
    let items = state.items();
    assert_eq!(items.len(), 3);
    // Server order is kept; the new entity has a fresh id and the submitted fields.
    assert_eq!(items[0].id, TaskId(1));
    let created = &items[2];
    assert_eq!(created.id, TaskId(3));
    assert_eq!((created.title.as_str(), created.owner.as_str()), ("Review", "cy"));
}

#[tokio::test]
async fn edit_shows_new_title_after_refetch() {
    let tasks = mount_seeded(vec![task(1, "A", "ana")]);
    tasks.settled().await.unwrap();

    tasks.start_edit(TaskId(1)).await.unwrap();
    let patch = TaskPatch {
        id: TaskId(1),
        title: Some("B".into()),
        owner: None,
    };
    assert!(tasks.submit_edit(patch).await.unwrap().is_accepted());

    let state = tasks.settled().await.unwrap();
    assert_eq!(state.phase, ListPhase::Ready(vec![task(1, "B", "ana")]));
    assert_eq!(state.editing, EditSlot::Inactive);
}

#[tokio::test]
async fn confirmed_delete_removes_entity() {
    let tasks = mount_seeded(vec![task(1, "A", "ana"), task(2, "B", "bo")]);
    tasks.settled().await.unwrap();

    let mut prompt = String::new();
    let admission = tasks
        .request_delete(TaskId(2), |text| {
            prompt = text.to_string();
            true
        })
        .await
        .unwrap();
    assert!(admission.is_accepted());
    assert_eq!(prompt, "Are you sure you want to delete this task?");

    let state = tasks.settled().await.unwrap();
    assert_eq!(state.items(), &[task(1, "A", "ana")]);
    assert_eq!(state.deleting_id(), None);
}

#[tokio::test]
async fn competing_edits_are_refused() {
    let tasks = mount_seeded(vec![task(1, "A", "ana"), task(2, "B", "bo")]);
    tasks.settled().await.unwrap();

    assert!(tasks.start_edit(TaskId(1)).await.unwrap().is_accepted());
    assert_eq!(
        tasks.start_edit(TaskId(2)).await.unwrap(),
        Admission::Refused(Refusal::EditInProgress)
    );
    assert_eq!(
        tasks.start_create().await.unwrap(),
        Admission::Refused(Refusal::EditInProgress)
    );

    tasks.cancel_edit().await.unwrap();
    tasks.cancel_edit().await.unwrap();
    let state = tasks.snapshot();
    assert_eq!(state.editing, EditSlot::Inactive);
    assert_eq!(state.items().len(), 2);
}

#[tokio::test]
async fn commands_are_observable_through_subscription() {
    let tasks = mount_seeded(vec![task(1, "A", "ana")]);
    let mut updates = tasks.subscribe();
    tasks.settled().await.unwrap();

    tasks.start_create().await.unwrap();
    updates.changed().await.unwrap();
    assert!(updates.borrow_and_update().is_create_open());
}

#[tokio::test]
async fn late_result_after_teardown_is_discarded() {
    let (client, mut requests) = create_mock_client::<Task>(10);
    let (controller, handle) = EntityListController::new(Arc::new(client), 10);
    tokio::spawn(controller.run());

    let list = expect_list(&mut requests).await.expect("initial list query");
    list.send(Ok(vec![task(1, "A", "ana")])).unwrap();
    handle.settled().await.unwrap();

    handle.start_create().await.unwrap();
    handle
        .submit_create(new_task("Late", "dee"))
        .await
        .unwrap();
    let (_, respond_to) = expect_create(&mut requests).await.expect("create request");

    // Unmount while the create is pending.
    let mut published = handle.subscribe();
    drop(handle);
    while published.changed().await.is_ok() {}
    let before = published.borrow().clone();
    assert_eq!(before.in_flight, Some(MutationKind::Create));

    respond_to.send(Ok(task(2, "Late", "dee"))).unwrap();

    // No refetch is issued; the channel closes once the pending call has finished.
    assert!(requests.recv().await.is_none());
    let after = published.borrow().clone();
    assert_eq!(after.in_flight, Some(MutationKind::Create));
    assert_eq!(after.phase, before.phase);
    assert_eq!(after.create_panel, before.create_panel);
}
