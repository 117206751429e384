//! Tests for the ListEditor facade: gating, message routing, namespaces.

use std::sync::{Arc, Mutex};

use seglist::infrastructure::di::ServiceContainer;
use seglist::infrastructure::traits::{
    AccessDecision, AllowAll, InMemoryCampaignStore, MessageSurface, PermissionGate,
    PersistenceSubmitter, SnapshotNode, SubmitReceipt, TreeLoader, TreeSnapshot,
};
use seglist::infrastructure::TransportError;
use seglist::{
    ApplicationError, AudienceRef, ChangeSet, LabelNamespace, PersistedId, Settings,
};

fn campaign_snapshot() -> TreeSnapshot {
    TreeSnapshot {
        root_id: "root-1".into(),
        label: "Spring Campaign".into(),
        children: vec![SnapshotNode::Segment {
            id: "S1".into(),
            label: "Major donors".into(),
            audience: "aud-1".into(),
        }],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SurfaceEvent {
    LoadError(LabelNamespace, String),
    SaveError(LabelNamespace, String),
    SaveSuccess(LabelNamespace),
}

#[derive(Default)]
struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl MessageSurface for RecordingSurface {
    fn on_load_error(&self, namespace: LabelNamespace, detail: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::LoadError(namespace, detail.to_string()));
    }

    fn on_save_error(&self, namespace: LabelNamespace, detail: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::SaveError(namespace, detail.to_string()));
    }

    fn on_save_success(&self, namespace: LabelNamespace) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::SaveSuccess(namespace));
    }
}

struct DenyAll;

impl PermissionGate for DenyAll {
    fn check_access(&self) -> AccessDecision {
        AccessDecision::Denied {
            reason: "missing campaign edit permission".into(),
        }
    }
}

struct FailingLoader;

impl TreeLoader for FailingLoader {
    fn fetch(&self, _root_id: &PersistedId) -> Result<TreeSnapshot, TransportError> {
        Err(TransportError::Unavailable("backend down".into()))
    }
}

struct FailingSubmitter;

impl PersistenceSubmitter for FailingSubmitter {
    fn submit(&self, _change_set: &ChangeSet) -> Result<SubmitReceipt, TransportError> {
        Err(TransportError::Rejected("validation failed".into()))
    }
}

fn container_with(
    gate: Arc<dyn PermissionGate>,
    loader: Arc<dyn TreeLoader>,
    submitter: Arc<dyn PersistenceSubmitter>,
    surface: Arc<RecordingSurface>,
    settings: Settings,
) -> ServiceContainer {
    ServiceContainer::new(settings, gate, loader, submitter, surface)
}

#[test]
fn given_denied_gate_when_initializing_then_core_is_not_constructed() {
    let backend = Arc::new(InMemoryCampaignStore::new(campaign_snapshot()));
    let surface = Arc::new(RecordingSurface::default());
    let container = container_with(
        Arc::new(DenyAll),
        backend.clone(),
        backend,
        surface.clone(),
        Settings::default(),
    );

    let err = container.open_editor(&PersistedId::new("root-1")).unwrap_err();
    assert!(matches!(err, ApplicationError::AccessDenied { .. }));
    // Denied access is not a message-surface concern.
    assert!(surface.events().is_empty());
}

#[test]
fn given_failing_loader_when_initializing_then_load_error_is_surfaced() {
    let backend = Arc::new(InMemoryCampaignStore::new(campaign_snapshot()));
    let surface = Arc::new(RecordingSurface::default());
    let container = container_with(
        Arc::new(AllowAll),
        Arc::new(FailingLoader),
        backend,
        surface.clone(),
        Settings::default(),
    );

    let err = container.open_editor(&PersistedId::new("root-1")).unwrap_err();
    assert!(matches!(err, ApplicationError::LoadFailed { .. }));

    let events = surface.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        SurfaceEvent::LoadError(namespace, detail) => {
            assert_eq!(*namespace, LabelNamespace::Default);
            assert!(detail.contains("backend down"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn given_successful_save_when_saving_then_success_is_surfaced() {
    let backend = Arc::new(InMemoryCampaignStore::new(campaign_snapshot()));
    let surface = Arc::new(RecordingSurface::default());
    let container = container_with(
        Arc::new(AllowAll),
        backend.clone(),
        backend,
        surface.clone(),
        Settings::default(),
    );

    let mut editor = container.open_editor(&PersistedId::new("root-1")).unwrap();
    let root = editor.root().unwrap();
    let group = editor.add_group(root, "New group").unwrap();
    editor
        .add_segment(group, "New seg", AudienceRef::new("aud-9"))
        .unwrap();
    editor.save().unwrap();

    assert_eq!(
        surface.events(),
        vec![SurfaceEvent::SaveSuccess(LabelNamespace::Default)]
    );
}

#[test]
fn given_failing_submitter_when_saving_then_error_is_surfaced_with_namespace() {
    let backend = Arc::new(InMemoryCampaignStore::new(campaign_snapshot()));
    let surface = Arc::new(RecordingSurface::default());
    let settings = Settings {
        namespace: LabelNamespace::Alternate,
    };
    let container = container_with(
        Arc::new(AllowAll),
        backend,
        Arc::new(FailingSubmitter),
        surface.clone(),
        settings,
    );

    let mut editor = container.open_editor(&PersistedId::new("root-1")).unwrap();
    let root = editor.root().unwrap();
    editor.add_group(root, "Pending group").unwrap();

    let err = editor.save().unwrap_err();
    assert!(matches!(err, ApplicationError::SaveFailed { .. }));

    let events = surface.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        SurfaceEvent::SaveError(namespace, detail) => {
            assert_eq!(*namespace, LabelNamespace::Alternate);
            assert!(detail.contains("validation failed"));
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // The pending edit survives for a retry through the same facade.
    assert_eq!(editor.tree().unwrap().len(), 3);
}

#[test]
fn given_deleted_segment_when_saved_then_next_session_sees_reconciled_tree() {
    let backend = Arc::new(InMemoryCampaignStore::new(campaign_snapshot()));
    let surface = Arc::new(RecordingSurface::default());
    let container = container_with(
        Arc::new(AllowAll),
        backend.clone(),
        backend.clone(),
        surface,
        Settings::default(),
    );

    let mut editor = container.open_editor(&PersistedId::new("root-1")).unwrap();
    let seg = editor
        .tree()
        .unwrap()
        .find_assigned(&PersistedId::new("S1"))
        .unwrap();
    editor.delete_node(seg).unwrap();
    editor.save().unwrap();

    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].deletes.len(), 1);
    assert_eq!(submissions[0].deletes[0].id, PersistedId::new("S1"));
}
