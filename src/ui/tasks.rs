//! Background tasks used by the UI for scanning the catalog, building details
//! and launching apps without blocking the UI thread.

use std::thread;

use crate::catalog::build_catalog;
use crate::types::{ProgressUpdate, TaskKind};

use super::{AppInspectorApp, Services};

/// Spawn a background task to rebuild the catalog.
///
/// The store hands out a ticket first, so a slower earlier scan finishing
/// after this one is discarded instead of overwriting it.
pub fn spawn_refresh_apps(services: &Services) {
    let ticket = services.store.begin_refresh();
    let store = services.store.clone();
    let inspector = services.inspector.clone();
    let tx = services.progress_tx.clone();
    let _ = tx.send(ProgressUpdate::started(
        TaskKind::RefreshApps,
        "Scanning installed applications...",
    ));

    thread::spawn(move || {
        let result = build_catalog(&inspector);
        let update = match &result {
            Ok(list) => ProgressUpdate::done(TaskKind::RefreshApps, format!("Found {} applications.", list.len())),
            Err(e) => ProgressUpdate::failed(TaskKind::RefreshApps, "Refresh failed.", format!("Refresh apps failed: {}", e)),
        };
        if store.complete_refresh(ticket, result) {
            let _ = tx.send(update);
        }
    });
}

/// Spawn a background task to build the detail record for one package.
pub fn spawn_load_detail(services: &Services, package_id: &str) {
    let ticket = services.detail.begin(package_id);
    let slot = services.detail.clone();
    let details = services.details.clone();
    let tx = services.progress_tx.clone();
    let package_id = package_id.to_string();
    let kind = TaskKind::LoadDetail(package_id.clone());
    let _ = tx.send(ProgressUpdate::started(
        kind.clone(),
        format!("Loading details for {}...", package_id),
    ));

    thread::spawn(move || {
        let detail = details.build_detail(&package_id);
        let update = match &detail {
            Some(d) => ProgressUpdate::done(kind, format!("Loaded details for {}.", d.app.display_name)),
            None => ProgressUpdate::failed(
                kind,
                "Failed to load app details.",
                format!("{} is no longer available", package_id),
            ),
        };
        if slot.complete(ticket, detail) {
            let _ = tx.send(update);
        }
    });
}

/// Close the detail view. A build still in flight for it is dropped on completion.
pub fn close_detail(app: &AppInspectorApp) {
    app.services.detail.clear();
    let mut s = app.state.lock().unwrap();
    s.show_all_permissions = false;
    s.show_all_activities = false;
}

/// Spawn a launch request; the outcome arrives on the progress channel.
pub fn spawn_launch(services: &Services, package_id: &str) {
    let gateway = services.gateway.clone();
    let tx = services.progress_tx.clone();
    let package_id = package_id.to_string();

    thread::spawn(move || {
        let kind = TaskKind::Launch(package_id.clone());
        let update = if gateway.launch(&package_id) {
            ProgressUpdate::done(kind, format!("Launched {}.", package_id))
        } else {
            ProgressUpdate::failed(kind, "Launch failed.", format!("Cannot launch {}", package_id))
        };
        let _ = tx.send(update);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::source::MemoryRegistry;
    use crate::source::tests::record;
    use crate::store::{DetailView, LoadPhase};
    use crate::ui::AppInspectorApp;
    use std::sync::Arc;
    use std::time::Duration;

    fn wait_finished(app: &AppInspectorApp, kind: &TaskKind) -> ProgressUpdate {
        let state = app.state.lock().unwrap();
        loop {
            let update = state
                .progress_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("task did not report");
            if update.finished && &update.kind == kind {
                return update;
            }
        }
    }

    fn app_with(reg: &Arc<MemoryRegistry>) -> AppInspectorApp {
        let config = Config {
            show_system_apps: false,
            ..Config::default()
        };
        AppInspectorApp::new(&config, reg.clone(), reg.clone())
    }

    #[test]
    fn test_initial_refresh_populates_store() {
        let reg = Arc::new(MemoryRegistry::new());
        reg.add(record("Zoo", "com.zoo", false));
        reg.add(record("App", "com.app", true));
        let app = app_with(&reg);

        let update = wait_finished(&app, &TaskKind::RefreshApps);
        assert!(update.error.is_none());
        let snap = app.services.store.snapshot();
        assert_eq!(snap.phase, LoadPhase::Loaded);
        assert_eq!(snap.full_catalog.len(), 2);
        assert_eq!(snap.filtered_view.len(), 1);
    }

    #[test]
    fn test_failed_refresh_reports_error() {
        let reg = Arc::new(MemoryRegistry::new());
        reg.set_registry_error(Some("offline"));
        let app = app_with(&reg);

        let update = wait_finished(&app, &TaskKind::RefreshApps);
        assert!(update.error.unwrap().contains("offline"));
        assert_eq!(app.services.store.snapshot().phase, LoadPhase::Errored);
    }

    #[test]
    fn test_detail_and_launch() {
        let reg = Arc::new(MemoryRegistry::new());
        reg.add(record("Maps", "com.maps", false));
        let app = app_with(&reg);
        wait_finished(&app, &TaskKind::RefreshApps);

        spawn_load_detail(&app.services, "com.maps");
        wait_finished(&app, &TaskKind::LoadDetail("com.maps".into()));
        assert!(matches!(app.services.detail.view(), DetailView::Ready(_)));

        spawn_load_detail(&app.services, "com.gone");
        let update = wait_finished(&app, &TaskKind::LoadDetail("com.gone".into()));
        assert!(update.error.is_some());
        assert!(matches!(app.services.detail.view(), DetailView::Missing(_)));

        spawn_launch(&app.services, "com.maps");
        let update = wait_finished(&app, &TaskKind::Launch("com.maps".into()));
        assert!(update.error.is_none());
        assert_eq!(reg.launched(), vec!["com.maps"]);
    }

    #[test]
    fn test_close_drops_inflight_detail() {
        let reg = Arc::new(MemoryRegistry::new());
        reg.add(record("Maps", "com.maps", false));
        let app = app_with(&reg);
        wait_finished(&app, &TaskKind::RefreshApps);
        app.state.lock().unwrap().show_all_permissions = true;

        let ticket = app.services.detail.begin("com.maps");
        assert!(matches!(app.services.detail.view(), DetailView::Loading(_)));
        close_detail(&app);
        assert!(matches!(app.services.detail.view(), DetailView::Empty));
        assert!(!app.state.lock().unwrap().show_all_permissions);

        let late = app.services.details.build_detail("com.maps");
        assert!(late.is_some());
        assert!(!app.services.detail.complete(ticket, late));
        assert!(matches!(app.services.detail.view(), DetailView::Empty));
    }

    #[test]
    fn test_close_after_ready_empties_view() {
        let reg = Arc::new(MemoryRegistry::new());
        reg.add(record("Maps", "com.maps", false));
        let app = app_with(&reg);
        wait_finished(&app, &TaskKind::RefreshApps);

        spawn_load_detail(&app.services, "com.maps");
        wait_finished(&app, &TaskKind::LoadDetail("com.maps".into()));
        close_detail(&app);
        assert!(matches!(app.services.detail.view(), DetailView::Empty));
    }

    #[test]
    fn test_refresh_supersedes_inflight_scan() {
        let reg = Arc::new(MemoryRegistry::new());
        reg.add(record("Maps", "com.maps", false));
        let app = app_with(&reg);
        wait_finished(&app, &TaskKind::RefreshApps);

        // a scan still running when the user asks for another one
        let stale = app.services.store.begin_refresh();
        assert!(app.services.store.snapshot().is_loading());
        reg.add(record("Notes", "com.notes", false));
        spawn_refresh_apps(&app.services);
        wait_finished(&app, &TaskKind::RefreshApps);

        assert!(!app.services.store.complete_refresh(stale, Ok(Vec::new())));
        let snap = app.services.store.snapshot();
        assert_eq!(snap.phase, LoadPhase::Loaded);
        assert_eq!(snap.full_catalog.len(), 2);
        assert_eq!(snap.filtered_view.len(), 2);
    }
}
