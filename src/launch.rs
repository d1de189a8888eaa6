//! Launch gateway.

use std::sync::Arc;

use crate::source::Launcher;

#[derive(Clone)]
pub struct LaunchGateway {
    launcher: Arc<dyn Launcher>,
}

impl LaunchGateway {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self { launcher }
    }

    /// Single attempt to start the package's default entry point.
    pub fn launch(&self, package_id: &str) -> bool {
        match self.launcher.start(package_id) {
            Ok(()) => {
                log::info!("launched {}", package_id);
                true
            }
            Err(e) => {
                log::warn!("launch {} failed: {}", package_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryRegistry;
    use crate::source::tests::record;

    #[test]
    fn test_launch_reports_bool() {
        let reg = Arc::new(MemoryRegistry::new());
        reg.add(record("Maps", "com.maps", false));
        reg.add(record("Provider", "com.provider", true));
        reg.set_launchable("com.provider", false);
        let gateway = LaunchGateway::new(reg.clone());

        assert!(gateway.launch("com.maps"));
        assert!(!gateway.launch("com.provider"));
        assert!(!gateway.launch("com.unknown"));
        assert_eq!(reg.launched(), vec!["com.maps"]);
    }
}
