use lunalink_notify::{AlertId, AlertMessage, AlertSurface};

/// Prints alerts as they appear; dismissal only logs.
pub struct ConsoleAlerts;

impl AlertSurface for ConsoleAlerts {
    fn create_container(&self) {
        tracing::trace!("Alert container created");
    }

    fn render(&self, _id: AlertId, message: &AlertMessage) {
        println!("{} {}", message.severity.icon(), message.text);
    }

    fn begin_exit(&self, id: AlertId) {
        tracing::trace!(id = id.0, "Alert dismissing");
    }

    fn remove(&self, id: AlertId) {
        tracing::trace!(id = id.0, "Alert removed");
    }
}
