//! Desktop notifications through the platform notification service.

use lilytimer_core::{NotificationDispatcher, NotificationRequest, NotifyError};
use notify_rust::Notification;
use tracing::{debug, warn};

const APP_NAME: &str = "LilyTimer";

/// Shows each request as a desktop notification.
///
/// Delivery happens on a short-lived thread so a slow notification daemon
/// never holds up the session; delivery errors are logged there.
#[derive(Debug, Default)]
pub struct DesktopDispatcher;

impl NotificationDispatcher for DesktopDispatcher {
    fn dispatch(&mut self, request: &NotificationRequest) -> Result<(), NotifyError> {
        let title = request.title.clone();
        let body = request.body.clone();
        std::thread::Builder::new()
            .name("lilytimer-notify".into())
            .spawn(move || {
                match Notification::new()
                    .appname(APP_NAME)
                    .summary(&title)
                    .body(&body)
                    .show()
                {
                    Ok(_) => debug!(%title, "desktop notification shown"),
                    Err(e) => warn!(%title, "desktop notification failed: {e}"),
                }
            })
            .map(|_| ())
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))
    }
}
