//! Notification sink and navigator: the outward-facing collaborators
//! invoked when a plan is accepted.

/// Outcome kind for user-facing notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
}

/// Surface for one-shot user notifications (toasts in the original UI)
pub trait Notifier {
    fn notify(&self, kind: NotifyKind, message: &str);
}

/// Surface for post-create navigation
pub trait Navigator {
    fn navigate(&self, route: &str);
}

/// Console notifier: prints to stdout/stderr by kind
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NotifyKind, message: &str) {
        match kind {
            NotifyKind::Success => println!("[ok] {}", message),
            NotifyKind::Error => eprintln!("[error] {}", message),
        }
    }
}

/// Console navigator: there is no router here, so announce the route
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(route, "navigating");
        println!("-> {}", route);
    }
}
