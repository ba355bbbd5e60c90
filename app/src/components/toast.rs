//! Toast notifications for request outcomes.
//!
//! Request-level errors are the calling screen's concern, not the progress
//! bar's; screens surface them here.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

/// Severity of a toast notification.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    /// Confirmation of a completed action — 3 second duration.
    Success,
    /// Failed request or rejected input — 6 second duration.
    Error,
}

#[derive(Clone)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub severity: ToastSeverity,
}

/// Global toast manager. Access via `use_toast()` from any component.
#[derive(Clone, Copy)]
pub struct ToastManager {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u32>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: Signal::new(vec![]),
            next_id: Signal::new(0),
        }
    }

    /// Show a toast. Auto-dismisses after its severity's duration; at most
    /// four are shown at once, oldest dropped first.
    pub fn show(&mut self, message: impl Into<String>, severity: ToastSeverity) {
        let id = *self.next_id.peek();
        *self.next_id.write() += 1;

        {
            let mut toasts = self.toasts.write();
            if toasts.len() >= 4 {
                toasts.remove(0);
            }
            toasts.push(Toast {
                id,
                message: message.into(),
                severity,
            });
        }

        let duration_ms = match severity {
            ToastSeverity::Success => 3000,
            ToastSeverity::Error => 6000,
        };
        let mut toasts = self.toasts;
        spawn(async move {
            TimeoutFuture::new(duration_ms).await;
            toasts.write().retain(|t| t.id != id);
        });
    }

    /// Dismiss a toast before its timer runs out.
    pub fn dismiss(&mut self, id: u32) {
        self.toasts.write().retain(|t| t.id != id);
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the toast provider at the app root.
pub fn use_toast_provider() -> ToastManager {
    use_context_provider(ToastManager::new)
}

/// Get the toast manager from context.
pub fn use_toast() -> ToastManager {
    use_context::<ToastManager>()
}

/// Renders all active toasts. Place once at the end of the main layout.
#[component]
pub fn ToastFrame() -> Element {
    let mut manager = use_toast();
    let toasts = manager.toasts.read();

    rsx! {
        div { class: "toast-container",
            for toast in toasts.iter() {
                div {
                    key: "{toast.id}",
                    class: match toast.severity {
                        ToastSeverity::Success => "toast toast-success",
                        ToastSeverity::Error => "toast toast-error",
                    },
                    span { class: "toast-message", "{toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: {
                            let id = toast.id;
                            move |_| manager.dismiss(id)
                        },
                        "X"
                    }
                }
            }
        }
    }
}
