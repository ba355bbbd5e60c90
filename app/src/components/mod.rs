//! UI Components
//!
//! One module per panel or modal; shared context managers (progress, toasts,
//! product form) live beside the components that render them.

pub mod dashboard;
pub mod image_search;
pub mod product_card;
pub mod product_form;
pub mod progress;
pub mod toast;

pub use dashboard::DashboardPage;
pub use progress::{GlobalProgressBar, ProgressManager, use_progress, use_progress_provider};
pub use toast::{ToastFrame, ToastManager, ToastSeverity, use_toast, use_toast_provider};
