//! Page-context half of the assistant: locates the targeted field and its
//! surrounding context regions, and writes generated text back in a way the
//! host page's framework observes.

pub mod client;
pub mod dom;
pub mod injector;
pub mod locator;
pub mod page;

pub use client::{OperationOutcome, PageClient, PageClientError, PageSession, SharedPage};
pub use dom::{Document, Element, ElementKind, FieldEvent, NodeHandle};
pub use locator::FieldLocator;
pub use page::{Notification, NotificationKind, Page, PendingIndicator};
