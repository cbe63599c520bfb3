// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Message, Recipient};
use std::fmt::Display;
use std::hash::Hash;

/// Trait that must be implemented by events used with EventBus
pub trait Event:
    Message<Result = ()> + Clone + Display + Send + Sync + Unpin + Sized + 'static
{
    type Id: Hash + Eq + Clone + Unpin + Send + Sync + Display;

    fn event_type(&self) -> String;
    fn event_id(&self) -> Self::Id;
}

/// Trait for events that can carry an error
pub trait ErrorEvent: Event {
    type Error;
    type ErrorType;

    fn as_error(&self) -> Option<&Self::Error>;
    fn from_error(err_type: Self::ErrorType, error: impl Into<anyhow::Error>) -> Self;
}

/// Publish event payloads on an underlying bus
pub trait EventPublisher<E: Event> {
    type Data;

    fn publish(&self, data: impl Into<Self::Data>);
    /// Dispatch an already constructed event
    fn naked_dispatch(&self, event: E);
}

/// Dispatch errors to an underlying bus
pub trait ErrorDispatcher<E: ErrorEvent> {
    fn err(&self, err_type: E::ErrorType, error: impl Into<anyhow::Error>);
}

/// Subscribe recipients to events by type name. `"*"` matches every event.
pub trait EventSubscriber<E: Event> {
    fn subscribe(&self, event_type: &str, recipient: Recipient<E>);
    fn subscribe_all(&self, event_types: &[&str], recipient: Recipient<E>);
}
