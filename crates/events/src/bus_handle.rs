// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Addr, Recipient};
use derivative::Derivative;
use tracing::error;

use crate::{
    traits::{ErrorDispatcher, EventPublisher, EventSubscriber},
    ErrorEvent, EventBus, HistoryCollector, LedgerErrorType, LedgerEvent, Subscribe,
};

/// Cloneable handle to the node's event bus.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct BusHandle {
    #[derivative(Debug = "ignore")]
    bus: Addr<EventBus<LedgerEvent>>,
}

impl BusHandle {
    pub fn new(bus: Addr<EventBus<LedgerEvent>>) -> Self {
        Self { bus }
    }

    /// Start a fresh bus and return a handle to it
    pub fn start() -> Self {
        Self::new(EventBus::<LedgerEvent>::new().start())
    }

    pub fn history(&self) -> Addr<HistoryCollector<LedgerEvent>> {
        EventBus::<LedgerEvent>::history(&self.bus)
    }

    pub fn errors(&self) -> Addr<HistoryCollector<LedgerEvent>> {
        EventBus::<LedgerEvent>::error(&self.bus)
    }

    pub fn bus(&self) -> &Addr<EventBus<LedgerEvent>> {
        &self.bus
    }
}

impl From<Addr<EventBus<LedgerEvent>>> for BusHandle {
    fn from(value: Addr<EventBus<LedgerEvent>>) -> Self {
        Self::new(value)
    }
}

impl EventPublisher<LedgerEvent> for BusHandle {
    type Data = LedgerEvent;

    fn publish(&self, data: impl Into<Self::Data>) {
        self.bus.do_send(data.into());
    }

    fn naked_dispatch(&self, event: LedgerEvent) {
        self.bus.do_send(event);
    }
}

impl ErrorDispatcher<LedgerEvent> for BusHandle {
    fn err(&self, err_type: LedgerErrorType, error: impl Into<anyhow::Error>) {
        let error = error.into();
        error!(?err_type, "{error}");
        self.bus.do_send(LedgerEvent::from_error(err_type, error));
    }
}

impl EventSubscriber<LedgerEvent> for BusHandle {
    fn subscribe(&self, event_type: &str, recipient: Recipient<LedgerEvent>) {
        self.bus.do_send(Subscribe::new(event_type, recipient))
    }

    fn subscribe_all(&self, event_types: &[&str], recipient: Recipient<LedgerEvent>) {
        for event_type in event_types {
            self.subscribe(event_type, recipient.clone());
        }
    }
}
