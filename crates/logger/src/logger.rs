// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Addr, Context, Handler};
use hush_events::{Event, EventBus, LedgerEvent, Subscribe};
use std::marker::PhantomData;
use tracing::{error, info};

pub trait EventLogging: Event {
    fn log(&self, logger_name: &str);
}

/// Logs everything that crosses the bus
pub struct SimpleLogger<E: EventLogging> {
    name: String,
    _p: PhantomData<E>,
}

impl<E: EventLogging> SimpleLogger<E> {
    pub fn attach(name: &str, bus: Addr<EventBus<E>>) -> Addr<Self> {
        let addr = Self {
            name: name.to_owned(),
            _p: PhantomData,
        }
        .start();
        bus.do_send(Subscribe::<E>::new("*", addr.clone().recipient()));
        info!(node=%name, "READY!");
        addr
    }
}

impl<E: EventLogging> Actor for SimpleLogger<E> {
    type Context = Context<Self>;
}

impl<E: EventLogging> Handler<E> for SimpleLogger<E> {
    type Result = ();

    fn handle(&mut self, msg: E, _: &mut Self::Context) -> Self::Result {
        msg.log(&self.name);
    }
}

impl EventLogging for LedgerEvent {
    fn log(&self, logger_name: &str) {
        match self {
            LedgerEvent::LedgerError { .. } => error!(me = logger_name, event = %self, "ERROR!"),
            _ => match self.get_batch_id() {
                Some(batch_id) => {
                    info!(me = logger_name, evt = %self, batch_id = %batch_id, "Event Broadcasted")
                }
                None => info!(me = logger_name, evt = %self, "Event Broadcasted"),
            },
        }
    }
}
