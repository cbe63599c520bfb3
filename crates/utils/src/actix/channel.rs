// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Context, Handler, Message, Recipient};
use tokio::sync::mpsc;

pub struct Mpsc<M>(mpsc::Sender<M>);

impl<M> Actor for Mpsc<M>
where
    M: Message<Result = ()> + Send + 'static,
{
    type Context = Context<Self>;
}

impl<M> Handler<M> for Mpsc<M>
where
    M: Message<Result = ()> + Send + 'static,
{
    type Result = ();

    fn handle(&mut self, m: M, _: &mut Context<Self>) -> Self::Result {
        let _ = self.0.try_send(m);
    }
}

/// Return a bounded mpsc channel whose sending half is an actix Recipient.
/// Messages are dropped when the buffer is full.
pub fn mpsc<M>(buffer: usize) -> (Recipient<M>, mpsc::Receiver<M>)
where
    M: Message<Result = ()> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(buffer);
    (Mpsc(tx).start().recipient(), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Message, Debug, PartialEq)]
    #[rtype(result = "()")]
    struct Ping(u8);

    #[actix::test]
    async fn mpsc_delivers_in_order() {
        let (tx, mut rx) = mpsc::<Ping>(8);
        tx.do_send(Ping(1));
        tx.do_send(Ping(2));
        assert_eq!(rx.recv().await.unwrap(), Ping(1));
        assert_eq!(rx.recv().await.unwrap(), Ping(2));
    }
}
