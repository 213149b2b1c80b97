#![deny(warnings)]

//! Share-summary plumbing: format the sales summary and hand it to whatever
//! the host offers for sending plain text.

use dessert_store::SaleState;
use std::io::Write;
use thiserror::Error;
use tracing::{info, warn};

/// No target was able to take the shared text.
///
/// The display text is the notice shown to the user.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("Sharing not available")]
pub struct NoHandlerError;

/// Anything that can send a plain-text message on the user's behalf.
pub trait ShareTarget {
    fn share(&mut self, text: &str) -> Result<(), NoHandlerError>;
}

/// Human-readable summary of a session.
pub fn share_text(desserts_sold: u64, revenue: u64) -> String {
    format!("Hi! I've sold {desserts_sold} desserts for a total revenue of ${revenue}!")
}

/// Share the summary of `state` through `target`. State is never modified.
pub fn share_summary<T: ShareTarget + ?Sized>(
    target: &mut T,
    state: &SaleState,
) -> Result<(), NoHandlerError> {
    let text = share_text(state.desserts_sold, state.revenue);
    match target.share(&text) {
        Ok(()) => {
            info!(sold = state.desserts_sold, revenue = state.revenue, "summary shared");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "no share handler available");
            Err(e)
        }
    }
}

/// Writes shared text as a line to an output stream.
pub struct WriterTarget<W: Write> {
    out: W,
}

impl<W: Write> WriterTarget<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ShareTarget for WriterTarget<W> {
    fn share(&mut self, text: &str) -> Result<(), NoHandlerError> {
        writeln!(self.out, "{text}")
            .and_then(|_| self.out.flush())
            .map_err(|e| {
                warn!(error = %e, "share stream rejected text");
                NoHandlerError
            })
    }
}

/// Host with nothing registered to receive shares.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl ShareTarget for Unavailable {
    fn share(&mut self, _text: &str) -> Result<(), NoHandlerError> {
        Err(NoHandlerError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dessert_core::dessert_catalog;
    use dessert_store::SaleStateStore;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn text_mentions_count_and_revenue() {
        assert_eq!(
            share_text(6, 35),
            "Hi! I've sold 6 desserts for a total revenue of $35!"
        );
    }

    #[test]
    fn writer_target_receives_summary() {
        let mut store = SaleStateStore::new(dessert_catalog());
        for _ in 0..6 {
            store.sell();
        }
        let mut target = WriterTarget::new(Vec::new());
        share_summary(&mut target, store.state()).unwrap();
        let out = String::from_utf8(target.into_inner()).unwrap();
        assert_eq!(out, "Hi! I've sold 6 desserts for a total revenue of $35!\n");
    }

    #[test]
    fn missing_handler_is_reported_and_state_kept() {
        let mut store = SaleStateStore::new(dessert_catalog());
        store.sell();
        let before = store.snapshot();
        let err = share_summary(&mut Unavailable, store.state()).unwrap_err();
        assert_eq!(err.to_string(), "Sharing not available");
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn failing_stream_maps_to_no_handler() {
        let mut target = WriterTarget::new(Broken);
        assert_eq!(target.share("x"), Err(NoHandlerError));
    }
}
