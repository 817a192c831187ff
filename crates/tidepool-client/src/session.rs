use tracing::debug;

use tidepool_proto::Cursor;

use crate::error::ClientResult;
use crate::transport::ChatTransport;

/// Owns the synchronization position for one client session.
///
/// The cursor starts undefined; [`ChatSession::bootstrap`] is the only way
/// to obtain a session, so a constructed session always holds a valid
/// starting point and never replays history. The cursor is read when a pull
/// request is built and written when its reply is handled; the poll engine
/// owns the session, so there is exactly one writer.
#[derive(Debug)]
pub struct ChatSession {
    cursor: Cursor,
}

impl ChatSession {
    /// One-shot cursor initialization against the start endpoint.
    ///
    /// There is no retry here: a bootstrap failure is terminal for the
    /// session and polling must not start.
    pub async fn bootstrap<T: ChatTransport + ?Sized>(transport: &T) -> ClientResult<Self> {
        let cursor = transport.bootstrap().await?;
        debug!(target: "tidepool.session", %cursor, "session bootstrapped");
        Ok(Self { cursor })
    }

    #[cfg(test)]
    pub(crate) fn with_cursor(cursor: Cursor) -> Self {
        Self { cursor }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Advances the cursor, ignoring anything that would move it backwards.
    /// Returns whether the cursor actually moved. Servers echo the current
    /// cursor on idle replies, which lands here as a no-op.
    pub fn advance(&mut self, next: Cursor) -> bool {
        if next > self.cursor {
            self.cursor = next;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_forward() {
        let mut session = ChatSession::with_cursor(Cursor::new(1));
        assert!(session.advance(Cursor::new(4)));
        assert_eq!(session.cursor(), Cursor::new(4));
    }

    #[test]
    fn advance_ignores_equal_cursor() {
        let mut session = ChatSession::with_cursor(Cursor::new(4));
        assert!(!session.advance(Cursor::new(4)));
        assert_eq!(session.cursor(), Cursor::new(4));
    }

    #[test]
    fn advance_never_moves_backwards() {
        let mut session = ChatSession::with_cursor(Cursor::new(4));
        assert!(!session.advance(Cursor::new(2)));
        assert_eq!(session.cursor(), Cursor::new(4));
    }
}
