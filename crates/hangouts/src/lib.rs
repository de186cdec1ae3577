//! # PourPal Hangouts Crate
//!
//! Room membership authorization. The hangout and participant rows are
//! owned by the hangout collaborator; this crate only reads them, at
//! connection time and on history requests.

use pourpal_database::HangoutRepository;
use sqlx::SqlitePool;
use tracing::warn;

/// Authorizes identities against a hangout's participant set.
///
/// Fails closed: a missing hangout, missing membership row, or any store
/// error answers "not authorized" rather than propagating into the
/// connection handshake.
pub struct ParticipantGuard {
    hangouts: HangoutRepository,
}

impl ParticipantGuard {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            hangouts: HangoutRepository::new(pool),
        }
    }

    /// Whether the user may join the hangout's chat room.
    pub async fn authorize(&self, user_id: i64, hangout_id: i64) -> bool {
        match self.hangouts.exists(hangout_id).await {
            Ok(true) => {}
            Ok(false) => return false,
            Err(error) => {
                warn!(%error, hangout_id, "hangout lookup failed, denying access");
                return false;
            }
        }

        match self.hangouts.is_participant(hangout_id, user_id).await {
            Ok(is_participant) => is_participant,
            Err(error) => {
                warn!(%error, hangout_id, user_id, "participant lookup failed, denying access");
                false
            }
        }
    }

    /// Whether the hangout exists at all.
    pub async fn hangout_exists(&self, hangout_id: i64) -> bool {
        match self.hangouts.exists(hangout_id).await {
            Ok(exists) => exists,
            Err(error) => {
                warn!(%error, hangout_id, "hangout lookup failed");
                false
            }
        }
    }
}
