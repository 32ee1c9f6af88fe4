//! The two-phase payment flow: initiate (issue a session, deliver the token) and confirm (verify
//! the token, debit the wallet).

use std::fmt::Debug;

use chrono::{Duration, Utc};
use log::*;
use pwg_common::Money;

use crate::{
    db_types::{PendingSession, SessionId, TokenCode},
    events::{EventProducers, PaymentConfirmedEvent, TokenDeliveryFailedEvent},
    helpers::{new_session_id, new_token_code},
    traits::{ClientManagement, NotificationError, TokenNotifier, WalletLedger, WalletLedgerError},
};

/// How long an issued token stays valid.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 300;

/// `PaymentFlowApi` drives the payment protocol. It is stateless between calls; every durable
/// piece of a payment attempt lives on the wallet record itself.
///
/// A payment attempt moves `initiated -> confirmed`, or dies on the way: an expired or mismatched
/// token is terminal for the attempt (the caller must re-initiate), while a short balance leaves
/// the session pending so the caller may retry with a smaller amount before expiry.
pub struct PaymentFlowApi<B, N> {
    db: B,
    notifier: N,
    producers: EventProducers,
    token_ttl: Duration,
}

impl<B, N> Debug for PaymentFlowApi<B, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B, N> PaymentFlowApi<B, N> {
    pub fn new(db: B, notifier: N, producers: EventProducers) -> Self {
        Self { db, notifier, producers, token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS) }
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}

impl<B, N> PaymentFlowApi<B, N>
where
    B: ClientManagement + WalletLedger,
    N: TokenNotifier,
{
    /// Starts a payment attempt for the client identified by (document, phone).
    ///
    /// Mints a fresh session (one-time token, session id, expiry) and writes it onto the wallet,
    /// overwriting any previous session - only the newest token is ever valid. The token travels
    /// to the client through the notifier only; the caller gets the session id and nothing else.
    ///
    /// The notifier runs after the session is persisted and holds no wallet resource. If delivery
    /// fails the session remains valid: the failure is logged and published on the
    /// `token_delivery_failed` hook, and the caller still receives the session id.
    ///
    /// `amount` is accepted for symmetry with the confirmation call but is not pinned to the
    /// session; the amount presented at confirmation is authoritative.
    pub async fn initiate_payment(
        &self,
        document: &str,
        phone: &str,
        amount: Money,
    ) -> Result<SessionId, WalletLedgerError> {
        let client = self
            .db
            .fetch_client_by_document_and_phone(document, phone)
            .await
            .map_err(WalletLedgerError::from)?
            .ok_or(WalletLedgerError::ClientNotFound)?;
        let session = PendingSession {
            session_id: new_session_id(),
            token: new_token_code(),
            expires_at: Utc::now() + self.token_ttl,
        };
        self.db.write_session(client.id, &session).await?;
        debug!(
            "🔄️💳️ Payment of {amount} initiated for {document}. Session {} expires at {}",
            session.session_id, session.expires_at
        );
        if let Err(e) = self.notifier.send_token(&client.email, &session.token, &session.session_id).await {
            warn!("🔄️📧️ Token delivery to {} failed. The session remains valid. {e}", client.email);
            self.publish_delivery_failure(&client.email, &session.session_id, &e).await;
        }
        Ok(session.session_id)
    }

    /// Completes a payment attempt: verifies the (session id, token) pair against the wallet's
    /// pending session, then debits `amount` and clears the session in one mutation.
    ///
    /// * [`WalletLedgerError::InvalidOrExpiredToken`] - no wallet matches session id, token and
    ///   expiry all at once. A wrong token and a stale token are deliberately indistinguishable.
    /// * [`WalletLedgerError::WalletNotFound`] - the session was consumed between verification
    ///   and debit (e.g. by a concurrent duplicate confirmation).
    /// * [`WalletLedgerError::InsufficientFunds`] - balance too low; the session stays pending.
    pub async fn confirm_payment(
        &self,
        session_id: &SessionId,
        token: &TokenCode,
        amount: Money,
    ) -> Result<Money, WalletLedgerError> {
        if !amount.is_positive() {
            return Err(WalletLedgerError::NonPositiveAmount(amount));
        }
        let wallet = self
            .db
            .fetch_wallet_by_live_session(session_id, token, Utc::now())
            .await?
            .ok_or(WalletLedgerError::InvalidOrExpiredToken)?;
        let new_balance = self.db.debit_wallet(session_id, amount).await?;
        debug!("🔄️✅️ Session {session_id} confirmed. Debited {amount}, new balance {new_balance}");
        self.publish_confirmation(wallet.client_id, session_id, amount, new_balance).await;
        Ok(new_balance)
    }

    async fn publish_confirmation(
        &self,
        client_id: i64,
        session_id: &SessionId,
        amount: Money,
        new_balance: Money,
    ) {
        for emitter in &self.producers.payment_confirmed_producer {
            trace!("🔄️📬️ Notifying payment confirmation subscribers");
            let event = PaymentConfirmedEvent::new(client_id, session_id.clone(), amount, new_balance);
            emitter.publish_event(event).await;
        }
    }

    async fn publish_delivery_failure(&self, email: &str, session_id: &SessionId, error: &NotificationError) {
        for emitter in &self.producers.token_delivery_failed_producer {
            trace!("🔄️📬️ Notifying token delivery failure subscribers");
            let event =
                TokenDeliveryFailedEvent::new(email.to_string(), session_id.clone(), error.to_string());
            emitter.publish_event(event).await;
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
