//! Session orchestrator implementation

use std::sync::Arc;

use tracing::{debug, warn};

use sp_shared::masking::{mask_email, mask_token};

use crate::domain::entities::account::{Account, AccountStatus};
use crate::domain::entities::sign_attempt::SignOutcome;
use crate::domain::entities::verification::VerificationChannel;
use crate::domain::value_objects::{
    BlacklistReason, Claims, SessionTokens, TokenPurpose, Versioned, ROLE_ADMIN,
};
use crate::errors::{CredentialError, DomainError, DomainResult, SignError, TokenError};
use crate::repositories::{
    AccountRepository, KeyValueCache, SignAttemptRepository, VerificationRepository,
};
use crate::services::cipher::ClaimCipher;
use crate::services::credential::{CredentialCodec, CredentialKind};
use crate::services::sign_attempt::{SignAttemptTracker, TrackerConfig};
use crate::services::token::{
    PasswordConfirmPayload, PasswordResetPayload, SignupPayload, TokenStore, VerificationPayload,
};
use crate::services::verification::VerificationGate;

use super::config::SessionServiceConfig;

/// Outcome of authenticating a request's credential pair
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    /// The presented access credential is valid as-is
    Authorized(Claims),

    /// The access credential was replaced by a silent refresh; the caller
    /// must hand the new pair back to the client
    Rotated {
        claims: Claims,
        tokens: SessionTokens,
    },
}

impl AccessDecision {
    /// Claims of the authenticated holder, whichever way they were obtained
    pub fn claims(&self) -> &Claims {
        match self {
            Self::Authorized(claims) => claims,
            Self::Rotated { claims, .. } => claims,
        }
    }
}

/// Orchestrates every sign-in, sign-out and account-lifecycle flow
///
/// This is the only component that calls the others: the codec mints and
/// validates signed credentials, the store keeps opaque tokens, the gate
/// proves channel ownership and the tracker feeds the lockout. Handlers
/// talk to this service and to nothing below it.
pub struct SessionService<A, S, V, C>
where
    A: AccountRepository,
    S: SignAttemptRepository,
    V: VerificationRepository,
    C: KeyValueCache,
{
    accounts: Arc<A>,
    store: TokenStore<C>,
    codec: Arc<CredentialCodec>,
    gate: VerificationGate<V>,
    tracker: SignAttemptTracker<S>,
    config: SessionServiceConfig,
}

impl<A, S, V, C> SessionService<A, S, V, C>
where
    A: AccountRepository,
    S: SignAttemptRepository,
    V: VerificationRepository,
    C: KeyValueCache,
{
    /// Creates the orchestrator over its four ports
    pub fn new(
        accounts: Arc<A>,
        attempts: Arc<S>,
        verifications: Arc<V>,
        cache: Arc<C>,
        codec: Arc<CredentialCodec>,
        cipher: Arc<ClaimCipher>,
        config: SessionServiceConfig,
    ) -> Self {
        let tracker = SignAttemptTracker::with_config(
            attempts,
            TrackerConfig {
                max_unresolved_failures: config.max_unresolved_failures,
            },
        );
        Self {
            accounts,
            store: TokenStore::new(cache, cipher),
            codec,
            gate: VerificationGate::new(verifications),
            tracker,
            config,
        }
    }

    /// Signs an account in with email and password
    ///
    /// Issues an access/refresh pair and registers the refresh value. A
    /// successful sign-in resolves every prior unresolved failure in the
    /// same transaction as its own attempt record.
    ///
    /// # Errors
    ///
    /// * `SignError::MismatchCredentials` - Unknown email or wrong password;
    ///   the two are indistinguishable to the caller
    /// * `SignError::TooManyFailures` - Unresolved failures reached the
    ///   threshold; the account was suspended
    /// * `SignError::StatusStay` / `StatusStop` / `StatusDelete` - Account
    ///   status rejects sign-in
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        client_ip: &str,
    ) -> DomainResult<SessionTokens> {
        debug!(email = %mask_email(email), client_ip, "sign-in requested");

        // Unknown email records the same failure class as a bad password so
        // the attempt log and the response both resist enumeration. Without
        // an account there is nothing to count against.
        let Some(account) = self.accounts.find_by_email(email).await? else {
            self.tracker
                .record(None, SignOutcome::InvalidPassword, client_ip, Some("unknown email"))
                .await;
            return Err(SignError::MismatchCredentials { count: 0 }.into());
        };

        let blocked = match account.status {
            AccountStatus::Active => None,
            AccountStatus::Stay => Some((SignOutcome::AccountStay, SignError::StatusStay)),
            AccountStatus::Stop => Some((SignOutcome::AccountStop, SignError::StatusStop)),
            AccountStatus::Delete => Some((SignOutcome::AccountDelete, SignError::StatusDelete)),
        };
        if let Some((outcome, error)) = blocked {
            self.tracker
                .record(Some(account.account_id), outcome, client_ip, None)
                .await;
            return Err(error.into());
        }

        self.verify_password(&account, password, client_ip).await?;

        let attempt_id = self
            .tracker
            .record_resolving(account.account_id, SignOutcome::Signin, client_ip)
            .await?;
        debug!(
            account_id = account.account_id,
            attempt_id, "sign-in succeeded, prior failures resolved"
        );

        self.issue_and_register(&account).await
    }

    /// Signs an account out
    ///
    /// Records the sign-out, blacklists the access credential for its
    /// remaining life and drops the refresh registry entry. Nothing here
    /// fails observably: an already-expired access credential skips the
    /// blacklist step and every internal failure is logged and swallowed.
    pub async fn sign_out(&self, account_id: i64, access: &str, refresh: &str, client_ip: &str) {
        debug!(
            account_id,
            access = %mask_token(access),
            "sign-out requested"
        );
        self.tracker
            .record(Some(account_id), SignOutcome::Signout, client_ip, None)
            .await;

        match self.codec.remaining_life(CredentialKind::Access, access) {
            Ok(life) => {
                if let Err(e) = self
                    .store
                    .blacklist(access, life.num_seconds() as u64, BlacklistReason::SignOut)
                    .await
                {
                    warn!(account_id, error = %e, "sign-out blacklist write failed");
                }
            }
            Err(DomainError::Credential(CredentialError::TimedOut)) => {
                debug!(account_id, "access credential already expired at sign-out");
            }
            Err(e) => {
                warn!(account_id, error = %e, "sign-out could not size the blacklist entry");
            }
        }

        // The registry entry only goes when the refresh credential actually
        // names this account; anything else smells like a stolen token and
        // is worth the log line more than the cleanup.
        match self.codec.validate_refresh(refresh) {
            Ok(token_account) if token_account == account_id => {
                match self.store.remove_refresh(account_id).await {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!(account_id, "no registered refresh credential to remove")
                    }
                    Err(e) => warn!(account_id, error = %e, "refresh registry cleanup failed"),
                }
            }
            Ok(token_account) => {
                warn!(
                    account_id,
                    token_account, client_ip, "refresh credential names a different account"
                );
            }
            Err(e) => {
                warn!(account_id, error = %e, "refresh credential rejected during sign-out");
            }
        }
    }

    /// Rotates a session from its refresh credential
    ///
    /// # Errors
    ///
    /// * `CredentialError::TimedOut` / `ValidationFailed` - Refresh
    ///   credential itself is dead
    /// * `TokenError::NoSuchToken` - No registered refresh value for the
    ///   account
    /// * `TokenError::ValueMismatch` - Registered value differs; the
    ///   presented credential was rotated away or stolen
    /// * `SignError::*` - Account vanished or its status rejects sessions
    pub async fn refresh(&self, refresh_token: &str, client_ip: &str) -> DomainResult<SessionTokens> {
        let account_id = self.codec.validate_refresh(refresh_token)?;

        if let Err(e) = self.store.validate_refresh(account_id, refresh_token).await {
            self.tracker
                .record(
                    Some(account_id),
                    SignOutcome::RefreshFail,
                    client_ip,
                    Some(&e.to_string()),
                )
                .await;
            return Err(e);
        }

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(SignError::AccountNotFound)?;
        Self::require_active(&account)?;

        let pair = self.issue_and_register(&account).await?;
        self.tracker
            .record(Some(account_id), SignOutcome::Refresh, client_ip, None)
            .await;
        Ok(pair)
    }

    /// Decides whether a request's credential pair grants access
    ///
    /// Runs the per-request state machine: blank pair rejected, blacklist
    /// consulted, then the access credential validated. A blacklist entry
    /// with reason `Update` and any validation failure short of a missing
    /// credential both funnel into a silent refresh, so a caller observing
    /// a rejection learns nothing about which check failed.
    pub async fn authenticate(
        &self,
        access: Option<&str>,
        refresh: Option<&str>,
        client_ip: &str,
    ) -> DomainResult<AccessDecision> {
        let access = access.unwrap_or("").trim();
        let refresh = refresh.unwrap_or("").trim();
        if access.is_empty() || refresh.is_empty() {
            return Err(CredentialError::ValidationFailed.into());
        }

        match self.store.blacklist_reason(access).await? {
            Some(BlacklistReason::SignOut) => {
                warn!(
                    access = %mask_token(access),
                    client_ip,
                    "signed-out credential presented"
                );
                return Err(CredentialError::ValidationFailed.into());
            }
            Some(BlacklistReason::Update) => {
                // Account data changed since issuance; rotate transparently
                // and retire the blacklist entry.
                let tokens = self.refresh(refresh, client_ip).await?;
                self.store.remove_blacklist(access).await?;
                let claims = self.codec.validate_access(&tokens.access_token)?;
                return Ok(AccessDecision::Rotated { claims, tokens });
            }
            None => {}
        }

        match self.codec.validate_access(access) {
            Ok(claims) => Ok(AccessDecision::Authorized(claims)),
            Err(e) => {
                debug!(error = %e, "access credential rejected, attempting silent refresh");
                let tokens = self.refresh(refresh, client_ip).await?;
                let claims = self.codec.validate_access(&tokens.access_token)?;
                Ok(AccessDecision::Rotated { claims, tokens })
            }
        }
    }

    /// Exchanges a channel verification token for a verification credential
    ///
    /// The opaque token proves the code step happened; the gate re-checks
    /// the underlying round before the signed credential is minted. The
    /// token is consumed only after everything else succeeded.
    pub async fn sign_in_by_verification(
        &self,
        channel: VerificationChannel,
        token_key: &str,
        client_ip: &str,
    ) -> DomainResult<String> {
        let purpose = Self::verification_purpose(channel);
        let payload: VerificationPayload = self.store.peek(purpose, token_key).await?;
        let verification_id = payload.verification_id()?;
        self.gate.require_verified(verification_id).await?;

        let credential = self.codec.issue_verification(verification_id, &payload.recipient)?;
        self.store.delete(purpose, token_key).await?;

        let reason = format!("channel: {}", channel.as_str());
        self.tracker
            .record(None, SignOutcome::Signin, client_ip, Some(&reason))
            .await;
        Ok(credential)
    }

    /// Revokes a verification credential before its natural expiry
    ///
    /// An already-expired credential needs no blacklist entry; that case is
    /// logged and ignored.
    pub async fn sign_out_by_verification(
        &self,
        auth_token: &str,
        client_ip: &str,
    ) -> DomainResult<()> {
        match self.codec.remaining_life(CredentialKind::Verification, auth_token) {
            Ok(life) => {
                self.store
                    .blacklist(auth_token, life.num_seconds() as u64, BlacklistReason::SignOut)
                    .await
            }
            Err(DomainError::Credential(CredentialError::TimedOut)) => {
                debug!(client_ip, "verification credential already expired");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// First signup phase: parks the form behind an opaque token
    ///
    /// Requires a consumed email verification matching the form's email.
    /// The form, raw password included, rides sealed in the store for the
    /// few minutes until the second phase.
    ///
    /// # Errors
    ///
    /// * `DomainError::Validation` - Verified email differs from the form's,
    ///   or the email is already registered
    pub async fn create_signup_token(
        &self,
        verification_email_key: &str,
        form: SignupPayload,
    ) -> DomainResult<String> {
        let payload: VerificationPayload = self
            .store
            .peek(TokenPurpose::VerificationEmail, verification_email_key)
            .await?;
        self.gate.require_verified(payload.verification_id()?).await?;

        if !payload.matches_recipient(&form.email) {
            return Err(DomainError::Validation {
                message: "Verified email does not match the signup form".to_string(),
            });
        }
        if self.accounts.exists_by_email(&form.email).await? {
            return Err(DomainError::Validation {
                message: "Email already registered".to_string(),
            });
        }

        let key = self.store.create(TokenPurpose::SignupIntermediate, &form).await?;
        self.store
            .delete(TokenPurpose::VerificationEmail, verification_email_key)
            .await?;
        Ok(key)
    }

    /// Second signup phase: creates the account
    ///
    /// Consumes the parked form and a phone verification token; the phone
    /// proven by the verification must be the one on the form.
    pub async fn sign_up(
        &self,
        signup_key: &str,
        verification_phone_key: &str,
        client_ip: &str,
    ) -> DomainResult<Account> {
        let form: SignupPayload = self
            .store
            .peek(TokenPurpose::SignupIntermediate, signup_key)
            .await?;
        let verification: VerificationPayload = self
            .store
            .peek(TokenPurpose::VerificationPhone, verification_phone_key)
            .await?;
        self.gate
            .require_verified(verification.verification_id()?)
            .await?;

        if !verification.matches_recipient(&form.phone) {
            return Err(DomainError::Validation {
                message: "Verified phone does not match the signup form".to_string(),
            });
        }

        let hash = self.hash_password(&form.password)?;
        let account = self
            .accounts
            .create(Account::new(&form.email, hash, &form.name, &form.phone))
            .await?;

        self.tracker
            .record(Some(account.account_id), SignOutcome::Signup, client_ip, None)
            .await;

        self.store.delete(TokenPurpose::SignupIntermediate, signup_key).await?;
        self.store
            .delete(TokenPurpose::VerificationPhone, verification_phone_key)
            .await?;

        debug!(account_id = account.account_id, "account created");
        Ok(account)
    }

    /// Mints a password-reset token after a verified channel check
    ///
    /// The verified recipient must belong to the account named by email:
    /// the account's phone for the phone channel, the submitted email for
    /// the email channel. A suspended account may reset its password; a
    /// stopped or deleted one may not.
    pub async fn create_password_reset_token(
        &self,
        channel: VerificationChannel,
        verification_key: &str,
        email: &str,
    ) -> DomainResult<String> {
        let purpose = Self::verification_purpose(channel);
        let payload: VerificationPayload = self.store.peek(purpose, verification_key).await?;
        self.gate.require_verified(payload.verification_id()?).await?;

        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(SignError::AccountNotFound)?;

        let expected = match channel {
            VerificationChannel::Phone => account.phone.as_str(),
            VerificationChannel::Email => account.email.as_str(),
        };
        if !payload.matches_recipient(expected) {
            return Err(DomainError::Validation {
                message: "Verified recipient does not belong to the account".to_string(),
            });
        }

        match account.status {
            AccountStatus::Stop => return Err(SignError::StatusStop.into()),
            AccountStatus::Delete => return Err(SignError::StatusDelete.into()),
            AccountStatus::Active | AccountStatus::Stay => {}
        }

        let key = self
            .store
            .create(
                TokenPurpose::PasswordResetIntermediate,
                &PasswordResetPayload::new(account.account_id, &account.email),
            )
            .await?;
        self.store.delete(purpose, verification_key).await?;
        Ok(key)
    }

    /// Sets a new password through a reset token
    ///
    /// Restores the account to `Active`, which is how a lockout ends: the
    /// resolving attempt record clears the unresolved failure count in the
    /// same transaction.
    pub async fn update_password_by_reset_token(
        &self,
        key: &str,
        new_password: &str,
        client_ip: &str,
    ) -> DomainResult<()> {
        let payload: PasswordResetPayload = self
            .store
            .peek(TokenPurpose::PasswordResetIntermediate, key)
            .await?;

        let mut account = self
            .accounts
            .find_by_id(payload.account_id()?)
            .await?
            .ok_or(SignError::AccountNotFound)?;

        match account.status {
            AccountStatus::Stop => return Err(SignError::StatusStop.into()),
            AccountStatus::Delete => return Err(SignError::StatusDelete.into()),
            AccountStatus::Active | AccountStatus::Stay => {}
        }

        let account_id = account.account_id;
        account.set_password_hash(self.hash_password(new_password)?);
        account.reactivate();
        self.accounts.update(account).await?;

        self.tracker
            .record_resolving(account_id, SignOutcome::UpdatePassword, client_ip)
            .await?;

        self.store
            .delete(TokenPurpose::PasswordResetIntermediate, key)
            .await?;
        debug!(account_id, "password updated through reset token");
        Ok(())
    }

    /// Re-checks the holder's password ahead of a sensitive action
    ///
    /// Failures count toward the lockout exactly like sign-in failures. On
    /// success the caller gets a short-lived confirm token to present to
    /// the guarded operation.
    pub async fn create_password_confirm_token(
        &self,
        account_id: i64,
        password: &str,
        client_ip: &str,
    ) -> DomainResult<String> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(SignError::AccountNotFound)?;
        Self::require_active(&account)?;

        self.verify_password(&account, password, client_ip).await?;

        self.store
            .create(
                TokenPurpose::PasswordConfirmIntermediate,
                &PasswordConfirmPayload::new(account_id, &account.email),
            )
            .await
    }

    /// Consumes a confirm token ahead of a guarded operation
    ///
    /// The token must have been minted for the presenting account. On a
    /// holder mismatch the entry stays alive for its rightful owner.
    pub async fn redeem_password_confirm_token(
        &self,
        account_id: i64,
        key: &str,
    ) -> DomainResult<()> {
        let payload: PasswordConfirmPayload = self
            .store
            .peek(TokenPurpose::PasswordConfirmIntermediate, key)
            .await?;
        if payload.account_id()? != account_id {
            return Err(TokenError::ValueMismatch.into());
        }
        self.store
            .delete(TokenPurpose::PasswordConfirmIntermediate, key)
            .await?;
        Ok(())
    }

    /// Soft-deletes an account, guarded by its version
    ///
    /// # Errors
    ///
    /// * `DomainError::VersionConflict` - The submitted version is stale;
    ///   nothing was changed
    pub async fn delete_account(
        &self,
        account_id: i64,
        version: i64,
        client_ip: &str,
    ) -> DomainResult<()> {
        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(SignError::AccountNotFound)?;
        account.check_version(version)?;

        account.mark_deleted();
        self.accounts.update(account).await?;

        self.tracker
            .record(Some(account_id), SignOutcome::Delete, client_ip, None)
            .await;
        if let Err(e) = self.store.remove_refresh(account_id).await {
            warn!(account_id, error = %e, "refresh registry cleanup failed after deletion");
        }
        Ok(())
    }

    /// Issues a session pair and registers its refresh value
    async fn issue_and_register(&self, account: &Account) -> DomainResult<SessionTokens> {
        let pair = self.codec.issue_session(
            account.account_id,
            vec![ROLE_ADMIN.to_string()],
            &[("email", account.email.as_str()), ("name", account.name.as_str())],
        )?;
        self.store
            .register_refresh(account.account_id, &pair.refresh_token)
            .await?;
        Ok(pair)
    }

    /// Compares a password against the account's hash, counting failures
    ///
    /// A mismatch records an attempt and re-reads the live unresolved
    /// count; crossing the threshold suspends the account before the
    /// error surfaces.
    async fn verify_password(
        &self,
        account: &Account,
        password: &str,
        client_ip: &str,
    ) -> DomainResult<()> {
        let matches =
            bcrypt::verify(password, &account.password_hash).map_err(|e| DomainError::Internal {
                message: format!("Password hash comparison failed: {e}"),
            })?;
        if matches {
            return Ok(());
        }

        self.tracker
            .record(
                Some(account.account_id),
                SignOutcome::InvalidPassword,
                client_ip,
                Some("password mismatch"),
            )
            .await;

        match self.tracker.check_failures(account.account_id).await {
            Ok(count) => Err(SignError::MismatchCredentials { count }.into()),
            Err(e) => {
                if matches!(e, DomainError::Sign(SignError::TooManyFailures { .. })) {
                    let mut suspended = account.clone();
                    suspended.suspend();
                    self.accounts.update(suspended).await?;
                }
                Err(e)
            }
        }
    }

    fn hash_password(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.config.bcrypt_cost).map_err(|e| DomainError::Internal {
            message: format!("Password hashing failed: {e}"),
        })
    }

    fn require_active(account: &Account) -> DomainResult<()> {
        match account.status {
            AccountStatus::Active => Ok(()),
            AccountStatus::Stay => Err(SignError::StatusStay.into()),
            AccountStatus::Stop => Err(SignError::StatusStop.into()),
            AccountStatus::Delete => Err(SignError::StatusDelete.into()),
        }
    }

    fn verification_purpose(channel: VerificationChannel) -> TokenPurpose {
        match channel {
            VerificationChannel::Phone => TokenPurpose::VerificationPhone,
            VerificationChannel::Email => TokenPurpose::VerificationEmail,
        }
    }
}
