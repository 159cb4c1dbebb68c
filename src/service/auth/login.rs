//! VATSIM Connect login and token refresh.

use rand::{distr::Alphanumeric, Rng};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    data::{
        profile::ProfileRepository, session::SessionRepository, settings::SettingsRepository,
        user::UserRepository,
    },
    error::{auth::AuthError, Error},
    external::connect::{ConnectClient, TokenExchange},
    model::{
        auth::{ProfileData, TokenGrant},
        scope::ScopeSet,
    },
};

/// Rating id the provider uses for actively suspended members.
const RATING_SUSPENDED: i32 = 0;
/// Rating id the provider uses for members without a rating.
const RATING_UNRATED: i32 = -1;

const SESSION_TOKEN_LENGTH: usize = 64;

/// Everything a successful login produces.
pub struct LoginOutcome {
    pub user: entity::user::Model,
    pub profile: entity::user_profile::Model,
    pub settings: entity::user_settings::Model,
    pub session_token: String,
}

pub struct LoginService<'a> {
    db: &'a DatabaseConnection,
    connect: &'a ConnectClient,
    required_scopes: &'a ScopeSet,
}

impl<'a> LoginService<'a> {
    /// Creates a new instance of [`LoginService`]
    pub fn new(
        db: &'a DatabaseConnection,
        connect: &'a ConnectClient,
        required_scopes: &'a ScopeSet,
    ) -> Self {
        Self {
            db,
            connect,
            required_scopes,
        }
    }

    /// Runs the full login flow for an authorization code.
    ///
    /// Exchanges the code, fetches the profile, enforces scope and
    /// suspension checks, reconciles the local identity and replaces the
    /// session for this (user, browser) pair. Every failure leaves the
    /// caller without a live session.
    ///
    /// # Arguments
    /// - `code` - One-time authorization code from the Connect redirect
    /// - `browser_token` - Opaque per-browser identifier header value
    /// - `remember` - Whether the session should outlive the browser session
    ///
    /// # Returns
    /// - `Ok(LoginOutcome)` - Reconciled user, profile, settings and the
    ///   freshly minted session token
    /// - `Err(Error)` - Any step of the flow failed
    pub async fn login(
        &self,
        code: &str,
        browser_token: Option<&str>,
        remember: bool,
    ) -> Result<LoginOutcome, Error> {
        if code.trim().is_empty() {
            return Err(AuthError::MissingCode.into());
        }

        let grant = match self.connect.exchange_code(code).await {
            TokenExchange::Granted(grant) => grant,
            TokenExchange::Revoked => return Err(AuthError::InvalidCode.into()),
            TokenExchange::Unavailable => return Err(AuthError::TokenExchangeFailed.into()),
        };

        let document = self
            .connect
            .fetch_profile(&grant.access_token)
            .await
            .ok_or(Error::MissingProfileData)?;
        let profile = document.data;

        // Scope shortfall is reported before suspension: a misconfigured
        // application must not masquerade as a member problem.
        if !grant.scopes.is_superset(self.required_scopes) {
            return Err(AuthError::InvalidScopes {
                missing: grant.scopes.missing_from(self.required_scopes),
            }
            .into());
        }

        if matches!(profile.vatsim.rating.id, RATING_SUSPENDED | RATING_UNRATED) {
            return Err(AuthError::UserSuspended(profile.cid).into());
        }

        let (user, profile_row) = self.reconcile(&grant, &profile).await?;

        let settings = SettingsRepository::new(self.db)
            .ensure_default(user.id)
            .await?;

        let browser_token = browser_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                AuthError::SessionCreation("browser identifier header missing".to_string())
            })?;

        let session_token = mint_token();
        SessionRepository::new(self.db)
            .replace(user.id, browser_token, &session_token, remember)
            .await?;

        tracing::info!("User {} logged in", user.id);

        Ok(LoginOutcome {
            user,
            profile: profile_row,
            settings,
            session_token,
        })
    }

    /// Refreshes a user's identity from the provider via the stored refresh
    /// token. Sessions are untouched.
    ///
    /// A rejected refresh grant nulls the stored tokens so the user is
    /// forced through a fresh login next time.
    pub async fn refresh(
        &self,
        user: entity::user::Model,
    ) -> Result<(entity::user::Model, entity::user_profile::Model), Error> {
        let refresh_token = user
            .refresh_token
            .as_deref()
            .ok_or(AuthError::TokenExchangeFailed)?;

        let grant = match self.connect.exchange_refresh_token(refresh_token).await {
            TokenExchange::Granted(grant) => grant,
            TokenExchange::Revoked => {
                UserRepository::new(self.db).clear_tokens(user.id).await?;
                return Err(AuthError::TokenExchangeFailed.into());
            }
            TokenExchange::Unavailable => return Err(AuthError::TokenExchangeFailed.into()),
        };

        let document = self
            .connect
            .fetch_profile(&grant.access_token)
            .await
            .ok_or(Error::MissingProfileData)?;

        self.reconcile(&grant, &document.data).await
    }

    /// Upserts the identity row and replaces the profile snapshot in one
    /// transaction. Tokens are only persisted when the provider marked them
    /// durable.
    async fn reconcile(
        &self,
        grant: &TokenGrant,
        profile: &ProfileData,
    ) -> Result<(entity::user::Model, entity::user_profile::Model), Error> {
        let access_token = profile
            .vatsim
            .token_valid
            .then(|| grant.access_token.clone());
        let refresh_token = if profile.vatsim.token_valid {
            grant.refresh_token.clone()
        } else {
            None
        };
        let profile = profile.clone();

        self.db
            .transaction::<_, (entity::user::Model, entity::user_profile::Model), Error>(
                move |txn| {
                    Box::pin(async move {
                        let user = UserRepository::new(txn)
                            .upsert(
                                profile.cid,
                                &profile.personal.name_first,
                                &profile.personal.name_last,
                                &profile.personal.email,
                                access_token,
                                refresh_token,
                            )
                            .await?;

                        let profile_row = ProfileRepository::new(txn)
                            .replace(profile.cid, &profile)
                            .await?;

                        Ok((user, profile_row))
                    })
                },
            )
            .await
            .map_err(Error::from_transaction)
    }
}

fn mint_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use sea_orm::EntityTrait;
    use trainingcenter_test_utils::prelude::*;

    use super::{LoginService, RATING_SUSPENDED};
    use crate::{
        error::{auth::AuthError, Error},
        external::connect::ConnectClient,
        model::scope::ScopeSet,
    };

    fn connect_for(test: &TestSetup) -> ConnectClient {
        ConnectClient::new(
            &test.server.url(),
            constant::TEST_CONNECT_CLIENT_ID,
            constant::TEST_CONNECT_CLIENT_SECRET,
            constant::TEST_REDIRECT_URI,
        )
        .unwrap()
    }

    fn required_scopes() -> ScopeSet {
        ScopeSet::parse_strict("full_name vatsim_details email").unwrap()
    }

    /// Expect a valid code to produce a user, profile, settings and session
    #[tokio::test]
    async fn login_succeeds_with_valid_code() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        test.connect().mock_token_success("full_name vatsim_details email");
        test.connect().mock_profile(1_000_001, 5, true);

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let outcome = service.login("abc123", Some("browser-a"), false).await.unwrap();

        assert_eq!(outcome.user.id, 1_000_001);
        assert_eq!(outcome.user.first_name, "Erika");
        assert_eq!(outcome.user.access_token.as_deref(), Some("tok1"));
        assert_eq!(outcome.profile.rating, 5);
        assert_eq!(outcome.settings.language, "en");
        assert_eq!(outcome.session_token.len(), 64);

        let sessions = entity::prelude::UserSession::find().all(&db).await?;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].token, outcome.session_token);

        Ok(())
    }

    /// Expect an empty code to be rejected before any provider call
    #[tokio::test]
    async fn login_rejects_missing_code() -> Result<(), TestError> {
        let test = test_setup_with_tables!()?;
        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let result = service.login("  ", Some("browser-a"), false).await;

        assert!(matches!(result, Err(Error::AuthError(AuthError::MissingCode))));

        Ok(())
    }

    /// Expect a revoked code to fail without touching the database
    #[tokio::test]
    async fn login_rejects_revoked_code_without_mutation() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        test.connect().mock_token_revoked();

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let result = service.login("abc123", Some("browser-a"), false).await;

        assert!(matches!(result, Err(Error::AuthError(AuthError::InvalidCode))));

        let users = entity::prelude::User::find().all(&db).await?;
        assert!(users.is_empty());
        let sessions = entity::prelude::UserSession::find().all(&db).await?;
        assert!(sessions.is_empty());

        Ok(())
    }

    /// Expect a provider outage during the exchange to fail the login
    #[tokio::test]
    async fn login_fails_when_token_exchange_unavailable() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        test.connect().mock_token_failure();

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let result = service.login("abc123", Some("browser-a"), false).await;

        assert!(matches!(
            result,
            Err(Error::AuthError(AuthError::TokenExchangeFailed))
        ));

        let users = entity::prelude::User::find().all(&db).await?;
        assert!(users.is_empty());

        Ok(())
    }

    /// Expect an unavailable profile to abort the login without any writes
    #[tokio::test]
    async fn login_aborts_when_profile_unavailable() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        test.connect().mock_token_success("full_name vatsim_details email");
        test.connect().mock_profile_failure();

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let result = service.login("abc123", Some("browser-a"), false).await;

        assert!(matches!(result, Err(Error::MissingProfileData)));

        let users = entity::prelude::User::find().all(&db).await?;
        assert!(users.is_empty());
        let profiles = entity::prelude::UserProfile::find().all(&db).await?;
        assert!(profiles.is_empty());
        let sessions = entity::prelude::UserSession::find().all(&db).await?;
        assert!(sessions.is_empty());

        Ok(())
    }

    /// Expect a scope shortfall to be reported even for a suspended user
    #[tokio::test]
    async fn login_reports_scope_shortfall_before_suspension() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        test.connect().mock_token_success("full_name");
        test.connect().mock_profile(1_000_001, RATING_SUSPENDED, true);

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let result = service.login("abc123", Some("browser-a"), false).await;

        match result {
            Err(Error::AuthError(AuthError::InvalidScopes { missing })) => {
                assert_eq!(missing.to_string(), "email vatsim_details");
            }
            other => panic!("expected scope error, got {:?}", other.err()),
        }

        Ok(())
    }

    /// Expect a suspended rating to block the session
    #[tokio::test]
    async fn login_rejects_suspended_user() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        test.connect().mock_token_success("full_name vatsim_details email");
        test.connect().mock_profile(1_000_001, RATING_SUSPENDED, true);

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let result = service.login("abc123", Some("browser-a"), false).await;

        assert!(matches!(
            result,
            Err(Error::AuthError(AuthError::UserSuspended(1_000_001)))
        ));

        let sessions = entity::prelude::UserSession::find().all(&db).await?;
        assert!(sessions.is_empty());

        Ok(())
    }

    /// Expect tokens to be nulled when the provider marks them not durable
    #[tokio::test]
    async fn login_skips_token_persistence_when_not_durable() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        test.connect().mock_token_success("full_name vatsim_details email");
        test.connect().mock_profile(1_000_001, 5, false);

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let outcome = service.login("abc123", Some("browser-a"), false).await.unwrap();

        assert!(outcome.user.access_token.is_none());
        assert!(outcome.user.refresh_token.is_none());

        Ok(())
    }

    /// Expect a missing browser identifier to abort after reconciliation
    #[tokio::test]
    async fn login_requires_browser_token() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        test.connect().mock_token_success("full_name vatsim_details email");
        test.connect().mock_profile(1_000_001, 5, true);

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let result = service.login("abc123", None, false).await;

        assert!(matches!(
            result,
            Err(Error::AuthError(AuthError::SessionCreation(_)))
        ));

        let sessions = entity::prelude::UserSession::find().all(&db).await?;
        assert!(sessions.is_empty());

        Ok(())
    }

    /// Expect a second login from the same browser to replace the session
    #[tokio::test]
    async fn second_login_replaces_session() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        test.connect().mock_token_success("full_name vatsim_details email");
        test.connect().mock_profile(1_000_001, 5, true);

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let first = service.login("abc123", Some("browser-a"), false).await.unwrap();
        let second = service.login("abc123", Some("browser-a"), false).await.unwrap();

        let sessions = entity::prelude::UserSession::find().all(&db).await?;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].token, second.session_token);
        assert_ne!(first.session_token, second.session_token);

        Ok(())
    }

    /// Expect a rejected refresh grant to null the stored tokens
    #[tokio::test]
    async fn refresh_clears_tokens_on_revoked_grant() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        let user = test.user().insert_user(1_000_001).await?;
        test.connect().mock_token_revoked();

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let result = service.refresh(user).await;

        assert!(matches!(
            result,
            Err(Error::AuthError(AuthError::TokenExchangeFailed))
        ));

        let user = entity::prelude::User::find_by_id(1_000_001).one(&db).await?.unwrap();
        assert!(user.access_token.is_none());
        assert!(user.refresh_token.is_none());

        Ok(())
    }

    /// Expect an unavailable profile to abort the refresh, keeping tokens
    #[tokio::test]
    async fn refresh_aborts_when_profile_unavailable() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        let user = test.user().insert_user(1_000_001).await?;
        test.connect().mock_token_success("full_name vatsim_details email");
        test.connect().mock_profile_failure();

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let result = service.refresh(user).await;

        assert!(matches!(result, Err(Error::MissingProfileData)));

        let user = entity::prelude::User::find_by_id(1_000_001).one(&db).await?.unwrap();
        assert_eq!(user.access_token.as_deref(), Some("tok1"));
        assert_eq!(user.refresh_token.as_deref(), Some("ref1"));

        let profiles = entity::prelude::UserProfile::find().all(&db).await?;
        assert!(profiles.is_empty());

        Ok(())
    }

    /// Expect a successful refresh to update the profile snapshot
    #[tokio::test]
    async fn refresh_reconciles_profile() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!()?;
        let user = test.user().insert_user(1_000_001).await?;
        test.connect().mock_token_success("full_name vatsim_details email");
        test.connect().mock_profile(1_000_001, 7, true);

        let db = test.db.clone();
        let connect = connect_for(&test);
        let required = required_scopes();
        let service = LoginService::new(&db, &connect, &required);

        let (user, profile) = service.refresh(user).await.unwrap();

        assert_eq!(user.id, 1_000_001);
        assert_eq!(profile.rating, 7);

        Ok(())
    }
}
