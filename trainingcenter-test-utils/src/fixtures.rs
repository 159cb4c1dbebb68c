//! Test fixtures for database rows and mock HTTP endpoints.
//!
//! JSON builders mirror the wire shapes of VATSIM Connect and VATEUD Core
//! so service tests exercise the same deserializers as production code.

use chrono::Utc;
use mockito::Mock;
use sea_orm::{ActiveValue, EntityTrait};
use serde_json::{json, Value};

use crate::{error::TestError, TestSetup};

/// Profile document as returned by Connect's `GET /api/user`.
///
/// Identifiers are emitted as strings where the provider is known to do so.
pub fn profile_document_json(cid: i32, rating: i32, token_valid: bool) -> Value {
    json!({
        "data": {
            "cid": cid.to_string(),
            "personal": {
                "name_first": "Erika",
                "name_last": "Mustermann",
                "email": "erika@example.org",
                "country": {"id": "DE", "name": "Germany"}
            },
            "vatsim": {
                "rating": {"id": rating},
                "pilotrating": {"id": 1},
                "region": {"id": "EMEA", "name": "Europe, Middle East and Africa"},
                "division": {"id": "EUD", "name": "European Division"},
                "subdivision": {"id": null, "name": null},
                "token_valid": token_valid
            }
        }
    })
}

/// Token grant as returned by Connect's `POST /oauth/token`.
pub fn token_grant_json(scopes: &str) -> Value {
    json!({
        "access_token": "tok1",
        "refresh_token": "ref1",
        "token_type": "Bearer",
        "expires_in": 3600,
        "scopes": scopes
    })
}

impl TestSetup {
    pub fn connect(&mut self) -> ConnectFixtures<'_> {
        ConnectFixtures { setup: self }
    }

    pub fn vateud(&mut self) -> VateudFixtures<'_> {
        VateudFixtures { setup: self }
    }

    pub fn user(&mut self) -> UserFixtures<'_> {
        UserFixtures { setup: self }
    }
}

pub struct ConnectFixtures<'a> {
    setup: &'a mut TestSetup,
}

impl ConnectFixtures<'_> {
    /// Mock a successful token exchange granting the given scope string.
    pub fn mock_token_success(&mut self, scopes: &str) -> Mock {
        self.setup
            .server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(token_grant_json(scopes).to_string())
            .create()
    }

    /// Mock a token exchange rejected with the provider's revoked-code hint.
    pub fn mock_token_revoked(&mut self) -> Mock {
        self.setup
            .server
            .mock("POST", "/oauth/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"invalid_grant","hint":"Authorization code has been revoked"}"#)
            .create()
    }

    /// Mock a token endpoint outage.
    pub fn mock_token_failure(&mut self) -> Mock {
        self.setup
            .server
            .mock("POST", "/oauth/token")
            .with_status(500)
            .create()
    }

    /// Mock the profile endpoint for a user with the given CID and rating.
    pub fn mock_profile(&mut self, cid: i32, rating: i32, token_valid: bool) -> Mock {
        self.setup
            .server
            .mock("GET", "/api/user")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(profile_document_json(cid, rating, token_valid).to_string())
            .create()
    }

    /// Mock a profile endpoint outage.
    pub fn mock_profile_failure(&mut self) -> Mock {
        self.setup
            .server
            .mock("GET", "/api/user")
            .with_status(500)
            .create()
    }
}

pub struct VateudFixtures<'a> {
    setup: &'a mut TestSetup,
}

impl VateudFixtures<'_> {
    /// Mock a successful solo create returning the given remote id.
    pub fn mock_solo_create(&mut self, remote_id: &str) -> Mock {
        self.setup
            .server
            .mock("POST", "/solo")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"data": {"id": remote_id}}).to_string())
            .create()
    }

    /// Mock a failing solo create.
    pub fn mock_solo_create_failure(&mut self) -> Mock {
        self.setup
            .server
            .mock("POST", "/solo")
            .with_status(502)
            .create()
    }

    /// Mock a successful solo removal for the given remote id.
    pub fn mock_solo_remove(&mut self, remote_id: &str) -> Mock {
        self.setup
            .server
            .mock("DELETE", format!("/solo/{remote_id}").as_str())
            .with_status(204)
            .create()
    }

    /// Mock a failing solo removal for the given remote id.
    pub fn mock_solo_remove_failure(&mut self, remote_id: &str) -> Mock {
        self.setup
            .server
            .mock("DELETE", format!("/solo/{remote_id}").as_str())
            .with_status(502)
            .create()
    }
}

pub struct UserFixtures<'a> {
    setup: &'a mut TestSetup,
}

impl UserFixtures<'_> {
    pub async fn insert_user(&self, cid: i32) -> Result<entity::user::Model, TestError> {
        Ok(entity::prelude::User::insert(entity::user::ActiveModel {
            id: ActiveValue::Set(cid),
            first_name: ActiveValue::Set("Erika".to_string()),
            last_name: ActiveValue::Set("Mustermann".to_string()),
            email: ActiveValue::Set("erika@example.org".to_string()),
            access_token: ActiveValue::Set(Some("tok1".to_string())),
            refresh_token: ActiveValue::Set(Some("ref1".to_string())),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    pub async fn insert_solo(
        &self,
        user_id: i32,
        instructor_id: i32,
        position: &str,
        vateud_solo_id: Option<&str>,
    ) -> Result<entity::solo_authorization::Model, TestError> {
        Ok(entity::prelude::SoloAuthorization::insert(
            entity::solo_authorization::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                instructor_id: ActiveValue::Set(instructor_id),
                position: ActiveValue::Set(position.to_string()),
                expires_at: ActiveValue::Set(Utc::now().naive_utc()),
                vateud_solo_id: ActiveValue::Set(vateud_solo_id.map(str::to_string)),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            },
        )
        .exec_with_returning(&self.setup.db)
        .await?)
    }
}
