use crate::schema::{credential, CREDENTIALS_SHEET, CREDENTIAL_WIDTH, DEFAULT_ROLE};
use crate::store::StoreError;
use crate::types::{LoginResult, Session};

use super::Tracker;

impl Tracker {
    /// Checks a plaintext username/password pair against the credential sheet.
    ///
    /// The first matching row wins. Faults come back as a failed result.
    pub async fn login(&self, username: &str, password: &str) -> LoginResult {
        match self.find_credential(username, password).await {
            Ok(Some(session)) => {
                tracing::info!("Login succeeded for {}", session.username);
                LoginResult::Success(session)
            }
            Ok(None) => {
                tracing::info!("Login rejected for {}", username);
                LoginResult::Failure("Invalid credentials".to_string())
            }
            Err(e) => {
                tracing::error!("Login error: {}", e);
                LoginResult::Failure(format!("Error during login: {}", e))
            }
        }
    }

    async fn find_credential(&self, username: &str, password: &str) -> Result<Option<Session>, StoreError> {
        let workbook = self.workbook().await?;
        let backend = self.backend();

        if !backend.has_sheet(&workbook, CREDENTIALS_SHEET).await? {
            let _guard = self.writer.lock().await;
            if !backend.has_sheet(&workbook, CREDENTIALS_SHEET).await? {
                backend.insert_sheet(&workbook, CREDENTIALS_SHEET).await?;
            }
            return Ok(None);
        }

        let last = backend.last_row(&workbook, CREDENTIALS_SHEET).await?;
        if last == 0 {
            return Ok(None);
        }
        let rows = backend
            .read_rows(&workbook, CREDENTIALS_SHEET, 1, last, CREDENTIAL_WIDTH)
            .await?;

        let session = rows.into_iter().find_map(|row| {
            let cells = &row.cells;
            if !(cells[credential::USERNAME].eq_text(username) && cells[credential::PASSWORD].eq_text(password)) {
                return None;
            }
            let role = cells[credential::ROLE].to_string();
            Some(Session {
                username: username.to_string(),
                mandal: cells[credential::MANDAL].to_string(),
                role: if role.is_empty() { DEFAULT_ROLE.to_string() } else { role },
            })
        });

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::CREDENTIALS_SHEET;
    use crate::store::{Cell, SheetBackend};
    use crate::testing::TestContext;
    use crate::types::LoginResult;

    #[tokio::test]
    async fn seeded_credentials_log_in() {
        let ctx = TestContext::bootstrapped().await;

        for (user, pass, mandal, role) in [
            ("mandal1", "password1", "Mandal1", "admin"),
            ("mandal2", "password2", "Mandal2", "user"),
            ("mandal3", "password3", "Mandal3", "user"),
        ] {
            match ctx.tracker.login(user, pass).await {
                LoginResult::Success(session) => {
                    assert_eq!(session.username, user);
                    assert_eq!(session.mandal, mandal);
                    assert_eq!(session.role, role);
                }
                other => panic!("expected success for {}: {:?}", user, other),
            }
        }
    }

    #[tokio::test]
    async fn wrong_password_or_case_is_rejected() {
        let ctx = TestContext::bootstrapped().await;

        for (user, pass) in [("mandal1", "password2"), ("Mandal1", "password1"), ("", ""), ("nobody", "x")] {
            assert_eq!(
                ctx.tracker.login(user, pass).await,
                LoginResult::Failure("Invalid credentials".to_string())
            );
        }
    }

    #[tokio::test]
    async fn blank_role_defaults_to_user_and_first_match_wins() {
        let ctx = TestContext::bootstrapped().await;
        let workbook = ctx.spreadsheet_id().await;
        ctx.backend
            .write_rows(
                &workbook,
                CREDENTIALS_SHEET,
                5,
                vec![
                    vec![Cell::text("clerk"), Cell::text("pw"), Cell::text("Mandal7")],
                    vec![Cell::text("clerk"), Cell::text("pw"), Cell::text("Mandal8"), Cell::text("admin")],
                ],
            )
            .await
            .unwrap();

        match ctx.tracker.login("clerk", "pw").await {
            LoginResult::Success(session) => {
                assert_eq!(session.mandal, "Mandal7");
                assert_eq!(session.role, "user");
            }
            other => panic!("expected success: {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_credential_sheet_is_created_empty() {
        let ctx = TestContext::with_empty_workbook().await;
        let result = ctx.tracker.login("mandal1", "password1").await;
        assert!(!result.is_success());

        let workbook = ctx.spreadsheet_id().await;
        assert!(ctx.backend.has_sheet(&workbook, CREDENTIALS_SHEET).await.unwrap());
    }

    #[tokio::test]
    async fn unconfigured_store_reports_fault() {
        let ctx = TestContext::unconfigured();
        match ctx.tracker.login("mandal1", "password1").await {
            LoginResult::Failure(message) => {
                assert!(message.starts_with("Error during login: "), "{}", message)
            }
            other => panic!("expected failure: {:?}", other),
        }
    }
}
