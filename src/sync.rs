//! Expense synchronization engine.
//!
//! Performs remote CRUD against the expense collection and keeps an
//! in-memory read-through cache. Consistency policy is read-after-write
//! via full reload: every mutation is followed by a fresh fetch that
//! replaces the cache wholesale, so the client never diverges from the
//! server at the cost of an extra round trip. There is no optimistic
//! local mutation and no partial cache update on failure.
//!
//! Any authorization failure (missing credential or a server 401/403)
//! forces the session to log out and surfaces as `ApiError::AuthExpired`.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ExpenseApi};
use crate::auth::SessionManager;
use crate::models::{CreateExpenseRequest, Expense, NewExpense, UpdateExpenseRequest};

pub struct ExpenseSyncEngine<A: ExpenseApi> {
    api: A,
    /// Last successful full read from the server.
    expenses: Vec<Expense>,
}

impl<A: ExpenseApi> ExpenseSyncEngine<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            expenses: Vec::new(),
        }
    }

    /// The cached collection as of the last successful fetch.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Fetch the full collection, replace the cache, return it.
    pub async fn list(&mut self, session: &mut SessionManager) -> Result<&[Expense], ApiError> {
        let token = Self::require_credential(session)?;
        let fetched = Self::guard(session, self.api.fetch_expenses(&token).await)?;
        debug!(count = fetched.len(), "Replaced expense cache");
        self.expenses = fetched;
        Ok(&self.expenses)
    }

    /// Validate and create an expense, then reconcile via full reload.
    /// The new record's id and timestamps are server-assigned and only
    /// appear in the cache after reconciliation.
    pub async fn create(
        &mut self,
        session: &mut SessionManager,
        input: NewExpense,
    ) -> Result<(), ApiError> {
        Self::validate(&input)?;
        let token = Self::require_credential(session)?;

        let request = CreateExpenseRequest::from(input);
        let created = Self::guard(session, self.api.create_expense(&token, &request).await)?;
        info!(id = created.id, category = %created.category, "Created expense");

        self.list(session).await?;
        Ok(())
    }

    /// Send a full replacement payload for an existing expense, then
    /// reconcile via full reload.
    pub async fn update(
        &mut self,
        session: &mut SessionManager,
        id: i64,
        input: NewExpense,
    ) -> Result<(), ApiError> {
        Self::validate(&input)?;
        let token = Self::require_credential(session)?;

        let request = UpdateExpenseRequest {
            expense_id: id,
            category: input.category,
            amount: input.amount,
            description: input.description,
        };
        let updated = Self::guard(session, self.api.update_expense(&token, &request).await)?;
        info!(id = updated.id, "Updated expense");

        self.list(session).await?;
        Ok(())
    }

    /// Delete an expense by id, then reconcile via full reload.
    /// A missing id surfaces as `NotFound`; the cache is left untouched.
    pub async fn delete(&mut self, session: &mut SessionManager, id: i64) -> Result<(), ApiError> {
        let token = Self::require_credential(session)?;

        Self::guard(session, self.api.delete_expense(&token, id).await)?;
        info!(id, "Deleted expense");

        self.list(session).await?;
        Ok(())
    }

    /// Client-side input validation, before any network call.
    fn validate(input: &NewExpense) -> Result<(), ApiError> {
        if input.category.trim().is_empty() {
            return Err(ApiError::Validation("Category is required".to_string()));
        }
        if input.amount <= Decimal::ZERO {
            return Err(ApiError::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        if input.description.trim().is_empty() {
            return Err(ApiError::Validation("Description is required".to_string()));
        }
        Ok(())
    }

    /// A missing credential is an authorization failure, not a panic:
    /// the session is forced to anonymous and the caller sees AuthExpired.
    fn require_credential(session: &mut SessionManager) -> Result<String, ApiError> {
        match session.credential() {
            Some(token) => Ok(token.to_string()),
            None => {
                warn!("Expense operation attempted without a credential");
                session.logout();
                Err(ApiError::AuthExpired)
            }
        }
    }

    /// Map a server-side authorization rejection to a forced logout.
    fn guard<T>(
        session: &mut SessionManager,
        result: Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        if let Err(ref e) = result {
            if e.is_auth_expired() {
                warn!("Server rejected credential, logging out");
                session.logout();
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStore, SessionManager, SessionState, TokenStore};
    use crate::models::Identity;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::{Arc, Mutex};

    /// Capture engine logs in test output; RUST_LOG controls verbosity.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// In-memory stand-in for the remote collection, recording the order
    /// of calls so tests can assert on the mutate-then-reload protocol.
    #[derive(Default)]
    struct FakeApi {
        server: Mutex<Vec<Expense>>,
        calls: Mutex<Vec<&'static str>>,
        next_id: AtomicI64,
        reject_credential: AtomicBool,
    }

    impl FakeApi {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                next_id: AtomicI64::new(1),
                ..Self::default()
            })
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn check_auth(&self, call: &'static str) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call);
            if self.reject_credential.load(Ordering::SeqCst) {
                Err(ApiError::AuthExpired)
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl ExpenseApi for Arc<FakeApi> {
        async fn fetch_expenses(&self, _token: &str) -> Result<Vec<Expense>, ApiError> {
            self.check_auth("fetch")?;
            Ok(self.server.lock().unwrap().clone())
        }

        async fn create_expense(
            &self,
            _token: &str,
            request: &CreateExpenseRequest,
        ) -> Result<Expense, ApiError> {
            self.check_auth("create")?;
            let now = Utc::now();
            let expense = Expense {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                category: request.category.clone(),
                amount: request.amount,
                description: request.description.clone(),
                created_at: now,
                updated_at: now,
            };
            self.server.lock().unwrap().push(expense.clone());
            Ok(expense)
        }

        async fn update_expense(
            &self,
            _token: &str,
            request: &UpdateExpenseRequest,
        ) -> Result<Expense, ApiError> {
            self.check_auth("update")?;
            let mut server = self.server.lock().unwrap();
            let expense = server
                .iter_mut()
                .find(|e| e.id == request.expense_id)
                .ok_or_else(|| ApiError::NotFound("Expense doesn't exist".to_string()))?;
            expense.category = request.category.clone();
            expense.amount = request.amount;
            expense.description = request.description.clone();
            expense.updated_at = Utc::now();
            Ok(expense.clone())
        }

        async fn delete_expense(&self, _token: &str, id: i64) -> Result<(), ApiError> {
            self.check_auth("delete")?;
            let mut server = self.server.lock().unwrap();
            let before = server.len();
            server.retain(|e| e.id != id);
            if server.len() == before {
                return Err(ApiError::NotFound("Expense doesn't exist".to_string()));
            }
            Ok(())
        }
    }

    fn authed_session() -> (Arc<MemoryTokenStore>, SessionManager) {
        init_tracing();
        let store = Arc::new(MemoryTokenStore::new());
        let mut session = SessionManager::new(store.clone());
        session.resolve();
        session.login(Identity::new("alice"), "tok".to_string());
        (store, session)
    }

    fn lunch() -> NewExpense {
        NewExpense {
            category: "Food".to_string(),
            amount: "12.5".parse().unwrap(),
            description: "lunch".to_string(),
        }
    }

    #[tokio::test]
    async fn create_posts_then_reloads() {
        let api = FakeApi::new();
        let mut engine = ExpenseSyncEngine::new(api.clone());
        let (_, mut session) = authed_session();

        engine.create(&mut session, lunch()).await.unwrap();

        assert_eq!(api.calls(), vec!["create", "fetch"]);
        assert_eq!(engine.expenses().len(), 1);
        let item = &engine.expenses()[0];
        assert_eq!(item.category, "Food");
        assert_eq!(item.amount, "12.5".parse::<Decimal>().unwrap());
        assert_eq!(item.description, "lunch");
        assert!(item.id > 0);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_network() {
        let api = FakeApi::new();
        let mut engine = ExpenseSyncEngine::new(api.clone());
        let (_, mut session) = authed_session();

        let cases = [
            NewExpense {
                category: "  ".to_string(),
                ..lunch()
            },
            NewExpense {
                amount: Decimal::ZERO,
                ..lunch()
            },
            NewExpense {
                amount: "-3".parse().unwrap(),
                ..lunch()
            },
            NewExpense {
                description: "".to_string(),
                ..lunch()
            },
        ];

        for input in cases {
            let err = engine.create(&mut session, input).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }

        assert!(api.calls().is_empty());
        assert!(engine.expenses().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_and_reloads() {
        let api = FakeApi::new();
        let mut engine = ExpenseSyncEngine::new(api.clone());
        let (_, mut session) = authed_session();

        engine.create(&mut session, lunch()).await.unwrap();
        let id = engine.expenses()[0].id;

        engine
            .update(
                &mut session,
                id,
                NewExpense {
                    category: "Travel".to_string(),
                    amount: "40".parse().unwrap(),
                    description: "taxi".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(engine.expenses().len(), 1);
        assert_eq!(engine.expenses()[0].category, "Travel");
        assert_eq!(api.calls(), vec!["create", "fetch", "update", "fetch"]);
    }

    #[tokio::test]
    async fn delete_removes_and_reloads() {
        let api = FakeApi::new();
        let mut engine = ExpenseSyncEngine::new(api.clone());
        let (_, mut session) = authed_session();

        engine.create(&mut session, lunch()).await.unwrap();
        let id = engine.expenses()[0].id;

        engine.delete(&mut session, id).await.unwrap();
        assert!(engine.expenses().is_empty());
    }

    #[tokio::test]
    async fn delete_of_missing_id_leaves_cache_untouched() {
        let api = FakeApi::new();
        let mut engine = ExpenseSyncEngine::new(api.clone());
        let (_, mut session) = authed_session();

        engine.create(&mut session, lunch()).await.unwrap();

        let err = engine.delete(&mut session, 7777).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        // No fabricated local removal, session still valid
        assert_eq!(engine.expenses().len(), 1);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn server_rejection_forces_logout() {
        let api = FakeApi::new();
        let mut engine = ExpenseSyncEngine::new(api.clone());
        let (store, mut session) = authed_session();

        api.reject_credential.store(true, Ordering::SeqCst);

        let err = engine.list(&mut session).await.unwrap_err();
        assert!(err.is_auth_expired());
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(store.credential().is_none());
        assert!(store.identity().is_none());
    }

    #[tokio::test]
    async fn missing_credential_is_auth_expired_without_network() {
        let api = FakeApi::new();
        let mut engine = ExpenseSyncEngine::new(api.clone());
        let store = Arc::new(MemoryTokenStore::new());
        let mut session = SessionManager::new(store);
        session.resolve();

        let err = engine.create(&mut session, lunch()).await.unwrap_err();
        assert!(err.is_auth_expired());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_cache() {
        let api = FakeApi::new();
        let mut engine = ExpenseSyncEngine::new(api.clone());
        let (_, mut session) = authed_session();

        engine.create(&mut session, lunch()).await.unwrap();
        assert_eq!(engine.expenses().len(), 1);

        api.reject_credential.store(true, Ordering::SeqCst);
        // A second login restores a credential so the engine issues the call
        session.login(Identity::new("alice"), "tok2".to_string());

        assert!(engine.list(&mut session).await.is_err());
        // Cache still reflects the last successful read
        assert_eq!(engine.expenses().len(), 1);
    }
}
