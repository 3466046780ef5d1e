use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use sweldo_application::AccessGrantRepository;
use sweldo_core::{AppError, AppResult, CompanyId, UserId};
use sweldo_domain::AccessGrant;

/// In-memory access grant repository for tests and local experiments.
#[derive(Default)]
pub struct InMemoryAccessGrantRepository {
    grants: Mutex<Vec<AccessGrant>>,
    selections: Mutex<HashMap<UserId, CompanyId>>,
}

impl InMemoryAccessGrantRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a grant row.
    pub fn add_grant(&self, grant: AccessGrant) -> AppResult<()> {
        self.grants
            .lock()
            .map_err(|_| AppError::Internal("grant store lock poisoned".to_owned()))?
            .push(grant);

        Ok(())
    }
}

#[async_trait]
impl AccessGrantRepository for InMemoryAccessGrantRepository {
    async fn list_active_grants(&self, user_id: UserId) -> AppResult<Vec<AccessGrant>> {
        Ok(self
            .grants
            .lock()
            .map_err(|_| AppError::Internal("grant store lock poisoned".to_owned()))?
            .iter()
            .filter(|grant| grant.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn selected_company(&self, user_id: UserId) -> AppResult<Option<CompanyId>> {
        Ok(self
            .selections
            .lock()
            .map_err(|_| AppError::Internal("selection store lock poisoned".to_owned()))?
            .get(&user_id)
            .copied())
    }

    async fn save_selected_company(&self, user_id: UserId, company_id: CompanyId) -> AppResult<()> {
        self.selections
            .lock()
            .map_err(|_| AppError::Internal("selection store lock poisoned".to_owned()))?
            .insert(user_id, company_id);

        Ok(())
    }
}
