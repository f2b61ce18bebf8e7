use std::sync::Arc;

use crate::accounts::Accounts;
use crate::session::SessionKeys;
use crate::store::Store;
use crate::tasks::TaskService;

#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<TaskService<Store>>,
    pub accounts: Arc<Accounts>,
    pub sessions: Arc<SessionKeys>,
}

impl AppState {
    pub fn new(store: Store, accounts: Accounts, sessions: SessionKeys) -> Self {
        Self {
            tasks: Arc::new(TaskService::new(store)),
            accounts: Arc::new(accounts),
            sessions: Arc::new(sessions),
        }
    }
}
