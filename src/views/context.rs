//! Explicit per-view context: API client, session snapshot, thresholds.

use crate::api::ApiClient;
use crate::auth::Session;
use crate::domain::{can_delete, can_manage, is_admin, StockThresholds};
use crate::error::PermissionError;
use crate::traits::HttpClient;

/// Everything a view-model needs, passed in at construction.
#[derive(Debug)]
pub struct ViewContext<H> {
    pub api: ApiClient<H>,
    pub session: Session,
    pub thresholds: StockThresholds,
}

impl<H> Clone for ViewContext<H> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            session: self.session.clone(),
            thresholds: self.thresholds,
        }
    }
}

impl<H: HttpClient> ViewContext<H> {
    /// Build a context; the API client takes the session's token.
    pub fn new(api: ApiClient<H>, session: Session, thresholds: StockThresholds) -> Self {
        let api = api.with_token(session.token.clone());
        Self {
            api,
            session,
            thresholds,
        }
    }

    pub fn can_manage(&self) -> bool {
        can_manage(self.session.role())
    }

    pub fn can_delete(&self) -> bool {
        can_delete(self.session.role())
    }

    pub fn is_admin(&self) -> bool {
        is_admin(self.session.role())
    }

    /// Admin or encargado, else a warning naming `action`.
    pub fn require_manage(&self, action: &'static str) -> Result<(), PermissionError> {
        if self.can_manage() {
            Ok(())
        } else {
            Err(PermissionError::ManageRequired { action })
        }
    }

    /// Admin, else a warning naming `action`.
    pub fn require_admin(&self, action: &'static str) -> Result<(), PermissionError> {
        if self.can_delete() {
            Ok(())
        } else {
            Err(PermissionError::AdminRequired { action })
        }
    }
}
