//! Dashboard counts across items, requests and loans.

use chrono::{DateTime, Utc};

use super::context::ViewContext;
use crate::domain::{LoanStatus, StockLevel, StockThresholds};
use crate::error::GestorResult;
use crate::models::{Item, Loan, LoanRequest, RequestStatus};
use crate::traits::HttpClient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub items: usize,
    pub items_bajo: usize,
    pub items_critico: usize,
    pub requests_pendientes: usize,
    pub loans_en_curso: usize,
    pub loans_vencidos: usize,
}

impl Summary {
    /// Fetch the three lists concurrently and count them at `now`.
    pub async fn load<H: HttpClient>(
        ctx: &ViewContext<H>,
        now: DateTime<Utc>,
    ) -> GestorResult<Self> {
        let api = &ctx.api;
        let (items, requests, loans) = futures::try_join!(
            api.get::<Vec<Item>>("/items"),
            api.get::<Vec<LoanRequest>>("/requests"),
            api.get::<Vec<Loan>>("/loans"),
        )?;
        Ok(Self::compute(&items, &requests, &loans, ctx.thresholds, now))
    }

    pub fn compute(
        items: &[Item],
        requests: &[LoanRequest],
        loans: &[Loan],
        thresholds: StockThresholds,
        now: DateTime<Utc>,
    ) -> Self {
        let mut summary = Self {
            items: items.len(),
            ..Self::default()
        };
        for item in items {
            match item.stock_level(thresholds) {
                StockLevel::Bajo => summary.items_bajo += 1,
                StockLevel::Critico => summary.items_critico += 1,
                StockLevel::Ok => {}
            }
        }
        summary.requests_pendientes = requests
            .iter()
            .filter(|r| r.estado == RequestStatus::Pendiente)
            .count();
        for loan in loans {
            match loan.status(now) {
                LoanStatus::EnCurso => summary.loans_en_curso += 1,
                LoanStatus::Vencido => summary.loans_vencidos += 1,
                LoanStatus::Completo => {}
            }
        }
        summary
    }

    pub fn has_alerts(&self) -> bool {
        self.items_bajo + self.items_critico + self.loans_vencidos > 0
    }
}
