use std::sync::Arc;
use tracing::{debug, error, warn};

use availability_cell::SchedulingApi;
use shared_models::{Notice, SchedulingError};

use crate::models::{messages, InvoiceView};

pub struct InvoiceBook {
    api: Arc<dyn SchedulingApi>,
    invoices: Vec<InvoiceView>,
    error: Option<String>,
    notices: Vec<Notice>,
}

impl InvoiceBook {
    pub fn new(api: Arc<dyn SchedulingApi>) -> Self {
        Self {
            api,
            invoices: Vec::new(),
            error: None,
            notices: Vec::new(),
        }
    }

    pub fn invoices(&self) -> &[InvoiceView] {
        &self.invoices
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Inline error from the last load, shown in place of the table.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub async fn load(&mut self) -> Result<&[InvoiceView], SchedulingError> {
        self.error = None;

        match self.api.list_patient_invoices().await {
            Ok(invoices) => {
                debug!("Loaded {} invoices", invoices.len());
                self.invoices = invoices.iter().map(InvoiceView::from).collect();
                Ok(&self.invoices)
            }
            Err(e) => {
                error!("Failed to load invoices: {}", e);
                self.error = Some(e.user_message(messages::INVOICES_FAILED));
                Err(e)
            }
        }
    }

    /// Payment link for an invoice, or an error notice when there is none.
    pub fn pay(&mut self, invoice_id: &str) -> Option<String> {
        let link = self
            .invoices
            .iter()
            .find(|invoice| invoice.id == invoice_id)
            .and_then(|invoice| invoice.payment_link.clone())
            .filter(|link| !link.trim().is_empty());

        if link.is_none() {
            warn!("No payment link for invoice {}", invoice_id);
            self.notices.push(Notice::error(messages::PAYMENT_LINK_MISSING));
        }
        link
    }
}
