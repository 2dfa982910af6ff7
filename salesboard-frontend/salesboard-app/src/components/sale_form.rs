use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::debug;
use salesboard_api_types::{PaymentMethod, Sale, UnknownPaymentMethod};

use crate::{
    error::{FormError, PersistError},
    format::{format_amount_input, format_clp, parse_amount_input},
    global_state::{sale_ids::SaleIdGenerator, sales::SalesStore, toasts::Toasts},
};

/// A sale the form recorded. `persist_error` is set when the store holds the
/// sale but could not write it to storage.
#[derive(Clone, Debug)]
pub struct Submitted {
    pub sale: Sale,
    pub persist_error: Option<PersistError>,
}

impl Submitted {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// The "new sale" dialog: an amount, a payment method, and a submit button.
#[derive(Debug)]
pub struct SaleForm {
    store: SalesStore,
    toasts: Toasts,
    ids: Rc<SaleIdGenerator>,
    seller_name: String,
    amount: String,
    payment_method: Option<PaymentMethod>,
    open: bool,
}

impl SaleForm {
    pub fn new(
        store: SalesStore,
        toasts: Toasts,
        ids: Rc<SaleIdGenerator>,
        seller_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            toasts,
            ids,
            seller_name: seller_name.into(),
            amount: String::new(),
            payment_method: None,
            open: false,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closing discards whatever was typed.
    pub fn close(&mut self) {
        self.reset();
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Stores the amount the way the field shows it, `125.000`.
    pub fn set_amount(&mut self, raw: &str) {
        self.amount = format_amount_input(raw);
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn set_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.payment_method = method;
    }

    /// Takes the value of the method picker; an empty value clears it.
    pub fn select_payment_method(&mut self, raw: &str) -> Result<(), UnknownPaymentMethod> {
        self.payment_method = if raw.trim().is_empty() {
            None
        } else {
            Some(raw.parse()?)
        };
        Ok(())
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn validate(&self) -> Result<(u64, PaymentMethod), FormError> {
        let amount = parse_amount_input(&self.amount)?;
        let (Some(amount), Some(method)) = (amount, self.payment_method) else {
            return Err(FormError::MissingFields);
        };
        if amount == 0 {
            return Err(FormError::NonPositiveAmount);
        }
        Ok((amount, method))
    }

    /// Records the sale stamped with `now`. A rejection leaves the store untouched
    /// and the input in place; both outcomes raise a toast.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<Submitted, FormError> {
        let checked = self.validate().and_then(|(amount, method)| {
            let id = self.ids.next_id().ok_or(FormError::IdsExhausted)?;
            Ok((id, amount, method))
        });
        let (id, amount, method) = match checked {
            Ok(valid) => valid,
            Err(e) => {
                debug!("sale form rejected: {e}");
                self.toasts.error(e.to_string());
                return Err(e);
            }
        };
        let sale = Sale::new(id, now, self.seller_name.clone(), amount, method);
        // the store logs a failed mirror write and keeps the sale either way
        let persist_error = self.store.add(sale.clone()).err();
        self.toasts
            .success(format!("Sale recorded for {}", format_clp(sale.amount)));
        self.close();
        Ok(Submitted {
            sale,
            persist_error,
        })
    }

    pub fn submit_now(&mut self) -> Result<Submitted, FormError> {
        self.submit(Utc::now())
    }

    fn reset(&mut self) {
        self.amount.clear();
        self.payment_method = None;
    }
}
