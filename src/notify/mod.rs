//! Outbound notification capability.
//!
//! The core only needs a send capability; the concrete transport (the app
//! shell opens a WhatsApp deep-link) lives outside this crate and is
//! injected as a [`Notifier`].

pub mod dispatcher;

pub use dispatcher::*;

use thiserror::Error;

use crate::models::Medicine;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Notification send failed: {reason}")]
    SendFailed { reason: String },
}

/// External send capability: deliver `text` to `destination`.
pub trait Notifier: Send + Sync {
    fn send(&self, destination: &str, text: &str) -> Result<(), DispatchError>;
}

/// Message text for a due dose.
pub fn notification_text(medicine: &Medicine) -> String {
    format!(
        "Time to take your medicine: {} - {}",
        medicine.name, medicine.dosage
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedicineKind;

    #[test]
    fn notification_text_names_medicine_and_dosage() {
        let med = Medicine::new("Aspirin", MedicineKind::OneTime, "100 mg");
        assert_eq!(
            notification_text(&med),
            "Time to take your medicine: Aspirin - 100 mg"
        );
    }
}
