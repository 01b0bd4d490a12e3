use memora_domain::{Contact, ContactMode, Reminder};
use memora_infra::Context;
use tracing::error;

/// Fans a fired reminder out to its contacts.
///
/// Contacts are attempted sequentially and a failing contact never aborts
/// the remaining ones, so there is no error to return to the caller.
/// Modes without a delivery implementation are skipped.
pub async fn send_notifications(reminder: &Reminder, contacts: &[Contact], ctx: &Context) {
    for contact in contacts {
        match contact.mode {
            ContactMode::Email => {
                if let Err(e) = ctx
                    .mailer
                    .send(&contact.address, &reminder.title, &reminder.description)
                    .await
                {
                    error!(
                        "Failed to send notification for reminder {} to {}: {:?}",
                        reminder.id, contact.address, e
                    );
                }
            }
            // Reserved modes, accepted but without a transport
            ContactMode::Sms | ContactMode::Push | ContactMode::Ical => {}
        }
    }
}
