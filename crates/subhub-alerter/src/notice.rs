// Renewal notice formatting

use subhub_core::subscription::RenewalNotice;

/// Build the renewal reminder for one subscription, addressed to the
/// owner's email
pub fn renewal_notice(username: &str, vendor: &str, recipient: impl Into<String>) -> RenewalNotice {
    let subject = format!("Important Notice: Your {vendor} Subscription Renewal");

    let body = format!(
        "Dear {username},\n\n\
         Your subscription to {vendor} is set to expire tomorrow. We want to make sure \
         you have the opportunity to continue your service or make changes if needed.\n\n\
         If you have any questions or require assistance, please contact our customer \
         support team.\n\n\
         Thank you for being a valued customer.\n\n\
         Sincerely,\n\
         SubHub\n"
    );

    RenewalNotice {
        recipient: recipient.into(),
        subject,
        body,
    }
}
