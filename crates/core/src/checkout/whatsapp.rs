use crate::pricing::money::format_local;

use super::OrderSummary;

const BLANK: &str = "—";

/// Order message the customer sends to the office on WhatsApp.
pub fn order_message(summary: &OrderSummary) -> String {
    let customer = &summary.customer;

    [
        "🟦 *PAGESE – ORIENT NET*".to_string(),
        String::new(),
        "📦 *Paketa*".to_string(),
        format!("• {} ({})", summary.plan_name, summary.plan_slug),
        format!("• Çmimi: {} / muaj", format_local(summary.pricing.monthly_local)),
        format!("• Kohëzgjatja: {} muaj", summary.term),
        format!("• Total: *{}*", summary.total_local_display()),
        String::new(),
        "🔁 *Lloji*".to_string(),
        format!("• {}", summary.order_type.label()),
        String::new(),
        "👤 *Të dhënat e klientit*".to_string(),
        format!("• Emër Mbiemër: {}", or_blank(&customer.full_name())),
        format!("• Nr. Tel: {}", or_blank(&customer.phone)),
        format!("• Email: {}", or_blank(&customer.email)),
        String::new(),
        "📍 *Adresa*".to_string(),
        format!("• Shteti: {}", or_blank(&customer.country)),
        format!("• Qyteti/Fshati: {}", or_blank(&customer.city)),
        format!("• Adresa/Maps: {}", or_blank(&customer.address)),
        String::new(),
        "📝 *Shënime shtesë*".to_string(),
        or_blank(&customer.notes).to_string(),
    ]
    .join("\n")
}

/// `https://wa.me/<digits>?text=<message>`; non-digits in the number are
/// dropped.
pub fn deep_link(office_number: &str, message: &str) -> String {
    let digits: String = office_number.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{digits}?text={}", urlencoding::encode(message))
}

fn or_blank(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        BLANK
    } else {
        trimmed
    }
}
