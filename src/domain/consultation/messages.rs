//! Telegram message bodies for paid consultations.
//!
//! Messages are sent with HTML parse mode, so every user-supplied field is
//! escaped before interpolation.

use std::fmt::Write;

use crate::domain::foundation::{PaymentId, UserId};

use super::ConsultationSummary;

/// Escapes the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Operator-channel message listing every consultation in the batch.
pub fn operator_message(
    payment_id: PaymentId,
    user_id: UserId,
    consultations: &[ConsultationSummary],
) -> String {
    let mut msg = String::new();
    msg.push_str("💰 <b>Оплачена консультация!</b>\n\n");
    msg.push_str("💰 <b>Свяжитесь с пользователем и специалистом!</b>\n\n");

    // Writing into a String cannot fail.
    let _ = writeln!(msg, "🆔 <b>Платеж:</b> {payment_id}");
    let _ = writeln!(msg, "👤 <b>Пользователь:</b> {user_id}\n");
    let _ = writeln!(msg, "📋 <b>Консультации ({}):</b>", consultations.len());

    for (i, c) in consultations.iter().enumerate() {
        let _ = writeln!(msg, "{}. <b>ID:</b> {}", i + 1, c.id);
        let _ = writeln!(msg, "   💰 <b>Цена:</b> {} руб.", c.price);
        if let Some(name) = non_empty(&c.name) {
            let _ = writeln!(msg, "   👤 <b>Имя:</b> {}", escape_html(name));
        }
        if let Some(email) = non_empty(&c.email) {
            let _ = writeln!(msg, "   📧 <b>Email:</b> {}", escape_html(email));
        }
        if let Some(tag) = non_empty(&c.tg_tag) {
            let tag = tag.trim_start_matches('@');
            let _ = writeln!(msg, "   🏷️ <b>Telegram:</b> @{}", escape_html(tag));
        }
        let _ = writeln!(msg, "   🎯 <b>Специалист ID:</b> {}", c.specialist_id);
        let _ = writeln!(msg, "   🔧 <b>Сервис ID:</b> {}\n", c.service_id);
    }

    msg
}

/// Message telling the user how many consultations were paid.
pub fn user_message(consultations_count: usize) -> String {
    format!(
        "✅ <b>Ваша консультация оплачена!</b>\n\n\
         📋 <b>Консультаций оплачено:</b> {consultations_count}\n\n\
         👨‍💼 <b>С вами скоро свяжется специалист для проведения консультации.</b>\n\n\
         Спасибо за выбор наших услуг! 🙏"
    )
}
