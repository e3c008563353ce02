//! # Email Templates
//!
//! HTML bodies for transactional mail. Rendering only; delivery belongs to
//! whichever mailer the deployment wires up.

use serde::Serialize;

use crate::types::{Booking, Role, User};

/// A rendered message ready to hand to a mailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
}

/// Escapes text for interpolation into HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body style="font-family: Arial, sans-serif; color: #1f2937;">
<div style="max-width: 560px; margin: 0 auto; padding: 24px;">
<h1 style="color: #2563eb;">{title}</h1>
{body}
<p style="color: #6b7280; font-size: 12px;">Carhire</p>
</div>
</body>
</html>"#
    )
}

/// Sent after registration.
pub fn welcome_email(user: &User, role: Role) -> EmailMessage {
    let next_step = match role {
        Role::Renter => "Browse cars near you and book your first trip.",
        Role::Owner => "List your first car and start earning.",
    };

    let body = format!(
        "<p>Hi {},</p>\n<p>Welcome to Carhire. {}</p>",
        escape_html(&user.name),
        next_step
    );

    EmailMessage {
        subject: "Welcome to Carhire".to_string(),
        html: layout("Welcome to Carhire", &body),
    }
}

/// Sent to the renter when a booking is created.
pub fn booking_confirmation_email(booking: &Booking) -> EmailMessage {
    let car = escape_html(&booking.car.display_name());
    let body = format!(
        concat!(
            "<p>Your booking for the <strong>{car}</strong> is {status}.</p>\n",
            "<table>\n",
            "<tr><td>Dates</td><td>{start} to {end}</td></tr>\n",
            "<tr><td>Pickup</td><td>{pickup}</td></tr>\n",
            "<tr><td>Drop-off</td><td>{dropoff}</td></tr>\n",
            "<tr><td>Driver</td><td>{driver}</td></tr>\n",
            "<tr><td>Total</td><td>{total}</td></tr>\n",
            "</table>\n",
            "<p>Booking reference: {id}</p>"
        ),
        car = car,
        status = booking.status,
        start = booking.start_date.format("%d %b %Y"),
        end = booking.end_date.format("%d %b %Y"),
        pickup = escape_html(&booking.pickup_location),
        dropoff = escape_html(&booking.dropoff_location),
        driver = if booking.with_driver { "Yes" } else { "No" },
        total = booking.total_price(),
        id = escape_html(&booking.id),
    );

    EmailMessage {
        subject: format!("Booking {}: {}", booking.status, booking.car.display_name()),
        html: layout("Booking details", &body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingDraft;
    use crate::seed::sample_catalog;
    use chrono::NaiveDate;

    #[test]
    fn test_welcome_escapes_name() {
        let user = User {
            id: "u1".to_string(),
            email: "x@example.com".to_string(),
            name: "<script>".to_string(),
            phone: None,
            avatar: None,
        };
        let mail = welcome_email(&user, Role::Owner);
        assert!(mail.html.contains("&lt;script&gt;"));
        assert!(!mail.html.contains("<script>"));
        assert!(mail.html.contains("List your first car"));
    }

    #[test]
    fn test_booking_confirmation_contents() {
        let booking = BookingDraft {
            user_id: "renter-1".to_string(),
            car: sample_catalog().remove(0),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            pickup_location: "JKIA".to_string(),
            dropoff_location: String::new(),
            with_driver: true,
        }
        .into_booking()
        .unwrap();

        let mail = booking_confirmation_email(&booking);
        assert_eq!(mail.subject, "Booking pending: Toyota Camry");
        assert!(mail.html.contains("$170.00"));
        assert!(mail.html.contains("01 Jun 2024 to 03 Jun 2024"));
        assert!(mail.html.contains(&booking.id));
    }
}
