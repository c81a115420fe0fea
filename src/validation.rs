/// Field-level cleanup of enriched leads
///
/// Everything here is pure and synchronous: no network access, and the raw
/// `phone`/`email`/`website` fields are never modified. Only the `clean_*`
/// counterparts and the pitch fallback are written, so running `validate_lead`
/// twice yields the same cleaned values as running it once.
use crate::locale::Locale;
use crate::models::Lead;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Pitches of this many characters or fewer are replaced by the fallback sentence.
pub const MIN_PITCH_LEN: usize = 5;

// local@domain.tld with no whitespace and a single '@'
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Values models put in the website field when they found nothing.
const WEBSITE_PLACEHOLDERS: &[&str] = &[
    "not found",
    "n/a",
    "none",
    "unknown",
    "inconnu",
    "non trouvé",
];

/// Keep only ASCII digits and `+`, in their original order.
///
/// An absent phone yields an empty string rather than a placeholder.
pub fn clean_phone(phone: Option<&str>) -> String {
    match phone {
        Some(raw) => raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect(),
        None => String::new(),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Returns the email unchanged when it looks like `local@domain.tld`,
/// otherwise the locale's "needs prospecting" sentinel.
pub fn validate_email(email: Option<&str>, locale: Locale) -> String {
    match email {
        Some(address) if is_valid_email(address) => address.to_string(),
        Some(address) => {
            tracing::debug!("❌ Invalid email format: {}", address);
            locale.email_sentinel().to_string()
        }
        None => locale.email_sentinel().to_string(),
    }
}

pub fn is_website_placeholder(website: &str) -> bool {
    let normalized = website.trim().to_lowercase();
    normalized.is_empty() || WEBSITE_PLACEHOLDERS.contains(&normalized.as_str())
}

/// Returns the canonical serialization of an absolute URL, or the locale's
/// "invalid" sentinel for placeholders and anything that fails to parse.
pub fn validate_website(website: Option<&str>, locale: Locale) -> String {
    let Some(raw) = website else {
        return locale.website_sentinel().to_string();
    };

    if is_website_placeholder(raw) {
        return locale.website_sentinel().to_string();
    }

    match Url::parse(raw) {
        Ok(parsed) => parsed.to_string(),
        Err(e) => {
            tracing::debug!("❌ Invalid website '{}': {}", raw, e);
            locale.website_sentinel().to_string()
        }
    }
}

pub fn ensure_pitch(pitch: Option<&str>, locale: Locale) -> String {
    match pitch {
        Some(text) if text.chars().count() > MIN_PITCH_LEN => text.to_string(),
        _ => locale.pitch_fallback().to_string(),
    }
}

/// Populates the cleaned fields of a lead and applies the pitch fallback.
pub fn validate_lead(lead: Lead, locale: Locale) -> Lead {
    let clean_phone = clean_phone(lead.phone.as_deref());
    let clean_email = validate_email(lead.email.as_deref(), locale);
    let clean_website = validate_website(lead.website.as_deref(), locale);
    let pitch = ensure_pitch(lead.pitch.as_deref(), locale);

    Lead {
        clean_phone: Some(clean_phone),
        clean_email: Some(clean_email),
        clean_website: Some(clean_website),
        pitch: Some(pitch),
        ..lead
    }
}
