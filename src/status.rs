//! Scheme account status codes and their external reason-code translation.
//!
//! Static data only.  `CURRENT_STATUS_CODES` is the internal status
//! vocabulary; `REASON_CODES` is the external one; `reason_code_for_status`
//! maps between them.  Statuses with no external equivalent map to `None`.

/// External reason codes and their descriptions.
pub static REASON_CODES: &[(&str, &str)] = &[
    ("X000", "New data submitted/modified"),
    ("X100", "Add fields being validated"),
    ("X101", "Account does not exist"),
    ("X102", "Add data rejected by merchant"),
    ("X103", "No authorisation provided"),
    ("X104", "Update failed. Delete and re-add card."),
    ("X105", "Account not registered"),
    ("X200", "Enrolment in progress"),
    ("X201", "Enrolment data rejected by merchant"),
    ("X202", "Account already exists"),
    ("X203", "Enrolment complete"),
    ("X300", "Authorisation correct"),
    ("X301", "Authorisation in progress"),
    ("X302", "No authorisation required"),
    ("X303", "Authorisation data rejected by merchant"),
    ("X304", "Authorisation expired"),
];

/// Internal scheme account status codes and their descriptions.
pub static CURRENT_STATUS_CODES: &[(u16, &str)] = &[
    (0, "Pending"),
    (1, "Active"),
    (403, "Invalid credentials"),
    (432, "Invalid mfa"),
    (530, "End site down"),
    (531, "IP blocked"),
    (532, "Tripped captcha"),
    (5, "Please check your scheme account login details."),
    (434, "Account locked on end site"),
    (429, "Cannot connect, too many retries"),
    (503, "Too many balance requests running"),
    (520, "An unknown error has occurred"),
    (9, "Midas unavailable"),
    (404, "Agent does not exist on midas"),
    (10, "Wallet only card"),
    (533, "Password expired"),
    (900, "Join"),
    (444, "No user currently found"),
    (536, "Error with the configuration or it was not possible to retrieve"),
    (535, "Request was not sent"),
    (445, "Account already exists"),
    (537, "Service connection error"),
    (401, "Failed validation"),
    (406, "Pre-registered card"),
    (446, "Update failed. Delete and re-add card."),
    (447, "Scheme requested account deletion"),
    (204, "Pending manual check"),
    (436, "Invalid card_number"),
    (437, "You can only Link one card per day."),
    (438, "Unknown Card number"),
    (439, "General Error such as incorrect user details"),
    (441, "Join in progress"),
    (538, "A system error occurred during join"),
    (442, "Asynchronous join in progress"),
];

/// Translate an internal status code to its external reason code.
///
/// Returns `None` both for unknown statuses and for statuses that have no
/// external equivalent.
pub fn reason_code_for_status(status: u16) -> Option<&'static str> {
    match status {
        0 => Some("X100"),
        1 => Some("X300"),
        403 => Some("X303"),
        432 => Some("X303"),
        5 => Some("X303"),
        434 => Some("X304"),
        404 => Some("X101"),
        10 => Some("X103"),
        533 => Some("X304"),
        444 => Some("X101"),
        406 => Some("X105"),
        446 => Some("X104"),
        447 => Some("X304"),
        204 => Some("X100"),
        436 => Some("X102"),
        438 => Some("X105"),
        442 => Some("X100"),
        _ => None,
    }
}

/// Description of an internal status code.
pub fn status_description(status: u16) -> Option<&'static str> {
    CURRENT_STATUS_CODES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, description)| *description)
}

/// Description of an external reason code.
pub fn reason_code_description(code: &str) -> Option<&'static str> {
    REASON_CODES
        .iter()
        .find(|(reason, _)| *reason == code)
        .map(|(_, description)| *description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translated_statuses() {
        assert_eq!(reason_code_for_status(0), Some("X100"));
        assert_eq!(reason_code_for_status(1), Some("X300"));
        assert_eq!(reason_code_for_status(404), Some("X101"));
        assert_eq!(reason_code_for_status(446), Some("X104"));
    }

    #[test]
    fn untranslatable_statuses_yield_none() {
        // These statuses exist but have no external reason code.
        assert_eq!(reason_code_for_status(530), None);
        assert_eq!(reason_code_for_status(900), None);
        // And unknown statuses behave the same way.
        assert_eq!(reason_code_for_status(999), None);
    }

    #[test]
    fn every_translation_target_is_a_known_reason_code() {
        for (status, _) in CURRENT_STATUS_CODES {
            if let Some(code) = reason_code_for_status(*status) {
                assert!(
                    reason_code_description(code).is_some(),
                    "status {status} maps to unknown reason code {code}"
                );
            }
        }
    }

    #[test]
    fn description_lookups() {
        assert_eq!(status_description(1), Some("Active"));
        assert_eq!(status_description(999), None);
        assert_eq!(
            reason_code_description("X304"),
            Some("Authorisation expired")
        );
    }
}
