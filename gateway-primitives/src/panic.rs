//! Helpers for turning caught panics into diagnostics.

use std::any::Any;

/// Extracts the message carried by a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_str_and_string_payloads() {
        let err = std::panic::catch_unwind(|| panic!("boom")).expect_err("panics");
        assert_eq!(panic_message(&*err), "boom");

        let err = std::panic::catch_unwind(|| panic!("code {}", 7)).expect_err("panics");
        assert_eq!(panic_message(&*err), "code 7");
    }
}
