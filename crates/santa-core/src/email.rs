//! Email address syntax check shared by the store invariants and the CSV
//! validator.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
  )
  .expect("email pattern is a valid regex")
});

/// `true` if `s` is a syntactically valid address (local part, `@`, and a
/// dot-separated host of 1–63 character labels). No DNS lookup is made.
pub fn is_valid_email(s: &str) -> bool { EMAIL_RE.is_match(s) }

#[cfg(test)]
mod tests {
  use super::is_valid_email;

  #[test]
  fn accepts_common_addresses() {
    for email in [
      "user@example.com",
      "user.name@example.com",
      "user+tag@example.com",
      "user123@domain.co.uk",
      "user@subdomain.example.org",
    ] {
      assert!(is_valid_email(email), "{email} should be valid");
    }
  }

  #[test]
  fn rejects_malformed_addresses() {
    for email in [
      "invalid-email",
      "user@",
      "@example.com",
      "user.example.com",
      "user space@example.com",
      "",
      "user@example.com\n",
    ] {
      assert!(!is_valid_email(email), "{email:?} should be invalid");
    }
  }
}
