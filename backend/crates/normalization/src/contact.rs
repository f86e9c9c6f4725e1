//! Contact field validators.
//!
//! Each validator returns the cleaned value or an empty string; none of them
//! can fail.

use std::sync::OnceLock;

use phonenumber::{Mode, country};
use regex::Regex;
use url::{Host, Url};

const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// Upper bound on phone input accepted by the parser.
const MAX_PHONE_INPUT: usize = 250;

static EMAIL_USER_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_DOMAIN_RE: OnceLock<Regex> = OnceLock::new();

fn email_user_regex() -> &'static Regex {
    EMAIL_USER_RE.get_or_init(|| {
        let pattern = r"(?i)^[-!#$%&'*+/=?^_`{}|~0-9a-z]+(\.[-!#$%&'*+/=?^_`{}|~0-9a-z]+)*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email user regex failed to compile: {error}"))
    })
}

fn email_domain_regex() -> &'static Regex {
    EMAIL_DOMAIN_RE.get_or_init(|| {
        let pattern = r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9-]{2,63}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email domain regex failed to compile: {error}"))
    })
}

/// Return the lower-cased URL when it is well formed, otherwise `""`.
///
/// A well-formed URL uses an `http`, `https`, `ftp` or `ftps` scheme, has a
/// host, contains no embedded whitespace, and names either an IP address,
/// `localhost`, or a dotted domain.
///
/// # Examples
/// ```
/// use normalization::validate_url;
///
/// assert_eq!(validate_url("https://Example.COM/Quartet"), "https://example.com/quartet");
/// assert_eq!(validate_url("not a url"), "");
/// ```
#[must_use]
pub fn validate_url(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return String::new();
    }
    let Ok(parsed) = Url::parse(trimmed) else {
        return String::new();
    };
    if !URL_SCHEMES.contains(&parsed.scheme()) {
        return String::new();
    }
    let host_ok = match parsed.host() {
        Some(Host::Domain(domain)) => {
            domain.eq_ignore_ascii_case("localhost")
                || (domain.contains('.') && !domain.ends_with('.') && !domain.starts_with('.'))
        }
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        None => false,
    };
    if host_ok {
        trimmed.to_lowercase()
    } else {
        String::new()
    }
}

/// Return the lower-cased address when it is a valid email, otherwise `""`.
///
/// # Examples
/// ```
/// use normalization::validate_email;
///
/// assert_eq!(validate_email("Tenor@Example.org"), "tenor@example.org");
/// assert_eq!(validate_email("tenor@"), "");
/// ```
#[must_use]
pub fn validate_email(value: &str) -> String {
    let trimmed = value.trim();
    let Some((user, domain)) = trimmed.rsplit_once('@') else {
        return String::new();
    };
    if user.is_empty() || domain.is_empty() || domain.ends_with('-') {
        return String::new();
    }
    if email_user_regex().is_match(user) && email_domain_regex().is_match(domain) {
        trimmed.to_lowercase()
    } else {
        String::new()
    }
}

/// Return the number in E.164 international form when it parses as a valid
/// number (default region US), otherwise `""`.
///
/// # Examples
/// ```
/// use normalization::validate_phone;
///
/// assert_eq!(validate_phone("(201) 555-0123"), "+12015550123");
/// assert_eq!(validate_phone("call me"), "");
/// ```
#[must_use]
pub fn validate_phone(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_PHONE_INPUT {
        return String::new();
    }
    match phonenumber::parse(Some(country::Id::US), trimmed) {
        Ok(number) if phonenumber::is_valid(&number) => {
            number.format().mode(Mode::E164).to_string()
        }
        _ => String::new(),
    }
}
