//! Input checks shared by the login and user forms

/// MIME types accepted for profile pictures
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

pub const MIB: u64 = 1024 * 1024;

pub const IMAGE_WRONG_TYPE: &str = "Only JPG, PNG and GIF files are allowed";

/// `local@domain.tld` with no whitespace and exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // A dot with at least one character on each side
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Digits, spaces and `-+()` only
pub fn is_valid_phone(phone: &str) -> bool {
    !phone.is_empty()
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
}

/// Whole megabytes, as shown to users
pub fn megabytes(bytes: u64) -> u64 {
    bytes / MIB
}

pub fn image_too_large(max_bytes: u64) -> String {
    format!("File size must be less than {}MB", megabytes(max_bytes))
}

/// Check a picked image against the size cap, then the type allow-list
pub fn validate_image(mime_type: &str, size: u64, max_bytes: u64) -> Result<(), String> {
    if size > max_bytes {
        return Err(image_too_large(max_bytes));
    }
    if !ALLOWED_IMAGE_TYPES.contains(&mime_type) {
        return Err(IMAGE_WRONG_TYPE.to_string());
    }
    Ok(())
}
