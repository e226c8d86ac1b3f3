//! Input validation for everything that arrives from the network or disk:
//! command bodies and world seed files.

#[derive(Debug, PartialEq, Eq)]
pub enum SecurityError {
    /// Content is too long
    ContentTooLong { max_length: usize },

    /// File size exceeds maximum allowed
    FileSizeExceeded { limit: usize },

    /// JSON format is invalid or malformed
    InvalidFormat,
}

impl std::fmt::Display for SecurityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityError::ContentTooLong { max_length } => {
                write!(f, "Content too long (max {} bytes)", max_length)
            }
            SecurityError::FileSizeExceeded { limit } => {
                write!(f, "File size exceeds limit ({} bytes)", limit)
            }
            SecurityError::InvalidFormat => write!(f, "Invalid format"),
        }
    }
}

impl std::error::Error for SecurityError {}

/// Clean up a command body for the interpreter.
///
/// Line breaks and tabs become spaces, other control characters are dropped
/// and the result is trimmed. An empty result is not an error here; the
/// bridge decides what to do with it.
pub fn sanitize_command(body: &str, max_bytes: usize) -> Result<String, SecurityError> {
    if body.len() > max_bytes {
        return Err(SecurityError::ContentTooLong {
            max_length: max_bytes,
        });
    }

    let sanitized: String = body
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    Ok(sanitized.trim().to_string())
}

/// Validate file size before reading
pub fn validate_file_size(size: u64, max_size: u64) -> Result<(), SecurityError> {
    if size > max_size {
        return Err(SecurityError::FileSizeExceeded {
            limit: max_size as usize,
        });
    }
    Ok(())
}

/// Securely parse JSON with size limits and error handling
pub fn secure_json_parse<T>(content: &str, max_bytes: usize) -> Result<T, SecurityError>
where
    T: serde::de::DeserializeOwned,
{
    if content.len() > max_bytes {
        return Err(SecurityError::FileSizeExceeded { limit: max_bytes });
    }

    // valid JSON never starts with NUL; interrupted writes sometimes leave them
    let normalized = content.trim_start_matches('\0');

    serde_json::from_str(normalized).map_err(|_| SecurityError::InvalidFormat)
}
