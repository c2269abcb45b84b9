//! Error types for the layout-compliance crate.

/// Errors that can occur while checking or repairing an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// An unrecognized repair strategy name was supplied.
    #[error("unknown repair strategy: {0}")]
    UnknownStrategy(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during image processing (encode, save).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unknown = Error::UnknownStrategy("mirror_flip".to_string());
        assert!(unknown.to_string().contains("mirror_flip"));
    }

    #[test]
    fn decode_error_is_distinct_from_generic_image_error() {
        let bad = image::load_from_memory(b"not an image").unwrap_err();
        let err = Error::Decode(bad);
        assert!(err.to_string().starts_with("failed to decode image"));
    }
}
