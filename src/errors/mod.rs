use thiserror::Error;

/// Pasted text that cannot be classified at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("Invalid data format: Not enough lines")]
    NotEnoughLines,
}

/// Failure of a single imported row. The batch carries on without it.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("Could not extract BWF ID from URL")]
    MissingBwfId { url: String },
    #[error("Could not extract BWF IDs from URLs")]
    MissingPairBwfIds,
    #[error("Invalid points value: {raw:?}")]
    InvalidPoints { raw: String },
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn row_error_messages() {
        let missing = RowError::MissingBwfId {
            url: "https://x/".to_string(),
        };
        assert_eq!(missing.to_string(), "Could not extract BWF ID from URL");

        let points = RowError::InvalidPoints {
            raw: "n/a".to_string(),
        };
        assert_eq!(points.to_string(), "Invalid points value: \"n/a\"");
    }

    #[test]
    fn persistence_errors_show_their_context() {
        let failure: anyhow::Result<()> = Err(anyhow::anyhow!("disk I/O error"))
            .context("Failed to upsert ranking snapshot");
        let error = RowError::from(failure.unwrap_err());

        assert_eq!(error.to_string(), "Failed to upsert ranking snapshot");
    }
}
