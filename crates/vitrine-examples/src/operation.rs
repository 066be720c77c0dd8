//! The fixed API operations documented on the landing page.

/// One of the three operations every language gets a snippet for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Requesting an API key.
    Authentication,
    /// Submitting a website generation request.
    Generation,
    /// Polling a generation job for completion.
    StatusCheck,
}

impl Operation {
    /// All operations, in the order their panels appear.
    pub const ALL: [Operation; 3] = [
        Operation::Authentication,
        Operation::Generation,
        Operation::StatusCheck,
    ];

    /// Stable key used in panel ids.
    pub fn key(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Generation => "generation",
            Self::StatusCheck => "status-check",
        }
    }

    /// Panel heading.
    pub fn title(self) -> &'static str {
        match self {
            Self::Authentication => "Get an API key",
            Self::Generation => "Generate a website",
            Self::StatusCheck => "Check generation status",
        }
    }
}

impl serde::Serialize for Operation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_three_operations() {
        assert_eq!(Operation::ALL.len(), 3);
        for op in Operation::ALL {
            assert!(!op.key().is_empty());
            assert!(!op.title().is_empty());
        }
    }
}
