//! Workspace-wide constants.

/// Dimension of every stored fact embedding. Part of the embedding contract:
/// stored vectors are invalid after any change to this value.
pub const EMBEDDING_DIM: usize = 384;

/// Maximum number of privacy tag occurrences processed per transcript delta.
/// Tags past the cap are left intact.
pub const MAX_PRIVACY_TAG_OCCURRENCES: usize = 100;

/// Tool results are truncated to this many characters before storage.
pub const TOOL_RESULT_MAX_CHARS: usize = 500;
